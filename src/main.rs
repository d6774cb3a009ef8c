//! mdtofile - Main Entry Point
//!
//! Convert Markdown to themed PDF or self-contained HTML, with a live
//! preview document that follows edits to a file.

mod app;
mod cli;
mod config;
mod debounce;
mod error;
mod export;
mod feedback;
mod markdown;
mod preview;
mod session;
mod theme;
mod watch;

use chrono::Utc;
use clap::Parser;
use log::{debug, info, LevelFilter};
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use app::{App, ExportFormat};
use cli::{Cli, Command};
use config::{get_config_file_path, get_data_dir, load_config, save_config_silent, APP_NAME};
use error::{Error, Result};
use markdown::validate;
use preview::Preview;
use session::{FileStore, SNAPSHOT_KEY};
use theme::ThemeId;
use watch::{SourceEvent, SourceWatcher, WaitResult};

/// Longest time the watch loop blocks when no render is pending.
const IDLE_WAIT: Duration = Duration::from_secs(1);

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging. `RUST_LOG` wins over the verbosity flag.
fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default.as_str().to_lowercase()),
    )
    .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let config_path = match cli.config {
        Some(path) => path,
        None => get_config_file_path()?,
    };
    let state_dir = match cli.state_dir {
        Some(dir) => dir,
        None => get_data_dir()?,
    };
    let settings = load_config(&config_path);
    info!("Starting {} (state in {})", APP_NAME, state_dir.display());

    if let Command::Config = cli.command {
        print_config(&settings, &config_path, &state_dir)?;
        return Ok(ExitCode::SUCCESS);
    }

    let preview_path = match &cli.command {
        Command::Watch {
            preview: Some(path),
            ..
        } => path.clone(),
        _ => settings.preview_path(&state_dir),
    };
    let preview = Preview::new(ThemeId::default())
        .with_mirror(&preview_path, settings.preview_refresh_secs);
    let store = FileStore::new(&state_dir);
    let mut app = App::new(Box::new(store), settings.clone(), preview);
    let mut printed = 0;

    let code = match cli.command {
        Command::Status => {
            print_status(&app, &state_dir);
            ExitCode::SUCCESS
        }
        Command::Open { file } => {
            app.load_file(&file);
            ExitCode::SUCCESS
        }
        Command::Write => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            app.on_text_input(text, Instant::now());
            app.flush();
            ExitCode::SUCCESS
        }
        Command::Clear { yes } => {
            if yes {
                app.clear();
                ExitCode::SUCCESS
            } else {
                eprintln!("⚠️ This erases the saved document. Run again with --yes to confirm.");
                ExitCode::FAILURE
            }
        }
        Command::Theme { key, list } => {
            if list {
                for theme in ThemeId::all() {
                    let marker = if *theme == app.session().theme { "*" } else { " " };
                    println!("{} {:<14}{}", marker, theme.key(), theme.definition().name);
                }
            } else if let Some(theme) = key {
                app.set_theme(theme);
            } else {
                println!("{}", app.session().theme);
            }
            ExitCode::SUCCESS
        }
        Command::Filename { name } => {
            match name {
                Some(name) => app.set_filename(&name),
                None => println!("{}", app.session().filename),
            }
            ExitCode::SUCCESS
        }
        Command::Timestamp => {
            app.append_timestamp(Utc::now());
            println!("{}", app.session().filename);
            ExitCode::SUCCESS
        }
        Command::Orientation { value } => {
            match value {
                Some(orientation) => app.set_orientation(orientation),
                None => println!("{}", app.session().orientation),
            }
            ExitCode::SUCCESS
        }
        Command::Render { document } => {
            if document {
                println!("{}", app.preview().document());
            } else {
                println!("{}", app.preview().fragment().html);
            }
            ExitCode::SUCCESS
        }
        Command::Check => {
            let report = validate(
                &app.session().markdown,
                app.settings().large_document_threshold,
            );
            if report.valid {
                println!("No problems found.");
            } else {
                for warning in &report.warnings {
                    println!("⚠️ {}", warning);
                }
            }
            ExitCode::SUCCESS
        }
        Command::Export {
            format,
            out_dir,
            open,
        } => {
            let path = match format {
                ExportFormat::Pdf => app.export_pdf(out_dir.as_deref(), open),
                ExportFormat::Html => app.export_html(out_dir.as_deref(), open, Utc::now()),
            };
            if let Some(path) = path {
                println!("{}", path.display());
            }
            ExitCode::SUCCESS
        }
        Command::Watch { file, open, .. } => {
            run_watch(&mut app, &file, &preview_path, open, &mut printed)?;
            ExitCode::SUCCESS
        }
        Command::Config => ExitCode::SUCCESS,
    };

    print_notifications(&app, &mut printed);

    if app.settings() != &settings {
        save_config_silent(app.settings(), &config_path);
    }
    Ok(code)
}

/// Print notifications posted since the last call to stderr.
fn print_notifications(app: &App, printed: &mut u64) {
    for notification in app.feed().since(*printed) {
        eprintln!("{}", notification);
    }
    *printed = app.feed().next_seq();
}

fn print_status(app: &App, state_dir: &Path) {
    let session = app.session();
    let (title, tagline) = session.theme.banner();
    println!("{}", title);
    println!("{}", tagline);
    println!();
    let definition = session.theme.definition();
    println!(
        "Theme:        {} ({}, {} background)",
        session.theme,
        definition.name,
        if definition.is_dark() { "dark" } else { "light" }
    );
    println!("Filename:     {}", session.filename);
    println!("Orientation:  {}", session.orientation);
    println!(
        "Document:     {} characters, {} lines",
        session.markdown.chars().count(),
        session.markdown.lines().count()
    );
    println!(
        "Snapshot:     {}",
        FileStore::new(state_dir).path_for(SNAPSHOT_KEY).display()
    );
    if let Some(path) = app.preview().mirror_path() {
        println!("Preview:      {}", path.display());
    }
}

fn print_config(settings: &config::Settings, config_path: &Path, state_dir: &Path) -> Result<()> {
    println!("Config file:  {}", config_path.display());
    println!("State dir:    {}", state_dir.display());
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Watch Mode
// ─────────────────────────────────────────────────────────────────────────────

/// Follow `file` until the watcher shuts down.
fn run_watch(
    app: &mut App,
    file: &Path,
    preview_path: &Path,
    open: bool,
    printed: &mut u64,
) -> Result<()> {
    let watcher = SourceWatcher::new(file)?;
    if !app.load_file(watcher.path()) {
        print_notifications(app, printed);
        return Err(Error::Watch(format!(
            "Cannot read {}",
            watcher.path().display()
        )));
    }

    eprintln!(
        "Watching {} - preview at {} (Ctrl+C to stop)",
        watcher.path().display(),
        preview_path.display()
    );
    if open {
        if let Err(e) = open::that(preview_path) {
            eprintln!("❌ Failed to open preview: {}", e);
        }
    }
    print_notifications(app, printed);

    loop {
        let now = Instant::now();
        let timeout = app.time_until_due(now).unwrap_or(IDLE_WAIT);

        let first = match watcher.wait(timeout) {
            WaitResult::Event(event) => event,
            WaitResult::Timeout => {
                if app.tick(Instant::now()) {
                    debug!("Preview refreshed (render #{})", app.render_count());
                }
                print_notifications(app, printed);
                app.clear_log();
                continue;
            }
            WaitResult::Disconnected => break,
        };

        // Editors often save in several steps; handle the whole burst at once
        let mut changed = false;
        for event in std::iter::once(first).chain(watcher.poll_events()) {
            match event {
                SourceEvent::Changed => changed = true,
                SourceEvent::Removed => {
                    eprintln!("⚠️ {} was removed; waiting for it to return", file.display());
                }
                SourceEvent::Error(message) => eprintln!("❌ Watcher error: {}", message),
            }
        }

        if changed {
            app.reload_source(watcher.path(), Instant::now());
        }

        app.tick(Instant::now());
        print_notifications(app, printed);
    }

    app.flush();
    Ok(())
}
