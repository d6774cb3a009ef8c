//! Built-in theme presets.

use super::{FontFamily, PrintPalette, Rgb, ThemeDefinition};

pub(super) static GITHUB: ThemeDefinition = ThemeDefinition {
    name: "GitHub",
    css: r#"
body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
    line-height: 1.6;
    color: #24292e;
    background-color: #ffffff;
    padding: 2rem;
    max-width: 980px;
    margin: 0 auto;
}
h1, h2 { border-bottom: 1px solid #eaecef; padding-bottom: 0.3rem; }
h1 { font-size: 2rem; }
h2 { font-size: 1.5rem; }
h3 { font-size: 1.25rem; }
code { background-color: rgba(27,31,35,0.05); padding: 0.2rem 0.4rem; border-radius: 3px; font-family: 'Consolas', monospace; }
pre { background-color: #f6f8fa; padding: 1rem; border-radius: 6px; overflow-x: auto; }
pre code { background-color: transparent; padding: 0; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid #d1d5da; padding: 0.75rem; text-align: left; }
th { background-color: #f6f8fa; font-weight: 600; }
tr:nth-child(even) { background-color: #f6f8fa; }
blockquote { padding: 0 1rem; color: #586069; border-left: 4px solid #dfe2e5; margin: 1rem 0; }
a { color: #0366d6; text-decoration: none; }
a:hover { text-decoration: underline; }
"#,
    highlight_theme: "InspiredGitHub",
    print: PrintPalette {
        background: Rgb(0xff, 0xff, 0xff),
        text: Rgb(0x24, 0x29, 0x2e),
        heading: Rgb(0x24, 0x29, 0x2e),
        link: Rgb(0x03, 0x66, 0xd6),
        quote_text: Rgb(0x58, 0x60, 0x69),
        quote_border: Rgb(0xdf, 0xe2, 0xe5),
        code_background: Rgb(0xf6, 0xf8, 0xfa),
        rule: Rgb(0xea, 0xec, 0xef),
        table_border: Rgb(0xd1, 0xd5, 0xda),
        table_header_background: Rgb(0xf6, 0xf8, 0xfa),
        table_header_text: Rgb(0x24, 0x29, 0x2e),
        body_font: FontFamily::Sans,
    },
};

pub(super) static DARK: ThemeDefinition = ThemeDefinition {
    name: "Dark",
    css: r#"
body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
    line-height: 1.6;
    color: #c9d1d9;
    background-color: #0d1117;
    padding: 2rem;
    max-width: 980px;
    margin: 0 auto;
}
h1, h2 { border-bottom: 1px solid #21262d; padding-bottom: 0.3rem; color: #f0f6fc; }
h1 { font-size: 2rem; }
h2 { font-size: 1.5rem; }
h3 { font-size: 1.25rem; color: #f0f6fc; }
code { background-color: rgba(110,118,129,0.4); padding: 0.2rem 0.4rem; border-radius: 3px; font-family: 'Consolas', monospace; }
pre { background-color: #161b22; padding: 1rem; border-radius: 6px; overflow-x: auto; }
pre code { background-color: transparent; padding: 0; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid #30363d; padding: 0.75rem; text-align: left; }
th { background-color: #161b22; font-weight: 600; }
tr:nth-child(even) { background-color: #161b22; }
blockquote { padding: 0 1rem; color: #8b949e; border-left: 4px solid #30363d; margin: 1rem 0; }
a { color: #58a6ff; text-decoration: none; }
a:hover { text-decoration: underline; }
"#,
    highlight_theme: "base16-ocean.dark",
    print: PrintPalette {
        background: Rgb(0x0d, 0x11, 0x17),
        text: Rgb(0xc9, 0xd1, 0xd9),
        heading: Rgb(0xf0, 0xf6, 0xfc),
        link: Rgb(0x58, 0xa6, 0xff),
        quote_text: Rgb(0x8b, 0x94, 0x9e),
        quote_border: Rgb(0x30, 0x36, 0x3d),
        code_background: Rgb(0x16, 0x1b, 0x22),
        rule: Rgb(0x21, 0x26, 0x2d),
        table_border: Rgb(0x30, 0x36, 0x3d),
        table_header_background: Rgb(0x16, 0x1b, 0x22),
        table_header_text: Rgb(0xf0, 0xf6, 0xfc),
        body_font: FontFamily::Sans,
    },
};

pub(super) static MINIMAL: ThemeDefinition = ThemeDefinition {
    name: "Minimal",
    css: r#"
body {
    font-family: Georgia, serif;
    line-height: 1.8;
    color: #333;
    background-color: #fff;
    padding: 2rem;
    max-width: 800px;
    margin: 0 auto;
}
h1, h2, h3 { margin-top: 2rem; margin-bottom: 1rem; }
h1 { font-size: 2.5rem; }
h2 { font-size: 2rem; }
h3 { font-size: 1.5rem; }
code { font-family: 'Courier New', monospace; background-color: #f5f5f5; padding: 0.2rem 0.4rem; }
pre { background-color: #f5f5f5; padding: 1rem; overflow-x: auto; border-left: 3px solid #333; }
pre code { background-color: transparent; padding: 0; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid #ddd; padding: 0.75rem; text-align: left; }
th { background-color: #f5f5f5; font-weight: bold; }
blockquote { padding: 0 1rem; color: #666; border-left: 3px solid #ddd; margin: 1rem 0; font-style: italic; }
a { color: #333; text-decoration: underline; }
"#,
    highlight_theme: "base16-ocean.light",
    print: PrintPalette {
        background: Rgb(0xff, 0xff, 0xff),
        text: Rgb(0x33, 0x33, 0x33),
        heading: Rgb(0x33, 0x33, 0x33),
        link: Rgb(0x33, 0x33, 0x33),
        quote_text: Rgb(0x66, 0x66, 0x66),
        quote_border: Rgb(0xdd, 0xdd, 0xdd),
        code_background: Rgb(0xf5, 0xf5, 0xf5),
        rule: Rgb(0xdd, 0xdd, 0xdd),
        table_border: Rgb(0xdd, 0xdd, 0xdd),
        table_header_background: Rgb(0xf5, 0xf5, 0xf5),
        table_header_text: Rgb(0x33, 0x33, 0x33),
        body_font: FontFamily::Serif,
    },
};

pub(super) static PROFESSIONAL: ThemeDefinition = ThemeDefinition {
    name: "Professional",
    css: r#"
body {
    font-family: 'Calibri', Arial, Helvetica, sans-serif;
    line-height: 1.6;
    color: #212529;
    background-color: #fff;
    padding: 2rem;
    max-width: 980px;
    margin: 0 auto;
}
h1, h2 { padding-bottom: 0.3rem; }
h1 { font-size: 2.2rem; color: #0066cc; border-bottom: 3px solid #0066cc; }
h2 { font-size: 1.8rem; color: #495057; border-bottom: 2px solid #6c757d; }
h3 { font-size: 1.4rem; color: #495057; }
h4, h5 { font-size: 1.2rem; color: #495057; font-weight: 700; }
p { text-align: justify; margin-bottom: 1rem; }
code { font-family: 'Consolas', 'Courier New', monospace; background-color: #f1f3f5; border: 1px solid #dee2e6; padding: 0.2rem 0.5rem; border-radius: 3px; }
pre { background-color: #f8f9fa; padding: 1rem; border: 1px solid #dee2e6; border-radius: 4px; overflow-x: auto; }
pre code { background-color: transparent; padding: 0; border: 0; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; border: 1px solid #dee2e6; }
th, td { border: 1px solid #dee2e6; padding: 10px 15px; text-align: left; }
th { background-color: #0066cc; color: #fff; font-weight: 700; }
tr:nth-child(even) { background-color: #f8f9fa; }
blockquote { padding: 0.8rem 1.5rem; color: #495057; border-left: 5px solid #0066cc; margin: 1rem 0; background-color: #f1f3f5; font-style: italic; }
a { color: #0066cc; text-decoration: underline; }
a:hover { color: #004499; }
"#,
    highlight_theme: "InspiredGitHub",
    print: PrintPalette {
        background: Rgb(0xff, 0xff, 0xff),
        text: Rgb(0x21, 0x25, 0x29),
        heading: Rgb(0x00, 0x66, 0xcc),
        link: Rgb(0x00, 0x66, 0xcc),
        quote_text: Rgb(0x49, 0x50, 0x57),
        quote_border: Rgb(0x00, 0x66, 0xcc),
        code_background: Rgb(0xf8, 0xf9, 0xfa),
        rule: Rgb(0x6c, 0x75, 0x7d),
        table_border: Rgb(0xde, 0xe2, 0xe6),
        table_header_background: Rgb(0x00, 0x66, 0xcc),
        table_header_text: Rgb(0xff, 0xff, 0xff),
        body_font: FontFamily::Sans,
    },
};

pub(super) static PYTHON: ThemeDefinition = ThemeDefinition {
    name: "The Scribe",
    css: r#"
body {
    font-family: 'Palatino Linotype', Palatino, Georgia, serif;
    line-height: 1.7;
    color: #3b2f1e;
    background-color: #fdf6e3;
    padding: 2rem;
    max-width: 900px;
    margin: 0 auto;
}
h1, h2, h3 { color: #7a4b1c; font-variant: small-caps; }
h1 { font-size: 2.3rem; border-bottom: 2px double #b58900; padding-bottom: 0.3rem; }
h2 { font-size: 1.7rem; border-bottom: 1px solid #d9c9a3; padding-bottom: 0.2rem; }
h3 { font-size: 1.3rem; }
code { font-family: 'Fira Mono', 'Courier New', monospace; background-color: #f4ecd8; padding: 0.15rem 0.4rem; border-radius: 2px; }
pre { background-color: #f4ecd8; padding: 1rem; border: 1px solid #d9c9a3; border-radius: 4px; overflow-x: auto; }
pre code { background-color: transparent; padding: 0; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid #d9c9a3; padding: 0.6rem; text-align: left; }
th { background-color: #eee3c5; color: #7a4b1c; }
blockquote { padding: 0.5rem 1rem; color: #6b5a3e; border-left: 4px solid #b58900; margin: 1rem 0; font-style: italic; }
a { color: #268bd2; text-decoration: none; }
a:hover { text-decoration: underline; }
"#,
    highlight_theme: "Solarized (light)",
    print: PrintPalette {
        background: Rgb(0xfd, 0xf6, 0xe3),
        text: Rgb(0x3b, 0x2f, 0x1e),
        heading: Rgb(0x7a, 0x4b, 0x1c),
        link: Rgb(0x26, 0x8b, 0xd2),
        quote_text: Rgb(0x6b, 0x5a, 0x3e),
        quote_border: Rgb(0xb5, 0x89, 0x00),
        code_background: Rgb(0xf4, 0xec, 0xd8),
        rule: Rgb(0xd9, 0xc9, 0xa3),
        table_border: Rgb(0xd9, 0xc9, 0xa3),
        table_header_background: Rgb(0xee, 0xe3, 0xc5),
        table_header_text: Rgb(0x7a, 0x4b, 0x1c),
        body_font: FontFamily::Serif,
    },
};
