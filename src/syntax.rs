use lazy_static::lazy_static;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

lazy_static! {
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
    static ref THEME_SET: ThemeSet = ThemeSet::load_defaults();
}

/// Terminal-highlight a C declaration; falls back to the plain text.
pub fn highlight_c_code(code: &str) -> String {
    let syntax = SYNTAX_SET
        .find_syntax_by_extension("c")
        .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());
    let Some(theme) = THEME_SET.themes.get("base16-ocean.dark") else {
        return code.to_string();
    };
    let mut h = HighlightLines::new(syntax, theme);

    let mut highlighted = String::new();
    for line in LinesWithEndings::from(code) {
        match h.highlight_line(line, &SYNTAX_SET) {
            Ok(ranges) => {
                highlighted.push_str(&syntect::util::as_24_bit_terminal_escaped(&ranges, false))
            }
            Err(_) => return code.to_string(),
        }
    }
    highlighted.push_str("\x1b[0m");
    highlighted
}
