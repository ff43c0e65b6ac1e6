use colored::*;
use terminal_size::{Width, terminal_size};

use symdex::SymdexError;

/// How many rejected records to spell out before summarizing the rest
const MAX_LISTED: usize = 10;

/// Get the current terminal width, defaulting to 80 if unable to detect
fn get_terminal_width() -> usize {
    if let Some((Width(w), _)) = terminal_size() {
        w as usize
    } else {
        80
    }
}

fn separator(width: usize) -> String {
    "─".repeat(width.min(120))
}

/// Render a fatal error for stderr.
pub fn format_error(error: &SymdexError) -> String {
    let hint = match error {
        SymdexError::EmptyBatch => {
            Some("no usable records were found; check search_dir and file_pattern")
        }
        SymdexError::InvalidQuery(_) => Some("type at least one symbol character"),
        SymdexError::Io(_) => Some("run `symdex init` or pass --dir / --sample"),
        _ => None,
    };

    let mut out = format!("[{}] {}", error.code(), error);
    if let Some(hint) = hint {
        out.push_str(&format!("\n   {} {}", "hint:".bright_black(), hint.bright_black()));
    }
    out
}

/// Render the records a load or build had to skip.
pub fn format_record_errors(errors: &[SymdexError]) -> String {
    if errors.is_empty() {
        return String::new();
    }

    let sep_width = get_terminal_width().saturating_sub(2).max(40);
    let mut formatted = String::new();

    let skipped = errors.iter().filter(|e| e.is_per_record()).count();
    let mut heading = format!("{} record(s) skipped", skipped);
    if skipped < errors.len() {
        heading.push_str(&format!(", {} other problem(s)", errors.len() - skipped));
    }
    formatted.push_str(&format!("\n{} {}\n", "⚠️".yellow(), heading.yellow().bold()));
    formatted.push_str(&format!("{}\n", separator(sep_width).yellow()));

    for error in errors.iter().take(MAX_LISTED) {
        let line = match error {
            SymdexError::InvalidRecord {
                position,
                key,
                reason,
            } => format!(
                "  {} #{} {} {}",
                "•".blue(),
                position.to_string().yellow(),
                format!("{:?}", key).cyan(),
                reason.white()
            ),
            SymdexError::Parse {
                source_name,
                offset,
                message,
            } => format!(
                "  {} {}{} {}",
                "•".blue(),
                source_name.cyan(),
                format!(":{}", offset).bright_black(),
                message.white()
            ),
            other => format!("  {} {}", "•".blue(), other.to_string().white()),
        };
        formatted.push_str(&line);
        formatted.push('\n');
    }

    if errors.len() > MAX_LISTED {
        formatted.push_str(&format!(
            "  ... and {} more\n",
            errors.len() - MAX_LISTED
        ));
    }

    formatted
}
