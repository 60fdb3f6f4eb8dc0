//! Terminal output: human-readable lines on stdout, hints on stderr.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

/// Width of the label column in [`field`] lines.
const LABEL_WIDTH: usize = 14;

/// Headline for a completed action.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg.bold());
}

/// Dimmed hint on stderr, kept out of piped output.
pub fn note(msg: &str) {
    eprintln!("{}", msg.dimmed());
}

/// `label  value` line with the labels aligned.
pub fn field(label: &str, value: &str) {
    let label = format!("{label:<width$}", width = LABEL_WIDTH);
    println!("{} {}", label.cyan(), value);
}

/// Single JSON document, indented for reading.
pub fn json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Entity lists: one compact document per line so the output can be piped
/// into line-oriented tools, or indented documents with `pretty`.
pub fn json_lines<T: Serialize>(values: &[T], pretty: bool) -> Result<()> {
    if values.is_empty() {
        note("No results.");
        return Ok(());
    }

    let render: fn(&T) -> serde_json::Result<String> = if pretty {
        serde_json::to_string_pretty::<T>
    } else {
        serde_json::to_string::<T>
    };
    for value in values {
        println!("{}", render(value)?);
    }
    Ok(())
}
