//! Terminal styling for status output
//!
//! Everything here writes to stderr; stdout is reserved for the completion line.

use std::path::Path;
use std::time::Duration;

use console::{style, Emoji};

use crate::cli::AnalysisConfig;
use crate::report::format_duration;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "[!] ");
pub static BRAIN: Emoji<'_, '_> = Emoji("🧠 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static CLOCK: Emoji<'_, '_> = Emoji("⏱️  ", "");

const CARD_WIDTH: usize = 56;

/// Print the application banner
pub fn print_banner(version: &str) {
    eprintln!();
    eprintln!(
        "    {}{}",
        BRAIN,
        style("NEUROSTAT").cyan().bold()
    );
    eprintln!(
        "    {}",
        style("Hippocampal volume vs MMSE: correlation and regression").dim()
    );
    eprintln!("    {}", style(format!("v{}", version)).dim());
    eprintln!("    {}", style("━".repeat(50)).dim());
    eprintln!();
}

/// Print the configuration card
pub fn print_config(config: &AnalysisConfig) {
    let line = "─".repeat(CARD_WIDTH - 2);

    eprintln!("    ┌{}┐", line);
    eprintln!(
        "    │ {}{}│",
        style("⚙️  Configuration").cyan().bold(),
        " ".repeat(CARD_WIDTH - 20)
    );
    eprintln!("    ├{}┤", line);
    eprintln!(
        "    │  {} Input:   {:<38}│",
        FOLDER,
        truncate_path(&config.data_path, 37)
    );
    eprintln!(
        "    │  {} Tables:  {:<38}│",
        SAVE,
        truncate_path(&config.tables_dir, 37)
    );
    eprintln!(
        "    │  {} Figures: {:<38}│",
        SAVE,
        truncate_path(&config.figures_dir, 37)
    );
    eprintln!(
        "    │  {} JSON export: {:<34}│",
        INFO,
        style(if config.export_json { "on" } else { "off" }).yellow()
    );
    eprintln!("    └{}┘", line);
    eprintln!();
}

/// Print a step header
pub fn print_step_header(step_num: u8, title: &str) {
    eprintln!();
    eprintln!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    eprintln!("    {}", style("─".repeat(50)).dim());
}

pub fn print_success(message: &str) {
    eprintln!("    {} {}", style("✓").green().bold(), style(message).green());
}

pub fn print_info(message: &str) {
    eprintln!("    {} {}", INFO, message);
}

pub fn print_warning(message: &str) {
    eprintln!("    {} {}", WARN, style(message).yellow());
}

/// Print how long a step took
pub fn print_step_time(elapsed: Duration) {
    eprintln!(
        "    {} {}",
        CLOCK,
        style(format!("Completed in {}", format_duration(elapsed))).dim()
    );
}

/// Print a labelled count, e.g. "Found 3 cell(s) coerced to missing (mmse)"
pub fn print_count(description: &str, count: usize, detail: Option<&str>) {
    match detail {
        Some(info) => eprintln!(
            "      Found {} {} {}",
            style(count).yellow().bold(),
            description,
            style(info).dim()
        ),
        None => eprintln!("      Found {} {}", style(count).yellow().bold(), description),
    }
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    truncate_string(&path.display().to_string(), max_len)
}

/// Keep the tail of an overlong string, prefixed with `...`
pub fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let keep = max_len.saturating_sub(3);
        let tail: String = chars[chars.len() - keep..].iter().collect();
        format!("...{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("/a/very/long/path/file.csv", 12), ".../file.csv");
    }
}
