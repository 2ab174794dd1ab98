use colored::{ColoredString, Colorize};
use std::fmt::Display;

/// Width key labels are padded to in [`kv`]
const KEY_WIDTH: usize = 20;

fn line(marker: ColoredString, msg: impl Display) -> String {
    format!("{marker} {msg}")
}

pub fn info(msg: impl Display) {
    println!("{}", line("ℹ".blue(), msg));
}

pub fn success(msg: impl Display) {
    println!("{}", line("✓".green(), msg));
}

pub fn warn(msg: impl Display) {
    println!("{}", line("⚠".yellow(), msg));
}

/// Print an error message to stderr
pub fn error(msg: impl Display) {
    eprintln!("{}", line("✗".red().bold(), msg));
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print an aligned key-value pair
pub fn kv(key: &str, value: impl Display) {
    println!("  {} {value}", format!("{key:<KEY_WIDTH$}").dimmed());
}

/// Render a flag as yes/no
pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
