//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::Colorize;

use crate::walker::Phase;

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print plain output (no color)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Print one node: dimmed index path, then the node label
pub fn node(path: &str, label: &(impl std::fmt::Display + ?Sized)) {
    println!("{:>12}  {}", path.dimmed(), label);
}

/// Print one walk step with its phase tag
pub fn step(path: &str, phase: Phase, label: &(impl std::fmt::Display + ?Sized)) {
    let tag = match phase {
        Phase::Descendant => "descendant".green(),
        Phase::Ancestor => "ancestor".yellow(),
        Phase::Other => "other".normal(),
        Phase::Initial => "initial".blue(),
    };
    println!("{:>12}  {:<10}  {}", path.dimmed(), tag, label);
}

/// Print "nothing found" note (dimmed) to stderr
pub fn none(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}", msg.to_string().dimmed());
}
