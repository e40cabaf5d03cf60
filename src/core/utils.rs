//! Utilities module - Terminal output helpers

use colored::*;

/// Print a step message
pub fn print_step(message: &str) {
    println!("   {} {}", "→".bright_blue(), message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("   {} {}", "✓".bright_green(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("   {} {}", "⚠".bright_yellow(), message);
}

/// Print an aligned `label: value` line
pub fn print_field(label: &str, value: &str) {
    println!("   {:<14} {}", format!("{label}:"), value.bright_green());
}
