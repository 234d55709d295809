//! Output formatting utilities for the CLI tools.

use console::style;

const BANNER_WIDTH: usize = 64;

/// Prints the boxed tool title.
pub fn print_banner(title: &str) {
    println!();
    println!("╔{}╗", "═".repeat(BANNER_WIDTH));
    println!("║  {:<width$}║", title, width = BANNER_WIDTH - 2);
    println!("╚{}╝", "═".repeat(BANNER_WIDTH));
    println!();
}

/// Prints a key-value pair with consistent formatting.
pub fn print_key_value(key: &str, value: &str) {
    println!("   {:<12}{}", format!("{}:", key), value);
}

/// Prints a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", style(title).bold());
}

/// Prints a horizontal rule.
pub fn print_rule() {
    println!("{}", "─".repeat(60));
}

/// Prints a step that is about to run.
pub fn print_step(message: &str) {
    println!("{} {}", style("→").cyan(), message);
}

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Prints an info message.
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", style("⚠").yellow(), message);
}

/// Prints an error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", style("✗").red(), message);
}
