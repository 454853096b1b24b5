//! Terminal output formatting
//!
//! Column-aligned rendering shared by the commands.

use crossterm::style::Stylize;

/// Width of the name column in `modforge list`.
pub const NAME_WIDTH: usize = 16;
/// Width of the version column in `modforge list`.
pub const VERSION_WIDTH: usize = 10;
/// Width of labels in key/value blocks.
pub const LABEL_WIDTH: usize = 12;

/// Print column headers for `modforge list`
pub fn print_list_header() {
    println!();
    let header = format!(
        "  {:<nw$} {:<vw$} {}",
        "name",
        "version",
        "description",
        nw = NAME_WIDTH,
        vw = VERSION_WIDTH,
    );
    println!("{}", header.dark_grey());
}

/// Print a single row for `modforge list`
pub fn print_list_row(name: &str, version: &str, description: &str) {
    let name_part = format!("{name:<NAME_WIDTH$}");
    let version_part = format!("{version:<VERSION_WIDTH$}");
    println!(
        "  {} {} {}",
        name_part.cyan(),
        version_part.dark_grey(),
        description
    );
}

/// Print footer for `modforge list`
pub fn print_list_footer(count: usize) {
    println!();
    let msg = format!("  {count} formulas");
    println!("{}", msg.dark_grey());
}

/// A bold section title followed by its entries.
pub fn section(title: &str) {
    println!();
    println!("  {}", title.bold());
}

/// One `label  value` line.
pub fn field(label: &str, value: impl std::fmt::Display) {
    println!("  {label:<LABEL_WIDTH$}{value}");
}

/// Green check line.
pub fn success(msg: &str) {
    println!("{} {msg}", "✓".green());
}

/// Yellow warning line, on stderr.
pub fn warning(msg: &str) {
    eprintln!("{} {msg}", "!".yellow().bold());
}
