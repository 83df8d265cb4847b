use colored::Colorize;
use declarative::{Diagnostic, Diagnostics, Severity};

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a dim/muted message
pub fn dim(msg: &str) {
    println!("  {}", msg.dimmed());
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Where a diagnostic points, e.g. "welcome.html"
fn location(diagnostic: &Diagnostic) -> Option<String> {
    match (&diagnostic.address, &diagnostic.attribute) {
        (Some(address), Some(attribute)) => Some(format!("{address}.{attribute}")),
        (Some(address), None) => Some(address.clone()),
        (None, Some(attribute)) => Some(attribute.clone()),
        (None, None) => None,
    }
}

/// Render a single diagnostic as plain text (no colors)
pub fn format_diagnostic(diagnostic: &Diagnostic) -> String {
    let mut out = format!("{}: {}", diagnostic.severity, diagnostic.summary);
    if let Some(location) = location(diagnostic) {
        out.push_str(&format!("\n  with {location}"));
    }
    for line in diagnostic.detail.lines() {
        out.push_str("\n  ");
        out.push_str(line);
    }
    out
}

/// Print every diagnostic; errors go to stderr
pub fn diagnostics(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics {
        let text = format_diagnostic(diagnostic);
        let (first, rest) = text.split_once('\n').unwrap_or((&text, ""));
        match diagnostic.severity {
            Severity::Error => {
                eprintln!();
                eprintln!("{} {}", "✗".red(), first.red().bold());
                if !rest.is_empty() {
                    eprintln!("{rest}");
                }
            }
            Severity::Warning => {
                println!();
                println!("{} {}", "⚠".yellow(), first.yellow().bold());
                if !rest.is_empty() {
                    println!("{rest}");
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
