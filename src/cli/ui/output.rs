use console::style;

/// Human-facing status lines.
///
/// Everything goes to stderr so stdout stays clean for JSON output.
pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        eprintln!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        eprintln!("{} {}", style("ℹ").blue(), message);
    }

    pub fn section(&self, message: &str) {
        eprintln!("\n{}", style(message).bold());
        eprintln!("{}", "─".repeat(40));
    }

    /// `✓ name  detail` or `✗ name  detail`, name padded to `width`
    pub fn check(&self, ok: bool, name: &str, width: usize, detail: &str) {
        let mark = if ok {
            style("✓").green()
        } else {
            style("✗").red()
        };
        eprintln!(
            "  {} {:<width$}  {}",
            mark,
            name,
            style(detail).dim(),
            width = width
        );
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
