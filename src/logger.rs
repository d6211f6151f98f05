//! Logging utilities with colored output and status display.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro gated on `--verbose`
//! - `StatusLine` for the overwriting reload status block
//!
//! # Example
//!
//! ```ignore
//! log!("host"; "loading app module from {}", path.display());
//! debug!("watch"; "raw notify: {:?}", event.kind);
//! logger::status_success("reloaded (load #3)");
//! ```

use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use owo_colors::OwoColorize;
use parking_lot::Mutex;
use std::{
    io::{Write, stdout},
    sync::LazyLock,
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    {
        let mut stdout = stdout().lock();
        execute!(stdout, Clear(ClearType::UntilNewLine)).ok();
        writeln!(stdout, "{prefix} {message}").ok();
        stdout.flush().ok();
    }

    // Interleaved log lines invalidate the status block position
    STATUS.lock().forget();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "host" => prefix.bright_blue().bold().to_string(),
        "watch" => prefix.bright_green().bold().to_string(),
        "error" => prefix.bright_red().bold().to_string(),
        _ => prefix.bright_yellow().bold().to_string(),
    }
}

/// Current local time formatted as HH:MM:SS
pub fn now_hms() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}

// ============================================================================
// Status Line (single status block with overwrite)
// ============================================================================

/// Status block for reload results.
///
/// Each message overwrites the previous one so repeated reloads keep the
/// terminal clean. Any regular log line in between pins the previous block
/// in place instead of erasing it.
///
/// # Example
///
/// ```ignore
/// let mut status = StatusLine::new();
/// status.success("loaded (load #1)");
/// status.error("load failed", "entry symbol missing");
/// ```
pub struct StatusLine {
    /// Lines of previous output to clear
    last_lines: usize,
}

static STATUS: LazyLock<Mutex<StatusLine>> = LazyLock::new(|| Mutex::new(StatusLine::new()));

impl StatusLine {
    pub const fn new() -> Self {
        Self { last_lines: 0 }
    }

    /// Display success message (✓ prefix, green).
    pub fn success(&mut self, message: &str) {
        self.display(format!("{}", "✓".green()), message);
    }

    /// Display error message (✗ prefix, red) with optional detail.
    pub fn error(&mut self, summary: &str, detail: &str) {
        let message = if detail.is_empty() {
            summary.to_string()
        } else {
            format!("{summary}\n{detail}")
        };
        self.display(format!("{}", "✗".red()), &message);
    }

    /// Display warning message (⚠ prefix, yellow).
    pub fn warning(&mut self, detail: &str) {
        self.display(format!("{}", "⚠".yellow()), detail);
    }

    fn display(&mut self, symbol: String, message: &str) {
        let mut stdout = stdout().lock();

        if self.last_lines > 0 {
            #[allow(clippy::cast_possible_truncation)]
            let lines = self.last_lines as u16;
            execute!(stdout, cursor::MoveUp(lines)).ok();
            execute!(stdout, Clear(ClearType::FromCursorDown)).ok();
        }

        let timestamp = format!("[{}]", now_hms()).dimmed().to_string();
        writeln!(stdout, "{timestamp} {symbol} {message}").ok();
        stdout.flush().ok();

        self.last_lines = Self::line_count(message);
    }

    /// Stop tracking the previous block so the next message starts fresh.
    fn forget(&mut self) {
        self.last_lines = 0;
    }

    fn line_count(message: &str) -> usize {
        message.matches('\n').count() + 1
    }
}

/// Global status: success
pub fn status_success(message: &str) {
    STATUS.lock().success(message);
}

/// Global status: error
pub fn status_error(summary: &str, detail: &str) {
    STATUS.lock().error(summary, detail);
}

/// Global status: warning
pub fn status_warning(detail: &str) {
    STATUS.lock().warning(detail);
}

// ============================================================================
// Tests
// ============================================================================
