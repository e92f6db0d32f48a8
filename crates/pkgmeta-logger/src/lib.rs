//! User-facing logging for pkgmeta
//!
//! Messages go to stderr according to the verbosity chosen on the command line
//! and are always appended to a per-run log file. Subprocess output from the
//! build fallback is written to the log file only.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::sync::Mutex;
use std::time::Duration;

/// Overrides the directory the log file is written to
pub const LOG_DIR_ENV: &str = "PKGMETA_LOG_DIR";
const LOG_FILE_NAME: &str = "pkgmeta.log";

struct LoggerState {
    verbosity: u8,
    quiet: bool,
    log_file: Option<PathBuf>,
}

static STATE: Mutex<LoggerState> = Mutex::new(LoggerState {
    verbosity: 0,
    quiet: false,
    log_file: None,
});
static SPINNER: Mutex<Option<ProgressBar>> = Mutex::new(None);

/// 0 = warnings only, 1 = debug (-v), 2 = trace (-vv)
pub fn verbosity() -> u8 {
    STATE.lock().map(|state| state.verbosity).unwrap_or(0)
}

pub fn is_quiet() -> bool {
    STATE.lock().map(|state| state.quiet).unwrap_or(false)
}

/// Initialize console verbosity and the log file in the default log directory
pub fn init(verbosity: u8, quiet: bool) -> Result<(), String> {
    let dir = log_dir()?;
    init_in(&dir, verbosity, quiet)
}

/// Initialize console verbosity and the log file inside `dir`.
///
/// The log file is truncated so it only ever holds the current run.
pub fn init_in(dir: &Path, verbosity: u8, quiet: bool) -> Result<(), String> {
    fs::create_dir_all(dir).map_err(|e| format!("Failed to create log directory: {}", e))?;

    let log_file = dir.join(LOG_FILE_NAME);
    if log_file.exists() {
        fs::remove_file(&log_file)
            .map_err(|e| format!("Failed to truncate {}: {}", log_file.display(), e))?;
    }

    let mut state = STATE
        .lock()
        .map_err(|_| "Logger state is poisoned".to_string())?;
    state.verbosity = verbosity;
    state.quiet = quiet;
    state.log_file = Some(log_file);
    Ok(())
}

/// `$PKGMETA_LOG_DIR`, else the per-user pkgmeta config directory
fn log_dir() -> Result<PathBuf, String> {
    if let Some(dir) = std::env::var_os(LOG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }

    #[cfg(not(target_os = "windows"))]
    let dir = dirs::home_dir()
        .ok_or("Could not determine home directory")?
        .join(".config")
        .join("pkgmeta");

    #[cfg(target_os = "windows")]
    let dir = dirs::config_dir()
        .ok_or("Could not determine config directory")?
        .join("pkgmeta");

    Ok(dir)
}

/// Path of the current run's log file, once initialized
pub fn log_path() -> Option<PathBuf> {
    STATE.lock().ok().and_then(|state| state.log_file.clone())
}

fn write_to_log(level: &str, message: &str) {
    let Some(path) = log_path() else {
        return;
    };
    if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let _ = writeln!(file, "[{}] {} {}", timestamp, level, message);
    }
}

pub fn info(message: &str) {
    write_to_log("INFO", message);
    if verbosity() >= 1 && !is_quiet() {
        eprintln!("{}", message);
    }
}

pub fn debug(message: &str) {
    write_to_log("DEBUG", message);
    if verbosity() >= 1 {
        eprintln!("{} {}", "DEBUG:".blue().bold(), message);
    }
}

/// Trace-level detail, shown on the console from `-vv`
pub fn step(message: &str) {
    write_to_log("STEP", message);
    if verbosity() >= 2 {
        eprintln!("{} {}", "TRACE:".dimmed(), message);
    }
}

pub fn warn(message: &str) {
    write_to_log("WARN", message);
    eprintln!("{} {}", "warning:".yellow().bold(), message);
}

pub fn error(message: &str) {
    write_to_log("ERROR", message);
    eprintln!("{} {}", "error:".red().bold(), message);
}

pub fn success(message: &str) {
    write_to_log("SUCCESS", message);
    if !is_quiet() {
        eprintln!("{} {}", "\u{2714}".green().bold(), message);
    }
}

/// Record a finished subprocess and everything it printed
pub fn capture_output(command: &str, output: &Output) {
    write_to_log(
        "COMMAND",
        &format!("{} (exit code: {:?})", command, output.status.code()),
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.trim().is_empty() {
        write_to_log("STDOUT", &format!("\n{}", stdout.trim_end()));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        write_to_log("STDERR", &format!("\n{}", stderr.trim_end()));
    }
}

/// Show a spinner until one of the `spinner_*` finishers is called.
///
/// Suppressed in verbose mode, where it would interleave with debug output,
/// and in quiet mode.
pub fn spinner_start(message: &str) {
    write_to_log("STEP", message);
    if verbosity() > 0 || is_quiet() {
        return;
    }

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.cyan} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(message.to_string());

    if let Ok(mut guard) = SPINNER.lock() {
        *guard = Some(spinner);
    }
}

pub fn spinner_success(message: &str) {
    spinner_stop();
    success(message);
}

pub fn spinner_error(message: &str) {
    spinner_stop();
    write_to_log("ERROR", message);
    eprintln!("  {} {}", "\u{2717}".red().bold(), message);
}

pub fn spinner_stop() {
    if let Ok(mut guard) = SPINNER.lock() {
        if let Some(spinner) = guard.take() {
            spinner.finish_and_clear();
        }
    }
}
