//! Leveled terminal output for glucoscope.
//!
//! Runtime messages go to stderr with a short colored tag so that stdout
//! stays clean for dashboard sections and JSON.
//!
//! - `info()`, `warn()`, `error()`, `success()`, `verbose()` for leveled lines
//! - `event()` for timestamped lines
//! - `banner()` and `rule()` for section framing
//! - `init_tracing()` to route library `tracing` events to stderr

use chrono::Local;
use colored::*;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

pub const DEFAULT_WIDTH: usize = 80;

static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Severity of a message written by herald
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
  Info,
  Warn,
  Error,
  Success,
  Verbose,
}

impl Level {
  pub fn tag(self) -> &'static str {
    match self {
      Level::Info => "info",
      Level::Warn => "warn",
      Level::Error => "error",
      Level::Success => "sccs",
      Level::Verbose => "verb",
    }
  }

  fn color(self) -> Color {
    match self {
      Level::Info => Color::Blue,
      Level::Warn => Color::Yellow,
      Level::Error => Color::Red,
      Level::Success => Color::Green,
      Level::Verbose => Color::Cyan,
    }
  }
}

/// Enable or disable ANSI colors for everything printed through `colored`
pub fn set_color(enabled: bool) {
  if enabled {
    colored::control::unset_override();
  } else {
    colored::control::set_override(false);
  }
}

/// Verbose lines are dropped unless this is switched on
pub fn set_verbose(enabled: bool) {
  VERBOSE.store(enabled, Ordering::Relaxed);
}

fn is_verbose() -> bool {
  VERBOSE.load(Ordering::Relaxed)
}

/// Tag column padded so that message text lines up across levels
pub fn prefix(level: Level) -> String {
  let tag = level.tag();
  format!("[{}]{:<width$}", tag.color(level.color()).bold(), "", width = 6 - tag.len())
}

/// One output line per input line, each carrying the level prefix
pub fn format_lines(level: Level, message: &str) -> Vec<String> {
  let prefix = prefix(level);
  message.lines().map(|line| format!("{prefix}{line}")).collect()
}

pub fn emit(level: Level, message: &str) {
  if level == Level::Verbose && !is_verbose() {
    return;
  }
  for line in format_lines(level, message) {
    eprintln!("{line}");
  }
}

pub fn info(message: &str) {
  emit(Level::Info, message);
}

pub fn warn(message: &str) {
  emit(Level::Warn, message);
}

pub fn error(message: &str) {
  emit(Level::Error, message);
}

pub fn success(message: &str) {
  emit(Level::Success, message);
}

pub fn verbose(message: &str) {
  emit(Level::Verbose, message);
}

/// Timestamped line, used for start/finish markers
pub fn event(level: Level, message: &str) {
  let timestamp = Local::now().format("%H:%M:%S").to_string();
  let prefix = format!("[{}] [{}]", "event".color(level.color()).bold(), timestamp.cyan());
  for line in message.lines() {
    eprintln!("{prefix} {line}");
  }
}

pub fn rule(width: usize, ch: char) -> String {
  ch.to_string().repeat(width)
}

/// Title framed by rules above and below
pub fn banner(title: &str, width: usize, ch: char) -> Vec<String> {
  let line = rule(width, ch);
  vec![line.clone(), title.to_string(), line]
}

/// Width of the attached terminal, falling back to `DEFAULT_WIDTH` when piped
pub fn terminal_width() -> usize {
  let term = console::Term::stdout();
  if !term.is_term() {
    return DEFAULT_WIDTH;
  }
  let (_, cols) = term.size();
  (cols as usize).clamp(40, 120)
}

/// Printable width of a string that may contain ANSI escapes
pub fn display_width(text: &str) -> usize {
  console::measure_text_width(text)
}

/// Right-pad a possibly colored string to `width` visible columns
pub fn pad_visible(text: &str, width: usize) -> String {
  let visible = display_width(text);
  if visible >= width {
    text.to_string()
  } else {
    format!("{text}{}", " ".repeat(width - visible))
  }
}

/// Filter directives for the tracing subscriber
pub fn filter_directives(crate_name: &str, verbose: bool) -> String {
  if verbose {
    format!("{crate_name}=debug,warn")
  } else {
    "warn".to_string()
  }
}

/// Install a stderr `tracing` subscriber. `RUST_LOG` wins over the defaults;
/// `color` switches ANSI styling of the event lines.
pub fn init_tracing(crate_name: &str, verbose: bool, color: bool) {
  set_verbose(verbose);
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(filter_directives(crate_name, verbose)));

  // A second init (tests, embedding) is harmless; keep the first subscriber.
  let _ = tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr).with_target(false).with_ansi(color))
    .with(filter)
    .try_init();
}

#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => {
    $crate::info(&format!($($arg)*))
  };
}

#[macro_export]
macro_rules! warn {
  ($($arg:tt)*) => {
    $crate::warn(&format!($($arg)*))
  };
}

#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => {
    $crate::error(&format!($($arg)*))
  };
}

#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => {
    $crate::success(&format!($($arg)*))
  };
}

#[macro_export]
macro_rules! verbose {
  ($($arg:tt)*) => {
    $crate::verbose(&format!($($arg)*))
  };
}
