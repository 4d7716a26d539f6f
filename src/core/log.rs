//! Engine log.
//!
//! A small verbosity-filtered logger owned by each world. Entries are
//! captured in memory by default so simulations stay quiet; interactive
//! tools can switch to stdout.

use serde::{Deserialize, Serialize};

/// How much the engine reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Nothing is recorded.
    #[default]
    Silent = 0,
    /// Only defects (invariant violations).
    Minimal = 1,
    /// Card plays and deaths.
    Normal = 2,
    /// Every mutation and dispatched event.
    Verbose = 3,
}

/// Where accepted entries go.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputMode {
    Stdout,
    #[default]
    Memory,
    Both,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    /// Short tag such as "damage" or "event".
    pub category: &'static str,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
pub struct EngineLog {
    verbosity: VerbosityLevel,
    output_mode: OutputMode,
    entries: Vec<LogEntry>,
}

impl EngineLog {
    #[must_use]
    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    /// Would an entry at `level` be recorded?
    ///
    /// Check this before formatting expensive messages.
    #[must_use]
    pub fn enabled(&self, level: VerbosityLevel) -> bool {
        level != VerbosityLevel::Silent && level <= self.verbosity
    }

    pub fn log(&mut self, level: VerbosityLevel, category: &'static str, message: impl Into<String>) {
        if !self.enabled(level) {
            return;
        }
        let message = message.into();
        if matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both) {
            println!("[{category}] {message}");
        }
        if matches!(self.output_mode, OutputMode::Memory | OutputMode::Both) {
            self.entries.push(LogEntry {
                level,
                category,
                message,
            });
        }
    }

    pub fn minimal(&mut self, category: &'static str, message: impl Into<String>) {
        self.log(VerbosityLevel::Minimal, category, message);
    }

    pub fn normal(&mut self, category: &'static str, message: impl Into<String>) {
        self.log(VerbosityLevel::Normal, category, message);
    }

    pub fn verbose(&mut self, category: &'static str, message: impl Into<String>) {
        self.log(VerbosityLevel::Verbose, category, message);
    }

    #[must_use]
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
