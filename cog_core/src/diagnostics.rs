use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::config::Verbosity;

/// Severity of a message emitted while processing a file.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub enum Level {
	/// Step-by-step progress, shown only in verbose mode.
	Detail,
	/// Per-file results.
	Info,
	/// Problems worth surfacing even when the run succeeds.
	Warn,
}

/// Receives human-readable messages from one engine run.
///
/// Each file gets its own sink so concurrent runs never share state.
pub trait Diagnostics: Send + Sync {
	fn emit(&self, level: Level, message: &str);

	fn detail(&self, message: &str) {
		self.emit(Level::Detail, message);
	}

	fn info(&self, message: &str) {
		self.emit(Level::Info, message);
	}

	fn warn(&self, message: &str) {
		self.emit(Level::Warn, message);
	}
}

/// Forwards messages to `tracing`, tagged with the file being processed.
#[derive(Debug, Clone)]
pub struct TracingDiagnostics {
	file: PathBuf,
	verbosity: Verbosity,
}

impl TracingDiagnostics {
	pub fn new(file: impl Into<PathBuf>, verbosity: Verbosity) -> Self {
		Self {
			file: file.into(),
			verbosity,
		}
	}

	pub fn file(&self) -> &Path {
		&self.file
	}
}

impl Diagnostics for TracingDiagnostics {
	fn emit(&self, level: Level, message: &str) {
		let file = self.file.display();
		match (self.verbosity, level) {
			(Verbosity::Quiet, _) | (Verbosity::Normal, Level::Detail) => {}
			(Verbosity::Verbose, Level::Detail) => tracing::debug!(%file, "{message}"),
			(_, Level::Info) => tracing::info!(%file, "{message}"),
			(_, Level::Warn) => tracing::warn!(%file, "{message}"),
		}
	}
}

/// Collects messages in memory.
#[derive(Debug, Default)]
pub struct MemoryDiagnostics {
	messages: Mutex<Vec<(Level, String)>>,
}

impl MemoryDiagnostics {
	pub fn new() -> Self {
		Self::default()
	}

	/// All messages received so far, in emission order.
	pub fn messages(&self) -> Vec<(Level, String)> {
		self.messages
			.lock()
			.map(|messages| messages.clone())
			.unwrap_or_default()
	}

	/// Returns true if any message at `level` contains `needle`.
	pub fn contains(&self, level: Level, needle: &str) -> bool {
		self.messages()
			.iter()
			.any(|(l, message)| *l == level && message.contains(needle))
	}
}

impl Diagnostics for MemoryDiagnostics {
	fn emit(&self, level: Level, message: &str) {
		if let Ok(mut messages) = self.messages.lock() {
			messages.push((level, message.to_string()));
		}
	}
}
