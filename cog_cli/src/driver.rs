use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use cog_core::CogConfig;
use cog_core::CogError;
use cog_core::CogResult;
use cog_core::RunOutcome;
use cog_core::TracingDiagnostics;
use cog_core::process_file;
use tokio::task::JoinSet;

/// The result of processing one input file.
#[derive(Debug)]
pub struct FileReport {
	pub file: PathBuf,
	pub result: CogResult<RunOutcome>,
}

impl FileReport {
	pub fn is_failure(&self) -> bool {
		self.result.is_err()
	}

	pub fn is_stale(&self) -> bool {
		matches!(self.result, Ok(RunOutcome::Stale { .. }))
	}
}

/// Process every file and return one report per file, in input order.
///
/// With [`CogConfig::serial`] the files are processed one after another.
/// Otherwise every file runs on the blocking pool of a multi-thread runtime
/// and this returns once all of them have finished. A failure in one file
/// never stops the others.
pub fn run_files(files: Vec<PathBuf>, config: CogConfig) -> CogResult<Vec<FileReport>> {
	if config.serial || files.len() <= 1 {
		return Ok(run_serial(files, &config));
	}

	let runtime = tokio::runtime::Builder::new_multi_thread()
		.enable_all()
		.build()?;

	Ok(runtime.block_on(run_parallel(files, Arc::new(config))))
}

fn run_serial(files: Vec<PathBuf>, config: &CogConfig) -> Vec<FileReport> {
	files
		.into_iter()
		.map(|file| {
			let result = process_guarded(&file, config);
			FileReport { file, result }
		})
		.collect()
}

async fn run_parallel(files: Vec<PathBuf>, config: Arc<CogConfig>) -> Vec<FileReport> {
	let mut tasks = JoinSet::new();

	for (index, file) in files.iter().cloned().enumerate() {
		let config = Arc::clone(&config);
		tasks.spawn_blocking(move || (index, process_guarded(&file, &config)));
	}

	let mut results: Vec<Option<CogResult<RunOutcome>>> = files.iter().map(|_| None).collect();

	while let Some(joined) = tasks.join_next().await {
		match joined {
			Ok((index, result)) => results[index] = Some(result),
			Err(e) => tracing::error!("file task failed to complete: {e}"),
		}
	}

	files
		.into_iter()
		.zip(results)
		.map(|(file, result)| {
			let result = result.unwrap_or_else(|| {
				Err(CogError::Io(std::io::Error::other(
					"processing did not complete",
				)))
			});
			FileReport { file, result }
		})
		.collect()
}

/// Run one file, turning a panic into an error for that file alone.
fn process_guarded(file: &Path, config: &CogConfig) -> CogResult<RunOutcome> {
	let diagnostics = TracingDiagnostics::new(file, config.verbosity);

	std::panic::catch_unwind(AssertUnwindSafe(|| process_file(file, config, &diagnostics)))
		.unwrap_or_else(|payload| {
			Err(CogError::Io(std::io::Error::other(format!(
				"processing panicked: {}",
				panic_message(payload.as_ref())
			))))
		})
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
	if let Some(message) = payload.downcast_ref::<&str>() {
		message
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message
	} else {
		"unknown panic"
	}
}
