use std::fs::File;
use std::fs::OpenOptions;
use std::io;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use crate::CogError;
use crate::CogResult;
use crate::diagnostics::Diagnostics;

/// Suffix appended to the original path to name the rewritten output file.
pub const OUTPUT_SUFFIX: &str = "_cog";

/// What to do with a fully rewritten file.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum CommitMode {
	/// Replace the original file with the rewritten output.
	Replace,
	/// Compare the rewritten output with the original and leave both
	/// untouched.
	Check,
}

/// Result of [`PendingOutput::commit`].
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum CommitOutcome {
	/// The original was replaced and its content changed.
	Replaced,
	/// The original content already matched the rewritten output.
	Unchanged,
	/// Check mode only: the original differs from `expected`.
	Stale { expected: Vec<u8> },
}

/// Path of the rewritten output file for `file`: `<file>_cog`.
pub fn output_path(file: &Path) -> PathBuf {
	let mut name = file.as_os_str().to_os_string();
	name.push(OUTPUT_SUFFIX);
	PathBuf::from(name)
}

/// The temporary file a rewrite is written into. Write to it through its
/// [`Write`] implementation.
///
/// It only becomes the original file through [`commit`](Self::commit). If it
/// is dropped or [`discard`](Self::discard)ed the file is removed.
pub struct PendingOutput<'a> {
	path: PathBuf,
	writer: Option<BufWriter<File>>,
	diagnostics: &'a dyn Diagnostics,
}

impl<'a> PendingOutput<'a> {
	/// Create the output file exclusively.
	///
	/// An existing file at `path` is never overwritten; it yields
	/// [`CogError::FilesystemConflict`].
	pub fn create(path: impl Into<PathBuf>, diagnostics: &'a dyn Diagnostics) -> CogResult<Self> {
		let path = path.into();
		let file = OpenOptions::new()
			.write(true)
			.create_new(true)
			.open(&path)
			.map_err(|e| CogError::from_create(e, &path))?;
		diagnostics.detail(&format!("writing output to `{}`", path.display()));

		Ok(Self {
			path,
			writer: Some(BufWriter::new(file)),
			diagnostics,
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn open_writer(&mut self) -> io::Result<&mut BufWriter<File>> {
		self.writer
			.as_mut()
			.ok_or_else(|| io::Error::other("the output file is already closed"))
	}

	/// Finish the rewrite against `original`.
	///
	/// In [`CommitMode::Replace`] the output is flushed to disk, given the
	/// original's permissions and renamed over it in one step. In
	/// [`CommitMode::Check`] the output is compared with the original and
	/// removed.
	pub fn commit(mut self, original: &Path, mode: CommitMode) -> CogResult<CommitOutcome> {
		let result = self.finish(original, mode);
		if result.is_err() {
			self.remove();
		}
		result
	}

	fn finish(&mut self, original: &Path, mode: CommitMode) -> CogResult<CommitOutcome> {
		if let Some(writer) = self.writer.take() {
			let file = writer.into_inner().map_err(|e| e.into_error())?;
			file.sync_all()?;
		}

		let expected = std::fs::read(&self.path)?;
		let current = std::fs::read(original)?;
		let changed = expected != current;

		match mode {
			CommitMode::Check => {
				self.remove();
				if changed {
					Ok(CommitOutcome::Stale { expected })
				} else {
					Ok(CommitOutcome::Unchanged)
				}
			}
			CommitMode::Replace => {
				let permissions = std::fs::metadata(original)?.permissions();
				std::fs::set_permissions(&self.path, permissions)?;

				self.diagnostics.detail(&format!(
					"renaming `{}` to `{}`",
					self.path.display(),
					original.display()
				));
				std::fs::rename(&self.path, original)?;
				// The output file is now the original; nothing is left to clean up.
				self.path = PathBuf::new();

				if changed {
					Ok(CommitOutcome::Replaced)
				} else {
					Ok(CommitOutcome::Unchanged)
				}
			}
		}
	}

	/// Remove the output file, leaving the original untouched.
	pub fn discard(mut self) {
		self.remove();
	}

	fn remove(&mut self) {
		// Close the handle before removing; some platforms refuse to delete
		// open files.
		drop(self.writer.take());

		if self.path.as_os_str().is_empty() {
			return;
		}

		if let Err(e) = std::fs::remove_file(&self.path) {
			if e.kind() != std::io::ErrorKind::NotFound {
				self.diagnostics.warn(&format!(
					"failed to remove temporary output file `{}`: {e}",
					self.path.display()
				));
			}
		}
		self.path = PathBuf::new();
	}
}

impl Write for PendingOutput<'_> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.open_writer()?.write(buf)
	}

	fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
		self.open_writer()?.write_all(buf)
	}

	fn flush(&mut self) -> io::Result<()> {
		self.open_writer()?.flush()
	}
}

impl Drop for PendingOutput<'_> {
	fn drop(&mut self) {
		self.remove();
	}
}
