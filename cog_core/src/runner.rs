use std::ffi::OsStr;
use std::ffi::OsString;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;

use crate::CogError;
use crate::CogResult;
use crate::config::CogConfig;
use crate::config::PLACEHOLDER;
use crate::diagnostics::Diagnostics;
use crate::prefix::strip_prefix;

/// Generator source for a single block, written to disk for the external
/// command to read. The file is removed when this value is dropped.
#[derive(Debug)]
pub struct ScratchFile {
	path: PathBuf,
}

impl ScratchFile {
	/// Create `path` exclusively and write `lines` to it with `prefix`
	/// stripped from each one.
	///
	/// Fails with [`CogError::FilesystemConflict`] if `path` already exists.
	pub fn create(path: &Path, lines: &[Vec<u8>], prefix: &[u8]) -> CogResult<Self> {
		let mut file = OpenOptions::new()
			.write(true)
			.create_new(true)
			.open(path)
			.map_err(|e| CogError::from_create(e, path))?;

		// From here on the guard owns the file, so a failed write still
		// cleans up.
		let scratch = Self {
			path: path.to_path_buf(),
		};

		for line in lines {
			file.write_all(&strip_prefix(line, prefix))?;
		}
		file.flush()?;

		Ok(scratch)
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl Drop for ScratchFile {
	fn drop(&mut self) {
		if let Err(e) = std::fs::remove_file(&self.path) {
			tracing::warn!(
				path = %self.path.display(),
				"failed to remove scratch generator file: {e}"
			);
		}
	}
}

/// Path of the scratch generator file for `file`: `<file>_cog_<ext>`.
pub fn scratch_path(file: &Path, ext: &str) -> PathBuf {
	let mut name = file.as_os_str().to_os_string();
	name.push("_cog_");
	name.push(ext);
	PathBuf::from(name)
}

/// Replace every [`PLACEHOLDER`] in `template` with `path`.
pub fn substitute(template: &str, path: &Path) -> OsString {
	let mut result = OsString::with_capacity(template.len());
	let mut pieces = template.split(PLACEHOLDER);

	if let Some(first) = pieces.next() {
		result.push(first);
	}
	for piece in pieces {
		result.push(path.as_os_str());
		result.push(piece);
	}

	result
}

/// An external command ready to run against one scratch generator file.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GeneratorCommand {
	program: OsString,
	args: Vec<OsString>,
}

impl GeneratorCommand {
	/// Build the command from the configured templates, substituting the
	/// scratch file path for every placeholder.
	pub fn from_config(config: &CogConfig, source: &Path) -> Self {
		Self {
			program: substitute(&config.command, source),
			args: config
				.args
				.iter()
				.map(|arg| substitute(arg, source))
				.collect(),
		}
	}

	pub fn program(&self) -> &OsStr {
		&self.program
	}

	pub fn args(&self) -> &[OsString] {
		&self.args
	}

	/// The command line for display purposes.
	pub fn display(&self) -> String {
		std::iter::once(&self.program)
			.chain(&self.args)
			.map(|part| part.to_string_lossy())
			.collect::<Vec<_>>()
			.join(" ")
	}

	/// Run the command, writing its stdout to `out`.
	///
	/// Stderr never reaches `out`; it is reported through `diagnostics`.
	/// Non-empty output that lacks a trailing newline gets one, so whatever
	/// is written next starts on its own line.
	pub fn run(&self, out: &mut dyn Write, diagnostics: &dyn Diagnostics) -> CogResult<()> {
		diagnostics.detail(&format!("running generator `{}`", self.display()));

		let output = Command::new(&self.program)
			.args(&self.args)
			.output()
			.map_err(|e| {
				CogError::ExternalProcess {
					command: self.display(),
					reason: e.to_string(),
				}
			})?;

		let stderr = String::from_utf8_lossy(&output.stderr);
		let stderr = stderr.trim();
		if !stderr.is_empty() {
			diagnostics.warn(stderr);
		}

		if !output.status.success() {
			let reason = if stderr.is_empty() {
				format!(
					"command exited with status {}",
					output
						.status
						.code()
						.map_or_else(|| "unknown".to_string(), |code| code.to_string())
				)
			} else {
				stderr.to_string()
			};

			return Err(CogError::ExternalProcess {
				command: self.display(),
				reason,
			});
		}

		out.write_all(&output.stdout)?;
		if output.stdout.last().is_some_and(|byte| *byte != b'\n') {
			out.write_all(b"\n")?;
		}

		diagnostics.detail(&format!(
			"generator wrote {} byte(s)",
			output.stdout.len()
		));

		Ok(())
	}
}
