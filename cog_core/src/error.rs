use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum CogError {
	#[error(transparent)]
	#[diagnostic(code(cog::io_error))]
	Io(#[from] std::io::Error),

	#[error("malformed generator block in `{file}` starting at line {line}: {reason}")]
	#[diagnostic(
		code(cog::malformed_block),
		help(
			"every `[[[gocog` needs a matching `gocog]]]`, followed by an `[[[end]]]` line (or pass \
			 `--eof` to treat end of file as the end marker)"
		)
	)]
	MalformedBlock {
		file: String,
		line: usize,
		reason: String,
	},

	#[error("generator command `{command}` failed: {reason}")]
	#[diagnostic(code(cog::external_process))]
	ExternalProcess { command: String, reason: String },

	#[error("refusing to overwrite existing file `{path}`")]
	#[diagnostic(
		code(cog::filesystem_conflict),
		help(
			"another cog run may be processing the same file, or a previous run was interrupted; \
			 remove the leftover file once no other run is active"
		)
	)]
	FilesystemConflict { path: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(cog::config_parse),
		help("check that cog.toml is valid TOML using the documented keys")
	)]
	ConfigParse(String),

	#[error("invalid configuration: {0}")]
	#[diagnostic(code(cog::invalid_config))]
	InvalidConfig(String),

	#[error("failed to read file list `{path}`: {reason}")]
	#[diagnostic(
		code(cog::file_list),
		help("file lists contain one path per line and are passed as `@path`")
	)]
	FileList { path: String, reason: String },
}

impl CogError {
	/// Map an I/O error raised while exclusively creating `path` into a
	/// [`CogError::FilesystemConflict`] when the file already exists.
	pub(crate) fn from_create(error: std::io::Error, path: &std::path::Path) -> Self {
		if error.kind() == std::io::ErrorKind::AlreadyExists {
			Self::FilesystemConflict {
				path: path.display().to_string(),
			}
		} else {
			Self::Io(error)
		}
	}
}

pub type CogResult<T> = Result<T, CogError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
