use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::CogError;
use crate::CogResult;

/// Token substituted with the scratch generator file path in
/// [`CogConfig::command`] and every entry of [`CogConfig::args`].
pub const PLACEHOLDER: &str = "%s";

/// Literal joined to the configured delimiters to form the generator markers.
pub const GENERATOR_KEYWORD: &str = "gocog";

/// Literal joined to the configured delimiters to form the end-of-output
/// marker.
pub const END_KEYWORD: &str = "end";

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["cog.toml", ".cog.toml", ".config/cog.toml"];

/// How much the engine reports while it works.
#[derive(Debug, Clone, Copy, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Verbosity {
	/// Nothing is reported.
	Quiet,
	/// Per-file results and generator stderr.
	#[default]
	Normal,
	/// Everything, including each phase of the rewrite.
	Verbose,
}

/// Settings shared by every file processed in a run.
///
/// ```toml
/// start_mark = "[[["
/// end_mark = "]]]"
/// command = "python3"
/// args = ["%s"]
/// ext = ".py"
/// assume_end_at_eof = false
/// excise = false
/// serial = false
/// verbosity = "normal"
/// ```
///
/// With the default delimiters a generator block looks like:
///
/// ```text
/// // [[[gocog
/// // package main
/// // func main() { println("generated") }
/// // gocog]]]
/// generated
/// // [[[end]]]
/// ```
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
#[allow(clippy::struct_excessive_bools)]
pub struct CogConfig {
	/// String that opens cog statements.
	pub start_mark: String,
	/// String that closes cog statements.
	pub end_mark: String,
	/// The program used to run generator code. May contain [`PLACEHOLDER`].
	pub command: String,
	/// Arguments passed to [`command`](Self::command), each of which may
	/// contain [`PLACEHOLDER`].
	pub args: Vec<String>,
	/// Extension appended to the scratch generator file name.
	pub ext: String,
	/// When true, end of input may stand in for the end-of-output marker.
	pub assume_end_at_eof: bool,
	/// When true, previously generated output is removed and no generator
	/// is run.
	pub excise: bool,
	/// When true, files are processed one after another in input order.
	pub serial: bool,
	/// Compute each rewrite without replacing the file and report whether
	/// it is stale.
	pub check: bool,
	pub verbosity: Verbosity,
}

impl Default for CogConfig {
	fn default() -> Self {
		Self {
			start_mark: "[[[".to_string(),
			end_mark: "]]]".to_string(),
			command: "go".to_string(),
			args: vec!["run".to_string(), PLACEHOLDER.to_string()],
			ext: ".go".to_string(),
			assume_end_at_eof: false,
			excise: false,
			serial: false,
			check: false,
			verbosity: Verbosity::Normal,
		}
	}
}

impl CogConfig {
	/// Marker that opens a generator block, e.g. `[[[gocog`.
	pub fn start_marker(&self) -> String {
		format!("{}{GENERATOR_KEYWORD}", self.start_mark)
	}

	/// Marker that closes a generator block, e.g. `gocog]]]`.
	pub fn end_block_marker(&self) -> String {
		format!("{GENERATOR_KEYWORD}{}", self.end_mark)
	}

	/// Marker that closes a generated output section, e.g. `[[[end]]]`.
	pub fn end_output_marker(&self) -> String {
		format!("{}{END_KEYWORD}{}", self.start_mark, self.end_mark)
	}

	/// Reject settings that can never produce a successful run.
	pub fn validate(&self) -> CogResult<()> {
		if self.command.trim().is_empty() {
			return Err(CogError::InvalidConfig(
				"the generator command must not be empty".to_string(),
			));
		}

		Ok(())
	}

	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no candidate exists.
	pub fn load(root: &Path) -> CogResult<Option<CogConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		Self::load_file(&config_path).map(Some)
	}

	/// Load the config from an explicit path.
	pub fn load_file(path: &Path) -> CogResult<CogConfig> {
		let content = std::fs::read_to_string(path)?;
		toml::from_str(&content).map_err(|e| CogError::ConfigParse(e.to_string()))
	}
}
