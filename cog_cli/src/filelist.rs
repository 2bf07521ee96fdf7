use std::path::Path;
use std::path::PathBuf;

use cog_core::CogError;
use cog_core::CogResult;

/// Prefix marking a command line argument as a file list.
pub const FILELIST_PREFIX: char = '@';

/// Expand the command line inputs into the files to process.
///
/// Plain arguments are kept as they are. An argument `@PATH` is replaced by
/// the lines of `PATH`, trimmed, with blank lines skipped. File lists are not
/// expanded recursively.
pub fn expand_inputs(inputs: &[String]) -> CogResult<Vec<PathBuf>> {
	let mut files = Vec::with_capacity(inputs.len());

	for input in inputs {
		match input.strip_prefix(FILELIST_PREFIX) {
			Some(list) => files.extend(read_filelist(Path::new(list))?),
			None => files.push(PathBuf::from(input)),
		}
	}

	Ok(files)
}

/// Read the paths listed in `path`, one per line.
pub fn read_filelist(path: &Path) -> CogResult<Vec<PathBuf>> {
	let content = std::fs::read_to_string(path).map_err(|e| {
		CogError::FileList {
			path: path.display().to_string(),
			reason: e.to_string(),
		}
	})?;

	Ok(parse_filelist(&content))
}

pub fn parse_filelist(content: &str) -> Vec<PathBuf> {
	content
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.map(PathBuf::from)
		.collect()
}
