use std::borrow::Cow;

use crate::scanner::find_marker;

/// The text before `marker` on `line` with leading whitespace removed.
///
/// For `"   // [[[gocog\n"` and the marker `"[[[gocog"` this is `"// "`, the
/// comment token that every following generator line is expected to carry.
/// Returns an empty slice when `marker` is not on the line.
pub fn extract_prefix<'a>(line: &'a [u8], marker: &str) -> &'a [u8] {
	match find_marker(line, marker.as_bytes()) {
		Some(offset) => line[..offset].trim_ascii_start(),
		None => &[],
	}
}

/// Remove `prefix` when it is the first non-whitespace text on `line`,
/// keeping the leading whitespace.
pub fn strip_prefix<'a>(line: &'a [u8], prefix: &[u8]) -> Cow<'a, [u8]> {
	if prefix.is_empty() {
		return Cow::Borrowed(line);
	}

	let indent = line.len() - line.trim_ascii_start().len();
	let Some(rest) = line[indent..].strip_prefix(prefix) else {
		return Cow::Borrowed(line);
	};

	let mut stripped = Vec::with_capacity(indent + rest.len());
	stripped.extend_from_slice(&line[..indent]);
	stripped.extend_from_slice(rest);
	Cow::Owned(stripped)
}
