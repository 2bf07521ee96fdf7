use std::io;
use std::io::BufRead;

/// How a scan stopped.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Terminal {
	/// The stream can still be read.
	Ok,
	/// The stream is exhausted. The last line read (if any) had no `\n`.
	EndOfInput,
}

/// Lines consumed by a single [`LineScanner`] call.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ScanResult {
	/// Raw lines in stream order, each including its terminator when present.
	pub lines: Vec<Vec<u8>>,
	/// Whether the final line contains the marker that was searched for.
	pub found: bool,
	pub terminal: Terminal,
}

impl ScanResult {
	pub fn is_end_of_input(&self) -> bool {
		self.terminal == Terminal::EndOfInput
	}

	/// The last line consumed. When [`found`](Self::found) is true this is the
	/// marker line.
	pub fn last_line(&self) -> Option<&[u8]> {
		self.lines.last().map(Vec::as_slice)
	}
}

/// Returns true if `marker` occurs anywhere in `line`.
pub fn contains_marker(line: &[u8], marker: &[u8]) -> bool {
	if marker.is_empty() {
		return true;
	}
	find_marker(line, marker).is_some()
}

/// Byte offset of the first occurrence of `marker` in `line`.
pub fn find_marker(line: &[u8], marker: &[u8]) -> Option<usize> {
	if marker.is_empty() || marker.len() > line.len() {
		return None;
	}
	line.windows(marker.len())
		.position(|window| window == marker)
}

/// Reads a stream line by line, stopping at lines that contain a marker.
///
/// Lines are kept byte-for-byte, terminators included, so anything written
/// back out reproduces the input exactly.
#[derive(Debug)]
pub struct LineScanner<R> {
	reader: R,
	line_number: usize,
}

impl<R: BufRead> LineScanner<R> {
	pub fn new(reader: R) -> Self {
		Self {
			reader,
			line_number: 0,
		}
	}

	/// 1-indexed number of the last line read, or `0` before the first read.
	pub fn line_number(&self) -> usize {
		self.line_number
	}

	/// Read lines until one contains `marker` or the stream ends, returning
	/// every line read.
	///
	/// `found` and [`Terminal::EndOfInput`] hold together when the marker is
	/// on the last line and that line has no terminator.
	pub fn scan_until(&mut self, marker: &str) -> io::Result<ScanResult> {
		self.scan(marker.as_bytes(), true)
	}

	/// Like [`scan_until`](Self::scan_until) but only the marker line is
	/// kept; everything before it is dropped as it is read.
	pub fn skip_until(&mut self, marker: &str) -> io::Result<ScanResult> {
		self.scan(marker.as_bytes(), false)
	}

	fn scan(&mut self, marker: &[u8], keep: bool) -> io::Result<ScanResult> {
		let mut lines = Vec::new();

		loop {
			let mut line = Vec::new();
			if self.reader.read_until(b'\n', &mut line)? == 0 {
				return Ok(ScanResult {
					lines,
					found: false,
					terminal: Terminal::EndOfInput,
				});
			}
			self.line_number += 1;

			let terminal = if line.ends_with(b"\n") {
				Terminal::Ok
			} else {
				Terminal::EndOfInput
			};

			if contains_marker(&line, marker) {
				lines.push(line);
				return Ok(ScanResult {
					lines,
					found: true,
					terminal,
				});
			}

			if keep {
				lines.push(line);
			}

			if terminal == Terminal::EndOfInput {
				return Ok(ScanResult {
					lines,
					found: false,
					terminal,
				});
			}
		}
	}
}
