use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Write;
use std::path::Path;

use crate::CogError;
use crate::CogResult;
use crate::commit::CommitMode;
use crate::commit::CommitOutcome;
use crate::commit::PendingOutput;
use crate::commit::output_path;
use crate::config::CogConfig;
use crate::diagnostics::Diagnostics;
use crate::prefix::extract_prefix;
use crate::runner::GeneratorCommand;
use crate::runner::ScratchFile;
use crate::runner::scratch_path;
use crate::scanner::LineScanner;

/// Final state of a successful run over one file.
#[derive(Debug, Clone, Eq, PartialEq)]
#[non_exhaustive]
pub enum RunOutcome {
	/// The file was regenerated and its content changed.
	Updated,
	/// The file was regenerated and its content is byte-for-byte the same.
	Unchanged,
	/// Check mode: regenerating would change the file to `expected`.
	Stale { expected: Vec<u8> },
	/// The file contains no generator blocks; nothing was written.
	NoGeneratorBlocks,
}

/// How the stream-level rewrite ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Rewrite {
	/// Every block was regenerated and the input was consumed.
	Complete,
	/// The input has no start marker at all.
	NoGeneratorBlocks,
}

/// What the plain text phase found.
enum PlainText {
	/// A start marker; the payload is the prefix to strip from the block.
	BlockStart(Vec<u8>),
	/// The input ended after at least one complete block.
	Finished,
	/// The input ended without a single start marker.
	NoBlocks,
}

/// Processes a single file.
///
/// Contexts share nothing mutable, so any number of them may run at once
/// on different files.
pub struct CogContext<'a> {
	file: &'a Path,
	config: &'a CogConfig,
	diagnostics: &'a dyn Diagnostics,
}

impl<'a> CogContext<'a> {
	pub fn new(file: &'a Path, config: &'a CogConfig, diagnostics: &'a dyn Diagnostics) -> Self {
		Self {
			file,
			config,
			diagnostics,
		}
	}

	pub fn file(&self) -> &Path {
		self.file
	}

	/// Regenerate the file on disk.
	///
	/// The rewrite goes to `<file>_cog`. Only when every block has been
	/// regenerated does that file replace the original; on any other outcome
	/// it is removed and the original is left exactly as it was.
	pub fn run(&self) -> CogResult<RunOutcome> {
		self.diagnostics
			.detail(&format!("processing file `{}`", self.file.display()));

		let input = File::open(self.file)?;
		let mut output = PendingOutput::create(output_path(self.file), self.diagnostics)?;

		let rewrite = match self.rewrite(BufReader::new(input), &mut output) {
			Ok(rewrite) => rewrite,
			Err(e) => {
				self.diagnostics
					.detail(&format!("error processing `{}`: {e}", self.file.display()));
				output.discard();
				return Err(e);
			}
		};

		if rewrite == Rewrite::NoGeneratorBlocks {
			output.discard();
			self.diagnostics.info(&format!(
				"no generator code found in `{}`",
				self.file.display()
			));
			return Ok(RunOutcome::NoGeneratorBlocks);
		}

		let mode = if self.config.check {
			CommitMode::Check
		} else {
			CommitMode::Replace
		};

		let outcome = match output.commit(self.file, mode) {
			Ok(CommitOutcome::Replaced) => RunOutcome::Updated,
			Ok(CommitOutcome::Unchanged) => RunOutcome::Unchanged,
			Ok(CommitOutcome::Stale { expected }) => RunOutcome::Stale { expected },
			Err(e) => {
				self.diagnostics.detail(&format!(
					"error replacing `{}`: {e}",
					self.file.display()
				));
				return Err(e);
			}
		};

		let summary = match &outcome {
			RunOutcome::Updated => "successfully processed",
			RunOutcome::Stale { .. } => "out of date",
			_ => "already up to date",
		};
		self.diagnostics
			.info(&format!("{summary} `{}`", self.file.display()));

		Ok(outcome)
	}

	/// Rewrite `reader` into `writer`, regenerating every block.
	///
	/// Plain text and generator source are copied verbatim; whatever sits
	/// between a block and its end-of-output marker is replaced with the
	/// generator's output.
	pub fn rewrite<R: BufRead, W: Write>(
		&self,
		reader: R,
		writer: &mut W,
	) -> CogResult<Rewrite> {
		let mut scanner = LineScanner::new(reader);
		let mut first_cycle = true;

		loop {
			let prefix = match self.copy_plain_text(&mut scanner, writer, first_cycle)? {
				PlainText::BlockStart(prefix) => prefix,
				PlainText::Finished => return Ok(Rewrite::Complete),
				PlainText::NoBlocks => return Ok(Rewrite::NoGeneratorBlocks),
			};
			first_cycle = false;

			self.copy_generator_source(&mut scanner, writer, &prefix)?;

			if self.skip_stale_output(&mut scanner, writer)? {
				return Ok(Rewrite::Complete);
			}
		}
	}

	fn copy_plain_text<R: BufRead, W: Write>(
		&self,
		scanner: &mut LineScanner<R>,
		writer: &mut W,
		first_cycle: bool,
	) -> CogResult<PlainText> {
		self.diagnostics.detail("copying plain text");
		let marker = self.config.start_marker();
		let scan = scanner.scan_until(&marker)?;

		if scan.found && scan.is_end_of_input() {
			return Err(self.malformed(
				scanner.line_number(),
				format!("`{marker}` is the last line of the file"),
			));
		}

		if !scan.found && first_cycle {
			return Ok(PlainText::NoBlocks);
		}

		write_lines(writer, &scan.lines)?;
		self.diagnostics
			.detail(&format!("wrote {} line(s) to output file", scan.lines.len()));

		if !scan.found {
			return Ok(PlainText::Finished);
		}

		let prefix = scan
			.last_line()
			.map(|line| extract_prefix(line, &marker).to_vec())
			.unwrap_or_default();
		Ok(PlainText::BlockStart(prefix))
	}

	fn copy_generator_source<R: BufRead, W: Write>(
		&self,
		scanner: &mut LineScanner<R>,
		writer: &mut W,
		prefix: &[u8],
	) -> CogResult<()> {
		self.diagnostics.detail("copying generator code");
		let block_start = scanner.line_number();
		let marker = self.config.end_block_marker();
		let scan = scanner.scan_until(&marker)?;

		if scan.is_end_of_input() {
			return Err(self.malformed(
				block_start,
				format!("reached end of file while looking for `{marker}`"),
			));
		}

		write_lines(writer, &scan.lines)?;
		self.diagnostics
			.detail(&format!("wrote {} line(s) to output file", scan.lines.len()));

		if self.config.excise {
			self.diagnostics
				.detail("excising generated output without running the generator");
			return Ok(());
		}

		let source = &scan.lines[..scan.lines.len().saturating_sub(1)];
		self.generate(writer, source, prefix)
	}

	fn generate<W: Write>(&self, writer: &mut W, source: &[Vec<u8>], prefix: &[u8]) -> CogResult<()> {
		// Removed when dropped at the end of this function, after the
		// generator has exited.
		let scratch = ScratchFile::create(
			&scratch_path(self.file, &self.config.ext),
			source,
			prefix,
		)?;

		GeneratorCommand::from_config(self.config, scratch.path()).run(writer, self.diagnostics)
	}

	/// Drop everything up to the end-of-output marker and copy the marker.
	/// Returns true when this reached the end of the input successfully.
	fn skip_stale_output<R: BufRead, W: Write>(
		&self,
		scanner: &mut LineScanner<R>,
		writer: &mut W,
	) -> CogResult<bool> {
		self.diagnostics.detail("skipping to end of generated output");
		let section_start = scanner.line_number();
		let marker = self.config.end_output_marker();
		let scan = scanner.skip_until(&marker)?;

		if !scan.found {
			if self.config.assume_end_at_eof {
				self.diagnostics
					.detail(&format!("no `{marker}` found, treating end of file as `{marker}`"));
				return Ok(true);
			}
			return Err(self.malformed(
				section_start,
				format!("reached end of file while looking for `{marker}`"),
			));
		}

		write_lines(writer, &scan.lines)?;
		self.diagnostics.detail("wrote 1 line to output file");

		Ok(scan.is_end_of_input())
	}

	fn malformed(&self, line: usize, reason: String) -> CogError {
		CogError::MalformedBlock {
			file: self.file.display().to_string(),
			line,
			reason,
		}
	}
}

fn write_lines<W: Write>(writer: &mut W, lines: &[Vec<u8>]) -> std::io::Result<()> {
	for line in lines {
		writer.write_all(line)?;
	}
	Ok(())
}

/// Regenerate `file` with `config`, reporting through `diagnostics`.
pub fn process_file(
	file: &Path,
	config: &CogConfig,
	diagnostics: &dyn Diagnostics,
) -> CogResult<RunOutcome> {
	CogContext::new(file, config, diagnostics).run()
}
