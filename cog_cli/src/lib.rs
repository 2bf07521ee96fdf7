use std::path::PathBuf;

use clap::Parser;
use cog_core::CogConfig;
use cog_core::Verbosity;

pub use driver::*;
pub use filelist::*;

pub mod driver;
pub mod filelist;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Regenerate text in place from generator code embedded in your files.",
	long_about = "cog finds generator blocks embedded in text files, runs each block through an \
	              external command and replaces the block's previous output with whatever the \
	              command prints.\n\nA block looks like this:\n\n  // [[[gocog\n  // generator \
	              source, with its comment prefix stripped before running\n  // gocog]]]\n  \
	              generated output\n  // [[[end]]]\n\nPass `@FILE` to read one input path per \
	              line from FILE."
)]
#[allow(clippy::struct_excessive_bools)]
pub struct CogCli {
	/// Files to process. An argument of the form `@FILE` is replaced by the
	/// paths listed in FILE, one per line.
	#[arg(value_name = "INFILE | @FILELIST", required = true)]
	pub files: Vec<String>,

	/// Treat the end of the file as the end-of-output marker when the
	/// marker is missing.
	#[arg(long = "eof", short = 'z', default_value_t = false)]
	pub assume_end_at_eof: bool,

	/// Enable verbose output.
	#[arg(long, short, default_value_t = false)]
	pub verbose: bool,

	/// Suppress all output except errors. Takes precedence over
	/// `--verbose`.
	#[arg(long, short, default_value_t = false)]
	pub quiet: bool,

	/// Process files one at a time, in the order given.
	#[arg(long, short = 'S', default_value_t = false)]
	pub serial: bool,

	/// The command used to run generator code. `%s` is replaced with the
	/// path of the generator file.
	#[arg(long = "cmd", short = 'c', value_name = "CMD")]
	pub command: Option<String>,

	/// Comma separated arguments passed to the command. `%s` is replaced
	/// with the path of the generator file.
	#[arg(
		long,
		short,
		value_name = "ARGS",
		value_delimiter = ',',
		allow_hyphen_values = true
	)]
	pub args: Option<Vec<String>>,

	/// Extension of the generator file.
	#[arg(long, short, value_name = "EXT")]
	pub ext: Option<String>,

	/// String that opens cog statements.
	#[arg(long = "startmark", short = 'M', value_name = "MARK")]
	pub start_mark: Option<String>,

	/// String that closes cog statements.
	#[arg(long = "endmark", short = 'E', value_name = "MARK")]
	pub end_mark: Option<String>,

	/// Remove generated output without running any generators.
	#[arg(long, short = 'x', default_value_t = false)]
	pub excise: bool,

	/// Report files whose generated output is out of date without writing
	/// them. Exits with status 1 if any file is stale.
	#[arg(long, default_value_t = false)]
	pub check: bool,

	/// With `--check`, print a line diff for each stale file.
	#[arg(long, default_value_t = false, requires = "check")]
	pub diff: bool,

	/// Path to a config file. Defaults to the first of `cog.toml`,
	/// `.cog.toml` or `.config/cog.toml` in the current directory.
	#[arg(long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Disable colored output.
	#[arg(long, default_value_t = false)]
	pub no_color: bool,
}

impl CogCli {
	/// Layer the command line flags over `config`. Flags that were not given
	/// leave the corresponding setting untouched.
	#[must_use]
	pub fn apply(&self, mut config: CogConfig) -> CogConfig {
		if let Some(command) = &self.command {
			config.command.clone_from(command);
		}
		if let Some(args) = &self.args {
			config.args.clone_from(args);
		}
		if let Some(ext) = &self.ext {
			config.ext.clone_from(ext);
		}
		if let Some(start_mark) = &self.start_mark {
			config.start_mark.clone_from(start_mark);
		}
		if let Some(end_mark) = &self.end_mark {
			config.end_mark.clone_from(end_mark);
		}

		config.assume_end_at_eof |= self.assume_end_at_eof;
		config.excise |= self.excise;
		config.serial |= self.serial;
		config.check |= self.check;

		if self.quiet {
			config.verbosity = Verbosity::Quiet;
		} else if self.verbose {
			config.verbosity = Verbosity::Verbose;
		}

		config
	}
}

#[cfg(test)]
mod __tests;
