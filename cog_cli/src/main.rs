use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use cog_cli::CogCli;
use cog_cli::FileReport;
use cog_cli::expand_inputs;
use cog_cli::run_files;
use cog_core::CogConfig;
use cog_core::CogResult;
use cog_core::RunOutcome;
use cog_core::Verbosity;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

/// Process exit status when `--check` finds stale files.
const EXIT_STALE: i32 = 1;
/// Process exit status when any file or the configuration fails.
const EXIT_FAILURE: i32 = 2;

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = CogCli::parse();

	// Respect NO_COLOR env var, --no-color flag and terminals without color.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stderr).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let code = match run(&args) {
		Ok(code) => code,
		Err(e) => {
			let report: miette::Report = e.into();
			eprintln!("{report:?}");
			EXIT_FAILURE
		}
	};

	process::exit(code);
}

fn run(args: &CogCli) -> CogResult<i32> {
	let config = args.apply(load_config(args)?);
	config.validate()?;
	init_tracing(config.verbosity);

	let files = expand_inputs(&args.files)?;
	if files.is_empty() {
		tracing::info!("no input files to process");
		return Ok(0);
	}

	let quiet = config.verbosity == Verbosity::Quiet;
	let check = config.check;
	let reports = run_files(files, config)?;

	Ok(print_reports(reports, args, quiet, check))
}

/// Use `--config` when given, otherwise the first config file discovered in
/// the current directory, otherwise the defaults.
fn load_config(args: &CogCli) -> CogResult<CogConfig> {
	if let Some(path) = &args.config {
		return CogConfig::load_file(path);
	}

	let root = std::env::current_dir()?;
	Ok(CogConfig::load(&root)?.unwrap_or_default())
}

/// Log to stderr at the level implied by `verbosity`. `RUST_LOG` takes
/// precedence when set.
fn init_tracing(verbosity: Verbosity) {
	let default_level = match verbosity {
		Verbosity::Quiet => "off",
		Verbosity::Normal => "info",
		Verbosity::Verbose => "debug",
	};
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(color_enabled())
		.with_target(false)
		.without_time()
		.try_init()
		.ok();
}

/// Print the outcome of each file and return the process exit status.
fn print_reports(reports: Vec<FileReport>, args: &CogCli, quiet: bool, check: bool) -> i32 {
	let root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
	let mut failed = 0usize;
	let mut stale = 0usize;

	for report in reports {
		let rel = make_relative(&report.file, &root);

		match report.result {
			Err(e) => {
				failed += 1;
				eprintln!("{} failed to process {rel}", colored!("error:", red));
				let report: miette::Report = e.into();
				eprintln!("{report:?}");
			}
			Ok(RunOutcome::Stale { expected }) => {
				stale += 1;
				if quiet {
					continue;
				}
				println!("{} {rel}", colored!("stale:", yellow));
				if args.diff {
					let current = std::fs::read(&report.file).unwrap_or_default();
					print_diff(
						&String::from_utf8_lossy(&current),
						&String::from_utf8_lossy(&expected),
					);
				}
			}
			Ok(_) => {}
		}
	}

	if check && !quiet {
		if stale == 0 && failed == 0 {
			println!("{}", colored!("All generated output is up to date.", green));
		} else if stale > 0 {
			println!(
				"\n{stale} file(s) out of date. Run `cog` without `--check` to regenerate them."
			);
		}
	}

	if failed > 0 {
		EXIT_FAILURE
	} else if stale > 0 {
		EXIT_STALE
	} else {
		0
	}
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
