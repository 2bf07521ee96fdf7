use std::path::PathBuf;

use clap::Parser;
use cog_core::AnyEmptyResult;
use cog_core::CogConfig;
use cog_core::CogError;
use cog_core::RunOutcome;
use cog_core::Verbosity;
use rstest::rstest;
use similar_asserts::assert_eq;

use super::*;

const EXCISE_INPUT: &str = "a\n[[[gocog\nx\ngocog]]]\nold\n[[[end]]]\nb\n";
const EXCISE_OUTPUT: &str = "a\n[[[gocog\nx\ngocog]]]\n[[[end]]]\nb\n";

fn excise_config(serial: bool) -> CogConfig {
	CogConfig {
		excise: true,
		serial,
		verbosity: Verbosity::Quiet,
		..CogConfig::default()
	}
}

#[test]
fn cli_requires_input_files() {
	assert!(CogCli::try_parse_from(["cog"]).is_err());
}

#[test]
fn cli_defaults_leave_config_untouched() -> AnyEmptyResult {
	let cli = CogCli::try_parse_from(["cog", "a.go"])?;
	assert_eq!(cli.files, vec!["a.go".to_string()]);
	assert_eq!(cli.apply(CogConfig::default()), CogConfig::default());

	Ok(())
}

#[test]
fn cli_flags_override_config() -> AnyEmptyResult {
	let cli = CogCli::try_parse_from([
		"cog",
		"-z",
		"-S",
		"-x",
		"-c",
		"python3",
		"-a",
		"-u,%s",
		"-e",
		".py",
		"-M",
		"<<",
		"-E",
		">>",
		"a.txt",
		"@list.txt",
	])?;
	let config = cli.apply(CogConfig::default());

	assert_eq!(cli.files, vec!["a.txt".to_string(), "@list.txt".to_string()]);
	assert_eq!(config.command, "python3");
	assert_eq!(config.args, vec!["-u".to_string(), "%s".to_string()]);
	assert_eq!(config.ext, ".py");
	assert_eq!(config.start_mark, "<<");
	assert_eq!(config.end_mark, ">>");
	assert!(config.assume_end_at_eof);
	assert!(config.serial);
	assert!(config.excise);
	assert!(!config.check);

	Ok(())
}

#[test]
fn cli_flags_keep_file_settings_they_do_not_name() -> AnyEmptyResult {
	let file_config = CogConfig {
		command: "python3".to_string(),
		args: vec!["%s".to_string()],
		assume_end_at_eof: true,
		..CogConfig::default()
	};
	let cli = CogCli::try_parse_from(["cog", "-e", ".py", "a.txt"])?;
	let config = cli.apply(file_config);

	assert_eq!(config.command, "python3");
	assert_eq!(config.args, vec!["%s".to_string()]);
	assert_eq!(config.ext, ".py");
	assert!(config.assume_end_at_eof);

	Ok(())
}

#[rstest]
#[case::normal(&[], Verbosity::Normal)]
#[case::verbose(&["-v"], Verbosity::Verbose)]
#[case::quiet(&["-q"], Verbosity::Quiet)]
#[case::quiet_wins(&["-v", "-q"], Verbosity::Quiet)]
fn cli_verbosity(#[case] flags: &[&str], #[case] expected: Verbosity) -> AnyEmptyResult {
	let argv = std::iter::once("cog")
		.chain(flags.iter().copied())
		.chain(std::iter::once("a.txt"));
	let cli = CogCli::try_parse_from(argv)?;
	assert_eq!(cli.apply(CogConfig::default()).verbosity, expected);

	Ok(())
}

#[test]
fn cli_diff_requires_check() {
	assert!(CogCli::try_parse_from(["cog", "--diff", "a.txt"]).is_err());
	assert!(CogCli::try_parse_from(["cog", "--check", "--diff", "a.txt"]).is_ok());
}

#[test]
fn parse_filelist_trims_and_skips_blank_lines() {
	let files = parse_filelist("  one.txt\n\n\ttwo.txt  \r\n   \nthree.txt");
	assert_eq!(
		files,
		vec![
			PathBuf::from("one.txt"),
			PathBuf::from("two.txt"),
			PathBuf::from("three.txt")
		]
	);
}

#[test]
fn expand_inputs_replaces_filelists_in_place() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let list = tmp.path().join("files.txt");
	std::fs::write(&list, "b.txt\nc.txt\n")?;

	let inputs = vec![
		"a.txt".to_string(),
		format!("@{}", list.display()),
		"d.txt".to_string(),
	];
	let files = expand_inputs(&inputs)?;
	assert_eq!(
		files,
		vec![
			PathBuf::from("a.txt"),
			PathBuf::from("b.txt"),
			PathBuf::from("c.txt"),
			PathBuf::from("d.txt")
		]
	);

	Ok(())
}

#[test]
fn expand_inputs_missing_filelist_is_an_error() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let inputs = vec![format!("@{}", tmp.path().join("missing.txt").display())];

	let result = expand_inputs(&inputs);
	assert!(matches!(result, Err(CogError::FileList { .. })));

	Ok(())
}

#[rstest]
#[case::serial(true)]
#[case::parallel(false)]
fn run_files_reports_in_input_order(#[case] serial: bool) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let mut files = Vec::new();
	for index in 0..8 {
		let file = tmp.path().join(format!("file-{index}.txt"));
		std::fs::write(&file, EXCISE_INPUT)?;
		files.push(file);
	}

	let reports = run_files(files.clone(), excise_config(serial))?;

	assert_eq!(
		reports
			.iter()
			.map(|report| report.file.clone())
			.collect::<Vec<_>>(),
		files
	);
	for report in &reports {
		assert!(matches!(report.result, Ok(RunOutcome::Updated)));
		assert_eq!(std::fs::read_to_string(&report.file)?, EXCISE_OUTPUT);
	}

	Ok(())
}

#[rstest]
#[case::serial(true)]
#[case::parallel(false)]
fn run_files_isolates_failures(#[case] serial: bool) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let good = tmp.path().join("good.txt");
	let malformed = tmp.path().join("malformed.txt");
	let missing = tmp.path().join("missing.txt");
	let plain = tmp.path().join("plain.txt");
	std::fs::write(&good, EXCISE_INPUT)?;
	std::fs::write(&malformed, "[[[gocog\nx\n")?;
	std::fs::write(&plain, "nothing to see\n")?;

	let reports = run_files(
		vec![good.clone(), malformed, missing, plain],
		excise_config(serial),
	)?;

	assert!(matches!(reports[0].result, Ok(RunOutcome::Updated)));
	assert!(matches!(
		reports[1].result,
		Err(CogError::MalformedBlock { .. })
	));
	assert!(matches!(reports[2].result, Err(CogError::Io(_))));
	assert!(matches!(
		reports[3].result,
		Ok(RunOutcome::NoGeneratorBlocks)
	));
	assert!(reports[1].is_failure());
	assert!(!reports[0].is_failure());
	assert_eq!(std::fs::read_to_string(&good)?, EXCISE_OUTPUT);

	Ok(())
}

#[test]
fn run_files_check_mode_marks_stale_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let stale = tmp.path().join("stale.txt");
	let fresh = tmp.path().join("fresh.txt");
	std::fs::write(&stale, EXCISE_INPUT)?;
	std::fs::write(&fresh, EXCISE_OUTPUT)?;

	let config = CogConfig {
		check: true,
		..excise_config(false)
	};
	let reports = run_files(vec![stale.clone(), fresh], config)?;

	assert!(reports[0].is_stale());
	assert!(!reports[1].is_stale());
	assert!(matches!(reports[1].result, Ok(RunOutcome::Unchanged)));
	assert_eq!(std::fs::read_to_string(&stale)?, EXCISE_INPUT);

	Ok(())
}
