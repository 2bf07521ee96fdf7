mod common;

use cog_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use similar_asserts::assert_eq;

#[cfg(unix)]
#[test]
fn check_passes_when_up_to_date() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("file.txt"), common::FRESH_OUTPUT)?;

	common::cog_cmd(tmp.path())
		.args(common::sh_args("echo new"))
		.args(["--check", "file.txt"])
		.assert()
		.success()
		.stdout(predicates::str::contains("up to date"));

	Ok(())
}

#[cfg(unix)]
#[test]
fn check_fails_when_stale() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("stale.txt"), common::STALE_INPUT)?;
	std::fs::write(tmp.path().join("fresh.txt"), common::FRESH_OUTPUT)?;

	common::cog_cmd(tmp.path())
		.args(common::sh_args("echo new"))
		.args(["--check", "stale.txt", "fresh.txt"])
		.assert()
		.code(1)
		.stdout(
			predicates::str::contains("stale: stale.txt")
				.and(predicates::str::contains("fresh.txt").not())
				.and(predicates::str::contains("1 file(s) out of date")),
		);

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("stale.txt"))?,
		common::STALE_INPUT
	);
	assert!(!tmp.path().join("stale.txt_cog").exists());

	Ok(())
}

#[cfg(unix)]
#[test]
fn check_diff_shows_changes() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("file.txt"), common::STALE_INPUT)?;

	common::cog_cmd(tmp.path())
		.args(common::sh_args("echo new"))
		.args(["--check", "--diff", "file.txt"])
		.assert()
		.code(1)
		.stderr(predicates::str::contains("-old").and(predicates::str::contains("+new")));

	Ok(())
}

#[cfg(unix)]
#[test]
fn check_failure_takes_precedence_over_stale() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(tmp.path().join("stale.txt"), common::STALE_INPUT)?;

	common::cog_cmd(tmp.path())
		.args(common::sh_args("echo new"))
		.args(["--check", "stale.txt", "missing.txt"])
		.assert()
		.code(2);

	Ok(())
}

#[test]
fn check_diff_without_check_is_rejected() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::cog_cmd(tmp.path())
		.args(["--diff", "file.txt"])
		.assert()
		.failure()
		.stderr(predicates::str::contains("--check"));

	Ok(())
}
