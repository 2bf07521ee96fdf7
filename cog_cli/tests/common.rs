use std::path::Path;

use assert_cmd::Command;

pub fn cog_cmd(dir: &Path) -> Command {
	let mut cmd = Command::new(env!("CARGO_BIN_EXE_cog"));
	cmd.current_dir(dir);
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

/// Arguments that run each generator block with `sh -c <script>`.
#[allow(dead_code)]
pub fn sh_args(script: &str) -> [String; 4] {
	[
		"-c".to_string(),
		"sh".to_string(),
		"-a".to_string(),
		format!("-c,{script},%s"),
	]
}

#[allow(dead_code)]
pub const STALE_INPUT: &str = "pre\n# [[[gocog\n# code\n# gocog]]]\nold\n# [[[end]]]\npost\n";
#[allow(dead_code)]
pub const FRESH_OUTPUT: &str = "pre\n# [[[gocog\n# code\n# gocog]]]\nnew\n# [[[end]]]\npost\n";
