use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn yamldoc_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("yamldoc"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("YAMLDOC_LOG");
	cmd
}
