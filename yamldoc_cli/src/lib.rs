use std::path::Path;
use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use yamldoc_core::RenderOptions;
use yamldoc_core::YamlDocResult;

pub use crate::config::*;

mod config;

/// The file `init` writes when no `--output` is given.
pub const DEFAULT_OUTPUT: &str = ".hcli_config.yaml";

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Render self-documenting YAML configuration files.",
	long_about = "yamldoc renders annotated configuration types as YAML documents where every \
	              key carries its documentation as a comment.\n\nQuick start:\n  yamldoc demo   \
	              Print the annotated demo configuration\n  yamldoc init   Write it to \
	              .hcli_config.yaml\n  yamldoc check  Validate an edited configuration file"
)]
pub struct YamlDocCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Directory searched for a `yamldoc.toml` options file. Relative output
	/// paths are resolved against it.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Wrap head comments at this many columns.
	#[arg(long, global = true)]
	pub width: Option<usize>,

	/// Fail on malformed annotations instead of rendering without them.
	#[arg(long, global = true, default_value_t = false)]
	pub strict: bool,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Print the annotated demo configuration.
	///
	/// Every key is preceded by its documentation, and scalar values carry
	/// their type and default as a trailing comment.
	Demo,
	/// Write the annotated demo configuration to a file.
	///
	/// If the file already exists it is left untouched unless `--force` is
	/// given.
	Init {
		/// Where to write the configuration, relative to `--path`.
		#[arg(long, short, default_value = DEFAULT_OUTPUT)]
		output: PathBuf,

		/// Overwrite an existing file.
		#[arg(long, default_value_t = false)]
		force: bool,
	},
	/// Check that a YAML file loads as the demo configuration.
	///
	/// Exits with a non-zero status code and the parse error when it does
	/// not.
	Check {
		/// The configuration file to check.
		file: PathBuf,
	},
}

impl YamlDocCli {
	/// The project root, defaulting to the current directory.
	pub fn root(&self) -> PathBuf {
		self.path
			.clone()
			.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
	}

	/// Options from the discovered options file, with command line flags
	/// taking precedence.
	pub fn render_options(&self) -> YamlDocResult<RenderOptions> {
		resolve_options(&self.root(), self.width, self.strict)
	}
}

pub fn resolve_options(
	root: &Path,
	width: Option<usize>,
	strict: bool,
) -> YamlDocResult<RenderOptions> {
	let mut options = RenderOptions::load(root)?.unwrap_or_default();

	if let Some(width) = width {
		options = options.with_wrap_width(width);
	}

	if strict {
		options = options.with_strict_annotations(true);
	}

	Ok(options)
}
