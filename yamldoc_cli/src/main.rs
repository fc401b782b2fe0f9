use std::path::Path;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use yamldoc_cli::CliConfig;
use yamldoc_cli::Commands;
use yamldoc_cli::YamlDocCli;
use yamldoc_cli::demo_config;
use yamldoc_core::AnyEmptyResult;
use yamldoc_core::Renderer;
use yamldoc_core::YamlDocError;

fn main() {
	let args = YamlDocCli::parse();

	init_tracing(args.verbose);

	let use_color = std::env::var_os("NO_COLOR").is_none();

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

	let result = match &args.command {
		Some(Commands::Demo) => run_demo(&args),
		Some(Commands::Init { output, force }) => run_init(&args, output, *force),
		Some(Commands::Check { file }) => run_check(&args, file),
		None => {
			eprintln!("No subcommand specified. Run `yamldoc --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<YamlDocError>() {
			Ok(err) => {
				let report: miette::Report = (*err).into();
				eprintln!("{report:?}");
			}
			Err(e) => eprintln!("error: {e}"),
		}
		process::exit(2);
	}
}

/// Log to stderr, filtered by `YAMLDOC_LOG` when set.
fn init_tracing(verbose: bool) {
	let filter = EnvFilter::try_from_env("YAMLDOC_LOG").unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("debug")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::registry()
		.with(filter)
		.with(
			fmt::layer()
				.with_writer(std::io::stderr)
				.with_target(false)
				.without_time(),
		)
		.init();
}

fn render_demo(args: &YamlDocCli) -> Result<String, YamlDocError> {
	let options = args.render_options()?;
	Renderer::new(options).render(&demo_config())
}

fn run_demo(args: &YamlDocCli) -> AnyEmptyResult {
	let document = render_demo(args)?;
	print!("{document}");

	Ok(())
}

fn run_init(args: &YamlDocCli, output: &Path, force: bool) -> AnyEmptyResult {
	let path = args.root().join(output);

	if path.exists() && !force {
		println!(
			"Configuration file already exists: {} (use --force to overwrite)",
			path.display()
		);
		return Ok(());
	}

	let document = render_demo(args)?;
	std::fs::write(&path, document)?;
	tracing::debug!(path = %path.display(), "wrote demo configuration");
	println!("Created configuration file: {}", path.display());

	Ok(())
}

fn run_check(args: &YamlDocCli, file: &Path) -> AnyEmptyResult {
	let path = args.root().join(file);
	let content = std::fs::read_to_string(&path).map_err(YamlDocError::from)?;

	match serde_yaml_ng::from_str::<CliConfig>(&content) {
		Ok(config) => {
			tracing::debug!(templates = config.templates.len(), "configuration loaded");
			println!("{} is a valid configuration.", path.display());
			Ok(())
		}
		Err(e) => {
			eprintln!("{}: {e}", path.display());
			process::exit(1);
		}
	}
}
