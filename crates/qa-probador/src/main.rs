//! qa-probador binary

use clap::Parser;
use qa_probador::{
    default_retries, Cli, CliConfig, CliError, CliResult, ColorChoice, Commands, ListArgs,
    OutputFormat, Suite, TestArgs, TestRunner, Verbosity,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(config.verbosity);

    match cli.command {
        Commands::Test(args) => run_tests(config, &args),
        Commands::List(args) => run_list(&config, &args),
        Commands::Fixtures => {
            run_fixtures();
            Ok(())
        }
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.into();

    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

/// `RUST_LOG` wins over `-v`
fn init_tracing(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run_tests(config: CliConfig, args: &TestArgs) -> CliResult<()> {
    let retries = args
        .retries
        .unwrap_or_else(|| default_retries(std::env::var_os("CI").is_some()));

    let mut config = config
        .with_retries(retries)
        .with_fail_fast(args.fail_fast)
        .with_headed(args.headed);
    if let Some(url) = &args.base_url {
        config = config.with_base_url(url);
    }
    if let Some(url) = &args.secondary_base_url {
        config = config.with_secondary_base_url(url);
    }
    if let Some(dir) = &args.artifacts {
        config = config.with_artifacts_dir(dir);
    }
    tracing::debug!(?config, "running scenarios");

    let mut runner = TestRunner::new(config);
    let scenarios = runner.discover(&Suite::selected(args.suite), args.filter.as_deref())?;
    let results = runner.run(&scenarios)?;

    if OutputFormat::from(args.format) == OutputFormat::Json {
        println!("{}", results.to_json()?);
    }

    if results.all_passed() {
        Ok(())
    } else {
        Err(CliError::ScenariosFailed {
            failed: results.failed(),
            total: results.total(),
        })
    }
}

fn run_list(config: &CliConfig, args: &ListArgs) -> CliResult<()> {
    let runner = TestRunner::new(config.clone());
    let scenarios = runner.discover(&Suite::selected(args.suite), args.filter.as_deref())?;
    for scenario in &scenarios {
        println!("{}", scenario.id());
    }
    if !config.verbosity.is_quiet() {
        eprintln!("{} scenarios", scenarios.len());
    }
    Ok(())
}

fn run_fixtures() {
    for name in qa_probar::FIXTURE_NAMES {
        println!("{name}");
    }
}
