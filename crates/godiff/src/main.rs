//! godiff CLI - differential tester for Go toolchains

mod cli;
mod commands;
mod terminal;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::fmt::format::FmtSpan;

use cli::{Cli, Commands};

fn default_directive(cli: &Cli) -> &'static str {
    if cli.verbose {
        "godiff=debug"
    } else if cli.silent {
        "godiff=error"
    } else if matches!(cli.command, Commands::Run { .. }) {
        "godiff=warn"
    } else {
        "godiff=info"
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize metrics recorder if enabled
    let metrics_handle = if cli.metrics {
        godiff::metrics::CliRecorder::new().install()
    } else {
        None
    };
    godiff::metrics::init();

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = default_directive(&cli).parse::<Directive>() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    let exit_code = commands::run_command(&cli);

    if let Some(handle) = metrics_handle {
        handle.print_summary();
    }

    std::process::exit(exit_code);
}
