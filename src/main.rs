//! Code Studio CLI entry point.

use clap::Parser;
use std::process::ExitCode;
use studio::cli::commands;
use studio::cli::{Cli, Commands};
use studio::error::Error;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Set up tracing based on verbosity
    init_tracing(cli.verbose, cli.quiet);

    // Resolve effective JSON mode: --json OR non-TTY stdout
    let json = cli.json || !std::io::IsTerminal::is_terminal(&std::io::stdout());

    match run(&cli, json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if json {
                eprintln!("{}", e.to_structured_json());
            } else if !cli.quiet {
                if let Some(hint) = e.hint() {
                    eprintln!("Error: {e}\n  Hint: {hint}");
                } else {
                    eprintln!("Error: {e}");
                }
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    if quiet {
        return;
    }

    // Honor RUST_LOG if set, otherwise use verbosity flag
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        match verbose {
            0 => EnvFilter::new("warn"),
            1 => EnvFilter::new("info"),
            2 => EnvFilter::new("debug,hyper=info,reqwest=info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: &Cli, json: bool) -> Result<(), Error> {
    let home = cli.home.as_deref();

    match &cli.command {
        Commands::Chat(args) => commands::chat::execute(args, home, json, cli.quiet),

        Commands::Project { command } => {
            commands::project::execute(command, home, json, cli.quiet)
        }

        Commands::History { command } => {
            commands::history::execute(command, home, json, cli.quiet)
        }

        Commands::File { command } => commands::file::execute(command, home, json, cli.quiet),

        Commands::Tab { command } => commands::tab::execute(command, home, json, cli.quiet),

        Commands::Import { dir } => commands::import::execute(dir, home, json, cli.quiet),

        Commands::Export { dir, force } => {
            commands::export::execute(dir, *force, home, json, cli.quiet)
        }

        Commands::Preview { out } => {
            commands::preview::execute(out.as_deref(), home, cli.quiet)
        }

        Commands::Config { command } => {
            commands::config::execute(command, home, json, cli.quiet)
        }

        Commands::Status => commands::status::execute(home, json, cli.quiet),

        Commands::Version => commands::version::execute(home, json),
    }
}
