//! thermwatch - temperature alert monitor
//!
//! A command-line tool that polls a temperature sensor and sends alerts
//! when thresholds are exceeded.

use clap::Parser;
use thermwatch::cli::args::{generate_completions, Cli, Commands, ConfigCommands};
use thermwatch::commands::{
    load_config, run_config_init, run_config_show, run_monitor, run_notify_test, run_read,
};
use thermwatch::error::{AppError, ConfigError};

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_secs()
        .init();

    // Run the appropriate command
    let result = run(&cli);

    if let Err(e) = result {
        log::error!("{}", e);
        print_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    match &cli.command {
        Commands::Run(args) => run_monitor(args, &load_config(cli)?, cli.format),

        Commands::Read => run_read(&load_config(cli)?, cli.format),

        Commands::NotifyTest(args) => run_notify_test(args, &load_config(cli)?, cli.format),

        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => run_config_show(&load_config(cli)?, cli.format),
            ConfigCommands::Init { path, force } => {
                run_config_init(path.as_deref(), *force, cli.format)
            }
        },

        Commands::Completions { shell } => {
            generate_completions(*shell);
            Ok(())
        }
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Config(ConfigError::MissingField(field)) if field == "sensor" => {
            eprintln!();
            eprintln!("Hint: Configure a [sensor] table or pass --sensor-type.");
            eprintln!("      'thermwatch config init' writes a starter file.");
        }
        AppError::Config(ConfigError::MissingField(field)) if field == "alert.threshold" => {
            eprintln!();
            eprintln!("Hint: Set [alert] threshold or pass --threshold.");
        }
        AppError::Config(ConfigError::Unsupported(_)) => {
            eprintln!();
            eprintln!("Hint: Rebuild with the matching cargo feature enabled.");
        }
        _ => {}
    }
}
