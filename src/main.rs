use clap::Parser;
use riskguard::cli::{Cli, Commands};
use riskguard::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
            eprintln!("Using default configuration");
            toml::from_str(include_str!("../config.toml.example"))?
        }
    };

    // Initialize telemetry
    riskguard::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Profiles(args) => {
            args.execute()?;
        }
        Commands::Evaluate(args) => {
            tracing::debug!(entry = %args.entry, equity = %args.equity, "Evaluating candidate");
            args.execute(&config.engine)?;
        }
        Commands::Config => {
            let engine = &config.engine;
            let risk = engine.risk_config()?;
            println!("Current configuration:");
            println!("  Profile: {} / {}", engine.archetype, engine.appetite);
            println!("  Custom overrides: {}", engine.overrides.is_some());
            println!("  Lot: {:?}", engine.lot);
            println!("  Bookkeeping: {:?}", engine.bookkeeping);
            println!(
                "  Logging: {} ({:?})",
                config.telemetry.log_level, config.telemetry.log_format
            );
            println!("{}", risk.summary("EFFECTIVE RISK PROFILE"));
        }
    }

    Ok(())
}
