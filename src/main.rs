use clap::Parser;
use screenwire::cli::commands::{cmd_contexts, cmd_dispatch, cmd_render};
use screenwire::cli::config::{Cli, Commands, load_config};
use screenwire::demo::demo_registry;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(log_level(cli.verbose))
        .parse_default_env()
        .init();

    let config = load_config(cli.config.as_deref());

    // Resolve settings: CLI > config > defaults
    let dev_mode = cli.dev || config.dev_mode;
    let trace_path = cli.trace.as_deref().or(config.trace_path.as_deref());

    let registry = demo_registry()?;

    match cli.command {
        Commands::Render { context, scope } => {
            let scope = scope.unwrap_or(config.default_scope);
            cmd_render(&registry, &context, scope, cli.verbose)?;
        }
        Commands::Dispatch { file } => {
            let ok = cmd_dispatch(&registry, dev_mode, trace_path, file.as_deref(), cli.verbose)?;
            if !ok {
                std::process::exit(1);
            }
        }
        Commands::Contexts => {
            cmd_contexts(&registry);
        }
    }

    Ok(())
}

fn log_level(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}
