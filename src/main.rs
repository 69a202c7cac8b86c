use anyhow::Result;
use log::LevelFilter;
use maker_file_index::{PluginRegistry, cli::parse_args, run};

#[tokio::main]
async fn main() -> Result<()> {
    let config = parse_args();

    let level = match config.verbosity {
        0 if config.debug_plugins => LevelFilter::Info,
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    if config.list_plugins {
        for name in PluginRegistry::global().names() {
            println!("{name}");
        }
        return Ok(());
    }

    let report = run(config).await?;
    println!("{}", report.display());
    Ok(())
}
