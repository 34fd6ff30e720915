use anyhow::Result;
use env_logger::Env;
use portus::{cli::parse_args, run_portus};

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = parse_args()?;
    init_logger(config.verbosity);
    run_portus(config).await?;
    Ok(())
}
