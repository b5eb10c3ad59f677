use anyhow::Result;
use blops_lib::app::App;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Number of ticks to simulate
    #[arg(short, long, default_value_t = 600)]
    ticks: u64,

    /// Seed override (implies deterministic tick seeding)
    #[arg(long)]
    seed: Option<u64>,

    /// Pace ticks at the configured frame rate and use measured dt
    #[arg(long)]
    realtime: bool,

    /// Write a JSON snapshot to stdout every N ticks
    #[arg(long, value_name = "N")]
    emit_json: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    blops_lib::model::metrics::init_logging();
    let args = Args::parse();

    let mut config = App::load_config(&args.config)?;
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
        config.world.deterministic = true;
    }

    let mut app = App::new(config)?;
    app.emit_every = args.emit_json;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.realtime {
        app.run_realtime(args.ticks, &mut out).await?;
    } else {
        app.run_headless(args.ticks, &mut out)?;
    }

    app.log_summary();
    Ok(())
}
