use chnroute::config::DEFAULT_METRIC;
use chnroute::{Error, Fetcher};
use clap::Parser;
use std::path::PathBuf;
use tracing::{Level, error};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "chnroute")]
#[command(about = "Generate routing rules for VPN users in China")]
#[command(version)]
struct Cli {
    /// Target platform
    #[arg(
        short = 'p',
        value_name = "PLATFORM",
        default_value = "openvpn",
        value_parser = ["openvpn", "old", "mac", "linux", "win"]
    )]
    platform: String,

    /// Route metric
    #[arg(short = 'm', default_value_t = DEFAULT_METRIC)]
    metric: u32,

    /// Directory to write the scripts into
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Config file (defaults to ./chnroute.toml, then ~/.chnroute/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write a default chnroute.toml into the output directory and exit
    #[arg(long)]
    init: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so the scripts and any piped output stay clean
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if cli.init {
        let path = chnroute::init_config(&cli.output_dir)?;
        println!("Created default config: {}", path.display());
        return Ok(());
    }

    let config = chnroute::load_config(cli.config.as_deref())?;
    let fetcher = Fetcher::new(&config.feed);

    match chnroute::generate_for(
        &cli.platform,
        cli.metric,
        cli.output_dir,
        &fetcher,
        &config.feed.url,
    ) {
        Ok(_) => Ok(()),
        Err(Error::UnknownPlatform(e)) => {
            error!("{}", e);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}
