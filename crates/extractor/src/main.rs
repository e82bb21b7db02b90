use babylon_msg_extract::{logging, runner};
use config::{Args, ExtractorConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse_args();
    let config = ExtractorConfig::load(&args.env_file)?;
    logging::init(&config.log.level, config.log.strip_ansi)?;

    tracing::info!("Node URL: {}", config.node.url);
    tracing::info!("Output directory: {}", config.extract.out_dir);
    tracing::info!("Heights requested: {}", args.heights.len());

    let aggregation = runner::run(&config, &args.heights).await?;
    print!("{aggregation}");

    Ok(())
}
