use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Block heights to extract, as decimal numbers. At least one is required.
    #[arg(required = true)]
    pub heights: Vec<u64>,

    /// Path to .env file (e.g., .env.testnet)
    #[arg(short, long, default_value = ".env")]
    pub env_file: String,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
