use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Target URL
    #[arg(long)]
    pub url: String,

    /// Total number of requests to send
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub requests: u64,

    /// Number of concurrent workers
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub concurrency: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Print a line for every completed request
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Print the report as JSON instead of the text block
    #[arg(long, default_value_t = false)]
    pub json: bool,
}
