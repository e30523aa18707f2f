use clap::Parser;

use volley::core::{execute, show_report};
use volley::models::args::Args;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("Starting load test");
    println!("URL: {}", args.url);
    println!("Total Requests: {}", args.requests);
    println!("Concurrency: {}\n", args.concurrency);

    let report = execute::run(
        &args.url,
        args.requests,
        args.concurrency,
        args.timeout,
        args.verbose,
    )
    .await?;

    if args.json {
        show_report::show_report_json(&report)?;
    } else {
        show_report::show_report(&report);
    }
    Ok(())
}
