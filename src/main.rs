use clap::Parser;
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command-line arguments
    let args = Args::parse();

    let crawl = match args.into_crawl() {
        Ok(crawl) => crawl,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    ::log::info!(
        "Starting crawl of {} (pages {}..={})",
        crawl.config().base_url,
        crawl.config().start_page,
        crawl.config().end_page()
    );
    let start_time = std::time::Instant::now();

    match crawl.run().await {
        Ok(summary) => {
            ::log::info!(
                "Finished in {:.2} seconds, {} PDFs saved",
                start_time.elapsed().as_secs_f64(),
                summary.downloads_saved
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            ::log::error!("Crawl aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}
