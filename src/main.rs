use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match indiamart_scraper_lib::run().await {
        Ok(summary) if summary.records_collected == 0 => {
            println!("No products collected");
            ExitCode::SUCCESS
        }
        Ok(summary) => {
            println!(
                "Saved {} products to {}",
                summary.records_collected,
                summary.output_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Scraper failed: {:#}", e);
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
