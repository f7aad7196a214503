#![cfg(not(tarpaulin_include))]

use inquiry::app;
use inquiry::config::Config;
use inquiry::google::GoogleSheets;
use inquiry::source::MemorySource;

/// Entry point of the systems lookup server
///
/// Loads `.env` when present, reads the environment into a [`Config`] and
/// serves the API. With `SYSTEMS_FIXTURE` set the data comes from that JSON
/// file instead of Google Sheets.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;

    match &config.fixture {
        Some(path) => {
            log::info!("Serving systems from fixture {}", path.display());
            let source = MemorySource::from_file(path)?;
            app::run(source, &config).await
        }
        None => {
            let source = GoogleSheets::from_config(&config);
            app::run(source, &config).await
        }
    }
}
