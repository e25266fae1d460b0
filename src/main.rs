use thumbforge::logger::{self, LoggerConfig};
use thumbforge::{server, Config};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let env_loaded = dotenv::dotenv().is_ok();

    logger::init_with_config(LoggerConfig::development())?;

    if env_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let config = Config::from_env();
    let port = config.port.unwrap_or(8080);

    if config.replicate.api_token.is_some() {
        log::info!("✅ Replicate API token found in environment");
    } else {
        log::warn!("⚠️  REPLICATE_API_TOKEN not set, generation routes will return 401");
    }
    if config.search.api_key.is_none() {
        log::warn!("⚠️  SEARCH_API_KEY not set, video search will return 401");
    }

    logger::log_startup_info("thumbforge", env!("CARGO_PKG_VERSION"), port);

    server::run(config).await?;
    Ok(())
}
