//! Lunar dispatch server binary.

use lunar_dispatch::config::ServerConfig;
use lunar_dispatch::runtime;
use lunar_dispatch::util::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the real environment still applies.
    let _ = dotenvy::dotenv();

    let config = ServerConfig::from_env()?;
    init_tracing(config.log_color);

    runtime::run(config).await
}
