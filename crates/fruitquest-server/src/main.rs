use tracing_subscriber::EnvFilter;

use fruitquest_server::config::ServerConfig;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::load();
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    let addr = config.listen_addr.clone();
    if let Err(e) = fruitquest_server::serve(config).await {
        tracing::error!("Score service on {addr} stopped: {e}");
        std::process::exit(1);
    }
}
