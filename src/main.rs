use std::sync::Arc;

use cloudops_insight::config::load_config;
use cloudops_insight::startup::run;
use cloudops_insight::utils::logger::init_logging;

#[tokio::main]
async fn main() {
    let config = Arc::new(load_config());

    if let Err(e) = init_logging(&config.logging()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server failed");
        std::process::exit(1);
    }
}
