use anyhow::Context;
use tracing::warn;
use trellis_config::{AppConfig, DEFAULT_PATH, load_config};
use trellis_logger::Logger;
use trellis_server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded = load_config::<AppConfig>(Some(DEFAULT_PATH));
    let cfg = loaded.as_ref().map_or_else(|_| AppConfig::default(), Clone::clone);

    let logging = &cfg.logging;
    let _log = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .level_name(&logging.level)?
        .filter(logging.filter.as_deref())
        .console(logging.console)
        .json(logging.json)
        .directory(logging.directory.as_deref())
        .init()
        .context("Critical: Logger configuration is invalid")?;

    if let Err(e) = &loaded {
        warn!(error = %e, "Falling back to default configuration");
    }

    Server::builder().config(cfg).catalog(trellis_demo::catalog()).build()?.run().await
}
