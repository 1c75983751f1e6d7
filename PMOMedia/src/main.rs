mod logging;

use pmoconfig::get_config;
use pmomediaindex::{MediaManager, MediaSchedulers, ReconciliationListener};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ========== PHASE 1 : Configuration et logs ==========
    let config = get_config();
    logging::init_logging(&config);
    info!("⚙️ Configuration loaded from {}", config.directory());

    // ========== PHASE 2 : Index média ==========
    let manager = MediaManager::from_config(config.clone())?;

    // Les changements de dossiers sont appliqués à l'index
    let listener = ReconciliationListener::new(manager.clone()).spawn(config.subscribe());

    info!("🔎 Warming media index...");
    let stats = manager.scan_all().await;
    info!("✅ {} nodes indexed ({})", manager.index().len(), stats);

    // ========== PHASE 3 : Tâches périodiques ==========
    let schedulers = MediaSchedulers::start(&manager)?;
    info!("⏱️ {} maintenance timer(s) running", schedulers.len());

    info!("✅ PMOMedia is ready!");
    info!("Press Ctrl+C to stop...");
    tokio::signal::ctrl_c().await?;

    info!("🛑 Shutting down...");
    schedulers.shutdown();
    listener.abort();

    Ok(())
}
