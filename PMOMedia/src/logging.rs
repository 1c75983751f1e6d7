// logging.rs

use pmoconfig::Config;
use tracing_subscriber::{
    Registry, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Niveau minimum lu dans la configuration (`host.logger.min_level`)
fn min_level(config: &Config) -> LevelFilter {
    match config.get_log_min_level() {
        Ok(level) => level.trim().parse().unwrap_or(LevelFilter::INFO),
        Err(_) => LevelFilter::INFO,
    }
}

/// Initialise le système de logging
///
/// La console (`host.logger.enable_console`) peut être désactivée ; aucun
/// message n'est alors émis.
pub fn init_logging(config: &Config) {
    let subscriber = Registry::default().with(min_level(config));

    let enable_console = config.get_log_enable_console().unwrap_or(true);

    if enable_console {
        subscriber
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true),
            )
            .init();
    } else {
        subscriber.init();
    }
}
