use std::sync::Arc;

use redis::aio::ConnectionManager;
use tokio::sync::broadcast;

use super::{config::Config, database::init_redis};

/// Capacity of the append-notification channel. Slow feed consumers that lag
/// behind simply re-snapshot, so a small buffer is enough.
const FEED_CAPACITY: usize = 16;

pub struct AppState {
    pub config: Config,
    pub redis_connection: ConnectionManager,
    pub feed: broadcast::Sender<()>,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let redis_connection = init_redis(&config.redis_url).await;

        let (feed, _) = broadcast::channel(FEED_CAPACITY);

        Arc::new(Self {
            config,
            redis_connection,
            feed,
        })
    }
}
