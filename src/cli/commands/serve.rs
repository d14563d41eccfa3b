//! Serve Command
//!
//! Usage:
//!   bizgen serve [--bind 127.0.0.1:8787]

use crate::config::ConfigLoader;
use crate::server;
use crate::types::Result;

pub async fn run(bind: Option<String>) -> Result<()> {
    let mut config = ConfigLoader::load()?;
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    server::serve(&config).await
}
