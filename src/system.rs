use crate::config::{Config, StorageBackend};
use crate::db::{
    self,
    idea::{IdeaRepository, IdeaStore},
    slot::{FileStore, MemoryStore, PgStore},
    DbExecutor,
};
use crate::managers::idea::RandomRater;
use crate::services::IdeaService;
use actix::prelude::*;
use actix::registry::SystemRegistry;
use color_eyre::eyre::{eyre, Report, WrapErr};
use tracing::info;

pub fn register_db_actor<R: IdeaRepository + 'static>(repository: R) {
    SystemRegistry::set(DbExecutor::new(repository).start());
}

pub fn register_service(service: IdeaService) {
    SystemRegistry::set(service.start());
}

/// Builds the configured storage and registers both system actors.
/// Must run inside an actix system.
pub async fn start(config: &Config) -> Result<(), Report> {
    match config.storage {
        StorageBackend::Memory => {
            info!("Using in-memory idea storage");
            register_db_actor(IdeaStore::new(MemoryStore::default()));
        }
        StorageBackend::File => {
            info!(dir = %config.data_dir.display(), "Using file idea storage");
            register_db_actor(IdeaStore::new(FileStore::new(&config.data_dir)));
        }
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .ok_or_else(|| eyre!("DATABASE_URL must be set for postgres storage"))?;
            let pool = db::new_pool(database_url)
                .await
                .wrap_err("Unable to connect to database")?;
            let store = PgStore::connect(pool)
                .await
                .wrap_err("Unable to prepare kv_slots table")?;
            info!("Using postgres idea storage");
            register_db_actor(IdeaStore::new(store));
        }
    }
    register_service(IdeaService::new(RandomRater, config.leaderboard_size));
    Ok(())
}
