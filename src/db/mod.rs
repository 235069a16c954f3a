pub mod idea;
pub mod slot;

use actix::prelude::*;
use idea::IdeaRepository;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Actor owning the idea repository. Every read and write goes through it.
pub struct DbExecutor(pub Arc<dyn IdeaRepository>);

impl DbExecutor {
    pub fn new<R: IdeaRepository + 'static>(repository: R) -> Self {
        Self(Arc::new(repository))
    }

    pub fn repository(&mut self) -> Arc<dyn IdeaRepository> {
        self.0.clone()
    }
}

impl fmt::Debug for DbExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbExecutor").finish()
    }
}

impl Actor for DbExecutor {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!("Db executor started");
    }
}

impl Default for DbExecutor {
    fn default() -> Self {
        unimplemented!("DbExecutor cannot automatically be started");
    }
}

impl SystemService for DbExecutor {}
impl Supervised for DbExecutor {}

pub async fn new_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    new_pool_with(database_url.parse()?).await
}

pub async fn new_pool_with(connect_options: PgConnectOptions) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5 as u32)
        .connect_with(connect_options)
        .await
}
