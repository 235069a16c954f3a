use super::{slot::KeyValueStore, DbExecutor};
use crate::error::StorageError;
use crate::managers::idea::Idea;
use crate::message_handler_with_span;
use actix::prelude::*;
use actix_interop::FutureInterop;
use async_trait::async_trait;
use tracing::{debug, instrument, Span};
use tracing_futures::Instrument;

/// Slot holding the whole idea collection
pub const IDEAS_KEY: &str = "ideas";

#[async_trait]
pub trait IdeaRepository: Send + Sync {
    async fn load(&self) -> Result<Vec<Idea>, StorageError>;
    async fn save(&self, ideas: &[Idea]) -> Result<(), StorageError>;
}

/// Keeps every idea serialized as one JSON array under [`IDEAS_KEY`].
pub struct IdeaStore<S> {
    slots: S,
}

impl<S: KeyValueStore> IdeaStore<S> {
    pub fn new(slots: S) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &S {
        &self.slots
    }
}

#[async_trait]
impl<S: KeyValueStore> IdeaRepository for IdeaStore<S> {
    #[instrument(skip(self))]
    async fn load(&self) -> Result<Vec<Idea>, StorageError> {
        let ideas = match self.slots.get(IDEAS_KEY).await? {
            Some(raw) => serde_json::from_str(&raw)?,
            None => vec![],
        };
        debug!(count = ideas.len(), "Loaded ideas");
        Ok(ideas)
    }

    #[instrument(skip(self, ideas), fields(count = ideas.len()))]
    async fn save(&self, ideas: &[Idea]) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(ideas).map_err(|err| StorageError::Encode(err.to_string()))?;
        self.slots.set(IDEAS_KEY, raw).await
    }
}

// Messages

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<Vec<Idea>, StorageError>")]
pub struct LoadIdeas;

message_handler_with_span! {
    impl SpanHandler<LoadIdeas> for DbExecutor {
        type Result = ResponseActFuture<Self, <LoadIdeas as Message>::Result>;

        fn handle(&mut self, _msg: LoadIdeas, _ctx: &mut Context<Self>, span: Span) -> Self::Result {
            let repository = self.repository();
            async move { repository.load().await }
                .instrument(span)
                .interop_actor_boxed(self)
        }
    }
}

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<(), StorageError>")]
pub struct SaveIdeas(pub Vec<Idea>);

message_handler_with_span! {
    impl SpanHandler<SaveIdeas> for DbExecutor {
        type Result = ResponseActFuture<Self, <SaveIdeas as Message>::Result>;

        fn handle(&mut self, msg: SaveIdeas, _ctx: &mut Context<Self>, span: Span) -> Self::Result {
            let SaveIdeas(ideas) = msg;
            let repository = self.repository();
            async move { repository.save(&ideas).await }
                .instrument(span)
                .interop_actor_boxed(self)
        }
    }
}
