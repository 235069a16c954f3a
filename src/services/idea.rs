use crate::db::{
    idea::{LoadIdeas, SaveIdeas},
    DbExecutor,
};
use crate::error::IdeaError;
use crate::managers::{
    idea::{Idea, IdeaId, NewIdea, RandomRater, Rater},
    ranking::{self, SortCriterion, DEFAULT_LEADERBOARD_SIZE},
};
use crate::message_handler_with_span;
use crate::span::SpanMessage;
use actix::prelude::*;
use actix_interop::FutureInterop;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn, Span};

// Messages

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<Idea, IdeaError>")]
pub struct SubmitIdea(pub NewIdea);

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<Vec<Idea>, IdeaError>")]
pub struct ListIdeas(pub SortCriterion);

#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<Vec<Idea>, IdeaError>")]
pub struct Leaderboard(pub SortCriterion);

/// Adds one vote and answers with the whole collection ordered by `sort_by`.
#[derive(Message, Clone, Debug)]
#[rtype(result = "Result<Vec<Idea>, IdeaError>")]
pub struct UpvoteIdea {
    pub id: IdeaId,
    pub sort_by: SortCriterion,
}

// Actor

pub struct IdeaService {
    rater: Box<dyn Rater>,
    leaderboard_size: usize,
    // Held across load and save of every write flow
    writes: Arc<Mutex<()>>,
}

impl IdeaService {
    pub fn new<R: Rater + 'static>(rater: R, leaderboard_size: usize) -> Self {
        Self {
            rater: Box::new(rater),
            leaderboard_size,
            writes: Arc::new(Mutex::new(())),
        }
    }
}

impl Default for IdeaService {
    fn default() -> Self {
        Self::new(RandomRater, DEFAULT_LEADERBOARD_SIZE)
    }
}

impl fmt::Debug for IdeaService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdeaService")
            .field("leaderboard_size", &self.leaderboard_size)
            .finish()
    }
}

impl Actor for IdeaService {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!("Idea service started");
    }
}

impl SystemService for IdeaService {}
impl Supervised for IdeaService {}

async fn load_ideas() -> Result<Vec<Idea>, IdeaError> {
    let ideas = DbExecutor::from_registry()
        .send(SpanMessage::new(LoadIdeas))
        .await??;
    Ok(ideas)
}

async fn save_ideas(ideas: Vec<Idea>) -> Result<(), IdeaError> {
    DbExecutor::from_registry()
        .send(SpanMessage::new(SaveIdeas(ideas)))
        .await??;
    Ok(())
}

#[instrument(skip(idea, writes), fields(id = %idea.id))]
async fn submit(idea: Idea, writes: Arc<Mutex<()>>) -> Result<Idea, IdeaError> {
    let _guard = writes.lock().await;
    let mut ideas = load_ideas().await?;
    ideas.push(idea.clone());
    save_ideas(ideas).await?;
    info!(rating = idea.rating.value(), "Idea submitted");
    Ok(idea)
}

#[instrument]
async fn list(sort_by: SortCriterion) -> Result<Vec<Idea>, IdeaError> {
    let ideas = load_ideas().await?;
    Ok(ranking::sort(&ideas, sort_by))
}

#[instrument]
async fn leaderboard(sort_by: SortCriterion, size: usize) -> Result<Vec<Idea>, IdeaError> {
    let ideas = load_ideas().await?;
    debug!(total = ideas.len(), "Building leaderboard");
    Ok(ranking::top(&ideas, sort_by, size))
}

#[instrument(skip(writes))]
async fn upvote(
    id: IdeaId,
    sort_by: SortCriterion,
    writes: Arc<Mutex<()>>,
) -> Result<Vec<Idea>, IdeaError> {
    let _guard = writes.lock().await;
    let ideas = load_ideas().await?;
    if !ideas.iter().any(|idea| idea.id == id) {
        debug!("No idea with this id, skipping save");
        return Ok(ranking::sort(&ideas, sort_by));
    }
    let updated = ranking::upvote(&ideas, &id);
    save_ideas(updated.clone()).await?;
    Ok(ranking::sort(&updated, sort_by))
}

message_handler_with_span! {
    impl SpanHandler<SubmitIdea> for IdeaService {
        type Result = ResponseActFuture<Self, <SubmitIdea as Message>::Result>;

        fn handle(&mut self, msg: SubmitIdea, _ctx: &mut Context<Self>, _span: Span) -> Self::Result {
            let SubmitIdea(new_idea) = msg;
            if let Err(err) = new_idea.validate() {
                warn!(error = %err, "Rejected idea submission");
                return async move { Err::<Idea, IdeaError>(err.into()) }.interop_actor_boxed(self);
            }
            let rating = self.rater.rate(&new_idea);
            submit(Idea::from_submission(new_idea, rating), self.writes.clone()).interop_actor_boxed(self)
        }
    }
}

message_handler_with_span! {
    impl SpanHandler<ListIdeas> for IdeaService {
        type Result = ResponseActFuture<Self, <ListIdeas as Message>::Result>;

        fn handle(&mut self, msg: ListIdeas, _ctx: &mut Context<Self>, _span: Span) -> Self::Result {
            let ListIdeas(sort_by) = msg;
            list(sort_by).interop_actor_boxed(self)
        }
    }
}

message_handler_with_span! {
    impl SpanHandler<Leaderboard> for IdeaService {
        type Result = ResponseActFuture<Self, <Leaderboard as Message>::Result>;

        fn handle(&mut self, msg: Leaderboard, _ctx: &mut Context<Self>, _span: Span) -> Self::Result {
            let Leaderboard(sort_by) = msg;
            leaderboard(sort_by, self.leaderboard_size).interop_actor_boxed(self)
        }
    }
}

message_handler_with_span! {
    impl SpanHandler<UpvoteIdea> for IdeaService {
        type Result = ResponseActFuture<Self, <UpvoteIdea as Message>::Result>;

        fn handle(&mut self, msg: UpvoteIdea, _ctx: &mut Context<Self>, _span: Span) -> Self::Result {
            let UpvoteIdea { id, sort_by } = msg;
            upvote(id, sort_by, self.writes.clone()).interop_actor_boxed(self)
        }
    }
}
