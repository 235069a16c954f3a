#![allow(dead_code)]

use async_trait::async_trait;
use idea_board::db::{
    idea::{IdeaRepository, IdeaStore},
    slot::MemoryStore,
};
use idea_board::error::StorageError;
use idea_board::managers::idea::{Idea, IdeaId, Rating};
use lazy_static::lazy_static;
use std::convert::TryFrom;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

lazy_static! {
    static ref LOGGING: () = {
        // Fails only if a subscriber is already installed
        let _ = idea_board::log::init();
    };
}

pub fn setup() {
    lazy_static::initialize(&LOGGING);
}

pub fn idea(id: &str, name: &str, rating: i64, votes: u32) -> Idea {
    Idea {
        id: IdeaId::from(id),
        name: name.to_owned(),
        tagline: format!("{} tagline", name),
        description: format!("{} description", name),
        rating: Rating::try_from(rating).unwrap(),
        votes,
    }
}

pub fn scenario() -> Vec<Idea> {
    vec![idea("1", "Dog Uber", 80, 2), idea("2", "Cloud Toaster", 90, 1)]
}

pub fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(format!("idea-board-{}", uuid::Uuid::new_v4().to_simple()))
}

/// Memory backed repository that counts calls, clones share state.
#[derive(Clone)]
pub struct CountingRepository {
    pub store: Arc<IdeaStore<MemoryStore>>,
    loads: Arc<AtomicUsize>,
    saves: Arc<AtomicUsize>,
}

impl CountingRepository {
    pub fn new() -> Self {
        Self {
            store: Arc::new(IdeaStore::new(MemoryStore::default())),
            loads: Arc::new(AtomicUsize::new(0)),
            saves: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdeaRepository for CountingRepository {
    async fn load(&self) -> Result<Vec<Idea>, StorageError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.store.load().await
    }

    async fn save(&self, ideas: &[Idea]) -> Result<(), StorageError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.store.save(ideas).await
    }
}
