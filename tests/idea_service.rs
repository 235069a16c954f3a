mod common;

use actix::prelude::*;
use common::{idea, scenario, setup, temp_dir, CountingRepository};
use idea_board::config::{Config, StorageBackend};
use idea_board::db::{
    idea::{IdeaRepository, IDEAS_KEY},
    slot::KeyValueStore,
};
use idea_board::error::{IdeaError, StorageError, ValidationError};
use idea_board::managers::idea::{FixedRater, Idea, IdeaId, NewIdea, Rating};
use idea_board::managers::ranking::SortCriterion;
use idea_board::services::{IdeaService, Leaderboard, ListIdeas, SubmitIdea, UpvoteIdea};
use idea_board::span::SpanMessage;
use idea_board::system;
use insta::assert_json_snapshot;
use std::convert::TryFrom;

fn start_with(repository: &CountingRepository, leaderboard_size: usize) {
    system::register_db_actor(repository.clone());
    system::register_service(IdeaService::new(
        FixedRater(Rating::try_from(42i64).unwrap()),
        leaderboard_size,
    ));
}

async fn send<M>(msg: M) -> M::Result
where
    M: Message + Send + 'static,
    M::Result: Send + 'static,
    IdeaService: Handler<SpanMessage<M>>,
{
    IdeaService::from_registry()
        .send(SpanMessage::new(msg))
        .await
        .expect("Idea service mailbox closed")
}

fn ids(ideas: &[Idea]) -> Vec<&str> {
    ideas.iter().map(|idea| idea.id.0.as_str()).collect()
}

fn form(name: &str, tagline: &str, description: &str) -> NewIdea {
    NewIdea {
        name: name.to_owned(),
        tagline: tagline.to_owned(),
        description: description.to_owned(),
    }
}

#[actix_rt::test]
async fn test_list_sorted_by_rating_and_votes() {
    setup();
    let repository = CountingRepository::new();
    repository.store.save(&scenario()).await.unwrap();
    start_with(&repository, 5);

    let by_rating = send(ListIdeas(SortCriterion::Rating)).await.unwrap();
    assert_eq!(ids(&by_rating), vec!["2", "1"]);

    let by_votes = send(ListIdeas(SortCriterion::Votes)).await.unwrap();
    assert_json_snapshot!(by_votes, @r###"
    [
      {
        "id": "1",
        "name": "Dog Uber",
        "tagline": "Dog Uber tagline",
        "description": "Dog Uber description",
        "rating": 80,
        "votes": 2
      },
      {
        "id": "2",
        "name": "Cloud Toaster",
        "tagline": "Cloud Toaster tagline",
        "description": "Cloud Toaster description",
        "rating": 90,
        "votes": 1
      }
    ]
    "###);
    assert_eq!(repository.saves(), 0);
}

#[actix_rt::test]
async fn test_submit_rejects_empty_tagline() {
    setup();
    let repository = CountingRepository::new();
    start_with(&repository, 5);

    let result = send(SubmitIdea(form("Dog Uber", "", "Rides for dogs"))).await;
    match result {
        Err(IdeaError::Validation(ValidationError::EmptyFields(fields))) => {
            assert_eq!(fields, vec!["tagline"]);
        }
        other => panic!("Expected validation error, got {:?}", other),
    }
    assert_eq!(repository.loads(), 0);
    assert_eq!(repository.saves(), 0);
}

#[actix_rt::test]
async fn test_submit_appends_rated_idea() {
    setup();
    let repository = CountingRepository::new();
    repository.store.save(&scenario()).await.unwrap();
    start_with(&repository, 5);

    let created = send(SubmitIdea(form(
        "Sock Radar",
        "Never lose a sock again",
        "Bluetooth tags for socks",
    )))
    .await
    .unwrap();
    assert_eq!(created.rating.value(), 42);
    assert_eq!(created.votes, 0);
    assert_eq!(created.name, "Sock Radar");
    assert_eq!(repository.saves(), 1);

    let stored = repository.store.load().await.unwrap();
    assert_eq!(stored.len(), 3);
    assert_eq!(stored[2], created);
    assert_eq!(&stored[..2], &scenario()[..]);
}

#[actix_rt::test]
async fn test_submitted_ids_are_unique() {
    setup();
    let repository = CountingRepository::new();
    start_with(&repository, 5);

    let first = send(SubmitIdea(form("a", "b", "c"))).await.unwrap();
    let second = send(SubmitIdea(form("a", "b", "c"))).await.unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(repository.store.load().await.unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_overlapping_submissions_are_all_kept() {
    setup();
    let repository = CountingRepository::new();
    start_with(&repository, 5);

    let service = IdeaService::from_registry();
    let first = service.send(SpanMessage::new(SubmitIdea(form("a", "b", "c"))));
    let second = service.send(SpanMessage::new(SubmitIdea(form("d", "e", "f"))));
    let upvote = service.send(SpanMessage::new(UpvoteIdea {
        id: IdeaId::from("missing"),
        sort_by: SortCriterion::Votes,
    }));
    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();
    upvote.await.unwrap().unwrap();

    let stored = repository.store.load().await.unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.contains(&first));
    assert!(stored.contains(&second));
}

#[actix_rt::test]
async fn test_upvote_persists_and_resorts() {
    setup();
    let repository = CountingRepository::new();
    repository.store.save(&scenario()).await.unwrap();
    start_with(&repository, 5);

    let ranked = send(UpvoteIdea {
        id: IdeaId::from("2"),
        sort_by: SortCriterion::Votes,
    })
    .await
    .unwrap();
    // Tied at 2 votes, stored order decides
    assert_eq!(ids(&ranked), vec!["1", "2"]);
    assert_eq!(ranked[1].votes, 2);

    let ranked = send(UpvoteIdea {
        id: IdeaId::from("2"),
        sort_by: SortCriterion::Votes,
    })
    .await
    .unwrap();
    assert_eq!(ids(&ranked), vec!["2", "1"]);

    let stored = repository.store.load().await.unwrap();
    assert_eq!(stored[0].votes, 2);
    assert_eq!(stored[1].votes, 3);
    assert_eq!(stored[1].rating, scenario()[1].rating);
    assert_eq!(repository.saves(), 2);
}

#[actix_rt::test]
async fn test_upvote_unknown_id_changes_nothing() {
    setup();
    let repository = CountingRepository::new();
    repository.store.save(&scenario()).await.unwrap();
    start_with(&repository, 5);

    let ranked = send(UpvoteIdea {
        id: IdeaId::from("404"),
        sort_by: SortCriterion::Rating,
    })
    .await
    .unwrap();
    assert_eq!(ids(&ranked), vec!["2", "1"]);
    assert_eq!(repository.saves(), 0);
    assert_eq!(repository.store.load().await.unwrap(), scenario());
}

#[actix_rt::test]
async fn test_leaderboard_is_truncated() {
    setup();
    let repository = CountingRepository::new();
    let ideas: Vec<Idea> = (0..8)
        .map(|i| idea(&i.to_string(), &format!("idea {}", i), i * 10, (8 - i) as u32))
        .collect();
    repository.store.save(&ideas).await.unwrap();
    start_with(&repository, 5);

    let by_rating = send(Leaderboard(SortCriterion::Rating)).await.unwrap();
    assert_eq!(ids(&by_rating), vec!["7", "6", "5", "4", "3"]);

    let by_votes = send(Leaderboard(SortCriterion::Votes)).await.unwrap();
    assert_eq!(ids(&by_votes), vec!["0", "1", "2", "3", "4"]);
}

#[actix_rt::test]
async fn test_leaderboard_size_is_configurable() {
    setup();
    let repository = CountingRepository::new();
    repository.store.save(&scenario()).await.unwrap();
    start_with(&repository, 1);

    let leaders = send(Leaderboard(SortCriterion::Rating)).await.unwrap();
    assert_eq!(ids(&leaders), vec!["2"]);
}

#[actix_rt::test]
async fn test_malformed_storage_surfaces_error() {
    setup();
    let repository = CountingRepository::new();
    repository
        .store
        .slots()
        .set(IDEAS_KEY, "{{broken".to_owned())
        .await
        .unwrap();
    start_with(&repository, 5);

    match send(ListIdeas(SortCriterion::Rating)).await {
        Err(IdeaError::Storage(StorageError::Malformed(_))) => {}
        other => panic!("Expected malformed storage error, got {:?}", other),
    }
    match send(UpvoteIdea {
        id: IdeaId::from("1"),
        sort_by: SortCriterion::Rating,
    })
    .await
    {
        Err(IdeaError::Storage(StorageError::Malformed(_))) => {}
        other => panic!("Expected malformed storage error, got {:?}", other),
    }
    assert_eq!(repository.saves(), 0);
}

#[actix_rt::test]
async fn test_system_start_with_file_storage() {
    setup();
    let dir = temp_dir();
    let config = Config {
        storage: StorageBackend::File,
        data_dir: dir.clone(),
        database_url: None,
        leaderboard_size: 5,
    };
    system::start(&config).await.unwrap();

    let created = send(SubmitIdea(form("Dog Uber", "Rides for dogs", "Long")))
        .await
        .unwrap();
    assert!(created.rating.value() <= Rating::MAX);

    let ranked = send(UpvoteIdea {
        id: created.id.clone(),
        sort_by: SortCriterion::Votes,
    })
    .await
    .unwrap();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0].votes, 1);
    assert!(dir.join("ideas.json").exists());

    std::fs::remove_dir_all(&dir).unwrap();
}
