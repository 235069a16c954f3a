use super::idea::{Idea, IdeaId};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_LEADERBOARD_SIZE: usize = 5;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortCriterion {
    Rating,
    Votes,
}

impl fmt::Display for SortCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortCriterion::Rating => f.write_str("rating"),
            SortCriterion::Votes => f.write_str("votes"),
        }
    }
}

impl FromStr for SortCriterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rating" => Ok(SortCriterion::Rating),
            "votes" => Ok(SortCriterion::Votes),
            other => Err(format!("unknown sort criterion {:?}", other)),
        }
    }
}

/// Highest first. The sort is stable, ties keep their stored order.
pub fn sort(ideas: &[Idea], criterion: SortCriterion) -> Vec<Idea> {
    let mut sorted = ideas.to_vec();
    match criterion {
        SortCriterion::Rating => sorted.sort_by_key(|idea| Reverse(idea.rating)),
        SortCriterion::Votes => sorted.sort_by_key(|idea| Reverse(idea.votes)),
    }
    sorted
}

pub fn top(ideas: &[Idea], criterion: SortCriterion, n: usize) -> Vec<Idea> {
    let mut sorted = sort(ideas, criterion);
    sorted.truncate(n);
    sorted
}

/// Copy of `ideas` with one more vote on `id`. Unknown ids leave the copy untouched.
pub fn upvote(ideas: &[Idea], id: &IdeaId) -> Vec<Idea> {
    ideas
        .iter()
        .map(|idea| {
            if &idea.id == id {
                Idea {
                    votes: idea.votes.saturating_add(1),
                    ..idea.clone()
                }
            } else {
                idea.clone()
            }
        })
        .collect()
}
