use crate::error::ValidationError;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};
use std::convert::TryFrom;
use std::fmt;
use uuid::Uuid;

// Types

#[derive(Clone, Hash, PartialEq, Eq, Debug, Deserialize, Serialize)]
#[serde(transparent)]
pub struct IdeaId(pub String);

impl IdeaId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_hyphenated().to_string())
    }
}

impl Default for IdeaId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for IdeaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IdeaId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Score between 0 and 100 handed out once when an idea is submitted.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MAX: u8 = 100;

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (0..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(format!("rating {} is outside 0..={}", value, Self::MAX))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Idea {
    pub id: IdeaId,
    pub name: String,
    pub tagline: String,
    pub description: String,
    pub rating: Rating,
    #[serde(default, deserialize_with = "votes_or_zero")]
    pub votes: u32,
}

// Older records were written without votes, or with an explicit null
fn votes_or_zero<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}

impl Idea {
    pub fn from_submission(new_idea: NewIdea, rating: Rating) -> Self {
        Self {
            id: IdeaId::new(),
            name: new_idea.name,
            tagline: new_idea.tagline,
            description: new_idea.description,
            rating,
            votes: 0,
        }
    }
}

/// Fields typed into the submit form.
#[derive(Clone, Default, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct NewIdea {
    pub name: String,
    pub tagline: String,
    pub description: String,
}

impl NewIdea {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let empty: Vec<&'static str> = [
            ("name", &self.name),
            ("tagline", &self.tagline),
            ("description", &self.description),
        ]
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| *field)
        .collect();

        if empty.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::EmptyFields(empty))
        }
    }
}

// Rating

pub trait Rater: Send {
    fn rate(&mut self, idea: &NewIdea) -> Rating;
}

#[derive(Default, Debug)]
pub struct RandomRater;

impl Rater for RandomRater {
    fn rate(&mut self, _idea: &NewIdea) -> Rating {
        Rating(rand::thread_rng().gen_range(0..=Rating::MAX))
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FixedRater(pub Rating);

impl Rater for FixedRater {
    fn rate(&mut self, _idea: &NewIdea) -> Rating {
        self.0
    }
}
