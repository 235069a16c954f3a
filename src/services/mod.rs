pub mod idea;

pub use idea::{IdeaService, Leaderboard, ListIdeas, SubmitIdea, UpvoteIdea};
