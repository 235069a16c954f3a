pub mod idea;
pub mod ranking;
