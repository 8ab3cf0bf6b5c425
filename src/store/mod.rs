pub mod config;
pub mod engine;
pub mod render;
pub mod ticker;
pub mod verdict;
