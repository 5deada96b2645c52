//! HeadStart recommendation engine
//!
//! Generates personalized learning-content recommendations by combining
//! heuristic preference matching, embedding similarity over a user's recent
//! interactions, and LLM-generated explanations. The scoring core is pure
//! and deterministic; preference, history, catalog, and recommendation-log
//! storage as well as the AI providers are injected behind traits, so the
//! engine degrades gracefully when any collaborator is unavailable.

pub mod cache;
pub mod config;
pub mod error;
pub mod math;
pub mod models;
pub mod providers;
pub mod services;
pub mod stores;

pub use config::Config;
pub use error::{AppError, AppResult};
