pub mod content_processing;
pub mod recommendations;
pub mod scoring;

pub use content_processing::ContentProcessor;
pub use recommendations::{RecommendationService, ALGORITHM_VERSION};
pub use scoring::{build_interest_vector, RecommendationScorer};
