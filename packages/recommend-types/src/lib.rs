//! Shared value types for the Resonance recommendation engine.
//!
//! Kept dependency-free of any particular index/storage implementation so
//! every crate in the workspace (artifact loading, the audio and lyrics
//! indices, the model registry, strategies, and the facade) can share one
//! definition of a track id, a variant descriptor, and a recommendation.

mod family;
mod filter;
mod preprocessing;
mod recommendation;
mod request;
mod similarity;
mod strategy;
mod track_id;
mod track_record;
mod variant;

pub use family::Family;
pub use filter::FilterSpec;
pub use preprocessing::{PreprocessingRecipe, DEFAULT_STOPWORDS};
pub use recommendation::Recommendation;
pub use request::{Request, Response, VariantIds};
pub use similarity::{Metric, SimilarityMethod};
pub use strategy::{Strategy, UnknownStrategy};
pub use track_id::{TrackId, TrackIdError};
pub use track_record::{AudioFeatureSummary, TrackRecord};
pub use variant::VariantDescriptor;
