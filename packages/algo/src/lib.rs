//! # glossa-algo - vocabulary testing core algorithms
//!
//! Pure algorithm library behind the Glossa learning-record engine:
//!
//! - **Similarity** - Damerau-Levenshtein edit distance and Jaro-Winkler
//!   similarity, shared by answer grading and word difficulty metrics
//! - **Recall scorer** - a frozen feed-forward network predicting the
//!   probability a learner can translate a word, loaded from a versioned
//!   artifact
//!
//! Design goals:
//! - **Pure Rust** - no async, no I/O beyond artifact deserialization
//! - **Deterministic** - the scorer is a frozen forward pass; identical
//!   inputs always produce identical scores
//! - **Reusable** - no coupling to the backend's store or HTTP types
//!
//! ## Modules
//!
//! - [`similarity`] - string metrics (edit distance, Jaro-Winkler)
//! - [`scorer`] - recall scorer, artifact format and feature scaling

pub mod scorer;
pub mod similarity;

pub use scorer::{
    ArtifactError, RecallScorer, ScorerArtifact, ScorerError, TraceFeatures, EMBEDDING_DIM,
    INPUT_FEATURES,
};
pub use similarity::{edit_distance, similarity};
