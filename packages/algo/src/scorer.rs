//! Frozen recall scorer.
//!
//! A small feed-forward network (ReLU hidden layers, linear scalar head)
//! that estimates the probability a learner can correctly translate a word,
//! given their interaction history with it. The network is trained offline;
//! this module only loads the versioned artifact and runs the forward pass.
//!
//! The feature vector has [`INPUT_FEATURES`] dimensions: the trace's delta
//! and four interaction counters, each standardized with mean/std pairs
//! fixed at training time, followed by the [`EMBEDDING_DIM`]-dimensional
//! embedding of the readable word. The embedding vocabulary is closed:
//! scoring a word outside it is an error, never a silent default.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Dimensionality of the word embeddings in the shipped artifact.
pub const EMBEDDING_DIM: usize = 5;

/// Interaction features preceding the embedding: delta, seen, interacted,
/// tested, correct.
pub const INTERACTION_FEATURES: usize = 5;

/// Total input dimensionality of the network.
pub const INPUT_FEATURES: usize = INTERACTION_FEATURES + EMBEDDING_DIM;

/// Mean/standard-deviation pair for one standardized feature.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeatureScaling {
    pub mean: f64,
    pub std: f64,
}

impl FeatureScaling {
    fn standardize(&self, value: f64) -> f64 {
        (value - self.mean) / self.std
    }
}

/// Scaling pairs for the five interaction features, fixed at training time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalingTable {
    pub delta: FeatureScaling,
    pub seen: FeatureScaling,
    pub interacted: FeatureScaling,
    pub tested: FeatureScaling,
    pub correct: FeatureScaling,
}

/// One dense layer: `weights[out][in]`, `biases[out]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
}

impl DenseLayer {
    fn output_dim(&self) -> usize {
        self.biases.len()
    }

    fn forward(&self, input: &[f64], relu: bool) -> Vec<f64> {
        self.weights
            .iter()
            .zip(self.biases.iter())
            .map(|(row, bias)| {
                let sum: f64 = row.iter().zip(input.iter()).map(|(w, x)| w * x).sum::<f64>() + bias;
                if relu {
                    sum.max(0.0)
                } else {
                    sum
                }
            })
            .collect()
    }
}

/// On-disk scorer artifact: versioned, produced by offline training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerArtifact {
    pub version: String,
    pub embedding_dim: usize,
    /// Closed vocabulary of readable words to their embeddings.
    pub vocabulary: HashMap<String, Vec<f64>>,
    pub scaling: ScalingTable,
    /// Hidden layers (ReLU) followed by the linear output layer.
    pub layers: Vec<DenseLayer>,
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid artifact: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ScorerError {
    #[error("word not in scorer vocabulary: {0:?}")]
    OutOfVocabulary(String),
}

/// Feature inputs extracted from one trace record.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceFeatures {
    /// The rendering the learner actually sees, looked up in the closed
    /// vocabulary.
    pub readable_word: String,
    /// Seconds since the previous interaction with this word.
    pub delta_secs: f64,
    pub seen: u32,
    pub interacted: u32,
    pub tested: u32,
    pub correct: u32,
}

/// The frozen scorer: weights loaded once, read-only afterwards.
#[derive(Debug, Clone)]
pub struct RecallScorer {
    version: String,
    embedding_dim: usize,
    vocabulary: HashMap<String, Vec<f64>>,
    scaling: ScalingTable,
    layers: Vec<DenseLayer>,
}

impl RecallScorer {
    /// Validates and adopts an artifact.
    pub fn from_artifact(artifact: ScorerArtifact) -> Result<Self, ArtifactError> {
        let ScorerArtifact {
            version,
            embedding_dim,
            vocabulary,
            scaling,
            layers,
        } = artifact;

        if layers.is_empty() {
            return Err(ArtifactError::Invalid("no layers".into()));
        }

        let mut expected_in = INTERACTION_FEATURES + embedding_dim;
        for (i, layer) in layers.iter().enumerate() {
            if layer.weights.len() != layer.biases.len() {
                return Err(ArtifactError::Invalid(format!(
                    "layer {i}: {} weight rows but {} biases",
                    layer.weights.len(),
                    layer.biases.len()
                )));
            }
            for row in &layer.weights {
                if row.len() != expected_in {
                    return Err(ArtifactError::Invalid(format!(
                        "layer {i}: expected input width {expected_in}, found row of {}",
                        row.len()
                    )));
                }
            }
            expected_in = layer.output_dim();
        }
        if expected_in != 1 {
            return Err(ArtifactError::Invalid(format!(
                "output layer must be scalar, found width {expected_in}"
            )));
        }

        for (word, embedding) in &vocabulary {
            if embedding.len() != embedding_dim {
                return Err(ArtifactError::Invalid(format!(
                    "embedding for {word:?} has {} dims, expected {embedding_dim}",
                    embedding.len()
                )));
            }
        }

        for (name, pair) in [
            ("delta", scaling.delta),
            ("seen", scaling.seen),
            ("interacted", scaling.interacted),
            ("tested", scaling.tested),
            ("correct", scaling.correct),
        ] {
            if !(pair.std > 0.0) || !pair.std.is_finite() || !pair.mean.is_finite() {
                return Err(ArtifactError::Invalid(format!(
                    "scaling for {name} must have finite mean and positive std"
                )));
            }
        }

        Ok(Self {
            version,
            embedding_dim,
            vocabulary,
            scaling,
            layers,
        })
    }

    /// Loads and validates an artifact from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let raw = std::fs::read_to_string(path)?;
        let artifact: ScorerArtifact = serde_json::from_str(&raw)?;
        Self::from_artifact(artifact)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn knows(&self, readable_word: &str) -> bool {
        self.vocabulary.contains_key(readable_word)
    }

    /// Predicted probability of correct recall, in `[0, 1]`.
    ///
    /// Deterministic in its inputs. Fails hard on out-of-vocabulary words.
    pub fn score(&self, features: &TraceFeatures) -> Result<f64, ScorerError> {
        let embedding = self
            .vocabulary
            .get(&features.readable_word)
            .ok_or_else(|| ScorerError::OutOfVocabulary(features.readable_word.clone()))?;

        let mut x = Vec::with_capacity(INTERACTION_FEATURES + self.embedding_dim);
        x.push(self.scaling.delta.standardize(features.delta_secs));
        x.push(self.scaling.seen.standardize(features.seen as f64));
        x.push(self.scaling.interacted.standardize(features.interacted as f64));
        x.push(self.scaling.tested.standardize(features.tested as f64));
        x.push(self.scaling.correct.standardize(features.correct as f64));
        x.extend_from_slice(embedding);

        let last = self.layers.len() - 1;
        for (i, layer) in self.layers.iter().enumerate() {
            x = layer.forward(&x, i != last);
        }

        // The network head is linear; clamp into probability range.
        Ok(x[0].clamp(0.0, 1.0))
    }
}
