#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use glossa_algo::scorer::{
    DenseLayer, FeatureScaling, RecallScorer, ScalingTable, ScorerArtifact, EMBEDDING_DIM,
    INPUT_FEATURES,
};
use glossa_backend::models::{ForeignLanguage, LearningUnit};
use glossa_backend::state::AppState;
use glossa_backend::store::LearningStore;
use uuid::Uuid;

pub const WORDS: &[(&str, &str)] = &[
    ("bird", "fågel"),
    ("cat", "katt"),
    ("dog", "hund"),
    ("fish", "fisk"),
    ("fox", "räv"),
    ("horse", "häst"),
    ("mouse", "mus"),
    ("wolf", "varg"),
];

/// Deterministic scorer over the test vocabulary: output tracks the
/// standardized `correct` counter only.
pub fn test_scorer() -> Arc<RecallScorer> {
    let id = FeatureScaling {
        mean: 0.0,
        std: 1.0,
    };
    let mut weights = vec![0.0; INPUT_FEATURES];
    weights[4] = 0.01;
    let artifact = ScorerArtifact {
        version: "test-fixture".to_string(),
        embedding_dim: EMBEDDING_DIM,
        vocabulary: WORDS
            .iter()
            .map(|(_, foreign)| (foreign.to_string(), vec![0.0; EMBEDDING_DIM]))
            .collect::<HashMap<_, _>>(),
        scaling: ScalingTable {
            delta: id,
            seen: id,
            interacted: id,
            tested: id,
            correct: id,
        },
        layers: vec![DenseLayer {
            weights: vec![weights],
            biases: vec![0.5],
        }],
    };
    Arc::new(RecallScorer::from_artifact(artifact).unwrap())
}

/// Store seeded with Swedish and the fixture vocabulary.
pub async fn seeded_store() -> (Arc<LearningStore>, Vec<LearningUnit>) {
    let store = Arc::new(LearningStore::new());
    store
        .insert_language(ForeignLanguage {
            key: "sv".to_string(),
            english_name: "Swedish".to_string(),
            uses_latin_script: true,
        })
        .await;

    let mut units = Vec::new();
    for (english, foreign) in WORDS {
        let unit = LearningUnit {
            id: Uuid::new_v4(),
            english_word: english.to_string(),
            foreign_word: foreign.to_string(),
            pronunciation: None,
            language_key: "sv".to_string(),
            synonyms: Vec::new(),
        };
        store.insert_unit(unit.clone()).await;
        units.push(unit);
    }

    (store, units)
}

pub async fn create_test_app() -> (axum::Router, Vec<LearningUnit>) {
    let (store, units) = seeded_store().await;
    let state = AppState::new(store, test_scorer());
    (glossa_backend::create_app(state), units)
}
