//! Catalog seeding.
//!
//! Loads the language/unit catalog from a JSON file at startup. Catalog
//! management beyond seeding belongs to the surrounding application.

use std::path::Path;

use serde::Deserialize;
use uuid::Uuid;

use crate::models::{ForeignLanguage, LearningUnit};
use crate::store::LearningStore;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unit {english_word:?} references unknown language {language_key:?}")]
    UnknownLanguage {
        english_word: String,
        language_key: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CatalogFile {
    languages: Vec<ForeignLanguage>,
    units: Vec<UnitSeed>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnitSeed {
    #[serde(default = "Uuid::new_v4")]
    id: Uuid,
    english_word: String,
    foreign_word: String,
    #[serde(default)]
    pronunciation: Option<String>,
    language_key: String,
    #[serde(default)]
    synonyms: Vec<String>,
}

/// Loads a catalog file into the store. Returns (languages, units) counts.
pub async fn load_catalog(
    store: &LearningStore,
    path: impl AsRef<Path>,
) -> Result<(usize, usize), SeedError> {
    let raw = tokio::fs::read_to_string(path).await?;
    let catalog: CatalogFile = serde_json::from_str(&raw)?;

    for unit in &catalog.units {
        if !catalog
            .languages
            .iter()
            .any(|language| language.key == unit.language_key)
        {
            return Err(SeedError::UnknownLanguage {
                english_word: unit.english_word.clone(),
                language_key: unit.language_key.clone(),
            });
        }
    }

    let languages = catalog.languages.len();
    let units = catalog.units.len();

    for language in catalog.languages {
        store.insert_language(language).await;
    }
    for seed in catalog.units {
        store
            .insert_unit(LearningUnit {
                id: seed.id,
                english_word: seed.english_word,
                foreign_word: seed.foreign_word,
                pronunciation: seed.pronunciation,
                language_key: seed.language_key,
                synonyms: seed.synonyms,
            })
            .await;
    }

    Ok((languages, units))
}
