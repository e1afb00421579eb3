use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::queue::PlayQueueItem;

use super::ContentError;

/// Top-level list of content categories.
///
/// Read from `categories`, or from `items` when `categories` is not a list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct Catalog {
    pub categories: Vec<Category>,
}

#[derive(Deserialize)]
struct RawCatalog {
    categories: Option<Value>,
    items: Option<Value>,
}

impl TryFrom<RawCatalog> for Catalog {
    type Error = serde_json::Error;

    fn try_from(raw: RawCatalog) -> Result<Self, Self::Error> {
        Ok(Self {
            categories: first_list(raw.categories, raw.items)?,
        })
    }
}

/// Decode the first of two candidate fields that holds an array.
fn first_list<T: DeserializeOwned>(
    primary: Option<Value>,
    fallback: Option<Value>,
) -> Result<Vec<T>, serde_json::Error> {
    let list = match (primary, fallback) {
        (Some(list @ Value::Array(_)), _) => list,
        (_, Some(list @ Value::Array(_))) => list,
        _ => return Ok(Vec::new()),
    };
    serde_json::from_value(list)
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }
}

/// A content category. `id` falls back to `category_id` when missing or empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCategory")]
pub struct Category {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_zh: Option<String>,
    #[serde(default)]
    pub estimated_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest: Option<String>,
}

#[derive(Deserialize)]
struct RawCategory {
    id: Option<String>,
    category_id: Option<String>,
    name: Option<String>,
    name_zh: Option<String>,
    #[serde(default)]
    estimated_count: u32,
    manifest: Option<String>,
}

impl From<RawCategory> for Category {
    fn from(raw: RawCategory) -> Self {
        Self {
            id: raw
                .id
                .filter(|id| !id.is_empty())
                .or(raw.category_id)
                .unwrap_or_default(),
            name: raw.name,
            name_zh: raw.name_zh,
            estimated_count: raw.estimated_count,
            manifest: raw.manifest,
        }
    }
}

impl Category {
    /// The manifest path, defaulting to `/content/conversation/{id}/manifest.json`.
    pub fn manifest_path(&self) -> String {
        match &self.manifest {
            Some(path) if !path.is_empty() => path.clone(),
            _ => format!("/content/conversation/{}/manifest.json", self.id),
        }
    }
}

/// Per-category index of dialogues.
///
/// Items come from `items`, or from `dialogues` when `items` is not a list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawManifest")]
pub struct Manifest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name_zh: Option<String>,
    pub updated_at: String,
    pub items: Vec<ManifestItem>,
}

#[derive(Deserialize)]
struct RawManifest {
    category_id: Option<String>,
    category_name_zh: Option<String>,
    updated_at: Option<String>,
    items: Option<Value>,
    dialogues: Option<Value>,
}

impl TryFrom<RawManifest> for Manifest {
    type Error = serde_json::Error;

    fn try_from(raw: RawManifest) -> Result<Self, Self::Error> {
        Ok(Self {
            category_id: raw.category_id,
            category_name_zh: raw.category_name_zh,
            updated_at: raw.updated_at.unwrap_or_default(),
            items: first_list(raw.items, raw.dialogues)?,
        })
    }
}

impl Manifest {
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Queue entries for every item, in manifest order.
    pub fn queue_items(&self, category_id: &str) -> Vec<PlayQueueItem> {
        self.items
            .iter()
            .map(|item| PlayQueueItem::new(category_id, &item.id, &item.title_en, &item.path))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestItem {
    pub id: String,
    pub title_en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_zh: Option<String>,
    /// Difficulty as written by the content tooling, string or number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<Value>,
    #[serde(default)]
    pub estimated_duration_sec: u32,
    /// Number of speakers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speakers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub path: String,
}

/// A dialogue document referenced by [`ManifestItem::path`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dialogue {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_zh: Option<String>,
    #[serde(default)]
    pub turns: Vec<Turn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration_sec: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DialogueMetadata>,
}

impl Dialogue {
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Declared duration, from the document itself or its metadata.
    pub fn declared_duration_sec(&self) -> Option<f64> {
        self.estimated_duration_sec.or_else(|| {
            self.metadata
                .as_ref()
                .and_then(|m| m.estimated_duration_sec)
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DialogueMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_duration_sec: Option<f64>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// One line of a dialogue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// English text to speak; `null` reads as empty
    #[serde(default, deserialize_with = "null_as_empty")]
    pub en: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zh: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}
