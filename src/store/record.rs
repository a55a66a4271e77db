//! Data structures for the persisted collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Identification;

/// A saved identification in the collection.
///
/// Carries every identification field plus a store-assigned unique `id` and
/// the caller-supplied find metadata. The `id` is assigned at insert time and
/// is never chosen by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MushroomRecord {
    /// Unique id, assigned by the store, monotonically increasing.
    pub id: u64,
    /// Species or genus name.
    pub name: String,
    /// Short description of the species.
    pub desc: String,
    /// Where the species typically occurs.
    pub region: String,
    /// Safety classification.
    pub edibility: String,
    /// Model confidence in the range 0.0..=1.0.
    pub confidence: f64,
    /// Where the specimen was found, if the caller said.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// When the specimen was found, if the caller said.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_on: Option<String>,
    /// When the record was saved.
    pub saved_at: DateTime<Utc>,
}

/// A record as supplied by the caller, before the store assigns an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Species or genus name.
    pub name: String,
    /// Short description of the species.
    pub desc: String,
    /// Where the species typically occurs.
    pub region: String,
    /// Safety classification.
    pub edibility: String,
    /// Model confidence in the range 0.0..=1.0.
    pub confidence: f64,
    /// Where the specimen was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// When the specimen was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub found_on: Option<String>,
}

impl Observation {
    /// Wrap a classifier result for saving.
    #[must_use]
    pub fn from_identification(identification: Identification) -> Self {
        Self {
            name: identification.name,
            desc: identification.desc,
            region: identification.region,
            edibility: identification.edibility,
            confidence: identification.confidence,
            location: None,
            found_on: None,
        }
    }

    /// Attach where the specimen was found.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Attach when the specimen was found.
    #[must_use]
    pub fn with_found_on(mut self, found_on: impl Into<String>) -> Self {
        self.found_on = Some(found_on.into());
        self
    }

    /// Turn into a record with the given store-assigned id.
    #[must_use]
    pub fn into_record(self, id: u64) -> MushroomRecord {
        MushroomRecord {
            id,
            name: self.name,
            desc: self.desc,
            region: self.region,
            edibility: self.edibility,
            confidence: self.confidence,
            location: self.location,
            found_on: self.found_on,
            saved_at: Utc::now(),
        }
    }
}
