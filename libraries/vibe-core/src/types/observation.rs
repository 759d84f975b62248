/// Observation domain types
use super::{CatalogTrack, ObservationId, RecommendedTrack, UserId};
use crate::error::{Result, VibeError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification confidence, always within `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Confidence(f64);

impl Confidence {
    /// Certainty used when a manual entry omits the confidence
    pub const CERTAIN: Self = Self(1.0);

    /// Validate a caller-supplied value
    ///
    /// # Errors
    /// Returns `ConfidenceOutOfRange` for values outside `[0, 1]` and for NaN
    pub fn new(value: f64) -> Result<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(VibeError::ConfidenceOutOfRange(value))
        }
    }

    /// Clamp a model-produced value into range (NaN becomes 0)
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    /// Raw value
    pub fn value(self) -> f64 {
        self.0
    }
}

impl<'de> Deserialize<'de> for Confidence {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Confidence::new(value).map_err(serde::de::Error::custom)
    }
}

/// Where an observation's label came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObservationSource {
    /// Classified from an uploaded image
    Image,
    /// Supplied directly by the user
    Manual,
}

impl ObservationSource {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Manual => "manual",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "image" => Some(Self::Image),
            "manual" => Some(Self::Manual),
            _ => None,
        }
    }
}

impl std::fmt::Display for ObservationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A persisted emotion observation with its recommended tracks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub id: ObservationId,

    #[serde(skip)]
    pub user_id: UserId,

    /// Emotion label name
    pub emotion: String,

    pub confidence: f64,

    pub source: ObservationSource,

    /// User agreement with the classification, if given
    pub feedback: Option<bool>,

    /// Catalog collection the tracks were drawn from
    pub collection_id: Option<String>,

    pub timestamp: DateTime<Utc>,

    pub tracks: Vec<RecommendedTrack>,
}

/// Data required to persist a new observation
#[derive(Debug, Clone)]
pub struct CreateObservation {
    pub user_id: UserId,

    /// Reference table row id of the resolved label
    pub emotion_type_id: i64,

    pub confidence: Confidence,

    pub source: ObservationSource,

    pub collection_id: Option<String>,

    pub recorded_at: DateTime<Utc>,

    /// Written in order, positions start at 0
    pub tracks: Vec<CatalogTrack>,
}
