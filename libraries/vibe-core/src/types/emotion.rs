/// Emotion reference data and label resolution
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label substituted when classifier output is not in the reference table
pub const DEFAULT_EMOTION: &str = "neutral";

/// A row of the emotion reference table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionType {
    /// Row id
    pub id: i64,

    /// Machine name (`happy`, `sad`, ...), unique
    pub name: String,

    /// Human readable name
    pub display_name: String,

    /// Optional longer description
    pub description: Option<String>,

    /// When the label was added
    pub created_at: DateTime<Utc>,
}

/// Outcome of mapping a candidate label onto the reference table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LabelResolution {
    /// The candidate label exists as-is
    Resolved(EmotionType),
    /// The candidate was unknown and the default label was used instead
    DefaultedTo(EmotionType),
}

impl LabelResolution {
    /// The label that will be persisted
    pub fn emotion(&self) -> &EmotionType {
        match self {
            Self::Resolved(e) | Self::DefaultedTo(e) => e,
        }
    }

    /// Consume the resolution, keeping only the label
    pub fn into_emotion(self) -> EmotionType {
        match self {
            Self::Resolved(e) | Self::DefaultedTo(e) => e,
        }
    }

    /// Whether the fallback label was substituted
    pub fn is_defaulted(&self) -> bool {
        matches!(self, Self::DefaultedTo(_))
    }

    /// Wire tag used in API responses
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resolved(_) => "resolved",
            Self::DefaultedTo(_) => "defaulted",
        }
    }
}
