mod analytics;
mod catalog;
mod emotion;
mod ids;
mod observation;
mod user;

pub use analytics::{DailyBreakdown, Distribution, HourlyBreakdown};
pub use catalog::{CatalogTrack, CuratedCollection, FallbackReason, RecommendedTrack, TrackSelection};
pub use emotion::{EmotionType, LabelResolution, DEFAULT_EMOTION};
pub use ids::{ObservationId, UserId};
pub use observation::{Confidence, CreateObservation, Observation, ObservationSource};
pub use user::User;
