//! HTTP adapter for the external face/emotion inference service.
//!
//! The service receives raw image bytes at `POST {base_url}/analyze` and
//! answers with one entry per detected face:
//!
//! ```json
//! [{"dominant_emotion": "happy", "emotion": {"happy": 97.1, "sad": 0.4}}]
//! ```

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};
use vibe_core::{Classification, ClassificationError, Confidence, EmotionClassifier};

/// Map the model's vocabulary onto system labels
///
/// Returns `None` for labels the system does not know; callers resolve those
/// to the default label.
pub fn normalize_label(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "happy" => Some("happy"),
        "sad" => Some("sad"),
        "angry" => Some("angry"),
        "fear" => Some("fear"),
        "surprise" => Some("surprised"),
        "disgust" => Some("disgust"),
        "neutral" => Some("neutral"),
        _ => None,
    }
}

#[derive(Debug, Deserialize)]
struct FaceAnalysis {
    dominant_emotion: String,
    emotion: HashMap<String, f64>,
}

/// The service returns a bare object for a single face on some versions
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnalyzeResponse {
    Many(Vec<FaceAnalysis>),
    One(FaceAnalysis),
}

impl AnalyzeResponse {
    fn first_face(self) -> Option<FaceAnalysis> {
        match self {
            Self::Many(faces) => faces.into_iter().next(),
            Self::One(face) => Some(face),
        }
    }
}

/// Emotion classifier backed by a remote inference service
pub struct HttpEmotionClassifier {
    http: Client,
    base_url: String,
}

impl HttpEmotionClassifier {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> reqwest::Result<Self> {
        let mut builder = Client::builder().user_agent(format!(
            "VibeTuner/{} (Server)",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl EmotionClassifier for HttpEmotionClassifier {
    async fn classify(&self, image: &[u8]) -> Result<Classification, ClassificationError> {
        let kind = infer::get(image).ok_or(ClassificationError::NotAnImage)?;
        if kind.matcher_type() != infer::MatcherType::Image {
            return Err(ClassificationError::NotAnImage);
        }

        let url = format!("{}/analyze", self.base_url);
        debug!(url = %url, mime = kind.mime_type(), bytes = image.len(), "Classifying image");

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, kind.mime_type())
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| ClassificationError::Unavailable(e.to_string()))?;

        let status = response.status();
        // The service answers 400/422 when it cannot find a face
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Err(ClassificationError::NoFace);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Classifier returned an error");
            return Err(ClassificationError::Unavailable(format!("HTTP {status}")));
        }

        let body: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| ClassificationError::InvalidResponse(e.to_string()))?;

        let face = body.first_face().ok_or(ClassificationError::NoFace)?;
        let score = face.emotion.get(&face.dominant_emotion).ok_or_else(|| {
            ClassificationError::InvalidResponse(format!(
                "no score for dominant emotion {:?}",
                face.dominant_emotion
            ))
        })?;

        Ok(Classification {
            raw_label: face.dominant_emotion,
            confidence: score_to_confidence(*score),
        })
    }
}

/// Percentage score to a confidence rounded to three decimals
fn score_to_confidence(percent: f64) -> Confidence {
    Confidence::clamped((percent / 100.0 * 1000.0).round() / 1000.0)
}
