//! Contract for the external generative-feedback service.
//!
//! The core consumes this, it does not implement it: screens ask for
//! teacher-style feedback text and render a fallback string when the model
//! is unavailable. One attempt per user-triggered action, no retries.
//! Image generation is an opaque blob on the screen side and has no
//! contract here.

use std::future::Future;

/// The model could not be reached or produced no text. Callers treat this
/// as non-fatal and render a fallback string.
#[derive(Debug, thiserror::Error)]
#[error("generative model unavailable: {0}")]
pub struct AiUnavailable(pub String);

/// Text generation operations the screens rely on.
pub trait FeedbackModel: Send + Sync {
    /// Warm, teacher-style feedback on a student's reflection, given the
    /// recent grade trend.
    fn teacher_feedback(
        &self,
        reflection: &str,
        grade_trend: &str,
    ) -> impl Future<Output = Result<String, AiUnavailable>> + Send;

    /// One-sentence motivational slogan for the student's current
    /// challenges.
    fn challenge_slogan(
        &self,
        titles: &[String],
    ) -> impl Future<Output = Result<String, AiUnavailable>> + Send;

    /// One-sentence summary of a reflection for the teacher dashboard.
    fn summarize_reflection(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<String, AiUnavailable>> + Send;
}

/// Model used when no API key is configured: every call reports
/// unavailable, which screens render as their built-in fallback copy.
pub struct OfflineModel;

impl FeedbackModel for OfflineModel {
    async fn teacher_feedback(&self, _: &str, _: &str) -> Result<String, AiUnavailable> {
        Err(AiUnavailable("no API key configured".to_string()))
    }

    async fn challenge_slogan(&self, _: &[String]) -> Result<String, AiUnavailable> {
        Err(AiUnavailable("no API key configured".to_string()))
    }

    async fn summarize_reflection(&self, _: &str) -> Result<String, AiUnavailable> {
        Err(AiUnavailable("no API key configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn offline_model_is_always_unavailable() {
        let model = OfflineModel;
        assert!(model.teacher_feedback("회고", "상승세").await.is_err());
        assert!(model.challenge_slogan(&[]).await.is_err());
        assert!(model.summarize_reflection("text").await.is_err());
    }
}
