use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use url::Url;

use mastery_core::model::{
    AnsweredQuestions, AssessmentQuestion, FileRef, LevelData, LevelId, MainContentSource,
};

use super::{ContentService, PriorSubmission};
use crate::error::ContentServiceError;

#[derive(Clone, Debug)]
pub struct ContentServiceConfig {
    pub base_url: Url,
    pub api_key: Option<String>,
}

impl ContentServiceConfig {
    /// Build a config, normalising `base_url` so relative endpoints join under it.
    ///
    /// # Errors
    ///
    /// Returns `ContentServiceError::InvalidUrl` if `base_url` is not absolute.
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, ContentServiceError> {
        let trimmed = base_url.trim();
        let with_slash = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };
        let base_url =
            Url::parse(&with_slash).map_err(|err| ContentServiceError::InvalidUrl(err.to_string()))?;
        Ok(Self {
            base_url,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }

    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("MASTERY_CONTENT_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let api_key = env::var("MASTERY_CONTENT_API_KEY").ok();
        match Self::new(&base_url, api_key) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(%err, "ignoring MASTERY_CONTENT_URL");
                None
            }
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ContentServiceError> {
        self.base_url
            .join(path)
            .map_err(|err| ContentServiceError::InvalidUrl(err.to_string()))
    }
}

/// HTTP client for the content service.
#[derive(Clone)]
pub struct HttpContentService {
    client: Client,
    config: Option<ContentServiceConfig>,
}

impl HttpContentService {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ContentServiceConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<ContentServiceConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    async fn post<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<String, ContentServiceError> {
        let config = self.config.as_ref().ok_or(ContentServiceError::Disabled)?;
        let url = config.endpoint(path)?;

        let mut request = self.client.post(url).json(body);
        if let Some(key) = config.api_key.as_deref() {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(ContentServiceError::HttpStatus(response.status()));
        }

        Ok(response.text().await?)
    }
}

#[derive(Debug, Serialize)]
struct FetchLevelRequest<'a> {
    uploaded_files: &'a [FileRef],
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_questionnaire: Option<&'a PriorSubmission>,
}

#[derive(Debug, Serialize)]
struct SubmitAnswersRequest<'a> {
    questions: &'a [AssessmentQuestion],
    answers: &'a AnsweredQuestions,
    uploaded_files: &'a [FileRef],
}

fn decode_level(level_id: LevelId, body: &str) -> Result<LevelData, ContentServiceError> {
    let level: LevelData =
        serde_json::from_str(body).map_err(|err| ContentServiceError::Decode(err.to_string()))?;

    match level.main_content_source {
        MainContentSource::Misspelled => {
            tracing::warn!(%level_id, "content service sent `main_conent_md`; accepted, please fix upstream");
        }
        MainContentSource::Missing => {
            tracing::debug!(%level_id, "level has no main content");
        }
        MainContentSource::Canonical => {}
    }
    if level_id.value() > 0 && level.feedback_md.is_none() {
        tracing::warn!(%level_id, "level is missing feedback_md");
    }

    Ok(level)
}

#[async_trait]
impl ContentService for HttpContentService {
    async fn fetch_level(
        &self,
        level_id: LevelId,
        uploaded_files: &[FileRef],
        prior: Option<&PriorSubmission>,
    ) -> Result<LevelData, ContentServiceError> {
        tracing::debug!(
            %level_id,
            files = uploaded_files.len(),
            with_prior = prior.is_some(),
            "fetching level"
        );
        let body = FetchLevelRequest {
            uploaded_files,
            previous_questionnaire: prior,
        };
        let raw = self.post(&format!("levels/{level_id}"), &body).await?;
        decode_level(level_id, &raw)
    }

    async fn submit_answers(
        &self,
        level_id: LevelId,
        questions: &[AssessmentQuestion],
        answers: &AnsweredQuestions,
        uploaded_files: &[FileRef],
    ) -> Result<(), ContentServiceError> {
        tracing::debug!(
            %level_id,
            answered = answers.len(),
            files = uploaded_files.len(),
            "submitting answers"
        );
        let body = SubmitAnswersRequest {
            questions,
            answers,
            uploaded_files,
        };
        self.post(&format!("levels/{level_id}/answers"), &body)
            .await
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_joins_endpoints_under_base_path() {
        let config = ContentServiceConfig::new("https://example.test/api", None).unwrap();
        let url = config.endpoint("levels/3").unwrap();
        assert_eq!(url.as_str(), "https://example.test/api/levels/3");
    }

    #[test]
    fn config_rejects_relative_url() {
        let err = ContentServiceConfig::new("not a url", None).unwrap_err();
        assert!(matches!(err, ContentServiceError::InvalidUrl(_)));
    }

    #[test]
    fn blank_api_key_is_dropped() {
        let config = ContentServiceConfig::new("http://localhost:8000/", Some("  ".into())).unwrap();
        assert!(config.api_key.is_none());
    }

    #[tokio::test]
    async fn disabled_service_refuses_requests() {
        let service = HttpContentService::new(None);
        assert!(!service.enabled());
        let err = service
            .fetch_level(LevelId::OVERVIEW, &[], None)
            .await
            .unwrap_err();
        assert!(matches!(err, ContentServiceError::Disabled));
    }

    #[test]
    fn decode_reports_bad_body() {
        let err = decode_level(LevelId::OVERVIEW, "<html>").unwrap_err();
        assert!(matches!(err, ContentServiceError::Decode(_)));
    }

    #[test]
    fn fetch_body_omits_prior_for_overview() {
        let body = FetchLevelRequest {
            uploaded_files: &[],
            previous_questionnaire: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"uploaded_files": []}));
    }
}
