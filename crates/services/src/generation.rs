use std::env;
use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::Value;

use levelup_core::model::{GameMode, RawQuestion};

use crate::error::GenerationError;

/// Question counts offered on the upload screen.
pub const COUNT_OPTIONS: [u32; 3] = [5, 10, 15];
pub const DEFAULT_COUNT: u32 = 5;

const SERVER_ERROR: &str = "Server Error";

//
// ─── REQUEST ───────────────────────────────────────────────────────────────────
//

/// Study material uploaded by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct MaterialFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl MaterialFile {
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

impl fmt::Debug for MaterialFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterialFile")
            .field("name", &self.name)
            .field("bytes_len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub file: MaterialFile,
    pub mode: GameMode,
    pub count: u32,
}

impl GenerationRequest {
    #[must_use]
    pub fn new(file: MaterialFile, mode: GameMode) -> Self {
        Self {
            file,
            mode,
            count: DEFAULT_COUNT,
        }
    }

    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }
}

//
// ─── SOURCES ───────────────────────────────────────────────────────────────────
//

/// Anything that can turn study material into raw question records.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Generate raw question records for `request`.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` when the source is unavailable or returns no
    /// usable questions.
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<RawQuestion>, GenerationError>;
}

#[derive(Clone, Debug)]
pub struct GenerationConfig {
    pub backend_url: String,
}

impl GenerationConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let backend_url = env::var("LEVELUP_BACKEND_URL").ok()?;
        if backend_url.trim().is_empty() {
            return None;
        }
        Some(Self { backend_url })
    }
}

/// Posts the material to `{backend}/api/generate` as multipart form data.
#[derive(Clone)]
pub struct HttpQuestionSource {
    client: Client,
    config: Option<GenerationConfig>,
}

impl HttpQuestionSource {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GenerationConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<GenerationConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl QuestionSource for HttpQuestionSource {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<RawQuestion>, GenerationError> {
        let config = self
            .config
            .as_ref()
            .ok_or(GenerationError::NotConfigured)?;

        let url = format!(
            "{}/api/generate",
            config.backend_url.trim_end_matches('/')
        );
        let file = Part::bytes(request.file.bytes.clone()).file_name(request.file.name.clone());
        let form = Form::new()
            .part("file", file)
            .text("mode", request.mode.label().to_string())
            .text("count", request.count.to_string());

        tracing::info!(%url, mode = %request.mode, count = request.count, "requesting questions");
        let response = self.client.post(url).multipart(form).send().await?;
        let success = response.status().is_success();
        let body = response.bytes().await?;

        interpret_response(success, &body)
    }
}

/// Serves a fixed question set, for offline play and tests.
#[derive(Clone, Debug, Default)]
pub struct StaticQuestionSource {
    records: Vec<RawQuestion>,
}

impl StaticQuestionSource {
    #[must_use]
    pub fn new(records: Vec<RawQuestion>) -> Self {
        Self { records }
    }

    /// Accepts either a bare array of records or a `{"questions": [...]}`
    /// body.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` when the text is not JSON or holds no
    /// questions.
    pub fn from_json(text: &str) -> Result<Self, GenerationError> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_array() {
            return Ok(Self::new(interpret_response(true, text.as_bytes())?));
        }
        let records: Vec<RawQuestion> = serde_json::from_value(value)?;
        if records.is_empty() {
            return Err(GenerationError::EmptyQuestions);
        }
        Ok(Self { records })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl QuestionSource for StaticQuestionSource {
    async fn generate(
        &self,
        _request: &GenerationRequest,
    ) -> Result<Vec<RawQuestion>, GenerationError> {
        if self.records.is_empty() {
            return Err(GenerationError::EmptyQuestions);
        }
        Ok(self.records.clone())
    }
}

//
// ─── RESPONSE ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Deserialize)]
struct SuccessBody {
    questions: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Map a generation response to raw records.
///
/// # Errors
///
/// A failed status yields `Server` with the body's `error` field, or
/// "Server Error" when absent. A success without a non-empty `questions`
/// array yields `EmptyQuestions`.
pub fn interpret_response(success: bool, body: &[u8]) -> Result<Vec<RawQuestion>, GenerationError> {
    if !success {
        let message = serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.error)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| SERVER_ERROR.to_string());
        return Err(GenerationError::Server(message));
    }

    let parsed: SuccessBody = serde_json::from_slice(body)?;
    match parsed.questions {
        Some(questions @ Value::Array(_)) => {
            let records: Vec<RawQuestion> = serde_json::from_value(questions)?;
            if records.is_empty() {
                return Err(GenerationError::EmptyQuestions);
            }
            Ok(records)
        }
        _ => Err(GenerationError::EmptyQuestions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_body_yields_records_in_order() {
        let body = br#"{"questions":[{"question":"one"},{"question":"two"}]}"#;
        let records = interpret_response(true, body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].as_value()["question"], "two");
    }

    #[test]
    fn empty_or_missing_questions_are_rejected() {
        let bodies: [&[u8]; 3] = [br#"{"questions":[]}"#, br#"{}"#, br#"{"questions":"nope"}"#];
        for body in bodies {
            let err = interpret_response(true, body).unwrap_err();
            assert!(matches!(err, GenerationError::EmptyQuestions));
            assert_eq!(
                err.user_message(),
                "Generation failed: AI returned empty or invalid questions."
            );
        }
    }

    #[test]
    fn failure_uses_error_field() {
        let err = interpret_response(false, br#"{"error":"quota exceeded"}"#).unwrap_err();
        assert_eq!(err.user_message(), "Generation failed: quota exceeded");
    }

    #[test]
    fn failure_without_error_field_is_generic() {
        let err = interpret_response(false, b"<html>bad gateway</html>").unwrap_err();
        assert_eq!(err.user_message(), "Generation failed: Server Error");
    }

    #[test]
    fn unparseable_success_body_is_an_error() {
        let err = interpret_response(true, b"not json").unwrap_err();
        assert!(matches!(err, GenerationError::InvalidBody(_)));
    }

    #[test]
    fn static_source_accepts_both_shapes() {
        let bare =
            StaticQuestionSource::from_json(r#"[{"question":"a","choices":["x",2]}]"#).unwrap();
        assert_eq!(bare.len(), 1);
        assert_eq!(bare.records[0].as_value()["choices"][1], 2);

        let wrapped =
            StaticQuestionSource::from_json(r#"{"questions":[{"question":"a"},{"question":"b"}]}"#)
                .unwrap();
        assert_eq!(wrapped.len(), 2);

        assert!(StaticQuestionSource::from_json("[]").is_err());
    }

    #[tokio::test]
    async fn disabled_http_source_reports_not_configured() {
        let source = HttpQuestionSource::new(None);
        assert!(!source.enabled());
        let request = GenerationRequest::new(
            MaterialFile::new("notes.txt", b"cells".to_vec()),
            GameMode::QuizChallenge,
        );
        let err = source.generate(&request).await.unwrap_err();
        assert!(matches!(err, GenerationError::NotConfigured));
    }
}
