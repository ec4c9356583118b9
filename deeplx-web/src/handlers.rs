use crate::AppState;
use crate::error::ApiError;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use deeplx::jsonrpc::{AUTO_LANG, TranslateRequest, TranslationResult};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// `text` may be a single string or a list; only the first entry is translated
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    One(String),
    Many(Vec<String>),
}

impl Default for TextInput {
    fn default() -> Self {
        TextInput::One(String::new())
    }
}

impl TextInput {
    pub fn into_first(self) -> String {
        match self {
            TextInput::One(text) => text,
            TextInput::Many(texts) => texts.into_iter().next().unwrap_or_default(),
        }
    }
}

/// `tag_handling` accepts a flag or a mode name such as `"html"`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TagHandling {
    Flag(bool),
    Mode(String),
}

impl TagHandling {
    pub fn is_enabled(&self) -> bool {
        match self {
            TagHandling::Flag(flag) => *flag,
            TagHandling::Mode(mode) => !mode.is_empty(),
        }
    }
}

fn default_source_lang() -> String {
    AUTO_LANG.to_string()
}

fn default_target_lang() -> String {
    "en".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslateBody {
    #[serde(default)]
    pub text: TextInput,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    #[serde(default)]
    pub tag_handling: Option<TagHandling>,
}

impl TranslateBody {
    pub fn into_request(self) -> TranslateRequest {
        let tag_handling = self
            .tag_handling
            .as_ref()
            .is_some_and(TagHandling::is_enabled);
        TranslateRequest::new(self.text.into_first())
            .source_lang(self.source_lang)
            .target_lang(self.target_lang)
            .tag_handling(tag_handling)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TranslateResponse {
    pub alternatives: Vec<String>,
    pub code: u16,
    pub data: String,
    pub id: i64,
    pub method: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl From<TranslationResult> for TranslateResponse {
    fn from(result: TranslationResult) -> Self {
        Self {
            alternatives: result.alternatives,
            code: 200,
            data: result.data,
            id: result.id,
            method: result.method,
            source_lang: result.source_lang,
            target_lang: result.target_lang,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub code: u16,
    pub msg: &'static str,
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        code: 200,
        msg: "Go to /translate with POST.",
    })
}

pub async fn translate(
    State(state): State<AppState>,
    body: Result<Json<TranslateBody>, JsonRejection>,
) -> Result<Json<TranslateResponse>, ApiError> {
    let Json(body) = body.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    let request = body.into_request();

    info!(
        "Translating {} byte(s) {} → {}",
        request.text.len(),
        &request.source_lang,
        &request.target_lang
    );

    let result = state.gateway.translate(&request).await.map_err(|e| {
        warn!("Translation failed: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(result.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_defaults() {
        let body: TranslateBody = serde_json::from_value(json!({ "text": "Hello" })).unwrap();
        let request = body.into_request();
        assert_eq!(request.text, "Hello");
        assert_eq!(request.source_lang, "auto");
        assert_eq!(request.target_lang, "en");
        assert!(!request.tag_handling);
    }

    #[test]
    fn test_text_list_uses_first_entry() {
        let body: TranslateBody =
            serde_json::from_value(json!({ "text": ["first", "second"], "target_lang": "de" }))
                .unwrap();
        let request = body.into_request();
        assert_eq!(request.text, "first");
        assert_eq!(request.target_lang, "de");
    }

    #[test]
    fn test_missing_or_empty_text_becomes_empty() {
        let body: TranslateBody = serde_json::from_value(json!({})).unwrap();
        assert_eq!(body.into_request().text, "");

        let body: TranslateBody = serde_json::from_value(json!({ "text": [] })).unwrap();
        assert_eq!(body.into_request().text, "");
    }

    #[test]
    fn test_tag_handling_forms() {
        let cases = [
            (json!(true), true),
            (json!(false), false),
            (json!("html"), true),
            (json!(""), false),
        ];
        for (value, expected) in cases {
            let body: TranslateBody =
                serde_json::from_value(json!({ "text": "x", "tag_handling": value })).unwrap();
            assert_eq!(body.into_request().tag_handling, expected);
        }
    }

    #[test]
    fn test_response_has_code_200() {
        let response = TranslateResponse::from(TranslationResult {
            data: "Hallo".to_string(),
            alternatives: vec!["Hallo".to_string()],
            source_lang: "EN".to_string(),
            target_lang: "DE".to_string(),
            id: 8_300_000_000,
            method: "Free".to_string(),
        });
        assert_eq!(response.code, 200);
        assert_eq!(response.method, "Free");
    }
}
