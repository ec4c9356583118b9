//! Split phase: `LMT_split_text`
//!
//! The first upstream call breaks the raw input into sentence chunks and
//! reports the language the service detected.

use crate::jsonrpc::error::{GatewayError, GatewayResult};
use crate::jsonrpc::gateway::TranslationGateway;
use crate::jsonrpc::payload::{CommonJobParams, RpcMethod};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^<>]+>").unwrap());

/// Whether the text looks like markup (contains a `<...>` tag)
pub fn is_richtext(text: &str) -> bool {
    TAG_PATTERN.is_match(text)
}

/// How the upstream should treat the input text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextType {
    Plaintext,
    Richtext,
}

impl TextType {
    /// Richtext when the caller asked for tag handling or the text carries tags
    pub fn detect(text: &str, tag_handling: bool) -> Self {
        if tag_handling || is_richtext(text) {
            TextType::Richtext
        } else {
            TextType::Plaintext
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitLang {
    pub lang_user_selected: &'static str,
}

/// `params` of an `LMT_split_text` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitParams {
    #[serde(rename = "commonJobParams")]
    pub common_job_params: CommonJobParams,
    pub lang: SplitLang,
    pub texts: Vec<String>,
    #[serde(rename = "textType")]
    pub text_type: TextType,
}

impl SplitParams {
    /// Build split params for a single text
    ///
    /// The user-selected language is always `auto`; any caller-supplied source
    /// language only applies to the translate phase.
    pub fn new(text: &str, tag_handling: bool) -> Self {
        Self {
            common_job_params: CommonJobParams::default(),
            lang: SplitLang {
                lang_user_selected: "auto",
            },
            texts: vec![text.to_string()],
            text_type: TextType::detect(text, tag_handling),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SplitResult {
    pub lang: DetectedLang,
    pub texts: Vec<SplitText>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetectedLang {
    pub detected: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SplitText {
    pub chunks: Vec<RawChunk>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawChunk {
    pub sentences: Vec<RawSentence>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSentence {
    #[serde(default)]
    pub prefix: String,
    pub text: String,
}

/// One sentence unit returned by the split phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitChunk {
    /// 0-based position among the chunks of the input
    pub position: usize,
    /// Leading whitespace or punctuation context
    pub prefix: String,
    /// Sentence body
    pub text: String,
}

impl SplitChunk {
    pub fn new(position: usize, prefix: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            position,
            prefix: prefix.into(),
            text: text.into(),
        }
    }
}

/// Parsed outcome of the split phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutcome {
    pub chunks: Vec<SplitChunk>,
    /// Language detected by the upstream, as reported (usually upper-case)
    pub detected_lang: String,
}

impl TryFrom<SplitResult> for SplitOutcome {
    type Error = GatewayError;

    fn try_from(result: SplitResult) -> GatewayResult<Self> {
        let text = result.texts.into_iter().next().ok_or_else(|| {
            GatewayError::Malformed("split result contains no texts".to_string())
        })?;

        let chunks = text
            .chunks
            .into_iter()
            .enumerate()
            .map(|(position, chunk)| {
                let sentence = chunk.sentences.into_iter().next().ok_or_else(|| {
                    GatewayError::Malformed(format!("chunk {} has no sentences", position))
                })?;
                Ok(SplitChunk::new(position, sentence.prefix, sentence.text))
            })
            .collect::<GatewayResult<Vec<_>>>()?;

        Ok(SplitOutcome {
            chunks,
            detected_lang: result.lang.detected,
        })
    }
}

impl TranslationGateway {
    /// Split text into sentence chunks with `LMT_split_text`
    ///
    /// # Arguments
    ///
    /// * `text` - The raw text, sent as the single entry of `texts`
    /// * `tag_handling` - Force `richtext` even when no tags are detected
    ///
    /// # Returns
    ///
    /// * `Ok(SplitOutcome)` - Ordered chunks plus the detected language
    /// * `Err(GatewayError)` - Transport, status, decode or shape failure
    pub async fn split(&self, text: &str, tag_handling: bool) -> GatewayResult<SplitOutcome> {
        let params = SplitParams::new(text, tag_handling);
        debug!(text_type = ?params.text_type, "splitting text");

        let result: SplitResult = self.call(RpcMethod::SplitText, params).await?.result;
        SplitOutcome::try_from(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ========== Richtext Detection Tests ==========

    #[test]
    fn test_is_richtext() {
        assert!(is_richtext("<b>hi</b>"));
        assert!(is_richtext("see <a href=\"x\">here</a>"));
        assert!(!is_richtext("hello"));
        assert!(!is_richtext("3 < 4"));
        assert!(!is_richtext("<>"));
    }

    #[test]
    fn test_text_type_detection() {
        assert_eq!(TextType::detect("hello", false), TextType::Plaintext);
        assert_eq!(TextType::detect("hello", true), TextType::Richtext);
        assert_eq!(TextType::detect("<i>hello</i>", false), TextType::Richtext);
    }

    // ========== Params Tests ==========

    #[test]
    fn test_split_params_serialization() {
        let params = SplitParams::new("Hello. How are you?", false);
        assert_eq!(
            serde_json::to_value(&params).unwrap(),
            json!({
                "commonJobParams": { "mode": "translate" },
                "lang": { "lang_user_selected": "auto" },
                "texts": ["Hello. How are you?"],
                "textType": "plaintext"
            })
        );
    }

    // ========== Result Parsing Tests ==========

    #[test]
    fn test_outcome_from_result() {
        let result: SplitResult = serde_json::from_value(json!({
            "lang": { "detected": "EN", "isConfident": true },
            "texts": [{
                "chunks": [
                    { "sentences": [{ "prefix": "", "text": "Hello." }] },
                    { "sentences": [{ "prefix": " ", "text": "How are you?" }] }
                ]
            }]
        }))
        .unwrap();

        let outcome = SplitOutcome::try_from(result).unwrap();
        assert_eq!(outcome.detected_lang, "EN");
        assert_eq!(
            outcome.chunks,
            vec![
                SplitChunk::new(0, "", "Hello."),
                SplitChunk::new(1, " ", "How are you?"),
            ]
        );
    }

    #[test]
    fn test_outcome_without_texts_is_malformed() {
        let result: SplitResult =
            serde_json::from_value(json!({ "lang": { "detected": "EN" }, "texts": [] })).unwrap();
        assert!(matches!(
            SplitOutcome::try_from(result),
            Err(GatewayError::Malformed(_))
        ));
    }

    #[test]
    fn test_chunk_without_sentences_is_malformed() {
        let result: SplitResult = serde_json::from_value(json!({
            "lang": { "detected": "EN" },
            "texts": [{ "chunks": [{ "sentences": [] }] }]
        }))
        .unwrap();
        match SplitOutcome::try_from(result) {
            Err(GatewayError::Malformed(msg)) => assert!(msg.contains("chunk 0")),
            other => panic!("Expected Malformed, got {:?}", other),
        }
    }
}
