//! Reduce the multi-beam `LMT_handle_jobs` result to a flat translation

use crate::jsonrpc::error::{GatewayError, GatewayResult};
use serde::{Deserialize, Serialize};

/// Value of the `method` field in every result
pub const TRANSLATION_METHOD: &str = "Free";

#[derive(Debug, Clone, Deserialize)]
pub struct BeamSentence {
    pub text: String,
}

/// One ranked candidate translation of a job
#[derive(Debug, Clone, Deserialize)]
pub struct Beam {
    pub sentences: Vec<BeamSentence>,
}

impl Beam {
    fn text(&self) -> Option<&str> {
        self.sentences.first().map(|s| s.text.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobTranslation {
    pub beams: Vec<Beam>,
}

/// `result` of an `LMT_handle_jobs` response
#[derive(Debug, Clone, Deserialize)]
pub struct HandleJobsResult {
    pub translations: Vec<JobTranslation>,
    pub source_lang: String,
    pub target_lang: String,
}

/// Upstream translate-phase response with the echoed request id
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub id: i64,
    pub result: HandleJobsResult,
}

/// Final translation handed back to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationResult {
    /// Primary translation: beam 0 of every job, space-joined
    pub data: String,
    /// One full-text alternative per beam rank
    pub alternatives: Vec<String>,
    pub source_lang: String,
    pub target_lang: String,
    pub id: i64,
    pub method: String,
}

impl TranslationResult {
    /// The `/translate` success body: every field plus `"code": 200`
    pub fn to_response_body(&self) -> serde_json::Value {
        serde_json::json!({
            "alternatives": self.alternatives,
            "code": 200,
            "data": self.data,
            "id": self.id,
            "method": self.method,
            "source_lang": self.source_lang,
            "target_lang": self.target_lang,
        })
    }
}

/// Flatten per-job beams into a primary translation and alternatives
///
/// The beam count is taken from the first job. For each rank, the rank-th
/// beam of every job that has one is concatenated in job order; jobs with
/// fewer beams are skipped for that rank. The primary translation joins every
/// job's beam 0 with a single space.
///
/// # Errors
///
/// * `GatewayError::Malformed` - If a job has no beam 0, or any present beam has no sentence
pub fn reduce(response: UpstreamResponse) -> GatewayResult<TranslationResult> {
    let translations = &response.result.translations;
    let beam_count = translations.first().map_or(0, |t| t.beams.len());

    let alternatives = (0..beam_count)
        .map(|rank| {
            translations
                .iter()
                .enumerate()
                .filter_map(|(index, t)| t.beams.get(rank).map(|beam| (index, beam)))
                .map(|(index, beam)| {
                    beam.text().ok_or_else(|| {
                        GatewayError::Malformed(format!(
                            "translation {} beam {} has no sentence",
                            index, rank
                        ))
                    })
                })
                .collect::<GatewayResult<String>>()
        })
        .collect::<GatewayResult<Vec<_>>>()?;

    let primary = translations
        .iter()
        .enumerate()
        .map(|(index, t)| {
            t.beams.first().and_then(Beam::text).ok_or_else(|| {
                GatewayError::Malformed(format!("translation {} has no primary beam", index))
            })
        })
        .collect::<GatewayResult<Vec<_>>>()?;

    Ok(TranslationResult {
        data: primary.join(" "),
        alternatives,
        source_lang: response.result.source_lang,
        target_lang: response.result.target_lang,
        id: response.id,
        method: TRANSLATION_METHOD.to_string(),
    })
}
