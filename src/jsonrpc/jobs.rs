//! Translation jobs built from split chunks
//!
//! Each chunk becomes exactly one job. A job carries at most one neighbouring
//! sentence of context on each side; context never accumulates across jobs.

use crate::jsonrpc::split::SplitChunk;
use serde::Serialize;

/// Beam count the browser extension asks for
pub const DEFAULT_BEAM_COUNT: usize = 4;

/// One sentence inside a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobSentence {
    pub prefix: String,
    pub text: String,
    /// 1-based, contiguous in chunk order
    pub id: usize,
}

/// One unit of work for `LMT_handle_jobs`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationJob {
    pub kind: &'static str,
    pub preferred_num_beams: usize,
    #[serde(rename = "raw_en_context_before")]
    pub context_before: Vec<String>,
    #[serde(rename = "raw_en_context_after")]
    pub context_after: Vec<String>,
    pub sentences: Vec<JobSentence>,
}

impl TranslationJob {
    /// The job's single sentence id
    pub fn sentence_id(&self) -> Option<usize> {
        self.sentences.first().map(|s| s.id)
    }
}

/// Turn ordered chunks into translation jobs
///
/// # Arguments
///
/// * `chunks` - Chunks in the order the split phase returned them
/// * `preferred_num_beams` - Number of beams requested per job
///
/// # Returns
///
/// One job per chunk, where job `i` has sentence id `i + 1`, the text of chunk
/// `i - 1` as context before (if any) and the text of chunk `i + 1` as
/// context after (if any).
///
/// # Example
///
/// ```
/// use deeplx::jsonrpc::jobs::build_jobs;
/// use deeplx::jsonrpc::split::SplitChunk;
///
/// let chunks = vec![SplitChunk::new(0, "", "A."), SplitChunk::new(1, " ", "B.")];
/// let jobs = build_jobs(&chunks, 4);
/// assert_eq!(jobs[1].context_before, vec!["A.".to_string()]);
/// assert!(jobs[1].context_after.is_empty());
/// ```
pub fn build_jobs(chunks: &[SplitChunk], preferred_num_beams: usize) -> Vec<TranslationJob> {
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| {
            let context_before = i
                .checked_sub(1)
                .and_then(|prev| chunks.get(prev))
                .map(|prev| vec![prev.text.clone()])
                .unwrap_or_default();
            let context_after = chunks
                .get(i + 1)
                .map(|next| vec![next.text.clone()])
                .unwrap_or_default();

            TranslationJob {
                kind: "default",
                preferred_num_beams,
                context_before,
                context_after,
                sentences: vec![JobSentence {
                    prefix: chunk.prefix.clone(),
                    text: chunk.text.clone(),
                    id: i + 1,
                }],
            }
        })
        .collect()
}
