//! Answer orchestration: chunk, select, ask.

use crate::chunker::split_into_chunks;
use crate::inference::InferenceClient;
use crate::relevance::find_relevant_chunk;

/// Answers questions about a document's text. Infallible by contract: every
/// failure in the pipeline comes back as a descriptive answer string.
pub struct AnswerService {
    inference: InferenceClient,
    chunk_size: usize,
}

impl AnswerService {
    pub fn new(config: &docask_core::config::InferenceConfig) -> Self {
        Self {
            inference: InferenceClient::new(config),
            chunk_size: config.chunk_size,
        }
    }

    /// Answer `question` against the full `context` text of one document.
    pub async fn answer(&self, question: &str, context: &str) -> String {
        let chunks = split_into_chunks(context, self.chunk_size);
        let relevant = find_relevant_chunk(question, &chunks);
        tracing::debug!(
            "Selected 1 of {} chunk(s) ({} chars) as context",
            chunks.len(),
            relevant.len()
        );
        self.inference.question_answer(question, &relevant).await
    }
}
