//! # DocAsk Answer
//!
//! The answering pipeline: split a document's text into bounded chunks, pick
//! the chunk most lexically similar to the question, and forward question +
//! chunk to a hosted extractive-QA inference API.
//!
//! ```text
//! question ──┐
//!            ▼
//! content ─► chunker ─► relevance selector ─► inference API ─► answer string
//! ```
//!
//! The pipeline is a terminal sink for errors: callers always get a plain
//! string, never an Err, from `AnswerService::answer`.

pub mod chunker;
pub mod inference;
pub mod relevance;
pub mod service;

pub use inference::InferenceClient;
pub use service::AnswerService;
