//! RAG (Retrieval-Augmented Generation) answering system.
//!
//! Each stage lives in its own module; [`RagPipeline`] sequences them per query.

pub mod context;
pub mod generator;
pub mod pipeline;
pub mod retriever;
pub mod sources;
pub mod types;

pub use context::assemble;
pub use generator::AnswerGenerator;
pub use pipeline::RagPipeline;
pub use retriever::Retriever;
pub use sources::extract_sources;
pub use types::{DocumentPayload, Query, RagResponse, SearchHit, SourceRef};
