pub mod document_renderer;
pub mod llm_service;
pub mod prompt_builder;
pub mod question_extractor;

pub use document_renderer::{render, RenderedDocuments};
pub use llm_service::{LlmService, TextGenerator};
pub use prompt_builder::build_generation_prompt;
pub use question_extractor::extract_questions;
