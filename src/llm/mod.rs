//! LLM integration module.
//!
//! Provides an OpenAI-compatible client for LLM API calls and
//! the Arabic prompts used for generation and judging.

mod client;
mod prompts;

pub use client::{GenerationOptions, LlmClient, LlmResponse, Message, Role};
pub use prompts::Prompts;
