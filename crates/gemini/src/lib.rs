// gemini - minimal client for Google's Gemini generateContent API

mod client;

pub mod error;

pub use client::{DEFAULT_ENDPOINT, DEFAULT_MODEL, GeminiClient, GeminiConfig, ModelInfo, Prompt};
pub use error::{GeminiError, Result};
