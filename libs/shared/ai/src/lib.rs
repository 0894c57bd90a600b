//! Generative-language client shared by the cells that ask the model for text.

pub mod gemini;

pub use gemini::{GeminiClient, GeminiError};
