pub mod gemini;

pub use gemini::{ExtractionError, GeminiClient, TextModel};
