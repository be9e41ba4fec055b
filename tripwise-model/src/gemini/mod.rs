mod client;
mod wire;

pub use client::{DEFAULT_GEMINI_BASE_URL, GeminiModel};
