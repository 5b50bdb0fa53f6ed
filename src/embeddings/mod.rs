// Embedding generation: text chunking and the Ollama HTTP client

pub mod chunking;
pub mod ollama;
