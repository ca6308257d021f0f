// Pairing chat: mode resolution, prompt assembly, model call, sanitization.
// All model calls go through llm_client, never straight to the provider.

pub mod handlers;
pub mod mode;
pub mod prompts;
pub mod sanitizer;
pub mod service;
