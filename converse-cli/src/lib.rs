//! Converse CLI - interactive chat and single-shot agent runs against a
//! local Ollama server.
//!
//! The binary lives in `main.rs`; this library holds the parts that are
//! worth testing on their own.

pub mod config;
pub mod error;
