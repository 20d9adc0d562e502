//! Client for the local inference engine (Ollama)
//!
//! The engine is an external collaborator: it lists installed models and
//! runs single-shot text generation. Failures carry an explicit kind split
//! so handlers can map them to client vs server errors without inspecting
//! error chains.

mod api;
mod client;

pub use client::{EngineClient, EngineError};
