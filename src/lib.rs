//! Question answering over a precomputed sentence bundle.
//!
//! A bundle pairs a flat vector index and a static sentence encoder with the
//! sentences and summaries the index rows stand for. Questions are encoded,
//! matched against the index and answered by quoting the nearest sentences.

pub mod bundle;
pub mod config;
pub mod embedding;
pub mod error;
pub mod loader;
pub mod response;
pub mod retriever;
pub mod session;
pub mod utils;
pub mod vector_db;

pub use bundle::Bundle;
pub use config::ChatConfig;
pub use error::{ChatError, Result};
pub use loader::{load_data, DataSource};
pub use retriever::Retriever;
pub use session::ChatSession;
