pub mod client;
pub mod error;
pub mod types;

pub use client::{OracleClient, RepairOracle};
pub use error::OracleError;
pub use types::{ChatMessage, ChatRequest, ChatResponse};
