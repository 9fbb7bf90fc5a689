pub mod client;
pub mod error;
pub mod types;

pub use client::{CheckClient, CompileCheck};
pub use error::CheckError;
pub use types::CheckResponse;
