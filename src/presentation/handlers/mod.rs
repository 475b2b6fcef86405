mod extract;
pub mod extract_types;
mod health;

pub use extract::{RequestError, extract_handler};
pub use extract_types::{ExtractResponse, ResponseAssembler};
pub use health::health_handler;
