//! Request routing for the council endpoints and the stdin/stdout serve loop

pub mod router;
pub mod serve;

pub use router::{ApiRequest, ApiResponse, ApiRouter};
pub use serve::serve;
