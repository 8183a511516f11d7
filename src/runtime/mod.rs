//! HTTP surface of the dispatcher: handlers, errors, tokens and the server loop.

pub mod api;
pub mod error;
pub mod server;
pub mod state;
pub mod token;

pub use error::{ApiError, ApiResult};
pub use server::{router, run};
pub use state::AppState;
pub use token::{payload_hash, TokenClaims, TokenIssuer};
