pub mod admin_handlers;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod provider;
pub mod router;
pub mod server;

pub use error::{ApiError, Result};
pub use provider::{FinancialsProvider, HttpFinancialsProvider};
pub use router::create_router;
pub use server::run_server;
