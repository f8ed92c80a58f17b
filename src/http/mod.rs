//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, absolute URL, Referer)
//!     → routing (region decision)
//!     → response.rs (307 redirect) or page.rs (region page)
//!     → Send to client
//! ```

pub mod page;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, EdgeServer, StatsSnapshot};
