//! Region-consistent edge handler library

pub mod admin;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::EdgeConfig;
pub use http::EdgeServer;
pub use lifecycle::Shutdown;
pub use routing::{decide, encode_region, parse_facets, Facets, HostLayout, RedirectDecision};
