//! Region routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (absolute URL, Referer)
//!     → facets.rs (parse platform/region from both hosts)
//!     → decision.rs (compare regions)
//!     → rewrite.rs (rebuild host with referrer region)
//!     → Return: RedirectTo(url) or NoRedirect
//! ```
//!
//! # Design Decisions
//! - Pure functions only: no I/O, no logging, no shared state
//! - Deterministic: same input always yields the same decision
//! - Host grammar fixed per deployment via `HostLayout`

pub mod decision;
pub mod error;
pub mod facets;
pub mod rewrite;

pub use decision::{decide, decide_with, Evaluation, RedirectDecision};
pub use error::UrlError;
pub use facets::{facets_of_url, parse_facets, Facets, HostLayout, DEFAULT_SUFFIX_LABELS};
pub use rewrite::encode_region;
