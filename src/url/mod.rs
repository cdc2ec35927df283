//! URL normalization and filtering
//!
//! Candidate links pass through two stages before entering the frontier:
//! [`normalize_url`] canonicalizes them (relative resolution, scheme check,
//! fragment strip) and [`UrlFilter`] decides whether they are crawlable and
//! which frontier tier they belong to.

mod filter;
mod normalize;

pub use filter::{LinkDecision, UrlFilter};
pub use normalize::normalize_url;
