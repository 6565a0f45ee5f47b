//! Book-review backend library.
//!
//! Hexagonal layout: [`domain`] holds entities, ports, and services —
//! including the review rating protocol — while [`inbound`] and
//! [`outbound`] adapt HTTP and PostgreSQL at the edges.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use doc::ApiDoc;
pub use middleware::Trace;
