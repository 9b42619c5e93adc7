#![deny(
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    rust_2018_idioms,
    unsafe_code
)]
#![warn(
    missing_debug_implementations,
    clippy::explicit_iter_loop,
    clippy::use_self,
    clippy::clone_on_ref_ptr
)]

//! Interactive reconnaissance engine for Apache Kafka clusters.
//!
//! Connects with administrative and consumer credentials, discovers the
//! cluster topology, and reports broker- and resource-level configuration
//! for security review. Strictly read-only; all network interaction goes
//! through librdkafka.

pub mod client;
pub mod cluster;
pub mod config;
pub mod connect;
pub mod metadata;
pub mod output;
pub mod session;
pub mod shell;
