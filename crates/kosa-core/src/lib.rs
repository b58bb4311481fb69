//! kosa-core library.
//!
//! Directed graphs with a dense or sparse backing, Kosaraju strongly
//! connected components, single-pair reachability, and the text and DOT
//! codecs the `kosa` binaries use.
//!
//! # Conventions
//!
//! - **Errors**: engines return typed errors ([`graph::GraphError`],
//!   [`import::ImportError`]); config loading returns `anyhow::Result`.
//! - **Logging**: use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).
//!   The library never installs a subscriber.

#![forbid(unsafe_code)]

pub mod config;
pub mod dot;
pub mod error;
pub mod graph;
pub mod import;
pub mod reach;
pub mod scc;

pub use error::ErrorCode;
pub use graph::{Graph, GraphError, Representation, Traversal, Vertex};
pub use import::{ImportError, ImportReport, parse_graph, read_graph};
pub use reach::{Path, find_path};
pub use scc::{Kosaraju, SccResult, strongly_connected_components};
