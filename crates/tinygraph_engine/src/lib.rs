// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dataflow graph engine for `TinyGraph`.
//!
//! Small data-transformation pipelines built from typed nodes with named
//! input/output ports, wired together by connections and recomputed
//! whenever an upstream value changes.
//!
//! ## Architecture
//!
//! - Ports hold values and their peer list; inputs take at most one
//!   connection, outputs fan out
//! - Nodes own their ports, a status and a [`NodeLogic`]
//! - The [`Graph`] owns nodes and connections, enforces connection rules and
//!   drives push-based recompute passes from the root nodes
//! - The [`NodeRegistry`] turns type ids into node instances
//! - Rendering stays outside, behind the adapter traits in [`view`]

pub mod config;
pub mod connection;
pub mod evaluation;
pub mod graph;
pub mod node;
pub mod nodes;
pub mod port;
pub mod registry;
pub mod view;

pub use config::{ConfigError, GraphConfig};
pub use connection::{Connection, ConnectionId};
pub use evaluation::{NodeContext, NodeLogic, PassStats};
pub use graph::{ConnectionError, Graph, ValueError};
pub use node::{Node, NodeId, NodeStatus};
pub use port::{Port, PortDirection, PortRef, PortType, PortValue};
pub use registry::{NodeRegistry, NodeTypeInfo, RegistryError};
