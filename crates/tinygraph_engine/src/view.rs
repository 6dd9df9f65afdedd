// SPDX-License-Identifier: MIT OR Apache-2.0
//! Presentation adapter interfaces.
//!
//! Rendering lives outside the engine. A front end attaches views to ports,
//! nodes and the graph; the engine notifies them when state changes but
//! never reads anything back from them.

use crate::connection::Connection;
use crate::node::NodeStatus;
use crate::port::{PortDirection, PortType, PortValue};
use std::fmt;

/// Opaque handle a view hands back when it mounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewHandle(pub u64);

/// Widget shown for a single port (numeric field, dropdown, textbox, ...)
pub trait PortView: fmt::Debug {
    /// Build the widget
    fn on_mount(&mut self, id: &str, port_type: &PortType, direction: PortDirection) -> ViewHandle;

    /// The stored value changed
    fn on_set_value(&mut self, value: Option<&PortValue>);

    /// The port became (non-)editable
    fn on_set_can_edit(&mut self, _can_edit: bool) {}
}

/// Visual for a node (title bar, status light)
pub trait NodeView: fmt::Debug {
    /// Build the visual
    fn on_mount(&mut self, name: &str, position: [f32; 2]) -> ViewHandle;

    /// The node status changed
    fn on_status_changed(&mut self, status: &NodeStatus);
}

/// Visual for the wires between nodes
pub trait GraphView: fmt::Debug {
    /// The connection set changed and wires should be redrawn
    fn on_connections_changed(&mut self, connections: &[&Connection]);
}
