// SPDX-License-Identifier: MIT OR Apache-2.0
//! Presentation adapters that render into the log.

use std::sync::atomic::{AtomicU64, Ordering};
use tinygraph_engine::view::{GraphView, NodeView, PortView, ViewHandle};
use tinygraph_engine::{Connection, NodeStatus, PortDirection, PortType, PortValue};

static NEXT_HANDLE: AtomicU64 = AtomicU64::new(1);

fn next_handle() -> ViewHandle {
    ViewHandle(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
}

/// Logs value and editability changes of one port
#[derive(Debug)]
pub struct LogPortView {
    node: String,
    port: String,
}

impl LogPortView {
    pub fn new(node: &str, port: &str) -> Self {
        Self {
            node: node.to_string(),
            port: port.to_string(),
        }
    }
}

impl PortView for LogPortView {
    fn on_mount(&mut self, id: &str, port_type: &PortType, direction: PortDirection) -> ViewHandle {
        tracing::trace!(
            node = %self.node,
            port = id,
            kind = port_type.name(),
            color = ?port_type.color(),
            ?direction,
            "mount port"
        );
        next_handle()
    }

    fn on_set_value(&mut self, value: Option<&PortValue>) {
        match value {
            Some(value) => tracing::debug!("{}.{} = {value:?}", self.node, self.port),
            None => tracing::debug!("{}.{} cleared", self.node, self.port),
        }
    }

    fn on_set_can_edit(&mut self, can_edit: bool) {
        tracing::debug!("{}.{} editable: {can_edit}", self.node, self.port);
    }
}

/// Logs status changes of one node
#[derive(Debug)]
pub struct LogNodeView {
    name: String,
}

impl LogNodeView {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl NodeView for LogNodeView {
    fn on_mount(&mut self, name: &str, position: [f32; 2]) -> ViewHandle {
        tracing::trace!(node = name, x = position[0], y = position[1], "mount node");
        next_handle()
    }

    fn on_status_changed(&mut self, status: &NodeStatus) {
        match status {
            NodeStatus::Ok => tracing::debug!("{}: ok", self.name),
            NodeStatus::Invalid(message) => tracing::warn!("{}: {message}", self.name),
        }
    }
}

/// Logs the wire count whenever connections change
#[derive(Debug, Default)]
pub struct LogGraphView;

impl GraphView for LogGraphView {
    fn on_connections_changed(&mut self, connections: &[&Connection]) {
        tracing::debug!("{} connection(s)", connections.len());
    }
}
