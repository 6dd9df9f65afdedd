// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph framework.

use crate::evaluation::{NodeContext, NodeLogic};
use crate::port::{Port, PortDirection, PortRef, PortValue};
use crate::view::{NodeView, PortView, ViewHandle};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Health of a node after its last evaluation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeStatus {
    /// Inputs were valid and the node computed
    #[default]
    Ok,
    /// Validation or computation failed
    Invalid(String),
}

impl NodeStatus {
    /// Message used when a node is marked invalid without one
    pub const DEFAULT_INVALID: &'static str = "Invalid IO";

    /// Build a status from a health flag and an optional message
    pub fn from_flag(ok: bool, message: Option<&str>) -> Self {
        if ok {
            Self::Ok
        } else {
            Self::Invalid(message.unwrap_or(Self::DEFAULT_INVALID).to_string())
        }
    }

    /// Shorthand for an invalid status
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    /// Whether the node is healthy
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Status text
    pub fn message(&self) -> &str {
        match self {
            Self::Ok => "Ok",
            Self::Invalid(message) => message,
        }
    }
}

/// A node instance in the graph
#[derive(Debug)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Node type ID, filled in by the registry
    pub node_type: String,
    /// Display name (not required to be unique)
    pub name: String,
    /// Position in the graph UI
    pub position: [f32; 2],
    inputs: IndexMap<String, Port>,
    outputs: IndexMap<String, Port>,
    status: NodeStatus,
    logic: Box<dyn NodeLogic>,
    view: Option<Box<dyn NodeView>>,
    /// Outputs written since the graph last pushed them downstream
    pending: Vec<String>,
}

impl Node {
    /// Create a node with no ports
    pub fn new(name: impl Into<String>, logic: impl NodeLogic + 'static) -> Self {
        Self {
            id: NodeId::new(),
            node_type: String::new(),
            name: name.into(),
            position: [0.0, 0.0],
            inputs: IndexMap::new(),
            outputs: IndexMap::new(),
            status: NodeStatus::Ok,
            logic: Box::new(logic),
            view: None,
            pending: Vec::new(),
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = [x, y];
        self
    }

    /// Builder form of [`Node::add_input`]
    pub fn with_input(mut self, port: Port) -> Self {
        self.add_input(port);
        self
    }

    /// Builder form of [`Node::add_output`]
    pub fn with_output(mut self, port: Port) -> Self {
        self.add_output(port);
        self
    }

    /// Register an input port. Returns false (and logs) on an id collision.
    pub fn add_input(&mut self, port: Port) -> bool {
        self.register_port(port, PortDirection::Input)
    }

    /// Register an output port. Returns false (and logs) on an id collision.
    pub fn add_output(&mut self, port: Port) -> bool {
        self.register_port(port, PortDirection::Output)
    }

    fn register_port(&mut self, mut port: Port, direction: PortDirection) -> bool {
        let ports = match direction {
            PortDirection::Input => &mut self.inputs,
            PortDirection::Output => &mut self.outputs,
        };
        if ports.contains_key(&port.id) {
            tracing::warn!(
                node = %self.name,
                port = %port.id,
                ?direction,
                "port id already exists on node"
            );
            return false;
        }
        port.attach(self.id, direction);
        ports.insert(port.id.clone(), port);
        true
    }

    /// Get an input port by id
    pub fn input(&self, id: &str) -> Option<&Port> {
        self.inputs.get(id)
    }

    /// Get an output port by id
    pub fn output(&self, id: &str) -> Option<&Port> {
        self.outputs.get(id)
    }

    /// Get a port by address
    pub fn port(&self, port: &PortRef) -> Option<&Port> {
        match port.direction {
            PortDirection::Input => self.inputs.get(&port.port),
            PortDirection::Output => self.outputs.get(&port.port),
        }
    }

    pub(crate) fn port_mut(&mut self, port: &PortRef) -> Option<&mut Port> {
        match port.direction {
            PortDirection::Input => self.inputs.get_mut(&port.port),
            PortDirection::Output => self.outputs.get_mut(&port.port),
        }
    }

    /// Input ports
    pub fn inputs(&self) -> impl Iterator<Item = &Port> {
        self.inputs.values()
    }

    /// Output ports
    pub fn outputs(&self) -> impl Iterator<Item = &Port> {
        self.outputs.values()
    }

    /// Get all ports
    pub fn ports(&self) -> impl Iterator<Item = &Port> {
        self.inputs.values().chain(self.outputs.values())
    }

    /// Value of an input port, `None` if the port is absent or empty
    pub fn get_input_value(&self, id: &str) -> Option<&PortValue> {
        self.inputs.get(id).and_then(Port::value)
    }

    /// Value of an output port, `None` if the port is absent or empty
    pub fn get_output_value(&self, id: &str) -> Option<&PortValue> {
        self.outputs.get(id).and_then(Port::value)
    }

    /// Set an output value.
    ///
    /// Once the node sits in a graph, the graph pushes the value into the
    /// connected inputs. Downstream nodes are not recomputed from here.
    pub fn set_output_value(&mut self, id: &str, value: Option<PortValue>) -> bool {
        write_output(&mut self.outputs, &mut self.pending, id, value)
    }

    /// Whether any input currently holds a connection
    pub fn has_connected_input(&self) -> bool {
        self.inputs.values().any(Port::is_connected)
    }

    /// Current status
    pub fn status(&self) -> &NodeStatus {
        &self.status
    }

    /// Record node health and notify the view
    pub fn set_status(&mut self, status: NodeStatus) {
        self.status = status;
        self.notify_status();
    }

    /// Attach a presentation adapter and mount it
    pub fn attach_view(&mut self, mut view: Box<dyn NodeView>) -> ViewHandle {
        let handle = view.on_mount(&self.name, self.position);
        view.on_status_changed(&self.status);
        self.view = Some(view);
        handle
    }

    /// Attach a view to every port, built by `make`
    pub fn attach_port_views(&mut self, mut make: impl FnMut(&Port) -> Box<dyn PortView>) {
        for port in self.inputs.values_mut().chain(self.outputs.values_mut()) {
            let view = make(port);
            port.attach_view(view);
        }
    }

    /// Run the node's validation on its own.
    ///
    /// The status starts from Ok. On failure the node is marked invalid,
    /// keeping any message the validation set itself.
    pub fn validate(&mut self) -> bool {
        let before = std::mem::take(&mut self.status);
        let valid = self.run_validation();
        if self.status != before {
            self.notify_status();
        }
        valid
    }

    fn run_validation(&mut self) -> bool {
        let Self {
            inputs,
            outputs,
            status,
            logic,
            pending,
            ..
        } = self;
        let mut ctx = NodeContext::new(inputs, outputs, status, pending);
        let valid = logic.validate(&mut ctx);
        if !valid && self.status.is_ok() {
            self.status = NodeStatus::invalid("Validation failed");
        }
        valid
    }

    /// Evaluate the node.
    ///
    /// Resets the status, validates, and runs the transformation only when
    /// validation passed. Returns whether validation passed.
    pub fn compute(&mut self) -> bool {
        tracing::debug!(node = %self.name, node_type = %self.node_type, "computing node");
        let before = std::mem::take(&mut self.status);

        let valid = self.run_validation();
        if valid {
            let Self {
                inputs,
                outputs,
                status,
                logic,
                pending,
                ..
            } = self;
            logic.compute(&mut NodeContext::new(inputs, outputs, status, pending));
        }

        if self.status != before {
            self.notify_status();
        }
        valid
    }

    pub(crate) fn take_pending_outputs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }

    fn notify_status(&mut self) {
        if let Some(view) = self.view.as_mut() {
            view.on_status_changed(&self.status);
        }
    }
}

pub(crate) fn write_output(
    outputs: &mut IndexMap<String, Port>,
    pending: &mut Vec<String>,
    id: &str,
    value: Option<PortValue>,
) -> bool {
    let Some(port) = outputs.get_mut(id) else {
        return false;
    };
    port.set_value(value);
    if !pending.iter().any(|p| p == id) {
        pending.push(id.to_string());
    }
    true
}
