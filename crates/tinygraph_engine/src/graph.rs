// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and connections.
//!
//! The graph is the only place connections are created or removed, and the
//! only driver of recompute passes. Every structural change and every user
//! edit runs a full pass before returning.

use crate::config::GraphConfig;
use crate::connection::{Connection, ConnectionId};
use crate::evaluation::PassStats;
use crate::node::{Node, NodeId};
use crate::port::{text_or_empty, Port, PortRef, PortValue};
use crate::registry::NodeRegistry;
use crate::view::GraphView;
use indexmap::IndexMap;

/// A node graph
#[derive(Debug)]
pub struct Graph {
    /// Graph name
    pub name: String,
    pub(crate) config: GraphConfig,
    /// Nodes in the graph
    pub(crate) nodes: IndexMap<NodeId, Node>,
    /// Connections between nodes
    pub(crate) connections: IndexMap<ConnectionId, Connection>,
    pub(crate) last_pass: PassStats,
    view: Option<Box<dyn GraphView>>,
}

impl Graph {
    /// Create a new empty graph with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(GraphConfig {
            name: name.into(),
            ..GraphConfig::default()
        })
    }

    /// Create a new empty graph from configuration
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            name: config.name.clone(),
            config,
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
            last_pass: PassStats::default(),
            view: None,
        }
    }

    /// Attach a presentation adapter for the wires
    pub fn set_view(&mut self, view: Box<dyn GraphView>) {
        self.view = Some(view);
        self.notify_connections();
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, mut node: Node) -> NodeId {
        let id = node.id;
        node.take_pending_outputs();
        tracing::debug!(node = %node.name, node_type = %node.node_type, "adding node");
        self.nodes.insert(id, node);
        id
    }

    /// Create a node through the registry and add it to the graph
    pub fn instantiate(&mut self, registry: &NodeRegistry, type_id: &str, x: f32, y: f32) -> Option<NodeId> {
        let node = registry.create_node(type_id, x, y)?;
        Some(self.add_node(node))
    }

    /// Remove a node after severing all of its connections
    pub fn delete_node(&mut self, node_id: NodeId) -> Option<Node> {
        if !self.nodes.contains_key(&node_id) {
            tracing::warn!(?node_id, "cannot delete unknown node");
            return None;
        }

        let incident: Vec<(PortRef, PortRef)> = self
            .connections_for_node(node_id)
            .map(|c| (c.from.clone(), c.to.clone()))
            .collect();
        for (from, to) in &incident {
            self.detach(from, to);
        }

        let node = self.nodes.shift_remove(&node_id);
        if let Some(node) = &node {
            tracing::debug!(node = %node.name, severed = incident.len(), "deleted node");
        }
        self.notify_connections();
        self.compute();
        node
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get a port by address
    pub fn port(&self, port: &PortRef) -> Option<&Port> {
        self.nodes.get(&port.node)?.port(port)
    }

    pub(crate) fn port_mut(&mut self, port: &PortRef) -> Option<&mut Port> {
        self.nodes.get_mut(&port.node)?.port_mut(port)
    }

    /// Last stored value of a port
    pub fn value(&self, port: &PortRef) -> Option<&PortValue> {
        self.port(port)?.value()
    }

    fn lookup(&self, port: &PortRef) -> Result<&Port, ConnectionError> {
        let node = self
            .nodes
            .get(&port.node)
            .ok_or(ConnectionError::NodeNotFound(port.node))?;
        node.port(port)
            .ok_or_else(|| ConnectionError::PortNotFound(port.port.clone()))
    }

    fn check_connection(&self, from: &PortRef, to: &PortRef) -> Result<(), ConnectionError> {
        let source = self.lookup(from)?;
        let target = self.lookup(to)?;

        // Only output to input, and only one connection per input
        if source.is_input() == target.is_input() {
            return Err(ConnectionError::SameDirection);
        }
        if target.is_connected() {
            return Err(ConnectionError::PortAlreadyConnected(to.port.clone()));
        }
        source.can_connect_to(target)
    }

    /// Connect an output port to an input port.
    ///
    /// The input takes the output's current value and a full pass runs.
    /// Illegal connections are logged and leave the graph unchanged.
    pub fn add_connection(&mut self, from: &PortRef, to: &PortRef) -> Result<ConnectionId, ConnectionError> {
        if let Err(err) = self.check_connection(from, to) {
            tracing::warn!(from = %from.port, to = %to.port, error = %err, "rejected connection");
            return Err(err);
        }

        if let Some(port) = self.port_mut(from) {
            port.link(to.clone());
        }
        if let Some(port) = self.port_mut(to) {
            port.link(from.clone());
        }
        let value = self.value(from).cloned();
        self.push_value(to, value);

        let connection = Connection::new(from.clone(), to.clone());
        let id = connection.id;
        self.connections.insert(id, connection);
        tracing::debug!(from = %from.port, to = %to.port, "connection made");

        self.notify_connections();
        self.compute();
        Ok(id)
    }

    /// Remove the connection between two ports.
    ///
    /// The input port is cleared to empty and a full pass runs.
    pub fn remove_connection(&mut self, from: &PortRef, to: &PortRef) -> Result<Connection, ConnectionError> {
        if self.find_connection(from, to).is_none() {
            let err = ConnectionError::ConnectionNotFound;
            tracing::warn!(from = %from.port, to = %to.port, error = %err, "cannot remove connection");
            return Err(err);
        }

        let removed = self.detach(from, to);
        self.notify_connections();
        self.compute();
        removed.ok_or(ConnectionError::ConnectionNotFound)
    }

    /// Unlink both endpoints, drop the record and clear the input.
    fn detach(&mut self, from: &PortRef, to: &PortRef) -> Option<Connection> {
        if let Some(port) = self.port_mut(from) {
            port.unlink(to);
        }
        if let Some(port) = self.port_mut(to) {
            port.unlink(from);
        }
        let removed = self
            .find_connection(from, to)
            .and_then(|id| self.connections.shift_remove(&id));
        self.push_value(to, None);
        removed
    }

    /// Find the connection joining two ports
    pub fn find_connection(&self, from: &PortRef, to: &PortRef) -> Option<ConnectionId> {
        self.connections
            .values()
            .find(|c| c.joins(from, to))
            .map(|c| c.id)
    }

    /// Get all connections
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get connections involving a node
    pub fn connections_for_node(&self, node_id: NodeId) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(move |c| c.involves_node(node_id))
    }

    /// Get the number of connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Nodes with no connected input, in insertion order
    pub fn root_nodes(&self) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|node| !node.has_connected_input())
            .map(|node| node.id)
            .collect()
    }

    fn check_edit(&self, target: &PortRef, value: Option<&PortValue>) -> Result<(), ValueError> {
        let node = self
            .nodes
            .get(&target.node)
            .ok_or(ValueError::NodeNotFound(target.node))?;
        let port = node
            .port(target)
            .ok_or_else(|| ValueError::PortNotFound(target.port.clone()))?;

        if port.is_input() && port.is_connected() {
            return Err(ValueError::InputConnected(target.port.clone()));
        }
        if !port.admits(value) {
            return Err(ValueError::Rejected {
                port: target.port.clone(),
                value: text_or_empty(value),
            });
        }
        Ok(())
    }

    /// Apply a user edit to a port and recompute.
    ///
    /// Connected inputs are owned by propagation and cannot be edited. An
    /// edited output is pushed into every input connected to it.
    pub fn set_value(&mut self, target: &PortRef, value: Option<PortValue>) -> Result<(), ValueError> {
        if let Err(err) = self.check_edit(target, value.as_ref()) {
            tracing::warn!(port = %target.port, error = %err, "rejected edit");
            return Err(err);
        }

        let peers = match self.port_mut(target) {
            Some(port) => {
                port.set_value(value.clone());
                port.connections().to_vec()
            }
            None => Vec::new(),
        };
        for peer in &peers {
            self.push_value(peer, value.clone());
        }

        self.compute();
        Ok(())
    }

    fn notify_connections(&mut self) {
        if let Some(view) = self.view.as_mut() {
            let connections: Vec<&Connection> = self.connections.values().collect();
            view.on_connections_changed(&connections);
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::with_config(GraphConfig::default())
    }
}

/// Error when creating or removing a connection
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Port not found
    #[error("Port not found: {0}")]
    PortNotFound(String),

    /// Both ends are inputs or both are outputs
    #[error("Ports have the same direction")]
    SameDirection,

    /// The source of a connection must be an output
    #[error("Port is not an output: {0}")]
    NotAnOutput(String),

    /// The target of a connection must be an input
    #[error("Port is not an input: {0}")]
    NotAnInput(String),

    /// Port is already connected
    #[error("Port already connected: {0}")]
    PortAlreadyConnected(String),

    /// Port does not take connections
    #[error("Connections are disabled on port: {0}")]
    ConnectionsDisabled(String),

    /// No connection joins the two ports
    #[error("Connection not found")]
    ConnectionNotFound,
}

/// Error when editing a port value
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Port not found
    #[error("Port not found: {0}")]
    PortNotFound(String),

    /// Connected inputs only take propagated values
    #[error("Input is connected: {0}")]
    InputConnected(String),

    /// The port kind does not accept the value
    #[error("Port {port} does not accept value {value:?}")]
    Rejected {
        /// Port id
        port: String,
        /// Rejected value, as text
        value: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{NodeContext, NodeLogic, CYCLE_DETECTED};
    use crate::node::NodeStatus;
    use crate::port::{PortDirection, PortType};
    use crate::view::{NodeView, PortView, ViewHandle};
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    #[derive(Debug)]
    struct Source;

    impl NodeLogic for Source {
        fn compute(&self, _ctx: &mut NodeContext<'_>) {}
    }

    /// Joins its inputs into "out", counting how often it runs
    #[derive(Debug, Default)]
    struct Relay {
        inputs: Vec<String>,
        calls: Rc<Cell<usize>>,
        fail: Rc<Cell<bool>>,
    }

    impl NodeLogic for Relay {
        fn validate(&self, _ctx: &mut NodeContext<'_>) -> bool {
            !self.fail.get()
        }

        fn compute(&self, ctx: &mut NodeContext<'_>) {
            self.calls.set(self.calls.get() + 1);
            let joined: String = self
                .inputs
                .iter()
                .map(|id| text_or_empty(ctx.get_input_value(id)))
                .collect();
            ctx.set_output_value("out", Some(joined.into()));
        }
    }

    fn source(graph: &mut Graph, name: &str, value: &str) -> NodeId {
        let node = Node::new(name, Source).with_output(Port::string("out").with_value(value));
        graph.add_node(node)
    }

    fn relay(graph: &mut Graph, name: &str, inputs: &[&str]) -> (NodeId, Rc<Cell<usize>>, Rc<Cell<bool>>) {
        let logic = Relay {
            inputs: inputs.iter().map(ToString::to_string).collect(),
            ..Relay::default()
        };
        let (calls, fail) = (logic.calls.clone(), logic.fail.clone());
        let mut node = Node::new(name, logic).with_output(Port::string("out"));
        for id in inputs {
            node.add_input(Port::string(*id));
        }
        (graph.add_node(node), calls, fail)
    }

    fn out(node: NodeId) -> PortRef {
        PortRef::output(node, "out")
    }

    fn input(node: NodeId, id: &str) -> PortRef {
        PortRef::input(node, id)
    }

    fn assert_consistent(graph: &Graph) {
        for connection in graph.connections() {
            let from = graph.port(&connection.from).unwrap();
            let to = graph.port(&connection.to).unwrap();
            assert!(from.connections().contains(&connection.to));
            assert!(to.connections().contains(&connection.from));
        }
        for node in graph.nodes() {
            for port in node.ports() {
                let me = port.port_ref().unwrap();
                for peer in port.connections() {
                    let (from, to) = if port.is_input() { (peer, &me) } else { (&me, peer) };
                    assert!(graph.find_connection(from, to).is_some());
                }
            }
        }
    }

    #[test]
    fn test_connection_pushes_value_and_removal_clears_it() {
        let mut graph = Graph::new("test");
        let a = source(&mut graph, "A", "hello");
        let (b, _, _) = relay(&mut graph, "B", &["in"]);

        graph.add_connection(&out(a), &input(b, "in")).unwrap();
        assert_eq!(graph.value(&input(b, "in")), graph.value(&out(a)));
        assert_eq!(graph.value(&out(b)), Some(&PortValue::from("hello")));
        assert_eq!(graph.connection_count(), 1);

        let removed = graph.remove_connection(&out(a), &input(b, "in")).unwrap();
        assert_eq!(removed.from, out(a));
        assert!(graph.value(&input(b, "in")).is_none());
        assert_eq!(graph.connection_count(), 0);
        assert!(!graph.port(&out(a)).unwrap().is_connected());
        assert!(graph.remove_connection(&out(a), &input(b, "in")).is_err());
    }

    #[test]
    fn test_input_takes_a_single_connection() {
        let mut graph = Graph::new("test");
        let a = source(&mut graph, "A", "first");
        let b = source(&mut graph, "B", "second");
        let (c, _, _) = relay(&mut graph, "C", &["in"]);

        graph.add_connection(&out(a), &input(c, "in")).unwrap();
        let second = graph.add_connection(&out(b), &input(c, "in"));
        assert!(matches!(second, Err(ConnectionError::PortAlreadyConnected(_))));

        assert_eq!(graph.connection_count(), 1);
        assert_eq!(graph.port(&input(c, "in")).unwrap().connections(), &[out(a)]);
        assert_eq!(graph.value(&input(c, "in")), Some(&PortValue::from("first")));
        assert!(!graph.port(&out(b)).unwrap().is_connected());
    }

    #[test]
    fn test_outputs_fan_out() {
        let mut graph = Graph::new("test");
        let a = source(&mut graph, "A", "x");
        let (b, _, _) = relay(&mut graph, "B", &["in"]);
        let (c, _, _) = relay(&mut graph, "C", &["in"]);

        graph.add_connection(&out(a), &input(b, "in")).unwrap();
        graph.add_connection(&out(a), &input(c, "in")).unwrap();
        assert_eq!(graph.port(&out(a)).unwrap().connections().len(), 2);
        assert_eq!(graph.value(&out(c)), Some(&PortValue::from("x")));
    }

    #[test]
    fn test_illegal_connections_are_rejected() {
        let mut graph = Graph::new("test");
        let a = source(&mut graph, "A", "x");
        let (b, _, _) = relay(&mut graph, "B", &["in"]);
        let (c, _, _) = relay(&mut graph, "C", &["in"]);

        assert!(matches!(
            graph.add_connection(&out(a), &out(b)),
            Err(ConnectionError::SameDirection)
        ));
        assert!(matches!(
            graph.add_connection(&input(b, "in"), &out(a)),
            Err(ConnectionError::NotAnOutput(_))
        ));
        assert!(matches!(
            graph.add_connection(&out(a), &input(c, "missing")),
            Err(ConnectionError::PortNotFound(_))
        ));
        assert!(matches!(
            graph.add_connection(&out(a), &input(NodeId::new(), "in")),
            Err(ConnectionError::NodeNotFound(_))
        ));
        assert_eq!(graph.connection_count(), 0);
        assert!(graph.nodes().all(|n| !n.ports().any(Port::is_connected)));
    }

    #[test]
    fn test_root_nodes() {
        let mut graph = Graph::new("test");
        let a = source(&mut graph, "A", "x");
        let (b, _, _) = relay(&mut graph, "B", &["in", "other"]);
        let (c, _, _) = relay(&mut graph, "C", &["in"]);
        assert_eq!(graph.root_nodes(), vec![a, b, c]);

        graph.add_connection(&out(a), &input(b, "in")).unwrap();
        assert_eq!(graph.root_nodes(), vec![a, c]);
    }

    #[test]
    fn test_failed_validation_stops_propagation() {
        let mut graph = Graph::new("test");
        let a = source(&mut graph, "A", "one");
        let (b, _, fail_b) = relay(&mut graph, "B", &["in"]);
        let (c, calls_c, _) = relay(&mut graph, "C", &["in"]);
        graph.add_connection(&out(a), &input(b, "in")).unwrap();
        graph.add_connection(&out(b), &input(c, "in")).unwrap();
        assert_eq!(graph.value(&out(c)), Some(&PortValue::from("one")));

        fail_b.set(true);
        let before = calls_c.get();
        graph.set_value(&out(a), Some("two".into())).unwrap();

        assert_eq!(graph.node(b).unwrap().status(), &NodeStatus::invalid("Validation failed"));
        assert_eq!(calls_c.get(), before);
        assert_eq!(graph.value(&out(c)), Some(&PortValue::from("one")));
        assert!(graph.node(c).unwrap().status().is_ok());
    }

    #[test]
    fn test_independent_branches_still_compute() {
        let mut graph = Graph::new("test");
        let a = source(&mut graph, "A", "one");
        let (b, _, fail_b) = relay(&mut graph, "B", &["in"]);
        let (c, calls_c, _) = relay(&mut graph, "C", &["in"]);
        graph.add_connection(&out(a), &input(b, "in")).unwrap();
        graph.add_connection(&out(a), &input(c, "in")).unwrap();

        fail_b.set(true);
        graph.set_value(&out(a), Some("two".into())).unwrap();

        assert!(!graph.node(b).unwrap().status().is_ok());
        assert_eq!(graph.value(&out(c)), Some(&PortValue::from("two")));
        assert!(calls_c.get() > 0);
        assert_eq!(graph.last_pass().failures, 1);
    }

    #[test]
    fn test_diamond_computes_once_per_path() {
        let mut graph = Graph::new("test");
        let root = source(&mut graph, "Root", "r");
        let (b, _, _) = relay(&mut graph, "B", &["in"]);
        let (c, _, _) = relay(&mut graph, "C", &["in"]);
        let (d, calls_d, _) = relay(&mut graph, "D", &["left", "right"]);
        graph.add_connection(&out(root), &input(b, "in")).unwrap();
        graph.add_connection(&out(root), &input(c, "in")).unwrap();
        graph.add_connection(&out(b), &input(d, "left")).unwrap();
        graph.add_connection(&out(c), &input(d, "right")).unwrap();

        calls_d.set(0);
        graph.compute();

        assert_eq!(calls_d.get(), 2);
        assert_eq!(graph.last_pass().visits, 5);
        assert_eq!(graph.value(&out(d)), Some(&PortValue::from("rr")));
    }

    #[test]
    fn test_cycle_is_reported_on_reentered_node() {
        let mut graph = Graph::new("test");
        let root = source(&mut graph, "Root", "r");
        let (a, _, _) = relay(&mut graph, "A", &["in", "loop"]);
        let (b, _, _) = relay(&mut graph, "B", &["in"]);
        graph.add_connection(&out(root), &input(a, "in")).unwrap();
        graph.add_connection(&out(a), &input(b, "in")).unwrap();
        graph.add_connection(&out(b), &input(a, "loop")).unwrap();

        assert_eq!(graph.last_pass().cycles, 1);
        assert_eq!(graph.node(a).unwrap().status(), &NodeStatus::invalid(CYCLE_DETECTED));
        assert!(graph.node(b).unwrap().status().is_ok());
    }

    #[test]
    fn test_delete_node_severs_connections() {
        let mut graph = Graph::new("test");
        let a = source(&mut graph, "A", "x");
        let (b, _, _) = relay(&mut graph, "B", &["in"]);
        let (c, _, _) = relay(&mut graph, "C", &["in"]);
        let (d, _, _) = relay(&mut graph, "D", &["in"]);
        graph.add_connection(&out(a), &input(b, "in")).unwrap();
        graph.add_connection(&out(b), &input(c, "in")).unwrap();
        graph.add_connection(&out(b), &input(d, "in")).unwrap();
        graph.add_connection(&out(a), &input(d, "in")).unwrap_err();

        let deleted = graph.delete_node(b).unwrap();
        assert_eq!(deleted.name, "B");
        assert!(graph.node(b).is_none());
        assert_eq!(graph.connection_count(), 0);
        assert!(graph.connections_for_node(b).next().is_none());
        assert!(!graph.port(&out(a)).unwrap().is_connected());
        assert!(graph.value(&input(c, "in")).is_none());
        assert!(graph.value(&input(d, "in")).is_none());
        assert_consistent(&graph);
        assert!(graph.delete_node(b).is_none());
    }

    #[test]
    fn test_delete_keeps_unrelated_connections() {
        let mut graph = Graph::new("test");
        let a = source(&mut graph, "A", "x");
        let (b, _, _) = relay(&mut graph, "B", &["in"]);
        let (c, _, _) = relay(&mut graph, "C", &["in"]);
        graph.add_connection(&out(a), &input(b, "in")).unwrap();
        graph.add_connection(&out(a), &input(c, "in")).unwrap();

        graph.delete_node(b);
        assert_eq!(graph.connection_count(), 1);
        assert_eq!(graph.port(&out(a)).unwrap().connections(), &[input(c, "in")]);
        assert_consistent(&graph);
    }

    #[test]
    fn test_connected_inputs_cannot_be_edited() {
        let mut graph = Graph::new("test");
        let a = source(&mut graph, "A", "x");
        let (b, _, _) = relay(&mut graph, "B", &["in"]);
        graph.set_value(&input(b, "in"), Some("typed".into())).unwrap();
        assert_eq!(graph.value(&out(b)), Some(&PortValue::from("typed")));

        graph.add_connection(&out(a), &input(b, "in")).unwrap();
        assert!(matches!(
            graph.set_value(&input(b, "in"), Some("again".into())),
            Err(ValueError::InputConnected(_))
        ));
        assert_eq!(graph.value(&input(b, "in")), Some(&PortValue::from("x")));
    }

    #[test]
    fn test_instantiate_through_registry() {
        let registry = crate::nodes::create_builtin_registry();
        let mut graph = Graph::new("test");
        let id = graph.instantiate(&registry, "Concat", 4.0, 2.0).unwrap();
        assert_eq!(graph.node(id).unwrap().position, [4.0, 2.0]);
        assert!(graph.instantiate(&registry, "Nope", 0.0, 0.0).is_none());
        assert_eq!(graph.node_count(), 1);
    }

    #[derive(Debug)]
    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl PortView for Recorder {
        fn on_mount(&mut self, id: &str, port_type: &PortType, direction: PortDirection) -> ViewHandle {
            self.0.borrow_mut().push(format!("mount {id} {} {direction:?}", port_type.name()));
            ViewHandle(1)
        }

        fn on_set_value(&mut self, value: Option<&PortValue>) {
            self.0.borrow_mut().push(format!("value {}", text_or_empty(value)));
        }

        fn on_set_can_edit(&mut self, can_edit: bool) {
            self.0.borrow_mut().push(format!("edit {can_edit}"));
        }
    }

    impl NodeView for Recorder {
        fn on_mount(&mut self, name: &str, _position: [f32; 2]) -> ViewHandle {
            self.0.borrow_mut().push(format!("mount {name}"));
            ViewHandle(2)
        }

        fn on_status_changed(&mut self, status: &NodeStatus) {
            self.0.borrow_mut().push(format!("status {}", status.message()));
        }
    }

    impl GraphView for Recorder {
        fn on_connections_changed(&mut self, connections: &[&Connection]) {
            self.0.borrow_mut().push(format!("wires {}", connections.len()));
        }
    }

    #[test]
    fn test_views_are_notified() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut graph = Graph::new("test");
        graph.set_view(Box::new(Recorder(events.clone())));

        let a = source(&mut graph, "A", "x");
        let mut node = Node::new("B", Relay {
            inputs: vec!["in".to_string()],
            ..Relay::default()
        })
        .with_output(Port::string("out"));
        let mut port = Port::string("in");
        assert_eq!(port.attach_view(Box::new(Recorder(events.clone()))), ViewHandle(1));
        node.add_input(port);
        node.attach_view(Box::new(Recorder(events.clone())));
        let b = graph.add_node(node);

        events.borrow_mut().clear();
        graph.add_connection(&out(a), &input(b, "in")).unwrap();
        graph.remove_connection(&out(a), &input(b, "in")).unwrap();

        let events = events.borrow();
        let expected = ["edit false", "value x", "wires 1", "edit true", "value ", "wires 0"];
        let seen: Vec<&str> = events
            .iter()
            .map(String::as_str)
            .filter(|e| !e.starts_with("status"))
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_node_view_sees_status_changes() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut graph = Graph::new("test");
        let (b, _, fail) = relay(&mut graph, "B", &["in"]);
        graph.nodes.get_mut(&b).unwrap().attach_view(Box::new(Recorder(events.clone())));

        fail.set(true);
        graph.compute();
        assert_eq!(events.borrow().last().map(String::as_str), Some("status Validation failed"));
    }
}
