// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scripted session against the built-in catalog.

use crate::log_view::{LogGraphView, LogNodeView, LogPortView};
use thiserror::Error;
use tinygraph_engine::nodes::create_builtin_registry;
use tinygraph_engine::{
    ConnectionError, Graph, GraphConfig, NodeId, NodeRegistry, PortRef, PortValue, ValueError,
};

/// Errors that abort the demo session
#[derive(Debug, Error)]
pub enum DemoError {
    #[error(transparent)]
    Connection(#[from] ConnectionError),
    #[error(transparent)]
    Value(#[from] ValueError),
    #[error("Unknown node type: {0}")]
    UnknownType(String),
    #[error("Failed to serialize menu: {0}")]
    Json(#[from] serde_json::Error),
}

/// Builds nodes from the registry with logging views attached
struct Builder<'a> {
    registry: &'a NodeRegistry,
    graph: Graph,
}

impl Builder<'_> {
    fn spawn(&mut self, type_id: &str, x: f32, y: f32) -> Result<NodeId, DemoError> {
        let mut node = self
            .registry
            .create_node(type_id, x, y)
            .ok_or_else(|| DemoError::UnknownType(type_id.to_string()))?;
        let name = node.name.clone();
        node.attach_view(Box::new(LogNodeView::new(&name)));
        node.attach_port_views(|port| Box::new(LogPortView::new(&name, &port.id)));
        Ok(self.graph.add_node(node))
    }
}

/// Run the scripted session
pub fn run(config: GraphConfig) -> Result<(), DemoError> {
    let registry = create_builtin_registry();
    tracing::info!("Registered {} node types", registry.len());
    tracing::debug!("Menu: {}", serde_json::to_string_pretty(&registry.menu_tree())?);

    let mut graph = Graph::with_config(config);
    graph.set_view(Box::new(LogGraphView));
    tracing::info!("Graph: {}", graph.name);

    let mut b = Builder {
        registry: &registry,
        graph,
    };

    // Text pipeline: encode, decode, shout, then append a suffix
    let text = b.spawn("ConstantTextbox", 0.0, 0.0)?;
    let encode = b.spawn("ToBase64", 200.0, 0.0)?;
    let decode = b.spawn("FromBase64", 400.0, 0.0)?;
    let upper = b.spawn("ToUpper", 600.0, 0.0)?;
    let suffix = b.spawn("ConstantString", 600.0, 150.0)?;
    let concat = b.spawn("Concat", 800.0, 0.0)?;

    // Arithmetic
    let number = b.spawn("ConstantNumber", 0.0, 300.0)?;
    let math = b.spawn("Math", 200.0, 300.0)?;

    let mut graph = b.graph;

    graph.set_value(&PortRef::output(text, "output"), Some("hello".into()))?;
    graph.set_value(&PortRef::output(suffix, "output"), Some("!".into()))?;
    graph.set_value(&PortRef::output(number, "output"), Some(PortValue::Number(10.0)))?;
    graph.set_value(&PortRef::input(math, "B"), Some(PortValue::Number(2.0)))?;
    graph.set_value(&PortRef::input(math, "Operation"), Some("Divide".into()))?;

    graph.add_connection(&PortRef::output(text, "output"), &PortRef::input(encode, "input"))?;
    graph.add_connection(&PortRef::output(encode, "output"), &PortRef::input(decode, "input"))?;
    graph.add_connection(&PortRef::output(decode, "output"), &PortRef::input(upper, "input"))?;
    graph.add_connection(&PortRef::output(upper, "output"), &PortRef::input(concat, "input1"))?;
    graph.add_connection(&PortRef::output(suffix, "output"), &PortRef::input(concat, "input2"))?;
    graph.add_connection(&PortRef::output(number, "output"), &PortRef::input(math, "A"))?;

    report(&graph, "connected");

    // An input takes a single connection
    if let Err(err) =
        graph.add_connection(&PortRef::output(suffix, "output"), &PortRef::input(concat, "input1"))
    {
        tracing::info!("Second wire into Concat.input1 refused: {err}");
    }

    graph.set_value(&PortRef::input(math, "B"), Some(PortValue::Number(0.0)))?;
    report(&graph, "divide by zero");

    // Outside Latin-1, so the encoder fails and the branch below it stops
    graph.set_value(&PortRef::output(text, "output"), Some("héllo ✓".into()))?;
    report(&graph, "unencodable text");

    graph.set_value(&PortRef::output(text, "output"), Some("tiny graph".into()))?;
    graph.remove_connection(&PortRef::output(suffix, "output"), &PortRef::input(concat, "input2"))?;
    report(&graph, "suffix unplugged");

    if let Some(node) = graph.delete_node(decode) {
        tracing::info!("Deleted {}", node.name);
    }
    report(&graph, "decoder deleted");

    let stats = graph.last_pass();
    tracing::info!(
        roots = stats.roots,
        visits = stats.visits,
        failures = stats.failures,
        cycles = stats.cycles,
        "last pass"
    );
    Ok(())
}

fn report(graph: &Graph, stage: &str) {
    tracing::info!("--- {stage} ({} connections) ---", graph.connection_count());
    for node in graph.nodes() {
        let outputs: Vec<String> = node
            .outputs()
            .map(|port| match port.value() {
                Some(value) => format!("{}={value}", port.id),
                None => format!("{}=<empty>", port.id),
            })
            .collect();
        tracing::info!("{:<16} {:<28} {}", node.name, node.status().message(), outputs.join(" "));
    }
}
