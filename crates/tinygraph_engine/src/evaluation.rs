// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph evaluation and execution.
//!
//! A pass starts from every root node and pushes values forward: each
//! reached node is validated and computed, and when that succeeds every node
//! hanging off its outputs is visited in turn. There is no per-pass
//! memoization, so a node reachable along several paths computes once per
//! path. A failing node stops the descent along its own paths only.

use crate::graph::Graph;
use crate::node::{write_output, Node, NodeId, NodeStatus};
use crate::port::{Port, PortRef, PortValue};
use indexmap::IndexMap;
use std::fmt;

/// Status message for a node re-entered along its own descent path
pub const CYCLE_DETECTED: &str = "Cycle detected";

/// Behaviour of a node type: validation plus transformation.
///
/// Implementations only touch their own node through [`NodeContext`]; the
/// graph takes care of pushing written outputs downstream.
pub trait NodeLogic: fmt::Debug {
    /// Check the current inputs. Returning false skips [`NodeLogic::compute`]
    /// and stops propagation past this node.
    fn validate(&self, _ctx: &mut NodeContext<'_>) -> bool {
        true
    }

    /// Read inputs and write outputs
    fn compute(&self, ctx: &mut NodeContext<'_>);
}

/// The view of its own node a [`NodeLogic`] works through
pub struct NodeContext<'a> {
    inputs: &'a IndexMap<String, Port>,
    outputs: &'a mut IndexMap<String, Port>,
    status: &'a mut NodeStatus,
    pending: &'a mut Vec<String>,
}

impl<'a> NodeContext<'a> {
    pub(crate) fn new(
        inputs: &'a IndexMap<String, Port>,
        outputs: &'a mut IndexMap<String, Port>,
        status: &'a mut NodeStatus,
        pending: &'a mut Vec<String>,
    ) -> Self {
        Self {
            inputs,
            outputs,
            status,
            pending,
        }
    }

    /// Value of an input port
    pub fn get_input_value(&self, id: &str) -> Option<&PortValue> {
        self.inputs.get(id).and_then(Port::value)
    }

    /// Value of an output port
    pub fn get_output_value(&self, id: &str) -> Option<&PortValue> {
        self.outputs.get(id).and_then(Port::value)
    }

    /// Write an output value; `None` clears it
    pub fn set_output_value(&mut self, id: &str, value: Option<PortValue>) -> bool {
        write_output(self.outputs, self.pending, id, value)
    }

    /// Current status
    pub fn status(&self) -> &NodeStatus {
        &*self.status
    }

    /// Record node health
    pub fn set_status(&mut self, status: NodeStatus) {
        *self.status = status;
    }

    /// Mark the node invalid with a message
    pub fn invalidate(&mut self, message: impl Into<String>) {
        *self.status = NodeStatus::invalid(message);
    }
}

/// Counters for the most recent recompute pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Root nodes the pass started from
    pub roots: usize,
    /// Node evaluations, counting repeats along separate paths
    pub visits: usize,
    /// Evaluations whose validation failed
    pub failures: usize,
    /// Descents stopped by the cycle guard
    pub cycles: usize,
}

impl Graph {
    /// Run a full recompute pass.
    ///
    /// Resets every node to Ok, then computes and propagates from each root
    /// node. Node health is reported through each node's status.
    pub fn compute(&mut self) {
        for node in self.nodes.values_mut() {
            node.set_status(NodeStatus::Ok);
        }

        let roots = self.root_nodes();
        let mut stats = PassStats {
            roots: roots.len(),
            ..PassStats::default()
        };
        let mut path = Vec::new();
        for root in roots {
            self.compute_recursive(root, &mut path, &mut stats);
        }

        tracing::debug!(
            graph = %self.name,
            roots = stats.roots,
            visits = stats.visits,
            failures = stats.failures,
            cycles = stats.cycles,
            "recompute pass finished"
        );
        self.last_pass = stats;
    }

    /// Counters from the most recent pass
    pub fn last_pass(&self) -> PassStats {
        self.last_pass
    }

    fn compute_recursive(&mut self, node_id: NodeId, path: &mut Vec<NodeId>, stats: &mut PassStats) {
        if self.config.cycle_guard && path.contains(&node_id) {
            stats.cycles += 1;
            if let Some(node) = self.nodes.get_mut(&node_id) {
                tracing::warn!(node = %node.name, "cycle detected, stopping propagation");
                node.set_status(NodeStatus::invalid(CYCLE_DETECTED));
            }
            return;
        }

        let Some(node) = self.nodes.get_mut(&node_id) else {
            return;
        };
        stats.visits += 1;
        let valid = node.compute();
        self.flush_outputs(node_id);
        if !valid {
            stats.failures += 1;
            return;
        }

        let downstream: Vec<NodeId> = self
            .nodes
            .get(&node_id)
            .map(|node| {
                node.outputs()
                    .flat_map(|port| port.connections().iter().map(|peer| peer.node))
                    .collect()
            })
            .unwrap_or_default();

        path.push(node_id);
        for next in downstream {
            self.compute_recursive(next, path, stats);
        }
        path.pop();
    }

    /// Push outputs written by a node into the inputs connected to them
    pub(crate) fn flush_outputs(&mut self, node_id: NodeId) {
        let Some(node) = self.nodes.get_mut(&node_id) else {
            return;
        };
        let written = node.take_pending_outputs();
        let node: &Node = node;
        let pushes: Vec<(PortRef, Option<PortValue>)> = written
            .iter()
            .filter_map(|id| node.output(id))
            .flat_map(|port| {
                port.connections()
                    .iter()
                    .map(move |peer| (peer.clone(), port.value().cloned()))
            })
            .collect();

        for (peer, value) in pushes {
            self.push_value(&peer, value);
        }
    }

    pub(crate) fn push_value(&mut self, target: &PortRef, value: Option<PortValue>) {
        if let Some(port) = self.port_mut(target) {
            tracing::trace!(port = %target.port, ?value, "pushing value");
            port.set_value(value);
        }
    }
}
