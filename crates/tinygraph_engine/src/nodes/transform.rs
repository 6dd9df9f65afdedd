// SPDX-License-Identifier: MIT OR Apache-2.0
//! Case transforms.

use crate::evaluation::{NodeContext, NodeLogic};
use crate::node::Node;
use crate::port::{text_or_empty, Port};

/// Target case of a [`CaseTransform`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// All lowercase
    Lower,
    /// All uppercase
    Upper,
}

/// Rewrites its input in one case
#[derive(Debug)]
pub struct CaseTransform(pub Case);

impl NodeLogic for CaseTransform {
    fn compute(&self, ctx: &mut NodeContext<'_>) {
        let input = text_or_empty(ctx.get_input_value("input"));
        let output = match self.0 {
            Case::Lower => input.to_lowercase(),
            Case::Upper => input.to_uppercase(),
        };
        ctx.set_output_value("output", Some(output.into()));
    }
}

fn case_node(name: &str, case: Case, x: f32, y: f32) -> Node {
    Node::new(name, CaseTransform(case))
        .with_position(x, y)
        .with_input(Port::string("input"))
        .with_output(Port::string("output"))
}

/// Lowercase node
pub fn to_lower(x: f32, y: f32) -> Node {
    case_node("To Lowercase", Case::Lower, x, y)
}

/// Uppercase node
pub fn to_upper(x: f32, y: f32) -> Node {
    case_node("To Uppercase", Case::Upper, x, y)
}
