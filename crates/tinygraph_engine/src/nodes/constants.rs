// SPDX-License-Identifier: MIT OR Apache-2.0
//! Constant nodes: a single user-edited output and no inputs.

use crate::evaluation::{NodeContext, NodeLogic};
use crate::node::Node;
use crate::port::{Port, PortValue};

/// Constant whose output must hold a number
#[derive(Debug)]
pub struct ConstantNumber;

impl NodeLogic for ConstantNumber {
    fn validate(&self, ctx: &mut NodeContext<'_>) -> bool {
        let is_number = match ctx.get_output_value("output") {
            None => false,
            Some(PortValue::String(s)) if s.trim().is_empty() => false,
            Some(value) => value.as_number().is_some(),
        };
        if !is_number {
            ctx.invalidate("Output must be a number");
        }
        is_number
    }

    fn compute(&self, _ctx: &mut NodeContext<'_>) {}
}

/// Constant holding whatever the user typed
#[derive(Debug)]
pub struct ConstantValue;

impl NodeLogic for ConstantValue {
    fn compute(&self, _ctx: &mut NodeContext<'_>) {}
}

/// Numeric constant
pub fn constant_number(x: f32, y: f32) -> Node {
    Node::new("Const Number", ConstantNumber)
        .with_position(x, y)
        .with_output(Port::number("output"))
}

/// Single line string constant
pub fn constant_string(x: f32, y: f32) -> Node {
    Node::new("Const String", ConstantValue)
        .with_position(x, y)
        .with_output(Port::string("output"))
}

/// Multi line text constant
pub fn constant_textbox(x: f32, y: f32) -> Node {
    Node::new("Const Textbox", ConstantValue)
        .with_position(x, y)
        .with_output(Port::text("output"))
}
