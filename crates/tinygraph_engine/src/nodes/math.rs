// SPDX-License-Identifier: MIT OR Apache-2.0
//! Four-operator arithmetic node.

use crate::evaluation::{NodeContext, NodeLogic};
use crate::node::Node;
use crate::port::{number_or_zero, Port, PortValue};

/// Arithmetic operation selected on the node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `A + B`
    Add,
    /// `A - B`
    Subtract,
    /// `A * B`
    Multiply,
    /// `A / B`
    Divide,
}

impl Operation {
    /// All operations, in menu order
    pub const ALL: [Operation; 4] = [Self::Add, Self::Subtract, Self::Multiply, Self::Divide];

    /// Label shown in the dropdown
    pub fn label(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Subtract => "Subtract",
            Self::Multiply => "Multiply",
            Self::Divide => "Divide",
        }
    }

    /// Parse a dropdown label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.label() == label)
    }
}

/// Applies the selected operation to `A` and `B`
#[derive(Debug)]
pub struct MathNode;

impl MathNode {
    fn operands(ctx: &NodeContext<'_>) -> Option<(f64, f64)> {
        let a = number_or_zero(ctx.get_input_value("A"))?;
        let b = number_or_zero(ctx.get_input_value("B"))?;
        Some((a, b))
    }
}

impl NodeLogic for MathNode {
    fn validate(&self, ctx: &mut NodeContext<'_>) -> bool {
        if Self::operands(ctx).is_none() {
            ctx.invalidate("Inputs must be numbers");
            ctx.set_output_value("Result", None);
            return false;
        }
        true
    }

    fn compute(&self, ctx: &mut NodeContext<'_>) {
        let Some((a, b)) = Self::operands(ctx) else {
            return;
        };
        let operation = ctx
            .get_input_value("Operation")
            .and_then(PortValue::as_str)
            .and_then(Operation::from_label);

        let result = match operation {
            Some(Operation::Add) => a + b,
            Some(Operation::Subtract) => a - b,
            Some(Operation::Multiply) => a * b,
            Some(Operation::Divide) => {
                if b == 0.0 {
                    // Result keeps its previous value
                    ctx.invalidate("Division by zero");
                    return;
                }
                a / b
            }
            None => 0.0,
        };
        ctx.set_output_value("Result", Some(PortValue::Number(result)));
    }
}

/// Math node
pub fn math(x: f32, y: f32) -> Node {
    Node::new("Math", MathNode)
        .with_position(x, y)
        .with_input(Port::number("A"))
        .with_input(Port::number("B"))
        .with_input(Port::choice("Operation", Operation::ALL.map(Operation::label)))
        .with_output(Port::number("Result"))
}
