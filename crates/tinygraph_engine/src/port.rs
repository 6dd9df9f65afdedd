// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for node inputs/outputs.

use crate::graph::ConnectionError;
use crate::node::NodeId;
use crate::view::{PortView, ViewHandle};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Input port
    Input,
    /// Output port
    Output,
}

/// Address of a port on a specific node.
///
/// Port ids are only unique per node and per side, so the direction is part
/// of the address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PortRef {
    /// Owning node
    pub node: NodeId,
    /// Which side of the node the port lives on
    pub direction: PortDirection,
    /// Port id within that side
    pub port: String,
}

impl PortRef {
    /// Address an input port
    pub fn input(node: NodeId, port: impl Into<String>) -> Self {
        Self {
            node,
            direction: PortDirection::Input,
            port: port.into(),
        }
    }

    /// Address an output port
    pub fn output(node: NodeId, port: impl Into<String>) -> Self {
        Self {
            node,
            direction: PortDirection::Output,
            port: port.into(),
        }
    }
}

/// Data type that can flow through ports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PortType {
    /// Numeric field
    Number,
    /// Single line string
    String,
    /// Multi line text
    Text,
    /// Boolean value
    Bool,
    /// Any type (for generic nodes)
    Any,
    /// Fixed set of options (dropdown)
    Choice(Vec<String>),
}

impl PortType {
    /// Get the socket color for this port type (for UI)
    pub fn color(&self) -> [u8; 3] {
        match self {
            Self::Number => [243, 156, 18],
            Self::String | Self::Text => [39, 174, 96],
            Self::Bool => [41, 128, 185],
            Self::Any => [142, 68, 173],
            Self::Choice(_) => [136, 136, 136],
        }
    }

    /// Short name of the type
    pub fn name(&self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::String | Self::Text => "string",
            Self::Bool => "boolean",
            Self::Any => "any",
            Self::Choice(_) => "dropdown",
        }
    }
}

/// Value that can be stored in a port
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PortValue {
    /// Boolean
    Bool(bool),
    /// Number
    Number(f64),
    /// String
    String(String),
}

impl PortValue {
    /// Loose numeric reading of the value.
    ///
    /// Text is trimmed and parsed, blank text reads as 0 and booleans as
    /// 0/1. Returns `None` when the value is not a number.
    pub fn as_number(&self) -> Option<f64> {
        let number = match self {
            Self::Number(n) => *n,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else {
                    trimmed.parse::<f64>().ok()?
                }
            }
        };
        (!number.is_nan()).then_some(number)
    }

    /// Borrow the string payload, if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write_number(f, *n),
            Self::String(s) => f.write_str(s),
        }
    }
}

/// Numbers render the way script engines print them: `Infinity`, no
/// negative zero, and exponent form outside `[1e-6, 1e21)`.
fn write_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_infinite() {
        return f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if n == 0.0 {
        return f.write_str("0");
    }
    let magnitude = n.abs();
    if magnitude.is_finite() && !(1e-6..1e21).contains(&magnitude) {
        let text = format!("{n:e}");
        return match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                write!(f, "{mantissa}e+{exponent}")
            }
            _ => f.write_str(&text),
        };
    }
    write!(f, "{n}")
}

impl From<f64> for PortValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for PortValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for PortValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PortValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

/// Numeric reading of an optional value; an empty port reads as 0.
pub fn number_or_zero(value: Option<&PortValue>) -> Option<f64> {
    value.map_or(Some(0.0), PortValue::as_number)
}

/// Text reading of an optional value; an empty port reads as "".
pub fn text_or_empty(value: Option<&PortValue>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

/// A port on a node
#[derive(Debug)]
pub struct Port {
    /// Port id, unique on its side of the owning node
    pub id: String,
    /// Data type
    pub port_type: PortType,
    direction: PortDirection,
    allow_connections: bool,
    bounds: Option<(f64, f64)>,
    value: Option<PortValue>,
    connections: Vec<PortRef>,
    node: Option<NodeId>,
    can_edit: bool,
    view: Option<Box<dyn PortView>>,
}

impl Port {
    /// Create a new port.
    ///
    /// The direction is decided when the port is added to a node. Choice
    /// ports start at their first option and never accept connections.
    pub fn new(id: impl Into<String>, port_type: PortType) -> Self {
        let (allow_connections, value) = match &port_type {
            PortType::Choice(options) => (false, options.first().cloned().map(PortValue::String)),
            _ => (true, None),
        };
        Self {
            id: id.into(),
            port_type,
            direction: PortDirection::Input,
            allow_connections,
            bounds: None,
            value,
            connections: Vec::new(),
            node: None,
            can_edit: true,
            view: None,
        }
    }

    /// Create a numeric port
    pub fn number(id: impl Into<String>) -> Self {
        Self::new(id, PortType::Number)
    }

    /// Create a single line string port
    pub fn string(id: impl Into<String>) -> Self {
        Self::new(id, PortType::String)
    }

    /// Create a multi line text port
    pub fn text(id: impl Into<String>) -> Self {
        Self::new(id, PortType::Text)
    }

    /// Create a dropdown port
    pub fn choice<S: Into<String>>(id: impl Into<String>, options: impl IntoIterator<Item = S>) -> Self {
        Self::new(id, PortType::Choice(options.into_iter().map(Into::into).collect()))
    }

    /// Restrict a numeric port to an inclusive range
    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.bounds = Some((min, max));
        self
    }

    /// Set the initial value
    pub fn with_value(mut self, value: impl Into<PortValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Disable connections on this port
    pub fn without_connections(mut self) -> Self {
        self.allow_connections = false;
        self
    }

    /// Whether this is an input port
    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }

    /// Whether the port can take part in connections
    pub fn allow_connections(&self) -> bool {
        self.allow_connections
    }

    /// Last stored value
    pub fn value(&self) -> Option<&PortValue> {
        self.value.as_ref()
    }

    /// Connected peer ports
    pub fn connections(&self) -> &[PortRef] {
        &self.connections
    }

    /// Whether any connection is attached
    pub fn is_connected(&self) -> bool {
        !self.connections.is_empty()
    }

    /// Owning node, once the port has been added to one
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Address of this port, once it has been added to a node
    pub fn port_ref(&self) -> Option<PortRef> {
        self.node.map(|node| PortRef {
            node,
            direction: self.direction,
            port: self.id.clone(),
        })
    }

    /// Whether the user may edit the value
    pub fn can_edit(&self) -> bool {
        self.can_edit
    }

    /// Attach a presentation adapter and mount it
    pub fn attach_view(&mut self, mut view: Box<dyn PortView>) -> ViewHandle {
        let handle = view.on_mount(&self.id, &self.port_type, self.direction);
        view.on_set_value(self.value.as_ref());
        view.on_set_can_edit(self.can_edit);
        self.view = Some(view);
        handle
    }

    /// Toggle user editing
    pub fn set_can_edit(&mut self, can_edit: bool) {
        self.can_edit = can_edit;
        if let Some(view) = self.view.as_mut() {
            view.on_set_can_edit(can_edit);
        }
    }

    /// Whether the port kind accepts `value`
    pub fn accepts(&self, value: &PortValue) -> bool {
        match &self.port_type {
            PortType::Number => match (value.as_number(), self.bounds) {
                (None, _) => false,
                (Some(n), Some((min, max))) => n >= min && n <= max,
                (Some(_), None) => true,
            },
            PortType::Choice(options) => value
                .as_str()
                .is_some_and(|s| options.iter().any(|o| o == s)),
            _ => true,
        }
    }

    /// Whether the port may hold `value`, where `None` means empty.
    ///
    /// Dropdowns always hold one of their options; other kinds may be empty.
    pub fn admits(&self, value: Option<&PortValue>) -> bool {
        match value {
            Some(value) => self.accepts(value),
            None => !matches!(self.port_type, PortType::Choice(_)),
        }
    }

    /// Check the stored value against the port kind
    pub fn validate(&self) -> bool {
        self.admits(self.value.as_ref())
    }

    /// Check whether this port may start a connection into `target`
    pub fn can_connect_to(&self, target: &Port) -> Result<(), ConnectionError> {
        if !self.allow_connections {
            return Err(ConnectionError::ConnectionsDisabled(self.id.clone()));
        }
        if !target.allow_connections {
            return Err(ConnectionError::ConnectionsDisabled(target.id.clone()));
        }
        if self.is_input() {
            return Err(ConnectionError::NotAnOutput(self.id.clone()));
        }
        if !target.is_input() {
            return Err(ConnectionError::NotAnInput(target.id.clone()));
        }
        if target.is_connected() {
            return Err(ConnectionError::PortAlreadyConnected(target.id.clone()));
        }
        Ok(())
    }

    pub(crate) fn attach(&mut self, node: NodeId, direction: PortDirection) {
        self.node = Some(node);
        self.direction = direction;
    }

    /// Store a value and notify the view. Propagation is the graph's job.
    pub(crate) fn set_value(&mut self, value: Option<PortValue>) {
        self.value = value;
        if let Some(view) = self.view.as_mut() {
            view.on_set_value(self.value.as_ref());
        }
    }

    pub(crate) fn link(&mut self, peer: PortRef) {
        self.connections.push(peer);
        if self.is_input() {
            self.set_can_edit(false);
        }
    }

    pub(crate) fn unlink(&mut self, peer: &PortRef) -> bool {
        let before = self.connections.len();
        self.connections.retain(|p| p != peer);
        let removed = self.connections.len() != before;
        if removed && self.is_input() && self.connections.is_empty() {
            self.set_can_edit(true);
        }
        removed
    }
}
