// SPDX-License-Identifier: MIT OR Apache-2.0
//! String data nodes: substring, concatenation and base64.

use crate::evaluation::{NodeContext, NodeLogic};
use crate::node::Node;
use crate::port::{text_or_empty, Port};
use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

/// Decoder that ignores padding and stray trailing bits
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Integer reading of an input. Empty reads as 0, `None` means not an integer.
fn integer_input(ctx: &NodeContext<'_>, id: &str) -> Option<i64> {
    match ctx.get_input_value(id) {
        None => Some(0),
        Some(value) => value
            .as_number()
            .filter(|n| n.is_finite() && n.fract() == 0.0)
            .map(|n| n as i64),
    }
}

/// Slice by character index; negative indices count from the end.
fn slice_chars(chars: &[char], start: i64, end: i64) -> String {
    let len = chars.len() as i64;
    let clamp = |index: i64| {
        if index < 0 {
            (len + index).max(0)
        } else {
            index.min(len)
        }
    };
    let (start, end) = (clamp(start), clamp(end));
    if end <= start {
        return String::new();
    }
    chars[start as usize..end as usize].iter().collect()
}

/// Extracts `length` characters from `start`
#[derive(Debug)]
pub struct Substring;

impl NodeLogic for Substring {
    fn validate(&self, ctx: &mut NodeContext<'_>) -> bool {
        if integer_input(ctx, "start").is_none() {
            ctx.invalidate("Start must be within the bounds of the input string");
            ctx.set_output_value("output", None);
            return false;
        }
        if integer_input(ctx, "length").is_none() {
            ctx.invalidate("Length must be a non-negative integer and within the bounds of the input string");
            ctx.set_output_value("output", None);
            return false;
        }
        true
    }

    fn compute(&self, ctx: &mut NodeContext<'_>) {
        let chars: Vec<char> = text_or_empty(ctx.get_input_value("input")).chars().collect();
        let start = integer_input(ctx, "start").unwrap_or(0);
        // Zero or empty length takes the rest of the input
        let length = match integer_input(ctx, "length") {
            Some(0) | None => chars.len() as i64,
            Some(length) => length,
        };
        let output = slice_chars(&chars, start, start.saturating_add(length));
        ctx.set_output_value("output", Some(output.into()));
    }
}

/// Joins two strings
#[derive(Debug)]
pub struct Concat;

impl NodeLogic for Concat {
    fn compute(&self, ctx: &mut NodeContext<'_>) {
        let mut output = text_or_empty(ctx.get_input_value("input1"));
        output.push_str(&text_or_empty(ctx.get_input_value("input2")));
        ctx.set_output_value("output", Some(output.into()));
    }
}

/// Latin-1 bytes of `text`, or `None` if a character does not fit in a byte
fn latin1_bytes(text: &str) -> Option<Vec<u8>> {
    text.chars().map(|c| u8::try_from(c).ok()).collect()
}

fn decode(text: &str) -> Option<String> {
    let compact: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = LENIENT.decode(compact).ok()?;
    Some(bytes.into_iter().map(char::from).collect())
}

/// Encodes its input as base64
#[derive(Debug)]
pub struct ToBase64;

impl NodeLogic for ToBase64 {
    fn validate(&self, ctx: &mut NodeContext<'_>) -> bool {
        if latin1_bytes(&text_or_empty(ctx.get_input_value("input"))).is_none() {
            ctx.invalidate("Invalid string for Base64 encoding");
            ctx.set_output_value("output", None);
            return false;
        }
        true
    }

    fn compute(&self, ctx: &mut NodeContext<'_>) {
        let bytes = latin1_bytes(&text_or_empty(ctx.get_input_value("input"))).unwrap_or_default();
        ctx.set_output_value("output", Some(STANDARD.encode(bytes).into()));
    }
}

/// Decodes base64 input
#[derive(Debug)]
pub struct FromBase64;

impl NodeLogic for FromBase64 {
    fn validate(&self, ctx: &mut NodeContext<'_>) -> bool {
        if decode(&text_or_empty(ctx.get_input_value("input"))).is_none() {
            ctx.invalidate("Invalid string for Base64 decoding");
            ctx.set_output_value("output", None);
            return false;
        }
        true
    }

    fn compute(&self, ctx: &mut NodeContext<'_>) {
        let decoded = decode(&text_or_empty(ctx.get_input_value("input"))).unwrap_or_default();
        ctx.set_output_value("output", Some(decoded.into()));
    }
}

/// Substring node
pub fn substring(x: f32, y: f32) -> Node {
    Node::new("Substring", Substring)
        .with_position(x, y)
        .with_input(Port::string("input"))
        .with_input(Port::number("start"))
        .with_input(Port::number("length"))
        .with_output(Port::string("output"))
}

/// Concatenation node
pub fn concat(x: f32, y: f32) -> Node {
    Node::new("Concat", Concat)
        .with_position(x, y)
        .with_input(Port::string("input1"))
        .with_input(Port::string("input2"))
        .with_output(Port::string("output"))
}

/// Base64 encoder node
pub fn to_base64(x: f32, y: f32) -> Node {
    Node::new("To Base64", ToBase64)
        .with_position(x, y)
        .with_input(Port::text("input"))
        .with_output(Port::text("output"))
}

/// Base64 decoder node
pub fn from_base64(x: f32, y: f32) -> Node {
    Node::new("From Base64", FromBase64)
        .with_position(x, y)
        .with_input(Port::text("input"))
        .with_output(Port::text("output"))
}
