// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in node catalog.
//!
//! Node types differ only in their ports and their [`NodeLogic`]; each
//! submodule provides constructors that wire those together.
//!
//! [`NodeLogic`]: crate::evaluation::NodeLogic

pub mod constants;
pub mod data;
pub mod math;
pub mod transform;

use crate::registry::{NodeRegistry, RegistryError};

/// Register every built-in node type
pub fn register_builtin_nodes(registry: &mut NodeRegistry) -> Result<(), RegistryError> {
    // Constants
    registry.register(Some(constants::constant_number), "ConstantNumber", "Constant Number", "/Constants/")?;
    registry.register(Some(constants::constant_string), "ConstantString", "Constant String", "/Constants/")?;
    registry.register(Some(constants::constant_textbox), "ConstantTextbox", "Constant Textbox", "/Constants/")?;

    // Data
    registry.register(Some(data::substring), "Substring", "Substring", "/Data/")?;
    registry.register(Some(data::concat), "Concat", "Concat", "/Data/")?;
    registry.register(Some(data::to_base64), "ToBase64", "To Base64", "/Data/")?;
    registry.register(Some(data::from_base64), "FromBase64", "From Base64", "/Data/")?;

    // Transformation
    registry.register(Some(transform::to_lower), "ToLower", "To Lowercase", "/Transform/")?;
    registry.register(Some(transform::to_upper), "ToUpper", "To Uppercase", "/Transform/")?;

    // Math
    registry.register(Some(math::math), "Math", "Math", "/Math/")?;

    Ok(())
}

/// Create a registry holding the built-in catalog
pub fn create_builtin_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    if let Err(err) = register_builtin_nodes(&mut registry) {
        tracing::error!(error = %err, "failed to register built-in nodes");
    }
    registry
}
