// SPDX-License-Identifier: MIT OR Apache-2.0
//! Registry of instantiable node types.
//!
//! Pure catalog state: a type id maps to a constructor plus the display name
//! and menu path a node picker groups it under.

use crate::node::Node;
use indexmap::IndexMap;
use serde::Serialize;

/// Menu path used when a type is registered without one
pub const ROOT_MENU_PATH: &str = "/";

/// Builds a node of one type at a position
pub type NodeConstructor = fn(x: f32, y: f32) -> Node;

/// A registered node type
#[derive(Debug, Clone, Serialize)]
pub struct NodeTypeInfo {
    /// Unique type identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Menu path, `/`-separated
    pub menu_path: String,
    #[serde(skip)]
    constructor: NodeConstructor,
}

/// A group in the node picker menu
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MenuGroup {
    /// Group label, empty for the top level
    pub name: String,
    /// Node types listed directly in this group
    pub items: Vec<MenuItem>,
    /// Nested groups
    pub groups: Vec<MenuGroup>,
}

/// An entry in the node picker menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuItem {
    /// Type identifier
    pub id: String,
    /// Display name
    pub name: String,
}

impl MenuGroup {
    fn group_mut(&mut self, name: &str) -> &mut MenuGroup {
        let index = match self.groups.iter().position(|g| g.name == name) {
            Some(index) => index,
            None => {
                self.groups.push(MenuGroup {
                    name: name.to_string(),
                    ..MenuGroup::default()
                });
                self.groups.len() - 1
            }
        };
        &mut self.groups[index]
    }

    /// Find a nested group by path segments
    pub fn find(&self, path: &[&str]) -> Option<&MenuGroup> {
        match path.split_first() {
            None => Some(self),
            Some((head, rest)) => self.groups.iter().find(|g| g.name == *head)?.find(rest),
        }
    }
}

/// Registry of available node types
#[derive(Debug, Default)]
pub struct NodeRegistry {
    /// Registered node types by ID
    types: IndexMap<String, NodeTypeInfo>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            types: IndexMap::new(),
        }
    }

    /// Register a node type.
    ///
    /// A missing constructor or an id that is already taken is logged and
    /// leaves the registry unchanged.
    pub fn register(
        &mut self,
        constructor: Option<NodeConstructor>,
        id: &str,
        name: &str,
        menu_path: &str,
    ) -> Result<(), RegistryError> {
        let Some(constructor) = constructor else {
            tracing::error!(id, menu_path, "invalid node type provided for registration");
            return Err(RegistryError::MissingConstructor(id.to_string()));
        };
        if self.types.contains_key(id) {
            tracing::warn!(id, "node type is already registered");
            return Err(RegistryError::DuplicateType(id.to_string()));
        }

        tracing::debug!(id, "registering node type");
        self.types.insert(
            id.to_string(),
            NodeTypeInfo {
                id: id.to_string(),
                name: name.to_string(),
                menu_path: menu_path.to_string(),
                constructor,
            },
        );
        Ok(())
    }

    /// Register a node type at the top level of the menu
    pub fn register_at_root(
        &mut self,
        constructor: Option<NodeConstructor>,
        id: &str,
        name: &str,
    ) -> Result<(), RegistryError> {
        self.register(constructor, id, name, ROOT_MENU_PATH)
    }

    /// Get a node type by ID
    pub fn get(&self, id: &str) -> Option<&NodeTypeInfo> {
        self.types.get(id)
    }

    /// Get all registered types, in registration order
    pub fn types(&self) -> impl Iterator<Item = &NodeTypeInfo> {
        self.types.values()
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Create a node from a type ID
    pub fn create_node(&self, type_id: &str, x: f32, y: f32) -> Option<Node> {
        let Some(info) = self.types.get(type_id) else {
            tracing::warn!(type_id, "unknown node type");
            return None;
        };
        let mut node = (info.constructor)(x, y).with_position(x, y);
        node.node_type = info.id.clone();
        Some(node)
    }

    /// Group the catalog by menu path segments
    pub fn menu_tree(&self) -> MenuGroup {
        let mut root = MenuGroup::default();
        for info in self.types.values() {
            let group = info
                .menu_path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .fold(&mut root, |group, segment| group.group_mut(segment));
            group.items.push(MenuItem {
                id: info.id.clone(),
                name: info.name.clone(),
            });
        }
        root
    }

    /// Types whose display name or id contains `filter`, ignoring case
    pub fn search(&self, filter: &str) -> Vec<&NodeTypeInfo> {
        let filter = filter.trim().to_lowercase();
        self.types
            .values()
            .filter(|info| {
                filter.is_empty()
                    || info.name.to_lowercase().contains(&filter)
                    || info.id.to_lowercase().contains(&filter)
            })
            .collect()
    }
}

/// Error when registering a node type
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No constructor was supplied
    #[error("No constructor provided for node type: {0}")]
    MissingConstructor(String),

    /// The id is taken
    #[error("Node type already registered: {0}")]
    DuplicateType(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{NodeContext, NodeLogic};
    use crate::port::Port;

    #[derive(Debug)]
    struct Nothing;

    impl NodeLogic for Nothing {
        fn compute(&self, _ctx: &mut NodeContext<'_>) {}
    }

    fn blank(_x: f32, _y: f32) -> Node {
        Node::new("Blank", Nothing).with_output(Port::string("output"))
    }

    fn registry() -> NodeRegistry {
        let mut registry = NodeRegistry::new();
        registry.register(Some(blank), "Alpha", "Alpha Node", "/Data/").unwrap();
        registry.register(Some(blank), "Beta", "Beta Node", "/Data/Deep/").unwrap();
        registry.register_at_root(Some(blank), "Gamma", "Gamma").unwrap();
        registry
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut registry = registry();
        let result = registry.register(Some(blank), "Alpha", "Other", "/Other/");
        assert!(matches!(result, Err(RegistryError::DuplicateType(_))));
        assert_eq!(registry.get("Alpha").unwrap().name, "Alpha Node");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_missing_constructor_is_rejected() {
        let mut registry = NodeRegistry::new();
        let result = registry.register_at_root(None, "Ghost", "Ghost");
        assert!(matches!(result, Err(RegistryError::MissingConstructor(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_create_node() {
        let registry = registry();
        let node = registry.create_node("Beta", 10.0, 20.0).unwrap();
        assert_eq!(node.node_type, "Beta");
        assert_eq!(node.position, [10.0, 20.0]);
        assert!(node.output("output").is_some());
        assert!(registry.create_node("Missing", 0.0, 0.0).is_none());
    }

    #[test]
    fn test_menu_tree_groups_by_path() {
        let tree = registry().menu_tree();
        assert_eq!(tree.items.len(), 1);
        assert_eq!(tree.items[0].id, "Gamma");
        assert_eq!(registry().get("Gamma").unwrap().menu_path, ROOT_MENU_PATH);

        let data = tree.find(&["Data"]).unwrap();
        assert_eq!(data.items.len(), 1);
        assert_eq!(data.items[0].name, "Alpha Node");

        let deep = tree.find(&["Data", "Deep"]).unwrap();
        assert_eq!(deep.items[0].id, "Beta");
        assert!(tree.find(&["Nope"]).is_none());
    }

    #[test]
    fn test_search_matches_name_or_id() {
        let registry = registry();
        let ids: Vec<&str> = registry.search("NODE").iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["Alpha", "Beta"]);
        assert_eq!(registry.search("gam").len(), 1);
        assert_eq!(registry.search("").len(), 3);
    }
}
