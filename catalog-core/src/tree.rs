//! Menu tree storage and mutation.
//!
//! Nodes live in a flat arena (`id -> MenuNode`) with ordered child-id
//! lists, so every id-addressed edit is a single map lookup instead of a
//! recursive walk. The serialized form is the nested item list, which keeps
//! the catalog file readable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tracing::warn;

use crate::models::DevelopmentStatus;
use crate::reorder;

/// Kind of a node in a module's menu tree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum NodeKind {
    Menu,
    Submenu,
    MenuType,
    SubmenuType,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Menu => "menu",
            NodeKind::Submenu => "submenu",
            NodeKind::MenuType => "menuType",
            NodeKind::SubmenuType => "submenuType",
        }
    }

    /// Type nodes are leaves; only menus and submenus own children.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeKind::MenuType | NodeKind::SubmenuType)
    }

    /// Whether a node of this kind may own a child of `child` kind.
    /// Menus sit only at the top level; submenus may nest under menus and
    /// under other submenus.
    pub fn allows_child(&self, child: NodeKind) -> bool {
        match self {
            NodeKind::Menu => matches!(child, NodeKind::Submenu | NodeKind::MenuType),
            NodeKind::Submenu => matches!(child, NodeKind::Submenu | NodeKind::SubmenuType),
            NodeKind::MenuType | NodeKind::SubmenuType => false,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("{parent_kind} node {parent} cannot contain a {child_kind} child")]
    IncompatibleChild {
        parent: String,
        parent_kind: NodeKind,
        child_kind: NodeKind,
    },
    #[error("only menu nodes can sit at the top level, not {0}")]
    RootKind(NodeKind),
    #[error("a node with id {0} already exists in this tree")]
    DuplicateId(String),
}

/// Serialized (nested) form of a tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<MenuItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub development_status: Option<DevelopmentStatus>,
}

/// A node as stored in the arena.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub status: Option<DevelopmentStatus>,
    children: Vec<String>,
}

impl MenuNode {
    pub fn children(&self) -> &[String] {
        &self.children
    }
}

/// Payload for an insertion. The caller supplies the id (timestamp-derived
/// in the application, fixed strings in tests and the seed).
#[derive(Debug, Clone)]
pub struct NewNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
}

impl NewNode {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }
}

/// Arena-backed menu tree of one module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<MenuItem>", into = "Vec<MenuItem>")]
pub struct MenuTree {
    nodes: HashMap<String, MenuNode>,
    roots: Vec<String>,
}

impl MenuTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&MenuNode> {
        self.nodes.get(id)
    }

    /// Top-level menu ids, in display order.
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn is_root(&self, id: &str) -> bool {
        self.roots.iter().any(|r| r == id)
    }

    pub fn is_child_of(&self, parent_id: &str, child_id: &str) -> bool {
        self.nodes
            .get(parent_id)
            .map(|p| p.children.iter().any(|c| c == child_id))
            .unwrap_or(false)
    }

    pub fn children(&self, id: &str) -> &[String] {
        self.nodes.get(id).map(|n| n.children()).unwrap_or(&[])
    }

    /// Depth-first preorder traversal, in display order.
    pub fn walk(&self) -> Vec<(&MenuNode, usize)> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for root in &self.roots {
            self.walk_into(root, 0, &mut out);
        }
        out
    }

    fn walk_into<'a>(&'a self, id: &str, depth: usize, out: &mut Vec<(&'a MenuNode, usize)>) {
        if let Some(node) = self.nodes.get(id) {
            out.push((node, depth));
            for child in &node.children {
                self.walk_into(child, depth + 1, out);
            }
        }
    }

    // =========================================================================
    // Mutations. Operations addressing a missing id are silent no-ops;
    // structural violations (bad root kind, leaf parents, duplicate ids)
    // are rejected with a typed error and no mutation.
    // =========================================================================

    /// Adds a top-level menu at the end of the display order.
    pub fn add_root(&mut self, node: NewNode) -> Result<(), TreeError> {
        if node.kind != NodeKind::Menu {
            return Err(TreeError::RootKind(node.kind));
        }
        if self.nodes.contains_key(&node.id) {
            return Err(TreeError::DuplicateId(node.id));
        }
        self.roots.push(node.id.clone());
        self.insert_node(node);
        Ok(())
    }

    /// Adds a child under `parent_id`, appended to the sibling order.
    /// Returns `Ok(false)` without mutating when the parent is absent.
    pub fn add_child(&mut self, parent_id: &str, node: NewNode) -> Result<bool, TreeError> {
        let Some(parent) = self.nodes.get(parent_id) else {
            return Ok(false);
        };
        if !parent.kind.allows_child(node.kind) {
            return Err(TreeError::IncompatibleChild {
                parent: parent_id.to_string(),
                parent_kind: parent.kind,
                child_kind: node.kind,
            });
        }
        if self.nodes.contains_key(&node.id) {
            return Err(TreeError::DuplicateId(node.id));
        }
        let id = node.id.clone();
        self.insert_node(node);
        self.nodes
            .get_mut(parent_id)
            .expect("parent checked above")
            .children
            .push(id);
        Ok(true)
    }

    fn insert_node(&mut self, node: NewNode) {
        self.nodes.insert(
            node.id.clone(),
            MenuNode {
                id: node.id,
                name: node.name,
                kind: node.kind,
                status: None,
                children: Vec::new(),
            },
        );
    }

    pub fn rename(&mut self, id: &str, name: &str) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.name = name.to_string();
                true
            }
            None => false,
        }
    }

    /// Removes a node and its whole subtree. Attachments referencing the
    /// removed ids keep their denormalized snapshots; nothing else is
    /// touched.
    pub fn remove(&mut self, id: &str) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }

        // detach from the parent's child list (or the root list)
        if let Some(pos) = self.roots.iter().position(|r| r == id) {
            self.roots.remove(pos);
        } else if let Some(parent) = self
            .nodes
            .values_mut()
            .find(|n| n.children.iter().any(|c| c == id))
        {
            parent.children.retain(|c| c != id);
        }

        // drop the subtree from the arena
        let mut stack = vec![id.to_string()];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.children);
            }
        }
        true
    }

    /// Sets or clears the development status. Clearing removes the field
    /// entirely; the serialized node carries no status key afterwards.
    pub fn set_status(&mut self, id: &str, status: Option<DevelopmentStatus>) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.status = status;
                true
            }
            None => false,
        }
    }

    /// Ordered move within a sibling list; `None` addresses the top-level
    /// menus. This is the splice semantics, deliberately distinct from the
    /// module swap.
    pub fn move_child(&mut self, parent_id: Option<&str>, from: usize, to: usize) -> bool {
        match parent_id {
            None => reorder::move_element(&mut self.roots, from, to),
            Some(pid) => match self.nodes.get_mut(pid) {
                Some(parent) => reorder::move_element(&mut parent.children, from, to),
                None => {
                    warn!(parent = pid, "move rejected: parent not in tree");
                    false
                }
            },
        }
    }
}

impl From<Vec<MenuItem>> for MenuTree {
    fn from(items: Vec<MenuItem>) -> Self {
        let mut tree = MenuTree::default();
        for item in items {
            let id = item.id.clone();
            tree.roots.push(id);
            tree.absorb(item);
        }
        tree
    }
}

impl MenuTree {
    fn absorb(&mut self, item: MenuItem) {
        let children: Vec<String> = item.items.iter().map(|c| c.id.clone()).collect();
        self.nodes.insert(
            item.id.clone(),
            MenuNode {
                id: item.id,
                name: item.name,
                kind: item.kind,
                status: item.development_status,
                children,
            },
        );
        for child in item.items {
            self.absorb(child);
        }
    }

    fn to_item(&self, id: &str) -> Option<MenuItem> {
        let node = self.nodes.get(id)?;
        Some(MenuItem {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind,
            items: node
                .children
                .iter()
                .filter_map(|c| self.to_item(c))
                .collect(),
            development_status: node.status,
        })
    }
}

impl From<MenuTree> for Vec<MenuItem> {
    fn from(tree: MenuTree) -> Self {
        tree.roots
            .iter()
            .filter_map(|id| tree.to_item(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> MenuTree {
        let mut tree = MenuTree::new();
        tree.add_root(NewNode::new("menu1", "Acessos", NodeKind::Menu))
            .unwrap();
        tree.add_child("menu1", NewNode::new("sub1", "Usuário", NodeKind::Submenu))
            .unwrap();
        tree.add_child("menu1", NewNode::new("sub2", "Perfil", NodeKind::Submenu))
            .unwrap();
        tree.add_child(
            "sub1",
            NewNode::new("type1", "Interno", NodeKind::SubmenuType),
        )
        .unwrap();
        tree.add_root(NewNode::new("menu2", "Pessoas", NodeKind::Menu))
            .unwrap();
        tree.add_child(
            "menu2",
            NewNode::new("type2", "Motorista", NodeKind::MenuType),
        )
        .unwrap();
        tree
    }

    #[test]
    fn add_child_on_missing_parent_is_silent_noop() {
        let mut tree = sample_tree();
        let before = tree.clone();
        let added = tree
            .add_child("ghost", NewNode::new("x", "X", NodeKind::Submenu))
            .unwrap();
        assert!(!added);
        assert_eq!(tree, before);
    }

    #[test]
    fn leaf_nodes_reject_children() {
        let mut tree = sample_tree();
        let err = tree
            .add_child("type2", NewNode::new("x", "X", NodeKind::Submenu))
            .unwrap_err();
        assert_eq!(
            err,
            TreeError::IncompatibleChild {
                parent: "type2".into(),
                parent_kind: NodeKind::MenuType,
                child_kind: NodeKind::Submenu,
            }
        );
        assert!(!tree.contains("x"));
    }

    #[test]
    fn menu_rejects_submenu_type_and_submenu_rejects_menu_type() {
        let mut tree = sample_tree();
        assert!(tree
            .add_child("menu1", NewNode::new("x", "X", NodeKind::SubmenuType))
            .is_err());
        assert!(tree
            .add_child("sub1", NewNode::new("x", "X", NodeKind::MenuType))
            .is_err());
        // submenus may nest under submenus
        assert!(tree
            .add_child("sub1", NewNode::new("sub3", "Nested", NodeKind::Submenu))
            .unwrap());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut tree = sample_tree();
        assert_eq!(
            tree.add_child("menu1", NewNode::new("sub1", "Again", NodeKind::Submenu)),
            Err(TreeError::DuplicateId("sub1".into()))
        );
        assert_eq!(
            tree.add_root(NewNode::new("menu1", "Again", NodeKind::Menu)),
            Err(TreeError::DuplicateId("menu1".into()))
        );
    }

    #[test]
    fn roots_must_be_menus() {
        let mut tree = MenuTree::new();
        assert_eq!(
            tree.add_root(NewNode::new("s", "S", NodeKind::Submenu)),
            Err(TreeError::RootKind(NodeKind::Submenu))
        );
        assert!(tree.is_empty());
    }

    #[test]
    fn remove_cascades_to_descendants() {
        let mut tree = sample_tree();
        assert!(tree.remove("menu1"));
        for id in ["menu1", "sub1", "sub2", "type1"] {
            assert!(!tree.contains(id), "{id} should be gone");
        }
        // the sibling menu is untouched
        assert!(tree.contains("menu2"));
        assert!(tree.contains("type2"));
        assert_eq!(tree.roots(), ["menu2".to_string()]);
    }

    #[test]
    fn remove_missing_id_is_silent_noop() {
        let mut tree = sample_tree();
        let before = tree.clone();
        assert!(!tree.remove("ghost"));
        assert_eq!(tree, before);
    }

    #[test]
    fn rename_and_missing_rename() {
        let mut tree = sample_tree();
        assert!(tree.rename("sub1", "Usuários"));
        assert_eq!(tree.get("sub1").unwrap().name, "Usuários");
        assert!(!tree.rename("ghost", "X"));
    }

    #[test]
    fn clearing_status_removes_the_field_from_serialized_form() {
        let mut tree = sample_tree();
        assert!(tree.set_status("sub1", Some(DevelopmentStatus::Completed)));
        let yaml = serde_yaml::to_string(&tree).unwrap();
        assert!(yaml.contains("development_status: completed"));

        assert!(tree.set_status("sub1", None));
        assert_eq!(tree.get("sub1").unwrap().status, None);
        let yaml = serde_yaml::to_string(&tree).unwrap();
        assert!(!yaml.contains("development_status"));
    }

    #[test]
    fn status_on_missing_id_is_noop() {
        let mut tree = sample_tree();
        assert!(!tree.set_status("ghost", Some(DevelopmentStatus::Testing)));
    }

    #[test]
    fn move_child_reorders_roots_and_siblings() {
        let mut tree = sample_tree();
        assert!(tree.move_child(None, 0, 1));
        assert_eq!(tree.roots(), ["menu2".to_string(), "menu1".to_string()]);

        assert!(tree.move_child(Some("menu1"), 1, 0));
        assert_eq!(
            tree.children("menu1"),
            ["sub2".to_string(), "sub1".to_string()]
        );

        assert!(!tree.move_child(Some("ghost"), 0, 1));
    }

    #[test]
    fn nested_round_trip_preserves_structure_and_order() {
        let mut tree = sample_tree();
        tree.set_status("type1", Some(DevelopmentStatus::InProgress));
        let items: Vec<MenuItem> = tree.clone().into();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "menu1");
        assert_eq!(items[0].items[0].id, "sub1");
        assert_eq!(items[0].items[0].items[0].id, "type1");
        assert_eq!(
            items[0].items[0].items[0].development_status,
            Some(DevelopmentStatus::InProgress)
        );

        let rebuilt = MenuTree::from(items);
        assert_eq!(rebuilt, tree);
    }

    #[test]
    fn walk_yields_display_order_with_depth() {
        let tree = sample_tree();
        let flat: Vec<(&str, usize)> = tree
            .walk()
            .into_iter()
            .map(|(n, d)| (n.id.as_str(), d))
            .collect();
        assert_eq!(
            flat,
            [
                ("menu1", 0),
                ("sub1", 1),
                ("type1", 2),
                ("sub2", 1),
                ("menu2", 0),
                ("type2", 1),
            ]
        );
    }
}
