//! Collection of the attributes that take part in key relationships.

use crate::model::TableNode;
use std::collections::{HashMap, HashSet};

/// Per-table attribute names that appear on either side of a relationship.
pub type KeyAttributes = HashMap<String, HashSet<String>>;

/// Walk the tree from `root` and gather, for every table, the attributes
/// used as parent-side or child-side keys. Tables reached through several
/// paths accumulate attributes from all of them.
pub fn collect_key_attributes(root: &TableNode) -> KeyAttributes {
    let mut attributes = KeyAttributes::new();
    collect_into(root, &mut attributes);
    attributes
}

fn collect_into(node: &TableNode, attributes: &mut KeyAttributes) {
    if node.is_leaf() {
        return;
    }

    for sub_graph in &node.sub_graphs {
        let parent = attributes.entry(node.name.clone()).or_default();
        for key in &sub_graph.keys {
            parent.insert(key.parent_attribute.clone());
        }

        for child in &sub_graph.tables {
            let entry = attributes.entry(child.name.clone()).or_default();
            for key in &sub_graph.keys {
                entry.insert(key.child_attribute.clone());
            }
            collect_into(child, attributes);
        }
    }
}
