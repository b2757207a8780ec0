/// A parsed schema model: the owning database of the root table plus the
/// table tree hanging off it.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub database: String,
    pub root: TableNode,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableNode {
    /// Table identifier, possibly aliased as `NAME/ALIAS`.
    pub name: String,
    pub sub_graphs: Vec<SubGraph>,
}

/// One relationship context of a table: the children living in `database`,
/// linked to the parent through every entry of `keys`.
#[derive(Debug, Clone, PartialEq)]
pub struct SubGraph {
    pub database: String,
    pub keys: Vec<KeyRelationship>,
    pub tables: Vec<TableNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRelationship {
    pub parent_attribute: String,
    pub child_attribute: String,
}

impl TableNode {
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sub_graphs: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.sub_graphs.is_empty()
    }

    /// Name used for metadata lookups: everything before the first `/`.
    pub fn base_name(&self) -> &str {
        match self.name.split_once('/') {
            Some((base, _)) => base,
            None => &self.name,
        }
    }
}

impl KeyRelationship {
    /// Split `parent/child` on the first `/`. A bare attribute links the same
    /// name on both sides.
    pub fn split(key: &str) -> Self {
        match key.split_once('/') {
            Some((parent, child)) => Self {
                parent_attribute: parent.to_string(),
                child_attribute: child.to_string(),
            },
            None => Self {
                parent_attribute: key.to_string(),
                child_attribute: key.to_string(),
            },
        }
    }
}
