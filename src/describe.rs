//! Aggregation of column descriptions for every table in a model.

use crate::model::TableNode;
use crate::resolver::{ColumnDescription, MetadataResolver, ResolveError};
use std::collections::HashMap;
use tracing::debug;

/// Column descriptions keyed by table identifier (alias included).
pub type TableDescriptions = HashMap<String, ColumnDescription>;

/// Resolves column metadata for each distinct table of one build.
///
/// Lookups are memoized by base table name, so aliases of the same table and
/// tables reached through several branches hit the resolver once.
pub struct DescriptionAggregator<'r> {
    resolver: &'r dyn MetadataResolver,
    cache: HashMap<String, ColumnDescription>,
}

impl<'r> DescriptionAggregator<'r> {
    pub fn new(resolver: &'r dyn MetadataResolver) -> Self {
        Self {
            resolver,
            cache: HashMap::new(),
        }
    }

    pub fn aggregate(mut self, root: &TableNode) -> Result<TableDescriptions, ResolveError> {
        let mut descriptions = TableDescriptions::new();
        self.visit(root, &mut descriptions)?;
        Ok(descriptions)
    }

    fn visit(
        &mut self,
        node: &TableNode,
        descriptions: &mut TableDescriptions,
    ) -> Result<(), ResolveError> {
        for sub_graph in &node.sub_graphs {
            for child in &sub_graph.tables {
                self.visit(child, descriptions)?;
            }
        }

        if !descriptions.contains_key(&node.name) {
            let columns = self.resolve(node.base_name())?;
            descriptions.insert(node.name.clone(), columns);
        }
        Ok(())
    }

    fn resolve(&mut self, table: &str) -> Result<ColumnDescription, ResolveError> {
        if let Some(columns) = self.cache.get(table) {
            return Ok(columns.clone());
        }
        debug!(table, "resolving table metadata");
        let columns = self.resolver.describe(table)?;
        self.cache.insert(table.to_string(), columns.clone());
        Ok(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{KeyRelationship, SubGraph};
    use crate::resolver::{Catalog, Column};
    use std::cell::RefCell;

    struct CountingResolver {
        catalog: Catalog,
        calls: RefCell<Vec<String>>,
    }

    impl MetadataResolver for CountingResolver {
        fn describe(&self, table: &str) -> Result<ColumnDescription, ResolveError> {
            self.calls.borrow_mut().push(table.to_string());
            self.catalog.describe(table)
        }
    }

    fn node(name: &str, tables: Vec<TableNode>) -> TableNode {
        TableNode {
            name: name.to_string(),
            sub_graphs: vec![SubGraph {
                database: "D".to_string(),
                keys: vec![KeyRelationship::split("id")],
                tables,
            }],
        }
    }

    fn catalog() -> Catalog {
        Catalog::new()
            .with_table("A", &[("id", "NUMBER")])
            .with_table("B", &[("id", "NUMBER"), ("name", "VARCHAR")])
            .with_table("C", &[("id", "NUMBER")])
    }

    #[test]
    fn test_post_order_resolution() {
        let resolver = CountingResolver {
            catalog: catalog(),
            calls: RefCell::new(Vec::new()),
        };
        let root = node("A", vec![node("B", vec![TableNode::leaf("C")])]);
        let descriptions = DescriptionAggregator::new(&resolver).aggregate(&root).unwrap();

        assert_eq!(descriptions.len(), 3);
        assert_eq!(
            descriptions["B"],
            vec![Column::new("id", "NUMBER"), Column::new("name", "VARCHAR")]
        );
        assert_eq!(*resolver.calls.borrow(), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_repeated_table_resolved_once() {
        let resolver = CountingResolver {
            catalog: catalog(),
            calls: RefCell::new(Vec::new()),
        };
        let root = node(
            "A",
            vec![node("B", vec![TableNode::leaf("C")]), TableNode::leaf("C")],
        );
        let descriptions = DescriptionAggregator::new(&resolver).aggregate(&root).unwrap();

        assert_eq!(descriptions.len(), 3);
        assert_eq!(*resolver.calls.borrow(), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_alias_resolves_base_table() {
        let resolver = CountingResolver {
            catalog: catalog(),
            calls: RefCell::new(Vec::new()),
        };
        let root = node("A", vec![TableNode::leaf("B/B1"), TableNode::leaf("B/B2")]);
        let descriptions = DescriptionAggregator::new(&resolver).aggregate(&root).unwrap();

        assert_eq!(descriptions["B/B1"].len(), 2);
        assert_eq!(descriptions["B/B2"].len(), 2);
        assert!(!descriptions.contains_key("B"));
        assert_eq!(*resolver.calls.borrow(), vec!["B", "A"]);
    }

    #[test]
    fn test_unknown_table_aborts() {
        let cat = catalog();
        let root = node("A", vec![TableNode::leaf("MISSING")]);
        let err = DescriptionAggregator::new(&cat).aggregate(&root).unwrap_err();
        assert!(matches!(err, ResolveError::UnknownTable(ref t) if t == "MISSING"));
    }
}
