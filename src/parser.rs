//! Loader for JSON schema models.
//!
//! The document shape is
//! `{"CHECKPOINT": {"DB": ...}, "GRAPH": [{"TABLE": null | [sub-graph, ...]}]}`
//! where each sub-graph is `{"DB": ..., "KEYS": [...], "TABLES": [node, ...]}`.

use crate::model::{KeyRelationship, Model, SubGraph, TableNode};
use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing field {field} at {path}")]
    MissingField { path: String, field: &'static str },
    #[error("Expected {expected} at {path}")]
    Unexpected { path: String, expected: &'static str },
    #[error("Malformed key {key:?} at {path}")]
    MalformedKey { path: String, key: String },
}

pub struct Parser<'a> {
    input: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    pub fn parse(&self) -> Result<Model, ParseError> {
        let doc: Value = serde_json::from_str(self.input)?;
        let doc = as_object(&doc, "$")?;

        let checkpoint = field(doc, "$", "CHECKPOINT")?;
        let checkpoint = as_object(checkpoint, "$.CHECKPOINT")?;
        let database = as_str(field(checkpoint, "$.CHECKPOINT", "DB")?, "$.CHECKPOINT.DB")?;

        let graph = as_array(field(doc, "$", "GRAPH")?, "$.GRAPH")?;
        let root = match graph.as_slice() {
            [root] => parse_node(root, "$.GRAPH[0]")?,
            _ => {
                return Err(ParseError::Unexpected {
                    path: "$.GRAPH".to_string(),
                    expected: "exactly one root table",
                });
            }
        };

        Ok(Model {
            database: database.to_string(),
            root,
        })
    }
}

fn parse_node(value: &Value, path: &str) -> Result<TableNode, ParseError> {
    let obj = as_object(value, path)?;
    let mut entries = obj.iter();
    let (name, body) = match (entries.next(), entries.next()) {
        (Some(entry), None) => entry,
        _ => {
            return Err(ParseError::Unexpected {
                path: path.to_string(),
                expected: "an object with exactly one table name",
            });
        }
    };
    if name.is_empty() {
        return Err(ParseError::Unexpected {
            path: path.to_string(),
            expected: "a non-empty table name",
        });
    }

    let path = format!("{}.{}", path, name);
    let sub_graphs = match body {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| parse_sub_graph(item, &format!("{}[{}]", path, i)))
            .collect::<Result<_, _>>()?,
        _ => {
            return Err(ParseError::Unexpected {
                path,
                expected: "null or a list of sub-graphs",
            });
        }
    };

    Ok(TableNode {
        name: name.clone(),
        sub_graphs,
    })
}

fn parse_sub_graph(value: &Value, path: &str) -> Result<SubGraph, ParseError> {
    let obj = as_object(value, path)?;
    let database = as_str(field(obj, path, "DB")?, &format!("{}.DB", path))?;

    let keys_path = format!("{}.KEYS", path);
    let keys = as_array(field(obj, path, "KEYS")?, &keys_path)?
        .iter()
        .enumerate()
        .map(|(i, key)| parse_key(key, &format!("{}[{}]", keys_path, i)))
        .collect::<Result<_, _>>()?;

    let tables_path = format!("{}.TABLES", path);
    let tables = as_array(field(obj, path, "TABLES")?, &tables_path)?
        .iter()
        .enumerate()
        .map(|(i, node)| parse_node(node, &format!("{}[{}]", tables_path, i)))
        .collect::<Result<_, _>>()?;

    Ok(SubGraph {
        database: database.to_string(),
        keys,
        tables,
    })
}

fn parse_key(value: &Value, path: &str) -> Result<KeyRelationship, ParseError> {
    let raw = as_str(value, path)?;
    let key = KeyRelationship::split(raw);
    if key.parent_attribute.is_empty() || key.child_attribute.is_empty() {
        return Err(ParseError::MalformedKey {
            path: path.to_string(),
            key: raw.to_string(),
        });
    }
    Ok(key)
}

fn field<'v>(
    obj: &'v Map<String, Value>,
    path: &str,
    name: &'static str,
) -> Result<&'v Value, ParseError> {
    obj.get(name).ok_or_else(|| ParseError::MissingField {
        path: path.to_string(),
        field: name,
    })
}

fn as_object<'v>(value: &'v Value, path: &str) -> Result<&'v Map<String, Value>, ParseError> {
    value.as_object().ok_or_else(|| ParseError::Unexpected {
        path: path.to_string(),
        expected: "object",
    })
}

fn as_array<'v>(value: &'v Value, path: &str) -> Result<&'v Vec<Value>, ParseError> {
    value.as_array().ok_or_else(|| ParseError::Unexpected {
        path: path.to_string(),
        expected: "list",
    })
}

fn as_str<'v>(value: &'v Value, path: &str) -> Result<&'v str, ParseError> {
    value.as_str().ok_or_else(|| ParseError::Unexpected {
        path: path.to_string(),
        expected: "string",
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_model() {
        let input = r#"{
            "CHECKPOINT": {"DB": "UDEA", "PKS": ["COD_RH"]},
            "GRAPH": [{
                "EN_RECURSO_HUMANO": [{
                    "DB": "UDEA_CV",
                    "KEYS": ["COD_RH/COD_RH_AUTOR", "NRO_ID"],
                    "TABLES": [{"EN_PRODUCTO": null}, {"EN_ARTICULO": null}]
                }]
            }]
        }"#;
        let model = Parser::new(input).parse().unwrap();

        assert_eq!(model.database, "UDEA");
        assert_eq!(model.root.name, "EN_RECURSO_HUMANO");
        assert_eq!(model.root.sub_graphs.len(), 1);

        let sub = &model.root.sub_graphs[0];
        assert_eq!(sub.database, "UDEA_CV");
        assert_eq!(sub.keys[0].parent_attribute, "COD_RH");
        assert_eq!(sub.keys[0].child_attribute, "COD_RH_AUTOR");
        assert_eq!(sub.keys[1].parent_attribute, "NRO_ID");
        assert_eq!(sub.keys[1].child_attribute, "NRO_ID");
        assert_eq!(sub.tables.len(), 2);
        assert!(sub.tables[0].is_leaf());
        assert_eq!(sub.tables[1].name, "EN_ARTICULO");
    }

    #[test]
    fn test_parse_leaf_root() {
        let input = r#"{"CHECKPOINT": {"DB": "D"}, "GRAPH": [{"A": null}]}"#;
        let model = Parser::new(input).parse().unwrap();
        assert!(model.root.is_leaf());
    }

    #[test]
    fn test_empty_sub_graph_list_is_leaf() {
        let input = r#"{"CHECKPOINT": {"DB": "D"}, "GRAPH": [{"A": []}]}"#;
        let model = Parser::new(input).parse().unwrap();
        assert!(model.root.is_leaf());
    }

    #[test]
    fn test_missing_checkpoint() {
        let input = r#"{"GRAPH": [{"A": null}]}"#;
        let err = Parser::new(input).parse().unwrap_err();
        assert!(matches!(err, ParseError::MissingField { field: "CHECKPOINT", .. }));
    }

    #[test]
    fn test_missing_tables_field() {
        let input = r#"{"CHECKPOINT": {"DB": "D"}, "GRAPH": [{"A": [{"DB": "D", "KEYS": ["id"]}]}]}"#;
        let err = Parser::new(input).parse().unwrap_err();
        match err {
            ParseError::MissingField { path, field } => {
                assert_eq!(field, "TABLES");
                assert_eq!(path, "$.GRAPH[0].A[0]");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_node_with_two_names() {
        let input = r#"{"CHECKPOINT": {"DB": "D"}, "GRAPH": [{"A": null, "B": null}]}"#;
        let err = Parser::new(input).parse().unwrap_err();
        assert!(matches!(err, ParseError::Unexpected { .. }));
    }

    #[test]
    fn test_multiple_roots_rejected() {
        let input = r#"{"CHECKPOINT": {"DB": "D"}, "GRAPH": [{"A": null}, {"B": null}]}"#;
        assert!(Parser::new(input).parse().is_err());
    }

    #[test]
    fn test_malformed_key() {
        let input = r#"{"CHECKPOINT": {"DB": "D"}, "GRAPH": [{"A": [{"DB": "D", "KEYS": ["id/"], "TABLES": [{"B": null}]}]}]}"#;
        let err = Parser::new(input).parse().unwrap_err();
        match err {
            ParseError::MalformedKey { key, path } => {
                assert_eq!(key, "id/");
                assert_eq!(path, "$.GRAPH[0].A[0].KEYS[0]");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_json() {
        let err = Parser::new("{").parse().unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }
}
