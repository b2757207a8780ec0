pub mod describe;
pub mod dot;
pub mod keys;
pub mod model;
pub mod palette;
pub mod parser;
pub mod render;
pub mod resolver;
pub mod style;

use wasm_bindgen::prelude::*;

use dot::{BuildError, DotRenderer};
use parser::{ParseError, Parser};
use resolver::{Column, ColumnDescription, MetadataResolver, ResolveError};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Model error: {0}")]
    Parse(#[from] ParseError),
    #[error("Build error: {0}")]
    Build(#[from] BuildError),
}

/// Parse a JSON model and build its DOT program with the default style.
pub fn model_to_dot(
    model_json: &str,
    diagram_name: &str,
    resolver: &dyn MetadataResolver,
) -> Result<String, Error> {
    let model = Parser::new(model_json).parse()?;
    Ok(DotRenderer::default().render(&model, diagram_name, resolver)?)
}

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Metadata resolver backed by a JS callback `(table) => [[column, type], ...]`.
struct JsResolver<'a> {
    describe: &'a js_sys::Function,
}

impl MetadataResolver for JsResolver<'_> {
    fn describe(&self, table: &str) -> Result<ColumnDescription, ResolveError> {
        let lookup_err = |message: String| ResolveError::Lookup {
            table: table.to_string(),
            message,
        };

        let value = self
            .describe
            .call1(&JsValue::NULL, &JsValue::from_str(table))
            .map_err(|e| lookup_err(format!("{:?}", e)))?;
        if value.is_null() || value.is_undefined() {
            return Err(ResolveError::UnknownTable(table.to_string()));
        }
        if !js_sys::Array::is_array(&value) {
            return Err(lookup_err("expected an array of [column, type] pairs".to_string()));
        }

        js_sys::Array::from(&value)
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let fields = js_sys::Array::is_array(&row).then(|| {
                    js_sys::Array::from(&row)
                        .iter()
                        .map(|field| field.as_string())
                        .collect::<Vec<_>>()
                });
                column_from_row(table, i, fields)
            })
            .collect()
    }
}

/// Convert one callback row to a column. `fields` is `None` when the row is
/// not an array; each field is `None` when it is not a string.
fn column_from_row(
    table: &str,
    index: usize,
    fields: Option<Vec<Option<String>>>,
) -> Result<Column, ResolveError> {
    match fields.as_deref() {
        Some([Some(name), Some(data_type)]) => Ok(Column::new(name.as_str(), data_type.as_str())),
        Some(_) => Err(ResolveError::Lookup {
            table: table.to_string(),
            message: format!("row {} must be a [column, type] pair of strings", index),
        }),
        None => Err(ResolveError::Lookup {
            table: table.to_string(),
            message: format!("row {} is not an array", index),
        }),
    }
}

/// Compile a JSON schema model to a Graphviz DOT program
#[wasm_bindgen(js_name = "modelToDot")]
pub fn model_to_dot_js(
    model_json: &str,
    diagram_name: &str,
    describe: &js_sys::Function,
) -> Result<String, String> {
    let resolver = JsResolver { describe };
    model_to_dot(model_json, diagram_name, &resolver).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use resolver::Catalog;

    #[test]
    fn test_model_to_dot() {
        let input = r#"{"CHECKPOINT": {"DB": "D"}, "GRAPH": [{"A": null}]}"#;
        let catalog = Catalog::new().with_table("A", &[("id", "NUMBER")]);
        let dot = model_to_dot(input, "solo", &catalog).unwrap();

        assert!(dot.starts_with("digraph \"solo\" {"));
        assert!(dot.contains("<td align=\"center\">id :: NUMBER</td>"));
        assert!(dot.ends_with('}'));
    }

    #[test]
    fn test_column_from_row() {
        let column =
            column_from_row("T", 0, Some(vec![Some("id".into()), Some("NUMBER".into())])).unwrap();
        assert_eq!(column, Column::new("id", "NUMBER"));

        let err = column_from_row("T", 2, None).unwrap_err();
        assert_eq!(err.to_string(), "Lookup failed for T: row 2 is not an array");

        let err = column_from_row("T", 1, Some(vec![Some("id".into()), None])).unwrap_err();
        assert!(err.to_string().contains("row 1 must be a [column, type] pair"));

        let three = Some(vec![Some("a".into()), Some("b".into()), Some("c".into())]);
        assert!(column_from_row("T", 0, three).is_err());
    }

    #[test]
    fn test_model_to_dot_reports_missing_table() {
        let input = r#"{"CHECKPOINT": {"DB": "D"}, "GRAPH": [{"A": null}]}"#;
        let err = model_to_dot(input, "solo", &Catalog::new()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Build error: Metadata resolution failed: Unknown table: A"
        );
    }
}
