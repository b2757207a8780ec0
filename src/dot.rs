//! Graphviz DOT emission for schema models.

use crate::describe::{DescriptionAggregator, TableDescriptions};
use crate::keys::{KeyAttributes, collect_key_attributes};
use crate::model::{Model, TableNode};
use crate::palette::ColorCycle;
use crate::resolver::{Column, MetadataResolver, ResolveError};
use crate::style::{StyleConfig, StyleError};
use std::collections::HashSet;
use tracing::{debug, info};

const INDENT: &str = "    ";
const ARROWHEAD: &str = "onormal";

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Metadata resolution failed: {0}")]
    Resolve(#[from] ResolveError),
    #[error("Edge palette is empty")]
    EmptyPalette,
    #[error("Invalid style: {0}")]
    Style(#[from] StyleError),
}

#[derive(Debug, Clone, Default)]
pub struct DotRenderer {
    pub style: StyleConfig,
}

impl DotRenderer {
    pub fn new(style: StyleConfig) -> Self {
        Self { style }
    }

    /// Build the complete DOT program for `model`.
    ///
    /// The output depends only on the model, the name, the style and the
    /// resolver's answers, so repeated builds are byte-identical.
    pub fn render(
        &self,
        model: &Model,
        diagram_name: &str,
        resolver: &dyn MetadataResolver,
    ) -> Result<String, BuildError> {
        self.style.validate()?;
        let mut colors = ColorCycle::new(&self.style.palette).ok_or(BuildError::EmptyPalette)?;

        let descriptions = DescriptionAggregator::new(resolver).aggregate(&model.root)?;
        let key_attributes = collect_key_attributes(&model.root);
        let mut visited = HashSet::new();

        let mut dot = String::new();
        dot.push_str(&format!("digraph {} {{\n\n", quote(diagram_name)));
        self.write_graph_attributes(&mut dot);
        self.write_node_attributes(&mut dot);

        dot.push_str(&format!("{INDENT}//Table Section\n\n"));
        dot.push_str(&table_section(
            &model.root,
            &model.database,
            &descriptions,
            &key_attributes,
            &mut visited,
        ));
        dot.push_str(&format!("{INDENT}//End Table Section\n\n"));

        let edges = edge_section(&model.root, &model.database, &mut colors);
        dot.push_str(&format!("{INDENT}//Graph Section\n\n"));
        dot.push_str(&edges);
        dot.push_str(&format!("{INDENT}//End Graph Section\n\n"));
        dot.push('}');

        info!(
            diagram = diagram_name,
            tables = visited.len(),
            edges = edges.lines().count(),
            "built diagram program"
        );
        Ok(dot)
    }

    fn write_graph_attributes(&self, dot: &mut String) {
        let style = &self.style;
        dot.push_str(&format!("{INDENT}graph [\n"));
        dot.push_str(&format!("{INDENT}{INDENT}fontcolor={},\n", quote(&style.font_color)));
        dot.push_str(&format!("{INDENT}{INDENT}fontsize={},\n", style.font_size));
        dot.push_str(&format!("{INDENT}{INDENT}label={},\n", quote(&style.watermark_label)));
        dot.push_str(&format!("{INDENT}{INDENT}nodesep={},\n", style.node_separation));
        dot.push_str(&format!("{INDENT}{INDENT}rankdir={},\n", style.rank_direction));
        dot.push_str(&format!("{INDENT}{INDENT}ranksep={}\n", style.rank_separation));
        dot.push_str(&format!("{INDENT}];\n\n"));
    }

    fn write_node_attributes(&self, dot: &mut String) {
        let style = &self.style;
        dot.push_str(&format!("{INDENT}node [\n"));
        dot.push_str(&format!("{INDENT}{INDENT}fontsize={},\n", style.node_font_size));
        dot.push_str(&format!(
            "{INDENT}{INDENT}label={},\n",
            quote_label(&style.node_label_expression)
        ));
        dot.push_str(&format!("{INDENT}{INDENT}shape={}\n", quote(&style.node_shape)));
        dot.push_str(&format!("{INDENT}];\n\n"));
    }
}

/// Emit one table block per distinct table reachable from `root`, children
/// before their parent. Tables already in `visited` are skipped.
pub fn table_section(
    root: &TableNode,
    database: &str,
    descriptions: &TableDescriptions,
    key_attributes: &KeyAttributes,
    visited: &mut HashSet<String>,
) -> String {
    let mut out = String::new();
    write_tables(root, database, descriptions, key_attributes, visited, &mut out);
    out
}

fn write_tables(
    node: &TableNode,
    database: &str,
    descriptions: &TableDescriptions,
    key_attributes: &KeyAttributes,
    visited: &mut HashSet<String>,
    out: &mut String,
) {
    if !visited.insert(node.name.clone()) {
        return;
    }

    for sub_graph in &node.sub_graphs {
        for child in &sub_graph.tables {
            write_tables(
                child,
                &sub_graph.database,
                descriptions,
                key_attributes,
                visited,
                out,
            );
        }
    }

    let columns = descriptions
        .get(&node.name)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let empty = HashSet::new();
    let keys = key_attributes.get(&node.name).unwrap_or(&empty);
    write_table(out, database, &node.name, columns, keys);
}

fn write_table(
    out: &mut String,
    database: &str,
    name: &str,
    columns: &[Column],
    keys: &HashSet<String>,
) {
    let id = format!("{}_{}", database, name);
    debug!(table = %id, columns = columns.len(), "emitting table block");

    let i1 = INDENT;
    let i2 = INDENT.repeat(2);
    let i3 = INDENT.repeat(3);
    let i4 = INDENT.repeat(4);
    let i5 = INDENT.repeat(5);

    out.push_str(&format!("{i1}{} [\n", quote(&id)));
    out.push_str(&format!("{i2}label=\n"));
    out.push_str(&format!(
        "{i2}<<table border=\"0\" cellborder=\"1\" cellspacing=\"0\">\n"
    ));
    out.push_str(&format!("{i3}<tr>\n"));
    out.push_str(&format!("{i4}<td>\n"));
    out.push_str(&format!("{i5}<b>{}</b>\n", escape_html(&id)));
    out.push_str(&format!("{i4}</td>\n"));
    out.push_str(&format!("{i3}</tr>\n"));

    for column in columns {
        out.push_str(&format!("{i3}<tr>"));
        if keys.contains(&column.name) {
            out.push_str(&format!(
                "<td align=\"center\" port=\"{}\">",
                escape_html(&column.name)
            ));
        } else {
            out.push_str("<td align=\"center\">");
        }
        out.push_str(&format!(
            "{} :: {}</td>\n",
            escape_html(&column.name),
            escape_html(&column.data_type)
        ));
        out.push_str(&format!("{i3}</tr>\n"));
    }

    out.push_str(&format!("{i2}</table>>\n"));
    out.push_str(&format!("{i1}];\n\n"));
}

/// Emit one edge per (key, child table) pair, parent edges before the edges
/// of their descendants. Each edge takes the next color from `colors`.
pub fn edge_section(root: &TableNode, database: &str, colors: &mut ColorCycle<'_>) -> String {
    let mut out = String::new();
    write_edges(root, database, colors, &mut out);
    out
}

fn write_edges(node: &TableNode, database: &str, colors: &mut ColorCycle<'_>, out: &mut String) {
    for sub_graph in &node.sub_graphs {
        for key in &sub_graph.keys {
            for child in &sub_graph.tables {
                out.push_str(&format!(
                    "{INDENT}{}:{}:e -> {}:{}:w [arrowhead={} color=\"{}\"];\n",
                    quote(&format!("{}_{}", database, node.name)),
                    port(&key.parent_attribute),
                    quote(&format!("{}_{}", sub_graph.database, child.name)),
                    port(&key.child_attribute),
                    ARROWHEAD,
                    colors.next_color(),
                ));
            }
        }
    }

    for sub_graph in &node.sub_graphs {
        for child in &sub_graph.tables {
            write_edges(child, &sub_graph.database, colors, out);
        }
    }
}

/// Quote a string as a DOT identifier.
fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Quote a label expression. Escape sequences such as `\N` pass through;
/// bare quotes and a dangling trailing backslash are escaped.
fn quote_label(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => {
                    out.push('\\');
                    out.push(escaped);
                }
                None => out.push_str("\\\\"),
            },
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Port names stay bare when they are plain identifiers.
fn port(s: &str) -> String {
    if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        s.to_string()
    } else {
        quote(s)
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
