//! Graph document: the canvas-facing projection of a parsed schema.
//!
//! Node and column ids are pure functions of parse order (`table_<i>`,
//! `col_<i>_<j>`), so identical input text always serializes to an
//! identical document.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::ast::{Column, ForeignKey, Table};
use crate::layout::LayoutEngine;

/// 2-D canvas position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnData {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub typ: String,
    pub is_primary_key: bool,
    pub constraints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableData {
    pub name: String,
    pub columns: Vec<ColumnData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub position: Position,
    pub data: TableData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_handle: String,
    pub target_handle: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub animated: bool,
}

/// The complete graph document: one node per table, one edge per
/// resolved foreign key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphDoc {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl GraphDoc {
    /// Build the document from parsed records.
    ///
    /// Lookup maps key on lower-cased names; inserts overwrite, so a
    /// duplicated table or column name resolves to its last occurrence.
    /// Foreign keys whose target table or target column is unknown are
    /// dropped without error. A missing *source* column only downgrades
    /// the source handle to the raw column name: resolution gates on the
    /// referenced side. Edges de-duplicate by their identity tuple.
    pub fn from_schema(tables: &[Table], foreign_keys: &[ForeignKey], engine: &LayoutEngine) -> Self {
        let positions = engine.positions(tables.len());

        let mut node_index: HashMap<String, usize> = HashMap::new();
        let mut column_ids: Vec<HashMap<String, String>> = Vec::with_capacity(tables.len());

        let mut nodes = Vec::with_capacity(tables.len());
        for (i, table) in tables.iter().enumerate() {
            node_index.insert(table.name.to_lowercase(), i);

            let mut ids = HashMap::new();
            let mut columns = Vec::with_capacity(table.columns.len());
            for (j, col) in table.columns.iter().enumerate() {
                let col_id = format!("col_{i}_{j}");
                ids.insert(col.name.to_lowercase(), col_id.clone());
                columns.push(ColumnData {
                    id: col_id,
                    name: col.name.clone(),
                    typ: col.typ.clone(),
                    is_primary_key: col.is_primary_key,
                    constraints: merge_tags(col),
                });
            }
            column_ids.push(ids);

            nodes.push(GraphNode {
                id: format!("table_{i}"),
                kind: "tableNode".to_string(),
                position: positions[i],
                data: TableData {
                    name: table.name.clone(),
                    columns,
                },
            });
        }

        let mut seen: HashSet<(String, String, String, String)> = HashSet::new();
        let mut edges = Vec::new();
        for fk in foreign_keys {
            let Some(&from_idx) = node_index.get(&fk.from_table.to_lowercase()) else {
                continue;
            };
            let Some(&to_idx) = node_index.get(&fk.to_table.to_lowercase()) else {
                continue;
            };
            let Some(target_col) = column_ids[to_idx].get(&fk.to_column.to_lowercase()) else {
                continue;
            };

            let identity = (
                fk.from_table.to_lowercase(),
                fk.from_column.to_lowercase(),
                fk.to_table.to_lowercase(),
                fk.to_column.to_lowercase(),
            );
            if !seen.insert(identity) {
                continue;
            }

            let source_handle = match column_ids[from_idx].get(&fk.from_column.to_lowercase()) {
                Some(id) => format!("{id}-source"),
                None => format!("{}-source", fk.from_column),
            };

            edges.push(GraphEdge {
                id: format!("edge_{}", edges.len()),
                source: format!("table_{from_idx}"),
                target: format!("table_{to_idx}"),
                source_handle,
                target_handle: format!("{target_col}-target"),
                kind: "smoothstep".to_string(),
                animated: true,
            });
        }

        GraphDoc { nodes, edges }
    }
}

/// Merge the structural booleans with the parser's tag list, keeping
/// order and dropping duplicates.
fn merge_tags(col: &Column) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    if !col.is_nullable {
        push_tag(&mut tags, "NN");
    }
    if col.is_unique {
        push_tag(&mut tags, "UNQ");
    }
    if col.is_foreign_key {
        push_tag(&mut tags, "FK");
    }
    for tag in &col.constraints {
        push_tag(&mut tags, tag);
    }
    tags
}

fn push_tag(tags: &mut Vec<String>, tag: &str) {
    if !tags.iter().any(|t| t == tag) {
        tags.push(tag.to_string());
    }
}
