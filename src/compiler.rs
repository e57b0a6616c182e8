//! Compiler orchestrator: DDL text in, graph document out.

use thiserror::Error;

use crate::graph::GraphDoc;
use crate::layout::LayoutEngine;
use crate::sql::parse_sql;

/// Terminal errors for a compile invocation.
///
/// Everything below the orchestrator is best-effort and silent; an empty
/// schema is the single hard failure of the pipeline, since an empty
/// graph would be indistinguishable from a successful import.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("no tables found in SQL input")]
    NoTables,
    #[error("failed to serialize graph document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Compile DDL text into a graph document.
pub fn compile(sql: &str) -> Result<GraphDoc, ImportError> {
    let (tables, foreign_keys) = parse_sql(sql);
    if tables.is_empty() {
        return Err(ImportError::NoTables);
    }
    Ok(GraphDoc::from_schema(
        &tables,
        &foreign_keys,
        &LayoutEngine::default(),
    ))
}

/// Compile DDL text and serialize the document to compact JSON.
pub fn import_sql(sql: &str) -> Result<String, ImportError> {
    Ok(serde_json::to_string(&compile(sql)?)?)
}
