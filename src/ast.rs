//! Schema model produced by the SQL parser.

/// One parsed table: unqualified name plus columns in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
}

/// One column definition.
///
/// Names keep their original casing; all lookups over them are
/// case-insensitive. `constraints` holds the short display tags
/// (`NN`, `UNQ`, `FK`, `AI`), de-duplicated, in detection order.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub typ: String,
    pub is_primary_key: bool,
    pub is_unique: bool,
    pub is_nullable: bool,
    pub is_foreign_key: bool,
    pub ref_table: Option<String>,
    pub ref_column: Option<String>,
    pub default_value: Option<String>,
    pub constraints: Vec<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, typ: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            typ: typ.into(),
            is_primary_key: false,
            is_unique: false,
            is_nullable: true,
            is_foreign_key: false,
            ref_table: None,
            ref_column: None,
            default_value: None,
            constraints: Vec::new(),
        }
    }

    /// Append a constraint tag unless it is already present.
    pub fn tag(&mut self, tag: &str) {
        if !self.constraints.iter().any(|c| c == tag) {
            self.constraints.push(tag.to_string());
        }
    }
}

/// A single-column foreign key, normalized from any of its three
/// syntactic forms (inline `REFERENCES`, table-level `FOREIGN KEY`,
/// `ALTER TABLE ... ADD FOREIGN KEY`).
#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
    /// Constraint name, when the DDL carried one.
    pub name: Option<String>,
}
