//! DDL parser for CREATE TABLE and ALTER TABLE statements.
//!
//! Best-effort by design: a statement that does not parse is skipped and
//! never aborts the rest of the input. Only the compiler orchestrator
//! turns an empty result into an error.

use crate::ast::{Column, ForeignKey, Table};

use super::lexer::{split_definitions, split_words, strip_quotes, table_body};
use super::statement::{split_statements, strip_comments};
use super::types::normalize_type;

/// Parse DDL text into tables and foreign keys.
pub fn parse_sql(input: &str) -> (Vec<Table>, Vec<ForeignKey>) {
    let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
    let stripped = strip_comments(&normalized);

    let mut tables = Vec::new();
    let mut foreign_keys = Vec::new();

    for stmt in split_statements(&stripped) {
        let upper = stmt.to_ascii_uppercase();
        if upper.starts_with("CREATE TABLE") {
            if let Some((table, mut fks)) = parse_create_table(&stmt) {
                tables.push(table);
                foreign_keys.append(&mut fks);
            }
        } else if upper.starts_with("ALTER TABLE") {
            if let Some(fk) = parse_alter_table(&stmt) {
                foreign_keys.push(fk);
            }
        }
    }

    (tables, foreign_keys)
}

/// One classified fragment of a table body.
enum Clause {
    PrimaryKey(Vec<String>),
    Unique(Vec<String>),
    ForeignKey {
        name: Option<String>,
        column: String,
        target: String,
        target_column: String,
    },
    Skip,
    Column,
}

fn parse_create_table(stmt: &str) -> Option<(Table, Vec<ForeignKey>)> {
    let (head, body) = table_body(stmt)?;
    let name = table_name(head)?;

    let mut columns: Vec<Column> = Vec::new();
    let mut fks: Vec<ForeignKey> = Vec::new();
    let mut pk_names: Vec<String> = Vec::new();
    let mut unique_names: Vec<String> = Vec::new();

    for fragment in split_definitions(body) {
        match classify(&fragment) {
            Clause::PrimaryKey(cols) => pk_names.extend(cols),
            Clause::Unique(cols) => unique_names.extend(cols),
            Clause::ForeignKey {
                name: cname,
                column,
                target,
                target_column,
            } => fks.push(ForeignKey {
                from_table: name.clone(),
                from_column: column,
                to_table: target,
                to_column: target_column,
                name: cname,
            }),
            Clause::Skip => {}
            Clause::Column => {
                if let Some((col, reference)) = parse_column(&fragment) {
                    if let Some((target, target_column)) = reference {
                        fks.push(ForeignKey {
                            from_table: name.clone(),
                            from_column: col.name.clone(),
                            to_table: target,
                            to_column: target_column,
                            name: None,
                        });
                    }
                    columns.push(col);
                }
            }
        }
    }

    // SQL allows table-level PRIMARY KEY / UNIQUE to appear after the
    // columns they name, so both resolve in a second pass.
    for col in &mut columns {
        let lower = col.name.to_lowercase();
        if pk_names.iter().any(|p| p.to_lowercase() == lower) {
            col.is_primary_key = true;
        }
        if unique_names.iter().any(|u| u.to_lowercase() == lower) {
            col.is_unique = true;
            col.tag("UNQ");
        }
    }

    if columns.is_empty() {
        return None;
    }

    Some((Table { name, columns }, fks))
}

/// Extract the table name from the text before the body parenthesis:
/// `CREATE TABLE [IF NOT EXISTS] [schema.]name`.
fn table_name(head: &str) -> Option<String> {
    let words = split_words(head);
    let mut idx = 2; // past CREATE TABLE
    if words.len() >= idx + 3
        && words[idx].eq_ignore_ascii_case("IF")
        && words[idx + 1].eq_ignore_ascii_case("NOT")
        && words[idx + 2].eq_ignore_ascii_case("EXISTS")
    {
        idx += 3;
    }
    let name = unqualify(words.get(idx)?);
    if name.is_empty() { None } else { Some(name) }
}

/// Strip identifier quotes and any schema qualifier.
fn unqualify(raw: &str) -> String {
    let unquoted = strip_quotes(raw);
    match unquoted.rsplit_once('.') {
        Some((_, last)) => strip_quotes(last).to_string(),
        None => unquoted.to_string(),
    }
}

fn classify(fragment: &str) -> Clause {
    let words = split_words(fragment);
    let Some(first) = words.first() else {
        return Clause::Skip;
    };

    match first.to_ascii_uppercase().as_str() {
        "PRIMARY" => {
            if words
                .get(1)
                .is_some_and(|w| w.to_ascii_uppercase().starts_with("KEY"))
            {
                Clause::PrimaryKey(paren_list(fragment))
            } else {
                Clause::Column
            }
        }
        "UNIQUE" => Clause::Unique(paren_list(fragment)),
        "FOREIGN" => match table_fk(fragment, None) {
            Some((name, column, target, target_column)) => Clause::ForeignKey {
                name,
                column,
                target,
                target_column,
            },
            None => Clause::Skip,
        },
        "CONSTRAINT" => {
            let cname = words.get(1).map(|w| strip_quotes(w).to_string());
            let rest = words.get(2..).map(|w| w.join(" ")).unwrap_or_default();
            let rest_upper = rest.to_ascii_uppercase();
            if rest_upper.starts_with("FOREIGN") {
                match table_fk(&rest, cname) {
                    Some((name, column, target, target_column)) => Clause::ForeignKey {
                        name,
                        column,
                        target,
                        target_column,
                    },
                    None => Clause::Skip,
                }
            } else if rest_upper.starts_with("PRIMARY KEY") {
                Clause::PrimaryKey(paren_list(&rest))
            } else if rest_upper.starts_with("UNIQUE") {
                Clause::Unique(paren_list(&rest))
            } else {
                // named CHECK and friends carry no column structure
                Clause::Skip
            }
        }
        "CHECK" | "INDEX" | "KEY" => Clause::Skip,
        _ => Clause::Column,
    }
}

/// Column names inside the fragment's first parenthesized list.
fn paren_list(fragment: &str) -> Vec<String> {
    match table_body(fragment) {
        Some((_, inner)) => inner
            .split(',')
            .map(|c| strip_quotes(c.trim()).to_string())
            .filter(|c| !c.is_empty())
            .collect(),
        None => Vec::new(),
    }
}

/// Parse `FOREIGN KEY (col) REFERENCES target(col)`.
///
/// Composite column lists are dropped whole; only single-column keys are
/// modeled.
fn table_fk(fragment: &str, cname: Option<String>) -> Option<(Option<String>, String, String, String)> {
    let upper = fragment.to_ascii_uppercase();
    let refs = upper.find("REFERENCES")?;
    let (left, right) = fragment.split_at(refs);

    let cols = paren_list(left);
    if cols.len() != 1 {
        return None;
    }

    let (target, target_column) = parse_reference(&right["REFERENCES".len()..])?;
    Some((cname, cols[0].clone(), target, target_column))
}

/// Parse the `table(column)` part after a REFERENCES keyword. A missing
/// column list defaults to `id`; composite lists are rejected.
fn parse_reference(rest: &str) -> Option<(String, String)> {
    let words = split_words(rest);
    let first = words.first()?;

    let (table, column) = if let Some(open) = first.find('(') {
        let table = unqualify(&first[..open]);
        let inner = first[open + 1..].trim_end_matches(')');
        (table, strip_quotes(inner.trim()).to_string())
    } else {
        let table = unqualify(first);
        let column = match words.get(1) {
            Some(w) if w.starts_with('(') => {
                let inner = w.trim_start_matches('(').trim_end_matches(')');
                strip_quotes(inner.trim()).to_string()
            }
            _ => String::new(),
        };
        (table, column)
    };

    if table.is_empty() || column.contains(',') {
        return None;
    }
    let column = if column.is_empty() { "id".to_string() } else { column };
    Some((table, column))
}

/// Parse one column definition fragment.
///
/// The constraint checks are independent substring scans over everything
/// after the type, not a mutually exclusive grammar: a column can be NOT
/// NULL, UNIQUE, and a foreign key all at once.
fn parse_column(fragment: &str) -> Option<(Column, Option<(String, String)>)> {
    let words = split_words(fragment);
    if words.len() < 2 {
        return None;
    }

    let name = strip_quotes(&words[0]).to_string();
    if name.is_empty() {
        return None;
    }

    let mut type_end = 2;
    let mut raw_type = words[1].clone();
    if let Some(next) = words.get(2) {
        if next.starts_with('(') && !raw_type.contains('(') {
            // detached parameter list: DECIMAL (10, 2)
            raw_type.push_str(next);
            type_end = 3;
        } else if raw_type.eq_ignore_ascii_case("DOUBLE") && next.eq_ignore_ascii_case("PRECISION") {
            raw_type.push(' ');
            raw_type.push_str(next);
            type_end = 3;
        }
    }

    let mut col = Column::new(name, normalize_type(&raw_type));

    let rest = words[type_end.min(words.len())..].join(" ");
    let rest_upper = rest.to_ascii_uppercase();

    if rest_upper.contains("NOT NULL") {
        col.is_nullable = false;
        col.tag("NN");
    }
    if rest_upper.contains("UNIQUE") {
        col.is_unique = true;
        col.tag("UNQ");
    }
    if rest_upper.contains("PRIMARY KEY") {
        col.is_primary_key = true;
    }

    let mut reference = None;
    if let Some(pos) = rest_upper.find("REFERENCES") {
        if let Some((target, target_column)) = parse_reference(&rest[pos + "REFERENCES".len()..]) {
            col.is_foreign_key = true;
            col.ref_table = Some(target.clone());
            col.ref_column = Some(target_column.clone());
            col.tag("FK");
            reference = Some((target, target_column));
        }
    }

    let marker_zone = format!("{} {}", raw_type.to_ascii_uppercase(), rest_upper);
    if marker_zone.contains("AUTO_INCREMENT")
        || marker_zone.contains("SERIAL")
        || marker_zone.contains("IDENTITY")
    {
        col.tag("AI");
    }

    if let Some(value) = capture_default(&words[type_end.min(words.len())..]) {
        col.default_value = Some(value);
    }

    Some((col, reference))
}

/// Capture the token after DEFAULT, joining a detached argument list so
/// `DEFAULT now ()` comes out as one expression.
fn capture_default(words: &[String]) -> Option<String> {
    let idx = words.iter().position(|w| w.eq_ignore_ascii_case("DEFAULT"))?;
    let mut value = words.get(idx + 1)?.clone();
    if !value.contains('(') {
        if let Some(next) = words.get(idx + 2) {
            if next.starts_with('(') {
                value.push_str(next);
            }
        }
    }
    Some(value)
}

/// Parse `ALTER TABLE [ONLY] name ADD [CONSTRAINT cname] FOREIGN KEY
/// (col) REFERENCES ref(refcol)`. Any other ALTER TABLE form yields
/// nothing.
fn parse_alter_table(stmt: &str) -> Option<ForeignKey> {
    let words = split_words(stmt);
    let mut idx = 2; // past ALTER TABLE

    if words.get(idx)?.eq_ignore_ascii_case("ONLY") {
        idx += 1;
    }

    let table = unqualify(words.get(idx)?);
    if table.is_empty() {
        return None;
    }
    idx += 1;

    if !words.get(idx)?.eq_ignore_ascii_case("ADD") {
        return None;
    }
    idx += 1;

    let mut cname = None;
    if words.get(idx)?.eq_ignore_ascii_case("CONSTRAINT") {
        cname = words.get(idx + 1).map(|w| strip_quotes(w).to_string());
        idx += 2;
    }

    let rest = words.get(idx..)?.join(" ");
    if !rest.to_ascii_uppercase().starts_with("FOREIGN KEY") {
        return None;
    }

    let (name, column, target, target_column) = table_fk(&rest, cname)?;
    Some(ForeignKey {
        from_table: table,
        from_column: column,
        to_table: target,
        to_column: target_column,
        name,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_table() {
        let sql = r#"
            CREATE TABLE users (
                id uuid PRIMARY KEY,
                email varchar(255) NOT NULL UNIQUE
            );
        "#;

        let (tables, fks) = parse_sql(sql);
        assert_eq!(tables.len(), 1);
        assert!(fks.is_empty());

        let users = &tables[0];
        assert_eq!(users.name, "users");
        assert_eq!(users.columns.len(), 2);

        let id = &users.columns[0];
        assert_eq!(id.typ, "uuid");
        assert!(id.is_primary_key);
        assert!(id.constraints.is_empty());

        let email = &users.columns[1];
        assert_eq!(email.typ, "varchar(255)");
        assert!(!email.is_nullable);
        assert!(email.is_unique);
        assert_eq!(email.constraints, vec!["NN", "UNQ"]);
    }

    #[test]
    fn test_table_level_primary_key_second_pass() {
        let sql = r#"
            CREATE TABLE sessions (
                token varchar(64),
                user_id uuid,
                PRIMARY KEY (token)
            );
        "#;

        let (tables, _) = parse_sql(sql);
        assert!(tables[0].columns[0].is_primary_key);
        assert!(!tables[0].columns[1].is_primary_key);
    }

    #[test]
    fn test_table_level_unique_with_name() {
        let sql = "CREATE TABLE t (email varchar(255), UNIQUE KEY uq_email (email));";
        let (tables, _) = parse_sql(sql);
        let email = &tables[0].columns[0];
        assert!(email.is_unique);
        assert_eq!(email.constraints, vec!["UNQ"]);
    }

    #[test]
    fn test_inline_references_emits_foreign_key() {
        let sql = r#"
            CREATE TABLE users (id uuid PRIMARY KEY);
            CREATE TABLE posts (
                id uuid PRIMARY KEY,
                author_id uuid REFERENCES users(id)
            );
        "#;

        let (tables, fks) = parse_sql(sql);
        assert_eq!(tables.len(), 2);
        assert_eq!(fks.len(), 1);

        let fk = &fks[0];
        assert_eq!(fk.from_table, "posts");
        assert_eq!(fk.from_column, "author_id");
        assert_eq!(fk.to_table, "users");
        assert_eq!(fk.to_column, "id");
        assert!(fk.name.is_none());

        let author = &tables[1].columns[1];
        assert!(author.is_foreign_key);
        assert_eq!(author.ref_table.as_deref(), Some("users"));
        assert_eq!(author.ref_column.as_deref(), Some("id"));
        assert_eq!(author.constraints, vec!["FK"]);
    }

    #[test]
    fn test_references_without_column_defaults_to_id() {
        let sql = "CREATE TABLE posts (author_id uuid REFERENCES users);";
        let (_, fks) = parse_sql(sql);
        assert_eq!(fks[0].to_column, "id");
    }

    #[test]
    fn test_table_level_foreign_key_with_constraint_name() {
        let sql = r#"
            CREATE TABLE orders (
                id uuid PRIMARY KEY,
                customer_id uuid,
                CONSTRAINT fk_customer FOREIGN KEY (customer_id) REFERENCES customers (id) ON DELETE CASCADE
            );
        "#;

        let (tables, fks) = parse_sql(sql);
        assert_eq!(tables[0].columns.len(), 2);
        assert_eq!(fks.len(), 1);
        assert_eq!(fks[0].name.as_deref(), Some("fk_customer"));
        assert_eq!(fks[0].from_column, "customer_id");
        assert_eq!(fks[0].to_table, "customers");
    }

    #[test]
    fn test_composite_foreign_key_dropped() {
        let sql = "CREATE TABLE t (a int, b int, FOREIGN KEY (a, b) REFERENCES u(x));";
        let (tables, fks) = parse_sql(sql);
        assert_eq!(tables[0].columns.len(), 2);
        assert!(fks.is_empty());
    }

    #[test]
    fn test_alter_table_add_foreign_key() {
        let sql = r#"
            CREATE TABLE a (id uuid PRIMARY KEY);
            ALTER TABLE a ADD CONSTRAINT fk1 FOREIGN KEY (b_id) REFERENCES b(id);
        "#;

        let (_, fks) = parse_sql(sql);
        assert_eq!(fks.len(), 1);
        assert_eq!(fks[0].from_table, "a");
        assert_eq!(fks[0].from_column, "b_id");
        assert_eq!(fks[0].name.as_deref(), Some("fk1"));
    }

    #[test]
    fn test_alter_table_without_constraint_name() {
        let sql = "ALTER TABLE a ADD FOREIGN KEY (b_id) REFERENCES b(id);";
        let (_, fks) = parse_sql(sql);
        assert_eq!(fks.len(), 1);
        assert!(fks[0].name.is_none());
    }

    #[test]
    fn test_alter_table_only_prefix() {
        let sql = "ALTER TABLE ONLY public.posts ADD CONSTRAINT fk FOREIGN KEY (author_id) REFERENCES public.users(id);";
        let (_, fks) = parse_sql(sql);
        assert_eq!(fks[0].from_table, "posts");
        assert_eq!(fks[0].to_table, "users");
    }

    #[test]
    fn test_alter_table_other_forms_ignored() {
        let sql = "ALTER TABLE a ADD COLUMN x int; ALTER TABLE a DROP COLUMN y;";
        let (tables, fks) = parse_sql(sql);
        assert!(tables.is_empty());
        assert!(fks.is_empty());
    }

    #[test]
    fn test_schema_qualifier_and_if_not_exists() {
        let sql = r#"CREATE TABLE IF NOT EXISTS public."users" (id int);"#;
        let (tables, _) = parse_sql(sql);
        assert_eq!(tables[0].name, "users");
    }

    #[test]
    fn test_mysql_style_table() {
        let sql = r#"
            CREATE TABLE `accounts` (
                `id` INT(11) AUTO_INCREMENT PRIMARY KEY,
                `active` TINYINT(1) NOT NULL,
                KEY idx_active (`active`)
            ) ENGINE=InnoDB;
        "#;

        let (tables, _) = parse_sql(sql);
        let t = &tables[0];
        assert_eq!(t.name, "accounts");
        assert_eq!(t.columns.len(), 2);
        assert_eq!(t.columns[0].typ, "integer");
        assert!(t.columns[0].is_primary_key);
        assert_eq!(t.columns[0].constraints, vec!["AI"]);
        assert_eq!(t.columns[1].typ, "boolean");
    }

    #[test]
    fn test_check_and_index_discarded() {
        let sql = r#"
            CREATE TABLE t (
                id int,
                age int,
                CHECK (age > 0),
                INDEX idx_age (age),
                CONSTRAINT positive CHECK (id > 0)
            );
        "#;

        let (tables, _) = parse_sql(sql);
        assert_eq!(tables[0].columns.len(), 2);
    }

    #[test]
    fn test_default_values_captured() {
        let sql = r#"
            CREATE TABLE t (
                status varchar(20) DEFAULT 'active',
                created_at timestamp DEFAULT now() NOT NULL
            );
        "#;

        let (tables, _) = parse_sql(sql);
        assert_eq!(tables[0].columns[0].default_value.as_deref(), Some("'active'"));
        assert_eq!(tables[0].columns[1].default_value.as_deref(), Some("now()"));
        assert!(!tables[0].columns[1].is_nullable);
    }

    #[test]
    fn test_serial_column_gets_ai_tag() {
        let sql = "CREATE TABLE t (id SERIAL PRIMARY KEY, n BIGSERIAL);";
        let (tables, _) = parse_sql(sql);
        assert_eq!(tables[0].columns[0].typ, "integer");
        assert_eq!(tables[0].columns[0].constraints, vec!["AI"]);
        assert_eq!(tables[0].columns[1].typ, "bigint");
        assert_eq!(tables[0].columns[1].constraints, vec!["AI"]);
    }

    #[test]
    fn test_malformed_statement_does_not_abort_rest() {
        let sql = r#"
            CREATE TABLE (missing name);
            CREATE TABLE empty_body ();
            CREATE TABLE ok (id int);
        "#;

        let (tables, _) = parse_sql(sql);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "ok");
    }

    #[test]
    fn test_unsupported_statements_ignored() {
        let sql = r#"
            CREATE VIEW v AS SELECT 1;
            INSERT INTO t VALUES (1);
            CREATE TABLE t (id int);
            DROP TABLE old;
        "#;

        let (tables, _) = parse_sql(sql);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "t");
    }

    #[test]
    fn test_quoted_column_with_space() {
        let sql = r#"CREATE TABLE t ("full name" varchar(255) NOT NULL);"#;
        let (tables, _) = parse_sql(sql);
        assert_eq!(tables[0].columns[0].name, "full name");
        assert!(!tables[0].columns[0].is_nullable);
    }

    #[test]
    fn test_not_null_unique_fk_combine() {
        let sql = "CREATE TABLE posts (author_id uuid NOT NULL UNIQUE REFERENCES users(id));";
        let (tables, fks) = parse_sql(sql);
        let col = &tables[0].columns[0];
        assert!(!col.is_nullable);
        assert!(col.is_unique);
        assert!(col.is_foreign_key);
        assert_eq!(col.constraints, vec!["NN", "UNQ", "FK"]);
        assert_eq!(fks.len(), 1);
    }
}
