//! SQL type normalization.

/// Normalize a raw type token to its canonical lower-case form.
///
/// Covers the practical PostgreSQL/MySQL subset: serial pseudo-types,
/// parameterized strings and decimals, MySQL display widths, the
/// `tinyint(1)` boolean idiom. Unrecognized tokens pass through
/// lower-cased unchanged; this never fails.
pub fn normalize_type(raw: &str) -> String {
    let trimmed = raw.trim();
    let upper = trimmed.to_ascii_uppercase();
    let (base, params) = match upper.find('(') {
        Some(idx) => (upper[..idx].trim(), Some(upper[idx..].trim())),
        None => (upper.as_str(), None),
    };

    match base {
        "SERIAL" | "SMALLSERIAL" => "integer".to_string(),
        "BIGSERIAL" => "bigint".to_string(),
        "UUID" => "uuid".to_string(),
        "VARCHAR" => match params {
            Some(p) => format!("varchar{}", clean_params(p)),
            None => "varchar".to_string(),
        },
        "TEXT" => "text".to_string(),
        // MySQL display widths like INT(11) carry no type information
        "INT" | "INTEGER" | "SMALLINT" | "MEDIUMINT" => "integer".to_string(),
        "BIGINT" => "bigint".to_string(),
        "BOOL" | "BOOLEAN" => "boolean".to_string(),
        "DATE" => "date".to_string(),
        "TIME" | "DATETIME" => "timestamp".to_string(),
        "NUMERIC" | "DECIMAL" => match params {
            Some(p) => format!("decimal{}", clean_params(p)),
            None => "decimal(10,2)".to_string(),
        },
        "REAL" | "FLOAT4" | "FLOAT8" | "DOUBLE PRECISION" => "decimal(10,2)".to_string(),
        "JSON" | "JSONB" => "jsonb".to_string(),
        "BYTEA" | "BLOB" => "text".to_string(),
        "CHAR" => match params {
            Some(p) => format!("char{}", clean_params(p)),
            None => "varchar(255)".to_string(),
        },
        // tinyint(1) is the MySQL boolean-flag idiom; wider tinyints are
        // plain integers
        "TINYINT" => {
            if params.map(clean_params).as_deref() == Some("(1)") {
                "boolean".to_string()
            } else {
                "integer".to_string()
            }
        }
        "ENUM" | "SET" => "varchar(255)".to_string(),
        _ if base.starts_with("TIMESTAMP") => "timestamp".to_string(),
        _ => trimmed.to_lowercase(),
    }
}

fn clean_params(params: &str) -> String {
    params
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}
