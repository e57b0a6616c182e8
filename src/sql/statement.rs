//! Comment stripping and statement splitting for raw DDL text.

/// Remove SQL comments: `--` and `#` to end of line, `/* ... */` blocks
/// (including multi-line). Markers inside quoted spans are left alone.
pub fn strip_comments(sql: &str) -> String {
    let chars: Vec<char> = sql.chars().collect();
    let mut out = String::with_capacity(sql.len());
    let mut quote: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let prev = if i > 0 { chars[i - 1] } else { '\0' };

        if let Some(q) = quote {
            if c == q && prev != '\\' {
                quote = None;
            }
            out.push(c);
            i += 1;
            continue;
        }

        match c {
            '\'' | '"' | '`' if prev != '\\' => {
                quote = Some(c);
                out.push(c);
                i += 1;
            }
            '-' if chars.get(i + 1) == Some(&'-') => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '#' => {
                while i < chars.len() && chars[i] != '\n' {
                    i += 1;
                }
            }
            '/' if chars.get(i + 1) == Some(&'*') => {
                i += 2;
                while i < chars.len() {
                    if chars[i] == '*' && chars.get(i + 1) == Some(&'/') {
                        i += 2;
                        break;
                    }
                    i += 1;
                }
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Split text into trimmed statements on `;` outside quoted spans.
///
/// A quote preceded by a backslash does not toggle quote state. Trailing
/// content without a terminator is still emitted when non-empty.
pub fn split_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut prev = '\0';

    for c in sql.chars() {
        match quote {
            Some(q) => {
                if c == q && prev != '\\' {
                    quote = None;
                }
                current.push(c);
            }
            None => match c {
                '\'' | '"' | '`' if prev != '\\' => {
                    quote = Some(c);
                    current.push(c);
                }
                ';' => {
                    let stmt = current.trim();
                    if !stmt.is_empty() {
                        statements.push(stmt.to_string());
                    }
                    current.clear();
                }
                _ => current.push(c),
            },
        }
        prev = c;
    }

    let stmt = current.trim();
    if !stmt.is_empty() {
        statements.push(stmt.to_string());
    }

    statements
}
