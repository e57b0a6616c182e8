//! Fragment tokenizer for table bodies.
//!
//! Splitting happens at the character level with a parenthesis depth
//! counter and quote tracking, so parameterized types like
//! `DECIMAL(10, 2)` and quoted identifiers survive intact.

/// Split a statement at its outermost matching parentheses.
///
/// Returns the text before the opening parenthesis and the body between
/// the pair. Parentheses inside quoted spans do not count.
pub fn table_body(stmt: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    let mut open = None;
    let mut quote: Option<char> = None;
    let mut prev = '\0';

    for (i, c) in stmt.char_indices() {
        if let Some(q) = quote {
            if c == q && prev != '\\' {
                quote = None;
            }
        } else {
            match c {
                '\'' | '"' | '`' => quote = Some(c),
                '(' => {
                    if depth == 0 {
                        open = Some(i);
                    }
                    depth += 1;
                }
                ')' => {
                    if depth > 0 {
                        depth -= 1;
                        if depth == 0 {
                            let start = open?;
                            return Some((&stmt[..start], &stmt[start + 1..i]));
                        }
                    }
                }
                _ => {}
            }
        }
        prev = c;
    }

    None
}

/// Split a table body into definition fragments on `,` at depth 0,
/// outside quotes. Fragments are trimmed; empties are dropped.
pub fn split_definitions(body: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut prev = '\0';

    for c in body.chars() {
        if let Some(q) = quote {
            if c == q && prev != '\\' {
                quote = None;
            }
            current.push(c);
        } else {
            match c {
                '\'' | '"' | '`' => {
                    quote = Some(c);
                    current.push(c);
                }
                '(' => {
                    depth += 1;
                    current.push(c);
                }
                ')' => {
                    depth = depth.saturating_sub(1);
                    current.push(c);
                }
                ',' if depth == 0 => {
                    let frag = current.trim();
                    if !frag.is_empty() {
                        fragments.push(frag.to_string());
                    }
                    current.clear();
                }
                _ => current.push(c),
            }
        }
        prev = c;
    }

    let frag = current.trim();
    if !frag.is_empty() {
        fragments.push(frag.to_string());
    }

    fragments
}

/// Split a fragment into whitespace-separated words without splitting
/// inside parentheses or quotes.
pub fn split_words(fragment: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut prev = '\0';

    for c in fragment.chars() {
        if let Some(q) = quote {
            if c == q && prev != '\\' {
                quote = None;
            }
            current.push(c);
        } else {
            match c {
                '\'' | '"' | '`' => {
                    quote = Some(c);
                    current.push(c);
                }
                '(' => {
                    depth += 1;
                    current.push(c);
                }
                ')' => {
                    depth = depth.saturating_sub(1);
                    current.push(c);
                }
                c if c.is_whitespace() && depth == 0 => {
                    if !current.is_empty() {
                        words.push(std::mem::take(&mut current));
                    }
                }
                _ => current.push(c),
            }
        }
        prev = c;
    }

    if !current.is_empty() {
        words.push(current);
    }

    words
}

/// Strip surrounding identifier quotes (backtick, double, single).
pub fn strip_quotes(s: &str) -> &str {
    s.trim_matches(|c| c == '`' || c == '"' || c == '\'')
}
