/// Splits `line` on `sep`, ignoring separators inside single or double
/// quotes. Quotes are kept in the returned fields.
pub fn split_preserving_quotes(line: &str, sep: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => {
                quote = None;
                current.push(c);
            }
            Some(_) => current.push(c),
            None if c == sep => fields.push(std::mem::take(&mut current)),
            None if c == '\'' || c == '"' => {
                quote = Some(c);
                current.push(c);
            }
            None => current.push(c),
        }
    }
    fields.push(current);
    fields
}

pub fn strip_surrounding_quotes(s: &str) -> &str {
    let b = s.as_bytes();
    if b.len() >= 2 && (b[0] == b'\'' || b[0] == b'"') && b[b.len() - 1] == b[0] {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

pub fn is_comment_or_empty(s: &str) -> bool {
    let t = s.trim();
    t.is_empty() || t.starts_with('%')
}
