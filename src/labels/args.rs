/// Parse a `name=text` label binding, splitting at the first `=`.
///
/// The text part goes through [`unescape_label_text`].
pub fn parse_label_arg(arg: &str) -> Result<(String, String), String> {
    let (name, text) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=TEXT, got '{arg}'"))?;
    if name.is_empty() {
        return Err(format!("label name is empty in '{arg}'"));
    }
    Ok((name.to_string(), unescape_label_text(text)))
}

/// Decode `\n` to a newline and `\\` to a backslash; any other backslash is kept as-is.
pub fn unescape_label_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('n') => {
                chars.next();
                out.push('\n');
            }
            Some('\\') => {
                chars.next();
                out.push('\\');
            }
            _ => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/labels/args.rs"]
mod tests;
