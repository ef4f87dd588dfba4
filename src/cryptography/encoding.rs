//! Canonical tuple encoding. A tuple of encodings is serialized as
//! `"(" e_1 "," e_2 "," ... ")"` with no whitespace; nested tuples
//! recurse. The verifier side must accept the identical format, so the
//! functions here are the single source of truth for it.

use crate::errors::MixnetError;

/// Join child encodings into a tuple encoding.
pub fn tuple<I>(parts: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out = String::from("(");
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(part.as_ref());
    }
    out.push(')');
    out
}

/// Split a tuple encoding into its top-level children. Nested tuples
/// are returned unsplit.
pub fn split_tuple(encoding: &str) -> Result<Vec<String>, MixnetError> {
    let inner = encoding
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| {
            MixnetError::EncodingFailure(format!("not a tuple encoding: `{encoding}`"))
        })?;
    if inner.is_empty() {
        return Ok(Vec::new());
    }
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in inner.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    MixnetError::EncodingFailure(format!(
                        "unbalanced parentheses in tuple: `{encoding}`"
                    ))
                })?;
            }
            ',' if depth == 0 => {
                parts.push(inner[start..i].to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(MixnetError::EncodingFailure(format!(
            "unbalanced parentheses in tuple: `{encoding}`"
        )));
    }
    parts.push(inner[start..].to_string());
    if parts.iter().any(String::is_empty) {
        return Err(MixnetError::EncodingFailure(format!(
            "empty component in tuple: `{encoding}`"
        )));
    }
    Ok(parts)
}

/// Split a tuple encoding and require an exact arity.
pub fn split_tuple_exact(encoding: &str, arity: usize) -> Result<Vec<String>, MixnetError> {
    let parts = split_tuple(encoding)?;
    if parts.len() != arity {
        return Err(MixnetError::EncodingFailure(format!(
            "tuple of arity {} where {} was expected: `{encoding}`",
            parts.len(),
            arity
        )));
    }
    Ok(parts)
}
