//! Locating JSON embedded in larger text (provider replies, page scripts).

/// Find the first balanced `open`..`close` span at or after the first `open`
/// in `text`. Brackets inside JSON string literals are ignored.
///
/// Returns the byte offset of the span together with the span itself.
pub(crate) fn balanced_span(text: &str, open: char, close: char) -> Option<(usize, &str)> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        if c == '"' {
            in_string = true;
        } else if c == open {
            depth += 1;
        } else if c == close {
            depth -= 1;
            if depth == 0 {
                let end = start + offset + c.len_utf8();
                return Some((start, &text[start..end]));
            }
        }
    }
    None
}

/// Every balanced `{...}` span in order of its opening brace, found in a
/// single pass. An opening brace that never closes is skipped, so stray
/// prose like `{oops` does not hide a later object.
pub(crate) fn object_candidates(text: &str) -> impl Iterator<Item = &str> {
    let mut spans: Vec<(usize, usize)> = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    let start = text.find('{').unwrap_or(text.len());
    for (offset, c) in text[start..].char_indices() {
        let index = start + offset;
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' if !open.is_empty() => in_string = true,
            '{' => open.push(index),
            '}' => {
                if let Some(begin) = open.pop() {
                    spans.push((begin, index + c.len_utf8()));
                }
            }
            _ => {}
        }
    }

    spans.sort_unstable_by_key(|(begin, _)| *begin);
    spans.into_iter().map(move |(begin, end)| &text[begin..end])
}
