/// First balanced top-level `{...}` in `input`, tolerating chatter around it.
///
/// Depth counting starts at the first `{`; braces inside JSON string literals
/// do not count, so generated source code with unbalanced braces in a string
/// value does not cut the object short.
pub(crate) fn extract_json_object(input: &str) -> Option<&str> {
    let start = input.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (idx, ch) in input[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + idx;
                    return Some(&input[start..=end]);
                }
            }
            _ => {}
        }
    }

    None
}
