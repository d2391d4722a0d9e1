/// Collapses whitespace in a node response body and cuts it to `max_len`
/// characters so it can ride inside an error message.
pub fn compact_node_body(body: &str, max_len: usize) -> String {
    let mut compact = String::with_capacity(body.len().min(max_len + 16));
    let mut chars = 0usize;
    for word in body.split_whitespace() {
        if !compact.is_empty() {
            compact.push(' ');
            chars += 1;
        }
        for ch in word.chars() {
            if chars >= max_len {
                compact.push_str("...(truncated)");
                return compact;
            }
            compact.push(ch);
            chars += 1;
        }
    }
    if compact.is_empty() {
        "<empty body>".to_string()
    } else {
        compact
    }
}
