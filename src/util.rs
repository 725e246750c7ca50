use std::fmt::Debug;

/// Debug-formats a value and truncates it for log output.
pub fn shorten_for_log(value: &impl Debug, max_len: usize) -> String {
    let mut text = format!("{value:?}");
    if let Some((cut, _)) = text.char_indices().nth(max_len) {
        text.truncate(cut);
        text.push_str("...");
    }
    text
}
