//! Output formatting utilities

/// Truncate a string to a maximum length in characters, marking the cut with `...`.
#[must_use]
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    if max_len < 3 {
        return "...".to_string();
    }
    let trimmed: String = s.chars().take(max_len - 3).collect();
    format!("{trimmed}...")
}

/// Truncate at the last word boundary within `max_len` characters.
///
/// The `...` marker is appended after the cut and is not counted.
#[must_use]
pub fn truncate_at_word(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let head: String = s.chars().take(max_len).collect();
    let cut = match head.rfind(' ') {
        Some(idx) if idx > 0 => &head[..idx],
        _ => head.as_str(),
    };
    format!("{cut}...")
}

/// Word wrap to lines of at most `width` characters.
///
/// Whitespace runs collapse to one space. Words longer than `width` get a
/// line of their own instead of being split.
#[must_use]
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Vec::new();
    }
    let options = textwrap::Options::new(width.max(1)).break_words(false);
    textwrap::wrap(&collapsed, options)
        .into_iter()
        .map(std::borrow::Cow::into_owned)
        .collect()
}

/// Format size in human-readable form
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
