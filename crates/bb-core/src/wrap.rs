//! Export word wrap for prose fields

/// Column width used when prose is written to the mirror.
pub const EXPORT_WIDTH: usize = 80;

/// Re-flow `text` so no line exceeds `width` characters.
///
/// Line endings are normalized to LF and existing line breaks are kept, so
/// blank lines between paragraphs survive. Each line is split on spaces and
/// tabs and re-packed greedily; a word longer than `width` gets a line of its
/// own.
pub fn wrap_at(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    let normalized = text.replace("\r\n", "\n");
    let mut out: Vec<String> = Vec::new();
    for line in normalized.split('\n') {
        let mut words = line.split([' ', '\t']).filter(|w| !w.is_empty());
        let Some(first) = words.next() else {
            out.push(String::new());
            continue;
        };

        let mut current = first.to_string();
        let mut current_len = first.chars().count();
        for word in words {
            let word_len = word.chars().count();
            if current_len + 1 + word_len <= width {
                current.push(' ');
                current.push_str(word);
                current_len += 1 + word_len;
            } else {
                out.push(std::mem::replace(&mut current, word.to_string()));
                current_len = word_len;
            }
        }
        out.push(current);
    }
    out.join("\n")
}

/// [`wrap_at`] at the export width.
pub fn wrap_export(text: &str) -> String {
    wrap_at(text, EXPORT_WIDTH)
}
