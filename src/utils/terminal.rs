//! Terminal output sanitization for record content.
//!
//! Task exports are user-controlled text. Before a cell is printed to a terminal it goes through
//! [`display_cell`], which removes ANSI escape sequences and control characters so that a crafted
//! export cannot move the cursor, recolor the screen or ring the bell.

/// Strips ANSI CSI escape codes and control characters, keeping tab, newline and carriage return
///
/// # Examples
///
/// ```
/// use task_export_explorer::utils::terminal::strip_ansi_codes;
///
/// let text = "\x1b[31mRed text\x1b[0m";
/// assert_eq!(strip_ansi_codes(text), "Red text");
/// ```
pub fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            // CSI sequences end at the first letter
            for next_ch in chars.by_ref() {
                if next_ch.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }

        if ch.is_control() && !matches!(ch, '\t' | '\n' | '\r') {
            continue;
        }

        result.push(ch);
    }

    result
}

/// Single-line, escape-free rendering of a cell for table output
///
/// Line breaks and tabs collapse to single spaces.
pub fn display_cell(text: &str) -> String {
    let stripped = strip_ansi_codes(text);
    let mut result = String::with_capacity(stripped.len());
    let mut last_was_break = false;

    for ch in stripped.chars() {
        if matches!(ch, '\t' | '\n' | '\r') {
            if !last_was_break {
                result.push(' ');
            }
            last_was_break = true;
        } else {
            result.push(ch);
            last_was_break = false;
        }
    }

    result
}

/// Truncate to at most `max_chars` characters, marking the cut with an ellipsis
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut truncated: String = text.chars().take(max_chars - 1).collect();
    truncated.push('…');
    truncated
}
