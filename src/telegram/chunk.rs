//! Splitting of oversized messages.

/// Telegram's per-message text limit.
pub const MESSAGE_LIMIT: usize = 4096;

/// Splits `text` into chunks of at most `max_len` characters.
///
/// Lines are never split: a chunk is flushed as soon as the next line would
/// push it over the limit, and that line starts the next chunk. The newline
/// at a chunk boundary is dropped, so `chunks.join("\n")` rebuilds `text`.
///
/// A single line longer than `max_len` cannot satisfy both rules; it is cut
/// at character boundaries into pieces of exactly `max_len` (the last one
/// shorter).
#[must_use]
pub fn split_message(text: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    if text.chars().count() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    let mut has_line = false;

    for line in text.split('\n') {
        let line_len = line.chars().count();

        if line_len > max_len {
            if has_line {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
                has_line = false;
            }
            let mut pieces = hard_split(line, max_len);
            if let Some(last) = pieces.pop() {
                chunks.extend(pieces);
                current_len = last.chars().count();
                current = last;
                has_line = true;
            }
            continue;
        }

        if !has_line {
            current.push_str(line);
            current_len = line_len;
            has_line = true;
        } else if current_len + 1 + line_len <= max_len {
            current.push('\n');
            current.push_str(line);
            current_len += 1 + line_len;
        } else {
            chunks.push(std::mem::replace(&mut current, line.to_string()));
            current_len = line_len;
        }
    }

    if has_line {
        chunks.push(current);
    }
    chunks
}

fn hard_split(line: &str, max_len: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(max_len)
        .map(|piece| piece.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_a_single_chunk() {
        assert_eq!(split_message("hola\nmundo", 4096), vec!["hola\nmundo"]);
        assert_eq!(split_message("", 4096), vec![""]);
    }

    #[test]
    fn chunks_respect_limit_and_rebuild_original() {
        let line = "• Resolución de la Secretaría de Estado ".repeat(3);
        let text: String = (0..300)
            .map(|i| format!("{i}: {line}"))
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.chars().count() > MESSAGE_LIMIT);

        let chunks = split_message(&text, MESSAGE_LIMIT);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= MESSAGE_LIMIT);
        }
        assert_eq!(chunks.join("\n"), text);
    }

    #[test]
    fn lines_are_never_split() {
        let text = "Line 1\n".repeat(100);
        let chunks = split_message(&text, 50);
        let original_lines: Vec<&str> = text.split('\n').collect();
        let rebuilt: Vec<&str> = chunks.iter().flat_map(|c| c.split('\n')).collect();
        assert_eq!(rebuilt, original_lines);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 50);
        }
    }

    #[test]
    fn flush_happens_exactly_at_the_limit() {
        let chunks = split_message("aaaa\nbbbb\ncccc", 9);
        assert_eq!(chunks, vec!["aaaa\nbbbb", "cccc"]);
    }

    #[test]
    fn blank_lines_survive_the_split() {
        let text = "aaaa\n\nbbbb\n\ncccc";
        let chunks = split_message(text, 6);
        assert_eq!(chunks.join("\n"), text);
    }

    #[test]
    fn overlong_line_is_cut_into_limit_sized_pieces() {
        let text = format!("intro\n{}\nouttro", "x".repeat(25));
        let chunks = split_message(&text, 10);
        assert_eq!(
            chunks,
            vec!["intro", "xxxxxxxxxx", "xxxxxxxxxx", "xxxxx", "outtro"]
        );
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        let text = "ñ".repeat(8);
        assert_eq!(split_message(&text, 8), vec![text.clone()]);
    }
}
