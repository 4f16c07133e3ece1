//! Utterance text shaping: punctuation normalization, duration estimation,
//! and splitting long utterances into display-sized pieces.

/// Replace a `.` or `,` that sits between two digits with a placeholder, so
/// decimal points survive sentence splitting.
fn protect_decimal_points(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    for (i, &c) in chars.iter().enumerate() {
        let between_digits = (c == '.' || c == ',')
            && i > 0
            && i + 1 < chars.len()
            && chars[i - 1].is_ascii_digit()
            && chars[i + 1].is_ascii_digit();
        out.push(if between_digits { '\u{0}' } else { c });
    }
    out
}

/// Normalize an utterance: protect decimal points, title-case the first
/// letter, and guarantee trailing punctuation.
pub fn format_utterance(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let mut out = String::with_capacity(trimmed.len() + 1);
    let mut chars = trimmed.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
    }
    out.push_str(chars.as_str());
    if !matches!(out.chars().last(), Some('.') | Some('!') | Some('?')) {
        out.push('.');
    }
    out
}

/// `2 * (1 - 0.75^(len/10))` seconds, the fallback duration estimate used
/// when the bus message carries no explicit duration.
pub fn calculate_duration(text: &str) -> f64 {
    2.0 * (1.0 - 0.75_f64.powf(text.chars().count() as f64 / 10.0))
}

/// Split `text` into pieces no longer than `max_len` characters, preferring
/// to break on sentence boundaries (". "). Decimal points are protected from
/// being treated as sentence boundaries.
pub fn generate_split_utterance(text: &str, max_len: usize) -> Vec<String> {
    if text.chars().count() <= max_len {
        return vec![text.to_string()];
    }

    let protected = protect_decimal_points(text);
    let sentences: Vec<String> = protected
        .split(". ")
        .map(|s| s.replace('\u{0}', "."))
        .collect();

    let mut pieces = Vec::new();
    let mut current = String::new();
    for sentence in sentences {
        let candidate = if current.is_empty() {
            sentence.clone()
        } else {
            format!("{current}. {sentence}")
        };
        if candidate.chars().count() > max_len && !current.is_empty() {
            pieces.push(current.clone());
            current = sentence;
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    if pieces.is_empty() {
        pieces.push(text.to_string());
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_capital_and_trailing_period() {
        assert_eq!(format_utterance("hello there"), "Hello there.");
    }

    #[test]
    fn preserves_existing_terminal_punctuation() {
        assert_eq!(format_utterance("is that right?"), "Is that right?");
    }

    #[test]
    fn duration_grows_with_length_but_bounded_by_two_seconds() {
        let short = calculate_duration("hi");
        let long = calculate_duration(&"word ".repeat(40));
        assert!(short < long);
        assert!(long < 2.0);
    }

    #[test]
    fn split_keeps_short_text_as_single_piece() {
        assert_eq!(generate_split_utterance("short.", 60), vec!["short."]);
    }

    #[test]
    fn split_protects_decimal_points() {
        let pieces = generate_split_utterance("It is 3.14 exactly.", 60);
        assert_eq!(pieces, vec!["It is 3.14 exactly."]);
    }
}
