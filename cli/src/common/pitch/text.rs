//! Visible-text extraction and pitch reply shaping.
//!
//! Both functions are pure and deterministic; they never fail. Malformed HTML
//! degrades to whatever text `html2text` can recover, and if rendering fails
//! altogether the raw input is used.
use html2text::render::TrivialDecorator;
use tracing::warn;

/// Upper bound for a shaped pitch, in characters.
pub const MAX_PITCH_CHARS: usize = 240;

/// Line width handed to `html2text`; wide enough that wrapping never splits words.
const RENDER_WIDTH: usize = 10_000;

/// Returns the human-visible text of `input` with whitespace collapsed to single spaces.
///
/// Rendering uses the trivial decorator: emphasis, list bullets, heading
/// markers and link footnotes are all dropped. Input without markup or
/// entities is only whitespace-normalized.
pub fn visible_text(input: &str) -> String {
    if !input.contains('<') && !input.contains('&') {
        return collapse_whitespace(input);
    }
    let rendered = html2text::from_read_with_decorator(
        input.as_bytes(),
        RENDER_WIDTH,
        TrivialDecorator::new(),
    );
    match rendered {
        Ok(rendered) => collapse_whitespace(&rendered),
        Err(e) => {
            warn!("HTML rendering failed, using raw description: {}", e);
            collapse_whitespace(input)
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reduces a model reply to one bounded sentence.
///
/// Drops a leading `Pitch:` label and wrapping quotes, keeps the first
/// sentence, and caps the length at `MAX_PITCH_CHARS`. A terminator only ends a
/// sentence when followed by whitespace or the end of the text, so `3.5` or
/// `v2.0` survive. Returns `None` when nothing usable is left.
pub fn shape_pitch(reply: &str) -> Option<String> {
    let mut text = collapse_whitespace(reply);

    if text
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("pitch:"))
    {
        text = text[6..].trim_start().to_string();
    }
    let text = strip_wrapping_quotes(&text);

    let sentence = first_sentence(text).trim();
    if sentence.is_empty() {
        return None;
    }
    Some(bound_length(sentence))
}

fn strip_wrapping_quotes(text: &str) -> &str {
    for (open, close) in [('"', '"'), ('\u{201c}', '\u{201d}'), ('\'', '\'')] {
        if let Some(inner) = text
            .strip_prefix(open)
            .and_then(|rest| rest.strip_suffix(close))
        {
            return inner.trim();
        }
    }
    text
}

fn first_sentence(text: &str) -> &str {
    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if matches!(c, '.' | '!' | '?') {
            let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
            if at_boundary {
                return &text[..idx + c.len_utf8()];
            }
        }
    }
    text
}

fn bound_length(sentence: &str) -> String {
    if sentence.chars().count() <= MAX_PITCH_CHARS {
        return sentence.to_string();
    }
    let budget = MAX_PITCH_CHARS - 3;
    let cut: String = sentence.chars().take(budget).collect();
    let head = match cut.rfind(' ') {
        Some(space) if space > 0 => &cut[..space],
        _ => cut.as_str(),
    };
    format!("{}...", head.trim_end_matches([',', ';', ':', ' ']))
}
