//! Text improvement for free-text form fields
//!
//! A deterministic, rule-based rewrite that stands in for a language-model
//! call. The rules and constants are part of the service's observable
//! behaviour, so they must not drift:
//!
//! 1. trim surrounding whitespace (including U+001C..U+001F)
//! 2. capitalize every `". "`-delimited segment (first char title case, rest lower)
//! 3. upper-case the very first character
//! 4. short texts (< 100 chars) get [`ENHANCEMENT_SUFFIX`]
//! 5. apply [`REPLACEMENTS`] in order
//! 6. long texts (> 200 chars) with more than 3 segments are regrouped into
//!    paragraphs of 3 sentences

/// Sentence appended to short texts (before replacements run)
pub const ENHANCEMENT_SUFFIX: &str =
    " Это захватывающее событие обещает стать незабываемым для всех посетителей.";

/// Word replacements, applied in order to the already-rewritten text
pub const REPLACEMENTS: &[(&str, &str)] = &[
    ("хорошо", "превосходно"),
    ("интересно", "захватывающе"),
    ("важно", "исключительно важно"),
    ("событие", "мероприятие"),
    ("красивый", "великолепный"),
    ("большой", "масштабный"),
];

const SENTENCE_DELIMITER: &str = ". ";
const PARAGRAPH_DELIMITER: &str = "\n\n";
const SHORT_TEXT_CHARS: usize = 100;
const LONG_TEXT_CHARS: usize = 200;
const SENTENCES_PER_PARAGRAPH: usize = 3;

/// Something that can rewrite a piece of event copy
pub trait Improver: Send + Sync {
    fn improve(&self, text: &str) -> String;
}

/// The built-in rule-based improver
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedImprover;

impl Improver for RuleBasedImprover {
    fn improve(&self, text: &str) -> String {
        improve(text)
    }
}

/// Improve `text` using the fixed rule set. Never fails.
pub fn improve(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut improved = text
        .trim_matches(is_strippable)
        .split(SENTENCE_DELIMITER)
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(SENTENCE_DELIMITER);

    improved = upper_first(&improved);

    if improved.chars().count() < SHORT_TEXT_CHARS {
        improved.push_str(ENHANCEMENT_SUFFIX);
    }

    improved = apply_replacements(&improved);

    if improved.chars().count() > LONG_TEXT_CHARS {
        if let Some(paragraphs) = into_paragraphs(&improved) {
            improved = paragraphs;
        }
    }

    improved
}

/// Run the replacement table over `text`
pub fn apply_replacements(text: &str) -> String {
    REPLACEMENTS
        .iter()
        .fold(text.to_string(), |acc, (word, replacement)| {
            acc.replace(word, replacement)
        })
}

/// Regroup sentences into paragraphs; `None` when there are too few to split
fn into_paragraphs(text: &str) -> Option<String> {
    let sentences: Vec<&str> = text.split(SENTENCE_DELIMITER).collect();
    if sentences.len() <= SENTENCES_PER_PARAGRAPH {
        return None;
    }

    let paragraphs: Vec<String> = sentences
        .chunks(SENTENCES_PER_PARAGRAPH)
        .map(|chunk| format!("{}.", chunk.join(SENTENCE_DELIMITER)))
        .collect();

    Some(paragraphs.join(PARAGRAPH_DELIMITER))
}

/// Unicode whitespace plus the ASCII information separators U+001C..U+001F
fn is_strippable(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// First character title-cased, the rest lower-cased
fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => {
            let mut out = title_case(first);
            out.push_str(&chars.as_str().to_lowercase());
            out
        }
        None => String::new(),
    }
}

/// Title-case mapping: differs from upper case for digraphs and a few
/// characters whose upper case expands to several letters
fn title_case(c: char) -> String {
    match c {
        'Ǆ' | 'ǅ' | 'ǆ' => "ǅ".to_string(),
        'Ǉ' | 'ǈ' | 'ǉ' => "ǈ".to_string(),
        'Ǌ' | 'ǋ' | 'ǌ' => "ǋ".to_string(),
        'Ǳ' | 'ǲ' | 'ǳ' => "ǲ".to_string(),
        'ß' => "Ss".to_string(),
        'ﬀ' => "Ff".to_string(),
        'ﬁ' => "Fi".to_string(),
        'ﬂ' => "Fl".to_string(),
        'ﬃ' => "Ffi".to_string(),
        'ﬄ' => "Ffl".to_string(),
        'ﬅ' | 'ﬆ' => "St".to_string(),
        'և' => "Եւ".to_string(),
        _ => c.to_uppercase().collect(),
    }
}

fn upper_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
