//! English morphology helpers for the preview linearizer.
//!
//! These are lightweight, rule-based transformations, not a full
//! morphology engine. They cover the common cases needed to read a
//! finished dependency tree back as a plausible English sentence.

use super::tree::Tense;

/// Capitalize the first letter of a string.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => {
            let upper: String = c.to_uppercase().collect();
            upper + chars.as_str()
        }
    }
}

/// Simple plural heuristic for English nouns.
///
/// Only the last word of a compound is inflected ("research groups").
pub fn pluralize(word: &str) -> String {
    if let Some((head, last)) = word.rsplit_once(' ') {
        return format!("{head} {}", pluralize(last));
    }
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_lowercase();

    match lower.as_str() {
        "child" => return format_case(word, "children"),
        "person" => return format_case(word, "people"),
        "man" => return format_case(word, "men"),
        "woman" => return format_case(word, "women"),
        "datum" => return format_case(word, "data"),
        "index" => return format_case(word, "indices"),
        "thesis" => return format_case(word, "theses"),
        _ => {}
    }

    if lower.ends_with('y') {
        let before_y = lower.chars().rev().nth(1).unwrap_or('a');
        if !matches!(before_y, 'a' | 'e' | 'i' | 'o' | 'u') {
            return format!("{}ies", &word[..word.len() - 1]);
        }
    }

    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        return format!("{word}es");
    }

    format!("{word}s")
}

/// Preserve the case style of the original word in the replacement.
fn format_case(original: &str, replacement: &str) -> String {
    if original.chars().next().is_some_and(|c| c.is_uppercase()) {
        capitalize(replacement)
    } else {
        replacement.to_string()
    }
}

/// Turn a class label into a lowercase common noun.
///
/// - "Paper" → "paper"
/// - "ResearchGroup" → "research group"
/// - "research_group" → "research group"
pub fn humanize_class(class: &str) -> String {
    let mut out = String::with_capacity(class.len() + 4);
    let mut prev_lower = false;
    for c in class.chars() {
        if c == '_' || c == '-' {
            out.push(' ');
            prev_lower = false;
        } else if c.is_uppercase() {
            if prev_lower {
                out.push(' ');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

/// Ordinal word for small numbers, numeric suffix beyond ten.
pub fn ordinal_word(n: u32) -> String {
    const WORDS: [&str; 10] = [
        "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth",
        "tenth",
    ];
    if (1..=10).contains(&n) {
        return WORDS[(n - 1) as usize].to_string();
    }
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Irregular verbs: lemma, past, participle.
const IRREGULAR: &[(&str, &str, &str)] = &[
    ("be", "was", "been"),
    ("have", "had", "had"),
    ("write", "wrote", "written"),
    ("make", "made", "made"),
    ("teach", "taught", "taught"),
    ("lead", "led", "led"),
    ("hold", "held", "held"),
    ("win", "won", "won"),
    ("give", "gave", "given"),
    ("take", "took", "taken"),
    ("begin", "began", "begun"),
    ("build", "built", "built"),
    ("do", "did", "done"),
];

fn irregular(lemma: &str) -> Option<(&'static str, &'static str)> {
    IRREGULAR
        .iter()
        .find(|(l, _, _)| *l == lemma)
        .map(|(_, past, part)| (*past, *part))
}

/// Third person singular present ("writes", "teaches", "studies").
pub fn present_third(lemma: &str) -> String {
    match lemma {
        "be" => return "is".into(),
        "have" => return "has".into(),
        "do" => return "does".into(),
        _ => {}
    }
    if lemma.ends_with('y') && !lemma.ends_with("ay") && !lemma.ends_with("ey") && !lemma.ends_with("oy") {
        return format!("{}ies", &lemma[..lemma.len() - 1]);
    }
    if lemma.ends_with('s')
        || lemma.ends_with('x')
        || lemma.ends_with("ch")
        || lemma.ends_with("sh")
        || lemma.ends_with('o')
    {
        return format!("{lemma}es");
    }
    format!("{lemma}s")
}

/// Simple past ("wrote", "published", "studied").
pub fn past(lemma: &str) -> String {
    if let Some((past, _)) = irregular(lemma) {
        return past.to_string();
    }
    regular_ed(lemma)
}

/// Past participle ("written", "published").
pub fn participle(lemma: &str) -> String {
    if let Some((_, part)) = irregular(lemma) {
        return part.to_string();
    }
    regular_ed(lemma)
}

fn regular_ed(lemma: &str) -> String {
    if lemma.ends_with('e') {
        return format!("{lemma}d");
    }
    if lemma.ends_with('y') && !lemma.ends_with("ay") && !lemma.ends_with("ey") && !lemma.ends_with("oy") {
        return format!("{}ied", &lemma[..lemma.len() - 1]);
    }
    format!("{lemma}ed")
}

/// Finite form of a verb for the given tense and number.
pub fn inflect(lemma: &str, tense: Tense, plural: bool) -> String {
    match (lemma, tense, plural) {
        ("be", Tense::Present, true) => "are".into(),
        ("be", Tense::Past, true) => "were".into(),
        (_, Tense::Present, false) => present_third(lemma),
        (_, Tense::Present, true) => lemma.to_string(),
        (_, Tense::Past, _) => past(lemma),
    }
}

/// Join items in a list with commas and a final conjunction.
///
/// - 0 items → ""
/// - 1 item → "A"
/// - 2 items → "A and B" (or "A, B" for a comma conjunctor)
/// - 3+ items → "A, B, and C" (Oxford comma)
pub fn join_list(items: &[String], conjunction: &str) -> String {
    if conjunction == "," {
        return items.join(", ");
    }
    match items {
        [] => String::new(),
        [one] => one.clone(),
        [a, b] => format!("{a} {conjunction} {b}"),
        [rest @ .., last] => format!("{}, {conjunction} {last}", rest.join(", ")),
    }
}
