//! Case transforms
use formdef_core::CaseTransform;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

lazy_static! {
    /// Maximal run of non-whitespace
    static ref TOKEN: Regex = Regex::new(r"\S+").unwrap();
}

/// Upper-case the first char of every non-whitespace run and lower-case
/// the rest. Whitespace passes through untouched.
pub fn title_case(input: &str) -> String {
    TOKEN
        .replace_all(input, |caps: &Captures| capitalize(&caps[0]))
        .into_owned()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub fn apply_case(kind: CaseTransform, input: &str) -> String {
    match kind {
        CaseTransform::TitleCase => title_case(input),
        CaseTransform::Uppercase => input.to_uppercase(),
        CaseTransform::Lowercase => input.to_lowercase(),
    }
}
