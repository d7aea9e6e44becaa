//! Symbol transformation for naming styles.
//!
//! Registry identifiers mix conventions (`glTexImage2D`, `GL_RGBA32F`,
//! `ClearBufferMask`). [`transform_symbol`] optionally strips the API prefix,
//! splits the rest into words and joins them again in the requested case.
//! Digits stay attached to the word they follow, so `Image2D` is one word
//! and `GL_PROXY_TEXTURE_2D` ends with the word `2D`.

use convert_case::Casing;

use crate::options::Case;

/// Prefix of enumerant names
const CONSTANT_PREFIX: &str = "GL_";
/// Prefix of command names
const COMMAND_PREFIX: &str = "gl";

/// Strip exactly one API prefix, if present.
///
/// The command prefix only counts when followed by an uppercase letter or a
/// digit, so a word that merely starts with `gl` is kept whole.
pub fn strip_prefix(symbol: &str) -> &str {
    if let Some(rest) = symbol.strip_prefix(CONSTANT_PREFIX) {
        return rest;
    }
    match symbol.strip_prefix(COMMAND_PREFIX) {
        Some(rest)
            if rest
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) =>
        {
            rest
        }
        _ => symbol,
    }
}

/// Split a symbol into words.
///
/// Underscores separate words and are dropped. A lowercase-to-uppercase
/// transition starts a word, and an uppercase run followed by a lowercase
/// letter splits before its last letter (`ARBCopy` -> `ARB`, `Copy`). Digits
/// and anything after them continue the open word.
pub fn tokenize(symbol: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();

    for c in symbol.chars() {
        if c == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        let previous = current.chars().last();
        if c.is_uppercase() {
            if previous.is_some_and(char::is_lowercase) {
                words.push(std::mem::take(&mut current));
            }
        } else if c.is_lowercase() {
            let mut tail = current.chars().rev();
            let last = tail.next();
            let before_last = tail.next();
            if last.is_some_and(char::is_uppercase) && before_last.is_some_and(char::is_uppercase)
            {
                // acronym boundary: the last uppercase letter starts the next word
                if let Some(start) = current.pop() {
                    words.push(std::mem::take(&mut current));
                    current.push(start);
                }
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Transform a registry symbol into the requested case.
pub fn transform_symbol(symbol: &str, case: Case, omit_prefix: bool) -> String {
    let symbol = if omit_prefix {
        strip_prefix(symbol)
    } else {
        symbol
    };

    let target = match case {
        Case::Initial => return symbol.to_string(),
        Case::SnakeCase => convert_case::Case::Snake,
        Case::UpperCase => convert_case::Case::ScreamingSnake,
        Case::CamelCase => convert_case::Case::Camel,
        Case::PascalCase => convert_case::Case::Pascal,
    };

    // words never contain underscores, so joining on them is lossless
    tokenize(symbol)
        .join("_")
        .from_case(convert_case::Case::Snake)
        .to_case(target)
}
