//! Small text helpers used when presenting inflected words.

use unicode_segmentation::UnicodeSegmentation;

use crate::error::{PrimerError, Result};

/// Uppercase the first character of `input`, leaving the rest untouched.
///
/// The first character is the first extended grapheme cluster, so a letter
/// followed by a combining mark is uppercased as a unit.
///
/// # Errors
///
/// - [`PrimerError::NullInput`] when `input` is `None`
/// - [`PrimerError::EmptyInput`] when `input` is `""`
///
/// # Examples
///
/// ```
/// use primer::text::first_char_to_upper;
///
/// assert_eq!(first_char_to_upper(Some("марковцом")).unwrap(), "Марковцом");
/// assert!(first_char_to_upper(Some("")).is_err());
/// assert!(first_char_to_upper(None).is_err());
/// ```
pub fn first_char_to_upper(input: Option<&str>) -> Result<String> {
    let input = input.ok_or_else(|| PrimerError::null_input("input"))?;

    let mut graphemes = input.graphemes(true);
    let first = graphemes
        .next()
        .ok_or_else(|| PrimerError::empty_input("input"))?;

    let mut result = String::with_capacity(input.len());
    result.push_str(&first.to_uppercase());
    result.push_str(graphemes.as_str());
    Ok(result)
}

/// Uppercase the first character of a present string.
pub fn capitalize(input: &str) -> Result<String> {
    first_char_to_upper(Some(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_cyrillic() {
        assert_eq!(capitalize("дмитрий").unwrap(), "Дмитрий");
        assert_eq!(capitalize("Олеговичем").unwrap(), "Олеговичем");
        assert_eq!(capitalize("я").unwrap(), "Я");
    }

    #[test]
    fn test_capitalize_keeps_tail() {
        assert_eq!(capitalize("mIXED case").unwrap(), "MIXED case");
        assert_eq!(capitalize("1abc").unwrap(), "1abc");
    }

    #[test]
    fn test_capitalize_combining_mark() {
        // "е" followed by a combining diaeresis
        let input = "е\u{0308}лка";
        assert_eq!(capitalize(input).unwrap(), "Е\u{0308}лка");
    }

    #[test]
    fn test_capitalize_is_idempotent() {
        for word in ["марковцом", "Зыкину", "ǆemal", "ß", "x", "ёж"] {
            let once = capitalize(word).unwrap();
            let twice = capitalize(&once).unwrap();
            assert_eq!(once, twice, "capitalize not idempotent for {word}");
        }
    }

    #[test]
    fn test_empty_input() {
        let err = capitalize("").unwrap_err();
        assert!(matches!(err, PrimerError::EmptyInput(_)));
    }

    #[test]
    fn test_null_input() {
        let err = first_char_to_upper(None).unwrap_err();
        assert!(matches!(err, PrimerError::NullInput(_)));
    }
}
