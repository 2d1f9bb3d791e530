//! Idiom registry
//!
//! An [`Idiom`] pairs a compiled pattern with a decoder that turns one match
//! into a typed fact. A [`Catalogue`] is an ordered list of idioms producing
//! the same fact type; scanning runs every idiom over the whole text and
//! concatenates the results in catalogue order.

use crate::Result;
use regex::{Captures, Regex};

/// Turns the captures of one match (and its byte offset) into a fact.
/// Returning `None` rejects the match.
pub type Decoder<T> = fn(&Captures<'_>, usize) -> Option<T>;

/// One recognized textual pattern
pub struct Idiom<T> {
    name: &'static str,
    regex: Regex,
    decode: Decoder<T>,
}

impl<T> Idiom<T> {
    pub fn new(name: &'static str, pattern: &str, decode: Decoder<T>) -> Result<Self> {
        Ok(Self {
            name,
            regex: Regex::new(pattern)?,
            decode,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All matches of this idiom in `text`, in text order
    pub fn scan(&self, text: &str) -> Vec<T> {
        self.regex
            .captures_iter(text)
            .filter_map(|caps| {
                let offset = caps.get(0).map_or(0, |m| m.start());
                (self.decode)(&caps, offset)
            })
            .collect()
    }
}

impl<T> std::fmt::Debug for Idiom<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Idiom")
            .field("name", &self.name)
            .field("pattern", &self.regex.as_str())
            .finish()
    }
}

/// Ordered set of idioms for one kind of fact
#[derive(Debug)]
pub struct Catalogue<T> {
    idioms: Vec<Idiom<T>>,
}

impl<T> Default for Catalogue<T> {
    fn default() -> Self {
        Self { idioms: Vec::new() }
    }
}

impl<T> Catalogue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an idiom; it is tried after every idiom already registered.
    pub fn with(mut self, idiom: Idiom<T>) -> Self {
        self.idioms.push(idiom);
        self
    }

    pub fn push(&mut self, idiom: Idiom<T>) {
        self.idioms.push(idiom);
    }

    pub fn len(&self) -> usize {
        self.idioms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idioms.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.idioms.iter().map(Idiom::name).collect()
    }

    /// Run every idiom independently and concatenate the results.
    pub fn scan(&self, text: &str) -> Vec<T> {
        let mut found = Vec::new();
        for idiom in &self.idioms {
            let matches = idiom.scan(text);
            tracing::trace!(idiom = idiom.name(), count = matches.len(), "idiom scanned");
            found.extend(matches);
        }
        found
    }
}

/// Named capture as an owned, trimmed string
pub(crate) fn capture(caps: &Captures<'_>, name: &str) -> Option<String> {
    caps.name(name).map(|m| m.as_str().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_idiom(name: &'static str, pattern: &str) -> Idiom<String> {
        Idiom::new(name, pattern, |caps, _| capture(caps, "word")).unwrap()
    }

    #[test]
    fn test_idiom_scan_in_text_order() {
        let idiom = word_idiom("ident", r"let (?P<word>\w+)");
        assert_eq!(idiom.scan("let a; let b; let c;"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_idiom_offsets() {
        let idiom: Idiom<usize> = Idiom::new("offset", r"x", |_, offset| Some(offset)).unwrap();
        assert_eq!(idiom.scan("ax bx"), vec![1, 4]);
    }

    #[test]
    fn test_decoder_can_reject() {
        let idiom: Idiom<String> = Idiom::new("even", r"(?P<n>\d+)", |caps, _| {
            capture(caps, "n").filter(|n| n.parse::<u32>().is_ok_and(|v| v % 2 == 0))
        })
        .unwrap();
        assert_eq!(idiom.scan("1 2 3 4"), vec!["2", "4"]);
    }

    #[test]
    fn test_catalogue_concatenates_in_registration_order() {
        let catalogue = Catalogue::new()
            .with(word_idiom("second", r"b(?P<word>\d)"))
            .with(word_idiom("first", r"a(?P<word>\d)"));

        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue.names(), vec!["second", "first"]);
        assert_eq!(catalogue.scan("a1 b2 a3 b4"), vec!["2", "4", "1", "3"]);
    }

    #[test]
    fn test_catalogue_keeps_overlapping_matches() {
        let catalogue = Catalogue::new()
            .with(word_idiom("any", r"(?P<word>\w+)!"))
            .with(word_idiom("loud", r"(?P<word>[A-Z]+)!"));
        assert_eq!(catalogue.scan("HEY!"), vec!["HEY", "HEY"]);
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        let result: Result<Idiom<String>> = Idiom::new("broken", r"(\w+", |_, _| None);
        assert!(result.is_err());
    }
}
