//! Text correction
//!
//! Recognized text is cleaned up in three stages:
//!
//! 1. **Look-alikes** - in tokens made mostly of digits, `O`/`o` become `0`
//!    and `l`/`I` become `1`; in tokens made mostly of letters, `0` becomes
//!    `o` or `O` following the token's case
//! 2. **Dictionary** (optional) - alphabetic words are replaced by the
//!    closest dictionary entry by edit distance
//! 3. **Sentence case** - the first letter of the text, of every line and
//!    of every sentence is capitalized

use std::collections::HashMap;

use crate::error::{RecogError, RecogResult};

const BUNDLED_DICTIONARY: &str = include_str!("../../../assets/dictionary.txt");

/// Word list for dictionary correction
///
/// Lookups ignore case. Entries keep the spelling they were given, which is
/// the form a corrected word takes unless the input was all capitals.
#[derive(Debug, Clone, Default)]
pub struct Dictionary {
    words: Vec<String>,
    lowercase: Vec<String>,
    index: HashMap<String, usize>,
}

impl Dictionary {
    /// Build a dictionary from words; duplicates are ignored
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dictionary = Self::default();
        for word in words {
            let word = word.as_ref().trim();
            if word.is_empty() {
                continue;
            }
            let lower = word.to_lowercase();
            if dictionary.index.contains_key(&lower) {
                continue;
            }
            dictionary
                .index
                .insert(lower.clone(), dictionary.words.len());
            dictionary.words.push(word.to_string());
            dictionary.lowercase.push(lower);
        }
        dictionary
    }

    /// Parse a word list: one word per line, `#` starts a comment
    pub fn parse(text: &str) -> Self {
        Self::from_words(
            text.lines()
                .map(|line| line.split('#').next().unwrap_or_default()),
        )
    }

    /// Read a word list file
    ///
    /// # Errors
    ///
    /// Returns [`RecogError::AssetRead`] if the file cannot be read.
    pub fn load(path: &str) -> RecogResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| RecogError::AssetRead {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::parse(&text))
    }

    /// The word list compiled into the library
    pub fn bundled() -> Self {
        Self::parse(BUNDLED_DICTIONARY)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Check if a word is present, ignoring case
    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(&word.to_lowercase())
    }

    /// Entry spelling for a word, ignoring case
    pub fn lookup(&self, word: &str) -> Option<&str> {
        self.index
            .get(&word.to_lowercase())
            .map(|&i| self.words[i].as_str())
    }

    /// Closest entry by edit distance, with the distance
    ///
    /// Ties go to the entry whose length is closest to the word's, then to
    /// the earlier entry.
    pub fn closest(&self, word: &str) -> Option<(&str, usize)> {
        let lower = word.to_lowercase();
        let len = lower.chars().count();
        let mut best: Option<(usize, usize, usize)> = None;
        for (i, entry) in self.lowercase.iter().enumerate() {
            let entry_len = entry.chars().count();
            let len_diff = len.abs_diff(entry_len);
            if best.is_some_and(|(d, _, _)| len_diff > d) {
                continue;
            }
            let d = levenshtein(&lower, entry);
            if best.is_none_or(|(bd, bl, _)| (d, len_diff) < (bd, bl)) {
                best = Some((d, len_diff, i));
            }
        }
        best.map(|(d, _, i)| (self.words[i].as_str(), d))
    }
}

/// Edit distance with unit insert, delete and substitute costs
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let substitute = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitute.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }
    previous[b.len()]
}

/// Split a text into alternating whitespace and non-whitespace pieces
fn pieces(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;
    for (i, c) in text.char_indices() {
        let space = c.is_whitespace();
        if in_space.is_some_and(|s| s != space) {
            out.push(&text[start..i]);
            start = i;
        }
        in_space = Some(space);
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

/// Apply `f` to every non-whitespace token, keeping the whitespace
fn map_tokens<F>(text: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    pieces(text)
        .into_iter()
        .map(|p| {
            if p.starts_with(char::is_whitespace) {
                p.to_string()
            } else {
                f(p)
            }
        })
        .collect()
}

/// Replace look-alike characters according to the token's majority class
pub fn fix_look_alikes(token: &str) -> String {
    let digits = token.chars().filter(char::is_ascii_digit).count();
    let letters = token.chars().filter(|c| c.is_alphabetic()).count();

    if digits > letters {
        token
            .chars()
            .map(|c| match c {
                'O' | 'o' => '0',
                'l' | 'I' => '1',
                other => other,
            })
            .collect()
    } else if letters > digits {
        let upper = token.chars().filter(|c| c.is_uppercase()).count();
        let lower = token.chars().filter(|c| c.is_lowercase()).count();
        let o = if upper > lower { 'O' } else { 'o' };
        token
            .chars()
            .map(|c| if c == '0' { o } else { c })
            .collect()
    } else {
        token.to_string()
    }
}

/// Correct one token against the dictionary
///
/// Leading and trailing punctuation is kept around the corrected core.
/// Only alphabetic cores of at least two characters are considered, and a
/// replacement must be within half the core's length in edits. A word
/// ending in `s` may also match through its singular stem.
pub fn correct_word(token: &str, dictionary: &Dictionary) -> String {
    let Some(start) = token.find(char::is_alphanumeric) else {
        return token.to_string();
    };
    let end = token
        .char_indices()
        .filter(|(_, c)| c.is_alphanumeric())
        .map(|(i, c)| i + c.len_utf8())
        .last()
        .unwrap_or(token.len());
    let (prefix, core, suffix) = (&token[..start], &token[start..end], &token[end..]);

    let len = core.chars().count();
    if len < 2 || !core.chars().all(char::is_alphabetic) {
        return token.to_string();
    }

    let replacement = match dictionary.lookup(core) {
        Some(entry) => Some(entry.to_string()),
        None => closest_with_plural(core, dictionary),
    };
    let Some(replacement) = replacement else {
        return token.to_string();
    };

    let all_caps = core.chars().all(char::is_uppercase);
    let cased = if all_caps {
        replacement.to_uppercase()
    } else {
        replacement
    };
    format!("{}{}{}", prefix, cased, suffix)
}

fn closest_with_plural(core: &str, dictionary: &Dictionary) -> Option<String> {
    let len = core.chars().count();
    let whole = dictionary
        .closest(core)
        .filter(|&(_, d)| d <= len / 2)
        .map(|(entry, d)| (entry.to_string(), d));

    let stem = core
        .strip_suffix(['s', 'S'])
        .filter(|stem| stem.chars().count() >= 2)
        .and_then(|stem| {
            let stem_len = stem.chars().count();
            match dictionary.lookup(stem) {
                Some(entry) => Some((entry, 0)),
                None => dictionary.closest(stem).filter(|&(_, d)| d <= stem_len / 2),
            }
        })
        .map(|(entry, d)| (format!("{}s", entry), d));

    match (whole, stem) {
        (Some(w), Some(s)) if s.1 < w.1 => Some(s.0),
        (Some(w), _) => Some(w.0),
        (None, s) => s.map(|s| s.0),
    }
}

/// Capitalize the first letter of the text, of each line and of each
/// sentence
pub fn capitalize_sentences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut capitalize = true;
    let mut sentence_end = false;
    for c in text.chars() {
        if c == '\n' {
            capitalize = true;
            sentence_end = false;
            out.push(c);
            continue;
        }
        if c.is_whitespace() {
            if sentence_end {
                capitalize = true;
            }
            out.push(c);
            continue;
        }
        if matches!(c, '.' | '!' | '?') {
            sentence_end = true;
        } else if !matches!(c, '"' | '\'' | ')') {
            sentence_end = false;
        }
        if c.is_alphabetic() && capitalize {
            out.extend(c.to_uppercase());
            capitalize = false;
        } else {
            if c.is_alphanumeric() {
                capitalize = false;
            }
            out.push(c);
        }
    }
    out
}

/// Run the correction stages over recognized text
///
/// # Arguments
///
/// * `text` - Recognized text, lines separated by `'\n'`
/// * `dictionary` - Word list for dictionary correction, `None` to skip it
pub fn apply_correction(text: &str, dictionary: Option<&Dictionary>) -> String {
    let mut corrected = map_tokens(text, fix_look_alikes);
    if let Some(dictionary) = dictionary {
        corrected = map_tokens(&corrected, |t| correct_word(t, dictionary));
    }
    capitalize_sentences(&corrected)
}
