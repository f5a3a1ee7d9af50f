use std::collections::HashMap;
use std::path::Path;

use lindera::dictionary::{load_dictionary_from_kind, DictionaryKind};
use lindera::mode::Mode;
use lindera::segmenter::Segmenter;
use lindera::tokenizer::Tokenizer;
use serde::Serialize;

use crate::{Error, Result};

/// One analyzed word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub surface: String,
    pub base_form: String,
    /// Comma separated part-of-speech path, most general first (`名詞,一般`).
    pub part_of_speech: String,
}

impl Token {
    pub fn new(surface: &str, part_of_speech: &str, base_form: &str) -> Self {
        Self {
            surface: surface.into(),
            base_form: base_form.into(),
            part_of_speech: part_of_speech.into(),
        }
    }

    /// Top-level grammatical category, the first field of the part-of-speech path.
    pub fn category(&self) -> &str {
        self.part_of_speech
            .split(',')
            .next()
            .unwrap_or(&self.part_of_speech)
    }
}

/// Splits text into tokens. Must be deterministic for a given input.
pub trait Analyzer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>>;
}

/// Base forms of the tokens whose top-level category is in `categories`, in text order.
/// An empty category set keeps nothing.
pub fn filter_categories<A, S>(
    analyzer: &A,
    corpus: &str,
    categories: &[S],
) -> Result<Vec<String>>
where
    A: Analyzer + ?Sized,
    S: AsRef<str>,
{
    if categories.is_empty() {
        return Ok(Vec::new());
    }
    Ok(analyzer
        .tokenize(corpus)?
        .into_iter()
        .filter(|t| categories.iter().any(|c| c.as_ref() == t.category()))
        .map(|t| t.base_form)
        .collect())
}

/// IPADIC field holding the base form; earlier fields are the part-of-speech path.
const IPADIC_BASE_FORM: usize = 6;
const IPADIC_POS_FIELDS: usize = 4;

/// Analyzer backed by lindera and its embedded IPADIC dictionary.
pub struct IpadicAnalyzer {
    tokenizer: Tokenizer,
}

impl IpadicAnalyzer {
    pub fn new() -> Result<Self> {
        let dictionary = load_dictionary_from_kind(DictionaryKind::IPADIC)
            .map_err(|e| Error::Analyzer(e.to_string()))?;
        let segmenter = Segmenter::new(Mode::Normal, dictionary, None);
        Ok(Self {
            tokenizer: Tokenizer::from_segmenter(segmenter),
        })
    }
}

impl Analyzer for IpadicAnalyzer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        let mut tokens = self
            .tokenizer
            .tokenize(text)
            .map_err(|e| Error::Analyzer(e.to_string()))?;

        Ok(tokens
            .iter_mut()
            .filter_map(|token| {
                let surface = token.text.to_string();
                let details = token.details();
                // Unknown words come back as a single "UNK" field.
                let part_of_speech = match details.first() {
                    Some(&"UNK") | None => UNKNOWN_WORD_POS.to_string(),
                    Some(_) => details
                        .iter()
                        .take(IPADIC_POS_FIELDS)
                        .copied()
                        .collect::<Vec<_>>()
                        .join(","),
                };
                let base_form = details
                    .get(IPADIC_BASE_FORM)
                    .filter(|b| **b != "*")
                    .map(|b| b.to_string())
                    .unwrap_or_else(|| surface.clone());
                (!surface.trim().is_empty())
                    .then(|| Token::new(&surface, &part_of_speech, &base_form))
            })
            .collect())
    }
}

pub const UNKNOWN_WORD_POS: &str = "名詞,一般";
pub const UNKNOWN_KANA_POS: &str = "その他";
pub const SYMBOL_POS: &str = "記号,一般";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Space,
    Hiragana,
    Katakana,
    Kanji,
    Alnum,
    Symbol,
}

fn script_of(c: char) -> Script {
    match c {
        c if c.is_whitespace() => Script::Space,
        '\u{3041}'..='\u{309F}' => Script::Hiragana,
        '\u{30A0}'..='\u{30FF}' | '\u{31F0}'..='\u{31FF}' | '\u{FF66}'..='\u{FF9F}' => {
            Script::Katakana
        }
        '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}' | '々' | '〆' => Script::Kanji,
        c if c.is_alphanumeric() => Script::Alnum,
        _ => Script::Symbol,
    }
}

#[derive(Debug, Clone)]
struct Entry {
    part_of_speech: String,
    base_form: String,
}

/// Lightweight analyzer over a hand-made lexicon: greedy longest match, with
/// script runs standing in for words the lexicon doesn't know.
#[derive(Debug, Clone, Default)]
pub struct LexiconAnalyzer {
    entries: HashMap<String, Entry>,
    longest: usize,
}

impl LexiconAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, surface: &str, part_of_speech: &str, base_form: &str) {
        self.longest = self.longest.max(surface.chars().count());
        self.entries.insert(
            surface.to_string(),
            Entry {
                part_of_speech: part_of_speech.to_string(),
                base_form: base_form.to_string(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reads `surface<TAB>part-of-speech<TAB>base form` lines. Blank lines and lines
    /// starting with `#` are skipped; an empty base form means the surface itself.
    pub fn from_tsv(src: &str) -> Result<Self> {
        let mut lexicon = Self::new();
        for (idx, line) in src.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t');
            let (Some(surface), Some(pos)) = (fields.next(), fields.next()) else {
                return Err(Error::Lexicon {
                    line: idx + 1,
                    reason: "expected at least surface and part of speech".into(),
                });
            };
            if surface.is_empty() || pos.is_empty() {
                return Err(Error::Lexicon {
                    line: idx + 1,
                    reason: "empty surface or part of speech".into(),
                });
            }
            let base = fields.next().filter(|b| !b.is_empty()).unwrap_or(surface);
            lexicon.insert(surface, pos, base);
        }
        Ok(lexicon)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_tsv(&std::fs::read_to_string(path)?)
    }

    fn longest_match(&self, chars: &[char]) -> Option<(usize, &Entry)> {
        let max = self.longest.min(chars.len());
        (1..=max).rev().find_map(|len| {
            let candidate: String = chars[..len].iter().collect();
            self.entries.get(&candidate).map(|e| (len, e))
        })
    }
}

impl Analyzer for LexiconAnalyzer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        let chars: Vec<char> = text.chars().collect();
        let mut tokens = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            if let Some((len, entry)) = self.longest_match(&chars[i..]) {
                let surface: String = chars[i..i + len].iter().collect();
                tokens.push(Token::new(&surface, &entry.part_of_speech, &entry.base_form));
                i += len;
                continue;
            }

            let script = script_of(chars[i]);
            let mut end = i + 1;
            // Unknown runs stop where the script changes or a known word starts.
            if script != Script::Symbol {
                while end < chars.len()
                    && script_of(chars[end]) == script
                    && self.longest_match(&chars[end..]).is_none()
                {
                    end += 1;
                }
            }
            let surface: String = chars[i..end].iter().collect();
            i = end;

            let pos = match script {
                Script::Space => continue,
                Script::Symbol => SYMBOL_POS,
                Script::Hiragana => UNKNOWN_KANA_POS,
                Script::Katakana | Script::Kanji | Script::Alnum => UNKNOWN_WORD_POS,
            };
            tokens.push(Token::new(&surface, pos, &surface));
        }
        Ok(tokens)
    }
}
