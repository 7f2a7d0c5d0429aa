use std::collections::HashSet;
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer};

use crate::engine::Tokenize;
use crate::{Error, Result};

/// NLTK's English stopword list.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

// WordNet noun detachment rules, applied in this order.
const NOUN_SUFFIX_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("children", "child"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("lice", "louse"),
    ("mice", "mouse"),
    ("oxen", "ox"),
    ("teeth", "tooth"),
];

/// Noun lemmatizer that only maps onto forms present in its lexicon.
#[derive(Debug, Clone, Default)]
pub struct Lemmatizer {
    lexicon: HashSet<String>,
}

impl Lemmatizer {
    pub fn new(lexicon: impl IntoIterator<Item = String>) -> Self {
        Self {
            lexicon: lexicon.into_iter().collect(),
        }
    }

    /// Returns the shortest lexicon form among the word itself and its
    /// detached candidates, or the word unchanged when none is known.
    pub fn lemmatize(&self, word: &str) -> String {
        let mut candidates: Vec<String> = vec![word.to_string()];

        if let Some((_, lemma)) = IRREGULAR_NOUNS.iter().find(|(plural, _)| *plural == word) {
            candidates.push(lemma.to_string());
        } else {
            candidates.extend(NOUN_SUFFIX_RULES.iter().filter_map(|(suffix, replacement)| {
                word.strip_suffix(suffix)
                    .filter(|stem| !stem.is_empty())
                    .map(|stem| format!("{stem}{replacement}"))
            }));
        }

        candidates
            .into_iter()
            .filter(|candidate| self.lexicon.contains(candidate))
            .min_by_key(|candidate| candidate.len())
            .unwrap_or_else(|| word.to_string())
    }
}

/// Word tokenizer with stopword removal and noun lemmatization.
///
/// Expects lowercased input; the encoder lowercases before calling it.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    pre_tokenizer: BertPreTokenizer,
    stopwords: HashSet<&'static str>,
    lemmatizer: Lemmatizer,
}

impl TextNormalizer {
    pub fn new(stopwords: &[&'static str], lemmatizer: Lemmatizer) -> Self {
        Self {
            pre_tokenizer: BertPreTokenizer,
            stopwords: stopwords.iter().copied().collect(),
            lemmatizer,
        }
    }

    pub fn english(lexicon: impl IntoIterator<Item = String>) -> Self {
        Self::new(ENGLISH_STOPWORDS, Lemmatizer::new(lexicon))
    }

    fn split_words(&self, text: &str) -> Result<Vec<String>> {
        let mut pretokenized = PreTokenizedString::from(text);
        self.pre_tokenizer
            .pre_tokenize(&mut pretokenized)
            .map_err(|e| Error::Tokenization(e.to_string()))?;

        Ok(pretokenized
            .get_splits(OffsetReferential::Original, OffsetType::Byte)
            .into_iter()
            .map(|(word, _, _)| word.to_string())
            .collect())
    }
}

impl Tokenize for TextNormalizer {
    fn tokenize(&self, text: &str) -> Result<Vec<String>> {
        Ok(self
            .split_words(text)?
            .into_iter()
            .filter(|token| !self.stopwords.contains(token.as_str()))
            .map(|token| self.lemmatizer.lemmatize(&token))
            .collect())
    }
}
