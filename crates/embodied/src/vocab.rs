//! # Vocabulary
//!
//! Maps the words of the teacher's sentences to tokens and back.

use std::collections::{BTreeSet, HashMap};

use crate::error::EnvError;

/// Word list shared by the teacher and the language channel.
///
/// Token `0` is padding and never decodes to a word.
#[derive(Clone, Debug, PartialEq)]
pub struct Vocabulary {
    words: Vec<String>,
    index: HashMap<String, u32>,
}

impl Vocabulary {
    /// Build from sentences or single words; duplicates collapse.
    pub fn new<'a>(sentences: impl IntoIterator<Item = &'a str>) -> Self {
        let unique: BTreeSet<&str> = sentences
            .into_iter()
            .flat_map(str::split_whitespace)
            .collect();
        let words: Vec<String> = std::iter::once(String::new())
            .chain(unique.into_iter().map(str::to_owned))
            .collect();
        let index = words
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, w)| (w.clone(), i as u32))
            .collect();
        Self { words, index }
    }

    /// Number of tokens including padding.
    pub(crate) fn len(&self) -> usize {
        self.words.len()
    }

    /// Encode `sentence` into exactly `max_len` tokens, padding with zeros.
    ///
    /// # Errors
    ///
    /// Fails on words outside the vocabulary or sentences longer than `max_len`.
    pub fn sentence_to_sequence(&self, sentence: &str, max_len: usize) -> Result<Vec<u32>, EnvError> {
        let mut seq = sentence
            .split_whitespace()
            .map(|w| {
                self.index
                    .get(w)
                    .copied()
                    .ok_or_else(|| EnvError::UnknownWord(w.to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if seq.len() > max_len {
            return Err(EnvError::SentenceTooLong {
                words: seq.len(),
                max: max_len,
            });
        }
        seq.resize(max_len, 0);
        Ok(seq)
    }

    /// Decode tokens into a space separated sentence, skipping padding.
    ///
    /// # Errors
    ///
    /// Returns [`EnvError::UnknownToken`] for ids outside the vocabulary.
    pub fn sequence_to_sentence(&self, seq: &[u32]) -> Result<String, EnvError> {
        let words = seq
            .iter()
            .filter(|&&t| t != 0)
            .map(|&t| {
                self.words
                    .get(t as usize)
                    .map(String::as_str)
                    .ok_or(EnvError::UnknownToken {
                        token: t,
                        vocab_size: self.words.len(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vocabulary {
        Vocabulary::new(["go to goal", "well done", "failed", "goal"])
    }

    #[test]
    fn padding_is_token_zero() {
        let v = vocab();
        assert_eq!(v.len(), 7);
        let seq = v.sentence_to_sequence("well done", 5).unwrap();
        assert_eq!(seq.len(), 5);
        assert!(seq[..2].iter().all(|&t| t != 0));
        assert_eq!(&seq[2..], &[0, 0, 0]);
    }

    #[test]
    fn decode_inverts_encode() {
        let v = vocab();
        let seq = v.sentence_to_sequence("go to goal", 8).unwrap();
        assert_eq!(v.sequence_to_sentence(&seq).unwrap(), "go to goal");
        assert_eq!(v.sequence_to_sentence(&[]).unwrap(), "");
    }

    #[test]
    fn rejects_unknown_words_and_tokens() {
        let v = vocab();
        assert!(matches!(
            v.sentence_to_sequence("hello", 4),
            Err(EnvError::UnknownWord(w)) if w == "hello"
        ));
        assert!(matches!(
            v.sequence_to_sentence(&[1, 99]),
            Err(EnvError::UnknownToken { token: 99, .. })
        ));
    }

    #[test]
    fn rejects_overlong_sentences() {
        let v = vocab();
        assert!(matches!(
            v.sentence_to_sequence("go to goal", 2),
            Err(EnvError::SentenceTooLong { words: 3, max: 2 })
        ));
    }
}
