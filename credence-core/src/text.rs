//! Text statistics used as authorship heuristics

use crate::NEUTRAL_SIGNAL;

/// Coefficient of variation at which burstiness saturates
const BURSTINESS_SATURATION_CV: f64 = 0.8;

/// Sentences needed before burstiness is measured
const MIN_SENTENCES: usize = 3;

/// Number of whitespace-delimited words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Word counts of period-delimited segments with more than two words
pub fn sentence_lengths(text: &str) -> Vec<usize> {
    text.split('.')
        .map(|segment| word_count(segment.trim()))
        .filter(|&words| words > 2)
        .collect()
}

/// Normalized sentence-length variation in [0, 1].
///
/// High values (varied sentence lengths) lean human; low values lean
/// machine-generated. Returns 0.5 with fewer than three sentences.
pub fn burstiness(text: &str) -> f64 {
    let lengths = sentence_lengths(text);
    if lengths.len() < MIN_SENTENCES {
        return NEUTRAL_SIGNAL;
    }

    let n = lengths.len() as f64;
    let mean = lengths.iter().map(|&l| l as f64).sum::<f64>() / n;
    if mean == 0.0 {
        return NEUTRAL_SIGNAL;
    }

    let variance = lengths
        .iter()
        .map(|&l| {
            let d = l as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    let cv = variance.sqrt() / mean;

    (cv / BURSTINESS_SATURATION_CV).min(1.0)
}

/// First `max_words` words joined by single spaces
pub fn truncate_words(text: &str, max_words: usize) -> String {
    text.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("  one two\nthree\tfour "), 4);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_sentence_lengths_skip_short_segments() {
        let text = "Hi. This one has five words. Ok. And this has four.";
        assert_eq!(sentence_lengths(text), vec![5, 4]);
    }

    #[test]
    fn test_burstiness_too_few_sentences() {
        assert_eq!(burstiness("Hi. Ok."), 0.5);
        assert_eq!(burstiness("One two three. Four five six."), 0.5);
        assert_eq!(burstiness(""), 0.5);
    }

    #[test]
    fn test_burstiness_uniform_sentences_is_zero() {
        let text = "The cat sat down. The dog ran off. The bird flew up.";
        assert_eq!(burstiness(text), 0.0);
    }

    #[test]
    fn test_burstiness_known_value() {
        // lengths 3, 6, 9: mean 6, population std sqrt(6), cv ~0.408
        let text = "one two three. one two three four five six. \
                    one two three four five six seven eight nine.";
        let expected = (6.0f64).sqrt() / 6.0 / 0.8;
        assert!((burstiness(text) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_burstiness_saturates() {
        let long = "word ".repeat(60);
        let text = format!("a b c. {long}. a b c. a b c.");
        assert_eq!(burstiness(&text), 1.0);
    }

    #[test]
    fn test_truncate_words() {
        assert_eq!(truncate_words("a  b\nc d", 3), "a b c");
        assert_eq!(truncate_words("a b", 10), "a b");
    }
}
