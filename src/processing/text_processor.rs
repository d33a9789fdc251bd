//! Tokenization and n-gram generation for the similarity detector

use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
    max_ngram: usize,
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new(2)
    }
}

impl TextProcessor {
    pub fn new(max_ngram: usize) -> Self {
        Self {
            stop_words: ENGLISH_STOP_WORDS.iter().copied().collect(),
            max_ngram: max_ngram.max(1),
        }
    }

    /// Lowercased words of two or more characters, stop words removed
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .map(|word| word.to_lowercase())
            .filter(|word| word.chars().count() > 1)
            .filter(|word| !self.stop_words.contains(word.as_str()))
            .collect()
    }

    /// Unigrams through `max_ngram`-grams over the stop-word-filtered tokens
    pub fn terms(&self, text: &str) -> Vec<String> {
        let tokens = self.tokenize(text);
        let mut terms = tokens.clone();

        for n in 2..=self.max_ngram {
            terms.extend(tokens.windows(n).map(|window| window.join(" ")));
        }

        terms
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

/// Common English stop words
const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "done",
    "down", "due", "during", "each", "eg", "either", "else", "elsewhere", "enough", "etc", "even",
    "ever", "every", "everyone", "everything", "everywhere", "except", "few", "for", "former",
    "formerly", "from", "further", "had", "has", "have", "having", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hers", "herself", "him", "himself", "his", "how", "however",
    "i", "ie", "if", "in", "indeed", "into", "is", "it", "its", "itself", "just", "last", "latter",
    "least", "less", "many", "may", "me", "meanwhile", "might", "mine", "more", "moreover", "most",
    "mostly", "much", "must", "my", "myself", "namely", "neither", "never", "nevertheless", "next",
    "no", "nobody", "none", "nor", "not", "nothing", "now", "nowhere", "of", "off", "often", "on",
    "once", "one", "only", "onto", "or", "other", "others", "otherwise", "our", "ours", "ourselves",
    "out", "over", "own", "per", "perhaps", "please", "rather", "re", "same", "seem", "seemed",
    "seeming", "seems", "several", "she", "should", "since", "so", "some", "somehow", "someone",
    "something", "sometime", "sometimes", "somewhere", "still", "such", "than", "that", "the",
    "their", "theirs", "them", "themselves", "then", "thence", "there", "thereafter", "thereby",
    "therefore", "therein", "thereupon", "these", "they", "this", "those", "though", "through",
    "throughout", "thru", "thus", "to", "together", "too", "toward", "towards", "under", "until",
    "up", "upon", "us", "very", "via", "was", "we", "well", "were", "what", "whatever", "when",
    "whence", "whenever", "where", "whereafter", "whereas", "whereby", "wherein", "whereupon",
    "wherever", "whether", "which", "while", "whither", "who", "whoever", "whole", "whom", "whose",
    "why", "will", "with", "within", "without", "would", "yet", "you", "your", "yours", "yourself",
    "yourselves",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenization() {
        let processor = TextProcessor::default();
        let tokens = processor.tokenize("Rust programming language is awesome! A B");

        assert_eq!(tokens, vec!["rust", "programming", "language", "awesome"]);
        assert!(processor.is_stop_word("is"));
    }

    #[test]
    fn test_bigrams_skip_stop_words() {
        let processor = TextProcessor::new(2);
        let terms = processor.terms("Built the data pipeline");

        assert_eq!(
            terms,
            vec!["built", "data", "pipeline", "built data", "data pipeline"]
        );
    }

    #[test]
    fn test_unigrams_only() {
        let processor = TextProcessor::new(1);
        assert_eq!(processor.terms("data pipeline"), vec!["data", "pipeline"]);
    }

    #[test]
    fn test_only_stop_words() {
        let processor = TextProcessor::default();
        assert!(processor.terms("the and of it").is_empty());
    }
}
