use std::collections::HashMap;

/// The fixed stop-word set filtered out of every token stream.
const STOPWORDS: &[&str] = &[
    "the", "and", "of", "in", "to", "a", "for", "on", "is", "with", "as",
    "by", "an", "at",
];

/// Default number of ranked words returned when the caller gives no limit.
pub const DEFAULT_TOP_WORDS: usize = 50;

/// Split raw text into normalized tokens.
///
/// Strips every character that is neither a word character (alphanumeric or
/// `_`) nor whitespace, lower-cases, splits on whitespace, then drops
/// stop-words and tokens shorter than 3 characters. Output order matches
/// document order.
pub fn tokenize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|w| w.chars().count() > 2 && !STOPWORDS.contains(&w.as_str()))
        .collect()
}

/// Count token occurrences and return the top `k` as (token, count) pairs.
///
/// Ordered by descending count; equal counts preserve first-seen order.
pub fn rank(tokens: &[String], k: usize) -> Vec<(String, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for token in tokens {
        let entry = counts.entry(token.as_str()).or_insert(0);
        if *entry == 0 {
            order.push(token.as_str());
        }
        *entry += 1;
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|t| (t.to_string(), counts[t]))
        .collect();
    // Stable sort keeps first-seen order among equal counts.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation() {
        let tokens = tokenize("water, water; contamination!");
        assert_eq!(tokens, vec!["water", "water", "contamination"]);
    }

    #[test]
    fn drops_stopwords_and_short_tokens() {
        let tokens = tokenize("the gas is in an old well at kronos ok");
        assert_eq!(tokens, vec!["gas", "old", "well", "kronos"]);
    }

    #[test]
    fn lowercases_tokens() {
        let tokens = tokenize("Kronos KRONOS Water");
        assert_eq!(tokens, vec!["kronos", "kronos", "water"]);
    }

    #[test]
    fn empty_input_ranks_empty() {
        assert!(rank(&[], 50).is_empty());
    }

    #[test]
    fn ranking_counts_and_orders() {
        // Three documents of "Kronos Kronos water" concatenated.
        let text = "Kronos Kronos water Kronos Kronos water Kronos Kronos water";
        let ranked = rank(&tokenize(text), 50);
        assert_eq!(
            ranked,
            vec![("kronos".to_string(), 6), ("water".to_string(), 3)]
        );
    }

    #[test]
    fn ties_preserve_first_seen_order() {
        let tokens = tokenize("delta alpha delta alpha gamma gamma");
        let ranked = rank(&tokens, 50);
        assert_eq!(
            ranked,
            vec![
                ("delta".to_string(), 2),
                ("alpha".to_string(), 2),
                ("gamma".to_string(), 2),
            ]
        );
    }

    #[test]
    fn truncates_to_k() {
        let tokens = tokenize("one1 two2 three3 four4");
        let ranked = rank(&tokens, 2);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn underscores_survive_cleaning() {
        let tokens = tokenize("field_notes attached");
        assert_eq!(tokens, vec!["field_notes", "attached"]);
    }
}
