use crate::api::TextScorer;

const POSITIVE_KEYWORDS: &[&str] = &[
    "beat", "surge", "record", "growth", "profit", "success", "breakthrough", "bullish",
    "rally", "gain", "soar", "exceed", "outperform", "strong", "positive", "upgrade",
    "approval", "dividend", "acquisition",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
    "miss", "drop", "fall", "decline", "loss", "fail", "crash", "bearish", "plunge",
    "layoff", "weak", "negative", "downgrade", "warning", "impairment", "restatement",
    "bankruptcy", "delisting", "investigation",
];

/// Endings accepted after a keyword stem ("beat" -> "beats", "plunge" -> "plunged")
const INFLECTIONS: &[&str] = &["", "s", "es", "d", "ed", "ing"];

/// Keyword-count polarity scorer for financial text
///
/// Keywords match whole words only, so "Commission" does not count as "miss".
#[derive(Debug, Clone, Default)]
pub struct LexiconScorer;

impl LexiconScorer {
    pub fn new() -> Self {
        Self
    }
}

impl TextScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> f64 {
        let text_lower = text.to_lowercase();
        let words: Vec<&str> = text_lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();

        let count = |keywords: &[&str]| -> i32 {
            words
                .iter()
                .filter(|word| keywords.iter().any(|k| matches_keyword(word, k)))
                .count() as i32
        };
        let positive = count(POSITIVE_KEYWORDS);
        let negative = count(NEGATIVE_KEYWORDS);

        let total = (positive + negative).max(1) as f64;
        ((positive - negative) as f64 / total).clamp(-1.0, 1.0)
    }
}

fn matches_keyword(word: &str, keyword: &str) -> bool {
    word.strip_prefix(keyword)
        .is_some_and(|rest| INFLECTIONS.contains(&rest))
}

/// Mean polarity of `texts`, 0.0 when there is nothing to score
pub fn average_polarity<S: TextScorer + ?Sized>(scorer: &S, texts: &[String]) -> f64 {
    if texts.is_empty() {
        return 0.0;
    }

    let sum: f64 = texts.iter().map(|text| scorer.polarity(text)).sum();
    sum / texts.len() as f64
}
