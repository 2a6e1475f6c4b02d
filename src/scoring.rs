//! Deterministic relevance scoring.
//!
//! The score starts from [`BASE_SCORE`] and adds bonuses for tag density,
//! recency, domain keywords, citations and abstract substance, then clamps
//! to [`MIN_RELEVANCE`]..=[`MAX_RELEVANCE`].

use chrono::NaiveDate;

use crate::paper::{MAX_RELEVANCE, MIN_RELEVANCE};
use crate::query::parse_paper_date;

/// Starting score before any bonus.
pub const BASE_SCORE: i64 = 65;

const TAG_BONUS: i64 = 4;
const MAX_CITATION_BONUS: i64 = 15;
const SUBSTANTIVE_ABSTRACT_CHARS: usize = 500;
const PLACEHOLDER_ABSTRACT_CHARS: usize = 50;

/// Domain keywords: `+5` on a title match, `+2` on an abstract-only match.
pub const HIGH_VALUE_KEYWORDS: &[&str] = &[
    "momentum",
    "alpha",
    "arbitrage",
    "neural network",
    "transformer",
    "liquidity",
    "high frequency",
    "microstructure",
    "portfolio optimization",
    "asset pricing",
    "volatility",
    "predicting",
    "forecasting",
];

/// Topical-currency keywords: `+10` on a title match, `+5` on an abstract-only match.
pub const VIRAL_KEYWORDS: &[&str] = &[
    "large language model",
    "llm",
    "generative ai",
    "chatgpt",
    "deep learning",
    "reinforcement learning",
    "crash risk",
    "climate risk",
];

/// Inputs to [`relevance_score`].
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub title: &'a str,
    pub abstract_text: &'a str,
    /// Paper date string; unparsable dates earn no recency bonus.
    pub date: &'a str,
    pub tag_count: usize,
    pub citation_count: Option<u32>,
}

/// Computes the bounded relevance score relative to `today`.
///
/// Pure: identical inputs always produce the same score.
#[must_use]
pub fn relevance_score(input: &ScoreInput<'_>, today: NaiveDate) -> u8 {
    let title = input.title.to_lowercase();
    let text = format!("{title} {}", input.abstract_text.to_lowercase());

    let mut score = BASE_SCORE;
    score += i64::try_from(input.tag_count)
        .unwrap_or(i64::MAX / TAG_BONUS)
        .saturating_mul(TAG_BONUS);
    score += recency_bonus(input.date, today);
    score += keyword_bonus(&title, &text, HIGH_VALUE_KEYWORDS, 5, 2);
    score += keyword_bonus(&title, &text, VIRAL_KEYWORDS, 10, 5);
    score += citation_bonus(input.citation_count);
    score += abstract_bonus(input.abstract_text);

    let clamped = score.clamp(i64::from(MIN_RELEVANCE), i64::from(MAX_RELEVANCE));
    u8::try_from(clamped).unwrap_or(MIN_RELEVANCE)
}

fn recency_bonus(date: &str, today: NaiveDate) -> i64 {
    let Some(published) = parse_paper_date(date) else {
        return 0;
    };
    let age_days = (today - published).num_days();
    match age_days {
        d if d < 7 => 15,
        d if d < 30 => 10,
        d if d < 90 => 5,
        d if d > 365 => -5,
        _ => 0,
    }
}

fn keyword_bonus(title: &str, text: &str, keywords: &[&str], in_title: i64, in_text: i64) -> i64 {
    keywords
        .iter()
        .map(|keyword| {
            if title.contains(keyword) {
                in_title
            } else if text.contains(keyword) {
                in_text
            } else {
                0
            }
        })
        .sum()
}

fn citation_bonus(citations: Option<u32>) -> i64 {
    citations.map_or(0, |count| (i64::from(count) * 2).min(MAX_CITATION_BONUS))
}

fn abstract_bonus(abstract_text: &str) -> i64 {
    let length = abstract_text.chars().count();
    if length > SUBSTANTIVE_ABSTRACT_CHARS {
        3
    } else if length < PLACEHOLDER_ABSTRACT_CHARS {
        -10
    } else {
        0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
    }

    const NEUTRAL_ABSTRACT: &str =
        "This paper describes an empirical study of sparrows in an urban park setting.";

    fn input<'a>(title: &'a str, abstract_text: &'a str, date: &'a str) -> ScoreInput<'a> {
        ScoreInput {
            title,
            abstract_text,
            date,
            tag_count: 0,
            citation_count: None,
        }
    }

    #[test]
    fn test_neutral_paper_scores_base() {
        let score = relevance_score(&input("Sparrows", NEUTRAL_ABSTRACT, "2024-01-01"), today());
        assert_eq!(i64::from(score), BASE_SCORE);
    }

    #[test]
    fn test_recency_tiers() {
        let score = |date| relevance_score(&input("Sparrows", NEUTRAL_ABSTRACT, date), today());
        assert_eq!(score("2024-06-12"), 80);
        assert_eq!(score("2024-06-01"), 75);
        assert_eq!(score("2024-01-01"), 65);
        assert_eq!(score("2024-05-01"), 70);
        assert_eq!(score("2023-01-01"), 60);
    }

    #[test]
    fn test_unparsable_date_contributes_nothing() {
        let score = relevance_score(&input("Sparrows", NEUTRAL_ABSTRACT, "sometime"), today());
        assert_eq!(score, 65);
    }

    #[test]
    fn test_tag_bonus_per_tag() {
        let mut scored = input("Sparrows", NEUTRAL_ABSTRACT, "2024-01-01");
        scored.tag_count = 3;
        assert_eq!(relevance_score(&scored, today()), 77);
    }

    #[test]
    fn test_title_keyword_beats_abstract_keyword() {
        let title_hit = relevance_score(
            &input("Momentum sparrows", NEUTRAL_ABSTRACT, "2024-01-01"),
            today(),
        );
        let abstract_hit = relevance_score(
            &input(
                "Sparrows",
                "This paper describes the momentum of sparrows in an urban park setting.",
                "2024-01-01",
            ),
            today(),
        );
        assert_eq!(title_hit, 70);
        assert_eq!(abstract_hit, 67);
    }

    #[test]
    fn test_viral_keyword_bonus() {
        let score = relevance_score(
            &input("LLM sparrows", NEUTRAL_ABSTRACT, "2024-01-01"),
            today(),
        );
        assert_eq!(score, 75);
    }

    #[test]
    fn test_citation_bonus_is_capped() {
        let mut scored = input("Sparrows", NEUTRAL_ABSTRACT, "2024-01-01");
        scored.citation_count = Some(3);
        assert_eq!(relevance_score(&scored, today()), 71);
        scored.citation_count = Some(10_000);
        assert_eq!(relevance_score(&scored, today()), 80);
    }

    #[test]
    fn test_short_abstract_penalty_and_long_abstract_bonus() {
        let short = relevance_score(&input("Sparrows", "n/a", "2024-05-01"), today());
        assert_eq!(short, 60);

        let long_abstract = "sparrow ".repeat(80);
        let long = relevance_score(&input("Sparrows", &long_abstract, "2024-01-01"), today());
        assert_eq!(long, 68);
    }

    #[test]
    fn test_score_is_clamped_high() {
        let mut scored = input(
            "Deep learning LLM momentum alpha arbitrage transformer volatility forecasting",
            NEUTRAL_ABSTRACT,
            "2024-06-14",
        );
        scored.tag_count = 10;
        scored.citation_count = Some(100);
        assert_eq!(relevance_score(&scored, today()), 99);
    }

    #[test]
    fn test_score_is_clamped_low() {
        let score = relevance_score(&input("", "", "1990-01-01"), today());
        assert_eq!(score, 60);
    }

    #[test]
    fn test_future_dated_paper_gets_fresh_bonus() {
        let score = relevance_score(&input("Sparrows", NEUTRAL_ABSTRACT, "2024-06-20"), today());
        assert_eq!(score, 80);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let scored = input("Momentum in crypto", NEUTRAL_ABSTRACT, "2024-06-01");
        assert_eq!(
            relevance_score(&scored, today()),
            relevance_score(&scored, today())
        );
    }
}
