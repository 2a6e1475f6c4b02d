//! Static topic -> keyword-phrase table.

use super::Topic;

/// Returns the curated keyword phrases for a topic.
///
/// [`Topic::All`] maps to an empty list, meaning no topical narrowing.
#[must_use]
pub fn topic_keywords(topic: Topic) -> &'static [&'static str] {
    match topic {
        Topic::All => &[],
        Topic::QuantFinance => &[
            "quantitative finance",
            "empirical asset pricing",
            "asset pricing",
            "factor investing",
        ],
        Topic::Momentum => &["momentum strategy", "price momentum", "trend following"],
        Topic::Crypto => &[
            "cryptocurrency",
            "bitcoin",
            "ethereum",
            "defi",
            "blockchain finance",
        ],
        Topic::MachineLearning => &[
            "machine learning finance",
            "neural network finance",
            "deep learning asset pricing",
            "financial nlp",
            "large language model finance",
        ],
        Topic::HighFrequencyTrading => &[
            "high frequency trading",
            "market microstructure",
            "limit order book",
            "liquidity provision",
        ],
        Topic::Risk => &[
            "risk management",
            "value at risk",
            "portfolio optimization",
            "tail risk",
        ],
        Topic::FixedIncome => &[
            "fixed income",
            "yield curve",
            "corporate bond",
            "sovereign debt",
            "treasury",
        ],
        Topic::InternationalTax => &[
            "international taxation",
            "beps",
            "corporate tax avoidance",
            "global tax",
        ],
        Topic::TransferPricing => &["transfer pricing", "profit shifting", "multinational tax"],
        Topic::ValueChain => &["global value chain", "supply chain finance"],
        Topic::Transformation => &[
            "digital transformation finance",
            "fintech innovation",
            "financial automation",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_topic_has_no_phrases() {
        assert!(topic_keywords(Topic::All).is_empty());
    }

    #[test]
    fn test_every_other_topic_has_lowercase_phrases() {
        for topic in Topic::ALL.into_iter().filter(|t| *t != Topic::All) {
            let phrases = topic_keywords(topic);
            assert!(!phrases.is_empty(), "{topic} should have phrases");
            for phrase in phrases {
                assert_eq!(*phrase, phrase.to_lowercase());
            }
        }
    }
}
