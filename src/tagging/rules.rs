//! Ordered tag trigger table.

/// One label and the substrings that trigger it.
///
/// A rule fires when any `triggers` substring is present, and (when
/// non-empty) any `requires_any` substring is also present, and no
/// `excluded_by` substring is present. Rules only look at the text, never at
/// labels added by other rules, so evaluation order cannot change the result.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TagRule {
    pub label: &'static str,
    pub triggers: &'static [&'static str],
    pub requires_any: &'static [&'static str],
    pub excluded_by: &'static [&'static str],
}

impl TagRule {
    const fn new(label: &'static str, triggers: &'static [&'static str]) -> Self {
        Self {
            label,
            triggers,
            requires_any: &[],
            excluded_by: &[],
        }
    }

    const fn requiring(mut self, requires_any: &'static [&'static str]) -> Self {
        self.requires_any = requires_any;
        self
    }

    const fn unless(mut self, excluded_by: &'static [&'static str]) -> Self {
        self.excluded_by = excluded_by;
        self
    }

    pub(crate) fn matches(&self, text: &str) -> bool {
        let any = |needles: &[&str]| needles.iter().any(|needle| text.contains(needle));
        any(self.triggers)
            && (self.requires_any.is_empty() || any(self.requires_any))
            && !any(self.excluded_by)
    }
}

const HFT_TRIGGERS: &[&str] = &[
    "high frequency",
    "hft",
    "microstructure",
    "order book",
    "limit order",
];

pub(crate) const TAG_RULES: &[TagRule] = &[
    // Asset classes and markets
    TagRule::new(
        "Crypto",
        &["crypto", "bitcoin", "ether", "blockchain", "defi"],
    ),
    TagRule::new("Equities", &["equity", "stock", "equities"]),
    TagRule::new(
        "Fixed Income",
        &["bond", "fixed income", "treasur", "yield curve"],
    ),
    TagRule::new(
        "Derivatives",
        &["option", "derivative", "volatility", "implied vol", "hedging"],
    ),
    TagRule::new("FX", &["fx", "currency", "exchange rate"]),
    TagRule::new("Commodities", &["commodit"]),
    TagRule::new("ETF", &["etf"]),
    // Strategies
    TagRule::new("Momentum", &["momentum", "trend"]),
    TagRule::new("Reversal", &["reversal", "mean reversion"]),
    TagRule::new("Arbitrage", &["arbitrage"]),
    TagRule::new("Value", &["value"]).requiring(&["growth", "investing"]),
    TagRule::new("Carry", &["carry"]),
    // Methodology
    TagRule::new(
        "ML/AI",
        &[
            "machine learning",
            "neural network",
            "deep learning",
            "reinforcement learning",
            "lstm",
            "transformer",
        ],
    ),
    TagRule::new(
        "NLP",
        &["nlp", "sentiment", "textual", "llm", "language model"],
    ),
    TagRule::new("HFT", HFT_TRIGGERS),
    TagRule::new("Stats", &["statistical", "econometric"]),
    // Core topics
    TagRule::new("Risk Mgmt", &["risk", "drawdown", "var", "shortfall"]),
    TagRule::new("Portfolio", &["portfolio", "allocation", "optimization"]),
    TagRule::new("Liquidity", &["liquidity"]).unless(HFT_TRIGGERS),
    TagRule::new(
        "Asset Pricing",
        &["factor", "alpha", "asset pricing", "beta"],
    ),
    TagRule::new("Macro", &["macro", "inflation", "monetary", "gdp"]),
    TagRule::new("ESG", &["esg", "sustainable", "climate"]),
    // Domain extensions
    TagRule::new("Tax", &["tax", "beps"]),
    TagRule::new("Transfer Pricing", &["transfer pricing"]),
    TagRule::new("Value Chain", &["supply chain", "value chain"]),
    TagRule::new("Labor", &["labor", "employment", "wage"]),
    TagRule::new(
        "Portfolio Mgmt",
        &["portfolio management", "portfolio manager", "wealth management"],
    ),
    TagRule::new(
        "Asset Allocation",
        &["asset allocation", "strategic allocation", "tactical allocation"],
    ),
];
