//! Asset catalog: the symbols the tool knows about out of the box.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketKind {
    Crypto,
    Equity,
}

impl fmt::Display for MarketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketKind::Crypto => write!(f, "crypto"),
            MarketKind::Equity => write!(f, "equity"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub symbol: String,
    pub name: String,
    pub kind: MarketKind,
}

impl Asset {
    pub fn crypto(symbol: &str, name: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            kind: MarketKind::Crypto,
        }
    }

    pub fn equity(symbol: &str, name: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: name.to_string(),
            kind: MarketKind::Equity,
        }
    }

    /// Resolve a user-supplied symbol: catalog entry if known, otherwise an
    /// ad-hoc asset whose kind is inferred from the pair syntax
    /// (`BASE/QUOTE` means crypto).
    pub fn resolve(symbol: &str) -> Self {
        let wanted = symbol.trim().to_uppercase();
        default_catalog()
            .into_iter()
            .find(|a| a.symbol == wanted)
            .unwrap_or_else(|| {
                let kind = if wanted.contains('/') {
                    MarketKind::Crypto
                } else {
                    MarketKind::Equity
                };
                Self {
                    symbol: wanted.clone(),
                    name: wanted,
                    kind,
                }
            })
    }

    /// Base currency of a crypto pair (`BTC/USD` -> `BTC`); the full symbol
    /// for equities.
    pub fn base(&self) -> &str {
        self.symbol.split('/').next().unwrap_or(&self.symbol)
    }

    /// Quote currency of a crypto pair, defaulting to USD when the symbol
    /// carries no pair separator.
    pub fn quote(&self) -> &str {
        self.symbol.split('/').nth(1).unwrap_or("USD")
    }

    /// Filesystem-safe stem: slashes mapped to underscores.
    pub fn file_stem(&self) -> String {
        self.symbol.replace('/', "_")
    }
}

/// The built-in menu: five cryptocurrencies and five index ETFs.
pub fn default_catalog() -> Vec<Asset> {
    vec![
        Asset::crypto("BTC/USD", "Bitcoin"),
        Asset::crypto("ETH/USD", "Ethereum"),
        Asset::crypto("SOL/USD", "Solana"),
        Asset::crypto("XRP/USD", "Ripple"),
        Asset::crypto("ADA/USD", "Cardano"),
        Asset::equity("SPY", "S&P 500 (SPY ETF)"),
        Asset::equity("QQQ", "Nasdaq 100 (QQQ ETF)"),
        Asset::equity("DIA", "Dow Jones (DIA ETF)"),
        Asset::equity("IWM", "Russell 2000 (IWM ETF)"),
        Asset::equity("EWG", "DAX Germany (EWG ETF)"),
    ]
}
