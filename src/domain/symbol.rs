use serde::{Deserialize, Serialize};

/// An exchange instrument, e.g. `BTCUSDT` = base `BTC` + quote `USDT`.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct TradingSymbol {
    pub name: String,
    pub base_asset: String,
    pub quote_asset: String,
}

impl TradingSymbol {
    pub fn new(name: impl Into<String>, base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_asset: base.into(),
            quote_asset: quote.into(),
        }
    }

    /// Builds the symbol from its two assets; the exchange name is their concatenation.
    pub fn from_assets(base: &str, quote: &str) -> Self {
        Self::new(format!("{}{}", base, quote), base, quote)
    }

    // The name we pass into the Binance API (not necessarily display name)
    pub fn bn_name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> String {
        format!("{}-{}", self.base_asset, self.quote_asset)
    }

    pub fn is_quoted_in(&self, quote: &str) -> bool {
        self.quote_asset == quote
    }
}

impl std::fmt::Display for TradingSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
