pub mod ema;
pub mod macd;
pub mod rsi;

use crate::model::Candle;

/// Extract close prices from a slice of candles.
pub fn close_prices(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}
