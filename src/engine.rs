use error_stack::{Report, bail};

use crate::error::IndicatorError;
use crate::indicator::close_prices;
use crate::indicator::macd::Macd;
use crate::indicator::rsi::Rsi;
use crate::model::{Candle, Direction};

pub const FAST_SPAN: usize = 12;
pub const SLOW_SPAN: usize = 26;
pub const SIGNAL_SPAN: usize = 9;
pub const RSI_PERIOD: usize = 14;

/// Valid candles required before the trailing row of every series is
/// defined and settled: the slow EMA plus its signal smoothing. This also
/// covers the RSI warm-up of 15.
pub const MIN_CANDLES: usize = SLOW_SPAN + SIGNAL_SPAN;

/// Derived signals for the most recent candle of an analyzed sequence.
///
/// Holds full-precision values; [`TrendSnapshot::rounded`] produces the
/// 2-decimal copy used for presentation and for the direction comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendSnapshot {
    pub close: f64,
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub rsi: f64,
}

impl TrendSnapshot {
    /// Copy with every field rounded to 2 decimal places.
    pub fn rounded(&self) -> Self {
        Self {
            close: round2(self.close),
            ema_fast: round2(self.ema_fast),
            ema_slow: round2(self.ema_slow),
            macd: round2(self.macd),
            macd_signal: round2(self.macd_signal),
            rsi: round2(self.rsi),
        }
    }

    /// Directional label from the MACD/signal relationship as stored.
    ///
    /// Call on the [`rounded`](Self::rounded) copy so the label agrees with
    /// the numbers actually published. Ties classify as LONG.
    pub fn direction(&self) -> Direction {
        if self.macd < self.macd_signal {
            Direction::Short
        } else {
            Direction::Long
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Analyze an oldest-first candle sequence and produce the snapshot for the
/// newest candle.
///
/// Candles with a non-finite close are dropped before computing, matching
/// the lenient numeric coercion at the exchange boundary. Fails with
/// `MalformedCandle` when timestamps are not strictly increasing and with
/// `InsufficientData` when fewer than [`MIN_CANDLES`] usable rows remain.
pub fn analyze(candles: &[Candle]) -> Result<TrendSnapshot, Report<IndicatorError>> {
    for pair in candles.windows(2) {
        if pair[1].open_time <= pair[0].open_time {
            bail!(IndicatorError::MalformedCandle {
                reason: format!(
                    "timestamps not strictly increasing at {}",
                    pair[1].open_time
                ),
            });
        }
    }

    let closes: Vec<f64> = close_prices(candles)
        .into_iter()
        .filter(|c| c.is_finite())
        .collect();

    if closes.len() < MIN_CANDLES {
        bail!(IndicatorError::InsufficientData {
            required: MIN_CANDLES,
            available: closes.len(),
        });
    }

    let macd = Macd::new(FAST_SPAN, SLOW_SPAN, SIGNAL_SPAN)?.series(&closes)?;
    let rsi = Rsi::new(RSI_PERIOD)?.series(&closes)?;

    // MIN_CANDLES exceeds every warm-up, so the trailing row is defined in
    // all series.
    let last = closes.len() - 1;
    let (Some(&rsi_last), Some(&close_last)) = (rsi.last(), closes.last()) else {
        bail!(IndicatorError::InsufficientData {
            required: MIN_CANDLES,
            available: closes.len(),
        });
    };

    Ok(TrendSnapshot {
        close: close_last,
        ema_fast: macd.ema_fast[last],
        ema_slow: macd.ema_slow[last],
        macd: macd.macd[last],
        macd_signal: macd.signal[last],
        rsi: rsi_last,
    })
}
