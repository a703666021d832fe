use error_stack::{Report, bail};

use crate::error::IndicatorError;
use crate::indicator::ema::Ema;

/// MACD line and signal line over a price series.
///
/// Both output series have the same length as the input because the
/// underlying EMAs use the cumulative recurrence with no warm-up cutoff.
pub struct Macd {
    fast: Ema,
    slow: Ema,
    signal: Ema,
}

/// Full-length MACD output, index-aligned with the input prices.
///
/// The component EMAs are kept because callers report them alongside the
/// MACD line itself.
pub struct MacdSeries {
    pub ema_fast: Vec<f64>,
    pub ema_slow: Vec<f64>,
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
}

impl Macd {
    pub fn new(
        fast_span: usize,
        slow_span: usize,
        signal_span: usize,
    ) -> Result<Self, Report<IndicatorError>> {
        if fast_span >= slow_span {
            bail!(IndicatorError::InvalidParameter {
                name: "fast_span must be < slow_span".into(),
            });
        }
        Ok(Self {
            fast: Ema::new(fast_span)?,
            slow: Ema::new(slow_span)?,
            signal: Ema::new(signal_span)?,
        })
    }

    /// Number of candles required for a statistically settled tail value.
    pub fn warmup(&self) -> usize {
        self.slow.span() + self.signal.span()
    }

    /// Calculate the MACD line and its signal line.
    pub fn series(&self, prices: &[f64]) -> Result<MacdSeries, Report<IndicatorError>> {
        let fast = self.fast.series(prices)?;
        let slow = self.slow.series(prices)?;

        let macd: Vec<f64> = fast.iter().zip(slow.iter()).map(|(f, s)| f - s).collect();
        let signal = self.signal.series(&macd)?;

        Ok(MacdSeries {
            ema_fast: fast,
            ema_slow: slow,
            macd,
            signal,
        })
    }
}
