use error_stack::{Report, bail};

use crate::error::IndicatorError;

/// Exponential Moving Average over a price series.
///
/// Uses the cumulative recurrence: the first output equals the first price
/// and every later output is `alpha * price + (1 - alpha) * previous` with
/// `alpha = 2 / (span + 1)`. There is no SMA seed and no warm-up cutoff, so
/// the output has the same length as the input. Early values are defined but
/// statistically unstable; callers that need a stable tail discard leading
/// rows themselves.
pub struct Ema {
    span: usize,
}

impl Ema {
    pub fn new(span: usize) -> Result<Self, Report<IndicatorError>> {
        if span == 0 {
            bail!(IndicatorError::InvalidParameter {
                name: "span must be > 0".into(),
            });
        }
        Ok(Self { span })
    }

    pub fn span(&self) -> usize {
        self.span
    }

    /// Calculate the EMA series. One output per input price.
    pub fn series(&self, prices: &[f64]) -> Result<Vec<f64>, Report<IndicatorError>> {
        if prices.is_empty() {
            bail!(IndicatorError::InsufficientData {
                required: 1,
                available: 0,
            });
        }

        let alpha = 2.0 / (self.span as f64 + 1.0);
        let mut ema = prices[0];
        let mut results = Vec::with_capacity(prices.len());
        results.push(ema);

        for &price in &prices[1..] {
            ema = alpha * price + (1.0 - alpha) * ema;
            results.push(ema);
        }

        Ok(results)
    }
}
