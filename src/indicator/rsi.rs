use error_stack::{Report, bail};

use crate::error::IndicatorError;

/// Relative Strength Index with plain rolling-mean averages.
///
/// Average gain and loss are trailing simple means over the most recent
/// `period` deltas, not Wilder's exponential smoothing. The first output
/// corresponds to input index `period` (one delta per price after the
/// first, and a full window of them is needed).
pub struct Rsi {
    period: usize,
}

impl Rsi {
    pub fn new(period: usize) -> Result<Self, Report<IndicatorError>> {
        if period == 0 {
            bail!(IndicatorError::InvalidParameter {
                name: "period must be > 0".into(),
            });
        }
        Ok(Self { period })
    }

    /// Minimum number of prices required to produce one output value.
    pub fn warmup(&self) -> usize {
        self.period + 1
    }

    /// Calculate the RSI series. `result[k]` corresponds to price index
    /// `k + period`.
    pub fn series(&self, prices: &[f64]) -> Result<Vec<f64>, Report<IndicatorError>> {
        if prices.len() < self.warmup() {
            bail!(IndicatorError::InsufficientData {
                required: self.warmup(),
                available: prices.len(),
            });
        }

        let deltas: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
        let gains: Vec<f64> = deltas.iter().map(|&d| d.max(0.0)).collect();
        let losses: Vec<f64> = deltas.iter().map(|&d| (-d).max(0.0)).collect();

        let results = gains
            .windows(self.period)
            .zip(losses.windows(self.period))
            .map(|(g, l)| {
                let avg_gain = g.iter().sum::<f64>() / self.period as f64;
                let avg_loss = l.iter().sum::<f64>() / self.period as f64;
                rsi_value(avg_gain, avg_loss)
            })
            .collect();

        Ok(results)
    }
}

/// Saturates to exactly 100 when the loss average is zero instead of
/// dividing by zero.
fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - 100.0 / (1.0 + rs)
}
