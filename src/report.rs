use crate::engine::TrendSnapshot;
use crate::model::Direction;

/// Render a snapshot into the Markdown message body published to the chat.
///
/// Values are rounded to 2 decimals and the direction label is computed from
/// those rounded values, so the label can never contradict the numbers shown.
pub fn render(symbol: &str, snapshot: &TrendSnapshot) -> String {
    let r = snapshot.rounded();
    let direction = r.direction();
    let arrow = match direction {
        Direction::Long => "\u{1F4C8}",  // 📈
        Direction::Short => "\u{1F4C9}", // 📉
    };

    format!(
        "\u{1F4CA} *TrendNotifier - {symbol}*\n\
         Price: `{}`\n\
         EMA12: `{}`\n\
         EMA26: `{}`\n\
         MACD: `{}` | Signal: `{}`\n\
         RSI: `{}`\n\
         Trend: *{arrow} {direction}*",
        r.close, r.ema_fast, r.ema_slow, r.macd, r.macd_signal, r.rsi,
    )
}
