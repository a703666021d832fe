use error_stack::Report;
use futures::future::BoxFuture;
use tracing::info;

use crate::error::NotifierError;
use crate::notifier::Notifier;

/// Logs the report instead of delivering it anywhere. Useful for dry runs
/// and local development without Telegram credentials.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn name(&self) -> &'static str {
        "terminal"
    }

    fn publish<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<(), Report<NotifierError>>> {
        Box::pin(async move {
            info!("trend report:\n{text}");
            Ok(())
        })
    }
}
