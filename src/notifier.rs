pub mod telegram;
pub mod terminal;

use error_stack::Report;
use futures::future::BoxFuture;

use crate::error::NotifierError;

/// Sink for the rendered trend report.
///
/// Uses `BoxFuture` to stay object-safe, same as [`crate::exchange::Exchange`].
pub trait Notifier: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Deliver one message body.
    fn publish<'a>(&'a self, text: &'a str) -> BoxFuture<'a, Result<(), Report<NotifierError>>>;
}
