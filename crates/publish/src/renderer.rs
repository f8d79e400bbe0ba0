//! Document renderer seam and its one-shot completion signal.

use std::path::PathBuf;

use tokio::sync::oneshot;

use crate::error::ConversionError;

/// What the renderer must produce for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderJob {
    /// Source document (e.g. a DWG drawing).
    pub document: PathBuf,
    /// Where the PDF must exist once completion is signalled.
    pub output: PathBuf,
    /// Optional log location inside the same workspace.
    pub log_path: PathBuf,
    /// Title for the produced PDF (the logical file name).
    pub title: String,
}

/// Fires exactly once to report the end of a conversion.
///
/// Both methods consume the signal. Dropping it without firing is reported
/// to the waiting operation as [`ConversionError::Abandoned`].
#[derive(Debug)]
pub struct CompletionSignal {
    tx: oneshot::Sender<Result<(), ConversionError>>,
}

impl CompletionSignal {
    /// Creates a signal and the receiver the operation waits on.
    pub fn channel() -> (Self, oneshot::Receiver<Result<(), ConversionError>>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// True once the operation stopped waiting (timed out, cancelled or
    /// failed). Its workspace may already be cleared and reused, so a
    /// renderer seeing this must not write into it.
    pub fn is_abandoned(&self) -> bool {
        self.tx.is_closed()
    }

    /// The PDF is complete at [`RenderJob::output`].
    pub fn finished(self) {
        let _ = self.tx.send(Ok(()));
    }

    /// The conversion failed; `reason` is shown to the user.
    pub fn failed(self, reason: impl Into<String>) {
        let _ = self.tx.send(Err(ConversionError::Failed(reason.into())));
    }
}

/// Converts a document to PDF asynchronously.
///
/// `render_to_pdf` must return promptly: it starts the conversion and hands
/// `signal` to whatever finishes it. An `Err` return means the conversion
/// could not start; the signal is then ignored.
///
/// The operation only waits for the configured conversion timeout. After
/// that, or after cancellation, the workspace is cleared and the file name
/// released; check [`CompletionSignal::is_abandoned`] before writing to
/// [`RenderJob::output`] from a background task.
pub trait DocumentRenderer: Send + Sync {
    fn render_to_pdf(&self, job: &RenderJob, signal: CompletionSignal)
    -> Result<(), ConversionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finished_delivers_ok() {
        let (signal, rx) = CompletionSignal::channel();
        signal.finished();
        assert!(rx.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn failed_delivers_reason() {
        let (signal, rx) = CompletionSignal::channel();
        signal.failed("plotter offline");
        let err = rx.await.unwrap().unwrap_err();
        assert_eq!(err.to_string(), "plotter offline");
    }

    #[tokio::test]
    async fn dropped_signal_closes_channel() {
        let (signal, rx) = CompletionSignal::channel();
        drop(signal);
        assert!(rx.await.is_err());
    }

    #[tokio::test]
    async fn fires_from_another_task() {
        let (signal, rx) = CompletionSignal::channel();
        tokio::spawn(async move {
            tokio::task::yield_now().await;
            signal.finished();
        });
        assert!(rx.await.unwrap().is_ok());
    }

    #[test]
    fn abandoned_once_receiver_dropped() {
        let (signal, rx) = CompletionSignal::channel();
        assert!(!signal.is_abandoned());
        drop(rx);
        assert!(signal.is_abandoned());
    }

    #[test]
    fn firing_after_receiver_dropped_is_harmless() {
        let (signal, rx) = CompletionSignal::channel();
        drop(rx);
        signal.finished();
    }
}
