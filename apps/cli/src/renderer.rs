//! Renderer for documents that are already PDFs.

use bitspring_publish::{CompletionSignal, ConversionError, DocumentRenderer, RenderJob};

/// Copies an existing PDF into the workspace on a background task.
pub struct CopyRenderer;

impl DocumentRenderer for CopyRenderer {
    fn render_to_pdf(
        &self,
        job: &RenderJob,
        signal: CompletionSignal,
    ) -> Result<(), ConversionError> {
        let is_pdf = job
            .document
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if !is_pdf {
            return Err(ConversionError::Failed(format!(
                "{} is not a PDF; only PDF documents can be published from the command line",
                job.document.display()
            )));
        }
        if !job.document.is_file() {
            return Err(ConversionError::Failed(format!(
                "{} does not exist",
                job.document.display()
            )));
        }

        let job = job.clone();
        tokio::spawn(async move {
            if signal.is_abandoned() {
                tracing::debug!(output = %job.output.display(), "operation gone, copy skipped");
                return;
            }
            match tokio::fs::copy(&job.document, &job.output).await {
                Ok(bytes) => {
                    let log = format!("{}: copied {bytes} bytes\n", job.title);
                    if let Err(e) = tokio::fs::write(&job.log_path, log).await {
                        tracing::debug!(error = %e, "failed to write render log");
                    }
                    signal.finished();
                }
                Err(e) => signal.failed(format!("failed to copy {}: {e}", job.document.display())),
            }
        });
        Ok(())
    }
}
