//! Publish orchestrator.
//!
//! Drives one operation through convert → authenticate → create space →
//! upload → open → clean up, emitting a [`PublishEvent`] on every state
//! change. The only suspension point is the renderer's completion signal.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use bitspring_client::ApiClient;
use bitspring_protocol::constants::DEFAULT_WEB_APP_BASE_URL;
use bitspring_protocol::share_url;
use bitspring_transfer::Workspace;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::context::OperationContext;
use crate::error::{ConversionError, PublishError};
use crate::host::Host;
use crate::renderer::{CompletionSignal, DocumentRenderer};
use crate::state::{PublishEvent, PublishState};

/// Default time allowed for the renderer to signal completion.
pub const DEFAULT_CONVERSION_TIMEOUT: Duration = Duration::from_secs(600);

/// Default workspace root under the host temp directory.
pub const DEFAULT_WORKSPACE_DIR: &str = "Hightail";

/// Workflow settings.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    /// Web app root; links are `<web_app_base_url>/space/<space.url>`.
    pub web_app_base_url: String,
    /// Directory under the host temp dir holding per-operation workspaces.
    pub workspace_dir: String,
    pub conversion_timeout: Duration,
    /// When false the link is only printed.
    pub open_browser: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            web_app_base_url: DEFAULT_WEB_APP_BASE_URL.to_string(),
            workspace_dir: DEFAULT_WORKSPACE_DIR.to_string(),
            conversion_timeout: DEFAULT_CONVERSION_TIMEOUT,
            open_browser: true,
        }
    }
}

/// Result of a successful publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub operation: Uuid,
    pub url: String,
    pub space_id: String,
    pub bytes: u64,
}

/// Orchestrates publish operations for one host.
pub struct PublishOrchestrator {
    client: ApiClient,
    renderer: Arc<dyn DocumentRenderer>,
    host: Arc<dyn Host>,
    config: PublishConfig,
    events_tx: mpsc::Sender<PublishEvent>,
    events_rx: Option<mpsc::Receiver<PublishEvent>>,
    cancel: CancellationToken,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl PublishOrchestrator {
    /// Creates a new orchestrator.
    pub fn new(
        client: ApiClient,
        renderer: Arc<dyn DocumentRenderer>,
        host: Arc<dyn Host>,
        config: PublishConfig,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(256);
        Self {
            client,
            renderer,
            host,
            config,
            events_tx,
            events_rx: Some(events_rx),
            cancel: CancellationToken::new(),
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<PublishEvent>> {
        self.events_rx.take()
    }

    /// Returns a token that cancels every operation of this orchestrator.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &PublishConfig {
        &self.config
    }

    /// Starts a publish on the runtime and returns immediately.
    pub fn spawn(
        self: &Arc<Self>,
        document: PathBuf,
    ) -> JoinHandle<Result<PublishOutcome, PublishError>> {
        let this = Arc::clone(self);
        tokio::spawn(async move { this.publish(&document).await })
    }

    /// Publishes `document` under its file stem.
    pub async fn publish(&self, document: &Path) -> Result<PublishOutcome, PublishError> {
        let name = match logical_name(document) {
            Ok(name) => name,
            Err(e) => {
                self.reject(&document.display().to_string(), &e);
                return Err(e);
            }
        };
        self.publish_as(document, &name).await
    }

    /// Publishes `document` as `<file_name>.pdf`.
    ///
    /// Only one operation per `file_name` may run at a time; a second one
    /// fails with [`PublishError::Busy`] without touching the first one's
    /// workspace.
    pub async fn publish_as(
        &self,
        document: &Path,
        file_name: &str,
    ) -> Result<PublishOutcome, PublishError> {
        let _claim = match InFlightClaim::acquire(&self.in_flight, file_name) {
            Ok(claim) => claim,
            Err(e) => {
                self.reject(file_name, &e);
                return Err(e);
            }
        };
        let mut op = Operation::new(file_name, &self.events_tx);
        info!(operation = %op.id, file = %file_name, document = %document.display(), "publish requested");

        let result = match Workspace::create(
            &self.host.temp_directory(),
            &self.config.workspace_dir,
            file_name,
        ) {
            Ok(workspace) => {
                let ctx = OperationContext::new(op.id, document, workspace);
                let result = self.run(&ctx, &mut op).await;
                if result.is_err() {
                    discard_workspace(&ctx);
                }
                result
            }
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(outcome) => {
                op.emit(PublishEvent::Completed {
                    operation: op.id,
                    url: outcome.url.clone(),
                });
                info!(operation = %op.id, url = %outcome.url, "publish completed");
                Ok(outcome)
            }
            Err(e) => {
                op.advance(PublishState::Failed);
                self.surface_error(&e);
                op.emit(PublishEvent::Failed {
                    operation: op.id,
                    error: e.to_string(),
                });
                error!(operation = %op.id, error = %e, "publish failed");
                Err(e)
            }
        }
    }

    /// Ends an operation that never got a workspace.
    fn reject(&self, file_name: &str, err: &PublishError) {
        let op = Operation::new(file_name, &self.events_tx);
        warn!(operation = %op.id, file = %file_name, error = %err, "publish rejected");
        self.surface_error(err);
        op.emit(PublishEvent::Failed {
            operation: op.id,
            error: err.to_string(),
        });
    }

    async fn run(
        &self,
        ctx: &OperationContext,
        op: &mut Operation<'_>,
    ) -> Result<PublishOutcome, PublishError> {
        // 1. Convert
        op.advance(PublishState::Converting);
        self.host.write_message("Converting the document to PDF");
        self.check_cancelled()?;
        self.convert(ctx, op).await?;

        // 2. Upload
        op.advance(PublishState::Uploading);
        self.host.write_message("Uploading to a new BitSpring Space.");
        self.check_cancelled()?;
        let session = self.client.authenticate().await?;
        self.check_cancelled()?;
        let space = self.client.create_space(&session).await?;
        self.check_cancelled()?;
        let bytes = self
            .client
            .upload(&session, &space, &ctx.pdf_path(), ctx.file_name())
            .await?;
        let url = share_url(&self.config.web_app_base_url, &space.url);

        // 3. Open
        op.advance(PublishState::OpeningResult);
        self.open_result(&url);

        // 4. Clean up
        op.advance(PublishState::CleaningUp);
        let removed = ctx.workspace().clear()?;
        debug!(operation = %ctx.id(), removed, "temp files removed");

        op.advance(PublishState::Done);
        if self.config.open_browser {
            self.host
                .write_message("Please check your default browser for your BitSpring space.");
        } else {
            self.host.write_message("Your BitSpring space is ready.");
        }

        Ok(PublishOutcome {
            operation: ctx.id(),
            url,
            space_id: space.id,
            bytes,
        })
    }

    /// Starts the renderer and waits for its one-shot signal.
    async fn convert(
        &self,
        ctx: &OperationContext,
        op: &mut Operation<'_>,
    ) -> Result<(), PublishError> {
        debug!(operation = %ctx.id(), document = %ctx.document().display(), "rendering");
        let (signal, done) = CompletionSignal::channel();
        self.renderer.render_to_pdf(&ctx.render_job(), signal)?;
        op.advance(PublishState::AwaitingConversion);

        // Dropping `done` on timeout or cancel closes the signal; late renderers
        // see `CompletionSignal::is_abandoned` and must not write.
        let timeout = self.config.conversion_timeout;
        let outcome = tokio::select! {
            res = tokio::time::timeout(timeout, done) => res,
            _ = self.cancel.cancelled() => return Err(PublishError::Cancelled),
        };

        match outcome {
            Err(_) => return Err(ConversionError::TimedOut(timeout).into()),
            Ok(Err(_)) => return Err(ConversionError::Abandoned.into()),
            Ok(Ok(res)) => res?,
        }

        let pdf = ctx.pdf_path();
        if !pdf.is_file() {
            return Err(ConversionError::MissingOutput(pdf).into());
        }
        match ctx.workspace().file_count() {
            Ok(files) => {
                debug!(operation = %ctx.id(), pdf = %pdf.display(), files, "conversion finished")
            }
            Err(e) => warn!(operation = %ctx.id(), error = %e, "cannot list workspace"),
        }
        Ok(())
    }

    /// Browser failures are not fatal: the upload already succeeded.
    fn open_result(&self, url: &str) {
        if !self.config.open_browser {
            self.host
                .write_message(&format!("Your BitSpring space: {url}"));
            return;
        }

        self.host
            .write_message("Opening BitSpring space in your default browser.");
        if let Err(e) = self.host.open_in_browser(url) {
            warn!(url, error = %e, "failed to open browser");
            self.host
                .write_message(&format!("Could not open a browser. Your space: {url}"));
        }
    }

    fn surface_error(&self, err: &PublishError) {
        match err {
            PublishError::Conversion(e) => self.host.show_error(&e.to_string()),
            PublishError::Cancelled => self.host.write_message("BitSpring upload cancelled."),
            other => self
                .host
                .write_message(&format!("BitSpring upload failed: {other}")),
        }
    }

    fn check_cancelled(&self) -> Result<(), PublishError> {
        if self.cancel.is_cancelled() {
            Err(PublishError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Tracks one operation's state and reports transitions.
struct Operation<'a> {
    id: Uuid,
    file_name: String,
    state: PublishState,
    events_tx: &'a mpsc::Sender<PublishEvent>,
}

impl<'a> Operation<'a> {
    fn new(file_name: &str, events_tx: &'a mpsc::Sender<PublishEvent>) -> Self {
        Self {
            id: Uuid::new_v4(),
            file_name: file_name.to_string(),
            state: PublishState::Idle,
            events_tx,
        }
    }

    fn advance(&mut self, next: PublishState) {
        if !self.state.can_transition_to(next) {
            warn!(operation = %self.id, from = ?self.state, to = ?next, "unexpected state transition");
        }
        self.state = next;
        debug!(operation = %self.id, state = ?next, "state changed");
        self.emit(PublishEvent::StateChanged {
            operation: self.id,
            file_name: self.file_name.clone(),
            state: next,
        });
    }

    /// Never blocks the workflow: events are dropped when nobody drains them.
    fn emit(&self, event: PublishEvent) {
        if let Err(e) = self.events_tx.try_send(event) {
            debug!(operation = %self.id, error = %e, "publish event dropped");
        }
    }
}

/// Marks a file name as in flight until dropped.
struct InFlightClaim {
    names: Arc<Mutex<HashSet<String>>>,
    name: String,
}

impl InFlightClaim {
    fn acquire(names: &Arc<Mutex<HashSet<String>>>, name: &str) -> Result<Self, PublishError> {
        let mut set = names.lock().unwrap_or_else(PoisonError::into_inner);
        if !set.insert(name.to_string()) {
            return Err(PublishError::Busy(name.to_string()));
        }
        Ok(Self {
            names: Arc::clone(names),
            name: name.to_string(),
        })
    }
}

impl Drop for InFlightClaim {
    fn drop(&mut self) {
        self.names
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.name);
    }
}

fn discard_workspace(ctx: &OperationContext) {
    match ctx.workspace().clear() {
        Ok(removed) => debug!(operation = %ctx.id(), removed, "workspace discarded"),
        Err(e) => warn!(operation = %ctx.id(), error = %e, "failed to clean workspace"),
    }
}

/// Logical name of a document: its file stem.
fn logical_name(document: &Path) -> Result<String, PublishError> {
    document
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| PublishError::InvalidDocument(document.to_path_buf()))
}
