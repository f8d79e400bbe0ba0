//! Publish flow: render a document to PDF, upload it to a new BitSpring
//! space and hand the link back to the host.
//!
//! This crate implements the **workflow** only. The host application
//! provides a [`DocumentRenderer`] (the CAD side) and a [`Host`] (messages,
//! browser, temp directory); the network goes through `bitspring-client`.
//!
//! # Pipeline
//!
//! 1. **Convert**: start the renderer, wait for its completion signal
//! 2. **Upload**: authenticate, create a space, send the PDF
//! 3. **Open**: build the share link and open it in the browser
//! 4. **Clean up**: empty the operation's temp workspace (always)

pub mod context;
pub mod error;
pub mod host;
pub mod orchestrator;
pub mod renderer;
pub mod state;

// Re-export primary types for convenience.
pub use context::OperationContext;
pub use error::{ConversionError, PublishError};
pub use host::Host;
pub use orchestrator::{PublishConfig, PublishOrchestrator, PublishOutcome};
pub use renderer::{CompletionSignal, DocumentRenderer, RenderJob};
pub use state::{PublishEvent, PublishState};
