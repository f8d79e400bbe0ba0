//! Recording transport for unit tests.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

use crate::error::TransportError;
use crate::transport::{Request, Response, Transport};

type Responder = Box<dyn Fn(&Request) -> Result<Response, TransportError> + Send + Sync>;

/// Records every request and answers through `responder`.
pub struct StubTransport {
    requests: Mutex<Vec<Request>>,
    responder: Responder,
}

impl StubTransport {
    pub fn new(
        responder: impl Fn(&Request) -> Result<Response, TransportError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    /// Answers every request with the same status and body.
    pub fn fixed(status: u16, body: &'static str) -> Self {
        Self::new(move |_| Ok(Response::new(status, body)))
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

impl Transport for StubTransport {
    fn execute(
        &self,
        request: Request,
    ) -> Pin<Box<dyn Future<Output = Result<Response, TransportError>> + Send + '_>> {
        let result = (self.responder)(&request);
        self.requests.lock().unwrap().push(request);
        Box::pin(async move { result })
    }
}
