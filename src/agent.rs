//! The page-side message agent.
//!
//! The UI asks for a scrape with `{"action": "scrape"}` over a one-shot
//! request/response channel. The agent scrapes the page, relays the scrape
//! result right away, delivers it to the backend and answers with the
//! backend's response or a structured failure.

use crate::delivery::DeliveryClient;
use crate::page::Page;
use crate::scrape::Scraper;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// A message from the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Request {
    Scrape,
    /// Any action this agent does not handle
    #[serde(other)]
    Unknown,
}

/// A reply to the UI: `{"success": true, "data": ...}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl ToString) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}

/// Outbound channel for the immediate scrape relay.
pub type Relay = mpsc::UnboundedSender<Response>;

/// A request paired with the channel its single reply goes to.
pub struct Envelope {
    pub request: Request,
    pub reply: oneshot::Sender<Response>,
}

impl Envelope {
    pub fn new(request: Request) -> (Self, oneshot::Receiver<Response>) {
        let (reply, receiver) = oneshot::channel();
        (Self { request, reply }, receiver)
    }
}

/// Answers UI requests for one page.
pub struct PageAgent {
    scraper: Scraper,
    delivery: DeliveryClient,
}

impl PageAgent {
    pub fn new(scraper: Scraper, delivery: DeliveryClient) -> Self {
        Self { scraper, delivery }
    }

    /// Handle one request.
    ///
    /// Returns `None` for actions this agent does not answer. The relay may
    /// be closed; relay send failures are ignored.
    pub async fn handle(&self, request: Request, page: &mut Page, relay: &Relay) -> Option<Response> {
        match request {
            Request::Scrape => Some(self.scrape_and_deliver(page, relay).await),
            Request::Unknown => {
                debug!("agent: ignoring unknown action");
                None
            }
        }
    }

    async fn scrape_and_deliver(&self, page: &mut Page, relay: &Relay) -> Response {
        info!(url = ?page.url().map(|u| u.as_str()), "agent: scraping page content");
        let scraped = match self.scraper.scrape(page) {
            Ok(scraped) => scraped,
            Err(e) => return Response::failure(e),
        };

        match serde_json::to_value(&scraped) {
            Ok(data) => {
                if relay.send(Response::success(data)).is_err() {
                    debug!("agent: relay receiver dropped");
                }
            }
            Err(e) => warn!(error = %e, "agent: could not serialize scrape result"),
        }

        match self.delivery.deliver_result(&scraped).await {
            Ok(response) => Response::success(response.into_inner()),
            Err(e) => Response::failure(e),
        }
    }

    /// Serve requests from `inbox` until every sender is dropped.
    ///
    /// Requests are handled one at a time against the same page.
    pub async fn serve(&self, page: &mut Page, mut inbox: mpsc::Receiver<Envelope>, relay: Relay) {
        while let Some(Envelope { request, reply }) = inbox.recv().await {
            if let Some(response) = self.handle(request, page, &relay).await {
                if reply.send(response).is_err() {
                    debug!("agent: reply receiver dropped");
                }
            }
        }
        debug!("agent: inbox closed");
    }
}
