//! Background feed fetching.
//!
//! Each request runs on its own worker thread: fetch, normalize, and send the
//! result to the UI thread over an [`mpsc`] channel.  Requests are numbered;
//! the UI keeps only the response to its most recent request, so a slow
//! earlier response that arrives late is ignored instead of overwriting the
//! newer gallery.
//!
//! There is no cancellation: a superseded worker runs to completion and its
//! message is discarded.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use crate::error::FetchError;
use crate::range::DateRange;
use crate::source::{normalize, FeedItem, FeedSource, MediaKind};

/// Message sent from a worker thread to the UI thread.
#[derive(Debug)]
pub struct FetchMsg {
    /// Id returned by the [`Fetcher::request`] call that produced this.
    pub request_id: u64,
    pub result: Result<Vec<FeedItem>, FetchError>,
}

pub struct Fetcher {
    source: Arc<dyn FeedSource>,
    tx: mpsc::Sender<FetchMsg>,
    rx: mpsc::Receiver<FetchMsg>,
    next_id: u64,
}

impl Fetcher {
    pub fn new(source: Arc<dyn FeedSource>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            source,
            tx,
            rx,
            next_id: 0,
        }
    }

    pub fn source(&self) -> &dyn FeedSource {
        self.source.as_ref()
    }

    /// Start one fetch on a worker thread and return its request id.
    pub fn request(&mut self, range: Option<DateRange>) -> u64 {
        self.next_id += 1;
        let request_id = self.next_id;
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();

        thread::spawn(move || {
            let result = source.fetch(range.as_ref()).map(|records| {
                let mut items = normalize(records);
                // Date-parameterized sources already return just the range;
                // static documents are filtered here.  Undated entries stay
                // visible.
                if let Some(range) = range {
                    items.retain(|item| item.date.map_or(true, |d| range.contains(d)));
                }
                items
            });
            match &result {
                Ok(items) => {
                    let unsupported = items
                        .iter()
                        .filter(|i| i.media.kind() == MediaKind::Unsupported)
                        .count();
                    log::info!(
                        "Request {request_id}: {} item(s), {unsupported} without displayable media",
                        items.len()
                    );
                }
                Err(e) => log::warn!("Request {request_id} failed: {e}"),
            }
            // If the receiver is gone the UI has exited; nothing to do.
            let _ = tx.send(FetchMsg { request_id, result });
        });

        request_id
    }

    /// Non-blocking: the next finished response, if any.
    pub fn try_recv(&self) -> Option<FetchMsg> {
        self.rx.try_recv().ok()
    }
}
