//! Background worker plumbing for the two network calls.
//!
//! Each call runs on a freshly spawned thread and reports exactly one result
//! message back over a shared channel. Results carry the request id they were
//! started with; anything arriving for a retired id is dropped by the caller.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc::{Receiver, Sender, TryRecvError, channel},
};
use std::thread;

use eframe::egui;

use crate::api::inventory::{self, FetchError, SummaryFetch};
use crate::api::upload::{self, UploadError, UploadResponse};

/// Finished upload call.
#[derive(Debug)]
pub struct UploadFinished {
    /// Id the request was started with.
    pub request_id: u64,
    /// Call outcome.
    pub result: Result<UploadResponse, UploadError>,
}

/// Finished summary call.
#[derive(Debug)]
pub struct SummaryFetched {
    /// Id the request was started with.
    pub request_id: u64,
    /// Call outcome.
    pub result: Result<SummaryFetch, FetchError>,
}

/// Messages workers send back to the UI thread.
#[derive(Debug)]
pub enum JobMessage {
    /// An upload call finished.
    UploadFinished(UploadFinished),
    /// A summary call finished.
    SummaryFetched(SummaryFetched),
}

struct PendingFetch {
    request_id: u64,
    cancel: Arc<AtomicBool>,
}

/// Owns the result channel and the pending-request bookkeeping.
pub struct UiJobs {
    tx: Sender<JobMessage>,
    rx: Receiver<JobMessage>,
    next_request_id: u64,
    upload_pending: Option<u64>,
    fetch_pending: Option<PendingFetch>,
}

impl UiJobs {
    /// Create an idle job runtime.
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            tx,
            rx,
            next_request_id: 1,
            upload_pending: None,
            fetch_pending: None,
        }
    }

    /// True while an upload call is outstanding.
    pub fn upload_in_flight(&self) -> bool {
        self.upload_pending.is_some()
    }

    /// True while a summary call is outstanding.
    pub fn summary_fetch_in_flight(&self) -> bool {
        self.fetch_pending.is_some()
    }

    /// Spawn the upload call for `payload` under a fresh request id.
    pub fn begin_upload(
        &mut self,
        ctx: &egui::Context,
        base_url: String,
        file_name: String,
        payload: Vec<u8>,
    ) {
        let request_id = self.take_request_id();
        self.upload_pending = Some(request_id);
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        thread::spawn(move || {
            let result = upload::upload_csv(&base_url, &file_name, &payload);
            let _ = tx.send(JobMessage::UploadFinished(UploadFinished { request_id, result }));
            ctx.request_repaint();
        });
    }

    /// Spawn the summary call under a fresh request id, retiring any
    /// previous fetch first.
    pub fn begin_summary_fetch(&mut self, ctx: &egui::Context, base_url: String) {
        self.cancel_summary_fetch();
        let request_id = self.take_request_id();
        let cancel = Arc::new(AtomicBool::new(false));
        self.fetch_pending = Some(PendingFetch {
            request_id,
            cancel: cancel.clone(),
        });
        let tx = self.tx.clone();
        let ctx = ctx.clone();
        thread::spawn(move || {
            let result = inventory::fetch_summary(&base_url);
            if cancel.load(Ordering::Relaxed) {
                // The page went away; drop the result on the floor.
                return;
            }
            let _ = tx.send(JobMessage::SummaryFetched(SummaryFetched { request_id, result }));
            ctx.request_repaint();
        });
    }

    /// Retire the outstanding summary fetch, if any.
    pub fn cancel_summary_fetch(&mut self) {
        if let Some(pending) = self.fetch_pending.take() {
            pending.cancel.store(true, Ordering::Relaxed);
        }
    }

    /// Clear the pending upload when `request_id` matches it; a stale id
    /// returns false and must be ignored by the caller.
    pub fn finish_upload(&mut self, request_id: u64) -> bool {
        if self.upload_pending == Some(request_id) {
            self.upload_pending = None;
            true
        } else {
            false
        }
    }

    /// Clear the pending fetch when `request_id` matches it; a stale id
    /// returns false and must be ignored by the caller.
    pub fn finish_summary_fetch(&mut self, request_id: u64) -> bool {
        match &self.fetch_pending {
            Some(pending) if pending.request_id == request_id => {
                self.fetch_pending = None;
                true
            }
            _ => false,
        }
    }

    /// Non-blocking poll of the result channel.
    pub fn try_recv_message(&self) -> Result<JobMessage, TryRecvError> {
        self.rx.try_recv()
    }

    fn take_request_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }
}

#[cfg(test)]
impl UiJobs {
    pub(crate) fn test_sender(&self) -> Sender<JobMessage> {
        self.tx.clone()
    }

    pub(crate) fn mark_upload_pending(&mut self) -> u64 {
        let id = self.take_request_id();
        self.upload_pending = Some(id);
        id
    }

    pub(crate) fn pending_fetch_id(&self) -> Option<u64> {
        self.fetch_pending.as_ref().map(|pending| pending.request_id)
    }
}
