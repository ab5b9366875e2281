use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::thread;

use crate::event::AppEvent;
use crate::gateway::{Backend, FileId, GatewayResult, Notice, StatusUpdate, WordUpdate};
use crate::session::controller::Ticket;
use crate::session::params::SchedulingParams;

/// A finished gateway call, delivered back to the UI thread.
#[derive(Debug)]
pub enum Completion {
    Review(Ticket, GatewayResult<WordUpdate>),
    Params(u64, GatewayResult<StatusUpdate>),
    FileDeleted(GatewayResult<Notice>),
    Exited(GatewayResult<Notice>),
}

/// Runs each gateway call on its own worker thread and posts the result to
/// the event channel. Nothing is cancelled; completions arrive in whatever
/// order the calls finish.
#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn Backend>,
    tx: Sender<AppEvent>,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn Backend>, tx: Sender<AppEvent>) -> Self {
        Self { backend, tx }
    }

    pub fn review(&self, ticket: Ticket) {
        self.spawn(move |backend| {
            let result = ticket.execute(backend);
            Completion::Review(ticket, result)
        });
    }

    pub fn update_params(&self, seq: u64, params: SchedulingParams) {
        self.spawn(move |backend| Completion::Params(seq, backend.update_params(params)));
    }

    pub fn delete_file(&self, file: FileId) {
        self.spawn(move |backend| Completion::FileDeleted(backend.delete_file(file)));
    }

    pub fn exit_session(&self) {
        self.spawn(|backend| Completion::Exited(backend.exit_session()));
    }

    fn spawn<F>(&self, job: F)
    where
        F: FnOnce(&dyn Backend) -> Completion + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let completion = job(backend.as_ref());
            // The receiver is gone only after the UI loop exited.
            let _ = tx.send(AppEvent::Completed(completion));
        });
    }
}
