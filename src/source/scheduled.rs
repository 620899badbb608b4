//! Channel-backed roster source.
//!
//! Receives fetch events from the refresh scheduler via a tokio mpsc
//! channel and hands them to the TUI without blocking.

use tokio::sync::mpsc;

use super::RosterSource;
use crate::scheduler::FetchEvent;

/// A roster source fed by a [`crate::scheduler::RefreshScheduler`].
///
/// Constructed as the consuming half of
/// [`RefreshScheduler::channel`](crate::scheduler::RefreshScheduler::channel).
/// Tests can also build one directly around a hand-made channel.
#[derive(Debug)]
pub struct ScheduledSource {
    receiver: mpsc::Receiver<FetchEvent>,
    description: String,
}

impl ScheduledSource {
    /// Create a source around the receiving end of a fetch-event channel.
    pub fn new(receiver: mpsc::Receiver<FetchEvent>, source_description: &str) -> Self {
        Self {
            receiver,
            description: format!("scheduled: {}", source_description),
        }
    }
}

impl RosterSource for ScheduledSource {
    fn poll(&mut self) -> Option<FetchEvent> {
        match self.receiver.try_recv() {
            Ok(event) => Some(event),
            Err(mpsc::error::TryRecvError::Empty) => None,
            // Scheduler dropped; nothing more will arrive
            Err(mpsc::error::TryRecvError::Disconnected) => None,
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}
