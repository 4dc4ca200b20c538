use std::{sync::Arc, time::Duration};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    service::RecommendationService,
    session::{reduce, Phase, ServiceOutcome, Session, SessionCommand, SessionEvent},
};

/// Drives a [`Session`] from user actions, the minimum-delay timer, and service replies.
///
/// Timer and service tasks only post events back to the controller; all state
/// changes happen in [`SessionController::next_event`] on the owning task.
pub struct SessionController<S> {
    service: Arc<S>,
    session: Session,
    min_loading_delay: Duration,
    session_id: Uuid,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
}

impl<S: RecommendationService + 'static> SessionController<S> {
    pub fn new(service: S, min_loading_delay: Duration) -> Self {
        Self::with_shared_service(Arc::new(service), min_loading_delay)
    }

    pub fn with_shared_service(service: Arc<S>, min_loading_delay: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            service,
            session: Session::new(),
            min_loading_delay,
            session_id: Uuid::new_v4(),
            events_tx,
            events_rx,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase()
    }

    pub fn edit_query(&mut self, text: &str) {
        self.apply(SessionEvent::QueryEdited(text.to_string()));
    }

    /// Returns whether a request was dispatched.
    pub fn submit(&mut self, text: &str) -> bool {
        self.apply(SessionEvent::Submit(text.to_string()))
    }

    pub fn reset(&mut self) {
        self.apply(SessionEvent::Reset);
    }

    /// Waits for the next timer or service event and applies it.
    pub async fn next_event(&mut self) -> Phase {
        if let Some(event) = self.events_rx.recv().await {
            self.apply(event);
        }
        self.session.phase()
    }

    /// Applies events until the session leaves `Submitting`/`Waiting`.
    pub async fn settle(&mut self) -> &Session {
        while self.session.phase().is_in_flight() {
            self.next_event().await;
        }
        &self.session
    }

    /// Applies events that have already arrived without waiting for more.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    fn apply(&mut self, event: SessionEvent) -> bool {
        let before = self.session.phase();
        let session = std::mem::take(&mut self.session);
        let (session, command) = reduce(session, event);
        self.session = session;

        let after = self.session.phase();
        if before != after {
            info!(
                session_id = %self.session_id,
                generation = self.session.generation(),
                from = ?before,
                to = ?after,
                "session phase changed"
            );
        }

        match command {
            Some(command) => {
                self.execute(command);
                true
            }
            None => false,
        }
    }

    fn execute(&self, command: SessionCommand) {
        match command {
            SessionCommand::Dispatch { generation, prompt } => {
                debug!(session_id = %self.session_id, generation, "dispatching recommendation request");
                self.spawn_minimum_delay(generation);
                self.spawn_request(generation, prompt);
            }
        }
    }

    fn spawn_minimum_delay(&self, generation: u64) {
        let events_tx = self.events_tx.clone();
        let delay = self.min_loading_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events_tx.send(SessionEvent::MinimumDelayElapsed { generation });
        });
    }

    fn spawn_request(&self, generation: u64, prompt: String) {
        let events_tx = self.events_tx.clone();
        let service = Arc::clone(&self.service);
        let session_id = self.session_id;
        tokio::spawn(async move {
            let outcome = match service.recommend(&prompt).await {
                Ok(recommendation) => ServiceOutcome::Delivered(recommendation),
                Err(error) => {
                    warn!(%session_id, generation, %error, "recommendation request failed");
                    ServiceOutcome::Failed
                }
            };
            let _ = events_tx.send(SessionEvent::ResponseReceived {
                generation,
                outcome,
            });
        });
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
