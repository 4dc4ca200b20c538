//! Recommendation session state and its pure reducer.
//!
//! A session moves `Idle -> Submitting -> Waiting -> Ready | Failed` and back to
//! `Idle` on reset. Every submit and reset advances the session generation;
//! timer and response events tagged with an older generation are dropped.

use shared::{
    domain::{split_words, truncate_query, Recommendation},
    error::RECOMMENDATION_FAILED_MESSAGE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Waiting,
    Ready,
    Failed,
}

impl Phase {
    pub fn is_in_flight(self) -> bool {
        matches!(self, Phase::Submitting | Phase::Waiting)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceOutcome {
    Delivered(Recommendation),
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    QueryEdited(String),
    Submit(String),
    MinimumDelayElapsed { generation: u64 },
    ResponseReceived { generation: u64, outcome: ServiceOutcome },
    Reset,
}

/// Side effects the driver must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Start the outbound call and the minimum-delay timer, both tagged with `generation`.
    Dispatch { generation: u64, prompt: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    query: String,
    phase: Phase,
    words: Vec<String>,
    result: Option<Recommendation>,
    error: Option<String>,
    generation: u64,
    pending: Option<ServiceOutcome>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn result(&self) -> Option<&Recommendation> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a response has arrived but is held back until the minimum delay elapses.
    pub fn has_buffered_outcome(&self) -> bool {
        self.pending.is_some()
    }
}

pub fn reduce(session: Session, event: SessionEvent) -> (Session, Option<SessionCommand>) {
    match event {
        SessionEvent::QueryEdited(text) => {
            let mut session = session;
            session.query = truncate_query(&text);
            (session, None)
        }
        SessionEvent::Submit(text) => submit(session, text),
        SessionEvent::MinimumDelayElapsed { generation } => {
            (minimum_delay_elapsed(session, generation), None)
        }
        SessionEvent::ResponseReceived {
            generation,
            outcome,
        } => (response_received(session, generation, outcome), None),
        SessionEvent::Reset => (reset(session), None),
    }
}

fn submit(mut session: Session, text: String) -> (Session, Option<SessionCommand>) {
    let text = truncate_query(&text);
    if text.trim().is_empty() || session.phase.is_in_flight() {
        return (session, None);
    }

    session.generation += 1;
    session.words = split_words(&text);
    session.query = text.clone();
    session.result = None;
    session.error = None;
    session.pending = None;
    session.phase = Phase::Submitting;

    let command = SessionCommand::Dispatch {
        generation: session.generation,
        prompt: text,
    };
    (session, Some(command))
}

fn minimum_delay_elapsed(mut session: Session, generation: u64) -> Session {
    if generation != session.generation || session.phase != Phase::Submitting {
        return session;
    }

    match session.pending.take() {
        Some(outcome) => apply_outcome(session, outcome),
        None => {
            session.phase = Phase::Waiting;
            session
        }
    }
}

fn response_received(mut session: Session, generation: u64, outcome: ServiceOutcome) -> Session {
    if generation != session.generation {
        return session;
    }

    match session.phase {
        Phase::Submitting => {
            session.pending = Some(outcome);
            session
        }
        Phase::Waiting => apply_outcome(session, outcome),
        Phase::Idle | Phase::Ready | Phase::Failed => session,
    }
}

fn apply_outcome(mut session: Session, outcome: ServiceOutcome) -> Session {
    session.pending = None;
    match outcome {
        ServiceOutcome::Delivered(recommendation) => {
            session.result = Some(recommendation);
            session.error = None;
            session.phase = Phase::Ready;
        }
        ServiceOutcome::Failed => {
            session.result = None;
            session.error = Some(RECOMMENDATION_FAILED_MESSAGE.to_string());
            session.phase = Phase::Failed;
        }
    }
    session
}

fn reset(session: Session) -> Session {
    Session {
        generation: session.generation + 1,
        ..Session::default()
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
