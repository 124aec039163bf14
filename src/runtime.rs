//! Runtime for driving a session
//!
//! One task owns the session state and transcript. User actions and service
//! results arrive as events on a channel; network effects run as background
//! tasks that post their outcome back as another event.

mod executor;
pub mod traits;


pub use executor::SessionRuntime;
pub use traits::*;

use crate::document::Document;
use crate::state_machine::{Event, Readiness, SessionState, TransitionError};
use crate::transcript::{Entry, Transcript};
use tokio::sync::{broadcast, mpsc, watch};

/// Updates sent to observers of a session
#[derive(Debug, Clone)]
pub enum SessionUpdate {
    TurnAppended { entry: Entry },
    /// Carries the snapshot taken after the transition, already published
    /// on the watch channel when this is sent
    StateChange { view: Box<SessionView> },
    InputCleared,
    /// Needs a blocking acknowledgment from the user
    Alert { message: String },
    /// An action was refused; nothing changed
    Rejected { reason: TransitionError },
}

/// Snapshot of everything the presentation layer needs
#[derive(Debug, Clone)]
pub struct SessionView {
    pub session_id: String,
    pub state: &'static str,
    pub readiness: Readiness,
    pub upload_in_flight: bool,
    pub awaiting_answer: bool,
    /// Show the transient "thinking" indicator. Derived, never a turn.
    pub thinking: bool,
    pub can_submit: bool,
    pub can_ask: bool,
    pub pending_document: Option<String>,
    pub transcript: Vec<Entry>,
}

impl SessionView {
    pub fn new(session_id: &str, state: &SessionState, transcript: &Transcript) -> Self {
        Self {
            session_id: session_id.to_string(),
            state: state.name(),
            readiness: state.readiness(),
            upload_in_flight: state.upload_in_flight(),
            awaiting_answer: state.awaiting_answer(),
            thinking: state.awaiting_answer(),
            can_submit: state.can_submit(),
            can_ask: state.can_ask(),
            pending_document: state.pending_document().map(|d| d.file_name().to_string()),
            transcript: transcript.entries().to_vec(),
        }
    }
}

/// Handle to interact with a running session
#[derive(Clone)]
pub struct SessionHandle {
    session_id: String,
    event_tx: mpsc::Sender<Event>,
    broadcast_tx: broadcast::Sender<SessionUpdate>,
    view_rx: watch::Receiver<SessionView>,
}

impl SessionHandle {
    /// Start a session runtime in the background
    pub fn spawn<I, A>(ingestion: I, answers: A) -> Self
    where
        I: IngestionService + 'static,
        A: AnswerService + 'static,
    {
        let session_id = uuid::Uuid::new_v4().to_string();
        let (event_tx, event_rx) = mpsc::channel(32);
        let (broadcast_tx, _) = broadcast::channel(128);

        let runtime = SessionRuntime::new(
            session_id.clone(),
            ingestion,
            answers,
            event_rx,
            &event_tx,
            broadcast_tx.clone(),
        );
        let view_rx = runtime.view();

        let id = session_id.clone();
        tokio::spawn(async move {
            runtime.run().await;
            tracing::info!(session_id = %id, "Session runtime finished");
        });

        Self {
            session_id,
            event_tx,
            broadcast_tx,
            view_rx,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub async fn select_document(&self, document: Document) -> Result<(), String> {
        self.send(Event::DocumentSelected { document }).await
    }

    pub async fn submit(&self) -> Result<(), String> {
        self.send(Event::SubmitDocument).await
    }

    pub async fn ask(&self, text: impl Into<String>) -> Result<(), String> {
        self.send(Event::UserQuestion { text: text.into() }).await
    }

    /// Subscribe to session updates
    pub fn subscribe(&self) -> broadcast::Receiver<SessionUpdate> {
        self.broadcast_tx.subscribe()
    }

    /// Latest snapshot
    pub fn view(&self) -> SessionView {
        self.view_rx.borrow().clone()
    }

    /// Receiver that wakes whenever a new snapshot is published
    #[allow(dead_code)] // Used by tests
    pub fn watch(&self) -> watch::Receiver<SessionView> {
        self.view_rx.clone()
    }

    async fn send(&self, event: Event) -> Result<(), String> {
        self.event_tx
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {e}"))
    }
}
