//! Session runtime executor

use super::traits::{AnswerService, IngestionService};
use super::{SessionUpdate, SessionView};
use crate::state_machine::{transition, Effect, Event, SessionState};
use crate::transcript::Transcript;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};

/// Generic session runtime that can work with any service implementations
pub struct SessionRuntime<I, A>
where
    I: IngestionService + 'static,
    A: AnswerService + 'static,
{
    session_id: String,
    state: SessionState,
    transcript: Transcript,
    ingestion: Arc<I>,
    answers: Arc<A>,
    event_rx: mpsc::Receiver<Event>,
    /// Weak so the loop ends once every handle and in-flight request is gone
    event_tx: mpsc::WeakSender<Event>,
    broadcast_tx: broadcast::Sender<SessionUpdate>,
    view_tx: watch::Sender<SessionView>,
}

impl<I, A> SessionRuntime<I, A>
where
    I: IngestionService + 'static,
    A: AnswerService + 'static,
{
    pub fn new(
        session_id: String,
        ingestion: I,
        answers: A,
        event_rx: mpsc::Receiver<Event>,
        event_tx: &mpsc::Sender<Event>,
        broadcast_tx: broadcast::Sender<SessionUpdate>,
    ) -> Self {
        let state = SessionState::default();
        let transcript = Transcript::new();
        let (view_tx, _) = watch::channel(SessionView::new(&session_id, &state, &transcript));
        Self {
            session_id,
            state,
            transcript,
            ingestion: Arc::new(ingestion),
            answers: Arc::new(answers),
            event_rx,
            event_tx: event_tx.downgrade(),
            broadcast_tx,
            view_tx,
        }
    }

    /// Receiver for view snapshots
    pub fn view(&self) -> watch::Receiver<SessionView> {
        self.view_tx.subscribe()
    }

    pub async fn run(mut self) {
        tracing::info!(session_id = %self.session_id, "Starting session runtime");

        while let Some(event) = self.event_rx.recv().await {
            self.process_event(event);
        }

        tracing::info!(session_id = %self.session_id, "Session runtime stopped");
    }

    fn process_event(&mut self, event: Event) {
        let event_name = event.name();

        // Pure state transition
        let result = match transition(&self.state, event) {
            Ok(r) => r,
            Err(reason) => {
                tracing::debug!(
                    session_id = %self.session_id,
                    event = event_name,
                    state = self.state.name(),
                    %reason,
                    "Event rejected"
                );
                let _ = self.broadcast_tx.send(SessionUpdate::Rejected { reason });
                return;
            }
        };

        tracing::debug!(
            session_id = %self.session_id,
            event = event_name,
            from = self.state.name(),
            to = result.new_state.name(),
            "Transition"
        );
        self.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect);
        }

        self.publish_view();
    }

    fn publish_view(&self) -> SessionView {
        let view = SessionView::new(&self.session_id, &self.state, &self.transcript);
        self.view_tx.send_replace(view.clone());
        view
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::AppendTurn { turn } => {
                let entry = self.transcript.append(turn).clone();
                tracing::debug!(
                    session_id = %self.session_id,
                    index = entry.index,
                    turns = self.transcript.len(),
                    "Turn appended"
                );
                let _ = self.broadcast_tx.send(SessionUpdate::TurnAppended { entry });
            }

            Effect::ClearInput => {
                let _ = self.broadcast_tx.send(SessionUpdate::InputCleared);
            }

            Effect::Alert { message } => {
                tracing::warn!(session_id = %self.session_id, %message, "Alerting user");
                let _ = self.broadcast_tx.send(SessionUpdate::Alert { message });
            }

            Effect::NotifyStateChange => {
                // Observers reading the watch channel on this update must see the new state
                let view = self.publish_view();
                let _ = self.broadcast_tx.send(SessionUpdate::StateChange {
                    view: Box::new(view),
                });
            }

            Effect::RequestIngestion { document } => {
                let Some(event_tx) = self.event_tx.upgrade() else {
                    tracing::debug!(
                        session_id = %self.session_id,
                        "Session closing, upload not sent"
                    );
                    return;
                };
                let ingestion = self.ingestion.clone();
                let session_id = self.session_id.clone();

                tokio::spawn(async move {
                    tracing::info!(
                        session_id = %session_id,
                        file = %document.file_name(),
                        "Uploading document (background)"
                    );
                    let event = match ingestion.ingest(&document).await {
                        Ok(receipt) => Event::IngestSucceeded { receipt },
                        Err(error) => Event::IngestFailed { error },
                    };
                    if event_tx.send(event).await.is_err() {
                        tracing::debug!(session_id = %session_id, "Session gone before upload finished");
                    }
                });
            }

            Effect::RequestAnswer { question } => {
                let Some(event_tx) = self.event_tx.upgrade() else {
                    tracing::debug!(
                        session_id = %self.session_id,
                        "Session closing, question not sent"
                    );
                    return;
                };
                let answers = self.answers.clone();
                let session_id = self.session_id.clone();

                tokio::spawn(async move {
                    tracing::info!(session_id = %session_id, "Asking question (background)");
                    let event = match answers.answer(&question).await {
                        Ok(answer) => Event::AnswerReceived { answer },
                        Err(error) => Event::AnswerFailed { error },
                    };
                    if event_tx.send(event).await.is_err() {
                        tracing::debug!(session_id = %session_id, "Session gone before answer arrived");
                    }
                });
            }
        }
    }
}
