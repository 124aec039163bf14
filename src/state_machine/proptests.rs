//! Property-based tests for the session state machine
//!
//! These drive random event sequences through `transition`, committing
//! `AppendTurn` effects to a real transcript, and check the invariants hold
//! after every step.

use super::transition::*;
use super::*;
use crate::document::Document;
use crate::service::{IngestReceipt, ServiceError};
use crate::transcript::{Author, Transcript, APOLOGY, GREETING};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

/// Applies events the way the runtime does: rejected events change nothing
struct Harness {
    state: SessionState,
    transcript: Transcript,
    requests_sent: usize,
}

impl Harness {
    fn new() -> Self {
        Self {
            state: SessionState::Unready,
            transcript: Transcript::new(),
            requests_sent: 0,
        }
    }

    fn apply(&mut self, event: Event) -> Result<Vec<Effect>, TransitionError> {
        let result = transition(&self.state, event)?;
        self.state = result.new_state;
        for effect in &result.effects {
            match effect {
                Effect::AppendTurn { turn } => {
                    self.transcript.append(turn.clone());
                }
                Effect::RequestIngestion { .. } | Effect::RequestAnswer { .. } => {
                    self.requests_sent += 1;
                }
                _ => {}
            }
        }
        Ok(result.effects)
    }
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_document() -> impl Strategy<Value = Document> {
    ("[a-z]{1,8}", proptest::collection::vec(any::<u8>(), 0..16))
        .prop_map(|(stem, bytes)| Document::new(format!("{stem}.pdf"), bytes))
}

fn arb_service_error() -> impl Strategy<Value = ServiceError> {
    prop_oneof![
        "[a-z ]{1,20}".prop_map(ServiceError::network),
        (400u16..600, "[a-z ]{1,20}").prop_map(|(code, msg)| ServiceError::status(code, msg)),
        "[a-z ]{1,20}".prop_map(ServiceError::malformed),
    ]
}

fn arb_question() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z?]{1,10}( [a-zA-Z?]{1,10}){0,4}",
        "[ \t\n]{0,4}",
    ]
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        arb_document().prop_map(|document| Event::DocumentSelected { document }),
        Just(Event::SubmitDocument),
        arb_question().prop_map(|text| Event::UserQuestion { text }),
        Just(Event::IngestSucceeded {
            receipt: IngestReceipt::default()
        }),
        arb_service_error().prop_map(|error| Event::IngestFailed { error }),
        "[a-zA-Z .]{0,30}".prop_map(|answer| Event::AnswerReceived { answer }),
        arb_service_error().prop_map(|error| Event::AnswerFailed { error }),
    ]
}

fn authors_alternate(transcript: &Transcript) -> bool {
    transcript
        .turns()
        .skip(1)
        .zip(transcript.turns().skip(2))
        .all(|(a, b)| a.author != b.author)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Readiness only ever moves Unready -> Ready
    #[test]
    fn prop_readiness_is_monotonic(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut h = Harness::new();
        let mut was_ready = false;
        for event in events {
            let _ = h.apply(event);
            let ready = h.state.readiness() == Readiness::Ready;
            prop_assert!(!was_ready || ready, "readiness reverted in {:?}", h.state);
            was_ready = ready;
        }
    }

    // Readiness is gained only by a successful ingestion
    #[test]
    fn prop_ready_only_via_ingest_success(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut h = Harness::new();
        for event in events {
            let before = h.state.readiness();
            let is_success = matches!(event, Event::IngestSucceeded { .. });
            let _ = h.apply(event);
            if before == Readiness::Unready && h.state.readiness() == Readiness::Ready {
                prop_assert!(is_success);
            }
        }
    }

    // After the greeting, authors strictly alternate starting with the user
    // (the upload confirmation is the single assistant turn preceding the first question)
    #[test]
    fn prop_transcript_alternates(events in proptest::collection::vec(arb_event(), 0..60)) {
        let mut h = Harness::new();
        for event in events {
            let _ = h.apply(event);
            prop_assert!(authors_alternate(&h.transcript), "{:?}", h.transcript);
            if !h.state.awaiting_answer() {
                prop_assert_ne!(h.transcript.last().map(|t| t.author), Some(Author::User));
            }
        }
        prop_assert_eq!(&h.transcript.entries()[0].turn.content, GREETING);
    }

    // A second request of the same kind is rejected while the latch is set
    #[test]
    fn prop_latches_reject_not_queue(
        events in proptest::collection::vec(arb_event(), 0..40),
        text in "[a-z]{1,10}",
    ) {
        let mut h = Harness::new();
        for event in events {
            let _ = h.apply(event);

            if h.state.upload_in_flight() {
                let before = h.state.clone();
                prop_assert_eq!(transition(&before, Event::SubmitDocument).unwrap_err(), TransitionError::UploadInFlight);
            }
            if h.state.awaiting_answer() {
                let before = h.state.clone();
                let err = transition(&before, Event::UserQuestion { text: text.clone() }).unwrap_err();
                prop_assert_eq!(err, TransitionError::AwaitingAnswer);
            }
        }
    }

    // A blank question never changes anything
    #[test]
    fn prop_blank_question_is_noop(
        events in proptest::collection::vec(arb_event(), 0..30),
        blank in "[ \t\r\n]{0,6}",
    ) {
        let mut h = Harness::new();
        for event in events {
            let _ = h.apply(event);
        }
        let state = h.state.clone();
        let len = h.transcript.len();
        let sent = h.requests_sent;

        prop_assert_eq!(h.apply(Event::UserQuestion { text: blank }).unwrap_err(), TransitionError::EmptyQuestion);
        prop_assert_eq!(&h.state, &state);
        prop_assert_eq!(h.transcript.len(), len);
        prop_assert_eq!(h.requests_sent, sent);
    }

    // Every failed exchange yields exactly one apology and clears the latch
    #[test]
    fn prop_failed_answer_appends_one_apology(
        question in "[a-z]{1,10}",
        error in arb_service_error(),
    ) {
        let mut h = Harness::new();
        h.state = SessionState::Ready;
        h.apply(Event::UserQuestion { text: question }).unwrap();
        let len = h.transcript.len();

        h.apply(Event::AnswerFailed { error }).unwrap();
        prop_assert_eq!(h.transcript.len(), len + 1);
        prop_assert_eq!(h.transcript.last().map(|t| t.content.as_str()), Some(APOLOGY));
        prop_assert!(!h.state.awaiting_answer());
    }

    // Rejected events never touch the state
    #[test]
    fn prop_rejection_preserves_state(events in proptest::collection::vec(arb_event(), 0..40)) {
        let mut h = Harness::new();
        for event in events {
            let before = h.state.clone();
            let len = h.transcript.len();
            if h.apply(event).is_err() {
                prop_assert_eq!(&h.state, &before);
                prop_assert_eq!(h.transcript.len(), len);
            }
        }
    }
}
