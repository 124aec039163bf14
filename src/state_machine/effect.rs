//! Effects produced by state transitions

use crate::document::Document;
use crate::transcript::Turn;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Commit a turn to the transcript
    AppendTurn { turn: Turn },

    /// Empty the question input
    ClearInput,

    /// Send the document to the ingestion service (spawns as background task)
    RequestIngestion { document: Document },

    /// Send a question to the answering service (spawns as background task)
    RequestAnswer { question: String },

    /// Show a message the user must acknowledge
    Alert { message: String },

    /// Publish the new state to observers
    NotifyStateChange,
}

impl Effect {
    pub fn user_turn(content: impl Into<String>) -> Self {
        Effect::AppendTurn {
            turn: Turn::user(content),
        }
    }

    pub fn assistant_turn(content: impl Into<String>) -> Self {
        Effect::AppendTurn {
            turn: Turn::assistant(content),
        }
    }

    pub fn alert(message: impl Into<String>) -> Self {
        Effect::Alert {
            message: message.into(),
        }
    }
}
