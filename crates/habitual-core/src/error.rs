use thiserror::Error;

/// Top-level error type for Habitual.
#[derive(Debug, Error)]
pub enum BotError {
    /// A state tag was requested that nothing registered a constructor for.
    #[error("unknown state: {0}")]
    UnknownState(String),

    /// Field-level input rejection. The message is user-facing and localized.
    #[error("validation failed: {0}")]
    ValidationFailed(String),

    /// Two suspended states share a tag.
    #[error("duplicate suspension: {0}")]
    DuplicateSuspension(String),

    /// Too many consecutive immediate re-dispatches of one event.
    #[error("immediate handle hop limit exceeded at state {0}")]
    HopLimitExceeded(String),

    /// Error from the messaging gateway.
    #[error("delivery failed: {0}")]
    Delivery(#[from] DeliveryError),

    /// The backend service failed or could not be reached.
    #[error("collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures reported by a messaging gateway for a single call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The message to edit no longer exists.
    #[error("message not found")]
    NotFound,

    /// The edit would not change the message content.
    #[error("message not modified")]
    NotModified,

    /// Anything else (network, rate limit, permissions, ...).
    #[error("{0}")]
    Other(String),
}

impl BotError {
    /// Whether this error is surfaced to the end user instead of being logged.
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Self::ValidationFailed(_))
    }
}
