//! Error taxonomy for generation and persistence.
//!
//! Display strings are the user-facing messages (French, matching the
//! frontend wording); diagnostic detail is carried in fields and logged at
//! the call site rather than shown to the user.

/// Errors produced while generating exercises, from topic validation through
/// the remote text-generation call and parsing.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The submitted topic was empty or whitespace-only.
    #[error("Veuillez entrer un sujet.")]
    EmptyTopic,

    /// The generation endpoint rejected our credential (401/403).
    #[error("Clé API incorrecte ou manquante.")]
    Auth,

    /// The generation endpoint reported throttling (429).
    #[error("Vous avez dépassé la limite de requêtes.")]
    RateLimited,

    /// Connectivity failure before a response was obtained.
    #[error("Problème de connexion. Veuillez vérifier votre réseau.")]
    Network(String),

    /// Any other non-success status or an unreadable response body.
    #[error("Une erreur s'est produite. Veuillez réessayer.")]
    UnexpectedResponse { status: Option<u16>, detail: String },

    /// The response text contained no well-formed exercise fragment.
    /// This is a user-visible outcome, not an empty success.
    #[error("Aucun exercice trouvé dans la réponse. Veuillez réessayer.")]
    NoExercisesFound,
}

/// Errors from the remote exercise table.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("transport failure talking to the store: {0}")]
    Transport(String),

    #[error("store returned HTTP {status}: {detail}")]
    Status { status: u16, detail: String },

    #[error("could not decode store response: {0}")]
    Decode(String),
}
