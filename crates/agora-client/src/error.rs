//! Error types for the interaction client.

/// Errors a client request can end in.
///
/// Every variant is treated the same by the reconciler: the card reverts
/// to its last confirmed state and shows the message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response (connection, timeout, TLS).
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with an error status.
    #[error("server returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// The `error` field of the response body.
        message: String,
    },

    /// The response body could not be decoded.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),
}
