//! Client side of Agora post interactions.
//!
//! - [`reconciler`] -- sans-IO optimistic state per post card
//! - [`transport`] -- the [`InteractionTransport`] seam and its `reqwest`
//!   implementation
//! - [`config`] -- API URL and token from the environment
//! - [`error`] -- [`ClientError`]
//!
//! ```no_run
//! # async fn demo(post: agora_types::PostId) -> Result<(), agora_client::ClientError> {
//! use agora_client::{ClientConfig, ClientReconciler, HttpTransport};
//! use agora_types::NamedAction;
//!
//! let transport = HttpTransport::new(ClientConfig::from_env()?);
//! let mut cards = ClientReconciler::new();
//! cards.load(&transport, post).await?;
//! let view = cards.dispatch(&transport, post, NamedAction::Upvote).await;
//! # let _ = view;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod reconciler;
pub mod transport;

pub use config::ClientConfig;
pub use error::ClientError;
pub use reconciler::{CardState, CardView, ClientReconciler, Ticket};
pub use transport::{HttpTransport, InteractionTransport};
