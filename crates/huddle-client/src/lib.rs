//! Client-side session bootstrap for Huddle.
//!
//! Fetches a chat token from the Huddle API once an identity is signed in,
//! connects to the chat provider, joins the shared `everyone` channel and
//! loads the directory of other users. The chat transport itself sits behind
//! [`ChatConnection`] and is supplied by the embedding application.

pub mod backend;
pub mod connection;
pub mod error;
pub mod session;

pub use backend::{HttpBackend, SessionBackend};
pub use connection::{ChannelSpec, ChatConnection};
pub use error::ClientError;
pub use session::{Bootstrap, Session, SessionState};
