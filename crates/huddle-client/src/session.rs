use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use huddle_types::models::{ChatUser, IdentityUser};

use crate::backend::SessionBackend;
use crate::connection::{ChannelSpec, ChatConnection};
use crate::error::ClientError;

/// What a signed-in client currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub user: ChatUser,
    pub token: String,
    pub active_channel: ChannelSpec,
    /// Directory users other than `user`.
    pub other_users: Vec<ChatUser>,
}

/// Outcome of [`Session::bootstrap`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bootstrap {
    Ready(SessionState),
    /// A newer bootstrap or a sign-out started while this one was in flight;
    /// its results were dropped.
    Superseded,
}

/// One client's chat session.
///
/// Every bootstrap or sign-out bumps `generation`. Results of an in-flight
/// bootstrap are only written while its generation is still current, so a
/// slow response for a previous identity can never overwrite a newer one.
/// `link` serializes everything that touches the connection, so a bootstrap
/// that loses its generation while connecting disconnects before anyone else
/// connects.
pub struct Session<B, C> {
    backend: B,
    connection: C,
    generation: AtomicU64,
    link: Mutex<()>,
    state: RwLock<Option<SessionState>>,
}

impl<B, C> Session<B, C>
where
    B: SessionBackend,
    C: ChatConnection,
{
    pub fn new(backend: B, connection: C) -> Self {
        Self {
            backend,
            connection,
            generation: AtomicU64::new(0),
            link: Mutex::new(()),
            state: RwLock::new(None),
        }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    /// Snapshot of the current session, if any.
    pub async fn state(&self) -> Option<SessionState> {
        self.state.read().await.clone()
    }

    /// Sign `identity` in: token, connect, join `everyone`, load the directory.
    ///
    /// A session that is already signed in is disconnected before the new
    /// identity connects.
    pub async fn bootstrap(&self, identity: &IdentityUser) -> Result<Bootstrap, ClientError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let user = ChatUser::from(identity);
        debug!(user_id = %user.id, generation, "Bootstrapping chat session");

        let token = self.backend.stream_token(&user.id).await?;

        let link = self.link.lock().await;
        if !self.is_current(generation) {
            return Ok(self.superseded(generation));
        }

        let previous = self.state.write().await.take();
        if let Some(previous) = previous {
            debug!(user_id = %previous.user.id, "Disconnecting previous session");
            self.release_connection().await;
        }

        self.connection.connect(&user, &token).await?;
        if !self.is_current(generation) {
            return Ok(self.abandon(generation).await);
        }

        let everyone = ChannelSpec::everyone();
        if let Err(e) = self.connection.watch(&everyone).await {
            self.release_connection().await;
            return Err(e);
        }

        let published = self
            .publish(generation, |slot| {
                *slot = Some(SessionState {
                    user: user.clone(),
                    token,
                    active_channel: everyone,
                    other_users: Vec::new(),
                });
            })
            .await;
        if !published {
            return Ok(self.abandon(generation).await);
        }
        drop(link);

        // A directory failure leaves the session usable with an empty list.
        let others: Vec<ChatUser> = match self.backend.users().await {
            Ok(users) => users.into_iter().filter(|u| u.id != user.id).collect(),
            Err(e) => {
                warn!(error = %e, "Failed to load user directory");
                Vec::new()
            }
        };

        let mut snapshot = None;
        let published = self
            .publish(generation, |slot| {
                if let Some(state) = slot.as_mut() {
                    state.other_users = others;
                    snapshot = Some(state.clone());
                }
            })
            .await;

        match snapshot {
            Some(state) if published => {
                info!(user_id = %state.user.id, others = state.other_users.len(), "Chat session ready");
                Ok(Bootstrap::Ready(state))
            }
            _ => Ok(self.superseded(generation)),
        }
    }

    /// Open (creating if needed) the 1-on-1 channel with `other` and make it active.
    pub async fn open_direct(&self, other: &ChatUser) -> Result<ChannelSpec, ClientError> {
        let generation = self.generation.load(Ordering::SeqCst);
        let me = self
            .state
            .read()
            .await
            .as_ref()
            .map(|s| s.user.id.clone())
            .ok_or(ClientError::NotSignedIn)?;

        let channel = ChannelSpec::direct(&me, other);
        self.connection.watch(&channel).await?;

        let published = self
            .publish(generation, |slot| {
                if let Some(state) = slot.as_mut() {
                    state.active_channel = channel.clone();
                }
            })
            .await;
        if !published {
            return Err(ClientError::NotSignedIn);
        }

        debug!(channel_id = %channel.id, "Opened direct channel");
        Ok(channel)
    }

    /// Drop the session and invalidate anything still in flight.
    pub async fn sign_out(&self) -> Result<(), ClientError> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        let _link = self.link.lock().await;
        let had_session = self.state.write().await.take().is_some();
        if had_session {
            self.connection.disconnect().await?;
        }
        Ok(())
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Apply `update` under the write lock if `generation` is still current.
    async fn publish<F>(&self, generation: u64, update: F) -> bool
    where
        F: FnOnce(&mut Option<SessionState>),
    {
        let mut slot = self.state.write().await;
        if !self.is_current(generation) {
            return false;
        }
        update(&mut slot);
        true
    }

    /// Undo a connection made by a bootstrap that lost its generation.
    async fn abandon(&self, generation: u64) -> Bootstrap {
        self.release_connection().await;
        self.superseded(generation)
    }

    async fn release_connection(&self) {
        if let Err(e) = self.connection.disconnect().await {
            warn!(error = %e, "Failed to disconnect chat connection");
        }
    }

    fn superseded(&self, generation: u64) -> Bootstrap {
        debug!(generation, "Discarding superseded session bootstrap");
        Bootstrap::Superseded
    }
}
