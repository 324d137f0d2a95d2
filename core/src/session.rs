//! Connection lifecycle shared by the blocking and async clients.
//!
//! A client moves through `Uninitialized → Open → Closed` exactly once. The
//! connection object is created on first use (or by an explicit `open`) and
//! handed out as a cheap clone to every call until the client is closed.
//! Re-opening a closed client is not supported.
//!
//! The lock only guards the state transition and is never held while a
//! request is in flight, so a dropped or cancelled call leaves the state
//! untouched.

use std::sync::{Mutex, MutexGuard, PoisonError};

use log::info;

use crate::error::{ApiError, Result};

/// Observable lifecycle state of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Open,
    Closed,
}

enum State<C> {
    Uninitialized,
    Open(C),
    Closed,
}

/// Holds at most one connection object `C` for the lifetime of a client.
pub struct Session<C> {
    label: &'static str,
    state: Mutex<State<C>>,
}

impl<C: Clone> Session<C> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            state: Mutex::new(State::Uninitialized),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State<C>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The open connection, creating it with `connect` on first use.
    pub fn acquire(&self, connect: impl FnOnce() -> Result<C>) -> Result<C> {
        let mut state = self.lock();
        match &*state {
            State::Open(conn) => Ok(conn.clone()),
            State::Closed => Err(ApiError::ClientClosed.into()),
            State::Uninitialized => {
                let conn = connect()?;
                info!("{} connection opened", self.label);
                *state = State::Open(conn.clone());
                Ok(conn)
            }
        }
    }

    /// Release the connection. Closing twice is a no-op.
    pub fn close(&self) {
        let mut state = self.lock();
        if matches!(*state, State::Open(_)) {
            info!("{} connection closed", self.label);
        }
        *state = State::Closed;
    }

    pub fn state(&self) -> SessionState {
        match &*self.lock() {
            State::Uninitialized => SessionState::Uninitialized,
            State::Open(_) => SessionState::Open,
            State::Closed => SessionState::Closed,
        }
    }
}

impl<C> std::fmt::Debug for Session<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &*self.state.lock().unwrap_or_else(PoisonError::into_inner) {
            State::Uninitialized => "uninitialized",
            State::Open(_) => "open",
            State::Closed => "closed",
        };
        f.debug_struct("Session")
            .field("label", &self.label)
            .field("state", &state)
            .finish()
    }
}
