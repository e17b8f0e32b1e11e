use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

use crate::config::ConnectConfig;
use crate::driver::{NativeConnection, NativeDriver};
use crate::error::SqlRowStreamError;

/// Closed set of connection states with an explicit transition table.
///
/// ```text
/// Uninitialized -> Open -> Busy -> Open -> ... -> Closed
/// ```
///
/// `Closed` is terminal: no outgoing transitions. Any live state may
/// transition to `Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    /// Handle constructed without a native connect; permanently unusable
    /// except for `close`.
    Uninitialized,
    /// Native connection established, no result set in flight.
    Open,
    /// A row stream holds the connection; no other stream may read it.
    Busy,
    /// Physically closed. Terminal.
    Closed,
}

impl ConnState {
    /// The transition table. Everything not listed here is illegal and is
    /// refused (not panicked on) by the handle's transition methods.
    #[must_use]
    pub fn may_become(self, next: ConnState) -> bool {
        matches!(
            (self, next),
            (ConnState::Uninitialized, ConnState::Open)
                | (ConnState::Open, ConnState::Busy)
                | (ConnState::Busy, ConnState::Open)
                | (ConnState::Uninitialized, ConnState::Closed)
                | (ConnState::Open, ConnState::Closed)
                | (ConnState::Busy, ConnState::Closed)
        )
    }
}

struct ConnectionInner {
    native: RefCell<Option<Box<dyn NativeConnection>>>,
    state: Cell<ConnState>,
}

impl Drop for ConnectionInner {
    fn drop(&mut self) {
        // Last owning handle gone; physically close if still live.
        if self.state.get() != ConnState::Closed {
            self.state.set(ConnState::Closed);
            if self.native.borrow_mut().take().is_some() {
                debug!("native connection closed on last handle drop");
            }
        }
    }
}

/// Shared-ownership handle around a native database connection plus its
/// state flag.
///
/// `Clone` shares the same underlying connection; the native handle is
/// physically closed exactly once - on explicit [`close`](Self::close) or
/// when the last clone is dropped, whichever comes first.
///
/// The handle is deliberately `!Send`: the BUSY flag is a single-flight
/// guard valid only within one cooperative scheduler, not a cross-thread
/// mutex, and `Rc`/`Cell` hold that line at compile time.
#[derive(Clone)]
pub struct Connection {
    inner: Rc<ConnectionInner>,
}

impl Connection {
    /// Attempt the native connect through driver `D`.
    ///
    /// Host, user, password, and port come pre-parsed in `config`; TLS
    /// material, when present, is passed through to the driver as file
    /// paths.
    ///
    /// # Errors
    /// Returns [`SqlRowStreamError::ConnectionError`] carrying the
    /// driver's message if the connect fails; no usable handle is
    /// produced in that case.
    pub fn open<D: NativeDriver>(config: &ConnectConfig) -> Result<Self, SqlRowStreamError> {
        let native = D::connect(config).map_err(SqlRowStreamError::ConnectionError)?;
        debug!(dbname = %config.dbname, host = %config.host, "native connection opened");
        Ok(Self {
            inner: Rc::new(ConnectionInner {
                native: RefCell::new(Some(native)),
                state: Cell::new(ConnState::Open),
            }),
        })
    }

    /// A handle that was never opened. Every exec against it fails with
    /// `ClosedConnection`; `close` is a no-op.
    #[must_use]
    pub fn unopened() -> Self {
        Self {
            inner: Rc::new(ConnectionInner {
                native: RefCell::new(None),
                state: Cell::new(ConnState::Uninitialized),
            }),
        }
    }

    /// Current state flag.
    #[must_use]
    pub fn state(&self) -> ConnState {
        self.inner.state.get()
    }

    /// True unless the connection is live (`Open` or `Busy`). A
    /// never-opened handle reports closed, matching the exec
    /// precondition that rejects both.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        !matches!(self.state(), ConnState::Open | ConnState::Busy)
    }

    /// True while a row stream holds the connection.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.state() == ConnState::Busy
    }

    /// Try to take the single-flight guard. Succeeds only from `Open`.
    pub(crate) fn try_mark_busy(&self) -> bool {
        self.transition(ConnState::Busy)
    }

    /// Clear the single-flight guard. A no-op unless currently `Busy`.
    pub(crate) fn release(&self) {
        self.transition(ConnState::Open);
    }

    /// Close the connection and dispose the native handle. Idempotent,
    /// and the only operation permitted once closed. Once closed, the
    /// state never transitions again.
    pub fn close(&self) {
        let state = self.inner.state.get();
        if state == ConnState::Closed {
            return;
        }
        self.inner.state.set(ConnState::Closed);
        if self.inner.native.borrow_mut().take().is_some() {
            debug!("native connection closed");
        }
    }

    /// Apply a transition if the table allows it; report whether it took.
    fn transition(&self, next: ConnState) -> bool {
        let state = self.inner.state.get();
        if state.may_become(next) {
            self.inner.state.set(next);
            true
        } else {
            false
        }
    }

    /// Test-only: set the state flag directly, bypassing the table, so
    /// flag behavior can be exercised without a native driver.
    #[cfg(test)]
    pub(crate) fn force_state_for_tests(&self, state: ConnState) {
        self.inner.state.set(state);
    }

    /// Run `f` against the native connection, failing if there is none.
    pub(crate) fn with_native<R>(
        &self,
        f: impl FnOnce(&mut dyn NativeConnection) -> R,
    ) -> Result<R, SqlRowStreamError> {
        let mut guard = self.inner.native.borrow_mut();
        match guard.as_mut() {
            Some(native) => Ok(f(native.as_mut())),
            None => Err(SqlRowStreamError::ClosedConnection(
                "no native connection".to_string(),
            )),
        }
    }
}
