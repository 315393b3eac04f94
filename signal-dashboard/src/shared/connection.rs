//! Connection lifecycle for the backend stream.
//!
//! [`ConnectionMachine`] holds the state and the single reconnect timer slot.
//! It performs no IO: the websocket task feeds it transport events and obeys
//! the returned [`Reconnect`] instructions.

use std::time::Duration;

/// Reconnect delay after every close
pub const DEFAULT_RECONNECT_DELAY: Duration = Duration::from_millis(1500);

/// Connection status shown by the status indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Connecting,
    Connected,
    Disconnected,
}

impl ConnectionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
        }
    }
}

impl std::fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Instruction to arm the reconnect timer once
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconnect {
    pub after: Duration,
}

#[derive(Debug, Clone)]
pub struct ConnectionMachine {
    state: ConnectionState,
    reconnect_delay: Duration,
    reconnect_pending: bool,
    attempts: u64,
}

impl Default for ConnectionMachine {
    fn default() -> Self {
        Self::new(DEFAULT_RECONNECT_DELAY)
    }
}

impl ConnectionMachine {
    pub fn new(reconnect_delay: Duration) -> Self {
        Self {
            state: ConnectionState::Connecting,
            reconnect_delay,
            reconnect_pending: false,
            attempts: 0,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Number of connection attempts started so far
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    pub fn reconnect_pending(&self) -> bool {
        self.reconnect_pending
    }

    /// A connection attempt starts; consumes the pending timer if any.
    pub fn connect(&mut self) -> ConnectionState {
        self.reconnect_pending = false;
        self.attempts += 1;
        self.transition(ConnectionState::Connecting)
    }

    pub fn on_open(&mut self) -> ConnectionState {
        self.transition(ConnectionState::Connected)
    }

    /// Transport error. A close always follows, so no timer is armed here.
    pub fn on_error(&mut self) -> ConnectionState {
        self.transition(ConnectionState::Disconnected)
    }

    /// Connection closed for any reason. Arms the reconnect timer unless one
    /// is already pending.
    pub fn on_close(&mut self) -> Option<Reconnect> {
        self.transition(ConnectionState::Disconnected);

        if self.reconnect_pending {
            return None;
        }
        self.reconnect_pending = true;
        Some(Reconnect {
            after: self.reconnect_delay,
        })
    }

    fn transition(&mut self, next: ConnectionState) -> ConnectionState {
        self.state = next;
        next
    }
}
