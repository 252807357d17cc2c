//! The owning statement a cursor was produced by.
//!
//! The cursor depends on nothing but the open/closed state of its statement;
//! everything else about statement execution lives outside the engine.

use crate::error::Result;

/// Handle to the statement that owns a result set.
pub trait Statement {
    /// Whether the statement has been closed.
    fn is_closed(&self) -> bool;

    /// Close the statement. Closing an already-closed statement must be a no-op.
    fn close(&mut self) -> Result<()>;
}

/// In-memory statement handle with an open/closed flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatementHandle {
    closed: bool,
}

impl StatementHandle {
    /// Create an open handle.
    pub fn new() -> Self {
        Self { closed: false }
    }
}

impl Statement for StatementHandle {
    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self) -> Result<()> {
        if !self.closed {
            tracing::debug!("closing statement");
            self.closed = true;
        }
        Ok(())
    }
}

impl<S: Statement + ?Sized> Statement for Box<S> {
    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}
