//! Cooperative cancellation for installation runs
//!
//! The token is checked at stage and item granularity, never mid-item: the
//! operation being delegated (a clone, a pip install) runs to completion
//! before the cancellation is observed.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Result, StackforgeError};

/// Shared cancellation flag, cloneable across threads
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; observed at the next stage or item boundary
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Short-circuit helper for pipeline code
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(StackforgeError::Cancelled)
        } else {
            Ok(())
        }
    }
}
