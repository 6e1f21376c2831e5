//! Cooperative cancellation for conversion and compilation calls
//!
//! Every conversion and compile operation threads a [`Context`] through its
//! recursion and checks it when entering each nested element or attribute, so
//! cancellation latency is bounded by tree shape rather than total work.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{AttrError, Result};

/// Caller-owned context threaded through every conversion and compile call.
///
/// A background context never cancels. A cancellable context observes the
/// flag held by its paired [`CancelHandle`]; once cancelled it stays
/// cancelled. Cloning shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancel: Option<Arc<AtomicBool>>,
}

impl Context {
    /// A context that is never cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context paired with a handle that can cancel it.
    pub fn cancellable() -> (Self, CancelHandle) {
        let flag = Arc::new(AtomicBool::new(false));
        (
            Self {
                cancel: Some(Arc::clone(&flag)),
            },
            CancelHandle { flag },
        )
    }

    /// Whether the paired handle has cancelled this context.
    pub fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Fails with [`AttrError::Cancelled`] once the context is cancelled.
    ///
    /// Called at every recursion boundary in the conversion engine and the
    /// schema compiler.
    pub(crate) fn ensure_active(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(AttrError::Cancelled);
        }
        Ok(())
    }
}

/// Cancels the [`Context`] it was created with.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    /// Cancel the paired context. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }
}
