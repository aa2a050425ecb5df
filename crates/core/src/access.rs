//! Scoped single-writer / many-reader monitor for one document build.
//!
//! The borrow checker already keeps `&mut Document` and `&Document` apart; the
//! monitor covers the cases it cannot see, such as a read scope held by a
//! collaborator across a call that tries to mutate the tree.

use crate::error::TreeError;
use std::sync::Arc;
use std::sync::atomic::{AtomicIsize, Ordering};

const IDLE: isize = 0;
const WRITING: isize = -1;

#[derive(Debug, Clone, Default)]
pub struct AccessMonitor {
    state: Arc<AtomicIsize>,
}

impl AccessMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters the exclusive write scope. Fails if any other scope is active.
    pub fn begin_write(&self) -> Result<WriteScope, TreeError> {
        self.state
            .compare_exchange(IDLE, WRITING, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|current| {
                TreeError::AccessViolation(if current == WRITING {
                    "a compile pass is already running on this document".to_string()
                } else {
                    format!("cannot compile while {current} reader(s) are active")
                })
            })?;
        Ok(WriteScope {
            state: Arc::clone(&self.state),
        })
    }

    /// Enters a shared read scope. Fails while a write scope is active.
    pub fn begin_read(&self) -> Result<ReadScope, TreeError> {
        let mut current = self.state.load(Ordering::Acquire);
        loop {
            if current == WRITING {
                return Err(TreeError::AccessViolation(
                    "cannot read the tree while a compile pass is running".to_string(),
                ));
            }
            match self.state.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    return Ok(ReadScope {
                        state: Arc::clone(&self.state),
                    });
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Tree mutators call this; mutation is allowed when idle or inside the
    /// write scope, never while a reader is active.
    pub fn ensure_mutable(&self, operation: &str) -> Result<(), TreeError> {
        let current = self.state.load(Ordering::Acquire);
        if current > 0 {
            return Err(TreeError::AccessViolation(format!(
                "'{operation}' called while {current} reader(s) are active"
            )));
        }
        Ok(())
    }

    pub fn is_writing(&self) -> bool {
        self.state.load(Ordering::Acquire) == WRITING
    }

    pub fn readers(&self) -> usize {
        self.state.load(Ordering::Acquire).max(0) as usize
    }
}

/// Exclusive scope held for the duration of a compile pass.
#[derive(Debug)]
pub struct WriteScope {
    state: Arc<AtomicIsize>,
}

impl Drop for WriteScope {
    fn drop(&mut self) {
        self.state.store(IDLE, Ordering::Release);
    }
}

/// Shared scope held for the duration of a render pass.
#[derive(Debug)]
pub struct ReadScope {
    state: Arc<AtomicIsize>,
}

impl Drop for ReadScope {
    fn drop(&mut self) {
        self.state.fetch_sub(1, Ordering::AcqRel);
    }
}
