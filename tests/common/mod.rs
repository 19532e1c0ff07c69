//! Common test utilities for integration tests.

#![allow(dead_code)]

pub mod harness;

use slint_block_editor::BlockId;
use std::cell::RefCell;
use std::rc::Rc;

/// Records which block operations ran, in order.
#[derive(Default, Clone)]
pub struct CallbackTracker {
    /// Blocks whose operation ran successfully
    pub ran: Rc<RefCell<Vec<BlockId>>>,
    /// Blocks whose operation returned an error
    pub failed: Rc<RefCell<Vec<BlockId>>>,
}

impl CallbackTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// An operation that records its block and succeeds.
    pub fn recorder(&self) -> impl Fn(BlockId) -> anyhow::Result<()> + 'static {
        let ran = self.ran.clone();
        move |id| {
            ran.borrow_mut().push(id);
            Ok(())
        }
    }

    /// An operation that records its block and fails.
    pub fn failing(&self) -> impl Fn(BlockId) -> anyhow::Result<()> + 'static {
        let failed = self.failed.clone();
        move |id| {
            failed.borrow_mut().push(id);
            anyhow::bail!("{id} failed on purpose")
        }
    }

    /// Clear all recorded calls.
    pub fn clear(&self) {
        self.ran.borrow_mut().clear();
        self.failed.borrow_mut().clear();
    }
}
