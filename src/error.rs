//! Error taxonomy and the diagnostic channel.
//!
//! Interactive failures never interrupt a session: the offending action is a
//! no-op and the error is reported through [`Diagnostics`], which logs via the
//! `log` facade and keeps the most recent entries for the host to inspect.

use crate::model::{BlockId, ConnectorKind};
use std::collections::VecDeque;
use thiserror::Error;

/// Everything the engine can refuse to do.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("invalid hex color {0:?}")]
    InvalidColor(String),
    #[error("cannot attach {connector:?} to {block}: {reason}")]
    ConnectorConflict {
        block: BlockId,
        connector: ConnectorKind,
        reason: &'static str,
    },
    #[error("block name {0:?} is already in use")]
    DuplicateName(String),
    #[error("no palette entry named {0:?}")]
    UnknownPaletteEntry(String),
    #[error("no button labelled {0:?}")]
    UnknownButton(String),
    #[error("pipe rejected: {0}")]
    PipeRejected(String),
}

/// Bounded buffer of reported errors.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    entries: VecDeque<EditorError>,
    capacity: usize,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::with_capacity(64)
    }
}

impl Diagnostics {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: VecDeque::new(), capacity: capacity.max(1) }
    }

    /// Log `error` and keep it, evicting the oldest entry when full.
    pub fn report(&mut self, error: EditorError) {
        log::warn!("{error}");
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(error);
    }

    pub fn iter(&self) -> impl Iterator<Item = &EditorError> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&EditorError> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return everything reported so far.
    pub fn drain(&mut self) -> Vec<EditorError> {
        self.entries.drain(..).collect()
    }
}
