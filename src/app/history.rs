// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/history.rs
//
// Bounded undo/redo stacks.

use std::collections::VecDeque;

/// Undo history whose top entry is always the current state.
#[derive(Debug, Clone)]
pub struct History<T> {
    undo: VecDeque<T>,
    redo: Vec<T>,
    limit: usize,
}

impl<T: Clone> History<T> {
    pub fn new(limit: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Drop everything and start over from `state`.
    pub fn reset(&mut self, state: T) {
        self.undo.clear();
        self.redo.clear();
        self.undo.push_back(state);
    }

    /// Record a new current state. Clears the redo stack.
    pub fn push(&mut self, state: T) {
        self.undo.push_back(state);
        while self.undo.len() > self.limit {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Step back; returns the state to restore.
    pub fn undo(&mut self) -> Option<T> {
        if self.undo.len() <= 1 {
            return None;
        }
        let state = self.undo.pop_back()?;
        self.redo.push(state);
        self.undo.back().cloned()
    }

    /// Step forward; returns the state to restore.
    pub fn redo(&mut self) -> Option<T> {
        let state = self.redo.pop()?;
        self.undo.push_back(state.clone());
        Some(state)
    }

    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }
}
