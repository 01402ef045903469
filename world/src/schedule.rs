//! Time-ordered queue of pending enemy spawns.

use std::{collections::VecDeque, time::Duration};

use no_room_core::EnemySpawn;

/// Wave schedule drained strictly from the front.
#[derive(Debug, Default)]
pub(crate) struct WaveSchedule {
    pending: VecDeque<EnemySpawn>,
}

impl WaveSchedule {
    /// Wraps spawns that are already sorted ascending by spawn time.
    pub(crate) fn new(spawns: Vec<EnemySpawn>) -> Self {
        Self {
            pending: spawns.into(),
        }
    }

    pub(crate) fn peek(&self) -> Option<&EnemySpawn> {
        self.pending.front()
    }

    /// Removes the front entry if it is due at `clock`.
    pub(crate) fn pop_due(&mut self, clock: Duration) -> Option<EnemySpawn> {
        if self.peek()?.spawn_at <= clock {
            self.pending.pop_front()
        } else {
            None
        }
    }

    pub(crate) fn is_exhausted(&self) -> bool {
        self.pending.is_empty()
    }

    pub(crate) fn remaining(&self) -> usize {
        self.pending.len()
    }
}
