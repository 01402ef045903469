//! Per-frame glue between the builder system, the world and the scene.

use std::time::Duration;

use no_room_core::{sound_cues, Command, Event, GameState, PlayerAction};
use no_room_rendering::{FrameInput, Scene};
use no_room_system_builder::{Builder, InputSnapshot};
use no_room_world::{self as world, query, World};
use tracing::{debug, warn};

use crate::{config::LayoutEntry, scene};

/// Summary of a finished or interrupted run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Outcome {
    pub(crate) state: GameState,
    pub(crate) clock: Duration,
    pub(crate) balance: u32,
    pub(crate) safe_zones_remaining: usize,
}

/// Owns the world and the systems that feed it.
#[derive(Debug)]
pub(crate) struct Session {
    world: World,
    builder: Builder,
    events: Vec<Event>,
}

impl Session {
    pub(crate) fn new(world: World) -> Self {
        Self {
            world,
            builder: Builder::new(),
            events: Vec::new(),
        }
    }

    /// Places the configured entities through the regular placement path.
    pub(crate) fn apply_layout(&mut self, layout: &[LayoutEntry]) {
        for entry in layout {
            let action = PlayerAction::Place {
                cell: entry.cell(),
                kind: entry.kind,
            };
            self.submit(Command::Tick {
                dt: Duration::ZERO,
                action: Some(action),
            });
        }
        for event in &self.events {
            if let Event::PlacementRejected { cell, reason } = event {
                warn!(column = cell.column(), row = cell.row(), %reason, "layout entry rejected");
            }
        }
    }

    pub(crate) fn configure(&mut self, command: Command) {
        self.submit(command);
    }

    fn submit(&mut self, command: Command) {
        world::apply(&mut self.world, command, &mut self.events);
    }

    /// Runs one frame: input translation, simulation tick and scene capture.
    pub(crate) fn frame(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) {
        let snapshot = InputSnapshot {
            cursor: input.logical_cursor(),
            primary_down: input.primary_down,
            primary_pressed: input.primary_pressed,
            secondary_pressed: input.secondary_pressed,
            exit_requested: input.exit_requested,
        };

        let mut commands = Vec::new();
        let action = self.builder.handle(&self.events, snapshot, &mut commands);
        self.events.clear();
        for command in commands {
            self.submit(command);
        }
        self.submit(Command::Tick { dt, action });

        for cue in sound_cues(&self.events) {
            debug!(?cue, "sound cue");
        }
        scene::capture(&self.world, &snapshot, scene);
    }

    pub(crate) fn outcome(&self) -> Outcome {
        Outcome {
            state: query::game_state(&self.world),
            clock: query::clock(&self.world),
            balance: query::balance(&self.world),
            safe_zones_remaining: query::safe_zones_remaining(&self.world),
        }
    }
}
