#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for No Room.
//!
//! The [`World`] owns the grid, the enemy and projectile collections, the
//! balance, the clock and the wave schedule. It only changes through
//! [`apply`], which runs each [`Command`] to completion and reports what
//! happened as [`Event`] values.

mod actors;
mod economy;
mod grid;
mod schedule;

use std::time::Duration;

use no_room_core::{
    CellCoord, Command, EnemyId, EnemySpawn, EntityKind, Event, GameState, GroundKind,
    PlacementError, PlayerAction, RemovalCause, Rules, SpawnPolicy, WinPolicy, CELL_LENGTH,
    GRID_COLUMNS, GRID_ROWS,
};
use tracing::{debug, info, warn};

use self::{
    actors::{Enemy, PlacedEntity, Projectile},
    economy::Wallet,
    grid::Grid,
    schedule::WaveSchedule,
};

/// Represents the authoritative No Room simulation state.
#[derive(Debug)]
pub struct World {
    rules: Rules,
    state: GameState,
    clock: Duration,
    grid: Grid,
    wallet: Wallet,
    schedule: WaveSchedule,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    next_enemy_id: u32,
    selected_tool: Option<EntityKind>,
}

impl World {
    /// Creates a world on the standard map using the standard rules.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    /// Creates a world on the standard map using the provided rules.
    #[must_use]
    pub fn with_rules(rules: Rules) -> Self {
        Self {
            state: GameState::Setup,
            clock: Duration::ZERO,
            grid: Grid::new(GRID_COLUMNS, GRID_ROWS, CELL_LENGTH),
            wallet: Wallet::new(rules.starting_balance),
            schedule: WaveSchedule::default(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            next_enemy_id: 0,
            selected_tool: None,
            rules,
        }
    }

    fn transition(&mut self, to: GameState, out_events: &mut Vec<Event>) {
        let from = self.state;
        if from == to {
            return;
        }
        self.state = to;
        info!(?from, ?to, clock_ms = self.clock.as_millis() as u64, "game state changed");
        out_events.push(Event::GameStateChanged { from, to });
    }

    fn step(&mut self, dt: Duration, action: Option<PlayerAction>, out_events: &mut Vec<Event>) {
        if self.state.is_terminal() {
            return;
        }

        if self.state == GameState::Active {
            self.clock = self.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced {
                dt,
                clock: self.clock,
            });

            self.spawn_due(out_events);
            let casualties = self.update_placed(dt, out_events);
            self.update_enemies(dt, out_events);
            self.update_projectiles(dt, out_events);
            self.apply_removals(&casualties, out_events);
        }

        if self.state.is_terminal() {
            return;
        }

        if let Some(action) = action {
            self.apply_action(action, out_events);
        }

        self.check_victory(out_events);
    }

    fn spawn_due(&mut self, out_events: &mut Vec<Event>) {
        while let Some(spawn) = self.schedule.pop_due(self.clock) {
            self.spawn_enemy(&spawn, out_events);
            if self.rules.spawn_policy == SpawnPolicy::OnePerTick {
                break;
            }
        }
    }

    fn spawn_enemy(&mut self, spawn: &EnemySpawn, out_events: &mut Vec<Event>) {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        let enemy = Enemy::spawn(id, spawn);
        debug!(enemy = id.get(), kind = ?spawn.kind, y = spawn.start_y, "enemy spawned");
        out_events.push(Event::EnemySpawned {
            enemy: id,
            kind: enemy.kind,
            collider: enemy.collider,
        });
        self.enemies.push(enemy);
    }

    /// Advances placed entities and resolves contact with enemies.
    ///
    /// Returns the cells whose occupants were destroyed by contact.
    fn update_placed(&mut self, dt: Duration, out_events: &mut Vec<Event>) -> Vec<CellCoord> {
        let mut casualties = Vec::new();

        for (cell, entity) in self.grid.occupants_mut() {
            if let Some(projectile) = entity.update(dt, &self.enemies) {
                out_events.push(Event::ProjectileFired {
                    turret: cell,
                    collider: projectile.collider,
                });
                self.projectiles.push(projectile);
            }

            let collider = entity.collider();
            let touched = self
                .enemies
                .iter_mut()
                .find(|enemy| enemy.is_live() && enemy.collider.intersects(&collider));
            if let Some(enemy) = touched {
                let cause = RemovalCause::Contact { cell };
                let _ = enemy.mark(cause);
                out_events.push(Event::EnemyHit {
                    enemy: enemy.id,
                    cause,
                });
                casualties.push(cell);
            }
        }

        casualties
    }

    fn update_enemies(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let boundary = self.grid.breach_boundary();
        let sacrifice = self.rules.breach_sacrifice;
        let mut capacity_exhausted = false;

        for enemy in self.enemies.iter_mut().filter(|enemy| enemy.is_live()) {
            enemy.advance(dt);
            if !enemy.collider.intersects(&boundary) {
                continue;
            }

            let _ = enemy.mark(RemovalCause::Breach);
            warn!(enemy = enemy.id.get(), "enemy breached the wall");
            out_events.push(Event::WallBreached { enemy: enemy.id });

            for _ in 0..sacrifice {
                match self.grid.convert_next_safe_zone() {
                    Some(cell) => out_events.push(Event::SafeZoneSacrificed { cell }),
                    None => capacity_exhausted = true,
                }
            }
        }

        if capacity_exhausted {
            self.transition(GameState::Lost, out_events);
        }
    }

    fn update_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        for projectile in &mut self.projectiles {
            projectile.advance(dt);
            for enemy in self.enemies.iter_mut().filter(|enemy| enemy.is_live()) {
                if !projectile.collider.intersects(&enemy.collider) {
                    continue;
                }
                let _ = enemy.mark(RemovalCause::Projectile);
                projectile.spent = true;
                out_events.push(Event::EnemyHit {
                    enemy: enemy.id,
                    cause: RemovalCause::Projectile,
                });
            }
        }

        self.projectiles
            .retain(|projectile| !projectile.spent && !projectile.is_out_of_bounds());
    }

    fn apply_removals(&mut self, casualties: &[CellCoord], out_events: &mut Vec<Event>) {
        let rules = self.rules;
        let wallet = &mut self.wallet;
        self.enemies.retain(|enemy| {
            let Some(cause) = enemy.removal() else {
                return true;
            };
            let reward = if cause == RemovalCause::Breach && !rules.reward_breaches {
                0
            } else {
                rules.kill_reward
            };
            wallet.credit(reward);
            debug!(enemy = enemy.id.get(), ?cause, reward, "enemy removed");
            out_events.push(Event::EnemyRemoved {
                enemy: enemy.id,
                cause,
                reward,
            });
            false
        });

        for &cell in casualties {
            if let Some(entity) = self.grid.remove(cell) {
                debug!(column = cell.column(), row = cell.row(), kind = ?entity.kind(), "entity destroyed");
                out_events.push(Event::EntityDestroyed {
                    cell,
                    kind: entity.kind(),
                });
            }
        }
    }

    fn apply_action(&mut self, action: PlayerAction, out_events: &mut Vec<Event>) {
        let (cell, outcome) = match action {
            PlayerAction::Activate { cell } => (cell, self.activate(cell, out_events)),
            PlayerAction::Place { cell, kind } => (cell, self.place(cell, kind, out_events)),
        };

        if let Err(reason) = outcome {
            debug!(column = cell.column(), row = cell.row(), %reason, "placement rejected");
            out_events.push(Event::PlacementRejected { cell, reason });
        }
    }

    fn activate(
        &mut self,
        cell: CellCoord,
        out_events: &mut Vec<Event>,
    ) -> Result<(), PlacementError> {
        let target = self.grid.cell(cell).ok_or(PlacementError::OutOfBounds)?;
        if target.ground == GroundKind::Wall {
            return Err(PlacementError::WallCell);
        }

        if target.occupant.is_some() {
            self.sell(cell, out_events);
            return Ok(());
        }

        let kind = self.selected_tool.ok_or(PlacementError::NoToolSelected)?;
        self.place(cell, kind, out_events)
    }

    fn place(
        &mut self,
        cell: CellCoord,
        kind: EntityKind,
        out_events: &mut Vec<Event>,
    ) -> Result<(), PlacementError> {
        self.grid.check_placement(cell)?;
        let price = self.rules.price_of(kind);
        self.wallet.charge(price)?;

        let collider = self.grid.collider(cell);
        self.grid.occupy(cell, PlacedEntity::new(kind, collider));
        debug!(column = cell.column(), row = cell.row(), ?kind, price, "entity placed");
        out_events.push(Event::EntityPlaced { cell, kind, price });
        Ok(())
    }

    fn sell(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        let Some(entity) = self.grid.remove(cell) else {
            return;
        };
        let kind = entity.kind();
        let refund = self.rules.price_of(kind);
        self.wallet.credit(refund);
        debug!(column = cell.column(), row = cell.row(), ?kind, refund, "entity sold");
        out_events.push(Event::EntitySold { cell, kind, refund });
    }

    fn check_victory(&mut self, out_events: &mut Vec<Event>) {
        if !self.state.is_playing() || !self.schedule.is_exhausted() {
            return;
        }

        let won = match self.rules.win_policy {
            WinPolicy::ScheduleExhausted => true,
            WinPolicy::ScheduleExhaustedAndCleared => self.enemies.is_empty(),
        };
        if won {
            self.transition(GameState::Won, out_events);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureSchedule { spawns } => {
            if world.state != GameState::Setup {
                warn!(state = ?world.state, "schedule can only be configured during setup");
                return;
            }
            let entries = spawns.len();
            world.schedule = WaveSchedule::new(spawns);
            info!(entries, "wave schedule configured");
            out_events.push(Event::ScheduleConfigured { entries });
        }
        Command::Play => {
            if matches!(world.state, GameState::Setup | GameState::Paused) {
                world.transition(GameState::Active, out_events);
            }
        }
        Command::Pause => {
            if world.state == GameState::Active {
                world.transition(GameState::Paused, out_events);
            }
        }
        Command::SelectTool { tool } => {
            if world.selected_tool != tool {
                world.selected_tool = tool;
                out_events.push(Event::ToolSelected { tool });
            }
        }
        Command::Tick { dt, action } => world.step(dt, action, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use no_room_core::{CellCoord, EnemyId, EnemyKind, EntityKind, GameState, GroundKind, Rect};

    use super::{grid::Grid, World};

    /// Current state of the run.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// Simulated time elapsed while the run was active.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Current balance.
    #[must_use]
    pub fn balance(world: &World) -> u32 {
        world.wallet.balance()
    }

    /// Tool placed by a primary click on an empty cell.
    #[must_use]
    pub fn selected_tool(world: &World) -> Option<EntityKind> {
        world.selected_tool
    }

    /// Number of schedule entries that have not spawned yet.
    #[must_use]
    pub fn pending_spawns(world: &World) -> usize {
        world.schedule.remaining()
    }

    /// Number of safe-zone cells that can still be sacrificed.
    #[must_use]
    pub fn safe_zones_remaining(world: &World) -> usize {
        world.grid.safe_zones_remaining()
    }

    /// Collider enemies must not reach.
    #[must_use]
    pub fn breach_boundary(world: &World) -> Rect {
        world.grid.breach_boundary()
    }

    /// Exposes a read-only view of the map.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        GridView { grid: &world.grid }
    }

    /// Captures the enemies currently in the simulation.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots = world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                kind: enemy.kind,
                collider: enemy.collider,
            })
            .collect();
        EnemyView { snapshots }
    }

    /// Colliders of the projectiles in flight, in firing order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<Rect> {
        world
            .projectiles
            .iter()
            .map(|projectile| projectile.collider)
            .collect()
    }

    /// Ground and occupant of a single cell.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CellView {
        /// Ground the cell is made of.
        pub ground: GroundKind,
        /// Kind of the placed entity, if any.
        pub occupant: Option<EntityKind>,
    }

    /// Read-only view into the map.
    #[derive(Clone, Copy, Debug)]
    pub struct GridView<'a> {
        grid: &'a Grid,
    }

    impl<'a> GridView<'a> {
        /// Number of cell columns.
        #[must_use]
        pub fn columns(&self) -> u32 {
            self.grid.columns()
        }

        /// Number of cell rows.
        #[must_use]
        pub fn rows(&self) -> u32 {
            self.grid.rows()
        }

        /// Side length of a cell in logical units.
        #[must_use]
        pub fn cell_length(&self) -> f64 {
            self.grid.cell_length()
        }

        /// Returns the cell at the provided coordinate, if it lies on the map.
        #[must_use]
        pub fn cell(&self, coord: CellCoord) -> Option<CellView> {
            self.grid.cell(coord).map(|cell| CellView {
                ground: cell.ground,
                occupant: cell.occupant.as_ref().map(|entity| entity.kind()),
            })
        }

        /// Iterates over every cell in row-major order.
        pub fn iter(&self) -> impl Iterator<Item = (CellCoord, CellView)> + 'a {
            self.grid.cells().map(|(coord, cell)| {
                (
                    coord,
                    CellView {
                        ground: cell.ground,
                        occupant: cell.occupant.as_ref().map(|entity| entity.kind()),
                    },
                )
            })
        }
    }

    /// Immutable representation of a single enemy.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct EnemySnapshot {
        /// Unique identifier assigned to the enemy.
        pub id: EnemyId,
        /// Vehicle type of the enemy.
        pub kind: EnemyKind,
        /// Current collider.
        pub collider: Rect,
    }

    /// Read-only snapshot describing all enemies in insertion order.
    #[derive(Clone, Debug, Default)]
    pub struct EnemyView {
        snapshots: Vec<EnemySnapshot>,
    }

    impl EnemyView {
        /// Iterator over the captured snapshots.
        pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
            self.snapshots.iter()
        }

        /// Number of captured enemies.
        #[must_use]
        pub fn len(&self) -> usize {
            self.snapshots.len()
        }

        /// Reports whether no enemy was captured.
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.snapshots.is_empty()
        }

        /// Consumes the view, yielding the underlying snapshots.
        #[must_use]
        pub fn into_vec(self) -> Vec<EnemySnapshot> {
            self.snapshots
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use no_room_core::{EnemyKind, Rect};

    fn enemy_touching_boundary(world: &mut World) -> EnemyId {
        let id = EnemyId::new(world.next_enemy_id);
        world.next_enemy_id += 1;
        let mut enemy = Enemy::spawn(
            id,
            &EnemySpawn::new(Duration::ZERO, EnemyKind::Van, 300.0),
        );
        let boundary = world.grid.breach_boundary();
        enemy.collider = Rect::new(
            boundary.x() - enemy.collider.width(),
            enemy.collider.y(),
            enemy.collider.width(),
            enemy.collider.height(),
        );
        world.enemies.push(enemy);
        id
    }

    fn active_world(spawns: Vec<EnemySpawn>) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::ConfigureSchedule { spawns }, &mut events);
        apply(&mut world, Command::Play, &mut events);
        world
    }

    fn far_future_spawn() -> EnemySpawn {
        EnemySpawn::new(Duration::from_secs(3_600), EnemyKind::Van, 0.0)
    }

    #[test]
    fn breach_with_three_safe_zones_left_loses_the_run() {
        let mut world = active_world(vec![far_future_spawn()]);
        let mut remaining = 3;
        for column in 30..32 {
            for row in 0..18 {
                if remaining > 0 {
                    remaining -= 1;
                    continue;
                }
                world
                    .grid
                    .set_ground(CellCoord::new(column, row), GroundKind::ParkingLot);
            }
        }
        assert_eq!(world.grid.safe_zones_remaining(), 3);

        let enemy = enemy_touching_boundary(&mut world);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::ZERO,
                action: None,
            },
            &mut events,
        );

        let sacrificed = events
            .iter()
            .filter(|event| matches!(event, Event::SafeZoneSacrificed { .. }))
            .count();
        assert_eq!(sacrificed, 3);
        assert_eq!(world.grid.safe_zones_remaining(), 0);
        assert_eq!(world.state, GameState::Lost);
        assert!(events.contains(&Event::EnemyRemoved {
            enemy,
            cause: RemovalCause::Breach,
            reward: 1,
        }));
        assert!(world.enemies.is_empty());
    }

    #[test]
    fn breach_with_capacity_left_keeps_playing() {
        let mut world = active_world(vec![far_future_spawn()]);
        let _ = enemy_touching_boundary(&mut world);
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::ZERO,
                action: None,
            },
            &mut events,
        );

        assert_eq!(world.state, GameState::Active);
        assert_eq!(world.grid.safe_zones_remaining(), 32);
        assert_eq!(world.wallet.balance(), 26);
    }

    #[test]
    fn breach_reward_follows_policy() {
        let mut world = World::with_rules(Rules {
            reward_breaches: false,
            ..Rules::default()
        });
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureSchedule {
                spawns: vec![far_future_spawn()],
            },
            &mut events,
        );
        apply(&mut world, Command::Play, &mut events);
        let _ = enemy_touching_boundary(&mut world);

        apply(
            &mut world,
            Command::Tick {
                dt: Duration::ZERO,
                action: None,
            },
            &mut events,
        );

        assert_eq!(world.wallet.balance(), 25);
        assert!(world.enemies.is_empty());
    }

    #[test]
    fn lost_run_ignores_player_actions_in_the_same_tick() {
        let mut world = active_world(vec![far_future_spawn()]);
        for _ in 0..36 {
            let _ = world.grid.convert_next_safe_zone();
        }
        let _ = enemy_touching_boundary(&mut world);
        world.selected_tool = Some(EntityKind::Obstacle);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::ZERO,
                action: Some(PlayerAction::Activate {
                    cell: CellCoord::new(10, 10),
                }),
            },
            &mut events,
        );

        assert_eq!(world.state, GameState::Lost);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::EntityPlaced { .. })));
    }

    #[test]
    fn drain_due_policy_spawns_every_due_entry() {
        let mut world = World::with_rules(Rules {
            spawn_policy: SpawnPolicy::DrainDue,
            ..Rules::default()
        });
        let mut events = Vec::new();
        let spawns = vec![
            EnemySpawn::new(Duration::from_millis(10), EnemyKind::Van, 100.0),
            EnemySpawn::new(Duration::from_millis(20), EnemyKind::Pickup, 300.0),
            EnemySpawn::new(Duration::from_secs(60), EnemyKind::Van, 500.0),
        ];
        apply(&mut world, Command::ConfigureSchedule { spawns }, &mut events);
        apply(&mut world, Command::Play, &mut events);
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(50),
                action: None,
            },
            &mut events,
        );

        assert_eq!(world.enemies.len(), 2);
        assert_eq!(world.schedule.remaining(), 1);
    }

    #[test]
    fn projectile_kill_despawns_projectile_and_rewards() {
        let mut world = active_world(vec![far_future_spawn()]);
        let turret_cell = CellCoord::new(10, 6);
        let collider = world.grid.collider(turret_cell);
        world
            .grid
            .occupy(turret_cell, PlacedEntity::new(EntityKind::Turret, collider));

        let id = EnemyId::new(0);
        world.next_enemy_id = 1;
        let mut enemy = Enemy::spawn(id, &EnemySpawn::new(Duration::ZERO, EnemyKind::Van, 300.0));
        enemy.collider = enemy.collider.translated(150.0 + 300.0, 0.0);
        world.enemies.push(enemy);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(1),
                action: None,
            },
            &mut events,
        );
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::ProjectileFired { turret, .. } if *turret == turret_cell)));
        assert_eq!(world.projectiles.len(), 1);

        for _ in 0..100 {
            if world.enemies.is_empty() {
                break;
            }
            apply(
                &mut world,
                Command::Tick {
                    dt: Duration::from_millis(5),
                    action: None,
                },
                &mut events,
            );
        }

        assert!(world.enemies.is_empty());
        assert!(events.contains(&Event::EnemyRemoved {
            enemy: id,
            cause: RemovalCause::Projectile,
            reward: 1,
        }));
        assert!(world.projectiles.is_empty());
        assert_eq!(world.wallet.balance(), 26);
        assert!(world.grid.cell(turret_cell).is_some_and(|cell| cell.occupant.is_some()));
    }
}
