#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the No Room simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what happened. Sound cues are derived from the event stream so
//! that audio playback stays entirely outside of the simulation.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod geometry;

pub use geometry::{Point, Rect};

/// Title shown in the menu panel and used as the window title by adapters.
pub const GAME_TITLE: &str = "No Room";

/// Number of cell columns in the standard map.
pub const GRID_COLUMNS: u32 = 32;

/// Number of cell rows in the standard map.
pub const GRID_ROWS: u32 = 18;

/// Side length of a square cell measured in logical units.
pub const CELL_LENGTH: f64 = 50.0;

/// Width of the fixed logical resolution the simulation operates in.
pub const LOGICAL_WIDTH: u32 = 1600;

/// Height of the fixed logical resolution the simulation operates in.
pub const LOGICAL_HEIGHT: u32 = 900;

/// Number of leftmost columns covered by the menu panel.
pub const MENU_COLUMNS: u32 = 4;

/// Horizontal distance left of the map at which enemies appear.
pub const OFFSCREEN_MARGIN: f64 = 150.0;

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Kind of ground a cell is made of.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroundKind {
    /// Regular buildable floor.
    Default,
    /// Vulnerable capacity sacrificed when enemies breach the wall.
    SafeZone,
    /// Impassable ground that never accepts placements.
    Wall,
    /// Safe zone that has already been sacrificed.
    ParkingLot,
}

/// Types of entities the player can place onto the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// Plain blocker that destroys the first enemy it touches.
    Obstacle,
    /// Ranged defence that fires projectiles at enemies in range.
    Turret,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Vehicle types that appear in the wave schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Slow and long delivery van.
    Van,
    /// Quick pickup truck.
    Pickup,
}

impl EnemyKind {
    /// Collider width and height measured in logical units.
    #[must_use]
    pub const fn extent(self) -> (f64, f64) {
        match self {
            Self::Van => (100.0, 50.0),
            Self::Pickup => (75.0, 40.0),
        }
    }

    /// Travel speed in logical units per simulated millisecond.
    #[must_use]
    pub const fn speed(self) -> f64 {
        match self {
            Self::Van => 0.05,
            Self::Pickup => 0.08,
        }
    }
}

/// Single entry of the wave schedule.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Simulated time at which the enemy becomes due.
    pub spawn_at: Duration,
    /// Vehicle type to instantiate.
    pub kind: EnemyKind,
    /// Vertical position of the enemy's top edge.
    pub start_y: f64,
}

impl EnemySpawn {
    /// Creates a new spawn instruction.
    #[must_use]
    pub const fn new(spawn_at: Duration, kind: EnemyKind, start_y: f64) -> Self {
        Self {
            spawn_at,
            kind,
            start_y,
        }
    }
}

/// Lifecycle of a single run.
///
/// `Active` and `Paused` are the two sub-states of playing. `Won` and `Lost`
/// are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Initial planning stage before the first play trigger.
    Setup,
    /// Playing with the clock running.
    Active,
    /// Playing with the clock frozen.
    Paused,
    /// The wave schedule ran out.
    Won,
    /// A breach found no safe zone left to sacrifice.
    Lost,
}

impl GameState {
    /// Reports whether the run is playing, paused or not.
    #[must_use]
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Active | Self::Paused)
    }

    /// Reports whether the run has ended.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Named audio cues emitted by the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// An enemy entered the map.
    Alert,
    /// An enemy was struck by a placed entity or a projectile.
    HitEnemy,
    /// A turret fired a projectile.
    TurretFire,
    /// The player placed an entity.
    PlaceEntity,
    /// The player sold an entity.
    SellEntity,
}

/// How many due schedule entries are spawned per tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// At most one entry per tick, even if several are due.
    #[default]
    OnePerTick,
    /// Every entry due at the current clock.
    DrainDue,
}

/// Condition that ends the run in victory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinPolicy {
    /// The run is won as soon as the schedule is empty, live enemies notwithstanding.
    #[default]
    ScheduleExhausted,
    /// The run is won once the schedule is empty and no enemy remains.
    ScheduleExhaustedAndCleared,
}

/// Prices, rewards and policy points that parameterise a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Balance available when the run starts.
    pub starting_balance: u32,
    /// Cost of placing (and refund for selling) a turret.
    pub turret_price: u32,
    /// Cost of placing (and refund for selling) an obstacle.
    pub obstacle_price: u32,
    /// Balance awarded for every removed enemy.
    pub kill_reward: u32,
    /// Safe-zone cells consumed by a single breach.
    pub breach_sacrifice: u32,
    /// Whether enemies removed by breaching the wall still award the kill reward.
    pub reward_breaches: bool,
    /// Number of due schedule entries spawned per tick.
    pub spawn_policy: SpawnPolicy,
    /// Victory condition.
    pub win_policy: WinPolicy,
}

impl Rules {
    /// Flat price of the provided entity kind.
    #[must_use]
    pub const fn price_of(&self, kind: EntityKind) -> u32 {
        match kind {
            EntityKind::Obstacle => self.obstacle_price,
            EntityKind::Turret => self.turret_price,
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            starting_balance: 25,
            turret_price: 5,
            obstacle_price: 1,
            kill_reward: 1,
            breach_sacrifice: 4,
            reward_breaches: true,
            spawn_policy: SpawnPolicy::OnePerTick,
            win_policy: WinPolicy::ScheduleExhausted,
        }
    }
}

/// Grid interaction requested by the player during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerAction {
    /// Primary click: sells an occupant, otherwise places the selected tool.
    Activate {
        /// Cell under the cursor.
        cell: CellCoord,
    },
    /// Secondary click: places the provided kind without selling.
    Place {
        /// Cell under the cursor.
        cell: CellCoord,
        /// Kind of entity to construct.
        kind: EntityKind,
    },
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the wave schedule. Ignored once the run has left setup.
    ConfigureSchedule {
        /// Spawn instructions sorted ascending by spawn time.
        spawns: Vec<EnemySpawn>,
    },
    /// Play trigger: starts or resumes the clock.
    Play,
    /// Pause trigger: freezes the clock.
    Pause,
    /// Changes the tool used by [`PlayerAction::Activate`] on empty cells.
    SelectTool {
        /// Entity kind to place, or `None` to disable placement.
        tool: Option<EntityKind>,
    },
    /// Runs one simulation step.
    Tick {
        /// Elapsed real time since the previous tick.
        dt: Duration,
        /// Player interaction applied after the simulation phases.
        action: Option<PlayerAction>,
    },
}

/// Reason an enemy was marked for removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RemovalCause {
    /// Touched a placed entity, which is destroyed in the process.
    Contact {
        /// Cell of the placed entity that was touched.
        cell: CellCoord,
    },
    /// Struck by a turret projectile.
    Projectile,
    /// Reached the wall boundary.
    Breach,
}

/// Reasons a placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum PlacementError {
    /// The cell lies outside the grid.
    #[error("cell lies outside the grid")]
    OutOfBounds,
    /// Wall cells never accept placements.
    #[error("wall cells cannot hold entities")]
    WallCell,
    /// The cell already holds an entity.
    #[error("cell is already occupied")]
    Occupied,
    /// The balance does not cover the price.
    #[error("placement costs {price} but the balance is {balance}")]
    InsufficientFunds {
        /// Price of the requested entity.
        price: u32,
        /// Balance at the time of the request.
        balance: u32,
    },
    /// No placement tool is selected.
    #[error("no placement tool is selected")]
    NoToolSelected,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the wave schedule was replaced.
    ScheduleConfigured {
        /// Number of entries in the new schedule.
        entries: usize,
    },
    /// Announces a transition of the state machine.
    GameStateChanged {
        /// State before the transition.
        from: GameState,
        /// State after the transition.
        to: GameState,
    },
    /// Announces that the placement tool changed.
    ToolSelected {
        /// Newly selected tool.
        tool: Option<EntityKind>,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
        /// Simulation clock after the advance.
        clock: Duration,
    },
    /// Confirms that an enemy entered the map.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Vehicle type of the enemy.
        kind: EnemyKind,
        /// Collider at the moment of spawning.
        collider: Rect,
    },
    /// Reports that a turret launched a projectile.
    ProjectileFired {
        /// Cell of the firing turret.
        turret: CellCoord,
        /// Collider of the new projectile.
        collider: Rect,
    },
    /// Reports that an enemy was struck and marked for removal.
    EnemyHit {
        /// Identifier of the struck enemy.
        enemy: EnemyId,
        /// What struck the enemy.
        cause: RemovalCause,
    },
    /// Reports that an enemy reached the wall boundary.
    WallBreached {
        /// Identifier of the breaching enemy.
        enemy: EnemyId,
    },
    /// Reports that a safe-zone cell was converted into a parking lot.
    SafeZoneSacrificed {
        /// Converted cell.
        cell: CellCoord,
    },
    /// Reports that a placed entity was destroyed by enemy contact.
    EntityDestroyed {
        /// Cell that held the entity.
        cell: CellCoord,
        /// Kind of the destroyed entity.
        kind: EntityKind,
    },
    /// Confirms that a marked enemy left the simulation.
    EnemyRemoved {
        /// Identifier of the removed enemy.
        enemy: EnemyId,
        /// Reason the enemy was removed.
        cause: RemovalCause,
        /// Balance awarded for the removal.
        reward: u32,
    },
    /// Confirms that the player placed an entity.
    EntityPlaced {
        /// Cell that now holds the entity.
        cell: CellCoord,
        /// Kind of the placed entity.
        kind: EntityKind,
        /// Balance charged for the placement.
        price: u32,
    },
    /// Confirms that the player sold an entity.
    EntitySold {
        /// Cell that held the entity.
        cell: CellCoord,
        /// Kind of the sold entity.
        kind: EntityKind,
        /// Balance refunded for the sale.
        refund: u32,
    },
    /// Reports that a placement request had no effect.
    PlacementRejected {
        /// Cell targeted by the request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
}

impl Event {
    /// Sound cue the event should trigger, if any.
    #[must_use]
    pub const fn sound_cue(&self) -> Option<SoundCue> {
        match self {
            Self::EnemySpawned { .. } => Some(SoundCue::Alert),
            Self::ProjectileFired { .. } => Some(SoundCue::TurretFire),
            Self::EnemyHit { .. } => Some(SoundCue::HitEnemy),
            Self::EntityPlaced { .. } => Some(SoundCue::PlaceEntity),
            Self::EntitySold { .. } => Some(SoundCue::SellEntity),
            _ => None,
        }
    }
}

/// Collects the sound cues triggered by the events, preserving emission order.
#[must_use]
pub fn sound_cues(events: &[Event]) -> Vec<SoundCue> {
    events.iter().filter_map(Event::sound_cue).collect()
}
