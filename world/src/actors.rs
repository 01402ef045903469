//! Placed entities, enemies and projectiles.

use std::time::Duration;

use no_room_core::{EnemyId, EnemyKind, EnemySpawn, EntityKind, Rect, RemovalCause, OFFSCREEN_MARGIN};

/// Delay between two shots of the same turret.
pub(crate) const TURRET_COOLDOWN: Duration = Duration::from_millis(1_000);

/// Distance left of a turret within which enemies are engaged.
pub(crate) const TURRET_RANGE: f64 = 250.0;

/// Side length of a square projectile.
pub(crate) const PROJECTILE_LENGTH: f64 = 10.0;

/// Leftward projectile speed in logical units per millisecond.
pub(crate) const PROJECTILE_SPEED: f64 = 1.0;

fn millis(dt: Duration) -> f64 {
    dt.as_secs_f64() * 1_000.0
}

/// Entity built by the player and owned by a grid cell.
#[derive(Clone, Debug)]
pub(crate) struct PlacedEntity {
    kind: EntityKind,
    collider: Rect,
    behaviour: Behaviour,
}

#[derive(Clone, Copy, Debug)]
enum Behaviour {
    Plain,
    Turret(TurretState),
}

#[derive(Clone, Copy, Debug)]
struct TurretState {
    cooldown_remaining: Duration,
}

impl PlacedEntity {
    pub(crate) fn new(kind: EntityKind, collider: Rect) -> Self {
        let behaviour = match kind {
            EntityKind::Obstacle => Behaviour::Plain,
            EntityKind::Turret => Behaviour::Turret(TurretState {
                cooldown_remaining: Duration::ZERO,
            }),
        };
        Self {
            kind,
            collider,
            behaviour,
        }
    }

    pub(crate) const fn kind(&self) -> EntityKind {
        self.kind
    }

    pub(crate) const fn collider(&self) -> Rect {
        self.collider
    }

    /// Advances internal timers and returns a projectile when a turret fires.
    pub(crate) fn update(&mut self, dt: Duration, enemies: &[Enemy]) -> Option<Projectile> {
        let Behaviour::Turret(turret) = &mut self.behaviour else {
            return None;
        };

        turret.cooldown_remaining = turret.cooldown_remaining.saturating_sub(dt);
        if !turret.cooldown_remaining.is_zero() {
            return None;
        }

        let engagement = engagement_region(self.collider);
        let in_range = enemies
            .iter()
            .filter(|enemy| enemy.is_live())
            .any(|enemy| enemy.collider.intersects(&engagement));
        if !in_range {
            return None;
        }

        turret.cooldown_remaining = TURRET_COOLDOWN;
        Some(Projectile::from_muzzle(self.collider))
    }
}

fn engagement_region(collider: Rect) -> Rect {
    Rect::new(
        collider.x() - TURRET_RANGE,
        collider.y(),
        collider.width() + TURRET_RANGE,
        collider.height(),
    )
}

/// Vehicle travelling rightwards towards the base wall.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) collider: Rect,
    speed: f64,
    removal: Option<RemovalCause>,
}

impl Enemy {
    pub(crate) fn spawn(id: EnemyId, spawn: &EnemySpawn) -> Self {
        let (width, height) = spawn.kind.extent();
        Self {
            id,
            kind: spawn.kind,
            collider: Rect::new(-OFFSCREEN_MARGIN, spawn.start_y, width, height),
            speed: spawn.kind.speed(),
            removal: None,
        }
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        self.collider = self.collider.translated(self.speed * millis(dt), 0.0);
    }

    /// Enemies pending removal no longer take part in collisions.
    pub(crate) const fn is_live(&self) -> bool {
        self.removal.is_none()
    }

    pub(crate) const fn removal(&self) -> Option<RemovalCause> {
        self.removal
    }

    /// Marks the enemy for removal. The first cause sticks.
    pub(crate) fn mark(&mut self, cause: RemovalCause) -> bool {
        if self.removal.is_some() {
            return false;
        }
        self.removal = Some(cause);
        true
    }
}

/// Shot travelling leftwards from a turret's muzzle.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) collider: Rect,
    pub(crate) spent: bool,
}

impl Projectile {
    fn from_muzzle(turret: Rect) -> Self {
        let y = turret.y() + (turret.height() - PROJECTILE_LENGTH) / 2.0;
        Self {
            collider: Rect::new(
                turret.x() - PROJECTILE_LENGTH,
                y,
                PROJECTILE_LENGTH,
                PROJECTILE_LENGTH,
            ),
            spent: false,
        }
    }

    pub(crate) fn advance(&mut self, dt: Duration) {
        self.collider = self
            .collider
            .translated(-PROJECTILE_SPEED * millis(dt), 0.0);
    }

    /// A projectile left of the map can no longer hit anything worth tracking.
    pub(crate) fn is_out_of_bounds(&self) -> bool {
        self.collider.right() < 0.0
    }
}
