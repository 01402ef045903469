#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure builder system translating per-frame pointer input into commands.
//!
//! The system owns the menu panel layout and the cursor-to-cell mapping. It
//! never inspects the world directly; the current game state is tracked from
//! the events the world emitted on previous frames.

use no_room_core::{
    CellCoord, Command, EntityKind, Event, GameState, PlayerAction, Point, Rect, CELL_LENGTH,
    GRID_COLUMNS, GRID_ROWS, MENU_COLUMNS,
};
use tracing::trace;

/// Normalized pointer snapshot captured by an adapter for a single frame.
///
/// The cursor is expressed in logical units of the fixed 1600×900 target
/// resolution; window scaling happens before the snapshot is built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    /// Cursor position in logical units.
    pub cursor: (i32, i32),
    /// Whether the primary button is held down.
    pub primary_down: bool,
    /// Whether the primary button went down on this frame.
    pub primary_pressed: bool,
    /// Whether the secondary button went down on this frame.
    pub secondary_pressed: bool,
    /// Whether the player asked to close the game.
    pub exit_requested: bool,
}

/// Buttons laid out on the menu panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuButton {
    /// Starts or resumes the run.
    Play,
    /// Suspends the run.
    Pause,
    /// Selects the tool placed by primary clicks on empty cells.
    Tool(EntityKind),
}

const BUTTON_INSET: f64 = 25.0;
const BUTTON_HEIGHT: f64 = 50.0;
const BUTTON_SPACING: f64 = 75.0;
const FIRST_BUTTON_Y: f64 = 200.0;

impl MenuButton {
    /// Every button in top-to-bottom panel order.
    pub const ALL: [Self; 4] = [
        Self::Play,
        Self::Pause,
        Self::Tool(EntityKind::Turret),
        Self::Tool(EntityKind::Obstacle),
    ];

    /// Clickable area of the button in logical units.
    #[must_use]
    pub fn bounds(self) -> Rect {
        let slot = match self {
            Self::Play => 0.0,
            Self::Pause => 1.0,
            Self::Tool(EntityKind::Turret) => 2.5,
            Self::Tool(EntityKind::Obstacle) => 3.5,
        };
        let panel_width = f64::from(MENU_COLUMNS) * CELL_LENGTH;
        Rect::new(
            BUTTON_INSET,
            FIRST_BUTTON_Y + slot * BUTTON_SPACING,
            panel_width - 2.0 * BUTTON_INSET,
            BUTTON_HEIGHT,
        )
    }

    /// Caption drawn on the button.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Play => "Play",
            Self::Pause => "Pause",
            Self::Tool(EntityKind::Turret) => "Turret",
            Self::Tool(EntityKind::Obstacle) => "Obstacle",
        }
    }

    fn command(self) -> Command {
        match self {
            Self::Play => Command::Play,
            Self::Pause => Command::Pause,
            Self::Tool(kind) => Command::SelectTool { tool: Some(kind) },
        }
    }
}

/// Returns the menu button whose interior contains the point.
///
/// Points on a button's outline do not count as hits.
#[must_use]
pub fn button_at(point: Point) -> Option<MenuButton> {
    MenuButton::ALL
        .into_iter()
        .find(|button| button.bounds().contains(point))
}

/// Maps a logical cursor position onto the grid, clamping it into bounds first.
#[must_use]
pub fn hovered_cell(cursor: (i32, i32)) -> CellCoord {
    let cell_length = CELL_LENGTH as i32;
    let max_x = GRID_COLUMNS as i32 * cell_length - 1;
    let max_y = GRID_ROWS as i32 * cell_length - 1;
    let x = cursor.0.clamp(0, max_x);
    let y = cursor.1.clamp(0, max_y);
    CellCoord::new((x / cell_length) as u32, (y / cell_length) as u32)
}

/// Reports whether the cell belongs to the menu panel.
#[must_use]
pub const fn is_menu_cell(cell: CellCoord) -> bool {
    cell.column() < MENU_COLUMNS
}

/// Builder system translating pointer input into world commands.
#[derive(Debug, Clone)]
pub struct Builder {
    game_state: GameState,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// Creates a builder that assumes the world is still being set up.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            game_state: GameState::Setup,
        }
    }

    /// Game state observed through the most recent state change event.
    #[must_use]
    pub const fn game_state(&self) -> GameState {
        self.game_state
    }

    /// Consumes world events and the frame's input to emit builder commands.
    ///
    /// Menu button presses are pushed onto `out` as state or tool commands.
    /// A press on the grid is returned as the player action for the next
    /// tick. Once the run has ended no further commands are produced.
    pub fn handle(
        &mut self,
        events: &[Event],
        input: InputSnapshot,
        out: &mut Vec<Command>,
    ) -> Option<PlayerAction> {
        for event in events {
            if let Event::GameStateChanged { to, .. } = event {
                self.game_state = *to;
            }
        }

        if self.game_state.is_terminal() {
            return None;
        }

        let cell = hovered_cell(input.cursor);
        if is_menu_cell(cell) {
            if input.primary_pressed {
                let point = Point::new(f64::from(input.cursor.0), f64::from(input.cursor.1));
                if let Some(button) = button_at(point) {
                    trace!(?button, "menu button pressed");
                    out.push(button.command());
                }
            }
            return None;
        }

        if input.primary_pressed {
            trace!(column = cell.column(), row = cell.row(), "primary click on grid");
            return Some(PlayerAction::Activate { cell });
        }

        if input.secondary_pressed {
            trace!(column = cell.column(), row = cell.row(), "secondary click on grid");
            return Some(PlayerAction::Place {
                cell,
                kind: EntityKind::Obstacle,
            });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_fit_inside_the_menu_panel_without_overlapping() {
        let panel = Rect::new(0.0, 0.0, f64::from(MENU_COLUMNS) * CELL_LENGTH, 900.0);
        for (index, button) in MenuButton::ALL.iter().enumerate() {
            let bounds = button.bounds();
            assert!(bounds.x() > panel.x() && bounds.right() < panel.right());
            assert!(bounds.bottom() < panel.bottom());
            for other in &MenuButton::ALL[index + 1..] {
                assert!(!bounds.intersects(&other.bounds()), "{button:?} overlaps {other:?}");
            }
        }
    }

    #[test]
    fn button_outline_is_not_a_hit() {
        let bounds = MenuButton::Play.bounds();
        assert_eq!(button_at(bounds.origin()), None);
        assert_eq!(
            button_at(Point::new(bounds.x() + 1.0, bounds.y() + 1.0)),
            Some(MenuButton::Play)
        );
    }

    #[test]
    fn hovered_cell_divides_by_cell_length() {
        assert_eq!(hovered_cell((0, 0)), CellCoord::new(0, 0));
        assert_eq!(hovered_cell((49, 49)), CellCoord::new(0, 0));
        assert_eq!(hovered_cell((50, 99)), CellCoord::new(1, 1));
        assert_eq!(hovered_cell((1_599, 899)), CellCoord::new(31, 17));
    }

    #[test]
    fn hovered_cell_clamps_outside_cursor() {
        assert_eq!(hovered_cell((-40, -1)), CellCoord::new(0, 0));
        assert_eq!(hovered_cell((1_600, 900)), CellCoord::new(31, 17));
        assert_eq!(hovered_cell((5_000, 420)), CellCoord::new(31, 8));
    }
}
