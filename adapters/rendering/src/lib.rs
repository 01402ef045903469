#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for No Room adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use no_room_core::{
    CellCoord, EnemyKind, EntityKind, GameState, GroundKind, Rect, LOGICAL_HEIGHT, LOGICAL_WIDTH,
    MENU_COLUMNS,
};
use std::{error::Error, fmt, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns a new color lightened towards white by the provided amount.
    #[must_use]
    pub fn lighten(self, amount: f32) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let lift = |channel: f32| channel + (1.0 - channel) * amount;

        Self {
            red: lift(self.red),
            green: lift(self.green),
            blue: lift(self.blue),
            alpha: self.alpha,
        }
    }
}

/// Color used to clear each frame.
pub const CLEAR_COLOR: Color = Color::from_rgb_u8(0, 0, 0);

/// Fill of the menu panel.
pub const MENU_COLOR: Color = Color::from_rgb_u8(128, 128, 128);

/// Outline drawn around the hovered cell.
pub const HOVER_OUTLINE_COLOR: Color = Color::from_rgb_u8(255, 0, 0);

/// Fill used for projectiles in flight.
pub const PROJECTILE_COLOR: Color = Color::from_rgb_u8(250, 220, 90);

/// Color of every text label.
pub const TEXT_COLOR: Color = Color::from_rgb_u8(255, 255, 255);

/// Fill used for a cell's ground.
#[must_use]
pub const fn ground_color(ground: GroundKind) -> Color {
    match ground {
        GroundKind::Default => Color::from_rgb_u8(70, 74, 80),
        GroundKind::SafeZone => Color::from_rgb_u8(60, 120, 70),
        GroundKind::Wall => Color::from_rgb_u8(110, 90, 80),
        GroundKind::ParkingLot => Color::from_rgb_u8(40, 40, 44),
    }
}

/// Fill used for a placed entity.
#[must_use]
pub const fn entity_color(kind: EntityKind) -> Color {
    match kind {
        EntityKind::Turret => Color::from_rgb_u8(60, 110, 200),
        EntityKind::Obstacle => Color::from_rgb_u8(200, 140, 50),
    }
}

/// Fill used for an enemy vehicle.
#[must_use]
pub const fn enemy_color(kind: EnemyKind) -> Color {
    match kind {
        EnemyKind::Van => Color::from_rgb_u8(220, 220, 220),
        EnemyKind::Pickup => Color::from_rgb_u8(180, 40, 40),
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position already mapped into logical units by a [`Viewport`].
    pub cursor_logical: Vec2,
    /// Whether the primary button is held down.
    pub primary_down: bool,
    /// Whether the primary button went down on this frame.
    pub primary_pressed: bool,
    /// Whether the secondary button went down on this frame.
    pub secondary_pressed: bool,
    /// Whether the window was asked to close.
    pub exit_requested: bool,
}

impl FrameInput {
    /// Cursor position truncated onto the integer logical pixel grid.
    #[must_use]
    pub fn logical_cursor(&self) -> (i32, i32) {
        (
            self.cursor_logical.x.floor() as i32,
            self.cursor_logical.y.floor() as i32,
        )
    }
}

/// Maps window coordinates onto the fixed logical resolution.
///
/// The logical frame is scaled uniformly to fit the window and centred,
/// leaving bars on the sides (pillarbox) or top and bottom (letterbox) when
/// the aspect ratios differ.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    window: Vec2,
    logical: Vec2,
}

impl Viewport {
    /// Creates a viewport for a window of the provided size.
    pub fn new(window_width: f32, window_height: f32) -> Result<Self, RenderingError> {
        let valid = |value: f32| value.is_finite() && value > 0.0;
        if !valid(window_width) || !valid(window_height) {
            return Err(RenderingError::InvalidWindowSize {
                width: window_width,
                height: window_height,
            });
        }

        Ok(Self {
            window: Vec2::new(window_width, window_height),
            logical: Vec2::new(LOGICAL_WIDTH as f32, LOGICAL_HEIGHT as f32),
        })
    }

    /// Uniform factor applied to logical units when drawing into the window.
    #[must_use]
    pub fn scale(&self) -> f32 {
        let ratio = self.window / self.logical;
        ratio.x.min(ratio.y)
    }

    /// Window-space rectangle covered by the logical frame, as origin and size.
    #[must_use]
    pub fn presentation_area(&self) -> (Vec2, Vec2) {
        let size = self.logical * self.scale();
        ((self.window - size) / 2.0, size)
    }

    /// Converts a window-space position into logical units.
    ///
    /// Positions on the bars are clamped onto the nearest edge of the frame.
    #[must_use]
    pub fn to_logical(&self, window_position: Vec2) -> Vec2 {
        let (origin, _) = self.presentation_area();
        let logical = (window_position - origin) / self.scale();
        logical.clamp(Vec2::ZERO, self.logical)
    }

    /// Converts a logical position into window coordinates.
    #[must_use]
    pub fn to_window(&self, logical_position: Vec2) -> Vec2 {
        let (origin, _) = self.presentation_area();
        origin + logical_position * self.scale()
    }
}

/// Ground and occupant of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneCell {
    /// Location of the cell.
    pub coord: CellCoord,
    /// Ground the cell is made of.
    pub ground: GroundKind,
    /// Entity placed in the cell, if any.
    pub occupant: Option<EntityKind>,
}

/// Enemy vehicle visible in the scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEnemy {
    /// Vehicle type of the enemy.
    pub kind: EnemyKind,
    /// Collider in logical units.
    pub collider: Rect,
}

/// Button drawn on the menu panel.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneButton {
    /// Caption of the button.
    pub label: String,
    /// Area of the button in logical units.
    pub bounds: Rect,
    /// Whether the button reflects the current selection or is held down.
    pub highlighted: bool,
}

/// Menu panel drawn over the leftmost columns.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuPresentation {
    /// Title shown at the top of the panel.
    pub title: String,
    /// Balance shown below the title.
    pub balance: u32,
    /// Buttons in top-to-bottom order.
    pub buttons: Vec<SceneButton>,
}

impl MenuPresentation {
    /// Text of the balance readout.
    #[must_use]
    pub fn balance_label(&self) -> String {
        format!("$: {}", self.balance)
    }
}

/// Scene description of a single frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Number of cell columns.
    pub columns: u32,
    /// Number of cell rows.
    pub rows: u32,
    /// Side length of a cell in logical units.
    pub cell_length: f32,
    /// Every cell in row-major order.
    pub cells: Vec<SceneCell>,
    /// Enemies in the order they spawned.
    pub enemies: Vec<SceneEnemy>,
    /// Colliders of the projectiles in flight.
    pub projectiles: Vec<Rect>,
    /// Menu panel content.
    pub menu: MenuPresentation,
    /// Current state of the run.
    pub game_state: GameState,
    /// Cell under the cursor.
    pub hovered_cell: Option<CellCoord>,
    /// Tool placed by a primary click on an empty cell.
    pub selected_tool: Option<EntityKind>,
}

impl Scene {
    /// Creates an empty scene for a grid of the provided dimensions.
    #[must_use]
    pub fn new<T>(columns: u32, rows: u32, cell_length: f32, title: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            columns,
            rows,
            cell_length,
            cells: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            menu: MenuPresentation {
                title: title.into(),
                balance: 0,
                buttons: Vec::new(),
            },
            game_state: GameState::Setup,
            hovered_cell: None,
            selected_tool: None,
        }
    }

    /// Fill of the cell: the occupant's color when present, otherwise the ground's.
    #[must_use]
    pub fn cell_color(&self, cell: &SceneCell) -> Color {
        let base = match cell.occupant {
            Some(kind) => entity_color(kind),
            None => ground_color(cell.ground),
        };
        if self.hovered_cell == Some(cell.coord) {
            base.lighten(0.2)
        } else {
            base
        }
    }

    /// Banner shown over the grid, if the run is not in progress.
    #[must_use]
    pub const fn banner(&self) -> Option<&'static str> {
        match self.game_state {
            GameState::Setup => Some("Build your defences, then press Play"),
            GameState::Paused => Some("Paused"),
            GameState::Won => Some("You held the line"),
            GameState::Lost => Some("No room left"),
            GameState::Active => None,
        }
    }

    /// Flattens the scene into primitives in back-to-front paint order.
    ///
    /// Cells come first, then enemies, projectiles and the hover outline.
    /// The menu panel is painted over the leftmost columns afterwards, so the
    /// outline of a hovered menu cell stays hidden. The banner is painted last.
    #[must_use]
    pub fn draw_list(&self) -> Vec<DrawCommand> {
        let length = f64::from(self.cell_length);
        let cell_rect = |coord: CellCoord| {
            Rect::new(
                f64::from(coord.column()) * length,
                f64::from(coord.row()) * length,
                length,
                length,
            )
        };

        let mut commands = Vec::with_capacity(self.cells.len() + self.enemies.len() + 16);
        commands.extend(self.cells.iter().map(|cell| DrawCommand::FillRect {
            rect: cell_rect(cell.coord),
            color: self.cell_color(cell),
        }));
        commands.extend(self.enemies.iter().map(|enemy| DrawCommand::FillRect {
            rect: enemy.collider,
            color: enemy_color(enemy.kind),
        }));
        commands.extend(self.projectiles.iter().map(|&rect| DrawCommand::FillRect {
            rect,
            color: PROJECTILE_COLOR,
        }));
        if let Some(coord) = self.hovered_cell {
            commands.push(DrawCommand::OutlineRect {
                rect: cell_rect(coord),
                color: HOVER_OUTLINE_COLOR,
            });
        }

        commands.push(DrawCommand::FillRect {
            rect: Rect::new(
                0.0,
                0.0,
                f64::from(MENU_COLUMNS) * length,
                f64::from(self.rows) * length,
            ),
            color: MENU_COLOR,
        });
        commands.push(DrawCommand::Text {
            text: self.menu.title.clone(),
            position: Vec2::new(25.0, 10.0),
            color: TEXT_COLOR,
        });
        commands.push(DrawCommand::Text {
            text: self.menu.balance_label(),
            position: Vec2::new(25.0, 50.0),
            color: TEXT_COLOR,
        });
        for button in &self.menu.buttons {
            let shade = if button.highlighted { 0.45 } else { 0.2 };
            commands.push(DrawCommand::FillRect {
                rect: button.bounds,
                color: MENU_COLOR.lighten(shade),
            });
            commands.push(DrawCommand::Text {
                text: button.label.clone(),
                position: Vec2::new(
                    (button.bounds.x() + 10.0) as f32,
                    (button.bounds.y() + 10.0) as f32,
                ),
                color: TEXT_COLOR,
            });
        }

        if let Some(banner) = self.banner() {
            commands.push(DrawCommand::Text {
                text: banner.to_owned(),
                position: Vec2::new(LOGICAL_WIDTH as f32 / 2.0, LOGICAL_HEIGHT as f32 / 2.0),
                color: TEXT_COLOR,
            });
        }
        commands
    }
}

/// Backend-independent drawing primitive in logical units.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Solid rectangle.
    FillRect {
        /// Area to fill.
        rect: Rect,
        /// Fill color.
        color: Color,
    },
    /// One-unit rectangle outline.
    OutlineRect {
        /// Area to outline.
        rect: Rect,
        /// Stroke color.
        color: Color,
    },
    /// Text label.
    Text {
        /// Text to draw.
        text: String,
        /// Top-left corner of the text.
        position: Vec2,
        /// Glyph color.
        color: Color,
    },
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting No Room scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the simulated frame delta,
    /// per-frame input captured by the adapter, and may mutate the scene before
    /// it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq)]
pub enum RenderingError {
    /// Window extents must be finite and positive.
    InvalidWindowSize {
        /// Provided width.
        width: f32,
        /// Provided height.
        height: f32,
    },
}

impl fmt::Display for RenderingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWindowSize { width, height } => {
                write!(f, "window size must be positive (received {width}x{height})")
            }
        }
    }
}

impl Error for RenderingError {}
