//! Copies world queries into the render contract.

use no_room_core::{GameState, Point};
use no_room_rendering::{Scene, SceneButton, SceneCell, SceneEnemy};
use no_room_system_builder::{button_at, hovered_cell, InputSnapshot, MenuButton};
use no_room_world::{query, World};

/// Refreshes every channel of the scene from the world and the frame's input.
pub(crate) fn capture(world: &World, input: &InputSnapshot, scene: &mut Scene) {
    let grid = query::grid_view(world);
    scene.columns = grid.columns();
    scene.rows = grid.rows();
    scene.cell_length = grid.cell_length() as f32;
    scene.cells.clear();
    scene.cells.extend(grid.iter().map(|(coord, cell)| SceneCell {
        coord,
        ground: cell.ground,
        occupant: cell.occupant,
    }));

    scene.enemies.clear();
    scene.enemies.extend(query::enemy_view(world).iter().map(|enemy| SceneEnemy {
        kind: enemy.kind,
        collider: enemy.collider,
    }));
    scene.projectiles = query::projectiles(world);

    let state = query::game_state(world);
    let selected_tool = query::selected_tool(world);
    let held = input
        .primary_down
        .then(|| {
            button_at(Point::new(
                f64::from(input.cursor.0),
                f64::from(input.cursor.1),
            ))
        })
        .flatten();

    scene.game_state = state;
    scene.selected_tool = selected_tool;
    scene.hovered_cell = Some(hovered_cell(input.cursor));
    scene.menu.balance = query::balance(world);
    scene.menu.buttons = MenuButton::ALL
        .into_iter()
        .map(|button| {
            let selected = match button {
                MenuButton::Play => state == GameState::Active,
                MenuButton::Pause => state == GameState::Paused,
                MenuButton::Tool(kind) => selected_tool == Some(kind),
            };
            SceneButton {
                label: button.label().to_owned(),
                bounds: button.bounds(),
                highlighted: selected || held == Some(button),
            }
        })
        .collect();
}
