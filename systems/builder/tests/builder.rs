use no_room_core::{CellCoord, Command, EntityKind, Event, GameState, PlayerAction};
use no_room_system_builder::{Builder, InputSnapshot, MenuButton};

fn centre_of(button: MenuButton) -> (i32, i32) {
    let bounds = button.bounds();
    (
        (bounds.x() + bounds.width() / 2.0) as i32,
        (bounds.y() + bounds.height() / 2.0) as i32,
    )
}

fn primary_click(cursor: (i32, i32)) -> InputSnapshot {
    InputSnapshot {
        cursor,
        primary_down: true,
        primary_pressed: true,
        ..InputSnapshot::default()
    }
}

#[test]
fn menu_buttons_emit_state_and_tool_commands() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    for button in MenuButton::ALL {
        let action = builder.handle(&[], primary_click(centre_of(button)), &mut commands);
        assert_eq!(action, None, "menu clicks never reach the grid");
    }

    assert_eq!(
        commands,
        vec![
            Command::Play,
            Command::Pause,
            Command::SelectTool {
                tool: Some(EntityKind::Turret)
            },
            Command::SelectTool {
                tool: Some(EntityKind::Obstacle)
            },
        ]
    );
}

#[test]
fn menu_clicks_outside_buttons_do_nothing() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    let action = builder.handle(&[], primary_click((100, 20)), &mut commands);

    assert_eq!(action, None);
    assert!(commands.is_empty());
}

#[test]
fn primary_click_on_grid_activates_hovered_cell() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    let action = builder.handle(&[], primary_click((725, 410)), &mut commands);

    assert_eq!(
        action,
        Some(PlayerAction::Activate {
            cell: CellCoord::new(14, 8)
        })
    );
    assert!(commands.is_empty());
}

#[test]
fn secondary_click_quick_places_an_obstacle() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();
    let input = InputSnapshot {
        cursor: (1_010, 60),
        secondary_pressed: true,
        ..InputSnapshot::default()
    };

    let action = builder.handle(&[], input, &mut commands);

    assert_eq!(
        action,
        Some(PlayerAction::Place {
            cell: CellCoord::new(20, 1),
            kind: EntityKind::Obstacle,
        })
    );
}

#[test]
fn primary_click_takes_precedence_over_secondary() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();
    let input = InputSnapshot {
        secondary_pressed: true,
        ..primary_click((300, 300))
    };

    let action = builder.handle(&[], input, &mut commands);

    assert_eq!(
        action,
        Some(PlayerAction::Activate {
            cell: CellCoord::new(6, 6)
        })
    );
}

#[test]
fn held_button_without_press_is_ignored() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();
    let input = InputSnapshot {
        cursor: (600, 600),
        primary_down: true,
        ..InputSnapshot::default()
    };

    assert_eq!(builder.handle(&[], input, &mut commands), None);
}

#[test]
fn cursor_outside_the_grid_is_clamped_onto_the_edge() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();

    let action = builder.handle(&[], primary_click((2_000, -30)), &mut commands);

    assert_eq!(
        action,
        Some(PlayerAction::Activate {
            cell: CellCoord::new(31, 0)
        })
    );
}

#[test]
fn finished_runs_produce_no_commands() {
    let mut builder = Builder::default();
    let mut commands = Vec::new();
    let events = [Event::GameStateChanged {
        from: GameState::Active,
        to: GameState::Lost,
    }];

    let action = builder.handle(&events, primary_click((725, 410)), &mut commands);
    assert_eq!(action, None);
    assert_eq!(builder.game_state(), GameState::Lost);

    let action = builder.handle(&[], primary_click(centre_of(MenuButton::Play)), &mut commands);
    assert_eq!(action, None);
    assert!(commands.is_empty());
}
