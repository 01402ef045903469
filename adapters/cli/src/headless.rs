//! Windowless rendering backend driving the simulation at a fixed frame rate.

use std::{collections::BTreeMap, time::Duration};

use anyhow::Result;
use glam::Vec2;
use no_room_rendering::{
    Color, DrawCommand, FrameInput, Presentation, RenderingBackend, Scene, Viewport,
};
use tracing::{debug, info, trace};

/// Pointer event replayed on a given frame, expressed in window coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ScriptedClick {
    pub(crate) window_position: Vec2,
    pub(crate) secondary: bool,
}

/// Backend that steps frames back to back without presenting them.
#[derive(Debug)]
pub(crate) struct HeadlessBackend {
    viewport: Viewport,
    frame_duration: Duration,
    max_frames: u64,
    script: BTreeMap<u64, ScriptedClick>,
}

impl HeadlessBackend {
    pub(crate) fn new(viewport: Viewport, frame_duration: Duration, max_frames: u64) -> Self {
        Self {
            viewport,
            frame_duration,
            max_frames,
            script: BTreeMap::new(),
        }
    }

    /// Schedules a click on the provided frame, replacing any click already there.
    #[must_use]
    pub(crate) fn with_click(mut self, frame: u64, click: ScriptedClick) -> Self {
        let _ = self.script.insert(frame, click);
        self
    }

    fn input_for(&self, frame: u64) -> FrameInput {
        if frame >= self.max_frames {
            return FrameInput {
                exit_requested: true,
                ..FrameInput::default()
            };
        }
        let Some(click) = self.script.get(&frame) else {
            return FrameInput::default();
        };
        FrameInput {
            cursor_logical: self.viewport.to_logical(click.window_position),
            primary_down: !click.secondary,
            primary_pressed: !click.secondary,
            secondary_pressed: click.secondary,
            exit_requested: false,
        }
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Presentation {
            window_title,
            clear_color,
            mut scene,
        } = presentation;
        info!(title = %window_title, max_frames = self.max_frames, "headless run started");

        let mut frame = 0;
        let mut banner = None;
        loop {
            let input = self.input_for(frame);
            if input.exit_requested {
                debug!(frame, "frame budget exhausted");
                break;
            }
            update_scene(self.frame_duration, input, &mut scene);
            let painted = paint(clear_color, &scene);
            if painted.banner != banner {
                if let Some(text) = painted.banner {
                    info!(frame, balance = %painted.balance, "{text}");
                }
                banner = painted.banner;
            }
            trace!(frame, primitives = painted.primitives, "frame painted");
            frame += 1;
            if scene.game_state.is_terminal() {
                break;
            }
        }

        info!(frames = frame, state = ?scene.game_state, "headless run finished");
        Ok(())
    }
}

/// What a windowless frame would have put on screen.
#[derive(Clone, Debug, PartialEq)]
struct PaintedFrame {
    primitives: usize,
    banner: Option<&'static str>,
    balance: String,
}

fn paint(clear_color: Color, scene: &Scene) -> PaintedFrame {
    let commands = scene.draw_list();
    let visible = commands
        .iter()
        .filter(|command| match command {
            DrawCommand::FillRect { color, .. } | DrawCommand::OutlineRect { color, .. } => {
                *color != clear_color
            }
            DrawCommand::Text { .. } => true,
        })
        .count();
    PaintedFrame {
        primitives: visible,
        banner: scene.banner(),
        balance: scene.menu.balance_label(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use no_room_core::{GameState, GAME_TITLE};
    use no_room_rendering::CLEAR_COLOR;
    use std::{cell::RefCell, rc::Rc};

    fn presentation() -> Presentation {
        Presentation::new(GAME_TITLE, CLEAR_COLOR, Scene::new(32, 18, 50.0, GAME_TITLE))
    }

    #[test]
    fn runs_until_the_frame_budget_is_spent() {
        let viewport = Viewport::new(1600.0, 900.0).expect("valid window");
        let backend = HeadlessBackend::new(viewport, Duration::from_millis(10), 5);
        let frames = Rc::new(RefCell::new(Vec::new()));
        let recorded = Rc::clone(&frames);

        backend
            .run(presentation(), move |dt, _, _| recorded.borrow_mut().push(dt))
            .expect("headless run succeeds");

        assert_eq!(*frames.borrow(), vec![Duration::from_millis(10); 5]);
    }

    #[test]
    fn stops_once_the_scene_reports_a_finished_run() {
        let viewport = Viewport::new(1600.0, 900.0).expect("valid window");
        let backend = HeadlessBackend::new(viewport, Duration::from_millis(10), 100);
        let count = Rc::new(RefCell::new(0_u32));
        let recorded = Rc::clone(&count);

        backend
            .run(presentation(), move |_, _, scene| {
                *recorded.borrow_mut() += 1;
                if *recorded.borrow() == 3 {
                    scene.game_state = GameState::Won;
                }
            })
            .expect("headless run succeeds");

        assert_eq!(*count.borrow(), 3);
    }

    #[test]
    fn painted_frame_reports_banner_and_balance() {
        let mut scene = Scene::new(32, 18, 50.0, GAME_TITLE);
        scene.menu.balance = 12;

        let painted = paint(CLEAR_COLOR, &scene);
        assert_eq!(painted.banner, Some("Build your defences, then press Play"));
        assert_eq!(painted.balance, "$: 12");
        assert_eq!(painted.primitives, scene.draw_list().len());

        scene.game_state = GameState::Active;
        assert_eq!(paint(CLEAR_COLOR, &scene).banner, None);
    }

    #[test]
    fn primitives_matching_the_clear_color_are_skipped() {
        let scene = Scene::new(32, 18, 50.0, GAME_TITLE);
        let total = scene.draw_list().len();

        let painted = paint(no_room_rendering::MENU_COLOR, &scene);

        assert_eq!(painted.primitives, total - 1);
    }

    #[test]
    fn scripted_clicks_are_mapped_through_the_viewport() {
        let viewport = Viewport::new(2000.0, 900.0).expect("valid window");
        let backend = HeadlessBackend::new(viewport, Duration::from_millis(10), 3).with_click(
            1,
            ScriptedClick {
                window_position: Vec2::new(300.0, 450.0),
                secondary: true,
            },
        );

        let input = backend.input_for(1);
        assert_eq!(input.logical_cursor(), (100, 450));
        assert!(input.secondary_pressed);
        assert!(!input.primary_pressed);
        assert_eq!(backend.input_for(0), FrameInput::default());
        assert!(backend.input_for(3).exit_requested);
    }
}
