use egui::Pos2;

use crate::history::SnapshotHistory;
use crate::input::{PointerPhase, PointerSample};
use crate::surface::Surface;
use crate::tool::ToolState;

/// Gesture state of the recorder
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum StrokeState {
    #[default]
    Idle,
    /// A stroke is in progress; segments continue from `last`
    Active { last: Pos2 },
}

/// What a sample did to the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeOutcome {
    /// Nothing happened (e.g. a move with no button held)
    Ignored,
    /// A gesture began and an undo snapshot was attempted
    Started,
    /// A segment was drawn
    Drew,
    /// The gesture ended
    Ended,
}

/// Turns pointer samples into line segments on the drawing surface.
///
/// ```text
///  Idle ──press──► Active ──release / cancel / leave──► Idle
///                   │  ▲
///                   └──┘ move: draw segment, advance cursor
/// ```
#[derive(Debug, Default)]
pub struct StrokeRecorder {
    state: StrokeState,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, StrokeState::Active { .. })
    }

    /// Feed one sample, already in surface coordinates
    pub fn handle(
        &mut self,
        sample: PointerSample,
        tools: &ToolState,
        surface: &mut dyn Surface,
        history: &mut SnapshotHistory,
    ) -> StrokeOutcome {
        match (sample.phase, self.state) {
            (PointerPhase::Press, _) => {
                // Every press is its own undo unit, even if no segment follows.
                history.snapshot(surface);
                self.state = StrokeState::Active {
                    last: sample.position,
                };
                log::debug!("Stroke started at {:?} with {}", sample.position, tools.mode.name());
                StrokeOutcome::Started
            }
            (PointerPhase::Move, StrokeState::Active { last }) => {
                surface.stroke_line(last, sample.position, &tools.line_style());
                self.state = StrokeState::Active {
                    last: sample.position,
                };
                StrokeOutcome::Drew
            }
            (phase, StrokeState::Active { .. }) if phase.ends_gesture() => {
                self.state = StrokeState::Idle;
                log::debug!("Stroke ended ({:?})", phase);
                StrokeOutcome::Ended
            }
            _ => StrokeOutcome::Ignored,
        }
    }

    /// Drop any gesture in progress without drawing
    pub fn reset(&mut self) {
        self.state = StrokeState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::PixelSurface;
    use crate::tool::ToolMode;

    struct Rig {
        recorder: StrokeRecorder,
        tools: ToolState,
        surface: PixelSurface,
        history: SnapshotHistory,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                recorder: StrokeRecorder::new(),
                tools: ToolState::default(),
                surface: PixelSurface::new(64, 64),
                history: SnapshotHistory::new(),
            }
        }

        fn feed(&mut self, sample: PointerSample) -> StrokeOutcome {
            self.recorder
                .handle(sample, &self.tools, &mut self.surface, &mut self.history)
        }
    }

    #[test]
    fn test_moves_without_press_are_ignored() {
        let mut rig = Rig::new();
        assert_eq!(rig.feed(PointerSample::moved(10.0, 10.0)), StrokeOutcome::Ignored);
        assert_eq!(rig.feed(PointerSample::release(10.0, 10.0)), StrokeOutcome::Ignored);
        assert!(rig.surface.is_blank());
        assert!(!rig.history.can_undo());
    }

    #[test]
    fn test_stroke_lifecycle() {
        let mut rig = Rig::new();
        assert_eq!(rig.feed(PointerSample::press(10.0, 10.0)), StrokeOutcome::Started);
        assert!(rig.recorder.is_active());
        assert_eq!(rig.history.undo_len(), 1);

        assert_eq!(rig.feed(PointerSample::moved(30.0, 10.0)), StrokeOutcome::Drew);
        assert_eq!(rig.feed(PointerSample::moved(30.0, 30.0)), StrokeOutcome::Drew);
        assert_eq!(
            rig.recorder.state(),
            StrokeState::Active {
                last: Pos2::new(30.0, 30.0)
            }
        );
        assert_eq!(rig.feed(PointerSample::release(30.0, 30.0)), StrokeOutcome::Ended);
        assert!(!rig.recorder.is_active());

        assert_eq!(rig.surface.pixel(20, 9)[3], 255);
        assert_eq!(rig.surface.pixel(29, 20)[3], 255);

        // Segments stop after the release.
        assert_eq!(rig.feed(PointerSample::moved(60.0, 60.0)), StrokeOutcome::Ignored);
        assert_eq!(rig.surface.pixel(50, 50)[3], 0);
    }

    #[test]
    fn test_press_without_move_is_still_undoable() {
        let mut rig = Rig::new();
        rig.feed(PointerSample::press(5.0, 5.0));
        rig.feed(PointerSample::release(5.0, 5.0));
        assert!(rig.surface.is_blank());
        assert_eq!(rig.history.undo_len(), 1);
    }

    #[test]
    fn test_leave_and_cancel_end_the_gesture() {
        let mut rig = Rig::new();
        for phase in [PointerPhase::Leave, PointerPhase::Cancel] {
            rig.feed(PointerSample::press(5.0, 5.0));
            let outcome = rig.feed(PointerSample::new(phase, Pos2::new(6.0, 6.0)));
            assert_eq!(outcome, StrokeOutcome::Ended);
            assert!(!rig.recorder.is_active());
        }
    }

    #[test]
    fn test_eraser_mode_erases() {
        let mut rig = Rig::new();
        let rect = rig.surface.full_rect();
        rig.surface.fill_rect(rect, egui::Color32::RED);
        rig.tools.set_mode(ToolMode::Eraser);

        rig.feed(PointerSample::press(0.0, 32.0));
        rig.feed(PointerSample::moved(64.0, 32.0));
        rig.feed(PointerSample::release(64.0, 32.0));

        assert_eq!(rig.surface.pixel(32, 32), [0, 0, 0, 0]);
        assert_eq!(rig.surface.pixel(32, 2), [255, 0, 0, 255]);
    }

    #[test]
    fn test_tool_changes_apply_mid_stroke() {
        let mut rig = Rig::new();
        rig.feed(PointerSample::press(10.0, 10.0));
        rig.feed(PointerSample::moved(10.0, 20.0));
        rig.tools.set_pen_color(egui::Color32::RED);
        rig.feed(PointerSample::moved(10.0, 40.0));

        let [r, _, _, a] = rig.surface.pixel(9, 35);
        assert_eq!((r, a), (255, 255));
    }
}
