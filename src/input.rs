use egui::{Context, Event, PointerButton, Pos2, Rect, TouchPhase};

/// Phase of a single pointer sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Press,
    Move,
    Release,
    Cancel,
    /// The pointer left the drawing surface
    Leave,
}

impl PointerPhase {
    /// True for every phase that ends a gesture
    pub fn ends_gesture(&self) -> bool {
        matches!(
            self,
            PointerPhase::Release | PointerPhase::Cancel | PointerPhase::Leave
        )
    }
}

/// A phase-tagged pointer position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub phase: PointerPhase,
    pub position: Pos2,
}

impl PointerSample {
    pub fn new(phase: PointerPhase, position: Pos2) -> Self {
        Self { phase, position }
    }

    pub fn press(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Press, Pos2::new(x, y))
    }

    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Move, Pos2::new(x, y))
    }

    pub fn release(x: f32, y: f32) -> Self {
        Self::new(PointerPhase::Release, Pos2::new(x, y))
    }

    /// Translate a viewport position into the coordinates of a surface whose top-left corner
    /// sits at `origin` on screen
    pub fn relative_to(self, origin: Pos2) -> Self {
        Self {
            phase: self.phase,
            position: self.position - origin.to_vec2(),
        }
    }
}

/// Turns raw egui input into pointer samples for the drawing surface
#[derive(Debug, Default)]
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    inside_canvas: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect this frame's samples. Positions stay in viewport coordinates.
    pub fn process_input(&mut self, ctx: &Context, canvas_rect: Rect) -> Vec<PointerSample> {
        ctx.input(|input| self.translate(&input.raw.events, canvas_rect))
    }

    pub fn translate(&mut self, events: &[Event], canvas_rect: Rect) -> Vec<PointerSample> {
        let mut samples = Vec::new();

        for event in events {
            match event {
                Event::PointerMoved(pos) => {
                    let inside = canvas_rect.contains(*pos);
                    if inside {
                        samples.push(PointerSample::new(PointerPhase::Move, *pos));
                    } else if self.inside_canvas {
                        samples.push(PointerSample::new(PointerPhase::Leave, *pos));
                    }
                    self.inside_canvas = inside;
                    self.last_pointer_pos = Some(*pos);
                }
                Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    // Clicks on the toolbar never reach the canvas
                    if !canvas_rect.contains(*pos) {
                        continue;
                    }
                    let phase = if *pressed {
                        PointerPhase::Press
                    } else {
                        PointerPhase::Release
                    };
                    samples.push(PointerSample::new(phase, *pos));
                    self.inside_canvas = true;
                    self.last_pointer_pos = Some(*pos);
                }
                Event::PointerGone => {
                    if self.inside_canvas {
                        let pos = self.last_pointer_pos.unwrap_or(canvas_rect.min);
                        samples.push(PointerSample::new(PointerPhase::Leave, pos));
                    }
                    self.inside_canvas = false;
                    self.last_pointer_pos = None;
                }
                Event::Touch {
                    phase: TouchPhase::Cancel,
                    pos,
                    ..
                } => {
                    samples.push(PointerSample::new(PointerPhase::Cancel, *pos));
                }
                _ => {}
            }
        }

        samples
    }
}
