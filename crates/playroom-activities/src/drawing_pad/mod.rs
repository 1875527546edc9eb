//! Drawing Pad
//!
//! A white canvas with a five-color palette, a rainbow pencil and a clear
//! button. Strokes are laid down as round dots, filled in between pointer
//! samples so fast strokes stay continuous. One pointer draws at a time.

use std::cell::RefCell;
use std::rc::Rc;

use playroom_core::{
    Activity, ActivityContext, ActivityError, ActivityManifest, Cue, ElementId, ElementSpec,
    EventKind, EventTarget, InputEvent, Lifecycle, ListenOptions, PointerId, Rect, Size, Stage,
    Vec2,
};
use tracing::{debug, trace};

use crate::catalog::PEN_COLORS;
use crate::layout::require_size;
use crate::manifest::DRAWING_PAD_MANIFEST;

/// Canvas size in surface pixels
pub const CANVAS_SIZE: Size = Size::new(700.0, 400.0);

/// Stroke width (px)
pub const LINE_WIDTH: f32 = 15.0;

/// Hue step of the rainbow pencil per sample (degrees)
pub const RAINBOW_STEP: u32 = 2;

/// Particles when the canvas is cleared
pub const CLEAR_BURST: u32 = 15;

const CANVAS_TOP: f32 = 40.0;
const BUTTON_SIZE: Size = Size::new(60.0, 60.0);
const BUTTON_GAP: f32 = 16.0;
const PALETTE_MARGIN: f32 = 30.0;
const MIN_SURFACE: Size = Size::new(720.0, 560.0);

/// Dots are laid every half stroke width along a segment
const DOT_SPACING: f32 = LINE_WIDTH / 2.0;

/// Finger painting
pub struct DrawingPad {
    lifecycle: Lifecycle,
    pad: Option<Rc<Pad>>,
}

struct Pad {
    stage: Stage,
    canvas: ElementId,
    color_buttons: Vec<ElementId>,
    rainbow_button: ElementId,
    clear_button: ElementId,
    state: RefCell<PadState>,
}

#[derive(Default)]
struct PadState {
    color: &'static str,
    rainbow: bool,
    hue: u32,
    stroke: Option<Stroke>,
    dots: Vec<ElementId>,
}

struct Stroke {
    pointer: PointerId,
    last: Vec2,
}

impl DrawingPad {
    pub fn new(context: ActivityContext) -> Self {
        Self {
            lifecycle: Lifecycle::new(context, DRAWING_PAD_MANIFEST.id),
            pad: None,
        }
    }

    pub fn canvas(&self) -> Option<ElementId> {
        self.pad.as_ref().map(|p| p.canvas)
    }

    /// Palette buttons in [`PEN_COLORS`] order
    pub fn color_buttons(&self) -> Vec<ElementId> {
        self.pad
            .as_ref()
            .map(|p| p.color_buttons.clone())
            .unwrap_or_default()
    }

    pub fn rainbow_button(&self) -> Option<ElementId> {
        self.pad.as_ref().map(|p| p.rainbow_button)
    }

    pub fn clear_button(&self) -> Option<ElementId> {
        self.pad.as_ref().map(|p| p.clear_button)
    }

    /// Dots drawn since the last clear
    pub fn dots(&self) -> Vec<ElementId> {
        self.pad
            .as_ref()
            .map(|p| p.state.borrow().dots.clone())
            .unwrap_or_default()
    }

    pub fn is_drawing(&self) -> bool {
        self.pad
            .as_ref()
            .is_some_and(|p| p.state.borrow().stroke.is_some())
    }

    pub fn is_rainbow(&self) -> bool {
        self.pad.as_ref().is_some_and(|p| p.state.borrow().rainbow)
    }
}

impl Activity for DrawingPad {
    fn manifest(&self) -> &'static ActivityManifest {
        &DRAWING_PAD_MANIFEST
    }

    fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn build(&mut self, stage: &Stage) -> Result<(), ActivityError> {
        let surface = stage.surface();
        let size = surface.size();
        require_size(self.id(), size, MIN_SURFACE)?;

        let left = (size.width - CANVAS_SIZE.width) / 2.0;
        let canvas = surface.append(
            None,
            ElementSpec::new("drawing-canvas")
                .color("#ffffff")
                .at(Vec2::new(left, CANVAS_TOP))
                .sized(CANVAS_SIZE),
        );

        let palette_top = CANVAS_TOP + CANVAS_SIZE.height + PALETTE_MARGIN;
        let palette = surface.append(
            None,
            ElementSpec::new("color-palette")
                .at(Vec2::new(0.0, palette_top))
                .sized(Size::new(size.width, BUTTON_SIZE.height)),
        );
        let count = PEN_COLORS.len() + 2;
        let row_width = count as f32 * BUTTON_SIZE.width + (count - 1) as f32 * BUTTON_GAP;
        let mut x = (size.width - row_width) / 2.0;
        let mut button = |class: &str, text: &str, color: Option<&str>| {
            let mut spec = ElementSpec::new(class)
                .text(text)
                .at(Vec2::new(x, palette_top))
                .sized(BUTTON_SIZE);
            if let Some(color) = color {
                spec = spec.color(color);
            }
            x += BUTTON_SIZE.width + BUTTON_GAP;
            surface.append(Some(palette), spec)
        };
        let color_buttons: Vec<ElementId> = PEN_COLORS
            .iter()
            .map(|color| button("color-btn", "", Some(*color)))
            .collect();
        let rainbow_button = button("rainbow-btn", "🌈", None);
        let clear_button = button("clear-btn", "🗑️", None);

        let pad = Rc::new(Pad {
            stage: stage.clone(),
            canvas,
            color_buttons,
            rainbow_button,
            clear_button,
            state: RefCell::new(PadState {
                color: PEN_COLORS[0],
                ..PadState::default()
            }),
        });
        pad.attach();
        pad.select_color(0);
        self.pad = Some(pad);
        Ok(())
    }

    fn teardown(&mut self) {
        self.pad = None;
    }

    fn pause(&mut self) {
        if let Some(pad) = &self.pad {
            pad.end_stroke();
        }
    }
}

/// `hsl()` color of the rainbow pencil
pub fn rainbow_color(hue: u32) -> String {
    format!("hsl({hue}, 100%, 50%)")
}

/// Dot centers strictly after `from` up to and including `to`
pub fn interpolate(from: Vec2, to: Vec2, spacing: f32) -> Vec<Vec2> {
    let distance = from.distance(to);
    if distance <= f32::EPSILON {
        return Vec::new();
    }
    let steps = (distance / spacing).ceil().max(1.0) as usize;
    (1..=steps)
        .map(|i| from + (to - from) * (i as f32 / steps as f32))
        .collect()
}

impl Pad {
    fn listen(self: &Rc<Self>, target: EventTarget, kind: EventKind, f: impl Fn(&Rc<Pad>, &InputEvent) + 'static) {
        let weak = Rc::downgrade(self);
        self.stage
            .scope()
            .listen(target, kind, ListenOptions::default(), move |event| {
                if let Some(pad) = weak.upgrade() {
                    if pad.stage.is_mounted() {
                        f(&pad, event);
                    }
                }
            });
    }

    fn attach(self: &Rc<Self>) {
        self.listen(EventTarget::Element(self.canvas), EventKind::PointerDown, |pad, event| {
            if let Some(pointer) = event.as_pointer() {
                pad.begin_stroke(pointer.pointer_id, pointer.position);
            }
        });
        self.listen(EventTarget::Document, EventKind::PointerMove, |pad, event| {
            if let Some(pointer) = event.as_pointer() {
                pad.extend_stroke(pointer.pointer_id, pointer.position);
            }
        });
        for kind in [EventKind::PointerUp, EventKind::PointerCancel] {
            self.listen(EventTarget::Document, kind, |pad, event| {
                let owned = event.as_pointer().is_some_and(|p| {
                    pad.state
                        .borrow()
                        .stroke
                        .as_ref()
                        .is_some_and(|s| s.pointer == p.pointer_id)
                });
                if owned {
                    pad.end_stroke();
                }
            });
        }

        for index in 0..self.color_buttons.len() {
            self.listen(
                EventTarget::Element(self.color_buttons[index]),
                EventKind::PointerDown,
                move |pad, _| pad.select_color(index),
            );
        }
        self.listen(EventTarget::Element(self.rainbow_button), EventKind::PointerDown, |pad, _| {
            pad.toggle_rainbow();
        });
        self.listen(EventTarget::Element(self.clear_button), EventKind::PointerDown, |pad, _| {
            pad.clear();
        });
    }

    fn canvas_rect(&self) -> Option<Rect> {
        self.stage.surface().bounds(self.canvas)
    }

    fn begin_stroke(&self, pointer: PointerId, at: Vec2) {
        {
            let mut state = self.state.borrow_mut();
            if state.stroke.is_some() {
                return;
            }
            state.stroke = Some(Stroke { pointer, last: at });
        }
        self.stage.surface().capture_pointer(self.canvas, pointer);
        self.stage.services().audio.play_cue(Cue::Pop);
        self.dot(at);
        trace!(activity = DRAWING_PAD_MANIFEST.id, pointer = pointer.0, "stroke started");
    }

    fn extend_stroke(&self, pointer: PointerId, at: Vec2) {
        let from = {
            let mut state = self.state.borrow_mut();
            let Some(stroke) = state.stroke.as_mut().filter(|s| s.pointer == pointer) else {
                return;
            };
            std::mem::replace(&mut stroke.last, at)
        };
        for point in interpolate(from, at, DOT_SPACING) {
            self.dot(point);
        }
    }

    fn end_stroke(&self) {
        let stroke = self.state.borrow_mut().stroke.take();
        if let Some(stroke) = stroke {
            self.stage.surface().release_pointer(self.canvas, stroke.pointer);
        }
    }

    /// Lay one dot at `at` unless it falls outside the canvas
    fn dot(&self, at: Vec2) {
        let Some(rect) = self.canvas_rect() else {
            return;
        };
        if !rect.contains(at) {
            return;
        }
        let color = {
            let mut state = self.state.borrow_mut();
            if state.rainbow {
                state.hue = (state.hue + RAINBOW_STEP) % 360;
                rainbow_color(state.hue)
            } else {
                state.color.to_string()
            }
        };
        let half = LINE_WIDTH / 2.0;
        let dot = self.stage.surface().append(
            Some(self.canvas),
            ElementSpec::new("stroke-dot")
                .color(color)
                .at(at - Vec2::new(half, half))
                .sized(Size::new(LINE_WIDTH, LINE_WIDTH)),
        );
        self.state.borrow_mut().dots.push(dot);
    }

    fn highlight(&self, active: Option<ElementId>) {
        let surface = self.stage.surface();
        for button in self.color_buttons.iter().chain([&self.rainbow_button]) {
            surface.set_class(*button, "active", Some(*button) == active);
        }
    }

    fn select_color(&self, index: usize) {
        let Some(&color) = PEN_COLORS.get(index) else {
            return;
        };
        {
            let mut state = self.state.borrow_mut();
            state.color = color;
            state.rainbow = false;
        }
        self.highlight(self.color_buttons.get(index).copied());
        self.stage.services().audio.play_cue(Cue::Pop);
        debug!(activity = DRAWING_PAD_MANIFEST.id, color, "color selected");
    }

    fn toggle_rainbow(&self) {
        let rainbow = {
            let mut state = self.state.borrow_mut();
            state.rainbow = !state.rainbow;
            state.rainbow
        };
        self.highlight(rainbow.then_some(self.rainbow_button));
        self.stage.services().audio.play_cue(Cue::Pop);
    }

    fn clear(&self) {
        let dots = std::mem::take(&mut self.state.borrow_mut().dots);
        let surface = self.stage.surface();
        for dot in dots {
            surface.remove(dot);
        }
        self.stage.services().audio.play_cue(Cue::Pop);
        if let Some(rect) = self.canvas_rect() {
            let center = rect.center();
            self.stage.services().effects.burst(center.x, center.y, CLEAR_BURST);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_fills_gaps() {
        let points = interpolate(Vec2::new(0.0, 0.0), Vec2::new(30.0, 0.0), 7.5);
        assert_eq!(points.len(), 4);
        assert!(points[0].approx_eq(Vec2::new(7.5, 0.0), 0.001));
        assert!(points[3].approx_eq(Vec2::new(30.0, 0.0), 0.001));
    }

    #[test]
    fn test_interpolate_short_and_empty() {
        assert_eq!(interpolate(Vec2::new(1.0, 1.0), Vec2::new(2.0, 1.0), 7.5).len(), 1);
        assert!(interpolate(Vec2::new(1.0, 1.0), Vec2::new(1.0, 1.0), 7.5).is_empty());
    }

    #[test]
    fn test_rainbow_color() {
        assert_eq!(rainbow_color(42), "hsl(42, 100%, 50%)");
    }
}
