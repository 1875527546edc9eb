//! Drawing Pad against the mock host

use std::rc::Rc;

use playroom_activities::catalog::PEN_COLORS;
use playroom_activities::drawing_pad::CLEAR_BURST;
use playroom_activities::DrawingPad;
use playroom_core::{Activity, ActivityContext, Cue, PointerId, Surface, Vec2};
use playroom_host_mock::gesture;
use playroom_host_mock::{MockHost, MockSurface, RecordingServices};

struct Fixture {
    host: Rc<MockHost>,
    surface: Rc<MockSurface>,
    services: RecordingServices,
    game: DrawingPad,
}

fn fixture() -> Fixture {
    let host = MockHost::shared();
    let surface = Rc::new(MockSurface::new(800.0, 600.0));
    let services = RecordingServices::new();
    let context = ActivityContext::new(host.clone(), services.services());
    let mut game = DrawingPad::new(context);
    game.mount(surface.clone()).unwrap();
    Fixture {
        host,
        surface,
        services,
        game,
    }
}

/// Draw a straight line with pointer 1
fn stroke(f: &Fixture, from: Vec2, to: Vec2) {
    let canvas = f.game.canvas().unwrap();
    f.host.pointer_down(1, from, Some(canvas));
    f.host.pointer_move(1, to);
    f.host.pointer_up(1, to);
}

fn dot_colors(f: &Fixture) -> Vec<String> {
    f.game
        .dots()
        .into_iter()
        .filter_map(|d| f.surface.color(d))
        .collect()
}

// =============================================================================
// Drawing
// =============================================================================

#[test]
fn test_mount_selects_first_color() {
    let f = fixture();

    let buttons = f.game.color_buttons();
    assert_eq!(buttons.len(), PEN_COLORS.len());
    assert!(f.surface.has_class(buttons[0], "active"));
    assert!(buttons[1..].iter().all(|b| !f.surface.has_class(*b, "active")));
    let canvas = f.surface.bounds(f.game.canvas().unwrap()).unwrap();
    assert!((canvas.x - 50.0).abs() < 0.001);
    assert!((canvas.width - 700.0).abs() < 0.001);
    assert_eq!(f.services.audio.cues(), vec![Cue::Pop]);
}

#[test]
fn test_stroke_lays_continuous_dots() {
    let f = fixture();
    let canvas = f.game.canvas().unwrap();

    f.host.pointer_down(1, Vec2::new(100.0, 100.0), Some(canvas));
    assert!(f.game.is_drawing());
    assert_eq!(f.surface.captured(PointerId(1)), Some(canvas));
    assert_eq!(f.services.audio.count(Cue::Pop), 2);
    assert_eq!(f.game.dots().len(), 1);

    f.host.pointer_move(1, Vec2::new(130.0, 100.0));
    assert_eq!(f.game.dots().len(), 5);
    let last = f.surface.center(*f.game.dots().last().unwrap()).unwrap();
    assert!(last.approx_eq(Vec2::new(130.0, 100.0), 0.001));
    assert!(dot_colors(&f).iter().all(|c| c == PEN_COLORS[0]));

    f.host.pointer_up(1, Vec2::new(130.0, 100.0));
    assert!(!f.game.is_drawing());
    assert_eq!(f.surface.captured(PointerId(1)), None);
    f.host.pointer_move(1, Vec2::new(200.0, 100.0));
    assert_eq!(f.game.dots().len(), 5);
}

#[test]
fn test_second_pointer_does_not_draw() {
    let f = fixture();
    let canvas = f.game.canvas().unwrap();
    f.host.pointer_down(1, Vec2::new(100.0, 100.0), Some(canvas));

    f.host.pointer_down(2, Vec2::new(300.0, 300.0), Some(canvas));
    f.host.pointer_move(2, Vec2::new(400.0, 300.0));
    f.host.pointer_up(2, Vec2::new(400.0, 300.0));

    assert_eq!(f.game.dots().len(), 1);
    assert!(f.game.is_drawing());
}

#[test]
fn test_dots_stay_on_canvas() {
    let f = fixture();

    // Canvas bottom edge is at y = 440
    stroke(&f, Vec2::new(100.0, 430.0), Vec2::new(100.0, 520.0));

    assert_eq!(f.game.dots().len(), 2);
}

// =============================================================================
// Palette
// =============================================================================

#[test]
fn test_color_selection() {
    let f = fixture();
    let buttons = f.game.color_buttons();

    gesture::press(&f.host, &f.surface, buttons[2]);
    stroke(&f, Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0));

    assert!(f.surface.has_class(buttons[2], "active"));
    assert!(!f.surface.has_class(buttons[0], "active"));
    assert_eq!(dot_colors(&f), vec![PEN_COLORS[2].to_string()]);
}

#[test]
fn test_rainbow_pencil_cycles_hue() {
    let f = fixture();
    let rainbow = f.game.rainbow_button().unwrap();

    gesture::press(&f.host, &f.surface, rainbow);
    assert!(f.game.is_rainbow());
    assert!(f.surface.has_class(rainbow, "active"));
    assert!(f.game.color_buttons().iter().all(|b| !f.surface.has_class(*b, "active")));

    stroke(&f, Vec2::new(100.0, 100.0), Vec2::new(107.5, 100.0));
    assert_eq!(
        dot_colors(&f),
        vec!["hsl(2, 100%, 50%)".to_string(), "hsl(4, 100%, 50%)".to_string()]
    );

    gesture::press(&f.host, &f.surface, rainbow);
    assert!(!f.game.is_rainbow());
    assert!(!f.surface.has_class(rainbow, "active"));
}

#[test]
fn test_clear_wipes_canvas() {
    let f = fixture();
    stroke(&f, Vec2::new(100.0, 100.0), Vec2::new(300.0, 200.0));
    assert!(!f.surface.find_by_class("stroke-dot").is_empty());
    let pops = f.services.audio.count(Cue::Pop);

    gesture::press(&f.host, &f.surface, f.game.clear_button().unwrap());

    assert!(f.game.dots().is_empty());
    assert!(f.surface.find_by_class("stroke-dot").is_empty());
    assert_eq!(f.services.audio.count(Cue::Pop), pops + 1);
    let burst = f.services.effects.bursts()[0];
    assert_eq!(burst.count, CLEAR_BURST);
    assert!((burst.x - 400.0).abs() < 0.001);
    assert!((burst.y - 240.0).abs() < 0.001);
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_pause_ends_stroke() {
    let mut f = fixture();
    let canvas = f.game.canvas().unwrap();
    f.host.pointer_down(1, Vec2::new(100.0, 100.0), Some(canvas));

    f.game.pause();

    assert!(!f.game.is_drawing());
    assert_eq!(f.surface.captured(PointerId(1)), None);
}

#[test]
fn test_unmount_mid_stroke() {
    let mut f = fixture();
    let canvas = f.game.canvas().unwrap();
    f.host.pointer_down(1, Vec2::new(100.0, 100.0), Some(canvas));
    f.host.pointer_move(1, Vec2::new(200.0, 150.0));

    f.game.unmount();
    f.host.pointer_move(1, Vec2::new(300.0, 150.0));

    assert_eq!(f.host.outstanding(), 0);
    assert_eq!(f.surface.element_count(), 0);
    assert!(f.game.dots().is_empty());
}
