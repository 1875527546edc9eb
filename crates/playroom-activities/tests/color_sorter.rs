//! Color Sorter against the mock host

use std::rc::Rc;

use playroom_activities::color_sorter::{
    MATCH_BURST, MATCH_POINTS, MAX_BALLS, SORTED_REMOVE_MS, SPAWN_INTERVAL_MS,
};
use playroom_activities::ColorSorter;
use playroom_core::{Activity, ActivityContext, ActivityError, Cue, Surface, Vec2};
use playroom_host_mock::gesture;
use playroom_host_mock::{MockHost, MockSurface, RecordingServices};

struct Fixture {
    host: Rc<MockHost>,
    surface: Rc<MockSurface>,
    services: RecordingServices,
    game: ColorSorter,
}

fn fixture() -> Fixture {
    let host = MockHost::shared();
    let surface = Rc::new(MockSurface::new(800.0, 600.0));
    let services = RecordingServices::new();
    let context = ActivityContext::new(host.clone(), services.services());
    Fixture {
        host,
        surface,
        services,
        game: ColorSorter::new(context),
    }
}

/// Mount with a red ball resting at (370, 480)
fn mounted_with_red_ball() -> Fixture {
    let mut f = fixture();
    f.host.script_random([0.0, 0.5]);
    f.game.mount(f.surface.clone()).unwrap();
    f
}

const RED_BALL_ORIGIN: Vec2 = Vec2::new(370.0, 480.0);

// =============================================================================
// Board
// =============================================================================

#[test]
fn test_mount_builds_board() {
    let f = mounted_with_red_ball();

    assert_eq!(f.surface.find_by_class("sorter-bucket").len(), 3);
    assert_eq!(f.surface.find_by_text("Score: 0").len(), 1);
    assert_eq!(f.game.balls().len(), 1);
    assert_eq!(f.game.balls()[0].1, "red");
    let ball = f.game.balls()[0].0;
    assert!(f.surface.position(ball).unwrap().approx_eq(RED_BALL_ORIGIN, 0.001));
    assert_eq!(f.surface.text(ball).as_deref(), Some("🔴"));
    assert_eq!(f.services.audio.cues(), vec![Cue::Pop]);
}

#[test]
fn test_buckets_are_spread_evenly() {
    let f = mounted_with_red_ball();

    let red = f.game.bucket("red").unwrap();
    let blue = f.game.bucket("blue").unwrap();
    let green = f.game.bucket("green").unwrap();
    assert!(f.surface.center(red).unwrap().approx_eq(Vec2::new(170.0, 160.0), 0.001));
    assert!(f.surface.center(blue).unwrap().approx_eq(Vec2::new(400.0, 160.0), 0.001));
    assert!(f.surface.center(green).unwrap().approx_eq(Vec2::new(630.0, 160.0), 0.001));
    assert_eq!(f.surface.children(blue).len(), 1);
    assert!(f.game.bucket("purple").is_none());
}

#[test]
fn test_spawning_stops_at_cap() {
    let f = mounted_with_red_ball();

    f.host.advance(SPAWN_INTERVAL_MS as f64);
    assert_eq!(f.game.balls().len(), 2);
    f.host.advance(10.0 * SPAWN_INTERVAL_MS as f64);
    assert_eq!(f.game.balls().len(), MAX_BALLS);
    assert_eq!(f.surface.find_by_class("sorter-ball").len(), MAX_BALLS);
}

#[test]
fn test_small_surface_fails_build() {
    let mut f = fixture();
    f.surface.set_size(playroom_core::Size::new(300.0, 300.0));

    let result = f.game.mount(f.surface.clone());
    assert!(matches!(result, Err(ActivityError::SurfaceTooSmall { .. })));
    f.game.unmount();
    assert_eq!(f.host.outstanding(), 0);
}

// =============================================================================
// Sorting
// =============================================================================

#[test]
fn test_sort_into_matching_bucket() {
    let f = mounted_with_red_ball();
    let ball = f.game.balls()[0].0;
    let bucket = f.game.bucket("red").unwrap();

    assert!(gesture::drop_on(&f.host, &f.surface, ball, bucket));

    assert_eq!(f.game.score(), MATCH_POINTS);
    assert_eq!(f.surface.find_by_text("Score: 10").len(), 1);
    assert_eq!(f.services.audio.count(Cue::Success), 1);
    assert_eq!(f.services.voice.spoken().last().map(String::as_str), Some("Rouge"));
    let bursts = f.services.effects.bursts();
    assert_eq!(bursts.len(), 1);
    assert_eq!(bursts[0].count, MATCH_BURST);
    assert!((bursts[0].x - 170.0).abs() < 0.001);
    assert!((bursts[0].y - 160.0).abs() < 0.001);
    assert!(f.surface.has_class(ball, "sorted"));

    f.host.advance(SORTED_REMOVE_MS as f64);
    assert!(!f.surface.contains(ball));
    assert!(f.game.balls().is_empty());
}

#[test]
fn test_wrong_bucket_shakes_and_returns() {
    let f = mounted_with_red_ball();
    let ball = f.game.balls()[0].0;
    let bucket = f.game.bucket("blue").unwrap();

    gesture::drop_on(&f.host, &f.surface, ball, bucket);

    assert_eq!(f.game.score(), 0);
    assert_eq!(f.services.audio.count(Cue::Thud), 1);
    assert!(f.surface.has_class(ball, "shake"));
    assert!(!f.surface.position(ball).unwrap().approx_eq(RED_BALL_ORIGIN, 0.001));

    f.host.advance(500.0);
    assert!(!f.surface.has_class(ball, "shake"));
    assert!(f.surface.position(ball).unwrap().approx_eq(RED_BALL_ORIGIN, 0.001));
    assert_eq!(f.game.balls().len(), 1);
}

#[test]
fn test_drop_outside_buckets_returns() {
    let f = mounted_with_red_ball();
    let ball = f.game.balls()[0].0;

    gesture::drag_to(&f.host, &f.surface, ball, Vec2::new(400.0, 350.0));

    assert!(f.surface.position(ball).unwrap().approx_eq(RED_BALL_ORIGIN, 0.001));
    assert_eq!(f.services.audio.cues(), vec![Cue::Pop]);
    assert_eq!(f.game.score(), 0);
}

#[test]
fn test_bucket_is_reusable() {
    let f = mounted_with_red_ball();
    let first = f.game.balls()[0].0;
    let bucket = f.game.bucket("red").unwrap();
    gesture::drop_on(&f.host, &f.surface, first, bucket);
    f.host.advance(SORTED_REMOVE_MS as f64);

    f.host.script_random([0.0, 0.5]);
    f.host.advance((SPAWN_INTERVAL_MS - SORTED_REMOVE_MS) as f64);
    let second = f.game.balls()[0].0;
    assert_ne!(first, second);
    gesture::drop_on(&f.host, &f.surface, second, bucket);

    assert_eq!(f.game.score(), 2 * MATCH_POINTS);
}

#[test]
fn test_unmount_mid_drag_releases_everything() {
    let mut f = mounted_with_red_ball();
    let ball = f.game.balls()[0].0;
    gesture::lift_to(&f.host, &f.surface, ball, Vec2::new(200.0, 200.0));

    f.game.unmount();

    assert_eq!(f.host.outstanding(), 0);
    assert_eq!(f.surface.element_count(), 0);
    f.host.pointer_up(gesture::PRIMARY, Vec2::new(170.0, 160.0));
    assert_eq!(f.game.score(), 0);
}
