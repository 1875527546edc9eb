//! Balloon Pop against the mock host

use std::rc::Rc;

use playroom_activities::balloon_pop::{POP_BURST, POP_REMOVE_MS, SPAWN_INTERVAL_MS};
use playroom_activities::BalloonPop;
use playroom_core::{Activity, ActivityContext, Cue, Surface, Vec2};
use playroom_host_mock::{MockHost, MockSurface, RecordingServices};

struct Fixture {
    host: Rc<MockHost>,
    surface: Rc<MockSurface>,
    services: RecordingServices,
    game: BalloonPop,
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
        game: BalloonPop::new(context),
    }
}

/// Red balloon at x = 360 rising 2 px per frame
const SLOW_RED: [f64; 3] = [0.0, 0.5, 0.0];

// =============================================================================
// Spawning
// =============================================================================

#[test]
fn test_mount_spawns_first_balloon() {
    let mut f = fixture();
    f.game.mount(f.surface.clone()).unwrap();

    assert_eq!(f.game.live_balloons().len(), 1);
    assert_eq!(f.surface.find_by_class("balloon").len(), 1);
    assert_eq!(f.host.pending_intervals(), 1);
    assert_eq!(f.host.pending_frames(), 1);
    assert_eq!(f.services.audio.cues(), vec![Cue::Pop]);
    assert_eq!(f.services.voice.spoken(), vec!["Éclate les ballons!".to_string()]);
}

#[test]
fn test_spawns_on_interval() {
    let mut f = fixture();
    f.game.mount(f.surface.clone()).unwrap();

    f.host.advance(SPAWN_INTERVAL_MS as f64);
    assert_eq!(f.game.live_balloons().len(), 2);
    f.host.advance(SPAWN_INTERVAL_MS as f64);
    assert_eq!(f.game.live_balloons().len(), 3);
    assert_eq!(f.host.pending_frames(), 3);
}

#[test]
fn test_balloon_rises_each_frame() {
    let mut f = fixture();
    f.host.script_random(SLOW_RED);
    f.game.mount(f.surface.clone()).unwrap();
    let balloon = f.game.live_balloons()[0];

    assert!(f.surface.position(balloon).unwrap().approx_eq(Vec2::new(360.0, 600.0), 0.001));
    f.host.run_frame();
    assert!(f.surface.position(balloon).unwrap().approx_eq(Vec2::new(360.0, 598.0), 0.001));
    f.host.run_frame();
    assert!(f.surface.position(balloon).unwrap().approx_eq(Vec2::new(360.0, 596.0), 0.001));
    assert_eq!(f.host.pending_frames(), 1);
}

#[test]
fn test_escaped_balloon_is_removed() {
    let mut f = fixture();
    f.host.script_random([0.0, 0.5, 1.0]);
    f.game.mount(f.surface.clone()).unwrap();
    let balloon = f.game.live_balloons()[0];

    for _ in 0..200 {
        f.host.run_frame();
    }

    assert!(!f.surface.contains(balloon));
    assert!(f.game.live_balloons().is_empty());
    assert_eq!(f.host.pending_frames(), 0);
    assert_eq!(f.game.popped_count(), 0);
}

// =============================================================================
// Popping
// =============================================================================

#[test]
fn test_tap_pops_balloon() {
    let mut f = fixture();
    f.host.script_random(SLOW_RED);
    f.game.mount(f.surface.clone()).unwrap();
    let balloon = f.game.live_balloons()[0];
    let center = f.surface.center(balloon).unwrap();

    f.host.pointer_down(1, center, Some(balloon));

    assert_eq!(f.services.audio.count(Cue::Pop), 2);
    assert_eq!(f.services.voice.spoken().last().map(String::as_str), Some("Rouge"));
    let bursts = f.services.effects.bursts();
    assert_eq!(bursts.len(), 1);
    assert_eq!(bursts[0].count, POP_BURST);
    assert!((bursts[0].x - 400.0).abs() < 0.001);
    assert!((bursts[0].y - 650.0).abs() < 0.001);
    assert!(f.surface.has_class(balloon, "popping"));
    assert!(f.game.live_balloons().is_empty());
    assert_eq!(f.game.popped_count(), 1);
    assert_eq!(f.host.pending_frames(), 0);

    f.host.advance(POP_REMOVE_MS as f64);
    assert!(!f.surface.contains(balloon));
}

#[test]
fn test_second_tap_is_ignored() {
    let mut f = fixture();
    f.game.mount(f.surface.clone()).unwrap();
    let balloon = f.game.live_balloons()[0];
    let center = f.surface.center(balloon).unwrap();

    f.host.pointer_down(1, center, Some(balloon));
    f.host.pointer_down(1, center, Some(balloon));

    assert_eq!(f.services.audio.count(Cue::Pop), 2);
    assert_eq!(f.services.effects.bursts().len(), 1);
    assert_eq!(f.game.popped_count(), 1);
}

#[test]
fn test_listeners_follow_live_balloons() {
    let mut f = fixture();
    f.game.mount(f.surface.clone()).unwrap();

    for _ in 0..20 {
        f.host.advance(SPAWN_INTERVAL_MS as f64);
        // Slowest balloons leave the sky after 401 frames
        for _ in 0..450 {
            f.host.run_frame();
        }
    }
    assert!(f.game.live_balloons().is_empty());
    assert_eq!(f.host.listener_count(), 0);

    f.host.advance(SPAWN_INTERVAL_MS as f64);
    f.host.advance(SPAWN_INTERVAL_MS as f64);
    let live = f.game.live_balloons();
    assert_eq!(f.host.listener_count(), live.len());

    let center = f.surface.center(live[0]).unwrap();
    f.host.pointer_down(1, center, Some(live[0]));
    assert_eq!(f.host.listener_count(), live.len() - 1);
    assert_eq!(
        f.game.lifecycle().stage().unwrap().scope().outstanding().listeners,
        live.len() - 1
    );
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_pause_stops_spawner() {
    let mut f = fixture();
    f.game.mount(f.surface.clone()).unwrap();

    f.game.pause();
    assert_eq!(f.host.pending_intervals(), 0);
    f.host.advance(3.0 * SPAWN_INTERVAL_MS as f64);
    assert_eq!(f.game.live_balloons().len(), 1);

    f.game.resume();
    f.game.resume();
    assert_eq!(f.host.pending_intervals(), 1);
    f.host.advance(SPAWN_INTERVAL_MS as f64);
    assert_eq!(f.game.live_balloons().len(), 2);
}

#[test]
fn test_unmount_releases_everything() {
    let mut f = fixture();
    f.game.mount(f.surface.clone()).unwrap();
    f.host.advance(2.0 * SPAWN_INTERVAL_MS as f64);
    f.host.run_frame();
    let balloon = f.game.live_balloons()[0];
    let center = f.surface.center(balloon).unwrap();
    f.host.pointer_down(1, center, Some(balloon));

    f.game.unmount();

    assert_eq!(f.host.outstanding(), 0);
    assert_eq!(f.surface.element_count(), 0);
    assert!(f.game.live_balloons().is_empty());
}

#[test]
fn test_remount_starts_fresh() {
    let mut f = fixture();
    f.game.mount(f.surface.clone()).unwrap();
    f.host.advance(SPAWN_INTERVAL_MS as f64);
    let balloon = f.game.live_balloons()[0];
    let center = f.surface.center(balloon).unwrap();
    f.host.pointer_down(1, center, Some(balloon));

    f.game.mount(f.surface.clone()).unwrap();

    assert_eq!(f.game.live_balloons().len(), 1);
    assert_eq!(f.game.popped_count(), 0);
    assert_eq!(f.host.pending_intervals(), 1);
    assert_eq!(f.host.pending_frames(), 1);
}
