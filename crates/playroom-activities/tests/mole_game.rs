//! Whack-a-Mole against the mock host

use std::rc::Rc;

use playroom_activities::mole_game::{
    display_time, spawn_interval, CAUGHT_HIDE_MS, DUCK_MS, GOLDEN_POINTS, HOLE_COUNT,
    LEVEL_UP_MESSAGE_MS, MOLES_PER_LEVEL, MOLE_POINTS,
};
use playroom_activities::MoleGame;
use playroom_core::{Activity, ActivityContext, Cue};
use playroom_host_mock::gesture;
use playroom_host_mock::{MockHost, MockSurface, RecordingServices};

struct Fixture {
    host: Rc<MockHost>,
    surface: Rc<MockSurface>,
    services: RecordingServices,
    game: MoleGame,
}

/// First hole, plain mole
const PLAIN: [f64; 2] = [0.0, 0.5];

/// Fourth hole, golden mole
const GOLDEN: [f64; 2] = [0.5, 0.05];

fn fixture() -> Fixture {
    let host = MockHost::shared();
    let surface = Rc::new(MockSurface::new(800.0, 600.0));
    let services = RecordingServices::new();
    let context = ActivityContext::new(host.clone(), services.services());
    let mut game = MoleGame::new(context);
    game.mount(surface.clone()).unwrap();
    Fixture {
        host,
        surface,
        services,
        game,
    }
}

/// Wait for the next mole, tap it and let it duck
fn catch_next(f: &Fixture) {
    for _ in 0..40 {
        if f.game.active_mole().is_some() {
            break;
        }
        f.host.advance(100.0);
    }
    let mole = f.game.active_mole().unwrap();
    assert!(gesture::press(&f.host, &f.surface, mole).is_some());
    f.host.advance((CAUGHT_HIDE_MS + DUCK_MS) as f64);
}

// =============================================================================
// Pacing
// =============================================================================

#[test]
fn test_pace_tightens_with_level() {
    assert_eq!(display_time(1), 2000);
    assert_eq!(display_time(4), 1700);
    assert_eq!(display_time(30), 800);
    assert_eq!(spawn_interval(1), 1000);
    assert_eq!(spawn_interval(2), 950);
    assert_eq!(spawn_interval(30), 500);
}

#[test]
fn test_mount_hides_every_mole() {
    let f = fixture();

    assert_eq!(f.game.moles().len(), HOLE_COUNT);
    assert!(f.game.moles().iter().all(|m| f.surface.has_class(*m, "hidden")));
    assert_eq!(f.game.active_mole(), None);
    assert_eq!(f.services.audio.cues(), vec![Cue::Pop]);
    assert_eq!(f.services.voice.spoken(), vec!["Attrape les taupes !".to_string()]);
    assert_eq!(f.host.pending_intervals(), 1);
    assert_eq!(f.host.listener_count(), HOLE_COUNT);
}

#[test]
fn test_mole_pops_up_then_ducks() {
    let f = fixture();
    f.host.script_random(PLAIN);

    f.host.advance(1000.0);
    let mole = f.game.moles()[0];
    assert_eq!(f.game.active_mole(), Some(mole));
    assert!(!f.surface.has_class(mole, "hidden"));
    assert!(f.surface.has_class(mole, "popping-up"));
    assert_eq!(f.surface.text(mole).as_deref(), Some("🐹"));

    f.host.advance(display_time(1) as f64);
    assert!(f.surface.has_class(mole, "popping-down"));
    assert!(!f.surface.has_class(mole, "popping-up"));

    f.host.advance(DUCK_MS as f64);
    assert!(f.surface.has_class(mole, "hidden"));
    assert_eq!(f.game.active_mole(), None);
    assert_eq!(f.game.score(), 0);
}

#[test]
fn test_one_mole_at_a_time() {
    let f = fixture();
    f.host.script_random(PLAIN);
    f.host.advance(1000.0);

    f.host.advance(1000.0);

    let up = f
        .game
        .moles()
        .into_iter()
        .filter(|m| !f.surface.has_class(*m, "hidden"))
        .count();
    assert_eq!(up, 1);
}

// =============================================================================
// Catching
// =============================================================================

#[test]
fn test_tap_catches_mole() {
    let f = fixture();
    f.host.script_random(PLAIN);
    f.host.advance(1000.0);
    let mole = f.game.active_mole().unwrap();

    gesture::press(&f.host, &f.surface, mole);
    gesture::press(&f.host, &f.surface, mole);

    assert_eq!(f.game.score(), MOLE_POINTS);
    assert_eq!(f.game.caught(), 1);
    assert!(f.surface.has_class(mole, "caught"));
    assert_eq!(f.services.audio.count(Cue::Success), 1);
    assert_eq!(f.surface.find_by_text("Score: 10").len(), 1);
    let bursts = f.services.effects.bursts();
    assert_eq!(bursts.len(), 1);
    assert_eq!(bursts[0].count, 20);

    f.host.advance(CAUGHT_HIDE_MS as f64);
    assert!(f.surface.has_class(mole, "popping-down"));
    assert!(!f.surface.has_class(mole, "caught"));
    f.host.advance(DUCK_MS as f64);
    assert!(f.surface.has_class(mole, "hidden"));
}

#[test]
fn test_ducking_mole_cannot_be_caught() {
    let f = fixture();
    f.host.script_random(PLAIN);
    f.host.advance(1000.0 + display_time(1) as f64);
    let mole = f.game.moles()[0];
    assert!(f.surface.has_class(mole, "popping-down"));

    gesture::press(&f.host, &f.surface, mole);

    assert_eq!(f.game.caught(), 0);
    assert!(f.services.effects.bursts().is_empty());
}

#[test]
fn test_golden_mole() {
    let f = fixture();
    f.host.script_random(GOLDEN);
    f.host.advance(1000.0);
    let mole = f.game.moles()[3];
    assert_eq!(f.game.active_mole(), Some(mole));
    assert!(f.surface.has_class(mole, "golden-mole"));
    assert_eq!(f.surface.text(mole).as_deref(), Some("👑"));

    gesture::press(&f.host, &f.surface, mole);

    assert_eq!(f.game.score(), GOLDEN_POINTS);
    assert_eq!(f.services.audio.count(Cue::Chime), 1);
    assert_eq!(f.services.audio.count(Cue::Success), 0);
    assert_eq!(f.services.voice.spoken().last().map(String::as_str), Some("Taupe magique !"));
    assert_eq!(f.services.effects.bursts()[0].count, 40);

    f.host.advance((CAUGHT_HIDE_MS + DUCK_MS) as f64);
    assert!(!f.surface.has_class(mole, "golden-mole"));
}

#[test]
fn test_caught_mole_keeps_no_hide_timer() {
    let f = fixture();
    f.host.script_random(PLAIN);
    f.host.advance(1000.0);
    let mole = f.game.active_mole().unwrap();

    gesture::press(&f.host, &f.surface, mole);

    // The hide timer is gone; only the delayed duck is pending
    assert_eq!(f.host.pending_timeouts(), 1);
    assert_eq!(f.game.lifecycle().stage().unwrap().scope().outstanding().once, 1);
}

#[test]
fn test_fifth_catch_levels_up() {
    let f = fixture();
    f.host.script_random(PLAIN.repeat(MOLES_PER_LEVEL as usize));
    for _ in 0..MOLES_PER_LEVEL {
        catch_next(&f);
    }

    assert_eq!(f.game.level(), 2);
    assert_eq!(f.game.score(), MOLES_PER_LEVEL * MOLE_POINTS);
    assert_eq!(f.surface.find_by_text("Level 2").len(), 1);
    assert!(f.services.voice.spoken().contains(&"Niveau 2 !".to_string()));
    assert_eq!(f.services.audio.count(Cue::Success), MOLES_PER_LEVEL as usize + 1);
    assert!(f.services.effects.bursts().iter().any(|b| b.count == 50));
    assert_eq!(f.host.pending_intervals(), 1);

    let message = f.game.level_up_message().unwrap();
    assert!(f.surface.has_class(message, "show"));
    f.host.advance(LEVEL_UP_MESSAGE_MS as f64);
    assert!(!f.surface.has_class(message, "show"));
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_pause_stops_moles() {
    let mut f = fixture();

    f.game.pause();
    f.host.advance(5000.0);
    assert_eq!(f.game.active_mole(), None);
    assert_eq!(f.host.pending_intervals(), 0);

    f.game.resume();
    f.game.resume();
    assert_eq!(f.host.pending_intervals(), 1);
    f.host.advance(1000.0);
    assert!(f.game.active_mole().is_some());
}

#[test]
fn test_unmount_mid_catch() {
    let mut f = fixture();
    f.host.advance(1000.0);
    let mole = f.game.active_mole().unwrap();
    gesture::press(&f.host, &f.surface, mole);

    f.game.unmount();
    f.host.advance(5000.0);

    assert_eq!(f.host.outstanding(), 0);
    assert_eq!(f.surface.element_count(), 0);
    assert!(f.game.moles().is_empty());
}
