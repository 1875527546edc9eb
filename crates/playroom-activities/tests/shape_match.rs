//! Shape Match against the mock host

use std::rc::Rc;

use playroom_activities::catalog::PRAISE;
use playroom_activities::shape_match::{
    BOUNCE_MS, CHECK_DELAY_MS, FINAL_LEVEL, MATCH_POINTS, NEXT_LEVEL_MS, RESTART_MS,
};
use playroom_activities::ShapeMatch;
use playroom_core::{Activity, ActivityContext, Cue, ElementId, Surface, Vec2};
use playroom_host_mock::gesture;
use playroom_host_mock::{MockHost, MockSurface, RecordingServices};

struct Fixture {
    host: Rc<MockHost>,
    surface: Rc<MockSurface>,
    services: RecordingServices,
    game: ShapeMatch,
}

fn fixture() -> Fixture {
    let host = MockHost::shared();
    let surface = Rc::new(MockSurface::new(800.0, 600.0));
    let services = RecordingServices::new();
    let context = ActivityContext::new(host.clone(), services.services());
    let mut game = ShapeMatch::new(context);
    game.mount(surface.clone()).unwrap();
    Fixture {
        host,
        surface,
        services,
        game,
    }
}

fn slot_for(f: &Fixture, key: &str) -> ElementId {
    f.game
        .slots()
        .into_iter()
        .find(|(_, k)| *k == key)
        .map(|(id, _)| id)
        .unwrap()
}

/// Drop every shape into its outline
fn place_all(f: &Fixture) {
    for (piece, key) in f.game.pieces() {
        assert!(gesture::drop_on(&f.host, &f.surface, piece, slot_for(f, key)));
    }
}

/// Place everything and wait for the next level
fn clear_level(f: &Fixture) {
    place_all(f);
    f.host.advance(CHECK_DELAY_MS as f64);
    f.host.advance(NEXT_LEVEL_MS as f64);
}

// =============================================================================
// Levels
// =============================================================================

#[test]
fn test_first_level_has_one_circle() {
    let f = fixture();

    assert_eq!(f.game.level(), 1);
    assert_eq!(f.game.slots().len(), 1);
    assert_eq!(f.game.pieces(), vec![(f.game.pieces()[0].0, "circle")]);
    assert_eq!(f.surface.text(f.game.level_label().unwrap()).as_deref(), Some("Level 1"));
    assert_eq!(f.services.audio.cues(), vec![Cue::Pop]);
}

#[test]
fn test_pick_up_names_the_shape() {
    let f = fixture();
    let (piece, _) = f.game.pieces()[0];

    gesture::lift_to(&f.host, &f.surface, piece, Vec2::new(100.0, 350.0));

    assert_eq!(f.services.voice.spoken(), vec!["Le cercle".to_string()]);
    assert_eq!(f.services.audio.count(Cue::Pop), 2);
}

#[test]
fn test_placing_a_shape() {
    let f = fixture();
    let (piece, key) = f.game.pieces()[0];
    let slot = slot_for(&f, key);
    let target = f.surface.center(slot).unwrap();

    gesture::drop_on(&f.host, &f.surface, piece, slot);

    assert_eq!(f.game.score(), MATCH_POINTS);
    assert!(f.surface.has_class(slot, "filled"));
    assert!(f.surface.center(piece).unwrap().approx_eq(target, 0.001));
    assert_eq!(f.surface.find_by_text("Score: 20").len(), 1);
    assert_eq!(f.services.audio.count(Cue::Success), 1);
    let praise = f.services.voice.spoken().last().cloned().unwrap();
    assert!(PRAISE.contains(&praise.as_str()));
    let burst = f.services.effects.bursts()[0];
    assert_eq!(burst.count, 30);
    assert!((burst.x - target.x).abs() < 0.001);
    assert!((burst.y - target.y).abs() < 0.001);
}

#[test]
fn test_level_complete_then_next_level() {
    let f = fixture();
    place_all(&f);

    f.host.advance(CHECK_DELAY_MS as f64);
    let banner = f.game.banner().unwrap();
    assert_eq!(f.surface.text(banner).as_deref(), Some("Bravo!"));
    assert!(f.surface.has_class(banner, "show"));
    assert_eq!(
        f.services.voice.spoken().last().map(String::as_str),
        Some("Niveau terminé !")
    );
    assert_eq!(f.services.audio.count(Cue::Success), 2);
    assert_eq!(f.services.effects.bursts().last().unwrap().count, 50);

    f.host.advance(NEXT_LEVEL_MS as f64);
    assert_eq!(f.game.level(), 2);
    assert_eq!(f.game.slots().len(), 2);
    assert_eq!(f.game.pieces().len(), 2);
    assert_eq!(f.game.score(), MATCH_POINTS);
    assert!(!f.surface.has_class(banner, "show"));
    assert_eq!(f.surface.text(f.game.level_label().unwrap()).as_deref(), Some("Level 2"));
}

#[test]
fn test_level_change_releases_piece_listeners() {
    let f = fixture();
    clear_level(&f);
    clear_level(&f);

    // Three document listeners plus one pick-up listener per piece on screen
    assert_eq!(f.game.pieces().len(), 3);
    assert_eq!(f.host.listener_count(), 3 + 3);
    assert_eq!(f.surface.find_by_class("draggable-shape").len(), 3);
}

// =============================================================================
// Refusals
// =============================================================================

#[test]
fn test_wrong_outline_bounces_back() {
    let f = fixture();
    clear_level(&f);
    let (piece, key) = f.game.pieces()[0];
    let (other, _) = f.game.slots().into_iter().find(|(_, k)| *k != key).unwrap();
    let origin = f.surface.position(piece).unwrap();
    let thuds = f.services.audio.count(Cue::Thud);

    gesture::drop_on(&f.host, &f.surface, piece, other);

    assert_eq!(f.services.audio.count(Cue::Thud), thuds + 1);
    assert!(f.surface.has_class(piece, "bounce-back"));
    assert!(f.surface.position(piece).unwrap().approx_eq(origin, 0.001));
    assert!(!f.surface.has_class(other, "filled"));

    f.host.advance(BOUNCE_MS as f64);
    assert!(!f.surface.has_class(piece, "bounce-back"));

    gesture::drop_on(&f.host, &f.surface, piece, slot_for(&f, key));
    assert_eq!(f.game.score(), 2 * MATCH_POINTS);
}

#[test]
fn test_drop_on_empty_space_bounces_back() {
    let f = fixture();
    let (piece, _) = f.game.pieces()[0];
    let origin = f.surface.position(piece).unwrap();

    gesture::drag_to(&f.host, &f.surface, piece, Vec2::new(100.0, 350.0));

    assert_eq!(f.services.audio.count(Cue::Thud), 1);
    assert!(f.surface.has_class(piece, "bounce-back"));
    assert!(f.surface.position(piece).unwrap().approx_eq(origin, 0.001));
    assert_eq!(f.game.score(), 0);
}

// =============================================================================
// Completion
// =============================================================================

#[test]
fn test_final_level_celebrates_and_restarts() {
    let f = fixture();
    for _ in 1..FINAL_LEVEL {
        clear_level(&f);
    }
    assert_eq!(f.game.level(), FINAL_LEVEL);
    place_all(&f);
    assert_eq!(f.game.score(), 200);

    f.host.advance((CHECK_DELAY_MS + NEXT_LEVEL_MS) as f64);
    assert_eq!(f.surface.find_by_class("completion-celebration").len(), 1);
    assert_eq!(f.surface.find_by_text("🏆").len(), 1);
    assert_eq!(
        f.services.voice.spoken().last().map(String::as_str),
        Some("Tu as terminé tous les niveaux ! Score final : 200 points !")
    );

    f.host.advance(1200.0);
    let finale = f.services.effects.bursts().iter().filter(|b| b.count == 40).count();
    assert_eq!(finale, 5);

    f.host.advance((RESTART_MS - 1200) as f64);
    assert_eq!(f.game.level(), 1);
    assert_eq!(f.game.score(), 200);
    assert!(f.surface.find_by_class("completion-celebration").is_empty());
    assert_eq!(f.game.slots().len(), 1);
}

#[test]
fn test_unmount_during_level_transition() {
    let mut f = fixture();
    place_all(&f);
    f.host.advance(CHECK_DELAY_MS as f64);

    f.game.unmount();
    f.host.advance(NEXT_LEVEL_MS as f64);

    assert_eq!(f.host.outstanding(), 0);
    assert_eq!(f.surface.element_count(), 0);
    assert_eq!(f.game.level(), 0);
}
