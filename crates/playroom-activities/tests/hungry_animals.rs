//! Hungry Animals against the mock host

use std::rc::Rc;

use playroom_activities::catalog::animal;
use playroom_activities::hungry_animals::{
    CHECK_DELAY_MS, FINAL_LEVEL, FOOD_FADE_MS, FOOD_REMOVE_MS, MATCH_POINTS, MISMATCH_RETURN_MS,
    NEXT_LEVEL_MS, RESTART_MS,
};
use playroom_activities::HungryAnimals;
use playroom_core::{Activity, ActivityContext, Cue, ElementId, Surface};
use playroom_host_mock::gesture;
use playroom_host_mock::{MockHost, MockSurface, RecordingServices};

struct Fixture {
    host: Rc<MockHost>,
    surface: Rc<MockSurface>,
    services: RecordingServices,
    game: HungryAnimals,
}

fn fixture() -> Fixture {
    let host = MockHost::shared();
    let surface = Rc::new(MockSurface::new(800.0, 600.0));
    let services = RecordingServices::new();
    let context = ActivityContext::new(host.clone(), services.services());
    let mut game = HungryAnimals::new(context);
    game.mount(surface.clone()).unwrap();
    Fixture {
        host,
        surface,
        services,
        game,
    }
}

fn container_for(f: &Fixture, kind: &str) -> ElementId {
    f.game
        .animals()
        .into_iter()
        .find(|(_, k)| *k == kind)
        .map(|(id, _)| id)
        .unwrap()
}

/// Drop every food on the animal that eats it
fn feed_all(f: &Fixture) {
    for (food, kind) in f.game.foods() {
        let container = container_for(f, kind);
        assert!(gesture::drop_on(&f.host, &f.surface, food, container));
    }
}

/// Feed everything and wait for the next level to appear
fn clear_level(f: &Fixture) {
    feed_all(f);
    f.host.advance(CHECK_DELAY_MS as f64);
    f.host.advance(NEXT_LEVEL_MS as f64);
}

// =============================================================================
// Levels
// =============================================================================

#[test]
fn test_first_level_has_one_pair() {
    let f = fixture();

    assert_eq!(f.game.level(), 1);
    assert_eq!(f.game.animals().len(), 1);
    assert_eq!(f.game.foods().len(), 1);
    assert_eq!(f.game.animals()[0].1, f.game.foods()[0].1);
    assert_eq!(f.services.audio.cues(), vec![Cue::Pop]);
    assert_eq!(f.services.voice.spoken(), vec!["Nourris les animaux!".to_string()]);
}

#[test]
fn test_feeding_timeline() {
    let f = fixture();
    let (food, kind) = f.game.foods()[0];
    let container = container_for(&f, kind);

    gesture::drop_on(&f.host, &f.surface, food, container);

    assert_eq!(f.game.score(), MATCH_POINTS);
    assert_eq!(f.game.matches(), 1);
    assert_eq!(f.surface.find_by_text("Score: 20").len(), 1);
    assert!(f.surface.has_class(container, "fed"));
    assert_eq!(f.services.audio.count(Cue::Success), 1);
    let sentence = animal(kind).unwrap().sentence();
    assert_eq!(f.services.voice.spoken().last(), Some(&sentence));
    assert_eq!(f.services.effects.bursts()[0].count, 30);

    f.host.advance(450.0);
    assert_eq!(f.surface.find_by_class("heart").len(), 3);

    f.host.advance((FOOD_FADE_MS - 450) as f64);
    assert!(f.surface.has_class(food, "fading"));
    assert!(f.surface.contains(food));

    f.host.advance(FOOD_REMOVE_MS as f64);
    assert!(!f.surface.contains(food));
    assert!(f.game.foods().is_empty());

    f.host.advance(100.0);
    assert!(f.surface.find_by_class("heart").is_empty());
}

#[test]
fn test_level_complete_then_next_level() {
    let f = fixture();
    feed_all(&f);

    f.host.advance(CHECK_DELAY_MS as f64);
    let banner = f.game.banner().unwrap();
    assert_eq!(f.surface.text(banner).as_deref(), Some("Level Complete!"));
    assert!(f.surface.has_class(banner, "show"));
    assert_eq!(
        f.services.voice.spoken().last().map(String::as_str),
        Some("Bravo! Niveau suivant!")
    );
    let burst = *f.services.effects.bursts().last().unwrap();
    assert_eq!(burst.count, 50);
    assert!((burst.x - 400.0).abs() < 0.001);
    assert!((burst.y - 300.0).abs() < 0.001);

    f.host.advance(NEXT_LEVEL_MS as f64);
    assert_eq!(f.game.level(), 2);
    assert_eq!(f.game.animals().len(), 2);
    assert_eq!(f.game.foods().len(), 2);
    assert_eq!(f.game.matches(), 0);
    assert_eq!(f.game.score(), MATCH_POINTS);
    assert!(!f.surface.has_class(banner, "show"));
}

#[test]
fn test_partial_level_does_not_advance() {
    let f = fixture();
    clear_level(&f);
    let (food, kind) = f.game.foods()[0];
    gesture::drop_on(&f.host, &f.surface, food, container_for(&f, kind));

    f.host.advance((CHECK_DELAY_MS + NEXT_LEVEL_MS) as f64);

    assert_eq!(f.game.level(), 2);
    assert_eq!(f.game.matches(), 1);
}

// =============================================================================
// Wrong Food
// =============================================================================

#[test]
fn test_wrong_animal_refuses_food() {
    let f = fixture();
    clear_level(&f);
    let (food, kind) = f.game.foods()[0];
    let (other, _) = f
        .game
        .animals()
        .into_iter()
        .find(|(_, k)| *k != kind)
        .unwrap();
    let origin = f.surface.position(food).unwrap();
    let face = f.game.face(other).unwrap();

    gesture::drop_on(&f.host, &f.surface, food, other);

    assert_eq!(f.services.audio.count(Cue::Thud), 1);
    assert!(f.surface.has_class(face, "head-shake"));
    assert!(f.surface.has_class(food, "bounce-back"));
    assert_eq!(f.game.matches(), 0);

    f.host.advance(MISMATCH_RETURN_MS as f64);
    assert!(!f.surface.has_class(face, "head-shake"));
    assert!(!f.surface.has_class(food, "bounce-back"));
    assert!(f.surface.position(food).unwrap().approx_eq(origin, 0.001));
}

#[test]
fn test_fed_animal_takes_no_second_meal() {
    let f = fixture();
    clear_level(&f);
    let foods = f.game.foods();
    let (first, kind) = foods[0];
    let (second, _) = foods[1];
    let container = container_for(&f, kind);
    gesture::drop_on(&f.host, &f.surface, first, container);
    let origin = f.surface.position(second).unwrap();

    gesture::drop_on(&f.host, &f.surface, second, container);

    assert_eq!(f.services.audio.count(Cue::Thud), 0);
    assert!(f.surface.position(second).unwrap().approx_eq(origin, 0.001));
    assert_eq!(f.game.matches(), 1);
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
    feed_all(&f);
    assert_eq!(f.game.score(), 120);

    f.host.advance(CHECK_DELAY_MS as f64);
    assert_eq!(f.surface.find_by_class("completion-celebration").len(), 1);
    assert_eq!(f.surface.find_by_text("🏆").len(), 1);
    let cheer = "Félicitations! Tu as nourri tous les animaux! Score final: 120 points!";
    let spoken = f.services.voice.spoken();
    assert_eq!(spoken.iter().filter(|s| s.as_str() == cheer).count(), 1);

    f.host.advance(1200.0);
    let finale = f.services.effects.bursts().iter().filter(|b| b.count == 40).count();
    assert_eq!(finale, 5);

    f.host.advance((RESTART_MS - 1200) as f64);
    assert_eq!(f.game.level(), 1);
    assert_eq!(f.game.score(), 0);
    assert_eq!(f.surface.find_by_text("Score: 0").len(), 1);
    assert!(f.surface.find_by_class("completion-celebration").is_empty());
    assert_eq!(f.game.animals().len(), 1);
}

#[test]
fn test_unmount_during_level_transition() {
    let mut f = fixture();
    feed_all(&f);
    f.host.advance(CHECK_DELAY_MS as f64);

    f.game.unmount();
    f.host.advance(NEXT_LEVEL_MS as f64);

    assert_eq!(f.host.outstanding(), 0);
    assert_eq!(f.surface.element_count(), 0);
    assert_eq!(f.game.level(), 0);
}
