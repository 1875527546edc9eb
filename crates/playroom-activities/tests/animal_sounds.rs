//! Animal Sounds against the mock host

use std::rc::Rc;

use playroom_activities::animal_sounds::{ANIMATION_MS, TAP_BURST};
use playroom_activities::AnimalSounds;
use playroom_core::{Activity, ActivityContext, AnimalCall, Cue, ElementId};
use playroom_host_mock::gesture;
use playroom_host_mock::{MockHost, MockSurface, RecordingServices};

struct Fixture {
    host: Rc<MockHost>,
    surface: Rc<MockSurface>,
    services: RecordingServices,
    game: AnimalSounds,
}

fn fixture() -> Fixture {
    let host = MockHost::shared();
    let surface = Rc::new(MockSurface::new(800.0, 600.0));
    let services = RecordingServices::new();
    let context = ActivityContext::new(host.clone(), services.services());
    let mut game = AnimalSounds::new(context);
    game.mount(surface.clone()).unwrap();
    Fixture {
        host,
        surface,
        services,
        game,
    }
}

fn card(f: &Fixture, kind: &str) -> ElementId {
    f.game
        .cards()
        .into_iter()
        .find(|(_, k)| *k == kind)
        .map(|(id, _)| id)
        .unwrap()
}

#[test]
fn test_grid_shows_six_animals() {
    let f = fixture();

    let kinds: Vec<&str> = f.game.cards().iter().map(|(_, k)| *k).collect();
    assert_eq!(kinds, vec!["dog", "cat", "cow", "duck", "sheep", "pig"]);
    assert_eq!(f.surface.color(card(&f, "pig")).as_deref(), Some("#FFC0CB"));
    assert!(f.services.audio.cues().is_empty());
    assert_eq!(f.host.listener_count(), 6);
}

#[test]
fn test_tap_says_name_and_plays_call() {
    let f = fixture();
    let cow = card(&f, "cow");

    gesture::press(&f.host, &f.surface, cow);

    assert_eq!(f.services.voice.spoken(), vec!["La vache".to_string()]);
    assert_eq!(f.services.audio.cues(), vec![Cue::Animal(AnimalCall::Moo)]);
    assert!(f.surface.has_class(cow, "animating"));
    let center = f.surface.center(cow).unwrap();
    let bursts = f.services.effects.bursts();
    assert_eq!(bursts.len(), 1);
    assert_eq!(bursts[0].count, TAP_BURST);
    assert!((bursts[0].x - center.x).abs() < 0.001);
    assert!((bursts[0].y - center.y).abs() < 0.001);
}

#[test]
fn test_animating_card_ignores_taps() {
    let f = fixture();
    let duck = card(&f, "duck");

    gesture::press(&f.host, &f.surface, duck);
    gesture::press(&f.host, &f.surface, duck);
    assert_eq!(f.services.audio.count(Cue::Animal(AnimalCall::Quack)), 1);

    // Other cards are independent
    gesture::press(&f.host, &f.surface, card(&f, "dog"));
    assert_eq!(f.services.audio.count(Cue::Animal(AnimalCall::Bark)), 1);

    f.host.advance(ANIMATION_MS as f64);
    assert!(!f.surface.has_class(duck, "animating"));
    gesture::press(&f.host, &f.surface, duck);
    assert_eq!(f.services.audio.count(Cue::Animal(AnimalCall::Quack)), 2);
}

#[test]
fn test_unmount_mid_animation() {
    let mut f = fixture();
    gesture::press(&f.host, &f.surface, card(&f, "sheep"));

    f.game.unmount();
    f.host.advance(ANIMATION_MS as f64);

    assert_eq!(f.host.outstanding(), 0);
    assert_eq!(f.surface.element_count(), 0);
    assert!(f.game.cards().is_empty());
}
