//! The full suite behind one orchestrator

use std::rc::Rc;

use playroom_activities::{default_activities, register_all};
use playroom_core::{
    ActivityContext, MemoryStorage, Orchestrator, OrchestratorError, Screen, Size, Store,
};
use playroom_host_mock::{MockHost, MockSurface, RecordingServices};

struct Suite {
    host: Rc<MockHost>,
    surface: Rc<MockSurface>,
    recorders: RecordingServices,
    orchestrator: Orchestrator,
}

fn suite_with(store: Store) -> Suite {
    let host = MockHost::shared();
    let surface = Rc::new(MockSurface::new(800.0, 600.0));
    let recorders = RecordingServices::new();
    let services = recorders.mute_aware(&store);
    let context = ActivityContext::new(host.clone(), services.clone());
    let mut orchestrator = Orchestrator::new(surface.clone(), store, services);
    register_all(&mut orchestrator, &context).unwrap();
    Suite {
        host,
        surface,
        recorders,
        orchestrator,
    }
}

fn suite() -> Suite {
    suite_with(Store::in_memory())
}

/// Let timers and frames run for a while
fn run_for(suite: &Suite, frames: usize) {
    for _ in 0..frames {
        suite.host.tick();
    }
}

#[test]
fn test_menu_order() {
    let mut s = suite();
    let ids: Vec<&str> = s.orchestrator.menu().iter().map(|m| m.id).collect();
    assert_eq!(
        ids,
        vec![
            "balloon-pop",
            "musical-piano",
            "color-sorter",
            "animal-sounds",
            "shape-match",
            "memory-game",
            "mole-game",
            "drawing-pad",
            "hungry-animals",
        ]
    );

    let host = MockHost::shared();
    let context = ActivityContext::new(host, Default::default());
    let err = register_all(&mut s.orchestrator, &context).unwrap_err();
    assert!(matches!(err, OrchestratorError::DuplicateId(_)));
    assert_eq!(default_activities(&context).len(), 9);
}

#[test]
fn test_switching_keeps_one_activity_mounted() {
    let mut s = suite();
    let ids: Vec<&str> = s.orchestrator.menu().iter().map(|m| m.id).collect();
    for id in ids.into_iter().chain(["balloon-pop", "mole-game"]) {
        s.orchestrator.start(id).unwrap();
        run_for(&s, 200);
        assert_eq!(s.orchestrator.mounted_count(), 1);
        assert_eq!(s.orchestrator.screen(), &Screen::Activity { id: s.orchestrator.current().unwrap() });
    }

    s.orchestrator.show_menu();

    assert_eq!(s.orchestrator.mounted_count(), 0);
    assert_eq!(s.host.outstanding(), 0);
    assert_eq!(s.surface.element_count(), 0);
}

#[test]
fn test_restart_rebuilds_current() {
    let mut s = suite();
    s.orchestrator.start("color-sorter").unwrap();
    run_for(&s, 300);
    let before = s.surface.find_by_class("sorter-ball").len();
    assert!(before > 1);

    s.orchestrator.restart().unwrap();

    assert_eq!(s.surface.find_by_class("sorter-ball").len(), 1);
    assert_eq!(s.surface.find_by_class("sorter-bucket").len(), 3);
    assert_eq!(s.orchestrator.current(), Some("color-sorter"));
}

#[test]
fn test_muted_suite_is_silent() {
    let store = Store::load(
        Rc::new(MemoryStorage::with_entry("playroom.muted", "true")),
        "playroom.muted",
    );
    let mut s = suite_with(store);

    s.orchestrator.start("balloon-pop").unwrap();
    run_for(&s, 100);

    assert!(s.recorders.audio.cues().is_empty());
    assert!(s.recorders.voice.spoken().is_empty());

    assert!(!s.orchestrator.toggle_mute());
    s.orchestrator.start("hungry-animals").unwrap();
    assert!(!s.recorders.audio.cues().is_empty());
    assert_eq!(
        s.recorders.voice.spoken().last().map(String::as_str),
        Some("Nourris les animaux!")
    );
}

#[test]
fn test_small_surface_falls_back_to_menu() {
    let mut s = suite();
    s.surface.set_size(Size::new(320.0, 320.0));

    let err = s.orchestrator.start("hungry-animals").unwrap_err();

    assert!(matches!(err, OrchestratorError::MountFailed { .. }));
    assert_eq!(s.orchestrator.screen(), &Screen::Menu { failure: true });
    assert_eq!(s.host.outstanding(), 0);

    s.orchestrator.start("balloon-pop").unwrap();
    assert_eq!(s.orchestrator.current(), Some("balloon-pop"));
}
