use jazzy_reveal_core::{
    markers::{DONE_CLASS, TRANSITION_DELAY, TRANSITION_DURATION},
    Capabilities, Discovery, Engine, EngineConfig, Host, RevealEvent, StrategyKind,
};
use jazzy_test_fixtures::{pages, ElementSpec, FakePage};

fn done(page: &FakePage, name: &str) -> bool {
    page.has_class(&page.get(name), DONE_CLASS)
}

/// it should pick the observer strategy when the host has intersection observers
#[test]
fn selects_observer_when_capable() {
    let mut page = pages::load("landing").unwrap();
    let engine = Engine::new(EngineConfig::default(), &mut page);
    assert_eq!(engine.strategy_kind(), StrategyKind::Observer);
    assert!(!engine.wants_frame());
}

/// it should fall back to polling and keep asking for frames
#[test]
fn selects_polling_without_observer() {
    let mut page = pages::load("counters").unwrap();
    let engine = Engine::new(EngineConfig::default(), &mut page);
    assert_eq!(engine.strategy_kind(), StrategyKind::Polling);
    assert!(engine.wants_frame());
}

/// it should decide the strategy once, even if capabilities change later
#[test]
fn strategy_is_fixed_at_construction() {
    let mut page = FakePage::polling(800.0);
    let mut engine = Engine::new(EngineConfig::default(), &mut page);
    page.set_capabilities(Capabilities {
        intersection_observer: true,
        device_orientation: false,
    });
    let el = page.insert(None, ElementSpec::new(100.0).jazzy("fade"));
    let batch = page.take_mutations();
    engine.on_mutations(&mut page, &batch);
    assert_eq!(engine.strategy_kind(), StrategyKind::Polling);
    assert_eq!(page.connected_observers(), 0);
    assert!(engine.is_tracking(&el));
}

/// it should seed every eligible element and skip settled or unmarked ones
#[test]
fn seeds_eligible_elements() {
    let mut page = pages::load("landing").unwrap();
    let mut engine = Engine::new(EngineConfig::default(), &mut page);

    assert_eq!(engine.stats().pending, 5);
    for name in ["hero", "feature-a", "feature-b", "visitors", "footer"] {
        assert!(engine.is_tracking(&page.get(name)), "{name} should be tracked");
    }
    assert!(!engine.is_tracking(&page.get("settled")));
    assert!(!engine.is_tracking(&page.get("plain")));

    let events = engine.drain_events();
    assert_eq!(events.len(), 5);
    assert!(events.iter().all(|e| matches!(
        e,
        RevealEvent::Tracked {
            via: Discovery::Seed,
            ..
        }
    )));
    assert!(engine.drain_events().is_empty());
    assert!(page.is_watching());
    assert_eq!(page.watch_calls(), 1);
}

/// it should write transition timing onto each tracked element
#[test]
fn applies_transition_timing() {
    let mut page = pages::load("landing").unwrap();
    let _engine = Engine::new(EngineConfig::default(), &mut page);

    let hero = page.get("hero");
    assert_eq!(page.style(hero, TRANSITION_DURATION), Some("500ms"));
    assert_eq!(page.style(hero, TRANSITION_DELAY), Some("0ms"));

    let a = page.get("feature-a");
    assert_eq!(page.style(a, TRANSITION_DURATION), Some("500ms"));
    assert_eq!(page.style(a, TRANSITION_DELAY), Some("150ms"));

    let b = page.get("feature-b");
    assert_eq!(page.style(b, TRANSITION_DURATION), Some("900ms"));

    assert_eq!(page.style(page.get("plain"), TRANSITION_DURATION), None);
}

/// it should treat an explicit speed of 0 as unset and use 500
#[test]
fn zero_speed_uses_default() {
    let mut page = FakePage::observing(800.0);
    let el = page.insert(None, ElementSpec::new(2000.0).jazzy("fade"));
    let engine = Engine::new(
        EngineConfig {
            speed: Some(0.0),
            delay: Some(0.0),
            offset: None,
        },
        &mut page,
    );
    assert_eq!(engine.defaults().speed_ms, 500.0);
    assert_eq!(page.style(el, TRANSITION_DURATION), Some("500ms"));
}

/// it should fall back to the engine value when an element override is zero
#[test]
fn zero_element_override_uses_engine_value() {
    let mut page = FakePage::observing(800.0);
    let el = page.insert(
        None,
        ElementSpec::new(2000.0)
            .jazzy("fade")
            .attr("data-jazzy-speed", "0")
            .attr("data-jazzy-delay", "soon"),
    );
    let _engine = Engine::new(
        EngineConfig {
            speed: Some(750.0),
            delay: Some(40.0),
            offset: None,
        },
        &mut page,
    );
    assert_eq!(page.style(el, TRANSITION_DURATION), Some("750ms"));
    assert_eq!(page.style(el, TRANSITION_DELAY), Some("40ms"));
}

/// it should force the engine offset to 0 on orientation-capable devices but
/// keep per-element offset overrides
#[test]
fn mobile_override_zeroes_engine_offset_only() {
    let mut page = pages::load("mobile").unwrap();
    let engine = Engine::new(
        EngineConfig {
            offset: Some(50.0),
            ..Default::default()
        },
        &mut page,
    );
    assert_eq!(engine.defaults().offset_px, 0);

    let plain = page.observer_options(page.get("card-1")).unwrap();
    assert_eq!(plain.root_margin, "0px 0px 0px 0px");
    let overridden = page.observer_options(page.get("card-2")).unwrap();
    assert_eq!(overridden.root_margin, "0px 0px -120px 0px");
}

/// it should use the configured offset on desktop
#[test]
fn desktop_keeps_engine_offset() {
    let mut page = FakePage::observing(800.0);
    let el = page.insert(None, ElementSpec::new(2000.0).jazzy("fade"));
    let engine = Engine::new(
        EngineConfig {
            offset: Some(50.0),
            ..Default::default()
        },
        &mut page,
    );
    assert_eq!(engine.defaults().offset_px, 50);
    assert_eq!(
        page.observer_options(el).unwrap().root_margin,
        "0px 0px -50px 0px"
    );
}

/// it should activate visible elements as the page scrolls, each exactly once
#[test]
fn observer_activates_on_scroll() {
    let mut page = pages::load("landing").unwrap();
    let mut engine = Engine::new(EngineConfig::default(), &mut page);
    engine.drain_events();

    let entries = page.intersections();
    engine.on_intersections(&mut page, &entries);
    assert!(done(&page, "hero"));
    assert!(!done(&page, "feature-a"));
    assert_eq!(engine.stats().activated, 1);
    assert_eq!(engine.stats().pending, 4);

    page.scroll_to(1000.0);
    let entries = page.intersections();
    engine.on_intersections(&mut page, &entries);
    for name in ["feature-a", "feature-b", "visitors"] {
        assert!(done(&page, name), "{name} should be done");
    }
    assert!(!done(&page, "footer"));
    assert_eq!(engine.stats().activated, 4);
    assert_eq!(page.connected_observers(), 1);

    let activated: Vec<_> = engine
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, RevealEvent::Activated { .. }))
        .collect();
    assert_eq!(activated.len(), 4);
}

/// it should ignore repeated and duplicate entries for an activated element
#[test]
fn repeated_entries_do_not_reactivate() {
    let mut page = pages::load("landing").unwrap();
    let mut engine = Engine::new(EngineConfig::default(), &mut page);
    engine.drain_events();

    let mut entries = page.intersections();
    let again = entries.clone();
    entries.extend(again.iter().cloned());
    engine.on_intersections(&mut page, &entries);
    engine.on_intersections(&mut page, &again);
    page.scroll_to(0.0);
    let late = page.intersections();
    engine.on_intersections(&mut page, &late);

    assert_eq!(engine.stats().activated, 1);
    let count = engine
        .drain_events()
        .iter()
        .filter(|e| matches!(e, RevealEvent::Activated { .. }))
        .count();
    assert_eq!(count, 1);
}

/// it should step a counter only while it runs and stop asking for frames after
#[test]
fn observer_requests_frames_only_for_counters() {
    let mut page = pages::load("landing").unwrap();
    let mut engine = Engine::new(EngineConfig::default(), &mut page);
    page.scroll_to(1000.0);
    let entries = page.intersections();
    engine.on_intersections(&mut page, &entries);
    assert!(engine.wants_frame());

    let visitors = page.get("visitors");
    engine.on_frame(&mut page, 1000.0);
    engine.on_frame(&mut page, 1250.0);
    engine.on_frame(&mut page, 1500.0);
    assert_eq!(page.text_writes(visitors), ["0", "21", "42"]);
    assert!(!engine.wants_frame());
}

/// it should tear everything down on dispose, once
#[test]
fn dispose_disconnects_everything() {
    let mut page = pages::load("landing").unwrap();
    let mut engine = Engine::new(EngineConfig::default(), &mut page);
    assert_eq!(page.connected_observers(), 5);

    engine.dispose(&mut page);
    engine.dispose(&mut page);
    assert_eq!(page.connected_observers(), 0);
    assert!(!page.is_watching());
    assert!(!engine.is_running());
    assert!(!engine.wants_frame());
    assert_eq!(engine.stats().pending, 0);

    let disposed = engine
        .drain_events()
        .iter()
        .filter(|e| matches!(e, RevealEvent::Disposed))
        .count();
    assert_eq!(disposed, 1);

    page.scroll_to(1000.0);
    let entries = page.intersections();
    engine.on_intersections(&mut page, &entries);
    engine.on_frame(&mut page, 16.0);
    assert!(!done(&page, "hero"));
}

/// it should reveal an element on the next frame when its observer cannot be created
#[test]
fn unobservable_element_reveals_on_next_frame() {
    let mut page = FakePage::observing(800.0);
    let watched = page.insert(None, ElementSpec::new(2000.0).jazzy("fade"));
    let mut engine = Engine::new(EngineConfig::default(), &mut page);
    assert!(!engine.wants_frame());

    page.fail_observers(true);
    let orphan = page.insert(None, ElementSpec::new(3000.0).jazzy("jazzy-count").text("9"));
    let batch = page.take_mutations();
    engine.on_mutations(&mut page, &batch);
    engine.drain_events();
    assert_eq!(engine.strategy_kind(), StrategyKind::Observer);
    assert_eq!(page.connected_observers(), 1);
    assert_eq!(engine.stats().pending, 2);
    assert!(engine.is_tracking(&orphan));
    assert!(engine.wants_frame());

    engine.on_frame(&mut page, 0.0);
    assert!(page.has_class(&orphan, DONE_CLASS));
    assert!(!page.has_class(&watched, DONE_CLASS));
    assert_eq!(engine.stats().pending, 1);
    assert_eq!(engine.stats().running_ramps, 1);

    engine.on_frame(&mut page, 500.0);
    assert_eq!(page.text(orphan), Some("9"));
    assert!(!engine.wants_frame());

    let activated = engine
        .drain_events()
        .iter()
        .filter(|e| matches!(e, RevealEvent::Activated { counting: true, .. }))
        .count();
    assert_eq!(activated, 1);
}

/// it should load every page listed in the fixture manifest
#[test]
fn every_fixture_page_loads() {
    let mut names = pages::keys();
    names.sort();
    assert_eq!(names, ["counters", "landing", "mobile"]);
    for name in &names {
        let mut page = pages::load(name).unwrap();
        let engine = Engine::new(EngineConfig::default(), &mut page);
        assert!(engine.stats().pending > 0, "{name} should seed elements");
    }
}

/// it should let independent engines coexist over separate pages
#[test]
fn engines_are_independent() {
    let mut a = pages::load("counters").unwrap();
    let mut b = pages::load("counters").unwrap();
    let mut ea = Engine::new(EngineConfig::default(), &mut a);
    let eb = Engine::new(EngineConfig::default(), &mut b);

    ea.on_frame(&mut a, 0.0);
    assert_eq!(ea.stats().activated, 4);
    assert_eq!(eb.stats().activated, 0);
    assert!(!b.has_class(&b.get("sales"), DONE_CLASS));
}
