//! Whole-page effect behaviour on the sample landing page

mod common;

use std::time::Duration;

use common::{ms, sample_page, tags_are_whole, SamplePage};
use glint_animation::FixedDelay;
use glint_app::{GlintApp, SiteConfig};
use glint_core::{Document, DocumentTree};
use glint_effects::{CounterState, RevealState, TypewriterPhase, CURSOR_MARKUP, DEFAULT_SNIPPET};
use glint_viewport::Viewport;
use pretty_assertions::assert_eq;

fn desktop() -> Viewport {
    Viewport::new(1280.0, 720.0)
}

fn mounted(page: SamplePage, config: SiteConfig) -> GlintApp<DocumentTree> {
    let mut app = GlintApp::new(page.tree, config, desktop()).with_delay_source(FixedDelay(ms(20)));
    app.mount();
    app
}

fn counter_text(app: &GlintApp, node: glint_core::NodeId) -> String {
    app.document().text_content(node).unwrap_or_default()
}

#[test]
fn test_counter_reaches_target_after_two_seconds() {
    let page = sample_page();
    let (stat, counter) = (page.stats[2], page.counters[2]);
    let mut app = mounted(page, SiteConfig::default());

    // Below the fold: nothing runs yet
    app.advance(ms(3000));
    assert_eq!(counter_text(&app, counter), "0");

    app.scroll_to(800.0);
    app.advance(ms(1000));
    let midway: i64 = counter_text(&app, counter).parse().unwrap();
    assert!(midway > 0 && midway < 1500, "midway = {midway}");

    app.advance(ms(1000));
    assert_eq!(counter_text(&app, counter), "1500");
    assert_eq!(app.counter().target(stat).unwrap().state, CounterState::Done);
}

#[test]
fn test_counter_is_monotonic_and_exact() {
    let page = sample_page();
    let counters = page.counters.clone();
    let mut app = mounted(page, SiteConfig::default());
    app.scroll_to(800.0);

    let mut previous = vec![0i64; counters.len()];
    for _ in 0..130 {
        app.advance(ms(16));
        for (last, &counter) in previous.iter_mut().zip(&counters) {
            let value: i64 = counter_text(&app, counter).parse().unwrap();
            assert!(value >= *last, "{value} < {last}");
            *last = value;
        }
    }

    assert_eq!(previous, vec![150, 98, 1500]);
}

#[test]
fn test_siblings_visible_together_are_staggered() {
    let page = sample_page();
    let cards = page.cards.clone();
    let title = page.services_title;
    let mut app = mounted(page, SiteConfig::default());

    app.scroll_to(1500.0);

    let delays: Vec<Duration> = cards
        .iter()
        .map(|&card| app.reveal().target(card).unwrap().delay)
        .collect();
    assert_eq!(delays, vec![ms(0), ms(100), ms(200), ms(300), ms(400)]);
    assert_eq!(app.reveal().target(title).unwrap().delay, ms(0));

    app.advance(ms(250));
    let opacities: Vec<String> = cards
        .iter()
        .map(|&card| app.document().style(card, "opacity").unwrap_or_default())
        .collect();
    assert_eq!(opacities, vec!["1", "1", "1", "0", "0"]);

    app.advance(ms(150));
    for &card in &cards {
        assert_eq!(app.document().style(card, "opacity").as_deref(), Some("1"));
        assert_eq!(app.document().style(card, "transform").as_deref(), Some("none"));
        assert_eq!(app.reveal().target(card).unwrap().state, RevealState::Revealed);
    }
}

#[test]
fn test_triggers_fire_at_most_once() {
    let page = sample_page();
    let stat = page.stats[0];
    let card = page.cards[0];
    let mut app = mounted(page, SiteConfig::default());
    // Three stats, the services title and five cards are below the fold
    assert_eq!(app.pending_observations(), 9);

    app.scroll_to(800.0);
    assert_eq!(app.pending_observations(), 6);
    app.scroll_to(1500.0);
    assert_eq!(app.pending_observations(), 0);
    app.run_until_idle(Duration::from_secs(60));

    for y in [0.0, 800.0, 1500.0, 0.0, 1500.0] {
        app.scroll_to(y);
        assert_eq!(app.pending_tasks(), 0);
    }
    assert_eq!(app.counter().target(stat).unwrap().frame(), 120);
    assert_eq!(app.document().style(card, "opacity").as_deref(), Some("1"));
}

#[test]
fn test_typewriter_cursor_lingers_then_disappears() {
    let page = sample_page();
    let code = page.code;
    let config = SiteConfig {
        typewriter: glint_effects::TypewriterConfig {
            lines: Some(vec![
                r#"<span class="keyword">let</span> a = 1;"#.to_string(),
                "let b = 2;".to_string(),
                r#"<span class="comment">// done</span>"#.to_string(),
            ]),
            ..Default::default()
        },
        ..Default::default()
    };
    let mut app = mounted(page, config);

    let mut guard = 0;
    while app.typewriter().phase() != TypewriterPhase::Finished {
        app.advance(ms(1));
        guard += 1;
        assert!(guard < 10_000, "typewriter never finished");
    }

    let expected = "<span class=\"keyword\">let</span> a = 1;\nlet b = 2;\n<span class=\"comment\">// done</span>";
    let markup = app.document().inner_markup(code).unwrap();
    assert_eq!(markup, format!("{expected}{CURSOR_MARKUP}"));

    app.advance(ms(1999));
    assert!(app.document().inner_markup(code).unwrap().contains(CURSOR_MARKUP));

    app.advance(ms(1));
    assert_eq!(app.document().inner_markup(code).unwrap(), expected);
    assert_eq!(app.pending_tasks(), 0);
}

#[test]
fn test_typewriter_types_authored_snippet_without_broken_tags() {
    let page = sample_page();
    let code = page.code;
    let mut app = mounted(page, SiteConfig::default());

    // Cleared and shown as soon as it is visible
    assert_eq!(app.document().inner_markup(code).as_deref(), Some(""));
    assert_eq!(app.document().style(code, "opacity").as_deref(), Some("1"));

    let mut steps = 0;
    while app.typewriter().phase() != TypewriterPhase::Finished {
        app.advance(ms(20));
        let markup = app.document().inner_markup(code).unwrap();
        assert!(tags_are_whole(&markup), "broken markup: {markup}");
        steps += 1;
        assert!(steps < 10_000, "typewriter never finished");
    }

    app.run_until_idle(Duration::from_secs(5));
    assert_eq!(
        app.document().inner_markup(code).unwrap(),
        DEFAULT_SNIPPET.join("\n")
    );
}

#[test]
fn test_narrow_viewport_skips_typewriter_and_parallax() {
    let page = sample_page();
    let code = page.code;
    let glow = page.glows[0];
    let mut app = GlintApp::new(page.tree, SiteConfig::default(), Viewport::new(600.0, 900.0));
    app.mount();

    assert_eq!(app.typewriter().container(), None);
    assert_eq!(app.document().style(code, "opacity"), None);
    assert!(!app.parallax().is_armed());
    assert!(!app.pointer_move(300.0, 300.0));
    assert_eq!(app.document().style(glow, "transform"), None);

    app.advance(Duration::from_secs(30));
    assert_eq!(
        app.document().inner_markup(code).unwrap(),
        DEFAULT_SNIPPET.join("\n")
    );
}

#[test]
fn test_pointer_over_hero_moves_glows() {
    let page = sample_page();
    let glows = page.glows.clone();
    let mut app = mounted(page, SiteConfig::default());

    assert!(app.pointer_move(0.0, 0.0));
    assert_eq!(
        app.document().style(glows[0], "transform").as_deref(),
        Some("translate(-15px, -15px)")
    );
    assert_eq!(
        app.document().style(glows[1], "transform").as_deref(),
        Some("translate(-30px, -30px)")
    );

    app.scroll_to(1500.0);
    assert!(!app.pointer_move(0.0, 0.0));
}
