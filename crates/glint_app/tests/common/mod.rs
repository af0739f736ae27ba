#![allow(dead_code)]

use std::time::Duration;

use glint_core::{DocumentTree, NodeId};
use glint_effects::DEFAULT_SNIPPET;

pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Handles into the sample landing page
pub struct SamplePage {
    pub tree: DocumentTree,
    pub hero: NodeId,
    pub glows: Vec<NodeId>,
    pub code_window: NodeId,
    pub code: NodeId,
    pub stats: Vec<NodeId>,
    pub counters: Vec<NodeId>,
    pub services_title: NodeId,
    pub cards: Vec<NodeId>,
}

/// A landing page laid out for a 1280px wide viewport:
///
/// - hero (0..720) with two glows and the code window
/// - stats row at y=1000 with targets 150, 98 and 1500
/// - services section at y=1600 with a title and five cards at y=1800
pub fn sample_page() -> SamplePage {
    let mut tree = DocumentTree::new();
    let root = tree.root();

    let hero = tree.append(root, "section").class("hero").rect(0.0, 0.0, 1280.0, 720.0).finish();
    let glows = vec![
        tree.append(hero, "div").class("glow").class("glow-1").finish(),
        tree.append(hero, "div").class("glow").class("glow-2").finish(),
    ];
    tree.append(hero, "h1").class("hero-title").text("Soluções digitais").finish();

    let code_window = tree
        .append(hero, "div")
        .class("code-window")
        .rect(680.0, 150.0, 540.0, 400.0)
        .finish();
    tree.append(code_window, "div").class("window-header").finish();
    let body = tree.append(code_window, "div").class("window-body").finish();
    let code = tree
        .append(body, "code")
        .markup(&DEFAULT_SNIPPET.join("\n"))
        .rect(700.0, 200.0, 500.0, 300.0)
        .finish();

    let stats_row = tree.append(root, "div").class("hero-stats").finish();
    let mut stats = Vec::new();
    let mut counters = Vec::new();
    for (i, target) in ["150", "98", "1500"].into_iter().enumerate() {
        let stat = tree
            .append(stats_row, "div")
            .class("stat")
            .attr("data-target", target)
            .rect(100.0 + i as f32 * 300.0, 1000.0, 200.0, 120.0)
            .finish();
        counters.push(tree.append(stat, "span").class("counter").text("0").finish());
        tree.append(stat, "span").class("stat-label").text("Projetos").finish();
        stats.push(stat);
    }

    let services = tree.append(root, "section").id("servicos").finish();
    let services_title = tree
        .append(services, "h2")
        .class("section-title")
        .text("Serviços")
        .rect(0.0, 1600.0, 1280.0, 60.0)
        .finish();
    let grid = tree.append(services, "div").class("servicos-grid").finish();
    let cards = (0..5)
        .map(|i| {
            tree.append(grid, "article")
                .class("servico-card")
                .rect(i as f32 * 250.0, 1800.0, 240.0, 300.0)
                .finish()
        })
        .collect();

    SamplePage {
        tree,
        hero,
        glows,
        code_window,
        code,
        stats,
        counters,
        services_title,
        cards,
    }
}

/// Every `<` opens a tag that closes before the next one starts, and spans balance
pub fn tags_are_whole(markup: &str) -> bool {
    let mut open = false;
    for c in markup.chars() {
        match c {
            '<' if open => return false,
            '<' => open = true,
            '>' if open => open = false,
            _ => {}
        }
    }
    !open && markup.matches("<span").count() == markup.matches("</span>").count()
}
