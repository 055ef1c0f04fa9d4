use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use segue_core::EngineConfig;
use segue_sim::{Effect, PageFixture, Simulation, TimelineEntry};

pub struct Options {
    pub limit_ms: u64,
    pub json: bool,
    pub realtime: bool,
    pub speed: f64,
}

/// A click from the command line: `element` or `element@ms`
#[derive(Debug, PartialEq)]
struct ScheduledClick {
    element: String,
    at: Duration,
}

fn parse_click(raw: &str) -> Result<ScheduledClick> {
    let (element, at) = match raw.rsplit_once('@') {
        Some((element, ms)) => {
            let ms: u64 = ms
                .parse()
                .with_context(|| format!("Invalid click time in '{}'", raw))?;
            (element, Duration::from_millis(ms))
        }
        None => (raw, Duration::ZERO),
    };
    if element.is_empty() {
        bail!("Missing element in click '{}'", raw);
    }
    Ok(ScheduledClick {
        element: element.to_string(),
        at,
    })
}

pub async fn run(page_path: &Path, config: EngineConfig, clicks: &[String], options: Options) -> Result<()> {
    let page = PageFixture::load(page_path)?;
    let mut clicks = clicks
        .iter()
        .map(|c| parse_click(c))
        .collect::<Result<Vec<_>>>()?;
    clicks.sort_by_key(|c| c.at);

    let mut sim = Simulation::new(&page, config);
    if sim.engine().registry().is_empty() {
        warn!("No animations registered; every click will navigate normally");
    }

    for click in &clicks {
        let gap = click.at.saturating_sub(sim.host().now());
        if options.realtime {
            sim.run_realtime(gap, options.speed).await;
        }
        sim.advance(click.at.saturating_sub(sim.host().now()));

        let outcome = sim.click(&click.element)?;
        info!(
            element = click.element.as_str(),
            at_ms = click.at.as_millis() as u64,
            intercepted = outcome.is_intercepted(),
            "Clicked"
        );
    }

    let limit = Duration::from_millis(options.limit_ms);
    let quiet = if options.realtime {
        sim.run_realtime(limit, options.speed).await
    } else {
        sim.run_until_quiet(limit)
    };
    if !quiet {
        warn!("Page still busy after {}ms of virtual time", options.limit_ms);
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(sim.host().timeline())?);
    } else {
        print_timeline(sim.host().timeline());
        if !sim.engine().is_idle() {
            println!("\nEngine left in {:?} phase", sim.engine().phase());
        }
    }

    Ok(())
}

fn describe(effect: &Effect) -> String {
    match effect {
        Effect::Click {
            element,
            intercepted: true,
        } => format!("click on '{}' intercepted", element),
        Effect::Click {
            element,
            intercepted: false,
        } => format!("click on '{}' passed through", element),
        Effect::DefaultNavigation { href } => format!("browser navigates to {}", href),
        Effect::ClassAdded { class } => format!("class '{}' added", class),
        Effect::ClassRemoved { class } => format!("class '{}' removed", class),
        Effect::SignalBound { element, signal } => format!("listening for {} on '{}'", signal, element),
        Effect::SignalUnbound { element, signal } => format!("stopped listening for {} on '{}'", signal, element),
        Effect::TransitionEnded { element, delivered } => {
            if *delivered {
                format!("transition ended on '{}'", element)
            } else {
                format!("transition ended on '{}' (no listener)", element)
            }
        }
        Effect::Scrolled { offset } => format!("scroll at {:.1}", offset),
        Effect::Navigated { path } => format!("navigate to {}", path),
        Effect::Reloaded => "reload".to_string(),
        Effect::Unloaded => "page unloaded".to_string(),
    }
}

/// Print one line per effect, folding runs of scroll frames into one line
fn print_timeline(timeline: &[TimelineEntry]) {
    let mut i = 0;
    while i < timeline.len() {
        let entry = &timeline[i];
        if let Effect::Scrolled { .. } = entry.effect {
            let start = i;
            while i + 1 < timeline.len() && matches!(timeline[i + 1].effect, Effect::Scrolled { .. }) {
                i += 1;
            }
            if let Effect::Scrolled { offset } = timeline[i].effect {
                println!(
                    "{:>7}ms  scroll to {:.1} ({} frames from {}ms)",
                    timeline[i].at_ms,
                    offset,
                    i - start + 1,
                    timeline[start].at_ms
                );
            }
        } else {
            println!("{:>7}ms  {}", entry.at_ms, describe(&entry.effect));
        }
        i += 1;
    }
}
