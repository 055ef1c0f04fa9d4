use std::io::Write;
use std::path::Path;

use anyhow::{bail, Result};

use segue_core::anchor::path_of;
use segue_core::{EngineConfig, Host, Registry};
use segue_sim::{PageFixture, SimHost};

pub fn run(page_path: &Path, config: &EngineConfig) -> Result<()> {
    let page = PageFixture::load(page_path)?;
    let problems = report(&page, config, &mut std::io::stdout().lock())?;

    if problems > 0 {
        bail!("{} problem(s) found", problems);
    }

    Ok(())
}

/// Write the check report for `page` to `out` and return the problem count
fn report(page: &PageFixture, config: &EngineConfig, out: &mut impl Write) -> Result<usize> {
    if config.animations.is_empty() {
        writeln!(out, "No animations configured.")?;
        return Ok(0);
    }

    let host = SimHost::new(page);
    let mut registry = Registry::new();
    let mut problems = 0;

    writeln!(out, "Animations:")?;
    for spec in &config.animations {
        match registry.register_spec(&host, config, spec) {
            Ok(descriptor) if descriptor.final_element().is_none() => {
                problems += 1;
                writeln!(
                    out,
                    "  error  {}  final element '{}' not found in page",
                    spec.pattern, spec.final_element
                )?;
            }
            Ok(descriptor) => {
                let scroll = if descriptor.should_scroll() {
                    format!(
                        "scroll {} over {}ms",
                        descriptor.scroll_timing(),
                        descriptor.scroll_duration().as_millis()
                    )
                } else {
                    "no scroll".to_string()
                };
                writeln!(
                    out,
                    "  ok     {}  class '{}', waits on '{}', {}",
                    spec.pattern,
                    descriptor.body_class(),
                    descriptor.final_element_id(),
                    scroll
                )?;
            }
            Err(e) => {
                problems += 1;
                writeln!(out, "  error  {}  {}", spec.pattern, e)?;
            }
        }
    }

    writeln!(out, "\nLinks:")?;
    let current = host.current_path();
    for link in host.links() {
        let Some(path) = path_of(&host, link) else {
            continue;
        };
        let verdict = if !config.animate_links_to_self && path == current {
            "links to current page, not animated".to_string()
        } else {
            match registry.find(&path) {
                Some(d) if d.final_element().is_some() => format!("animated by {}", d.pattern()),
                Some(d) => format!("matches {} but cannot animate", d.pattern()),
                None => "not animated".to_string(),
            }
        };
        writeln!(out, "  {:<20} {:<30} {}", host.name(link), path, verdict)?;
    }

    Ok(problems)
}

#[cfg(test)]
mod tests {
    use segue_core::{AnimationOptions, AnimationSpec};

    use super::*;

    fn page() -> PageFixture {
        PageFixture::new("https://example.com", "/")
            .animated("hero", 400)
            .link("nav-home", "/")
            .link("nav-about", "/about")
            .link("nav-blog", "/blog")
    }

    fn spec(pattern: &str, final_element: &str) -> AnimationSpec {
        AnimationSpec {
            pattern: pattern.to_string(),
            final_element: final_element.to_string(),
            body_class: "leaving".to_string(),
            options: AnimationOptions::default(),
        }
    }

    fn render(config: &EngineConfig) -> (usize, String) {
        let mut out = Vec::new();
        let problems = report(&page(), config, &mut out).unwrap();
        (problems, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_empty_config_prints_only_notice() {
        let (problems, out) = render(&EngineConfig::default());
        assert_eq!(problems, 0);
        assert_eq!(out, "No animations configured.\n");
    }

    #[test]
    fn test_reports_links_and_problems() {
        let config = EngineConfig {
            animations: vec![spec("^/about$", "hero"), spec("^/blog", "missing"), spec("(", "hero")],
            ..Default::default()
        };
        let (problems, out) = render(&config);

        assert_eq!(problems, 2);
        assert!(out.contains("ok     ^/about$"));
        assert!(out.contains("final element 'missing' not found"));
        let lines: Vec<&str> = out.lines().collect();
        let link = |name: &str| lines.iter().find(|l| l.trim_start().starts_with(name)).copied();
        assert!(link("nav-about").unwrap().ends_with("animated by ^/about$"));
        assert!(link("nav-blog").unwrap().ends_with("matches ^/blog but cannot animate"));
        assert!(link("nav-home").unwrap().ends_with("links to current page, not animated"));
    }
}
