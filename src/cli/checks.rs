//! checks command - list the active checks in run order

use crate::checks::CheckRegistry;
use crate::config::SeoConfig;
use anyhow::Result;

const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

pub fn run(config: &SeoConfig) -> Result<()> {
    print!("{}", render(&CheckRegistry::from_config(config)));
    Ok(())
}

fn render(registry: &CheckRegistry) -> String {
    let mut out = format!(
        "{DIM}{:<30} {:<12} {:<8} {:>6} {:>5}  TITLE{RESET}\n",
        "ID", "CATEGORY", "PRIORITY", "WEIGHT", "FIX"
    );

    let registrations = registry.active_registrations();
    let checks = registry.list_active_checks();
    for (registration, check) in registrations.iter().zip(&checks) {
        let descriptor = check.descriptor();
        let fatal = if descriptor.continue_after_failure {
            ""
        } else {
            " (stops the run on failure)"
        };
        out.push_str(&format!(
            "{:<30} {:<12} {:<8} {:>6} {:>4}m  {}{DIM}{}{RESET}\n",
            check.id(),
            registration.category.as_str(),
            descriptor.priority.to_string(),
            descriptor.score_weight,
            descriptor.time_to_fix_minutes,
            descriptor.title,
            fatal
        ));
    }

    out.push_str(&format!("\n{BOLD}{} active check(s){RESET}\n", checks.len()));
    out
}
