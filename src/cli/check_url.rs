//! check-url command - audit one page and print its score

use crate::audit::Auditor;
use crate::config::SeoConfig;
use crate::reporters::{report_with_format, summary_line, OutputFormat};
use crate::scoring::ScoreResult;
use anyhow::Result;

pub fn run(config: SeoConfig, url: &str, format: OutputFormat, explain: bool) -> Result<()> {
    let auditor = Auditor::new(config)?;
    let result = auditor.check(url)?;
    print!("{}", render(&result, format, explain)?);
    Ok(())
}

/// Command output for a finished audit
fn render(result: &ScoreResult, format: OutputFormat, explain: bool) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(format!("{}\n", report_with_format(result, format)?)),
        OutputFormat::Text => {
            let mut out = String::new();
            if explain {
                out.push_str(&report_with_format(result, format)?);
                out.push('\n');
            }
            out.push_str(&summary_line(result));
            out.push_str("\nDone!\n");
            Ok(out)
        }
    }
}
