use crate::output;
use anyhow::Context;
use docsync_core::config::Config;
use docsync_core::refresh::{self, RefreshOptions};
use std::io::Write;
use std::path::Path;

pub fn run(root: &Path, yes: bool, no_index: bool, dry_run: bool, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load .docsync.yaml")?;

    let mut consent = move || {
        if yes {
            return true;
        }
        if no_index {
            return false;
        }
        prompt_yes_no("No project index found. Create one with the external indexer?")
    };

    let summary = refresh::run(root, &config, RefreshOptions { dry_run }, &mut consent)
        .context("documentation refresh failed")?;

    if json {
        output::print_json(&summary)?;
    } else {
        print!(
            "{}",
            summary.render_text(&config.docs_dir, &config.quick_reference)
        );
    }
    Ok(())
}

/// Blocking yes/no prompt on stdin. Anything but an explicit yes declines,
/// including EOF on a non-interactive stream.
fn prompt_yes_no(question: &str) -> bool {
    print!("{question} [y/N] ");
    let _ = std::io::stdout().flush();
    let mut line = String::new();
    if std::io::stdin().read_line(&mut line).is_err() {
        return false;
    }
    matches!(line.trim(), "y" | "Y" | "yes")
}
