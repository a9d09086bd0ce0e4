use crate::output;
use anyhow::Context;
use docsync_core::config::Config;
use docsync_core::mapping::TopicMapper;
use docsync_core::plan::{self, Preflight, RefreshPlan, Strategy};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct StatusReport {
    preflight: Preflight,
    strategy: Strategy,
    plan: RefreshPlan,
}

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load .docsync.yaml")?;

    let preflight = Preflight::check(root, &config);
    let strategy = plan::choose(preflight.index_present, preflight.docs_present);
    let plan = plan::build(root, &config, strategy).context("failed to plan refresh")?;

    if json {
        return output::print_json(&StatusReport {
            preflight,
            strategy,
            plan,
        });
    }

    let presence = |present: bool| if present { "present" } else { "absent" };
    println!(
        "Project index:    {} ({})",
        presence(preflight.index_present),
        config.index_file
    );
    println!(
        "Documentation:    {} ({}/)",
        presence(preflight.docs_present),
        config.docs_dir
    );
    println!(
        "Quick reference:  {} ({})",
        presence(preflight.quick_ref_present),
        config.quick_reference
    );
    println!(
        "Version control:  {}",
        if preflight.in_work_tree {
            "git work tree"
        } else {
            "none"
        }
    );
    println!("Strategy:         {} (source: {})", plan.mode, plan.source);
    if let Some(watermark) = &plan.watermark {
        println!("Watermark:        {}", watermark.short());
    }
    for note in &plan.notes {
        println!("Note:             {note}");
    }

    if !plan.changed_paths.is_empty() {
        println!("\nPending changes:");
        let mapper = TopicMapper::default();
        let rows: Vec<Vec<String>> = plan
            .changed_paths
            .iter()
            .map(|path| {
                let topics = mapper.topics_for(path);
                let impact = if topics.is_empty() {
                    "(no doc impact)".to_string()
                } else {
                    topics
                        .iter()
                        .map(|t| t.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                vec![path.clone(), impact]
            })
            .collect();
        output::print_table(&["PATH", "AFFECTS"], rows);
    }

    Ok(())
}
