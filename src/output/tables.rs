use chrono::{DateTime, Utc};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color as TableColor, ContentArrangement, Table};
use indexmap::IndexMap;

use crate::providers::gitlab::{Job, JobStatus, Pipeline};

/// Table and cell creation helpers
fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn status_cell(status: &str) -> Cell {
    let color = match status {
        "success" => TableColor::Green,
        "failed" => TableColor::Red,
        "running" => TableColor::Cyan,
        "manual" => TableColor::Magenta,
        "pending" | "created" | "waiting_for_resource" | "preparing" | "scheduled" => {
            TableColor::Yellow
        }
        _ => TableColor::Grey,
    };
    Cell::new(status).fg(color)
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn duration(seconds: Option<f64>) -> String {
    match seconds {
        Some(seconds) if seconds >= 60.0 => format!("{:.1}min", seconds / 60.0),
        Some(seconds) => format!("{seconds:.0}s"),
        None => "-".to_string(),
    }
}

pub fn pipeline_table(pipeline: &Pipeline, url: &str) -> Table {
    let mut table = create_table();
    let short_sha: String = pipeline.sha.chars().take(8).collect();

    table.add_row(vec![Cell::new("Pipeline"), Cell::new(pipeline.id)]);
    table.add_row(vec![Cell::new("Ref"), Cell::new(&pipeline.ref_)]);
    table.add_row(vec![Cell::new("Commit"), Cell::new(short_sha)]);
    table.add_row(vec![Cell::new("Status"), status_cell(&pipeline.status)]);
    if let Some(source) = &pipeline.source {
        table.add_row(vec![Cell::new("Source"), Cell::new(source)]);
    }
    table.add_row(vec![
        Cell::new("Created"),
        Cell::new(timestamp(pipeline.created_at)),
    ]);
    table.add_row(vec![Cell::new("URL"), Cell::new(url)]);
    table
}

/// Jobs in the order given, one row each.
pub fn job_table(jobs: &[Job]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["ID", "Stage", "Name", "Status", "Created", "Duration"]);

    for job in jobs {
        let mut status = status_cell(job.status.as_str());
        if job.allow_failure && job.status == JobStatus::Failed {
            status = Cell::new("failed (allowed)").fg(TableColor::Yellow);
        }
        table.add_row(vec![
            Cell::new(job.id),
            Cell::new(&job.stage),
            Cell::new(&job.name),
            status,
            Cell::new(timestamp(job.created_at)),
            Cell::new(duration(job.duration)),
        ]);
    }

    table
}

/// Status counts per stage, counting only the latest attempt of each job.
///
/// `jobs` must be in creation order. Stages appear in the order their first
/// job was created.
pub fn summarize_stages(jobs: &[Job]) -> IndexMap<&str, IndexMap<&'static str, usize>> {
    let mut latest: IndexMap<&str, IndexMap<&str, &Job>> = IndexMap::new();
    for job in jobs {
        latest
            .entry(job.stage.as_str())
            .or_default()
            .insert(job.name.as_str(), job);
    }

    latest
        .into_iter()
        .map(|(stage, attempts)| {
            let mut counts: IndexMap<&'static str, usize> = IndexMap::new();
            for job in attempts.values() {
                *counts.entry(job.status.as_str()).or_default() += 1;
            }
            (stage, counts)
        })
        .collect()
}

/// One-line rendering of [`summarize_stages`], e.g. `build: 2 success › test: 1 failed, 1 running`.
pub fn stage_summary(jobs: &[Job]) -> String {
    summarize_stages(jobs)
        .iter()
        .map(|(stage, counts)| {
            let counts: Vec<String> = counts
                .iter()
                .map(|(status, count)| format!("{count} {status}"))
                .collect();
            format!("{stage}: {}", counts.join(", "))
        })
        .collect::<Vec<_>>()
        .join(" › ")
}
