use anyhow::Result;
use owo_colors::OwoColorize;

use taskwire_core::api::ApiClient;
use taskwire_core::models::{Horizon, RecurrenceRule};
use taskwire_core::recurrence::expand;

use crate::cli::{RecurInstancesCommand, RecurPreviewCommand};
use crate::util::parse_task_id;
use crate::views::table::{display_occurrences, display_tasks};

/// Preview is computed locally from the series rule; it needs no
/// materialized instances on the server.
pub async fn preview(
    client: &ApiClient,
    command: RecurPreviewCommand,
    default_count: usize,
) -> Result<()> {
    let root_id = parse_task_id(&command.id)?;
    let root = client.get_task(root_id).await?;

    let raw = root
        .rrule_string
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("Task '{}' is not recurring", root.title))?;
    let rule: RecurrenceRule = raw.parse().map_err(|e| anyhow::anyhow!("{}", e))?;

    let count = command.count.unwrap_or(default_count);
    let occurrences: Vec<_> = expand(&root, &rule, Horizon::Count(count))?.collect();
    println!(
        "Next {} occurrence(s) of {}:",
        occurrences.len(),
        root.title.bold()
    );
    display_occurrences(&occurrences);
    Ok(())
}

pub async fn instances(client: &ApiClient, command: RecurInstancesCommand) -> Result<()> {
    let root_id = parse_task_id(&command.id)?;
    let instances = client.series_instances(root_id).await?;
    display_tasks(&instances);
    Ok(())
}
