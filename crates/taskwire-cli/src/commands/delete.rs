use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use taskwire_core::api::ApiClient;
use taskwire_core::models::EditScope;

use crate::cli::DeleteCommand;
use crate::util::{parse_scope, parse_task_id};

pub async fn delete_task(client: &ApiClient, command: DeleteCommand) -> Result<()> {
    let task_id = parse_task_id(&command.id)?;
    let task = client.get_task(task_id).await?;

    let in_series = task.is_series_root() || task.is_occurrence();
    let scope = match command.scope.as_deref() {
        Some(raw) => Some(parse_scope(raw)?),
        // Deleting a root without a scope means the whole series; deleting
        // an occurrence defaults to just that occurrence.
        None if task.is_series_root() => Some(EditScope::EntireSeries),
        None if in_series => Some(EditScope::ThisOccurrence),
        None => None,
    };

    if !command.force {
        let prompt = match scope {
            Some(EditScope::EntireSeries) => format!(
                "Delete '{}' and every occurrence in its series?",
                task.title
            ),
            Some(EditScope::ThisAndFollowing) => format!(
                "Delete '{}' and all following occurrences?",
                task.title
            ),
            _ => format!("Delete task '{}'?", task.title),
        };
        let confirmed = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false);
        if !confirmed {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    match scope {
        Some(scope) if in_series => {
            let (series_root, index) = if task.is_occurrence() {
                (
                    task.parent_task_id.expect("occurrence has a parent"),
                    task.occurrence_index
                        .ok_or_else(|| anyhow::anyhow!("Occurrence is missing its index"))?,
                )
            } else {
                (task_id, 1)
            };
            client.delete_series(series_root, index, scope).await?;
        }
        _ => client.delete_task(task_id).await?,
    }

    println!("{} Deleted: {}", "✓".green().bold(), task.title);
    Ok(())
}
