use anyhow::Result;
use dialoguer::Select;
use owo_colors::OwoColorize;

use taskwire_core::api::ApiClient;
use taskwire_core::models::{EditScope, Task, TaskChanges, TaskPriority};

use crate::cli::EditCommand;
use crate::parser::parse_deadline;
use crate::util::{parse_scope, parse_task_id};

pub async fn edit_task(client: &ApiClient, command: EditCommand) -> Result<()> {
    let task_id = parse_task_id(&command.id)?;
    let task = client.get_task(task_id).await?;

    let scope = resolve_scope(&task, command.scope.as_deref())?;

    let description = if command.description_clear {
        Some(None)
    } else {
        command.description.clone().map(Some)
    };

    let deadline = if command.due_clear {
        Some(None)
    } else if let Some(due) = &command.due {
        Some(Some(parse_deadline(due)?))
    } else {
        None
    };

    let priority = command
        .priority
        .as_deref()
        .map(|p| p.parse::<TaskPriority>())
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;

    let rrule = if command.rrule_clear {
        Some(None)
    } else {
        command.rrule.clone().map(Some)
    };

    let time_required_minutes = command.time.map(|minutes| (minutes > 0).then_some(minutes));

    let changes = TaskChanges {
        title: command.title,
        description,
        status: None,
        priority,
        deadline,
        category: command.category,
        archived: command.archived,
        time_required_minutes,
        add_comment: command.comment,
        rrule,
    };

    match (task.is_occurrence(), task.is_series_root()) {
        (false, false) => {
            let updated = client.update_task(task_id, &changes).await?;
            println!("Updated task {}", updated.id.to_string().yellow());
        }
        (true, _) => {
            let series_root = task.parent_task_id.expect("occurrence has a parent");
            let index = task
                .occurrence_index
                .ok_or_else(|| anyhow::anyhow!("Occurrence is missing its index"))?;
            client
                .update_series(series_root, index, &changes, scope)
                .await?;
            report_series_edit(scope);
        }
        (_, true) => {
            // Editing the root applies from the first occurrence.
            client.update_series(task_id, 1, &changes, scope).await?;
            report_series_edit(scope);
        }
    }

    Ok(())
}

fn report_series_edit(scope: EditScope) {
    match scope {
        EditScope::ThisOccurrence => println!("Updated this occurrence only"),
        EditScope::ThisAndFollowing => println!("Updated this and all following occurrences"),
        EditScope::EntireSeries => println!("Updated the entire series"),
    }
}

fn resolve_scope(task: &Task, requested: Option<&str>) -> Result<EditScope> {
    if !task.recurring && task.parent_task_id.is_none() {
        return Ok(EditScope::ThisOccurrence);
    }
    if let Some(raw) = requested {
        return parse_scope(raw);
    }

    println!("{}", "This task is part of a recurring series.".yellow());
    let options = [
        "This occurrence only",
        "This and following occurrences",
        "Entire series",
    ];
    let selection = Select::new()
        .with_prompt("How would you like to apply your changes?")
        .items(&options)
        .default(0)
        .interact()?;

    Ok(match selection {
        0 => EditScope::ThisOccurrence,
        1 => EditScope::ThisAndFollowing,
        _ => EditScope::EntireSeries,
    })
}
