use anyhow::Result;
use owo_colors::{OwoColorize, Style};

use taskwire_core::api::ApiClient;
use taskwire_core::models::{NewTaskData, TaskPriority};

use crate::cli::AddCommand;
use crate::parser::{build_rrule, parse_deadline};

pub async fn add_task(client: &ApiClient, command: AddCommand) -> Result<()> {
    let deadline = command
        .due
        .as_deref()
        .map(parse_deadline)
        .transpose()?;
    let priority = command
        .priority
        .as_deref()
        .map(|p| p.parse::<TaskPriority>())
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;

    let rrule = if let Some(raw) = command.rrule {
        // Validate locally before shipping the raw rule.
        let rule: taskwire_core::models::RecurrenceRule =
            raw.parse().map_err(|e| anyhow::anyhow!("{}", e))?;
        Some(rule.to_string())
    } else if let Some(every) = &command.every {
        Some(build_rrule(every, command.until.as_deref())?)
    } else {
        None
    };

    if rrule.is_some() && deadline.is_none() {
        anyhow::bail!("A recurring task needs a deadline to anchor its schedule (use --due)");
    }

    let data = NewTaskData {
        title: command.title,
        description: command.description,
        deadline,
        priority,
        category: command.category,
        time_required_minutes: command.time,
        rrule,
    };

    let is_recurring = data.rrule.is_some();
    let task = client.create_task(&data).await?;

    let success_style = Style::new().green().bold();
    if is_recurring {
        println!(
            "{} Created recurring task: {}",
            "✓".style(success_style),
            task.title.bold()
        );
        println!("  → Series root ID: {}", task.id.to_string().yellow());
    } else {
        println!(
            "{} Created task: {} ({})",
            "✓".style(success_style),
            task.title.bold(),
            task.id.to_string().yellow()
        );
    }
    Ok(())
}
