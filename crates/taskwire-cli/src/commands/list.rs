use anyhow::Result;

use taskwire_core::api::tasks::TaskQuery;
use taskwire_core::api::ApiClient;
use taskwire_core::models::TaskStatus;

use crate::cli::ListCommand;
use crate::views::table::display_tasks;

pub async fn list_tasks(client: &ApiClient, command: ListCommand) -> Result<()> {
    let status = command
        .status
        .as_deref()
        .map(|s| s.parse::<TaskStatus>())
        .transpose()
        .map_err(|e| anyhow::anyhow!(e))?;

    let query = TaskQuery {
        status,
        category: command.category,
        archived: command.archived.then_some(true),
        due_before: None,
    };

    let tasks = client.list_tasks(&query).await?;
    display_tasks(&tasks);
    Ok(())
}
