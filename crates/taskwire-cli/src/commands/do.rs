use anyhow::Result;
use owo_colors::OwoColorize;

use taskwire_core::api::ApiClient;

use crate::cli::DoCommand;
use crate::util::parse_task_id;

pub async fn do_task(client: &ApiClient, command: DoCommand) -> Result<()> {
    let id = parse_task_id(&command.id)?;
    let task = client.complete_task(id).await?;
    println!("{} Completed: {}", "✓".green().bold(), task.title.bold());
    Ok(())
}
