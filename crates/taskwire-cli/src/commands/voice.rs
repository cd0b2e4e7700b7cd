use anyhow::{Context, Result};
use owo_colors::OwoColorize;

use taskwire_core::api::ApiClient;

use crate::cli::VoiceCommand;

pub async fn voice_task(client: &ApiClient, command: VoiceCommand) -> Result<()> {
    let audio = std::fs::read(&command.file)
        .with_context(|| format!("Failed to read audio file {}", command.file.display()))?;
    let file_name = command
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("recording.wav");

    if command.transcribe_only {
        let text = client.transcribe(&audio, file_name).await?;
        println!("{}", text);
        return Ok(());
    }

    if command.parse_only {
        let text = client.transcribe(&audio, file_name).await?;
        let draft = client.parse_transcript(&text).await?;
        println!("Transcript: {}", text);
        println!("Title:      {}", draft.title.bold());
        if let Some(description) = &draft.description {
            println!("Details:    {}", description);
        }
        if let Some(deadline) = draft.deadline {
            println!("Deadline:   {}", deadline.format("%Y-%m-%d %H:%M"));
        }
        if let Some(priority) = draft.priority {
            println!("Priority:   {}", priority);
        }
        if let Some(category) = &draft.category {
            println!("Category:   {}", category);
        }
        return Ok(());
    }

    let task = client.create_task_from_audio(&audio, file_name).await?;
    println!(
        "{} Created task from audio: {} ({})",
        "✓".green().bold(),
        task.title.bold(),
        task.id.to_string().yellow()
    );
    Ok(())
}
