use anyhow::Result;
use dialoguer::Password;
use owo_colors::OwoColorize;

use taskwire_core::api::ApiClient;

use crate::cli::LoginCommand;

pub async fn login(client: &ApiClient, command: LoginCommand) -> Result<()> {
    let password = match command.password {
        Some(password) => password,
        None => Password::new().with_prompt("Password").interact()?,
    };

    client.login(&command.email, &password).await?;
    println!("{} Logged in as {}", "✓".green().bold(), command.email.bold());
    Ok(())
}

pub async fn logout(client: &ApiClient) -> Result<()> {
    client.logout().await?;
    println!("{} Logged out", "✓".green().bold());
    Ok(())
}
