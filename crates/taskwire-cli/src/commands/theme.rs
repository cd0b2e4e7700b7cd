use anyhow::Result;

use taskwire_core::models::ThemeMode;
use taskwire_core::session::SessionStore;

use crate::cli::ThemeCommand;

pub fn theme(store: &dyn SessionStore, command: ThemeCommand) -> Result<()> {
    match command.mode {
        Some(raw) => {
            let mode = raw.parse::<ThemeMode>().map_err(|e| anyhow::anyhow!(e))?;
            store.save_theme(mode)?;
            println!("Theme set to {}", mode);
        }
        None => {
            println!("{}", store.load_theme()?);
        }
    }
    Ok(())
}
