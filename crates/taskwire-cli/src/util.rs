use anyhow::Result;
use uuid::Uuid;

use taskwire_core::models::EditScope;

pub fn parse_task_id(raw: &str) -> Result<Uuid> {
    raw.parse::<Uuid>()
        .map_err(|_| anyhow::anyhow!("'{}' is not a valid task ID", raw))
}

pub fn parse_scope(raw: &str) -> Result<EditScope> {
    raw.parse::<EditScope>().map_err(|e| anyhow::anyhow!(e))
}

/// Shortened ID for table display.
pub fn short_id(id: &Uuid) -> String {
    id.to_string()[..8].to_string()
}
