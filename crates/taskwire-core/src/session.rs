use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::models::ThemeMode;

/// The client's authentication session: one access token plus the refresh
/// token that can replace it. At most one session exists per client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl Session {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
        }
    }
}

/// Durable client-local state: the two token strings under fixed keys, plus
/// the theme-mode preference.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<Session>, CoreError>;
    fn save(&self, session: &Session) -> Result<(), CoreError>;
    fn clear(&self) -> Result<(), CoreError>;

    fn load_theme(&self) -> Result<ThemeMode, CoreError>;
    fn save_theme(&self, theme: ThemeMode) -> Result<(), CoreError>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default)]
    theme: ThemeMode,
}

/// JSON state file in the platform data directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store at the default location (`<data-dir>/taskwire/state.json`).
    pub fn open_default() -> Result<Self, CoreError> {
        let base = dirs::data_dir().ok_or_else(|| {
            CoreError::InvalidInput("Could not resolve a platform data directory".to_string())
        })?;
        Self::open(base.join("taskwire").join("state.json"))
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<StateFile, CoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StateFile::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, state: &StateFile) -> Result<(), CoreError> {
        let raw = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<Session>, CoreError> {
        let state = self.read()?;
        Ok(state.access_token.map(|access_token| Session {
            access_token,
            refresh_token: state.refresh_token,
        }))
    }

    fn save(&self, session: &Session) -> Result<(), CoreError> {
        let mut state = self.read()?;
        state.access_token = Some(session.access_token.clone());
        state.refresh_token = session.refresh_token.clone();
        self.write(&state)
    }

    fn clear(&self) -> Result<(), CoreError> {
        let mut state = self.read()?;
        state.access_token = None;
        state.refresh_token = None;
        self.write(&state)
    }

    fn load_theme(&self) -> Result<ThemeMode, CoreError> {
        Ok(self.read()?.theme)
    }

    fn save_theme(&self, theme: ThemeMode) -> Result<(), CoreError> {
        let mut state = self.read()?;
        state.theme = theme;
        self.write(&state)
    }
}

/// In-memory store for tests and ephemeral use.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    state: std::sync::Mutex<(Option<Session>, ThemeMode)>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            state: std::sync::Mutex::new((Some(session), ThemeMode::default())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>, CoreError> {
        Ok(self.state.lock().expect("session store poisoned").0.clone())
    }

    fn save(&self, session: &Session) -> Result<(), CoreError> {
        self.state.lock().expect("session store poisoned").0 = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), CoreError> {
        self.state.lock().expect("session store poisoned").0 = None;
        Ok(())
    }

    fn load_theme(&self) -> Result<ThemeMode, CoreError> {
        Ok(self.state.lock().expect("session store poisoned").1)
    }

    fn save_theme(&self, theme: ThemeMode) -> Result<(), CoreError> {
        self.state.lock().expect("session store poisoned").1 = theme;
        Ok(())
    }
}
