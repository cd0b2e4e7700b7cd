//! # Taskwire Core Library
//!
//! Client-side core for the Taskwire task manager: session/token lifecycle,
//! recurring-task series with scoped edits, and the REST API client the CLI
//! is built on.
//!
//! ## Features
//!
//! - **Coalesced token refresh**: any number of requests failing with 401 at
//!   once share a single refresh call; each suspended request retries once
//!   with the new token or fails together with the episode
//! - **Recurring series**: bounded, lazy expansion of recurrence rules with
//!   end-of-month clamping, plus `this`/`following`/`all` scoped edit and
//!   delete semantics
//! - **Durable client state**: tokens and the theme preference in a small
//!   JSON state file, behind a store trait for testability
//! - **Envelope-aware transport**: one request path handling the API's
//!   response envelope, bearer attachment, and retry-once-on-401
//!
//! ## Core Modules
//!
//! - [`models`]: task, rule, scope, and session data structures
//! - [`recurrence`]: expansion and scoped series mutation
//! - [`session`]: persisted client state slot
//! - [`auth`]: the session lifecycle state machine
//! - [`api`]: the REST client
//! - [`error`]: error taxonomy
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use taskwire_core::api::ApiClient;
//! use taskwire_core::auth::SessionManager;
//! use taskwire_core::models::NewTaskData;
//! use taskwire_core::session::FileSessionStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = FileSessionStore::open_default()?;
//!     let manager = Arc::new(SessionManager::new(Box::new(store))?);
//!     let client = ApiClient::new("https://tasks.example.com/api", manager)?;
//!
//!     client.login("me@example.com", "hunter2").await?;
//!
//!     let task = client
//!         .create_task(&NewTaskData {
//!             title: "Water the plants".to_string(),
//!             rrule: Some("FREQ=WEEKLY".to_string()),
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("Created task: {}", task.title);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod error;
pub mod models;
pub mod recurrence;
pub mod session;
