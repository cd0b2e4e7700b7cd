use clap::{Parser, Subcommand};

/// Command-line client for the Taskwire task manager
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Log in and store the session
    Login(LoginCommand),
    /// Log out and clear the stored session
    Logout,
    /// Add a new task
    Add(AddCommand),
    /// List tasks
    List(ListCommand),
    /// Edit a task
    Edit(EditCommand),
    /// Delete a task
    Delete(DeleteCommand),
    /// Mark a task as completed
    Do(DoCommand),
    /// Inspect recurring task series
    Recur(RecurCommand),
    /// Create tasks from recorded audio
    Voice(VoiceCommand),
    /// Show or change the theme preference
    Theme(ThemeCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct LoginCommand {
    /// Account email address
    pub email: String,
    /// Password (prompted interactively when omitted)
    #[clap(long)]
    pub password: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The title of the task
    pub title: String,
    /// The description of the task
    #[clap(short, long)]
    pub description: Option<String>,
    /// The deadline (natural language, e.g. 'tomorrow 5pm')
    #[clap(short = 'u', long)]
    pub due: Option<String>,
    /// The priority of the task (low|medium|high|urgent)
    #[clap(long)]
    pub priority: Option<String>,
    /// The category of the task
    #[clap(short, long)]
    pub category: Option<String>,
    /// Estimated time required, in minutes
    #[clap(long)]
    pub time: Option<u32>,
    /// Recurrence frequency (daily|weekly|monthly|yearly)
    #[clap(long, conflicts_with = "rrule")]
    pub every: Option<String>,
    /// End date for the recurrence (natural language)
    #[clap(long, requires = "every")]
    pub until: Option<String>,
    /// Raw recurrence rule (e.g. 'FREQ=WEEKLY;UNTIL=20261231T000000Z')
    #[clap(long)]
    pub rrule: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ListCommand {
    /// Filter by status (pending|completed)
    #[clap(long)]
    pub status: Option<String>,
    /// Filter by category
    #[clap(short, long)]
    pub category: Option<String>,
    /// Include archived tasks
    #[clap(long)]
    pub archived: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID of the task to edit
    pub id: String,

    #[arg(long)]
    pub title: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
    #[arg(long, conflicts_with = "description")]
    pub description_clear: bool,

    /// New deadline (natural language)
    #[arg(long)]
    pub due: Option<String>,
    #[arg(long, conflicts_with = "due")]
    pub due_clear: bool,

    /// New priority (low|medium|high|urgent)
    #[arg(long)]
    pub priority: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    /// Archive or unarchive the task
    #[arg(long)]
    pub archived: Option<bool>,

    /// Estimated time required, in minutes (0 clears)
    #[arg(long)]
    pub time: Option<u32>,

    /// Append a comment
    #[arg(long)]
    pub comment: Option<String>,

    /// New recurrence rule (scope 'all' only)
    #[arg(long)]
    pub rrule: Option<String>,
    /// Remove the recurrence (convert to one-time task)
    #[arg(long, conflicts_with = "rrule")]
    pub rrule_clear: bool,

    /// How to apply changes to a recurring task (this|following|all)
    #[arg(long)]
    pub scope: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID of the task to delete
    pub id: String,
    /// Scope for recurring tasks (this|following|all)
    #[clap(long)]
    pub scope: Option<String>,
    /// Force deletion without confirmation
    #[clap(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct DoCommand {
    /// The ID of the task to mark as completed
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct RecurCommand {
    #[command(subcommand)]
    pub command: RecurSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum RecurSubcommand {
    /// Preview upcoming occurrences computed from the series rule
    Preview(RecurPreviewCommand),
    /// List the materialized occurrences of a series
    Instances(RecurInstancesCommand),
}

#[derive(Parser, Debug, Clone)]
pub struct RecurPreviewCommand {
    /// Series root task ID
    pub id: String,
    /// Number of occurrences to show (defaults to the configured horizon)
    #[clap(long, short)]
    pub count: Option<usize>,
}

#[derive(Parser, Debug, Clone)]
pub struct RecurInstancesCommand {
    /// Series root task ID
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct VoiceCommand {
    /// Path to the recorded audio file
    pub file: std::path::PathBuf,
    /// Only transcribe; do not create a task
    #[clap(long)]
    pub transcribe_only: bool,
    /// Show the parsed draft instead of creating the task
    #[clap(long, conflicts_with = "transcribe_only")]
    pub parse_only: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct ThemeCommand {
    /// New theme mode (light|dark|system); prints the current one if omitted
    pub mode: Option<String>,
}
