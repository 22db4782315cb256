//! services/tracker/src/cli/args.rs
//!
//! Command-line surface of the `tracker` binary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use doc_tracker_core::domain::DocumentStatus;
use doc_tracker_core::versioning::VersionBump;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(
    name = "tracker",
    version,
    about = "Track academic documents, their versions and the AI prompts behind them"
)]
pub struct Cli {
    /// Data directory (overrides TRACKER_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account and log in
    Register(RegisterArgs),
    /// Log in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// End the current session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Update the academic profile of the logged-in user
    Profile {
        #[arg(long)]
        institution: Option<String>,
        #[arg(long)]
        degree: Option<String>,
        #[arg(long)]
        field: Option<String>,
    },
    /// Summary counts and recently updated documents
    Dashboard,
    /// List documents, optionally filtered
    List {
        /// Case-insensitive match on title or description
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value_t = StatusFilter::All)]
        status: StatusFilter,
        #[arg(long)]
        category: Option<String>,
    },
    /// Show a document and its version history
    Show { id: Uuid },
    /// Create a new document
    Create(CreateArgs),
    /// Edit document fields
    Edit(EditArgs),
    /// Delete a document
    Delete {
        id: Uuid,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Add a new current version to a document
    AddVersion(AddVersionArgs),
    /// Suggest the next patch, minor and major versions for a document
    SuggestVersion { id: Uuid },
}

#[derive(Args, Debug)]
pub struct RegisterArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub password: String,
    /// Repeat the password
    #[arg(long = "confirm")]
    pub confirm_password: String,
    #[arg(long, default_value = "")]
    pub institution: String,
    /// e.g. licenciatura, maestria, doctorado, postdoctorado
    #[arg(long, default_value = "")]
    pub degree: String,
    #[arg(long, default_value = "")]
    pub field: String,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub title: String,
    #[arg(long, default_value = "")]
    pub description: String,
    /// thesis, paper, proposal, report, other, or any label
    #[arg(long, default_value = "thesis")]
    pub category: String,
    /// Comma-separated tags
    #[arg(long, default_value = "")]
    pub tags: String,
    /// Author of the initial version (defaults to the logged-in user)
    #[arg(long)]
    pub author: Option<String>,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    pub id: Uuid,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    /// Comma-separated tags; replaces the existing list
    #[arg(long)]
    pub tags: Option<String>,
    #[arg(long, value_enum)]
    pub status: Option<StatusArg>,
}

#[derive(Args, Debug)]
pub struct AddVersionArgs {
    pub id: Uuid,
    /// Explicit version string; any text is accepted
    #[arg(long = "version", conflicts_with = "bump", required_unless_present = "bump")]
    pub version_number: Option<String>,
    /// Derive the version from the current one
    #[arg(long, value_enum)]
    pub bump: Option<BumpArg>,
    #[arg(long)]
    pub description: String,
    #[arg(long)]
    pub changes: String,
    /// Defaults to the logged-in user
    #[arg(long)]
    pub author: Option<String>,
    #[arg(long, default_value = "")]
    pub file_location: String,
    #[arg(long, default_value = "")]
    pub file_name: String,
    /// AI prompt as name|ai|content[|notes]; repeatable
    #[arg(long = "prompt")]
    pub prompts: Vec<String>,
    /// Related document as name=url; repeatable
    #[arg(long = "related")]
    pub related: Vec<String>,
    /// Attached file descriptor as name|type|size[|description]; repeatable
    #[arg(long = "file")]
    pub files: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Draft,
    Review,
    Approved,
    Archived,
}

impl From<StatusArg> for DocumentStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Draft => DocumentStatus::Draft,
            StatusArg::Review => DocumentStatus::Review,
            StatusArg::Approved => DocumentStatus::Approved,
            StatusArg::Archived => DocumentStatus::Archived,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusFilter {
    All,
    Draft,
    Review,
    Approved,
    Archived,
}

impl StatusFilter {
    pub fn into_status(self) -> Option<DocumentStatus> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Draft => Some(DocumentStatus::Draft),
            StatusFilter::Review => Some(DocumentStatus::Review),
            StatusFilter::Approved => Some(DocumentStatus::Approved),
            StatusFilter::Archived => Some(DocumentStatus::Archived),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BumpArg {
    Patch,
    Minor,
    Major,
}

impl From<BumpArg> for VersionBump {
    fn from(value: BumpArg) -> Self {
        match value {
            BumpArg::Patch => VersionBump::Patch,
            BumpArg::Minor => VersionBump::Minor,
            BumpArg::Major => VersionBump::Major,
        }
    }
}
