//! services/tracker/src/cli/commands.rs
//!
//! Command handlers. Each handler validates its input, calls one store
//! operation and renders the result as text or JSON.

use chrono::Utc;
use doc_tracker_core::domain::{
    DocumentUpdate, NewDocument, NewVersion, ProfileUpdate, SessionUser,
};
use doc_tracker_core::queries::{self, DocumentFilter, RECENT_DOCUMENTS_LIMIT};
use doc_tracker_core::versioning::{self, VersionBump};
use serde::Serialize;
use serde_json::json;
use std::io::Write;
use tracing::info;
use uuid::Uuid;

use crate::cli::args::{AddVersionArgs, Command, CreateArgs, EditArgs, RegisterArgs};
use crate::cli::render;
use crate::cli::state::AppState;
use crate::error::AppError;
use crate::validation::{self, RegistrationForm};

/// Where and how command output is written.
pub struct Output<'a> {
    pub writer: &'a mut dyn Write,
    pub json: bool,
}

impl Output<'_> {
    fn emit<T: Serialize + ?Sized>(&mut self, value: &T, text: impl FnOnce() -> String) -> Result<(), AppError> {
        if self.json {
            serde_json::to_writer_pretty(&mut *self.writer, value)?;
            writeln!(self.writer)?;
        } else {
            write!(self.writer, "{}", text())?;
        }
        Ok(())
    }
}

/// Dispatches one parsed command against the application state.
pub async fn run(command: Command, state: &mut AppState, out: &mut Output<'_>) -> Result<(), AppError> {
    match command {
        Command::Register(args) => register(args, state, out).await,
        Command::Login { email, password } => login(&email, &password, state, out).await,
        Command::Logout => {
            state.sessions.logout().await;
            out.emit(&json!({ "loggedOut": true }), || "Logged out.\n".to_string())
        }
        Command::Whoami => match state.sessions.current_user().await? {
            Some(user) => out.emit(&user, || render::user(&user)),
            None => out.emit(&json!(null), || "Not logged in.\n".to_string()),
        },
        Command::Profile {
            institution,
            degree,
            field,
        } => {
            let update = ProfileUpdate {
                institution,
                degree,
                field,
            };
            // With no fields given this is a read of the current profile.
            let user = if update.is_empty() {
                require_login(state).await?
            } else {
                state.sessions.update_profile(update).await?
            };
            out.emit(&user, || render::user(&user))
        }
        Command::Dashboard => {
            require_login(state).await?;
            let docs = state.documents.documents();
            let stats = queries::dashboard_stats(docs, Utc::now());
            let recent = queries::recent_documents(docs, RECENT_DOCUMENTS_LIMIT);
            out.emit(
                &json!({ "stats": stats, "recent": recent }),
                || render::dashboard(&stats, &recent),
            )
        }
        Command::List {
            search,
            status,
            category,
        } => {
            require_login(state).await?;
            let filter = DocumentFilter {
                search,
                status: status.into_status(),
                category,
            };
            let docs = state.documents.documents();
            let hits = queries::filter_documents(docs, &filter);
            out.emit(&hits, || {
                let mut text = render::document_list(&hits, filter.is_active());
                if hits.is_empty() && filter.category.is_some() {
                    text.push_str(&format!("Categories in use: {}\n", queries::categories(docs).join(", ")));
                }
                text
            })
        }
        Command::Show { id } => {
            require_login(state).await?;
            let doc = state
                .documents
                .get_document_by_id(id)
                .ok_or(AppError::DocumentNotFound(id))?;
            out.emit(doc, || render::document_detail(doc))
        }
        Command::Create(args) => create(args, state, out).await,
        Command::Edit(args) => edit(args, state, out).await,
        Command::Delete { id, yes } => delete(id, yes, state, out).await,
        Command::AddVersion(args) => add_version(args, state, out).await,
        Command::SuggestVersion { id } => {
            require_login(state).await?;
            let doc = state
                .documents
                .get_document_by_id(id)
                .ok_or(AppError::DocumentNotFound(id))?;
            let suggestions: Vec<(String, Option<String>)> = VersionBump::ALL
                .iter()
                .map(|bump| (bump.to_string(), versioning::suggest_next(&doc.current_version, *bump)))
                .collect();
            let text = || {
                let mut text = format!("Current version: {}\n", doc.current_version);
                for (bump, next) in &suggestions {
                    let next = next.as_deref().unwrap_or("(no suggestion for this version)");
                    text.push_str(&format!("  {bump:<6} {next}\n"));
                }
                text
            };
            out.emit(&suggestions, text)
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

async fn require_login(state: &mut AppState) -> Result<SessionUser, AppError> {
    state
        .sessions
        .current_user()
        .await?
        .ok_or(AppError::LoginRequired)
}

async fn register(args: RegisterArgs, state: &mut AppState, out: &mut Output<'_>) -> Result<(), AppError> {
    let registration = RegistrationForm {
        name: args.name,
        email: args.email,
        password: args.password,
        confirm_password: args.confirm_password,
        institution: args.institution,
        degree: args.degree,
        field: args.field,
    }
    .validate()?;

    let user = state.sessions.register(registration).await?;
    out.emit(&user, || format!("Welcome, {}!\n{}", user.name, render::user(&user)))
}

async fn login(email: &str, password: &str, state: &mut AppState, out: &mut Output<'_>) -> Result<(), AppError> {
    validation::validate_login(email, password)?;
    let user = state.sessions.login(email, password).await?;
    out.emit(&user, || format!("Logged in as {} <{}>.\n", user.name, user.email))
}

async fn create(args: CreateArgs, state: &mut AppState, out: &mut Output<'_>) -> Result<(), AppError> {
    let user = require_login(state).await?;
    let data = NewDocument {
        title: args.title,
        description: args.description,
        category: args.category,
        tags: validation::parse_tags(&args.tags),
        author: Some(args.author.unwrap_or(user.name)),
    };
    validation::validate_new_document(&data)?;

    let doc = state.documents.add_document(data).await?;
    out.emit(&doc, || format!("Created {}\n", render::document_row(&doc)))
}

async fn edit(args: EditArgs, state: &mut AppState, out: &mut Output<'_>) -> Result<(), AppError> {
    require_login(state).await?;
    if let Some(title) = &args.title {
        if title.trim().is_empty() {
            return Err(validation::ValidationError::Required("title").into());
        }
    }
    let updates = DocumentUpdate {
        title: args.title,
        description: args.description,
        category: args.category,
        tags: args.tags.as_deref().map(validation::parse_tags),
        status: args.status.map(Into::into),
    };
    if updates.is_empty() {
        let doc = state
            .documents
            .get_document_by_id(args.id)
            .ok_or(AppError::DocumentNotFound(args.id))?;
        return out.emit(doc, || format!("Nothing to change for {}\n", render::document_row(doc)));
    }

    let doc = state
        .documents
        .update_document(args.id, updates)
        .await?
        .ok_or(AppError::DocumentNotFound(args.id))?;
    out.emit(&doc, || format!("Updated {}\n", render::document_row(&doc)))
}

async fn delete(id: Uuid, confirmed: bool, state: &mut AppState, out: &mut Output<'_>) -> Result<(), AppError> {
    require_login(state).await?;
    let title = state
        .documents
        .get_document_by_id(id)
        .map(|d| d.title.clone())
        .ok_or(AppError::DocumentNotFound(id))?;

    if !confirmed {
        return out.emit(&json!({ "deleted": false, "id": id }), || {
            format!("Not deleted. Re-run with --yes to delete \"{title}\" and its whole history.\n")
        });
    }

    state.documents.delete_document(id).await?;
    info!("Document {} deleted from the command line", id);
    out.emit(&json!({ "deleted": true, "id": id }), || format!("Deleted \"{title}\".\n"))
}

async fn add_version(args: AddVersionArgs, state: &mut AppState, out: &mut Output<'_>) -> Result<(), AppError> {
    let user = require_login(state).await?;
    let current = state
        .documents
        .get_document_by_id(args.id)
        .map(|d| d.current_version.clone())
        .ok_or(AppError::DocumentNotFound(args.id))?;

    let version = match (args.version_number, args.bump) {
        (Some(version), _) => version,
        (None, Some(bump)) => {
            let bump = VersionBump::from(bump);
            versioning::suggest_next(&current, bump).ok_or_else(|| {
                validation::ValidationError::Malformed {
                    what: "current version",
                    input: current.clone(),
                    expected: "major.minor.patch with room to bump",
                }
            })?
        }
        (None, None) => String::new(),
    };

    let now = Utc::now();
    let prompts = args
        .prompts
        .iter()
        .map(|p| validation::parse_prompt(p, now))
        .collect::<Result<Vec<_>, _>>()?;
    let related_documents = args
        .related
        .iter()
        .map(|r| validation::parse_related_document(r))
        .collect::<Result<Vec<_>, _>>()?;
    let attached_files = args
        .files
        .iter()
        .map(|f| validation::parse_attached_file(f, now))
        .collect::<Result<Vec<_>, _>>()?;

    let data = NewVersion {
        version,
        description: args.description,
        changes: args.changes,
        author: Some(args.author.unwrap_or(user.name)),
        file_location: args.file_location,
        file_name: args.file_name,
        prompts,
        related_documents,
        attached_files,
    };
    validation::validate_new_version(&data)?;

    let doc = state
        .documents
        .add_version(args.id, data)
        .await?
        .ok_or(AppError::DocumentNotFound(args.id))?;
    out.emit(&doc, || {
        format!("Added version {} (previously {})\n", doc.current_version, current)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStorage;
    use crate::cli::args::Cli;
    use crate::config::Config;
    use crate::stores::StoreError;
    use assert_matches::assert_matches;
    use clap::Parser;
    use doc_tracker_core::domain::VersionStatus;
    use doc_tracker_core::ports::StorageService;
    use std::sync::Arc;
    use std::time::Duration;

    async fn state(storage: Arc<MemoryStorage>) -> AppState {
        let config = Config {
            simulated_latency: Duration::ZERO,
            ..Config::default()
        };
        AppState::init(Arc::new(config), storage).await.unwrap()
    }

    async fn exec(state: &mut AppState, argv: &[&str]) -> Result<String, AppError> {
        let cli = Cli::try_parse_from(std::iter::once("tracker").chain(argv.iter().copied()))
            .expect("valid command line");
        let mut buffer = Vec::new();
        let mut out = Output {
            writer: &mut buffer,
            json: cli.json,
        };
        run(cli.command, state, &mut out).await?;
        Ok(String::from_utf8(buffer).expect("utf-8 output"))
    }

    async fn registered(storage: Arc<MemoryStorage>) -> AppState {
        let mut state = state(storage).await;
        exec(
            &mut state,
            &[
                "register", "--name", "Ana Torres", "--email", "ana@uni.edu", "--password",
                "secret1", "--confirm", "secret1", "--institution", "UNAM",
            ],
        )
        .await
        .unwrap();
        state
    }

    #[tokio::test]
    async fn document_commands_require_login() {
        let mut state = state(Arc::new(MemoryStorage::new())).await;
        assert_matches!(exec(&mut state, &["dashboard"]).await, Err(AppError::LoginRequired));
        assert_matches!(exec(&mut state, &["list"]).await, Err(AppError::LoginRequired));
        let output = exec(&mut state, &["whoami"]).await.unwrap();
        assert_eq!(output, "Not logged in.\n");
    }

    #[tokio::test]
    async fn register_rejects_invalid_form_before_the_store() {
        let storage = Arc::new(MemoryStorage::new());
        let mut state = state(storage.clone()).await;
        let result = exec(
            &mut state,
            &["register", "--name", "Ana", "--email", "ana@uni.edu", "--password", "abc", "--confirm", "abc"],
        )
        .await;
        assert_matches!(result, Err(AppError::Validation(_)));
        assert!(storage.load_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn full_document_lifecycle() {
        let storage = Arc::new(MemoryStorage::new());
        let mut state = registered(storage.clone()).await;

        // The seeded example is there on first run.
        let listing = exec(&mut state, &["list"]).await.unwrap();
        assert!(listing.contains("Doctoral Thesis Proposal"));

        let created = exec(
            &mut state,
            &["--json", "create", "--title", "T", "--category", "thesis", "--tags", "ai, ml"],
        )
        .await
        .unwrap();
        let doc: serde_json::Value = serde_json::from_str(&created).unwrap();
        assert_eq!(doc["currentVersion"], "1.0.0");
        assert_eq!(doc["versions"][0]["author"], "Ana Torres");
        let id = doc["id"].as_str().unwrap().to_string();

        exec(
            &mut state,
            &[
                "add-version", &id, "--bump", "minor", "--description", "d", "--changes", "c",
                "--prompt", "Outline|Claude|Draft an outline", "--related", "Notes=/n.pdf",
            ],
        )
        .await
        .unwrap();

        let doc = state.documents.get_document_by_id(id.parse().unwrap()).unwrap();
        assert_eq!(doc.current_version, "1.1.0");
        assert_eq!(doc.versions.len(), 2);
        assert_eq!(doc.versions[0].status, VersionStatus::Archived);
        assert_eq!(doc.versions[1].prompts[0].ai_used, "Claude");
        assert_eq!(doc.tags, vec!["ai".to_string(), "ml".to_string()]);

        let detail = exec(&mut state, &["show", &id]).await.unwrap();
        let newest = detail.find("v1.1.0 (current)").unwrap();
        let oldest = detail.find("v1.0.0").unwrap();
        assert!(newest < oldest);

        exec(&mut state, &["edit", &id, "--status", "approved"]).await.unwrap();
        let approved = exec(&mut state, &["list", "--status", "approved"]).await.unwrap();
        assert!(approved.contains(&id));

        let kept = exec(&mut state, &["delete", &id]).await.unwrap();
        assert!(kept.contains("--yes"));
        assert!(state.documents.get_document_by_id(id.parse().unwrap()).is_some());

        exec(&mut state, &["delete", &id, "--yes"]).await.unwrap();
        assert_matches!(
            exec(&mut state, &["show", &id]).await,
            Err(AppError::DocumentNotFound(_))
        );
        assert_eq!(storage.load_documents().await.unwrap().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn suggestions_follow_the_current_version() {
        let storage = Arc::new(MemoryStorage::new());
        let mut state = registered(storage).await;
        let id = state.documents.documents()[0].id.to_string();

        let output = exec(&mut state, &["suggest-version", &id]).await.unwrap();
        assert!(output.contains("Current version: 2.0.0"));
        assert!(output.contains("2.0.1"));
        assert!(output.contains("2.1.0"));
        assert!(output.contains("3.0.0"));
    }

    #[tokio::test]
    async fn explicit_version_strings_are_not_checked() {
        let storage = Arc::new(MemoryStorage::new());
        let mut state = registered(storage).await;
        let id = state.documents.documents()[0].id.to_string();

        exec(
            &mut state,
            &["add-version", &id, "--version", "0.1-draft", "--description", "d", "--changes", "c"],
        )
        .await
        .unwrap();
        assert_eq!(state.documents.documents()[0].current_version, "0.1-draft");

        // A bump needs a parseable current version.
        let result = exec(
            &mut state,
            &["add-version", &id, "--bump", "patch", "--description", "d", "--changes", "c"],
        )
        .await;
        assert_matches!(result, Err(AppError::Validation(_)));
    }

    #[tokio::test]
    async fn maxed_out_version_gets_no_suggestion() {
        let storage = Arc::new(MemoryStorage::new());
        let mut state = registered(storage).await;
        let id = state.documents.documents()[0].id.to_string();
        let maxed = format!("1.0.{}", u64::MAX);

        exec(
            &mut state,
            &["add-version", &id, "--version", &maxed, "--description", "d", "--changes", "c"],
        )
        .await
        .unwrap();

        let output = exec(&mut state, &["suggest-version", &id]).await.unwrap();
        assert!(output.contains("patch  (no suggestion for this version)"));
        assert!(output.contains("1.1.0"));
        let result = exec(
            &mut state,
            &["add-version", &id, "--bump", "patch", "--description", "d", "--changes", "c"],
        )
        .await;
        assert_matches!(result, Err(AppError::Validation(_)));
        assert_eq!(state.documents.documents()[0].current_version, maxed);
    }

    #[tokio::test]
    async fn login_logout_and_profile() {
        let storage = Arc::new(MemoryStorage::new());
        let mut state = registered(storage.clone()).await;

        exec(&mut state, &["logout"]).await.unwrap();
        assert_matches!(
            exec(&mut state, &["login", "--email", "ana@uni.edu", "--password", "nope"]).await,
            Err(AppError::Store(StoreError::InvalidCredentials))
        );
        exec(&mut state, &["login", "--email", "ana@uni.edu", "--password", "secret1"])
            .await
            .unwrap();

        let profile = exec(&mut state, &["profile", "--field", "Education"]).await.unwrap();
        assert!(profile.contains("Field: Education"));
        assert!(profile.contains("Institution: UNAM"));
        assert_eq!(storage.load_users().await.unwrap()[0].profile.field, "Education");
    }

    #[tokio::test]
    async fn commands_without_changes_do_not_write() {
        let storage = Arc::new(MemoryStorage::new());
        let mut state = registered(storage.clone()).await;
        let doc = state.documents.documents()[0].clone();
        storage.set_fail_writes(true);

        let profile = exec(&mut state, &["profile"]).await.unwrap();
        assert!(profile.contains("Institution: UNAM"));

        let output = exec(&mut state, &["edit", &doc.id.to_string()]).await.unwrap();
        assert!(output.starts_with("Nothing to change"));
        assert_eq!(state.documents.documents()[0].updated_at, doc.updated_at);
    }

    #[tokio::test]
    async fn dashboard_json_reports_counts() {
        let storage = Arc::new(MemoryStorage::new());
        let mut state = registered(storage).await;
        let output = exec(&mut state, &["dashboard", "--json"]).await.unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["stats"]["totalDocuments"], 1);
        assert_eq!(value["stats"]["totalVersions"], 3);
        assert_eq!(value["recent"].as_array().map(Vec::len), Some(1));
    }
}
