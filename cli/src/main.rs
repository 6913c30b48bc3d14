mod http;
mod store;


use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::{Parser, Subcommand};
use gallery::auth::{AuthError, LoginForm, RegisterForm};
use gallery::workspace::{Outcome, WorkspaceError};
use gallery::{ClientState, Session, StoreError, UploadFile};
use serde_json::{Value, json};

use crate::http::ReqwestApi;
use crate::store::FileStore;

type Shared = Rc<RefCell<ClientState<FileStore>>>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("no config directory found; pass --token-file or set IMAGELENS_TOKEN_FILE")]
    NoTokenFile,
    #[error("not logged in; run `imagelens-cli login` first")]
    NotLoggedIn,
    #[error("session expired; run `imagelens-cli login` again")]
    Reauth,
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Workspace(#[from] WorkspaceError),
    #[error("{0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    Request(String),
    #[error("failed to read {path}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "imagelens-cli", about = "Image upload and analysis client")]
struct Cli {
    #[arg(long, env = "IMAGELENS_API_URL", default_value = "http://127.0.0.1:5001")]
    base_url: String,

    #[arg(long, env = "IMAGELENS_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    /// Log request and session activity to stderr.
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Register {
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
    Login {
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Status,
    List,
    Upload {
        file: PathBuf,
    },
    /// Analyze the image at a position of `list`.
    Analyze {
        index: usize,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let token_file = match cli.token_file {
        Some(path) => path,
        None => FileStore::default_path().ok_or(CliError::NoTokenFile)?,
    };
    let store = FileStore::new(token_file);
    let state: Shared = Rc::new(RefCell::new(ClientState::new(Session::restored(store.clone()))));
    let api = ReqwestApi::new(cli.base_url);

    match cli.command {
        Command::Register {
            email,
            password,
            confirm,
        } => {
            let form = RegisterForm {
                email,
                password,
                confirm,
            };
            let next = gallery::auth::register(&api, &form).await?;
            print_json(&json!({ "registered": form.email.trim(), "next": next.path() }))
        }
        Command::Login { email, password } => {
            let form = LoginForm { email, password };
            gallery::auth::login(&api, &state, &form).await?;
            print_json(&json!({ "logged_in": form.email.trim(), "token_file": store.path().display().to_string() }))
        }
        Command::Logout => print_json(&logged_out(&state)?),
        Command::Status => {
            let authenticated = state.borrow().session.is_authenticated();
            print_json(&json!({ "authenticated": authenticated, "token_file": store.path().display().to_string() }))
        }
        Command::List => {
            enter(&state, &api).await?;
            print_records(&state)
        }
        Command::Upload { file } => {
            let file = read_upload(&file)?;
            enter(&state, &api).await?;
            state.borrow_mut().workspace.select_file(Some(file));
            let outcome = gallery::actions::upload(&state, &api).await?;
            settle(outcome, &state)?;
            print_records(&state)
        }
        Command::Analyze { index } => {
            enter(&state, &api).await?;
            let outcome = gallery::actions::analyze(&state, &api, index).await?;
            settle(outcome, &state)?;
            let detail = state.borrow().workspace.detail().cloned();
            match detail {
                Some(detail) => print_json(&json!({ "url": detail.url, "analysis": detail.analysis })),
                None => Err(CliError::Request("analysis result was dropped".to_owned())),
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Token check plus the first list, the same way the dashboard opens.
async fn enter(state: &Shared, api: &ReqwestApi) -> Result<(), CliError> {
    match gallery::actions::enter(state, api).await {
        Ok(outcome) => settle(outcome, state),
        Err(_) => Err(CliError::NotLoggedIn),
    }
}

/// Log out, failing when the token file could not be removed.
fn logged_out(state: &Shared) -> Result<Value, CliError> {
    let next = gallery::actions::logout(state)?;
    Ok(json!({ "logged_out": true, "next": next.path() }))
}

/// Turn a workflow outcome into success or the failure to report.
fn settle(outcome: Outcome, state: &Shared) -> Result<(), CliError> {
    match outcome {
        Outcome::Applied => Ok(()),
        Outcome::ReauthRequired => Err(CliError::Reauth),
        Outcome::Failed => {
            let message = state
                .borrow()
                .workspace
                .error()
                .unwrap_or("request failed")
                .to_owned();
            Err(CliError::Request(message))
        }
        Outcome::Stale | Outcome::Superseded => Err(CliError::Request("response was dropped".to_owned())),
    }
}

fn read_upload(path: &Path) -> Result<UploadFile, CliError> {
    let bytes = std::fs::read(path).map_err(|source| CliError::ReadFile {
        path: path.to_owned(),
        source,
    })?;
    let name = path
        .file_name()
        .map_or_else(|| "upload".to_owned(), |name| name.to_string_lossy().into_owned());
    Ok(UploadFile {
        name,
        content_type: content_type_for(path).map(str::to_owned),
        bytes,
    })
}

fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let content_type = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => return None,
    };
    Some(content_type)
}

fn print_records(state: &Shared) -> Result<(), CliError> {
    let records = serde_json::to_value(state.borrow().workspace.records())?;
    print_json(&json!({ "images": records }))
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
