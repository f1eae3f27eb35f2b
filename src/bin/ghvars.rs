//! GitHub Actions variables CLI binary.
//!
//! A command-line interface for managing repository and environment variables.

use clap::Parser;
use ghvars::cli::{Cli, Command, Target};
use ghvars::output::PrettyPrint;
use ghvars::{
    Create, CreateVariable, Delete, Get, GitHubClient, List, PaginationMode, Update,
    UpdateVariable, Variable, VariableId,
};
use serde::Serialize;
use std::process::ExitCode;
use tracing::Level;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let client = match GitHubClient::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Hint: Set GITHUB_TOKEN environment variable");
            return ExitCode::FAILURE;
        }
    };

    match run(client, cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(client: GitHubClient, cli: Cli) -> ghvars::Result<()> {
    match cli.command {
        Command::List {
            target,
            per_page,
            all,
        } => handle_list(client, &target, per_page, all, cli.json).await,
        Command::Get { target, name } => handle_get(&client, &target, name, cli.json).await,
        Command::Create {
            target,
            name,
            value,
        } => {
            let scope = target.scope()?;
            Variable::create(&client, &scope, CreateVariable::new(name.as_str(), value)).await?;
            report(&client, &format!("Created {name} in {scope}"), cli.json)
        }
        Command::Update {
            target,
            name,
            value,
            rename,
        } => {
            if value.is_none() && rename.is_none() {
                return Err(ghvars::GitHubError::Validation {
                    message: "nothing to update: pass --value and/or --rename".to_string(),
                });
            }
            let id = VariableId::new(target.scope()?, name.as_str());
            let params = UpdateVariable {
                name: rename,
                value,
            };
            Variable::update(&client, id.clone(), params).await?;
            report(&client, &format!("Updated {name} in {}", id.scope), cli.json)
        }
        Command::Delete { target, name } => {
            let id = VariableId::new(target.scope()?, name.as_str());
            let deleted = Variable::delete(&client, id.clone()).await?;
            if deleted {
                report(&client, &format!("Deleted {name} from {}", id.scope), cli.json)
            } else {
                Err(ghvars::GitHubError::ApiError {
                    message: format!("unexpected response deleting {name}"),
                    status_code: client.last_response().map(|r| r.status),
                })
            }
        }
    }
}

async fn handle_list(
    client: GitHubClient,
    target: &Target,
    per_page: Option<u32>,
    all: bool,
    json: bool,
) -> ghvars::Result<()> {
    let client = match per_page {
        Some(n) => client.with_per_page(n),
        None => client,
    };
    let mode = if all {
        PaginationMode::All
    } else {
        client.pagination_mode()
    };

    let list = Variable::list_with_mode(&client, &target.scope()?, mode).await?;
    output(&list, json)
}

async fn handle_get(
    client: &GitHubClient,
    target: &Target,
    name: String,
    json: bool,
) -> ghvars::Result<()> {
    let variable = Variable::get(client, VariableId::new(target.scope()?, name)).await?;
    output(&variable, json)
}

fn output<T: Serialize + PrettyPrint>(item: &T, json: bool) -> ghvars::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(item)?);
    } else {
        println!("{}", item.pretty_print());
    }
    Ok(())
}

#[derive(Serialize)]
struct StatusReport<'a> {
    status: Option<u16>,
    message: &'a str,
}

fn report(client: &GitHubClient, message: &str, json: bool) -> ghvars::Result<()> {
    let status = client.last_response().map(|r| r.status);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&StatusReport { status, message })?
        );
    } else {
        println!("{message}");
    }
    Ok(())
}
