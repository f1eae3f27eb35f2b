//! Basic example demonstrating the GitHub Actions variables client.
//!
//! Run with:
//! ```
//! GITHUB_TOKEN=your-token cargo run --example basic -- owner/repo
//! ```

use ghvars::{CreateVariable, GitHubClient, RepositoryRef, UpdateVariable};

#[tokio::main]
async fn main() -> ghvars::Result<()> {
    // Initialize tracing for debugging (optional)
    tracing_subscriber::fmt::init();

    let repo: RepositoryRef = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "octocat/hello-world".to_string())
        .parse()?;

    println!("Creating GitHub client...");
    let client = GitHubClient::from_env()?;
    println!("Connected to: {}", client.base_url());

    // First page only
    println!("\n--- Listing variables of {repo} (first page) ---");
    let page = ghvars::list_actions_variables(&client, repo.clone()).await?;
    println!("Showing {} of {} variables", page.len(), page.total_count);
    if let Some(next) = client.last_response().and_then(|r| r.next) {
        println!("Next page: {next}");
    }

    // Every page
    println!("\n--- Listing variables of {repo} (all pages) ---");
    let all_pages = client.clone().with_auto_paginate(true);
    let all = ghvars::list_actions_variables(&all_pages, repo.clone()).await?;
    for variable in &all {
        println!("  {} = {}", variable.name, variable.value);
    }

    // Round trip a scratch variable
    println!("\n--- Creating, updating and deleting DEMO_VARIABLE ---");
    ghvars::create_actions_variable(
        &client,
        repo.clone(),
        CreateVariable::new("DEMO_VARIABLE", "first"),
    )
    .await?;

    ghvars::update_actions_variable(
        &client,
        repo.clone(),
        "DEMO_VARIABLE",
        UpdateVariable {
            value: Some("second".to_string()),
            ..Default::default()
        },
    )
    .await?;

    let variable = ghvars::get_actions_variable(&client, repo.clone(), "DEMO_VARIABLE").await?;
    println!("  {} = {}", variable.name, variable.value);

    let deleted = ghvars::delete_actions_variable(&client, repo, "DEMO_VARIABLE").await?;
    println!("  deleted: {deleted}");

    println!("\nDone!");
    Ok(())
}
