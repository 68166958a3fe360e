//! Creates one throwaway issue to check that a token and repository work.

use anyhow::{bail, Context};
use pdd_action::core::issue::new_issue;
use pdd_action::domain::ports::IssueTracker;
use pdd_action::{GitHubClient, RepoSlug, TodoComment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let token = match std::env::var("GITHUB_TOKEN") {
        Ok(token) if !token.is_empty() => token,
        _ => bail!("GITHUB_TOKEN environment variable is required"),
    };
    let repo: RepoSlug = std::env::var("GITHUB_REPOSITORY")
        .context("GITHUB_REPOSITORY environment variable is required")?
        .parse()?;
    let api_url = std::env::var("GITHUB_API_URL")
        .unwrap_or_else(|_| pdd_action::adapters::github::DEFAULT_API_URL.to_string());

    let client = GitHubClient::new(&token, repo, &api_url)?;

    let mut comment = TodoComment::new("fixtures/todo_comments.go", 10, "Test issue creation");
    comment.description = vec![
        "This is a test description".to_string(),
        "For checking if issue creation works".to_string(),
    ];
    comment.labels = vec!["test".to_string(), "pdd".to_string()];

    let issue = new_issue(&comment, Some("[TEST PDD]"));
    let created = client
        .create_issue(&issue)
        .await
        .with_context(|| format!("creating issue in {}", client.repo()))?;

    println!("Created issue #{}: {}", created.number, created.html_url);
    Ok(())
}
