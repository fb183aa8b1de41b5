use std::fs;
use std::path::Path;

use anyhow::Result;
use clap::Parser;
use practices::branch::{construct_branch, validate_branch};
use practices::config::validator;
use practices::config::{
    init_document, BranchingStrategy, ConfigLoader, FieldOrigin, InitOptions, ProjectType,
};
use practices::version::{bump_version, check_versions, BumpOptions, VersionPart};
use practices::Cli;
use tempfile::TempDir;

const CARGO_TOML: &str = "[package]\nname = \"demo\"\nversion = \"0.4.2\"\nedition = \"2021\"\n\n[dependencies]\nserde = { version = \"1.0\" }\n";

/// A Rust project with a manifest, a changelog, and no configuration yet.
fn rust_project() -> Result<TempDir> {
    let dir = TempDir::new()?;
    fs::create_dir_all(dir.path().join("src"))?;
    fs::write(dir.path().join("Cargo.toml"), CARGO_TOML)?;
    fs::write(dir.path().join("src/main.rs"), "fn main() {}\n")?;
    fs::write(dir.path().join("CHANGELOG.md"), "# Changelog\n")?;
    Ok(dir)
}

fn loader(root: &Path) -> ConfigLoader {
    ConfigLoader::new(root)
        .without_team_search()
        .without_global_user_config()
}

#[test]
fn init_resolve_validate_branch_and_bump() -> Result<()> {
    let dir = rust_project()?;
    let outcome = init_document(
        dir.path(),
        &InitOptions {
            project_type: None,
            strategy: Some(BranchingStrategy::Gitflow),
            force: false,
        },
    )?;
    assert_eq!(outcome.project_type, ProjectType::Rust);
    assert!(outcome.path.ends_with(".practices.yaml"));

    let resolved = loader(dir.path()).resolve()?;
    assert!(!resolved.provenance.is_synthesized());
    assert_eq!(
        resolved.provenance.origin("branching_strategy"),
        Some(FieldOrigin::Project)
    );

    let report = validator::validate(&resolved.document, dir.path());
    assert!(report.valid, "{report:?}");
    assert!(report.missing_files.is_empty());

    let check = validate_branch("feature/PMS-123-user-login", &resolved.document);
    assert!(check.valid, "{check:?}");
    assert_eq!(check.branch_type.as_deref(), Some("feature"));
    assert_eq!(check.identifier.as_deref(), Some("PMS-123"));
    assert_eq!(check.base.as_deref(), Some("develop"));

    let plan = construct_branch(
        &resolved.document,
        "hotfix",
        Some("0.4.3"),
        Some("Crash on empty input"),
    )?;
    assert_eq!(plan.name, "hotfix/0.4.3-crash-on-empty-input");
    assert_eq!(plan.base, "main");
    assert!(validate_branch(&plan.name, &resolved.document).valid);

    let versions = check_versions(&resolved.document, dir.path());
    assert!(versions.consistent, "{versions:?}");
    assert_eq!(versions.version.as_deref(), Some("0.4.2"));

    let bumped = bump_version(
        &resolved.document,
        dir.path(),
        BumpOptions {
            part: VersionPart::Minor,
            dry_run: false,
        },
    )?;
    assert_eq!(bumped.new_version, "0.5.0");
    assert_eq!(
        fs::read_to_string(dir.path().join("Cargo.toml"))?,
        CARGO_TOML.replace("version = \"0.4.2\"\nedition", "version = \"0.5.0\"\nedition")
    );
    assert_eq!(
        check_versions(&resolved.document, dir.path()).version.as_deref(),
        Some("0.5.0")
    );
    Ok(())
}

#[test]
fn project_and_user_layers_override_team_defaults() -> Result<()> {
    let workspace = TempDir::new()?;
    let team = workspace.path().join("team.yaml");
    fs::write(
        &team,
        "branching_strategy: github-flow\nmain_branch: trunk\nbranches:\n  feature:\n    pattern: '^feature/([A-Z]+-\\d+)-(.+)$'\n    base: trunk\njira:\n  url: https://jira.example.com\n  project: OPS\n",
    )?;

    let root = workspace.path().join("app");
    fs::create_dir_all(&root)?;
    fs::write(
        root.join(".practices.yaml"),
        "main_branch: main\nbranches:\n  feature:\n    base: main\n  docs:\n    pattern: '^docs/(.+)$'\n    base: main\njira:\n  project: APP\n",
    )?;
    fs::write(root.join(".practices.user.yaml"), "workflow_mode: team\n")?;

    let resolved = ConfigLoader::new(&root)
        .with_team_config(&team)
        .without_global_user_config()
        .resolve()?;
    let doc = &resolved.document;

    assert_eq!(doc.branching_strategy, BranchingStrategy::GithubFlow);
    assert_eq!(doc.main_branch, "main");
    let feature = doc.branch_type("feature").map(|r| (r.pattern.as_str(), r.base.as_str()));
    assert_eq!(feature, Some((r"^feature/([A-Z]+-\d+)-(.+)$", "main")));
    assert!(doc.branch_type("docs").is_some());

    let jira = doc.integrations.jira.clone().unwrap_or_default();
    assert_eq!(jira.get("project").and_then(|v| v.as_str()), Some("APP"));
    assert_eq!(
        jira.get("url").and_then(|v| v.as_str()),
        Some("https://jira.example.com")
    );

    assert_eq!(
        resolved.provenance.origin("workflow_mode"),
        Some(FieldOrigin::User)
    );
    assert_eq!(
        resolved.provenance.fields.get("branches"),
        Some(&vec![FieldOrigin::Team, FieldOrigin::Project])
    );
    Ok(())
}

#[test]
fn cli_parses_global_options_after_subcommand() -> Result<()> {
    let cli = Cli::try_parse_from([
        "practices",
        "version",
        "bump",
        "patch",
        "--dry-run",
        "--format",
        "json",
        "--dir",
        "/tmp",
    ])?;
    assert_eq!(cli.global.dir, Path::new("/tmp"));
    assert_eq!(cli.global.format, practices::data::OutputFormat::Json);
    Ok(())
}

#[test]
fn cli_rejects_unknown_strategy() {
    let result = Cli::try_parse_from(["practices", "config", "init", "--strategy", "waterfall"]);
    assert!(result.is_err());
}
