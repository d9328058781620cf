//! `folio check` command implementation.
//!
//! Loads the configuration and decodes every content file and account file,
//! reporting each one the API would fail to serve.

use std::path::PathBuf;

use clap::Args;
use folio_config::Config;
use folio_storage::{AccountStore, PageStore, StorageError, format};
use folio_storage_fs::{FsAccountStore, FsPageStore};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Path to configuration file (default: auto-discover folio.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Outcome of a check run.
#[derive(Debug, Default)]
struct Report {
    pages: usize,
    directories: usize,
    users: usize,
    problems: Vec<String>,
}

impl CheckArgs {
    /// Execute the check command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, a directory cannot be read,
    /// or any file is malformed.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), None)?;
        config.validate()?;
        match &config.config_path {
            Some(path) => output.info(&format!("Config: {}", path.display())),
            None => output.info("Config: defaults (no folio.toml found)"),
        }

        let mut report = Report::default();
        check_pages(&FsPageStore::new(config.pages_resolved.dir.clone()), &mut report)?;
        check_users(&FsAccountStore::new(config.users_resolved.dir.clone()), &mut report)?;

        output.highlight(&format!(
            "{} pages, {} directories, {} users",
            report.pages, report.directories, report.users
        ));
        for problem in &report.problems {
            output.warning(problem);
        }

        if report.problems.is_empty() {
            output.success("All files are valid");
            Ok(())
        } else {
            Err(CliError::Validation(format!(
                "{} malformed files",
                report.problems.len()
            )))
        }
    }
}

fn check_pages(store: &dyn PageStore, report: &mut Report) -> Result<(), StorageError> {
    for node in store.scan()? {
        if !node.is_page() {
            report.directories += 1;
            continue;
        }
        report.pages += 1;
        if let Err(e) = format::decode(&store.read(&node.route)?) {
            report.problems.push(format!("page /{}: {e}", node.route));
        }
    }
    Ok(())
}

fn check_users(store: &dyn AccountStore, report: &mut Report) -> Result<(), StorageError> {
    for username in store.list()? {
        report.users += 1;
        if let Err(e) = format::parse_header(&store.read(&username)?) {
            report.problems.push(format!("user {username}: {e}"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_check_pages_counts_and_problems() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("blog/post1")).unwrap();
        fs::create_dir_all(root.join("about")).unwrap();
        fs::write(root.join("blog/post1/item.md"), "---\ntitle: Post\n---\nBody").unwrap();
        fs::write(root.join("about/default.md"), "---\ntitle: [broken\n---\n").unwrap();

        let mut report = Report::default();
        check_pages(&FsPageStore::new(root.to_path_buf()), &mut report).unwrap();

        assert_eq!(report.pages, 2);
        assert_eq!(report.directories, 1);
        assert_eq!(report.problems.len(), 1);
        assert!(report.problems[0].starts_with("page /about:"));
    }

    #[test]
    fn test_check_users() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("joe.yaml"), "email: joe@example.com\n").unwrap();
        fs::write(temp_dir.path().join("bad.yaml"), "- not\n- a mapping\n").unwrap();

        let mut report = Report::default();
        check_users(&FsAccountStore::new(temp_dir.path().to_path_buf()), &mut report).unwrap();

        assert_eq!(report.users, 2);
        assert_eq!(
            report.problems,
            vec!["user bad: YAML document must be a mapping".to_owned()]
        );
    }
}
