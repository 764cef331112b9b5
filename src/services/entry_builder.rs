//! Interactive authoring of addon entries.
//!
//! The builder drives prompts over any `BufRead`/`Write` pair so the CLI
//! can hand it stdin/stdout and tests can script it.

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::collections::HashSet;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::models::{AddonEntry, OfficialTheme, RepoSlug};
use crate::services::catalog_store::{atomic_write, load_json_list, to_pretty_json, CatalogStore};
use crate::services::contributors::ContributorFiles;
use crate::services::sync::addon_template;
use crate::services::tags::{defaults_for_modes, finalize, TagMacros};

/// Result of authoring one entry.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildOutcome {
    /// The user confirmed a new entry
    Created(AddonEntry),
    /// The theme was skipped or the preview discarded
    Skipped,
    /// The user asked to stop the session
    Exit,
}

/// Summary of an authoring session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub processed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub error_details: Vec<String>,
    /// Repositories of the entries created
    pub created: Vec<String>,
    pub author: Option<String>,
    /// File the entries were written to
    pub file: Option<PathBuf>,
    /// True when the user stopped before the end of the selection
    pub stopped_early: bool,
}

/// Prompt-driven builder for addon entries.
pub struct EntryBuilder<'a, R, W> {
    input: R,
    output: W,
    macros: &'a TagMacros,
    open_browser: bool,
}

impl<'a, R: BufRead, W: Write> EntryBuilder<'a, R, W> {
    pub fn new(input: R, output: W, macros: &'a TagMacros) -> Self {
        Self {
            input,
            output,
            macros,
            open_browser: false,
        }
    }

    /// Opens each repository page in the browser before prompting.
    #[must_use]
    pub fn with_browser(mut self, open_browser: bool) -> Self {
        self.open_browser = open_browser;
        self
    }

    /// Prints a prompt and reads one trimmed line; `None` at end of input.
    pub fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Asks a yes/no question; only `y`/`yes` count as yes.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        let answer = self.prompt(&format!("{question} (y/n): "))?;
        Ok(matches!(
            answer.map(|a| a.to_lowercase()).as_deref(),
            Some("y" | "yes")
        ))
    }

    /// Writes a line to the prompt output.
    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}")?;
        Ok(())
    }

    /// Authors an addon entry for one official theme.
    pub fn build(&mut self, official: &OfficialTheme) -> Result<BuildOutcome> {
        let defaults = defaults_for_modes(&official.modes);

        self.say(&format!(
            "\nCreating addon entry for: {} by {}",
            official.display_name(),
            official.author
        ))?;
        self.say(&format!("Repository: {}", official.repo))?;
        self.say(&format!("Official screenshot: {}", official.screenshot))?;
        self.say(&format!(
            "Default tags from modes [{}]: {}",
            official.modes.join(", "),
            defaults.join(", ")
        ))?;

        if self.open_browser {
            self.open_repository(&official.repo);
        }

        self.say("\n1. Tags (comma-separated, macros like 'm' expand; 'notm' drops minimalistic)")?;
        self.say("   Type 'skip' to skip this theme, 'exit' to quit")?;
        let Some(tags_input) = self.prompt("   Tags: ")? else {
            return Ok(BuildOutcome::Exit);
        };
        match tags_input.to_lowercase().as_str() {
            "exit" => return Ok(BuildOutcome::Exit),
            "skip" => return Ok(BuildOutcome::Skipped),
            _ => {}
        }

        let mut entry = addon_template(official);
        entry.tags = finalize(&self.macros.expand(&tags_input), &defaults);

        self.say(&format!(
            "\n2. Main screenshot (enter keeps '{}')",
            official.screenshot
        ))?;
        let Some(main) = self.prompt("   Main screenshot: ")? else {
            return Ok(BuildOutcome::Exit);
        };
        if main.eq_ignore_ascii_case("exit") {
            return Ok(BuildOutcome::Exit);
        }
        if !main.is_empty() {
            entry.screenshot_main = main;
        }

        self.say("\n3. Additional screenshots (one URL per line, empty line to finish)")?;
        loop {
            let Some(url) = self.prompt("   Screenshot URL: ")? else {
                break;
            };
            if url.eq_ignore_ascii_case("exit") {
                return Ok(BuildOutcome::Exit);
            }
            if url.is_empty() {
                break;
            }
            entry.screenshots_side.push(url);
        }

        self.say("\nAddon entry preview:")?;
        self.say(&to_pretty_json(&entry)?)?;

        if self.confirm("Save this entry?")? {
            Ok(BuildOutcome::Created(entry))
        } else {
            self.say("Entry discarded")?;
            Ok(BuildOutcome::Skipped)
        }
    }

    fn open_repository(&mut self, repo: &str) {
        let url = match RepoSlug::parse(repo) {
            Ok(slug) => slug.web_url(),
            Err(_) => return,
        };
        if let Err(err) = open::that(&url) {
            tracing::warn!("Could not open {url}: {err}");
        }
    }

    /// Authors entries for the selected themes.
    ///
    /// Without an author, new entries are appended to the addon catalog,
    /// which is saved once at the end. With an author, entries go to that
    /// contributor's file, stamped with attribution; themes already in the
    /// file are skipped and the file is saved after every entry.
    pub fn run_session(
        &mut self,
        selected: &[&OfficialTheme],
        store: &CatalogStore,
        author: Option<&str>,
    ) -> Result<SessionReport> {
        let contributors = ContributorFiles::new(store.addon_path());
        let target = author.map(|a| contributors.file_for(a));

        let mut entries: Vec<AddonEntry> = match &target {
            Some(file) => load_json_list(file)?,
            None => store.load_addon()?,
        };
        let mut done: HashSet<String> = entries.iter().map(|e| e.repo.clone()).collect();

        let mut report = SessionReport {
            author: author.map(str::to_string),
            file: Some(target.clone().unwrap_or_else(|| store.addon_path().to_path_buf())),
            ..SessionReport::default()
        };

        let total = selected.len();
        for (idx, official) in selected.iter().enumerate() {
            if done.contains(&official.repo) {
                self.say(&format!(
                    "[{}/{total}] Skipping {} (already processed)",
                    idx + 1,
                    official.display_name()
                ))?;
                report.skipped += 1;
                continue;
            }

            self.say(&format!(
                "\n[{}/{total}] Processing: {} ({})",
                idx + 1,
                official.display_name(),
                official.repo
            ))?;

            match self.build(official) {
                Ok(BuildOutcome::Created(mut entry)) => {
                    if let Some(author) = author {
                        entry.stamp_created(author, Local::now());
                    }
                    done.insert(entry.repo.clone());
                    report.created.push(entry.repo.clone());
                    entries.push(entry);
                    report.processed += 1;

                    if let Some(file) = &target {
                        atomic_write(file, &to_pretty_json(&entries)?)?;
                        tracing::info!("Saved entry for {} to {}", official.repo, file.display());
                    }
                }
                Ok(BuildOutcome::Skipped) => {
                    report.skipped += 1;
                }
                Ok(BuildOutcome::Exit) => {
                    report.stopped_early = true;
                    break;
                }
                Err(err) => {
                    tracing::warn!("Error processing {}: {err:#}", official.repo);
                    report.errors += 1;
                    report
                        .error_details
                        .push(format!("Error processing {}: {err:#}", official.repo));
                }
            }
        }

        if target.is_none() && report.processed > 0 {
            store.save_addon(&entries)?;
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn theme(repo: &str, modes: &[&str]) -> OfficialTheme {
        OfficialTheme {
            name: repo.to_uppercase(),
            author: "someone".to_string(),
            repo: repo.to_string(),
            screenshot: "shot.png".to_string(),
            modes: modes.iter().map(|m| (*m).to_string()).collect(),
        }
    }

    fn store(temp: &TempDir) -> CatalogStore {
        CatalogStore::new(
            temp.path().join("official.json"),
            temp.path().join("addon.json"),
            temp.path().join("backups"),
        )
    }

    #[test]
    fn test_build_entry() {
        let macros = TagMacros::default();
        let input = Cursor::new("ret, cozy\n\nhttps://x/1.png\nhttps://x/2.png\n\ny\n");
        let mut output = Vec::new();
        let mut builder = EntryBuilder::new(input, &mut output, &macros);

        let outcome = builder.build(&theme("o/a", &["dark", "light"])).unwrap();
        let BuildOutcome::Created(entry) = outcome else {
            panic!("expected an entry, got {outcome:?}");
        };

        assert_eq!(
            entry.tags,
            vec!["cozy", "dark", "dark_and_light", "light", "minimalistic", "retro"]
        );
        assert_eq!(entry.screenshot_main, "shot.png");
        assert_eq!(entry.screenshots_side, vec!["https://x/1.png", "https://x/2.png"]);

        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("Default tags from modes [dark, light]: dark, light, dark_and_light"));
        assert!(shown.contains("\"screenshots-side\""));
    }

    #[test]
    fn test_build_skip_exit_and_discard() {
        let macros = TagMacros::default();
        let official = theme("o/a", &["dark"]);

        let mut builder = EntryBuilder::new(Cursor::new("skip\n"), Vec::new(), &macros);
        assert_eq!(builder.build(&official).unwrap(), BuildOutcome::Skipped);

        let mut builder = EntryBuilder::new(Cursor::new("EXIT\n"), Vec::new(), &macros);
        assert_eq!(builder.build(&official).unwrap(), BuildOutcome::Exit);

        let mut builder = EntryBuilder::new(Cursor::new("d\nmain.png\n\nn\n"), Vec::new(), &macros);
        assert_eq!(builder.build(&official).unwrap(), BuildOutcome::Skipped);

        let mut builder = EntryBuilder::new(Cursor::new(""), Vec::new(), &macros);
        assert_eq!(builder.build(&official).unwrap(), BuildOutcome::Exit);
    }

    #[test]
    fn test_session_without_author_saves_catalog_once() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let macros = TagMacros::default();
        let themes = [theme("o/a", &["dark"]), theme("o/b", &["light"])];
        let selected: Vec<&OfficialTheme> = themes.iter().collect();

        let input = Cursor::new("notm\n\n\ny\nskip\n");
        let mut builder = EntryBuilder::new(input, Vec::new(), &macros);
        let report = builder.run_session(&selected, &store, None).unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped, 1);
        assert!(!report.stopped_early);

        let catalog = store.load_addon().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].tags, vec!["dark"]);
        assert!(catalog[0].contributor.is_none());
    }

    #[test]
    fn test_session_with_author_resumes_contributor_file() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let macros = TagMacros::default();
        let file = ContributorFiles::new(store.addon_path()).file_for("Alice");
        std::fs::write(&file, r#"[{"repo": "o/a", "_author": "Alice"}]"#).unwrap();

        let themes = [theme("o/a", &["dark"]), theme("o/b", &["dark"]), theme("o/c", &[])];
        let selected: Vec<&OfficialTheme> = themes.iter().collect();

        let input = Cursor::new("g\n\n\ny\nexit\n");
        let mut builder = EntryBuilder::new(input, Vec::new(), &macros);
        let report = builder.run_session(&selected, &store, Some("Alice")).unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped, 1);
        assert!(report.stopped_early);
        assert_eq!(report.file.as_deref(), Some(file.as_path()));

        let saved: Vec<AddonEntry> = load_json_list(&file).unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[1].repo, "o/b");
        assert_eq!(saved[1].contributor.as_deref(), Some("Alice"));
        assert!(saved[1].created_at.is_some());
        assert!(!store.addon_path().exists());
    }
}
