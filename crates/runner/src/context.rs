//! Run-scoped paths and directory provisioning.

use std::path::{Path, PathBuf};

use chrono::{Datelike, NaiveDate};

/// Default root directory for all run artifacts.
const SCREENSHOT_ROOT: &str = "screenshot";

/// Process-scoped run context: project identity, run date, environment
/// domains, and the output/baseline directories. Built once at startup and
/// read-only thereafter.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub project_name: String,
    /// Date segment shared by every artifact of the run.
    pub date: String,
    pub dev_domain: String,
    pub prod_domain: String,
    root: PathBuf,
    baseline_dir: Option<PathBuf>,
}

impl RunContext {
    pub fn new(
        project_name: impl Into<String>,
        dev_domain: impl Into<String>,
        prod_domain: impl Into<String>,
        date: NaiveDate,
        baseline_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            date: format_run_date(date),
            dev_domain: dev_domain.into(),
            prod_domain: prod_domain.into(),
            root: PathBuf::from(SCREENSHOT_ROOT),
            baseline_dir,
        }
    }

    /// Override the artifact root (tests, or embedding in another tree).
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    fn env_dir(&self, env: &str) -> PathBuf {
        self.root.join(&self.project_name).join(env).join(&self.date)
    }

    #[must_use]
    pub fn dev_dir(&self) -> PathBuf {
        self.env_dir("dev")
    }

    #[must_use]
    pub fn prod_dir(&self) -> PathBuf {
        self.env_dir("prod")
    }

    #[must_use]
    pub fn diff_dir(&self) -> PathBuf {
        self.env_dir("diff")
    }

    #[must_use]
    pub fn dev_path(&self, name: &str) -> PathBuf {
        self.dev_dir().join(format!("{name}.png"))
    }

    #[must_use]
    pub fn prod_path(&self, name: &str) -> PathBuf {
        self.prod_dir().join(format!("{name}.png"))
    }

    #[must_use]
    pub fn diff_path(&self, name: &str) -> PathBuf {
        self.diff_dir().join(format!("{name}.png"))
    }

    /// Stored baseline for `name`, if a baseline directory is configured.
    /// `None` means the target diffs against a fresh prod capture.
    #[must_use]
    pub fn baseline_path(&self, name: &str) -> Option<PathBuf> {
        self.baseline_dir
            .as_ref()
            .map(|dir| dir.join(format!("{name}.png")))
    }

    #[must_use]
    pub fn has_baseline(&self) -> bool {
        self.baseline_dir.is_some()
    }

    /// Create the output directories. Must succeed before any capture is
    /// attempted; a failure here fails the whole run.
    pub fn provision(&self) -> std::io::Result<()> {
        for dir in [self.dev_dir(), self.prod_dir(), self.diff_dir()] {
            std::fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

/// `YYYY` + unpadded month + zero-padded day, matching the directory names
/// the original tooling produced (`2026830` for 2026-08-30).
fn format_run_date(date: NaiveDate) -> String {
    format!("{}{}{:02}", date.year(), date.month(), date.day())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ctx() -> RunContext {
        RunContext::new(
            "mysite",
            "http://localhost:3000",
            "https://example.com",
            date(2026, 8, 30),
            None,
        )
    }

    #[test]
    fn run_date_format_matches_reference_layout() {
        assert_eq!(format_run_date(date(2026, 8, 30)), "2026830");
        assert_eq!(format_run_date(date(2019, 6, 3)), "2019603");
        assert_eq!(format_run_date(date(2026, 12, 25)), "20261225");
        assert_eq!(format_run_date(date(2026, 11, 5)), "20261105");
    }

    #[test]
    fn artifact_paths_follow_layout() {
        let ctx = ctx();
        assert_eq!(
            ctx.dev_path("top"),
            Path::new("screenshot/mysite/dev/2026830/top.png")
        );
        assert_eq!(
            ctx.prod_path("top"),
            Path::new("screenshot/mysite/prod/2026830/top.png")
        );
        assert_eq!(
            ctx.diff_path("top"),
            Path::new("screenshot/mysite/diff/2026830/top.png")
        );
    }

    #[test]
    fn baseline_path_requires_configured_dir() {
        assert_eq!(ctx().baseline_path("top"), None);

        let ctx = RunContext::new(
            "mysite",
            "http://localhost:3000",
            "https://example.com",
            date(2026, 8, 30),
            Some(PathBuf::from("baselines")),
        );
        assert_eq!(
            ctx.baseline_path("top"),
            Some(PathBuf::from("baselines/top.png"))
        );
    }

    #[test]
    fn provision_creates_all_output_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = ctx().with_root(dir.path());
        ctx.provision().unwrap();
        assert!(ctx.dev_dir().is_dir());
        assert!(ctx.prod_dir().is_dir());
        assert!(ctx.diff_dir().is_dir());
    }
}
