//! Configuration validation.
//!
//! Checks that a loaded config can actually drive a run: domains parse as
//! URLs, page names are unique and filesystem-safe, the threshold is in
//! range. Warnings don't block a run; errors do.

use std::{collections::HashSet, fmt};

use crate::schema::SitediffConfig;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// A single validation diagnostic.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Dotted config path, e.g. `pages[2].name`.
    pub field: String,
    pub message: String,
}

impl Diagnostic {
    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            field: field.into(),
            message: message.into(),
        }
    }

    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.severity, self.field, self.message)
    }
}

/// Returns `true` if any diagnostic is an error.
#[must_use]
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Error)
}

/// Validate a loaded config. An empty result means it's good to run.
#[must_use]
pub fn validate(cfg: &SitediffConfig) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    if cfg.project_name.is_empty() {
        out.push(Diagnostic::error("project_name", "must not be empty"));
    }

    check_domain(&mut out, "dev_domain", &cfg.dev_domain);
    if cfg.baseline().is_some() {
        // Prod is never visited when a baseline dir is configured.
        if !cfg.prod_domain.is_empty() {
            check_domain(&mut out, "prod_domain", &cfg.prod_domain);
        }
    } else {
        check_domain(&mut out, "prod_domain", &cfg.prod_domain);
    }

    if cfg.pages.is_empty() {
        out.push(Diagnostic::error("pages", "at least one page is required"));
    }

    let mut seen = HashSet::new();
    for (i, page) in cfg.pages.iter().enumerate() {
        if page.name.is_empty() {
            out.push(Diagnostic::error(
                format!("pages[{i}].name"),
                "must not be empty",
            ));
        } else if !seen.insert(page.name.as_str()) {
            out.push(Diagnostic::error(
                format!("pages[{i}].name"),
                format!("duplicate page name {:?}; output paths would collide", page.name),
            ));
        }
        if page.name.contains('/') || page.name.contains('\\') {
            out.push(Diagnostic::error(
                format!("pages[{i}].name"),
                "must not contain path separators",
            ));
        }
        if !page.path.starts_with('/') {
            out.push(Diagnostic::warning(
                format!("pages[{i}].path"),
                "does not start with '/'; it is appended to the domain verbatim",
            ));
        }
    }

    if !(0.0..=1.0).contains(&cfg.compare.threshold) {
        out.push(Diagnostic::error(
            "compare.threshold",
            format!("must be within [0, 1], got {}", cfg.compare.threshold),
        ));
    }

    if cfg.capture.settle_timeout_ms == 0 {
        out.push(Diagnostic::warning(
            "capture.settle_timeout_ms",
            "a zero settle window means every scroll step proceeds immediately",
        ));
    }

    out
}

fn check_domain(out: &mut Vec<Diagnostic>, field: &str, value: &str) {
    if value.is_empty() {
        out.push(Diagnostic::error(field, "must not be empty"));
        return;
    }
    match url::Url::parse(value) {
        Ok(parsed) if parsed.scheme() == "http" || parsed.scheme() == "https" => {},
        Ok(parsed) => out.push(Diagnostic::error(
            field,
            format!("unsupported scheme {:?}, only http/https", parsed.scheme()),
        )),
        Err(e) => out.push(Diagnostic::error(field, format!("not a valid URL: {e}"))),
    }
}
