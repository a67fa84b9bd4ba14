//! Config schema types.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SitediffConfig {
    /// Project name, used as the top-level output directory segment.
    #[serde(alias = "projectName")]
    pub project_name: String,

    /// Base URL of the production deployment, e.g. `https://example.com`.
    #[serde(alias = "prdDomain")]
    pub prod_domain: String,

    /// Base URL of the development deployment, e.g. `http://localhost:3000`.
    #[serde(alias = "devDomain")]
    pub dev_domain: String,

    /// Pages to capture and diff.
    #[serde(alias = "urlList")]
    pub pages: Vec<PageTarget>,

    /// Directory of stored baseline captures. Empty or absent means "diff
    /// against a fresh prod capture" (the original `targetDir` convention).
    #[serde(alias = "targetDir")]
    pub baseline_dir: Option<String>,

    pub capture: CaptureConfig,
    pub compare: CompareConfig,
}

impl SitediffConfig {
    /// Baseline directory, treating an empty string as unset.
    #[must_use]
    pub fn baseline(&self) -> Option<&Path> {
        self.baseline_dir
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(Path::new)
    }
}

/// A named page to compare across environments.
///
/// The name doubles as the artifact file stem, so it must be unique within
/// a run. Deserializes from either a `{ name, path }` table or a
/// `["name", "/path"]` pair (the original `urlList` entry format).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PageTargetRepr")]
pub struct PageTarget {
    pub name: String,
    /// Path segment appended to the environment domain.
    pub path: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageTargetRepr {
    Full {
        name: String,
        #[serde(alias = "pathSegment")]
        path: String,
    },
    Pair(String, String),
}

impl From<PageTargetRepr> for PageTarget {
    fn from(repr: PageTargetRepr) -> Self {
        match repr {
            PageTargetRepr::Full { name, path } => Self { name, path },
            PageTargetRepr::Pair(name, path) => Self { name, path },
        }
    }
}

/// Browser and scrolling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// Scroll increment in CSS pixels. 0 means "use the viewport height".
    pub scroll_step: u64,
    /// How long to wait for a quiescent load state after each scroll step.
    pub settle_timeout_ms: u64,
    pub headless: bool,
    /// Explicit Chrome/Chromium executable (otherwise auto-detected).
    pub chrome_path: Option<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            viewport_width: 1200,
            viewport_height: 800,
            scroll_step: 0,
            settle_timeout_ms: 1000,
            headless: true,
            chrome_path: None,
        }
    }
}

impl CaptureConfig {
    /// Effective scroll step: the configured value, falling back to the
    /// viewport height.
    #[must_use]
    pub fn step_height(&self) -> u64 {
        if self.scroll_step == 0 {
            u64::from(self.viewport_height)
        } else {
            self.scroll_step
        }
    }
}

/// Diff engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Per-channel similarity threshold on a normalized 0–1 scale.
    pub threshold: f64,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self { threshold: 0.1 }
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_original_json_shape() {
        let raw = r#"{
            "projectName": "mysite",
            "prdDomain": "https://example.com",
            "devDomain": "http://localhost:3000",
            "urlList": [["top", "/"], ["about", "/about/"]]
        }"#;
        let cfg: SitediffConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(cfg.project_name, "mysite");
        assert_eq!(cfg.prod_domain, "https://example.com");
        assert_eq!(cfg.dev_domain, "http://localhost:3000");
        assert_eq!(cfg.pages.len(), 2);
        assert_eq!(cfg.pages[0], PageTarget {
            name: "top".into(),
            path: "/".into()
        });
        assert_eq!(cfg.pages[1].name, "about");
    }

    #[test]
    fn parses_toml_shape() {
        let raw = r#"
            project_name = "mysite"
            prod_domain = "https://example.com"
            dev_domain = "http://localhost:3000"

            [[pages]]
            name = "top"
            path = "/"

            [capture]
            viewport_width = 1440
            scroll_step = 600

            [compare]
            threshold = 0.05
        "#;
        let cfg: SitediffConfig = toml::from_str(raw).unwrap();
        assert_eq!(cfg.pages[0].path, "/");
        assert_eq!(cfg.capture.viewport_width, 1440);
        assert_eq!(cfg.capture.viewport_height, 800);
        assert_eq!(cfg.capture.step_height(), 600);
        assert!((cfg.compare.threshold - 0.05).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_baseline_dir_is_unset() {
        let cfg = SitediffConfig {
            baseline_dir: Some(String::new()),
            ..Default::default()
        };
        assert!(cfg.baseline().is_none());

        let cfg = SitediffConfig {
            baseline_dir: Some("screenshot/mysite/dev/2026830".into()),
            ..Default::default()
        };
        assert_eq!(
            cfg.baseline(),
            Some(Path::new("screenshot/mysite/dev/2026830"))
        );
    }

    #[test]
    fn scroll_step_defaults_to_viewport_height() {
        let capture = CaptureConfig::default();
        assert_eq!(capture.step_height(), 800);
    }

    #[test]
    fn defaults_match_reference_tool() {
        let cfg = SitediffConfig::default();
        assert_eq!(cfg.capture.viewport_width, 1200);
        assert_eq!(cfg.capture.viewport_height, 800);
        assert_eq!(cfg.capture.settle_timeout_ms, 1000);
        assert!((cfg.compare.threshold - 0.1).abs() < f64::EPSILON);
        assert!(cfg.capture.headless);
    }
}
