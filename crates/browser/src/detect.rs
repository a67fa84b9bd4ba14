//! Chromium binary discovery.

use std::path::PathBuf;

/// Known Chromium-based browser executable names to search for.
/// All of these support CDP (Chrome DevTools Protocol).
const CHROMIUM_EXECUTABLES: &[&str] = &[
    "chrome",
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "msedge",
    "microsoft-edge",
    "microsoft-edge-stable",
    "brave-browser",
];

/// macOS app bundle paths for Chromium-based browsers.
#[cfg(target_os = "macos")]
const MACOS_APP_PATHS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    "/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
];

/// Windows installation paths for Chromium-based browsers.
#[cfg(target_os = "windows")]
const WINDOWS_PATHS: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
];

/// Find a Chromium-based browser executable.
///
/// Checks (in order): the configured path, the `CHROME` environment
/// variable, platform-specific install locations, then known executable
/// names in `PATH`.
pub fn detect_browser(custom_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = custom_path {
        let p = PathBuf::from(path);
        if p.exists() {
            return Some(p);
        }
    }

    if let Ok(path) = std::env::var("CHROME") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Some(p);
        }
    }

    // Platform install locations are checked before PATH, which can contain
    // broken wrapper scripts.
    #[cfg(target_os = "macos")]
    for path in MACOS_APP_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            return Some(p);
        }
    }

    #[cfg(target_os = "windows")]
    for path in WINDOWS_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            return Some(p);
        }
    }

    CHROMIUM_EXECUTABLES
        .iter()
        .find_map(|exe| which::which(exe).ok())
}

/// Platform-specific install guidance for launch-failure messages.
pub fn install_instructions() -> &'static str {
    #[cfg(target_os = "macos")]
    {
        "Install Google Chrome from https://www.google.com/chrome/ or run: brew install --cask google-chrome"
    }
    #[cfg(target_os = "linux")]
    {
        "Install Chromium, e.g.: apt install chromium-browser (or set the CHROME env var to an existing binary)"
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        "Install Google Chrome from https://www.google.com/chrome/"
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_path_wins_when_it_exists() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let found = detect_browser(file.path().to_str());
        assert_eq!(found, Some(file.path().to_path_buf()));
    }

    #[test]
    fn missing_custom_path_falls_through() {
        // Must not return the bogus path itself.
        let found = detect_browser(Some("/definitely/not/a/browser"));
        assert_ne!(found, Some(PathBuf::from("/definitely/not/a/browser")));
    }

    #[test]
    fn install_instructions_not_empty() {
        assert!(!install_instructions().is_empty());
    }
}
