use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// What survives a restart: the bearer token and the theme choice. Logout
/// clears only the token; the theme is kept.
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Session {
    pub access_token: Option<String>,
    #[serde(default)]
    pub theme: Theme,
    #[serde(skip)]
    path: PathBuf,
}

impl Session {
    pub fn load(path: &Path) -> Self {
        let mut session = if path.exists() {
            fs::read_to_string(path)
                .ok()
                .and_then(|data| serde_json::from_str(&data).ok())
                .unwrap_or_default()
        } else {
            Session::default()
        };
        session.path = path.to_path_buf();
        session
    }

    pub fn save(&self) {
        match serde_json::to_string_pretty(self) {
            Ok(data) => {
                if let Err(err) = fs::write(&self.path, data) {
                    tracing::warn!(path = %self.path.display(), error = %err, "failed to save session");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to serialize session"),
        }
    }

    pub fn set_token(&mut self, token: String) {
        self.access_token = Some(token);
        self.save();
    }

    pub fn clear_token(&mut self) {
        self.access_token = None;
        self.save();
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        self.save();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trips_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = Session::load(&path);
        assert!(session.access_token.is_none());
        session.set_token("abc123".to_string());

        let reloaded = Session::load(&path);
        assert_eq!(reloaded.access_token.as_deref(), Some("abc123"));
    }

    #[test]
    fn logout_clears_the_token_but_keeps_the_theme() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = Session::load(&path);
        session.set_token("abc123".to_string());
        session.toggle_theme();
        session.clear_token();

        let reloaded = Session::load(&path);
        assert!(reloaded.access_token.is_none());
        assert_eq!(reloaded.theme, Theme::Dark);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let session = Session::load(&path);
        assert!(session.access_token.is_none());
        assert_eq!(session.theme, Theme::Light);
    }
}
