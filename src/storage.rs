use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Account settings, persisted as JSON in the user config dir. The password is
/// deliberately absent: it is typed per session and never written to disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct AppSettings {
    #[serde(default)]
    pub(crate) submit_url: String,
    #[serde(default)]
    pub(crate) username: String,
    #[serde(default)]
    pub(crate) smtp_server: String,
    #[serde(default)]
    pub(crate) email: String,
}

/// Navigation state restored across sessions. Best-effort only: a corrupt file
/// reads as "no prior selection", never as an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Preferences {
    #[serde(default)]
    pub(crate) last_project: String,
    #[serde(default)]
    pub(crate) last_expanded_path: String,
}

pub(crate) fn settings_path() -> Result<PathBuf> {
    config_file("settings.json")
}

pub(crate) fn prefs_path() -> Result<PathBuf> {
    config_file("prefs.json")
}

pub(crate) fn log_path() -> Result<PathBuf> {
    config_file("webcat-submit.log")
}

fn config_file(name: &str) -> Result<PathBuf> {
    if let Some(mut dir) = dirs::config_dir() {
        dir.push("webcat-submit");
        dir.push(name);
        return Ok(dir);
    }
    let mut fallback = std::env::current_dir().context("current dir")?;
    fallback.push(format!("webcat-submit-{name}"));
    Ok(fallback)
}

pub(crate) fn load_settings(path: &Path) -> Result<AppSettings> {
    if !path.exists() {
        return Ok(AppSettings::default());
    }
    let content = fs::read_to_string(path).context("read settings file")?;
    serde_json::from_str(&content).context("parse settings file")
}

pub(crate) fn save_settings(path: &Path, settings: &AppSettings) -> Result<()> {
    write_json(path, settings).context("write settings file")
}

pub(crate) fn load_prefs(path: &Path) -> Preferences {
    let Ok(content) = fs::read_to_string(path) else {
        return Preferences::default();
    };
    serde_json::from_str(&content).unwrap_or_default()
}

pub(crate) fn save_prefs(path: &Path, prefs: &Preferences) -> Result<()> {
    write_json(path, prefs).context("write prefs file")
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("create config dir")?;
    }
    let content = serde_json::to_string_pretty(value).context("serialize")?;
    fs::write(path, content)?;
    Ok(())
}

/// Saves a server response so it can be inspected after the dialog is gone.
pub(crate) fn write_submission_results(response: &str) -> Result<PathBuf> {
    let mut path = std::env::temp_dir();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|duration| duration.as_nanos())
        .unwrap_or(0);
    path.push(format!("webcat-response-{nanos}.html"));
    fs::write(&path, response).context("write submission results")?;
    Ok(path)
}

pub(crate) const PATH_DELIMITER: char = '/';
const PATH_ESCAPE: char = '\\';

/// Flattens tree path segments into the single persisted string. Segments may
/// contain the delimiter; it is escaped so decode reproduces them exactly.
pub(crate) fn encode_path(segments: &[String]) -> String {
    let mut out = String::new();
    for (index, segment) in segments.iter().enumerate() {
        if index > 0 {
            out.push(PATH_DELIMITER);
        }
        for ch in segment.chars() {
            if ch == PATH_DELIMITER || ch == PATH_ESCAPE {
                out.push(PATH_ESCAPE);
            }
            out.push(ch);
        }
    }
    out
}

/// Inverse of `encode_path`. Empty or malformed input (a dangling escape)
/// yields an empty path: persisted navigation state is never authoritative.
pub(crate) fn decode_path(encoded: &str) -> Vec<String> {
    if encoded.is_empty() {
        return vec![];
    }
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = encoded.chars();
    while let Some(ch) = chars.next() {
        if ch == PATH_ESCAPE {
            match chars.next() {
                Some(escaped) => current.push(escaped),
                None => return vec![],
            }
        } else if ch == PATH_DELIMITER {
            segments.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }
    segments.push(current);
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn encode_decode_round_trips() {
        let segments = path(&["CS 1114", "Project 3", "Part B"]);
        assert_eq!(decode_path(&encode_path(&segments)), segments);
    }

    #[test]
    fn encode_escapes_delimiter_in_segment_names() {
        let segments = path(&["CS/1114", "back\\slash"]);
        let encoded = encode_path(&segments);
        assert_eq!(decode_path(&encoded), segments);
    }

    #[test]
    fn decode_empty_is_empty_path() {
        assert!(decode_path("").is_empty());
    }

    #[test]
    fn decode_malformed_is_empty_path() {
        assert!(decode_path("dangling\\").is_empty());
    }

    #[test]
    fn decode_single_segment() {
        assert_eq!(decode_path("CS 1114"), path(&["CS 1114"]));
    }

    #[test]
    fn settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("settings.json");
        let settings = AppSettings {
            submit_url: "https://web-cat.example.edu/submit".to_string(),
            username: "student".to_string(),
            smtp_server: String::new(),
            email: String::new(),
        };
        save_settings(&file, &settings).unwrap();
        let loaded = load_settings(&file).unwrap();
        assert_eq!(loaded.submit_url, settings.submit_url);
        assert_eq!(loaded.username, settings.username);
    }

    #[test]
    fn missing_settings_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_settings(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.submit_url.is_empty());
    }

    #[test]
    fn corrupt_prefs_read_as_no_prior_selection() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("prefs.json");
        std::fs::write(&file, "{not json").unwrap();
        let prefs = load_prefs(&file);
        assert!(prefs.last_project.is_empty());
        assert!(prefs.last_expanded_path.is_empty());
    }

    #[test]
    fn prefs_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("prefs.json");
        let prefs = Preferences {
            last_project: "p3".to_string(),
            last_expanded_path: encode_path(&path(&["CS 1114", "Project 3"])),
        };
        save_prefs(&file, &prefs).unwrap();
        let loaded = load_prefs(&file);
        assert_eq!(loaded.last_project, "p3");
        assert_eq!(
            decode_path(&loaded.last_expanded_path),
            path(&["CS 1114", "Project 3"])
        );
    }
}
