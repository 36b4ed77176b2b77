use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;

use crate::model::{SubmissionRequest, SubmissionTarget};
use crate::storage::encode_path;

#[cfg(test)]
use std::sync::Mutex;

/// The wire side of the workflow. Implementations are opaque to the core:
/// fetch yields the root of the remote target hierarchy, submit yields the
/// server's response text. Both block and are always run through a `Task`.
pub(crate) trait SubmissionService: Send + Sync {
    fn fetch_targets(&self, url: &str) -> Result<SubmissionTarget>;
    fn submit(&self, request: &SubmissionRequest) -> Result<String>;
}

const REQUEST_TIMEOUT_SECS: u64 = 30;

pub(crate) struct HttpSubmissionService {
    client: Client,
}

impl HttpSubmissionService {
    pub(crate) fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }
}

impl SubmissionService for HttpSubmissionService {
    fn fetch_targets(&self, url: &str) -> Result<SubmissionTarget> {
        let response = self
            .client
            .get(url)
            .send()
            .context("reach submission URL")?;
        if !response.status().is_success() {
            anyhow::bail!("submission URL returned {}", response.status());
        }
        let body = response.text().context("read submission targets")?;
        serde_json::from_str(&body).context("parse submission targets")
    }

    fn submit(&self, request: &SubmissionRequest) -> Result<String> {
        let mut form = Form::new()
            .text("username", request.credentials.username.clone())
            .text("password", request.credentials.password.clone())
            .text("assignment", encode_path(&request.assignment_path))
            .text("project", request.project.name.clone());
        for (relative, data) in collect_project_files(&request.project.dir)? {
            form = form.part("files", Part::bytes(data).file_name(relative));
        }

        let response = self
            .client
            .post(&request.submit_url)
            .multipart(form)
            .send()
            .context("reach submission URL")?;
        if !response.status().is_success() {
            anyhow::bail!("server rejected submission: {}", response.status());
        }
        response.text().context("read server response")
    }
}

fn collect_project_files(dir: &Path) -> Result<Vec<(String, Vec<u8>)>> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<(String, Vec<u8>)>) -> Result<()> {
        for entry in fs::read_dir(dir).context("read project dir")? {
            let entry = entry.context("read project dir entry")?;
            let path = entry.path();
            let file_type = entry.file_type().context("read file type")?;
            if file_type.is_dir() {
                walk(root, &path, out)?;
            } else {
                let relative = path
                    .strip_prefix(root)
                    .unwrap_or(&path)
                    .to_string_lossy()
                    .into_owned();
                let data = fs::read(&path).context("read project file")?;
                out.push((relative, data));
            }
        }
        Ok(())
    }
    let mut files = Vec::new();
    walk(dir, dir, &mut files)?;
    if files.is_empty() {
        anyhow::bail!("project directory contains no files");
    }
    files.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(files)
}

#[cfg(test)]
#[derive(Default)]
pub(crate) struct MockSubmissionService {
    targets: Mutex<Option<SubmissionTarget>>,
    targets_error: Mutex<Option<String>>,
    response: Mutex<String>,
    submit_error: Mutex<Option<String>>,
    submissions: Mutex<Vec<SubmissionRequest>>,
}

#[cfg(test)]
impl MockSubmissionService {
    pub(crate) fn set_targets(&self, result: Result<SubmissionTarget>) {
        match result {
            Ok(root) => {
                *self.targets.lock().unwrap() = Some(root);
                *self.targets_error.lock().unwrap() = None;
            }
            Err(err) => {
                *self.targets_error.lock().unwrap() = Some(err.to_string());
            }
        }
    }

    pub(crate) fn set_response(&self, result: Result<String>) {
        match result {
            Ok(text) => {
                *self.response.lock().unwrap() = text;
                *self.submit_error.lock().unwrap() = None;
            }
            Err(err) => {
                *self.submit_error.lock().unwrap() = Some(err.to_string());
            }
        }
    }

    pub(crate) fn submissions(&self) -> Vec<SubmissionRequest> {
        self.submissions.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl SubmissionService for MockSubmissionService {
    fn fetch_targets(&self, _url: &str) -> Result<SubmissionTarget> {
        if let Some(err) = self.targets_error.lock().unwrap().as_ref() {
            return Err(anyhow::anyhow!(err.clone()));
        }
        self.targets
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow::anyhow!("no targets configured"))
    }

    fn submit(&self, request: &SubmissionRequest) -> Result<String> {
        self.submissions.lock().unwrap().push(request.clone());
        if let Some(err) = self.submit_error.lock().unwrap().as_ref() {
            return Err(anyhow::anyhow!(err.clone()));
        }
        Ok(self.response.lock().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collect_project_files_walks_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Main.java"), "class Main {}").unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src").join("Util.java"), "class Util {}").unwrap();

        let files = collect_project_files(dir.path()).unwrap();
        let names: Vec<&str> = files.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"Main.java"));
        assert!(names.iter().any(|name| name.ends_with("Util.java")));
    }

    #[test]
    fn collect_project_files_rejects_empty_project() {
        let dir = tempfile::tempdir().unwrap();
        let err = collect_project_files(dir.path()).unwrap_err();
        assert!(err.to_string().contains("no files"));
    }
}
