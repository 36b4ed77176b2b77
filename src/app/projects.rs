use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::app::constants::{MSG_NO_PROJECTS, NOTICE_NO_PROJECTS_TITLE};
use crate::app::App;
use crate::model::{LocalProject, Notice, ProjectPickerState};

/// Each direct subdirectory of the projects root is one submittable project,
/// keyed by its directory name. Rescanned on every call so new checkouts show
/// up without a restart.
pub(crate) fn list_local_projects(root: &Path) -> Result<Vec<LocalProject>> {
    let mut projects = Vec::new();
    for entry in fs::read_dir(root).context("read projects root")? {
        let entry = entry.context("read projects root entry")?;
        let file_type = entry.file_type().context("read file type")?;
        if !file_type.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        projects.push(LocalProject {
            name,
            dir: entry.path(),
        });
    }
    projects.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    Ok(projects)
}

impl App {
    pub(crate) fn open_project_picker(&mut self) {
        match list_local_projects(&self.projects_root) {
            Ok(projects) => {
                if projects.is_empty() {
                    self.notice = Some(Notice {
                        title: NOTICE_NO_PROJECTS_TITLE.to_string(),
                        message: MSG_NO_PROJECTS.to_string(),
                    });
                    return;
                }
                let current = self.form.project.as_ref().map(|project| project.name.clone());
                let selected = current
                    .and_then(|name| projects.iter().position(|project| project.name == name))
                    .unwrap_or(0);
                self.project_picker = Some(ProjectPickerState { projects, selected });
            }
            Err(err) => {
                self.set_status(format!("Failed to list projects: {err}"));
            }
        }
    }

    /// Sets the project on the form and the model and remembers it as the
    /// last selection for the next session.
    pub(crate) fn choose_project(&mut self, project: LocalProject) {
        self.form.project = Some(project.clone());
        self.workflow.select_project(Some(project.clone()));
        self.prefs.last_project = project.name;
        if let Err(err) = crate::storage::save_prefs(&self.prefs_path, &self.prefs) {
            self.set_status(format!("Failed to save preferences: {err}"));
        }
    }

    /// Re-selects the previously chosen project, but only if it still exists
    /// under the projects root.
    pub(crate) fn restore_last_project(&mut self) {
        if self.prefs.last_project.is_empty() {
            return;
        }
        let Ok(projects) = list_local_projects(&self.projects_root) else {
            return;
        };
        if let Some(project) = projects
            .into_iter()
            .find(|project| project.name == self.prefs.last_project)
        {
            self.form.project = Some(project.clone());
            self.workflow.select_project(Some(project));
        }
    }
}
