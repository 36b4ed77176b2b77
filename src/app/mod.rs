use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::app::constants::STATUS_READY;
use crate::app::logging::prune_log_file;
use crate::model::{
    Mode, Notice, Phase, ProjectPickerState, ResponseView, SettingsFormState, SubmissionTargetTree,
    SubmitFormState, TreeBrowserState,
};
use crate::service::SubmissionService;
use crate::storage::{
    load_prefs, load_settings, log_path, prefs_path, settings_path, AppSettings, Preferences,
};
use crate::task::Task;
use crate::workflow::WorkflowModel;

pub(crate) mod constants;
mod handlers;
mod logging;
mod projects;
mod submitting;
mod targets;

/// The workflow controller: owns the session-scoped model, the two background
/// task slots and all interactive state. Everything here is touched only from
/// the interactive thread; the tasks hand their results back through the
/// `poll_*` methods in the main loop.
pub(crate) struct App {
    pub(crate) settings_path: PathBuf,
    pub(crate) prefs_path: PathBuf,
    pub(crate) log_path: PathBuf,
    pub(crate) log_lines: VecDeque<String>,
    pub(crate) settings: AppSettings,
    pub(crate) prefs: Preferences,
    pub(crate) projects_root: PathBuf,
    pub(crate) workflow: WorkflowModel,
    pub(crate) phase: Phase,
    pub(crate) mode: Mode,
    pub(crate) form: SubmitFormState,
    pub(crate) settings_form: SettingsFormState,
    pub(crate) browser: TreeBrowserState,
    pub(crate) project_picker: Option<ProjectPickerState>,
    pub(crate) notice: Option<Notice>,
    pub(crate) response_view: Option<ResponseView>,
    pub(crate) status: String,
    pub(super) fetch_task: Option<Task<SubmissionTargetTree>>,
    pub(super) submit_task: Option<Task<String>>,
}

impl App {
    pub(crate) fn load(
        service: Arc<dyn SubmissionService>,
        projects_root: PathBuf,
    ) -> Result<Self> {
        let settings_path = settings_path()?;
        let prefs_path = prefs_path()?;
        let settings = load_settings(&settings_path)?;
        let prefs = load_prefs(&prefs_path);
        let log_path = log_path()?;
        prune_log_file(&log_path);

        let mut form = SubmitFormState::default();
        form.username = settings.username.clone();

        let mut app = Self {
            settings_path,
            prefs_path,
            log_path,
            log_lines: VecDeque::new(),
            settings,
            prefs,
            projects_root,
            workflow: WorkflowModel::new(service),
            phase: Phase::Idle,
            mode: Mode::Submit,
            form,
            settings_form: SettingsFormState::default(),
            browser: TreeBrowserState::default(),
            project_picker: None,
            notice: None,
            response_view: None,
            status: String::new(),
            fetch_task: None,
            submit_task: None,
        };
        app.restore_last_project();
        app.set_status(STATUS_READY);
        Ok(app)
    }

    /// Dismisses the current notice or response view and settles back into
    /// Ready when a tree exists, Idle otherwise.
    pub(crate) fn acknowledge(&mut self) {
        self.notice = None;
        self.response_view = None;
        if matches!(
            self.phase,
            Phase::FetchFailed | Phase::ValidationFailed | Phase::SubmitFailed | Phase::SubmitSucceeded
        ) {
            self.phase = if self.workflow.tree().is_some() {
                Phase::Ready
            } else {
                Phase::Idle
            };
        }
    }

    pub(crate) fn busy(&self) -> bool {
        self.fetch_task.is_some() || self.submit_task.is_some()
    }
}

#[cfg(test)]
impl App {
    pub(crate) fn for_test(service: Arc<dyn SubmissionService>) -> Self {
        let base = std::env::temp_dir();
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        Self {
            settings_path: base.join(format!("webcat-submit-test-settings-{nanos}.json")),
            prefs_path: base.join(format!("webcat-submit-test-prefs-{nanos}.json")),
            log_path: base.join(format!("webcat-submit-test-{nanos}.log")),
            log_lines: VecDeque::new(),
            settings: AppSettings {
                submit_url: "https://web-cat.example.edu/submit".to_string(),
                username: String::new(),
                smtp_server: String::new(),
                email: String::new(),
            },
            prefs: Preferences::default(),
            projects_root: base.clone(),
            workflow: WorkflowModel::new(service),
            phase: Phase::Idle,
            mode: Mode::Submit,
            form: SubmitFormState::default(),
            settings_form: SettingsFormState::default(),
            browser: TreeBrowserState::default(),
            project_picker: None,
            notice: None,
            response_view: None,
            status: String::new(),
            fetch_task: None,
            submit_task: None,
        }
    }

    /// Blocks until the outstanding fetch or submit finishes and its result
    /// has been applied, since tests have no tick loop to poll for them.
    pub(crate) fn wait_for_tasks(&mut self) {
        while self.busy() {
            self.poll_fetch();
            self.poll_submit();
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
    }
}
