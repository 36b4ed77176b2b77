use crate::app::constants::{
    NOTICE_SUBMIT_FAILED_TITLE, NOTICE_VALIDATION_TITLE, STATUS_SUBMITTING, STATUS_SUBMIT_ACCEPTED,
    STATUS_SUBMIT_FAILED,
};
use crate::app::App;
use crate::model::{Credentials, Notice, Phase, ResponseView, SubmissionRequest, ValidationError};
use crate::storage::{encode_path, save_prefs, save_settings, write_submission_results};

impl App {
    /// Checks the form in a fixed order: project, username, then the target.
    /// The first problem found is the one reported.
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.form.project.is_none() {
            return Err(ValidationError::NoProjectSelected);
        }
        if self.form.username.trim().is_empty() {
            return Err(ValidationError::MissingUsername);
        }
        match self.workflow.selected_target() {
            None => Err(ValidationError::NoTargetSelected),
            Some(target) if !target.is_assignment() => Err(ValidationError::TargetIsFolder),
            Some(_) => Ok(()),
        }
    }

    pub(crate) fn request_submit(&mut self) {
        if self.busy() {
            return;
        }
        if let Err(problem) = self.validate() {
            self.phase = Phase::ValidationFailed;
            self.notice = Some(Notice {
                title: NOTICE_VALIDATION_TITLE.to_string(),
                message: problem.message().to_string(),
            });
            return;
        }
        // validate() guarantees these are present.
        let Some(project) = self.form.project.clone() else {
            return;
        };
        let Some(assignment_path) = self.browser.selected_path().cloned() else {
            return;
        };

        self.settings.username = self.form.username.trim().to_string();
        if let Err(err) = save_settings(&self.settings_path, &self.settings) {
            self.log_line(&format!("Failed to save settings: {err}"));
        }
        let credentials = Credentials {
            username: self.settings.username.clone(),
            password: self.form.password.clone(),
        };
        self.workflow.set_credentials(credentials.clone());

        let request = SubmissionRequest {
            submit_url: self.settings.submit_url.clone(),
            project,
            assignment_path,
            credentials,
        };
        self.phase = Phase::Submitting;
        self.set_status(STATUS_SUBMITTING);
        self.submit_task = Some(self.workflow.start_submit(request));
    }

    pub(crate) fn poll_submit(&mut self) {
        let Some(task) = &self.submit_task else {
            return;
        };
        let Some(result) = task.poll() else {
            return;
        };
        self.submit_task = None;
        // The attempt is over either way, so the navigation state is worth
        // keeping for the next session.
        self.persist_navigation();
        match self.workflow.apply_submit(result) {
            Ok(()) => {
                self.phase = Phase::SubmitSucceeded;
                let text = self.workflow.last_response().unwrap_or_default().to_string();
                let saved_to = match write_submission_results(&text) {
                    Ok(path) => Some(path),
                    Err(err) => {
                        self.log_line(&format!("Failed to save results: {err}"));
                        None
                    }
                };
                self.response_view = Some(ResponseView { text, saved_to });
                self.set_status(STATUS_SUBMIT_ACCEPTED);
            }
            Err(err) => {
                self.phase = Phase::SubmitFailed;
                self.notice = Some(Notice {
                    title: NOTICE_SUBMIT_FAILED_TITLE.to_string(),
                    message: format!("{err:#}"),
                });
                self.set_status(STATUS_SUBMIT_FAILED);
            }
        }
    }

    pub(super) fn persist_navigation(&mut self) {
        if let Some(path) = self.browser.selected_path() {
            self.prefs.last_expanded_path = encode_path(path);
        }
        if let Err(err) = save_prefs(&self.prefs_path, &self.prefs) {
            self.log_line(&format!("Failed to save preferences: {err}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{assignment, folder, LocalProject};
    use crate::service::{MockSubmissionService, SubmissionService};
    use crate::storage::decode_path;
    use std::sync::Arc;

    fn ready_app() -> (App, Arc<MockSubmissionService>, tempfile::TempDir) {
        let service = Arc::new(MockSubmissionService::default());
        let mut app = App::for_test(Arc::clone(&service) as Arc<dyn SubmissionService>);
        service.set_targets(Ok(folder(
            "",
            vec![folder("CS 1114", vec![assignment("Project 3")])],
        )));
        app.start_fetch();
        app.wait_for_tasks();

        let dir = tempfile::tempdir().unwrap();
        let project_dir = dir.path().join("p3");
        std::fs::create_dir(&project_dir).unwrap();
        std::fs::write(project_dir.join("main.rs"), "fn main() {}").unwrap();
        app.form.project = Some(LocalProject {
            name: "p3".to_string(),
            dir: project_dir,
        });
        app.form.username = "student".to_string();
        app.form.password = "secret".to_string();
        (app, service, dir)
    }

    fn select_assignment(app: &mut App) {
        app.tree_expand();
        app.tree_move(1);
        assert_eq!(app.workflow.selected_target().unwrap().name, "Project 3");
    }

    #[test]
    fn validation_reports_missing_project_first() {
        let (mut app, _service, _dir) = ready_app();
        app.form.project = None;
        app.form.username.clear();
        assert_eq!(app.validate(), Err(ValidationError::NoProjectSelected));
    }

    #[test]
    fn validation_reports_username_before_target() {
        let (mut app, _service, _dir) = ready_app();
        app.form.username = "   ".to_string();
        assert_eq!(app.validate(), Err(ValidationError::MissingUsername));
    }

    #[test]
    fn folder_selection_is_not_submittable() {
        let (app, _service, _dir) = ready_app();
        // Cursor sits on the "CS 1114" folder after the fetch.
        assert_eq!(app.validate(), Err(ValidationError::TargetIsFolder));
    }

    #[test]
    fn assignment_selection_passes_validation() {
        let (mut app, _service, _dir) = ready_app();
        select_assignment(&mut app);
        assert_eq!(app.validate(), Ok(()));
    }

    #[test]
    fn failed_validation_raises_a_notice_without_dispatching() {
        let (mut app, service, _dir) = ready_app();
        app.form.username.clear();
        app.request_submit();
        assert_eq!(app.phase, Phase::ValidationFailed);
        assert!(app.submit_task.is_none());
        assert!(service.submissions().is_empty());
        assert_eq!(
            app.notice.as_ref().unwrap().message,
            "Please enter your username."
        );
    }

    #[test]
    fn successful_submit_shows_response_and_saves_it() {
        let (mut app, service, _dir) = ready_app();
        service.set_response(Ok("<html>graded</html>".to_string()));
        select_assignment(&mut app);
        app.request_submit();
        assert_eq!(app.phase, Phase::Submitting);
        app.wait_for_tasks();
        assert_eq!(app.phase, Phase::SubmitSucceeded);
        let view = app.response_view.as_ref().unwrap();
        assert_eq!(view.text, "<html>graded</html>");
        let saved = view.saved_to.as_ref().unwrap();
        assert_eq!(std::fs::read_to_string(saved).unwrap(), "<html>graded</html>");
        let _ = std::fs::remove_file(saved);
    }

    #[test]
    fn failed_submit_raises_notice_and_no_response() {
        let (mut app, service, _dir) = ready_app();
        service.set_response(Err(anyhow::anyhow!("451 rejected")));
        select_assignment(&mut app);
        app.request_submit();
        app.wait_for_tasks();
        assert_eq!(app.phase, Phase::SubmitFailed);
        assert!(app.response_view.is_none());
        assert!(!app.workflow.has_response());
        assert!(app.notice.as_ref().unwrap().message.contains("451 rejected"));
        app.acknowledge();
        assert_eq!(app.phase, Phase::Ready);
    }

    #[test]
    fn navigation_is_persisted_even_when_the_submit_fails() {
        let (mut app, service, _dir) = ready_app();
        service.set_response(Err(anyhow::anyhow!("timeout")));
        select_assignment(&mut app);
        app.request_submit();
        app.wait_for_tasks();
        assert_eq!(
            decode_path(&app.prefs.last_expanded_path),
            vec!["CS 1114".to_string(), "Project 3".to_string()]
        );
        let _ = std::fs::remove_file(&app.prefs_path);
    }

    #[test]
    fn submit_persists_the_username_but_never_the_password() {
        let (mut app, service, _dir) = ready_app();
        service.set_response(Ok("ok".to_string()));
        select_assignment(&mut app);
        app.request_submit();
        app.wait_for_tasks();
        let content = std::fs::read_to_string(&app.settings_path).unwrap();
        assert!(content.contains("student"));
        assert!(!content.contains("secret"));
        let _ = std::fs::remove_file(&app.settings_path);
        let _ = std::fs::remove_file(&app.prefs_path);
    }

    #[test]
    fn submit_request_carries_the_selected_path() {
        let (mut app, service, _dir) = ready_app();
        service.set_response(Ok("ok".to_string()));
        select_assignment(&mut app);
        app.request_submit();
        app.wait_for_tasks();
        let sent = service.submissions();
        assert_eq!(sent.len(), 1);
        assert_eq!(
            sent[0].assignment_path,
            vec!["CS 1114".to_string(), "Project 3".to_string()]
        );
        assert_eq!(sent[0].credentials.password, "secret");
    }
}
