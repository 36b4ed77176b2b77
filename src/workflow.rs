use std::sync::Arc;

use anyhow::Result;

use crate::model::{
    Credentials, LocalProject, SubmissionRequest, SubmissionTarget, SubmissionTargetTree,
};
use crate::service::SubmissionService;
use crate::task::Task;

/// Session-scoped workflow state: one instance per run, owned by the app and
/// mutated only on the interactive thread. The two long-running operations are
/// handed out as `Task`s; their results come back through `apply_*` so a
/// failed fetch can never null out the previous tree and a failed submit can
/// never leave a half-written response behind.
pub(crate) struct WorkflowModel {
    service: Arc<dyn SubmissionService>,
    tree: Option<SubmissionTargetTree>,
    selected_target: Option<SubmissionTarget>,
    selected_project: Option<LocalProject>,
    credentials: Credentials,
    last_response: Option<String>,
    has_response: bool,
}

impl WorkflowModel {
    pub(crate) fn new(service: Arc<dyn SubmissionService>) -> Self {
        Self {
            service,
            tree: None,
            selected_target: None,
            selected_project: None,
            credentials: Credentials {
                username: String::new(),
                password: String::new(),
            },
            last_response: None,
            has_response: false,
        }
    }

    pub(crate) fn tree(&self) -> Option<&SubmissionTargetTree> {
        self.tree.as_ref()
    }

    pub(crate) fn selected_target(&self) -> Option<&SubmissionTarget> {
        self.selected_target.as_ref()
    }

    pub(crate) fn select_target(&mut self, target: Option<SubmissionTarget>) {
        self.selected_target = target;
    }

    pub(crate) fn selected_project(&self) -> Option<&LocalProject> {
        self.selected_project.as_ref()
    }

    pub(crate) fn select_project(&mut self, project: Option<LocalProject>) {
        self.selected_project = project;
    }

    pub(crate) fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = credentials;
    }

    pub(crate) fn has_response(&self) -> bool {
        self.has_response
    }

    /// The server's response text, present only after a successful submit.
    pub(crate) fn last_response(&self) -> Option<&str> {
        if self.has_response {
            self.last_response.as_deref()
        } else {
            None
        }
    }

    pub(crate) fn start_fetch(&self, url: String) -> Task<SubmissionTargetTree> {
        let service = Arc::clone(&self.service);
        Task::spawn(move || {
            let root = service.fetch_targets(&url)?;
            SubmissionTargetTree::new(root)
        })
    }

    /// On success the tree is replaced wholesale. On failure the previous
    /// tree, stale or absent, stays exactly as it was.
    pub(crate) fn apply_fetch(&mut self, result: Result<SubmissionTargetTree>) -> Result<()> {
        let tree = result?;
        self.tree = Some(tree);
        Ok(())
    }

    /// Clears any prior response before dispatching, so a stale response can
    /// never be mistaken for this attempt's outcome.
    pub(crate) fn start_submit(&mut self, request: SubmissionRequest) -> Task<String> {
        self.last_response = None;
        self.has_response = false;
        let service = Arc::clone(&self.service);
        Task::spawn(move || service.submit(&request))
    }

    pub(crate) fn apply_submit(&mut self, result: Result<String>) -> Result<()> {
        let response = result?;
        self.last_response = Some(response);
        self.has_response = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{assignment, folder};
    use crate::service::MockSubmissionService;
    use std::path::PathBuf;

    fn model_with_mock() -> (WorkflowModel, Arc<MockSubmissionService>) {
        let service = Arc::new(MockSubmissionService::default());
        let model = WorkflowModel::new(Arc::clone(&service) as Arc<dyn SubmissionService>);
        (model, service)
    }

    fn sample_root() -> crate::model::SubmissionTarget {
        folder("", vec![folder("CS 1114", vec![assignment("Project 3")])])
    }

    fn sample_request() -> SubmissionRequest {
        SubmissionRequest {
            submit_url: "https://example.edu/submit".to_string(),
            project: LocalProject {
                name: "p3".to_string(),
                dir: PathBuf::from("/tmp/p3"),
            },
            assignment_path: vec!["CS 1114".to_string(), "Project 3".to_string()],
            credentials: Credentials {
                username: "student".to_string(),
                password: "secret".to_string(),
            },
        }
    }

    #[test]
    fn successful_fetch_replaces_tree() {
        let (mut model, service) = model_with_mock();
        service.set_targets(Ok(sample_root()));
        let result = model.start_fetch("https://example.edu".to_string()).join();
        model.apply_fetch(result).unwrap();
        assert!(model.tree().unwrap().root().child("CS 1114").is_some());
    }

    #[test]
    fn failed_fetch_keeps_previous_tree() {
        let (mut model, service) = model_with_mock();
        service.set_targets(Ok(sample_root()));
        let result = model.start_fetch("https://example.edu".to_string()).join();
        model.apply_fetch(result).unwrap();

        service.set_targets(Err(anyhow::anyhow!("connection refused")));
        let result = model.start_fetch("https://example.edu".to_string()).join();
        let err = model.apply_fetch(result).unwrap_err();
        assert!(err.to_string().contains("connection refused"));
        assert!(model.tree().unwrap().root().child("CS 1114").is_some());
    }

    #[test]
    fn failed_fetch_with_no_tree_leaves_it_absent() {
        let (mut model, service) = model_with_mock();
        service.set_targets(Err(anyhow::anyhow!("timeout")));
        let result = model.start_fetch("https://example.edu".to_string()).join();
        assert!(model.apply_fetch(result).is_err());
        assert!(model.tree().is_none());
    }

    #[test]
    fn malformed_hierarchy_is_a_fetch_failure() {
        let (mut model, service) = model_with_mock();
        service.set_targets(Ok(folder(
            "",
            vec![assignment("A"), assignment("A")],
        )));
        let result = model.start_fetch("https://example.edu".to_string()).join();
        let err = model.apply_fetch(result).unwrap_err();
        assert!(err.to_string().contains("duplicate target name"));
    }

    #[test]
    fn successful_submit_records_response() {
        let (mut model, service) = model_with_mock();
        service.set_response(Ok("<html>passed 10/10</html>".to_string()));
        let result = model.start_submit(sample_request()).join();
        model.apply_submit(result).unwrap();
        assert!(model.has_response());
        assert_eq!(model.last_response(), Some("<html>passed 10/10</html>"));
    }

    #[test]
    fn failed_submit_never_exposes_a_response() {
        let (mut model, service) = model_with_mock();
        service.set_response(Err(anyhow::anyhow!("connection reset")));
        let result = model.start_submit(sample_request()).join();
        let err = model.apply_submit(result).unwrap_err();
        assert!(err.to_string().contains("connection reset"));
        assert!(!model.has_response());
        assert!(model.last_response().is_none());
    }

    #[test]
    fn new_attempt_clears_previous_response() {
        let (mut model, service) = model_with_mock();
        service.set_response(Ok("first".to_string()));
        let result = model.start_submit(sample_request()).join();
        model.apply_submit(result).unwrap();
        assert!(model.has_response());

        service.set_response(Err(anyhow::anyhow!("second attempt failed")));
        let task = model.start_submit(sample_request());
        // Cleared at dispatch, before the outcome is known.
        assert!(!model.has_response());
        assert!(model.last_response().is_none());
        assert!(model.apply_submit(task.join()).is_err());
        assert!(model.last_response().is_none());
    }

    #[test]
    fn submit_sends_the_request_as_given() {
        let (mut model, service) = model_with_mock();
        service.set_response(Ok("ok".to_string()));
        let result = model.start_submit(sample_request()).join();
        model.apply_submit(result).unwrap();
        let sent = service.submissions();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].credentials.username, "student");
        assert_eq!(
            sent[0].assignment_path,
            vec!["CS 1114".to_string(), "Project 3".to_string()]
        );
    }
}
