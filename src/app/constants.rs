pub(crate) const STATUS_READY: &str = "Ready";
pub(crate) const STATUS_FETCHING: &str = "Finding assignments that can be submitted...";
pub(crate) const STATUS_SUBMITTING: &str = "Submitting project...";
pub(crate) const STATUS_NO_ASSIGNMENTS: &str = "Could not find any assignments to submit to.";
pub(crate) const STATUS_SUBMIT_ACCEPTED: &str = "Submission accepted";
pub(crate) const STATUS_SUBMIT_FAILED: &str = "Submission failed";

pub(crate) const NO_PROJECT_SELECTED: &str = "(No project selected)";

pub(crate) const NOTICE_FETCH_FAILED_TITLE: &str = "Could not load assignments";
pub(crate) const NOTICE_VALIDATION_TITLE: &str = "Cannot submit";
pub(crate) const NOTICE_SUBMIT_FAILED_TITLE: &str = "Submission failed";
pub(crate) const NOTICE_NO_PROJECTS_TITLE: &str = "No projects";
pub(crate) const NOTICE_NO_URL_TITLE: &str = "No submission URL";

pub(crate) const MSG_FETCH_FAILED_PREFIX: &str =
    "Could not access the submission URL because of the following error:";
pub(crate) const MSG_NO_PROJECTS: &str = "You have no projects to select.";
pub(crate) const MSG_NO_URL: &str =
    "No submission URL is configured yet. Press F2 to open the settings.";
pub(crate) const MSG_BAD_URL: &str = "Error: You must enter a well-formed URL.";

pub(crate) const LOG_TIMESTAMP_FORMAT: &str = "%m-%d %H:%M:%S";
pub(crate) const LOG_PARSE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub(crate) const LOG_SEPARATOR: &str = " | ";
pub(crate) const LOG_NO_LOGS_MESSAGE: &str = "No logs yet";

pub(crate) const LOG_RETENTION_DAYS: i64 = 7;
pub(crate) const LOG_MAX_ENTRIES: usize = 10_000;
pub(crate) const LOG_MAX_IN_MEMORY: usize = 100;
