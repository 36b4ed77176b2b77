use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub(crate) enum TargetKind {
    Folder,
    Assignment,
}

/// A node in the remote assignment hierarchy. Folders organize, assignments
/// are the only legal submission destinations.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SubmissionTarget {
    pub(crate) name: String,
    pub(crate) kind: TargetKind,
    #[serde(default)]
    pub(crate) children: Vec<SubmissionTarget>,
    #[serde(default)]
    pub(crate) metadata: Option<serde_json::Value>,
}

impl SubmissionTarget {
    pub(crate) fn is_assignment(&self) -> bool {
        self.kind == TargetKind::Assignment
    }

    pub(crate) fn child(&self, name: &str) -> Option<&SubmissionTarget> {
        self.children.iter().find(|child| child.name == name)
    }
}

/// Immutable snapshot of the remote hierarchy. Every fetch builds a new tree;
/// selections are re-resolved by path instead of patched in place.
#[derive(Debug, Clone)]
pub(crate) struct SubmissionTargetTree {
    root: SubmissionTarget,
}

impl SubmissionTargetTree {
    pub(crate) fn new(root: SubmissionTarget) -> Result<Self> {
        if root.kind != TargetKind::Folder {
            anyhow::bail!("root target must be a folder");
        }
        check_unique_siblings(&root)?;
        Ok(Self { root })
    }

    pub(crate) fn root(&self) -> &SubmissionTarget {
        &self.root
    }

    /// Walks segment names from the root, stopping at the first miss. Returns
    /// the deepest node reached and how many segments matched (0 means only
    /// the root matched), so a stale persisted path restores as far as the
    /// fresh tree still allows.
    pub(crate) fn resolve<'a>(&'a self, path: &[String]) -> Resolution<'a> {
        let mut node = &self.root;
        let mut matched = 0;
        for segment in path {
            match node.child(segment) {
                Some(child) => {
                    node = child;
                    matched += 1;
                }
                None => break,
            }
        }
        Resolution { node, matched }
    }
}

fn check_unique_siblings(target: &SubmissionTarget) -> Result<()> {
    let mut seen = HashSet::new();
    for child in &target.children {
        if !seen.insert(child.name.as_str()) {
            anyhow::bail!(
                "duplicate target name '{}' under '{}'",
                child.name,
                target.name
            );
        }
        check_unique_siblings(child)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Resolution<'a> {
    pub(crate) node: &'a SubmissionTarget,
    pub(crate) matched: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Credentials {
    pub(crate) username: String,
    pub(crate) password: String,
}

#[derive(Debug, Clone)]
pub(crate) struct LocalProject {
    pub(crate) name: String,
    pub(crate) dir: PathBuf,
}

/// Everything the service needs to submit one project to one assignment.
#[derive(Debug, Clone)]
pub(crate) struct SubmissionRequest {
    pub(crate) submit_url: String,
    pub(crate) project: LocalProject,
    pub(crate) assignment_path: Vec<String>,
    pub(crate) credentials: Credentials,
}

/// Workflow phases. The failure and success phases stay up until the user
/// acknowledges the notice, then fall back to Ready (tree present) or Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Idle,
    FetchingTargets,
    FetchFailed,
    Ready,
    ValidationFailed,
    Submitting,
    SubmitFailed,
    SubmitSucceeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Submit,
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Field {
    Username,
    Password,
    Project,
    Targets,
    ActionSubmit,
}

#[derive(Debug, Clone)]
pub(crate) struct SubmitFormState {
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) project: Option<LocalProject>,
    pub(crate) active_field: Field,
}

impl Default for SubmitFormState {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            project: None,
            active_field: Field::Username,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SettingsField {
    Url,
    Username,
    Smtp,
    Email,
    ActionSave,
}

#[derive(Debug, Clone)]
pub(crate) struct SettingsFormState {
    pub(crate) url: String,
    pub(crate) username: String,
    pub(crate) smtp_server: String,
    pub(crate) email: String,
    pub(crate) active_field: SettingsField,
    pub(crate) error: Option<String>,
}

impl Default for SettingsFormState {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: String::new(),
            smtp_server: String::new(),
            email: String::new(),
            active_field: SettingsField::Url,
            error: None,
        }
    }
}

/// One visible line of the target tree, flattened for rendering.
#[derive(Debug, Clone)]
pub(crate) struct TreeRow {
    pub(crate) path: Vec<String>,
    pub(crate) depth: usize,
    pub(crate) kind: TargetKind,
    pub(crate) expanded: bool,
    pub(crate) has_children: bool,
}

impl TreeRow {
    pub(crate) fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct TreeBrowserState {
    pub(crate) rows: Vec<TreeRow>,
    pub(crate) cursor: usize,
    pub(crate) expanded: HashSet<Vec<String>>,
}

impl TreeBrowserState {
    pub(crate) fn selected_path(&self) -> Option<&Vec<String>> {
        self.rows.get(self.cursor).map(|row| &row.path)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ProjectPickerState {
    pub(crate) projects: Vec<LocalProject>,
    pub(crate) selected: usize,
}

/// The four user-input problems that block a submission, in the order the
/// form is checked: project first, then username, then the target. "Nothing
/// selected" and "a folder is selected" are different user errors and carry
/// different messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationError {
    NoProjectSelected,
    MissingUsername,
    NoTargetSelected,
    TargetIsFolder,
}

impl ValidationError {
    pub(crate) fn message(self) -> &'static str {
        match self {
            Self::NoProjectSelected => "Please select a project to submit.",
            Self::MissingUsername => "Please enter your username.",
            Self::NoTargetSelected => "Please select an assignment.",
            Self::TargetIsFolder => "Please select an assignment, not a folder.",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Notice {
    pub(crate) title: String,
    pub(crate) message: String,
}

#[derive(Debug, Clone)]
pub(crate) struct ResponseView {
    pub(crate) text: String,
    pub(crate) saved_to: Option<PathBuf>,
}

#[cfg(test)]
pub(crate) fn folder(name: &str, children: Vec<SubmissionTarget>) -> SubmissionTarget {
    SubmissionTarget {
        name: name.to_string(),
        kind: TargetKind::Folder,
        children,
        metadata: None,
    }
}

#[cfg(test)]
pub(crate) fn assignment(name: &str) -> SubmissionTarget {
    SubmissionTarget {
        name: name.to_string(),
        kind: TargetKind::Assignment,
        children: vec![],
        metadata: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> SubmissionTargetTree {
        let root = folder(
            "",
            vec![folder("A", vec![assignment("B"), assignment("C")])],
        );
        SubmissionTargetTree::new(root).unwrap()
    }

    fn path(segments: &[&str]) -> Vec<String> {
        segments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn resolve_full_path() {
        let tree = sample_tree();
        let resolution = tree.resolve(&path(&["A", "B"]));
        assert_eq!(resolution.node.name, "B");
        assert_eq!(resolution.matched, 2);
    }

    #[test]
    fn resolve_stops_at_deepest_prefix() {
        let tree = sample_tree();
        let resolution = tree.resolve(&path(&["A", "X"]));
        assert_eq!(resolution.node.name, "A");
        assert_eq!(resolution.matched, 1);
    }

    #[test]
    fn resolve_unknown_top_level_matches_only_root() {
        let tree = sample_tree();
        let resolution = tree.resolve(&path(&["Z"]));
        assert_eq!(resolution.node.name, "");
        assert_eq!(resolution.matched, 0);
    }

    #[test]
    fn resolve_empty_path_returns_root() {
        let tree = sample_tree();
        let resolution = tree.resolve(&[]);
        assert_eq!(resolution.matched, 0);
        assert_eq!(resolution.node.name, tree.root().name);
    }

    #[test]
    fn tree_rejects_duplicate_sibling_names() {
        let root = folder("", vec![assignment("A"), assignment("A")]);
        let err = SubmissionTargetTree::new(root).unwrap_err();
        assert!(err.to_string().contains("duplicate target name"));
    }

    #[test]
    fn tree_rejects_assignment_root() {
        let err = SubmissionTargetTree::new(assignment("root")).unwrap_err();
        assert!(err.to_string().contains("root target must be a folder"));
    }

    #[test]
    fn only_assignments_are_submittable() {
        let tree = sample_tree();
        assert!(!tree.resolve(&path(&["A"])).node.is_assignment());
        assert!(tree.resolve(&path(&["A", "B"])).node.is_assignment());
    }
}
