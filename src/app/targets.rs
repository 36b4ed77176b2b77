use crate::app::constants::{
    MSG_FETCH_FAILED_PREFIX, MSG_NO_URL, NOTICE_FETCH_FAILED_TITLE, NOTICE_NO_URL_TITLE,
    STATUS_FETCHING, STATUS_NO_ASSIGNMENTS, STATUS_READY,
};
use crate::app::App;
use crate::model::{Notice, Phase, SubmissionTarget, TreeRow};
use crate::storage::decode_path;

impl App {
    /// Kicks off a fetch of the assignment hierarchy. A fetch already in
    /// flight is left alone; with no URL configured there is nothing to fetch.
    pub(crate) fn start_fetch(&mut self) {
        if self.fetch_task.is_some() {
            return;
        }
        if self.settings.submit_url.trim().is_empty() {
            self.notice = Some(Notice {
                title: NOTICE_NO_URL_TITLE.to_string(),
                message: MSG_NO_URL.to_string(),
            });
            return;
        }
        self.phase = Phase::FetchingTargets;
        self.set_status(STATUS_FETCHING);
        self.fetch_task = Some(self.workflow.start_fetch(self.settings.submit_url.clone()));
    }

    pub(crate) fn poll_fetch(&mut self) {
        let Some(task) = &self.fetch_task else {
            return;
        };
        let Some(result) = task.poll() else {
            return;
        };
        self.fetch_task = None;
        match self.workflow.apply_fetch(result) {
            Ok(()) => {
                self.phase = Phase::Ready;
                self.restore_last_expanded();
                self.set_status(STATUS_READY);
            }
            Err(err) => {
                self.phase = Phase::FetchFailed;
                self.notice = Some(Notice {
                    title: NOTICE_FETCH_FAILED_TITLE.to_string(),
                    message: format!("{MSG_FETCH_FAILED_PREFIX}\n\n{err:#}"),
                });
                self.set_status(STATUS_NO_ASSIGNMENTS);
            }
        }
    }

    /// Expands the fresh tree along the persisted path as far as it still
    /// resolves and puts the cursor on the deepest surviving node.
    pub(super) fn restore_last_expanded(&mut self) {
        self.browser.expanded.clear();
        let saved = decode_path(&self.prefs.last_expanded_path);
        let matched = match self.workflow.tree() {
            Some(tree) => tree.resolve(&saved).matched,
            None => 0,
        };
        for depth in 1..matched {
            self.browser.expanded.insert(saved[..depth].to_vec());
        }
        self.rebuild_rows();
        let target = &saved[..matched];
        self.browser.cursor = self
            .browser
            .rows
            .iter()
            .position(|row| row.path == target)
            .unwrap_or(0);
        self.sync_selected_target();
    }

    /// Re-flattens the tree into visible rows after any expand/collapse or
    /// tree replacement.
    pub(crate) fn rebuild_rows(&mut self) {
        let mut rows = Vec::new();
        if let Some(tree) = self.workflow.tree() {
            for child in &tree.root().children {
                collect_rows(child, &mut Vec::new(), &self.browser.expanded, &mut rows);
            }
        }
        self.browser.rows = rows;
        if self.browser.cursor >= self.browser.rows.len() {
            self.browser.cursor = self.browser.rows.len().saturating_sub(1);
        }
        self.sync_selected_target();
    }

    pub(crate) fn tree_move(&mut self, delta: i64) {
        if self.browser.rows.is_empty() {
            return;
        }
        let last = self.browser.rows.len() as i64 - 1;
        let cursor = (self.browser.cursor as i64 + delta).clamp(0, last);
        self.browser.cursor = cursor as usize;
        self.sync_selected_target();
    }

    /// Enter on a folder toggles it; Enter on an assignment just confirms the
    /// selection, which the cursor already tracks.
    pub(crate) fn tree_toggle(&mut self) {
        let Some(row) = self.browser.rows.get(self.browser.cursor) else {
            return;
        };
        if !row.has_children {
            return;
        }
        let path = row.path.clone();
        if !self.browser.expanded.remove(&path) {
            self.browser.expanded.insert(path);
        }
        self.rebuild_rows();
    }

    pub(crate) fn tree_collapse(&mut self) {
        let Some(row) = self.browser.rows.get(self.browser.cursor) else {
            return;
        };
        if row.expanded {
            let path = row.path.clone();
            self.browser.expanded.remove(&path);
            self.rebuild_rows();
        } else if row.path.len() > 1 {
            // Jump to the parent row instead of collapsing a leaf.
            let parent = &row.path[..row.path.len() - 1];
            if let Some(index) = self
                .browser
                .rows
                .iter()
                .position(|candidate| candidate.path == parent)
            {
                self.browser.cursor = index;
                self.sync_selected_target();
            }
        }
    }

    pub(crate) fn tree_expand(&mut self) {
        let Some(row) = self.browser.rows.get(self.browser.cursor) else {
            return;
        };
        if row.has_children && !row.expanded {
            let path = row.path.clone();
            self.browser.expanded.insert(path);
            self.rebuild_rows();
        }
    }

    /// Keeps the model's selected target in step with the cursor, resolving
    /// the cursor path against the current tree.
    pub(super) fn sync_selected_target(&mut self) {
        let target = self.browser.selected_path().and_then(|path| {
            let tree = self.workflow.tree()?;
            let resolution = tree.resolve(path);
            (resolution.matched == path.len()).then(|| resolution.node.clone())
        });
        self.workflow.select_target(target);
    }
}

fn collect_rows(
    node: &SubmissionTarget,
    prefix: &mut Vec<String>,
    expanded: &std::collections::HashSet<Vec<String>>,
    rows: &mut Vec<TreeRow>,
) {
    prefix.push(node.name.clone());
    let is_expanded = expanded.contains(prefix.as_slice());
    rows.push(TreeRow {
        path: prefix.clone(),
        depth: prefix.len() - 1,
        kind: node.kind,
        expanded: is_expanded,
        has_children: !node.children.is_empty(),
    });
    if is_expanded {
        for child in &node.children {
            collect_rows(child, prefix, expanded, rows);
        }
    }
    prefix.pop();
}
