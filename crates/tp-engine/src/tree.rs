//! The tree view adapter.
//!
//! [`TreePicker`] is the engine instance a host UI talks to. It composes the
//! lister, the selection set and the search controller into the tree-widget
//! contract and publishes two typed streams:
//!
//! - **tree changed** ([`TreeChange`]): the visible tree must be re-fetched.
//! - **selection changed** (`Vec<SelectedItem>`): the full selection
//!   snapshot after every mutation.
//!
//! # Architecture
//!
//! ```text
//!                   ┌──────────────────────────── TreePicker ───────────────────────────┐
//! host UI ─────────►│ get_children / get_tree_item                                      │
//!                   │    │            │                                                 │
//!                   │    ▼            ▼                                                 │
//!                   │ EntryLister  SearchController ◄── search task (SearchWalker)      │
//!                   │                 results                 │ record / complete       │
//!                   │                                         ▼                         │
//!                   │ SelectionSet                   Debouncer<TreeChange> ──┐          │
//! toggle / uncheck ►│    │ snapshot()                                        ├─► tree_changed
//!                   │    └──────────────────────► selection_changed          │          │
//!                   │ FileWatcher ──► Debouncer<()> ─────────────────────────┘          │
//!                   └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Checked state is never stored per node: every [`TreeNode`] and
//! [`TreeItem`] derives it from the selection set when it is produced.

use std::sync::Arc;
use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use tp_core::{
    CheckState, Config, FilesystemEntry, SearchHit, SearchPhase, SelectedItem, TreeItem,
    TreeNode, WatchConfig,
};
use tp_watcher::{AcceptAllFilter, FileFilter, FileWatcher, HiddenPathFilter, WatchError};

use crate::broadcast::{Broadcaster, SubscriberId, Subscription};
use crate::debounce::Debouncer;
use crate::error::EngineError;
use crate::lister::EntryLister;
use crate::search::{SearchController, SearchSession};
use crate::selection::{SelectionSet, ToggleOutcome};

/// Payload of the tree-changed stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeChange {
    /// Re-fetch everything (watcher activity, selection change, search
    /// cleared).
    Refresh,
    /// The active search has more results.
    SearchUpdated {
        /// Generation the results belong to.
        generation: u64,
        /// Number of hits accumulated so far.
        hits: usize,
    },
    /// The active search visited the whole tree.
    SearchCompleted {
        /// Generation the results belong to.
        generation: u64,
        /// The full result buffer.
        results: Arc<[SearchHit]>,
    },
}

impl TreeChange {
    /// Returns the search generation this change belongs to, if any.
    #[must_use]
    pub const fn generation(&self) -> Option<u64> {
        match self {
            Self::Refresh => None,
            Self::SearchUpdated { generation, .. } | Self::SearchCompleted { generation, .. } => {
                Some(*generation)
            }
        }
    }
}

struct Inner {
    root: Utf8PathBuf,
    lister: EntryLister,
    min_query_len: usize,
    selection: SelectionSet,
    search: Arc<Mutex<SearchController>>,
    tree_changed: Arc<Broadcaster<TreeChange>>,
    selection_changed: Broadcaster<Vec<SelectedItem>>,
    search_notifier: Debouncer<TreeChange>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.search.lock().cancel();
    }
}

/// The selection-and-search engine behind one tree view.
///
/// Constructed explicitly by the composition root and shared by cloning;
/// clones share all state.
///
/// # Examples
///
/// ```no_run
/// use tp_core::Config;
/// use tp_engine::TreePicker;
///
/// # async fn example() -> Result<(), tp_engine::EngineError> {
/// let picker = TreePicker::new(&Config::default()).await?;
/// let mut changes = picker.subscribe_tree_changed();
///
/// for node in picker.get_children(None).await {
///     println!("{:?} {}", node.checked, node.entry.name);
/// }
///
/// picker.set_search_query("readme");
/// while let Some(change) = changes.recv().await {
///     println!("{change:?}");
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TreePicker {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for TreePicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreePicker")
            .field("root", &self.inner.root)
            .field("selected", &self.inner.selection.len())
            .field("search", &self.search_phase())
            .finish_non_exhaustive()
    }
}

impl TreePicker {
    /// Creates an engine rooted at `config.tree.root_path`.
    ///
    /// The root is canonicalized so every path the engine hands out is
    /// absolute. Must be called inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidRoot`] if the root is missing or not a
    /// directory and [`EngineError::NonUtf8Path`] if its canonical form is
    /// not UTF-8.
    pub async fn new(config: &Config) -> Result<Self, EngineError> {
        let configured = &config.tree.root_path;
        let canonical = tokio::fs::canonicalize(configured)
            .await
            .map_err(|e| EngineError::invalid_root(configured.clone(), e.to_string()))?;
        let root = Utf8PathBuf::try_from(canonical)
            .map_err(|e| EngineError::NonUtf8Path(e.into_path_buf()))?;

        let is_dir = tokio::fs::metadata(&root)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(EngineError::invalid_root(root, "not a directory"));
        }

        let lister = EntryLister::new().with_show_hidden(config.tree.show_hidden);
        let search = Arc::new(Mutex::new(SearchController::new()));
        let tree_changed = Arc::new(Broadcaster::new());

        let search_notifier = {
            let search = Arc::clone(&search);
            let tree_changed = Arc::clone(&tree_changed);
            Debouncer::new(
                Duration::from_millis(config.search.debounce_ms),
                move |change: TreeChange| {
                    if let Some(generation) = change.generation() {
                        if !search.lock().is_current(generation) {
                            debug!(generation, "Dropping update for superseded search");
                            return;
                        }
                    }
                    tree_changed.emit(change);
                },
            )
        };

        info!(root = %root, show_hidden = config.tree.show_hidden, "Tree picker created");

        Ok(Self {
            inner: Arc::new(Inner {
                root,
                lister,
                min_query_len: config.search.min_query_len.max(1),
                selection: SelectionSet::new(lister),
                search,
                tree_changed,
                selection_changed: Broadcaster::new(),
                search_notifier,
            }),
        })
    }

    /// Returns the canonical tree root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.inner.root
    }

    /// Returns the lister the engine reads directories with.
    #[must_use]
    pub fn lister(&self) -> EntryLister {
        self.inner.lister
    }

    /// Returns the children of `node`, or of the root when `node` is `None`.
    ///
    /// While a search query is set, the root request returns the flattened
    /// result buffer instead of the root listing; each node then carries
    /// the hit's relative parent directory as context.
    pub async fn get_children(&self, node: Option<&FilesystemEntry>) -> Vec<TreeNode> {
        let dir = match node {
            Some(entry) => entry.path.clone(),
            None => {
                if let Some(hits) = self.active_results() {
                    return hits
                        .iter()
                        .map(|hit| {
                            TreeNode::new(hit.to_entry(), self.check_state(&hit.path))
                                .with_context(hit.parent_display().map(str::to_owned))
                        })
                        .collect();
                }
                self.inner.root.clone()
            }
        };

        self.inner
            .lister
            .list(&dir)
            .await
            .into_iter()
            .map(|entry| {
                let checked = self.check_state(&entry.path);
                TreeNode::new(entry, checked)
            })
            .collect()
    }

    /// Builds the renderable form of `node`, re-reading its checked state.
    #[must_use]
    pub fn get_tree_item(&self, node: &TreeNode) -> TreeItem {
        let mut item = TreeItem::from(node);
        item.checked = self.check_state(&node.entry.path);
        item
    }

    /// Toggles `entry` with directory cascade, then broadcasts the new
    /// selection and a tree refresh.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::NotFound`] if the entry vanished; nothing is
    /// broadcast in that case.
    pub async fn toggle_selection_by_ui_item(
        &self,
        entry: &FilesystemEntry,
    ) -> Result<ToggleOutcome, EngineError> {
        let outcome = self.inner.selection.toggle(&entry.path, entry.kind).await?;
        self.selection_mutated().await;
        Ok(outcome)
    }

    /// Removes exactly `path` from the selection (no cascade).
    ///
    /// Returns `false`, without broadcasting, if `path` was not selected.
    pub async fn uncheck_item_by_path(&self, path: &Utf8Path) -> bool {
        if !self.inner.selection.remove_by_path(path) {
            return false;
        }
        self.selection_mutated().await;
        true
    }

    /// Returns the current selection snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Stat`] if a selected path no longer exists.
    pub async fn get_selected_files(&self) -> Result<Vec<SelectedItem>, EngineError> {
        self.inner.selection.snapshot().await
    }

    /// Returns `true` if `path` is selected.
    #[must_use]
    pub fn is_selected(&self, path: &Utf8Path) -> bool {
        self.inner.selection.contains(path)
    }

    /// Returns the number of selected paths.
    #[must_use]
    pub fn selection_len(&self) -> usize {
        self.inner.selection.len()
    }

    /// Sets the search query.
    ///
    /// A query shorter than the configured minimum (the empty query in
    /// particular) cancels any active search and reverts the root listing;
    /// a refresh fires immediately. Any other query starts a new generation
    /// in a background task whose results arrive as debounced
    /// [`TreeChange::SearchUpdated`] events followed by one
    /// [`TreeChange::SearchCompleted`].
    ///
    /// Returns the started generation. Must be called inside a tokio
    /// runtime.
    pub fn set_search_query(&self, query: &str) -> Option<u64> {
        if query.chars().count() < self.inner.min_query_len {
            let cancelled = self.inner.search.lock().cancel();
            debug!(?cancelled, "Search cleared");
            self.refresh();
            return None;
        }

        let session = self
            .inner
            .search
            .lock()
            .start(self.inner.root.clone(), query);
        let generation = session.generation();
        tokio::spawn(run_search(
            session,
            self.inner.lister,
            Arc::clone(&self.inner.search),
            self.inner.search_notifier.clone(),
        ));
        Some(generation)
    }

    /// Returns the search lifecycle phase.
    #[must_use]
    pub fn search_phase(&self) -> SearchPhase {
        self.inner.search.lock().phase()
    }

    /// Returns the active query, if any.
    #[must_use]
    pub fn search_query(&self) -> Option<String> {
        self.inner.search.lock().query().map(str::to_owned)
    }

    /// Returns the hits accumulated for the active query.
    #[must_use]
    pub fn search_results(&self) -> Vec<SearchHit> {
        self.inner.search.lock().results().to_vec()
    }

    /// Subscribes to tree-changed events.
    pub fn subscribe_tree_changed(&self) -> Subscription<TreeChange> {
        self.inner.tree_changed.subscribe()
    }

    /// Cancels a tree-changed subscription.
    pub fn unsubscribe_tree_changed(&self, id: SubscriberId) -> bool {
        self.inner.tree_changed.unsubscribe(id)
    }

    /// Subscribes to selection snapshots.
    pub fn subscribe_selection_changed(&self) -> Subscription<Vec<SelectedItem>> {
        self.inner.selection_changed.subscribe()
    }

    /// Cancels a selection-changed subscription.
    pub fn unsubscribe_selection_changed(&self, id: SubscriberId) -> bool {
        self.inner.selection_changed.unsubscribe(id)
    }

    /// Emits [`TreeChange::Refresh`] immediately.
    pub fn refresh(&self) {
        self.inner.tree_changed.emit(TreeChange::Refresh);
    }

    /// Starts watching the root. Every batch of filesystem events, after
    /// `config.refresh_debounce_ms` of quiet, produces one
    /// [`TreeChange::Refresh`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Watch`] if the watcher cannot start.
    pub async fn watch(&self, config: &WatchConfig) -> Result<WatchHandle, EngineError> {
        let filter: Box<dyn FileFilter> = if self.inner.lister.show_hidden() {
            Box::new(AcceptAllFilter)
        } else {
            Box::new(HiddenPathFilter::new(self.inner.root.clone()))
        };
        let mut watcher = FileWatcher::new(&self.inner.root, config, filter).await?;

        let tree_changed = Arc::clone(&self.inner.tree_changed);
        let refresh = Debouncer::new(
            Duration::from_millis(config.refresh_debounce_ms),
            move |()| {
                tree_changed.emit(TreeChange::Refresh);
            },
        );

        let token = CancellationToken::new();
        let task_token = token.clone();
        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    () = task_token.cancelled() => break,
                    batch = watcher.recv() => match batch {
                        Some(batch) => {
                            debug!(summary = ?batch.summary(), "Tree changed on disk");
                            refresh.call(());
                        }
                        None => {
                            warn!("File watcher stopped unexpectedly");
                            break;
                        }
                    },
                }
            }
            watcher.shutdown().await
        });

        Ok(WatchHandle {
            token,
            task: Some(task),
        })
    }

    fn check_state(&self, path: &Utf8Path) -> CheckState {
        CheckState::from_selected(self.inner.selection.contains(path))
    }

    fn active_results(&self) -> Option<Vec<SearchHit>> {
        let search = self.inner.search.lock();
        search.is_active().then(|| search.results().to_vec())
    }

    async fn selection_mutated(&self) {
        match self.inner.selection.snapshot().await {
            Ok(snapshot) => {
                debug!(selected = snapshot.len(), "Broadcasting selection");
                self.inner.selection_changed.emit(snapshot);
            }
            Err(error) => {
                warn!(error = %error, "Skipping selection broadcast");
            }
        }
        self.refresh();
    }
}

/// Drives one search generation to completion or supersession.
async fn run_search(
    session: SearchSession,
    lister: EntryLister,
    search: Arc<Mutex<SearchController>>,
    notifier: Debouncer<TreeChange>,
) {
    let generation = session.generation();
    let mut walker = session.walker(lister);

    while let Some(hit) = walker.next().await {
        let hits = {
            let mut search = search.lock();
            if !search.record(generation, hit) {
                return;
            }
            search.results().len()
        };
        notifier.call(TreeChange::SearchUpdated { generation, hits });
    }

    let results: Arc<[SearchHit]> = {
        let mut search = search.lock();
        if !search.complete(generation) {
            return;
        }
        search.results().into()
    };
    info!(generation, query = %session.query(), hits = results.len(), "Search finished");
    notifier.call(TreeChange::SearchCompleted {
        generation,
        results,
    });
    notifier.flush();
}

/// Keeps a tree watcher running until shut down.
///
/// Dropping the handle stops the watcher without waiting for it.
#[derive(Debug)]
pub struct WatchHandle {
    token: CancellationToken,
    task: Option<JoinHandle<Result<(), WatchError>>>,
}

impl WatchHandle {
    /// Returns `true` while the watcher task is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops the watcher and waits for it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Watch`] if the watcher stopped with an error.
    pub async fn shutdown(mut self) -> Result<(), EngineError> {
        self.token.cancel();
        if let Some(task) = self.task.take() {
            match task.await {
                Ok(result) => result?,
                Err(_join_error) => return Err(WatchError::ChannelClosed.into()),
            }
        }
        Ok(())
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{scenario_tree, write_file};
    use futures_util::StreamExt;
    use tokio::time::timeout;
    use tp_core::EntryKind;

    const WAIT: Duration = Duration::from_secs(5);

    async fn picker(root: &Utf8Path) -> TreePicker {
        let mut config = Config::default();
        config.tree.root_path = root.to_owned();
        config.search.debounce_ms = 20;
        TreePicker::new(&config).await.unwrap()
    }

    fn entry(path: Utf8PathBuf, kind: EntryKind) -> FilesystemEntry {
        FilesystemEntry::new(path, kind)
    }

    /// Waits for the `SearchCompleted` of `generation`, failing on any event
    /// of another generation.
    async fn completed(
        changes: &mut Subscription<TreeChange>,
        generation: u64,
    ) -> Arc<[SearchHit]> {
        loop {
            let change = timeout(WAIT, changes.recv()).await.unwrap().unwrap();
            if let Some(g) = change.generation() {
                assert_eq!(g, generation, "event from a stale generation: {change:?}");
            }
            if let TreeChange::SearchCompleted { results, .. } = change {
                return results;
            }
        }
    }

    #[tokio::test]
    async fn test_invalid_root() {
        let (_dir, root) = scenario_tree();
        let mut config = Config::default();
        config.tree.root_path = root.join("missing");
        let err = TreePicker::new(&config).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidRoot { .. }));

        config.tree.root_path = root.join("a.txt");
        let err = TreePicker::new(&config).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidRoot { .. }));
    }

    #[tokio::test]
    async fn test_children_are_decorated_from_selection() {
        let (_dir, root) = scenario_tree();
        let picker = picker(&root).await;

        let sub = entry(root.join("sub"), EntryKind::Directory);
        picker.toggle_selection_by_ui_item(&sub).await.unwrap();

        let children = picker.get_children(None).await;
        let flags: Vec<(&str, bool)> = children
            .iter()
            .map(|n| (n.entry.name.as_str(), n.checked.is_checked()))
            .collect();
        assert_eq!(flags, vec![("sub", true), ("a.txt", false)]);

        let nested = picker.get_children(Some(&sub)).await;
        assert!(nested.iter().all(|n| n.checked.is_checked()));
        assert_eq!(nested.len(), 2);
    }

    #[tokio::test]
    async fn test_tree_item_rederives_checked_state() {
        let (_dir, root) = scenario_tree();
        let picker = picker(&root).await;
        let children = picker.get_children(None).await;
        let a = children.iter().find(|n| n.entry.name == "a.txt").unwrap();

        assert!(!picker.get_tree_item(a).checked.is_checked());
        picker.toggle_selection_by_ui_item(&a.entry).await.unwrap();
        // `a` was produced before the toggle; the item still reflects it.
        let item = picker.get_tree_item(a);
        assert!(item.checked.is_checked());
        assert_eq!(item.label, "a.txt");
    }

    #[tokio::test]
    async fn test_toggle_broadcasts_snapshot_and_refresh() {
        let (_dir, root) = scenario_tree();
        let picker = picker(&root).await;
        let mut selections = picker.subscribe_selection_changed();
        let mut changes = picker.subscribe_tree_changed();

        let sub = entry(root.join("sub"), EntryKind::Directory);
        let outcome = picker.toggle_selection_by_ui_item(&sub).await.unwrap();
        assert_eq!(outcome, ToggleOutcome::Selected { added: 3 });

        let snapshot = selections.try_recv().unwrap();
        let paths: Vec<Utf8PathBuf> = snapshot.iter().map(|i| i.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                sub.path.clone(),
                root.join("sub/b.txt"),
                root.join("sub/c.txt"),
            ]
        );
        assert!(snapshot[0].is_directory);
        assert_eq!(changes.try_recv(), Some(TreeChange::Refresh));
    }

    #[tokio::test]
    async fn test_uncheck_item_by_path() {
        let (_dir, root) = scenario_tree();
        let picker = picker(&root).await;
        let sub = entry(root.join("sub"), EntryKind::Directory);
        picker.toggle_selection_by_ui_item(&sub).await.unwrap();

        let mut selections = picker.subscribe_selection_changed();
        assert!(picker.uncheck_item_by_path(&root.join("sub/b.txt")).await);
        let snapshot = selections.try_recv().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert!(!picker.is_selected(&root.join("sub/b.txt")));
        assert!(picker.is_selected(&root.join("sub/c.txt")));

        assert!(!picker.uncheck_item_by_path(&root.join("sub/b.txt")).await);
        assert_eq!(selections.try_recv(), None);
    }

    #[tokio::test]
    async fn test_toggle_missing_entry_broadcasts_nothing() {
        let (_dir, root) = scenario_tree();
        let picker = picker(&root).await;
        let mut selections = picker.subscribe_selection_changed();

        let gone = entry(root.join("gone.txt"), EntryKind::File);
        let err = picker.toggle_selection_by_ui_item(&gone).await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
        assert_eq!(selections.try_recv(), None);
        assert_eq!(picker.selection_len(), 0);
    }

    #[tokio::test]
    async fn test_stale_selection_skips_broadcast_but_toggle_succeeds() {
        let (_dir, root) = scenario_tree();
        let picker = picker(&root).await;
        let b = root.join("sub/b.txt");
        picker
            .toggle_selection_by_ui_item(&entry(b.clone(), EntryKind::File))
            .await
            .unwrap();
        std::fs::remove_file(&b).unwrap();

        let mut selections = picker.subscribe_selection_changed();
        picker
            .toggle_selection_by_ui_item(&entry(root.join("a.txt"), EntryKind::File))
            .await
            .unwrap();
        assert!(picker.is_selected(&root.join("a.txt")));
        assert_eq!(selections.try_recv(), None);
        assert!(picker.get_selected_files().await.is_err());
    }

    #[tokio::test]
    async fn test_search_delivers_final_results() {
        let (_dir, root) = scenario_tree();
        let picker = picker(&root).await;
        let mut changes = picker.subscribe_tree_changed();

        let generation = picker.set_search_query("b").unwrap();
        let results = completed(&mut changes, generation).await;

        // "sub" matches too; its non-matching sibling c.txt does not.
        let relative: Vec<&str> = results.iter().map(|h| h.relative_path.as_str()).collect();
        assert_eq!(relative, vec!["sub", "sub/b.txt"]);
        assert_eq!(results[0].kind, EntryKind::Directory);
        assert_eq!(results[1].kind, EntryKind::File);
        assert_eq!(picker.search_phase(), SearchPhase::Completed(generation));

        let children = picker.get_children(None).await;
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].entry.path, root.join("sub"));
        assert_eq!(children[0].context, None);
        assert_eq!(children[1].entry.path, root.join("sub/b.txt"));
        assert_eq!(children[1].context.as_deref(), Some("sub"));
        assert_eq!(
            picker.get_tree_item(&children[1]).description.as_deref(),
            Some("sub")
        );
    }

    #[tokio::test]
    async fn test_search_restart_delivers_only_latest_generation() {
        let (_dir, root) = scenario_tree();
        for name in ["sub/ab.txt", "sub/ba.txt", "bb.txt"] {
            write_file(&root.join(name));
        }
        let picker = picker(&root).await;
        let mut changes = picker.subscribe_tree_changed();

        let first = picker.set_search_query("a").unwrap();
        let second = picker.set_search_query("b").unwrap();
        assert!(second > first);

        let results = completed(&mut changes, second).await;

        let fresh: Vec<SearchHit> = crate::search::SearchWalker::new(
            picker.lister(),
            root.clone(),
            "b",
            CancellationToken::new(),
        )
        .into_stream()
        .collect::<Vec<_>>()
        .await;
        assert_eq!(results.to_vec(), fresh);
        assert_eq!(picker.search_results(), fresh);
    }

    #[tokio::test]
    async fn test_clearing_query_reverts_to_listing() {
        let (_dir, root) = scenario_tree();
        let picker = picker(&root).await;
        let mut changes = picker.subscribe_tree_changed();

        let generation = picker.set_search_query("b").unwrap();
        completed(&mut changes, generation).await;

        assert_eq!(picker.set_search_query(""), None);
        assert_eq!(picker.search_phase(), SearchPhase::Idle);
        assert_eq!(changes.try_recv(), Some(TreeChange::Refresh));

        let names: Vec<String> = picker
            .get_children(None)
            .await
            .into_iter()
            .map(|n| n.entry.name)
            .collect();
        assert_eq!(names, vec!["sub", "a.txt"]);
    }

    #[tokio::test]
    async fn test_search_results_reflect_selection() {
        let (_dir, root) = scenario_tree();
        let picker = picker(&root).await;
        picker
            .toggle_selection_by_ui_item(&entry(root.join("sub"), EntryKind::Directory))
            .await
            .unwrap();
        let mut changes = picker.subscribe_tree_changed();

        let generation = picker.set_search_query("txt").unwrap();
        completed(&mut changes, generation).await;

        let checked: Vec<(String, bool)> = picker
            .get_children(None)
            .await
            .into_iter()
            .map(|n| (n.entry.name, n.checked.is_checked()))
            .collect();
        assert_eq!(
            checked,
            vec![
                ("a.txt".to_owned(), false),
                ("b.txt".to_owned(), true),
                ("c.txt".to_owned(), true),
            ]
        );
    }

    #[tokio::test]
    async fn test_unsubscribe() {
        let (_dir, root) = scenario_tree();
        let picker = picker(&root).await;
        let sub = picker.subscribe_tree_changed();
        assert!(picker.unsubscribe_tree_changed(sub.id()));
        assert!(!picker.unsubscribe_tree_changed(sub.id()));

        let sel = picker.subscribe_selection_changed();
        assert!(picker.unsubscribe_selection_changed(sel.id()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_watch_triggers_refresh() {
        let (_dir, root) = scenario_tree();
        let picker = picker(&root).await;
        let config = WatchConfig {
            debounce_ms: 50,
            refresh_debounce_ms: 50,
            ..WatchConfig::default()
        };
        let handle = picker.watch(&config).await.unwrap();
        assert!(handle.is_running());
        let mut changes = picker.subscribe_tree_changed();

        tokio::time::sleep(Duration::from_millis(200)).await;
        write_file(&root.join("sub/new.txt"));

        let change = timeout(WAIT, changes.recv())
            .await
            .expect("no tree change after a file was created")
            .expect("tree-changed stream closed");
        handle.shutdown().await.unwrap();

        assert_eq!(change, TreeChange::Refresh);
        let names: Vec<String> = picker
            .get_children(Some(&entry(root.join("sub"), EntryKind::Directory)))
            .await
            .into_iter()
            .map(|n| n.entry.name)
            .collect();
        assert!(names.contains(&"new.txt".to_owned()));
    }
}
