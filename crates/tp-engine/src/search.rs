//! Incremental, cancellable name search.
//!
//! # Traversal order
//!
//! The walker is depth-first with current-level-first expansion: at every
//! directory it first yields all matching entries of that directory (in
//! lister order), then descends into each subdirectory (in lister order)
//! before returning to the parent's remaining siblings.
//!
//! ```text
//! root/                      query "a" yields, in order:
//! ├── ab/                      1. ab
//! │   └── a1                   2. za.txt
//! ├── x/                       3. ab/a1
//! │   ├── y/                   4. x/xa.txt
//! │   │   └── ya.txt           5. x/y/ya.txt
//! │   └── xa.txt
//! └── za.txt
//! ```
//!
//! Directories are yielded when their name matches and are always descended.
//!
//! # Generations
//!
//! ```text
//! Idle ──start──► Searching(g) ──complete──► Completed(g)
//!                     │
//!                     └──start/cancel──► Superseded(g)
//! ```
//!
//! Every [`SearchController::start`] allocates a new generation and cancels
//! the previous session's token. The walker only *reads* its token: it checks
//! it before each yield and before each directory listing, so a superseded
//! walker stops without issuing new I/O. Results recorded for anything but
//! the current generation are rejected.

use camino::{Utf8Path, Utf8PathBuf};
use futures_util::Stream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use tp_core::{FilesystemEntry, SearchHit, SearchPhase};

use crate::lister::{EntryLister, LoopGuard};

/// Returns `true` if `name` contains `query`, ignoring case.
///
/// # Examples
///
/// ```
/// use tp_engine::matches;
///
/// assert!(matches("b.txt", "B"));
/// assert!(!matches("a.txt", "b"));
/// ```
#[must_use]
pub fn matches(name: &str, query: &str) -> bool {
    name.to_lowercase().contains(&query.to_lowercase())
}

/// One directory being walked.
#[derive(Debug)]
struct Frame {
    /// Path of this directory relative to the search root.
    relative: Utf8PathBuf,
    entries: Vec<FilesystemEntry>,
    /// Next entry to test against the query.
    next_match: usize,
    /// Next entry to consider for descent.
    next_descend: usize,
}

impl Frame {
    fn new(relative: Utf8PathBuf, entries: Vec<FilesystemEntry>) -> Self {
        Self {
            relative,
            entries,
            next_match: 0,
            next_descend: 0,
        }
    }
}

enum Step {
    Yield(SearchHit),
    Descend {
        dir: Utf8PathBuf,
        relative: Utf8PathBuf,
    },
    Done,
}

/// A lazily pulled, finite sequence of [`SearchHit`]s.
///
/// Not restartable: once [`next`](Self::next) returns `None` it keeps
/// returning `None`.
///
/// # Examples
///
/// ```no_run
/// use tp_engine::{EntryLister, SearchWalker};
/// use tokio_util::sync::CancellationToken;
/// use camino::Utf8PathBuf;
///
/// # async fn example() {
/// let token = CancellationToken::new();
/// let mut walker = SearchWalker::new(
///     EntryLister::new(),
///     Utf8PathBuf::from("/srv/tree"),
///     "readme",
///     token.clone(),
/// );
/// while let Some(hit) = walker.next().await {
///     println!("{}", hit.relative_path);
/// }
/// # }
/// ```
#[derive(Debug)]
pub struct SearchWalker {
    lister: EntryLister,
    root: Utf8PathBuf,
    /// Lowercased query.
    needle: String,
    token: CancellationToken,
    stack: Vec<Frame>,
    guard: LoopGuard,
    started: bool,
    finished: bool,
}

impl SearchWalker {
    /// Creates a walker over `root` for `query`.
    #[must_use]
    pub fn new(
        lister: EntryLister,
        root: Utf8PathBuf,
        query: &str,
        token: CancellationToken,
    ) -> Self {
        Self {
            lister,
            root,
            needle: query.to_lowercase(),
            token,
            stack: Vec::new(),
            guard: LoopGuard::default(),
            started: false,
            finished: false,
        }
    }

    /// Returns the search root.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns `true` once the walker has stopped for good.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Pulls the next hit.
    ///
    /// Returns `None` when the tree is exhausted or the token was cancelled.
    pub async fn next(&mut self) -> Option<SearchHit> {
        loop {
            if self.finished {
                return None;
            }
            if self.token.is_cancelled() {
                debug!(root = %self.root, "Search walker cancelled");
                self.finish();
                return None;
            }

            match self.step() {
                Step::Yield(hit) => return Some(hit),
                Step::Descend { dir, relative } => {
                    if !self.guard.enter(&dir).await {
                        continue;
                    }
                    if self.token.is_cancelled() {
                        continue;
                    }
                    let entries = self.lister.list(&dir).await;
                    self.stack.push(Frame::new(relative, entries));
                }
                Step::Done => {
                    self.finish();
                    return None;
                }
            }
        }
    }

    /// Adapts the walker into a [`Stream`].
    pub fn into_stream(self) -> impl Stream<Item = SearchHit> {
        futures_util::stream::unfold(self, |mut walker| async move {
            let hit = walker.next().await?;
            Some((hit, walker))
        })
    }

    /// Advances the traversal without I/O.
    fn step(&mut self) -> Step {
        if !self.started {
            self.started = true;
            return Step::Descend {
                dir: self.root.clone(),
                relative: Utf8PathBuf::new(),
            };
        }

        while let Some(frame) = self.stack.last_mut() {
            while let Some(entry) = frame.entries.get(frame.next_match) {
                frame.next_match += 1;
                if entry.name.to_lowercase().contains(&self.needle) {
                    return Step::Yield(SearchHit::new(
                        frame.relative.join(&entry.name),
                        entry.path.clone(),
                        entry.kind,
                    ));
                }
            }

            while let Some(entry) = frame.entries.get(frame.next_descend) {
                frame.next_descend += 1;
                if entry.is_dir() {
                    return Step::Descend {
                        dir: entry.path.clone(),
                        relative: frame.relative.join(&entry.name),
                    };
                }
            }

            self.stack.pop();
        }

        Step::Done
    }

    fn finish(&mut self) {
        self.finished = true;
        self.stack.clear();
    }
}

/// One search run: a generation, its query and its cancellation token.
#[derive(Debug, Clone)]
pub struct SearchSession {
    generation: u64,
    query: String,
    root: Utf8PathBuf,
    token: CancellationToken,
}

impl SearchSession {
    /// Returns the generation number.
    #[inline]
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the query.
    #[inline]
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns the search root.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    /// Returns `true` once a newer generation (or a clear) superseded this one.
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Creates the walker for this session. The walker observes the
    /// session's token but cannot cancel it.
    #[must_use]
    pub fn walker(&self, lister: EntryLister) -> SearchWalker {
        SearchWalker::new(lister, self.root.clone(), &self.query, self.token.clone())
    }
}

/// Owns the generation counter and the result buffer of the active search.
#[derive(Debug, Default)]
pub struct SearchController {
    generation: u64,
    active: Option<SearchSession>,
    results: Vec<SearchHit>,
    phase: SearchPhase,
    /// Terminal phase of the most recently retired generation.
    previous: SearchPhase,
}

impl SearchController {
    /// Creates an idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation for `query` under `root`.
    ///
    /// Cancels the previous session and clears the result buffer.
    pub fn start(&mut self, root: Utf8PathBuf, query: &str) -> SearchSession {
        self.retire();

        self.generation += 1;
        let session = SearchSession {
            generation: self.generation,
            query: query.to_owned(),
            root,
            token: CancellationToken::new(),
        };
        self.phase = SearchPhase::Searching(self.generation);
        self.active = Some(session.clone());

        debug!(generation = self.generation, query = %query, "Search started");
        session
    }

    /// Cancels the active session, if any, and returns to idle.
    ///
    /// Returns the cancelled generation.
    pub fn cancel(&mut self) -> Option<u64> {
        let cancelled = self.retire();
        self.phase = SearchPhase::Idle;
        cancelled
    }

    fn retire(&mut self) -> Option<u64> {
        let session = self.active.take()?;
        session.token.cancel();
        self.results.clear();
        self.previous = match self.phase {
            SearchPhase::Searching(g) => {
                debug!(generation = g, "Search superseded");
                SearchPhase::Superseded(g)
            }
            other => other,
        };
        Some(session.generation)
    }

    /// Appends `hit` if `generation` is still searching.
    pub fn record(&mut self, generation: u64, hit: SearchHit) -> bool {
        if self.phase != SearchPhase::Searching(generation) {
            return false;
        }
        self.results.push(hit);
        true
    }

    /// Marks `generation` completed if it is still searching.
    pub fn complete(&mut self, generation: u64) -> bool {
        if self.phase != SearchPhase::Searching(generation) {
            return false;
        }
        self.phase = SearchPhase::Completed(generation);
        debug!(generation, hits = self.results.len(), "Search completed");
        true
    }

    /// Returns `true` if `generation` is the active session.
    #[must_use]
    pub fn is_current(&self, generation: u64) -> bool {
        self.active
            .as_ref()
            .is_some_and(|session| session.generation == generation)
    }

    /// Returns `true` while a query is set (searching or completed).
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Returns the hits recorded for the active generation.
    #[must_use]
    pub fn results(&self) -> &[SearchHit] {
        &self.results
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn phase(&self) -> SearchPhase {
        self.phase
    }

    /// Returns how the previous generation ended.
    #[must_use]
    pub const fn previous_phase(&self) -> SearchPhase {
        self.previous
    }

    /// Returns the active query.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.active.as_ref().map(SearchSession::query)
    }

    /// Returns the most recently allocated generation (0 before any search).
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }
}
