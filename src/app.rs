//! Application state management.
//!
//! Manages the loaded videos, selection, search debouncing, pagination and
//! the outcome of in-flight fetches.

use crate::error::FeedError;
use crate::feed::{FeedPage, FeedSession, VideoSummary};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Delay between the last search edit and the deferred load it triggers.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Application UI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    /// Normal list view
    List,
    /// Search input focused
    Search,
}

/// Lifecycle of the current result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedPhase {
    /// A load is in flight and nothing is displayable yet
    Loading,
    /// Videos are loaded and on screen
    Ready,
    /// The load succeeded but returned zero videos
    Empty,
    /// The load failed; the persistent error panel is shown instead of
    /// the list until a retry succeeds
    Failed(String),
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// Videos currently on screen, in source order
    pub videos: Vec<VideoSummary>,
    /// Current result-set phase
    pub phase: FeedPhase,
    /// Currently selected video index
    pub selected_index: usize,
    /// Current UI mode
    pub mode: UiMode,
    /// Live contents of the search input
    pub search_input: String,
    /// Pagination and search state of the browsing session
    pub session: FeedSession,
    /// Whether the Data API is the active source (set once at startup)
    pub api_mode: bool,
    /// When the pending debounced search should fire
    pub debounce_deadline: Option<Instant>,
    /// Guard against overlapping "load more" requests
    pub loading_more: bool,
    /// Status message for the bottom bar
    pub status_message: Option<String>,
    /// In-flight initial/search load, tagged with its generation
    pub load_task: Option<JoinHandle<(u64, Result<FeedPage, FeedError>)>>,
    /// In-flight "load more" fetch, tagged with its generation
    pub more_task: Option<JoinHandle<(u64, Result<FeedPage, FeedError>)>>,
}

impl App {
    /// Create a new application state.
    pub fn new() -> Self {
        Self {
            videos: Vec::new(),
            phase: FeedPhase::Loading,
            selected_index: 0,
            mode: UiMode::List,
            search_input: String::new(),
            session: FeedSession::default(),
            api_mode: false,
            debounce_deadline: None,
            loading_more: false,
            status_message: None,
            load_task: None,
            more_task: None,
        }
    }

    /// Record a search input edit, re-arming the debounce window.
    ///
    /// # Details
    /// Rapid keystrokes keep pushing the deadline out, so a burst of edits
    /// coalesces into a single deferred load.
    pub fn note_search_edit(&mut self, now: Instant) {
        self.debounce_deadline = Some(now + SEARCH_DEBOUNCE);
    }

    /// Take the search term whose debounce window has elapsed, if any.
    ///
    /// # Returns
    /// * `Option<String>` - Term to load now; the deadline is consumed
    pub fn take_due_search(&mut self, now: Instant) -> Option<String> {
        match self.debounce_deadline {
            Some(deadline) if deadline <= now => {
                self.debounce_deadline = None;
                Some(self.search_input.trim().to_string())
            }
            _ => None,
        }
    }

    /// Confirm the search immediately, superseding any pending deferred load.
    ///
    /// # Returns
    /// * `String` - Term to load now
    pub fn confirm_search(&mut self) -> String {
        self.debounce_deadline = None;
        self.search_input.trim().to_string()
    }

    /// Begin a new load: show the loading placeholder and bump the session
    /// generation so any in-flight load becomes stale.
    ///
    /// # Returns
    /// * `u64` - Generation tag for the spawned fetch
    pub fn begin_load(&mut self, term: &str) -> u64 {
        self.phase = FeedPhase::Loading;
        self.videos.clear();
        self.selected_index = 0;
        // Any in-flight "load more" belongs to the superseded listing.
        self.loading_more = false;
        self.more_task = None;
        self.session.begin(term)
    }

    /// Apply the outcome of an initial/search load.
    ///
    /// # Arguments
    /// * `generation` - Tag the fetch was spawned with
    /// * `result` - Fetch outcome
    ///
    /// # Returns
    /// * `bool` - False when the result was stale and dropped
    pub fn apply_load(&mut self, generation: u64, result: Result<FeedPage, FeedError>) -> bool {
        if generation != self.session.generation {
            // A newer load superseded this one.
            return false;
        }

        match result {
            Ok(page) => {
                self.session.next_page_token = page.next_page_token;
                if page.videos.is_empty() {
                    self.videos.clear();
                    self.phase = FeedPhase::Empty;
                } else {
                    self.videos = page.videos;
                    self.phase = FeedPhase::Ready;
                }
                self.selected_index = 0;
            }
            Err(err) => {
                self.videos.clear();
                self.selected_index = 0;
                self.session.next_page_token = None;
                self.phase = FeedPhase::Failed(err.to_string());
            }
        }
        true
    }

    /// Apply the outcome of a "load more" fetch.
    ///
    /// # Arguments
    /// * `generation` - Tag the fetch was spawned with
    /// * `result` - Fetch outcome
    ///
    /// # Returns
    /// * `bool` - False when the result was stale and dropped
    ///
    /// # Details
    /// A result from a superseded listing is dropped: appending it would
    /// leak old rows into the new result set and its token would re-enable
    /// pagination of a listing that is no longer on screen. Otherwise
    /// success appends without discarding what is already there and
    /// updates the pagination token; failure leaves prior content intact
    /// and only posts a status message. The in-flight guard is released on
    /// every non-stale outcome.
    pub fn apply_more(&mut self, generation: u64, result: Result<FeedPage, FeedError>) -> bool {
        if generation != self.session.generation {
            // A newer load superseded this listing.
            return false;
        }
        self.loading_more = false;
        match result {
            Ok(page) => {
                self.session.next_page_token = page.next_page_token;
                if page.videos.is_empty() {
                    self.set_status("No more videos".to_string());
                } else {
                    self.videos.extend(page.videos);
                    self.phase = FeedPhase::Ready;
                }
            }
            Err(err) => {
                self.set_status(format!("Load more failed: {}", err));
            }
        }
        true
    }

    /// Whether a "load more" may be issued right now.
    pub fn can_load_more(&self) -> bool {
        !self.loading_more && self.session.can_load_more(self.api_mode)
    }

    /// Move selection up, wrapping to the bottom.
    pub fn move_up(&mut self) {
        if self.videos.is_empty() {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = self.videos.len() - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    /// Move selection down, wrapping to the top.
    pub fn move_down(&mut self) {
        if self.videos.is_empty() {
            return;
        }
        self.selected_index = (self.selected_index + 1) % self.videos.len();
    }

    /// Get the currently selected video.
    pub fn selected_video(&self) -> Option<&VideoSummary> {
        self.videos.get(self.selected_index)
    }

    /// Set status message.
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with(ids: &[&str]) -> FeedPage {
        FeedPage {
            videos: ids
                .iter()
                .map(|id| {
                    VideoSummary::new(
                        id.to_string(),
                        format!("Video {}", id),
                        String::new(),
                        String::new(),
                        None,
                        "Channel".to_string(),
                    )
                })
                .collect(),
            next_page_token: None,
        }
    }

    #[test]
    fn test_app_new_starts_loading() {
        let app = App::new();
        assert_eq!(app.phase, FeedPhase::Loading);
        assert!(app.videos.is_empty());
        assert_eq!(app.mode, UiMode::List);
    }

    #[test]
    fn test_debounce_coalesces_edits() {
        let mut app = App::new();
        let start = Instant::now();

        app.search_input.push('k');
        app.note_search_edit(start);
        app.search_input.push('y');
        app.note_search_edit(start + Duration::from_millis(100));
        app.search_input.push('o');
        app.note_search_edit(start + Duration::from_millis(200));

        // Window has not elapsed yet.
        assert!(app.take_due_search(start + Duration::from_millis(400)).is_none());

        // One fire, carrying the value present when the window elapsed.
        let term = app.take_due_search(start + Duration::from_millis(700));
        assert_eq!(term.as_deref(), Some("kyo"));

        // Consumed; nothing fires again.
        assert!(app.take_due_search(start + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn test_confirm_supersedes_pending_debounce() {
        let mut app = App::new();
        let start = Instant::now();

        app.search_input = "kyoto".to_string();
        app.note_search_edit(start);

        assert_eq!(app.confirm_search(), "kyoto");
        // The deferred load was cancelled by the immediate one.
        assert!(app.take_due_search(start + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn test_apply_load_success_and_empty() {
        let mut app = App::new();

        let generation = app.begin_load("");
        assert!(app.apply_load(generation, Ok(page_with(&["a", "b"]))));
        assert_eq!(app.phase, FeedPhase::Ready);
        assert_eq!(app.videos.len(), 2);

        let generation = app.begin_load("nothing");
        assert!(app.apply_load(generation, Ok(page_with(&[]))));
        assert_eq!(app.phase, FeedPhase::Empty);
        assert!(app.videos.is_empty());
    }

    #[test]
    fn test_apply_load_failure_clears_videos() {
        let mut app = App::new();
        let generation = app.begin_load("");
        app.apply_load(generation, Ok(page_with(&["a"])));

        let generation = app.begin_load("");
        assert!(app.apply_load(generation, Err(FeedError::Status(500))));
        assert!(app.videos.is_empty());
        assert!(matches!(app.phase, FeedPhase::Failed(_)));
    }

    #[test]
    fn test_stale_load_is_dropped() {
        let mut app = App::new();

        let stale = app.begin_load("old");
        let fresh = app.begin_load("new");

        // The older response resolves last but must not win the render.
        assert!(app.apply_load(fresh, Ok(page_with(&["new1"]))));
        assert!(!app.apply_load(stale, Ok(page_with(&["old1"]))));

        assert_eq!(app.videos.len(), 1);
        assert_eq!(app.videos[0].id, "new1");
    }

    #[test]
    fn test_apply_more_appends() {
        let mut app = App::new();
        let generation = app.begin_load("");
        app.apply_load(
            generation,
            Ok(FeedPage {
                videos: page_with(&["a"]).videos,
                next_page_token: Some("CAwQAA".to_string()),
            }),
        );

        app.loading_more = true;
        assert!(app.apply_more(app.session.generation, Ok(page_with(&["b", "c"]))));

        assert!(!app.loading_more);
        assert_eq!(app.videos.len(), 3);
        assert_eq!(app.phase, FeedPhase::Ready);
        assert!(app.session.next_page_token.is_none());
    }

    #[test]
    fn test_apply_more_failure_keeps_content() {
        let mut app = App::new();
        let generation = app.begin_load("");
        app.apply_load(generation, Ok(page_with(&["a"])));

        app.loading_more = true;
        assert!(app.apply_more(app.session.generation, Err(FeedError::Status(500))));

        assert!(!app.loading_more);
        assert_eq!(app.videos.len(), 1);
        assert_eq!(app.phase, FeedPhase::Ready);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_stale_more_is_dropped() {
        let mut app = App::new();

        // Channel listing with a page token, "load more" goes out.
        let generation = app.begin_load("");
        app.apply_load(
            generation,
            Ok(FeedPage {
                videos: page_with(&["chan1"]).videos,
                next_page_token: Some("CAwQAA".to_string()),
            }),
        );
        let more_generation = app.session.generation;
        app.loading_more = true;

        // A search supersedes the listing before the next page resolves.
        let search_generation = app.begin_load("kyoto");
        assert!(!app.loading_more);
        app.apply_load(search_generation, Ok(page_with(&["kyoto1"])));

        // The old listing's page must not leak into the search results,
        // and its token must not re-enable pagination.
        assert!(!app.apply_more(
            more_generation,
            Ok(FeedPage {
                videos: page_with(&["chan2", "chan3"]).videos,
                next_page_token: Some("NEXT".to_string()),
            }),
        ));

        assert_eq!(app.videos.len(), 1);
        assert_eq!(app.videos[0].id, "kyoto1");
        assert!(app.session.next_page_token.is_none());
        assert_eq!(app.phase, FeedPhase::Ready);
    }

    #[test]
    fn test_can_load_more_guards() {
        let mut app = App::new();
        app.api_mode = true;
        app.session.next_page_token = Some("CAwQAA".to_string());

        assert!(app.can_load_more());

        // Feed mode never paginates.
        app.api_mode = false;
        assert!(!app.can_load_more());
        app.api_mode = true;

        // An active search term disables pagination.
        app.session.search_term = "kyoto".to_string();
        assert!(!app.can_load_more());
        app.session.search_term.clear();

        app.loading_more = true;
        assert!(!app.can_load_more());
    }

    #[test]
    fn test_move_selection_wraps() {
        let mut app = App::new();
        let generation = app.begin_load("");
        app.apply_load(generation, Ok(page_with(&["a", "b", "c"])));

        assert_eq!(app.selected_index, 0);
        app.move_down();
        assert_eq!(app.selected_index, 1);
        app.move_up();
        assert_eq!(app.selected_index, 0);
        app.move_up();
        assert_eq!(app.selected_index, 2);
        app.move_down();
        assert_eq!(app.selected_index, 0);
    }
}
