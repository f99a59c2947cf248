//! View state and the reducers that own it.
//!
//! Every change to [`ViewState`] is an [`Action`] applied through
//! [`ViewState::apply`], which routes it to the single reducer for the
//! entity it touches. Call sites never patch slices of the state directly.

use crate::playback::PlayRequest;
use formation_model::{
    ContentId, ContentItem, LikeState, LikeToggle, Session, WatchRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Login,
    Browsing,
    Searching,
    Theater,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub mode: ViewMode,
    pub session: Option<Session>,
    pub catalog: Vec<ContentItem>,
    pub likes: LikeState,
    pub history: Vec<WatchRecord>,
    pub search_query: String,
    pub search_results: Vec<ContentItem>,
    /// Item shown in the detail modal
    pub selected: Option<ContentId>,
    pub now_playing: Option<PlayRequest>,
    pub carousel_index: usize,
    pub login_error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SessionStarted(Session),
    SessionEnded { notice: Option<String> },
    LoginFailed(String),
    Notice(Option<String>),
    CatalogLoaded(Vec<ContentItem>),
    LikesLoaded(LikeState),
    LikeApplied { id: ContentId, toggle: LikeToggle },
    HistoryLoaded(Vec<WatchRecord>),
    ProgressSaved(WatchRecord),
    /// `None` results clear the search and leave search mode
    SearchChanged {
        query: String,
        results: Option<Vec<ContentItem>>,
    },
    DetailOpened(ContentId),
    DetailClosed,
    TheaterOpened(PlayRequest),
    TheaterClosed,
    CarouselAdvanced,
}

impl ViewState {
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SessionStarted(_)
            | Action::SessionEnded { .. }
            | Action::LoginFailed(_)
            | Action::Notice(_) => reduce_session(self, action),
            Action::CatalogLoaded(_) | Action::CarouselAdvanced => {
                reduce_catalog(self, action)
            }
            Action::LikesLoaded(_) | Action::LikeApplied { .. } => {
                reduce_likes(self, action)
            }
            Action::HistoryLoaded(_) | Action::ProgressSaved(_) => {
                reduce_history(self, action)
            }
            Action::SearchChanged { .. } => reduce_search(self, action),
            Action::DetailOpened(_)
            | Action::DetailClosed
            | Action::TheaterOpened(_)
            | Action::TheaterClosed => reduce_view(self, action),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn item(&self, id: &ContentId) -> Option<&ContentItem> {
        self.catalog.iter().find(|item| &item.id == id)
    }

    pub fn selected_item(&self) -> Option<&ContentItem> {
        self.selected.as_ref().and_then(|id| self.item(id))
    }

    pub fn hero_item(&self) -> Option<&ContentItem> {
        self.catalog.get(self.carousel_index)
    }

    /// Like count as displayed: local/remote state first, then the
    /// catalog's own count.
    pub fn like_count(&self, id: &ContentId) -> u32 {
        let fallback = self.item(id).map_or(0, |item| item.like_count);
        self.likes.count_or(id, fallback)
    }

    /// Mode to fall back to when leaving theater.
    fn browse_mode(&self) -> ViewMode {
        if self.search_query.trim().is_empty() {
            ViewMode::Browsing
        } else {
            ViewMode::Searching
        }
    }
}

fn reduce_session(state: &mut ViewState, action: Action) {
    match action {
        Action::SessionStarted(session) => {
            state.session = Some(session);
            state.mode = ViewMode::Browsing;
            state.login_error = None;
            state.notice = None;
        }
        Action::SessionEnded { notice } => {
            // Catalog is not per-user and survives
            let catalog = std::mem::take(&mut state.catalog);
            *state = ViewState {
                catalog,
                notice,
                ..ViewState::default()
            };
        }
        Action::LoginFailed(message) => {
            state.login_error = Some(message);
        }
        Action::Notice(notice) => {
            state.notice = notice;
        }
        _ => {}
    }
}

fn reduce_catalog(state: &mut ViewState, action: Action) {
    match action {
        Action::CatalogLoaded(items) => {
            state.catalog = items;
            if state.carousel_index >= state.catalog.len() {
                state.carousel_index = 0;
            }
        }
        Action::CarouselAdvanced => {
            let suspended =
                matches!(state.mode, ViewMode::Theater | ViewMode::Searching);
            if !suspended && !state.catalog.is_empty() {
                state.carousel_index =
                    (state.carousel_index + 1) % state.catalog.len();
            }
        }
        _ => {}
    }
}

fn reduce_likes(state: &mut ViewState, action: Action) {
    match action {
        Action::LikesLoaded(likes) => state.likes = likes,
        Action::LikeApplied { id, toggle } => state.likes.apply(&id, toggle),
        _ => {}
    }
}

fn reduce_history(state: &mut ViewState, action: Action) {
    match action {
        Action::HistoryLoaded(records) => state.history = records,
        Action::ProgressSaved(record) => {
            match state
                .history
                .iter_mut()
                .find(|r| r.content_id == record.content_id)
            {
                Some(existing) => *existing = record,
                None => state.history.push(record),
            }
        }
        _ => {}
    }
}

fn reduce_search(state: &mut ViewState, action: Action) {
    let Action::SearchChanged { query, results } = action else {
        return;
    };
    match results {
        Some(results) => {
            state.search_query = query;
            state.search_results = results;
            if state.mode != ViewMode::Theater {
                state.mode = ViewMode::Searching;
            }
        }
        None => {
            state.search_query.clear();
            state.search_results.clear();
            if state.mode == ViewMode::Searching {
                state.mode = ViewMode::Browsing;
            }
        }
    }
}

fn reduce_view(state: &mut ViewState, action: Action) {
    match action {
        Action::DetailOpened(id) => state.selected = Some(id),
        Action::DetailClosed => state.selected = None,
        Action::TheaterOpened(request) => {
            state.selected = None;
            state.now_playing = Some(request);
            state.mode = ViewMode::Theater;
        }
        Action::TheaterClosed => {
            state.now_playing = None;
            if state.mode == ViewMode::Theater {
                state.mode = state.browse_mode();
            }
        }
        _ => {}
    }
}
