//! Like membership and like counts.
//!
//! The two collections always move together: [`LikeState::toggle`] is the
//! only local mutation and flips membership and count in one step.

use crate::ids::ContentId;
use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Set of liked ids plus a parallel id -> like count mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LikeState {
    pub liked: BTreeSet<ContentId>,
    pub counts: BTreeMap<ContentId, u32>,
}

/// Result of a toggle, as the UI should display it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LikeToggle {
    pub liked: bool,
    pub count: u32,
}

impl LikeState {
    pub fn is_liked(&self, id: &ContentId) -> bool {
        self.liked.contains(id)
    }

    /// Count to display for `id`, preferring the locally tracked value.
    pub fn count_or(&self, id: &ContentId, fallback: u32) -> u32 {
        self.counts.get(id).copied().unwrap_or(fallback)
    }

    /// Flip membership of `id` and move `current_count` by one in the
    /// matching direction. The count saturates at zero.
    pub fn toggle(&mut self, id: &ContentId, current_count: u32) -> LikeToggle {
        let toggle = if self.liked.remove(id) {
            LikeToggle {
                liked: false,
                count: current_count.saturating_sub(1),
            }
        } else {
            self.liked.insert(id.clone());
            LikeToggle {
                liked: true,
                count: current_count.saturating_add(1),
            }
        };
        self.counts.insert(id.clone(), toggle.count);
        toggle
    }

    /// Replace local state for `id` with an authoritative answer.
    pub fn apply(&mut self, id: &ContentId, toggle: LikeToggle) {
        if toggle.liked {
            self.liked.insert(id.clone());
        } else {
            self.liked.remove(id);
        }
        self.counts.insert(id.clone(), toggle.count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_alternates_membership() {
        let mut state = LikeState::default();
        let id = ContentId::from(3);

        let first = state.toggle(&id, 10);
        assert_eq!(first, LikeToggle { liked: true, count: 11 });
        assert!(state.is_liked(&id));

        let second = state.toggle(&id, first.count);
        assert_eq!(second, LikeToggle { liked: false, count: 10 });
        assert!(!state.is_liked(&id));
        assert_eq!(state.count_or(&id, 0), 10);
    }

    #[test]
    fn unlike_never_goes_negative() {
        let mut state = LikeState::default();
        let id = ContentId::from(1);
        state.liked.insert(id.clone());

        let toggle = state.toggle(&id, 0);
        assert_eq!(toggle, LikeToggle { liked: false, count: 0 });
    }

    #[test]
    fn apply_overrides_local_guess() {
        let mut state = LikeState::default();
        let id = ContentId::from(2);
        state.toggle(&id, 4);
        state.apply(&id, LikeToggle { liked: false, count: 9 });
        assert!(!state.is_liked(&id));
        assert_eq!(state.count_or(&id, 0), 9);
    }
}
