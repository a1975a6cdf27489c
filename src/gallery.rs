//! The card list: ordering, selection and activation.
//!
//! A `Gallery` holds the items of the last successful fetch.  Replacing it
//! drops every previous card and the selection with it, so nothing from an
//! earlier fetch can be activated afterwards.

use ratatui::widgets::ListState;

use crate::source::FeedItem;

/// Longest explanation shown on a card; the detail view shows all of it.
pub const EXCERPT_CHARS: usize = 260;

#[derive(Debug, Default)]
pub struct Gallery {
    /// Newest first.
    items: Vec<FeedItem>,
    /// List selection state for scrolling.
    pub list_state: ListState,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all cards.  Sorted newest first; the sort is stable so
    /// same-day entries keep the feed's order.
    pub fn replace(&mut self, mut items: Vec<FeedItem>) {
        items.sort();
        self.items = items;
        self.list_state = ListState::default();
        self.select_first();
    }

    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    /// Cards and selection, borrowed together for stateful rendering.
    pub fn items_and_state(&mut self) -> (&[FeedItem], &mut ListState) {
        (&self.items, &mut self.list_state)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected_item(&self) -> Option<&FeedItem> {
        self.list_state.selected().and_then(|i| self.items.get(i))
    }

    /// Select card `index`; `false` if there is no such card.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.list_state.select(Some(index));
            true
        } else {
            false
        }
    }

    // -- navigation ----------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(self.items.len() - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if !self.items.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        if !self.items.is_empty() {
            self.list_state.select(Some(self.items.len() - 1));
        }
    }
}

/// Shorten `text` to at most `max` characters, marking the cut with `…`.
pub fn excerpt(text: &str, max: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}…", cut.trim_end())
}
