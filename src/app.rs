use chrono::{Local, NaiveDate};
use ratatui::layout::Rect;

use crate::error::RangeError;
use crate::fetch::{FetchMsg, Fetcher};
use crate::gallery::Gallery;
use crate::modal::Modal;
use crate::range::{self, DateRange};

/// Height of one card in the gallery list, spacer line included.
pub const CARD_HEIGHT: u16 = 4;

/// Longest accepted date input (`YYYY-MM-DD`).
const DATE_INPUT_LEN: usize = 10;

/// Which widget receives key input when the detail view is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    StartDate,
    EndDate,
    Gallery,
}

impl Focus {
    pub fn next(self) -> Focus {
        match self {
            Focus::StartDate => Focus::EndDate,
            Focus::EndDate => Focus::Gallery,
            Focus::Gallery => Focus::StartDate,
        }
    }

    pub fn previous(self) -> Focus {
        match self {
            Focus::StartDate => Focus::Gallery,
            Focus::EndDate => Focus::StartDate,
            Focus::Gallery => Focus::EndDate,
        }
    }
}

/// Screen regions from the last draw, used to hit-test mouse clicks.
#[derive(Debug, Default, Clone, Copy)]
pub struct HitAreas {
    pub start_field: Rect,
    pub end_field: Rect,
    /// Inside of the gallery border, where cards are drawn.
    pub cards: Rect,
    pub modal: Option<Rect>,
    pub modal_close: Option<Rect>,
}

pub(crate) fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

/// All UI state, owned by the main loop.
pub struct App {
    pub gallery: Gallery,
    pub modal: Modal,
    pub focus: Focus,
    /// Focus to restore when the detail view closes.
    focus_before_modal: Option<Focus>,
    pub start_input: String,
    pub end_input: String,
    /// Last status message.
    pub status: String,
    pub status_is_error: bool,
    /// A request is outstanding.
    pub loading: bool,
    /// At least one fetch has completed since startup.
    pub fetched: bool,
    /// Whether the user has requested to quit.
    pub quit: bool,
    pub hit_areas: HitAreas,
    fetcher: Fetcher,
    /// Id of the request whose response we are waiting for.
    pending: Option<u64>,
}

impl App {
    pub fn new(fetcher: Fetcher) -> Self {
        Self {
            gallery: Gallery::new(),
            modal: Modal::default(),
            focus: Focus::StartDate,
            focus_before_modal: None,
            start_input: String::new(),
            end_input: String::new(),
            status: "Enter a start date and press Enter".into(),
            status_is_error: false,
            loading: false,
            fetched: false,
            quit: false,
            hit_areas: HitAreas::default(),
            fetcher,
            pending: None,
        }
    }

    pub fn source_name(&self) -> &str {
        self.fetcher.source().name()
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
        self.status_is_error = false;
    }

    fn set_error(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
        self.status_is_error = true;
    }

    // -- input fields --------------------------------------------------------

    fn focused_input(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::StartDate => Some(&mut self.start_input),
            Focus::EndDate => Some(&mut self.end_input),
            Focus::Gallery => None,
        }
    }

    /// Type into the focused date field.  Only digits and `-` are accepted.
    pub fn push_char(&mut self, c: char) {
        if !(c.is_ascii_digit() || c == '-') {
            return;
        }
        if let Some(input) = self.focused_input() {
            if input.len() < DATE_INPUT_LEN {
                input.push(c);
            }
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(input) = self.focused_input() {
            input.pop();
        }
    }

    // -- fetching ------------------------------------------------------------

    /// Validate the fields and start a fetch, using the local date as today.
    pub fn submit(&mut self) -> bool {
        self.submit_at(Local::now().date_naive())
    }

    /// Validate the fields against `today` and start a fetch.
    ///
    /// Validation errors become status text and no request is made.
    /// Returns whether a request was started.
    pub fn submit_at(&mut self, today: NaiveDate) -> bool {
        let range = match self.resolve_inputs(today) {
            Ok(range) => range,
            Err(e) => {
                log::info!("Rejected date input: {e}");
                self.set_error(e.to_string());
                return false;
            }
        };

        match &range {
            Some(r) => log::info!("Fetching {} to {} ({} days)", r.start(), r.end(), r.days()),
            None => log::info!("Fetching {}", self.source_name()),
        }

        // The previous cards go away right away; the detail view would
        // otherwise show an entry that is no longer in the gallery.
        self.modal.close();
        self.gallery.clear();
        self.loading = true;
        self.set_status("Loading space photos…");
        self.pending = Some(self.fetcher.request(range));
        true
    }

    /// `Ok(None)` means "no range": only valid for sources that don't need one.
    fn resolve_inputs(&self, today: NaiveDate) -> Result<Option<DateRange>, RangeError> {
        let start = range::parse_date_input("start", &self.start_input)?;
        let end = range::parse_date_input("end", &self.end_input)?;
        if start.is_none() && end.is_none() && !self.fetcher.source().requires_range() {
            return Ok(None);
        }
        range::resolve(start, end, today).map(Some)
    }

    /// Apply every finished response.  Call once per tick.
    pub fn drain_fetches(&mut self) {
        while let Some(msg) = self.fetcher.try_recv() {
            self.apply(msg);
        }
    }

    /// Apply one response; responses to superseded requests are dropped.
    pub fn apply(&mut self, msg: FetchMsg) {
        if self.pending != Some(msg.request_id) {
            log::debug!("Discarding stale response to request {}", msg.request_id);
            return;
        }
        self.pending = None;
        self.loading = false;
        self.fetched = true;

        match msg.result {
            Ok(items) if items.is_empty() => {
                self.gallery.clear();
                self.set_status("No items found in the feed.");
            }
            Ok(items) => {
                let count = items.len();
                self.gallery.replace(items);
                self.set_status(format!("Loaded {count} item(s)."));
                if self.focus != Focus::Gallery && !self.modal.is_open() {
                    self.focus = Focus::Gallery;
                }
            }
            Err(e) => {
                self.gallery.clear();
                self.set_error(format!("Error: {e}"));
            }
        }
    }

    /// Text for the gallery area when there are no cards.
    pub fn placeholder(&self) -> &str {
        if self.loading {
            "⟳ Loading space photos…"
        } else if self.status_is_error {
            "Something went wrong while fetching images. See the status bar."
        } else if self.fetched {
            "No items found in the feed."
        } else if self.fetcher.source().requires_range() {
            "Type a start date (YYYY-MM-DD), optionally an end date, then press Enter."
        } else {
            "Press Enter to load the feed, or type a date range to narrow it."
        }
    }

    // -- detail view ---------------------------------------------------------

    /// Open the detail view for the selected card.
    pub fn open_selected(&mut self) -> bool {
        let Some(item) = self.gallery.selected_item().cloned() else {
            return false;
        };
        if !self.modal.is_open() {
            self.focus_before_modal = Some(self.focus);
        }
        self.modal.open(item);
        true
    }

    /// Select card `index` and open it.
    pub fn open_card(&mut self, index: usize) -> bool {
        self.gallery.select(index) && self.open_selected()
    }

    pub fn close_modal(&mut self) {
        if self.modal.close() {
            if let Some(focus) = self.focus_before_modal.take() {
                self.focus = focus;
            }
        }
    }

    // -- mouse hit-testing ---------------------------------------------------

    /// Index of the card drawn at (`column`, `row`), if any.
    pub fn card_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.hit_areas.cards;
        if !contains(area, column, row) {
            return None;
        }
        let index =
            self.gallery.list_state.offset() + usize::from((row - area.y) / CARD_HEIGHT);
        (index < self.gallery.len()).then_some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::tests::{recv_within, MockSource};
    use crate::modal::MediaView;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn two_records() -> Vec<serde_json::Value> {
        vec![
            json!({ "title": "T1", "date": "2024-01-01", "media_type": "image", "url": "u1" }),
            json!({ "title": "T2", "date": "2024-01-02", "media_type": "video", "url": "u2", "thumbnail_url": "t2" }),
        ]
    }

    fn app_with(source: Arc<MockSource>) -> App {
        App::new(Fetcher::new(source))
    }

    /// Wait for the outstanding request and apply it.
    fn settle(app: &mut App) {
        let msg = recv_within(&app.fetcher, Duration::from_secs(5)).expect("worker reply");
        app.apply(msg);
    }

    #[test]
    fn new_app_starts_idle() {
        let app = app_with(Arc::new(MockSource::new(vec![])));
        assert!(app.gallery.is_empty());
        assert!(!app.modal.is_open());
        assert!(!app.loading);
        assert!(!app.quit);
        assert_eq!(app.focus, Focus::StartDate);
    }

    #[test]
    fn end_to_end_two_cards_newest_first_then_modal() {
        let source = Arc::new(MockSource::new(two_records()));
        let mut app = app_with(source.clone());
        app.start_input = "2024-01-01".into();

        assert!(app.submit_at(d(2024, 1, 10)));
        assert!(app.loading);
        settle(&mut app);

        let titles: Vec<_> = app.gallery.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["T2", "T1"]);
        assert_eq!(app.status, "Loaded 2 item(s).");

        assert!(app.open_card(0));
        let item = app.modal.item().unwrap();
        assert_eq!(item.title, "T2");
        assert_eq!(item.display_date(), "2024-01-02");
        assert_eq!(app.modal.media(), Some(&MediaView::Link { url: "u2".into() }));

        let calls = source.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].map(|r| r.days()), Some(9));
    }

    #[test]
    fn invalid_range_makes_no_request() {
        let source = Arc::new(MockSource::new(two_records()));
        let mut app = app_with(source.clone());
        app.start_input = "2024-03-10".into();
        app.end_input = "2024-03-01".into();

        assert!(!app.submit_at(d(2024, 6, 1)));
        assert!(app.status_is_error);
        assert!(app.status.contains("before start date"));
        assert!(!app.loading);
        assert_eq!(source.call_count(), 0);
    }

    #[test]
    fn future_start_makes_no_request() {
        let source = Arc::new(MockSource::new(two_records()));
        let mut app = app_with(source.clone());
        app.start_input = "2024-06-02".into();

        assert!(!app.submit_at(d(2024, 6, 1)));
        assert!(app.status.contains("in the future"));
        assert_eq!(source.call_count(), 0);
    }

    #[test]
    fn missing_start_is_reported_for_api_sources() {
        let source = Arc::new(MockSource::new(two_records()));
        let mut app = app_with(source.clone());

        assert!(!app.submit_at(d(2024, 6, 1)));
        assert_eq!(app.status, RangeError::MissingInput.to_string());
        assert_eq!(source.call_count(), 0);
    }

    #[test]
    fn static_source_fetches_without_range() {
        let mut source = MockSource::new(two_records());
        source.needs_range = false;
        let source = Arc::new(source);
        let mut app = app_with(source.clone());

        assert!(app.submit_at(d(2024, 6, 1)));
        settle(&mut app);
        assert_eq!(app.gallery.len(), 2);
        assert_eq!(*source.calls.lock().unwrap(), vec![None]);
    }

    #[test]
    fn empty_result_is_a_distinct_state() {
        let mut app = app_with(Arc::new(MockSource::new(vec![])));
        app.start_input = "2024-01-01".into();
        app.submit_at(d(2024, 6, 1));
        settle(&mut app);

        assert!(app.gallery.is_empty());
        assert!(!app.status_is_error);
        assert_eq!(app.placeholder(), "No items found in the feed.");
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut app = app_with(Arc::new(MockSource::new(two_records())));
        app.start_input = "2024-01-01".into();
        app.submit_at(d(2024, 6, 1));
        app.submit_at(d(2024, 6, 1));
        let latest = app.pending.unwrap();

        app.apply(FetchMsg {
            request_id: latest - 1,
            result: Ok(vec![]),
        });
        assert!(app.loading, "stale reply must not end loading");

        app.apply(FetchMsg {
            request_id: latest,
            result: Ok(crate::source::normalize(two_records())),
        });
        assert!(!app.loading);
        assert_eq!(app.gallery.len(), 2);
    }

    #[test]
    fn fetch_error_keeps_ui_interactive() {
        let mut app = app_with(Arc::new(MockSource::new(vec![])));
        app.start_input = "2024-01-01".into();
        app.submit_at(d(2024, 6, 1));
        let id = app.pending.unwrap();
        app.apply(FetchMsg {
            request_id: id,
            result: Err(crate::error::FetchError::Parse("expected a JSON array".into())),
        });

        assert!(app.status_is_error);
        assert!(app.status.starts_with("Error:"));
        assert!(!app.loading);
        // A new attempt is still possible.
        assert!(app.submit_at(d(2024, 6, 1)));
    }

    #[test]
    fn refetch_replaces_cards_and_closes_modal() {
        let mut app = app_with(Arc::new(MockSource::new(two_records())));
        app.start_input = "2024-01-01".into();
        app.submit_at(d(2024, 6, 1));
        settle(&mut app);
        app.open_selected();
        assert!(app.modal.is_open());

        app.submit_at(d(2024, 6, 1));
        assert!(!app.modal.is_open());
        assert!(app.gallery.is_empty(), "old cards are gone while loading");
        assert!(!app.open_card(0));
    }

    #[test]
    fn close_restores_previous_focus() {
        let mut app = app_with(Arc::new(MockSource::new(two_records())));
        app.start_input = "2024-01-01".into();
        app.submit_at(d(2024, 6, 1));
        settle(&mut app);
        assert_eq!(app.focus, Focus::Gallery);

        app.open_card(1);
        app.open_card(0);
        app.close_modal();
        assert_eq!(app.focus, Focus::Gallery);
        assert!(app.modal.media().is_none());
    }

    #[test]
    fn date_fields_accept_only_date_characters() {
        let mut app = app_with(Arc::new(MockSource::new(vec![])));
        for c in "2024-0x1-01999".chars() {
            app.push_char(c);
        }
        assert_eq!(app.start_input, "2024-01-01");

        app.focus = Focus::EndDate;
        app.push_char('7');
        app.pop_char();
        app.pop_char();
        assert_eq!(app.end_input, "");

        app.focus = Focus::Gallery;
        app.push_char('1');
        assert_eq!(app.start_input, "2024-01-01");
    }

    #[test]
    fn focus_cycles() {
        assert_eq!(Focus::StartDate.next(), Focus::EndDate);
        assert_eq!(Focus::Gallery.next(), Focus::StartDate);
        assert_eq!(Focus::StartDate.previous(), Focus::Gallery);
    }

    #[test]
    fn card_at_maps_rows_to_cards() {
        let mut app = app_with(Arc::new(MockSource::new(vec![])));
        app.gallery.replace(crate::source::normalize(two_records()));
        app.hit_areas.cards = Rect::new(1, 4, 60, 12);

        assert_eq!(app.card_at(5, 4), Some(0));
        assert_eq!(app.card_at(5, 7), Some(0));
        assert_eq!(app.card_at(5, 8), Some(1));
        assert_eq!(app.card_at(5, 12), None, "below the last card");
        assert_eq!(app.card_at(0, 4), None, "outside the list");
    }
}
