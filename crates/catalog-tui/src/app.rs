use catalog_core::{ProductCard, SortKey, StatusFilter};
use catalog_pipeline::{CatalogPipeline, CatalogTransport, Phase};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Searching,
    ShowingHelp,
}

pub struct App<T> {
    pub pipeline: CatalogPipeline<T>,
    pub input_mode: InputMode,
    pub selected: usize,
    pub status_message: Option<String>,
    phase: watch::Receiver<Phase>,
    fetch_pending: bool,
}

impl<T: CatalogTransport> App<T> {
    /// The first draw shows the loading view; the catalog is fetched right after
    pub fn new(pipeline: CatalogPipeline<T>) -> Self {
        let phase = pipeline.subscribe();
        Self {
            pipeline,
            input_mode: InputMode::Normal,
            selected: 0,
            status_message: None,
            phase,
            fetch_pending: true,
        }
    }

    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    pub fn is_loading(&self) -> bool {
        self.fetch_pending || self.phase() == Phase::Loading
    }

    pub fn fetch_pending(&self) -> bool {
        self.fetch_pending
    }

    /// Schedule a fetch for the next loop turn, after the loading view is drawn
    pub fn request_refresh(&mut self) {
        self.fetch_pending = true;
        self.status_message = None;
    }

    pub async fn run_pending_fetch(&mut self) {
        if !self.fetch_pending {
            return;
        }
        self.fetch_pending = false;

        let served_from_cache = self.pipeline.has_fresh_cache();
        if self.pipeline.retry().await.is_some() {
            self.clamp_selection();
            if served_from_cache {
                self.status_message = Some("Loaded from cache".to_string());
            }
        }
    }

    pub fn next(&mut self) {
        let len = self.pipeline.view().cards.len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1) % len;
    }

    pub fn previous(&mut self) {
        let len = self.pipeline.view().cards.len();
        if len == 0 {
            return;
        }
        self.selected = if self.selected == 0 {
            len - 1
        } else {
            self.selected - 1
        };
    }

    pub fn selected_card(&self) -> Option<&ProductCard> {
        self.pipeline.view().cards.get(self.selected)
    }

    fn clamp_selection(&mut self) {
        let len = self.pipeline.view().cards.len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Searching;
    }

    /// Leave search mode, keeping the current text
    pub fn finish_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Leave search mode and clear the search box
    pub fn cancel_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.pipeline.on_search_changed(String::new());
        self.selected = 0;
    }

    pub fn input_char(&mut self, c: char) {
        let mut search = self.pipeline.filters().search.clone();
        search.push(c);
        self.pipeline.on_search_changed(search);
        self.selected = 0;
    }

    pub fn input_backspace(&mut self) {
        let mut search = self.pipeline.filters().search.clone();
        search.pop();
        self.pipeline.on_search_changed(search);
        self.selected = 0;
    }

    pub fn set_filter(&mut self, status: StatusFilter) {
        self.pipeline.set_status_filter(status);
        self.selected = 0;
    }

    pub fn cycle_sort(&mut self) {
        let sort: SortKey = self.pipeline.filters().sort.next();
        self.pipeline.set_sort(sort);
        self.selected = 0;
        self.status_message = Some(format!("Sorted by {}", sort));
    }

    pub fn reset_filters(&mut self) {
        self.pipeline.reset_filters();
        self.selected = 0;
        self.status_message = Some("Filters reset".to_string());
    }

    /// Put the selected card's enquiry link in the footer
    pub fn show_contact(&mut self) {
        self.status_message = self
            .selected_card()
            .map(|card| card.contact_url.clone())
            .or_else(|| Some("Nothing selected".to_string()));
    }

    pub fn toggle_help(&mut self) {
        self.input_mode = match self.input_mode {
            InputMode::ShowingHelp => InputMode::Normal,
            _ => InputMode::ShowingHelp,
        };
    }
}
