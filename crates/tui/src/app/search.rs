use atlas_core::country::CountryQuery;
use tracing::info;

use super::{App, FetchJob};

// The three card-list entry points: global list, name search, region filter.
impl App {
    pub fn load_all(&mut self) {
        self.dispatch(FetchJob::Cards(CountryQuery::All));
    }

    /// Enter in the search box. An empty submission performs no fetch
    /// and leaves the current view untouched.
    pub fn submit_search(&mut self) {
        let text = self.input.trim().to_string();
        if text.is_empty() {
            return;
        }
        self.record_history_entry(&text);
        self.input.clear();
        self.input_cursor = 0;
        info!(target: "tui", "search: {:?}", text);
        self.dispatch(FetchJob::Cards(CountryQuery::Name(text)));
    }

    pub fn apply_region(&mut self, region: &str) {
        self.region = Some(region.to_string());
        let _ = crate::persist::save_state(self);
        self.dispatch(FetchJob::Cards(CountryQuery::Region(region.to_lowercase())));
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::country;
    use super::super::{App, FetchPayload, View};

    #[test]
    fn empty_submission_performs_no_fetch_and_keeps_the_view() {
        let mut app = App::new();
        app.handle_fetch_done(Ok(FetchPayload::Cards(vec![country("Chad", "TCD")])));

        app.input = "   ".to_string();
        app.input_cursor = 3;
        app.submit_search();

        assert!(app.fetch_rx.is_none());
        assert!(!app.loading);
        assert_eq!(app.view, View::Cards);
        assert_eq!(app.cards.len(), 1);
        assert!(app.input_history.is_empty());
    }

    #[test]
    fn submission_records_input_history_and_clears_the_box() {
        let mut app = App::new();
        std::env::set_var("ATLAS_BASE_URL", "http://127.0.0.1:9");
        app.input = "germany".to_string();
        app.input_cursor = 7;
        app.submit_search();

        assert!(app.input.is_empty());
        assert_eq!(app.input_cursor, 0);
        assert_eq!(app.input_history, ["germany"]);
        assert!(app.loading);
        assert!(app.fetch_rx.is_some());
    }
}
