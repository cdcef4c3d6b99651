use super::{App, FetchJob, View, CARD_LINES};

// Detail view: card/border drill-down and the back traversal.
impl App {
    pub fn open_selected_card(&mut self) {
        if let Some(c) = self.cards.get(self.selected_card) {
            self.dispatch(FetchJob::Detail {
                code: c.cca3.clone(),
            });
        }
    }

    pub fn open_selected_border(&mut self) {
        let code = self
            .nav
            .peek()
            .and_then(|e| e.borders.get(self.selected_border))
            .map(|b| b.code.clone());
        if let Some(code) = code {
            self.dispatch(FetchJob::Detail { code });
        }
    }

    pub fn border_select_left(&mut self) {
        if self.selected_border > 0 {
            self.selected_border -= 1;
        }
    }

    pub fn border_select_right(&mut self) {
        let n = self.nav.peek().map(|e| e.borders.len()).unwrap_or(0);
        if self.selected_border + 1 < n {
            self.selected_border += 1;
        }
    }

    /// Back pops the entry being shown; the previous one re-renders
    /// without a re-fetch. Popping the last entry returns to the
    /// all-countries card view, the closest thing to a page reload.
    pub fn go_back(&mut self) {
        self.nav.pop();
        self.selected_border = 0;
        if self.nav.is_empty() {
            self.view = View::Cards;
            self.load_all();
        } else {
            self.view = View::Detail;
        }
        self.dirty = true;
    }

    // Card-list geometry. The main panel shows whole cards only, so
    // scrolling is in card units rather than lines.
    pub fn cards_inner_height(&self) -> usize {
        self.main_area
            .map(|a| a.height.saturating_sub(2) as usize)
            .unwrap_or(0)
    }

    pub fn cards_per_page(&self) -> usize {
        self.cards_inner_height() / CARD_LINES
    }

    pub fn cards_max_scroll(&self) -> usize {
        let page = self.cards_per_page();
        if page == 0 {
            0
        } else {
            self.cards.len().saturating_sub(page)
        }
    }

    pub fn card_select_up(&mut self) {
        if self.selected_card > 0 {
            self.selected_card -= 1;
        }
        self.ensure_card_visible();
    }

    pub fn card_select_down(&mut self) {
        if self.selected_card + 1 < self.cards.len() {
            self.selected_card += 1;
        }
        self.ensure_card_visible();
    }

    pub fn ensure_card_visible(&mut self) {
        let page = self.cards_per_page();
        if page == 0 {
            return;
        }
        let start = self.cards_scroll;
        let end = start + page.saturating_sub(1);
        if self.selected_card < start {
            self.cards_scroll = self.selected_card;
        } else if self.selected_card > end {
            self.cards_scroll = self.selected_card + 1 - page;
        }
        self.cards_scroll = self.cards_scroll.min(self.cards_max_scroll());
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::entry;
    use super::super::{App, FetchPayload, View};
    use ratatui::layout::Rect;

    #[test]
    fn back_returns_to_the_previous_country_not_the_pushed_one() {
        let mut app = App::new();
        app.handle_fetch_done(Ok(FetchPayload::Detail(Box::new(entry(
            "Germany",
            "DEU",
            &[("FRA", "France")],
        )))));
        app.handle_fetch_done(Ok(FetchPayload::Detail(Box::new(entry(
            "France",
            "FRA",
            &[("DEU", "Germany")],
        )))));
        assert_eq!(app.view, View::Detail);
        assert_eq!(app.nav.peek().unwrap().country.cca3, "FRA");

        app.go_back();
        assert_eq!(app.view, View::Detail);
        assert_eq!(app.nav.peek().unwrap().country.cca3, "DEU");
        // No re-fetch: the previous entry renders from the stack.
        assert!(app.fetch_rx.is_none());
    }

    #[test]
    fn back_past_the_last_entry_reloads_the_all_countries_view() {
        std::env::set_var("ATLAS_BASE_URL", "http://127.0.0.1:9");
        let mut app = App::new();
        app.handle_fetch_done(Ok(FetchPayload::Detail(Box::new(entry(
            "Fiji",
            "FJI",
            &[],
        )))));

        app.go_back();
        assert!(app.nav.is_empty());
        assert_eq!(app.view, View::Cards);
        assert!(app.loading);
        assert!(app.fetch_rx.is_some());
    }

    #[test]
    fn border_selection_is_clamped() {
        let mut app = App::new();
        app.handle_fetch_done(Ok(FetchPayload::Detail(Box::new(entry(
            "Germany",
            "DEU",
            &[("FRA", "France"), ("POL", "Poland")],
        )))));
        assert_eq!(app.selected_border, 0);
        app.border_select_left();
        assert_eq!(app.selected_border, 0);
        app.border_select_right();
        assert_eq!(app.selected_border, 1);
        app.border_select_right();
        assert_eq!(app.selected_border, 1);
    }

    #[test]
    fn card_scroll_follows_the_selection() {
        let mut app = App::new();
        let cards = (0..12)
            .map(|i| super::super::test_support::country(&format!("Country {i:02}"), "XXX"))
            .collect();
        app.handle_fetch_done(Ok(FetchPayload::Cards(cards)));
        // 18 inner lines -> 4 visible cards of 4 lines each.
        app.main_area = Some(Rect::new(0, 0, 80, 20));

        for _ in 0..6 {
            app.card_select_down();
        }
        assert_eq!(app.selected_card, 6);
        assert_eq!(app.cards_scroll, 3);

        for _ in 0..6 {
            app.card_select_up();
        }
        assert_eq!(app.selected_card, 0);
        assert_eq!(app.cards_scroll, 0);
    }
}
