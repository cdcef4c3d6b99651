use atlas_core::country::{
    BorderLink, Country, CountryQuery, CountrySource as _, LookupError, REGIONS,
};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use providers::restcountries::{config::RestCountriesConfig, RestCountriesClient};
use ratatui::layout::Rect;
use tracing::{error, info};
use unicode_segmentation::UnicodeSegmentation;

pub mod detail;
pub mod history;
pub mod input;
pub mod search;

pub use history::NavStack;

use crate::strings::ERROR_NOT_FOUND;
use crate::theme::ThemeKind;

/// Lines one card occupies in the list view, separator included.
pub const CARD_LINES: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Cards,
    Detail,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Input,
    Main,
}

/// One fully resolved detail entry. The navigation stack stores these,
/// so going back never re-fetches borders.
#[derive(Clone, Debug)]
pub struct DetailEntry {
    pub country: Country,
    pub borders: Vec<BorderLink>,
}

#[derive(Clone, Debug)]
pub enum FetchJob {
    Cards(CountryQuery),
    Detail { code: String },
}

pub enum FetchPayload {
    Cards(Vec<Country>),
    Detail(Box<DetailEntry>),
}

pub struct RegionPickerState {
    pub buffer: String,
    pub cursor: usize,
    pub filtered: Vec<&'static str>,
    pub selected: usize,
}

pub struct App {
    pub view: View,
    pub focus: Focus,

    pub cards: Vec<Country>,
    pub selected_card: usize,
    pub cards_scroll: usize,
    pub result_count: usize,

    pub nav: NavStack,
    pub selected_border: usize,
    pub error_message: Option<String>,

    pub input: String,
    pub input_cursor: usize,
    pub input_history: Vec<String>,
    pub input_history_index: Option<usize>,

    pub region: Option<String>,
    pub region_picker: Option<RegionPickerState>,

    pub theme: ThemeKind,
    pub show_help: bool,
    pub loading: bool,
    pub should_quit: bool,
    pub dirty: bool,

    pub main_area: Option<Rect>,
    pub fetch_rx: Option<std::sync::mpsc::Receiver<Result<FetchPayload, LookupError>>>,
}

impl App {
    pub fn new() -> Self {
        let mut s = Self {
            view: View::Cards,
            focus: Focus::Input,
            cards: Vec::new(),
            selected_card: 0,
            cards_scroll: 0,
            result_count: 0,
            nav: NavStack::new(),
            selected_border: 0,
            error_message: None,
            input: String::new(),
            input_cursor: 0,
            input_history: Vec::new(),
            input_history_index: None,
            region: None,
            region_picker: None,
            theme: ThemeKind::Light,
            show_help: false,
            loading: false,
            should_quit: false,
            dirty: true,
            main_area: None,
            fetch_rx: None,
        };
        if let Ok(Some(p)) = crate::persist::load_state() {
            s.theme = p.theme;
            s.region = p.region;
        }
        s
    }

    /// Hand a query to a worker thread and start watching its channel.
    /// Replacing the receiver orphans any in-flight worker; its send
    /// fails silently and the thread exits, so the latest request wins.
    pub(crate) fn dispatch(&mut self, job: FetchJob) {
        let (tx, rx) = std::sync::mpsc::channel();
        self.fetch_rx = Some(rx);
        self.loading = true;
        self.dirty = true;
        info!(target: "tui", "dispatch: {:?}", job);
        std::thread::spawn(move || {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    let _ = tx.send(Err(LookupError::Other(e.to_string())));
                    return;
                }
            };
            rt.block_on(async move {
                let cfg = match RestCountriesConfig::from_env_and_file() {
                    Ok(c) => c,
                    Err(e) => {
                        let _ = tx.send(Err(LookupError::Other(e.to_string())));
                        return;
                    }
                };
                let client = match RestCountriesClient::new(cfg) {
                    Ok(c) => c,
                    Err(e) => {
                        let _ = tx.send(Err(LookupError::Other(e.to_string())));
                        return;
                    }
                };
                let result = match job {
                    FetchJob::Cards(query) => client
                        .fetch_countries(&query)
                        .await
                        .map(FetchPayload::Cards),
                    FetchJob::Detail { code } => match client.fetch_by_code(&code).await {
                        Ok(country) => {
                            let borders = client.resolve_borders(&country.borders).await;
                            Ok(FetchPayload::Detail(Box::new(DetailEntry {
                                country,
                                borders,
                            })))
                        }
                        Err(e) => Err(e),
                    },
                };
                let _ = tx.send(result);
            });
        });
    }

    pub fn on_tick(&mut self) {
        let done = match &self.fetch_rx {
            Some(rx) => match rx.try_recv() {
                Ok(done) => Some(done),
                Err(std::sync::mpsc::TryRecvError::Empty) => None,
                Err(std::sync::mpsc::TryRecvError::Disconnected) => {
                    self.fetch_rx = None;
                    self.loading = false;
                    self.dirty = true;
                    None
                }
            },
            None => None,
        };
        if let Some(done) = done {
            self.fetch_rx = None;
            self.loading = false;
            self.handle_fetch_done(done);
        }
    }

    pub fn handle_fetch_done(&mut self, result: Result<FetchPayload, LookupError>) {
        self.dirty = true;
        match result {
            Ok(FetchPayload::Cards(all)) => {
                self.error_message = None;
                self.result_count = all.len();
                self.cards = all;
                self.selected_card = 0;
                self.cards_scroll = 0;
                self.view = View::Cards;
            }
            Ok(FetchPayload::Detail(entry)) => {
                self.error_message = None;
                self.nav.push(*entry);
                self.selected_border = 0;
                self.view = View::Detail;
                self.focus = Focus::Main;
            }
            Err(e) => {
                error!(target: "tui", "fetch failed: {}", e);
                // One uniform panel regardless of the failure kind, and
                // whatever was on screen goes away with it.
                self.cards.clear();
                self.result_count = 0;
                self.error_message = Some(ERROR_NOT_FOUND.to_string());
                self.view = View::Error;
            }
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        let _ = crate::persist::save_state(self);
        self.dirty = true;
    }

    pub fn open_region_picker(&mut self) {
        self.region_picker = Some(RegionPickerState {
            buffer: String::new(),
            cursor: 0,
            filtered: REGIONS.to_vec(),
            selected: 0,
        });
    }

    fn region_filter(st: &mut RegionPickerState) {
        let q = st.buffer.to_lowercase();
        st.filtered = if q.is_empty() {
            REGIONS.to_vec()
        } else {
            REGIONS
                .iter()
                .copied()
                .filter(|r| r.to_lowercase().contains(&q))
                .collect()
        };
        st.selected = st.selected.min(st.filtered.len().saturating_sub(1));
    }

    fn on_region_picker_key(&mut self, key: KeyEvent) {
        let st = match &mut self.region_picker {
            Some(s) => s,
            None => return,
        };
        match key.code {
            KeyCode::Esc => {
                self.region_picker = None;
            }
            KeyCode::Enter => {
                if let Some(sel) = st.filtered.get(st.selected).copied() {
                    self.region_picker = None;
                    self.apply_region(sel);
                }
            }
            KeyCode::Up => {
                if st.selected > 0 {
                    st.selected -= 1;
                }
            }
            KeyCode::Down => {
                if st.selected + 1 < st.filtered.len() {
                    st.selected += 1;
                }
            }
            KeyCode::Backspace => {
                if st.cursor > 0 {
                    let mut parts: Vec<&str> = st.buffer.graphemes(true).collect();
                    let c = st.cursor.min(parts.len());
                    parts.remove(c - 1);
                    st.buffer = parts.concat();
                    st.cursor -= 1;
                    App::region_filter(st);
                }
            }
            KeyCode::Delete => {
                let mut parts: Vec<&str> = st.buffer.graphemes(true).collect();
                let c = st.cursor.min(parts.len());
                if c < parts.len() {
                    parts.remove(c);
                    st.buffer = parts.concat();
                    App::region_filter(st);
                }
            }
            KeyCode::Left => {
                if st.cursor > 0 {
                    st.cursor -= 1;
                }
            }
            KeyCode::Right => {
                let l = st.buffer.graphemes(true).count();
                if st.cursor < l {
                    st.cursor += 1;
                }
            }
            KeyCode::Home => {
                st.cursor = 0;
            }
            KeyCode::End => {
                st.cursor = st.buffer.graphemes(true).count();
            }
            KeyCode::Char(ch) => {
                if !key.modifiers.contains(KeyModifiers::CONTROL) {
                    let mut parts: Vec<&str> = st.buffer.graphemes(true).collect();
                    let c = st.cursor.min(parts.len());
                    let mut buf = [0u8; 4];
                    parts.insert(c, ch.encode_utf8(&mut buf));
                    st.buffer = parts.concat();
                    st.cursor += 1;
                    App::region_filter(st);
                }
            }
            _ => {}
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if let KeyEventKind::Press = key.kind {
            if self.region_picker.is_some() {
                self.on_region_picker_key(key);
                self.dirty = true;
                return;
            }

            if self.show_help {
                match key.code {
                    KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') => {
                        self.show_help = false;
                    }
                    _ => {}
                }
                self.dirty = true;
                return;
            }

            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            match key.code {
                KeyCode::Char('c') if ctrl => {
                    self.should_quit = true;
                }
                KeyCode::Esc => {
                    if self.view == View::Detail {
                        self.go_back();
                    } else {
                        self.should_quit = true;
                    }
                }
                KeyCode::Tab => {
                    self.focus = match self.focus {
                        Focus::Input => Focus::Main,
                        Focus::Main => Focus::Input,
                    };
                }
                KeyCode::F(1) => {
                    self.show_help = true;
                }
                KeyCode::F(2) => {
                    self.toggle_theme();
                }
                KeyCode::F(4) => {
                    self.open_region_picker();
                }
                KeyCode::F(5) => {
                    self.load_all();
                }
                KeyCode::Enter => match self.focus {
                    Focus::Input => {
                        info!(target: "tui", "on_key: Enter => submit search");
                        self.submit_search();
                    }
                    Focus::Main => match self.view {
                        View::Cards => self.open_selected_card(),
                        View::Detail => self.open_selected_border(),
                        View::Error => {}
                    },
                },
                KeyCode::Backspace if matches!(self.focus, Focus::Input) => {
                    self.delete_left_grapheme();
                }
                KeyCode::Backspace if self.view == View::Detail => {
                    self.go_back();
                }
                KeyCode::Delete if matches!(self.focus, Focus::Input) => {
                    self.delete_right_grapheme();
                }
                KeyCode::Char('w') if ctrl && matches!(self.focus, Focus::Input) => {
                    self.delete_prev_word();
                }
                KeyCode::Char('u') if ctrl && matches!(self.focus, Focus::Input) => {
                    self.clear_input();
                }
                KeyCode::Char('a') if ctrl && matches!(self.focus, Focus::Input) => {
                    self.move_cursor_start();
                }
                KeyCode::Char('e') if ctrl && matches!(self.focus, Focus::Input) => {
                    self.move_cursor_end();
                }
                KeyCode::Left
                    if ctrl && matches!(self.focus, Focus::Input) =>
                {
                    self.move_cursor_word_left();
                }
                KeyCode::Right
                    if ctrl && matches!(self.focus, Focus::Input) =>
                {
                    self.move_cursor_word_right();
                }
                KeyCode::Left if matches!(self.focus, Focus::Input) => {
                    if self.input_cursor > 0 {
                        self.input_cursor -= 1;
                    }
                }
                KeyCode::Right if matches!(self.focus, Focus::Input) => {
                    let len = self.input.graphemes(true).count();
                    if self.input_cursor < len {
                        self.input_cursor += 1;
                    }
                }
                KeyCode::Home if matches!(self.focus, Focus::Input) => {
                    self.move_cursor_start();
                }
                KeyCode::End if matches!(self.focus, Focus::Input) => {
                    self.move_cursor_end();
                }
                KeyCode::Up if matches!(self.focus, Focus::Input) => {
                    if self.input_history.is_empty() {
                        return;
                    }
                    let idx = match self.input_history_index {
                        None => self.input_history.len().saturating_sub(1),
                        Some(0) => 0,
                        Some(i) => i.saturating_sub(1),
                    };
                    self.input_history_index = Some(idx);
                    self.input = self.input_history[idx].clone();
                    self.input_cursor = self.input.graphemes(true).count();
                    self.dirty = true;
                }
                KeyCode::Down if matches!(self.focus, Focus::Input) => {
                    if let Some(i) = self.input_history_index {
                        if i + 1 < self.input_history.len() {
                            self.input_history_index = Some(i + 1);
                            self.input = self.input_history[i + 1].clone();
                            self.input_cursor = self.input.graphemes(true).count();
                        } else {
                            self.input_history_index = None;
                            self.input.clear();
                            self.input_cursor = 0;
                        }
                    }
                }
                KeyCode::Up if self.view == View::Cards => {
                    self.card_select_up();
                }
                KeyCode::Down if self.view == View::Cards => {
                    self.card_select_down();
                }
                KeyCode::PageUp if self.view == View::Cards => {
                    let step = self.cards_per_page().max(1);
                    for _ in 0..step {
                        self.card_select_up();
                    }
                }
                KeyCode::PageDown if self.view == View::Cards => {
                    let step = self.cards_per_page().max(1);
                    for _ in 0..step {
                        self.card_select_down();
                    }
                }
                KeyCode::Home if self.view == View::Cards => {
                    self.selected_card = 0;
                    self.ensure_card_visible();
                }
                KeyCode::End if self.view == View::Cards => {
                    if !self.cards.is_empty() {
                        self.selected_card = self.cards.len() - 1;
                    }
                    self.ensure_card_visible();
                }
                KeyCode::Left if self.view == View::Detail => {
                    self.border_select_left();
                }
                KeyCode::Right if self.view == View::Detail => {
                    self.border_select_right();
                }
                KeyCode::Char('q') if matches!(self.focus, Focus::Main) => {
                    self.should_quit = true;
                }
                KeyCode::Char('?') if matches!(self.focus, Focus::Main) => {
                    self.show_help = true;
                }
                KeyCode::Char('t') if matches!(self.focus, Focus::Main) => {
                    self.toggle_theme();
                }
                KeyCode::Char('r') if matches!(self.focus, Focus::Main) => {
                    self.open_region_picker();
                }
                KeyCode::Char('b')
                    if matches!(self.focus, Focus::Main) && self.view == View::Detail =>
                {
                    self.go_back();
                }
                KeyCode::Char(ch) if matches!(self.focus, Focus::Input) && !ctrl => {
                    let mut buf = [0u8; 4];
                    let s = ch.encode_utf8(&mut buf);
                    self.insert_text(s);
                }
                _ => {}
            }
            // Mark dirty on any handled key press path.
            self.dirty = true;
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::DetailEntry;
    use atlas_core::country::{BorderLink, Country};

    pub fn country(common: &str, cca3: &str) -> Country {
        serde_json::from_value(serde_json::json!({
            "name": { "common": common, "official": common },
            "cca3": cca3,
        }))
        .unwrap()
    }

    pub fn entry(common: &str, cca3: &str, borders: &[(&str, &str)]) -> DetailEntry {
        DetailEntry {
            country: country(common, cca3),
            borders: borders
                .iter()
                .map(|(code, name)| BorderLink {
                    code: (*code).to_string(),
                    name: (*name).to_string(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::country;
    use super::*;

    #[test]
    fn failed_fetch_clears_cards_and_shows_one_error_panel() {
        let mut app = App::new();
        app.handle_fetch_done(Ok(FetchPayload::Cards(vec![
            country("Chad", "TCD"),
            country("Peru", "PER"),
        ])));
        assert_eq!(app.view, View::Cards);
        assert_eq!(app.result_count, 2);

        app.handle_fetch_done(Err(LookupError::NotFound));
        assert_eq!(app.view, View::Error);
        assert!(app.cards.is_empty());
        assert_eq!(app.result_count, 0);
        assert_eq!(app.error_message.as_deref(), Some(ERROR_NOT_FOUND));
    }

    #[test]
    fn error_surface_is_uniform_across_failure_kinds() {
        for err in [
            LookupError::NotFound,
            LookupError::Network("connection refused".into()),
            LookupError::Timeout("deadline".into()),
            LookupError::Decode("bad json".into()),
        ] {
            let mut app = App::new();
            app.handle_fetch_done(Err(err));
            assert_eq!(app.view, View::Error);
            assert_eq!(app.error_message.as_deref(), Some(ERROR_NOT_FOUND));
        }
    }

    #[test]
    fn region_filter_narrows_and_recovers() {
        let mut app = App::new();
        app.open_region_picker();
        let st = app.region_picker.as_mut().unwrap();
        st.buffer = "eu".into();
        App::region_filter(st);
        assert_eq!(st.filtered, ["Europe"]);

        st.buffer.clear();
        App::region_filter(st);
        assert_eq!(st.filtered.len(), REGIONS.len());
    }
}
