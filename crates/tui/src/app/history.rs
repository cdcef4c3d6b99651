use super::{App, DetailEntry};

/// Explicit view-history stack for the detail screen. The top entry is
/// what the screen is currently showing; going back pops it and reveals
/// the previous entry. The same country may appear any number of times
/// and nothing is deduplicated.
#[derive(Debug, Default)]
pub struct NavStack {
    entries: Vec<DetailEntry>,
}

impl NavStack {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: DetailEntry) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<DetailEntry> {
        self.entries.pop()
    }

    pub fn peek(&self) -> Option<&DetailEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl App {
    // Record input text to history if it's new, and reset history navigation state.
    pub fn record_history_entry(&mut self, text: &str) {
        if let Some(last) = self.input_history.last() {
            if last == text {
                self.input_history_index = None;
                return;
            }
        }
        self.input_history.push(text.to_string());
        self.input_history_index = None;
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::entry;
    use super::*;

    #[test]
    fn back_reveals_the_previous_entry_not_the_pushed_one() {
        let mut nav = NavStack::new();
        nav.push(entry("Germany", "DEU", &[("FRA", "France")]));
        nav.push(entry("France", "FRA", &[("DEU", "Germany")]));
        assert_eq!(nav.peek().unwrap().country.cca3, "FRA");

        nav.pop();
        assert_eq!(nav.peek().unwrap().country.cca3, "DEU");
    }

    #[test]
    fn duplicates_are_allowed() {
        let mut nav = NavStack::new();
        nav.push(entry("Germany", "DEU", &[]));
        nav.push(entry("France", "FRA", &[]));
        nav.push(entry("Germany", "DEU", &[]));
        assert_eq!(nav.len(), 3);
    }

    #[test]
    fn pop_on_empty_is_none() {
        let mut nav = NavStack::new();
        assert!(nav.pop().is_none());
        assert!(nav.peek().is_none());
        assert!(nav.is_empty());
    }
}
