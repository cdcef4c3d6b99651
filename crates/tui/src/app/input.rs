use unicode_segmentation::UnicodeSegmentation;

use super::App;

// Grapheme-aware editing for the single-line search box.
impl App {
    pub fn insert_text(&mut self, s: &str) {
        // The search box is one line; pasted newlines collapse to spaces.
        let s = s.replace(['\r', '\n'], " ");
        let parts: Vec<&str> = self.input.graphemes(true).collect();
        let idx = self.input_cursor.min(parts.len());
        let mut new_input = String::new();
        for g in &parts[..idx] {
            new_input.push_str(g);
        }
        new_input.push_str(&s);
        for g in &parts[idx..] {
            new_input.push_str(g);
        }
        self.input = new_input;
        let added = s.graphemes(true).count();
        self.input_cursor = (idx + added).min(self.input.graphemes(true).count());
    }

    pub fn delete_left_grapheme(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        let mut parts: Vec<&str> = self.input.graphemes(true).collect();
        let idx = self.input_cursor;
        parts.remove(idx - 1);
        self.input = parts.concat();
        self.input_cursor = idx - 1;
    }

    pub fn delete_right_grapheme(&mut self) {
        let mut parts: Vec<&str> = self.input.graphemes(true).collect();
        let idx = self.input_cursor.min(parts.len());
        if idx < parts.len() {
            parts.remove(idx);
            self.input = parts.concat();
        }
    }

    pub fn delete_prev_word(&mut self) {
        if self.input_cursor == 0 {
            return;
        }
        let parts: Vec<&str> = self.input.graphemes(true).collect();
        let mut i = self.input_cursor;
        while i > 0 && parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        while i > 0 && !parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        let mut newp = parts.clone();
        newp.drain(i..self.input_cursor);
        self.input = newp.concat();
        self.input_cursor = i;
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
        self.input_cursor = 0;
    }

    pub fn move_cursor_start(&mut self) {
        self.input_cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.input_cursor = self.input.graphemes(true).count();
    }

    pub fn move_cursor_word_left(&mut self) {
        let parts: Vec<&str> = self.input.graphemes(true).collect();
        let mut i = self.input_cursor.min(parts.len());
        while i > 0 && parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        while i > 0 && !parts[i - 1].trim().is_empty() {
            i -= 1;
        }
        self.input_cursor = i;
    }

    pub fn move_cursor_word_right(&mut self) {
        let parts: Vec<&str> = self.input.graphemes(true).collect();
        let mut i = self.input_cursor.min(parts.len());
        while i < parts.len() && parts[i].trim().is_empty() {
            i += 1;
        }
        while i < parts.len() && !parts[i].trim().is_empty() {
            i += 1;
        }
        self.input_cursor = i;
    }
}

#[cfg(test)]
mod tests {
    use super::super::App;

    #[test]
    fn insert_at_cursor_handles_multibyte_graphemes() {
        let mut app = App::new();
        app.insert_text("Cote dIvoire");
        app.input_cursor = 1;
        app.insert_text("ô");
        assert_eq!(app.input, "Côote dIvoire");
        assert_eq!(app.input_cursor, 2);
    }

    #[test]
    fn pasted_newlines_collapse_to_spaces() {
        let mut app = App::new();
        app.insert_text("new\nzealand");
        assert_eq!(app.input, "new zealand");
    }

    #[test]
    fn delete_prev_word_stops_at_word_boundary() {
        let mut app = App::new();
        app.insert_text("papua new guinea");
        app.delete_prev_word();
        assert_eq!(app.input, "papua new ");
        app.delete_prev_word();
        assert_eq!(app.input, "papua ");
    }
}
