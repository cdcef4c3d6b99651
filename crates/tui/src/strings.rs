// Centralized UI strings and labels. ASCII-friendly by default.

use unicode_width::UnicodeWidthStr;

pub const TITLE_COUNTRY: &str = " Country ";
pub const TITLE_SEARCH: &str = " Search ";
pub const TITLE_REGION: &str = " Region ";
pub const TITLE_THEME: &str = " Theme ";
pub const TITLE_REGION_PICKER: &str = " Filter by Region ";
pub const TITLE_HELP: &str = " Help / Shortcuts ";

pub const INPUT_HINT: &str = "Type a country name, Enter to search";
pub const LOADING: &str = "Loading...";
pub const REGION_ALL: &str = "All";

pub const ERROR_STATUS: &str = "404";
pub const ERROR_NOT_FOUND: &str = "Country not found!";

pub const LABEL_BORDERS: &str = "Border Countries:";
pub const NO_BORDERS: &str = "No border countries";
pub const BACK_HINT: &str = "<- Back (Backspace)";

pub fn countries_title(count: usize) -> String {
    format!(" Countries ({}) ", count)
}

// Population rendered with thousands separators, e.g. 83,240,525.
pub fn format_population(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

// Build the status bar line with width-aware compaction: fixed segments
// first, then hints in order of importance while space allows.
pub fn build_status_line(
    theme: &str,
    region: &str,
    count: usize,
    trail: usize,
    loading: bool,
    max_width: u16,
) -> String {
    let mut segments: Vec<String> = Vec::new();
    segments.push(format!("[{}][{}]", theme, region));
    if loading {
        segments.push(LOADING.to_string());
    }
    segments.push(format!("Countries:{}", count));
    segments.push(format!("Trail:{}", trail));
    let hints: [&str; 6] = [
        "Enter: search/open",
        "Tab: focus",
        "F4: region",
        "F2: theme",
        "Backspace: back",
        "F1: help",
    ];
    for h in hints {
        segments.push(h.to_string());
    }

    let sep = "  |  ";
    let mut out = String::new();
    let mut used = 0usize;
    for (i, seg) in segments.iter().enumerate() {
        let segw = UnicodeWidthStr::width(seg.as_str());
        let addw = segw
            + if i == 0 {
                0
            } else {
                UnicodeWidthStr::width(sep)
            };
        if used + addw > max_width as usize {
            break;
        }
        if i > 0 {
            out.push_str(sep);
            used += UnicodeWidthStr::width(sep);
        }
        out.push_str(seg);
        used += segw;
    }
    out
}

// ASCII help lines content; UI maps to styled lines.
pub fn help_lines_ascii() -> &'static [&'static str] {
    &[
        "Basic",
        "  Tab: Switch focus    Ctrl-C or q: Quit    Esc: Back / Quit",
        "Search",
        "  Enter: Search by name    Up/Down: Input history",
        "  An empty submission does nothing",
        "Browse",
        "  Up/Down: Select card    Enter: Open country    PgUp/PgDn: Page",
        "  Mouse: Wheel to scroll, click a card to open",
        "Detail",
        "  Left/Right: Select border country    Enter: Visit border",
        "  Backspace or b: Back (empty trail reloads all countries)",
        "Filters & Theme",
        "  F4 or r: Region filter    F5: Reload all    F2 or t: Light/dark",
        "Help",
        "  F1 or ?: Open/close this panel",
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn population_groups_thousands() {
        assert_eq!(format_population(0), "0");
        assert_eq!(format_population(999), "999");
        assert_eq!(format_population(1_000), "1,000");
        assert_eq!(format_population(83_240_525), "83,240,525");
        assert_eq!(format_population(1_402_112_000), "1,402,112,000");
    }

    #[test]
    fn status_line_compacts_to_width() {
        let full = build_status_line("Light", "Europe", 53, 2, false, 200);
        assert!(full.starts_with("[Light][Europe]"));
        assert!(full.contains("Countries:53"));
        assert!(full.contains("Trail:2"));

        let narrow = build_status_line("Light", "Europe", 53, 2, false, 18);
        assert_eq!(narrow, "[Light][Europe]");
    }

    #[test]
    fn status_line_reports_loading() {
        let s = build_status_line("Dark", REGION_ALL, 0, 0, true, 80);
        assert!(s.contains(LOADING));
    }
}
