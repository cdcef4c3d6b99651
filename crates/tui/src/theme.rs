use ratatui::style::Color;
use serde::{Deserialize, Serialize};

pub struct Theme {
    pub bg: Color,
    pub text: Color,
    pub text_dim: Color,
    pub title: Color,
    pub border_focus: Color,
    pub border_inactive: Color,
    pub panel_border: Color,
    pub selected_fg: Color,
    pub selected_bg: Color,
    pub error: Color,
}

pub const DARK: Theme = Theme {
    bg: Color::Black,
    text: Color::Gray,
    text_dim: Color::DarkGray,
    title: Color::Yellow,
    border_focus: Color::Cyan,
    border_inactive: Color::DarkGray,
    panel_border: Color::DarkGray,
    selected_fg: Color::Black,
    selected_bg: Color::Cyan,
    error: Color::Red,
};

pub const LIGHT: Theme = Theme {
    bg: Color::White,
    text: Color::Black,
    text_dim: Color::DarkGray,
    title: Color::Blue,
    border_focus: Color::Blue,
    border_inactive: Color::Gray,
    panel_border: Color::Gray,
    selected_fg: Color::White,
    selected_bg: Color::Blue,
    error: Color::LightRed,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    Light,
    Dark,
}

impl ThemeKind {
    pub fn theme(&self) -> &'static Theme {
        match self {
            ThemeKind::Light => &LIGHT,
            ThemeKind::Dark => &DARK,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemeKind::Light => ThemeKind::Dark,
            ThemeKind::Dark => ThemeKind::Light,
        }
    }

    /// Name of the active palette, for the status line.
    pub fn name(&self) -> &'static str {
        match self {
            ThemeKind::Light => "Light",
            ThemeKind::Dark => "Dark",
        }
    }

    /// The header button advertises the mode a toggle would switch to.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            ThemeKind::Light => "Dark Mode",
            ThemeKind::Dark => "Light Mode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_alternates() {
        assert_eq!(ThemeKind::Light.toggled(), ThemeKind::Dark);
        assert_eq!(ThemeKind::Light.toggled().toggled(), ThemeKind::Light);
    }

    #[test]
    fn toggle_label_advertises_the_other_mode() {
        assert_eq!(ThemeKind::Light.toggle_label(), "Dark Mode");
        assert_eq!(ThemeKind::Dark.toggle_label(), "Light Mode");
    }

    #[test]
    fn kind_round_trips_through_json() {
        let s = serde_json::to_string(&ThemeKind::Dark).unwrap();
        assert_eq!(s, "\"dark\"");
        let k: ThemeKind = serde_json::from_str(&s).unwrap();
        assert_eq!(k, ThemeKind::Dark);
    }
}
