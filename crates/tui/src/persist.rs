use std::{fs, io::Write, path::PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::app::App;
use crate::theme::ThemeKind;

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedState {
    pub theme: ThemeKind,
    pub region: Option<String>,
}

impl Default for SavedState {
    fn default() -> Self {
        SavedState {
            theme: ThemeKind::Light,
            region: None,
        }
    }
}

impl From<&App> for SavedState {
    fn from(a: &App) -> Self {
        SavedState {
            theme: a.theme,
            region: a.region.clone(),
        }
    }
}

pub fn state_path() -> Option<PathBuf> {
    let base = BaseDirs::new()?;
    let dir = base.config_dir().join("atlas");
    Some(dir.join("ui_state.json"))
}

pub fn load_state() -> Result<Option<SavedState>> {
    let Some(path) = state_path() else {
        return Ok(None);
    };
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read(&path).with_context(|| format!("read state file: {}", path.display()))?;
    let s: SavedState = serde_json::from_slice(&data).with_context(|| "parse state json")?;
    Ok(Some(s))
}

pub fn save_state(app: &App) -> Result<()> {
    let Some(path) = state_path() else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).ok();
    }
    let s: SavedState = app.into();
    let data = serde_json::to_vec_pretty(&s)?;
    let mut tmp = path.clone();
    tmp.set_extension("json.tmp");
    {
        let mut f =
            fs::File::create(&tmp).with_context(|| format!("create tmp: {}", tmp.display()))?;
        f.write_all(&data)?;
        f.flush()?;
    }
    fs::rename(tmp, &path).with_context(|| format!("persist state to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn saved_state_round_trips() {
        let s = SavedState {
            theme: ThemeKind::Dark,
            region: Some("Europe".to_string()),
        };
        let data = serde_json::to_vec_pretty(&s).unwrap();
        let back: SavedState = serde_json::from_slice(&data).unwrap();
        assert_eq!(back.theme, ThemeKind::Dark);
        assert_eq!(back.region.as_deref(), Some("Europe"));
    }

    #[test]
    fn default_state_is_light_with_no_filter() {
        let s = SavedState::default();
        assert_eq!(s.theme, ThemeKind::Light);
        assert!(s.region.is_none());
    }
}
