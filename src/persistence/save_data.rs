//! Highscore and skin selection save data

use serde::{Deserialize, Serialize};

/// The persisted record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveData {
    pub highscore: u32,
    /// Skins the player may pick, in menu order
    pub skins_unlocked: Vec<String>,
    pub selected_skin: String,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            highscore: 0,
            skins_unlocked: vec!["default".into(), "rocker".into(), "pinkie".into()],
            selected_skin: "default".into(),
        }
    }
}

impl SaveData {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "savedData";

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Drop skins the content does not know and make sure a valid one is
    /// selected
    pub fn sanitized(mut self, known: &[String]) -> Self {
        self.skins_unlocked.retain(|s| known.contains(s));
        if self.skins_unlocked.is_empty() {
            if let Some(first) = known.first() {
                self.skins_unlocked.push(first.clone());
            }
        }
        if !self.skins_unlocked.contains(&self.selected_skin) {
            if let Some(first) = self.skins_unlocked.first() {
                log::warn!(
                    "Selected skin '{}' is not unlocked, using '{}'",
                    self.selected_skin,
                    first
                );
                self.selected_skin = first.clone();
            }
        }
        self
    }

    pub fn is_skin_unlocked(&self, skin: &str) -> bool {
        self.skins_unlocked.iter().any(|s| s == skin)
    }

    /// Raise the highscore if `score` beats it
    pub fn record_score(&mut self, score: u32) -> bool {
        if score > self.highscore {
            self.highscore = score;
            true
        } else {
            false
        }
    }

    /// Select the next unlocked skin, wrapping to the first
    pub fn next_skin(&mut self) -> &str {
        self.cycle_skin(1)
    }

    /// Select the previous unlocked skin, wrapping to the last
    pub fn previous_skin(&mut self) -> &str {
        self.cycle_skin(-1)
    }

    fn cycle_skin(&mut self, step: isize) -> &str {
        let len = self.skins_unlocked.len() as isize;
        if len > 0 {
            let current = self
                .skins_unlocked
                .iter()
                .position(|s| *s == self.selected_skin)
                .unwrap_or(0) as isize;
            let next = (current + step).rem_euclid(len) as usize;
            self.selected_skin = self.skins_unlocked[next].clone();
        }
        &self.selected_skin
    }

    /// Load save data from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(data) => {
                        log::info!("Loaded save data (highscore {})", data.highscore);
                        return data;
                    }
                    Err(e) => log::warn!("Ignoring unreadable save data: {}", e),
                }
            }
        }

        log::info!("No save data found, starting fresh");
        Self::default()
    }

    /// Write save data to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            match self.to_json() {
                Ok(json) => {
                    if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                        log::warn!("Failed to write save data");
                    }
                }
                Err(e) => log::warn!("Failed to encode save data: {}", e),
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!("Save requested (highscore {}); native builds keep it in memory", self.highscore);
    }
}
