//! Application settings.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Normal,
    Large,
}

impl FontSize {
    /// Root font size used when rendering.
    pub fn css_pixels(self) -> u8 {
        match self {
            FontSize::Small => 14,
            FontSize::Normal => 16,
            FontSize::Large => 18,
        }
    }
}

impl FromStr for FontSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Ok(FontSize::Small),
            "normal" => Ok(FontSize::Normal),
            "large" => Ok(FontSize::Large),
            other => Err(format!("unknown font size '{other}' (expected small, normal or large)")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub font_size: FontSize,
    pub contrast_mode: bool,
    pub privacy_consented: bool,
}

impl Settings {
    /// The privacy notice must be shown until the user has consented.
    pub fn needs_privacy_consent(&self) -> bool {
        !self.privacy_consented
    }

    pub fn apply(&mut self, update: SettingsUpdate) {
        if let Some(font_size) = update.font_size {
            self.font_size = font_size;
        }
        if let Some(contrast_mode) = update.contrast_mode {
            self.contrast_mode = contrast_mode;
        }
        if let Some(privacy_consented) = update.privacy_consented {
            self.privacy_consented = privacy_consented;
        }
    }
}

/// A partial settings change; `None` fields are left as they are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub font_size: Option<FontSize>,
    pub contrast_mode: Option<bool>,
    pub privacy_consented: Option<bool>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        self.font_size.is_none() && self.contrast_mode.is_none() && self.privacy_consented.is_none()
    }
}
