use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use serde::{Deserialize, Serialize};
use snafu::{ResultExt, ensure};

use crate::error::{ConfigResult, ExtractSnafu, InvalidSettingSnafu};
use crate::reveal::{
    CannedResponses, DEFAULT_ACKNOWLEDGEMENT, DEFAULT_CHAR_DELAY, DEFAULT_FILLER_REPEAT,
    DEFAULT_FILLER_TOKEN,
};
use crate::scroll::{DEFAULT_SCROLL_AFTER_SUBMIT, DEFAULT_SPACER_PADDING, ScrollController};

pub const SETTINGS_DIRECTORY_NAME: &str = "yaac";
pub const SETTINGS_FILE_NAME: &str = "settings.json";
pub const ENV_PREFIX: &str = "YAAC_";
pub const DEFAULT_SMOOTH_SCROLL_MS: u64 = 240;

/// Timing, layout and canned-reply knobs for one chat session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatSettings {
    pub char_delay_ms: u64,
    pub scroll_after_submit_ms: u64,
    pub spacer_padding: f32,
    pub smooth_scroll_ms: u64,
    pub acknowledgement: String,
    pub filler_token: String,
    pub filler_repeat: usize,
    pub extra_responses: Vec<String>,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            char_delay_ms: DEFAULT_CHAR_DELAY.as_millis() as u64,
            scroll_after_submit_ms: DEFAULT_SCROLL_AFTER_SUBMIT.as_millis() as u64,
            spacer_padding: DEFAULT_SPACER_PADDING,
            smooth_scroll_ms: DEFAULT_SMOOTH_SCROLL_MS,
            acknowledgement: DEFAULT_ACKNOWLEDGEMENT.to_string(),
            filler_token: DEFAULT_FILLER_TOKEN.to_string(),
            filler_repeat: DEFAULT_FILLER_REPEAT,
            extra_responses: Vec::new(),
        }
    }
}

impl ChatSettings {
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|path| path.join(SETTINGS_DIRECTORY_NAME))
            .unwrap_or_else(|| PathBuf::from(".yaac"))
    }

    pub fn default_config_path() -> PathBuf {
        Self::default_config_dir().join(SETTINGS_FILE_NAME)
    }

    /// Defaults, then the JSON file at `path` if present, then `YAAC_*` env.
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(ChatSettings::default()))
            .merge(Json::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if path.exists() {
            tracing::info!("loading chat settings from {:?}", path);
        } else {
            tracing::info!("settings file not found at {:?}, using defaults", path);
        }

        let settings: Self = Self::figment(path).extract().context(ExtractSnafu {
            stage: "extract-chat-settings",
        })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Never fails: a broken config is logged and replaced by defaults.
    pub fn load_or_default() -> Self {
        let path = Self::default_config_path();
        match Self::load_from(&path) {
            Ok(settings) => settings,
            Err(error) => {
                tracing::warn!("{error}. using default chat settings");
                Self::default()
            }
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        ensure!(
            !self.acknowledgement.is_empty(),
            InvalidSettingSnafu {
                stage: "validate-acknowledgement",
                details: "acknowledgement must not be empty".to_string(),
            }
        );
        ensure!(
            !self.filler_token.is_empty() && self.filler_repeat > 0,
            InvalidSettingSnafu {
                stage: "validate-filler",
                details: format!(
                    "filler {:?} x{} would produce an empty response",
                    self.filler_token, self.filler_repeat
                ),
            }
        );
        ensure!(
            self.spacer_padding.is_finite() && self.spacer_padding >= 0.,
            InvalidSettingSnafu {
                stage: "validate-spacer-padding",
                details: format!("spacer_padding must be >= 0, got {}", self.spacer_padding),
            }
        );
        ensure!(
            self.extra_responses.iter().all(|response| !response.is_empty()),
            InvalidSettingSnafu {
                stage: "validate-extra-responses",
                details: "extra_responses must not contain empty strings".to_string(),
            }
        );
        Ok(())
    }

    pub fn char_delay(&self) -> Duration {
        Duration::from_millis(self.char_delay_ms)
    }

    pub fn scroll_after_submit(&self) -> Duration {
        Duration::from_millis(self.scroll_after_submit_ms)
    }

    pub fn smooth_scroll(&self) -> Duration {
        Duration::from_millis(self.smooth_scroll_ms)
    }

    pub fn responses(&self) -> CannedResponses {
        let mut responses = vec![
            self.acknowledgement.clone(),
            self.filler_token.repeat(self.filler_repeat),
        ];
        responses.extend(self.extra_responses.iter().cloned());

        CannedResponses::new(responses).unwrap_or_default()
    }

    pub fn scroll_controller(&self) -> ScrollController {
        ScrollController::new(self.scroll_after_submit(), self.spacer_padding)
    }
}
