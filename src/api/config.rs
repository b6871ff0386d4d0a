use serde::{Deserialize, Serialize};

use crate::core::color::ThemePalette;
use crate::core::types::Viewport;
use crate::error::{ChoreoError, ChoreoResult};
use crate::interaction::{InertiaConfig, LoopSettleConfig};
use crate::scroll::ScrollMode;

/// Public choreographer bootstrap configuration.
///
/// This type is serializable so hosts can keep their animation setup in a
/// JSON file next to the page content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreographerConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub scroll_mode: ScrollMode,
    /// Upper bound applied to region gates that carry no timeout of their own.
    #[serde(default = "default_readiness_timeout_ms")]
    pub readiness_timeout_ms: f64,
    #[serde(default)]
    pub inertia: InertiaConfig,
    #[serde(default)]
    pub loop_settle: LoopSettleConfig,
    #[serde(default = "default_palette")]
    pub palette: ThemePalette,
}

impl ChoreographerConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            scroll_mode: ScrollMode::default(),
            readiness_timeout_ms: default_readiness_timeout_ms(),
            inertia: InertiaConfig::default(),
            loop_settle: LoopSettleConfig::default(),
            palette: default_palette(),
        }
    }

    #[must_use]
    pub fn with_scroll_mode(mut self, mode: ScrollMode) -> Self {
        self.scroll_mode = mode;
        self
    }

    #[must_use]
    pub fn with_readiness_timeout_ms(mut self, timeout_ms: f64) -> Self {
        self.readiness_timeout_ms = timeout_ms;
        self
    }

    #[must_use]
    pub fn with_inertia(mut self, inertia: InertiaConfig) -> Self {
        self.inertia = inertia;
        self
    }

    #[must_use]
    pub fn with_loop_settle(mut self, settle: LoopSettleConfig) -> Self {
        self.loop_settle = settle;
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: ThemePalette) -> Self {
        self.palette = palette;
        self
    }

    pub fn validate(&self) -> ChoreoResult<()> {
        self.viewport.validate()?;
        self.scroll_mode.validate()?;
        if !self.readiness_timeout_ms.is_finite() || self.readiness_timeout_ms < 0.0 {
            return Err(ChoreoError::InvalidData(format!(
                "readiness timeout must be finite and >= 0, got {}",
                self.readiness_timeout_ms
            )));
        }
        self.inertia.validate()?;
        self.loop_settle.validate()?;
        self.palette.validate()
    }

    /// Serializes config to pretty JSON.
    pub fn to_json_pretty(&self) -> ChoreoResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ChoreoError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChoreoResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChoreoError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn default_readiness_timeout_ms() -> f64 {
    3_000.0
}

fn default_palette() -> ThemePalette {
    ThemePalette::garden()
}
