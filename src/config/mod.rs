//! Card file: style controls plus capture and snapshot settings, as one JSON document.

use std::path::Path;

use anyhow::Context as _;

use crate::capture::CaptureSettings;
use crate::foundation::error::QuoteResult;
use crate::snapshot::SnapshotOpts;
use crate::style::binding::StyleControls;

/// Everything needed to produce a card.
///
/// Style controls sit at the top level; capture and snapshot settings are nested:
///
/// ```json
/// { "caption": "Stay hungry", "preset": "sunset", "capture": { "total_duration_ms": 3000 } }
/// ```
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CardConfig {
    #[serde(flatten)]
    pub style: StyleControls,
    pub capture: CaptureSettings,
    pub snapshot: SnapshotOpts,
}

impl CardConfig {
    pub fn from_json_str(s: &str) -> QuoteResult<Self> {
        let cfg = serde_json::from_str(s).context("parse card JSON")?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> QuoteResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("open card '{}'", path.display()))?;
        let cfg = serde_json::from_str(&text)
            .with_context(|| format!("parse card JSON '{}'", path.display()))?;
        Ok(cfg)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/mod.rs"]
mod tests;
