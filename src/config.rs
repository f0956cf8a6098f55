//! Coverage search settings.

use serde::de::Error;

/// Hard limit on tiles a single search may emit.
pub const MAX_TILES: usize = 500_000;

/// Settings shared by coverage search and the dispatch helpers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CoverageConfig {
    /// Emission cap. A search that would emit more tiles is abandoned.
    #[serde(default = "CoverageConfig::default_max_tiles")]
    pub max_tiles: usize,

    /// Emit every descendant of a fully covered tile without further
    /// geometric tests.
    #[serde(default = "CoverageConfig::default_shortcut_covered")]
    pub shortcut_covered: bool,

    /// Replace multi-part clip results with their envelope before descending.
    #[serde(default = "CoverageConfig::default_collapse_multipart")]
    pub collapse_multipart: bool,
}

impl CoverageConfig {
    const fn default_max_tiles() -> usize {
        MAX_TILES
    }

    const fn default_shortcut_covered() -> bool {
        true
    }

    const fn default_collapse_multipart() -> bool {
        true
    }

    pub fn with_max_tiles(mut self, max_tiles: usize) -> Self {
        assert!(max_tiles > 0, "Tile cap must be greater than zero");

        if max_tiles > 10 * MAX_TILES {
            log::warn!(
                "Tile cap of {} is far above the default of {} and a single search \
                may allocate a very large result",
                max_tiles,
                MAX_TILES
            );
        }

        self.max_tiles = max_tiles;
        self
    }

    pub fn with_shortcut_covered(mut self, enabled: bool) -> Self {
        self.shortcut_covered = enabled;
        self
    }

    pub fn with_collapse_multipart(mut self, enabled: bool) -> Self {
        self.collapse_multipart = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_tiles == 0 {
            return Err("Tile cap must be greater than zero".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: CoverageConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: CoverageConfig = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            max_tiles: Self::default_max_tiles(),
            shortcut_covered: Self::default_shortcut_covered(),
            collapse_multipart: Self::default_collapse_multipart(),
        }
    }
}
