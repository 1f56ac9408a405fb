//! Engine configuration.
//!
//! Controls how sequences are built from external input (the builder, the
//! wire decoder and serde deserialization).
use serde::de::Error;

/// Construction settings
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Drop redundant instants while building
    #[serde(default = "Config::default_normalize")]
    pub normalize: bool,

    /// Compute the trajectory of point sequences at construction
    #[serde(default = "Config::default_precompute_trajectory")]
    pub precompute_trajectory: bool,

    /// Upper bound on the instant count accepted from external input
    #[serde(default = "Config::default_max_instants")]
    pub max_instants: usize,
}

impl Config {
    const fn default_normalize() -> bool {
        true
    }

    const fn default_precompute_trajectory() -> bool {
        true
    }

    const fn default_max_instants() -> usize {
        1_000_000
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_precompute_trajectory(mut self, precompute: bool) -> Self {
        self.precompute_trajectory = precompute;
        self
    }

    pub fn with_max_instants(mut self, max_instants: usize) -> Self {
        assert!(max_instants > 0, "Max instants must be greater than zero");

        if max_instants > 100_000_000 {
            log::warn!(
                "Max instants of {} is very large; a single decode may allocate \
                a correspondingly large instant array.",
                max_instants
            );
        }

        self.max_instants = max_instants;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.max_instants == 0 {
            return Err("Max instants must be greater than zero".to_string());
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
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

impl Default for Config {
    fn default() -> Self {
        Self {
            normalize: Self::default_normalize(),
            precompute_trajectory: Self::default_precompute_trajectory(),
            max_instants: Self::default_max_instants(),
        }
    }
}
