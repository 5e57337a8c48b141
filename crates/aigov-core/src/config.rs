//! # Governance Configuration
//!
//! One explicit struct holds every tunable of the core: module weights,
//! level bands, the insufficient-evidence ceiling, the approval threshold,
//! evidence floors, dwell limits and escalation settings. It is loaded once,
//! validated, and handed to components as `Arc<GovernanceConfig>`.
//!
//! Sources, in order of preference for the CLI:
//!
//! - an explicit path (`--config`), YAML or JSON by extension;
//! - the `AIGOV_CONFIG` environment variable naming such a file;
//! - [`GovernanceConfig::default()`].
//!
//! Every loader runs [`GovernanceConfig::validate`]; an invalid file never
//! produces a config value.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::level::GovernanceLevel;
use crate::module::GovernanceModule;
use crate::workflow::WorkflowType;

/// Environment variable naming a configuration file.
pub const CONFIG_ENV_VAR: &str = "AIGOV_CONFIG";

/// Tolerance for the weight-sum check.
const WEIGHT_SUM_EPSILON: f64 = 1e-6;

/// Module weight map. Must cover every module and sum to 1.0.
pub type ModuleWeights = BTreeMap<GovernanceModule, f64>;

// ─── Sections ───────────────────────────────────────────────────────

/// One score band: `[lower, upper)` maps to `level`. The highest band is
/// closed at its upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LevelBand {
    pub level: GovernanceLevel,
    pub lower: f64,
    pub upper: f64,
}

impl LevelBand {
    /// Whether `score` falls in this band. `closed_upper` is set for the
    /// top band only.
    pub fn contains(&self, score: f64, closed_upper: bool) -> bool {
        score >= self.lower && (score < self.upper || (closed_upper && score == self.upper))
    }
}

/// Dwell-time limits, in seconds, for the non-terminal workflow states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DwellLimits {
    pub pending_secs: u64,
    pub in_progress_secs: u64,
    pub escalated_secs: u64,
}

impl Default for DwellLimits {
    fn default() -> Self {
        Self {
            pending_secs: 7 * 86_400,
            in_progress_secs: 14 * 86_400,
            escalated_secs: 3 * 86_400,
        }
    }
}

/// Inputs to the default escalation policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EscalationSettings {
    /// Assessment levels that warrant escalation.
    pub levels: Vec<GovernanceLevel>,
    /// IN_PROGRESS dwell beyond which escalation is warranted regardless of
    /// level.
    pub in_progress_limit_secs: u64,
}

impl Default for EscalationSettings {
    fn default() -> Self {
        Self {
            levels: vec![GovernanceLevel::Critical, GovernanceLevel::High],
            in_progress_limit_secs: 5 * 86_400,
        }
    }
}

// ─── GovernanceConfig ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GovernanceConfig {
    pub weights: ModuleWeights,
    /// Ordered by ascending score, least-severe level last.
    pub level_bands: Vec<LevelBand>,
    pub insufficient_evidence_ceiling: f64,
    pub approval_threshold: f64,
    pub evidence_floors: BTreeMap<GovernanceModule, f64>,
    pub dwell_limits: BTreeMap<WorkflowType, DwellLimits>,
    /// Applies to workflow types without an entry in `dwell_limits`.
    pub default_dwell_limits: DwellLimits,
    pub escalation: EscalationSettings,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        let weight = 1.0 / GovernanceModule::all().len() as f64;
        Self {
            weights: GovernanceModule::all().iter().map(|m| (*m, weight)).collect(),
            level_bands: vec![
                LevelBand { level: GovernanceLevel::Critical, lower: 0.0, upper: 40.0 },
                LevelBand { level: GovernanceLevel::High, lower: 40.0, upper: 60.0 },
                LevelBand { level: GovernanceLevel::Moderate, lower: 60.0, upper: 75.0 },
                LevelBand { level: GovernanceLevel::Low, lower: 75.0, upper: 90.0 },
                LevelBand { level: GovernanceLevel::Minimal, lower: 90.0, upper: 100.0 },
            ],
            insufficient_evidence_ceiling: 60.0,
            approval_threshold: 70.0,
            evidence_floors: GovernanceModule::all().iter().map(|m| (*m, 40.0)).collect(),
            dwell_limits: BTreeMap::new(),
            default_dwell_limits: DwellLimits::default(),
            escalation: EscalationSettings::default(),
        }
    }
}

impl GovernanceConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file. `.json` is parsed as JSON, `.yaml`/`.yml` as YAML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&raw)?,
            Some("yaml") | Some("yml") => Self::from_yaml_str(&raw)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or("<none>").to_string(),
                ))
            }
        };
        tracing::info!(path = %path.display(), "loaded governance configuration");
        Ok(config)
    }

    /// Load from the file named by `AIGOV_CONFIG`, or the validated defaults
    /// when the variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => Self::load(Path::new(&path)),
            _ => {
                let config = Self::default();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Check every invariant. Called by all loaders.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_weights()?;
        self.validate_bands()?;

        if !in_score_range(self.insufficient_evidence_ceiling) {
            return Err(ConfigError::CeilingOutOfRange(self.insufficient_evidence_ceiling));
        }
        if !in_score_range(self.approval_threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.approval_threshold));
        }
        for (module, floor) in &self.evidence_floors {
            if !in_score_range(*floor) {
                return Err(ConfigError::FloorOutOfRange { module: *module, floor: *floor });
            }
        }

        validate_dwell("default", &self.default_dwell_limits)?;
        for (ty, limits) in &self.dwell_limits {
            validate_dwell(ty.as_str(), limits)?;
        }
        if self.escalation.in_progress_limit_secs == 0 {
            return Err(ConfigError::InvalidEscalationLimit);
        }
        Ok(())
    }

    fn validate_weights(&self) -> Result<(), ConfigError> {
        for module in GovernanceModule::all() {
            let weight = *self.weights.get(module).ok_or(ConfigError::MissingWeight(*module))?;
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(ConfigError::WeightOutOfRange { module: *module, weight });
            }
        }
        let sum: f64 = self.weights.values().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(ConfigError::WeightSum(sum));
        }
        Ok(())
    }

    fn validate_bands(&self) -> Result<(), ConfigError> {
        let (first, last) = match (self.level_bands.first(), self.level_bands.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => return Err(ConfigError::NoBands),
        };
        for band in &self.level_bands {
            if !band.lower.is_finite() || !band.upper.is_finite() || band.lower >= band.upper {
                return Err(ConfigError::BandRange {
                    level: band.level,
                    lower: band.lower,
                    upper: band.upper,
                });
            }
        }
        if first.lower != 0.0 {
            return Err(ConfigError::BandsStart(first.lower));
        }
        if last.upper != 100.0 {
            return Err(ConfigError::BandsEnd(last.upper));
        }
        for pair in self.level_bands.windows(2) {
            let (lo, hi) = (&pair[0], &pair[1]);
            if hi.lower > lo.upper {
                return Err(ConfigError::BandGap { upper: lo.upper, next_lower: hi.lower });
            }
            if hi.lower < lo.upper {
                return Err(ConfigError::BandOverlap { upper: lo.upper, next_lower: hi.lower });
            }
            if hi.level >= lo.level {
                return Err(ConfigError::BandOrder { lower_band: lo.level, upper_band: hi.level });
            }
        }
        Ok(())
    }

    /// Map a score to its level. Non-finite scores count as 0; scores are
    /// clamped to [0,100] first.
    pub fn classify(&self, score: f64) -> GovernanceLevel {
        let score = if score.is_finite() { score.clamp(0.0, 100.0) } else { 0.0 };
        let last = self.level_bands.len().saturating_sub(1);
        self.level_bands
            .iter()
            .enumerate()
            .find(|(i, band)| band.contains(score, *i == last))
            .map(|(_, band)| band.level)
            .unwrap_or(GovernanceLevel::Critical)
    }

    pub fn weight(&self, module: GovernanceModule) -> f64 {
        self.weights.get(&module).copied().unwrap_or(0.0)
    }

    /// Evidence floor for a module; 0 when not configured.
    pub fn evidence_floor(&self, module: GovernanceModule) -> f64 {
        self.evidence_floors.get(&module).copied().unwrap_or(0.0)
    }

    pub fn dwell_limits_for(&self, ty: WorkflowType) -> DwellLimits {
        self.dwell_limits.get(&ty).copied().unwrap_or(self.default_dwell_limits)
    }
}

fn in_score_range(v: f64) -> bool {
    v.is_finite() && (0.0..=100.0).contains(&v)
}

fn validate_dwell(scope: &str, limits: &DwellLimits) -> Result<(), ConfigError> {
    for (state, secs) in [
        ("PENDING", limits.pending_secs),
        ("IN_PROGRESS", limits.in_progress_secs),
        ("ESCALATED", limits.escalated_secs),
    ] {
        if secs == 0 {
            return Err(ConfigError::InvalidDwellLimit { scope: scope.to_string(), state });
        }
    }
    Ok(())
}

// ─── Errors ─────────────────────────────────────────────────────────

/// Configuration rejections. All are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no weight configured for module {0}")]
    MissingWeight(GovernanceModule),
    #[error("weight for {module} must be in [0,1], got {weight}")]
    WeightOutOfRange { module: GovernanceModule, weight: f64 },
    #[error("module weights must sum to 1.0, got {0}")]
    WeightSum(f64),
    #[error("at least one level band is required")]
    NoBands,
    #[error("band {level} has invalid range [{lower}, {upper})")]
    BandRange { level: GovernanceLevel, lower: f64, upper: f64 },
    #[error("level bands must start at 0, first band starts at {0}")]
    BandsStart(f64),
    #[error("level bands must end at 100, last band ends at {0}")]
    BandsEnd(f64),
    #[error("gap between bands: {upper} to {next_lower}")]
    BandGap { upper: f64, next_lower: f64 },
    #[error("overlapping bands: band ending at {upper} overlaps band starting at {next_lower}")]
    BandOverlap { upper: f64, next_lower: f64 },
    #[error("band levels must decrease in severity as scores rise: {lower_band} followed by {upper_band}")]
    BandOrder { lower_band: GovernanceLevel, upper_band: GovernanceLevel },
    #[error("insufficient-evidence ceiling must be in [0,100], got {0}")]
    CeilingOutOfRange(f64),
    #[error("approval threshold must be in [0,100], got {0}")]
    ThresholdOutOfRange(f64),
    #[error("evidence floor for {module} must be in [0,100], got {floor}")]
    FloorOutOfRange { module: GovernanceModule, floor: f64 },
    #[error("dwell limit for {scope} {state} must be positive")]
    InvalidDwellLimit { scope: String, state: &'static str },
    #[error("escalation in-progress limit must be positive")]
    InvalidEscalationLimit,
    #[error("cannot read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse config: {0}")]
    Parse(String),
    #[error("unsupported config format: {0} (expected json, yaml or yml)")]
    UnsupportedFormat(String),
}
