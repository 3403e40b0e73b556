//! Resolution and quality tiers
//!
//! Discrete configuration levels mapped to concrete numeric parameters.
//! Both tiers keep the legacy 0/1/2 index mapping so existing settings
//! values keep their meaning.

use crate::error::ConfigError;

/// Output resolution tier for the transformed photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionTier {
    /// Pass the source through at its original dimensions.
    #[default]
    Original,
    /// Scale down to fit within 1600x2000.
    Large,
    /// Scale down to fit within 800x600.
    Small,
}

impl ResolutionTier {
    /// Bounding box the output must fit within, or `None` for pass-through.
    pub fn max_dimensions(self) -> Option<(u32, u32)> {
        match self {
            ResolutionTier::Original => None,
            ResolutionTier::Large => Some((1600, 2000)),
            ResolutionTier::Small => Some((800, 600)),
        }
    }

    /// Map the legacy settings index (0/1/2) to a tier.
    pub fn from_index(index: u8) -> Result<Self, ConfigError> {
        match index {
            0 => Ok(ResolutionTier::Original),
            1 => Ok(ResolutionTier::Large),
            2 => Ok(ResolutionTier::Small),
            _ => Err(ConfigError::InvalidValue {
                name: "resolution",
                value: index.to_string(),
            }),
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "original" => Ok(ResolutionTier::Original),
            "large" => Ok(ResolutionTier::Large),
            "small" => Ok(ResolutionTier::Small),
            other => match other.parse::<u8>() {
                Ok(index) => Self::from_index(index),
                Err(_) => Err(ConfigError::InvalidValue {
                    name: "resolution",
                    value: s.to_string(),
                }),
            },
        }
    }
}

/// Lossy-compression quality tier for the encoded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QualityTier {
    #[default]
    High,
    Medium,
    Low,
}

impl QualityTier {
    /// Compression quality scalar in [0, 1].
    pub fn factor(self) -> f32 {
        match self {
            QualityTier::High => 1.0,
            QualityTier::Medium => 0.6,
            QualityTier::Low => 0.2,
        }
    }

    /// Quality on the JPEG encoder's 0-100 scale.
    pub fn jpeg_quality(self) -> u8 {
        (self.factor() * 100.0) as u8
    }

    /// Map the legacy settings index (0/1/2) to a tier.
    pub fn from_index(index: u8) -> Result<Self, ConfigError> {
        match index {
            0 => Ok(QualityTier::High),
            1 => Ok(QualityTier::Medium),
            2 => Ok(QualityTier::Low),
            _ => Err(ConfigError::InvalidValue {
                name: "quality",
                value: index.to_string(),
            }),
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.to_lowercase().as_str() {
            "high" => Ok(QualityTier::High),
            "medium" => Ok(QualityTier::Medium),
            "low" => Ok(QualityTier::Low),
            other => match other.parse::<u8>() {
                Ok(index) => Self::from_index(index),
                Err(_) => Err(ConfigError::InvalidValue {
                    name: "quality",
                    value: s.to_string(),
                }),
            },
        }
    }
}
