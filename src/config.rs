//! Scene configuration
//!
//! The scene is fully described by a handful of constants. They can be
//! overridden from a YAML document for experimentation; any field left out
//! keeps its default.

use rand::{rngs::StdRng, SeedableRng};
use serde::Deserialize;

use crate::error::{Result, SceneError};

pub const PARTICLE_COUNT: usize = 4000;
pub const ORNAMENT_COUNT: usize = 150;
pub const TREE_HEIGHT: f32 = 12.0;
pub const TREE_RADIUS: f32 = 4.5;
pub const SCATTER_RADIUS: f32 = 25.0;

/// An RGB colour with components in [0, 1], written as `#RRGGBB` in YAML.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb(pub [f32; 3]);

impl Rgb {
    pub fn from_u32(hex: u32) -> Self {
        Self([
            ((hex >> 16) & 0xff) as f32 / 255.0,
            ((hex >> 8) & 0xff) as f32 / 255.0,
            (hex & 0xff) as f32 / 255.0,
        ])
    }

    /// Parse a `#RRGGBB` string (the leading `#` is optional)
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(SceneError::InvalidColor(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(Self::from_u32)
            .map_err(|_| SceneError::InvalidColor(s.to_string()))
    }

    pub fn r(&self) -> f32 {
        self.0[0]
    }

    pub fn g(&self) -> f32 {
        self.0[1]
    }

    pub fn b(&self) -> f32 {
        self.0[2]
    }
}

impl TryFrom<String> for Rgb {
    type Error = SceneError;

    fn try_from(s: String) -> Result<Self> {
        Self::from_hex(&s)
    }
}

/// Named colours used across the scene
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    pub background: Rgb,
    pub emerald_deep: Rgb,
    pub emerald_light: Rgb,
    pub gold: Rgb,
    pub gold_light: Rgb,
    pub gold_dark: Rgb,
    pub glow: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgb::from_u32(0x000502),
            emerald_deep: Rgb::from_u32(0x002816),
            emerald_light: Rgb::from_u32(0x006B3C),
            gold: Rgb::from_u32(0xD4AF37),
            gold_light: Rgb::from_u32(0xFEDC56),
            gold_dark: Rgb::from_u32(0xAA8822),
            glow: Rgb::from_u32(0x4FFFA1),
        }
    }
}

/// Everything needed to generate the two fields
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub particle_count: usize,
    pub ornament_count: usize,
    pub tree_height: f32,
    pub tree_radius: f32,
    pub scatter_radius: f32,
    /// Fixed RNG seed; a fresh entropy seed is used when absent
    pub seed: Option<u64>,
    pub palette: Palette,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            ornament_count: ORNAMENT_COUNT,
            tree_height: TREE_HEIGHT,
            tree_radius: TREE_RADIUS,
            scatter_radius: SCATTER_RADIUS,
            seed: None,
            palette: Palette::default(),
        }
    }
}

impl SceneConfig {
    /// Parse from YAML string and validate
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: SceneConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.particle_count == 0 {
            return Err(SceneError::InvalidConfig(
                "particle_count must be at least 1".to_string(),
            ));
        }
        if self.ornament_count == 0 {
            return Err(SceneError::InvalidConfig(
                "ornament_count must be at least 1".to_string(),
            ));
        }

        for (name, value) in [
            ("tree_height", self.tree_height),
            ("tree_radius", self.tree_radius),
            ("scatter_radius", self.scatter_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SceneError::InvalidConfig(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    /// RNG used to generate both fields
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_defaults_match_constants() {
        let config = SceneConfig::default();
        assert_eq!(config.particle_count, 4000);
        assert_eq!(config.ornament_count, 150);
        assert_eq!(config.tree_height, 12.0);
        assert_eq!(config.tree_radius, 4.5);
        assert_eq!(config.scatter_radius, 25.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rgb_from_hex() {
        let gold = Rgb::from_hex("#D4AF37").unwrap();
        assert!((gold.r() - 212.0 / 255.0).abs() < 0.0001);
        assert!((gold.g() - 175.0 / 255.0).abs() < 0.0001);
        assert!((gold.b() - 55.0 / 255.0).abs() < 0.0001);

        assert_eq!(Rgb::from_hex("4fffa1").unwrap(), Rgb::from_u32(0x4FFFA1));
        assert!(Rgb::from_hex("#FFF").is_err());
        assert!(Rgb::from_hex("#GGGGGG").is_err());
        assert!(Rgb::from_hex("#+FFFFF").is_err());
        assert!(Rgb::from_hex("-FFFFF").is_err());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r##"
particle_count: 500
seed: 7
palette:
  gold: "#FFFFFF"
"##;
        let config = SceneConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.particle_count, 500);
        assert_eq!(config.ornament_count, ORNAMENT_COUNT);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.palette.gold, Rgb([1.0, 1.0, 1.0]));
        assert_eq!(config.palette.gold_light, Palette::default().gold_light);
    }

    #[test]
    fn test_invalid_yaml_rejected() {
        assert!(matches!(
            SceneConfig::from_yaml("particle_count: 0"),
            Err(SceneError::InvalidConfig(_))
        ));
        assert!(matches!(
            SceneConfig::from_yaml("tree_radius: -1.0"),
            Err(SceneError::InvalidConfig(_))
        ));
        assert!(matches!(
            SceneConfig::from_yaml("palette:\n  gold: yellow"),
            Err(SceneError::ConfigParse(_))
        ));
        assert!(matches!(
            SceneConfig::from_yaml("snow: true"),
            Err(SceneError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let config = SceneConfig {
            seed: Some(42),
            ..Default::default()
        };
        let a: f32 = config.rng().gen();
        let b: f32 = config.rng().gen();
        assert_eq!(a, b);
    }
}
