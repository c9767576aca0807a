use anyhow::Result;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// How capable the rendering device is.
/// Low power devices (mobile or entry level GPUs) get a coarser terrain mesh.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailLevel {
    LowPower,
    #[default]
    Standard,
}

/// Material parameters of the terrain surface, that do not depend on the loaded tier.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub env_map_intensity: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub normal_scale: [f32; 2],
    /// Strength of the noise based variation of the diffuse layers.
    pub noise_strength: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            env_map_intensity: 0.25,
            roughness: 1.0,
            metalness: 0.25,
            normal_scale: [1.5, 2.0],
            noise_strength: 1.5,
        }
    }
}

/// The presentation parameters of a splat-mapped landscape.
#[derive(Clone, Debug, PartialEq, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct LandscapeConfig {
    /// The side length of the square terrain plane.
    pub size: f32,
    /// Height map pixels per mesh quad on low power devices.
    pub low_power_detail: u32,
    /// Height map pixels per mesh quad on all other devices.
    pub standard_detail: u32,
    pub displacement_scale: f32,
    pub displacement_bias: f32,
    /// The diffuse map used by each splat channel, as an index into the diffuse maps of a tier.
    pub diffuse_layers: Vec<usize>,
    /// Texture coordinate scale of each splat channel.
    pub layer_scales: Vec<f32>,
    pub saturation: Vec<f32>,
    pub brightness: Vec<f32>,
    pub normal_weights: Vec<f32>,
    pub noise_scale: f32,
    pub surface: SurfaceConfig,
}

impl Default for LandscapeConfig {
    fn default() -> Self {
        Self {
            size: 100.0,
            low_power_detail: 32,
            standard_detail: 8,
            displacement_scale: 10.0,
            displacement_bias: -10.0,
            diffuse_layers: vec![0, 1, 2, 3, 3, 2],
            layer_scales: vec![32.0, 64.0, 128.0, 256.0, 128.0, 128.0],
            saturation: vec![1.1, 1.1, 1.1, 1.2, 1.1, 1.1],
            brightness: vec![0.0, 0.0, 0.0, -0.075, -0.075, 0.0],
            normal_weights: vec![1.0, 1.0, 1.0],
            noise_scale: 10.0,
            surface: default(),
        }
    }
}

impl LandscapeConfig {
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(ron::from_str(&text)?)
    }

    #[inline]
    pub fn detail(&self, level: DetailLevel) -> u32 {
        match level {
            DetailLevel::LowPower => self.low_power_detail,
            DetailLevel::Standard => self.standard_detail,
        }
    }

    /// The number of mesh quads along each axis for a height map of the given size.
    pub fn grid_subdivisions(&self, height_map_size: UVec2, level: DetailLevel) -> UVec2 {
        let detail = self.detail(level).max(1);
        (height_map_size / detail).max(UVec2::ONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_follows_detail_level() {
        let config = LandscapeConfig::default();
        let size = UVec2::new(1024, 512);

        assert_eq!(
            config.grid_subdivisions(size, DetailLevel::Standard),
            UVec2::new(128, 64)
        );
        assert_eq!(
            config.grid_subdivisions(size, DetailLevel::LowPower),
            UVec2::new(32, 16)
        );
        assert_eq!(
            config.grid_subdivisions(UVec2::new(4, 4), DetailLevel::LowPower),
            UVec2::ONE
        );
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let config: LandscapeConfig =
            ron::from_str("(size: 250.0, surface: (roughness: 0.5))").unwrap();

        assert_eq!(config.size, 250.0);
        assert_eq!(config.surface.roughness, 0.5);
        assert_eq!(config.surface.metalness, 0.25);
        assert_eq!(config.diffuse_layers, [0, 1, 2, 3, 3, 2]);
    }
}
