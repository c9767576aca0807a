//! The inputs of a splat-mapped terrain material, taken from a resolved tier.
//!
//! A splat material blends several diffuse and normal layers over the terrain, weighted by
//! the channels of the splat masks. The tier layout follows the slot names below. Tiers that
//! use none of these names are read positionally in [`SPLAT_SLOTS`] order.

use crate::{config::LandscapeConfig, progressive::ResolvedTier};
use bevy::prelude::*;
use derive_more::derive::{Display, Error};

pub const HEIGHTMAP: &str = "heightmap";
pub const NORMALMAP: &str = "normalmap";
pub const NOISE: &str = "noise";
pub const DIFFUSE_MAPS: [&str; 4] = ["diffuse_0", "diffuse_1", "diffuse_2", "diffuse_3"];
pub const NORMAL_MAPS: [&str; 3] = ["normal_0", "normal_1", "normal_2"];
pub const SPLAT_MAPS: [&str; 2] = ["splat_0", "splat_1"];

/// The canonical slot order of a splat tier.
pub const SPLAT_SLOTS: [&str; 12] = [
    HEIGHTMAP,
    NORMALMAP,
    NOISE,
    DIFFUSE_MAPS[0],
    NORMAL_MAPS[0],
    DIFFUSE_MAPS[1],
    NORMAL_MAPS[1],
    DIFFUSE_MAPS[2],
    NORMAL_MAPS[2],
    DIFFUSE_MAPS[3],
    SPLAT_MAPS[0],
    SPLAT_MAPS[1],
];

/// Every splat map stores one weight per color channel.
const CHANNELS_PER_SPLAT_MAP: usize = 4;

#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum SplatError {
    #[display("the tier has no `{_0}` texture")]
    MissingSlot(#[error(not(source))] &'static str),
    #[display("splat channel {channel} uses diffuse map {layer}, but there are only {} diffuse maps", DIFFUSE_MAPS.len())]
    InvalidDiffuseLayer { channel: usize, layer: usize },
    #[display("{found} splat channels are configured, but at most {supported} are supported")]
    TooManyChannels { found: usize, supported: usize },
    #[display("`{name}` configures {found} splat channels instead of {expected}")]
    MismatchedChannelCount {
        name: &'static str,
        expected: usize,
        found: usize,
    },
}

/// How a single splat channel is shaded.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplatChannel {
    /// Index into [`SplatTextures::diffuse_maps`].
    pub diffuse_map: usize,
    pub scale: f32,
    pub saturation: f32,
    pub brightness: f32,
}

/// Builds the per channel shading parameters from the configuration.
pub fn splat_channels(config: &LandscapeConfig) -> Result<Vec<SplatChannel>, SplatError> {
    let count = config.diffuse_layers.len();
    let supported = SPLAT_MAPS.len() * CHANNELS_PER_SPLAT_MAP;

    if count > supported {
        return Err(SplatError::TooManyChannels {
            found: count,
            supported,
        });
    }

    for (name, found) in [
        ("layer_scales", config.layer_scales.len()),
        ("saturation", config.saturation.len()),
        ("brightness", config.brightness.len()),
    ] {
        if found != count {
            return Err(SplatError::MismatchedChannelCount {
                name,
                expected: count,
                found,
            });
        }
    }

    config
        .diffuse_layers
        .iter()
        .enumerate()
        .map(|(channel, &layer)| {
            if layer >= DIFFUSE_MAPS.len() {
                return Err(SplatError::InvalidDiffuseLayer { channel, layer });
            }

            Ok(SplatChannel {
                diffuse_map: layer,
                scale: config.layer_scales[channel],
                saturation: config.saturation[channel],
                brightness: config.brightness[channel],
            })
        })
        .collect()
}

/// The textures and shading parameters of a splat terrain at one tier.
#[derive(Component, Clone, Debug)]
pub struct SplatTextures<H> {
    /// The tier the textures were taken from.
    pub tier: usize,
    pub displacement_map: H,
    pub normal_map: H,
    pub noise: H,
    pub diffuse_maps: Vec<H>,
    pub normal_maps: Vec<H>,
    pub splat_maps: Vec<H>,
    pub channels: Vec<SplatChannel>,
    /// The number of mesh quads along each axis.
    pub grid: UVec2,
}

impl<H: Clone> SplatTextures<H> {
    pub fn from_tier(
        tier: usize,
        resolved: &ResolvedTier<H>,
        config: &LandscapeConfig,
    ) -> Result<Self, SplatError> {
        let named = resolved
            .iter()
            .any(|resource| SPLAT_SLOTS.contains(&resource.name.as_str()));

        let slot = |name: &'static str| -> Result<H, SplatError> {
            let handle = if named {
                resolved.get(name)
            } else {
                SPLAT_SLOTS
                    .iter()
                    .position(|&slot| slot == name)
                    .and_then(|index| resolved.handles().nth(index))
            };

            handle.cloned().ok_or(SplatError::MissingSlot(name))
        };

        let slots = |names: &[&'static str]| -> Result<Vec<H>, SplatError> {
            names.iter().map(|&name| slot(name)).collect()
        };

        Ok(Self {
            tier,
            displacement_map: slot(HEIGHTMAP)?,
            normal_map: slot(NORMALMAP)?,
            noise: slot(NOISE)?,
            diffuse_maps: slots(&DIFFUSE_MAPS)?,
            normal_maps: slots(&NORMAL_MAPS)?,
            splat_maps: slots(&SPLAT_MAPS)?,
            channels: splat_channels(config)?,
            grid: UVec2::ONE,
        })
    }

    /// The diffuse map of every splat channel.
    pub fn channel_diffuse_maps(&self) -> impl Iterator<Item = &H> {
        self.channels
            .iter()
            .map(|channel| &self.diffuse_maps[channel.diffuse_map])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progressive::{
        ProgressiveSelector, ResourceSource, ResourceStatus, TierBundle, TierSet,
    };

    struct ReadySource;

    impl ResourceSource for ReadySource {
        type Handle = String;

        fn request(&mut self, identifier: &str) -> String {
            identifier.to_owned()
        }

        fn status(&self, _: &String) -> ResourceStatus {
            ResourceStatus::Ready
        }

        fn release(&mut self, _: String) {}
    }

    fn resolve(bundle: TierBundle) -> ProgressiveSelector<String> {
        ProgressiveSelector::new(TierSet::new(vec![bundle]).unwrap(), &mut ReadySource)
    }

    #[test]
    fn reads_named_slots() {
        let bundle = SPLAT_SLOTS
            .iter()
            .rev()
            .fold(TierBundle::default(), |bundle, &name| {
                bundle.with(name, format!("{name}.png"))
            });
        let selector = resolve(bundle);
        let (tier, resolved) = selector.current().unwrap();

        let textures =
            SplatTextures::from_tier(tier, resolved, &LandscapeConfig::default()).unwrap();

        assert_eq!(textures.displacement_map, "heightmap.png");
        assert_eq!(textures.splat_maps, ["splat_0.png", "splat_1.png"]);
        assert_eq!(
            textures.channel_diffuse_maps().collect::<Vec<_>>(),
            [
                "diffuse_0.png",
                "diffuse_1.png",
                "diffuse_2.png",
                "diffuse_3.png",
                "diffuse_3.png",
                "diffuse_2.png"
            ]
        );
    }

    #[test]
    fn reads_unnamed_slots_in_order() {
        let selector = resolve(TierBundle::from_identifiers(
            (0..12).map(|index| format!("{index}.jpg")),
        ));
        let (tier, resolved) = selector.current().unwrap();

        let textures =
            SplatTextures::from_tier(tier, resolved, &LandscapeConfig::default()).unwrap();

        assert_eq!(textures.noise, "2.jpg");
        assert_eq!(textures.normal_maps, ["4.jpg", "6.jpg", "8.jpg"]);
        assert_eq!(textures.channels[3].brightness, -0.075);
    }

    #[test]
    fn missing_slot_is_reported() {
        let selector = resolve(TierBundle::named([(HEIGHTMAP, "heightmap.png")]));
        let (tier, resolved) = selector.current().unwrap();

        assert_eq!(
            SplatTextures::from_tier(tier, resolved, &LandscapeConfig::default()).unwrap_err(),
            SplatError::MissingSlot(NORMALMAP)
        );
    }

    #[test]
    fn channel_configuration_is_validated() {
        let mut config = LandscapeConfig::default();
        config.diffuse_layers[5] = 4;
        assert_eq!(
            splat_channels(&config),
            Err(SplatError::InvalidDiffuseLayer {
                channel: 5,
                layer: 4
            })
        );

        let mut config = LandscapeConfig::default();
        config.saturation.pop();
        assert_eq!(
            splat_channels(&config),
            Err(SplatError::MismatchedChannelCount {
                name: "saturation",
                expected: 6,
                found: 5
            })
        );
    }
}
