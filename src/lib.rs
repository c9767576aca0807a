//! This crate loads the textures of splat-mapped landscapes progressively,
//! so that a terrain can be rendered long before its full resolution data has arrived.
//!
//! # Background
//! A landscape surface samples a whole set of textures at once: a height map for the
//! displacement, a normal map, a noise texture, several diffuse and normal layers and the
//! splat maps that blend those layers. Loading all of them at full resolution before the first
//! frame leaves the user staring at a blank screen, while rendering each texture as soon as it
//! arrives mixes resolutions and produces visible seams.
//!
//! Instead the textures are grouped into tiers of increasing fidelity. Tier 0 is small and
//! loads quickly, later tiers replace it once every one of their textures is available.
//! See the [`progressive`] module for the selection algorithm and the [`splat`] module for how
//! a tier is turned into the inputs of a splat material.
//!
//! # Usage
//! Add the [`LandscapePlugin`](plugin::LandscapePlugin) and spawn an entity with either a
//! [`ProgressiveTextures`](plugin::ProgressiveTextures) component or a
//! [`LandscapeManifestHandle`](manifest::LandscapeManifestHandle) pointing to a
//! `*.landscape.ron` manifest. Add a [`SplatTerrain`](plugin::SplatTerrain) to receive
//! [`SplatTextures`](splat::SplatTextures) whenever a better tier becomes available.

pub mod config;
pub mod manifest;
pub mod plugin;
pub mod progressive;
pub mod splat;

#[allow(missing_docs)]
pub mod prelude {
    #[doc(hidden)]
    pub use crate::{
        config::{DetailLevel, LandscapeConfig, SurfaceConfig},
        manifest::{LandscapeManifest, LandscapeManifestHandle},
        plugin::{
            LandscapeLoadProgress, LandscapePlugin, ProgressiveTextures, SplatTerrain,
            TierAdvanced,
        },
        progressive::{
            FrontierAdvance, LoadProgress, ProgressiveSelector, ResourceSource, ResourceStatus,
            TierBundle, TierPreparation, TierSet, TierSpec,
        },
        splat::{SplatChannel, SplatTextures},
    };
}
