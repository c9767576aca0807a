//! Landscape manifests describe the texture tiers of a landscape in a RON file.
//!
//! ```text
//! (
//!     slots: ["heightmap", "normalmap"],
//!     tiers: [
//!         ["hd/heightmap.png", "hd/normalmap@0.5.png"],
//!         ["hd/heightmap.png", "hd/normalmap.png"],
//!     ],
//! )
//! ```
//!
//! Without `slots` every resource is named after its path.

use crate::progressive::{TierBundle, TierError, TierSet};
use anyhow::Result;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// The file extension under which manifests are picked up by the asset server.
pub const MANIFEST_EXTENSION: &str = "landscape.ron";

#[derive(Asset, TypePath, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LandscapeManifest {
    /// The names of the resources of each tier, in slot order.
    #[serde(default)]
    pub slots: Vec<String>,
    /// The resource paths of each tier, from lowest to highest fidelity.
    pub tiers: Vec<Vec<String>>,
}

impl LandscapeManifest {
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(ron::from_str(&text)?)
    }

    pub fn tier_set(&self) -> Result<TierSet, TierError> {
        if self.slots.is_empty() {
            return TierSet::new(
                self.tiers
                    .iter()
                    .map(|paths| TierBundle::from_identifiers(paths.iter().cloned()))
                    .collect(),
            );
        }

        let bundles = self
            .tiers
            .iter()
            .enumerate()
            .map(|(tier, paths)| {
                if paths.len() != self.slots.len() {
                    return Err(TierError::MismatchedSlotCount {
                        tier,
                        expected: self.slots.len(),
                        found: paths.len(),
                    });
                }

                Ok(TierBundle::named(
                    self.slots.iter().cloned().zip(paths.iter().cloned()),
                ))
            })
            .collect::<Result<Vec<_>, _>>()?;

        TierSet::new(bundles)
    }
}

/// Requests the [`ProgressiveTextures`](crate::plugin::ProgressiveTextures) of the entity
/// from a manifest, as soon as the manifest is loaded.
#[derive(Component, Clone, Debug, Deref)]
pub struct LandscapeManifestHandle(pub Handle<LandscapeManifest>);

#[cfg(test)]
mod tests {
    use super::*;

    const HIGHLANDS: &str = r#"(
        slots: [
            "heightmap", "normalmap", "noise",
            "diffuse_0", "normal_0", "diffuse_1", "normal_1", "diffuse_2", "normal_2",
            "diffuse_3", "splat_0", "splat_1",
        ],
        tiers: [
            [
                "hd/heightmap.png", "hd/normalmap@0.5.png", "simplex-noise.png",
                "Cliffs_02/col.jpg", "Cliffs_02/norm.jpg", "Rock_04/col.jpg", "Rock_04/norm.jpg",
                "Mud_03/col.jpg", "Mud_03/norm.jpg", "Grass_020/col.jpg",
                "hd/splatmap_00@0.5.png", "hd/splatmap_01@0.5.png",
            ],
            [
                "hd/heightmap.png", "hd/normalmap.png", "simplex-noise.png",
                "Cliffs_02/col.jpg", "Cliffs_02/norm.jpg", "Rock_04/col.jpg", "Rock_04/norm.jpg",
                "Mud_03/col.jpg", "Mud_03/norm.jpg", "Grass_020/col.jpg",
                "hd/splatmap_00.png", "hd/splatmap_01.png",
            ],
        ],
    )"#;

    #[test]
    fn named_manifest() {
        let manifest: LandscapeManifest = ron::from_str(HIGHLANDS).unwrap();
        let tiers = manifest.tier_set().unwrap();

        assert_eq!(tiers.tier_count(), 2);
        assert_eq!(tiers.unique_identifiers().len(), 15);
        assert_eq!(
            tiers.bundle(1).unwrap().get("splat_1").unwrap().identifier,
            "hd/splatmap_01.png"
        );
    }

    #[test]
    fn unnamed_manifest() {
        let manifest: LandscapeManifest =
            ron::from_str(r#"(tiers: [["80px.jpg"], ["1920px.jpg"]])"#).unwrap();
        let tiers = manifest.tier_set().unwrap();

        assert!(tiers.bundle(0).unwrap().get("80px.jpg").is_some());
    }

    #[test]
    fn slot_count_must_match() {
        let manifest = LandscapeManifest {
            slots: vec!["heightmap".into(), "normalmap".into()],
            tiers: vec![vec!["height.png".into(), "normal.png".into()], vec!["height.png".into()]],
        };

        assert_eq!(
            manifest.tier_set(),
            Err(TierError::MismatchedSlotCount {
                tier: 1,
                expected: 2,
                found: 1
            })
        );
    }
}
