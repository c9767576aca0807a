use crate::{
    config::{DetailLevel, LandscapeConfig},
    manifest::{LandscapeManifest, LandscapeManifestHandle, MANIFEST_EXTENSION},
    progressive::{AssetServerSource, LoadProgress, ProgressiveSelector, TierSet},
    splat::SplatTextures,
};
use bevy::{asset::LoadState, prelude::*};
use bevy_common_assets::ron::RonAssetPlugin;
use std::ops::Add;

/// The progressively loaded textures of a render surface.
///
/// Removing the component (or despawning its entity) releases all of its textures.
#[derive(Component)]
pub struct ProgressiveTextures {
    selector: ProgressiveSelector<Handle<Image>>,
    /// The last frontier announced through a [`TierAdvanced`] event.
    announced: Option<usize>,
}

impl ProgressiveTextures {
    pub fn new(tiers: TierSet, asset_server: &AssetServer) -> Self {
        Self::from_selector(ProgressiveSelector::new(
            tiers,
            &mut AssetServerSource(asset_server),
        ))
    }

    pub fn from_selector(selector: ProgressiveSelector<Handle<Image>>) -> Self {
        Self {
            selector,
            announced: None,
        }
    }

    pub fn selector(&self) -> &ProgressiveSelector<Handle<Image>> {
        &self.selector
    }

    pub fn selector_mut(&mut self) -> &mut ProgressiveSelector<Handle<Image>> {
        &mut self.selector
    }
}

/// Sent whenever the frontier of a [`ProgressiveTextures`] component moves to a higher tier.
#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierAdvanced {
    pub entity: Entity,
    pub previous: Option<usize>,
    pub current: usize,
}

/// Marks an entity with [`ProgressiveTextures`] as a splat-mapped terrain.
/// Its [`SplatTextures`] are rebuilt on every [`TierAdvanced`] event.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct SplatTerrain {
    pub detail: DetailLevel,
}

/// The combined load progress of all [`ProgressiveTextures`].
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq, Deref)]
pub struct LandscapeLoadProgress(pub LoadProgress);

/// The plugin for progressively loaded landscapes.
#[derive(Default)]
pub struct LandscapePlugin {
    pub config: LandscapeConfig,
}

impl Plugin for LandscapePlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(RonAssetPlugin::<LandscapeManifest>::new(&[
            MANIFEST_EXTENSION,
        ]))
        .insert_resource(self.config.clone())
        .init_resource::<LandscapeLoadProgress>()
        .add_event::<TierAdvanced>()
        .add_systems(
            Update,
            (
                instantiate_manifests,
                poll_progressive_textures,
                apply_splat_textures,
                update_load_progress,
            )
                .chain(),
        );
    }
}

pub(crate) fn instantiate_manifests(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    manifests: Res<Assets<LandscapeManifest>>,
    query: Query<(Entity, &LandscapeManifestHandle), Without<ProgressiveTextures>>,
) {
    for (entity, handle) in &query {
        let Some(manifest) = manifests.get(&handle.0) else {
            if let Some(LoadState::Failed(error)) = asset_server.get_load_state(handle.id()) {
                warn!("Failed to load landscape manifest: {error}");
                commands.entity(entity).remove::<LandscapeManifestHandle>();
            }
            continue;
        };

        let mut entity = commands.entity(entity);
        entity.remove::<LandscapeManifestHandle>();

        match manifest.tier_set() {
            Ok(tiers) => {
                info!(
                    "Loading landscape with {} tiers from {:?}",
                    tiers.tier_count(),
                    handle.path()
                );
                entity.insert(ProgressiveTextures::new(tiers, &asset_server));
            }
            Err(error) => warn!("Invalid landscape manifest {:?}: {error}", handle.path()),
        }
    }
}

pub(crate) fn poll_progressive_textures(
    asset_server: Res<AssetServer>,
    mut images: ResMut<Assets<Image>>,
    mut query: Query<(Entity, &mut ProgressiveTextures)>,
    mut tier_events: EventWriter<TierAdvanced>,
) {
    let source = AssetServerSource(&asset_server);

    for (entity, mut textures) in &mut query {
        // only an advance is a change other systems care about
        let polled = textures.bypass_change_detection();
        polled.selector.poll(&source);

        // the frontier may also have moved while the component was created
        if polled.selector.frontier() == polled.announced {
            continue;
        }

        let textures = textures.as_mut();
        let frontier = textures.selector.frontier();

        if let Some(current) = frontier {
            textures.selector.prepare_current(&mut *images);

            tier_events.send(TierAdvanced {
                entity,
                previous: textures.announced,
                current,
            });
        }

        textures.announced = frontier;
    }
}

pub(crate) fn apply_splat_textures(
    mut commands: Commands,
    mut tier_events: EventReader<TierAdvanced>,
    config: Res<LandscapeConfig>,
    images: Res<Assets<Image>>,
    terrains: Query<(&ProgressiveTextures, &SplatTerrain)>,
) {
    for event in tier_events.read() {
        let Ok((textures, terrain)) = terrains.get(event.entity) else {
            continue;
        };
        let Some((tier, resolved)) = textures.selector.current() else {
            continue;
        };

        match SplatTextures::from_tier(tier, resolved, &config) {
            Ok(mut splat) => {
                if let Some(image) = images.get(&splat.displacement_map) {
                    splat.grid = config.grid_subdivisions(image.size(), terrain.detail);
                }

                commands.entity(event.entity).insert(splat);
            }
            Err(error) => warn!("Tier {tier} can not be used as a splat terrain: {error}"),
        }
    }
}

pub(crate) fn update_load_progress(
    query: Query<&ProgressiveTextures>,
    mut progress: ResMut<LandscapeLoadProgress>,
) {
    let total = query
        .iter()
        .map(|textures| textures.selector.progress())
        .fold(LoadProgress::default(), Add::add);

    progress.set_if_neq(LandscapeLoadProgress(total));
}
