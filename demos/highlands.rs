use bevy::prelude::*;
use bevy_landscape::prelude::*;

const MANIFEST: &str = "highlands.landscape.ron";

fn main() {
    App::new()
        .add_plugins((DefaultPlugins, LandscapePlugin::default()))
        .add_systems(Startup, setup)
        .add_systems(Update, (report_progress, report_tiers))
        .run();
}

fn setup(mut commands: Commands, asset_server: Res<AssetServer>) {
    commands.spawn(Camera3d::default());

    // The terrain receives new splat textures whenever a better tier has loaded.
    commands.spawn((
        LandscapeManifestHandle(asset_server.load(MANIFEST)),
        SplatTerrain {
            detail: DetailLevel::Standard,
        },
    ));
}

fn report_progress(progress: Res<LandscapeLoadProgress>) {
    if progress.is_changed() && progress.total > 0 {
        info!(
            "Loaded {:.0}% of the landscape textures ({} failed)",
            progress.percent(),
            progress.failed
        );
    }
}

fn report_tiers(
    terrains: Query<&SplatTextures<Handle<Image>>, Changed<SplatTextures<Handle<Image>>>>,
) {
    for splat in &terrains {
        info!("Terrain uses tier {} with a {} grid", splat.tier, splat.grid);
    }
}
