//! Progressive loading of resources that come in several levels of fidelity.
//!
//! # Explanation
//! A render surface like a terrain needs a whole set of textures (height, normal, splat and
//! diffuse maps) at a consistent quality. Such a set is described by a [`TierSet`]: an
//! ordered list of [`TierBundle`]s, where tier 0 is a cheap fallback and every later tier
//! improves on it.
//!
//! The [`ProgressiveSelector`] requests every distinct resource of all tiers once and keeps
//! track of the highest tier that is fully loaded, the so called frontier. The consumer
//! always renders the frontier tier and is notified whenever a better one becomes
//! available. Loading itself is delegated to a [`ResourceSource`], which for Bevy apps is
//! the [`AssetServer`](bevy::asset::AssetServer).

pub mod preparation;
pub mod progress;
pub mod selector;
pub mod source;
pub mod tiers;

pub use self::{
    preparation::TierPreparation,
    progress::LoadProgress,
    selector::{
        FrontierAdvance, FrontierListener, ListenerId, ProgressiveSelector, ResolvedResource,
        ResolvedTier, TierState,
    },
    source::{AssetServerSource, ResourceSource, ResourceStatus},
    tiers::{TierBundle, TierError, TierResource, TierSet, TierSpec},
};
