use crate::progressive::{
    preparation::TierPreparation,
    progress::LoadProgress,
    source::{ResourceSource, ResourceStatus},
    tiers::TierSet,
};
use bevy::{
    prelude::*,
    utils::{HashMap, HashSet},
};
use slab::Slab;
use std::collections::BTreeMap;

/// Identifies a listener registered with [`ProgressiveSelector::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

/// Describes a move of the frontier to a higher tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrontierAdvance {
    /// The frontier before the advance, `None` if no tier was available yet.
    pub previous: Option<usize>,
    pub current: usize,
}

/// The resolution state of a whole tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TierState {
    /// Some resources of the tier are still loading.
    Pending,
    /// All resources of the tier are loaded.
    Complete,
    /// A resource of the tier failed to load, the tier will never complete.
    Stalled,
}

pub type FrontierListener = Box<dyn FnMut(&FrontierAdvance) + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedResource<H> {
    pub name: String,
    pub identifier: String,
    pub handle: H,
}

/// The loaded resources of a completed tier, in the order of its bundle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedTier<H> {
    resources: Vec<ResolvedResource<H>>,
}

impl<H> ResolvedTier<H> {
    pub fn get(&self, name: &str) -> Option<&H> {
        self.resources
            .iter()
            .find(|resource| resource.name == name)
            .map(|resource| &resource.handle)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedResource<H>> {
        self.resources.iter()
    }

    pub fn handles(&self) -> impl Iterator<Item = &H> {
        self.resources.iter().map(|resource| &resource.handle)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

struct RequestedResource<H> {
    handle: H,
    status: ResourceStatus,
}

/// Selects the best fully loaded tier of a [`TierSet`].
///
/// Each distinct identifier of the tier set is requested exactly once, when the selector
/// is created. Afterwards the selector is driven either by [`poll`](Self::poll)ing the
/// resource source or by reporting individual results through
/// [`resource_ready`](Self::resource_ready) and [`resource_failed`](Self::resource_failed).
///
/// The frontier is the highest tier index `i` for which the tiers `0..=i` are all complete.
/// It never decreases and never skips an incomplete tier, so the consumer always renders a
/// consistent set of resources. Tiers that complete above a gap are kept, but only become
/// visible once the gap closes. A failed resource stalls its tiers for good, which leaves
/// the frontier at the last consistent tier.
pub struct ProgressiveSelector<H> {
    tiers: TierSet,
    requests: HashMap<String, RequestedResource<H>>,
    tier_states: Vec<TierState>,
    resolved: BTreeMap<usize, ResolvedTier<H>>,
    frontier: Option<usize>,
    /// Identifiers that already went through [`TierPreparation::initialize`].
    prepared: HashSet<String>,
    listeners: Slab<FrontierListener>,
}

impl<H: Clone> ProgressiveSelector<H> {
    pub fn new<S>(tiers: TierSet, source: &mut S) -> Self
    where
        S: ResourceSource<Handle = H>,
    {
        let mut requests = HashMap::default();

        for identifier in tiers.unique_identifiers() {
            debug!("Requesting progressive resource: {identifier}");

            requests.insert(
                identifier.to_owned(),
                RequestedResource {
                    handle: source.request(identifier),
                    status: ResourceStatus::Pending,
                },
            );
        }

        let mut selector = Self {
            tier_states: vec![TierState::Pending; tiers.tier_count()],
            tiers,
            requests,
            resolved: BTreeMap::new(),
            frontier: None,
            prepared: HashSet::default(),
            listeners: Slab::new(),
        };

        // resources that are available right away make the first tier usable immediately
        selector.poll(source);
        selector
    }

    /// Reads the status of every pending resource from the source.
    pub fn poll<S>(&mut self, source: &S) -> Option<FrontierAdvance>
    where
        S: ResourceSource<Handle = H>,
    {
        let mut changed = false;

        for request in self.requests.values_mut() {
            if request.status != ResourceStatus::Pending {
                continue;
            }

            let status = source.status(&request.handle);

            if status != ResourceStatus::Pending {
                request.status = status;
                changed = true;
            }
        }

        if changed {
            self.update_tiers()
        } else {
            None
        }
    }

    pub fn resource_ready(&mut self, identifier: &str) -> Option<FrontierAdvance> {
        self.resource_finished(identifier, ResourceStatus::Ready)
    }

    pub fn resource_failed(&mut self, identifier: &str) -> Option<FrontierAdvance> {
        self.resource_finished(identifier, ResourceStatus::Failed)
    }

    fn resource_finished(
        &mut self,
        identifier: &str,
        status: ResourceStatus,
    ) -> Option<FrontierAdvance> {
        let Some(request) = self.requests.get_mut(identifier) else {
            debug!("Ignoring result for unknown resource: {identifier}");
            return None;
        };

        if request.status != ResourceStatus::Pending {
            return None;
        }

        request.status = status;
        self.update_tiers()
    }

    fn status_of(&self, identifier: &str) -> ResourceStatus {
        self.requests
            .get(identifier)
            .map_or(ResourceStatus::Pending, |request| request.status)
    }

    fn update_tiers(&mut self) -> Option<FrontierAdvance> {
        for tier in 0..self.tier_states.len() {
            if self.tier_states[tier] != TierState::Pending {
                continue;
            }

            let resources = self.tiers.bundles()[tier].resources();
            let statuses = resources
                .iter()
                .map(|resource| self.status_of(&resource.identifier))
                .collect::<Vec<_>>();

            if statuses.contains(&ResourceStatus::Failed) {
                warn!("Tier {tier} can not be loaded, staying at tier {:?}", self.frontier);
                self.tier_states[tier] = TierState::Stalled;
            } else if statuses.iter().all(|&status| status == ResourceStatus::Ready) {
                let resources = resources
                    .iter()
                    .filter_map(|resource| {
                        let request = self.requests.get(&resource.identifier)?;

                        Some(ResolvedResource {
                            name: resource.name.clone(),
                            identifier: resource.identifier.clone(),
                            handle: request.handle.clone(),
                        })
                    })
                    .collect();

                debug!("Tier {tier} finished loading");
                self.resolved.insert(tier, ResolvedTier { resources });
                self.tier_states[tier] = TierState::Complete;
            }
        }

        self.advance_frontier()
    }

    fn advance_frontier(&mut self) -> Option<FrontierAdvance> {
        let previous = self.frontier;

        let mut next = previous.map_or(0, |frontier| frontier + 1);
        while self.tier_states.get(next) == Some(&TierState::Complete) {
            next += 1;
        }

        let current = next.checked_sub(1)?;

        if previous == Some(current) {
            return None;
        }

        info!("Progressive tier advanced from {previous:?} to {current}");

        self.frontier = Some(current);

        let advance = FrontierAdvance { previous, current };
        for (_, listener) in self.listeners.iter_mut() {
            listener(&advance);
        }

        Some(advance)
    }

    /// Prepares the resources of the frontier tier for rendering.
    ///
    /// Every resource is initialized once over the lifetime of the selector.
    /// All resources but the first of the tier are set to repeat.
    pub fn prepare_current<P>(&mut self, context: &mut P)
    where
        P: TierPreparation<H>,
    {
        let Some(tier) = self.frontier.and_then(|index| self.resolved.get(&index)) else {
            return;
        };

        for (slot, resource) in tier.resources.iter().enumerate() {
            if self.prepared.insert(resource.identifier.clone()) {
                context.initialize(&resource.handle);
            }

            if slot > 0 {
                context.set_repeat_wrapping(&resource.handle);
            }
        }
    }

    /// Releases every requested resource and drops all listeners.
    pub fn teardown<S>(self, source: &mut S)
    where
        S: ResourceSource<Handle = H>,
    {
        let pending = self
            .requests
            .values()
            .filter(|request| request.status == ResourceStatus::Pending)
            .count();

        debug!(
            "Tearing down progressive selector with {} resources ({pending} still pending)",
            self.requests.len()
        );

        for (_, request) in self.requests {
            source.release(request.handle);
        }
    }
}

impl<H> ProgressiveSelector<H> {
    /// Registers a listener, which is called once for every frontier advance.
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&FrontierAdvance) + Send + Sync + 'static,
    {
        ListenerId(self.listeners.insert(Box::new(listener)))
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.try_remove(id.0).is_some()
    }

    #[inline]
    pub fn frontier(&self) -> Option<usize> {
        self.frontier
    }

    pub fn resolved(&self, tier: usize) -> Option<&ResolvedTier<H>> {
        self.resolved.get(&tier)
    }

    /// The frontier tier together with its resources.
    pub fn current(&self) -> Option<(usize, &ResolvedTier<H>)> {
        let index = self.frontier?;
        self.resolved.get(&index).map(|tier| (index, tier))
    }

    pub fn tier_state(&self, tier: usize) -> Option<TierState> {
        self.tier_states.get(tier).copied()
    }

    pub fn is_tier_complete(&self, tier: usize) -> bool {
        self.tier_state(tier) == Some(TierState::Complete)
    }

    pub fn tiers(&self) -> &TierSet {
        &self.tiers
    }

    pub fn handle(&self, identifier: &str) -> Option<&H> {
        self.requests.get(identifier).map(|request| &request.handle)
    }

    pub fn progress(&self) -> LoadProgress {
        self.requests.values().fold(
            LoadProgress {
                total: self.requests.len(),
                ..default()
            },
            |mut progress, request| {
                match request.status {
                    ResourceStatus::Ready => progress.ready += 1,
                    ResourceStatus::Failed => progress.failed += 1,
                    ResourceStatus::Pending => {}
                }
                progress
            },
        )
    }
}
