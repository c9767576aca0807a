use bevy::utils::HashSet;
use derive_more::derive::{Display, Error};
use itertools::Itertools;

/// Errors raised while assembling a [`TierSet`].
#[derive(Clone, Debug, Display, Error, PartialEq, Eq)]
pub enum TierError {
    #[display("a tier set needs at least one tier")]
    Empty,
    #[display("tier {_0} does not contain any resource")]
    EmptyBundle(#[error(not(source))] usize),
    #[display("tier {tier} lists the resource name `{name}` more than once")]
    DuplicateName { tier: usize, name: String },
    #[display("resource `{name}` has {found} tiers, but {expected} were expected")]
    MismatchedTierCount {
        name: String,
        expected: usize,
        found: usize,
    },
    #[display("tier {tier} has {found} resources, but {expected} slots are named")]
    MismatchedSlotCount {
        tier: usize,
        expected: usize,
        found: usize,
    },
}

/// A named resource inside a [`TierBundle`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TierResource {
    /// The slot name the consumer uses to look the resource up (e.g. `heightmap`).
    pub name: String,
    /// The identifier handed to the resource source, usually an asset path.
    pub identifier: String,
}

/// One named resource across all tiers, ordered from lowest to highest fidelity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TierSpec {
    pub name: String,
    pub identifiers: Vec<String>,
}

impl TierSpec {
    pub fn new<I, S>(name: impl Into<String>, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            identifiers: identifiers.into_iter().map(Into::into).collect(),
        }
    }
}

/// The resources that have to resolve together for a single tier.
///
/// The order of the resources is preserved, the first one is the base resource of the tier
/// (the height map of a terrain) and is never configured for repeated sampling.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TierBundle {
    resources: Vec<TierResource>,
}

impl TierBundle {
    /// Creates a bundle whose resource names are the identifiers themselves.
    pub fn from_identifiers<I, S>(identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let resources = identifiers
            .into_iter()
            .map(|identifier| {
                let identifier = identifier.into();
                TierResource {
                    name: identifier.clone(),
                    identifier,
                }
            })
            .collect();

        Self { resources }
    }

    /// Creates a bundle from `(name, identifier)` pairs.
    pub fn named<I, N, S>(resources: I) -> Self
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<String>,
    {
        let resources = resources
            .into_iter()
            .map(|(name, identifier)| TierResource {
                name: name.into(),
                identifier: identifier.into(),
            })
            .collect();

        Self { resources }
    }

    pub fn with(mut self, name: impl Into<String>, identifier: impl Into<String>) -> Self {
        self.resources.push(TierResource {
            name: name.into(),
            identifier: identifier.into(),
        });
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn resources(&self) -> &[TierResource] {
        &self.resources
    }

    pub fn get(&self, name: &str) -> Option<&TierResource> {
        self.resources.iter().find(|resource| resource.name == name)
    }
}

/// The ordered sequence of [`TierBundle`]s of one render surface.
///
/// Index 0 is the fallback tier, every later tier strictly improves the quality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TierSet {
    bundles: Vec<TierBundle>,
}

impl TierSet {
    pub fn new(bundles: Vec<TierBundle>) -> Result<Self, TierError> {
        if bundles.is_empty() {
            return Err(TierError::Empty);
        }

        for (tier, bundle) in bundles.iter().enumerate() {
            if bundle.is_empty() {
                return Err(TierError::EmptyBundle(tier));
            }

            let mut names = HashSet::default();
            for resource in bundle.resources() {
                if !names.insert(resource.name.as_str()) {
                    return Err(TierError::DuplicateName {
                        tier,
                        name: resource.name.clone(),
                    });
                }
            }
        }

        Ok(Self { bundles })
    }

    /// Transposes per resource tier lists into one bundle per tier.
    /// All specs must list the same number of tiers.
    pub fn from_specs(specs: Vec<TierSpec>) -> Result<Self, TierError> {
        let Some(expected) = specs.first().map(|spec| spec.identifiers.len()) else {
            return Err(TierError::Empty);
        };

        if let Some(spec) = specs
            .iter()
            .find(|spec| spec.identifiers.len() != expected)
        {
            return Err(TierError::MismatchedTierCount {
                name: spec.name.clone(),
                expected,
                found: spec.identifiers.len(),
            });
        }

        let bundles = (0..expected)
            .map(|tier| {
                TierBundle::named(
                    specs
                        .iter()
                        .map(|spec| (spec.name.clone(), spec.identifiers[tier].clone())),
                )
            })
            .collect();

        Self::new(bundles)
    }

    /// A single resource available in several resolutions.
    pub fn single<I, S>(identifiers: I) -> Result<Self, TierError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            identifiers
                .into_iter()
                .map(|identifier| TierBundle::from_identifiers([identifier]))
                .collect(),
        )
    }

    #[inline]
    pub fn tier_count(&self) -> usize {
        self.bundles.len()
    }

    pub fn bundle(&self, tier: usize) -> Option<&TierBundle> {
        self.bundles.get(tier)
    }

    pub fn bundles(&self) -> &[TierBundle] {
        &self.bundles
    }

    /// Every distinct identifier, in the order it is first listed (tier by tier).
    pub fn unique_identifiers(&self) -> Vec<&str> {
        self.bundles
            .iter()
            .flat_map(|bundle| bundle.resources())
            .map(|resource| resource.identifier.as_str())
            .unique()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_input() {
        assert_eq!(TierSet::new(vec![]), Err(TierError::Empty));
        assert_eq!(TierSet::from_specs(vec![]), Err(TierError::Empty));
        assert_eq!(
            TierSet::new(vec![TierBundle::from_identifiers(["a"]), TierBundle::default()]),
            Err(TierError::EmptyBundle(1))
        );
    }

    #[test]
    fn rejects_duplicate_names() {
        let bundle = TierBundle::named([("height", "a.png"), ("height", "b.png")]);

        assert_eq!(
            TierSet::new(vec![bundle]),
            Err(TierError::DuplicateName {
                tier: 0,
                name: "height".into()
            })
        );
    }

    #[test]
    fn transposes_specs() {
        let tiers = TierSet::from_specs(vec![
            TierSpec::new("height", ["/hd/heightmap.png", "/hd/heightmap.png"]),
            TierSpec::new("normal", ["/hd/normalmap@0.5.png", "/hd/normalmap.png"]),
        ])
        .unwrap();

        assert_eq!(tiers.tier_count(), 2);
        assert_eq!(
            tiers.bundle(1).unwrap().get("normal").unwrap().identifier,
            "/hd/normalmap.png"
        );
        assert_eq!(
            tiers.unique_identifiers(),
            vec![
                "/hd/heightmap.png",
                "/hd/normalmap@0.5.png",
                "/hd/normalmap.png"
            ]
        );
    }

    #[test]
    fn rejects_specs_of_unequal_length() {
        let result = TierSet::from_specs(vec![
            TierSpec::new("height", ["low.png", "high.png"]),
            TierSpec::new("normal", ["low.png"]),
        ]);

        assert_eq!(
            result,
            Err(TierError::MismatchedTierCount {
                name: "normal".into(),
                expected: 2,
                found: 1
            })
        );
    }
}
