use std::ops::Add;

/// Load progress over the distinct resources of one or more selectors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadProgress {
    pub ready: usize,
    pub failed: usize,
    pub total: usize,
}

impl LoadProgress {
    /// The share of resources that are ready, in the range [0, 1].
    /// An empty progress counts as complete.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.ready as f32 / self.total as f32
        }
    }

    pub fn percent(&self) -> f32 {
        self.fraction() * 100.0
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.total
            .saturating_sub(self.ready)
            .saturating_sub(self.failed)
    }

    /// Whether every resource either loaded or failed.
    pub fn is_finished(&self) -> bool {
        self.pending() == 0
    }
}

impl Add for LoadProgress {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            ready: self.ready + other.ready,
            failed: self.failed + other.failed,
            total: self.total + other.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_resources_finish_but_do_not_count_as_ready() {
        let progress = LoadProgress {
            ready: 3,
            failed: 1,
            total: 4,
        };

        assert!(progress.is_finished());
        assert_eq!(progress.percent(), 75.0);
    }

    #[test]
    fn sums_progress() {
        let total = [
            LoadProgress {
                ready: 1,
                failed: 0,
                total: 2,
            },
            LoadProgress {
                ready: 2,
                failed: 0,
                total: 2,
            },
        ]
        .into_iter()
        .fold(LoadProgress::default(), Add::add);

        assert_eq!(total.pending(), 1);
        assert_eq!(total.fraction(), 0.75);
        assert_eq!(LoadProgress::default().fraction(), 1.0);
    }

    #[test]
    fn pending_never_underflows() {
        let progress = LoadProgress {
            ready: 2,
            failed: 2,
            total: 3,
        };

        assert_eq!(progress.pending(), 0);
        assert!(progress.is_finished());
    }
}
