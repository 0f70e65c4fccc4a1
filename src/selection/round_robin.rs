//! Round-robin operator selection bound to genotype identity.

use super::config::RoundRobinMode;
use super::types::OperatorSelector;
use crate::genotype::{Genotype, GenotypeId};
use dashmap::DashMap;
use std::sync::Arc;

/// Selects candidates by a per-genotype position.
///
/// The candidate list is assumed to have a fixed order for a given
/// variant; the position is remembered per [`GenotypeId`]. A genotype seen
/// for the first time starts at 0, and a stored position that is out of
/// range for the current list is reset to 0.
///
/// In [`RoundRobinMode::Sticky`] (the default) the stored position is
/// written back unchanged, so a genotype keeps receiving the same operator
/// until the candidate list shrinks below its position.
/// [`RoundRobinMode::Advancing`] stores the next position after each
/// selection instead.
pub struct RoundRobinSelector {
    mode: RoundRobinMode,
    positions: DashMap<GenotypeId, usize>,
}

impl RoundRobinSelector {
    pub fn new() -> Self {
        Self::with_mode(RoundRobinMode::Sticky)
    }

    pub fn with_mode(mode: RoundRobinMode) -> Self {
        Self {
            mode,
            positions: DashMap::new(),
        }
    }

    pub fn mode(&self) -> RoundRobinMode {
        self.mode
    }

    /// Stored position for a genotype, if it was ever selected for.
    pub fn position(&self, id: GenotypeId) -> Option<usize> {
        self.positions.get(&id).map(|p| *p)
    }

    /// Overrides the stored position for a genotype.
    pub fn set_position(&self, id: GenotypeId, position: usize) {
        self.positions.insert(id, position);
    }

    /// Drops the state kept for a discarded genotype.
    pub fn forget(&self, id: GenotypeId) {
        self.positions.remove(&id);
    }

    /// Number of genotypes with a stored position.
    pub fn tracked(&self) -> usize {
        self.positions.len()
    }
}

impl Default for RoundRobinSelector {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Genotype + ?Sized, O: ?Sized> OperatorSelector<G, O> for RoundRobinSelector {
    fn name(&self) -> &str {
        "RoundRobin"
    }

    fn select(&self, candidates: &[Arc<O>], genotype: &G) -> Option<usize> {
        let len = candidates.len();
        if len == 0 {
            return None;
        }

        // The entry guard holds the shard lock, so lookup and store are atomic per id.
        let mut slot = self.positions.entry(genotype.id()).or_insert(0);
        let index = if *slot < len { *slot } else { 0 };
        *slot = match self.mode {
            RoundRobinMode::Sticky => index,
            RoundRobinMode::Advancing => (index + 1) % len,
        };
        Some(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genotype::{GenotypeHierarchy, Variant};

    struct G {
        id: GenotypeId,
        variant: Variant,
    }

    impl Genotype for G {
        fn variant(&self) -> Variant {
            self.variant
        }
        fn id(&self) -> GenotypeId {
            self.id
        }
    }

    fn genotype(raw: u64) -> G {
        let mut b = GenotypeHierarchy::builder("g.Genotype");
        let root = b.root();
        b.add_composite("g.Composite", root).unwrap();
        G {
            id: GenotypeId::new(raw),
            variant: b.build().unwrap().root(),
        }
    }

    fn candidates(n: usize) -> Vec<Arc<str>> {
        (0..n).map(|i| Arc::from(format!("op{i}"))).collect()
    }

    fn pick(sel: &RoundRobinSelector, ops: &[Arc<str>], g: &G) -> Option<usize> {
        OperatorSelector::<G, str>::select(sel, ops, g)
    }

    #[test]
    fn test_first_use_starts_at_zero() {
        let sel = RoundRobinSelector::new();
        let g = genotype(1);
        assert_eq!(pick(&sel, &candidates(3), &g), Some(0));
        assert_eq!(sel.position(g.id), Some(0));
    }

    #[test]
    fn test_sticky_mode_does_not_advance() {
        let sel = RoundRobinSelector::new();
        let g = genotype(1);
        let ops = candidates(3);
        for _ in 0..5 {
            assert_eq!(pick(&sel, &ops, &g), Some(0));
        }

        sel.set_position(g.id, 2);
        for _ in 0..5 {
            assert_eq!(pick(&sel, &ops, &g), Some(2));
        }
    }

    #[test]
    fn test_out_of_range_position_resets_to_zero() {
        let sel = RoundRobinSelector::new();
        let g = genotype(1);
        sel.set_position(g.id, 4);
        assert_eq!(pick(&sel, &candidates(2), &g), Some(0));
        assert_eq!(sel.position(g.id), Some(0));
    }

    #[test]
    fn test_advancing_mode_rotates() {
        let sel = RoundRobinSelector::with_mode(RoundRobinMode::Advancing);
        let g = genotype(1);
        let ops = candidates(3);
        let picks: Vec<usize> = (0..7).map(|_| pick(&sel, &ops, &g).unwrap()).collect();
        assert_eq!(picks, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_positions_are_per_genotype() {
        let sel = RoundRobinSelector::with_mode(RoundRobinMode::Advancing);
        let a = genotype(1);
        let b = genotype(2);
        let ops = candidates(2);
        assert_eq!(pick(&sel, &ops, &a), Some(0));
        assert_eq!(pick(&sel, &ops, &a), Some(1));
        assert_eq!(pick(&sel, &ops, &b), Some(0));
        assert_eq!(sel.tracked(), 2);

        sel.forget(a.id);
        assert_eq!(sel.position(a.id), None);
        assert_eq!(sel.tracked(), 1);
    }

    #[test]
    fn test_empty_candidates_decline() {
        let sel = RoundRobinSelector::new();
        assert_eq!(pick(&sel, &[], &genotype(1)), None);
        assert_eq!(sel.tracked(), 0);
    }

    #[test]
    fn test_concurrent_selection_same_genotype() {
        let sel = Arc::new(RoundRobinSelector::with_mode(RoundRobinMode::Advancing));
        let ops = Arc::new(candidates(4));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let sel = Arc::clone(&sel);
                let ops = Arc::clone(&ops);
                std::thread::spawn(move || {
                    let g = genotype(7);
                    (0..100)
                        .map(|_| pick(&sel, &ops, &g).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut counts = [0usize; 4];
        for h in handles {
            for idx in h.join().unwrap() {
                counts[idx] += 1;
            }
        }
        // 800 atomic advances over 4 slots visit each slot equally.
        assert_eq!(counts, [200, 200, 200, 200]);
    }
}
