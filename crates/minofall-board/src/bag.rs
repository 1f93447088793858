use std::collections::VecDeque;

use rand::{SeedableRng as _, seq::SliceRandom as _};
use rand_pcg::Pcg64Mcg;

use crate::piece::PieceKind;

/// Supplies pieces in 7-bag order: every run of seven pieces contains
/// each kind exactly once.
#[derive(Debug, Clone)]
pub struct PieceBag {
    rng: Pcg64Mcg,
    bag: VecDeque<PieceKind>,
}

impl Default for PieceBag {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceBag {
    /// Creates a bag seeded from the OS random source.
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(Pcg64Mcg::from_os_rng())
    }

    /// Creates a bag with a fixed seed, for reproducible games.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(Pcg64Mcg::seed_from_u64(seed))
    }

    fn from_rng(rng: Pcg64Mcg) -> Self {
        let mut this = Self {
            rng,
            bag: VecDeque::with_capacity(PieceKind::LEN * 2),
        };
        this.fill_bag();
        this
    }

    /// Tops the bag up so it always holds at least a full set after one
    /// `pop_next`.
    fn fill_bag(&mut self) {
        while self.bag.len() <= PieceKind::LEN {
            let mut new_bag = PieceKind::ALL;
            new_bag.shuffle(&mut self.rng);
            self.bag.extend(new_bag);
        }
    }

    /// Pops the next piece.
    pub fn pop_next(&mut self) -> PieceKind {
        self.fill_bag();
        self.bag.pop_front().expect("piece bag is never empty")
    }

    /// Upcoming pieces, nearest first.
    pub fn next_pieces(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.bag.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_run_of_seven_contains_each_kind_once() {
        let mut bag = PieceBag::with_seed(42);
        for run in 0..4 {
            let kinds: HashSet<_> = (0..PieceKind::LEN).map(|_| bag.pop_next()).collect();
            assert_eq!(kinds.len(), PieceKind::LEN, "run {run}");
        }
    }

    #[test]
    fn same_seed_gives_the_same_sequence() {
        let mut a = PieceBag::with_seed(7);
        let mut b = PieceBag::with_seed(7);
        for _ in 0..30 {
            assert_eq!(a.pop_next(), b.pop_next());
        }
    }

    #[test]
    fn preview_matches_what_is_popped() {
        let mut bag = PieceBag::with_seed(123);
        let preview: Vec<_> = bag.next_pieces().take(5).collect();
        let popped: Vec<_> = (0..5).map(|_| bag.pop_next()).collect();
        assert_eq!(preview, popped);
    }
}
