//! Ring neighbour topology over the process group.

use std::fmt;

use sluice_core::{DimensionError, Rank};

/// The two processes bordering a block, with periodic wrap at the ends.
///
/// With one process, a block is its own lower and upper neighbour.
///
/// # Examples
///
/// ```
/// use sluice_core::Rank;
/// use sluice_grid::RingTopology;
///
/// let t = RingTopology::new(Rank(0), 4).unwrap();
/// assert_eq!(t.lower(), Rank(3));
/// assert_eq!(t.upper(), Rank(1));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingTopology {
    me: Rank,
    lower: Rank,
    upper: Rank,
    n_ranks: u32,
}

impl RingTopology {
    /// Neighbours of `rank` in a ring of `n_ranks`.
    pub fn new(rank: Rank, n_ranks: u32) -> Result<Self, DimensionError> {
        if n_ranks == 0 || rank.0 >= n_ranks {
            return Err(DimensionError::BadRank { rank, n_ranks });
        }
        let lower = Rank((rank.0 + n_ranks - 1) % n_ranks);
        let upper = Rank((rank.0 + 1) % n_ranks);
        Ok(Self {
            me: rank,
            lower,
            upper,
            n_ranks,
        })
    }

    /// This process.
    pub fn me(&self) -> Rank {
        self.me
    }

    /// Neighbour owning the cells below this block.
    pub fn lower(&self) -> Rank {
        self.lower
    }

    /// Neighbour owning the cells above this block.
    pub fn upper(&self) -> Rank {
        self.upper
    }

    /// Group size.
    pub fn n_ranks(&self) -> u32 {
        self.n_ranks
    }

    /// `true` when both neighbours are this process.
    pub fn is_self_loop(&self) -> bool {
        self.n_ranks == 1
    }
}

impl fmt::Display for RingTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "< {} | {} | {} >", self.lower, self.me, self.upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ── Neighbour tests ─────────────────────────────────────────

    #[test]
    fn neighbours_interior() {
        let t = RingTopology::new(Rank(2), 5).unwrap();
        assert_eq!((t.lower(), t.upper()), (Rank(1), Rank(3)));
    }

    #[test]
    fn neighbours_wrap_left() {
        let t = RingTopology::new(Rank(0), 5).unwrap();
        assert_eq!((t.lower(), t.upper()), (Rank(4), Rank(1)));
    }

    #[test]
    fn neighbours_wrap_right() {
        let t = RingTopology::new(Rank(4), 5).unwrap();
        assert_eq!((t.lower(), t.upper()), (Rank(3), Rank(0)));
    }

    #[test]
    fn neighbours_two_ranks() {
        let t = RingTopology::new(Rank(0), 2).unwrap();
        assert_eq!((t.lower(), t.upper()), (Rank(1), Rank(1)));
    }

    #[test]
    fn single_rank_is_its_own_neighbour() {
        let t = RingTopology::new(Rank(0), 1).unwrap();
        assert!(t.is_self_loop());
        assert_eq!((t.lower(), t.upper()), (Rank(0), Rank(0)));
        assert_eq!(t.to_string(), "< 0 | 0 | 0 >");
    }

    #[test]
    fn empty_group_rejected() {
        assert!(RingTopology::new(Rank(0), 0).is_err());
    }

    proptest! {
        #[test]
        fn upper_of_lower_is_me(n in 1u32..64, r in 0u32..64) {
            prop_assume!(r < n);
            let t = RingTopology::new(Rank(r), n).unwrap();
            let below = RingTopology::new(t.lower(), n).unwrap();
            let above = RingTopology::new(t.upper(), n).unwrap();
            prop_assert_eq!(below.upper(), Rank(r));
            prop_assert_eq!(above.lower(), Rank(r));
        }
    }
}
