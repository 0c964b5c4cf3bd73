//! Strongly-typed identifiers and the [`CellIndex`] alias.

use std::fmt;

/// Global cell coordinate.
///
/// Signed because the lowest ghost cell of the first block sits at `-Ng`.
pub type CellIndex = i64;

/// Identifies one process in a decomposed run.
///
/// Ranks are dense: a group of `P` processes uses `Rank(0)..Rank(P-1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rank(pub u32);

impl Rank {
    /// The rank that owns ordered output and collective roots.
    pub const ROOT: Rank = Rank(0);

    /// Whether this is [`Rank::ROOT`].
    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Rank {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a variable column in the per-cell state.
///
/// `VarId(n)` is the n-th name added to the variable registry; ids are
/// stable for the lifetime of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub u32);

impl VarId {
    /// Column offset inside a row.
    pub fn column(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for VarId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn root_rank() {
        assert!(Rank::ROOT.is_root());
        assert!(!Rank(3).is_root());
    }

    #[test]
    fn display_is_bare_number() {
        assert_eq!(Rank(12).to_string(), "12");
        assert_eq!(VarId(2).to_string(), "2");
        assert_eq!(VarId::from(5).column(), 5);
    }

    proptest! {
        #[test]
        fn ids_round_trip_through_u32(n in any::<u32>()) {
            prop_assert_eq!(Rank::from(n).0, n);
            prop_assert_eq!(VarId::from(n).column(), n as usize);
            prop_assert_eq!(Rank(n).to_string(), n.to_string());
            prop_assert_eq!(Rank(n).is_root(), n == 0);
        }

        #[test]
        fn rank_order_follows_number(a in any::<u32>(), b in any::<u32>()) {
            prop_assert_eq!(Rank(a).cmp(&Rank(b)), a.cmp(&b));
        }
    }
}
