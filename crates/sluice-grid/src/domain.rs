//! Block decomposition of the global grid.

use std::ops::Range;

use sluice_core::{CellIndex, DimensionError, Rank};

/// Global grid parameters, identical on every process.
#[derive(Clone, Debug, PartialEq)]
pub struct DomainSpec {
    /// Global interior cell count.
    pub nx_global: usize,
    /// Left edge of the first interior cell.
    pub xmin: f64,
    /// Right edge of the last interior cell.
    pub xmax: f64,
    /// Requested ghost width. Raised to 1 if smaller.
    pub ng: usize,
}

/// The block of the global grid owned by one process.
///
/// Interior cells `[nx_global*rank/P, nx_global*(rank+1)/P)` are extended
/// by `Ng` ghost cells on each side to give `[ilo, ihi)`. Blocks of
/// neighbouring ranks tile `[0, nx_global)` without gaps or overlap.
///
/// # Examples
///
/// ```
/// use sluice_core::Rank;
/// use sluice_grid::{Domain, DomainSpec};
///
/// let spec = DomainSpec { nx_global: 100, xmin: 0.0, xmax: 1.0, ng: 2 };
/// let d = Domain::new(&spec, Rank(1), 4).unwrap();
/// assert_eq!((d.ilo(), d.ihi()), (23, 52));
/// assert_eq!(d.nx_local(), 25);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Domain {
    rank: Rank,
    n_ranks: u32,
    ng: usize,
    nx_global: usize,
    nx_local: usize,
    xmin: f64,
    xmax: f64,
    dx: f64,
    ilo: CellIndex,
    ihi: CellIndex,
}

impl Domain {
    /// Compute the block owned by `rank` in a group of `n_ranks`.
    ///
    /// Fails with [`DimensionError::LocalTooSmall`] when the block has
    /// fewer interior cells than the ghost width.
    pub fn new(spec: &DomainSpec, rank: Rank, n_ranks: u32) -> Result<Self, DimensionError> {
        if spec.nx_global == 0 {
            return Err(DimensionError::EmptyGrid);
        }
        if !(spec.xmin.is_finite() && spec.xmax.is_finite() && spec.xmax > spec.xmin) {
            return Err(DimensionError::InvalidBounds {
                xmin: spec.xmin,
                xmax: spec.xmax,
            });
        }
        if n_ranks == 0 || rank.0 >= n_ranks {
            return Err(DimensionError::BadRank { rank, n_ranks });
        }

        let ng = spec.ng.max(1);
        let nx = spec.nx_global as CellIndex;
        let p = CellIndex::from(n_ranks);
        let r = CellIndex::from(rank.0);
        let lo = nx * r / p;
        let hi = nx * (r + 1) / p;
        let nx_local = (hi - lo) as usize;
        if nx_local < ng {
            return Err(DimensionError::LocalTooSmall { rank, nx_local, ng });
        }

        let g = ng as CellIndex;
        Ok(Self {
            rank,
            n_ranks,
            ng,
            nx_global: spec.nx_global,
            nx_local,
            xmin: spec.xmin,
            xmax: spec.xmax,
            dx: (spec.xmax - spec.xmin) / spec.nx_global as f64,
            ilo: lo - g,
            ihi: hi + g,
        })
    }

    /// Every block of the decomposition, in rank order.
    pub fn decompose(spec: &DomainSpec, n_ranks: u32) -> Result<Vec<Self>, DimensionError> {
        (0..n_ranks)
            .map(|r| Self::new(spec, Rank(r), n_ranks))
            .collect()
    }

    /// Owning rank.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Size of the process group.
    pub fn n_ranks(&self) -> u32 {
        self.n_ranks
    }

    /// Ghost width `Ng`.
    pub fn ng(&self) -> usize {
        self.ng
    }

    /// Global interior cell count.
    pub fn nx_global(&self) -> usize {
        self.nx_global
    }

    /// Interior cells owned by this block.
    pub fn nx_local(&self) -> usize {
        self.nx_local
    }

    /// Lower coordinate bound.
    pub fn xmin(&self) -> f64 {
        self.xmin
    }

    /// Upper coordinate bound.
    pub fn xmax(&self) -> f64 {
        self.xmax
    }

    /// Uniform cell width.
    pub fn dx(&self) -> f64 {
        self.dx
    }

    /// First local cell (a ghost).
    pub fn ilo(&self) -> CellIndex {
        self.ilo
    }

    /// One past the last local cell.
    pub fn ihi(&self) -> CellIndex {
        self.ihi
    }

    /// Local rows including ghosts: `Nx_local + 2*Ng`.
    pub fn n_cells(&self) -> usize {
        self.nx_local + 2 * self.ng
    }

    /// Cell-centre coordinate of global cell `i`.
    ///
    /// Ghost cells extrapolate linearly past the bounds rather than
    /// wrapping.
    pub fn x(&self, i: CellIndex) -> f64 {
        self.xmin + self.dx * (i as f64 + 0.5)
    }

    /// `[ilo, ihi)`.
    pub fn cells(&self) -> Range<CellIndex> {
        self.ilo..self.ihi
    }

    /// `[ilo+Ng, ihi-Ng)`.
    pub fn interior(&self) -> Range<CellIndex> {
        let g = self.ng as CellIndex;
        self.ilo + g..self.ihi - g
    }

    /// Faces `[ilo, ihi-1)`, each addressed by its lower cell.
    pub fn faces(&self) -> Range<CellIndex> {
        self.ilo..self.ihi - 1
    }

    /// Lower ghost strip `[ilo, ilo+Ng)`.
    pub fn lo_ghost(&self) -> Range<CellIndex> {
        self.ilo..self.ilo + self.ng as CellIndex
    }

    /// Upper ghost strip `[ihi-Ng, ihi)`.
    pub fn hi_ghost(&self) -> Range<CellIndex> {
        self.ihi - self.ng as CellIndex..self.ihi
    }

    /// Owned strip sent to the lower neighbour: `[ilo+Ng, ilo+2Ng)`.
    pub fn lo_edge(&self) -> Range<CellIndex> {
        let g = self.ng as CellIndex;
        self.ilo + g..self.ilo + 2 * g
    }

    /// Owned strip sent to the upper neighbour: `[ihi-2Ng, ihi-Ng)`.
    pub fn hi_edge(&self) -> Range<CellIndex> {
        let g = self.ng as CellIndex;
        self.ihi - 2 * g..self.ihi - g
    }
}
