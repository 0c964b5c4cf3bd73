//! Thread-per-rank communicator over crossbeam channels.
//!
//! Each rank owns the receiving ends of two ring channels (one fed by its
//! lower neighbour, one by its upper) and a link to the root for
//! collectives. The root gathers contributions in rank order and
//! broadcasts results. When a rank exits, dropping its endpoints
//! disconnects every peer waiting on it, so a failure cascades through
//! the group instead of leaving ranks blocked.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam_channel::{unbounded, Receiver, Sender};
use sluice_core::Rank;

use crate::comm::Communicator;
use crate::error::CommError;

/// Collective traffic between a rank and the root.
#[derive(Debug)]
enum Collective {
    Barrier,
    Line(String),
    Min(f64),
    Sum(Vec<f64>),
    Flag(bool),
}

impl Collective {
    fn kind(&self) -> &'static str {
        match self {
            Self::Barrier => "barrier",
            Self::Line(_) => "gather",
            Self::Min(_) => "min",
            Self::Sum(_) => "sum",
            Self::Flag(_) => "flag",
        }
    }
}

enum Links {
    /// Rank 0: one inbox and one outbox per other rank, indexed `rank - 1`.
    Root {
        inbox: Vec<Receiver<Collective>>,
        outbox: Vec<Sender<Collective>>,
    },
    Leaf {
        to_root: Sender<Collective>,
        from_root: Receiver<Collective>,
    },
}

/// One rank of an in-process group. Build a full group with
/// [`ChannelComm::group`] or run one with [`run_group`](crate::run_group).
pub struct ChannelComm {
    rank: Rank,
    size: u32,
    lower: Rank,
    upper: Rank,
    up_tx: Sender<Vec<f64>>,
    down_tx: Sender<Vec<f64>>,
    from_lower: Receiver<Vec<f64>>,
    from_upper: Receiver<Vec<f64>>,
    links: Links,
    aborted: Arc<AtomicBool>,
}

impl ChannelComm {
    /// Wire up a group of `n_ranks` communicators, in rank order.
    pub fn group(n_ranks: u32) -> Result<Vec<Self>, CommError> {
        if n_ranks == 0 {
            return Err(CommError::EmptyGroup);
        }
        let n = n_ranks as usize;
        // up[r] carries data from r-1 to r; down[r] from r+1 to r.
        let (up_tx, up_rx): (Vec<_>, Vec<_>) = (0..n).map(|_| unbounded::<Vec<f64>>()).unzip();
        let (down_tx, down_rx): (Vec<_>, Vec<_>) =
            (0..n).map(|_| unbounded::<Vec<f64>>()).unzip();
        let (leaf_tx, root_inbox): (Vec<_>, Vec<_>) =
            (1..n).map(|_| unbounded::<Collective>()).unzip();
        let (root_outbox, leaf_rx): (Vec<_>, Vec<_>) =
            (1..n).map(|_| unbounded::<Collective>()).unzip();
        let aborted = Arc::new(AtomicBool::new(false));

        let mut leaf_links = leaf_tx.into_iter().zip(leaf_rx).map(|(to_root, from_root)| {
            Links::Leaf { to_root, from_root }
        });
        let mut root_links = Some(Links::Root {
            inbox: root_inbox,
            outbox: root_outbox,
        });

        let mut up_rx = up_rx.into_iter();
        let mut down_rx = down_rx.into_iter();
        let mut group = Vec::with_capacity(n);
        for r in 0..n {
            let lower = (r + n - 1) % n;
            let upper = (r + 1) % n;
            let links = if r == 0 {
                root_links.take()
            } else {
                leaf_links.next()
            };
            let (Some(links), Some(from_lower), Some(from_upper)) =
                (links, up_rx.next(), down_rx.next())
            else {
                return Err(CommError::EmptyGroup);
            };
            group.push(Self {
                rank: Rank(r as u32),
                size: n_ranks,
                lower: Rank(lower as u32),
                upper: Rank(upper as u32),
                up_tx: up_tx[upper].clone(),
                down_tx: down_tx[lower].clone(),
                from_lower,
                from_upper,
                links,
                aborted: Arc::clone(&aborted),
            });
        }
        Ok(group)
    }

    /// Mark the whole group as failing. Peers that subsequently lose a
    /// connection report [`CommError::Aborted`].
    pub fn signal_abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
    }

    /// Whether any rank has signalled an abort.
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    fn lost(&self, peer: Rank, during: &'static str) -> CommError {
        if self.is_aborted() {
            CommError::Aborted
        } else {
            CommError::Disconnected { peer, during }
        }
    }

    fn recv_halo(
        &self,
        rx: &Receiver<Vec<f64>>,
        peer: Rank,
        out: &mut [f64],
    ) -> Result<(), CommError> {
        let buf = rx.recv().map_err(|_| self.lost(peer, "halo exchange"))?;
        if buf.len() != out.len() {
            return Err(CommError::BufferSize {
                peer,
                expected: out.len(),
                got: buf.len(),
            });
        }
        out.copy_from_slice(&buf);
        Ok(())
    }

    /// Root side: one contribution from every other rank, in rank order.
    fn collect(
        &self,
        inbox: &[Receiver<Collective>],
        during: &'static str,
    ) -> Result<Vec<Collective>, CommError> {
        inbox
            .iter()
            .enumerate()
            .map(|(i, rx)| {
                rx.recv()
                    .map_err(|_| self.lost(Rank(i as u32 + 1), during))
            })
            .collect()
    }

    fn broadcast(
        &self,
        outbox: &[Sender<Collective>],
        msg: impl Fn() -> Collective,
        during: &'static str,
    ) -> Result<(), CommError> {
        for (i, tx) in outbox.iter().enumerate() {
            tx.send(msg())
                .map_err(|_| self.lost(Rank(i as u32 + 1), during))?;
        }
        Ok(())
    }

    /// Leaf side: send a contribution and wait for the root's answer.
    fn round_trip(
        &self,
        to_root: &Sender<Collective>,
        from_root: &Receiver<Collective>,
        msg: Collective,
        during: &'static str,
    ) -> Result<Collective, CommError> {
        to_root
            .send(msg)
            .map_err(|_| self.lost(Rank::ROOT, during))?;
        from_root.recv().map_err(|_| self.lost(Rank::ROOT, during))
    }
}

fn unexpected(during: &'static str, got: &Collective) -> CommError {
    CommError::Protocol {
        during,
        got: got.kind(),
    }
}

impl Communicator for ChannelComm {
    fn rank(&self) -> Rank {
        self.rank
    }

    fn size(&self) -> u32 {
        self.size
    }

    fn exchange(
        &self,
        lo_send: &[f64],
        hi_send: &[f64],
        lo_recv: &mut [f64],
        hi_recv: &mut [f64],
    ) -> Result<(), CommError> {
        // Channels are unbounded, so both sends complete before either
        // receive blocks.
        self.up_tx
            .send(hi_send.to_vec())
            .map_err(|_| self.lost(self.upper, "halo exchange"))?;
        self.down_tx
            .send(lo_send.to_vec())
            .map_err(|_| self.lost(self.lower, "halo exchange"))?;
        self.recv_halo(&self.from_lower, self.lower, lo_recv)?;
        self.recv_halo(&self.from_upper, self.upper, hi_recv)
    }

    fn barrier(&self) -> Result<(), CommError> {
        const OP: &str = "barrier";
        match &self.links {
            Links::Root { inbox, outbox } => {
                for msg in self.collect(inbox, OP)? {
                    if !matches!(msg, Collective::Barrier) {
                        return Err(unexpected(OP, &msg));
                    }
                }
                self.broadcast(outbox, || Collective::Barrier, OP)
            }
            Links::Leaf { to_root, from_root } => {
                match self.round_trip(to_root, from_root, Collective::Barrier, OP)? {
                    Collective::Barrier => Ok(()),
                    other => Err(unexpected(OP, &other)),
                }
            }
        }
    }

    fn gather(&self, line: String) -> Result<Option<Vec<String>>, CommError> {
        const OP: &str = "gather";
        match &self.links {
            Links::Root { inbox, .. } => {
                let mut lines = Vec::with_capacity(self.size as usize);
                lines.push(line);
                for msg in self.collect(inbox, OP)? {
                    match msg {
                        Collective::Line(l) => lines.push(l),
                        other => return Err(unexpected(OP, &other)),
                    }
                }
                Ok(Some(lines))
            }
            Links::Leaf { to_root, .. } => {
                to_root
                    .send(Collective::Line(line))
                    .map_err(|_| self.lost(Rank::ROOT, OP))?;
                Ok(None)
            }
        }
    }

    fn all_reduce_min(&self, value: f64) -> Result<f64, CommError> {
        const OP: &str = "min reduction";
        match &self.links {
            Links::Root { inbox, outbox } => {
                let mut acc = value;
                for msg in self.collect(inbox, OP)? {
                    match msg {
                        Collective::Min(v) => acc = acc.min(v),
                        other => return Err(unexpected(OP, &other)),
                    }
                }
                self.broadcast(outbox, || Collective::Min(acc), OP)?;
                Ok(acc)
            }
            Links::Leaf { to_root, from_root } => {
                match self.round_trip(to_root, from_root, Collective::Min(value), OP)? {
                    Collective::Min(v) => Ok(v),
                    other => Err(unexpected(OP, &other)),
                }
            }
        }
    }

    fn all_reduce_sum(&self, values: &[f64]) -> Result<Vec<f64>, CommError> {
        const OP: &str = "sum reduction";
        match &self.links {
            Links::Root { inbox, outbox } => {
                let mut acc = values.to_vec();
                for (i, msg) in self.collect(inbox, OP)?.into_iter().enumerate() {
                    match msg {
                        Collective::Sum(v) if v.len() == acc.len() => {
                            acc.iter_mut().zip(&v).for_each(|(a, b)| *a += b);
                        }
                        Collective::Sum(v) => {
                            return Err(CommError::BufferSize {
                                peer: Rank(i as u32 + 1),
                                expected: acc.len(),
                                got: v.len(),
                            })
                        }
                        other => return Err(unexpected(OP, &other)),
                    }
                }
                self.broadcast(outbox, || Collective::Sum(acc.clone()), OP)?;
                Ok(acc)
            }
            Links::Leaf { to_root, from_root } => {
                match self.round_trip(to_root, from_root, Collective::Sum(values.to_vec()), OP)? {
                    Collective::Sum(v) => Ok(v),
                    other => Err(unexpected(OP, &other)),
                }
            }
        }
    }

    fn any(&self, flag: bool) -> Result<bool, CommError> {
        const OP: &str = "flag reduction";
        match &self.links {
            Links::Root { inbox, outbox } => {
                let mut acc = flag;
                for msg in self.collect(inbox, OP)? {
                    match msg {
                        Collective::Flag(f) => acc |= f,
                        other => return Err(unexpected(OP, &other)),
                    }
                }
                self.broadcast(outbox, || Collective::Flag(acc), OP)?;
                Ok(acc)
            }
            Links::Leaf { to_root, from_root } => {
                match self.round_trip(to_root, from_root, Collective::Flag(flag), OP)? {
                    Collective::Flag(f) => Ok(f),
                    other => Err(unexpected(OP, &other)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn spawn_all<T: Send>(
        n: u32,
        f: impl Fn(ChannelComm) -> T + Sync,
    ) -> Vec<T> {
        let group = ChannelComm::group(n).unwrap();
        thread::scope(|s| {
            let handles: Vec<_> = group
                .into_iter()
                .map(|c| {
                    let f = &f;
                    s.spawn(move || f(c))
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        })
    }

    #[test]
    fn empty_group_rejected() {
        assert!(matches!(ChannelComm::group(0), Err(CommError::EmptyGroup)));
    }

    #[test]
    fn ring_exchange_passes_edges_to_neighbours() {
        let out = spawn_all(4, |c| {
            let me = c.rank().0 as f64;
            let (mut lo, mut hi) = ([0.0], [0.0]);
            c.exchange(&[me * 10.0], &[me * 10.0 + 1.0], &mut lo, &mut hi)
                .unwrap();
            (lo[0], hi[0])
        });
        // lo ghost = lower neighbour's hi_send, hi ghost = upper's lo_send.
        assert_eq!(out, vec![(31.0, 10.0), (1.0, 20.0), (11.0, 30.0), (21.0, 0.0)]);
    }

    #[test]
    fn two_ranks_are_both_neighbours() {
        let out = spawn_all(2, |c| {
            let me = c.rank().0 as f64;
            let (mut lo, mut hi) = ([0.0], [0.0]);
            c.exchange(&[me], &[me + 0.5], &mut lo, &mut hi).unwrap();
            (lo[0], hi[0])
        });
        assert_eq!(out, vec![(1.5, 1.0), (0.5, 0.0)]);
    }

    #[test]
    fn gather_is_rank_ordered_on_root() {
        let out = spawn_all(3, |c| c.gather(format!("rank {}", c.rank())).unwrap());
        assert_eq!(
            out[0],
            Some(vec!["rank 0".into(), "rank 1".into(), "rank 2".into()])
        );
        assert_eq!(out[1], None);
    }

    #[test]
    fn reductions_agree_everywhere() {
        let out = spawn_all(3, |c| {
            let r = c.rank().0 as f64;
            c.barrier().unwrap();
            let min = c.all_reduce_min(5.0 - r).unwrap();
            let sum = c.all_reduce_sum(&[r, 1.0]).unwrap();
            let any = c.any(c.rank() == Rank(2)).unwrap();
            let none = c.any(false).unwrap();
            (min, sum, any, none)
        });
        for (min, sum, any, none) in out {
            assert_eq!(min, 3.0);
            assert_eq!(sum, vec![3.0, 3.0]);
            assert!(any);
            assert!(!none);
        }
    }

    #[test]
    fn dropped_peer_disconnects() {
        let out = spawn_all(2, |c| {
            if c.rank() == Rank(1) {
                return None;
            }
            let (mut lo, mut hi) = ([0.0], [0.0]);
            Some(c.exchange(&[0.0], &[0.0], &mut lo, &mut hi))
        });
        assert!(matches!(
            out[0],
            Some(Err(CommError::Disconnected { .. }))
        ));
    }

    #[test]
    fn abort_flag_turns_disconnects_into_aborts() {
        let out = spawn_all(2, |c| {
            if c.rank() == Rank(1) {
                c.signal_abort();
                return None;
            }
            Some(c.barrier())
        });
        assert_eq!(out[0], Some(Err(CommError::Aborted)));
    }
}
