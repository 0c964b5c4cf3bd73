//! Run a process group as one thread per rank.

use std::fmt;
use std::sync::OnceLock;
use std::thread;

use sluice_core::Rank;

use crate::channel::ChannelComm;
use crate::comm::Communicator;
use crate::error::CommError;

/// Run `body` on every rank of a fresh `n_ranks` group and wait for all
/// of them.
///
/// Returns the per-rank results in rank order. If any rank fails, the
/// group is aborted and the error of the first rank to fail is returned;
/// the disconnects that failure causes on other ranks are not reported.
/// A panic on any rank is resumed on the caller.
///
/// # Examples
///
/// ```
/// use sluice_comm::{run_group, CommError, Communicator};
///
/// let ranks = run_group(3, |comm| -> Result<u32, CommError> {
///     comm.barrier()?;
///     Ok(comm.rank().0)
/// })
/// .unwrap();
/// assert_eq!(ranks, vec![0, 1, 2]);
/// ```
pub fn run_group<T, E, F>(n_ranks: u32, body: F) -> Result<Vec<T>, E>
where
    F: Fn(&ChannelComm) -> Result<T, E> + Sync,
    T: Send,
    E: Send + fmt::Display + From<CommError>,
{
    let group = ChannelComm::group(n_ranks)?;
    let first_failure: OnceLock<Rank> = OnceLock::new();

    let joined: Vec<(Rank, thread::Result<Result<T, E>>)> = thread::scope(|s| {
        let mut handles = Vec::with_capacity(group.len());
        let mut spawn_error = None;
        for comm in group {
            let rank = comm.rank();
            let body = &body;
            let first_failure = &first_failure;
            let spawned = thread::Builder::new()
                .name(format!("sluice-rank-{rank}"))
                .spawn_scoped(s, move || {
                    let out = body(&comm);
                    if let Err(e) = &out {
                        if first_failure.set(rank).is_ok() {
                            tracing::debug!(%rank, "rank failed first: {e}");
                        }
                        comm.signal_abort();
                    }
                    // Dropping the endpoints releases any peer blocked on us.
                    drop(comm);
                    out
                });
            match spawned {
                Ok(h) => handles.push((rank, h)),
                Err(e) => {
                    let _ = first_failure.set(rank);
                    spawn_error = Some((
                        rank,
                        CommError::Spawn {
                            rank,
                            reason: e.to_string(),
                        },
                    ));
                    break;
                }
            }
        }
        let mut joined: Vec<_> = handles
            .into_iter()
            .map(|(rank, h)| (rank, h.join()))
            .collect();
        if let Some((rank, e)) = spawn_error {
            joined.push((rank, Ok(Err(E::from(e)))));
        }
        joined
    });

    let mut results = Vec::with_capacity(joined.len());
    for (rank, j) in joined {
        match j {
            Ok(r) => results.push((rank, r)),
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    match first_failure.get().copied() {
        Some(culprit) => {
            let cause = results
                .into_iter()
                .find_map(|(rank, r)| (rank == culprit).then_some(r).and_then(Result::err));
            Err(cause.unwrap_or_else(|| E::from(CommError::Aborted)))
        }
        None => results.into_iter().map(|(_, r)| r).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::Communicator;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Comm(CommError),
        Boom(u32),
    }

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{self:?}")
        }
    }

    impl From<CommError> for TestError {
        fn from(e: CommError) -> Self {
            Self::Comm(e)
        }
    }

    #[test]
    fn results_in_rank_order() {
        let out = run_group(4, |c| -> Result<_, TestError> {
            c.barrier()?;
            Ok(c.rank().0 * 2)
        })
        .unwrap();
        assert_eq!(out, vec![0, 2, 4, 6]);
    }

    #[test]
    fn first_failure_is_reported() {
        let err = run_group(3, |c| -> Result<(), TestError> {
            if c.rank() == Rank(2) {
                return Err(TestError::Boom(2));
            }
            // Blocks until rank 2's departure cascades through the group.
            loop {
                c.barrier()?;
            }
        })
        .unwrap_err();
        assert_eq!(err, TestError::Boom(2));
    }

    #[test]
    fn empty_group_is_an_error() {
        let err = run_group(0, |_| -> Result<(), TestError> { Ok(()) }).unwrap_err();
        assert_eq!(err, TestError::Comm(CommError::EmptyGroup));
    }

    #[test]
    #[should_panic(expected = "rank panic")]
    fn panics_propagate() {
        let _ = run_group(2, |c| -> Result<(), TestError> {
            if c.rank() == Rank(1) {
                panic!("rank panic");
            }
            c.barrier()?;
            Ok(())
        });
    }
}
