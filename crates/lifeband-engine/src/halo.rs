//! Halo exchange between ring neighbours.
//!
//! Each directed link (a worker's boundary row travelling to one
//! neighbour's halo) is its own `crossbeam_channel::bounded(1)` channel.
//! A send therefore completes as soon as the link is empty, without the
//! receiver being inside its matching receive, and the receive is the
//! completion wait. Links that would cross the top or bottom of the grid
//! only exist when rows wrap.
//!
//! ```text
//!   rank i-1            rank i             rank i+1
//!  ┌────────┐  down  ┌────────┐  down  ┌────────┐
//!  │ bottom ├───────►│ top    │        │        │
//!  │        │        │ bottom ├───────►│ top    │
//!  │        │◄───────┤ top    │◄───────┤        │
//!  └────────┘   up   └────────┘   up   └────────┘
//! ```

use crossbeam_channel::{bounded, Receiver, Sender};
use smallvec::SmallVec;
use tracing::trace;

use lifeband_arena::BandStore;
use lifeband_core::{Cell, EdgeBehavior, ExchangeError, Generation, HaloSide, Rank};
use lifeband_space::Partition;

use crate::config::ExchangeOrder;

/// One boundary row in flight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HaloRow {
    /// Generation the row belongs to.
    pub generation: Generation,
    /// Sending rank.
    pub from: Rank,
    /// The `C` real cells of the row; padding columns are never sent.
    pub cells: Vec<Cell>,
}

/// One step of an exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HaloOp {
    /// Send the bottommost real row to `next`.
    SendDown,
    /// Send the topmost real row to `prev`.
    SendUp,
    /// Receive `prev`'s bottom row into the top halo.
    RecvTop,
    /// Receive `next`'s top row into the bottom halo.
    RecvBottom,
}

/// A worker's ends of its halo links.
///
/// Each end is `None` when the link does not exist (the grid's top and
/// bottom under bounded rows).
#[derive(Debug)]
pub struct HaloEndpoints {
    rank: Rank,
    to_prev: Option<(Rank, Sender<HaloRow>)>,
    to_next: Option<(Rank, Sender<HaloRow>)>,
    from_prev: Option<(Rank, Receiver<HaloRow>)>,
    from_next: Option<(Rank, Receiver<HaloRow>)>,
}

impl HaloEndpoints {
    fn unlinked(rank: Rank) -> Self {
        Self {
            rank,
            to_prev: None,
            to_next: None,
            from_prev: None,
            from_next: None,
        }
    }

    /// Owning rank.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Whether the `side` halo is filled by a neighbour.
    pub fn receives(&self, side: HaloSide) -> bool {
        match side {
            HaloSide::Top => self.from_prev.is_some(),
            HaloSide::Bottom => self.from_next.is_some(),
        }
    }

    /// Whether the boundary row on `side` is sent to a neighbour.
    pub fn sends(&self, side: HaloSide) -> bool {
        match side {
            HaloSide::Top => self.to_prev.is_some(),
            HaloSide::Bottom => self.to_next.is_some(),
        }
    }
}

/// Create every halo link for `partition` and hand out the endpoints,
/// indexed by rank.
///
/// Under [`EdgeBehavior::Absorb`] the link between the last and first
/// band is not created. With a single worker and wrapping rows, the
/// worker's links loop back to itself.
pub fn build_links(partition: &Partition, rows: EdgeBehavior) -> Vec<HaloEndpoints> {
    let mut endpoints: Vec<HaloEndpoints> = partition
        .layouts()
        .map(|layout| HaloEndpoints::unlinked(layout.rank()))
        .collect();

    for layout in partition.layouts() {
        let me = layout.rank();
        if let Some(prev) = layout.halo_partner(HaloSide::Top, rows) {
            let (tx, rx) = bounded(1);
            endpoints[prev.index()].to_next = Some((me, tx));
            endpoints[me.index()].from_prev = Some((prev, rx));
        }
        if let Some(next) = layout.halo_partner(HaloSide::Bottom, rows) {
            let (tx, rx) = bounded(1);
            endpoints[next.index()].to_prev = Some((me, tx));
            endpoints[me.index()].from_next = Some((next, rx));
        }
    }
    endpoints
}

/// Refreshes one band's halo rows each generation.
#[derive(Debug)]
pub struct HaloExchanger {
    links: HaloEndpoints,
    order: ExchangeOrder,
}

impl HaloExchanger {
    /// Wrap `links` with the given operation order.
    pub fn new(links: HaloEndpoints, order: ExchangeOrder) -> Self {
        Self { links, order }
    }

    /// Owning rank.
    pub fn rank(&self) -> Rank {
        self.links.rank
    }

    /// The endpoints this exchanger drives.
    pub fn links(&self) -> &HaloEndpoints {
        &self.links
    }

    /// The operations one exchange performs, in order. Operations on
    /// missing links are left out.
    pub fn schedule(&self) -> SmallVec<[HaloOp; 4]> {
        use HaloOp::*;
        let full: [HaloOp; 4] = match self.order {
            ExchangeOrder::PostThenWait => [SendDown, SendUp, RecvTop, RecvBottom],
            ExchangeOrder::Parity if self.rank().is_even() => {
                [SendDown, RecvTop, SendUp, RecvBottom]
            }
            ExchangeOrder::Parity => [RecvTop, SendDown, RecvBottom, SendUp],
        };
        full.into_iter().filter(|op| self.has_link(*op)).collect()
    }

    fn has_link(&self, op: HaloOp) -> bool {
        match op {
            HaloOp::SendDown => self.links.sends(HaloSide::Bottom),
            HaloOp::SendUp => self.links.sends(HaloSide::Top),
            HaloOp::RecvTop => self.links.receives(HaloSide::Top),
            HaloOp::RecvBottom => self.links.receives(HaloSide::Bottom),
        }
    }

    /// Send this band's boundary rows and fill its halo rows for
    /// `generation`.
    ///
    /// Only halo rows of `band` are written. On error the band's halos may
    /// be partially refreshed; the run is abandoned anyway.
    pub fn exchange(
        &self,
        band: &mut BandStore,
        generation: Generation,
    ) -> Result<(), ExchangeError> {
        for op in self.schedule() {
            match op {
                HaloOp::SendDown => self.send(band, HaloSide::Bottom, generation)?,
                HaloOp::SendUp => self.send(band, HaloSide::Top, generation)?,
                HaloOp::RecvTop => self.recv(band, HaloSide::Top, generation)?,
                HaloOp::RecvBottom => self.recv(band, HaloSide::Bottom, generation)?,
            }
        }
        Ok(())
    }

    fn send(
        &self,
        band: &BandStore,
        side: HaloSide,
        generation: Generation,
    ) -> Result<(), ExchangeError> {
        let link = match side {
            HaloSide::Top => &self.links.to_prev,
            HaloSide::Bottom => &self.links.to_next,
        };
        let Some((peer, tx)) = link else {
            return Ok(());
        };
        let row = HaloRow {
            generation,
            from: self.rank(),
            cells: band.boundary_row(side).to_vec(),
        };
        trace!(peer = %peer, %side, %generation, "send boundary row");
        tx.send(row)
            .map_err(|_| ExchangeError::Disconnected { peer: *peer, side })
    }

    fn recv(
        &self,
        band: &mut BandStore,
        side: HaloSide,
        generation: Generation,
    ) -> Result<(), ExchangeError> {
        let link = match side {
            HaloSide::Top => &self.links.from_prev,
            HaloSide::Bottom => &self.links.from_next,
        };
        let Some((peer, rx)) = link else {
            return Ok(());
        };
        let row = rx
            .recv()
            .map_err(|_| ExchangeError::Disconnected { peer: *peer, side })?;
        debug_assert_eq!(row.from, *peer);
        if row.generation != generation {
            return Err(ExchangeError::OutOfStep {
                peer: *peer,
                expected: generation,
                got: row.generation,
            });
        }
        band.write_halo(side, &row.cells)
            .map_err(|_| ExchangeError::RowLength {
                peer: *peer,
                expected: band.cols(),
                got: row.cells.len(),
            })?;
        trace!(peer = %peer, %side, %generation, "halo row received");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifeband_test_utils::band_from_rows;
    use std::thread;

    fn exchangers(
        rows: usize,
        cols: usize,
        workers: usize,
        edge: EdgeBehavior,
        order: ExchangeOrder,
    ) -> Vec<HaloExchanger> {
        let p = Partition::new(rows, cols, workers).unwrap();
        build_links(&p, edge)
            .into_iter()
            .map(|links| HaloExchanger::new(links, order))
            .collect()
    }

    #[test]
    fn absorb_single_worker_has_no_links() {
        let ex = exchangers(4, 4, 1, EdgeBehavior::Absorb, ExchangeOrder::PostThenWait);
        assert!(ex[0].schedule().is_empty());
        let mut band = band_from_rows(&[&[1, 1], &[1, 1]]);
        ex[0].exchange(&mut band, Generation(0)).unwrap();
        assert_eq!(band.halo_row(HaloSide::Top), &[0, 0]);
        assert_eq!(band.halo_row(HaloSide::Bottom), &[0, 0]);
    }

    #[test]
    fn wrap_single_worker_loops_back() {
        let ex = exchangers(2, 2, 1, EdgeBehavior::Wrap, ExchangeOrder::PostThenWait);
        let mut band = band_from_rows(&[&[1, 0], &[0, 2]]);
        ex[0].exchange(&mut band, Generation(0)).unwrap();
        // Top halo holds the band's own bottom row and vice versa.
        assert_eq!(band.halo_row(HaloSide::Top), &[0, 2]);
        assert_eq!(band.halo_row(HaloSide::Bottom), &[1, 0]);
    }

    #[test]
    fn wrap_single_worker_parity_loops_back() {
        let ex = exchangers(2, 2, 1, EdgeBehavior::Wrap, ExchangeOrder::Parity);
        let mut band = band_from_rows(&[&[1, 0], &[0, 2]]);
        ex[0].exchange(&mut band, Generation(0)).unwrap();
        assert_eq!(band.halo_row(HaloSide::Top), &[0, 2]);
        assert_eq!(band.halo_row(HaloSide::Bottom), &[1, 0]);
    }

    #[test]
    fn schedules_follow_order() {
        use HaloOp::*;
        let post = exchangers(12, 3, 3, EdgeBehavior::Wrap, ExchangeOrder::PostThenWait);
        assert_eq!(
            post[1].schedule().as_slice(),
            &[SendDown, SendUp, RecvTop, RecvBottom]
        );
        let parity = exchangers(12, 3, 3, EdgeBehavior::Wrap, ExchangeOrder::Parity);
        assert_eq!(
            parity[0].schedule().as_slice(),
            &[SendDown, RecvTop, SendUp, RecvBottom]
        );
        assert_eq!(
            parity[1].schedule().as_slice(),
            &[RecvTop, SendDown, RecvBottom, SendUp]
        );
    }

    #[test]
    fn absorb_extremes_drop_outer_ops() {
        use HaloOp::*;
        let ex = exchangers(12, 3, 3, EdgeBehavior::Absorb, ExchangeOrder::PostThenWait);
        assert_eq!(ex[0].schedule().as_slice(), &[SendDown, RecvBottom]);
        assert_eq!(
            ex[1].schedule().as_slice(),
            &[SendDown, SendUp, RecvTop, RecvBottom]
        );
        assert_eq!(ex[2].schedule().as_slice(), &[SendUp, RecvTop]);
        assert!(!ex[0].links().receives(HaloSide::Top));
        assert!(!ex[2].links().sends(HaloSide::Bottom));
    }

    fn run_ring(workers: usize, edge: EdgeBehavior, order: ExchangeOrder) -> Vec<BandStore> {
        let rows = workers * 2;
        let ex = exchangers(rows, 3, workers, edge, order);
        thread::scope(|s| {
            let handles: Vec<_> = ex
                .iter()
                .map(|ex| {
                    s.spawn(move || {
                        let tag = ex.rank().owner_tag();
                        // Row 1 holds 10*tag, row 2 holds 20*tag.
                        let mut band = band_from_rows(&[
                            &[10 * tag, 10 * tag, 10 * tag],
                            &[20 * tag, 20 * tag, 20 * tag],
                        ]);
                        ex.exchange(&mut band, Generation(0)).unwrap();
                        band
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        })
    }

    #[test]
    fn halos_hold_neighbour_boundary_rows() {
        for order in [ExchangeOrder::PostThenWait, ExchangeOrder::Parity] {
            for workers in 1..=4 {
                let bands = run_ring(workers, EdgeBehavior::Wrap, order);
                for (i, band) in bands.iter().enumerate() {
                    let prev = ((i + workers - 1) % workers) as u32 + 1;
                    let next = ((i + 1) % workers) as u32 + 1;
                    assert_eq!(band.halo_row(HaloSide::Top), &[20 * prev; 3]);
                    assert_eq!(band.halo_row(HaloSide::Bottom), &[10 * next; 3]);
                }
            }
        }
    }

    #[test]
    fn absorb_leaves_outer_halos_dead() {
        let bands = run_ring(4, EdgeBehavior::Absorb, ExchangeOrder::PostThenWait);
        assert_eq!(bands[0].halo_row(HaloSide::Top), &[0, 0, 0]);
        assert_eq!(bands[3].halo_row(HaloSide::Bottom), &[0, 0, 0]);
        assert_eq!(bands[1].halo_row(HaloSide::Top), &[20, 20, 20]);
        assert_eq!(bands[2].halo_row(HaloSide::Bottom), &[40, 40, 40]);
    }

    #[test]
    fn dropped_peer_is_disconnect() {
        let mut ex = exchangers(4, 2, 2, EdgeBehavior::Absorb, ExchangeOrder::PostThenWait);
        let second = ex.pop().unwrap();
        drop(ex);
        let mut band = BandStore::new(2, 2);
        let err = second.exchange(&mut band, Generation(0)).unwrap_err();
        assert_eq!(
            err,
            ExchangeError::Disconnected {
                peer: Rank(0),
                side: HaloSide::Top
            }
        );
    }

    #[test]
    fn stale_generation_is_out_of_step() {
        let ex = exchangers(4, 2, 2, EdgeBehavior::Absorb, ExchangeOrder::PostThenWait);
        let (_, to_second) = ex[0].links.to_next.as_ref().unwrap();
        to_second
            .send(HaloRow {
                generation: Generation(3),
                from: Rank(0),
                cells: vec![1, 1],
            })
            .unwrap();
        let mut band = BandStore::new(2, 2);
        let err = ex[1].exchange(&mut band, Generation(4)).unwrap_err();
        assert_eq!(
            err,
            ExchangeError::OutOfStep {
                peer: Rank(0),
                expected: Generation(4),
                got: Generation(3)
            }
        );
    }

    #[test]
    fn short_row_is_rejected() {
        let ex = exchangers(4, 2, 2, EdgeBehavior::Absorb, ExchangeOrder::PostThenWait);
        let (_, to_second) = ex[0].links.to_next.as_ref().unwrap();
        to_second
            .send(HaloRow {
                generation: Generation(0),
                from: Rank(0),
                cells: vec![1],
            })
            .unwrap();
        let mut band = BandStore::new(2, 2);
        let err = ex[1].exchange(&mut band, Generation(0)).unwrap_err();
        assert_eq!(
            err,
            ExchangeError::RowLength {
                peer: Rank(0),
                expected: 2,
                got: 1
            }
        );
    }
}
