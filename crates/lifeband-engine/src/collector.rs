//! Snapshot gathering.
//!
//! Every generation each worker renders its real rows as text and hands
//! them to its [`GridCollector`]. Rank 0 runs a [`Coordinator`] that
//! assembles the bands in rank order and writes
//!
//! ```text
//! Complete Grid at time step <t>:
//! <band 0 rows>
//! ...
//! <band P-1 rows>
//!
//! ```
//!
//! Every other rank runs a [`Contributor`] that forwards its text over an
//! unbounded channel.
//!
//! Workers are never more than a few generations apart, but reports can
//! still arrive out of order. The coordinator buffers them keyed by
//! `(generation, rank)` and prints a generation only once it is complete.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Write;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, warn};

use lifeband_arena::BandStore;
use lifeband_core::{CollectError, Generation, Rank};

/// One worker's rendered band for one generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BandReport {
    /// Reporting rank.
    pub rank: Rank,
    /// Generation the text shows.
    pub generation: Generation,
    /// The band's real rows, formatted by [`format_band`].
    pub text: String,
}

/// Receives one band's text per generation.
pub trait GridCollector {
    /// Hand over this worker's band text for `generation`.
    fn collect(&mut self, generation: Generation, band_text: String) -> Result<(), CollectError>;

    /// Called once after the last generation.
    fn finish(&mut self) -> Result<(), CollectError> {
        Ok(())
    }
}

/// Render the real rows of `band`: each value followed by one space, one
/// line per row.
pub fn format_band(band: &BandStore) -> String {
    let mut out = String::with_capacity(band.band_rows() * (band.cols() * 2 + 1));
    for row in 1..=band.band_rows() {
        for &c in band.row(row) {
            let _ = write!(out, "{c} ");
        }
        out.push('\n');
    }
    out
}

/// Collector for every rank except 0.
#[derive(Debug)]
pub struct Contributor {
    rank: Rank,
    outbox: Sender<BandReport>,
}

impl Contributor {
    /// Forward reports from `rank` into `outbox`.
    pub fn new(rank: Rank, outbox: Sender<BandReport>) -> Self {
        Self { rank, outbox }
    }
}

impl GridCollector for Contributor {
    fn collect(&mut self, generation: Generation, band_text: String) -> Result<(), CollectError> {
        self.outbox
            .send(BandReport {
                rank: self.rank,
                generation,
                text: band_text,
            })
            .map_err(|_| CollectError::Disconnected { rank: self.rank })
    }
}

/// Collector for rank 0: gathers every band and writes the snapshot.
pub struct Coordinator<W: Write> {
    workers: usize,
    inbox: Receiver<BandReport>,
    pending: BTreeMap<(Generation, Rank), String>,
    printed: Option<Generation>,
    sink: W,
}

impl<W: Write> Coordinator<W> {
    /// Gather reports from `workers` ranks (itself included) arriving on
    /// `inbox` and write snapshots to `sink`.
    ///
    /// The coordinator must not hold a sender for `inbox`, so that it sees
    /// a disconnect once every contributor has gone away.
    pub fn new(workers: usize, inbox: Receiver<BandReport>, sink: W) -> Self {
        Self {
            workers,
            inbox,
            pending: BTreeMap::new(),
            printed: None,
            sink,
        }
    }

    fn have_all(&self, generation: Generation) -> bool {
        self.pending
            .range((generation, Rank(0))..=(generation, Rank(u32::MAX)))
            .count()
            == self.workers
    }

    fn accept(&mut self, report: BandReport) -> Result<(), CollectError> {
        if report.rank.index() >= self.workers {
            return Err(CollectError::UnknownRank { rank: report.rank });
        }
        if let Some(printed) = self.printed {
            if report.generation <= printed {
                return Err(CollectError::StaleReport {
                    rank: report.rank,
                    generation: report.generation,
                    current: printed.next(),
                });
            }
        }
        let key = (report.generation, report.rank);
        if self.pending.insert(key, report.text).is_some() {
            warn!(rank = %key.1, generation = %key.0, "duplicate band report replaced");
        }
        Ok(())
    }

    fn write_snapshot(&mut self, generation: Generation) -> Result<(), CollectError> {
        writeln!(self.sink, "Complete Grid at time step {generation}:")?;
        for r in 0..self.workers as u32 {
            if let Some(text) = self.pending.remove(&(generation, Rank(r))) {
                self.sink.write_all(text.as_bytes())?;
            }
        }
        writeln!(self.sink)?;
        self.sink.flush()?;
        self.printed = Some(generation);
        Ok(())
    }
}

impl<W: Write> GridCollector for Coordinator<W> {
    fn collect(&mut self, generation: Generation, band_text: String) -> Result<(), CollectError> {
        self.accept(BandReport {
            rank: Rank::COORDINATOR,
            generation,
            text: band_text,
        })?;
        while !self.have_all(generation) {
            let report = self
                .inbox
                .recv()
                .map_err(|_| CollectError::Disconnected {
                    rank: Rank::COORDINATOR,
                })?;
            self.accept(report)?;
        }
        self.write_snapshot(generation)?;
        debug!(%generation, "snapshot written");
        Ok(())
    }

    fn finish(&mut self) -> Result<(), CollectError> {
        if !self.pending.is_empty() {
            warn!(
                reports = self.pending.len(),
                "band reports left over after the last generation"
            );
        }
        self.sink.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use lifeband_test_utils::{band_from_rows, BrokenSink, CaptureSink};

    #[test]
    fn band_text_format() {
        let band = band_from_rows(&[&[1, 0, 2], &[0, 0, 0]]);
        assert_eq!(format_band(&band), "1 0 2 \n0 0 0 \n");
    }

    #[test]
    fn single_worker_prints_immediately() {
        let (_tx, rx) = unbounded();
        let sink = CaptureSink::new();
        let mut coord = Coordinator::new(1, rx, sink.clone());
        coord.collect(Generation(0), "1 0 \n".into()).unwrap();
        coord.collect(Generation(1), "0 0 \n".into()).unwrap();
        assert_eq!(
            sink.contents(),
            "Complete Grid at time step 0:\n1 0 \n\nComplete Grid at time step 1:\n0 0 \n\n"
        );
    }

    #[test]
    fn bands_printed_in_rank_order() {
        let (tx, rx) = unbounded();
        let sink = CaptureSink::new();
        let mut coord = Coordinator::new(3, rx, sink.clone());
        let mut c1 = Contributor::new(Rank(1), tx.clone());
        let mut c2 = Contributor::new(Rank(2), tx);
        // Rank 2 reports before rank 1, and already for the next generation.
        c2.collect(Generation(0), "c \n".into()).unwrap();
        c2.collect(Generation(1), "C \n".into()).unwrap();
        c1.collect(Generation(0), "b \n".into()).unwrap();
        coord.collect(Generation(0), "a \n".into()).unwrap();
        assert_eq!(
            sink.contents(),
            "Complete Grid at time step 0:\na \nb \nc \n\n"
        );
        c1.collect(Generation(1), "B \n".into()).unwrap();
        coord.collect(Generation(1), "A \n".into()).unwrap();
        assert!(sink
            .contents()
            .ends_with("Complete Grid at time step 1:\nA \nB \nC \n\n"));
    }

    #[test]
    fn missing_contributor_is_disconnect() {
        let (tx, rx) = unbounded::<BandReport>();
        drop(tx);
        let mut coord = Coordinator::new(2, rx, CaptureSink::new());
        let err = coord.collect(Generation(0), String::new()).unwrap_err();
        assert!(matches!(err, CollectError::Disconnected { rank: Rank(0) }));
    }

    #[test]
    fn contributor_without_coordinator_is_disconnect() {
        let (tx, rx) = unbounded();
        drop(rx);
        let mut c = Contributor::new(Rank(3), tx);
        let err = c.collect(Generation(0), String::new()).unwrap_err();
        assert!(matches!(err, CollectError::Disconnected { rank: Rank(3) }));
    }

    #[test]
    fn unknown_rank_rejected() {
        let (tx, rx) = unbounded();
        let mut coord = Coordinator::new(2, rx, CaptureSink::new());
        tx.send(BandReport {
            rank: Rank(5),
            generation: Generation(0),
            text: String::new(),
        })
        .unwrap();
        let err = coord.collect(Generation(0), String::new()).unwrap_err();
        assert!(matches!(err, CollectError::UnknownRank { rank: Rank(5) }));
    }

    #[test]
    fn stale_report_rejected() {
        let (tx, rx) = unbounded();
        let mut coord = Coordinator::new(2, rx, CaptureSink::new());
        let mut c1 = Contributor::new(Rank(1), tx);
        c1.collect(Generation(0), "x \n".into()).unwrap();
        coord.collect(Generation(0), "y \n".into()).unwrap();
        c1.collect(Generation(0), "x \n".into()).unwrap();
        let err = coord.collect(Generation(1), "y \n".into()).unwrap_err();
        assert!(matches!(
            err,
            CollectError::StaleReport {
                rank: Rank(1),
                generation: Generation(0),
                current: Generation(1)
            }
        ));
    }

    #[test]
    fn sink_failure_is_io_error() {
        let (_tx, rx) = unbounded();
        let mut coord = Coordinator::new(1, rx, BrokenSink);
        let err = coord.collect(Generation(0), "1 \n".into()).unwrap_err();
        assert!(matches!(err, CollectError::Io(_)));
    }
}
