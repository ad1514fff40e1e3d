//! Producer/consumer plotting pipeline.
//!
//! The producer sequences strokes from a document and pushes them onto
//! an unbounded channel; the consumer drains the channel into a
//! [`Plotter`]. Geometry work for later strokes overlaps with the
//! device drawing earlier ones.
//!
//! Ordering on the channel is the plotting order: all strokes of the
//! first `<path>` element, then the next element's, then one
//! [`Job::RectRepeat`] per rectangle, then [`Job::EndOfStream`].

use std::iter;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use plotpath_core::{
    RECT_PASSES, Rect, SequencerConfig, Stroke, StrokeSequencer, VisitationGraph,
};
use plotpath_svg::Document;

use crate::plotter::{Plotter, PlotterError};

/// One unit of work on the job channel.
#[derive(Debug, Clone, PartialEq)]
pub enum Job {
    /// Move to the first point, then draw through all of them.
    Stroke(Stroke),
    /// Draw the rectangle outline [`RECT_PASSES`] times.
    RectRepeat(Rect),
    /// No further jobs follow.
    EndOfStream,
}

/// What the consumer sent to the plotter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlotSummary {
    /// Strokes plotted.
    pub strokes: usize,
    /// Rectangles plotted (each counted once, not per pass).
    pub rects: usize,
    /// Total `draw` calls issued.
    pub draws: usize,
}

/// Sequence every path element of `document` and send the jobs.
///
/// Each `<path>` element gets its own graph and sequencer, so the
/// cursor restarts at `config.origin` for every element. Returns the
/// number of jobs sent. If the receiver is dropped the producer stops
/// early without error.
pub fn produce(document: Document, config: &SequencerConfig, jobs: &Sender<Job>) -> usize {
    let strokes = document
        .paths
        .into_iter()
        .flat_map(|polylines| {
            StrokeSequencer::new(VisitationGraph::from_polylines(&polylines), config)
        })
        .map(Job::Stroke);
    let rects = document.rects.into_iter().map(Job::RectRepeat);

    let mut sent = 0;
    for job in strokes.chain(rects).chain(iter::once(Job::EndOfStream)) {
        if jobs.send(job).is_err() {
            tracing::debug!(sent, "consumer hung up, stopping producer");
            break;
        }
        sent += 1;
    }
    sent
}

fn drain<P: Plotter + ?Sized>(
    jobs: &Receiver<Job>,
    plotter: &mut P,
) -> Result<PlotSummary, PlotterError> {
    let mut summary = PlotSummary::default();
    loop {
        match jobs.recv().map_err(|_| PlotterError::ProducerGone)? {
            Job::Stroke(stroke) => {
                let Some(start) = stroke.start() else {
                    continue;
                };
                plotter.set_position(start)?;
                plotter.draw(stroke.points())?;
                summary.strokes += 1;
                summary.draws += 1;
            }
            Job::RectRepeat(rect) => {
                let outline = rect.outline();
                for _ in 0..RECT_PASSES {
                    plotter.set_position(rect.origin)?;
                    plotter.draw(&outline)?;
                    summary.draws += 1;
                }
                summary.rects += 1;
            }
            Job::EndOfStream => return Ok(summary),
        }
    }
}

/// Homes the plotter when dropped unless disarmed, so an unwinding
/// drain still sends the tool head home.
struct HomeOnExit<'a, P: Plotter + ?Sized> {
    plotter: &'a mut P,
    armed: bool,
}

impl<P: Plotter + ?Sized> Drop for HomeOnExit<'_, P> {
    fn drop(&mut self) {
        if self.armed
            && let Err(e) = self.plotter.home()
        {
            tracing::warn!(error = %e, "failed to home plotter while unwinding");
        }
    }
}

/// Drain `jobs` into `plotter` until [`Job::EndOfStream`].
///
/// The plotter is homed once the drain stops, whether it finished,
/// failed or panicked. A drain error takes precedence over a homing
/// error.
///
/// # Errors
///
/// Returns the first plotter error, [`PlotterError::ProducerGone`] if
/// the channel closes before the end-of-stream marker, or the homing
/// error if draining succeeded but homing did not.
pub fn consume<P: Plotter + ?Sized>(
    jobs: &Receiver<Job>,
    plotter: &mut P,
) -> Result<PlotSummary, PlotterError> {
    let mut guard = HomeOnExit {
        plotter,
        armed: true,
    };
    let drained = drain(jobs, &mut *guard.plotter);
    if let Err(e) = &drained {
        tracing::error!(error = %e, "plotting stopped early, homing");
    }
    guard.armed = false;
    let homed = guard.plotter.home();
    if let Err(e) = &homed {
        tracing::warn!(error = %e, "failed to home plotter");
    }
    let summary = drained?;
    homed?;
    tracing::info!(
        strokes = summary.strokes,
        rects = summary.rects,
        draws = summary.draws,
        "plot complete"
    );
    Ok(summary)
}

/// Plot `document` on `plotter`, sequencing on a background thread.
///
/// # Errors
///
/// Returns [`PlotterError::Io`] if the producer thread cannot be
/// spawned, [`PlotterError::ProducerPanicked`] if it panics, or any
/// error from [`consume`].
pub fn run<P: Plotter + ?Sized>(
    document: Document,
    config: &SequencerConfig,
    plotter: &mut P,
) -> Result<PlotSummary, PlotterError> {
    let (tx, rx) = mpsc::channel();
    thread::scope(|scope| {
        let producer = thread::Builder::new()
            .name("plotpath-producer".to_string())
            .spawn_scoped(scope, move || produce(document, config, &tx))?;

        let outcome = consume(&rx, plotter);
        // Unblocks a producer still sending after a consumer failure.
        drop(rx);

        match (outcome, producer.join()) {
            (Ok(summary), Ok(sent)) => {
                tracing::debug!(jobs = sent, "producer finished");
                Ok(summary)
            }
            (Err(PlotterError::ProducerGone) | Ok(_), Err(_)) => {
                Err(PlotterError::ProducerPanicked)
            }
            (Err(e), _) => Err(e),
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use plotpath_core::{Point, Polyline};

    use super::*;
    use crate::log::{Command, CommandLog};

    fn segment(a: (f64, f64), b: (f64, f64)) -> Polyline {
        Polyline::new(vec![a.into(), b.into()])
    }

    fn collect_jobs(document: Document) -> Vec<Job> {
        let (tx, rx) = mpsc::channel();
        produce(document, &SequencerConfig::default(), &tx);
        drop(tx);
        rx.iter().collect()
    }

    #[test]
    fn jobs_are_paths_then_rects_then_end() {
        let document = Document {
            paths: vec![
                vec![segment((0.0, 0.0), (1.0, 0.0))],
                vec![segment((50.0, 0.0), (60.0, 0.0))],
            ],
            rects: vec![Rect::new(Point::new(0.0, 0.0), 2.0, 2.0)],
        };
        let jobs = collect_jobs(document);
        assert_eq!(jobs.len(), 4);
        assert!(matches!(jobs[0], Job::Stroke(_)));
        assert!(matches!(jobs[1], Job::Stroke(_)));
        assert!(matches!(jobs[2], Job::RectRepeat(_)));
        assert_eq!(jobs[3], Job::EndOfStream);
    }

    #[test]
    fn each_path_element_restarts_at_origin() {
        // Sequenced together, the cursor would sit at (200,0) and pick
        // (300,0) next. Separately, the second element searches from the
        // origin and starts at (10,0).
        let document = Document {
            paths: vec![
                vec![segment((0.0, 0.0), (200.0, 0.0))],
                vec![segment((300.0, 0.0), (10.0, 0.0))],
            ],
            rects: Vec::new(),
        };
        let jobs = collect_jobs(document);
        let Job::Stroke(second) = &jobs[1] else {
            panic!("expected stroke, got {:?}", jobs[1]);
        };
        assert_eq!(second.start(), Some(Point::new(10.0, 0.0)));
    }

    #[test]
    fn empty_document_sends_only_end_of_stream() {
        assert_eq!(collect_jobs(Document::default()), vec![Job::EndOfStream]);
    }

    #[test]
    fn producer_stops_when_consumer_hangs_up() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let document = Document {
            paths: vec![vec![segment((0.0, 0.0), (1.0, 0.0))]],
            rects: Vec::new(),
        };
        assert_eq!(produce(document, &SequencerConfig::default(), &tx), 0);
    }

    #[test]
    fn rect_is_drawn_three_times_from_origin() {
        let (tx, rx) = mpsc::channel();
        let rect = Rect::new(Point::new(0.0, 0.0), 10.0, 5.0);
        tx.send(Job::RectRepeat(rect)).unwrap();
        tx.send(Job::EndOfStream).unwrap();

        let mut log = CommandLog::new();
        let summary = consume(&rx, &mut log).unwrap();
        assert_eq!(
            summary,
            PlotSummary {
                strokes: 0,
                rects: 1,
                draws: 3
            }
        );

        let cycle = [
            Command::Move(Point::new(0.0, 0.0)),
            Command::Draw(rect.outline().to_vec()),
        ];
        let expected: Vec<Command> = cycle
            .iter()
            .cycle()
            .take(2 * RECT_PASSES)
            .cloned()
            .chain([Command::Home])
            .collect();
        assert_eq!(log.commands(), expected.as_slice());
    }

    #[test]
    fn stroke_moves_then_draws_whole_path() {
        let (tx, rx) = mpsc::channel();
        let points = vec![
            Point::new(3.0, 4.0),
            Point::new(5.0, 4.0),
            Point::new(5.0, 6.0),
        ];
        tx.send(Job::Stroke(Stroke::new(points.clone()))).unwrap();
        tx.send(Job::EndOfStream).unwrap();

        let mut log = CommandLog::new();
        consume(&rx, &mut log).unwrap();
        assert_eq!(
            log.commands(),
            &[
                Command::Move(Point::new(3.0, 4.0)),
                Command::Draw(points),
                Command::Home
            ]
        );
    }

    #[test]
    fn plotter_failure_still_homes() {
        let (tx, rx) = mpsc::channel();
        for x in [0.0, 100.0, 200.0] {
            let stroke = Stroke::new(vec![Point::new(x, 0.0), Point::new(x + 1.0, 0.0)]);
            tx.send(Job::Stroke(stroke)).unwrap();
        }
        tx.send(Job::EndOfStream).unwrap();

        let mut log = CommandLog::new().failing_on_draw(2);
        let err = consume(&rx, &mut log).unwrap_err();
        assert!(matches!(err, PlotterError::Rejected(_)));
        assert_eq!(log.draws().count(), 1);
        assert!(log.ended_home());
    }

    /// Panics on every draw and counts homing calls.
    #[derive(Default)]
    struct Seizing {
        homes: usize,
    }

    impl Plotter for Seizing {
        fn set_position(&mut self, _: Point) -> Result<(), PlotterError> {
            Ok(())
        }

        fn draw(&mut self, _: &[Point]) -> Result<(), PlotterError> {
            panic!("carriage seized");
        }

        fn home(&mut self) -> Result<(), PlotterError> {
            self.homes += 1;
            Ok(())
        }
    }

    #[test]
    fn panicking_plotter_is_homed_once() {
        let (tx, rx) = mpsc::channel();
        tx.send(Job::Stroke(Stroke::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
        ])))
        .unwrap();
        tx.send(Job::EndOfStream).unwrap();

        let mut plotter = Seizing::default();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            consume(&rx, &mut plotter)
        }));
        assert!(outcome.is_err());
        assert_eq!(plotter.homes, 1);
    }

    #[test]
    fn successful_drain_homes_exactly_once() {
        let (tx, rx) = mpsc::channel();
        tx.send(Job::EndOfStream).unwrap();
        let mut log = CommandLog::new();
        consume(&rx, &mut log).unwrap();
        assert_eq!(log.commands(), &[Command::Home]);
    }

    #[test]
    fn missing_end_of_stream_is_producer_gone() {
        let (tx, rx) = mpsc::channel();
        tx.send(Job::Stroke(Stroke::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
        ])))
        .unwrap();
        drop(tx);

        let mut log = CommandLog::new();
        let err = consume(&rx, &mut log).unwrap_err();
        assert!(matches!(err, PlotterError::ProducerGone));
        assert_eq!(log.draws().count(), 1);
        assert!(log.ended_home());
    }

    #[test]
    fn run_plots_whole_document() {
        let document = Document {
            paths: vec![vec![
                Polyline::new(vec![
                    Point::new(0.0, 0.0),
                    Point::new(0.0, 10.0),
                    Point::new(10.0, 10.0),
                    Point::new(10.0, 0.0),
                    Point::new(0.0, 0.0),
                ]),
                segment((500.0, 500.0), (510.0, 500.0)),
            ]],
            rects: vec![Rect::new(Point::new(20.0, 20.0), 5.0, 5.0)],
        };
        let mut log = CommandLog::new();
        let summary = run(document, &SequencerConfig::default(), &mut log).unwrap();
        assert_eq!(
            summary,
            PlotSummary {
                strokes: 2,
                rects: 1,
                draws: 2 + RECT_PASSES
            }
        );
        assert!(log.ended_home());
        let first: Vec<&[Point]> = log.draws().take(1).collect();
        assert_eq!(first[0].len(), 5);
    }

    #[test]
    fn run_after_consumer_failure_joins_producer() {
        let paths = (0..50)
            .map(|i| {
                let x = f64::from(i) * 100.0;
                vec![segment((x, 0.0), (x + 1.0, 0.0))]
            })
            .collect();
        let document = Document {
            paths,
            rects: Vec::new(),
        };
        let mut log = CommandLog::new().failing_on_draw(1);
        let err = run(document, &SequencerConfig::default(), &mut log).unwrap_err();
        assert!(matches!(err, PlotterError::Rejected(_)));
        assert!(log.ended_home());
    }
}
