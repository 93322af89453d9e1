//! Advancing a grid off the calling thread.
//!
//! Submitting a step moves the [`Grid`] to the worker and hands back a
//! [`PendingStep`]; the grid can only be read or stepped again once the
//! pending step returns it, so at most one step per grid is ever in flight.

use std::thread;

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, trace, warn};

use crate::{Error, Grid, Result};

struct Job {
    grid: Grid,
    done: Sender<Grid>,
}

/// A single background thread that steps grids handed to it.
pub struct StepWorker {
    jobs: Option<Sender<Job>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl StepWorker {
    pub fn spawn() -> Result<Self> {
        let (jobs, incoming) = crossbeam_channel::unbounded::<Job>();
        let handle = thread::Builder::new()
            .name("step-worker".to_string())
            .spawn(move || {
                for Job { mut grid, done } in incoming.iter() {
                    grid.step();
                    if done.send(grid).is_err() {
                        trace!("pending step dropped before completion");
                    }
                }
                debug!("step worker stopping");
            })
            .map_err(Error::WorkerSpawn)?;
        debug!("step worker started");

        Ok(Self {
            jobs: Some(jobs),
            handle: Some(handle),
        })
    }

    /// Queues one generation of `grid` on the worker.
    pub fn submit(&self, grid: Grid) -> Result<PendingStep> {
        let jobs = self.jobs.as_ref().ok_or(Error::WorkerGone)?;
        let (done, result) = crossbeam_channel::bounded(1);
        jobs.send(Job { grid, done })
            .map_err(|_| Error::WorkerGone)?;
        Ok(PendingStep { result })
    }
}

impl Drop for StepWorker {
    fn drop(&mut self) {
        // closing the job channel ends the worker loop
        self.jobs.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("step worker panicked");
            }
        }
    }
}

/// Handle to a step running on a [`StepWorker`].
#[must_use = "the grid stays with the worker until the step is waited on"]
pub struct PendingStep {
    result: Receiver<Grid>,
}

impl PendingStep {
    /// Whether [`PendingStep::wait`] would return without blocking.
    pub fn is_ready(&self) -> bool {
        !self.result.is_empty()
    }

    /// Blocks until the worker hands the stepped grid back.
    pub fn wait(self) -> Result<Grid> {
        self.result.recv().map_err(|_| Error::WorkerGone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pattern, seed};

    #[test]
    fn background_step_matches_inline_step() {
        let worker = StepWorker::spawn().unwrap();
        let mut inline = Grid::new(20, 30, seed::random(0.4, Some(7))).unwrap();
        let mut background = inline.clone();

        for _ in 0..10 {
            inline.step();
            background = worker.submit(background).unwrap().wait().unwrap();
            assert_eq!(background, inline);
        }
    }

    #[test]
    fn pending_step_becomes_ready() {
        let worker = StepWorker::spawn().unwrap();
        let grid = Grid::new(5, 5, pattern::BLINKER.place_centered(5, 5)).unwrap();
        let pending = worker.submit(grid).unwrap();

        while !pending.is_ready() {
            thread::yield_now();
        }
        let grid = pending.wait().unwrap();
        assert_eq!(grid.to_string(), ".....\n..O..\n..O..\n..O..\n.....\n");
    }

    #[test]
    fn worker_survives_abandoned_steps() {
        let worker = StepWorker::spawn().unwrap();
        let grid = Grid::new(4, 4, pattern::BLOCK.place(4, 4, (1, 1))).unwrap();
        drop(worker.submit(grid.clone()).unwrap());

        let stepped = worker.submit(grid.clone()).unwrap().wait().unwrap();
        assert_eq!(stepped, grid);
    }

    #[test]
    fn drop_joins_worker() {
        let worker = StepWorker::spawn().unwrap();
        let pending = worker
            .submit(Grid::new(3, 3, seed::dead).unwrap())
            .unwrap();
        drop(worker);
        // queued jobs still finish before the worker exits
        assert_eq!(pending.wait().unwrap().population(), 0);
    }
}
