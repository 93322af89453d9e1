use std::io::Write;

use life_common::{gameloop::Timer, Config, Generation};
use life_engine::{Grid, StepWorker};
use tracing::{debug, trace};

use crate::{render::Renderer, Error, Result};

/// Everything one run owns, from the first frame until exit.
pub struct Context<W> {
    // None only while a step is out on the worker
    grid: Option<Grid>,
    worker: Option<StepWorker>,
    renderer: Renderer<W>,
    timer: Timer,
    generation: Generation,
    limit: Option<u64>,
}

impl<W: Write> Context<W> {
    pub fn new(config: &Config, grid: Grid, renderer: Renderer<W>) -> Result<Self> {
        let worker = if config.background {
            debug!("stepping on background worker");
            Some(StepWorker::spawn()?)
        } else {
            None
        };
        Ok(Self {
            grid: Some(grid),
            worker,
            renderer,
            timer: Timer::new(config.frame_interval),
            generation: Generation::zero(),
            limit: config.generations,
        })
    }

    #[cfg(test)]
    pub fn grid(&self) -> Result<&Grid> {
        self.grid.as_ref().ok_or(Error::StepInFlight)
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    #[cfg(test)]
    pub fn renderer(&self) -> &Renderer<W> {
        &self.renderer
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.limit, Some(limit) if self.generation.0 >= limit)
    }

    pub fn draw(&mut self) -> Result<()> {
        let grid = self.grid.as_ref().ok_or(Error::StepInFlight)?;
        self.renderer.render(grid, self.generation)?;
        Ok(())
    }

    /// Moves the grid forward one generation, on the worker if there is one.
    ///
    /// Returns once the new generation is visible.
    pub async fn advance(&mut self) -> Result<()> {
        match &self.worker {
            None => self.grid.as_mut().ok_or(Error::StepInFlight)?.step(),
            Some(worker) => {
                let grid = self.grid.take().ok_or(Error::StepInFlight)?;
                let pending = worker.submit(grid)?;
                let grid = tokio::task::spawn_blocking(move || pending.wait()).await??;
                self.grid = Some(grid);
            }
        }
        self.generation.increment_self();
        trace!(generation = %self.generation, "advanced");
        Ok(())
    }

    pub async fn frame(&mut self) -> Result<()> {
        self.draw()?;
        self.advance().await
    }

    /// Draws and advances once per frame interval until the generation limit.
    ///
    /// The last generation is drawn before returning. Without a limit this
    /// only returns on error.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            if self.is_finished() {
                return self.draw();
            }
            self.timer.update();
            if self.timer.tick() {
                self.frame().await?;
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(self.timer.until_next()).await;
            }
        }
    }
}
