pub use self::timer::Timer;

mod timer {
    use std::time::{Duration, Instant};

    // lag beyond this many frames is dropped instead of replayed
    const MAX_LAG_FRAMES: u32 = 10;

    /// Fixed-interval frame clock.
    ///
    /// Call [`Timer::update`] once per loop iteration, then [`Timer::tick`]
    /// to find out whether a frame is due.
    #[derive(Debug)]
    pub struct Timer {
        target_delta: Duration,
        last_tick: Instant,
        accumulated_delta: Duration,
    }

    impl Timer {
        /// A timer whose first frame is due immediately.
        pub fn new(frame_interval: Duration) -> Timer {
            Timer {
                target_delta: frame_interval,
                last_tick: Instant::now(),
                accumulated_delta: frame_interval,
            }
        }

        pub fn update(&mut self) {
            let now = Instant::now();
            let diff = now - self.last_tick;

            self.last_tick = now;
            self.advance(diff);
        }

        fn advance(&mut self, diff: Duration) {
            self.accumulated_delta += diff;
            let max_lag = self.target_delta * MAX_LAG_FRAMES;
            if self.accumulated_delta > max_lag {
                self.accumulated_delta = max_lag;
            }
        }

        pub fn tick(&mut self) -> bool {
            if self.accumulated_delta >= self.target_delta {
                self.accumulated_delta -= self.target_delta;
                true
            } else {
                false
            }
        }

        /// Time left until the next frame is due.
        pub fn until_next(&self) -> Duration {
            self.target_delta.saturating_sub(self.accumulated_delta)
        }
    }

}
