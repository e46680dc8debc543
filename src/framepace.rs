use std::time::{Duration, Instant};

/// Longest frame time handed to the physics, so a stall doesn't teleport
/// bodies across the box.
const MAX_DELTA: f32 = 0.1;

pub struct Framepacer {
    frame_start: Instant,
    delta: f32,
}

impl Framepacer {
    pub fn new() -> Self {
        Self {
            frame_start: Instant::now(),
            delta: 0.0,
        }
    }

    /// Starts a frame and returns the time since the previous one started.
    pub fn begin_frame(&mut self) -> f32 {
        let now = Instant::now();
        self.delta = now.duration_since(self.frame_start).as_secs_f32();
        self.frame_start = now;

        self.delta.min(MAX_DELTA)
    }

    pub fn framerate(&self) -> f32 {
        if self.delta > 0.0 {
            1.0 / self.delta
        } else {
            0.0
        }
    }

    /// Sleeps off whatever is left of `limit_frametime`, if it's set.
    pub fn end_frame(&self, limit_frametime: f32) {
        if limit_frametime > f32::EPSILON && limit_frametime.is_finite() {
            const ACCURACY: f32 = 0.0001; // 100 microseconds
            let sleep_time = limit_frametime - self.frametime() - ACCURACY;

            if sleep_time > 0.0 {
                std::thread::sleep(Duration::from_secs_f32(sleep_time));

                while self.frametime() < limit_frametime {
                    std::thread::yield_now();
                }
            }
        }
    }

    fn frametime(&self) -> f32 {
        self.frame_start.elapsed().as_secs_f32()
    }
}
