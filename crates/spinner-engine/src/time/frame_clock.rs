use std::time::Instant;

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Milliseconds since the clock started (or was last reset).
    ///
    /// This is the frame timestamp animations are computed from. It is read
    /// from the wall clock, so animation speed does not depend on frame
    /// pacing.
    pub elapsed_ms: f64,

    /// Frames ticked since the clock started.
    pub frame_index: u64,
}

/// Produces one `FrameTime` per redraw.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    frame_index: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            frame_index: 0,
        }
    }

    /// Restarts the timeline at zero, as a freshly loaded scene would see it.
    pub fn reset(&mut self) {
        self.start = Instant::now();
        self.frame_index = 0;
    }

    /// Advances the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        let ft = FrameTime {
            elapsed_ms: self.start.elapsed().as_secs_f64() * 1000.0,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn frame_index_counts_ticks() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick().frame_index, 0);
        assert_eq!(clock.tick().frame_index, 1);
        assert_eq!(clock.tick().frame_index, 2);
    }

    #[test]
    fn elapsed_follows_wall_clock() {
        let mut clock = FrameClock::new();
        std::thread::sleep(Duration::from_millis(20));
        let ft = clock.tick();
        assert!(ft.elapsed_ms >= 20.0);
    }

    #[test]
    fn elapsed_is_monotonic() {
        let mut clock = FrameClock::new();
        let a = clock.tick().elapsed_ms;
        let b = clock.tick().elapsed_ms;
        assert!(b >= a);
    }

    #[test]
    fn reset_restarts_timeline() {
        let mut clock = FrameClock::new();
        std::thread::sleep(Duration::from_millis(20));
        clock.tick();
        clock.reset();

        let ft = clock.tick();
        assert_eq!(ft.frame_index, 0);
        assert!(ft.elapsed_ms < 20.0);
    }
}
