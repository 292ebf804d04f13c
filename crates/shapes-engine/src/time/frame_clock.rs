use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the previous tick, clamped.
    pub dt: f32,
    pub now: Instant,
    pub frame_index: u64,
}

/// Produces a [`FrameTime`] per frame.
///
/// Delta time is clamped so a debugger pause or a minimized window does not
/// show up as one enormous frame.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self { last: Instant::now(), frame_index: 0, dt_min, dt_max }
    }

    /// Restarts the delta baseline, e.g. after the surface was recreated.
    pub fn reset(&mut self) {
        self.last = Instant::now();
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime { dt: dt.as_secs_f32(), now, frame_index: self.frame_index };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Average frame rate over a reporting interval.
#[derive(Debug, Clone)]
pub struct FrameRate {
    interval: Duration,
    window_start: Option<Instant>,
    frames: u32,
}

impl FrameRate {
    pub fn new(interval: Duration) -> Self {
        Self { interval, window_start: None, frames: 0 }
    }

    /// Counts one frame; returns frames per second once per interval.
    pub fn record(&mut self, time: &FrameTime) -> Option<f32> {
        let start = *self.window_start.get_or_insert(time.now);
        self.frames += 1;

        let elapsed = time.now.saturating_duration_since(start);
        if elapsed < self.interval {
            return None;
        }
        let fps = self.frames as f32 / elapsed.as_secs_f32();
        self.window_start = Some(time.now);
        self.frames = 0;
        Some(fps)
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_count_frames_and_clamp_dt() {
        let mut clock = FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(100));
        let t0 = clock.last;

        let a = clock.tick_at(t0);
        assert_eq!(a.frame_index, 0);
        assert!((a.dt - 0.001).abs() < 1e-6);

        let b = clock.tick_at(t0 + Duration::from_secs(3));
        assert_eq!(b.frame_index, 1);
        assert!((b.dt - 0.1).abs() < 1e-6);

        let c = clock.tick_at(t0 + Duration::from_secs(3) + Duration::from_millis(16));
        assert!((c.dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn frame_rate_reports_once_per_interval() {
        let mut rate = FrameRate::new(Duration::from_secs(1));
        let t0 = Instant::now();
        let frame = |ms: u64, i: u64| FrameTime {
            dt: 0.01,
            now: t0 + Duration::from_millis(ms),
            frame_index: i,
        };

        let mut reports = Vec::new();
        for i in 0..=100 {
            if let Some(fps) = rate.record(&frame(i * 10, i)) {
                reports.push(fps);
            }
        }
        assert_eq!(reports.len(), 1);
        assert!((reports[0] - 101.0).abs() < 1e-3, "{reports:?}");
    }
}
