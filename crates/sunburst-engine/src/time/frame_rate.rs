use std::time::{Duration, Instant};

/// Counts frames and logs the average rate once per elapsed second.
#[derive(Debug, Clone)]
pub struct FrameRateCounter {
    window_start: Instant,
    frames: u32,
    interval: Duration,
    last_fps: Option<f64>,
}

impl FrameRateCounter {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_secs(1))
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            window_start: Instant::now(),
            frames: 0,
            interval,
            last_fps: None,
        }
    }

    /// Records one frame. Returns the rate when a report interval closes.
    pub fn frame(&mut self) -> Option<f64> {
        let fps = self.frame_at(Instant::now())?;
        log::info!("FPS: {fps:.1}");
        Some(fps)
    }

    /// Most recent completed report.
    pub fn last_fps(&self) -> Option<f64> {
        self.last_fps
    }

    fn frame_at(&mut self, now: Instant) -> Option<f64> {
        self.frames += 1;

        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed < self.interval {
            return None;
        }

        let fps = self.frames as f64 / elapsed.as_secs_f64();
        self.frames = 0;
        self.window_start = now;
        self.last_fps = Some(fps);
        Some(fps)
    }
}

impl Default for FrameRateCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_once_per_interval() {
        let mut counter = FrameRateCounter::new();
        let start = counter.window_start;

        for i in 1..60 {
            assert_eq!(counter.frame_at(start + Duration::from_millis(i * 16)), None);
        }
        let fps = counter.frame_at(start + Duration::from_secs(1)).unwrap();
        assert!((fps - 60.0).abs() < 1e-9);
        assert_eq!(counter.last_fps(), Some(fps));

        // Counting restarts from the report.
        assert_eq!(counter.frame_at(start + Duration::from_millis(1500)), None);
    }
}
