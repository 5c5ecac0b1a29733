//! Frame clock driven by the host ticker's timestamps.
//!
//! The ticker hands us absolute seconds; we never read a wall clock, so the
//! same tick sequence always yields the same state. There is no lag
//! smoothing: a long stall shows up as one large `dt`.

const FPS_SAMPLE_COUNT: usize = 60;
/// Seconds of ticker time between stats reports.
const STATS_INTERVAL: f64 = 1.0;

pub struct FrameClock {
    started: Option<f64>,
    last_time: Option<f64>,
    /// Ticker time of the most recent frame, in seconds.
    pub now: f64,
    /// Seconds since the first tick.
    pub elapsed: f64,
    pub dt: f64,
    pub frame_count: u64,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,

    stats_window_start: f64,
    stats_due: bool,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            started: None,
            last_time: None,
            now: 0.0,
            elapsed: 0.0,
            dt: 0.0,
            frame_count: 0,
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
            stats_window_start: 0.0,
            stats_due: false,
        }
    }

    pub fn begin_frame(&mut self, time: f64) {
        let started = *self.started.get_or_insert(time);
        // Ticker time never runs backwards for us.
        let time = self.last_time.map_or(time, |last| time.max(last));
        self.dt = self.last_time.map_or(0.0, |last| time - last);
        self.last_time = Some(time);
        self.now = time;
        self.elapsed = time - started;
        self.frame_count += 1;

        if self.frame_count == 1 {
            self.stats_window_start = time;
        }
        self.stats_due = time - self.stats_window_start >= STATS_INTERVAL;
        if self.stats_due {
            self.stats_window_start = time;
        }

        if self.dt > 0.0 {
            self.fps_samples[self.fps_sample_index] = self.dt;
            self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
            let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
            self.smoothed_frame_time_ms = avg_dt * 1000.0;
            self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
        }
    }

    /// True on the first frame of each new second of ticker time.
    pub fn stats_due(&self) -> bool {
        self.stats_due
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
