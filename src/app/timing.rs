use std::time::Instant;

/// Elapsed-seconds clock for the per-frame tick. The first frame has no
/// predecessor and reports zero.
pub struct FrameTiming {
    last_frame_time: Option<Instant>,
    pub frame_dt: f32,
}

impl FrameTiming {
    pub fn new() -> Self {
        Self {
            last_frame_time: None,
            frame_dt: 0.0,
        }
    }

    pub fn update(&mut self, now: Instant) -> f32 {
        let dt = match self.last_frame_time {
            Some(last) => now.saturating_duration_since(last).as_secs_f32(),
            None => f32::NAN,
        };
        self.last_frame_time = Some(now);
        self.frame_dt = sanitize_dt(dt);
        self.frame_dt
    }
}

/// NaN (no previous frame) and negative values become zero.
pub fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_nan() {
        0.0
    } else {
        dt.max(0.0)
    }
}
