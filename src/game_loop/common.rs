//! Frame pacing shared by the frame loop

use std::time::{Duration, Instant};

/// Frame duration for a target rate; a rate of 0 is treated as 1 fps.
pub fn frame_duration(target_fps: u64) -> Duration {
    Duration::from_micros(1_000_000 / target_fps.max(1))
}

/// Sleep out the rest of the frame that began at `frame_start`.
///
/// Call at the end of each loop iteration. Frames that overran are not
/// compensated.
pub fn limit_frame_rate(frame_start: Instant, frame: Duration) {
    let elapsed = frame_start.elapsed();
    if elapsed < frame {
        std::thread::sleep(frame - elapsed);
    }
}
