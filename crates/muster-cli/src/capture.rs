//! Interactive single-frame acquisition: prompt, capture, accept or cancel.

use anyhow::{Context, Result};
use muster_hw::{frame, Camera, Frame};
use std::io::{BufRead, Write};

/// Fraction of near-black pixels above which a capture warning is logged.
const DARK_FRAME_THRESHOLD: f32 = 0.95;

/// Acquire one accepted frame from the camera, or `None` if the user
/// cancels. Blocks on stdin between attempts; a hung camera blocks the
/// capture itself.
pub fn acquire(camera: &Camera) -> Result<Option<Frame>> {
    let stdin = std::io::stdin();
    let mut input = stdin.lock();

    loop {
        print!("[Enter] capture    [q] cancel > ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        let read = input.read_line(&mut line).context("reading stdin")?;
        if read == 0 {
            // stdin closed; treat like a cancel
            return Ok(None);
        }

        let choice = line.trim();
        if choice.eq_ignore_ascii_case("q") {
            return Ok(None);
        }
        if !choice.is_empty() {
            println!("unrecognized input {choice:?}");
            continue;
        }

        let captured = camera.capture_frame().context("camera capture failed")?;
        if frame::is_dark_frame(&captured.data, DARK_FRAME_THRESHOLD) {
            tracing::warn!(
                avg_brightness = captured.avg_brightness(),
                "captured frame is mostly dark"
            );
        }
        return Ok(Some(captured));
    }
}
