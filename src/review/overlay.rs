//! Speed and steering bars drawn over a copy of a frame.

use crate::core::types::Frame;

/// Bar colour, in the frame's own channel order.
pub const OVERLAY_COLOR: [u8; 3] = [76, 84, 255];

// Speed bar: vertical, grows up from row 240 in columns 20..=50.
const SPEED_COLS: (i64, i64) = (20, 50);
const SPEED_BASE_ROW: f64 = 240.0;
const SPEED_SCALE: f64 = 220.0;

// Steering bar: horizontal, grows from column 320 in rows 430..=460.
const STEER_ROWS: (i64, i64) = (430, 460);
const STEER_BASE_COL: f64 = 320.0;
const STEER_SCALE: f64 = 150.0;

/// Copy `frame` and draw the command bars on it.
///
/// Coordinates are laid out for a 640×480 camera; on smaller frames the
/// bars are clipped. The input frame is not modified.
pub fn draw_overlay(frame: &Frame, linear: f64, angular: f64) -> Frame {
    let mut canvas = frame.clone();
    if !canvas.is_consistent() {
        return canvas;
    }

    let speed_top = (SPEED_BASE_ROW - SPEED_SCALE * linear) as i64;
    fill_rect(
        &mut canvas,
        (SPEED_BASE_ROW as i64, speed_top),
        SPEED_COLS,
    );

    let steer_end = (STEER_BASE_COL - STEER_SCALE * angular) as i64;
    fill_rect(&mut canvas, STEER_ROWS, (STEER_BASE_COL as i64, steer_end));

    canvas
}

/// Fill the inclusive rectangle spanned by two row and two column bounds.
fn fill_rect(frame: &mut Frame, rows: (i64, i64), cols: (i64, i64)) {
    let (h, w) = (frame.height as i64, frame.width as i64);
    let r0 = rows.0.min(rows.1).max(0);
    let r1 = rows.0.max(rows.1).min(h - 1);
    let c0 = cols.0.min(cols.1).max(0);
    let c1 = cols.0.max(cols.1).min(w - 1);
    if r0 > r1 || c0 > c1 {
        return;
    }

    for row in r0..=r1 {
        for col in c0..=c1 {
            let idx = ((row * w + col) * 3) as usize;
            frame.data[idx..idx + 3].copy_from_slice(&OVERLAY_COLOR);
        }
    }
}
