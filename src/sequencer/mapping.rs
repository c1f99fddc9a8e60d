//! Frame <-> pixel conversions shared by the top bar, playhead and rows.
//!
//! All functions are pure. Callers guarantee `end > start` and `zoom >= 1`
//! (both are enforced by `SequencerState`), so no division here can hit zero.

/// Slack applied before flooring so `x_to_frame(frame_to_x(f)) == f`
/// survives float error at exact frame boundaries.
const FLOOR_EPSILON: f32 = 1e-2;

/// Horizontal pixels covered by one frame at the current zoom.
///
/// The track is the panel minus the label column; it shows
/// `(end - start) / zoom` frames.
pub fn per_frame_width(panel_width: f32, label_width: f32, start: u32, end: u32, zoom: f32) -> f32 {
    let visible_frames = (end - start) as f32 / zoom;
    (panel_width - label_width) / visible_frames
}

/// Offset of `frame` from the left edge of the track.
///
/// `view_start` is the first visible frame (`start + offset`).
/// Frames left of the view give negative offsets.
pub fn frame_to_x(frame: u32, view_start: u32, pixels_per_frame: f32) -> f32 {
    (frame as f32 - view_start as f32) * pixels_per_frame
}

/// Frame under screen coordinate `x`. Rounds toward negative infinity.
///
/// `track_origin_x` is the left edge of the sequencer content, `label_width`
/// the label column in front of the track. Positions left of the track
/// produce frames below `view_start` (possibly negative).
pub fn x_to_frame(x: f32, track_origin_x: f32, label_width: f32, view_start: u32, pixels_per_frame: f32) -> i64 {
    let local = (x - track_origin_x - label_width) / pixels_per_frame;
    (local + FLOOR_EPSILON).floor() as i64 + view_start as i64
}

/// Number of whole frames visible at `zoom`, never more than `total_frames`.
pub fn view_width(total_frames: u32, zoom: f32) -> u32 {
    ((total_frames as f32 / zoom) as u32).min(total_frames)
}

/// Frame picked by the playhead scrubber.
///
/// `normalized` is the pointer position over the work area in `[0, 1]`
/// (clamped here); the result is rounded to the nearest frame.
pub fn scrub_frame(normalized: f32, start: u32, end: u32, zoom: f32, offset: u32) -> u32 {
    let clamped = normalized.clamp(0.0, 1.0);
    let view_size = end.saturating_sub(start) as f32 / zoom;
    let frame_in_view = start as f32 + clamped * view_size;
    (frame_in_view.round() as u32).saturating_add(offset).min(end)
}

/// Ruler tick spacing `(primary, secondary)` for `count` visible frames.
///
/// Primary ticks carry labels and land on powers of ten (halved when that
/// would leave fewer than three labels); secondary ticks split each primary
/// step into five.
pub fn tick_steps(count: u32) -> (u32, u32) {
    if count < 10 {
        return (1, 1);
    }
    let mut primary = 10u32.pow(count.ilog10());
    if count / primary < 3 && primary >= 10 {
        primary /= 2;
    }
    let secondary = (primary / 5).max(1);
    (primary, secondary)
}
