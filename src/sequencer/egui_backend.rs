//! egui glue: input snapshot, text metrics, painting and a `show` helper.

use super::draw::{DrawCmd, DrawList, TextMetrics};
use super::input::FrameInput;
use super::{HostUi, Sequencer, SequencerFrame, SequencerOutput, SequencerRegistry};
use eframe::egui::{self, Color32, FontId, Painter, Pos2, Rect, Sense, Ui, Vec2, vec2};

/// Pixels of raw scroll per wheel notch
const SCROLL_PER_NOTCH: f32 = 40.0;

/// Snapshot egui's pointer state for `SequencerRegistry::begin_frame`.
pub fn frame_input(ctx: &egui::Context) -> FrameInput {
    ctx.input(|i| FrameInput {
        pointer_pos: i.pointer.latest_pos(),
        primary_down: i.pointer.primary_down(),
        secondary_down: i.pointer.secondary_down(),
        wheel: i.raw_scroll_delta.y / SCROLL_PER_NOTCH,
    })
}

/// Measures text with egui's font system
pub struct EguiMetrics {
    painter: Painter,
    font: FontId,
}

impl EguiMetrics {
    pub fn new(painter: Painter, font_size: f32) -> Self {
        Self {
            painter,
            font: FontId::proportional(font_size),
        }
    }
}

impl TextMetrics for EguiMetrics {
    fn text_size(&self, text: &str) -> Vec2 {
        self.painter
            .layout_no_wrap(text.to_owned(), self.font.clone(), Color32::WHITE)
            .size()
    }
}

/// Replay `list` on `painter`, honouring clip push / pop.
pub fn paint(painter: &Painter, list: &DrawList, font: &FontId) {
    let mut stack = vec![painter.clone()];
    for cmd in list.cmds() {
        let Some(top) = stack.last() else {
            break;
        };
        match cmd {
            DrawCmd::Rect { rect, rounding, color } => {
                top.rect_filled(*rect, *rounding, *color);
            }
            DrawCmd::Line { from, to, width, color } => {
                top.line_segment([*from, *to], (*width, *color));
            }
            DrawCmd::Circle { center, radius, color } => {
                top.circle_filled(*center, *radius, *color);
            }
            DrawCmd::Polygon { points, color } => {
                top.add(egui::Shape::convex_polygon(points.clone(), *color, (0.0, Color32::TRANSPARENT)));
            }
            DrawCmd::Text { pos, text, color } => {
                top.text(*pos, egui::Align2::LEFT_TOP, text, font.clone(), *color);
            }
            DrawCmd::PushClip(rect) => {
                let clipped = top.with_clip_rect(top.clip_rect().intersect(*rect));
                stack.push(clipped);
            }
            DrawCmd::PopClip => {
                if stack.len() > 1 {
                    stack.pop();
                }
            }
        }
    }
}

/// How far the top of the visible area lies below `origin`, for pinning
/// the header with `SequencerFlags::ALWAYS_SHOW_HEADER`.
pub fn header_scroll(origin: Pos2, clip_rect: Rect) -> Vec2 {
    vec2(0.0, (clip_rect.min.y - origin.y).max(0.0))
}

/// Run one sequencer inside `ui`: lay out rows with `add_rows`, paint the
/// result and reserve its space.
///
/// The caller feeds input with `registry.begin_frame(frame_input(ctx))`
/// once per UI frame, before any sequencer is shown.
pub fn show<R>(
    ui: &mut Ui,
    registry: &mut SequencerRegistry,
    sequencer: Sequencer<'_>,
    frame: &mut u32,
    start: &mut u32,
    end: &mut u32,
    add_rows: impl FnOnce(&mut SequencerFrame<'_>) -> R,
) -> Option<(R, SequencerOutput)> {
    let font_size = registry.style().font_size;
    let metrics = EguiMetrics::new(ui.painter().clone(), font_size);
    let origin = ui.cursor().min;
    let host = HostUi {
        origin,
        available: ui.available_size(),
        scroll: header_scroll(origin, ui.clip_rect()),
        clip_rect: ui.clip_rect(),
        skip_items: !ui.is_visible(),
        metrics: &metrics,
    };

    let mut seq = sequencer.begin(registry, host, frame, start, end)?;
    let result = add_rows(&mut seq);
    let output = seq.end();

    if output.wheel_claimed {
        // Keep an enclosing ScrollArea still
        ui.ctx().input_mut(|i| {
            i.smooth_scroll_delta = Vec2::ZERO;
            i.raw_scroll_delta = Vec2::ZERO;
        });
    }
    ui.allocate_rect(output.rect, Sense::hover());
    paint(ui.painter(), &output.draw, &FontId::proportional(font_size));
    Some((result, output))
}
