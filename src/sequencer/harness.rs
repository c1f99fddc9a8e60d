//! Drives the sequencer with scripted input and monospace metrics.
//!
//! With `FixedMetrics::default()`, origin (0, 0) and width 800:
//! zoom bar y 0..19, ruler y 19..38, first row y 41..61, label column 32,
//! track starting at x 36.

use super::*;
use crate::track::Keyframes;
use eframe::egui::{Pos2, Vec2, pos2, vec2};

pub(super) struct Harness {
    pub registry: SequencerRegistry,
    pub metrics: FixedMetrics,
    pub frame: u32,
    pub start: u32,
    pub end: u32,
    pub flags: SequencerFlags,
    /// Host scroll handed to the sequencer
    pub scroll: Vec2,
}

impl Harness {
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            registry: SequencerRegistry::new(),
            metrics: FixedMetrics::default(),
            frame: start,
            start,
            end,
            flags: SequencerFlags::empty(),
            scroll: Vec2::ZERO,
        }
    }

    /// One UI frame: feed `input`, lay out rows, close the sequencer.
    pub fn run<R>(&mut self, input: FrameInput, rows: impl FnOnce(&mut SequencerFrame<'_>) -> R) -> (R, SequencerOutput) {
        self.registry.begin_frame(input);
        let mut host = HostUi::new(Pos2::ZERO, vec2(800.0, 600.0), &self.metrics);
        host.scroll = self.scroll;
        let mut seq = Sequencer::new("Sequencer")
            .size(vec2(800.0, 0.0))
            .flags(self.flags)
            .begin(&mut self.registry, host, &mut self.frame, &mut self.start, &mut self.end)
            .expect("host is visible");
        let result = rows(&mut seq);
        (result, seq.end())
    }

    /// Frame with no rows
    pub fn idle(&mut self, input: FrameInput) -> SequencerOutput {
        self.run(input, |_| ()).1
    }

    /// Frame with a single leaf row `label`
    pub fn row<T: Default>(&mut self, input: FrameInput, label: &str, keys: &mut Keyframes<T>, flags: TimelineFlags) -> SequencerOutput {
        self.run(input, |seq| {
            if seq.begin_timeline(label, keys, None, flags) {
                seq.end_timeline();
            }
        })
        .1
    }

    pub fn state(&self) -> &SequencerState {
        self.registry.state("Sequencer").expect("sequencer ran")
    }
}

fn at(x: f32, y: f32) -> FrameInput {
    FrameInput::at(pos2(x, y))
}

fn press(x: f32, y: f32) -> FrameInput {
    at(x, y).with_primary(true)
}

fn right(x: f32, y: f32) -> FrameInput {
    at(x, y).with_secondary(true)
}

mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "must be smaller than end frame")]
    fn test_inverted_range_panics() {
        let mut h = Harness::new(10, 10);
        h.idle(FrameInput::default());
    }

    #[test]
    #[should_panic(expected = "mismatch in timeline begin / end")]
    fn test_unclosed_timeline_panics() {
        let mut h = Harness::new(0, 100);
        let mut keys = Keyframes::<u8>::new();
        h.run(FrameInput::default(), |seq| {
            seq.begin_timeline("A", &mut keys, None, TimelineFlags::empty());
        });
    }

    #[test]
    #[should_panic(expected = "without an open timeline")]
    fn test_extra_end_timeline_panics() {
        let mut h = Harness::new(0, 100);
        h.run(FrameInput::default(), |seq| seq.end_timeline());
    }

    #[test]
    fn test_balanced_nesting() {
        let mut h = Harness::new(0, 100);
        let mut open = true;
        let mut keys = Keyframes::<u8>::new();
        let (depths, _) = h.run(FrameInput::default(), |seq| {
            let mut depths = Vec::new();
            if seq.begin_group("Group", &mut open, true) {
                depths.push(seq.state().timeline_stack.len());
                for label in ["X", "Y", "Z"] {
                    if seq.begin_timeline(label, &mut keys, None, TimelineFlags::empty()) {
                        depths.push(seq.state().timeline_stack.len());
                        seq.end_timeline();
                    }
                }
                seq.end_group();
            }
            depths
        });
        assert_eq!(depths, [1, 2, 2, 2]);
        assert!(h.state().timeline_stack.is_empty());
        // Header 41 + four rows of 20
        assert_eq!(h.state().filled_height, 121.0);
    }

    #[test]
    #[should_panic(expected = "1 timeline(s) still open")]
    fn test_deep_nesting_one_unclosed_panics() {
        let mut h = Harness::new(0, 100);
        let mut keys = Keyframes::<u8>::new();
        h.run(FrameInput::default(), |seq| {
            for label in ["A", "B", "C"] {
                seq.begin_timeline(label, &mut keys, None, TimelineFlags::empty());
            }
            seq.end_timeline();
            seq.end_timeline();
        });
    }

    #[test]
    fn test_deep_nesting_balanced() {
        let mut h = Harness::new(0, 100);
        let mut keys = Keyframes::<u8>::new();
        let (depths, _) = h.run(FrameInput::default(), |seq| {
            let mut depths = Vec::new();
            for label in ["A", "B", "C", "D"] {
                assert!(seq.begin_timeline(label, &mut keys, None, TimelineFlags::empty()));
                depths.push(seq.state().timeline_stack.len());
            }
            for _ in 0..4 {
                seq.end_timeline();
            }
            depths
        });
        assert_eq!(depths, [1, 2, 3, 4]);
        assert!(h.state().timeline_stack.is_empty());
        // Nested rows are distinct even with equal labels
        let (ids, _) = h.run(FrameInput::default(), |seq| {
            let outer = seq.row_id("A");
            seq.begin_timeline("A", &mut keys, None, TimelineFlags::empty());
            let inner = seq.row_id("A");
            seq.end_timeline();
            (outer, inner)
        });
        assert_ne!(ids.0, ids.1);
    }

    #[test]
    fn test_closed_leaf_row_opens_no_scope() {
        let mut h = Harness::new(0, 100);
        let mut keys: Keyframes<u8> = [(10, 0)].into_iter().collect();
        let mut open = false;
        let (opened, out) = h.run(FrameInput::default(), |seq| {
            let opened = seq.begin_timeline("A", &mut keys, Some(&mut open), TimelineFlags::empty());
            (opened, seq.state().timeline_stack.len())
        });
        assert_eq!(opened, (false, 0));
        assert!(!open);
        assert_eq!(h.state().filled_height, 61.0);
        // Keys of a closed row are still drawn
        let circles = out.draw.cmds().iter().filter(|c| matches!(c, DrawCmd::Circle { .. })).count();
        assert_eq!(circles, 1);
    }

    #[test]
    fn test_skipped_host_returns_none() {
        let mut registry = SequencerRegistry::new();
        let metrics = FixedMetrics::default();
        let mut host = HostUi::new(Pos2::ZERO, vec2(800.0, 600.0), &metrics);
        host.skip_items = true;
        let (mut frame, mut start, mut end) = (0, 0, 100);
        let seq = Sequencer::new("Sequencer").begin(&mut registry, host, &mut frame, &mut start, &mut end);
        assert!(seq.is_none());
    }

    #[test]
    fn test_header_layout() {
        let mut h = Harness::new(0, 100);
        h.idle(FrameInput::default());
        let s = h.state();
        assert_eq!(s.top_bar_start_cursor, pos2(0.0, 19.0));
        assert_eq!(s.start_values_cursor, pos2(0.0, 41.0));
        assert_eq!(s.size.x, 800.0);

        let mut h = Harness::new(0, 100);
        h.flags = SequencerFlags::HIDE_ZOOM;
        h.idle(FrameInput::default());
        assert_eq!(h.state().start_values_cursor, pos2(0.0, 22.0));
    }

    #[test]
    fn test_header_follows_host_scroll() {
        let mut keys = Keyframes::<u8>::new();
        let label_clicked = |h: &mut Harness, keys: &mut Keyframes<u8>| {
            h.row(press(10.0, 50.0), "A", keys, TimelineFlags::empty())
                .events
                .iter()
                .any(|e| matches!(e, SequencerEvent::TimelineSelected(_)))
        };

        // Without the flag the header scrolls away with the rows
        let mut h = Harness::new(0, 100);
        h.scroll = vec2(0.0, 100.0);
        h.idle(FrameInput::default());
        assert_eq!(h.state().top_bar_start_cursor, pos2(0.0, 19.0));
        assert!(label_clicked(&mut h, &mut keys));

        let mut h = Harness::new(0, 100);
        h.flags = SequencerFlags::ALWAYS_SHOW_HEADER;
        h.scroll = vec2(0.0, 100.0);
        h.idle(FrameInput::default());
        let s = h.state();
        assert_eq!(s.top_left_cursor, pos2(0.0, 100.0));
        assert_eq!(s.top_bar_start_cursor, pos2(0.0, 119.0));
        // Rows keep their place in the host layout
        assert_eq!(s.start_values_cursor, pos2(0.0, 41.0));

        // A row scrolled under the pinned header takes no clicks
        assert!(!label_clicked(&mut h, &mut keys));
        assert_eq!(h.state().selected_timeline, None);

        // Wheel zoom follows the pinned bar
        h.idle(at(400.0, 110.0).with_wheel(2.0));
        assert!(h.state().zoom > 1.0);
    }

    #[test]
    fn test_wheel_claimed_over_zoom_bar() {
        let mut h = Harness::new(0, 100);
        assert!(h.idle(at(400.0, 10.0).with_wheel(1.0)).wheel_claimed);
        // Hovering the bar keeps the wheel even when it is idle
        assert!(h.idle(at(400.0, 10.0)).wheel_claimed);
        assert!(!h.idle(at(400.0, 100.0).with_wheel(1.0)).wheel_claimed);
        assert!(!h.idle(at(400.0, 30.0).with_wheel(1.0)).wheel_claimed);

        h.flags = SequencerFlags::ALLOW_LENGTH_CHANGING;
        assert!(h.idle(at(20.0, 10.0).with_wheel(0.2)).wheel_claimed);
        assert_eq!(h.start, 0);
    }

    #[test]
    fn test_wheel_zoom_clamps() {
        let mut h = Harness::new(0, 100);
        let out = h.idle(at(400.0, 10.0).with_wheel(10_000.0));
        assert_eq!(h.state().zoom, 100.0);
        assert!(out.events.contains(&SequencerEvent::ZoomChanged(100.0)));

        h.idle(at(400.0, 10.0).with_wheel(-10_000.0));
        assert_eq!(h.state().zoom, 1.0);
        assert_eq!(h.state().offset_frame, 0);

        // Wheel outside the zoom bar does nothing
        h.idle(at(400.0, 100.0).with_wheel(5.0));
        assert_eq!(h.state().zoom, 1.0);
    }

    #[test]
    fn test_slider_pan_clamps() {
        let mut h = Harness::new(0, 100);
        h.idle(FrameInput::default());
        h.registry.get_or_create("Sequencer").zoom = 4.0;

        // Slider body spans x 17..186 at offset 0
        h.idle(press(100.0, 10.0));
        assert!(h.state().holding_zoom_slider);
        h.idle(press(790.0, 10.0));
        assert_eq!(h.state().offset_frame, 75);
        h.idle(press(-50.0, 10.0));
        assert_eq!(h.state().offset_frame, 0);
        h.idle(press(400.0, 10.0));
        assert_eq!(h.state().offset_frame, 37);

        h.idle(at(400.0, 10.0));
        assert!(!h.state().holding_zoom_slider);
        assert!(h.state().offset_frame <= h.state().max_offset());
    }

    #[test]
    fn test_scrub_to_middle() {
        let mut h = Harness::new(0, 100);
        h.idle(FrameInput::default());

        // Grab the marker at frame 0
        h.idle(press(36.0, 25.0));
        assert!(h.state().holding_current_frame);
        assert_eq!(h.frame, 0);

        let out = h.idle(press(416.16, 25.0));
        assert_eq!(h.frame, 50);
        assert!(out.events.contains(&SequencerEvent::CurrentFrameChanged(50)));

        // Past the right edge clamps to the end
        h.idle(press(2000.0, 25.0));
        assert_eq!(h.frame, 100);

        h.idle(at(2000.0, 25.0));
        assert!(!h.state().holding_current_frame);
        h.idle(at(416.16, 25.0));
        assert_eq!(h.frame, 100);
    }

    #[test]
    fn test_ruler_click_jumps() {
        let mut h = Harness::new(0, 100);
        h.idle(FrameInput::default());
        h.idle(press(416.16, 30.0));
        assert_eq!(h.frame, 50);
        assert_eq!(h.state().current_frame, 50);
    }

    #[test]
    fn test_keyframe_step_drag() {
        let mut h = Harness::new(0, 20);
        let mut keys: Keyframes<u8> = [(10, 7)].into_iter().collect();
        let flags = TimelineFlags::ALLOW_FRAME_CHANGING;
        h.row(FrameInput::default(), "A", &mut keys, flags);

        // Key 10 sits at x 420
        h.row(press(420.0, 50.0), "A", &mut keys, flags);
        assert_eq!(h.state().selected_key_index("A"), Some(0));

        // Under half a row height: no move yet
        h.row(press(428.0, 50.0), "A", &mut keys, flags);
        assert_eq!(keys[0].frame, 10);

        let out = h.row(press(432.0, 50.0), "A", &mut keys, flags);
        assert_eq!(keys[0].frame, 11);
        assert_eq!(keys[0].value, 7);
        assert!(out.events.iter().any(|e| matches!(e, SequencerEvent::KeyframeMoved { from: 10, to: 11, .. })));

        // Staying put moves nothing
        h.row(press(432.0, 50.0), "A", &mut keys, flags);
        assert_eq!(keys[0].frame, 11);

        // A large jump still moves a single frame
        h.row(press(470.0, 50.0), "A", &mut keys, flags);
        assert_eq!(keys[0].frame, 12);
        h.row(press(800.0, 50.0), "A", &mut keys, flags);
        assert_eq!(keys[0].frame, 13);

        h.row(at(800.0, 50.0), "A", &mut keys, flags);
        assert!(!h.state().is_holding_any());
    }

    #[test]
    fn test_keyframe_drag_stops_at_end() {
        let mut h = Harness::new(0, 20);
        let mut keys: Keyframes<u8> = [(20, 0)].into_iter().collect();
        let flags = TimelineFlags::ALLOW_FRAME_CHANGING;
        // Key 20 sits at x 804
        h.row(FrameInput::default(), "A", &mut keys, flags);
        h.row(press(800.0, 50.0), "A", &mut keys, flags);
        h.row(press(805.0, 50.0), "A", &mut keys, flags);
        h.row(press(900.0, 50.0), "A", &mut keys, flags);
        assert_eq!(keys[0].frame, 20);
    }

    #[test]
    fn test_keyframe_fixed_without_flag() {
        let mut h = Harness::new(0, 20);
        let mut keys: Keyframes<u8> = [(10, 0)].into_iter().collect();
        let flags = TimelineFlags::empty();
        h.row(FrameInput::default(), "A", &mut keys, flags);
        h.row(press(420.0, 50.0), "A", &mut keys, flags);
        h.row(press(480.0, 50.0), "A", &mut keys, flags);
        h.row(press(560.0, 50.0), "A", &mut keys, flags);
        assert_eq!(keys[0].frame, 10);
        assert_eq!(h.state().selected_key_index("A"), Some(0));
    }

    #[test]
    fn test_deselect_on_reclick() {
        let mut h = Harness::new(0, 100);
        let mut keys = Keyframes::<u8>::new();
        let row = |h: &mut Harness, input, keys: &mut Keyframes<u8>| {
            h.run(input, |seq| {
                let mut flags = None;
                if seq.begin_timeline("A", keys, None, TimelineFlags::empty()) {
                    flags = Some((
                        seq.is_timeline_selected(SelectionFlags::empty()),
                        seq.is_timeline_selected(SelectionFlags::NEWLY_SELECTED),
                    ));
                    seq.end_timeline();
                }
                flags
            })
            .0
        };

        row(&mut h, FrameInput::default(), &mut keys);
        // Label box of "A" is (0, 41)..(23, 61)
        assert_eq!(row(&mut h, press(10.0, 50.0), &mut keys), Some((true, true)));
        assert_eq!(row(&mut h, at(10.0, 50.0), &mut keys), Some((true, false)));
        assert!(h.state().selected_timeline.is_some());

        assert_eq!(row(&mut h, press(10.0, 50.0), &mut keys), Some((false, false)));
        assert_eq!(h.state().selected_timeline, None);
    }

    #[test]
    fn test_set_selected_timeline() {
        let mut h = Harness::new(0, 100);
        let mut keys = Keyframes::<u8>::new();
        let (selected, _) = h.run(FrameInput::default(), |seq| {
            seq.set_selected_timeline(Some("A"));
            let selected = seq.begin_timeline("A", &mut keys, None, TimelineFlags::empty())
                && seq.is_timeline_selected(SelectionFlags::NEWLY_SELECTED);
            seq.end_timeline();
            selected
        });
        assert!(selected);
    }

    #[test]
    fn test_values_width_ratchet() {
        let mut h = Harness::new(0, 100);
        h.metrics = FixedMetrics {
            char_width: 1.0,
            line_height: 13.0,
        };
        let mut keys = Keyframes::<u8>::new();
        let widths = h
            .run(FrameInput::default(), |seq| {
                let mut widths = Vec::new();
                // Label widths 50, 80 then 40
                for len in [34, 64, 24] {
                    let label = "x".repeat(len);
                    if seq.begin_timeline(&label, &mut keys, None, TimelineFlags::empty()) {
                        seq.end_timeline();
                    }
                    widths.push(seq.state().values_width);
                }
                widths
            })
            .0;
        assert_eq!(widths, [50.0, 80.0, 80.0]);
    }

    #[test]
    fn test_create_and_delete_keep_values_aligned() {
        let mut h = Harness::new(0, 20);
        let mut keys: Keyframes<u32> = [(10, 100), (15, 150)].into_iter().collect();
        let flags = TimelineFlags::empty();
        h.row(FrameInput::default(), "A", &mut keys, flags);

        // Right-click empty track over frame 5, then confirm
        h.row(right(238.0, 50.0), "A", &mut keys, flags);
        assert!(h.state().menu.is_some());
        h.row(at(238.0, 50.0), "A", &mut keys, flags);
        let out = h.row(press(250.0, 55.0), "A", &mut keys, flags);
        assert!(out.events.iter().any(|e| matches!(e, SequencerEvent::KeyframeCreated { frame: 5, .. })));
        h.row(at(250.0, 55.0), "A", &mut keys, flags);
        let pairs: Vec<_> = keys.iter().map(|k| (k.frame, k.value)).collect();
        assert_eq!(pairs, [(5, 0), (10, 100), (15, 150)]);

        // Delete the key at frame 10 (x 420)
        h.row(right(420.0, 50.0), "A", &mut keys, flags);
        h.row(at(420.0, 50.0), "A", &mut keys, flags);
        h.row(press(425.0, 55.0), "A", &mut keys, flags);
        let pairs: Vec<_> = keys.iter().map(|k| (k.frame, k.value)).collect();
        assert_eq!(pairs, [(5, 0), (15, 150)]);
        assert!(h.state().menu.is_none());
    }

    #[test]
    fn test_selected_key_follows_create_and_delete() {
        let mut h = Harness::new(0, 20);
        let mut keys: Keyframes<u32> = [(10, 100), (15, 150)].into_iter().collect();
        let flags = TimelineFlags::empty();
        h.row(FrameInput::default(), "A", &mut keys, flags);

        // Select the key at frame 15 (x 612)
        h.row(press(612.0, 50.0), "A", &mut keys, flags);
        h.row(at(612.0, 50.0), "A", &mut keys, flags);
        assert_eq!(h.state().selected_key_index("A"), Some(1));

        // Creating at frame 5 shifts it right
        h.row(right(238.0, 50.0), "A", &mut keys, flags);
        h.row(at(238.0, 50.0), "A", &mut keys, flags);
        h.row(press(250.0, 55.0), "A", &mut keys, flags);
        h.row(at(250.0, 55.0), "A", &mut keys, flags);
        assert_eq!(keys.len(), 3);
        assert_eq!(h.state().selected_key_index("A"), Some(2));
        assert_eq!(keys[2].value, 150);

        // Deleting the key at frame 10 shifts it back
        h.row(right(420.0, 50.0), "A", &mut keys, flags);
        h.row(at(420.0, 50.0), "A", &mut keys, flags);
        h.row(press(425.0, 55.0), "A", &mut keys, flags);
        h.row(at(425.0, 55.0), "A", &mut keys, flags);
        assert_eq!(keys.len(), 2);
        assert_eq!(h.state().selected_key_index("A"), Some(1));
        assert_eq!(keys[1].value, 150);

        // Deleting the selected key clears the selection
        h.row(right(612.0, 50.0), "A", &mut keys, flags);
        h.row(at(612.0, 50.0), "A", &mut keys, flags);
        h.row(press(617.0, 55.0), "A", &mut keys, flags);
        assert_eq!(keys.len(), 1);
        assert_eq!(h.state().selected_key_index("A"), None);
    }

    #[test]
    fn test_group_row_takes_no_keys() {
        let mut h = Harness::new(0, 20);
        let mut open = true;
        let mut group = |h: &mut Harness, input| {
            h.run(input, |seq| {
                if seq.begin_group("Obj", &mut open, false) {
                    seq.end_group();
                }
            })
            .1
        };
        let key_event = |out: &SequencerOutput| {
            out.events.iter().any(|e| {
                matches!(
                    e,
                    SequencerEvent::KeyframeCreated { .. } | SequencerEvent::KeyframeDeleted { .. }
                )
            })
        };

        group(&mut h, FrameInput::default());
        // Right-click on the group's track, where a leaf row would offer a key
        let out = group(&mut h, right(238.0, 50.0));
        assert!(h.state().menu.is_none());
        assert!(!key_event(&out));
        let out = group(&mut h, at(238.0, 50.0));
        assert!(!key_event(&out));
        let out = group(&mut h, press(250.0, 55.0));
        assert!(!key_event(&out));
        assert!(h.state().menu.is_none());
    }

    #[test]
    fn test_menu_dismissed_by_outside_click() {
        let mut h = Harness::new(0, 20);
        let mut keys = Keyframes::<u32>::new();
        let flags = TimelineFlags::empty();
        h.row(right(238.0, 50.0), "A", &mut keys, flags);
        h.row(at(238.0, 50.0), "A", &mut keys, flags);
        h.row(press(600.0, 120.0), "A", &mut keys, flags);
        assert!(h.state().menu.is_none());
        assert!(keys.is_empty());
    }

    #[test]
    fn test_create_outside_range_ignored() {
        let mut h = Harness::new(0, 20);
        let mut keys = Keyframes::<u32>::new();
        // Label column, left of the track
        h.row(right(20.0, 50.0), "A", &mut keys, TimelineFlags::empty());
        assert!(h.state().menu.is_none());
    }

    #[test]
    fn test_group_select_and_collapse() {
        let mut h = Harness::new(0, 100);
        let mut open = true;
        let mut keys = Keyframes::<u8>::new();
        let mut frame = |h: &mut Harness, input, open: &mut bool| {
            h.run(input, |seq| {
                let mut group_selected = false;
                let visible = seq.begin_group("Obj", open, true);
                if visible {
                    if seq.begin_timeline("Position", &mut keys, None, TimelineFlags::empty()) {
                        seq.end_timeline();
                    }
                    group_selected = seq.is_group_selected("Obj");
                    seq.end_group();
                }
                (visible, group_selected)
            })
            .0
        };

        assert_eq!(frame(&mut h, FrameInput::default(), &mut open), (true, false));
        // "Position" row: y 61..81, label box from x 4
        frame(&mut h, press(5.0, 70.0), &mut open);
        assert_eq!(frame(&mut h, at(5.0, 70.0), &mut open), (true, true));
        assert_eq!(h.state().selected_group.as_deref(), Some("Obj"));

        // Arrow box (0, 41)..(13, 54) collapses the group
        assert_eq!(frame(&mut h, press(5.0, 45.0), &mut open), (false, false));
        assert!(!open);
        assert!(h.state().now_group.is_none());
    }

    #[test]
    fn test_length_boxes() {
        let mut h = Harness::new(0, 100);
        h.flags = SequencerFlags::ALLOW_LENGTH_CHANGING;
        h.idle(FrameInput::default());

        // End box spans x 754..796
        let out = h.idle(at(770.0, 10.0).with_wheel(3.0));
        assert_eq!(h.end, 103);
        assert!(out.events.contains(&SequencerEvent::RangeChanged { start: 0, end: 103 }));

        // Start box spans x 4..46; going negative is rejected
        h.idle(at(20.0, 10.0).with_wheel(-5.0));
        assert_eq!(h.start, 0);

        // Dragging the start box right, 4px per frame
        h.idle(press(20.0, 10.0));
        h.idle(press(60.0, 10.0));
        assert_eq!(h.start, 10);
        h.idle(at(60.0, 10.0));
        assert!(h.state().length_drag.is_none());
    }

    #[test]
    fn test_range_ending_at_u32_max() {
        let mut h = Harness::new(0, u32::MAX);
        h.frame = u32::MAX;
        let mut keys: Keyframes<u8> = [(u32::MAX, 0)].into_iter().collect();
        let out = h.row(FrameInput::default(), "A", &mut keys, TimelineFlags::empty());
        let texts: Vec<_> = out
            .draw
            .cmds()
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"0 - 4294967295"));
        assert_eq!(h.state().view_end(), u32::MAX);

        // Scrub past the right edge and zoom all the way in
        h.idle(press(36.0, 25.0));
        h.idle(press(2000.0, 25.0));
        assert_eq!(h.frame, u32::MAX);
        h.idle(at(2000.0, 25.0));

        let mut h = Harness::new(u32::MAX - 100, u32::MAX);
        h.frame = u32::MAX;
        h.idle(FrameInput::default());
        h.idle(at(400.0, 10.0).with_wheel(10_000.0));
        assert_eq!(h.state().zoom, 100.0);
        h.registry.get_or_create("Sequencer").offset_frame = 99;
        h.idle(FrameInput::default());
        assert_eq!(h.state().offset_frame, 99);
        assert_eq!(h.state().view_end(), u32::MAX);
    }

    #[test]
    fn test_draw_output_is_balanced() {
        let mut h = Harness::new(0, 100);
        let mut keys: Keyframes<u8> = [(10, 0), (50, 0)].into_iter().collect();
        let out = h.row(FrameInput::default(), "A", &mut keys, TimelineFlags::empty());
        let pushes = out.draw.cmds().iter().filter(|c| matches!(c, DrawCmd::PushClip(_))).count();
        let pops = out.draw.cmds().iter().filter(|c| matches!(c, DrawCmd::PopClip)).count();
        assert_eq!(pushes, pops);
        let circles = out.draw.cmds().iter().filter(|c| matches!(c, DrawCmd::Circle { .. })).count();
        assert_eq!(circles, 2);
        assert_eq!(out.rect.size(), vec2(800.0, 61.0));
    }
}
