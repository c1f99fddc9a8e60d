use neoseq::cli::Args;
use neoseq::document::{AnimClip, SequenceDocument, SequenceObject};
use neoseq::paths::{self, PathConfig};
use neoseq::playback::Playback;
use neoseq::sequencer::egui_backend::{self, frame_input};
use neoseq::sequencer::{
    Sequencer, SequencerEvent, SequencerFlags, SequencerFrame, SequencerRegistry, SequencerStyle, TimelineFlags,
};
use neoseq::track::Keyframes;

use clap::Parser;
use eframe::egui;
use log::{debug, info, warn};
use std::path::PathBuf;

const SEQUENCER_ID: &str = "sequencer";
const DOCUMENT_FILE: &str = "neoseq_document.json";
const STYLE_FILE: &str = "neoseq_style.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackKind {
    Position,
    Rotation,
    Scale,
    Animation,
    Effect,
}

impl TrackKind {
    const ALL: [TrackKind; 5] = [
        TrackKind::Position,
        TrackKind::Rotation,
        TrackKind::Scale,
        TrackKind::Animation,
        TrackKind::Effect,
    ];

    fn name(self) -> &'static str {
        match self {
            TrackKind::Position => "Position",
            TrackKind::Rotation => "Rotation",
            TrackKind::Scale => "Scale",
            TrackKind::Animation => "Animation",
            TrackKind::Effect => "Effect",
        }
    }
}

/// Keyframe shown in the inspector
#[derive(Debug, Clone, Copy, PartialEq)]
struct Inspected {
    object: usize,
    kind: TrackKind,
    key: usize,
}

/// Main application state
#[derive(serde::Deserialize, serde::Serialize)]
#[serde(default)]
struct NeoseqApp {
    document: SequenceDocument,
    playback: Playback,
    registry: SequencerRegistry,
    #[serde(skip)]
    document_path: Option<PathBuf>,
    #[serde(skip)]
    path_config: PathConfig,
    #[serde(skip)]
    inspected: Option<Inspected>,
    #[serde(skip)]
    error_msg: Option<String>,
}

impl Default for NeoseqApp {
    fn default() -> Self {
        Self {
            document: demo_document(),
            playback: Playback::default(),
            registry: SequencerRegistry::new(),
            document_path: None,
            path_config: PathConfig::default(),
            inspected: None,
            error_msg: None,
        }
    }
}

/// Starting scene when nothing was persisted or passed on the command line
fn demo_document() -> SequenceDocument {
    let mut doc = SequenceDocument::default();
    let mut cube = SequenceObject::new("Cube");
    cube.position.insert(0, [0.0, 0.0, 0.0]);
    cube.position.insert(50, [5.0, 0.0, 0.0]);
    cube.scale.insert(25, [2.0, 2.0, 2.0]);
    cube.animation.insert(
        10,
        AnimClip {
            name: "spin".into(),
            looping: true,
        },
    );
    doc.objects.push(cube);
    doc
}

/// One key row. Returns the selected key index when this row owns it.
fn key_row<T: Default>(seq: &mut SequencerFrame<'_>, label: &str, keys: &mut Keyframes<T>) -> Option<usize> {
    if !seq.begin_timeline(label, keys, None, TimelineFlags::ALLOW_FRAME_CHANGING) {
        return None;
    }
    let selected = seq.selected_key_index();
    seq.end_timeline();
    selected
}

/// Lay out one group per object. Returns the key to inspect.
fn layout_rows(seq: &mut SequencerFrame<'_>, document: &mut SequenceDocument) -> Option<Inspected> {
    let mut inspected = None;
    for (index, object) in document.objects.iter_mut().enumerate() {
        if !seq.begin_group(&object.name, &mut object.open, true) {
            continue;
        }
        for kind in TrackKind::ALL {
            // Hidden suffix keeps labels unique across objects
            let label = format!("{}##{}", kind.name(), object.name);
            let selected = match kind {
                TrackKind::Position => key_row(seq, &label, &mut object.position),
                TrackKind::Rotation => key_row(seq, &label, &mut object.rotation),
                TrackKind::Scale => key_row(seq, &label, &mut object.scale),
                TrackKind::Animation => key_row(seq, &label, &mut object.animation),
                TrackKind::Effect => key_row(seq, &label, &mut object.effect),
            };
            if let Some(key) = selected {
                inspected = Some(Inspected {
                    object: index,
                    kind,
                    key,
                });
            }
        }
        seq.end_group();
    }
    inspected
}

/// Frame number and value editor for one key. Returns the key's new index
/// when its frame changed.
fn edit_key<T>(
    ui: &mut egui::Ui,
    keys: &mut Keyframes<T>,
    index: usize,
    range: (u32, u32),
    edit_value: impl FnOnce(&mut egui::Ui, &mut T),
) -> Option<usize> {
    let old_frame = keys.get(index)?.frame;
    let mut frame = old_frame;
    ui.horizontal(|ui| {
        ui.label("Frame");
        ui.add(egui::DragValue::new(&mut frame).range(range.0..=range.1));
    });
    if let Some(value) = keys.get_mut(index) {
        edit_value(ui, value);
    }
    (frame != old_frame).then(|| keys.set_frame(index, frame))
}

fn vec3_editor(ui: &mut egui::Ui, value: &mut [f32; 3]) {
    ui.horizontal(|ui| {
        for (axis, v) in ["X", "Y", "Z"].iter().zip(value.iter_mut()) {
            ui.add(egui::DragValue::new(v).speed(0.1).prefix(format!("{}: ", axis)));
        }
    });
}

fn clip_editor(ui: &mut egui::Ui, clip: &mut AnimClip) {
    ui.horizontal(|ui| {
        ui.label("Clip");
        ui.text_edit_singleline(&mut clip.name);
    });
    ui.checkbox(&mut clip.looping, "Loop");
}

impl NeoseqApp {
    fn document_save_path(&self) -> PathBuf {
        self.document_path
            .clone()
            .unwrap_or_else(|| paths::data_file(DOCUMENT_FILE, &self.path_config))
    }

    fn save_document(&mut self) {
        let path = self.document_save_path();
        match self.document.save(&path) {
            Ok(()) => self.error_msg = None,
            Err(e) => {
                warn!("{:#}", e);
                self.error_msg = Some(format!("{:#}", e));
            }
        }
    }

    fn selected_object(&self) -> Option<String> {
        let group = self.registry.state(SEQUENCER_ID)?.selected_group.clone()?;
        self.document.object(&group).map(|o| o.name.clone())
    }

    fn controls_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let label = if self.playback.playing { "Stop" } else { "Play" };
            if ui.button(label).clicked() {
                self.playback.toggle(self.document.start_frame);
            }
            ui.checkbox(&mut self.playback.looping, "Loop");
            ui.label(format!("Frame {}", self.playback.frame()));
            ui.separator();

            if ui.button("Add object").clicked() {
                self.document.add_object("Object");
            }
            let selected = self.selected_object();
            if ui
                .add_enabled(selected.is_some(), egui::Button::new("Remove object"))
                .clicked()
                && let Some(name) = selected
            {
                self.document.remove_object(&name);
                self.inspected = None;
            }
            ui.separator();

            if ui.button("Save").clicked() {
                self.save_document();
            }
            if let Some(msg) = &self.error_msg {
                ui.colored_label(egui::Color32::from_rgb(220, 80, 80), msg);
            }
        });
    }

    fn inspector_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Inspector");
        let Some(target) = self.inspected else {
            ui.label("Click a keyframe to edit it");
            return;
        };
        let range = (self.document.start_frame, self.document.end_frame);
        let frame = self.playback.frame();
        let Some(object) = self.document.objects.get_mut(target.object) else {
            return;
        };

        ui.label(format!("{} / {}", object.name, target.kind.name()));
        let moved = match target.kind {
            TrackKind::Position => edit_key(ui, &mut object.position, target.key, range, vec3_editor),
            TrackKind::Rotation => edit_key(ui, &mut object.rotation, target.key, range, vec3_editor),
            TrackKind::Scale => edit_key(ui, &mut object.scale, target.key, range, vec3_editor),
            TrackKind::Animation => edit_key(ui, &mut object.animation, target.key, range, clip_editor),
            TrackKind::Effect => edit_key(ui, &mut object.effect, target.key, range, clip_editor),
        };

        ui.separator();
        ui.label(format!("At frame {}", frame));
        let pose = object.pose_at(frame);
        ui.monospace(format!("pos   {:?}", pose.position));
        ui.monospace(format!("rot   {:?}", pose.rotation));
        ui.monospace(format!("scale {:?}", pose.scale));
        for (title, active) in [("anim", object.animation_at(frame)), ("fx", object.effect_at(frame))] {
            match active {
                Some(active) => ui.monospace(format!("{:5} {} +{}", title, active.clip.name, active.elapsed)),
                None => ui.monospace(format!("{:5} -", title)),
            };
        }

        // Keep the sequencer's selection on the key that moved
        if let Some(new_index) = moved {
            if let Some(selected) = self.registry.get_or_create(SEQUENCER_ID).selected_key.as_mut() {
                selected.index = new_index;
            }
            self.inspected = Some(Inspected {
                key: new_index,
                ..target
            });
        }
    }

    fn sequencer_ui(&mut self, ui: &mut egui::Ui) {
        let mut frame = self.playback.frame();
        let mut start = self.document.start_frame;
        let mut end = self.document.end_frame;
        let document = &mut self.document;

        let shown = egui_backend::show(
            ui,
            &mut self.registry,
            Sequencer::new(SEQUENCER_ID).flags(SequencerFlags::ALLOW_LENGTH_CHANGING | SequencerFlags::ALWAYS_SHOW_HEADER),
            &mut frame,
            &mut start,
            &mut end,
            |seq| layout_rows(seq, document),
        );

        self.document.start_frame = start;
        self.document.end_frame = end;
        let Some((inspected, output)) = shown else {
            return;
        };
        self.inspected = inspected;
        for event in &output.events {
            if let SequencerEvent::CurrentFrameChanged(f) = event {
                self.playback.seek(*f);
            }
        }
    }
}

impl eframe::App for NeoseqApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.registry.begin_frame(frame_input(ctx));

        let (dt, space, save) = ctx.input(|i| {
            (
                i.stable_dt,
                i.key_pressed(egui::Key::Space),
                i.modifiers.command && i.key_pressed(egui::Key::S),
            )
        });
        if space && !ctx.wants_keyboard_input() {
            self.playback.toggle(self.document.start_frame);
        }
        if save {
            self.save_document();
        }
        if let Some(frame) = self.playback.advance(dt, self.document.start_frame, self.document.end_frame) {
            log::trace!("Playback frame {}", frame);
        }
        if self.playback.playing {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| self.controls_ui(ui));
        egui::SidePanel::right("inspector")
            .default_width(260.0)
            .show(ctx, |ui| self.inspector_ui(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| self.sequencer_ui(ui));
        });
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        if let Ok(json) = serde_json::to_string(self) {
            storage.set_string(eframe::APP_KEY, json);
            debug!(
                "App state saved: {} objects, frame {}",
                self.document.objects.len(),
                self.playback.frame()
            );
        }
    }
}

fn load_style(args: &Args, path_config: &PathConfig) -> Option<SequencerStyle> {
    let path = match &args.style {
        Some(path) => path.clone(),
        None => {
            let local = paths::config_file(STYLE_FILE, path_config);
            if !local.exists() {
                return None;
            }
            local
        }
    };
    match SequencerStyle::load(&path) {
        Ok(style) => {
            info!("Loaded style {}", path.display());
            Some(style)
        }
        Err(e) => {
            warn!("{:#}", e);
            None
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace
    let default_level = match args.verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .filter_module("egui", log::LevelFilter::Info)
        .filter_module("eframe", log::LevelFilter::Info)
        .format_timestamp_millis()
        .init();

    info!("neoseq {} starting", env!("CARGO_PKG_VERSION"));
    debug!("Command-line args: {:?}", args);

    let path_config = PathConfig::from_env_and_cli(args.config_dir.clone());
    if let Err(e) = paths::ensure_dirs(&path_config) {
        warn!("Failed to create application directories: {:#}", e);
    }
    info!("Config path: {}", paths::config_file("neoseq.json", &path_config).display());

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("neoseq v{}", env!("CARGO_PKG_VERSION")))
            .with_inner_size([1100.0, 520.0])
            .with_resizable(true),
        persist_window: true,
        persistence_path: Some(paths::config_file("neoseq.json", &path_config)),
        ..Default::default()
    };

    eframe::run_native(
        "neoseq",
        native_options,
        Box::new(move |cc| {
            let mut app: NeoseqApp = cc
                .storage
                .and_then(|storage| storage.get_string(eframe::APP_KEY))
                .and_then(|json| serde_json::from_str(&json).ok())
                .unwrap_or_else(|| {
                    info!("No persisted state found, creating default app");
                    NeoseqApp::default()
                });
            app.path_config = path_config.clone();

            if let Some(style) = load_style(&args, &path_config) {
                app.registry.set_style(style);
            }

            // CLI document has priority over the persisted one
            if let Some(path) = &args.document {
                if path.exists() {
                    match SequenceDocument::load(path) {
                        Ok(doc) => app.document = doc,
                        Err(e) => {
                            warn!("{:#}", e);
                            app.error_msg = Some(format!("{:#}", e));
                        }
                    }
                } else {
                    info!("{} does not exist yet, starting a new document", path.display());
                    app.document = SequenceDocument::default();
                }
                app.document_path = Some(path.clone());
            }

            match args.end_frame {
                Some(end) if end > app.document.start_frame => app.document.end_frame = end,
                Some(end) => warn!("Ignoring --end {}: must be after frame {}", end, app.document.start_frame),
                None => {}
            }
            if app.document.start_frame >= app.document.end_frame {
                warn!("Persisted frame range is empty, resetting");
                app.document.start_frame = 0;
                app.document.end_frame = neoseq::document::DEFAULT_END_FRAME;
            }

            Ok(Box::new(app))
        }),
    )?;

    info!("Application exiting");
    Ok(())
}
