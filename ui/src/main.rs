use bt_core::{Block, BlockGeometry, BlockList, BlockRef, BlockSequence, SequenceCommand, ToolbarConfig};
use bt_engine::{PopoverKind, ToolbarEngine, TuneActivation, Viewport};
use eframe::{egui, App, Frame};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};
use uuid::Uuid;

const GUTTER: f32 = 72.0;
const CONTENT_PADDING: f32 = 4.0;

pub fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt::init();
    let config = load_config(std::env::args().nth(1).map(PathBuf::from));
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Block Toolbar Demo",
        options,
        Box::new(move |_cc| Box::new(EditorApp::new(config))),
    )
}

fn load_config(path: Option<PathBuf>) -> ToolbarConfig {
    let Some(path) = path else {
        return ToolbarConfig::default();
    };
    match ToolbarConfig::from_path(&path) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "falling back to default toolbar config");
            ToolbarConfig::default()
        }
    }
}

struct EditorApp {
    blocks: Rc<RefCell<BlockList>>,
    engine: ToolbarEngine,
    started: Instant,
    read_only: bool,
    last_hovered: Option<Uuid>,
    content_origin: Option<egui::Pos2>,
    pending_scroll: Option<f32>,
    status: String,
}

impl EditorApp {
    fn new(config: ToolbarConfig) -> Self {
        let blocks = vec![
            Block::paragraph("Hover a block to bring up its toolbar."),
            Block::paragraph("The dotted button opens block tunes: move up, delete and move down."),
            Block::paragraph("The plus button opens the toolbox."),
            Block::paragraph(""),
        ];
        let blocks = Rc::new(RefCell::new(BlockList::from_blocks(blocks).with_auto_layout(false)));
        let read_only = config.read_only;
        let engine = ToolbarEngine::with_defaults(blocks.clone(), config, Viewport::default());
        Self {
            blocks,
            engine,
            started: Instant::now(),
            read_only,
            last_hovered: None,
            content_origin: None,
            pending_scroll: None,
            status: String::new(),
        }
    }

    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn report<E: std::fmt::Display>(&mut self, what: &str, result: Result<(), E>) {
        if let Err(err) = result {
            tracing::warn!(error = %err, "{} failed", what);
            self.status = format!("{}: {}", what, err);
        }
    }

    fn drive_rebuild(&mut self, ctx: &egui::Context) {
        let idle = ctx.input(|i| i.events.is_empty() && !i.pointer.is_moving());
        let rebuilt = if idle {
            self.engine.on_idle()
        } else {
            self.engine.tick(self.now())
        };
        if rebuilt {
            tracing::info!("toolbar restored");
        }
        if self.engine.rebuild_pending() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.checkbox(&mut self.read_only, "Read only").changed() {
                let now = self.now();
                self.engine.set_read_only(self.read_only, now);
                self.last_hovered = None;
            }
            ui.separator();
            let state = self.engine.state();
            ui.label(format!(
                "toolbar: {:?}  offset: {}",
                state.phase,
                state
                    .vertical_offset
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "-".into())
            ));
            if self.engine.rebuild_pending() {
                ui.separator();
                ui.label("rebuild pending");
            }
            if !self.status.is_empty() {
                ui.separator();
                ui.colored_label(egui::Color32::LIGHT_RED, &self.status);
            }
        });
    }

    fn block_column(&mut self, ui: &mut egui::Ui) {
        let snapshot: Vec<(Uuid, String, bool)> = self
            .blocks
            .borrow()
            .blocks()
            .iter()
            .map(|b| (b.id, b.text.to_string(), b.editable))
            .collect();

        let origin = ui.cursor().min;
        self.content_origin = Some(origin);
        for (index, (id, text, editable)) in snapshot.into_iter().enumerate() {
            let mut buffer = text;
            let resp = ui.add_enabled(
                !self.read_only && editable,
                egui::TextEdit::multiline(&mut buffer)
                    .desired_rows(1)
                    .desired_width(f32::INFINITY),
            );
            let geometry = BlockGeometry {
                top: resp.rect.top() - origin.y,
                height: resp.rect.height(),
                content_padding_top: CONTENT_PADDING,
            };
            let measured = self.blocks.borrow_mut().set_geometry(index, geometry);
            self.report("measure", measured);

            if resp.changed() {
                let result = self.blocks.borrow_mut().execute(SequenceCommand::UpdateText {
                    index,
                    text: buffer,
                });
                self.report("edit", result);
            }
            if resp.gained_focus() {
                let result = self.engine.focus_block(index).map(|_| ());
                self.report("focus", result);
            }
            if resp.hovered() && self.last_hovered != Some(id) {
                self.last_hovered = Some(id);
                let result = self.engine.hover(BlockRef { id }).map(|_| ());
                self.report("hover", result);
            }
        }
    }

    fn toolbar_overlay(&mut self, ctx: &egui::Context) {
        let view = self.engine.view();
        let (Some(origin), Some(top)) = (self.content_origin, view.top) else {
            return;
        };
        if !view.state.opened() {
            return;
        }
        let pos = egui::pos2(origin.x - GUTTER, origin.y + top as f32);
        egui::Area::new(egui::Id::new("bt-toolbar"))
            .order(egui::Order::Foreground)
            .fixed_pos(pos)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui.small_button("+").clicked() {
                            let result = self.engine.click_plus_button();
                            self.report("toolbox", result);
                        }
                        if view.state.actions_visible()
                            && view.state.settings_toggler_visible
                            && ui.small_button("⋮").clicked()
                        {
                            let result = self.engine.click_settings_toggler();
                            self.report("settings", result);
                        }
                    });
                    match view.popover {
                        Some(PopoverKind::Settings) => self.settings_popover(ui),
                        Some(PopoverKind::Toolbox) => self.toolbox_popover(ui),
                        None => {}
                    }
                });
            });
    }

    fn settings_popover(&mut self, ui: &mut egui::Ui) {
        let Some(settings) = self.engine.settings_view() else {
            return;
        };
        ui.separator();
        for entry in settings.entries {
            let label = if entry.armed {
                egui::RichText::new(&*entry.title).color(egui::Color32::LIGHT_RED)
            } else {
                egui::RichText::new(&*entry.title)
            };
            if ui.add_enabled(!entry.disabled, egui::Button::new(label)).clicked() {
                match self.engine.activate_tune(&entry.name) {
                    Ok(TuneActivation::Completed(outcome)) => {
                        tracing::debug!(tune = %entry.name, ?outcome, "tune finished");
                        self.pending_scroll = Some(self.engine.viewport().scroll_y);
                        self.last_hovered = None;
                    }
                    Ok(_) => {}
                    Err(err) => self.report::<bt_engine::EngineError>("tune", Err(err)),
                }
            }
        }
    }

    fn toolbox_popover(&mut self, ui: &mut egui::Ui) {
        let Some(tools) = self.engine.toolbox_tools() else {
            return;
        };
        ui.separator();
        for tool in tools {
            if ui.button(&*tool.title).clicked() {
                let result = self.engine.choose_tool(&tool.name).map(|_| ());
                self.report("insert", result);
            }
        }
    }
}

impl App for EditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        self.drive_rebuild(ctx);

        egui::TopBottomPanel::top("controls").show(ctx, |ui| self.top_bar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            let mut area = egui::ScrollArea::vertical().auto_shrink([false, false]);
            if let Some(y) = self.pending_scroll.take() {
                area = area.vertical_scroll_offset(y);
            }
            let output = area.show(ui, |ui| {
                ui.horizontal_top(|ui| {
                    ui.add_space(GUTTER);
                    ui.vertical(|ui| self.block_column(ui));
                });
            });

            let viewport = Viewport {
                width: output.inner_rect.width(),
                height: output.inner_rect.height(),
                scroll_y: output.state.offset.y,
                touch: false,
            };
            if viewport != self.engine.viewport() {
                self.engine.set_viewport(viewport);
            }
        });

        if ctx.input(|i| i.pointer.hover_pos().is_none()) {
            self.last_hovered = None;
        }
        self.toolbar_overlay(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_measurement_is_reported() {
        let mut app = EditorApp::new(ToolbarConfig::default());
        let result = app.blocks.borrow_mut().set_geometry(99, BlockGeometry::default());
        app.report("measure", result);
        assert!(app.status.starts_with("measure:"));
    }
}
