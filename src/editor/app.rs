use std::fs;
use std::path::PathBuf;

use eframe::egui;

use curve_tracer::reference::encode_data_url;
use curve_tracer::{Editor, ExportFormat, FileStore, SettingUpdate, Tool};

use super::canvas::CanvasView;

const STORE_DIR: &str = ".curve-tracer";

pub struct CurveEditorApp {
    editor: Editor,
    canvas: CanvasView,
    store: FileStore,
    status_message: String,
}

impl Default for CurveEditorApp {
    fn default() -> Self {
        Self {
            editor: Editor::new(),
            canvas: CanvasView::new(),
            store: FileStore::new(STORE_DIR),
            status_message: String::from("Ready - create a group and start adding points"),
        }
    }
}

impl CurveEditorApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, store_dir: Option<PathBuf>) -> Self {
        let mut app = Self::default();
        if let Some(dir) = store_dir {
            app.store = FileStore::new(dir);
        }
        app.load_state();
        app
    }

    fn save_state(&mut self) {
        self.status_message = match self.editor.save(&mut self.store) {
            Ok(()) => format!("Saved to {}", self.store.dir().display()),
            Err(e) => format!("Save failed: {}", e),
        };
    }

    fn load_state(&mut self) {
        self.status_message = match self.editor.load(&self.store) {
            Ok(true) => format!("Loaded {} groups", self.editor.helper.groups().len()),
            Ok(false) => "No saved state".to_string(),
            Err(e) => format!("Load failed: {}", e),
        };
    }

    fn open_reference(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &["png", "jpg", "jpeg"])
            .pick_file()
        {
            match fs::read(&path) {
                Ok(bytes) => {
                    self.editor.helper.reference.set_data(encode_data_url(&bytes));
                    self.status_message = format!("Reference: {}", path.display());
                }
                Err(e) => {
                    self.status_message = format!("Error loading image: {}", e);
                }
            }
        }
    }

    fn export_to_file(&mut self, format: ExportFormat) {
        let (name, ext) = match format {
            ExportFormat::Svg => ("curves.svg", "svg"),
            ExportFormat::Coordinates => ("curves.json", "json"),
            ExportFormat::Polar => ("curves-polar.json", "json"),
        };
        let output = match self.editor.export(format) {
            Ok(output) => output,
            Err(e) => {
                self.status_message = format!("Export failed: {}", e);
                return;
            }
        };
        if let Some(path) = rfd::FileDialog::new()
            .add_filter(ext, &[ext])
            .set_file_name(name)
            .save_file()
        {
            self.status_message = match fs::write(&path, output) {
                Ok(()) => format!("Exported {}", path.display()),
                Err(e) => format!("Error writing file: {}", e),
            };
        }
    }

    fn copy_export(&mut self, ctx: &egui::Context, format: ExportFormat) {
        match self.editor.export(format) {
            Ok(output) => {
                ctx.copy_text(output);
                self.status_message = "Copied to clipboard".to_string();
            }
            Err(e) => self.status_message = format!("Export failed: {}", e),
        }
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Tool:");
            for tool in Tool::ALL {
                if tool == Tool::DeletePoints {
                    continue;
                }
                if ui
                    .selectable_label(self.editor.tool() == tool, tool.label())
                    .clicked()
                {
                    self.editor.set_tool(tool);
                }
            }

            ui.separator();

            if ui.button("Delete Last").on_hover_text("Backspace").clicked() {
                self.editor.helper.delete_last_point();
            }
            if ui.button("Close Path").clicked() {
                self.editor.helper.sync_last_point();
            }

            ui.separator();

            if ui.button("Save").on_hover_text("Ctrl+S").clicked() {
                self.save_state();
            }
            if ui.button("Load").clicked() {
                self.load_state();
            }
        });
    }

    fn render_side_panel(&mut self, ui: &mut egui::Ui) {
        ui.heading("Groups");
        ui.separator();

        if ui.button("New Group").clicked() {
            let id = self.editor.helper.new_group();
            self.editor.helper.set_active_group(&id);
        }

        let ids: Vec<String> = self
            .editor
            .helper
            .groups()
            .iter()
            .map(|g| g.id().to_string())
            .collect();
        let mut to_delete = None;
        egui::ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
            for id in &ids {
                ui.horizontal(|ui| {
                    let is_active = self.editor.helper.active_group_id() == Some(id.as_str());
                    if ui.selectable_label(is_active, id.as_str()).clicked() {
                        self.editor.helper.set_active_group(id);
                    }
                    if ui.small_button("x").clicked() {
                        to_delete = Some(id.clone());
                    }
                });
            }
        });
        if let Some(id) = to_delete {
            self.editor.helper.delete_group(&id);
        }

        ui.separator();
        ui.heading("Reference");
        if ui.button("Open Image").clicked() {
            self.open_reference();
        }
        let reference = &mut self.editor.helper.reference;
        ui.horizontal(|ui| {
            if ui.button("Reset Transform").clicked() {
                reference.reset_transforms();
            }
            if ui.button("Clear").clicked() {
                reference.clear();
            }
        });
        let mut opacity = reference.opacity();
        if ui
            .add(egui::Slider::new(&mut opacity, 0.0..=1.0).text("Opacity"))
            .changed()
        {
            reference.set_opacity(opacity);
        }
        let mut color = reference.color().to_string();
        if ui
            .horizontal(|ui| {
                ui.label("Outline");
                ui.text_edit_singleline(&mut color)
            })
            .inner
            .changed()
        {
            reference.set_color(color);
        }

        ui.separator();
        ui.heading("Display");
        self.render_settings(ui);

        ui.separator();
        ui.heading("Export");
        for (label, format) in [
            ("SVG", ExportFormat::Svg),
            ("JSON", ExportFormat::Coordinates),
            ("Polar JSON", ExportFormat::Polar),
        ] {
            ui.horizontal(|ui| {
                ui.label(label);
                if ui.button("Save...").clicked() {
                    self.export_to_file(format);
                }
                if ui.button("Copy").clicked() {
                    self.copy_export(ui.ctx(), format);
                }
            });
        }
    }

    fn render_settings(&mut self, ui: &mut egui::Ui) {
        let settings = &self.editor.helper.settings;
        let mut updates = Vec::new();

        let mut line_width = settings.line_width;
        if ui
            .add(egui::Slider::new(&mut line_width, 0.5..=10.0).text("Line width"))
            .changed()
        {
            updates.push(SettingUpdate::LineWidth(line_width));
        }
        let mut point_range = settings.point_range();
        if ui
            .add(egui::Slider::new(&mut point_range, 2.0..=64.0).text("Pick range"))
            .changed()
        {
            updates.push(SettingUpdate::PointRange(point_range));
        }
        let mut point_size = settings.point_size();
        if ui
            .add(egui::Slider::new(&mut point_size, 2.0..=32.0).text("Point size"))
            .changed()
        {
            updates.push(SettingUpdate::PointSize(point_size));
        }
        let mut active = settings.active_opacity;
        if ui
            .add(egui::Slider::new(&mut active, 0.0..=1.0).text("Active opacity"))
            .changed()
        {
            updates.push(SettingUpdate::ActiveOpacity(active));
        }
        let mut inactive = settings.inactive_opacity;
        if ui
            .add(egui::Slider::new(&mut inactive, 0.0..=1.0).text("Inactive opacity"))
            .changed()
        {
            updates.push(SettingUpdate::InactiveOpacity(inactive));
        }
        let mut precision = settings.output_precision;
        if ui
            .add(egui::Slider::new(&mut precision, 0..=8).text("Precision"))
            .changed()
        {
            updates.push(SettingUpdate::OutputPrecision(precision));
        }

        let colors: [(&str, String, fn(String) -> SettingUpdate); 3] = [
            ("Main", settings.main_color.clone(), SettingUpdate::MainColor),
            ("Control", settings.control_color.clone(), SettingUpdate::ControlColor),
            ("Origin", settings.origin_color.clone(), SettingUpdate::OriginColor),
        ];
        for (label, mut value, update) in colors {
            ui.horizontal(|ui| {
                ui.label(label);
                if ui.text_edit_singleline(&mut value).changed() {
                    updates.push(update(value.clone()));
                }
            });
        }

        for update in updates {
            self.editor.helper.settings.apply(update);
        }
    }
}

impl eframe::App for CurveEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut do_save = false;
        let mut do_delete_last = false;

        ctx.input(|i| {
            if i.key_pressed(egui::Key::S) && i.modifiers.command {
                do_save = true;
            }
            if i.key_pressed(egui::Key::Backspace) {
                do_delete_last = true;
            }
        });

        if do_save {
            self.save_state();
        }
        if do_delete_last && !ctx.wants_keyboard_input() {
            self.editor.helper.delete_last_point();
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.render_toolbar(ui);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                match self.editor.scheduler.halted() {
                    Some(e) => {
                        ui.colored_label(egui::Color32::RED, format!("Rendering stopped: {}", e));
                    }
                    None => {
                        ui.label(&self.status_message);
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let p = self.editor.session.pointer;
                    ui.label(format!("{:.0}, {:.0}", p.x, p.y));
                });
            });
        });

        egui::SidePanel::left("groups_panel")
            .default_width(220.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.render_side_panel(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(notice) = self.canvas.show(ui, &mut self.editor) {
                self.status_message = notice.to_string();
            }
        });

        // Request continuous repaint; the editor is ticked once per frame
        ctx.request_repaint();
    }
}
