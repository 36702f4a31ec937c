use egui::epaint::CubicBezierShape;
use egui::{Color32, ColorImage, Pos2, Rect, Sense, Stroke, TextureHandle, TextureOptions, Vec2};

use curve_tracer::render::{DrawCommand, DrawList};
use curve_tracer::types::{CANVAS_HEIGHT, CANVAS_WIDTH};
use curve_tracer::{Editor, Notice, Point};

const BACKGROUND_COLOR: Color32 = Color32::WHITE;
const BORDER_COLOR: Color32 = Color32::GRAY;

#[derive(Debug, Clone, Copy)]
enum Segment {
    Line(Pos2, Pos2),
    Cubic([Pos2; 4]),
}

/// Paint state while replaying a draw list.
struct Pen {
    stroke_color: Color32,
    fill_color: Color32,
    alpha: f32,
    line_width: f32,
    segments: Vec<Segment>,
    current: Option<Pos2>,
}

impl Default for Pen {
    fn default() -> Self {
        Self {
            stroke_color: Color32::BLACK,
            fill_color: Color32::BLACK,
            alpha: 1.0,
            line_width: 1.0,
            segments: Vec::new(),
            current: None,
        }
    }
}

impl Pen {
    fn stroke(&self) -> Stroke {
        Stroke::new(self.line_width, self.stroke_color.gamma_multiply(self.alpha))
    }
}

/// Canvas widget state kept across frames by the host.
#[derive(Default)]
pub struct CanvasView {
    draw_list: DrawList,
    texture: Option<(u64, TextureHandle)>,
    pointer_held: bool,
}

impl CanvasView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forward input to the editor, run one tick and paint the result.
    /// Returns a notice if the editor rejected the input.
    pub fn show(&mut self, ui: &mut egui::Ui, editor: &mut Editor) -> Option<Notice> {
        let size = Vec2::new(CANVAS_WIDTH as f32, CANVAS_HEIGHT as f32);
        let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
        let canvas_rect = response.rect;

        let visible = !ui.ctx().input(|i| i.viewport().minimized.unwrap_or(false));
        editor.visibility_changed(visible);

        let notice = self.handle_input(ui, editor, &response, canvas_rect);

        // paused or halted: the last drawn frame stays on screen
        let mut frame = DrawList::new();
        if editor.tick(&mut frame) {
            self.draw_list = frame;
        }
        self.replay(ui.ctx(), &painter, canvas_rect);
        painter.rect_stroke(canvas_rect, 0.0, Stroke::new(1.0, BORDER_COLOR));
        notice
    }

    fn handle_input(
        &mut self,
        ui: &egui::Ui,
        editor: &mut Editor,
        response: &egui::Response,
        canvas_rect: Rect,
    ) -> Option<Notice> {
        let (latest, pressed, released) = ui.input(|i| {
            (
                i.pointer.latest_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
            )
        });

        if let Some(pos) = latest {
            let local = pos - canvas_rect.min;
            editor.pointer_moved(Point::new(local.x as f64, local.y as f64));
        }

        let mut notice = None;
        if pressed && response.hovered() {
            self.pointer_held = true;
            notice = editor.pointer_down();
        }
        // a release anywhere ends the drag, including outside the canvas
        if released && self.pointer_held {
            self.pointer_held = false;
            editor.pointer_up();
        }
        notice
    }

    fn replay(&mut self, ctx: &egui::Context, painter: &egui::Painter, canvas_rect: Rect) {
        let origin = canvas_rect.min;
        let to_screen = |p: &Point| Pos2::new(origin.x + p.x as f32, origin.y + p.y as f32);
        let to_rect = |r: &curve_tracer::Rect| {
            Rect::from_min_size(
                to_screen(&Point::new(r.x, r.y)),
                Vec2::new(r.width as f32, r.height as f32),
            )
        };

        let mut pen = Pen::default();
        for command in self.draw_list.iter() {
            match command {
                DrawCommand::ClearRect(r) => {
                    painter.rect_filled(to_rect(r), 0.0, BACKGROUND_COLOR);
                }
                DrawCommand::FillRect(r) => {
                    painter.rect_filled(to_rect(r), 0.0, pen.fill_color.gamma_multiply(pen.alpha));
                }
                DrawCommand::StrokeRect(r) => {
                    painter.rect_stroke(to_rect(r), 0.0, pen.stroke());
                }
                DrawCommand::BeginPath => {
                    pen.segments.clear();
                    pen.current = None;
                }
                DrawCommand::MoveTo(p) => pen.current = Some(to_screen(p)),
                DrawCommand::LineTo(p) => {
                    let to = to_screen(p);
                    if let Some(from) = pen.current {
                        pen.segments.push(Segment::Line(from, to));
                    }
                    pen.current = Some(to);
                }
                DrawCommand::BezierCurveTo { c1, c2, end } => {
                    let end = to_screen(end);
                    if let Some(from) = pen.current {
                        pen.segments
                            .push(Segment::Cubic([from, to_screen(c1), to_screen(c2), end]));
                    }
                    pen.current = Some(end);
                }
                DrawCommand::Stroke => {
                    let stroke = pen.stroke();
                    for segment in &pen.segments {
                        match *segment {
                            Segment::Line(a, b) => {
                                painter.line_segment([a, b], stroke);
                            }
                            Segment::Cubic(points) => {
                                painter.add(CubicBezierShape::from_points_stroke(
                                    points,
                                    false,
                                    Color32::TRANSPARENT,
                                    stroke,
                                ));
                            }
                        }
                    }
                }
                DrawCommand::GlobalAlpha(a) => pen.alpha = *a as f32,
                DrawCommand::StrokeColor(c) => pen.stroke_color = parse_color(c),
                DrawCommand::FillColor(c) => pen.fill_color = parse_color(c),
                DrawCommand::LineWidth(w) => pen.line_width = *w as f32,
                DrawCommand::Image { image, dest } => {
                    let texture = match &self.texture {
                        Some((generation, texture)) if *generation == image.generation => {
                            texture.clone()
                        }
                        _ => {
                            let pixels = &image.pixels;
                            let size = [pixels.width() as usize, pixels.height() as usize];
                            let color = ColorImage::from_rgba_unmultiplied(size, pixels.as_raw());
                            let texture =
                                ctx.load_texture("reference", color, TextureOptions::LINEAR);
                            self.texture = Some((image.generation, texture.clone()));
                            texture
                        }
                    };
                    painter.image(
                        texture.id(),
                        to_rect(dest),
                        Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                        Color32::WHITE.gamma_multiply(pen.alpha),
                    );
                }
            }
        }
    }
}

/// Parse `#rgb` / `#rrggbb`; anything else draws black.
fn parse_color(color: &str) -> Color32 {
    let hex = color.trim().trim_start_matches('#');
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    if !hex.is_ascii() {
        return Color32::BLACK;
    }
    let rgb = match hex.len() {
        6 => (channel(&hex[0..2]), channel(&hex[2..4]), channel(&hex[4..6])),
        3 => (
            channel(&hex[0..1]).map(|v| v * 17),
            channel(&hex[1..2]).map(|v| v * 17),
            channel(&hex[2..3]).map(|v| v * 17),
        ),
        _ => (None, None, None),
    };
    match rgb {
        (Some(r), Some(g), Some(b)) => Color32::from_rgb(r, g, b),
        _ => Color32::BLACK,
    }
}
