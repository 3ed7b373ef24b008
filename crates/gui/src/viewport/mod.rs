//! Render surface: draws the displayed model with a software rasterizer on
//! top of `egui::Painter`.

pub mod camera;
pub mod mesh;

use egui::{Color32, Pos2, Sense, Ui};
use glam::Vec3;

use crate::state::selection::SourceRef;
use camera::ArcBallCamera;
use mesh::ModelMesh;

/// #007bff
const MODEL_COLOR: [f32; 3] = [0.0, 123.0, 255.0];
const BACKGROUND: Color32 = Color32::from_rgb(240, 240, 240);

pub struct ViewportPanel {
    camera: ArcBallCamera,
    /// Source the camera was last framed for
    framed: Option<SourceRef>,
}

impl Default for ViewportPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self {
            camera: ArcBallCamera::default(),
            framed: None,
        }
    }

    /// Draw `displayed`, or `placeholder` text when there is nothing to show
    pub fn show(&mut self, ui: &mut Ui, displayed: Option<(&SourceRef, &ModelMesh)>, placeholder: &str) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::drag());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, BACKGROUND);

        let Some((source, mesh)) = displayed else {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                placeholder,
                egui::FontId::proportional(16.0),
                Color32::from_gray(102),
            );
            return;
        };

        if self.framed.as_ref() != Some(source) {
            self.camera.frame(mesh.radius);
            self.framed = Some(source.clone());
        }

        if response.dragged() {
            let d = response.drag_delta();
            self.camera.rotate(d.x * 0.5, d.y * 0.5);
        }
        if response.hovered() {
            let scroll = ui.input(|i| i.smooth_scroll_delta.y);
            if scroll != 0.0 {
                self.camera.zoom(scroll * 0.002);
            }
        }

        painter.add(egui::Shape::mesh(self.shade(mesh, rect)));
    }

    /// Lambert-shaded triangles, sorted far to near
    fn shade(&self, mesh: &ModelMesh, rect: egui::Rect) -> egui::Mesh {
        let vp = self.camera.view_projection(rect.width() / rect.height().max(1.0));
        let light = (self.camera.eye_position() - self.camera.target).normalize_or_zero();

        let mut tris: Vec<([Pos2; 3], f32, Color32)> = Vec::with_capacity(mesh.triangle_count());
        for (corners, normal) in mesh.positions.chunks_exact(3).zip(&mesh.normals) {
            let mut screen = [Pos2::ZERO; 3];
            let mut depth = 0.0;
            let mut visible = true;
            for (slot, p) in screen.iter_mut().zip(corners) {
                match self.camera.project(&vp, *p, rect) {
                    Some((pos, z)) => {
                        *slot = pos;
                        depth += z;
                    }
                    None => visible = false,
                }
            }
            if visible {
                tris.push((screen, depth, shade_color(*normal, light)));
            }
        }
        tris.sort_by(|a, b| b.1.total_cmp(&a.1));

        let mut out = egui::Mesh::default();
        for (screen, _, color) in tris {
            let base = out.vertices.len() as u32;
            for pos in screen {
                out.colored_vertex(pos, color);
            }
            out.add_triangle(base, base + 1, base + 2);
        }
        out
    }
}

fn shade_color(normal: Vec3, light: Vec3) -> Color32 {
    // Two-sided: STL winding is not trusted
    let intensity = 0.3 + 0.7 * normal.dot(light).abs();
    let [r, g, b] = MODEL_COLOR.map(|c| (c * intensity).round().clamp(0.0, 255.0) as u8);
    Color32::from_rgb(r, g, b)
}
