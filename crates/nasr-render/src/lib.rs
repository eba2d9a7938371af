//! Nasringine rendering
//!
//! A wgpu surface plus a canvas that draws colored rectangles in pixel
//! coordinates.

mod canvas;
mod context;

pub use canvas::{to_linear, Canvas, CanvasUniforms, RectBatch, RectInstance};
pub use context::{RenderContext, RenderError};

#[cfg(test)]
mod tests {
    #[test]
    fn test_rect_shader_parses() {
        let source = include_str!("rect_shader.wgsl");
        let module = naga::front::wgsl::parse_str(source).expect("rect shader should parse");
        let entry_points: Vec<&str> = module
            .entry_points
            .iter()
            .map(|ep| ep.name.as_str())
            .collect();
        assert!(entry_points.contains(&"vs_rect"));
        assert!(entry_points.contains(&"fs_rect"));
    }
}
