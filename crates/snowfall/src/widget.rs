//! Terminal rendering of the particle canvas.

use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};
use snowfall_core::Rgba;
use snowfall_engine::Canvas;

/// Upper half block: foreground paints the top pixel, background the bottom.
const UPPER_HALF: char = '▀';
/// Lower half block, for cells where only the bottom pixel is set.
const LOWER_HALF: char = '▄';

/// Draws a [`Canvas`] with two vertical pixels per terminal cell.
///
/// Cells whose pixels are both transparent are left untouched.
#[derive(Debug, Clone, Copy)]
pub struct CanvasWidget<'a> {
    canvas: &'a Canvas,
}

impl<'a> CanvasWidget<'a> {
    pub fn new(canvas: &'a Canvas) -> Self {
        Self { canvas }
    }

    fn pixel(&self, x: u16, y: u32) -> Option<Rgba> {
        self.canvas
            .pixel(u32::from(x), y)
            .filter(|p| !p.is_transparent())
    }
}

impl Widget for CanvasWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let top = self.pixel(col, u32::from(row) * 2);
                let bottom = self.pixel(col, u32::from(row) * 2 + 1);
                let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) else {
                    continue;
                };

                match (top, bottom) {
                    (None, None) => {}
                    (Some(top), None) => {
                        cell.set_char(UPPER_HALF).set_fg(terminal_color(top));
                    }
                    (None, Some(bottom)) => {
                        cell.set_char(LOWER_HALF).set_fg(terminal_color(bottom));
                    }
                    (Some(top), Some(bottom)) => {
                        cell.set_char(UPPER_HALF)
                            .set_fg(terminal_color(top))
                            .set_bg(terminal_color(bottom));
                    }
                }
            }
        }
    }
}

/// Terminals have no alpha channel, so translucent pixels are darkened
/// towards black instead.
fn terminal_color(pixel: Rgba) -> Color {
    let scale = |c: u8| ((u16::from(c) * u16::from(pixel.a) + 127) / 255) as u8;
    Color::Rgb(scale(pixel.r), scale(pixel.g), scale(pixel.b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use snowfall_core::{ImageBuffer, SurfaceSize};
    use snowfall_engine::Surface;

    fn dot() -> ImageBuffer {
        ImageBuffer::from_mask(&["#"], Rgba::WHITE).unwrap()
    }

    #[test]
    fn test_render_half_blocks() {
        let mut canvas = Canvas::new(SurfaceSize::new(3, 4));
        canvas.draw_image(&dot(), 0.0, 0.0, 1, 255);
        canvas.draw_image(&dot(), 1.0, 1.0, 1, 255);
        canvas.draw_image(&dot(), 2.0, 2.0, 1, 255);
        canvas.draw_image(&dot(), 2.0, 3.0, 1, 255);

        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);
        CanvasWidget::new(&canvas).render(area, &mut buf);

        assert_eq!(buf[(0, 0)].symbol(), "▀");
        assert_eq!(buf[(0, 0)].fg, Color::Rgb(255, 255, 255));
        assert_eq!(buf[(1, 0)].symbol(), "▄");
        assert_eq!(buf[(2, 0)].symbol(), " ");
        assert_eq!(buf[(2, 1)].symbol(), "▀");
        assert_eq!(buf[(2, 1)].bg, Color::Rgb(255, 255, 255));
        assert_eq!(buf[(0, 1)].symbol(), " ");
    }

    #[test]
    fn test_render_clips_to_area() {
        let mut canvas = Canvas::new(SurfaceSize::new(8, 8));
        canvas.draw_image(&dot(), 0.0, 0.0, 8, 255);

        let area = Rect::new(1, 1, 2, 1);
        let mut buf = Buffer::empty(Rect::new(0, 0, 4, 3));
        CanvasWidget::new(&canvas).render(area, &mut buf);

        assert_eq!(buf[(1, 1)].symbol(), "▀");
        assert_eq!(buf[(0, 0)].symbol(), " ");
        assert_eq!(buf[(3, 1)].symbol(), " ");
    }

    #[test]
    fn test_translucent_pixels_are_darkened() {
        assert_eq!(
            terminal_color(Rgba::new(255, 255, 255, 128)),
            Color::Rgb(128, 128, 128)
        );
        assert_eq!(terminal_color(Rgba::WHITE), Color::Rgb(255, 255, 255));
    }
}
