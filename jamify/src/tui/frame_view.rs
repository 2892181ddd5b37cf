// Draws an RGBA frame with upper-half blocks: each cell shows two pixel rows,
// the top one as foreground and the bottom one as background. The image is
// scaled (nearest neighbour) to fit, keeps its aspect ratio, and is centred.

use image::RgbaImage;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;

const HALF_BLOCK: &str = "▀";

pub struct FrameView<'a> {
    image: &'a RgbaImage,
}

impl<'a> FrameView<'a> {
    pub fn new(image: &'a RgbaImage) -> Self {
        Self { image }
    }
}

impl Widget for FrameView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (w, h) = self.image.dimensions();
        if w == 0 || h == 0 || area.is_empty() {
            return;
        }

        let (fit_w, fit_h) = fit(w, h, area.width as u32, area.height as u32 * 2);
        let rows = fit_h.div_ceil(2);
        let x0 = area.x + ((area.width as u32 - fit_w) / 2) as u16;
        let y0 = area.y + ((area.height as u32 - rows) / 2) as u16;

        for row in 0..rows {
            for col in 0..fit_w {
                let top = sample(self.image, col, row * 2, fit_w, fit_h);
                let bottom = if row * 2 + 1 < fit_h {
                    sample(self.image, col, row * 2 + 1, fit_w, fit_h)
                } else {
                    Color::Reset
                };
                if let Some(cell) = buf.cell_mut((x0 + col as u16, y0 + row as u16)) {
                    cell.set_symbol(HALF_BLOCK).set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}

// largest size with the image's aspect ratio inside max_w x max_h
fn fit(w: u32, h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    let scale = f64::min(max_w as f64 / w as f64, max_h as f64 / h as f64);
    let fit_w = ((w as f64 * scale).floor() as u32).clamp(1, max_w.max(1));
    let fit_h = ((h as f64 * scale).floor() as u32).clamp(1, max_h.max(1));
    (fit_w, fit_h)
}

// pixel under (x, y) of the scaled image, composited over black
fn sample(image: &RgbaImage, x: u32, y: u32, fit_w: u32, fit_h: u32) -> Color {
    let (w, h) = image.dimensions();
    let sx = ((x as u64 * w as u64 / fit_w as u64) as u32).min(w - 1);
    let sy = ((y as u64 * h as u64 / fit_h as u64) as u32).min(h - 1);
    let [r, g, b, a] = image.get_pixel(sx, sy).0;
    let over_black = |c: u8| (c as u16 * a as u16 / 255) as u8;
    Color::Rgb(over_black(r), over_black(g), over_black(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn two_tone(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_fn(w, h, |_, y| {
            if y < h / 2 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 255, 255])
            }
        })
    }

    #[test]
    fn fit_keeps_aspect() {
        assert_eq!(fit(100, 50, 40, 40), (40, 20));
        assert_eq!(fit(10, 40, 40, 20), (5, 20));
        assert_eq!(fit(1, 1, 3, 8), (3, 3));
    }

    #[test]
    fn each_cell_holds_two_pixel_rows() {
        let image = two_tone(4, 4);
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        FrameView::new(&image).render(area, &mut buf);

        let top = &buf[(0, 0)];
        assert_eq!(top.symbol(), HALF_BLOCK);
        assert_eq!(top.fg, Color::Rgb(255, 0, 0));
        assert_eq!(top.bg, Color::Rgb(255, 0, 0));
        let bottom = &buf[(3, 1)];
        assert_eq!(bottom.fg, Color::Rgb(0, 0, 255));
    }

    #[test]
    fn transparent_pixels_go_black() {
        let image = RgbaImage::from_pixel(2, 2, Rgba([200, 100, 50, 0]));
        assert_eq!(sample(&image, 0, 0, 2, 2), Color::Rgb(0, 0, 0));
    }

    #[test]
    fn narrow_image_is_centred() {
        let image = two_tone(2, 4);
        let area = Rect::new(0, 0, 6, 2);
        let mut buf = Buffer::empty(area);
        FrameView::new(&image).render(area, &mut buf);
        assert_eq!(buf[(0, 0)].symbol(), " ");
        assert_eq!(buf[(2, 0)].symbol(), HALF_BLOCK);
        assert_eq!(buf[(3, 1)].symbol(), HALF_BLOCK);
        assert_eq!(buf[(4, 0)].symbol(), " ");
    }
}
