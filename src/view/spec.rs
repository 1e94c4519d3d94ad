use super::{rgb, Info, RenderResult, View};

use signalview::palette::Palette;
use signalview::{FrequencyAxis, WaterfallHistory};
use sdl2::pixels::{Color, PixelFormatEnum};
use sdl2::rect::Rect;
use sdl2::render::{BlendMode, Canvas};
use sdl2::video::Window;

const GRID_MAJOR: Color = Color::RGB(48, 48, 48);
const GRID_MINOR: Color = Color::RGB(24, 24, 24);

pub struct Spec {
    pub view: Canvas<Window>,
    /// Fraction of the height given to the waterfall.
    pub waterfall_sz: f32,
    columns: Vec<usize>,
    pixels: Vec<u8>,
}

impl Spec {
    pub fn new(view: Canvas<Window>, waterfall_sz: f32) -> Spec {
        Spec { view, waterfall_sz, columns: Vec::new(), pixels: Vec::new() }
    }

    /// Height of the curve area, from the top of the window.
    fn plot_height(&self, height: u32) -> u32 {
        (height as f32 * (1.0 - self.waterfall_sz)) as u32
    }

    fn render_grid(&mut self, info: &Info, width: u32, ph: u32) -> RenderResult {
        for line in info.consumer.db_gridlines() {
            let y = ph as i32 - (line.position * ph as f32) as i32;
            self.view.set_draw_color(GRID_MAJOR);
            self.view.draw_line((0, y), (width as i32, y))?;
        }
        for line in info.consumer.frequency_gridlines() {
            let x = (line.position * width as f32) as i32;
            self.view.set_draw_color(if line.major { GRID_MAJOR } else { GRID_MINOR });
            self.view.draw_line((x, 0), (x, ph as i32))?;
        }
        Ok(())
    }

    fn render_curve(&mut self, info: &Info, width: u32, ph: u32) -> RenderResult {
        let consumer = info.consumer;
        let curve = consumer.curve();
        let (db_min, db_max) = consumer.db_limits();
        let range = (db_max - db_min).max(f32::EPSILON);
        let xscale = width as f32 / consumer.view_fraction().max(f32::EPSILON);
        let to_y = |db: f32| ph as i32 - (((db - db_min) / range).clamp(0.0, 1.0) * ph as f32) as i32;

        for chan in 0..=1 {
            let (colors, values) = if chan == 0 {
                (&info.palette.left, curve.left())
            } else {
                (&info.palette.right, curve.right())
            };

            let mut last: Option<(i32, i32)> = None;
            for (&pos, &db) in curve.positions().iter().zip(values) {
                let pt = ((pos * xscale) as i32, to_y(db));
                self.view.set_draw_color(rgb(colors.curve_dim));
                self.view.draw_line(pt, (pt.0, ph as i32))?;
                if let Some(prev) = last {
                    self.view.set_draw_color(rgb(colors.curve));
                    self.view.draw_line(prev, pt)?;
                }
                last = Some(pt);
            }
        }
        Ok(())
    }

    /// Pick the bin shown in each screen column.
    fn map_columns(&mut self, axis: &FrequencyAxis, view_fraction: f32, width: u32) {
        let spacing = axis.bin_spacing();
        let last = axis.npoints().saturating_sub(1);
        self.columns.clear();
        self.columns.extend((0..width).map(|x| {
            let pos = (x as f32 + 0.5) / width as f32 * view_fraction;
            ((axis.frequency_at(pos) / spacing).round() as usize).min(last)
        }));
    }

    fn shade_waterfall(&mut self, wf: &WaterfallHistory, palette: &Palette, width: u32) {
        let nlines = wf.nlines();
        let line = wf.line();
        self.pixels.clear();
        self.pixels.reserve(width as usize * nlines * 3);
        // Active buffer stacked over the trailing one, newest row on top.
        for r in 0..nlines {
            let stacked = nlines - line + r;
            let row = if stacked < nlines { wf.row(false, stacked) } else { wf.row(true, stacked - nlines) };
            for &bin in &self.columns {
                self.pixels.extend_from_slice(&palette.shade(row[bin]));
            }
        }
    }

    fn render_waterfall(&mut self, info: &Info, width: u32, height: u32, ph: u32) -> RenderResult {
        let _g = hprof::enter("Spec::waterfall");
        let Some(wf) = info.consumer.waterfall() else { return Ok(()) };
        if width == 0 || height <= ph {
            return Ok(());
        }
        self.map_columns(info.consumer.axis(), info.consumer.view_fraction(), width);
        self.shade_waterfall(wf, info.palette, width);

        let creator = self.view.texture_creator();
        let mut tex = creator
            .create_texture_static(PixelFormatEnum::RGB24, width, wf.nlines() as u32)
            .map_err(|e| e.to_string())?;
        tex.update(None, &self.pixels, width as usize * 3).map_err(|e| e.to_string())?;
        self.view.copy(&tex, None, Rect::new(0, ph as i32, width, height - ph))
    }
}

impl View for Spec {
    fn render<'i, 'j: 'i>(&mut self, info: &'j Info<'i>) -> RenderResult {
        let _g = hprof::enter("Spec::render");
        self.view.set_draw_color(Color::RGB(0, 0, 0));
        self.view.clear();
        let (width, height) = self.view.output_size()?;
        let ph = self.plot_height(height);

        self.view.set_blend_mode(BlendMode::Add);
        self.render_grid(info, width, ph)?;
        self.render_curve(info, width, ph)?;
        self.view.set_blend_mode(BlendMode::None);
        self.render_waterfall(info, width, height, ph)?;

        self.view.present();
        Ok(())
    }

    fn window_id(&self) -> u32 {
        self.view.window().id()
    }
}
