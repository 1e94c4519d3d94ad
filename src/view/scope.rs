use super::{normalize_centered, rgb, Info, RenderResult, View};

use sdl2::pixels::Color;
use sdl2::render::{BlendMode, Canvas};
use sdl2::video::Window;

pub struct Scope {
    pub view: Canvas<Window>,
    /// Samples searched past the trigger mark for a quiet rising crossing.
    pub zc_search: usize,
    /// Trigger mark as a fraction of the width.
    pub zc_horiz: f32,
}

impl Scope {
    /// Offset of the lowest-energy upward crossing after `mark`, so
    /// periodic signals hold still between frames.
    fn trigger(&self, left: &[f32], right: &[f32], mark: usize) -> usize {
        let mut best: Option<(usize, f32)> = None;
        let mut last = f32::NEG_INFINITY;
        for (i, (&l, &r)) in left.iter().zip(right).skip(mark).take(self.zc_search).enumerate() {
            let energy = l.abs() + r.abs();
            let sum = l + r;
            let better = match best {
                None => true,
                Some((_, min)) => energy < min && last <= sum,
            };
            if better {
                best = Some((i, energy));
            }
            last = sum;
        }
        best.map_or(0, |(i, _)| i)
    }
}

impl View for Scope {
    fn render<'i, 'j: 'i>(&mut self, info: &'j Info<'i>) -> RenderResult {
        let _g = hprof::enter("Scope::render");
        self.view.set_draw_color(Color::RGB(0, 0, 0));
        self.view.clear();
        self.view.set_blend_mode(BlendMode::Add);
        let (width, height) = self.view.output_size()?;
        let samples = info.scope;
        if samples.is_empty() {
            self.view.present();
            return Ok(());
        }

        let zc_mark = ((width as f32 * self.zc_horiz) as usize).min(samples.len() - 1);
        let offset = self.trigger(samples.left(), samples.right(), zc_mark);

        let zcx = width as i32 - zc_mark as i32;
        self.view.set_draw_color(rgb(info.palette.left.scope_dim));
        self.view.draw_line((zcx, 0), (zcx, height as i32))?;

        for chan in 0..=1 {
            let (colors, samps) = if chan == 0 {
                (&info.palette.left, samples.left())
            } else {
                (&info.palette.right, samples.right())
            };

            let mut last_samp = 0.0f32;
            for (x, samp) in samps.iter().skip(offset).take(width as usize).cloned().enumerate() {
                if x > 0 {
                    let clipped = !(-1.0..=1.0).contains(&samp);
                    self.view.set_draw_color(if clipped { Color::RGB(255, 255, 255) } else { rgb(colors.scope) });
                    self.view.draw_line(
                        ((x - 1) as i32, normalize_centered(last_samp, height)),
                        (x as i32, normalize_centered(samp, height)),
                    )?;
                }
                last_samp = samp;
            }
        }

        self.view.set_blend_mode(BlendMode::None);
        self.view.present();
        Ok(())
    }

    fn window_id(&self) -> u32 {
        self.view.window().id()
    }
}
