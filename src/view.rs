pub mod scope;
pub mod spec;

use signalview::palette::{Palette, Rgb};
use signalview::{Consumer, SampleWindow};
use sdl2::pixels::Color;

pub type RenderResult = Result<(), String>;

/// Everything a view may draw from during one tick.
pub struct Info<'i> {
    pub scope: &'i SampleWindow,
    pub consumer: &'i Consumer,
    pub palette: &'i Palette,
}

pub trait View {
    fn render<'i, 'j: 'i>(&mut self, info: &'j Info<'i>) -> RenderResult;
    /// SDL id of the window this view draws into.
    fn window_id(&self) -> u32;
}

fn normalize_centered(samp: f32, height: u32) -> i32 {
    let hh = height / 2;
    hh as i32 - (hh as f32 * samp) as i32
}

fn rgb(c: Rgb) -> Color {
    Color::RGB(c[0], c[1], c[2])
}
