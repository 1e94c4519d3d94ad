#[macro_use]
extern crate clap;

mod view;

use std::error::Error;
use std::ops::ControlFlow;
use std::path::PathBuf;
use std::str::FromStr;

use portaudio::stream::{CallbackResult, InputCallbackArgs, InputSettings, Parameters};
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use signalview::palette::Palette;
use signalview::{telemetry, AnalyzerConfig, FrequencyScale, SampleWindow, TickLoop, ViewSettings};
use tracing::{info, warn};
use view::View;

type AppResult<T> = Result<T, Box<dyn Error>>;

fn arg<T: FromStr>(matches: &clap::ArgMatches, name: &str, default: T) -> AppResult<T>
where
    T::Err: Error + 'static,
{
    match matches.value_of(name) {
        Some(v) => v.parse().map_err(|e| format!("bad value {:?} for --{}: {}", v, name, e).into()),
        None => Ok(default),
    }
}

fn main() {
    telemetry::init();
    if let Err(err) = run() {
        eprintln!("signalview: {}", err);
        std::process::exit(1);
    }
}

fn run() -> AppResult<()> {
    let parser_yaml = load_yaml!("args.yml");
    let matches = clap::App::from_yaml(parser_yaml).get_matches();

    let pa = portaudio::PortAudio::new()?;

    if matches.is_present("list-dev") {
        for dev in pa.devices()? {
            match dev {
                Ok((idx, info)) => {
                    if info.max_input_channels < 2 { continue; }
                    println!("{:?}: {} (default {} Hz)", idx, info.name, info.default_sample_rate);
                }
                Err(err) => eprintln!("(error enumerating device: {})", err),
            }
        }
        return Ok(());
    }

    let didx = if let Some(devname) = matches.value_of("aud-dev") {
        pa.devices()?
            .filter_map(Result::ok)
            .find(|(_, info)| info.name == devname)
            .map(|(idx, _)| idx)
            .ok_or_else(|| format!("no input device named {:?}", devname))?
    } else {
        pa.default_input_device()?
    };
    let dev_info = pa.device_info(didx)?;
    let rate: f64 = arg(&matches, "aud-rate", dev_info.default_sample_rate)?;
    let fpb: u32 = arg(&matches, "aud-period", 256)?;

    let mut config = AnalyzerConfig::for_sample_rate(rate as f32);
    config.fft_size = arg(&matches, "fft-size", config.fft_size)?;
    config.copies = arg(&matches, "copies", config.copies)?;
    config.waterfall_lines = arg(&matches, "lines", config.waterfall_lines)?;

    let settings_path = matches.value_of("settings").map(PathBuf::from);
    let mut settings = match &settings_path {
        Some(path) if path.exists() => ViewSettings::load(path)?,
        _ => ViewSettings::for_sample_rate(rate as f32),
    };
    if (settings.sample_rate - rate as f32).abs() > f32::EPSILON {
        // Saved for another device; keep the view but refit the band.
        settings.sample_rate = rate as f32;
        settings.normalize();
    }
    if matches.is_present("log") {
        settings.scale = FrequencyScale::Logarithmic;
        settings.linear_frequency = settings.nyquist();
    }

    let (mut producer, mut consumer) = signalview::build(&config)?;
    consumer.apply_settings(&settings);

    let params = Parameters::<f32>::new(didx, 2, true, 0.0);
    let stream_settings = InputSettings::new(params, rate, fpb);
    info!(?stream_settings, "opening input stream");
    let mut stream = pa.open_non_blocking_stream(stream_settings, move |InputCallbackArgs { buffer, .. }| {
        producer.submit_interleaved(buffer);
        CallbackResult::Continue
    })?;

    let width: u32 = arg(&matches, "width", 800)?;
    let height: u32 = arg(&matches, "height", 300)?;
    let palette = Palette::from_hue(arg(&matches, "hue", 30.0)?);

    let sdl = sdl2::init()?;
    let sdl_video = sdl.video()?;
    let scope_win = sdl_video.window("scope", width, height / 2).position_centered().resizable().build()?;
    let mut scope = view::scope::Scope {
        view: scope_win.into_canvas().build()?,
        zc_search: 1024,
        zc_horiz: 0.5,
    };
    let spec_win = sdl_video.window("spectrum", width, height).position_centered().resizable().build()?;
    let mut spec = view::spec::Spec::new(spec_win.into_canvas().build()?, 0.5);

    let mut eloop = sdl.event_pump()?;
    let mut scope_block = SampleWindow::new(config.fft_size);
    let profile = matches.is_present("profile");
    let ticker = TickLoop::with_rate(arg(&matches, "gfx-rate", 60.0)?);
    let mut failure: Option<String> = None;
    let mut pointer_y = 0i32;

    stream.start()?;
    ticker.run(|_| {
        if profile { hprof::start_frame(); }
        let (spec_width, spec_height) = spec.view.output_size().unwrap_or((width, height));
        consumer.tick(spec_width as usize);
        consumer.copy_scope(&mut scope_block);

        let frame = view::Info { scope: &scope_block, consumer: &consumer, palette: &palette };
        if let Err(err) = scope.render(&frame).and_then(|_| spec.render(&frame)) {
            failure = Some(err);
            return ControlFlow::Break(());
        }
        if profile { hprof::end_frame(); }

        let mut changed = false;
        let plot_height = spec_height as f32 * (1.0 - spec.waterfall_sz);
        for event in eloop.poll_iter() {
            match event {
                Event::Quit { .. } => return ControlFlow::Break(()),
                Event::Window { win_event: WindowEvent::Close, .. } => return ControlFlow::Break(()),
                Event::KeyDown { keycode: Some(Keycode::Escape), .. } => return ControlFlow::Break(()),
                Event::KeyDown { keycode: Some(Keycode::L), window_id, .. } if window_id == spec.window_id() => {
                    settings.toggle_scale();
                    changed = true;
                }
                Event::MouseWheel { y, window_id, .. } if window_id == spec.window_id() => {
                    // Wheel over the waterfall leaves the dB range alone.
                    let y_fraction = pointer_y as f32 / plot_height.max(1.0);
                    changed |= settings.scroll_db(y_fraction, y as f32);
                }
                Event::MouseMotion { mousestate, y, xrel, window_id, .. } if window_id == spec.window_id() => {
                    pointer_y = y;
                    if mousestate.is_mouse_button_pressed(MouseButton::Left) {
                        settings.drag_width(xrel as f32);
                        changed = true;
                    }
                }
                _ => (),
            }
        }
        if changed {
            consumer.apply_settings(&settings);
        }
        ControlFlow::Continue(())
    });

    if let Err(err) = stream.stop() {
        warn!("stopping input stream: {err}");
    }
    if profile {
        hprof::profiler().print_timing();
    }
    if let Some(path) = &settings_path {
        settings.save(path)?;
        info!(?path, "saved view settings");
    }
    match failure {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
