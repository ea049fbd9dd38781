use crate::input::{MouseDispatcher, MouseListener, RawMouseEvent};
use anyhow::anyhow;
use line_2d::Coord;
pub use rgb_int::Rgb24;
use sdl2::{
    event::{Event, WindowEvent},
    gfx::primitives::DrawRenderer,
    pixels::Color,
    rect::Rect,
    render::Canvas,
    video::Window as Sdl2Window,
    EventPump,
};
use sounder_persist::{PersistData, WindowPosition};
use std::{
    collections::VecDeque,
    thread,
    time::{Duration, Instant},
};

const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / 60);

// The sdl2 gfx font is 8x8 pixels.
const LINE_HEIGHT_PX: i32 = 12;
const TEXT_MARGIN_PX: i32 = 8;

pub struct WindowBuilder {
    title: Option<String>,
    width_px: Option<u32>,
    height_px: Option<u32>,
    trail_length: Option<usize>,
    info_line_count: Option<usize>,
    foreground: Option<Rgb24>,
    background: Option<Rgb24>,
}

impl WindowBuilder {
    pub fn new() -> Self {
        Self {
            title: None,
            width_px: None,
            height_px: None,
            trail_length: None,
            info_line_count: None,
            foreground: None,
            background: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn width_px(mut self, width_px: u32) -> Self {
        self.width_px = Some(width_px);
        self
    }

    pub fn height_px(mut self, height_px: u32) -> Self {
        self.height_px = Some(height_px);
        self
    }

    /// Number of recent mouse positions joined by a fading line.
    pub fn trail_length(mut self, trail_length: usize) -> Self {
        self.trail_length = Some(trail_length);
        self
    }

    /// Maximum number of info lines drawn at the bottom of the window.
    pub fn info_line_count(mut self, info_line_count: usize) -> Self {
        self.info_line_count = Some(info_line_count);
        self
    }

    pub fn foreground(mut self, foreground: Rgb24) -> Self {
        self.foreground = Some(foreground);
        self
    }

    pub fn background(mut self, background: Rgb24) -> Self {
        self.background = Some(background);
        self
    }

    pub fn build(self) -> Window {
        Window {
            title: self.title.unwrap_or_else(|| "Sounder".to_string()),
            width_px: self.width_px.unwrap_or(640),
            height_px: self.height_px.unwrap_or(480),
            trail_length: self.trail_length.unwrap_or(64),
            info_line_count: self.info_line_count.unwrap_or(16),
            foreground: self.foreground.unwrap_or_else(|| Rgb24::new_grey(255)),
            background: self.background.unwrap_or_else(|| Rgb24::new_grey(0)),
        }
    }
}

impl Default for WindowBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug)]
pub struct Window {
    title: String,
    width_px: u32,
    height_px: u32,
    trail_length: usize,
    info_line_count: usize,
    foreground: Rgb24,
    background: Rgb24,
}

fn color(rgb24: Rgb24) -> Color {
    Color::RGB(rgb24.r, rgb24.g, rgb24.b)
}

/// Recent mouse positions, newest last.
struct Trail {
    coords: VecDeque<Coord>,
    capacity: usize,
}

impl Trail {
    fn new(capacity: usize) -> Self {
        Self {
            coords: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn push(&mut self, coord: Coord) {
        if self.capacity == 0 {
            return;
        }
        if self.coords.len() == self.capacity {
            self.coords.pop_front();
        }
        self.coords.push_back(coord);
    }
}

struct WindowRunning {
    window: Window,
    canvas: Canvas<Sdl2Window>,
    event_pump: EventPump,
    dispatcher: MouseDispatcher,
    trail: Trail,
    last_render: Instant,
}

impl WindowRunning {
    /// Returns `false` once the window has been closed.
    fn handle_events<L: MouseListener>(&mut self, listener: &mut L) -> bool {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. } => return false,
                Event::Window {
                    win_event: WindowEvent::Moved(x, y),
                    ..
                } => (WindowPosition { x, y }).save_(&self.window.title),
                _ => (),
            }
            if let Some(raw) = RawMouseEvent::from_sdl(&event) {
                self.dispatcher.dispatch(raw, listener);
                if let RawMouseEvent::Motion { x, y, .. } = raw {
                    self.trail.push(Coord { x, y });
                }
            }
        }
        true
    }

    fn render_trail(&mut self) {
        let foreground = self.window.foreground;
        let num_segments = self.trail.coords.len().saturating_sub(1);
        for (i, (&start, &end)) in self
            .trail
            .coords
            .iter()
            .zip(self.trail.coords.iter().skip(1))
            .enumerate()
        {
            let alpha = (255 * (i + 1) / num_segments.max(1)) as u8;
            self.canvas.set_draw_color(Color::RGBA(
                foreground.r,
                foreground.g,
                foreground.b,
                alpha,
            ));
            for Coord { x, y } in line_2d::coords_between(start, end) {
                let _ = self.canvas.fill_rect(Rect::new(x, y, 2, 2));
            }
        }
    }

    fn render_crosshair(&mut self) -> anyhow::Result<()> {
        let (x, y) = self.dispatcher.position();
        self.canvas.set_draw_color(self.window.crosshair_color());
        self.canvas
            .fill_rect(Rect::new(0, y, self.window.width_px, 1))
            .map_err(|e| anyhow!("{e}"))?;
        self.canvas
            .fill_rect(Rect::new(x, 0, 1, self.window.height_px))
            .map_err(|e| anyhow!("{e}"))?;
        Ok(())
    }

    fn render_info<L: MouseListener>(&mut self, listener: &L) -> anyhow::Result<()> {
        let lines = listener.info_lines().collect::<Vec<_>>();
        let visible = &lines[lines.len().saturating_sub(self.window.info_line_count)..];
        let bottom = self.window.height_px as i32 - TEXT_MARGIN_PX;
        let top = bottom - (visible.len() as i32 * LINE_HEIGHT_PX);
        let foreground = color(self.window.foreground);
        for (i, line) in visible.iter().enumerate() {
            let y = top + (i as i32 * LINE_HEIGHT_PX);
            self.canvas
                .string(TEXT_MARGIN_PX as i16, y as i16, line, foreground)
                .map_err(|e| anyhow!(e))?;
        }
        Ok(())
    }

    fn render<L: MouseListener>(&mut self, listener: &L) -> anyhow::Result<()> {
        self.canvas.set_draw_color(color(self.window.background));
        self.canvas.clear();
        self.render_crosshair()?;
        self.render_trail();
        self.render_info(listener)?;
        self.canvas.present();
        Ok(())
    }

    fn wait_until_next_frame(&self) {
        if let Some(period_to_sleep) = (self.last_render + FRAME_DURATION)
            .checked_duration_since(Instant::now())
        {
            thread::sleep(period_to_sleep);
        }
    }
}

impl Window {
    pub fn builder() -> WindowBuilder {
        WindowBuilder::new()
    }

    /// The foreground color at half opacity, so the trail and text stand out against it.
    fn crosshair_color(&self) -> Color {
        let Rgb24 { r, g, b } = self.foreground;
        Color::RGBA(r, g, b, 128)
    }

    fn start(&self) -> anyhow::Result<WindowRunning> {
        let sdl_context = sdl2::init().map_err(|e| anyhow!(e))?;
        let video_subsystem = sdl_context.video().map_err(|e| anyhow!(e))?;
        let mut window_builder = video_subsystem.window(
            self.title.as_str(),
            self.width_px,
            self.height_px,
        );
        if let Some(WindowPosition { x, y }) = WindowPosition::load_(&self.title)
        {
            window_builder.position(x, y);
        } else {
            window_builder.position_centered();
        }
        let window = window_builder.build()?;
        let mut canvas = window
            .into_canvas()
            .target_texture()
            .present_vsync()
            .build()?;
        canvas.set_blend_mode(sdl2::render::BlendMode::Blend);
        let event_pump = sdl_context.event_pump().map_err(|e| anyhow!(e))?;
        log::info!(
            "opened window \"{}\" ({}x{})",
            self.title,
            self.width_px,
            self.height_px
        );
        Ok(WindowRunning {
            window: self.clone(),
            canvas,
            event_pump,
            dispatcher: MouseDispatcher::default(),
            trail: Trail::new(self.trail_length),
            last_render: Instant::now(),
        })
    }

    /// Open the window and deliver its mouse events to `listener` until the window is closed.
    /// Events are handled and the window is redrawn on the calling thread, which SDL requires
    /// to be the main thread on some platforms.
    pub fn run<L: MouseListener>(&self, listener: &mut L) -> anyhow::Result<()> {
        let mut window_running = self.start()?;
        while window_running.handle_events(listener) {
            window_running.render(listener)?;
            window_running.wait_until_next_frame();
            window_running.last_render = Instant::now();
        }
        log::info!("window \"{}\" closed", self.title);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builder_defaults() {
        let window = Window::builder().build();
        assert_eq!(window.title, "Sounder");
        assert_eq!((window.width_px, window.height_px), (640, 480));
    }

    #[test]
    fn trail_keeps_most_recent_positions() {
        let mut trail = Trail::new(2);
        trail.push(Coord { x: 0, y: 0 });
        trail.push(Coord { x: 1, y: 1 });
        trail.push(Coord { x: 2, y: 2 });
        assert_eq!(
            trail.coords.iter().copied().collect::<Vec<_>>(),
            vec![Coord { x: 1, y: 1 }, Coord { x: 2, y: 2 }]
        );
    }

    #[test]
    fn empty_trail_ignores_positions() {
        let mut trail = Trail::new(0);
        trail.push(Coord { x: 5, y: 5 });
        assert!(trail.coords.is_empty());
    }

    #[test]
    fn crosshair_follows_foreground() {
        let window = Window::builder()
            .foreground(Rgb24::new(255, 0, 64))
            .build();
        assert_eq!(window.crosshair_color(), Color::RGBA(255, 0, 64, 128));
    }
}
