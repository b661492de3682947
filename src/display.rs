use crossterm::{cursor, execute, terminal};
use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

pub const CHIP8_DISPLAY_WIDTH: usize = 64;
pub const CHIP8_DISPLAY_HEIGHT: usize = 32;

/// Display is used by the interpreter to draw things on the screen. It should
/// abstract the implementation details, so a variety of kinds of screen would
/// work. The display owns the pixels; the interpreter only ever toggles them.
pub trait Display {
    /// turn every pixel off
    fn clear(&mut self);

    /// toggle a pixel, returning true if that turned it off (a collision)
    fn set_pixel(&mut self, x: usize, y: usize) -> bool;

    /// present the current frame; called once per frame
    fn paint(&mut self) -> Result<(), io::Error>;

    /// what's currently in the framebuffer
    fn frame(&self) -> &FrameBuffer;
}

/// Row-major 64x32 grid of pixels. Coordinates wrap in both directions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Box<[bool]>,
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            pixels: vec![false; CHIP8_DISPLAY_WIDTH * CHIP8_DISPLAY_HEIGHT].into_boxed_slice(),
        }
    }

    fn offset(x: usize, y: usize) -> usize {
        (x % CHIP8_DISPLAY_WIDTH) + (y % CHIP8_DISPLAY_HEIGHT) * CHIP8_DISPLAY_WIDTH
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[Self::offset(x, y)]
    }

    /// xor the pixel; true if it went from set to unset
    pub fn toggle(&mut self, x: usize, y: usize) -> bool {
        let px = &mut self.pixels[Self::offset(x, y)];
        *px = !*px;
        !*px
    }

    pub fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|px| *px = false);
    }

    pub fn lit_count(&self) -> usize {
        self.pixels.iter().filter(|px| **px).count()
    }

    /// (x, y) of every pixel in the given state
    pub fn pixels_in_state(&self, lit: bool) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pixels
            .iter()
            .enumerate()
            .filter(move |(_, px)| **px == lit)
            .map(|(n, _)| (n % CHIP8_DISPLAY_WIDTH, n / CHIP8_DISPLAY_WIDTH))
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

// store useful metadata about the terminal
struct Resolution(usize, usize);

impl Resolution {
    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// canvas coords for one bitplane; canvas y grows upwards so rows go negative
    fn points(&self, frame: &FrameBuffer, lit: bool) -> Vec<(f64, f64)> {
        frame
            .pixels_in_state(lit)
            .map(|(x, y)| (x as f64, -1.0 * y as f64))
            .collect()
    }
}

/// monochrome display in a terminal, rendered using TUI and Crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
    frame: FrameBuffer,
}

impl MonoTermDisplay {
    pub fn new() -> Result<MonoTermDisplay, io::Error> {
        let mut stdout = io::stdout();
        execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(CHIP8_DISPLAY_WIDTH, CHIP8_DISPLAY_HEIGHT),
            frame: FrameBuffer::new(),
        })
    }
}

impl Drop for MonoTermDisplay {
    fn drop(&mut self) {
        // nothing useful to do with a failure here; the terminal is going away
        let _ = execute!(io::stdout(), cursor::Show, terminal::LeaveAlternateScreen);
    }
}

impl Display for MonoTermDisplay {
    fn clear(&mut self) {
        self.frame.clear();
    }

    fn set_pixel(&mut self, x: usize, y: usize) -> bool {
        self.frame.toggle(x, y)
    }

    fn paint(&mut self) -> Result<(), io::Error> {
        let resolution = &self.resolution;
        let frame = &self.frame;
        let off = resolution.points(frame, false);
        let on = resolution.points(frame, true);

        // for now this assumes a 1:1 ratio between terminal, chip8 and the
        // internal TUI canvas
        self.terminal.draw(|f| {
            let size = Rect::new(0, 0, 2 + resolution.0 as u16, 2 + resolution.1 as u16);

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(resolution.x_bounds())
                .y_bounds(resolution.y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    ctx.draw(&Points {
                        coords: &off,
                        color: Color::Black,
                    });
                    ctx.draw(&Points {
                        coords: &on,
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }

    fn frame(&self) -> &FrameBuffer {
        &self.frame
    }
}

/// useful for testing non-display routines, and for running headless
pub struct DummyDisplay {
    frame: FrameBuffer,
    pub paints: usize,
}

impl DummyDisplay {
    pub fn new() -> Self {
        DummyDisplay {
            frame: FrameBuffer::new(),
            paints: 0,
        }
    }
}

impl Default for DummyDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for DummyDisplay {
    fn clear(&mut self) {
        self.frame.clear();
    }

    fn set_pixel(&mut self, x: usize, y: usize) -> bool {
        self.frame.toggle(x, y)
    }

    fn paint(&mut self) -> Result<(), io::Error> {
        self.paints += 1;
        Ok(())
    }

    fn frame(&self) -> &FrameBuffer {
        &self.frame
    }
}
