use clap::Parser;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};
use cube_album::graphics::{Image, PixelBuffer, Rgb};
use cube_album::{CubeAlbum, CubeConfig, CubeError, FaceId, PointerEvent, PointerHost, PointerKind};
use kurbo::Point;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Interactive 3D photo cube in the terminal
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Auto-rotation around the X-axis, in degrees per second
    #[arg(long, default_value_t = 10.0, allow_negative_numbers = true)]
    speed_x: f64,
    /// Auto-rotation around the Y-axis, in degrees per second
    #[arg(long, default_value_t = 24.0, allow_negative_numbers = true)]
    speed_y: f64,
    /// Degrees of rotation per terminal column dragged
    #[arg(long, default_value_t = 3.0)]
    sensitivity: f64,
    /// Frames per second
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,
    /// Leave one face (0-5) without a texture
    #[arg(long)]
    hide_face: Option<usize>,
    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Cube(#[from] CubeError),
    #[error("face index {0} is out of range 0-5")]
    FaceIndex(usize),
}

const BACKGROUND: Rgb = [16, 16, 24];

/// Face colors
const FACE_COLORS: [Rgb; 6] = [
    [220, 60, 60],  // Red
    [60, 180, 75],  // Green
    [60, 100, 220], // Blue
    [230, 200, 40], // Yellow
    [200, 70, 200], // Magenta
    [40, 200, 210], // Cyan
];

/// Builds a die-like texture: a colored tile with a white border and
/// `index + 1` pips
fn face_texture(index: usize) -> Image {
    const SIZE: usize = 24;
    let pips: &[(usize, usize)] = match index {
        0 => &[(1, 1)],
        1 => &[(0, 0), (2, 2)],
        2 => &[(0, 0), (1, 1), (2, 2)],
        3 => &[(0, 0), (2, 0), (0, 2), (2, 2)],
        4 => &[(0, 0), (2, 0), (1, 1), (0, 2), (2, 2)],
        _ => &[(0, 0), (2, 0), (0, 1), (2, 1), (0, 2), (2, 2)],
    };
    let color = FACE_COLORS[index % FACE_COLORS.len()];
    Image::from_fn(SIZE, SIZE, |x, y| {
        if x < 2 || y < 2 || x >= SIZE - 2 || y >= SIZE - 2 {
            return [240, 240, 240];
        }
        let on_pip = pips.iter().any(|&(px, py)| {
            let (cx, cy) = (6 + px * 6, 6 + py * 6);
            x.abs_diff(cx) <= 2 && y.abs_diff(cy) <= 2
        });
        if on_pip {
            [250, 250, 250]
        } else {
            color
        }
    })
}

/// Restores the terminal when dropped
struct TerminalGuard;

impl TerminalGuard {
    fn enter(out: &mut impl Write) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, EnableMouseCapture, Hide)?;
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let mut out = io::stdout();
        if let Err(e) = execute!(out, Show, DisableMouseCapture, LeaveAlternateScreen) {
            tracing::warn!(error = %e, "failed to restore terminal screen");
        }
        if let Err(e) = terminal::disable_raw_mode() {
            tracing::warn!(error = %e, "failed to leave raw mode");
        }
    }
}

/// Collects repaint requests from the cube
#[derive(Default)]
struct TerminalHost {
    repaint: bool,
    captured: bool,
}

impl PointerHost for TerminalHost {
    fn set_active(&mut self, active: bool) {
        if self.captured != active {
            tracing::debug!(captured = active, "pointer capture changed");
            self.captured = active;
        }
    }

    fn request_paint(&mut self) {
        self.repaint = true;
    }
}

/// Half-block renderer: every terminal cell shows two vertically stacked
/// pixels, so pixels come out roughly square
struct Screen {
    cols: u16,
    rows: u16,
    buffer: PixelBuffer,
}

impl Screen {
    fn new(cols: u16, rows: u16) -> Self {
        let mut screen = Screen {
            cols: 0,
            rows: 0,
            buffer: PixelBuffer::new(0, 0, BACKGROUND),
        };
        screen.resize(cols, rows);
        screen
    }

    /// The last row is kept for the status line
    fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.buffer
            .resize(cols as usize, rows.saturating_sub(1) as usize * 2);
    }

    fn pixel_size(&self) -> (f64, f64) {
        (self.buffer.width() as f64, self.buffer.height() as f64)
    }

    /// Center of the cell in pixel coordinates
    fn cell_to_pixel(column: u16, row: u16) -> Point {
        Point::new(column as f64 + 0.5, row as f64 * 2.0 + 1.0)
    }

    fn present(&self, out: &mut impl Write, status: &str) -> io::Result<()> {
        let mut current: Option<(Rgb, Rgb)> = None;
        for row in 0..self.rows.saturating_sub(1) {
            queue!(out, MoveTo(0, row))?;
            for col in 0..self.cols {
                let x = col as usize;
                let top = self.buffer.get(x, row as usize * 2).unwrap_or(BACKGROUND);
                let bottom = self.buffer.get(x, row as usize * 2 + 1).unwrap_or(BACKGROUND);
                if current != Some((top, bottom)) {
                    queue!(
                        out,
                        SetForegroundColor(rgb(top)),
                        SetBackgroundColor(rgb(bottom))
                    )?;
                    current = Some((top, bottom));
                }
                queue!(out, Print('\u{2580}'))?;
            }
        }
        let status: String = status.chars().take(self.cols as usize).collect();
        queue!(
            out,
            ResetColor,
            MoveTo(0, self.rows.saturating_sub(1)),
            Clear(ClearType::CurrentLine),
            Print(status)
        )?;
        out.flush()
    }
}

fn rgb([r, g, b]: Rgb) -> Color {
    Color::Rgb { r, g, b }
}

fn init_logging(args: &Args) -> Result<(), DemoError> {
    // The terminal is in raw mode, so logs only go to a file
    let Some(path) = &args.log_file else {
        return Ok(());
    };
    let file = File::create(path)?;
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Ok(())
}

fn terminal_size() -> io::Result<(u16, u16)> {
    match termsize::get() {
        Some(size) => Ok((size.cols, size.rows)),
        None => terminal::size(),
    }
}

fn pointer_event(mouse: &MouseEvent, now: Instant) -> Option<PointerEvent> {
    let kind = match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => PointerKind::Down,
        MouseEventKind::Drag(MouseButton::Left) => PointerKind::Move,
        MouseEventKind::Up(MouseButton::Left) => PointerKind::Up,
        _ => return None,
    };
    let position = Screen::cell_to_pixel(mouse.column, mouse.row);
    Some(PointerEvent::new(kind, position, now))
}

/// Application state of the demo
struct App {
    album: CubeAlbum<Image>,
    screen: Screen,
    host: TerminalHost,
    args: Args,
    paused: bool,
    debug: bool,
    message: String,
    frames_since_last_update: usize,
    last_fps_calculation: Instant,
    fps: f64,
}

impl App {
    fn new(args: Args, cols: u16, rows: u16) -> Result<Self, DemoError> {
        let config = CubeConfig {
            auto_speed_x: args.speed_x,
            auto_speed_y: args.speed_y,
            deg_per_px: args.sensitivity,
            // Pixels here are terminal columns, far coarser than screen pixels
            touch_slop: 2.0,
            ..CubeConfig::default()
        };
        let mut album = CubeAlbum::with_faces(config, (0..6).map(face_texture).collect())?;
        if let Some(index) = args.hide_face {
            let face = FaceId::try_from(index).map_err(DemoError::FaceIndex)?;
            album.set_face(face, None);
            tracing::info!(%face, "face left without texture");
        }
        let screen = Screen::new(cols, rows);
        let (width, height) = screen.pixel_size();
        album.resize(width, height);
        album.attach();
        Ok(App {
            album,
            screen,
            host: TerminalHost::default(),
            args,
            paused: false,
            debug: false,
            message: String::from("drag to rotate, click a face, q to quit"),
            frames_since_last_update: 0,
            last_fps_calculation: Instant::now(),
            fps: 0.0,
        })
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                let Some(pointer) = pointer_event(&mouse, Instant::now()) else {
                    return;
                };
                if let Some(face) = self.album.pointer_event(&mut self.host, pointer) {
                    self.message = format!("clicked face {} ({face})", face.index());
                    tracing::info!(%face, "face clicked");
                }
            }
            Event::Resize(cols, rows) => {
                self.screen.resize(cols, rows);
                let (width, height) = self.screen.pixel_size();
                self.album.resize(width, height);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.album.detach(),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                let config = self.album.config().clone();
                self.album
                    .set_rotation(config.initial_rot_x, config.initial_rot_y);
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.paused = !self.paused;
                if self.paused {
                    self.album.set_auto_speed(0.0, 0.0);
                } else {
                    self.album.set_auto_speed(self.args.speed_x, self.args.speed_y);
                }
            }
            KeyCode::Char('d') | KeyCode::Char('D') => self.debug = !self.debug,
            _ => {}
        }
    }

    fn status(&self) -> String {
        let mut status = self.message.clone();
        if self.paused {
            status.push_str("  [paused]");
        }
        if self.debug {
            let state = self.album.state();
            status.push_str(&format!(
                "  | {} {} | X: {:.1} Y: {:.1} | {:?} | FPS: {:.1}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                state.rot_x(),
                state.rot_y(),
                self.album.phase(),
                self.fps
            ));
        }
        status
    }

    fn render(&mut self, out: &mut impl Write, now: Instant) -> io::Result<()> {
        // Update FPS calculation
        self.frames_since_last_update += 1;
        let duration = now.duration_since(self.last_fps_calculation);
        if duration.as_secs_f64() >= 1.0 {
            self.fps = self.frames_since_last_update as f64 / duration.as_secs_f64();
            self.frames_since_last_update = 0;
            self.last_fps_calculation = now;
        }

        self.screen.buffer.clear();
        self.album.frame(now, &mut self.screen.buffer);
        self.host.repaint = false;
        let status = self.status();
        self.screen.present(out, &status)
    }

    fn run(&mut self, out: &mut impl Write) -> Result<(), DemoError> {
        let frame_interval = Duration::from_secs_f64(1.0 / f64::from(self.args.fps));
        let mut next_frame = Instant::now();
        while self.album.has_pending_work() {
            let timeout = next_frame.saturating_duration_since(Instant::now());
            if event::poll(timeout)? {
                self.handle_event(event::read()?);
            }
            let now = Instant::now();
            // Drags repaint immediately instead of waiting for the next tick
            if now < next_frame && !self.host.repaint {
                continue;
            }
            self.render(out, now)?;
            next_frame = now + frame_interval;
        }
        Ok(())
    }
}

fn run(args: Args) -> Result<(), DemoError> {
    init_logging(&args)?;
    let (cols, rows) = terminal_size()?;
    tracing::info!(cols, rows, fps = args.fps, "starting cube album");

    let mut app = App::new(args, cols, rows)?;
    let mut out = io::stdout();
    let _guard = TerminalGuard::enter(&mut out)?;
    app.run(&mut out)
}

/// Main function
fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
