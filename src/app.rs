use crate::button::{ButtonEvent, PlayButton};
use crate::coloring::recolor_from_text;
use crate::config::{load_settings, save_settings_atomic, Args, Paths, Settings};
use crate::input::{collect_input_nonblocking, map_event, Action, Field};
use crate::model::Grid;
use crate::render::{draw_view, Layout, Terminal, View};
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use std::time::{Duration, Instant};

const FIELD_MAX: usize = 24;

pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Everything the screen shows, minus the terminal itself.
pub(crate) struct Session {
    pub(crate) grid: Grid,
    pub(crate) x_text: String,
    pub(crate) y_text: String,
    pub(crate) focus: Field,
    pub(crate) button: PlayButton,
    pub(crate) status: String,
    layout: Layout,
    rng: StdRng,
    pressed_by_mouse: bool,
    passes: u32,
}

impl Session {
    pub(crate) fn new(rng: StdRng, x: Option<f64>, y: Option<f64>) -> Self {
        let mut button = PlayButton::new();
        button.appear();
        Self {
            grid: Grid::new(),
            x_text: x.map(|v| v.to_string()).unwrap_or_default(),
            y_text: y.map(|v| v.to_string()).unwrap_or_default(),
            focus: Field::X,
            button,
            status: "enter X and Y, then press PLAY".to_string(),
            layout: Layout::new(),
            rng,
            pressed_by_mouse: false,
            passes: 0,
        }
    }

    pub(crate) fn layout(&self) -> &Layout {
        &self.layout
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focus {
            Field::X => &mut self.x_text,
            Field::Y => &mut self.y_text,
        }
    }

    /// Returns true when the user asked to quit.
    pub(crate) fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,
            Action::Type(ch) => {
                let f = self.field_mut();
                if f.chars().count() < FIELD_MAX {
                    f.push(ch);
                }
            }
            Action::Backspace => {
                self.field_mut().pop();
            }
            Action::FocusNext => self.focus = self.focus.other(),
            Action::PressPlay => {
                if self.button.press(true) {
                    self.pressed_by_mouse = false;
                }
            }
            Action::MouseDown { x, y } => {
                if let Some(f) = self.layout.field_at(x, y) {
                    self.focus = f;
                } else if self.layout.button.contains(x, y) && self.button.press(false) {
                    self.pressed_by_mouse = true;
                }
            }
            Action::MouseUp { x, y } => {
                if self.pressed_by_mouse {
                    self.pressed_by_mouse = false;
                    let cancelled = !self.layout.button.contains(x, y);
                    if let Some(ButtonEvent::Clicked) = self.button.release(cancelled) {
                        self.generate();
                    }
                }
            }
        }
        false
    }

    pub(crate) fn tick(&mut self, dt: f32) {
        if let Some(ButtonEvent::Clicked) = self.button.tick(dt) {
            self.generate();
        }
    }

    /// Parse the edit boxes and repaint. Bad input only updates the status line.
    pub(crate) fn generate(&mut self) {
        match recolor_from_text(&mut self.grid, &self.x_text, &self.y_text, &mut self.rng) {
            Ok(params) => {
                self.passes += 1;
                info!("pass {}: painted with x={} y={}", self.passes, params.x(), params.y());
                self.status = format!("pass {}: x={} y={}", self.passes, params.x(), params.y());
            }
            Err(e) => {
                info!("skipping pass: {e}");
                self.status = format!("not painted: {e}");
            }
        }
    }
}

pub(crate) struct App {
    settings: Settings,
    paths: Paths,
    session: Session,
    term: Terminal,
    should_quit: bool,
}

impl App {
    fn init(args: &Args, paths: Paths) -> anyhow::Result<Self> {
        let mut settings = load_settings(&paths.settings_path);
        settings.apply_args(args);

        let session = Session::new(make_rng(settings.seed), args.x, args.y);
        let term = Terminal::begin(settings.enable_mouse)?;

        Ok(Self {
            settings,
            paths,
            session,
            term,
            should_quit: false,
        })
    }

    fn run(&mut self) -> anyhow::Result<()> {
        let looped = self.main_loop();
        // leave the terminal usable even when the loop failed
        self.term.end()?;
        looped?;
        save_settings_atomic(&self.paths.settings_path, &self.settings)
    }

    fn main_loop(&mut self) -> anyhow::Result<()> {
        let frame_dt = Duration::from_secs_f32(1.0 / self.settings.fps() as f32);
        let mut last_frame = Instant::now();

        while !self.should_quit {
            self.term.resize_if_needed()?;

            for ev in collect_input_nonblocking(frame_dt)? {
                if let Some(action) = map_event(&ev) {
                    if self.session.apply(action) {
                        self.should_quit = true;
                        break;
                    }
                }
            }

            let now = Instant::now();
            let dt = now.saturating_duration_since(last_frame);
            last_frame = now;
            self.session.tick(dt.as_secs_f32());

            self.render_frame()?;
            spin_sleep(frame_dt, Instant::now());
        }
        Ok(())
    }

    fn render_frame(&mut self) -> anyhow::Result<()> {
        self.term.cur.clear(crossterm::style::Color::Black);
        let s = &self.session;
        let view = View {
            grid: &s.grid,
            x_text: &s.x_text,
            y_text: &s.y_text,
            focus: s.focus,
            button: &s.button,
            status: &s.status,
            color: self.settings.enable_color,
        };
        draw_view(&mut self.term.cur, s.layout(), &view);
        self.term.present()
    }
}

pub(crate) fn run(args: &Args, paths: Paths) -> anyhow::Result<()> {
    let mut app = App::init(args, paths)?;
    app.run()
}

fn spin_sleep(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
