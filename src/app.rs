use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use image::imageops::FilterType;
use image::RgbImage;
use serde::Serialize;
use tracing::{info, warn};

use crate::celebration::Celebration;
use crate::config::GameConfig;
use crate::game::Game;
use crate::image_source::{
    ImageLoadError, ImageLoader, ImageSource, LoadedImage, SourceImageLoader,
};
use crate::runtime::DrillEvent;
use crate::session::{Phase, RoundOutcome};
use crate::stats::GameStats;
use crate::viewport::Viewport;

/// Ticks a missed attempt stays on the canvas (~500ms at the default tick rate)
pub const MISS_FLASH_TICKS: u8 = 5;

/// A missed attempt still being shown on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissFlash {
    pub x: f64,
    pub y: f64,
    pub ticks_left: u8,
}

/// Image pixels resampled for one viewport size; a cell shows two pixel rows
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub size: (u16, u16),
    pub pixels: RgbImage,
}

/// Machine-readable account of the last round, printed on exit
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub phase: Phase,
    pub outcome: Option<RoundOutcome>,
    pub reference_points: usize,
    pub config: GameConfig,
    pub stats: GameStats,
}

/// Terminal front end state wrapped around a [`Game`].
///
/// Viewports are recorded during drawing so mouse clicks can be mapped back
/// into image pixels.
pub struct App {
    pub game: Game,
    pub image: Option<LoadedImage>,
    pub input: String,
    pub load_error: Option<String>,
    pub reference_view: Option<Viewport>,
    pub canvas_view: Option<Viewport>,
    pub miss_flash: Option<MissFlash>,
    pub celebration: Celebration,
    pub tick: u64,
    pub screen_size: (u16, u16),
    pub should_quit: bool,
    thumbnail: Option<Thumbnail>,
    loader: Box<dyn ImageLoader>,
}

impl App {
    pub fn new(config: GameConfig) -> Self {
        Self::with_loader(config, Box::new(SourceImageLoader))
    }

    pub fn with_loader(config: GameConfig, loader: Box<dyn ImageLoader>) -> Self {
        Self {
            game: Game::new(config),
            image: None,
            input: String::new(),
            load_error: None,
            reference_view: None,
            canvas_view: None,
            miss_flash: None,
            celebration: Celebration::new(),
            tick: 0,
            screen_size: (80, 24),
            should_quit: false,
            thumbnail: None,
            loader,
        }
    }

    /// Acquire an image and hand its dimensions to the game.
    ///
    /// A failed load leaves the game untouched; the current image and any
    /// placed points are only dropped once the new image is in hand.
    pub fn load_image(&mut self, source: &ImageSource) -> Result<(), ImageLoadError> {
        let loaded = self.loader.load(source).map_err(|e| {
            warn!(%source, error = %e, "image load failed");
            e
        })?;
        let dims = loaded.dimensions;
        if dims.width == 0 || dims.height == 0 {
            warn!(%source, "image has no pixels");
            return Err(ImageLoadError::Empty);
        }
        info!(%source, width = dims.width, height = dims.height, "loaded image");

        if self.game.phase() != Phase::ImageLoading {
            self.new_image();
        }
        if !self.game.image_loaded(dims) {
            return Err(ImageLoadError::Empty);
        }
        self.image = Some(loaded);
        self.thumbnail = None;
        self.load_error = None;
        Ok(())
    }

    /// Load whatever the user typed into the source field
    pub fn submit_input(&mut self) {
        let Some(source) = ImageSource::parse(&self.input) else {
            self.load_error = Some("enter a file path or URL".to_string());
            return;
        };
        match self.load_image(&source) {
            Ok(()) => self.input.clear(),
            Err(e) => self.load_error = Some(e.to_string()),
        }
    }

    pub fn new_image(&mut self) {
        self.game.new_image();
        self.image = None;
        self.thumbnail = None;
        self.reference_view = None;
        self.canvas_view = None;
        self.miss_flash = None;
        self.celebration.stop();
    }

    pub fn new_round(&mut self) {
        if self.game.new_round() {
            self.miss_flash = None;
            self.canvas_view = None;
            self.celebration.stop();
        }
    }

    pub fn handle_event(&mut self, event: DrillEvent) {
        match event {
            DrillEvent::Tick => self.on_tick(),
            DrillEvent::Resize => {}
            DrillEvent::Key(key) => self.on_key(key),
            DrillEvent::Mouse(mouse) => self.on_mouse(mouse),
        }
    }

    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if let Some(flash) = self.miss_flash.as_mut() {
            flash.ticks_left = flash.ticks_left.saturating_sub(1);
            if flash.ticks_left == 0 {
                self.miss_flash = None;
            }
        }
        self.celebration.update();
    }

    /// Whether ticks change what is on screen
    pub fn is_animating(&self) -> bool {
        self.game.active_point_id().is_some() || self.miss_flash.is_some() || self.celebration.is_active()
    }

    fn on_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            self.should_quit = true;
            return;
        }

        match self.game.phase() {
            Phase::ImageLoading => match key.code {
                KeyCode::Enter => self.submit_input(),
                KeyCode::Backspace => {
                    self.input.pop();
                }
                KeyCode::Char(c) => self.input.push(c),
                _ => {}
            },
            Phase::SetupMarking => match key.code {
                KeyCode::Char('u') | KeyCode::Backspace => {
                    self.game.undo_last_reference_point();
                }
                KeyCode::Char('s') | KeyCode::Enter => {
                    if self.game.start_game() {
                        self.canvas_view = None;
                    }
                }
                KeyCode::Char('n') => self.new_image(),
                KeyCode::Char(c) => self.on_config_key(c),
                _ => {}
            },
            Phase::GamePlaying => match key.code {
                KeyCode::Tab => {
                    self.game.select_next_point();
                }
                KeyCode::Char('n') => self.new_image(),
                _ => {}
            },
            Phase::Results => match key.code {
                KeyCode::Char('r') => self.new_round(),
                KeyCode::Char('n') => self.new_image(),
                KeyCode::Char(c) => self.on_config_key(c),
                _ => {}
            },
        }
    }

    fn on_config_key(&mut self, c: char) {
        let cfg = *self.game.config();
        let updated = match c {
            'p' => cfg.step_point_count(true),
            'P' => cfg.step_point_count(false),
            't' => cfg.step_tolerance(true),
            'T' => cfg.step_tolerance(false),
            'f' => cfg.step_max_failed(true),
            'F' => cfg.step_max_failed(false),
            _ => return,
        };
        self.game.set_config(updated);
    }

    fn on_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let (col, row) = (mouse.column, mouse.row);

        match self.game.phase() {
            Phase::SetupMarking => {
                if let Some((x, y)) = self.reference_view.and_then(|vp| vp.cell_to_image(col, row)) {
                    self.game.add_reference_point(x, y);
                }
            }
            Phase::GamePlaying => {
                if let Some((x, y)) = self.canvas_view.and_then(|vp| vp.cell_to_image(col, row)) {
                    self.attempt(x, y);
                } else if let Some(vp) = self.reference_view {
                    if let Some(click) = vp.cell_to_display(col, row) {
                        self.game.select_point_near(click, vp.scale());
                    }
                }
            }
            Phase::ImageLoading | Phase::Results => {}
        }
    }

    fn attempt(&mut self, x: f64, y: f64) {
        if self.game.mark_point(x, y) {
            self.miss_flash = None;
        } else {
            self.miss_flash = Some(MissFlash {
                x,
                y,
                ticks_left: MISS_FLASH_TICKS,
            });
        }
        if self.game.phase() == Phase::Results {
            self.miss_flash = None;
            if self.game.stats().is_flawless() {
                self.celebration.start(self.screen_size.0, self.screen_size.1);
            }
        }
    }

    /// Pixels of the loaded image resampled to a viewport, cached per size
    pub fn thumbnail_for(&mut self, vp: &Viewport) -> Option<&Thumbnail> {
        let size = (vp.area.width, vp.area.height);
        let image = self.image.as_ref()?;
        let stale = self.thumbnail.as_ref().map_or(true, |t| t.size != size);
        if stale {
            let pixels = image
                .pixels
                .resize_exact(size.0 as u32, size.1 as u32 * 2, FilterType::Triangle)
                .to_rgb8();
            self.thumbnail = Some(Thumbnail { size, pixels });
        }
        self.thumbnail.as_ref()
    }

    /// One-line description of where the session ended up
    pub fn summary(&self) -> String {
        let stats = self.game.stats();
        match self.game.phase() {
            Phase::Results | Phase::GamePlaying => format!(
                "{} ({}/{} points)",
                stats,
                stats.successful_marks,
                self.game.reference_points().len()
            ),
            phase => format!("no round played (stopped during {phase})"),
        }
    }

    pub fn summary_record(&self) -> SessionSummary {
        SessionSummary {
            phase: self.game.phase(),
            outcome: self.game.outcome(),
            reference_points: self.game.reference_points().len(),
            config: *self.game.config(),
            stats: self.game.stats().clone(),
        }
    }
}
