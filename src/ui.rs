pub mod controls;
pub mod picture;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::{app::App, celebration::Celebration, session::Phase, viewport::Viewport};

const CONTROLS_WIDTH: u16 = 38;

/// Draw the whole screen for the current phase and record where the image
/// panels ended up so clicks can be mapped back.
pub fn draw(app: &mut App, f: &mut Frame) {
    let area = f.area();
    app.screen_size = (area.width, area.height);

    match app.game.phase() {
        Phase::ImageLoading => {
            app.reference_view = None;
            app.canvas_view = None;
            render_loader(app, area, f);
        }
        Phase::SetupMarking => {
            app.canvas_view = None;
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(10), Constraint::Length(CONTROLS_WIDTH)])
                .split(area);
            render_reference(app, chunks[0], f);
            render_controls(app, chunks[1], f);
        }
        Phase::GamePlaying => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([
                    Constraint::Percentage(35),
                    Constraint::Min(10),
                    Constraint::Length(CONTROLS_WIDTH),
                ])
                .split(area);
            render_reference(app, chunks[0], f);
            render_player_canvas(app, chunks[1], f);
            render_controls(app, chunks[2], f);
        }
        Phase::Results => {
            app.reference_view = None;
            app.canvas_view = None;
            render_results(app, area, f);
        }
    }
}

fn render_loader(app: &App, area: Rect, f: &mut Frame) {
    let popup = centered(area, 64, 12);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Load Training Image");
    let inner = block.inner(popup);
    f.render_widget(Clear, popup);
    f.render_widget(block, popup);

    let mut lines = vec![
        Line::from("Image file (PNG or JPEG) or URL:"),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(app.input.clone()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        Line::from(""),
    ];
    if let Some(err) = &app.load_error {
        lines.push(Line::from(Span::styled(
            err.clone(),
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "(enter) load / (esc)ape",
        Style::default().add_modifier(Modifier::ITALIC),
    )));

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn render_reference(app: &mut App, area: Rect, f: &mut Frame) {
    let block = Block::default().borders(Borders::ALL).title("Reference Image");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(dims) = app.game.image() else {
        app.reference_view = None;
        return;
    };
    let vp = Viewport::fit(inner, dims);
    app.reference_view = vp;
    let Some(vp) = vp else {
        return;
    };

    let tick = app.tick;
    let dim = app.game.phase() == Phase::SetupMarking;
    if let Some(thumb) = app.thumbnail_for(&vp) {
        picture::render_thumbnail(&vp, thumb, f.buffer_mut());
    }
    picture::render_points(&vp, app.game.reference_points(), tick, dim, f.buffer_mut());
}

fn render_player_canvas(app: &mut App, area: Rect, f: &mut Frame) {
    let block = Block::default().borders(Borders::ALL).title("Your Canvas");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let vp = app.game.image().and_then(|dims| Viewport::fit(inner, dims));
    app.canvas_view = vp;
    let Some(vp) = vp else {
        return;
    };

    let buf = f.buffer_mut();
    picture::render_canvas(&vp, buf);
    picture::render_points(&vp, app.game.marked_points(), app.tick, false, buf);
    if let Some(flash) = &app.miss_flash {
        picture::render_miss(&vp, flash, buf);
    }
}

fn render_controls(app: &App, area: Rect, f: &mut Frame) {
    let block = Block::default().borders(Borders::ALL).title("Game Controls");
    let widget = Paragraph::new(controls::control_lines(&app.game))
        .block(block)
        .wrap(Wrap { trim: true });
    f.render_widget(widget, area);
}

fn render_results(app: &App, area: Rect, f: &mut Frame) {
    let popup = centered(area, 48, 18);
    let block = Block::default().borders(Borders::ALL).title("Game Controls");
    let widget = Paragraph::new(controls::control_lines(&app.game))
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });
    f.render_widget(Clear, popup);
    f.render_widget(widget, popup);

    if app.celebration.is_active() {
        render_celebration(&app.celebration, area, f.buffer_mut());
    }
}

/// Render celebration particles on top of the results screen
fn render_celebration(celebration: &Celebration, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::LightRed,
        Color::LightYellow,
    ];

    for particle in &celebration.particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let (x, y) = (particle.x as u16, particle.y as u16);
        if x >= area.width || y >= area.height {
            continue;
        }
        let mut style = Style::default().fg(colors[particle.color_index % colors.len()]);
        if particle.target.is_some() {
            style = style.add_modifier(Modifier::BOLD);
        }
        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_char(particle.symbol).set_style(style);
        }
    }
}

/// A `width` x `height` rect in the middle of `area`, shrunk to fit
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::image_source::{ImageLoadError, ImageLoader, ImageSource, LoadedImage};
    use image::DynamicImage;
    use ratatui::{backend::TestBackend, Terminal};

    struct BlankLoader;

    impl ImageLoader for BlankLoader {
        fn load(&self, source: &ImageSource) -> Result<LoadedImage, ImageLoadError> {
            Ok(LoadedImage::new(source.clone(), DynamicImage::new_rgb8(400, 300)))
        }
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn loaded_app() -> App {
        let mut app = App::with_loader(
            GameConfig {
                point_count: 3,
                tolerance_percent: 3.0,
                max_failed_attempts: 5,
            },
            Box::new(BlankLoader),
        );
        app.load_image(&ImageSource::File("blank.png".into())).unwrap();
        app
    }

    #[test]
    fn test_loader_screen() {
        let mut app = App::new(GameConfig::default());
        app.input = "cat.png".into();
        app.load_error = Some("IO error: not found".into());

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw(&mut app, f)).unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("Load Training Image"));
        assert!(content.contains("cat.png"));
        assert!(content.contains("IO error: not found"));
        assert!(app.reference_view.is_none());
    }

    #[test]
    fn test_setup_screen_records_reference_view() {
        let mut app = loaded_app();
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| draw(&mut app, f)).unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("Reference Image"));
        assert!(content.contains("Points marked: 0/3"));
        assert!(app.reference_view.is_some());
        assert!(app.canvas_view.is_none());
        assert_eq!(app.screen_size, (120, 40));
    }

    #[test]
    fn test_play_screen_has_canvas() {
        let mut app = loaded_app();
        for i in 0..3 {
            app.game.add_reference_point(50.0 + i as f64 * 100.0, 150.0);
        }
        assert!(app.game.start_game());

        let mut terminal = Terminal::new(TestBackend::new(160, 48)).unwrap();
        terminal.draw(|f| draw(&mut app, f)).unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("Your Canvas"));
        assert!(content.contains("Target: ref-0"));
        let reference = app.reference_view.unwrap();
        let canvas = app.canvas_view.unwrap();
        assert!(canvas.area.x > reference.area.x);
    }

    #[test]
    fn test_results_screen() {
        let mut app = loaded_app();
        for i in 0..3 {
            app.game.add_reference_point(50.0 + i as f64 * 100.0, 150.0);
        }
        app.game.start_game();
        for _ in 0..5 {
            app.game.mark_point(399.0, 0.0);
        }

        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| draw(&mut app, f)).unwrap();

        let content = buffer_text(&terminal);
        assert!(content.contains("Status: Failed"));
        assert!(content.contains("(r) New round"));
    }

    #[test]
    fn test_tiny_terminal_does_not_panic() {
        let mut app = loaded_app();
        let mut terminal = Terminal::new(TestBackend::new(12, 4)).unwrap();
        terminal.draw(|f| draw(&mut app, f)).unwrap();
    }

    #[test]
    fn test_celebration_renders_within_bounds() {
        let mut celebration = Celebration::new();
        celebration.start(40, 12);
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        render_celebration(&celebration, area, &mut buf);
    }

    #[test]
    fn test_centered() {
        assert_eq!(centered(Rect::new(0, 0, 100, 40), 50, 10), Rect::new(25, 15, 50, 10));
        assert_eq!(centered(Rect::new(0, 0, 20, 5), 50, 10), Rect::new(0, 0, 20, 5));
    }
}
