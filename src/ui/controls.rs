use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use crate::game::Game;
use crate::session::{Phase, RoundOutcome};

fn key_hint(key: &str, label: &str, enabled: bool) -> Line<'static> {
    let style = if enabled {
        Style::default()
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    Line::from(vec![
        Span::styled(format!("({key}) "), style.add_modifier(Modifier::BOLD)),
        Span::styled(label.to_string(), style),
    ])
}

/// Side panel lines for the current phase, followed by the settings section
pub fn control_lines(game: &Game) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let stats = game.stats();
    let cfg = game.config();
    let mut lines = Vec::new();

    match game.phase() {
        Phase::ImageLoading => {}
        Phase::SetupMarking => {
            lines.push(Line::from(format!(
                "Points marked: {}/{}",
                game.reference_points().len(),
                cfg.point_count
            )));
            lines.push(Line::from("Click the image to place a point"));
            lines.push(Line::from(""));
            lines.push(key_hint("u", "Undo last point", game.can_undo()));
            lines.push(key_hint("s", "Start game", game.can_start()));
            lines.push(key_hint("n", "New image", true));
        }
        Phase::GamePlaying => {
            lines.push(Line::from(format!(
                "Successful marks: {}",
                stats.successful_marks
            )));
            lines.push(Line::from(format!(
                "Failed attempts: {}/{}",
                stats.failed_attempts, cfg.max_failed_attempts
            )));
            lines.push(Line::from(format!("Accuracy: {:.1}%", stats.accuracy)));
            lines.push(Line::from(format!(
                "Points left: {}",
                game.remaining_points()
            )));
            if let Some(active) = game.active_point() {
                lines.push(Line::from(vec![
                    Span::raw("Target: "),
                    Span::styled(
                        active.id.to_string(),
                        bold.fg(Color::Rgb(255, 102, 0)),
                    ),
                ]));
            }
            lines.push(Line::from(""));
            lines.push(Line::from("Select a point on the reference image,"));
            lines.push(Line::from("then click its spot on your canvas"));
            lines.push(key_hint("tab", "Next point", true));
            lines.push(key_hint("n", "New image", true));
        }
        Phase::Results => {
            let (status, color) = match game.outcome() {
                Some(RoundOutcome::Completed) => ("Completed!", Color::Green),
                _ => ("Failed", Color::Red),
            };
            lines.push(Line::from(Span::styled("Results", bold)));
            lines.push(Line::from(vec![
                Span::raw("Status: "),
                Span::styled(status, bold.fg(color)),
            ]));
            lines.push(Line::from(format!(
                "Successful marks: {}/{}",
                stats.successful_marks, cfg.point_count
            )));
            lines.push(Line::from(format!(
                "Failed attempts: {}",
                stats.failed_attempts
            )));
            lines.push(Line::from(format!(
                "Final accuracy: {:.1}%",
                stats.accuracy
            )));
            lines.push(Line::from(""));
            lines.push(key_hint("r", "New round (same image)", true));
            lines.push(key_hint("n", "New image", true));
        }
    }

    lines.push(Line::from(""));
    lines.extend(settings_lines(game));
    lines
}

fn settings_lines(game: &Game) -> Vec<Line<'static>> {
    let cfg = game.config();
    let editable = game.phase().allows_config_edit();
    let style = if editable {
        Style::default().fg(Color::Gray)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title = if editable {
        "Configuration"
    } else {
        "Configuration (locked)"
    };

    vec![
        Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(
            format!("Points: {}  (p/P)", cfg.point_count),
            style,
        )),
        Line::from(Span::styled(
            format!("Tolerance %: {:.1}  (t/T)", cfg.tolerance_percent),
            style,
        )),
        Line::from(Span::styled(
            format!("Max failed attempts: {}  (f/F)", cfg.max_failed_attempts),
            style,
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::point::ImageDimensions;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_setup_lines() {
        let mut game = Game::new(GameConfig {
            point_count: 3,
            tolerance_percent: 2.5,
            max_failed_attempts: 9,
        });
        game.image_loaded(ImageDimensions::new(100, 100));
        game.add_reference_point(1.0, 1.0);

        let out = text(&control_lines(&game));
        assert!(out.contains("Points marked: 1/3"));
        assert!(out.contains("(s) Start game"));
        assert!(out.contains("Tolerance %: 2.5"));
        assert!(out.contains("Max failed attempts: 9"));
        assert!(!out.contains("locked"));
    }

    #[test]
    fn test_playing_lines_lock_config() {
        let mut game = Game::new(GameConfig {
            point_count: 3,
            tolerance_percent: 3.0,
            max_failed_attempts: 9,
        });
        game.image_loaded(ImageDimensions::new(100, 100));
        for i in 0..3 {
            game.add_reference_point(i as f64 * 30.0, 10.0);
        }
        game.start_game();
        game.mark_point(99.0, 99.0);

        let out = text(&control_lines(&game));
        assert!(out.contains("Failed attempts: 1/9"));
        assert!(out.contains("Accuracy: 0.0%"));
        assert!(out.contains("Target: ref-0"));
        assert!(out.contains("Points left: 3"));
        assert!(out.contains("Configuration (locked)"));
    }

    #[test]
    fn test_results_lines() {
        let mut game = Game::new(GameConfig {
            point_count: 3,
            tolerance_percent: 3.0,
            max_failed_attempts: 1,
        });
        game.image_loaded(ImageDimensions::new(100, 100));
        for i in 0..3 {
            game.add_reference_point(i as f64 * 30.0, 10.0);
        }
        game.start_game();
        game.mark_point(0.0, 10.0);
        game.mark_point(99.0, 99.0);

        let out = text(&control_lines(&game));
        assert!(out.contains("Status: Failed"));
        assert!(out.contains("Successful marks: 1/3"));
        assert!(out.contains("Final accuracy: 50.0%"));
    }
}
