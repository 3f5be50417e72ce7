use assert_matches::assert_matches;

use pointmark::config::{ConfigStore, FileConfigStore, GameConfig};
use pointmark::game::Game;
use pointmark::point::{ImageDimensions, PointId};
use pointmark::session::{Phase, RoundOutcome};
use pointmark::stats::accuracy;

fn setup(config: GameConfig, dims: ImageDimensions, points: &[(f64, f64)]) -> Game {
    let mut game = Game::new(config);
    assert!(game.image_loaded(dims));
    for &(x, y) in points {
        assert!(game.add_reference_point(x, y));
    }
    game
}

#[test]
fn accuracy_tracks_every_attempt() {
    let config = GameConfig {
        point_count: 3,
        tolerance_percent: 3.0,
        max_failed_attempts: 10,
    };
    let mut game = setup(
        config,
        ImageDimensions::new(1000, 800),
        &[(100.0, 100.0), (500.0, 400.0), (900.0, 700.0)],
    );
    assert!(game.start_game());

    let attempts = [
        (100.0, 100.0),
        (700.0, 100.0),
        (520.0, 410.0),
        (0.0, 0.0),
        (0.0, 0.0),
        (905.0, 695.0),
    ];
    let (mut hits, mut misses) = (0, 0);
    for (x, y) in attempts {
        if game.mark_point(x, y) {
            hits += 1;
        } else {
            misses += 1;
        }
        assert_eq!(game.stats().successful_marks, hits);
        assert_eq!(game.stats().failed_attempts, misses);
        assert_eq!(game.stats().accuracy, accuracy(hits, misses));
    }

    assert_eq!(game.phase(), Phase::Results);
    assert_matches!(game.outcome(), Some(RoundOutcome::Completed));
    assert_eq!(game.stats().accuracy, 50.0);
    assert_eq!(game.marked_points().len(), 3);
    assert_eq!(game.marked_points()[2].id, PointId::Marked(2));
}

#[test]
fn marked_points_carry_percent_coordinates() {
    let mut game = setup(
        GameConfig {
            point_count: 3,
            tolerance_percent: 5.0,
            max_failed_attempts: 5,
        },
        ImageDimensions::new(400, 200),
        &[(100.0, 50.0), (200.0, 100.0), (300.0, 150.0)],
    );
    game.start_game();
    assert!(game.mark_point(102.0, 52.0));

    let marked = &game.marked_points()[0];
    assert_eq!(marked.id.to_string(), "marked-0");
    assert_eq!(marked.percent_x, 25.5);
    assert_eq!(marked.percent_y, 26.0);
    assert!(game.reference_points()[0].is_marked);
    assert_eq!(game.active_point_id(), Some(PointId::Reference(1)));
}

#[test]
fn stored_config_drives_a_round() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileConfigStore::with_path(dir.path().join("config.json"));
    store
        .save(&GameConfig {
            point_count: 4,
            tolerance_percent: 1.0,
            max_failed_attempts: 5,
        })
        .unwrap();

    let mut game = setup(
        store.load(),
        ImageDimensions::new(300, 400),
        &[(10.0, 10.0), (50.0, 50.0), (90.0, 90.0)],
    );
    assert!(!game.start_game());
    assert!(game.add_reference_point(150.0, 200.0));
    assert!(!game.add_reference_point(151.0, 201.0));
    assert!(game.start_game());

    // 1% of a 500px diagonal is exactly 5px
    assert!(game.mark_point(13.0, 14.0));
    for _ in 0..5 {
        assert!(!game.mark_point(299.0, 399.0));
    }
    assert_matches!(game.outcome(), Some(RoundOutcome::Failed));
    assert_eq!(game.active_point_id(), None);
}

#[test]
fn rounds_and_images_reset_state() {
    let config = GameConfig {
        point_count: 3,
        tolerance_percent: 3.0,
        max_failed_attempts: 5,
    };
    let mut game = setup(
        config,
        ImageDimensions::new(200, 200),
        &[(20.0, 20.0), (100.0, 100.0), (180.0, 180.0)],
    );
    game.start_game();
    for (x, y) in [(20.0, 20.0), (100.0, 100.0), (180.0, 180.0)] {
        assert!(game.mark_point(x, y));
    }
    assert!(game.stats().is_flawless());

    assert!(game.new_round());
    assert_eq!(game.phase(), Phase::SetupMarking);
    assert_eq!(game.image(), Some(ImageDimensions::new(200, 200)));
    assert!(game.reference_points().is_empty());
    assert_eq!(game.stats().total_attempts(), 0);

    // ids restart from zero on the new round
    assert!(game.add_reference_point(5.0, 5.0));
    assert_eq!(game.reference_points()[0].id, PointId::Reference(0));

    game.new_image();
    assert_eq!(game.phase(), Phase::ImageLoading);
    assert_eq!(game.image(), None);
    assert!(!game.add_reference_point(5.0, 5.0));
    assert!(!game.new_round());
}
