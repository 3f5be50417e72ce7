/// Radius, in display units, within which a click picks a reference point.
pub const SELECT_RADIUS: f64 = 20.0;

pub fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

pub fn diagonal(width: f64, height: f64) -> f64 {
    (width * width + height * height).sqrt()
}

/// Distance between two pixel positions expressed as a percentage of the image diagonal
pub fn percentage_distance(a: (f64, f64), b: (f64, f64), width: f64, height: f64) -> f64 {
    (distance(a, b) / diagonal(width, height)) * 100.0
}

/// Inclusive: an attempt exactly on the tolerance radius counts as a hit
pub fn is_within_tolerance(
    attempt: (f64, f64),
    target: (f64, f64),
    width: f64,
    height: f64,
    tolerance_percent: f64,
) -> bool {
    percentage_distance(attempt, target, width, height) <= tolerance_percent
}

pub fn pixel_to_percent(x: f64, y: f64, width: f64, height: f64) -> (f64, f64) {
    ((x / width) * 100.0, (y / height) * 100.0)
}

pub fn percent_to_pixel(percent_x: f64, percent_y: f64, width: f64, height: f64) -> (f64, f64) {
    ((percent_x / 100.0) * width, (percent_y / 100.0) * height)
}

/// Index of the first position whose scaled location lies within `radius` of `click`.
///
/// Positions are in image pixels, `click` is in display units and `scale` converts
/// pixels to display units. Candidates are checked in order and the first hit wins,
/// even if a later one is closer.
pub fn first_within_radius<I>(
    positions: I,
    click: (f64, f64),
    scale: (f64, f64),
    radius: f64,
) -> Option<usize>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    positions
        .into_iter()
        .position(|(x, y)| distance((x * scale.0, y * scale.1), click) <= radius)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_distance() {
        assert_eq!(distance((0.0, 0.0), (3.0, 4.0)), 5.0);
        assert_eq!(distance((3.0, 4.0), (0.0, 0.0)), 5.0);
        assert_eq!(distance((7.5, 7.5), (7.5, 7.5)), 0.0);
    }

    #[test]
    fn test_diagonal() {
        assert_eq!(diagonal(3.0, 4.0), 5.0);
        assert!((diagonal(1000.0, 800.0) - 1280.6248474865697).abs() < EPS);
    }

    #[test]
    fn test_percentage_distance_examples() {
        let close = percentage_distance((520.0, 410.0), (500.0, 400.0), 1000.0, 800.0);
        assert!((close - 1.746).abs() < 0.001, "got {close}");

        let far = percentage_distance((550.0, 450.0), (500.0, 400.0), 1000.0, 800.0);
        assert!((far - 5.521).abs() < 0.001, "got {far}");
    }

    #[test]
    fn test_tolerance_examples() {
        assert!(is_within_tolerance(
            (520.0, 410.0),
            (500.0, 400.0),
            1000.0,
            800.0,
            3.0
        ));
        assert!(!is_within_tolerance(
            (550.0, 450.0),
            (500.0, 400.0),
            1000.0,
            800.0,
            3.0
        ));
    }

    #[test]
    fn test_tolerance_boundary_is_inclusive() {
        // 3-4-5 triangle: 300x400 image has a 500px diagonal, so 5px is exactly 1%
        assert!(is_within_tolerance(
            (3.0, 4.0),
            (0.0, 0.0),
            300.0,
            400.0,
            1.0
        ));
        assert!(!is_within_tolerance(
            (3.0, 4.01),
            (0.0, 0.0),
            300.0,
            400.0,
            1.0
        ));
    }

    #[test]
    fn test_zero_tolerance_only_accepts_exact_hits() {
        assert!(is_within_tolerance(
            (10.0, 10.0),
            (10.0, 10.0),
            100.0,
            100.0,
            0.0
        ));
        assert!(!is_within_tolerance(
            (10.0, 10.5),
            (10.0, 10.0),
            100.0,
            100.0,
            0.0
        ));
    }

    #[test]
    fn test_pixel_percent_conversion() {
        assert_eq!(pixel_to_percent(250.0, 200.0, 1000.0, 800.0), (25.0, 25.0));
        assert_eq!(percent_to_pixel(25.0, 25.0, 1000.0, 800.0), (250.0, 200.0));
        assert_eq!(pixel_to_percent(0.0, 800.0, 1000.0, 800.0), (0.0, 100.0));
    }

    #[test]
    fn test_first_within_radius_prefers_order_over_proximity() {
        let positions = vec![(0.0, 0.0), (100.0, 0.0), (110.0, 0.0)];
        // click at 108 is closer to the third point but the second is checked first
        let hit = first_within_radius(positions, (108.0, 0.0), (1.0, 1.0), SELECT_RADIUS);
        assert_eq!(hit, Some(1));
    }

    #[test]
    fn test_first_within_radius_applies_scale() {
        let positions = vec![(100.0, 100.0)];
        assert_eq!(
            first_within_radius(positions.clone(), (50.0, 50.0), (0.5, 0.5), SELECT_RADIUS),
            Some(0)
        );
        assert_eq!(
            first_within_radius(positions, (100.0, 100.0), (0.5, 0.5), SELECT_RADIUS),
            None
        );
    }

    #[test]
    fn test_first_within_radius_empty() {
        let positions: Vec<(f64, f64)> = vec![];
        assert_eq!(
            first_within_radius(positions, (0.0, 0.0), (1.0, 1.0), SELECT_RADIUS),
            None
        );
    }
}
