use tracing::{debug, info};

use crate::config::GameConfig;
use crate::geometry::{first_within_radius, is_within_tolerance, SELECT_RADIUS};
use crate::point::{ImageDimensions, Point, PointId};
use crate::session::{Phase, RoundOutcome};
use crate::stats::GameStats;

/// One player's session: the loaded image, the points placed on it and the
/// progress of the current round.
///
/// Every operation is a plain method call. Calls that make no sense in the
/// current phase are ignored rather than reported as errors.
#[derive(Debug, Default)]
pub struct Game {
    phase: Phase,
    image: Option<ImageDimensions>,
    reference_points: Vec<Point>,
    marked_points: Vec<Point>,
    active_point: Option<PointId>,
    config: GameConfig,
    stats: GameStats,
}

impl Game {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn image(&self) -> Option<ImageDimensions> {
        self.image
    }

    pub fn reference_points(&self) -> &[Point] {
        &self.reference_points
    }

    pub fn marked_points(&self) -> &[Point] {
        &self.marked_points
    }

    pub fn active_point_id(&self) -> Option<PointId> {
        self.active_point
    }

    pub fn active_point(&self) -> Option<&Point> {
        let id = self.active_point?;
        self.reference_points.iter().find(|p| p.id == id)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        if self.stats.completed {
            Some(RoundOutcome::Completed)
        } else if self.stats.failed {
            Some(RoundOutcome::Failed)
        } else {
            None
        }
    }

    pub fn remaining_points(&self) -> usize {
        self.reference_points.iter().filter(|p| !p.is_marked).count()
    }

    pub fn can_undo(&self) -> bool {
        self.phase == Phase::SetupMarking && !self.reference_points.is_empty()
    }

    pub fn can_start(&self) -> bool {
        self.phase == Phase::SetupMarking
            && self.config.point_count > 0
            && self.reference_points.len() == self.config.point_count
    }

    /// Record a successfully acquired image and move on to point placement.
    ///
    /// Only valid while waiting for an image; a degenerate image with a zero
    /// dimension is refused.
    pub fn image_loaded(&mut self, dims: ImageDimensions) -> bool {
        if self.phase != Phase::ImageLoading || dims.width == 0 || dims.height == 0 {
            return false;
        }
        info!(width = dims.width, height = dims.height, "image loaded");
        self.image = Some(dims);
        self.phase = Phase::SetupMarking;
        true
    }

    pub fn add_reference_point(&mut self, x: f64, y: f64) -> bool {
        let Some(dims) = self.image else {
            return false;
        };
        if self.phase != Phase::SetupMarking
            || self.reference_points.len() >= self.config.point_count
        {
            return false;
        }

        let point = Point::reference(self.reference_points.len(), x, y, dims);
        debug!(id = %point.id, x, y, "reference point placed");
        self.reference_points.push(point);
        true
    }

    pub fn undo_last_reference_point(&mut self) -> Option<Point> {
        if self.phase != Phase::SetupMarking {
            return None;
        }
        let removed = self.reference_points.pop();
        if let Some(ref p) = removed {
            debug!(id = %p.id, "reference point removed");
        }
        removed
    }

    pub fn start_game(&mut self) -> bool {
        if !self.can_start() {
            return false;
        }

        self.marked_points.clear();
        self.stats = GameStats::default();
        for p in &mut self.reference_points {
            p.is_marked = false;
        }
        self.phase = Phase::GamePlaying;
        info!(points = self.reference_points.len(), "round started");

        if let Some(first) = self.first_unmarked() {
            self.activate(first);
        }
        true
    }

    /// Make another unmarked reference point the target
    pub fn select_active_point(&mut self, id: PointId) -> bool {
        if self.phase != Phase::GamePlaying {
            return false;
        }
        let selectable = self
            .reference_points
            .iter()
            .any(|p| p.id == id && !p.is_marked);
        if !selectable {
            return false;
        }
        self.activate(id);
        true
    }

    /// Select the first unmarked point near a click on the scaled reference view.
    ///
    /// `click` is in display units and `scale` converts image pixels into the
    /// same units.
    pub fn select_point_near(&mut self, click: (f64, f64), scale: (f64, f64)) -> Option<PointId> {
        if self.phase != Phase::GamePlaying {
            return None;
        }
        let candidates: Vec<&Point> = self.reference_points.iter().filter(|p| !p.is_marked).collect();
        let hit = first_within_radius(
            candidates.iter().map(|p| p.position()),
            click,
            scale,
            SELECT_RADIUS,
        )?;
        let id = candidates[hit].id;
        self.activate(id);
        Some(id)
    }

    /// Move the target to the next unmarked point after the current one, wrapping around
    pub fn select_next_point(&mut self) -> Option<PointId> {
        if self.phase != Phase::GamePlaying {
            return None;
        }
        let start = self
            .active_point
            .and_then(|id| self.reference_points.iter().position(|p| p.id == id))
            .map_or(0, |i| i + 1);
        let len = self.reference_points.len();
        let next = (0..len)
            .map(|offset| &self.reference_points[(start + offset) % len])
            .find(|p| !p.is_marked)
            .map(|p| p.id)?;
        self.activate(next);
        Some(next)
    }

    /// Attempt to relocate the active point; returns whether the attempt hit.
    pub fn mark_point(&mut self, x: f64, y: f64) -> bool {
        if self.phase != Phase::GamePlaying {
            return false;
        }
        let (Some(dims), Some(active_id)) = (self.image, self.active_point) else {
            return false;
        };
        let Some(target_idx) = self.reference_points.iter().position(|p| p.id == active_id) else {
            return false;
        };

        let hit = is_within_tolerance(
            (x, y),
            self.reference_points[target_idx].position(),
            dims.width(),
            dims.height(),
            self.config.tolerance_percent,
        );

        if hit {
            self.marked_points
                .push(Point::marked(self.marked_points.len(), x, y, dims));
            let target = &mut self.reference_points[target_idx];
            target.is_marked = true;
            target.is_active = false;
            self.active_point = None;
            self.stats.record_success();
            debug!(point = %active_id, x, y, accuracy = self.stats.accuracy, "hit");

            match self.first_unmarked() {
                Some(next) => self.activate(next),
                None => self.finish(RoundOutcome::Completed),
            }
        } else {
            self.stats.record_failure();
            debug!(
                point = %active_id,
                x,
                y,
                failed = self.stats.failed_attempts,
                "miss"
            );
            if self.stats.failed_attempts >= self.config.max_failed_attempts {
                self.finish(RoundOutcome::Failed);
            }
        }

        hit
    }

    /// Play again on the same image
    pub fn new_round(&mut self) -> bool {
        if self.phase != Phase::Results {
            return false;
        }
        self.clear_round();
        self.phase = Phase::SetupMarking;
        info!("new round");
        true
    }

    /// Drop everything, including the image
    pub fn new_image(&mut self) {
        self.clear_round();
        self.image = None;
        self.phase = Phase::ImageLoading;
        info!("waiting for a new image");
    }

    /// Replace the whole config; refused while a round is being played.
    ///
    /// Values are taken as given. Lowering the point count during setup drops
    /// the most recently placed surplus points.
    pub fn set_config(&mut self, config: GameConfig) -> bool {
        if !self.phase.allows_config_edit() {
            return false;
        }
        self.config = config;
        if self.phase == Phase::SetupMarking {
            self.reference_points.truncate(config.point_count);
        }
        debug!(?config, "config updated");
        true
    }

    fn clear_round(&mut self) {
        self.reference_points.clear();
        self.marked_points.clear();
        self.active_point = None;
        self.stats = GameStats::default();
    }

    fn first_unmarked(&self) -> Option<PointId> {
        self.reference_points
            .iter()
            .find(|p| !p.is_marked)
            .map(|p| p.id)
    }

    fn activate(&mut self, id: PointId) {
        self.active_point = Some(id);
        for p in &mut self.reference_points {
            p.is_active = p.id == id;
        }
    }

    fn finish(&mut self, outcome: RoundOutcome) {
        match outcome {
            RoundOutcome::Completed => self.stats.completed = true,
            RoundOutcome::Failed => self.stats.failed = true,
        }
        self.active_point = None;
        for p in &mut self.reference_points {
            p.is_active = false;
        }
        self.phase = Phase::Results;
        info!(?outcome, stats = %self.stats, "round finished");
    }
}
