use serde::Serialize;

/// Where the current session sits in its lifecycle.
///
/// The happy path is linear: an image is acquired, reference points are
/// placed, the player relocates them, and the round ends in `Results`.
/// `Results` loops back to `SetupMarking` for another round on the same
/// image, and any phase can fall back to `ImageLoading` for a new image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, strum_macros::Display)]
pub enum Phase {
    #[default]
    #[strum(serialize = "image loading")]
    ImageLoading,
    #[strum(serialize = "setup")]
    SetupMarking,
    #[strum(serialize = "playing")]
    GamePlaying,
    #[strum(serialize = "results")]
    Results,
}

impl Phase {
    /// Config edits are locked while a round is being played
    pub fn allows_config_edit(&self) -> bool {
        !matches!(self, Phase::GamePlaying)
    }
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RoundOutcome {
    Completed,
    Failed,
}
