//! Match flow: menu, play, pause and end states plus mode-aware scoring.

use log::{info, warn};

use crate::config::FIRST_LEVEL_INDEX;
use crate::error::LevelError;

/// Index of a participant within the current mode's roster.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ParticipantId(pub usize);

/// High-level match state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SessionState {
    MainMenu,
    Playing,
    Paused,
    Ended,
}

/// Who plays a match and how they score.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum GameMode {
    SinglePlayer,
    Coop,
    PvP,
    PvAI,
    CoopAI,
}

impl GameMode {
    /// All modes in menu order.
    pub const ALL: [GameMode; 5] = [
        Self::SinglePlayer,
        Self::Coop,
        Self::PvP,
        Self::PvAI,
        Self::CoopAI,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::SinglePlayer => "Single player",
            Self::Coop => "Cooperative",
            Self::PvP => "Player vs player",
            Self::PvAI => "Player vs AI",
            Self::CoopAI => "Cooperative + AI",
        }
    }

    /// Stable key used for per-mode persistence.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::SinglePlayer => "single",
            Self::Coop => "coop",
            Self::PvP => "pvp",
            Self::PvAI => "pvai",
            Self::CoopAI => "coopai",
        }
    }

    /// Participants score independently in adversarial modes.
    #[must_use]
    pub fn is_adversarial(self) -> bool {
        matches!(self, Self::PvP | Self::PvAI)
    }

    /// Participants the mode needs, in participant-id order.
    #[must_use]
    pub fn roster(self) -> Vec<ParticipantKind> {
        match self {
            Self::SinglePlayer => vec![ParticipantKind::Human { player: 0 }],
            Self::Coop | Self::PvP => vec![
                ParticipantKind::Human { player: 0 },
                ParticipantKind::Human { player: 1 },
            ],
            Self::PvAI | Self::CoopAI => {
                vec![ParticipantKind::Human { player: 0 }, ParticipantKind::Ai]
            }
        }
    }
}

/// How a participant is controlled.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ParticipantKind {
    Human { player: usize },
    Ai,
}

/// The single modal view shown for a state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ModalView {
    MainMenu,
    Pause,
    GameOver,
}

/// What a fatal overlap hit.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Crash {
    Body,
    Wall,
}

/// Why a match ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EndReason {
    /// The last level was completed.
    LevelsExhausted,
    /// The next level exists but could not be loaded.
    LevelLoadFailed,
    Crashed {
        participant: ParticipantId,
        crash: Crash,
    },
}

/// Result of a target notification.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ConsumeOutcome {
    /// Not playing, or the participant is not part of the mode.
    Ignored,
    TargetRespawned,
    LevelAdvanced { level: u32 },
    MatchEnded,
}

/// Level and target operations the session drives.
pub trait LevelDirector {
    fn level_exists(&self, index: u32) -> bool;
    fn load_level(&mut self, index: u32) -> Result<(), LevelError>;
    fn spawn_target(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
enum Scoreboard {
    Shared { total: u32, this_level: u32 },
    PerParticipant { totals: Vec<u32>, this_level: Vec<u32> },
}

impl Scoreboard {
    fn for_mode(mode: GameMode) -> Self {
        if mode.is_adversarial() {
            let participants = mode.roster().len();
            Self::PerParticipant {
                totals: vec![0; participants],
                this_level: vec![0; participants],
            }
        } else {
            Self::Shared {
                total: 0,
                this_level: 0,
            }
        }
    }

    /// Counts one target and returns the participant's level count.
    fn record(&mut self, participant: ParticipantId) -> Option<u32> {
        match self {
            Self::Shared { total, this_level } => {
                *total += 1;
                *this_level += 1;
                Some(*this_level)
            }
            Self::PerParticipant { totals, this_level } => {
                let total = totals.get_mut(participant.0)?;
                *total += 1;
                let level = this_level.get_mut(participant.0)?;
                *level += 1;
                Some(*level)
            }
        }
    }

    fn reset_level(&mut self) {
        match self {
            Self::Shared { this_level, .. } => *this_level = 0,
            Self::PerParticipant { this_level, .. } => this_level.fill(0),
        }
    }

    fn total(&self, participant: ParticipantId) -> u32 {
        match self {
            Self::Shared { total, .. } => *total,
            Self::PerParticipant { totals, .. } => totals.get(participant.0).copied().unwrap_or(0),
        }
    }

    fn level_count(&self, participant: ParticipantId) -> u32 {
        match self {
            Self::Shared { this_level, .. } => *this_level,
            Self::PerParticipant { this_level, .. } => {
                this_level.get(participant.0).copied().unwrap_or(0)
            }
        }
    }
}

/// Owns match state; every change goes through its transition methods.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    mode: GameMode,
    scoreboard: Scoreboard,
    level_index: u32,
    targets_per_level: u32,
    modal: Option<ModalView>,
    end_reason: Option<EndReason>,
}

impl Session {
    #[must_use]
    pub fn new(targets_per_level: u32) -> Self {
        Self {
            state: SessionState::MainMenu,
            mode: GameMode::SinglePlayer,
            scoreboard: Scoreboard::for_mode(GameMode::SinglePlayer),
            level_index: FIRST_LEVEL_INDEX,
            targets_per_level: targets_per_level.max(1),
            modal: Some(ModalView::MainMenu),
            end_reason: None,
        }
    }

    /// Starts a match from the main menu or the game-over screen.
    ///
    /// Returns the participants to provision, or `None` when a match is
    /// already running.
    pub fn start_mode(&mut self, mode: GameMode) -> Option<Vec<ParticipantKind>> {
        if !matches!(self.state, SessionState::MainMenu | SessionState::Ended) {
            warn!("ignoring start of {mode:?} while {:?}", self.state);
            return None;
        }

        self.mode = mode;
        self.scoreboard = Scoreboard::for_mode(mode);
        self.level_index = FIRST_LEVEL_INDEX;
        self.end_reason = None;
        info!("starting {} on level {}", mode.label(), self.level_index);
        self.set_state(SessionState::Playing);

        Some(mode.roster())
    }

    /// Counts a consumed target and decides whether the level advances.
    pub fn notify_target_consumed<D>(
        &mut self,
        participant: ParticipantId,
        director: &mut D,
    ) -> ConsumeOutcome
    where
        D: LevelDirector + ?Sized,
    {
        if self.state != SessionState::Playing {
            return ConsumeOutcome::Ignored;
        }

        let Some(count) = self.scoreboard.record(participant) else {
            warn!("target consumed by unknown participant {participant:?}");
            return ConsumeOutcome::Ignored;
        };

        if count < self.targets_per_level {
            director.spawn_target();
            return ConsumeOutcome::TargetRespawned;
        }

        self.set_state(SessionState::Paused);
        let next = self.level_index + 1;

        if !director.level_exists(next) {
            self.finish(EndReason::LevelsExhausted);
            return ConsumeOutcome::MatchEnded;
        }

        if let Err(error) = director.load_level(next) {
            warn!("failed to load level {next}: {error}");
            self.finish(EndReason::LevelLoadFailed);
            return ConsumeOutcome::MatchEnded;
        }

        self.level_index = next;
        self.scoreboard.reset_level();
        director.spawn_target();
        info!("advanced to level {next}");
        self.set_state(SessionState::Playing);

        ConsumeOutcome::LevelAdvanced { level: next }
    }

    /// Switches between playing and paused. Returns whether anything changed.
    pub fn toggle_pause(&mut self) -> bool {
        match self.state {
            SessionState::Playing => self.set_state(SessionState::Paused),
            SessionState::Paused => self.set_state(SessionState::Playing),
            SessionState::MainMenu | SessionState::Ended => return false,
        }
        true
    }

    /// Ends a running or paused match.
    pub fn end_match(&mut self, reason: EndReason) -> bool {
        if !matches!(self.state, SessionState::Playing | SessionState::Paused) {
            return false;
        }
        self.finish(reason);
        true
    }

    /// Leaves a paused or ended match for the main menu.
    pub fn return_to_menu(&mut self) -> bool {
        if !matches!(self.state, SessionState::Paused | SessionState::Ended) {
            return false;
        }
        self.set_state(SessionState::MainMenu);
        true
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn mode(&self) -> GameMode {
        self.mode
    }

    #[must_use]
    pub fn modal(&self) -> Option<ModalView> {
        self.modal
    }

    #[must_use]
    pub fn level_index(&self) -> u32 {
        self.level_index
    }

    #[must_use]
    pub fn targets_per_level(&self) -> u32 {
        self.targets_per_level
    }

    #[must_use]
    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    /// Total score credited to `participant` (the shared total in
    /// cooperative modes).
    #[must_use]
    pub fn score(&self, participant: ParticipantId) -> u32 {
        self.scoreboard.total(participant)
    }

    /// Targets counted toward the current level for `participant`.
    #[must_use]
    pub fn level_progress(&self, participant: ParticipantId) -> u32 {
        self.scoreboard.level_count(participant)
    }

    /// Best score across participants.
    #[must_use]
    pub fn best_score(&self) -> u32 {
        match &self.scoreboard {
            Scoreboard::Shared { total, .. } => *total,
            Scoreboard::PerParticipant { totals, .. } => totals.iter().copied().max().unwrap_or(0),
        }
    }

    fn finish(&mut self, reason: EndReason) {
        info!("match ended: {reason:?}");
        self.end_reason = Some(reason);
        self.set_state(SessionState::Ended);
    }

    fn set_state(&mut self, next: SessionState) {
        if self.state != next {
            info!("session {:?} -> {next:?}", self.state);
        }
        self.state = next;
        self.modal = match next {
            SessionState::MainMenu => Some(ModalView::MainMenu),
            SessionState::Playing => None,
            SessionState::Paused => Some(ModalView::Pause),
            SessionState::Ended => Some(ModalView::GameOver),
        };
    }
}
