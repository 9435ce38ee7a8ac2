//! Difficulty levels and the search parameters behind them

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseDifficultyError, ProfileError};
use crate::WIN_LENGTH;

/// A named strength of the computer opponent
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// The built-in profile for this level
    pub fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile::easy(),
            Difficulty::Medium => DifficultyProfile::medium(),
            Difficulty::Hard => DifficultyProfile::hard(),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        })
    }
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "e" => Ok(Difficulty::Easy),
            "medium" | "m" => Ok(Difficulty::Medium),
            "hard" | "h" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

/// Score deltas applied to each window by the heuristic evaluation
///
/// All values are from the AI's point of view, so penalties are negative.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowWeights {
    /// Four AI pieces
    pub four: i32,
    /// Three AI pieces and an empty cell
    pub three: i32,
    /// Two AI pieces and two empty cells
    pub two: i32,
    /// Three player pieces and an empty cell
    pub opponent_three: i32,
    /// Two player pieces and two empty cells
    pub opponent_two: i32,
    /// Bonus for every AI piece in the center column
    pub center: i32,
}

impl WindowWeights {
    /// Weights that mostly react to the player's threats
    pub const fn defensive() -> Self {
        Self {
            four: 0,
            three: 0,
            two: 0,
            opponent_three: -1,
            opponent_two: -2,
            center: 1,
        }
    }

    /// Weights that build the AI's own alignments while blocking the player's
    pub const fn full() -> Self {
        Self {
            four: 100,
            three: 5,
            two: 2,
            opponent_three: -4,
            opponent_two: 0,
            center: 1,
        }
    }

    /// The largest magnitude a heuristic evaluation can reach on a board of
    /// the given size
    pub fn heuristic_bound(&self, rows: usize, columns: usize) -> i64 {
        let span = WIN_LENGTH - 1;
        let windows = rows * (columns - span)
            + columns * (rows - span)
            + 2 * (rows - span) * (columns - span);
        let largest = [
            self.four,
            self.three,
            self.two,
            self.opponent_three,
            self.opponent_two,
        ]
        .iter()
        .map(|weight| i64::from(*weight).abs())
        .max()
        .unwrap_or(0);
        windows as i64 * largest + rows as i64 * i64::from(self.center).abs()
    }
}

/// Everything the search needs to play at a given strength
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    /// How many plies the search explores before evaluating heuristically
    pub depth: usize,
    /// Probability of replacing the searched move with a random legal one
    pub noise: f64,
    pub weights: WindowWeights,
}

impl DifficultyProfile {
    /// # Panics
    /// If `depth` is zero or `noise` is not a probability.
    pub fn new(depth: usize, noise: f64, weights: WindowWeights) -> Self {
        let profile = Self {
            depth,
            noise,
            weights,
        };
        profile.assert_valid();
        profile
    }

    pub fn easy() -> Self {
        Self::new(2, 0.33, WindowWeights::defensive())
    }

    pub fn medium() -> Self {
        Self::new(3, 0.0, WindowWeights::defensive())
    }

    pub fn hard() -> Self {
        Self::new(5, 0.0, WindowWeights::full())
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.depth == 0 {
            return Err(ProfileError::ZeroDepth);
        }
        if !(0.0..=1.0).contains(&self.noise) {
            return Err(ProfileError::NoiseOutOfRange(self.noise));
        }
        Ok(())
    }

    pub(crate) fn assert_valid(&self) {
        if let Err(err) = self.validate() {
            panic!("invalid difficulty profile: {}", err);
        }
    }
}

/// The profile used for each difficulty level
///
/// When read from a config file, any field left out of a level's table keeps
/// that level's built-in value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProfileTableOverrides")]
pub struct ProfileTable {
    pub easy: DifficultyProfile,
    pub medium: DifficultyProfile,
    pub hard: DifficultyProfile,
}

impl ProfileTable {
    pub fn get(&self, difficulty: Difficulty) -> &DifficultyProfile {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self {
            easy: DifficultyProfile::easy(),
            medium: DifficultyProfile::medium(),
            hard: DifficultyProfile::hard(),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct WeightOverrides {
    four: Option<i32>,
    three: Option<i32>,
    two: Option<i32>,
    opponent_three: Option<i32>,
    opponent_two: Option<i32>,
    center: Option<i32>,
}

impl WeightOverrides {
    fn apply(self, base: WindowWeights) -> WindowWeights {
        WindowWeights {
            four: self.four.unwrap_or(base.four),
            three: self.three.unwrap_or(base.three),
            two: self.two.unwrap_or(base.two),
            opponent_three: self.opponent_three.unwrap_or(base.opponent_three),
            opponent_two: self.opponent_two.unwrap_or(base.opponent_two),
            center: self.center.unwrap_or(base.center),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ProfileOverrides {
    depth: Option<usize>,
    noise: Option<f64>,
    weights: WeightOverrides,
}

impl ProfileOverrides {
    // not validated here, GameConfig::validate reports bad values
    fn apply(self, base: DifficultyProfile) -> DifficultyProfile {
        DifficultyProfile {
            depth: self.depth.unwrap_or(base.depth),
            noise: self.noise.unwrap_or(base.noise),
            weights: self.weights.apply(base.weights),
        }
    }
}

#[derive(Default, Deserialize)]
#[serde(default)]
struct ProfileTableOverrides {
    easy: ProfileOverrides,
    medium: ProfileOverrides,
    hard: ProfileOverrides,
}

impl From<ProfileTableOverrides> for ProfileTable {
    fn from(overrides: ProfileTableOverrides) -> Self {
        let base = ProfileTable::default();
        ProfileTable {
            easy: overrides.easy.apply(base.easy),
            medium: overrides.medium.apply(base.medium),
            hard: overrides.hard.apply(base.hard),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_profiles() {
        let easy = Difficulty::Easy.profile();
        assert_eq!((easy.depth, easy.noise), (2, 0.33));
        let medium = Difficulty::Medium.profile();
        assert_eq!((medium.depth, medium.noise), (3, 0.0));
        let hard = Difficulty::Hard.profile();
        assert_eq!((hard.depth, hard.noise), (5, 0.0));
        assert_eq!(hard.weights.three, 5);
        assert_eq!(hard.weights.opponent_three, -4);
    }

    #[test]
    fn parse_and_display() {
        for difficulty in Difficulty::ALL.iter() {
            assert_eq!(difficulty.to_string().parse::<Difficulty>(), Ok(*difficulty));
        }
        assert_eq!("H".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    #[should_panic]
    fn zero_depth_panics() {
        DifficultyProfile::new(0, 0.0, WindowWeights::full());
    }

    #[test]
    #[should_panic]
    fn noise_above_one_panics() {
        DifficultyProfile::new(3, 1.5, WindowWeights::full());
    }

    #[test]
    fn validate_names_the_problem() {
        let mut profile = DifficultyProfile::medium();
        assert_eq!(profile.validate(), Ok(()));
        profile.depth = 0;
        assert_eq!(profile.validate(), Err(ProfileError::ZeroDepth));
        profile.depth = 3;
        profile.noise = f64::NAN;
        assert!(matches!(profile.validate(), Err(ProfileError::NoiseOutOfRange(_))));
    }

    #[test]
    fn heuristic_bound_on_default_board() {
        // 88 windows of at most 100 plus 7 center pieces
        assert_eq!(WindowWeights::full().heuristic_bound(7, 7), 8807);
        assert_eq!(WindowWeights::defensive().heuristic_bound(7, 7), 183);
    }

    #[test]
    fn table_lookup() {
        let table = ProfileTable::default();
        assert_eq!(table.get(Difficulty::Medium), &DifficultyProfile::medium());
    }
}
