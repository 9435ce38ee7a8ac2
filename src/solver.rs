//! An agent choosing the AI's moves by game tree search

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::board::{Board, Cell};
use crate::difficulty::{DifficultyProfile, WindowWeights};
use crate::evaluation::{evaluate_heuristic, evaluate_terminal_at};

/// A bound beyond any reachable score
pub const INFINITY: i32 = i32::MAX;

/// The move picked by an [`Agent`] and the score the search gave it
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub column: usize,
    pub score: i32,
    /// Set when the move was drawn at random instead of taken from the search
    pub randomized: bool,
}

/// Anything able to choose the AI's next move
pub trait Agent {
    /// Picks a column for the AI on a board that still has legal moves
    fn select_move(&mut self, board: &Board, profile: &DifficultyProfile) -> SearchResult;
}

// A single branch of the search, exploring its subtree by playing and undoing
// moves on a board it owns
struct Search<'a> {
    board: Board,
    weights: &'a WindowWeights,
    max_depth: usize,
    node_count: usize,
}

impl<'a> Search<'a> {
    /// The best score the AI can force with the AI to move
    fn max_value(&mut self, mut alpha: i32, beta: i32, depth: usize) -> i32 {
        self.node_count += 1;

        if self.board.is_terminal() {
            return evaluate_terminal_at(&self.board, depth, self.max_depth);
        }
        if depth >= self.max_depth {
            return evaluate_heuristic(&self.board, self.weights);
        }

        let mut score = -INFINITY;
        for column in self.board.legal_moves() {
            self.board.push(column, Cell::Ai);
            let value = self.min_value(alpha, beta, depth + 1);
            self.board.pop(column);

            score = score.max(value);
            alpha = alpha.max(score);
            // the player already has a better option elsewhere
            if alpha >= beta {
                break;
            }
        }
        score
    }

    /// The best score the player can force with the player to move
    fn min_value(&mut self, alpha: i32, mut beta: i32, depth: usize) -> i32 {
        self.node_count += 1;

        if self.board.is_terminal() {
            return evaluate_terminal_at(&self.board, depth, self.max_depth);
        }
        if depth >= self.max_depth {
            return evaluate_heuristic(&self.board, self.weights);
        }

        let mut score = INFINITY;
        for column in self.board.legal_moves() {
            self.board.push(column, Cell::Player);
            let value = self.max_value(alpha, beta, depth + 1);
            self.board.pop(column);

            score = score.min(value);
            beta = beta.min(score);
            // the AI already has a better option elsewhere
            if alpha >= beta {
                break;
            }
        }
        score
    }
}

/// An agent searching for the AI's best move
///
/// # Notes
/// The search is a depth-limited minimax with alpha-beta pruning. Each root
/// move is searched with a full window, so the root moves are independent and
/// explored in parallel, every one on its own copy of the board. Below the root
/// each branch plays and undoes moves on that copy.
///
/// # Tie-break
/// Root moves are compared in ascending column order and only a strictly
/// greater score replaces the incumbent, so the leftmost of equally scored
/// columns is played. Wins found at a shallower depth score higher, so an
/// immediate win is never traded for a slower forced one.
///
/// # Noise
/// After the search, with the probability given by the profile, the chosen move
/// is replaced with a uniformly random legal move. The random source is owned
/// by the `Solver` and can be seeded for reproducible play.
pub struct Solver<R = StdRng> {
    rng: R,

    /// The number of nodes searched by this `Solver` so far (for diagnostics only)
    pub node_count: usize,
}

impl Solver<StdRng> {
    /// Creates a `Solver` with a randomly seeded random source
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Creates a `Solver` whose random choices are determined by `seed`
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Solver<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Solver<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng, node_count: 0 }
    }

    /// Searches for the AI's best move
    ///
    /// # Panics
    /// If the board has no legal moves or the profile is invalid.
    pub fn best_move(&mut self, board: &Board, profile: &DifficultyProfile) -> SearchResult {
        profile.assert_valid();
        let moves = board.legal_moves();
        assert!(!moves.is_empty(), "searched a board without legal moves");

        // (column, score, nodes searched)
        let scored: Vec<(usize, i32, usize)> = moves
            .par_iter()
            .map(|&column| {
                let mut search = Search {
                    board: board.clone(),
                    weights: &profile.weights,
                    max_depth: profile.depth,
                    node_count: 0,
                };
                search.board.push(column, Cell::Ai);
                let score = search.min_value(-INFINITY, INFINITY, 1);
                (column, score, search.node_count)
            })
            .collect();

        self.node_count += 1 + scored.iter().map(|&(_, _, nodes)| nodes).sum::<usize>();

        let mut best = scored[0];
        for &candidate in scored.iter() {
            trace!(column = candidate.0, score = candidate.1, "root move");
            if candidate.1 > best.1 {
                best = candidate;
            }
        }
        let mut result = SearchResult {
            column: best.0,
            score: best.1,
            randomized: false,
        };

        if profile.noise > 0.0 && self.rng.gen::<f64>() < profile.noise {
            let (column, score, _) = scored[self.rng.gen_range(0..scored.len())];
            result = SearchResult {
                column,
                score,
                randomized: true,
            };
        }

        debug!(
            column = result.column,
            score = result.score,
            randomized = result.randomized,
            depth = profile.depth,
            nodes = self.node_count,
            "AI move chosen"
        );
        result
    }
}

impl<R: Rng> Agent for Solver<R> {
    fn select_move(&mut self, board: &Board, profile: &DifficultyProfile) -> SearchResult {
        self.best_move(board, profile)
    }
}
