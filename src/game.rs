//! Turn orchestration for a game between a player and the AI

use std::fmt;
use std::thread::{self, JoinHandle};

use serde::Serialize;
use tracing::{debug, info};

use crate::board::{Board, Cell, Line};
use crate::config::GameConfig;
use crate::difficulty::{Difficulty, DifficultyProfile, ProfileTable};
use crate::error::GameError;
use crate::solver::{Agent, SearchResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    PlayerWon,
    AiWon,
    Draw,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GameStatus::InProgress => "in progress",
            GameStatus::PlayerWon => "player won",
            GameStatus::AiWon => "AI won",
            GameStatus::Draw => "draw",
        })
    }
}

/// The state of one game, mutated only through its own operations
///
/// The player always moves first. The AI's reply is split in two halves,
/// [`begin_ai_move`](Self::begin_ai_move) and
/// [`finish_ai_move`](Self::finish_ai_move), so the search in between can run
/// anywhere. A reset while a search is running bumps the search generation,
/// which turns the eventual result into a no-op.
#[derive(Clone, Debug)]
pub struct GameSession {
    board: Board,
    status: GameStatus,
    winning_line: Option<Line>,
    difficulty: Difficulty,
    profile: DifficultyProfile,
    search_generation: u64,
    ai_pending: bool,
}

impl GameSession {
    /// Starts a game on an empty board
    pub fn new(rows: usize, columns: usize, difficulty: Difficulty, profile: DifficultyProfile) -> Self {
        profile.assert_valid();
        Self {
            board: Board::new(rows, columns),
            status: GameStatus::InProgress,
            winning_line: None,
            difficulty,
            profile,
            search_generation: 0,
            ai_pending: false,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.rows,
            config.columns,
            config.difficulty,
            config.profiles.get(config.difficulty).clone(),
        )
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// The four cells that won the game, if it has been won
    pub fn winning_line(&self) -> Option<&Line> {
        self.winning_line.as_ref()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    pub fn search_generation(&self) -> u64 {
        self.search_generation
    }

    /// Whether an AI move has been started and not yet finished
    pub fn is_ai_pending(&self) -> bool {
        self.ai_pending
    }

    fn ensure_accepting_moves(&self) -> Result<(), GameError> {
        if self.status.is_over() {
            return Err(GameError::GameOver {
                status: self.status,
            });
        }
        if self.ai_pending {
            return Err(GameError::AiMovePending);
        }
        Ok(())
    }

    // updates the status after `mover` placed a piece
    fn settle(&mut self, mover: Cell) -> GameStatus {
        if let Some(line) = self.board.check_win(mover).line {
            self.status = if mover == Cell::Player {
                GameStatus::PlayerWon
            } else {
                GameStatus::AiWon
            };
            self.winning_line = Some(line);
        } else if self.board.is_full() {
            self.status = GameStatus::Draw;
        }
        if self.status.is_over() {
            info!(status = %self.status, moves = self.board.num_moves(), "game over");
        }
        self.status
    }

    /// Drops a player piece, returning the resulting status
    ///
    /// A rejected move leaves the session unchanged.
    pub fn apply_player_move(&mut self, column: usize) -> Result<GameStatus, GameError> {
        self.ensure_accepting_moves()?;
        let row = self.board.play(column, Cell::Player)?;
        debug!(column, row, "player move");
        Ok(self.settle(Cell::Player))
    }

    /// Starts the AI's turn, capturing everything the search needs
    ///
    /// Until the returned task is finished the session refuses further moves.
    pub fn begin_ai_move(&mut self) -> Result<AiMoveTask, GameError> {
        self.ensure_accepting_moves()?;
        self.ai_pending = true;
        Ok(AiMoveTask {
            board: self.board.clone(),
            profile: self.profile.clone(),
            generation: self.search_generation,
        })
    }

    /// Plays the AI's move found by a task
    ///
    /// Returns `Ok(false)` without touching the session when the task was
    /// started before the last reset.
    pub fn finish_ai_move(&mut self, outcome: AiMoveOutcome) -> Result<bool, GameError> {
        if outcome.generation != self.search_generation || !self.ai_pending {
            debug!(
                generation = outcome.generation,
                current = self.search_generation,
                "discarding stale AI move"
            );
            return Ok(false);
        }
        self.ai_pending = false;

        let column = outcome.result.column;
        let row = self.board.play(column, Cell::Ai)?;
        debug!(column, row, score = outcome.result.score, "AI move");
        self.settle(Cell::Ai);
        Ok(true)
    }

    /// Clears the board for a new game, keeping the difficulty
    pub fn reset(&mut self) {
        self.board = Board::new(self.board.rows(), self.board.columns());
        self.status = GameStatus::InProgress;
        self.winning_line = None;
        self.ai_pending = false;
        self.search_generation += 1;
        info!(generation = self.search_generation, "new game");
    }

    /// Changes the difficulty used by later AI moves, leaving the board as is
    pub fn set_difficulty(&mut self, difficulty: Difficulty, profile: DifficultyProfile) {
        profile.assert_valid();
        self.difficulty = difficulty;
        self.profile = profile;
        info!(%difficulty, depth = self.profile.depth, "difficulty changed");
    }

    /// A serializable snapshot for rendering
    pub fn view(&self) -> SessionView {
        let board = (0..self.board.rows())
            .map(|row| {
                (0..self.board.columns())
                    .map(|col| self.board.get(row, col) as u8)
                    .collect()
            })
            .collect();
        SessionView {
            board,
            status: self.status,
            winning_line: self.winning_line,
        }
    }
}

/// What a front end needs to draw a session
///
/// `board` lists rows bottom first, with 0 for an empty cell, 1 for a player
/// piece and 2 for an AI piece.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub board: Vec<Vec<u8>>,
    pub status: GameStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_line: Option<Line>,
}

/// A pending AI search, detached from its session
#[derive(Clone, Debug)]
pub struct AiMoveTask {
    board: Board,
    profile: DifficultyProfile,
    generation: u64,
}

impl AiMoveTask {
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Asks the agent for the AI's move on the captured board
    ///
    /// # Panics
    /// If the agent picks a column that is not a legal move.
    pub fn run<A: Agent + ?Sized>(&self, agent: &mut A) -> AiMoveOutcome {
        let result = agent.select_move(&self.board, &self.profile);
        assert!(
            self.board.legal_moves().contains(&result.column),
            "agent chose column {}, which is not a legal move",
            result.column
        );
        AiMoveOutcome {
            generation: self.generation,
            result,
        }
    }

    /// Runs the search on its own thread, handing the agent back with the result
    pub fn spawn<A: Agent + Send + 'static>(self, mut agent: A) -> JoinHandle<(AiMoveOutcome, A)> {
        thread::spawn(move || {
            let outcome = self.run(&mut agent);
            (outcome, agent)
        })
    }
}

/// The result of an [`AiMoveTask`], to be handed back to its session
#[derive(Debug, PartialEq, Eq)]
pub struct AiMoveOutcome {
    generation: u64,
    result: SearchResult,
}

impl AiMoveOutcome {
    pub fn result(&self) -> &SearchResult {
        &self.result
    }
}

/// Drives a session against an agent, one call per user action
pub struct GameController<A> {
    session: GameSession,
    agent: A,
    profiles: ProfileTable,
}

impl<A: Agent> GameController<A> {
    /// Starts a game at the default difficulty with the built-in profiles
    pub fn new_game(rows: usize, columns: usize, agent: A) -> Self {
        Self::with_profiles(rows, columns, Difficulty::default(), ProfileTable::default(), agent)
    }

    pub fn with_profiles(
        rows: usize,
        columns: usize,
        difficulty: Difficulty,
        profiles: ProfileTable,
        agent: A,
    ) -> Self {
        let session = GameSession::new(rows, columns, difficulty, profiles.get(difficulty).clone());
        Self {
            session,
            agent,
            profiles,
        }
    }

    pub fn from_config(config: &GameConfig, agent: A) -> Self {
        Self::with_profiles(
            config.rows,
            config.columns,
            config.difficulty,
            config.profiles.clone(),
            agent,
        )
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn agent_mut(&mut self) -> &mut A {
        &mut self.agent
    }

    /// Plays the player's move and, if the game goes on, the AI's reply
    pub fn apply_player_move(&mut self, column: usize) -> Result<&GameSession, GameError> {
        if self.session.apply_player_move(column)? == GameStatus::InProgress {
            self.compute_ai_move()?;
        }
        Ok(&self.session)
    }

    /// Searches for and plays the AI's move on the calling thread
    pub fn compute_ai_move(&mut self) -> Result<&GameSession, GameError> {
        let task = self.session.begin_ai_move()?;
        let outcome = task.run(&mut self.agent);
        self.session.finish_ai_move(outcome)?;
        Ok(&self.session)
    }

    pub fn reset(&mut self) -> &GameSession {
        self.session.reset();
        &self.session
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> &GameSession {
        let profile = self.profiles.get(difficulty).clone();
        self.session.set_difficulty(difficulty, profile);
        &self.session
    }
}
