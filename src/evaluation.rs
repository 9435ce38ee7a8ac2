//! Static scoring of board positions from the AI's point of view

use crate::board::{Board, Cell};
use crate::difficulty::WindowWeights;
use crate::WIN_LENGTH;

/// The score of a won position, larger than any heuristic sum
pub const WIN_SCORE: i32 = 1_000_000;

/// Scores a concluded game: a win for the AI is `WIN_SCORE`, a win for the
/// player `-WIN_SCORE` and a draw 0
pub fn evaluate_terminal(board: &Board) -> i32 {
    if board.has_won(Cell::Ai) {
        WIN_SCORE
    } else if board.has_won(Cell::Player) {
        -WIN_SCORE
    } else {
        0
    }
}

/// Scores a concluded game reached `depth` plies into a search of `max_depth`
///
/// Each ply left unexplored adds one point to a win and takes one from a loss,
/// so sooner wins and later losses score higher. A win never scores below
/// `WIN_SCORE`.
pub fn evaluate_terminal_at(board: &Board, depth: usize, max_depth: usize) -> i32 {
    let score = evaluate_terminal(board);
    score + score.signum() * max_depth.saturating_sub(depth) as i32
}

/// Estimates how favourable an unfinished position is for the AI
///
/// Every AI piece in the center column earns a flat bonus, as that column
/// takes part in the most windows. On top of that every window in every
/// orientation is scored by [`evaluate_window`].
pub fn evaluate_heuristic(board: &Board, weights: &WindowWeights) -> i32 {
    let center = board.center_column();
    let center_pieces = (0..board.rows())
        .filter(|&row| board.get(row, center) == Cell::Ai)
        .count() as i32;

    board
        .lines()
        .map(|line| evaluate_window(&board.window(&line), weights))
        .sum::<i32>()
        + center_pieces * weights.center
}

/// Scores a single window by counting its occupants
pub fn evaluate_window(cells: &[Cell; WIN_LENGTH], weights: &WindowWeights) -> i32 {
    let mut ai = 0;
    let mut player = 0;
    let mut empty = 0;
    for cell in cells.iter() {
        match cell {
            Cell::Ai => ai += 1,
            Cell::Player => player += 1,
            Cell::Empty => empty += 1,
        }
    }

    match (ai, player, empty) {
        (4, _, _) => weights.four,
        (3, _, 1) => weights.three,
        (2, _, 2) => weights.two,
        (_, 3, 1) => weights.opponent_three,
        (_, 2, 2) => weights.opponent_two,
        // four player pieces end the game and are scored by evaluate_terminal
        _ => 0,
    }
}

/// Scores any position, dispatching on whether the game has concluded
pub fn evaluate(board: &Board, weights: &WindowWeights) -> i32 {
    if board.is_terminal() {
        evaluate_terminal(board)
    } else {
        evaluate_heuristic(board, weights)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Cell::{Ai as O, Empty as E, Player as X};

    #[test]
    fn window_scores() {
        let weights = WindowWeights::full();
        assert_eq!(evaluate_window(&[O, O, O, O], &weights), 100);
        assert_eq!(evaluate_window(&[O, E, O, O], &weights), 5);
        assert_eq!(evaluate_window(&[E, O, O, E], &weights), 2);
        assert_eq!(evaluate_window(&[X, X, E, X], &weights), -4);
        assert_eq!(evaluate_window(&[X, X, E, E], &weights), 0);
        assert_eq!(evaluate_window(&[X, X, X, X], &weights), 0);
        assert_eq!(evaluate_window(&[O, X, O, O], &weights), 0);
        assert_eq!(evaluate_window(&[E, E, E, O], &weights), 0);
    }

    #[test]
    fn defensive_window_scores() {
        let weights = WindowWeights::defensive();
        assert_eq!(evaluate_window(&[O, O, O, E], &weights), 0);
        assert_eq!(evaluate_window(&[X, X, X, E], &weights), -1);
        assert_eq!(evaluate_window(&[E, X, E, X], &weights), -2);
    }

    #[test]
    fn terminal_scores() {
        let ai_win = Board::from_layout(&["O...", "OX..", "OX..", "OX.."]).unwrap();
        assert_eq!(evaluate_terminal(&ai_win), WIN_SCORE);

        let player_win = Board::from_layout(&["....", "....", "OOO.", "XXXX"]).unwrap();
        assert_eq!(evaluate_terminal(&player_win), -WIN_SCORE);

        let draw = Board::from_layout(&["OOOX", "XXXO", "OOOX", "XXXO"]).unwrap();
        assert_eq!(evaluate_terminal(&draw), 0);
        assert_eq!(evaluate(&draw, &WindowWeights::full()), 0);
    }

    #[test]
    fn sooner_wins_score_higher() {
        let ai_win = Board::from_layout(&["O...", "OX..", "OX..", "OX.."]).unwrap();
        assert_eq!(evaluate_terminal_at(&ai_win, 1, 5), WIN_SCORE + 4);
        assert_eq!(evaluate_terminal_at(&ai_win, 5, 5), WIN_SCORE);
        assert!(evaluate_terminal_at(&ai_win, 1, 5) > evaluate_terminal_at(&ai_win, 3, 5));

        let player_win = Board::from_layout(&["....", "....", "OOO.", "XXXX"]).unwrap();
        assert_eq!(evaluate_terminal_at(&player_win, 2, 5), -WIN_SCORE - 3);

        let draw = Board::from_layout(&["OOOX", "XXXO", "OOOX", "XXXO"]).unwrap();
        assert_eq!(evaluate_terminal_at(&draw, 1, 5), 0);
    }

    #[test]
    fn empty_board_is_neutral() {
        assert_eq!(evaluate_heuristic(&Board::default(), &WindowWeights::full()), 0);
    }

    #[test]
    fn center_pieces_earn_a_bonus() {
        let board = Board::from_layout(&[
            ".......", ".......", ".......", ".......", ".......", ".......", "...O...",
        ])
        .unwrap();
        // a lone piece completes no weighted window
        assert_eq!(evaluate_heuristic(&board, &WindowWeights::full()), 1);
        assert_eq!(evaluate_heuristic(&board, &WindowWeights::defensive()), 1);
    }

    #[test]
    fn adjacent_pieces_share_one_window() {
        // two AI pieces side by side on the bottom row
        let board = Board::from_layout(&[
            ".......", ".......", ".......", ".......", ".......", ".......", "OO.....",
        ])
        .unwrap();
        // only the window (0,0)-(0,3) holds both pieces
        assert_eq!(evaluate_heuristic(&board, &WindowWeights::full()), 2);
    }

    #[test]
    fn heuristic_stays_below_win_score() {
        let board = Board::from_layout(&[
            ".......", ".......", ".......", ".......", "..O.O..", "..XOX..", ".OXOXO.",
        ])
        .unwrap();
        let weights = WindowWeights::full();
        assert!(!board.is_terminal());
        assert!(evaluate_heuristic(&board, &weights).abs() < WIN_SCORE);
        assert!(weights.heuristic_bound(7, 7) < WIN_SCORE as i64);
    }
}
