use anyhow::Result;
use crossterm::{
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use connect4_engine::board::{Cell, Coord};
use connect4_engine::game::{GameSession, GameStatus};

/// Draws the board with 1-based column numbers on top, highlighting the
/// winning line once there is one
pub fn display(session: &GameSession) -> Result<()> {
    let mut stdout = stdout();
    let board = session.board();
    let winning_line = session.winning_line();

    let header: String = (1..=board.columns()).map(|col| format!("{:>2}", col)).collect();
    stdout.queue(PrintStyledContent(style(header + "\n")))?;

    for row in (0..board.rows()).rev() {
        for col in 0..board.columns() {
            let highlighted = winning_line.map_or(false, |line| line.contains(&Coord::new(row, col)));
            let background = if highlighted {
                Color::DarkGreen
            } else {
                Color::DarkBlue
            };

            stdout
                .queue(PrintStyledContent(style(" ").on(background)))?
                .queue(PrintStyledContent(
                    style("O")
                        .attribute(Attribute::Bold)
                        .on(background)
                        .with(match board.get(row, col) {
                            Cell::Player => Color::Red,
                            Cell::Ai => Color::Yellow,
                            Cell::Empty => background,
                        }),
                ))?;
        }
        stdout.queue(PrintStyledContent(style("\n")))?;
    }
    stdout.flush()?;
    Ok(())
}

/// A line announcing how a finished game ended
pub fn announce(status: GameStatus) -> &'static str {
    match status {
        GameStatus::PlayerWon => "You win!",
        GameStatus::AiWon => "The AI wins!",
        GameStatus::Draw => "Draw!",
        GameStatus::InProgress => "",
    }
}
