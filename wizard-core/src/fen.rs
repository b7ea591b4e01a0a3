//! FEN 格式解析和生成
//!
//! 10x10 变体的 FEN 方言:
//! `<棋盘> <走子方>`
//!
//! 棋盘自上而下 (0 行到 9 行), 行内空位用数字表示 (整行为空是 "10"),
//! 巫师用 `w`/`W`。解析出的棋子视为未移动过, 标识按出现顺序分配;
//! 将军/终局标志按规则重新计算。
//!
//! 示例:
//! `rnbwqkwbnr/pppppppppp/10/10/10/10/10/10/PPPPPPPPPP/RNBWQKWBNR w`

use std::fmt::Write as _;

use crate::board::Board;
use crate::constants::BOARD_SIZE;
use crate::error::{ChessError, Result};
use crate::piece::{Color, Piece, PieceKind, Position};
use crate::state::GameState;

/// 初始局面 FEN
pub const INITIAL_FEN: &str =
    "rnbwqkwbnr/pppppppppp/10/10/10/10/10/10/PPPPPPPPPP/RNBWQKWBNR w";

/// FEN 格式处理
pub struct Fen;

impl Fen {
    /// 解析 FEN 字符串为对局状态
    pub fn parse(fen: &str) -> Result<GameState> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.is_empty() {
            return Err(ChessError::InvalidFen {
                reason: "Empty FEN string".to_string(),
            });
        }

        let board = Self::parse_board(parts[0])?;

        // 走子方 (缺省白方)
        let current_player = if parts.len() > 1 {
            Color::from_fen_char(parts[1].chars().next().unwrap_or('w'))
                .unwrap_or(Color::White)
        } else {
            Color::White
        };

        GameState::from_board(board, current_player)
    }

    /// 解析棋盘部分
    fn parse_board(board_str: &str) -> Result<Board> {
        let mut board = Board::empty();
        let rows: Vec<&str> = board_str.split('/').collect();

        if rows.len() != BOARD_SIZE {
            return Err(ChessError::InvalidFen {
                reason: format!("Expected {} rows, got {}", BOARD_SIZE, rows.len()),
            });
        }

        let mut next_id = 0u32;
        for (row_idx, row_str) in rows.iter().enumerate() {
            let mut col = 0usize;
            let mut empty_run = 0usize;

            for c in row_str.chars() {
                if c.is_ascii_digit() {
                    // 支持 "10" 这类多位空位计数
                    empty_run = empty_run * 10 + (c as usize - '0' as usize);
                    continue;
                }

                col += empty_run;
                empty_run = 0;

                if col >= BOARD_SIZE {
                    return Err(ChessError::InvalidFen {
                        reason: format!("Row {} has too many columns", row_idx),
                    });
                }

                match PieceKind::from_fen_char(c) {
                    Some((kind, color)) => {
                        board.set(
                            Position::new_unchecked(row_idx as u8, col as u8),
                            Some(Piece::new(kind, color, next_id)),
                        );
                        next_id += 1;
                        col += 1;
                    }
                    None => {
                        return Err(ChessError::InvalidFen {
                            reason: format!("Invalid piece character: {}", c),
                        });
                    }
                }
            }
            col += empty_run;

            if col != BOARD_SIZE {
                return Err(ChessError::InvalidFen {
                    reason: format!(
                        "Row {} has {} columns, expected {}",
                        row_idx, col, BOARD_SIZE
                    ),
                });
            }
        }

        Ok(board)
    }

    /// 将对局状态转换为 FEN 字符串
    pub fn to_string(state: &GameState) -> String {
        format!(
            "{} {}",
            Self::board_to_string(&state.board),
            state.current_player.to_fen_char()
        )
    }

    /// 将棋盘转换为 FEN 棋盘部分
    fn board_to_string(board: &Board) -> String {
        let mut result = String::new();

        for row in 0..BOARD_SIZE {
            if row > 0 {
                result.push('/');
            }

            let mut empty_run = 0usize;
            for col in 0..BOARD_SIZE {
                let pos = Position::new_unchecked(row as u8, col as u8);
                match board.get(pos) {
                    Some(piece) => {
                        if empty_run > 0 {
                            let _ = write!(result, "{}", empty_run);
                            empty_run = 0;
                        }
                        result.push(piece.to_fen_char());
                    }
                    None => empty_run += 1,
                }
            }
            if empty_run > 0 {
                let _ = write!(result, "{}", empty_run);
            }
        }

        result
    }
}
