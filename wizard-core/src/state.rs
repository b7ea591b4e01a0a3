//! 游戏状态与转移引擎
//!
//! `GameState` 是唯一能写入棋盘的组件: 每次 `make_move` 产生一个
//! 新的不可变状态, 调用方持有旧值即可安全地并发读取。

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::board::Board;
use crate::error::{ChessError, Result};
use crate::moves::{Move, MoveGenerator};
use crate::piece::{Color, PieceKind, Position};

/// 对局阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// 进行中
    Playing,
    /// 已结束 (将死或无子可动)
    Ended,
}

/// 完整的对局状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// 棋盘
    pub board: Board,
    /// 当前走子方
    pub current_player: Color,
    /// 走法历史 (只追加)
    pub move_history: Vec<Move>,
    /// 当前走子方是否被将军
    pub in_check: bool,
    /// 是否将死
    pub checkmate: bool,
    /// 是否无子可动 (逼和)
    pub stalemate: bool,
    /// 对局阶段
    pub phase: GamePhase,
    /// 胜者 (将死时为对方, 逼和为 None)
    pub winner: Option<Color>,
}

/// 创建初始对局状态
pub fn create_initial_state() -> GameState {
    GameState::initial()
}

impl GameState {
    /// 创建初始状态
    pub fn initial() -> Self {
        Self {
            board: Board::initial(),
            current_player: Color::White,
            move_history: Vec::new(),
            in_check: false,
            checkmate: false,
            stalemate: false,
            phase: GamePhase::Playing,
            winner: None,
        }
    }

    /// 从任意棋盘构建状态, 将军/终局标志按规则重新计算
    pub fn from_board(board: Board, current_player: Color) -> Result<Self> {
        Self::ensure_kings(&board)?;

        let mut state = Self {
            board,
            current_player,
            move_history: Vec::new(),
            in_check: false,
            checkmate: false,
            stalemate: false,
            phase: GamePhase::Playing,
            winner: None,
        };
        state.recompute_flags();
        Ok(state)
    }

    /// 校验双方的王都在棋盘上 (不变量, 缺失为致命错误)
    fn ensure_kings(board: &Board) -> Result<()> {
        for color in [Color::White, Color::Black] {
            if board.find_king(color).is_none() {
                return Err(ChessError::NoKingFound(color));
            }
        }
        Ok(())
    }

    /// 重算 `in_check` / `checkmate` / `stalemate` / `phase` / `winner`
    fn recompute_flags(&mut self) {
        self.in_check = MoveGenerator::is_in_check(&self.board, self.current_player);
        let has_moves = !MoveGenerator::generate_legal(&self.board, self.current_player).is_empty();

        if has_moves {
            self.checkmate = false;
            self.stalemate = false;
            self.phase = GamePhase::Playing;
            self.winner = None;
        } else if self.in_check {
            self.checkmate = true;
            self.stalemate = false;
            self.phase = GamePhase::Ended;
            self.winner = Some(self.current_player.opponent());
        } else {
            self.checkmate = false;
            self.stalemate = true;
            self.phase = GamePhase::Ended;
            self.winner = None;
        }
    }

    /// 指定格子上当前走子方棋子的合法走法
    ///
    /// 空格、对方棋子或已结束的对局返回空集; 王缺失返回 `NoKingFound`。
    pub fn legal_moves_for(&self, pos: Position) -> Result<Vec<Move>> {
        Self::ensure_kings(&self.board)?;

        if self.phase == GamePhase::Ended {
            return Ok(Vec::new());
        }
        match self.board.get(pos) {
            Some(piece) if piece.color == self.current_player => {
                Ok(MoveGenerator::legal_moves_from(&self.board, pos))
            }
            _ => Ok(Vec::new()),
        }
    }

    /// 当前走子方的全部合法走法
    pub fn legal_moves(&self) -> Result<Vec<Move>> {
        Self::ensure_kings(&self.board)?;

        if self.phase == GamePhase::Ended {
            return Ok(Vec::new());
        }
        Ok(MoveGenerator::generate_legal(&self.board, self.current_player))
    }

    /// 应用一个走法, 返回新的对局状态
    ///
    /// 即使调用方已经过滤过, 这里仍会校验走法在合法集合内
    /// (纵深防御, 引擎不信任外部协作者直接篡改棋盘);
    /// 非法走法被拒绝且不产生任何副作用。
    pub fn make_move(&self, mv: &Move) -> Result<GameState> {
        if self.phase == GamePhase::Ended {
            return Err(ChessError::GameOver);
        }
        Self::ensure_kings(&self.board)?;

        let piece = self
            .board
            .get(mv.from)
            .ok_or(ChessError::NoPiece {
                row: mv.from.row,
                col: mv.from.col,
            })?;
        if piece.color != self.current_player {
            return Err(ChessError::NotYourTurn(piece.color));
        }

        // 在合法集合中查找同一动作, 并以生成器产出的版本为准应用
        let candidates = MoveGenerator::legal_moves_from(&self.board, mv.from);
        let chosen = match candidates.iter().find(|c| c.same_action(mv)) {
            Some(chosen) => *chosen,
            None => {
                warn!(
                    "rejected illegal move {} for {:?}",
                    mv, self.current_player
                );
                return Err(ChessError::IllegalMove {
                    from_row: mv.from.row,
                    from_col: mv.from.col,
                    to_row: mv.to.row,
                    to_col: mv.to.col,
                });
            }
        };

        let mut board = self.board.clone();
        chosen.apply_to(&mut board);

        let mut move_history = self.move_history.clone();
        move_history.push(chosen);

        let mut next = GameState {
            board,
            current_player: self.current_player.opponent(),
            move_history,
            in_check: false,
            checkmate: false,
            stalemate: false,
            phase: GamePhase::Playing,
            winner: None,
        };
        next.recompute_flags();

        debug_assert!(
            Self::ensure_kings(&next.board).is_ok(),
            "make_move produced a state without both kings"
        );
        debug!(
            "applied move {} ({} plies), next to move {:?}",
            chosen,
            next.move_history.len(),
            next.current_player
        );
        Ok(next)
    }

    /// 已走的总步数 (校验和的一部分)
    pub fn move_count(&self) -> usize {
        self.move_history.len()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}
