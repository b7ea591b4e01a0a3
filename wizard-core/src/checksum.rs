//! 状态校验和
//!
//! 基于 Zobrist 哈希: 为每个 (阵营, 棋子类型, 格子) 组合生成固定的
//! 随机键, 棋盘哈希是在场棋子键的异或, 天然与枚举顺序无关。
//! 摘要输入仅含棋盘布局、走子方和总步数 —— 不含 `identity` 和
//! 时间戳等非确定性字段, 保证逐子相同的状态产生相同的校验和。
//! 由外部网络对账层消费, 核心只负责计算。

use std::sync::OnceLock;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::constants::SQUARE_COUNT;
use crate::piece::{Color, PieceKind};
use crate::state::GameState;

/// 步数混入用的奇数乘子 (splitmix64 的增量常数)
const MOVE_COUNT_MULTIPLIER: u64 = 0x9E37_79B9_7F4A_7C15;

/// 状态校验和
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Checksum(pub u64);

impl std::fmt::Display for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Zobrist 键表
///
/// 使用固定种子生成, 跨进程/跨平台保证一致。
pub struct ZobristTable {
    /// 棋子键 [阵营][棋子类型][格子]
    pieces: [[[u64; SQUARE_COUNT]; 7]; 2],
    /// 黑方走子键
    side_to_move: u64,
}

impl ZobristTable {
    /// 创建键表 (固定种子保证确定性)
    pub fn new() -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(0x5749_5A41_5244_3130);

        let mut pieces = [[[0u64; SQUARE_COUNT]; 7]; 2];
        for side in pieces.iter_mut() {
            for kind in side.iter_mut() {
                for key in kind.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        Self {
            pieces,
            side_to_move: rng.gen(),
        }
    }

    /// 计算棋盘 + 走子方 + 步数的完整哈希
    pub fn hash(&self, board: &Board, current_player: Color, move_count: usize) -> u64 {
        let mut hash = 0u64;

        for (pos, piece) in board.all_pieces() {
            let color_idx = color_index(piece.color);
            let kind_idx = kind_index(piece.kind);
            hash ^= self.pieces[color_idx][kind_idx][pos.to_index()];
        }

        if current_player == Color::Black {
            hash ^= self.side_to_move;
        }

        hash ^ (move_count as u64).wrapping_mul(MOVE_COUNT_MULTIPLIER)
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}

/// 计算对局状态的校验和
pub fn checksum(state: &GameState) -> Checksum {
    static TABLE: OnceLock<ZobristTable> = OnceLock::new();
    let table = TABLE.get_or_init(ZobristTable::new);
    Checksum(table.hash(&state.board, state.current_player, state.move_count()))
}

impl GameState {
    /// 当前状态的校验和
    pub fn checksum(&self) -> Checksum {
        checksum(self)
    }
}

#[inline]
fn color_index(color: Color) -> usize {
    match color {
        Color::White => 0,
        Color::Black => 1,
    }
}

#[inline]
fn kind_index(kind: PieceKind) -> usize {
    match kind {
        PieceKind::Pawn => 0,
        PieceKind::Rook => 1,
        PieceKind::Knight => 2,
        PieceKind::Bishop => 3,
        PieceKind::Queen => 4,
        PieceKind::King => 5,
        PieceKind::Wizard => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{Piece, Position};

    #[test]
    fn test_checksum_stable() {
        let state = GameState::initial();
        assert_eq!(checksum(&state), checksum(&state));

        let table1 = ZobristTable::new();
        let table2 = ZobristTable::new();
        assert_eq!(
            table1.hash(&state.board, state.current_player, 0),
            table2.hash(&state.board, state.current_player, 0)
        );
    }

    #[test]
    fn test_identical_construction_same_checksum() {
        // 独立构造、逐子相同但标识不同的两个状态, 校验和必须一致
        let state1 = GameState::initial();

        let mut board = Board::empty();
        for (pos, piece) in state1.board.all_pieces() {
            let mut clone = Piece::new(piece.kind, piece.color, piece.identity + 1000);
            clone.has_moved = piece.has_moved;
            board.set(pos, Some(clone));
        }
        let state2 = GameState::from_board(board, Color::White).unwrap();

        assert_eq!(checksum(&state1), checksum(&state2));
    }

    #[test]
    fn test_single_piece_change_alters_checksum() {
        let state1 = GameState::initial();

        let mut board = state1.board.clone();
        let pawn = board.get(Position::new_unchecked(8, 4)).unwrap();
        board.set(Position::new_unchecked(8, 4), None);
        board.set(Position::new_unchecked(6, 4), Some(pawn));
        let state2 = GameState::from_board(board, Color::White).unwrap();

        assert_ne!(checksum(&state1), checksum(&state2));
    }

    #[test]
    fn test_side_to_move_alters_checksum() {
        let state1 = GameState::initial();
        let state2 = GameState::from_board(state1.board.clone(), Color::Black).unwrap();
        assert_ne!(checksum(&state1), checksum(&state2));
    }

    #[test]
    fn test_move_count_alters_checksum() {
        let table = ZobristTable::new();
        let board = Board::initial();
        assert_ne!(
            table.hash(&board, Color::White, 0),
            table.hash(&board, Color::White, 2)
        );
    }

    #[test]
    fn test_checksum_tracks_make_move() {
        let state = GameState::initial();
        let mv = state.legal_moves().unwrap()[0];
        let next = state.make_move(&mv).unwrap();
        assert_ne!(state.checksum(), next.checksum());
    }
}
