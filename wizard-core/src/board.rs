//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_SIZE, SQUARE_COUNT};
use crate::piece::{Color, Piece, PieceKind, Position};

/// 初始后排布局 (0-9 列): 车马象巫后王巫象马车
const BACK_RANK: [PieceKind; BOARD_SIZE] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Wizard,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Wizard,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// 10x10 棋盘, 索引为 row * 10 + col, 使用 Vec 以支持 serde
    squares: Vec<Option<Piece>>,
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![None; SQUARE_COUNT],
        }
    }

    /// 创建初始棋盘
    ///
    /// 黑方占据 0-1 行, 白方占据 8-9 行, 标识按放置顺序递增
    pub fn initial() -> Self {
        let mut board = Self::empty();
        let mut next_id = 0u32;

        // 黑方后排与兵
        for col in 0..BOARD_SIZE {
            board.set(
                Position::new_unchecked(0, col as u8),
                Some(Piece::new(BACK_RANK[col], Color::Black, next_id)),
            );
            next_id += 1;
        }
        for col in 0..BOARD_SIZE {
            board.set(
                Position::new_unchecked(1, col as u8),
                Some(Piece::new(PieceKind::Pawn, Color::Black, next_id)),
            );
            next_id += 1;
        }

        // 白方兵与后排
        for col in 0..BOARD_SIZE {
            board.set(
                Position::new_unchecked(8, col as u8),
                Some(Piece::new(PieceKind::Pawn, Color::White, next_id)),
            );
            next_id += 1;
        }
        for col in 0..BOARD_SIZE {
            board.set(
                Position::new_unchecked(9, col as u8),
                Some(Piece::new(BACK_RANK[col], Color::White, next_id)),
            );
            next_id += 1;
        }

        board
    }

    /// 获取指定位置的棋子
    pub fn get(&self, pos: Position) -> Option<Piece> {
        if pos.is_valid() {
            self.squares[pos.to_index()]
        } else {
            None
        }
    }

    /// 设置指定位置的棋子
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        if pos.is_valid() {
            self.squares[pos.to_index()] = piece;
        }
    }

    /// 查找指定阵营的王的位置
    pub fn find_king(&self, color: Color) -> Option<Position> {
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let pos = Position::new_unchecked(row as u8, col as u8);
                if let Some(piece) = self.get(pos) {
                    if piece.kind == PieceKind::King && piece.color == color {
                        return Some(pos);
                    }
                }
            }
        }
        None
    }

    /// 获取指定阵营的所有棋子位置 (行优先顺序, 枚举顺序确定)
    pub fn pieces(&self, color: Color) -> Vec<(Position, Piece)> {
        let mut result = Vec::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let pos = Position::new_unchecked(row as u8, col as u8);
                if let Some(piece) = self.get(pos) {
                    if piece.color == color {
                        result.push((pos, piece));
                    }
                }
            }
        }
        result
    }

    /// 获取所有棋子 (行优先顺序)
    pub fn all_pieces(&self) -> Vec<(Position, Piece)> {
        let mut result = Vec::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let pos = Position::new_unchecked(row as u8, col as u8);
                if let Some(piece) = self.get(pos) {
                    result.push((pos, piece));
                }
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_board() {
        let board = Board::initial();

        // 白王在 (9, 5), 黑王在 (0, 5)
        let king = board.get(Position::new_unchecked(9, 5)).unwrap();
        assert_eq!(king.kind, PieceKind::King);
        assert_eq!(king.color, Color::White);

        let king = board.get(Position::new_unchecked(0, 5)).unwrap();
        assert_eq!(king.kind, PieceKind::King);
        assert_eq!(king.color, Color::Black);

        // 每方两个巫师, 位于 3 和 6 列
        for col in [3u8, 6u8] {
            assert_eq!(
                board.get(Position::new_unchecked(0, col)).unwrap().kind,
                PieceKind::Wizard
            );
            assert_eq!(
                board.get(Position::new_unchecked(9, col)).unwrap().kind,
                PieceKind::Wizard
            );
        }

        // 满排兵
        for col in 0..10 {
            let black_pawn = board.get(Position::new_unchecked(1, col)).unwrap();
            assert_eq!(black_pawn.kind, PieceKind::Pawn);
            assert_eq!(black_pawn.color, Color::Black);

            let white_pawn = board.get(Position::new_unchecked(8, col)).unwrap();
            assert_eq!(white_pawn.kind, PieceKind::Pawn);
            assert_eq!(white_pawn.color, Color::White);
        }

        // 中间 6 行为空
        for row in 2..8 {
            for col in 0..10 {
                assert!(board.get(Position::new_unchecked(row, col)).is_none());
            }
        }
    }

    #[test]
    fn test_identities_unique() {
        let board = Board::initial();
        let mut ids: Vec<u32> = board
            .all_pieces()
            .iter()
            .map(|(_, p)| p.identity)
            .collect();
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count, "棋子标识必须唯一");
        assert_eq!(count, 40);
    }

    #[test]
    fn test_find_king() {
        let board = Board::initial();
        assert_eq!(
            board.find_king(Color::White),
            Some(Position::new_unchecked(9, 5))
        );
        assert_eq!(
            board.find_king(Color::Black),
            Some(Position::new_unchecked(0, 5))
        );

        let empty = Board::empty();
        assert_eq!(empty.find_king(Color::White), None);
    }

    #[test]
    fn test_pieces_deterministic_order() {
        let board = Board::initial();
        let first = board.pieces(Color::White);
        let second = board.pieces(Color::White);
        assert_eq!(first, second);
        assert_eq!(first.len(), 20);
    }
}
