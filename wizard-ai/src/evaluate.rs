//! 棋局评估函数

use wizard_core::{Board, Color, Piece, PieceKind, Position, BOARD_SIZE};

/// 评估器
pub struct Evaluator;

/// 棋子位置分值表 (白方视角, 黑方需要镜像)
///
/// 索引为 row * 10 + col; 白方朝 0 行推进, 表的上边是敌方底线。
/// 位置分远小于子力分, 保证子力差始终主导评估。
mod position_tables {
    /// 兵的位置分值 (越接近升变行价值越高)
    pub const PAWN: [i32; 100] = [
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0, // 升变后不再是兵
        50, 60, 70, 80, 90, 90, 80, 70, 60, 50,
        40, 50, 60, 70, 80, 80, 70, 60, 50, 40,
        30, 40, 50, 60, 70, 70, 60, 50, 40, 30,
        20, 30, 40, 50, 60, 60, 50, 40, 30, 20,
        10, 20, 30, 40, 50, 50, 40, 30, 20, 10,
         5, 10, 15, 20, 25, 25, 20, 15, 10,  5,
         2,  4,  6, 10, 12, 12, 10,  6,  4,  2,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
         0,  0,  0,  0,  0,  0,  0,  0,  0,  0,
    ];

    /// 马的位置分值 (中心控制)
    pub const KNIGHT: [i32; 100] = [
         0,  5, 10, 15, 15, 15, 15, 10,  5,  0,
         5, 15, 25, 30, 30, 30, 30, 25, 15,  5,
        10, 25, 35, 40, 40, 40, 40, 35, 25, 10,
        15, 30, 40, 45, 45, 45, 45, 40, 30, 15,
        15, 30, 40, 45, 50, 50, 45, 40, 30, 15,
        15, 30, 40, 45, 50, 50, 45, 40, 30, 15,
        15, 30, 40, 45, 45, 45, 45, 40, 30, 15,
        10, 25, 35, 40, 40, 40, 40, 35, 25, 10,
         5, 15, 25, 30, 30, 30, 30, 25, 15,  5,
         0,  5, 10, 15, 15, 15, 15, 10,  5,  0,
    ];

    /// 巫师的位置分值 (中心附近传送/攻击覆盖面最大)
    pub const WIZARD: [i32; 100] = [
         0,  4,  8, 12, 12, 12, 12,  8,  4,  0,
         4, 12, 20, 24, 24, 24, 24, 20, 12,  4,
         8, 20, 28, 32, 32, 32, 32, 28, 20,  8,
        12, 24, 32, 36, 36, 36, 36, 32, 24, 12,
        12, 24, 32, 36, 40, 40, 36, 32, 24, 12,
        12, 24, 32, 36, 40, 40, 36, 32, 24, 12,
        12, 24, 32, 36, 36, 36, 36, 32, 24, 12,
         8, 20, 28, 32, 32, 32, 32, 28, 20,  8,
         4, 12, 20, 24, 24, 24, 24, 20, 12,  4,
         0,  4,  8, 12, 12, 12, 12,  8,  4,  0,
    ];

    /// 王的位置分值 (留在底线两翼最安全, 易位落点加成)
    pub const KING: [i32; 100] = [
        -40, -40, -40, -40, -40, -40, -40, -40, -40, -40,
        -40, -40, -40, -40, -40, -40, -40, -40, -40, -40,
        -35, -35, -35, -35, -35, -35, -35, -35, -35, -35,
        -30, -30, -30, -30, -30, -30, -30, -30, -30, -30,
        -25, -25, -25, -25, -25, -25, -25, -25, -25, -25,
        -20, -20, -20, -20, -20, -20, -20, -20, -20, -20,
        -15, -15, -15, -15, -15, -15, -15, -15, -15, -15,
        -10, -10, -10, -10, -10, -10, -10, -10, -10, -10,
          0,   0,   0,   0,   0,   0,   0,   0,   0,   0,
         10,  15,  30,  10,   0,   0,  10,  30,  15,  10,
    ];
}

impl Evaluator {
    /// 评估棋局 (白方视角, 正值对白方有利)
    pub fn evaluate(board: &Board) -> i32 {
        let mut score = 0;

        for (pos, piece) in board.all_pieces() {
            let piece_score = Self::evaluate_piece(pos, piece);
            match piece.color {
                Color::White => score += piece_score,
                Color::Black => score -= piece_score,
            }
        }

        score
    }

    /// 评估单个棋子的价值 (子力分 + 位置分)
    fn evaluate_piece(pos: Position, piece: Piece) -> i32 {
        piece.kind.value() + Self::position_bonus(pos, piece)
    }

    /// 获取位置加成分
    fn position_bonus(pos: Position, piece: Piece) -> i32 {
        let index = match piece.color {
            Color::White => pos.row as usize * BOARD_SIZE + pos.col as usize,
            // 黑方镜像 (行坐标翻转)
            Color::Black => {
                (BOARD_SIZE - 1 - pos.row as usize) * BOARD_SIZE + pos.col as usize
            }
        };

        match piece.kind {
            PieceKind::Pawn => position_tables::PAWN[index],
            PieceKind::Knight => position_tables::KNIGHT[index],
            PieceKind::Wizard => position_tables::WIZARD[index],
            PieceKind::King => position_tables::KING[index],
            // 滑行棋子暂不加位置分
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wizard_core::Fen;

    #[test]
    fn test_initial_evaluation_balanced() {
        // 子力与位置分都对称, 初始局面评估为零
        let board = Board::initial();
        assert_eq!(Evaluator::evaluate(&board), 0);
    }

    #[test]
    fn test_material_advantage() {
        // 黑方少一个车; 滑行棋子无位置分, 分差恰为一个车的子力
        let fen = "1nbwqkwbnr/pppppppppp/10/10/10/10/10/10/PPPPPPPPPP/RNBWQKWBNR w";
        let state = Fen::parse(fen).unwrap();
        assert_eq!(Evaluator::evaluate(&state.board), PieceKind::Rook.value());
    }

    #[test]
    fn test_capture_is_monotonic() {
        // 移除任意黑子后, 白方视角分数不得降低
        let board = Board::initial();
        let base = Evaluator::evaluate(&board);

        for (pos, piece) in board.all_pieces() {
            if piece.color == Color::Black && piece.kind != PieceKind::King {
                let mut without = board.clone();
                without.set(pos, None);
                assert!(
                    Evaluator::evaluate(&without) >= base,
                    "移除 {:?} 后分数下降",
                    piece.kind
                );
            }
        }
    }

    #[test]
    fn test_pawn_advancement_bonus() {
        // 推进中的白兵比未动的白兵价值高
        let advanced = Fen::parse("5k4/10/10/4P5/10/10/10/10/10/5K4 w").unwrap();
        let home = Fen::parse("5k4/10/10/10/10/10/10/10/4P5/5K4 w").unwrap();
        assert!(
            Evaluator::evaluate(&advanced.board) > Evaluator::evaluate(&home.board)
        );
    }

    #[test]
    fn test_knight_center_bonus() {
        let center = Fen::parse("5k4/10/10/10/4N5/10/10/10/10/5K4 w").unwrap();
        let corner = Fen::parse("5k4/10/10/10/10/10/10/10/10/N4K4 w").unwrap();
        assert!(
            Evaluator::evaluate(&center.board) > Evaluator::evaluate(&corner.board)
        );
    }

    #[test]
    fn test_wizard_center_bonus() {
        let center = Fen::parse("5k4/10/10/10/4W5/10/10/10/10/5K4 w").unwrap();
        let corner = Fen::parse("5k4/10/10/10/10/10/10/10/10/W4K4 w").unwrap();
        assert!(
            Evaluator::evaluate(&center.board) > Evaluator::evaluate(&corner.board)
        );
    }

    #[test]
    fn test_black_mirror_symmetric() {
        // 白兵在 (3,4) 与黑兵在 (6,4) 位置分互为镜像
        let fen = "5k4/10/10/4P5/10/10/4p5/10/10/5K4 w";
        let state = Fen::parse(fen).unwrap();
        assert_eq!(Evaluator::evaluate(&state.board), 0);
    }

    #[test]
    fn test_exposed_king_penalty() {
        // 王走到中心比留在底线危险
        let exposed = Fen::parse("5k4/10/10/10/10/4K5/10/10/10/10 w").unwrap();
        let home = Fen::parse("5k4/10/10/10/10/10/10/10/10/4K5 w").unwrap();
        assert!(
            Evaluator::evaluate(&home.board) > Evaluator::evaluate(&exposed.board)
        );
    }
}
