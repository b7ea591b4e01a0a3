//! 错误类型定义

use thiserror::Error;

use crate::piece::Color;

/// 规则引擎错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChessError {
    /// 无效的位置
    #[error("Invalid position: ({row}, {col})")]
    InvalidPosition { row: i8, col: i8 },

    /// 指定位置没有棋子
    #[error("No piece at position ({row}, {col})")]
    NoPiece { row: u8, col: u8 },

    /// 走法不在合法走法集合内 (状态保持不变)
    #[error("Illegal move: from ({from_row}, {from_col}) to ({to_row}, {to_col})")]
    IllegalMove {
        from_row: u8,
        from_col: u8,
        to_row: u8,
        to_col: u8,
    },

    /// 不是该阵营的回合
    #[error("Not {0:?}'s turn")]
    NotYourTurn(Color),

    /// 棋盘上找不到王 (不变量被破坏, 致命错误, 必须中止后续转移)
    #[error("No {0:?} king found on board: state is corrupted")]
    NoKingFound(Color),

    /// 游戏已结束
    #[error("Game is already over")]
    GameOver,

    /// 无效的 FEN 字符串
    #[error("Invalid FEN string: {reason}")]
    InvalidFen { reason: String },
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, ChessError>;
