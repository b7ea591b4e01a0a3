//! 核心常量定义

/// 棋盘边长 (10x10 变体)
pub const BOARD_SIZE: usize = 10;

/// 格子总数
pub const SQUARE_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// 巫师能力半径 (Chebyshev 距离)
pub const WIZARD_RANGE: i8 = 2;

/// 王车易位时王朝车方向移动的格数 (变体规则: 3 格而非标准的 2 格)
pub const CASTLING_KING_STEPS: i8 = 3;

/// 白方升变行
pub const WHITE_PROMOTION_ROW: u8 = 0;

/// 黑方升变行
pub const BLACK_PROMOTION_ROW: u8 = 9;
