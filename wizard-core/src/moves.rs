//! 走法生成和验证
//!
//! `MoveGenerator` 只依赖 `Board` 与阵营, 是纯函数集合;
//! 带回合/终局语义的入口在 `state` 模块的 `GameState` 上。

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::constants::{
    BLACK_PROMOTION_ROW, CASTLING_KING_STEPS, WHITE_PROMOTION_ROW, WIZARD_RANGE,
};
use crate::piece::{Color, Piece, PieceKind, Position};

/// 八个方向 (行增量, 列增量), 车象后王巫师共用
const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// 直线方向 (车)
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// 斜线方向 (象)
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// 马的跳跃偏移表
const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// 升变目标, 按生成顺序固定 (巫师不可作为升变目标)
const PROMOTION_KINDS: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

/// 王车易位中车的配套移动
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RookMove {
    pub from: Position,
    pub to: Position,
}

/// 走法
///
/// `is_wizard_teleport` 和 `is_wizard_attack` 互斥, 且仅对巫师成立;
/// 远程攻击不改变巫师自身位置, `to` 记录被吃子所在格。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 起始位置
    pub from: Position,
    /// 目标位置
    pub to: Position,
    /// 走动的棋子 (走子前的快照)
    pub piece: Piece,
    /// 被吃的棋子 (如果有)
    pub captured: Option<Piece>,
    /// 巫师传送 (目标格必须为空)
    pub is_wizard_teleport: bool,
    /// 巫师远程攻击 (原地吃子)
    pub is_wizard_attack: bool,
    /// 升变目标
    pub promotion: Option<PieceKind>,
    /// 王车易位
    pub is_castling: bool,
    /// 易位时车的移动
    pub rook_move: Option<RookMove>,
}

impl Move {
    /// 创建普通走法
    pub fn new(from: Position, to: Position, piece: Piece) -> Self {
        Self {
            from,
            to,
            piece,
            captured: None,
            is_wizard_teleport: false,
            is_wizard_attack: false,
            promotion: None,
            is_castling: false,
            rook_move: None,
        }
    }

    /// 创建带吃子的走法
    pub fn with_capture(from: Position, to: Position, piece: Piece, captured: Piece) -> Self {
        Self {
            captured: Some(captured),
            ..Self::new(from, to, piece)
        }
    }

    /// 创建巫师传送走法
    pub fn wizard_teleport(from: Position, to: Position, piece: Piece) -> Self {
        Self {
            is_wizard_teleport: true,
            ..Self::new(from, to, piece)
        }
    }

    /// 创建巫师远程攻击走法
    pub fn wizard_attack(from: Position, target: Position, piece: Piece, captured: Piece) -> Self {
        Self {
            captured: Some(captured),
            is_wizard_attack: true,
            ..Self::new(from, target, piece)
        }
    }

    /// 创建升变走法
    pub fn with_promotion(
        from: Position,
        to: Position,
        piece: Piece,
        captured: Option<Piece>,
        kind: PieceKind,
    ) -> Self {
        Self {
            captured,
            promotion: Some(kind),
            ..Self::new(from, to, piece)
        }
    }

    /// 创建王车易位走法
    pub fn castling(from: Position, to: Position, piece: Piece, rook_move: RookMove) -> Self {
        Self {
            is_castling: true,
            rook_move: Some(rook_move),
            ..Self::new(from, to, piece)
        }
    }

    /// 判断两个走法是否描述同一动作 (忽略棋子快照差异, 用于成员校验)
    pub fn same_action(&self, other: &Move) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.is_wizard_teleport == other.is_wizard_teleport
            && self.is_wizard_attack == other.is_wizard_attack
            && self.is_castling == other.is_castling
            && self.promotion == other.promotion
    }

    /// 将走法作用到棋盘上 (不检查合法性)
    pub fn apply_to(&self, board: &mut Board) {
        if self.is_wizard_attack {
            // 远程攻击: 只清除目标格, 巫师原地不动, has_moved 不变
            board.set(self.to, None);
            return;
        }

        let mut piece = self.piece;
        piece.has_moved = true;
        if let Some(kind) = self.promotion {
            piece.kind = kind;
        }
        board.set(self.from, None);
        board.set(self.to, Some(piece));

        if let Some(rook_move) = self.rook_move {
            if let Some(mut rook) = board.get(rook_move.from) {
                rook.has_moved = true;
                board.set(rook_move.from, None);
                board.set(rook_move.to, Some(rook));
            }
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_wizard_attack {
            write!(f, "{} x {} (ranged)", self.from, self.to)
        } else if self.is_castling {
            write!(f, "{} -> {} (castling)", self.from, self.to)
        } else {
            write!(f, "{} -> {}", self.from, self.to)
        }
    }
}

/// 走法生成器
pub struct MoveGenerator;

impl MoveGenerator {
    /// 生成指定阵营的所有伪合法走法 (不考虑被将军, 不含易位)
    pub fn generate_pseudo_legal(board: &Board, color: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);

        for (pos, piece) in board.pieces(color) {
            Self::generate_piece_moves(board, pos, piece, &mut moves);
        }

        moves
    }

    /// 生成指定阵营的所有合法走法 (过滤掉送王的走法, 追加易位)
    pub fn generate_legal(board: &Board, color: Color) -> Vec<Move> {
        let mut moves: Vec<Move> = Self::generate_pseudo_legal(board, color)
            .into_iter()
            .filter(|mv| Self::leaves_king_safe(board, mv, color))
            .collect();

        Self::generate_castling_moves(board, color, &mut moves);
        moves
    }

    /// 生成指定格子上棋子的所有合法走法
    pub fn legal_moves_from(board: &Board, pos: Position) -> Vec<Move> {
        let piece = match board.get(pos) {
            Some(piece) => piece,
            None => return Vec::new(),
        };

        let mut pseudo = Vec::with_capacity(32);
        Self::generate_piece_moves(board, pos, piece, &mut pseudo);

        let mut moves: Vec<Move> = pseudo
            .into_iter()
            .filter(|mv| Self::leaves_king_safe(board, mv, piece.color))
            .collect();

        if piece.kind == PieceKind::King {
            Self::generate_castling_moves(board, piece.color, &mut moves);
        }
        moves
    }

    /// 在临时棋盘上模拟走法, 检查己方王是否安全 (不触碰真实状态)
    fn leaves_king_safe(board: &Board, mv: &Move, color: Color) -> bool {
        let mut test_board = board.clone();
        mv.apply_to(&mut test_board);
        !Self::is_in_check(&test_board, color)
    }

    /// 生成指定棋子的所有伪合法走法
    fn generate_piece_moves(board: &Board, pos: Position, piece: Piece, moves: &mut Vec<Move>) {
        match piece.kind {
            PieceKind::Rook => Self::generate_sliding_moves(board, pos, piece, &ROOK_DIRECTIONS, moves),
            PieceKind::Bishop => {
                Self::generate_sliding_moves(board, pos, piece, &BISHOP_DIRECTIONS, moves)
            }
            PieceKind::Queen => Self::generate_sliding_moves(board, pos, piece, &ALL_DIRECTIONS, moves),
            PieceKind::Knight => Self::generate_knight_moves(board, pos, piece, moves),
            PieceKind::King => Self::generate_king_moves(board, pos, piece, moves),
            PieceKind::Pawn => Self::generate_pawn_moves(board, pos, piece, moves),
            PieceKind::Wizard => Self::generate_wizard_moves(board, pos, piece, moves),
        }
    }

    /// 生成滑行棋子 (车/象/后) 的走法: 沿射线直到被阻挡
    fn generate_sliding_moves(
        board: &Board,
        pos: Position,
        piece: Piece,
        directions: &[(i8, i8)],
        moves: &mut Vec<Move>,
    ) {
        for &(dr, dc) in directions {
            let mut current = pos;
            while let Some(to) = current.offset(dr, dc) {
                if let Some(target) = board.get(to) {
                    // 遇到棋子: 敌方可吃, 己方阻挡
                    if target.color != piece.color {
                        moves.push(Move::with_capture(pos, to, piece, target));
                    }
                    break;
                } else {
                    moves.push(Move::new(pos, to, piece));
                }
                current = to;
            }
        }
    }

    /// 生成马的走法 (跳跃, 无蹩腿)
    fn generate_knight_moves(board: &Board, pos: Position, piece: Piece, moves: &mut Vec<Move>) {
        for (dr, dc) in KNIGHT_OFFSETS {
            if let Some(to) = pos.offset(dr, dc) {
                Self::try_add_move(board, pos, to, piece, moves);
            }
        }
    }

    /// 生成王的走法 (8 个相邻格, 易位不在此生成)
    fn generate_king_moves(board: &Board, pos: Position, piece: Piece, moves: &mut Vec<Move>) {
        for (dr, dc) in ALL_DIRECTIONS {
            if let Some(to) = pos.offset(dr, dc) {
                Self::try_add_move(board, pos, to, piece, moves);
            }
        }
    }

    /// 生成兵的走法
    fn generate_pawn_moves(board: &Board, pos: Position, piece: Piece, moves: &mut Vec<Move>) {
        let forward = piece.color.forward();

        // 前进一格
        if let Some(to) = pos.offset(forward, 0) {
            if board.get(to).is_none() {
                Self::push_pawn_move(pos, to, piece, None, moves);

                // 未移动过且路径畅通时, 前进两格
                if !piece.has_moved {
                    if let Some(two) = to.offset(forward, 0) {
                        if board.get(two).is_none() {
                            moves.push(Move::new(pos, two, piece));
                        }
                    }
                }
            }
        }

        // 斜向吃子
        for dc in [-1i8, 1i8] {
            if let Some(to) = pos.offset(forward, dc) {
                if let Some(target) = board.get(to) {
                    if target.color != piece.color {
                        Self::push_pawn_move(pos, to, piece, Some(target), moves);
                    }
                }
            }
        }
    }

    /// 添加兵的走法, 到达底线时展开为升变走法
    fn push_pawn_move(
        from: Position,
        to: Position,
        piece: Piece,
        captured: Option<Piece>,
        moves: &mut Vec<Move>,
    ) {
        let promotion_row = match piece.color {
            Color::White => WHITE_PROMOTION_ROW,
            Color::Black => BLACK_PROMOTION_ROW,
        };

        if to.row == promotion_row {
            for kind in PROMOTION_KINDS {
                moves.push(Move::with_promotion(from, to, piece, captured, kind));
            }
        } else {
            match captured {
                Some(target) => moves.push(Move::with_capture(from, to, piece, target)),
                None => moves.push(Move::new(from, to, piece)),
            }
        }
    }

    /// 生成巫师的走法
    ///
    /// (a) 传送: 沿 8 个方向至多 2 格, 落点必须为空 (可以跃过中间棋子);
    /// (b) 远程攻击: 吃掉 Chebyshev 距离 ≤ 2 内的任意敌子, 自身不动。
    /// 两类分别打标, 供转移引擎区分分支。
    fn generate_wizard_moves(board: &Board, pos: Position, piece: Piece, moves: &mut Vec<Move>) {
        // 传送集合
        for (dr, dc) in ALL_DIRECTIONS {
            for dist in 1..=WIZARD_RANGE {
                if let Some(to) = pos.offset(dr * dist, dc * dist) {
                    if board.get(to).is_none() {
                        moves.push(Move::wizard_teleport(pos, to, piece));
                    }
                }
            }
        }

        // 攻击集合 (行优先扫描保证顺序确定)
        for dr in -WIZARD_RANGE..=WIZARD_RANGE {
            for dc in -WIZARD_RANGE..=WIZARD_RANGE {
                if dr == 0 && dc == 0 {
                    continue;
                }
                if let Some(target_pos) = pos.offset(dr, dc) {
                    if let Some(target) = board.get(target_pos) {
                        if target.color != piece.color {
                            moves.push(Move::wizard_attack(pos, target_pos, piece, target));
                        }
                    }
                }
            }
        }
    }

    /// 尝试添加单格走法 (空位可走, 敌子可吃)
    fn try_add_move(board: &Board, from: Position, to: Position, piece: Piece, moves: &mut Vec<Move>) {
        if let Some(target) = board.get(to) {
            if target.color != piece.color {
                moves.push(Move::with_capture(from, to, piece, target));
            }
        } else {
            moves.push(Move::new(from, to, piece));
        }
    }

    /// 生成王车易位走法 (合法性条件在此一并检查)
    ///
    /// 变体规则: 王朝车的方向移动 3 格, 车落在王的内侧相邻格;
    /// 王和该车都未移动过, 王经过及落点的格子不受攻击, 两者之间无子。
    fn generate_castling_moves(board: &Board, color: Color, moves: &mut Vec<Move>) {
        let king_pos = match board.find_king(color) {
            Some(pos) => pos,
            None => return,
        };
        let king = match board.get(king_pos) {
            Some(piece) if piece.kind == PieceKind::King => piece,
            _ => return,
        };
        if king.has_moved {
            return;
        }

        let opponent = color.opponent();

        // 同一行上未移动过的己方车 (列升序, 顺序确定)
        for col in 0..crate::constants::BOARD_SIZE as u8 {
            let rook_pos = Position::new_unchecked(king_pos.row, col);
            let rook = match board.get(rook_pos) {
                Some(piece)
                    if piece.kind == PieceKind::Rook
                        && piece.color == color
                        && !piece.has_moved =>
                {
                    piece
                }
                _ => continue,
            };

            let dir = (rook_pos.col as i8 - king_pos.col as i8).signum();
            let king_to_col = king_pos.col as i8 + CASTLING_KING_STEPS * dir;
            let rook_to_col = king_to_col - dir;

            // 王的落点必须在王与车之间
            let between = |c: i8| {
                let (lo, hi) = if king_pos.col < rook_pos.col {
                    (king_pos.col as i8, rook_pos.col as i8)
                } else {
                    (rook_pos.col as i8, king_pos.col as i8)
                };
                c > lo && c < hi
            };
            if !between(king_to_col) {
                continue;
            }

            // 王与车之间不得有任何棋子
            let mut clear = true;
            let (lo, hi) = if king_pos.col < rook_pos.col {
                (king_pos.col + 1, rook_pos.col)
            } else {
                (rook_pos.col + 1, king_pos.col)
            };
            for c in lo..hi {
                if board.get(Position::new_unchecked(king_pos.row, c)).is_some() {
                    clear = false;
                    break;
                }
            }
            if !clear {
                continue;
            }

            // 王经过和落点的每一格 (含当前格) 都不得被攻击
            let mut safe = true;
            let mut c = king_pos.col as i8;
            loop {
                let square = Position::new_unchecked(king_pos.row, c as u8);
                if Self::is_square_attacked(board, square, opponent) {
                    safe = false;
                    break;
                }
                if c == king_to_col {
                    break;
                }
                c += dir;
            }
            if !safe {
                continue;
            }

            let king_to = Position::new_unchecked(king_pos.row, king_to_col as u8);
            let rook_to = Position::new_unchecked(king_pos.row, rook_to_col as u8);
            moves.push(Move::castling(
                king_pos,
                king_to,
                king,
                RookMove {
                    from: rook_pos,
                    to: rook_to,
                },
            ));
        }
    }

    /// 检查指定格子是否被某方攻击
    ///
    /// 巫师的远程攻击范围 (Chebyshev ≤ 2) 计为攻击; 传送落点不计,
    /// 因为传送要求落点为空, 不构成吃子威胁。
    pub fn is_square_attacked(board: &Board, square: Position, by_color: Color) -> bool {
        for (pos, piece) in board.pieces(by_color) {
            if Self::can_attack(board, pos, piece, square) {
                return true;
            }
        }
        false
    }

    /// 检查棋子是否能攻击到目标格
    fn can_attack(board: &Board, from: Position, piece: Piece, target: Position) -> bool {
        if from == target {
            return false;
        }
        match piece.kind {
            PieceKind::King => from.chebyshev(target) == 1,
            PieceKind::Wizard => from.chebyshev(target) <= WIZARD_RANGE as u8,
            PieceKind::Knight => {
                let dr = (target.row as i8 - from.row as i8).abs();
                let dc = (target.col as i8 - from.col as i8).abs();
                (dr == 1 && dc == 2) || (dr == 2 && dc == 1)
            }
            PieceKind::Pawn => {
                let dr = target.row as i8 - from.row as i8;
                let dc = (target.col as i8 - from.col as i8).abs();
                dr == piece.color.forward() && dc == 1
            }
            PieceKind::Rook => {
                (from.row == target.row || from.col == target.col)
                    && Self::ray_clear(board, from, target)
            }
            PieceKind::Bishop => {
                let dr = (target.row as i8 - from.row as i8).abs();
                let dc = (target.col as i8 - from.col as i8).abs();
                dr == dc && Self::ray_clear(board, from, target)
            }
            PieceKind::Queen => {
                let dr = (target.row as i8 - from.row as i8).abs();
                let dc = (target.col as i8 - from.col as i8).abs();
                (from.row == target.row || from.col == target.col || dr == dc)
                    && Self::ray_clear(board, from, target)
            }
        }
    }

    /// 检查 from 到 target 之间的射线是否畅通 (两端不含)
    fn ray_clear(board: &Board, from: Position, target: Position) -> bool {
        let dr = (target.row as i8 - from.row as i8).signum();
        let dc = (target.col as i8 - from.col as i8).signum();

        let mut current = from;
        while let Some(next) = current.offset(dr, dc) {
            if next == target {
                return true;
            }
            if board.get(next).is_some() {
                return false;
            }
            current = next;
        }
        false
    }

    /// 检查指定阵营是否被将军
    ///
    /// 王缺失属于被破坏的状态, 公共入口 (`GameState`) 会先以
    /// `NoKingFound` 拒绝; 这里在 debug 构建下断言。
    pub fn is_in_check(board: &Board, color: Color) -> bool {
        let king_pos = match board.find_king(color) {
            Some(pos) => pos,
            None => {
                debug_assert!(false, "is_in_check called without a {:?} king", color);
                return false;
            }
        };
        Self::is_square_attacked(board, king_pos, color.opponent())
    }

    /// 检查是否被将死 (被将军且无合法走法)
    pub fn is_checkmate(board: &Board, color: Color) -> bool {
        Self::is_in_check(board, color) && Self::generate_legal(board, color).is_empty()
    }

    /// 检查是否无子可动 (未被将军但无合法走法)
    pub fn is_stalemate(board: &Board, color: Color) -> bool {
        !Self::is_in_check(board, color) && Self::generate_legal(board, color).is_empty()
    }
}
