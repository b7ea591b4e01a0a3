//! 搜索引擎
//!
//! 实现 Minimax (negamax 形式) + Alpha-Beta 剪枝 + 迭代加深。
//! 搜索只读取传入状态并在临时棋盘上模拟, 从不改写规范状态,
//! 因此取消/超时中断不会破坏任何共享数据。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use wizard_core::{Board, Color, GameState, Move, MoveGenerator};

use crate::evaluate::Evaluator;

/// 将死分值基数 (按距离将死的步数递减, 越快的杀法分越高)
pub const MATE_SCORE: i32 = 1_000_000;

/// 静态搜索 (只扩展吃子) 的最大追加深度
const QUIESCENCE_DEPTH: u8 = 4;

/// AI 难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// 简单: depth=2
    Easy,
    /// 中等: depth=3
    Medium,
    /// 困难: depth=5
    Hard,
}

/// AI 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub difficulty: Difficulty,
    pub max_depth: u8,
    pub time_limit_ms: u64,
}

impl AiConfig {
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                difficulty,
                max_depth: 2,
                time_limit_ms: 1000,
            },
            Difficulty::Medium => Self {
                difficulty,
                max_depth: 3,
                time_limit_ms: 3000,
            },
            Difficulty::Hard => Self {
                difficulty,
                max_depth: 5,
                time_limit_ms: 5000,
            },
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::from_difficulty(Difficulty::Medium)
    }
}

/// 搜索错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// 协作式取消: 不返回走法, 由调用方决定兜底策略
    #[error("search was cancelled")]
    Cancelled,

    /// 时间预算耗尽且第 1 层都未完成 (完成过的层会降级返回, 不报错)
    #[error("search timed out before completing depth 1")]
    Timeout,

    /// 没有合法走法 (将死或逼和局面)
    #[error("no legal moves available")]
    NoLegalMoves,

    /// 请求搜索的阵营不是当前走子方
    #[error("it is not {0:?}'s turn to move")]
    WrongTurn(Color),
}

/// 取消令牌: 调用方持有并在需要时置位, 搜索在节点边界检查
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求中止搜索
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// 搜索中断原因 (内部信号, 沿递归栈向上传播)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Interrupt {
    Cancelled,
    TimedOut,
}

/// AI 引擎
pub struct AiEngine {
    config: AiConfig,
    nodes_searched: u64,
}

impl AiEngine {
    /// 创建新的 AI 引擎
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            nodes_searched: 0,
        }
    }

    /// 从难度创建
    pub fn from_difficulty(difficulty: Difficulty) -> Self {
        Self::new(AiConfig::from_difficulty(difficulty))
    }

    /// 搜索最佳走法
    ///
    /// 迭代加深到 `depth` 层; 被中断的层整层作废, 只采用完整搜索过
    /// 的结果。同一状态和深度下两次调用返回完全相同的走法和分数
    /// (走法按生成顺序决胜, 无任何随机性)。
    pub fn best_move(
        &mut self,
        state: &GameState,
        depth: u8,
        color: Color,
        cancel: &CancelToken,
    ) -> Result<(Move, i32), SearchError> {
        if color != state.current_player {
            return Err(SearchError::WrongTurn(color));
        }

        self.nodes_searched = 0;
        let deadline = Instant::now() + Duration::from_millis(self.config.time_limit_ms);

        let mut moves = MoveGenerator::generate_legal(&state.board, color);
        if moves.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }
        order_moves(&mut moves);

        let mut best: Option<(Move, i32)> = None;

        for current_depth in 1..=depth.max(1) {
            if Instant::now() >= deadline {
                break;
            }

            match self.search_root(state, color, &moves, current_depth, deadline, cancel) {
                Ok((mv, score)) => {
                    debug!(
                        "depth {} complete: best {} score {} ({} nodes)",
                        current_depth, mv, score, self.nodes_searched
                    );
                    best = Some((mv, score));
                }
                Err(Interrupt::Cancelled) => return Err(SearchError::Cancelled),
                Err(Interrupt::TimedOut) => break,
            }
        }

        best.ok_or(SearchError::Timeout)
    }

    /// 根节点展开: 逐一模拟走法并取对手视角分数的相反数
    fn search_root(
        &mut self,
        state: &GameState,
        color: Color,
        moves: &[Move],
        depth: u8,
        deadline: Instant,
        cancel: &CancelToken,
    ) -> Result<(Move, i32), Interrupt> {
        let mut best_move = moves[0];
        let mut best_score = i32::MIN;
        let mut alpha = -MATE_SCORE;
        let beta = MATE_SCORE;

        for mv in moves {
            let mut board = state.board.clone();
            mv.apply_to(&mut board);

            let score = -self.alpha_beta(
                &board,
                color.opponent(),
                depth.saturating_sub(1),
                1,
                -beta,
                -alpha,
                deadline,
                cancel,
            )?;

            // 严格大于才更新: 同分时保留生成顺序更靠前的走法
            if score > best_score {
                best_score = score;
                best_move = *mv;
            }
            if score > alpha {
                alpha = score;
            }
        }

        Ok((best_move, best_score))
    }

    /// Alpha-Beta 搜索 (negamax, 返回走子方视角分数)
    #[allow(clippy::too_many_arguments)]
    fn alpha_beta(
        &mut self,
        board: &Board,
        to_move: Color,
        depth: u8,
        ply: u8,
        mut alpha: i32,
        beta: i32,
        deadline: Instant,
        cancel: &CancelToken,
    ) -> Result<i32, Interrupt> {
        self.nodes_searched += 1;

        if cancel.is_cancelled() {
            return Err(Interrupt::Cancelled);
        }
        if Instant::now() >= deadline {
            return Err(Interrupt::TimedOut);
        }

        let mut moves = MoveGenerator::generate_legal(board, to_move);

        // 终局节点: 将死记极值并按步数修正, 逼和记和棋
        if moves.is_empty() {
            if MoveGenerator::is_in_check(board, to_move) {
                return Ok(-(MATE_SCORE - ply as i32));
            }
            return Ok(0);
        }

        if depth == 0 {
            return self.quiescence(board, to_move, QUIESCENCE_DEPTH, ply, alpha, beta);
        }

        order_moves(&mut moves);

        for mv in moves {
            let mut next = board.clone();
            mv.apply_to(&mut next);

            let score = -self.alpha_beta(
                &next,
                to_move.opponent(),
                depth - 1,
                ply + 1,
                -beta,
                -alpha,
                deadline,
                cancel,
            )?;

            if score >= beta {
                return Ok(beta); // Beta 剪枝
            }
            if score > alpha {
                alpha = score;
            }
        }

        Ok(alpha)
    }

    /// 静态搜索 (只扩展吃子走法, 平抑水平线效应)
    fn quiescence(
        &mut self,
        board: &Board,
        to_move: Color,
        depth: u8,
        ply: u8,
        mut alpha: i32,
        beta: i32,
    ) -> Result<i32, Interrupt> {
        self.nodes_searched += 1;

        let stand_pat = self.evaluate_for(board, to_move);
        if depth == 0 {
            return Ok(stand_pat);
        }
        if stand_pat >= beta {
            return Ok(beta);
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut moves = MoveGenerator::generate_legal(board, to_move);
        if moves.is_empty() {
            if MoveGenerator::is_in_check(board, to_move) {
                return Ok(-(MATE_SCORE - ply as i32));
            }
            return Ok(0);
        }

        moves.retain(|m| m.captured.is_some());
        order_moves(&mut moves);

        for mv in moves {
            let mut next = board.clone();
            mv.apply_to(&mut next);

            let score = -self.quiescence(&next, to_move.opponent(), depth - 1, ply + 1, -beta, -alpha)?;

            if score >= beta {
                return Ok(beta);
            }
            if score > alpha {
                alpha = score;
            }
        }

        Ok(alpha)
    }

    /// 走子方视角的静态评估
    fn evaluate_for(&self, board: &Board, to_move: Color) -> i32 {
        let score = Evaluator::evaluate(board);
        match to_move {
            Color::White => score,
            Color::Black => -score,
        }
    }

    /// 获取上次搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}

/// 走法排序: 吃子在前 (按被吃子价值降序, 巫师远程攻击同样受益),
/// 稳定排序保证同值时保留生成顺序, 搜索结果可复现
fn order_moves(moves: &mut [Move]) {
    moves.sort_by_key(|m| -m.captured.map_or(0, |p| p.kind.value()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use wizard_core::{create_initial_state, Fen, PieceKind, Position};

    #[test]
    fn test_search_initial_position() {
        let state = create_initial_state();
        let mut engine = AiEngine::from_difficulty(Difficulty::Easy);
        let cancel = CancelToken::new();

        let (mv, _) = engine
            .best_move(&state, 2, Color::White, &cancel)
            .unwrap();
        assert!(engine.nodes_searched() > 0);
        // 返回的必须是合法走法
        let legal = state.legal_moves().unwrap();
        assert!(legal.iter().any(|m| m.same_action(&mv)));
    }

    #[test]
    fn test_search_deterministic() {
        let state = create_initial_state();
        let cancel = CancelToken::new();

        let mut engine1 = AiEngine::from_difficulty(Difficulty::Medium);
        let mut engine2 = AiEngine::from_difficulty(Difficulty::Medium);
        let first = engine1.best_move(&state, 3, Color::White, &cancel).unwrap();
        let second = engine2.best_move(&state, 3, Color::White, &cancel).unwrap();

        assert_eq!(first.0, second.0);
        assert_eq!(first.1, second.1);
    }

    #[test]
    fn test_search_takes_hanging_queen() {
        // 白车与无根黑后同列, 白吃后净胜子
        let fen = "5k4/10/10/10/10/q9/10/10/10/R4K4 w";
        let state = Fen::parse(fen).unwrap();
        let mut engine = AiEngine::from_difficulty(Difficulty::Easy);
        let cancel = CancelToken::new();

        let (mv, score) = engine.best_move(&state, 2, Color::White, &cancel).unwrap();
        assert_eq!(mv.captured.map(|p| p.kind), Some(PieceKind::Queen));
        assert!(score > 300, "吃后应明显领先: {}", score);
    }

    #[test]
    fn test_search_finds_mate_in_one() {
        // 白车沉底即将死: 黑王被己方兵封死
        let fen = "4k5/3ppp4/10/10/10/10/10/10/10/R4K4 w";
        let state = Fen::parse(fen).unwrap();
        let mut engine = AiEngine::from_difficulty(Difficulty::Medium);
        let cancel = CancelToken::new();

        let (mv, score) = engine.best_move(&state, 3, Color::White, &cancel).unwrap();
        assert_eq!(mv.to, Position::new_unchecked(0, 0));
        assert!(score > MATE_SCORE - 100, "将死应得到极值分: {}", score);
    }

    #[test]
    fn test_search_prefers_wizard_ranged_capture() {
        // 巫师原地吃车无任何风险, 深度 2 应选远程攻击
        let fen = "5k4/10/10/10/3r6/10/3W6/10/10/5K4 w";
        let state = Fen::parse(fen).unwrap();
        let mut engine = AiEngine::from_difficulty(Difficulty::Easy);
        let cancel = CancelToken::new();

        let (mv, _) = engine.best_move(&state, 2, Color::White, &cancel).unwrap();
        assert!(mv.is_wizard_attack);
        assert_eq!(mv.to, Position::new_unchecked(4, 3));
    }

    #[test]
    fn test_cancelled_search_returns_no_move() {
        let state = create_initial_state();
        let mut engine = AiEngine::from_difficulty(Difficulty::Hard);
        let cancel = CancelToken::new();
        cancel.cancel();

        let err = engine
            .best_move(&state, 5, Color::White, &cancel)
            .unwrap_err();
        assert_eq!(err, SearchError::Cancelled);
    }

    #[test]
    fn test_timeout_without_completed_depth() {
        let state = create_initial_state();
        let mut engine = AiEngine::new(AiConfig {
            difficulty: Difficulty::Easy,
            max_depth: 2,
            time_limit_ms: 0,
        });
        let cancel = CancelToken::new();

        let err = engine
            .best_move(&state, 2, Color::White, &cancel)
            .unwrap_err();
        assert_eq!(err, SearchError::Timeout);
    }

    #[test]
    fn test_no_legal_moves() {
        // 逼和局面: 黑方无子可动
        let fen = "k9/10/1Q8/10/10/10/10/10/10/9K b";
        let state = Fen::parse(fen).unwrap();
        let mut engine = AiEngine::from_difficulty(Difficulty::Easy);
        let cancel = CancelToken::new();

        let err = engine
            .best_move(&state, 2, Color::Black, &cancel)
            .unwrap_err();
        assert_eq!(err, SearchError::NoLegalMoves);
    }

    #[test]
    fn test_wrong_turn_rejected() {
        let state = create_initial_state();
        let mut engine = AiEngine::from_difficulty(Difficulty::Easy);
        let cancel = CancelToken::new();

        let err = engine
            .best_move(&state, 2, Color::Black, &cancel)
            .unwrap_err();
        assert_eq!(err, SearchError::WrongTurn(Color::Black));
    }

    #[test]
    fn test_search_does_not_mutate_state() {
        let state = create_initial_state();
        let before = state.checksum();
        let mut engine = AiEngine::from_difficulty(Difficulty::Easy);
        let cancel = CancelToken::new();

        engine.best_move(&state, 2, Color::White, &cancel).unwrap();
        assert_eq!(state.checksum(), before);
        assert!(state.move_history.is_empty());
    }

    #[test]
    fn test_search_then_apply_loop() {
        // 搜索结果可以直接喂给状态转移引擎, 连续对弈若干回合
        let mut state = create_initial_state();
        let mut engine = AiEngine::from_difficulty(Difficulty::Easy);
        let cancel = CancelToken::new();

        for _ in 0..4 {
            let color = state.current_player;
            let (mv, _) = engine.best_move(&state, 1, color, &cancel).unwrap();
            state = state.make_move(&mv).unwrap();
        }

        assert_eq!(state.move_history.len(), 4);
        assert_eq!(state.current_player, Color::White);
    }

    #[test]
    fn test_difficulty_config() {
        let easy = AiConfig::from_difficulty(Difficulty::Easy);
        assert_eq!(easy.max_depth, 2);

        let medium = AiConfig::from_difficulty(Difficulty::Medium);
        assert_eq!(medium.max_depth, 3);

        let hard = AiConfig::from_difficulty(Difficulty::Hard);
        assert_eq!(hard.max_depth, 5);
        assert_eq!(hard.time_limit_ms, 5000);
    }
}
