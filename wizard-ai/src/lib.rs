//! 巫师棋 AI 引擎
//!
//! 包含:
//! - 棋局评估函数
//! - Minimax + Alpha-Beta 搜索
//! - 迭代加深与静态搜索
//! - 取消令牌与时间预算
//! - 走法提示

mod evaluate;
mod hint;
mod search;

pub use evaluate::Evaluator;
pub use hint::{hint, HintInfo, HINT_DEPTH};
pub use search::{AiConfig, AiEngine, CancelToken, Difficulty, SearchError, MATE_SCORE};
