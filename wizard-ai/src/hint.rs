//! 提示功能
//!
//! 对当前走子方做一次浅层搜索, 返回推荐走法和人类可读的理由。
//! 提示只读取状态, 不会修改任何棋局数据。

use serde::Serialize;
use tracing::debug;

use wizard_core::{Color, GameState, Move, PieceKind};

use crate::search::{AiEngine, CancelToken, Difficulty, SearchError};

/// 提示使用的固定搜索深度 (浅层即可, 提示追求响应速度而非棋力)
pub const HINT_DEPTH: u8 = 2;

/// 提示结果
#[derive(Debug, Clone, Serialize)]
pub struct HintInfo {
    /// 推荐走法
    pub mv: Move,
    /// 搜索给出的局面分数 (走子方视角)
    pub score: i32,
    /// 推荐理由
    pub rationale: String,
}

/// 为指定阵营生成走法提示
pub fn hint(state: &GameState, color: Color) -> Result<HintInfo, SearchError> {
    let mut engine = AiEngine::from_difficulty(Difficulty::Easy);
    let cancel = CancelToken::new();
    let (mv, score) = engine.best_move(state, HINT_DEPTH, color, &cancel)?;

    let rationale = describe_move(&mv);
    debug!("hint for {:?}: {} ({})", color, mv, rationale);

    Ok(HintInfo {
        mv,
        score,
        rationale,
    })
}

/// 按走法特征生成推荐理由, 特殊走法优先于普通走法
fn describe_move(mv: &Move) -> String {
    if mv.is_wizard_attack {
        if let Some(captured) = mv.captured {
            return format!(
                "Wizard strikes the {} at {} without moving",
                kind_name(captured.kind),
                mv.to
            );
        }
    }
    if mv.is_wizard_teleport {
        return format!("Wizard teleports to {} to reposition", mv.to);
    }
    if mv.is_castling {
        return "Castle to tuck the king away and activate the rook".to_string();
    }
    if let Some(captured) = mv.captured {
        return format!(
            "Capture the {} at {} to win material",
            kind_name(captured.kind),
            mv.to
        );
    }
    if let Some(kind) = mv.promotion {
        return format!("Advance the pawn and promote to a {}", kind_name(kind));
    }
    match mv.piece.kind {
        PieceKind::King => format!("Move the king to {} for safety", mv.to),
        PieceKind::Knight | PieceKind::Bishop | PieceKind::Wizard => format!(
            "Develop the {} to {}",
            kind_name(mv.piece.kind),
            mv.to
        ),
        PieceKind::Pawn => format!("Advance the pawn to {} to gain space", mv.to),
        _ => format!(
            "Reposition the {} to {}",
            kind_name(mv.piece.kind),
            mv.to
        ),
    }
}

fn kind_name(kind: PieceKind) -> &'static str {
    match kind {
        PieceKind::King => "king",
        PieceKind::Queen => "queen",
        PieceKind::Rook => "rook",
        PieceKind::Bishop => "bishop",
        PieceKind::Knight => "knight",
        PieceKind::Pawn => "pawn",
        PieceKind::Wizard => "wizard",
    }
}
