//! AI 自对弈示例
//!
//! 运行方式:
//! ```bash
//! cargo run -p wizard-ai --example selfplay
//! ```

use tracing_subscriber::EnvFilter;
use wizard_ai::{AiEngine, CancelToken, Difficulty};
use wizard_core::{create_initial_state, Fen, GamePhase};

/// 自对弈的最大回合数, 防止评估打平时无限循环
const MAX_PLIES: usize = 60;

fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== 巫师棋 AI 自对弈 ===\n");

    let mut state = create_initial_state();
    let mut engine = AiEngine::from_difficulty(Difficulty::Easy);
    let cancel = CancelToken::new();

    for ply in 1..=MAX_PLIES {
        if state.phase == GamePhase::Ended {
            break;
        }

        let color = state.current_player;
        let (mv, score) = engine.best_move(&state, 2, color, &cancel)?;
        state = state.make_move(&mv)?;

        println!(
            "{:>3}. {:?} {} 分数 {} 校验 {} ({} 节点)",
            ply,
            color,
            mv,
            score,
            state.checksum(),
            engine.nodes_searched()
        );
    }

    println!("\n终局: {}", Fen::to_string(&state));
    match state.winner {
        Some(color) => println!("胜者: {:?}", color),
        None if state.stalemate => println!("逼和"),
        None => println!("达到回合上限"),
    }

    Ok(())
}
