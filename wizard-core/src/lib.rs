//! 10x10 巫师棋核心规则库
//!
//! 包含:
//! - 棋盘、棋子、位置等核心数据结构
//! - 走法生成和合法性过滤 (含巫师的传送/远程攻击双分支)
//! - 状态转移引擎 (将死/逼和检测, 不可变状态值)
//! - FEN 方言解析与生成
//! - Zobrist 状态校验和 (供外部同步层检测分歧)
//!
//! 引擎是同步纯函数式的: 没有全局可变状态, 每个走法产生新状态值,
//! 渲染/网络/AI 等协作者只通过这里暴露的接口读写对局。

mod board;
mod checksum;
mod constants;
mod error;
mod fen;
mod moves;
mod piece;
mod state;

pub use board::Board;
pub use checksum::{checksum, Checksum, ZobristTable};
pub use constants::*;
pub use error::{ChessError, Result};
pub use fen::{Fen, INITIAL_FEN};
pub use moves::{Move, MoveGenerator, RookMove};
pub use piece::{Color, Piece, PieceId, PieceKind, Position};
pub use state::{create_initial_state, GamePhase, GameState};
