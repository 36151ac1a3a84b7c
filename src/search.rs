//! Fixed-depth negamax search with alpha-beta pruning.
//!
//! Scores are always from the point of view of the side to move at the node.
//! A side without legal moves has lost; the loss is scored as
//! `-INFINITY + ply - 1` so that slower losses are preferred over faster ones.
//!
//! When a node has exactly one legal move and the remaining depth is used up,
//! the search is extended by one ply, bounded by [`MAX_DEPTH`] plies from the root.

use tracing::{debug, instrument, trace};

use crate::constants::{
    BACK_RANK_WORTH, INFINITY, KING_WORTH, MAN_WORTH, MATERIAL_RATIO_SCALE, MAX_DEPTH,
};
use crate::movegen::{generate, Move};
use crate::position::{playable_points, Board, Side, Square};

/// Result of a root search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Move,
    /// Score of `best_move` for the side to move, or `None` if it was forced.
    pub score: Option<i32>,
    /// Number of positions visited below the root.
    pub nodes: u64,
}

/// Evaluate a position from the point of view of `side`.
///
/// Material (men 100, kings 130) plus a term that favours trading down when
/// ahead, and a small bonus for keeping the two guarding back-rank men home
/// while the opponent still has more than one man.
pub fn evaluate(board: &Board, side: Side) -> i32 {
    let (mut black_men, mut black_kings, mut white_men, mut white_kings) = (0, 0, 0, 0);
    for pt in playable_points() {
        match board.square_at(pt) {
            Square::BlackMan => black_men += 1,
            Square::BlackKing => black_kings += 1,
            Square::WhiteMan => white_men += 1,
            Square::WhiteKing => white_kings += 1,
            Square::Empty | Square::Border => {}
        }
    }

    // Scores below are from Black's point of view.
    let mut score = 0;
    if board.square_at(10) == Square::WhiteMan
        && board.square_at(12) == Square::WhiteMan
        && black_men > 1
    {
        score -= BACK_RANK_WORTH;
    }
    if board.square_at(44) == Square::BlackMan
        && board.square_at(42) == Square::BlackMan
        && white_men > 1
    {
        score += BACK_RANK_WORTH;
    }

    let black_material = black_kings * KING_WORTH + black_men * MAN_WORTH;
    let white_material = white_kings * KING_WORTH + white_men * MAN_WORTH;
    let diff = black_material - white_material;
    let total = black_material + white_material;

    score += diff;
    if total > 0 {
        score += diff * MATERIAL_RATIO_SCALE / total;
    }

    match side {
        Side::Black => score,
        Side::White => -score,
    }
}

/// Find the best move for `side`, searching `depth` plies.
///
/// Returns `None` if `side` has no legal moves. A single legal move is returned
/// without searching.
pub fn best_move(board: &Board, side: Side, depth: u32) -> Option<Move> {
    best_move_with_stats(board, side, depth).map(|r| r.best_move)
}

/// Like [`best_move`], also reporting the score and node count.
#[instrument(level = "debug", skip(board))]
pub fn best_move_with_stats(board: &Board, side: Side, depth: u32) -> Option<SearchResult> {
    let mut moves = generate(board, side);
    match moves.len() {
        0 => {
            debug!("no legal moves");
            None
        }
        1 => Some(SearchResult {
            best_move: moves.remove(0),
            score: None,
            nodes: 0,
        }),
        _ => {
            let mut nodes = 0;
            let (index, score) = search_root(board, side, depth as i32, &moves, &mut nodes);
            let best_move = moves.swap_remove(index);
            debug!(%best_move, score, nodes, "search finished");
            Some(SearchResult {
                best_move,
                score: Some(score),
                nodes,
            })
        }
    }
}

/// Search every root move; returns the index of the best one and its score.
///
/// Falls back to the first move if nothing beats `-INFINITY`.
fn search_root(
    board: &Board,
    side: Side,
    depth: i32,
    moves: &[Move],
    nodes: &mut u64,
) -> (usize, i32) {
    let mut alpha = -INFINITY;
    let beta = INFINITY;
    let mut best = -INFINITY;
    let mut best_index = 0;

    for (i, mv) in moves.iter().enumerate() {
        if best >= beta {
            break;
        }
        let mut child = *board;
        child.apply_move(mv);
        let score = -alpha_beta(&child, depth - 1, side.opponent(), -beta, -alpha, 1, nodes);
        trace!(%mv, score, "root move");
        if score > best {
            best = score;
            best_index = i;
            if score > alpha {
                alpha = score;
            }
        }
    }

    (best_index, best)
}

/// Negamax with alpha-beta pruning.
///
/// `ply` counts half-moves from the root and drives both the loss score and the
/// extension cap.
fn alpha_beta(
    board: &Board,
    depth: i32,
    side: Side,
    mut alpha: i32,
    beta: i32,
    ply: i32,
    nodes: &mut u64,
) -> i32 {
    *nodes += 1;
    let moves = generate(board, side);

    if moves.is_empty() {
        return -INFINITY + ply - 1;
    }

    let mut depth = depth;
    if depth < 1 && moves.len() == 1 {
        depth += 1;
    }
    if depth < 1 || ply >= MAX_DEPTH as i32 - 1 {
        return evaluate(board, side);
    }

    let mut best = -INFINITY;
    for mv in &moves {
        if best >= beta {
            break;
        }
        let mut child = *board;
        child.apply_move(mv);
        let score = -alpha_beta(&child, depth - 1, side.opponent(), -beta, -alpha, ply + 1, nodes);
        if score > best {
            best = score;
            if score > alpha {
                alpha = score;
            }
        }
    }
    best
}
