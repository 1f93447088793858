use arrayvec::ArrayVec;
use minofall_board::{GridBoard, HEIGHT, WIDTH};
use minofall_engine::{Board as _, StepOutcome};

/// One queued advisor input, applied per think-cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisorMove {
    Left,
    Right,
    RotateCw,
    Drop,
}

/// Upper bound on a plan: three rotations, a shift across the whole
/// board, and the final drop.
pub const MAX_PLAN: usize = 16;

pub type Plan = ArrayVec<AdvisorMove, MAX_PLAN>;

// Placement weights in the spirit of the classic hand-tuned evaluators:
// reward clears, punish tall stacks, buried holes, and jagged surfaces.
const WEIGHT_CLEARED: f64 = 0.76;
const WEIGHT_HEIGHT: f64 = 0.51;
const WEIGHT_HOLES: f64 = 0.36;
const WEIGHT_BUMPINESS: f64 = 0.18;

/// Searches every (rotation, column) placement of the falling piece and
/// returns the move sequence reaching the best-scoring one.
///
/// When no placement survives (the stack is effectively full), the plan
/// degenerates to an immediate drop.
#[must_use]
pub fn plan_best_placement(board: &GridBoard) -> Plan {
    let max_shift = i16::try_from(WIDTH).expect("board width fits i16");
    let mut best: Option<(f64, u8, i16)> = None;

    for rotations in 0..4_u8 {
        for shift in -max_shift..=max_shift {
            let Some(score) = evaluate_candidate(board, rotations, shift) else {
                continue;
            };
            if best.is_none_or(|(best_score, ..)| score > best_score) {
                best = Some((score, rotations, shift));
            }
        }
    }

    match best {
        Some((_, rotations, shift)) => moves_for(rotations, shift),
        None => {
            let mut plan = Plan::new();
            plan.push(AdvisorMove::Drop);
            plan
        }
    }
}

/// Simulates one placement on a clone of the board. `None` when the
/// piece cannot reach the position or the placement tops the stack out.
fn evaluate_candidate(board: &GridBoard, rotations: u8, shift: i16) -> Option<f64> {
    let mut sim = board.clone();
    for _ in 0..rotations {
        if !sim.rotate_cw() {
            return None;
        }
    }
    for _ in 0..shift.unsigned_abs() {
        let moved = if shift < 0 {
            sim.move_left()
        } else {
            sim.move_right()
        };
        if !moved {
            return None;
        }
    }
    match sim.hard_drop() {
        StepOutcome::Locked { cleared_lines } => Some(score_stack(&sim, cleared_lines)),
        _ => None,
    }
}

fn moves_for(rotations: u8, shift: i16) -> Plan {
    let mut plan = Plan::new();
    for _ in 0..rotations {
        plan.push(AdvisorMove::RotateCw);
    }
    let lateral = if shift < 0 {
        AdvisorMove::Left
    } else {
        AdvisorMove::Right
    };
    for _ in 0..shift.unsigned_abs() {
        plan.push(lateral);
    }
    plan.push(AdvisorMove::Drop);
    plan
}

fn score_stack(board: &GridBoard, cleared_lines: u32) -> f64 {
    let heights = column_heights(board);
    let aggregate_height: usize = heights.iter().sum();
    let bumpiness: usize = heights
        .windows(2)
        .map(|pair| pair[0].abs_diff(pair[1]))
        .sum();

    f64::from(cleared_lines) * WEIGHT_CLEARED
        - to_f64(aggregate_height) * WEIGHT_HEIGHT
        - to_f64(count_holes(board)) * WEIGHT_HOLES
        - to_f64(bumpiness) * WEIGHT_BUMPINESS
}

fn column_heights(board: &GridBoard) -> [usize; WIDTH] {
    let mut heights = [0; WIDTH];
    for (x, height) in heights.iter_mut().enumerate() {
        for y in 0..HEIGHT {
            if board.cell(x, y).is_some() {
                *height = HEIGHT - y;
                break;
            }
        }
    }
    heights
}

/// Empty cells with at least one settled cell above them.
pub(crate) fn count_holes(board: &GridBoard) -> usize {
    let mut holes = 0;
    for x in 0..WIDTH {
        let mut roofed = false;
        for y in 0..HEIGHT {
            if board.cell(x, y).is_some() {
                roofed = true;
            } else if roofed {
                holes += 1;
            }
        }
    }
    holes
}

fn to_f64(value: usize) -> f64 {
    u32::try_from(value).map_or(f64::MAX, f64::from)
}

#[cfg(test)]
mod tests {
    use minofall_board::PieceKind;
    use minofall_engine::Board as _;

    use super::*;

    #[test]
    fn plans_end_with_a_drop() {
        let board = GridBoard::with_seed(42);
        let plan = plan_best_placement(&board);
        assert!(!plan.is_empty());
        assert_eq!(plan.last(), Some(&AdvisorMove::Drop));
    }

    #[test]
    fn placements_on_an_empty_board_leave_at_most_one_hole() {
        // S and Z cannot avoid a single overhang on flat ground; every
        // other kind places hole-free. Check a spread of piece sequences.
        for seed in 0..8 {
            let board = GridBoard::with_seed(seed);
            let plan = plan_best_placement(&board);

            let mut sim = board.clone();
            for step in &plan {
                match step {
                    AdvisorMove::Left => {
                        sim.move_left();
                    }
                    AdvisorMove::Right => {
                        sim.move_right();
                    }
                    AdvisorMove::RotateCw => {
                        sim.rotate_cw();
                    }
                    AdvisorMove::Drop => {
                        sim.hard_drop();
                    }
                }
            }
            assert!(count_holes(&sim) <= 1, "seed {seed}");
        }
    }

    #[test]
    fn a_full_stack_degenerates_to_a_drop() {
        let mut board = GridBoard::with_seed(1);
        // Leave single-cell wells everywhere: no placement clears and
        // every column is near the ceiling.
        for y in 1..HEIGHT {
            for x in 0..WIDTH {
                if (x + y) % 2 == 0 {
                    board.toggle_cell(x, y, PieceKind::I);
                }
            }
        }
        let plan = plan_best_placement(&board);
        assert_eq!(plan.last(), Some(&AdvisorMove::Drop));
    }

    #[test]
    fn hole_counter_sees_only_roofed_cells() {
        let mut board = GridBoard::with_seed(1);
        assert_eq!(count_holes(&board), 0);

        board.toggle_cell(3, 5, PieceKind::I);
        // Cells below (3, 5) are now roofed.
        assert_eq!(count_holes(&board), HEIGHT - 6);
    }
}
