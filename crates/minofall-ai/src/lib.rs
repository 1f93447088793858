pub use self::placement::{AdvisorMove, Plan, plan_best_placement};

pub mod placement;

use std::sync::Mutex;

use log::debug;
use minofall_board::GridBoard;
use minofall_engine::{Advisor, Board as _, StepOutcome};

/// Greedy move advisor.
///
/// `compute_best_queue` runs the placement search (on the engine's
/// background thread) and replaces the queue wholesale; `process_queue`
/// applies one queued move per advisor tick on the control loop. The
/// queue is the only state shared between the two and sits behind a
/// mutex.
#[derive(Debug, Default)]
pub struct GreedyAdvisor {
    queue: Mutex<Plan>,
}

impl GreedyAdvisor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Advisor<GridBoard> for GreedyAdvisor {
    fn compute_best_queue(&self, board: &GridBoard) {
        let plan = placement::plan_best_placement(board);
        debug!("advisor planned {} moves", plan.len());
        *self.queue.lock().expect("advisor queue lock poisoned") = plan;
    }

    fn process_queue(&self, board: &mut GridBoard) -> Option<StepOutcome> {
        let next = {
            let mut queue = self.queue.lock().expect("advisor queue lock poisoned");
            if queue.is_empty() {
                None
            } else {
                Some(queue.remove(0))
            }
        };
        match next? {
            AdvisorMove::Left => {
                board.move_left();
                None
            }
            AdvisorMove::Right => {
                board.move_right();
                None
            }
            AdvisorMove::RotateCw => {
                board.rotate_cw();
                None
            }
            AdvisorMove::Drop => Some(board.hard_drop()),
        }
    }
}
