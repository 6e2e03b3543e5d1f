use npc_core::{Blackboard, TickContext};

/// The result of ticking a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    Failure,
    /// Still executing; tick again next frame to make progress.
    Running,
}

impl Status {
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }

    pub fn is_running(self) -> bool {
        matches!(self, Status::Running)
    }

    /// `true` for `Success` and `Failure`.
    pub fn is_terminal(self) -> bool {
        !self.is_running()
    }
}

/// A behavior tree node.
///
/// A single `tick` must be bounded work: no blocking, no I/O, no
/// spawning. Multi-tick effects write an intent to the blackboard and
/// return `Running` until their completion predicate holds.
pub trait Node: 'static {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status;

    /// Drop any running state, cascading to children.
    fn reset(&mut self);
}
