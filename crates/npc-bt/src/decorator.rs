//! Single-child nodes that transform a status or gate a tick.

use npc_core::{Blackboard, TickContext};

use crate::node::{Node, Status};

/// Swaps `Success` and `Failure`; `Running` passes through.
pub struct Inverter {
    child: Box<dyn Node>,
}

impl Inverter {
    pub fn new(child: Box<dyn Node>) -> Self {
        Self { child }
    }
}

impl Node for Inverter {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        match self.child.tick(ctx, bb) {
            Status::Success => Status::Failure,
            Status::Failure => Status::Success,
            Status::Running => Status::Running,
        }
    }

    fn reset(&mut self) {
        self.child.reset();
    }
}

/// Collapses any terminal result to `Success`.
pub struct Succeeder {
    child: Box<dyn Node>,
}

impl Succeeder {
    pub fn new(child: Box<dyn Node>) -> Self {
        Self { child }
    }
}

impl Node for Succeeder {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        match self.child.tick(ctx, bb) {
            Status::Running => Status::Running,
            _ => Status::Success,
        }
    }

    fn reset(&mut self) {
        self.child.reset();
    }
}

/// Collapses any terminal result to `Failure`.
///
/// Useful for side-effect branches inside a selector: the child runs,
/// but the selector keeps looking for a branch that actually handles
/// the tick.
pub struct Failer {
    child: Box<dyn Node>,
}

impl Failer {
    pub fn new(child: Box<dyn Node>) -> Self {
        Self { child }
    }
}

impl Node for Failer {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        match self.child.tick(ctx, bb) {
            Status::Running => Status::Running,
            _ => Status::Failure,
        }
    }

    fn reset(&mut self) {
        self.child.reset();
    }
}

/// Ticks the child to a terminal result `times` times, then succeeds.
///
/// `times = -1` repeats forever unless constructed with
/// [`Repeater::until_success`] or [`Repeater::until_failure`], which
/// stop (with `Success`) on that specific terminal.
pub struct Repeater {
    child: Box<dyn Node>,
    times: i32,
    until_success: bool,
    until_failure: bool,
    count: i32,
}

impl Repeater {
    pub fn new(child: Box<dyn Node>, times: i32) -> Self {
        Self {
            child,
            times,
            until_success: false,
            until_failure: false,
            count: 0,
        }
    }

    pub fn until_success(child: Box<dyn Node>) -> Self {
        Self {
            child,
            times: -1,
            until_success: true,
            until_failure: false,
            count: 0,
        }
    }

    pub fn until_failure(child: Box<dyn Node>) -> Self {
        Self {
            child,
            times: -1,
            until_success: false,
            until_failure: true,
            count: 0,
        }
    }
}

impl Node for Repeater {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        if self.times > 0 && self.count >= self.times {
            self.reset();
            return Status::Success;
        }

        match self.child.tick(ctx, bb) {
            Status::Running => Status::Running,
            Status::Success => {
                if self.until_success {
                    self.reset();
                    return Status::Success;
                }
                self.count += 1;
                self.child.reset();
                Status::Running
            }
            Status::Failure => {
                if self.until_failure {
                    self.reset();
                    return Status::Success;
                }
                self.count += 1;
                self.child.reset();
                Status::Running
            }
        }
    }

    fn reset(&mut self) {
        self.count = 0;
        self.child.reset();
    }
}

/// Fails without ticking the child while the cooldown is hot.
///
/// The timer records only child `Success`; a failed child can be
/// retried immediately. `reset` leaves the timer alone, since a branch
/// going out of scope must not refresh an ability. Use
/// [`Cooldown::reset_cooldown`] to clear it explicitly.
pub struct Cooldown {
    child: Box<dyn Node>,
    cooldown_ms: i64,
    last_success: Option<i64>,
}

impl Cooldown {
    pub fn new(child: Box<dyn Node>, cooldown_ms: i64) -> Self {
        Self {
            child,
            cooldown_ms,
            last_success: None,
        }
    }

    pub fn reset_cooldown(&mut self) {
        self.last_success = None;
    }
}

impl Node for Cooldown {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        if let Some(last) = self.last_success {
            if ctx.now_ms - last < self.cooldown_ms {
                return Status::Failure;
            }
        }

        let status = self.child.tick(ctx, bb);
        if status == Status::Success {
            self.last_success = Some(ctx.now_ms);
        }
        status
    }

    fn reset(&mut self) {
        self.child.reset();
    }
}

/// Fails the child once it has been running longer than the limit.
pub struct TimeLimit {
    child: Box<dyn Node>,
    limit_ms: i64,
    started_at: Option<i64>,
}

impl TimeLimit {
    pub fn new(child: Box<dyn Node>, limit_ms: i64) -> Self {
        Self {
            child,
            limit_ms,
            started_at: None,
        }
    }
}

impl Node for TimeLimit {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        let started = *self.started_at.get_or_insert(ctx.now_ms);

        if ctx.now_ms - started > self.limit_ms {
            self.reset();
            return Status::Failure;
        }

        let status = self.child.tick(ctx, bb);
        if status.is_terminal() {
            self.reset();
        }
        status
    }

    fn reset(&mut self) {
        self.started_at = None;
        self.child.reset();
    }
}

/// Runs the child only while the predicate holds; fails otherwise
/// without ticking it.
pub struct Gate<F> {
    child: Box<dyn Node>,
    predicate: F,
}

impl<F> Gate<F>
where
    F: FnMut(&TickContext<'_>, &Blackboard) -> bool + 'static,
{
    pub fn new(child: Box<dyn Node>, predicate: F) -> Self {
        Self { child, predicate }
    }
}

impl<F> Node for Gate<F>
where
    F: FnMut(&TickContext<'_>, &Blackboard) -> bool + 'static,
{
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        if !(self.predicate)(ctx, bb) {
            return Status::Failure;
        }
        self.child.tick(ctx, bb)
    }

    fn reset(&mut self) {
        self.child.reset();
    }
}
