//! Generic leaves: closures as conditions/actions, plus small
//! blackboard plumbing nodes used by tree builders and tests.

use npc_core::{Blackboard, TickContext, Value};

use crate::node::{Node, Status};

/// Wraps a predicate as an instant condition leaf.
pub struct ConditionFn<F> {
    predicate: F,
}

impl<F> ConditionFn<F>
where
    F: FnMut(&mut TickContext<'_>, &Blackboard) -> bool + 'static,
{
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> Node for ConditionFn<F>
where
    F: FnMut(&mut TickContext<'_>, &Blackboard) -> bool + 'static,
{
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        if (self.predicate)(ctx, bb) {
            Status::Success
        } else {
            Status::Failure
        }
    }

    fn reset(&mut self) {}
}

/// Wraps a status-returning closure as an action leaf.
pub struct ActionFn<F> {
    action: F,
}

impl<F> ActionFn<F>
where
    F: FnMut(&mut TickContext<'_>, &mut Blackboard) -> Status + 'static,
{
    pub fn new(action: F) -> Self {
        Self { action }
    }
}

impl<F> Node for ActionFn<F>
where
    F: FnMut(&mut TickContext<'_>, &mut Blackboard) -> Status + 'static,
{
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        (self.action)(ctx, bb)
    }

    fn reset(&mut self) {}
}

/// Runs for a fixed duration on the injected clock, then succeeds.
pub struct Wait {
    duration_ms: i64,
    started_at: Option<i64>,
}

impl Wait {
    pub fn new(duration_ms: i64) -> Self {
        Self {
            duration_ms,
            started_at: None,
        }
    }
}

impl Node for Wait {
    fn tick(&mut self, ctx: &mut TickContext<'_>, _bb: &mut Blackboard) -> Status {
        let started = *self.started_at.get_or_insert(ctx.now_ms);

        if ctx.now_ms - started >= self.duration_ms {
            self.reset();
            Status::Success
        } else {
            Status::Running
        }
    }

    fn reset(&mut self) {
        self.started_at = None;
    }
}

/// Writes a computed value to a key; always succeeds.
pub struct SetValue<F> {
    key: &'static str,
    value: F,
}

impl<F> SetValue<F>
where
    F: FnMut(&TickContext<'_>, &Blackboard) -> Value + 'static,
{
    pub fn new(key: &'static str, value: F) -> Self {
        Self { key, value }
    }
}

impl<F> Node for SetValue<F>
where
    F: FnMut(&TickContext<'_>, &Blackboard) -> Value + 'static,
{
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        let value = (self.value)(ctx, bb);
        bb.set(self.key, value);
        Status::Success
    }

    fn reset(&mut self) {}
}

/// Removes a key; always succeeds.
pub struct ClearKey {
    key: &'static str,
}

impl ClearKey {
    pub fn new(key: &'static str) -> Self {
        Self { key }
    }
}

impl Node for ClearKey {
    fn tick(&mut self, _ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        bb.delete(self.key);
        Status::Success
    }

    fn reset(&mut self) {}
}

/// Succeeds iff the key is present.
pub struct HasKey {
    key: &'static str,
}

impl HasKey {
    pub fn new(key: &'static str) -> Self {
        Self { key }
    }
}

impl Node for HasKey {
    fn tick(&mut self, _ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        if bb.has(self.key) {
            Status::Success
        } else {
            Status::Failure
        }
    }

    fn reset(&mut self) {}
}
