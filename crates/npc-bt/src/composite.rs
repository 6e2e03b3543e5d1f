//! Multi-child nodes: status arithmetic over an ordered child list.

use npc_core::{Blackboard, TickContext};

use crate::node::{Node, Status};

/// Runs children in order until one fails; succeeds when all do.
///
/// The index is remembered while a child is `Running`, so earlier
/// children are not re-evaluated on resumption. Completing either way
/// resets the index to the front.
pub struct Sequence {
    children: Vec<Box<dyn Node>>,
    index: usize,
}

impl Sequence {
    pub fn new(children: Vec<Box<dyn Node>>) -> Self {
        Self { children, index: 0 }
    }
}

impl Node for Sequence {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        while self.index < self.children.len() {
            match self.children[self.index].tick(ctx, bb) {
                Status::Running => return Status::Running,
                Status::Failure => {
                    self.reset();
                    return Status::Failure;
                }
                Status::Success => self.index += 1,
            }
        }

        self.reset();
        Status::Success
    }

    fn reset(&mut self) {
        self.index = 0;
        for child in &mut self.children {
            child.reset();
        }
    }
}

/// Tries children in order until one succeeds; fails when all do.
///
/// A child returning `Success` short-circuits: later children are not
/// ticked in that invocation.
pub struct Selector {
    children: Vec<Box<dyn Node>>,
    index: usize,
}

impl Selector {
    pub fn new(children: Vec<Box<dyn Node>>) -> Self {
        Self { children, index: 0 }
    }
}

impl Node for Selector {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        while self.index < self.children.len() {
            match self.children[self.index].tick(ctx, bb) {
                Status::Running => return Status::Running,
                Status::Success => {
                    self.reset();
                    return Status::Success;
                }
                Status::Failure => self.index += 1,
            }
        }

        self.reset();
        Status::Failure
    }

    fn reset(&mut self) {
        self.index = 0;
        for child in &mut self.children {
            child.reset();
        }
    }
}

/// A sequence that re-evaluates from the first child every tick.
///
/// Where [`Sequence`] resumes at the running child, this variant
/// re-checks every earlier child first, so guard conditions stay live
/// while an action runs. A child that was running loses its slot (and
/// is reset) the moment an earlier child stops succeeding.
pub struct ReactiveSequence {
    children: Vec<Box<dyn Node>>,
    running: Option<usize>,
}

impl ReactiveSequence {
    pub fn new(children: Vec<Box<dyn Node>>) -> Self {
        Self {
            children,
            running: None,
        }
    }
}

impl Node for ReactiveSequence {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        for index in 0..self.children.len() {
            match self.children[index].tick(ctx, bb) {
                Status::Success => continue,
                Status::Failure => {
                    self.reset();
                    return Status::Failure;
                }
                Status::Running => {
                    if self.running != Some(index) {
                        if let Some(previous) = self.running {
                            self.children[previous].reset();
                        }
                        self.running = Some(index);
                    }
                    return Status::Running;
                }
            }
        }

        self.reset();
        Status::Success
    }

    fn reset(&mut self) {
        self.running = None;
        for child in &mut self.children {
            child.reset();
        }
    }
}

/// A selector that re-evaluates from the first child every tick.
///
/// Higher-priority branches preempt a running lower one: if an earlier
/// child starts succeeding or running, the child that was running is
/// reset before it would be ticked again.
pub struct ReactiveSelector {
    children: Vec<Box<dyn Node>>,
    running: Option<usize>,
}

impl ReactiveSelector {
    pub fn new(children: Vec<Box<dyn Node>>) -> Self {
        Self {
            children,
            running: None,
        }
    }
}

impl Node for ReactiveSelector {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        for index in 0..self.children.len() {
            match self.children[index].tick(ctx, bb) {
                Status::Failure => continue,
                Status::Success => {
                    self.reset();
                    return Status::Success;
                }
                Status::Running => {
                    if self.running != Some(index) {
                        if let Some(previous) = self.running {
                            self.children[previous].reset();
                        }
                        self.running = Some(index);
                    }
                    return Status::Running;
                }
            }
        }

        self.reset();
        Status::Failure
    }

    fn reset(&mut self) {
        self.running = None;
        for child in &mut self.children {
            child.reset();
        }
    }
}

/// Picks one child uniformly on every entry and returns its status.
///
/// No cross-tick memory: a `Running` child may not be the one picked
/// next tick. Use for behavior variety, not for resumable work.
pub struct RandomSelector {
    children: Vec<Box<dyn Node>>,
}

impl RandomSelector {
    pub fn new(children: Vec<Box<dyn Node>>) -> Self {
        Self { children }
    }
}

impl Node for RandomSelector {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        if self.children.is_empty() {
            return Status::Failure;
        }

        let index = ctx.rng.pick(self.children.len());
        self.children[index].tick(ctx, bb)
    }

    fn reset(&mut self) {
        for child in &mut self.children {
            child.reset();
        }
    }
}

/// Ticks children until one succeeds; `Running` if any child is still
/// running and none succeeded, `Failure` only when every child failed.
pub struct ParallelSelector {
    children: Vec<Box<dyn Node>>,
}

impl ParallelSelector {
    pub fn new(children: Vec<Box<dyn Node>>) -> Self {
        Self { children }
    }
}

impl Node for ParallelSelector {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        let mut any_running = false;

        for child in &mut self.children {
            match child.tick(ctx, bb) {
                Status::Success => return Status::Success,
                Status::Running => any_running = true,
                Status::Failure => {}
            }
        }

        if any_running {
            Status::Running
        } else {
            Status::Failure
        }
    }

    fn reset(&mut self) {
        for child in &mut self.children {
            child.reset();
        }
    }
}

/// Ticks every child each entry; fails if any child failed (failure
/// dominates running), succeeds only when all succeeded.
pub struct ParallelSequence {
    children: Vec<Box<dyn Node>>,
}

impl ParallelSequence {
    pub fn new(children: Vec<Box<dyn Node>>) -> Self {
        Self { children }
    }
}

impl Node for ParallelSequence {
    fn tick(&mut self, ctx: &mut TickContext<'_>, bb: &mut Blackboard) -> Status {
        let mut any_running = false;
        let mut any_failure = false;

        for child in &mut self.children {
            match child.tick(ctx, bb) {
                Status::Failure => any_failure = true,
                Status::Running => any_running = true,
                Status::Success => {}
            }
        }

        if any_failure {
            Status::Failure
        } else if any_running {
            Status::Running
        } else {
            Status::Success
        }
    }

    fn reset(&mut self) {
        for child in &mut self.children {
            child.reset();
        }
    }
}
