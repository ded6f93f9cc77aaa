//! Tick-counted delay queues.
//!
//! A task is a `(callback, args, remaining)` triple. Callbacks are compared by
//! value, so a callback is usually a small `Copy` enum naming what should
//! happen, and `args` carries the data it needs when it fires.

use smallvec::SmallVec;

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledTask<C, A> {
    pub callback: C,
    pub args: A,
    pub remaining: u32,
}

/// Tasks that came due on one tick, in scheduling order.
pub type DueTasks<C, A> = SmallVec<[(C, A); 4]>;

#[derive(Debug, Clone)]
pub struct TaskQueue<C, A> {
    tasks: Vec<ScheduledTask<C, A>>,
}

impl<C, A> TaskQueue<C, A> {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Queue `callback` to fire on the `delay`-th call to [`TaskQueue::tick`]
    /// from now. A delay of 0 fires on the next tick.
    pub fn schedule(&mut self, callback: C, delay: u32, args: A) {
        self.tasks.push(ScheduledTask {
            callback,
            args,
            remaining: delay,
        });
    }

    /// Advance one tick. Due tasks leave the queue before they are returned,
    /// so the caller can schedule replacements while handling them.
    pub fn tick(&mut self) -> DueTasks<C, A> {
        let mut due = DueTasks::new();
        let mut pending = Vec::with_capacity(self.tasks.len());
        for mut task in self.tasks.drain(..) {
            task.remaining = task.remaining.saturating_sub(1);
            if task.remaining == 0 {
                due.push((task.callback, task.args));
            } else {
                pending.push(task);
            }
        }
        self.tasks = pending;
        due
    }

    /// Advance one tick and invoke `f` for each due task in order.
    pub fn tick_with<F>(&mut self, mut f: F)
    where
        F: FnMut(C, A),
    {
        for (callback, args) in self.tick() {
            f(callback, args);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScheduledTask<C, A>> + '_ {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

impl<C: PartialEq, A> TaskQueue<C, A> {
    /// Remove the first pending task for `callback` and hand it back with the
    /// ticks it still had to wait.
    pub fn cancel(&mut self, callback: &C) -> Option<ScheduledTask<C, A>> {
        let index = self
            .tasks
            .iter()
            .position(|task| task.callback == *callback)?;
        Some(self.tasks.remove(index))
    }

    pub fn remaining(&self, callback: &C) -> Option<u32> {
        self.tasks
            .iter()
            .find(|task| task.callback == *callback)
            .map(|task| task.remaining)
    }

    pub fn contains(&self, callback: &C) -> bool {
        self.remaining(callback).is_some()
    }
}

impl<C, A> Default for TaskQueue<C, A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Which clock advances a queue.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TickSource {
    /// Once per rendered frame.
    Frame,
    /// Once per fixed simulation step.
    Update,
}

/// A frame queue and an update queue. Each only moves when its own clock
/// ticks.
#[derive(Debug, Clone)]
pub struct Scheduler<C, A> {
    frame: TaskQueue<C, A>,
    update: TaskQueue<C, A>,
}

impl<C, A> Scheduler<C, A> {
    pub fn new() -> Self {
        Self {
            frame: TaskQueue::new(),
            update: TaskQueue::new(),
        }
    }

    pub fn queue(&self, source: TickSource) -> &TaskQueue<C, A> {
        match source {
            TickSource::Frame => &self.frame,
            TickSource::Update => &self.update,
        }
    }

    pub fn queue_mut(&mut self, source: TickSource) -> &mut TaskQueue<C, A> {
        match source {
            TickSource::Frame => &mut self.frame,
            TickSource::Update => &mut self.update,
        }
    }

    pub fn schedule(&mut self, source: TickSource, callback: C, delay: u32, args: A) {
        self.queue_mut(source).schedule(callback, delay, args);
    }

    pub fn tick(&mut self, source: TickSource) -> DueTasks<C, A> {
        self.queue_mut(source).tick()
    }

    pub fn clear(&mut self) {
        self.frame.clear();
        self.update.clear();
    }
}

impl<C: PartialEq, A> Scheduler<C, A> {
    pub fn cancel(&mut self, source: TickSource, callback: &C) -> Option<ScheduledTask<C, A>> {
        self.queue_mut(source).cancel(callback)
    }

    pub fn remaining(&self, source: TickSource, callback: &C) -> Option<u32> {
        self.queue(source).remaining(callback)
    }
}

impl<C, A> Default for Scheduler<C, A> {
    fn default() -> Self {
        Self::new()
    }
}
