//! Deferred session tasks
//!
//! Timers are plain data advanced by the fixed step, never wall-clock callbacks.
//! Every handle carries the generation it was scheduled in; `cancel_all` bumps
//! the generation so nothing queued before a teardown can fire afterward.

use crate::quiz::Category;

/// Slack for accumulated float error in step-sized decrements
const DUE_EPSILON: f32 = 1e-4;

/// Work the session performs later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Advance to the next question
    NextQuestion,
    /// Spawn a question of a fixed category (after the victory pause)
    SpawnQuestion(Category),
    /// Enter the game-over phase
    GameOver,
    /// Close a learn-mode prompt that dismisses itself
    DismissLearn,
    /// One firework of the victory celebration
    Celebrate { burst: u8 },
}

/// Identifies one scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskHandle {
    pub id: u64,
    pub generation: u32,
}

#[derive(Debug, Clone)]
struct Scheduled {
    handle: TaskHandle,
    remaining: f32,
    task: Task,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    tasks: Vec<Scheduled>,
    next_id: u64,
    generation: u32,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay` seconds
    pub fn schedule(&mut self, delay: f32, task: Task) -> TaskHandle {
        let handle = TaskHandle {
            id: self.next_id,
            generation: self.generation,
        };
        self.next_id += 1;
        self.tasks.push(Scheduled {
            handle,
            remaining: delay.max(0.0),
            task,
        });
        handle
    }

    /// Drop one task; returns whether it was still pending
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.handle != handle);
        self.tasks.len() != before
    }

    /// Drop everything and invalidate outstanding handles
    pub fn cancel_all(&mut self) {
        self.tasks.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.iter().any(|t| t.handle == handle)
    }

    /// Number of queued tasks
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Queued task kinds, soonest first
    pub fn pending_tasks(&self) -> Vec<Task> {
        let mut tasks: Vec<_> = self.tasks.iter().collect();
        tasks.sort_by(|a, b| a.remaining.total_cmp(&b.remaining));
        tasks.into_iter().map(|t| t.task).collect()
    }

    /// Advance time and take every task that came due, in deadline order
    /// (ties in scheduling order).
    pub fn advance(&mut self, dt: f32) -> Vec<(TaskHandle, Task)> {
        for t in &mut self.tasks {
            t.remaining -= dt;
        }

        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .tasks
            .drain(..)
            .partition(|t| t.remaining <= DUE_EPSILON);
        self.tasks = pending;

        due.sort_by(|a, b| {
            a.remaining
                .total_cmp(&b.remaining)
                .then(a.handle.id.cmp(&b.handle.id))
        });
        due.into_iter().map(|t| (t.handle, t.task)).collect()
    }
}
