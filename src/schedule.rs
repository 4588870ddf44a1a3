//! Deferred actions: "run C after D seconds" without OS timers.
//!
//! Every delayed effect in a session (staggered enemy spawns, the pause
//! between waves, reload completion, muzzle-flash decay) is a
//! [`ScheduledTask`] in the [`ScheduledTasks`] queue.  Each task remembers the
//! [`SessionGeneration`](crate::session::SessionGeneration) it was scheduled
//! in.  A restart bumps the generation, so tasks left over from the previous
//! session are discarded unexecuted when they come due instead of leaking
//! into the fresh one.
//!
//! [`deferred_task_system`] drains due tasks once per frame and re-publishes
//! them as [`DeferredFired`] messages.  The owning subsystem reads the message
//! in its own frame slot, which keeps the per-frame ordering intact.

use crate::session::{SessionClock, SessionGeneration};
use bevy::prelude::*;

/// An effect scheduled to happen later in the same session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredAction {
    /// Spawn one enemy of wave `wave`.
    SpawnEnemy { wave: u32 },
    /// Begin spawning the current wave.
    StartWave,
    /// The reload started earlier is done; refill the magazine.
    FinishReload,
    /// Turn the muzzle-flash feedback off again.
    ClearMuzzleFlash,
}

#[derive(Debug, Clone, Copy)]
pub struct ScheduledTask {
    /// Session-clock time (seconds) at which the task becomes due.
    pub due_secs: f64,
    /// Generation the task was scheduled in.
    pub generation: u64,
    /// Insertion counter; breaks ties between tasks due at the same instant.
    seq: u64,
    pub action: DeferredAction,
}

/// Result of draining the queue at a given instant.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct DueTasks {
    /// Live actions, ordered by due time then scheduling order.
    pub actions: Vec<DeferredAction>,
    /// Number of stale tasks that came due and were dropped.
    pub stale: usize,
}

/// Pending deferred actions, keyed by due time and generation.
#[derive(Resource, Debug, Default)]
pub struct ScheduledTasks {
    tasks: Vec<ScheduledTask>,
    next_seq: u64,
}

impl ScheduledTasks {
    /// Schedule `action` to run `delay_secs` after `now_secs`.
    pub fn schedule(
        &mut self,
        now_secs: f64,
        delay_secs: f32,
        generation: u64,
        action: DeferredAction,
    ) {
        self.tasks.push(ScheduledTask {
            due_secs: now_secs + f64::from(delay_secs.max(0.0)),
            generation,
            seq: self.next_seq,
            action,
        });
        self.next_seq += 1;
    }

    /// Remove every task due at or before `now_secs`.
    ///
    /// Tasks from a generation other than `generation` are dropped and counted
    /// in [`DueTasks::stale`]; they never produce an action.
    pub fn take_due(&mut self, now_secs: f64, generation: u64) -> DueTasks {
        let mut due: Vec<ScheduledTask> = Vec::new();
        self.tasks.retain(|task| {
            if task.due_secs <= now_secs {
                due.push(*task);
                false
            } else {
                true
            }
        });
        due.sort_by(|a, b| a.due_secs.total_cmp(&b.due_secs).then(a.seq.cmp(&b.seq)));

        let mut out = DueTasks::default();
        for task in due {
            if task.generation == generation {
                out.actions.push(task.action);
            } else {
                out.stale += 1;
            }
        }
        out
    }

    /// Number of live tasks in `generation` matching `predicate`.
    pub fn count_pending(
        &self,
        generation: u64,
        predicate: impl Fn(&DeferredAction) -> bool,
    ) -> usize {
        self.tasks
            .iter()
            .filter(|t| t.generation == generation && predicate(&t.action))
            .count()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Published once per deferred action that came due this frame.
#[derive(Message, Debug, Clone, Copy)]
pub struct DeferredFired(pub DeferredAction);

/// Drain due tasks for the live generation and publish them.
pub fn deferred_task_system(
    clock: Res<SessionClock>,
    generation: Res<SessionGeneration>,
    mut tasks: ResMut<ScheduledTasks>,
    mut fired: MessageWriter<DeferredFired>,
) {
    let due = tasks.take_due(clock.elapsed_secs, generation.0);
    if due.stale > 0 {
        debug!("Discarded {} deferred task(s) from a previous session", due.stale);
    }
    for action in due.actions {
        fired.write(DeferredFired(action));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tasks_are_not_due_early() {
        let mut tasks = ScheduledTasks::default();
        tasks.schedule(1.0, 2.0, 0, DeferredAction::FinishReload);

        assert!(tasks.take_due(2.9, 0).actions.is_empty());
        assert_eq!(tasks.len(), 1);
        assert_eq!(
            tasks.take_due(3.0, 0).actions,
            vec![DeferredAction::FinishReload]
        );
        assert!(tasks.is_empty());
    }

    #[test]
    fn due_tasks_come_out_in_time_then_insertion_order() {
        let mut tasks = ScheduledTasks::default();
        tasks.schedule(0.0, 1.0, 0, DeferredAction::StartWave);
        tasks.schedule(0.0, 0.5, 0, DeferredAction::SpawnEnemy { wave: 1 });
        tasks.schedule(0.0, 0.5, 0, DeferredAction::SpawnEnemy { wave: 2 });

        let due = tasks.take_due(5.0, 0);
        assert_eq!(
            due.actions,
            vec![
                DeferredAction::SpawnEnemy { wave: 1 },
                DeferredAction::SpawnEnemy { wave: 2 },
                DeferredAction::StartWave,
            ]
        );
    }

    #[test]
    fn stale_generation_tasks_are_dropped_when_due() {
        let mut tasks = ScheduledTasks::default();
        tasks.schedule(0.0, 2.0, 3, DeferredAction::FinishReload);
        tasks.schedule(0.0, 2.0, 4, DeferredAction::ClearMuzzleFlash);

        let due = tasks.take_due(2.0, 4);
        assert_eq!(due.actions, vec![DeferredAction::ClearMuzzleFlash]);
        assert_eq!(due.stale, 1);
        assert!(tasks.is_empty());
    }

    #[test]
    fn count_pending_ignores_other_generations() {
        let mut tasks = ScheduledTasks::default();
        for _ in 0..3 {
            tasks.schedule(0.0, 1.0, 1, DeferredAction::SpawnEnemy { wave: 1 });
        }
        tasks.schedule(0.0, 1.0, 0, DeferredAction::SpawnEnemy { wave: 4 });

        let spawns = tasks.count_pending(1, |a| matches!(a, DeferredAction::SpawnEnemy { .. }));
        assert_eq!(spawns, 3);
    }
}
