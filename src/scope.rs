//! Screen-scoped, cancelable tasks on the UI `LocalSet`.

use std::cell::RefCell;
use std::future::Future;
use std::time::Duration;

use tokio::select;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

/// Owns every delayed action a screen launches; closing it cancels them all.
///
/// Tasks are spawned with `spawn_local`, so the scope must be used from within
/// a `tokio::task::LocalSet`.
#[derive(Debug, Clone, Default)]
pub struct ScreenScope {
    cancel: CancellationToken,
}

impl ScreenScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `action` after `delay` unless the task or the scope is cancelled first.
    pub fn schedule(&self, delay: Duration, action: impl FnOnce() + 'static) -> DelayedTask {
        let deadline = Instant::now() + delay;
        self.spawn(async move {
            sleep_until(deadline).await;
            action();
        })
    }

    pub fn spawn(&self, work: impl Future<Output = ()> + 'static) -> DelayedTask {
        let token = self.cancel.child_token();
        let task_token = token.clone();
        let handle = tokio::task::spawn_local(async move {
            select! {
                biased;
                _ = task_token.cancelled() => {}
                _ = work => {}
            }
        });
        DelayedTask { token, handle }
    }

    pub fn close(&self) {
        self.cancel.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Handle to one scheduled task.
#[derive(Debug)]
pub struct DelayedTask {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl DelayedTask {
    /// Safe to call any number of times, before or after the task ran.
    pub fn cancel(&self) {
        self.token.cancel();
        self.handle.abort();
    }

    pub fn is_pending(&self) -> bool {
        !self.token.is_cancelled() && !self.handle.is_finished()
    }
}

/// Holds at most one task; scheduling a new one cancels its predecessor.
#[derive(Debug, Default)]
pub struct TaskSlot {
    task: RefCell<Option<DelayedTask>>,
}

impl TaskSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&self, task: DelayedTask) {
        if let Some(previous) = self.task.borrow_mut().replace(task) {
            previous.cancel();
        }
    }

    pub fn cancel(&self) {
        if let Some(task) = self.task.borrow_mut().take() {
            task.cancel();
        }
    }

    /// Forgets the current task without cancelling it; used by a task that fired.
    pub fn release(&self) {
        self.task.borrow_mut().take();
    }

    pub fn is_pending(&self) -> bool {
        self.task
            .borrow()
            .as_ref()
            .is_some_and(DelayedTask::is_pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use tokio::task::LocalSet;
    use tokio::time::sleep;

    fn counter() -> (Rc<Cell<u32>>, impl Fn() -> Box<dyn FnOnce()>) {
        let count = Rc::new(Cell::new(0));
        let make = {
            let count = Rc::clone(&count);
            move || {
                let count = Rc::clone(&count);
                Box::new(move || count.set(count.get() + 1)) as Box<dyn FnOnce()>
            }
        };
        (count, make)
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_action_runs_after_delay() {
        LocalSet::new()
            .run_until(async {
                let scope = ScreenScope::new();
                let (count, bump) = counter();
                let task = scope.schedule(Duration::from_millis(700), bump());

                sleep(Duration::from_millis(699)).await;
                assert_eq!(count.get(), 0);
                assert!(task.is_pending());

                sleep(Duration::from_millis(2)).await;
                assert_eq!(count.get(), 1);
                assert!(!task.is_pending());
                task.cancel();
                task.cancel();
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_is_idempotent_and_prevents_the_action() {
        LocalSet::new()
            .run_until(async {
                let scope = ScreenScope::new();
                let (count, bump) = counter();
                let task = scope.schedule(Duration::from_millis(10), bump());
                task.cancel();
                task.cancel();
                assert!(!task.is_pending());
                sleep(Duration::from_millis(50)).await;
                assert_eq!(count.get(), 0);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn closing_the_scope_cancels_all_tasks() {
        LocalSet::new()
            .run_until(async {
                let scope = ScreenScope::new();
                let (count, bump) = counter();
                let a = scope.schedule(Duration::from_millis(10), bump());
                let b = scope.schedule(Duration::from_secs(10), bump());
                scope.close();
                assert!(scope.is_closed());
                assert!(!a.is_pending());
                assert!(!b.is_pending());
                sleep(Duration::from_secs(11)).await;
                assert_eq!(count.get(), 0);
            })
            .await;
    }

    #[tokio::test(start_paused = true)]
    async fn slot_keeps_only_the_latest_task() {
        LocalSet::new()
            .run_until(async {
                let scope = ScreenScope::new();
                let slot = TaskSlot::new();
                let (count, bump) = counter();

                slot.cancel();
                slot.replace(scope.schedule(Duration::from_millis(100), bump()));
                sleep(Duration::from_millis(50)).await;
                slot.replace(scope.schedule(Duration::from_millis(100), bump()));
                assert!(slot.is_pending());

                sleep(Duration::from_millis(60)).await;
                assert_eq!(count.get(), 0);
                sleep(Duration::from_millis(50)).await;
                assert_eq!(count.get(), 1);
                assert!(!slot.is_pending());
            })
            .await;
    }
}
