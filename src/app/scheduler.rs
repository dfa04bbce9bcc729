// src/app/scheduler.rs
// Cyclic reload: a cancellable periodic task on the tokio runtime that asks the UI thread
// to reload a dialog. The task never touches the table itself; it only posts
// UpdateMessage::CyclicReload and stops on its own once the dialog is gone.

use crate::app::{
    config::Cadence,
    state::{DialogKey, UpdateMessage},
};
use log::{debug, info, warn};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    mpsc::{SendError, Sender},
    Arc,
};
use tokio::{
    runtime::Handle,
    task::AbortHandle,
    time::{self, Instant, MissedTickBehavior},
};

// --- View Liveness ---

/// Shared "is the dialog still open" flag. Checked by the scheduler before posting a
/// tick and by the dialog again when the tick is handled on the UI thread.
#[derive(Debug, Clone)]
pub struct ViewLiveness(Arc<AtomicBool>);

impl ViewLiveness {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_alive(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn dispose(&self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Default for ViewLiveness {
    fn default() -> Self {
        Self::new()
    }
}

// --- UI Dispatch ---

type Waker = Arc<dyn Fn() + Send + Sync>;

/// Posts messages to the UI thread's channel and wakes its event loop.
#[derive(Clone)]
pub struct UiDispatcher {
    sender: Sender<UpdateMessage>,
    waker: Option<Waker>,
}

impl UiDispatcher {
    pub fn new(sender: Sender<UpdateMessage>) -> Self {
        Self { sender, waker: None }
    }

    /// Adds a callback run after every successful dispatch (e.g. a repaint request).
    pub fn with_waker(mut self, waker: impl Fn() + Send + Sync + 'static) -> Self {
        self.waker = Some(Arc::new(waker));
        self
    }

    pub fn dispatch(&self, message: UpdateMessage) -> Result<(), SendError<UpdateMessage>> {
        self.sender.send(message)?;
        if let Some(waker) = &self.waker {
            waker();
        }
        Ok(())
    }
}

impl std::fmt::Debug for UiDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiDispatcher")
            .field("waker", &self.waker.is_some())
            .finish()
    }
}

// --- Cyclic Reload ---

/// State machine for one dialog's periodic reload: `Disabled` ⇄ `Enabled`.
/// At most one periodic task exists per instance.
#[derive(Debug)]
pub struct CyclicReload {
    key: DialogKey,
    runtime: Handle,
    dispatcher: UiDispatcher,
    liveness: ViewLiveness,
    cadence: Cadence,
    task: Option<AbortHandle>,
}

impl CyclicReload {
    pub fn new(
        key: DialogKey,
        runtime: Handle,
        dispatcher: UiDispatcher,
        liveness: ViewLiveness,
        cadence: Cadence,
    ) -> Self {
        Self {
            key,
            runtime,
            dispatcher,
            liveness,
            cadence,
            task: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.task.is_some()
    }

    /// Arms the periodic task, cancelling any previous one first.
    pub fn enable(&mut self) {
        self.cancel();

        let key = self.key.clone();
        let dispatcher = self.dispatcher.clone();
        let liveness = self.liveness.clone();
        let Cadence { initial_delay, period } = self.cadence;

        let task = self.runtime.spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + initial_delay, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if !liveness.is_alive() {
                    debug!("Dialog '{}' is gone, stopping cyclic reload.", key);
                    break;
                }
                if let Err(e) = dispatcher.dispatch(UpdateMessage::CyclicReload(key.clone())) {
                    warn!("UI thread no longer receives reloads for '{}': {}", key, e);
                    break;
                }
            }
        });

        self.task = Some(task.abort_handle());
        info!("Cyclic reload enabled for '{}'.", self.key);
    }

    /// Cancels the periodic task without waiting for an in-flight tick.
    pub fn disable(&mut self) {
        if self.task.is_some() {
            info!("Cyclic reload disabled for '{}'.", self.key);
        }
        self.cancel();
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.enable();
        } else {
            self.disable();
        }
    }

    fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    #[cfg(test)]
    pub(crate) fn task_handle(&self) -> Option<AbortHandle> {
        self.task.clone()
    }
}

impl Drop for CyclicReload {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        sync::mpsc::{channel, Receiver},
        thread,
        time::Duration,
    };
    use tokio::runtime::Runtime;

    const FAST: Cadence = Cadence {
        initial_delay: Duration::from_millis(10),
        period: Duration::from_millis(10),
    };

    fn runtime() -> Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .unwrap()
    }

    fn reload(rt: &Runtime, liveness: ViewLiveness) -> (CyclicReload, Receiver<UpdateMessage>) {
        let (tx, rx) = channel();
        let reload = CyclicReload::new(
            "dialog".to_string(),
            rt.handle().clone(),
            UiDispatcher::new(tx),
            liveness,
            FAST,
        );
        (reload, rx)
    }

    fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
        for _ in 0..200 {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn enabled_schedule_posts_reloads_to_ui_channel() {
        let rt = runtime();
        let (mut reload, rx) = reload(&rt, ViewLiveness::new());
        reload.enable();

        let message = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(message, UpdateMessage::CyclicReload("dialog".to_string()));
        assert!(reload.is_enabled());
    }

    #[test]
    fn enabling_twice_leaves_one_task() {
        let rt = runtime();
        let (mut reload, _rx) = reload(&rt, ViewLiveness::new());
        reload.enable();
        let first = reload.task_handle().unwrap();
        reload.enable();
        let second = reload.task_handle().unwrap();

        assert!(wait_until(|| first.is_finished()));
        assert!(!second.is_finished());
    }

    #[test]
    fn disable_cancels_without_replacement() {
        let rt = runtime();
        let (mut reload, _rx) = reload(&rt, ViewLiveness::new());
        reload.enable();
        let task = reload.task_handle().unwrap();
        reload.disable();

        assert!(!reload.is_enabled());
        assert!(wait_until(|| task.is_finished()));
    }

    #[test]
    fn task_stops_itself_when_view_is_disposed() {
        let rt = runtime();
        let liveness = ViewLiveness::new();
        let (mut reload, rx) = reload(&rt, liveness.clone());
        reload.enable();
        let task = reload.task_handle().unwrap();

        liveness.dispose();
        assert!(wait_until(|| task.is_finished()));
        // Drain anything posted before disposal; nothing new arrives afterwards.
        while rx.try_recv().is_ok() {}
        thread::sleep(Duration::from_millis(50));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dispatcher_runs_waker() {
        let (tx, rx) = channel();
        let woken = Arc::new(AtomicBool::new(false));
        let flag = woken.clone();
        let dispatcher = UiDispatcher::new(tx).with_waker(move || flag.store(true, Ordering::SeqCst));

        dispatcher.dispatch(UpdateMessage::Log("hello".to_string())).unwrap();
        assert!(woken.load(Ordering::SeqCst));
        assert_eq!(rx.try_recv().unwrap(), UpdateMessage::Log("hello".to_string()));
    }
}
