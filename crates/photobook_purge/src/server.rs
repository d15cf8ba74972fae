//! Scheduled purge workers.
//!
//! Every purge task gets a worker actor fed over an mpsc channel and a
//! scheduler task that sleeps until the next execution of the task's schedule.
//! A worker runs one pass at a time; a tick that arrives while a pass is still
//! queued is dropped.

use crate::{PurgeConfig, PurgeReport, PurgeTask, Purger};
use chrono::Utc;
use photobook_error::PhotobookResult;
use photobook_interface::ReferenceOracle;
use photobook_storage::BlobStore;
use std::collections::HashMap;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Messages understood by a purge worker.
#[derive(Debug)]
pub enum PurgeMessage {
    /// Run one pass
    Purge,
    /// Stop the worker
    Shutdown,
}

/// A finished pass as broadcast to subscribers.
pub type PurgeEvent = (PurgeTask, PurgeReport);

/// Actor that runs one purge task on request.
pub struct PurgeWorker<S, O> {
    task: PurgeTask,
    purger: Arc<Purger<S, O>>,
    rx: mpsc::Receiver<PurgeMessage>,
    events: broadcast::Sender<PurgeEvent>,
}

impl<S: BlobStore, O: ReferenceOracle> PurgeWorker<S, O> {
    /// Create a worker.
    pub fn new(
        task: PurgeTask,
        purger: Arc<Purger<S, O>>,
        rx: mpsc::Receiver<PurgeMessage>,
        events: broadcast::Sender<PurgeEvent>,
    ) -> Self {
        Self {
            task,
            purger,
            rx,
            events,
        }
    }

    /// Runs the worker loop until shutdown or until every sender is gone.
    #[instrument(skip(self), fields(task = %self.task))]
    pub async fn run(mut self) {
        info!("Purge worker started");

        while let Some(msg) = self.rx.recv().await {
            match msg {
                PurgeMessage::Purge => match self.purger.run(self.task).await {
                    Ok(report) => {
                        // No subscribers is fine.
                        let _ = self.events.send((self.task, report));
                    }
                    Err(e) => error!(error = %e, "Purge pass failed"),
                },
                PurgeMessage::Shutdown => {
                    info!("Purge worker shutting down");
                    break;
                }
            }
        }
    }
}

/// Starts workers and schedulers for every purge task.
pub struct PurgeServer<S, O> {
    config: PurgeConfig,
    purger: Arc<Purger<S, O>>,
}

impl<S, O> PurgeServer<S, O>
where
    S: BlobStore + 'static,
    O: ReferenceOracle + 'static,
{
    /// Create a server.
    pub fn new(config: PurgeConfig, purger: Arc<Purger<S, O>>) -> Self {
        Self { config, purger }
    }

    /// Validate the schedules and spawn one worker and one scheduler per task.
    ///
    /// # Errors
    ///
    /// Fails before spawning anything if a schedule is invalid.
    #[instrument(skip(self))]
    pub fn start(self) -> PhotobookResult<PurgeHandle> {
        self.config.validate()?;
        info!("Starting purge server");

        let (events, _) = broadcast::channel(16);
        let mut senders = HashMap::new();
        let mut workers = Vec::new();
        let mut schedulers = Vec::new();

        for task in PurgeTask::iter() {
            let (tx, rx) = mpsc::channel(1);
            let worker = PurgeWorker::new(task, Arc::clone(&self.purger), rx, events.clone());
            workers.push(tokio::spawn(worker.run()));

            let schedule = self.config.schedule_for(task).clone();
            info!(task = %task, schedule = %schedule, "Scheduled purge task");
            schedulers.push(Self::spawn_scheduler(task, schedule, tx.clone()));
            senders.insert(task, tx);
        }

        Ok(PurgeHandle {
            senders,
            workers,
            schedulers,
            events,
        })
    }

    fn spawn_scheduler(
        task: PurgeTask,
        schedule: crate::PurgeSchedule,
        tx: mpsc::Sender<PurgeMessage>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                let Some(delay) = schedule.delay_from(Utc::now()) else {
                    warn!(task = %task, "Schedule has no upcoming runs, scheduler stopping");
                    break;
                };
                debug!(task = %task, delay_secs = delay.as_secs(), "Next purge scheduled");
                tokio::time::sleep(delay).await;

                match tx.try_send(PurgeMessage::Purge) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        warn!(task = %task, "Previous purge still pending, skipping tick");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => {
                        error!(task = %task, "Purge worker channel closed");
                        break;
                    }
                }
            }
        })
    }
}

/// Handle to a running purge server.
pub struct PurgeHandle {
    senders: HashMap<PurgeTask, mpsc::Sender<PurgeMessage>>,
    workers: Vec<JoinHandle<()>>,
    schedulers: Vec<JoinHandle<()>>,
    events: broadcast::Sender<PurgeEvent>,
}

impl PurgeHandle {
    /// Queue a pass of `task` outside its schedule.
    ///
    /// Returns `false` if the worker has stopped.
    pub async fn trigger(&self, task: PurgeTask) -> bool {
        match self.senders.get(&task) {
            Some(tx) => tx.send(PurgeMessage::Purge).await.is_ok(),
            None => false,
        }
    }

    /// Receive every report produced after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<PurgeEvent> {
        self.events.subscribe()
    }

    /// Stop the schedulers, let each worker finish its current pass, and wait
    /// for all of them.
    #[instrument(skip(self))]
    pub async fn shutdown(self) {
        for scheduler in &self.schedulers {
            scheduler.abort();
        }
        for (task, tx) in &self.senders {
            if tx.send(PurgeMessage::Shutdown).await.is_err() {
                debug!(task = %task, "Purge worker already stopped");
            }
        }
        for worker in self.workers {
            if let Err(e) = worker.await {
                error!(error = %e, "Purge worker panicked");
            }
        }
        info!("Purge server stopped");
    }
}
