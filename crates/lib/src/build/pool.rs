//! Bounded worker pool.
//!
//! A fixed number of workers share one job queue and one result queue. Each
//! worker loops: take the next job, run it, send its result. Workers exit once
//! the job queue is closed and drained, or as soon as nobody is listening for
//! results any more.
//!
//! Dropping or shutting down the pool aborts every worker; toolchain children
//! are spawned with kill-on-drop, so in-flight builds are killed with them.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, info};

use crate::build::execute::run_job;
use crate::build::template::OutputTemplate;
use crate::build::types::{BuildJob, BuildResult};
use crate::consts::QUEUE_CAPACITY;
use crate::toolchain::Toolchain;

/// Settings shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct PoolSettings {
  pub workers: usize,
  pub toolchain: Toolchain,
  pub template: OutputTemplate,
}

struct Shared {
  toolchain: Toolchain,
  template: OutputTemplate,
}

pub struct WorkerPool {
  jobs: Option<mpsc::Sender<BuildJob>>,
  results: mpsc::Receiver<BuildResult>,
  tasks: JoinSet<()>,
  workers: usize,
}

impl WorkerPool {
  /// Start the workers. At least one worker is always started.
  pub fn spawn(settings: PoolSettings) -> Self {
    let workers = settings.workers.max(1);
    let (job_tx, job_rx) = mpsc::channel::<BuildJob>(QUEUE_CAPACITY);
    let (result_tx, result_rx) = mpsc::channel::<BuildResult>(QUEUE_CAPACITY);

    let job_rx = Arc::new(Mutex::new(job_rx));
    let shared = Arc::new(Shared {
      toolchain: settings.toolchain,
      template: settings.template,
    });

    info!(workers, "starting compiler workers");

    let mut tasks = JoinSet::new();
    for id in 0..workers {
      tasks.spawn(worker(id, Arc::clone(&job_rx), result_tx.clone(), Arc::clone(&shared)));
    }

    // Only the workers hold result senders now, so the result queue closes
    // once the last worker exits.
    drop(result_tx);

    Self {
      jobs: Some(job_tx),
      results: result_rx,
      tasks,
      workers,
    }
  }

  pub fn workers(&self) -> usize {
    self.workers
  }

  /// Queue every job and close the queue.
  ///
  /// Sending happens on its own task so back-pressure from a full queue never
  /// stalls the caller, who is expected to be draining results meanwhile.
  /// Returns the number of jobs queued. Calling this twice queues nothing the
  /// second time.
  pub fn dispatch(&mut self, jobs: Vec<BuildJob>) -> usize {
    let Some(sender) = self.jobs.take() else {
      return 0;
    };

    let count = jobs.len();
    self.tasks.spawn(async move {
      for job in jobs {
        if sender.send(job).await.is_err() {
          debug!("job queue closed before dispatch finished");
          break;
        }
      }
    });

    count
  }

  /// Wait for the next result. `None` once every worker has exited.
  #[cfg(test)]
  pub async fn next_result(&mut self) -> Option<BuildResult> {
    self.results.recv().await
  }

  /// Direct access to the result queue.
  pub fn results(&mut self) -> &mut mpsc::Receiver<BuildResult> {
    &mut self.results
  }

  /// Abort every worker, killing in-flight toolchain processes, and wait for
  /// them to wind down.
  pub async fn shutdown(mut self) {
    self.jobs.take();
    self.results.close();
    self.tasks.abort_all();
    while self.tasks.join_next().await.is_some() {}
  }
}

async fn worker(
  id: usize,
  jobs: Arc<Mutex<mpsc::Receiver<BuildJob>>>,
  results: mpsc::Sender<BuildResult>,
  shared: Arc<Shared>,
) {
  loop {
    let job = jobs.lock().await.recv().await;
    let Some(job) = job else {
      break;
    };

    debug!(worker = id, os = %job.os, arch = %job.arch, "picked up job");

    let result = run_job(job, &shared.toolchain, &shared.template).await;

    if results.send(result).await.is_err() {
      debug!(worker = id, "result queue closed, stopping");
      break;
    }
  }

  debug!(worker = id, "worker finished");
}
