use super::{AssetError, AssetImporter, FurnitureDescriptor, ImportedAsset};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::{mpsc, Arc};
use std::thread;

/// Identifies one in-flight furniture load, handed out before the asset is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(pub u64);

pub struct LoadJob {
    pub ticket: LoadTicket,
    pub descriptor: Arc<FurnitureDescriptor>,
}

pub struct LoadResult {
    pub ticket: LoadTicket,
    pub descriptor: Arc<FurnitureDescriptor>,
    pub data: Result<ImportedAsset, AssetError>,
}

fn run_load_job(importer: &dyn AssetImporter, job: LoadJob) -> LoadResult {
    let LoadJob { ticket, descriptor } = job;
    let data = importer.import(&descriptor.mesh_path);
    LoadResult {
        ticket,
        descriptor,
        data,
    }
}

enum Dispatch {
    Threads {
        senders: Vec<mpsc::SyncSender<LoadJob>>,
        next_sender: AtomicUsize,
        rx: mpsc::Receiver<LoadResult>,
    },
    Inline {
        importer: Arc<dyn AssetImporter>,
        queue: VecDeque<LoadJob>,
    },
}

/// Runs asset imports off the editor thread. Results only become visible
/// through `drain`, which the editor calls from its own loop.
pub struct LoadWorker {
    dispatch: Dispatch,
}

impl LoadWorker {
    pub fn spawn(
        importer: Arc<dyn AssetImporter>,
        worker_count: usize,
        queue_depth: usize,
    ) -> Option<Self> {
        let worker_count = worker_count.max(1);
        let (result_tx, result_rx) = mpsc::channel();
        let mut senders = Vec::with_capacity(worker_count);
        for index in 0..worker_count {
            let (tx, rx) = mpsc::sync_channel::<LoadJob>(queue_depth.max(1));
            let thread_result_tx = result_tx.clone();
            let thread_importer = Arc::clone(&importer);
            let name = format!("asset-load-{index}");
            if thread::Builder::new()
                .name(name)
                .spawn(move || {
                    while let Ok(job) = rx.recv() {
                        let result = run_load_job(thread_importer.as_ref(), job);
                        if thread_result_tx.send(result).is_err() {
                            break;
                        }
                    }
                })
                .is_err()
            {
                log::error!("Failed to spawn asset load worker thread");
                return None;
            }
            senders.push(tx);
        }
        log::info!("Asset loader started ({} threads)", worker_count);
        Some(Self {
            dispatch: Dispatch::Threads {
                senders,
                next_sender: AtomicUsize::new(0),
                rx: result_rx,
            },
        })
    }

    /// Jobs are queued and imported during the next `drain` on the caller's thread.
    pub fn inline(importer: Arc<dyn AssetImporter>) -> Self {
        Self {
            dispatch: Dispatch::Inline {
                importer,
                queue: VecDeque::new(),
            },
        }
    }

    pub fn submit(&mut self, job: LoadJob) -> Result<(), LoadJob> {
        match &mut self.dispatch {
            Dispatch::Inline { queue, .. } => {
                queue.push_back(job);
                Ok(())
            }
            Dispatch::Threads {
                senders,
                next_sender,
                ..
            } => {
                if senders.is_empty() {
                    return Err(job);
                }
                let len = senders.len();
                let mut job = job;
                let start = next_sender.fetch_add(1, AtomicOrdering::Relaxed) % len;
                for offset in 0..len {
                    let idx = (start + offset) % len;
                    match senders[idx].try_send(job) {
                        Ok(()) => return Ok(()),
                        Err(mpsc::TrySendError::Full(returned))
                        | Err(mpsc::TrySendError::Disconnected(returned)) => {
                            job = returned;
                        }
                    }
                }
                Err(job)
            }
        }
    }

    pub fn drain(&mut self) -> Vec<LoadResult> {
        match &mut self.dispatch {
            Dispatch::Inline { importer, queue } => queue
                .drain(..)
                .map(|job| run_load_job(importer.as_ref(), job))
                .collect(),
            Dispatch::Threads { rx, .. } => {
                let mut results = Vec::new();
                while let Ok(result) = rx.try_recv() {
                    results.push(result);
                }
                results
            }
        }
    }
}
