use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

const QUEUE_CAPACITY: usize = 8192;

/// Bounded, lossy queue of stereo samples from the emulator core to the host's audio
/// output thread.
///
/// The producer never blocks: when the queue is full the newest sample overwrites the
/// oldest, and the eviction is counted.
#[derive(Clone)]
pub struct AudioSampleQueue {
    samples: Arc<Mutex<VecDeque<(f32, f32)>>>,
    dropped: Arc<AtomicU64>,
}

impl AudioSampleQueue {
    pub(crate) fn new() -> Self {
        Self {
            samples: Arc::new(Mutex::new(VecDeque::with_capacity(QUEUE_CAPACITY))),
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    pub(crate) fn push(&self, left: f32, right: f32) {
        let mut samples = self.samples.lock().unwrap();
        if samples.len() >= QUEUE_CAPACITY {
            samples.pop_front();
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        samples.push_back((left, right));
    }

    /// Remove and return the oldest queued sample.
    pub fn pop(&self) -> Option<(f32, f32)> {
        self.samples.lock().unwrap().pop_front()
    }

    /// Remove and return all queued samples.
    pub fn drain(&self) -> Vec<(f32, f32)> {
        self.samples.lock().unwrap().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many queued samples have been evicted because the host was not consuming fast
    /// enough.
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
