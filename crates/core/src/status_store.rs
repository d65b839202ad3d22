//! Process-wide holder of the current status record

use arc_swap::ArcSwap;
use scale_stream_types::StatusRecord;
use std::sync::Arc;

/// Holds the single current [`StatusRecord`].
///
/// The record is swapped as one pointer, so a snapshot always carries fields
/// from exactly one `replace` call. Snapshots are `Arc`s and can be kept for
/// as long as a render takes without blocking the writer.
pub struct StatusStore {
    current: ArcSwap<StatusRecord>,
}

impl StatusStore {
    pub fn new(initial: StatusRecord) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
        }
    }

    /// Install a new record. Only the poller calls this.
    pub fn replace(&self, record: StatusRecord) {
        self.current.store(Arc::new(record));
    }

    /// Current record
    pub fn snapshot(&self) -> Arc<StatusRecord> {
        self.current.load_full()
    }

    pub fn scale_id(&self) -> String {
        self.current.load().scale_id().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use scale_stream_types::{Reading, ReadingStatus};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;

    fn generation(n: u64) -> StatusRecord {
        let reading = Reading::new(
            n.to_string(),
            format!("u{}", n),
            if n % 2 == 0 {
                ReadingStatus::Stable
            } else {
                ReadingStatus::Motion
            },
            Local::now(),
        );
        StatusRecord::new(reading, format!("s{}", n))
    }

    fn assert_consistent(record: &StatusRecord) -> u64 {
        let n: u64 = record.reading().value().parse().expect("generation value");
        assert_eq!(record.reading().unit(), format!("u{}", n));
        assert_eq!(record.scale_id(), format!("s{}", n));
        let expected = if n % 2 == 0 {
            ReadingStatus::Stable
        } else {
            ReadingStatus::Motion
        };
        assert_eq!(record.reading().status(), expected);
        n
    }

    #[test]
    fn test_snapshot_returns_latest_replace() {
        let store = StatusStore::new(generation(0));
        store.replace(generation(7));
        assert_consistent(&store.snapshot());
        assert_eq!(store.snapshot().reading().value(), "7");
        assert_eq!(store.scale_id(), "s7");
    }

    #[test]
    fn test_snapshot_outlives_replace() {
        let store = StatusStore::new(generation(1));
        let held = store.snapshot();
        store.replace(generation(2));
        assert_eq!(held.reading().value(), "1");
        assert_eq!(store.snapshot().reading().value(), "2");
    }

    #[test]
    fn test_no_torn_reads_under_concurrency() {
        let store = Arc::new(StatusStore::new(generation(0)));
        let done = Arc::new(AtomicBool::new(false));

        let writer = {
            let store = store.clone();
            let done = done.clone();
            thread::spawn(move || {
                for n in 1..=20_000 {
                    store.replace(generation(n));
                }
                done.store(true, Ordering::SeqCst);
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                let done = done.clone();
                thread::spawn(move || {
                    let mut last = 0;
                    let mut seen = 0usize;
                    while !done.load(Ordering::SeqCst) || seen == 0 {
                        let n = assert_consistent(&store.snapshot());
                        // Single writer: generations never go backwards
                        assert!(n >= last, "generation went backwards: {} < {}", n, last);
                        last = n;
                        seen += 1;
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(store.snapshot().reading().value(), "20000");
    }
}
