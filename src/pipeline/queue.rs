//! FIFO buffer between receipt and drain

use std::collections::VecDeque;

use parking_lot::Mutex;

use crate::types::Event;

/// Ordered queue of decoded events
///
/// Receipt may happen on any task; the single mutex keeps arrival order.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Mutex<VecDeque<Event>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the tail, returning the depth afterwards
    pub fn enqueue(&self, event: Event) -> usize {
        let mut events = self.events.lock();
        events.push_back(event);
        events.len()
    }

    /// Append several events in order under one lock, returning the depth afterwards
    pub fn extend(&self, batch: impl IntoIterator<Item = Event>) -> usize {
        let mut events = self.events.lock();
        events.extend(batch);
        events.len()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Take everything queued right now; later arrivals stay for the next drain
    pub fn take_all(&self) -> VecDeque<Event> {
        std::mem::take(&mut *self.events.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EventRecord;

    fn event(n: usize) -> Event {
        Event::new(
            "s",
            n as f64,
            EventRecord::Unrecognized {
                tag: n.to_string(),
            },
        )
    }

    #[test]
    fn test_fifo_order() {
        let queue = EventQueue::new();
        queue.enqueue(event(0));
        queue.extend((1..4).map(event));
        assert_eq!(queue.enqueue(event(4)), 5);

        let taken: Vec<f64> = queue.take_all().into_iter().map(|e| e.timestamp_ms).collect();
        assert_eq!(taken, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_take_all_leaves_later_arrivals() {
        let queue = EventQueue::new();
        queue.enqueue(event(0));
        let first = queue.take_all();
        queue.enqueue(event(1));

        assert_eq!(first.len(), 1);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_concurrent_producers_keep_per_producer_order() {
        let queue = std::sync::Arc::new(EventQueue::new());
        let handles: Vec<_> = (0..4)
            .map(|p| {
                let queue = queue.clone();
                std::thread::spawn(move || {
                    for i in 0..250 {
                        queue.enqueue(Event::new(
                            p.to_string(),
                            i as f64,
                            EventRecord::Unrecognized { tag: String::new() },
                        ));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let events = queue.take_all();
        assert_eq!(events.len(), 1000);
        for p in 0..4 {
            let seen: Vec<f64> = events
                .iter()
                .filter(|e| e.stream == p.to_string())
                .map(|e| e.timestamp_ms)
                .collect();
            assert!(seen.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(seen.len(), 250);
        }
    }
}
