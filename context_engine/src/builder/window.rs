//! Fixed-capacity sliding window over recent deliveries.

use match_events::DeliveryEvent;
use std::collections::VecDeque;

/// Ring buffer of the most recent deliveries with O(1) running totals.
///
/// On overflow the evicted delivery's contribution is subtracted from the
/// counters instead of recomputing the window, so a push is O(1) amortized.
#[derive(Debug, Clone)]
pub struct RecentWindow {
    capacity: usize,
    events: VecDeque<DeliveryEvent>,
    runs: u32,
    wickets: u32,
    boundaries: u32,
}

impl RecentWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            events: VecDeque::with_capacity(capacity),
            runs: 0,
            wickets: 0,
            boundaries: 0,
        }
    }

    /// Push a delivery, evicting the oldest once the window is full.
    pub fn push(&mut self, event: DeliveryEvent) {
        if self.events.len() == self.capacity {
            if let Some(oldest) = self.events.pop_front() {
                self.runs -= oldest.runs_total;
                if oldest.is_wicket {
                    self.wickets -= 1;
                }
                if oldest.is_boundary {
                    self.boundaries -= 1;
                }
            }
        }

        self.runs += event.runs_total;
        if event.is_wicket {
            self.wickets += 1;
        }
        if event.is_boundary {
            self.boundaries += 1;
        }
        self.events.push_back(event);
    }

    /// Total runs scored inside the window.
    pub fn runs(&self) -> u32 {
        self.runs
    }

    /// Wickets fallen inside the window.
    pub fn wickets(&self) -> u32 {
        self.wickets
    }

    /// Boundaries struck inside the window.
    pub fn boundaries(&self) -> u32 {
        self.boundaries
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The most recent `n` deliveries, oldest first.
    pub fn last_n(&self, n: usize) -> Vec<DeliveryEvent> {
        let skip = self.events.len().saturating_sub(n);
        self.events.iter().skip(skip).cloned().collect()
    }

    /// The most recent wicket still inside the window.
    pub fn last_wicket(&self) -> Option<&DeliveryEvent> {
        self.events.iter().rev().find(|e| e.is_wicket)
    }

    /// Drop every delivery and zero the counters.
    pub fn clear(&mut self) {
        self.events.clear();
        self.runs = 0;
        self.wickets = 0;
        self.boundaries = 0;
    }
}
