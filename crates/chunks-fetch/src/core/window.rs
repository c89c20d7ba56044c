//! Slot bookkeeping for a fixed-size request window.
//!
//! The window decides which segment each slot requests next and how a
//! failure or the discovery of the final segment number affects the other
//! slots. It performs no I/O: callers act on the slot indices it returns.

use crate::error::{FetchFailure, PipelineError};

/// Identifies one issued request. A completion whose id no longer matches
/// its slot belongs to a request that was canceled or replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Running,
    Succeeded,
    Failed,
    Canceled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub segment:  u64,
    pub fetch_id: FetchId,
    pub state:    SlotState,
}

/// What a slot should do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextRequest {
    Issue(u64),
    /// Every segment up to the final one has been requested.
    Exhausted,
    Abort(PipelineError),
}

/// Effect of a permanent request failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureOutcome {
    Fatal(PipelineError),
    /// The pipeline continues; running requests in these slots were canceled.
    Continue { canceled: Vec<usize> },
}

#[derive(Debug)]
pub struct Window {
    slots:         Vec<Option<Slot>>,
    next_segment:  u64,
    final_segment: Option<u64>,
    has_failure:   bool,
    next_fetch_id: u64,
}

impl Window {
    pub fn new(size: usize) -> Self {
        Self {
            slots:         vec![None; size],
            next_segment:  0,
            final_segment: None,
            has_failure:   false,
            next_fetch_id: 0,
        }
    }

    pub fn size(&self) -> usize { self.slots.len() }

    pub fn final_segment(&self) -> Option<u64> { self.final_segment }

    pub fn has_failure(&self) -> bool { self.has_failure }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn running(&self) -> usize {
        self.slots
            .iter()
            .flatten()
            .filter(|slot| slot.state == SlotState::Running)
            .count()
    }

    /// Whether `fetch_id` is the request currently owning slot `index`.
    pub fn is_current(&self, index: usize, fetch_id: FetchId) -> bool {
        self.slot(index)
            .is_some_and(|slot| slot.fetch_id == fetch_id && slot.state == SlotState::Running)
    }

    /// Choose the next segment to request, consuming its number.
    pub fn next_request(&mut self) -> NextRequest {
        if self.has_failure && self.final_segment.is_none() {
            return NextRequest::Abort(PipelineError::FinalSegmentNotFound);
        }
        let candidate = self.next_segment;
        if self.final_segment.is_some_and(|last| candidate > last) {
            return NextRequest::Exhausted;
        }
        self.next_segment += 1;
        NextRequest::Issue(candidate)
    }

    /// Record a freshly issued request for `segment` in slot `index`.
    pub fn bind(&mut self, index: usize, segment: u64) -> FetchId {
        let fetch_id = FetchId(self.next_fetch_id);
        self.next_fetch_id += 1;
        self.slots[index] = Some(Slot { segment, fetch_id, state: SlotState::Running });
        fetch_id
    }

    pub fn mark_succeeded(&mut self, index: usize) { self.set_state(index, SlotState::Succeeded); }

    /// Latch the final segment number. The first declaration wins; later ones
    /// are ignored.
    ///
    /// Returns the slots whose running requests lie beyond the end and were
    /// canceled, or an error if a request at or below the end already failed.
    pub fn learn_final(&mut self, final_segment: u64) -> Result<Vec<usize>, PipelineError> {
        if self.final_segment.is_some() {
            return Ok(Vec::new());
        }
        self.final_segment = Some(final_segment);
        self.has_failure = false;

        let mut canceled = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let Some(slot) = slot else { continue };
            if slot.segment > final_segment {
                if slot.state == SlotState::Running {
                    slot.state = SlotState::Canceled;
                    canceled.push(index);
                }
            } else if slot.state == SlotState::Failed {
                return Err(PipelineError::SegmentFailed { segment: slot.segment });
            }
        }
        Ok(canceled)
    }

    /// Record that the request in slot `index` gave up.
    pub fn on_failure(&mut self, index: usize, failure: FetchFailure) -> FailureOutcome {
        let Some(segment) = self.slot(index).map(|slot| slot.segment) else {
            return FailureOutcome::Continue { canceled: Vec::new() };
        };
        self.set_state(index, SlotState::Failed);

        if let Some(last) = self.final_segment {
            if segment <= last {
                return FailureOutcome::Fatal(PipelineError::Fetch { segment, source: failure });
            }
            return FailureOutcome::Continue { canceled: Vec::new() };
        }

        // Without a known end, the failed segment may lie past it. Requests
        // beyond it are pointless either way.
        let mut canceled = Vec::new();
        let mut below_running = false;
        for (i, slot) in self.slots.iter_mut().enumerate() {
            let Some(slot) = slot else { continue };
            if slot.state != SlotState::Running {
                continue;
            }
            if slot.segment > segment {
                slot.state = SlotState::Canceled;
                canceled.push(i);
            } else {
                below_running = true;
            }
        }

        if !below_running {
            return FailureOutcome::Fatal(PipelineError::FinalSegmentNotFound);
        }
        self.has_failure = true;
        FailureOutcome::Continue { canceled }
    }

    /// Cancel every running request, returning the affected slots.
    pub fn cancel_all(&mut self) -> Vec<usize> {
        let mut canceled = Vec::new();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if let Some(slot) = slot
                && slot.state == SlotState::Running
            {
                slot.state = SlotState::Canceled;
                canceled.push(i);
            }
        }
        canceled
    }

    fn set_state(&mut self, index: usize, state: SlotState) {
        if let Some(Some(slot)) = self.slots.get_mut(index) {
            slot.state = state;
        }
    }
}

#[cfg(test)]
mod tests {
    use chunks_packet::NackReason;

    use super::*;

    fn nacked(segment: u64) -> FetchFailure {
        FetchFailure::Nacked {
            name:   format!("/w/seg={segment}").parse().unwrap(),
            reason: NackReason::NoRoute,
        }
    }

    fn fill(window: &mut Window) {
        for index in 0..window.size() {
            match window.next_request() {
                NextRequest::Issue(segment) => {
                    window.bind(index, segment);
                }
                other => panic!("unexpected {other:?}"),
            }
        }
    }

    #[test]
    fn test_requests_are_sequential() {
        let mut window = Window::new(3);
        fill(&mut window);
        let segments: Vec<_> = (0..3).map(|i| window.slot(i).unwrap().segment).collect();
        assert_eq!(segments, vec![0, 1, 2]);
        assert_eq!(window.running(), 3);
    }

    #[test]
    fn test_stale_fetch_id_is_not_current() {
        let mut window = Window::new(1);
        let first = window.bind(0, 0);
        let second = window.bind(0, 1);
        assert!(!window.is_current(0, first));
        assert!(window.is_current(0, second));
    }

    #[test]
    fn test_final_cancels_slots_beyond_it() {
        let mut window = Window::new(5);
        fill(&mut window);
        window.mark_succeeded(0);

        assert_eq!(window.learn_final(2), Ok(vec![3, 4]));
        assert_eq!(window.slot(3).unwrap().state, SlotState::Canceled);
        assert_eq!(window.next_request(), NextRequest::Exhausted);

        // first declaration wins
        assert_eq!(window.learn_final(9), Ok(Vec::new()));
        assert_eq!(window.final_segment(), Some(2));
    }

    #[test]
    fn test_final_with_failed_slot_below_is_fatal() {
        let mut window = Window::new(3);
        fill(&mut window);
        assert!(matches!(window.on_failure(1, nacked(1)), FailureOutcome::Continue { .. }));
        assert_eq!(window.learn_final(2), Err(PipelineError::SegmentFailed { segment: 1 }));
    }

    #[test]
    fn test_failure_with_unknown_final_latches() {
        let mut window = Window::new(4);
        fill(&mut window);

        assert_eq!(window.on_failure(2, nacked(2)), FailureOutcome::Continue { canceled: vec![3] });
        assert!(window.has_failure());
        assert_eq!(window.next_request(), NextRequest::Abort(PipelineError::FinalSegmentNotFound));
    }

    #[test]
    fn test_final_discovery_clears_failure_latch() {
        let mut window = Window::new(4);
        fill(&mut window);
        window.on_failure(3, nacked(3));

        window.mark_succeeded(2);
        assert_eq!(window.learn_final(2), Ok(Vec::new()));
        assert!(!window.has_failure());
        assert_eq!(window.next_request(), NextRequest::Exhausted);
    }

    #[test]
    fn test_failure_with_nothing_running_below_is_fatal() {
        let mut window = Window::new(2);
        fill(&mut window);
        assert!(matches!(window.on_failure(1, nacked(1)), FailureOutcome::Continue { .. }));
        assert_eq!(
            window.on_failure(0, nacked(0)),
            FailureOutcome::Fatal(PipelineError::FinalSegmentNotFound)
        );
    }

    #[test]
    fn test_failure_within_known_bounds_is_fatal() {
        let mut window = Window::new(2);
        fill(&mut window);
        window.mark_succeeded(0);
        window.learn_final(5).unwrap();
        assert_eq!(
            window.on_failure(1, nacked(1)),
            FailureOutcome::Fatal(PipelineError::Fetch { segment: 1, source: nacked(1) })
        );
    }

    #[test]
    fn test_cancel_all_only_touches_running_slots() {
        let mut window = Window::new(3);
        fill(&mut window);
        window.mark_succeeded(1);
        assert_eq!(window.cancel_all(), vec![0, 2]);
        assert_eq!(window.running(), 0);
    }
}
