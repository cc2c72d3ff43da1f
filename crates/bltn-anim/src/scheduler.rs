#![forbid(unsafe_code)]

//! Cooperative, single-threaded scheduler for animation chains.
//!
//! The scheduler is a tiny task queue: chains wait in FIFO order and only the
//! head chain advances. Time moves forward when the host calls
//! [`AnimationScheduler::tick`] (typically once per frame); tests and
//! teardown paths can fast-forward with [`finish`](AnimationScheduler::finish)
//! or [`flush`](AnimationScheduler::flush).
//!
//! # Invariants
//!
//! 1. Within a chain: phase *n*'s block, then phase *n*'s completion, then
//!    phase *n+1*'s block. Nothing overlaps.
//! 2. A chain's `on_finish` runs after its last completion and before the
//!    next chain's first block.
//! 3. No internal borrow is held while a user closure runs, so closures may
//!    start new chains.
//! 4. Calls that advance the queue from inside a running closure do not run
//!    anything themselves; the outer pump picks up the work in order.
//!
//! # Failure Modes
//!
//! - `finish(id)` for an unknown or completed chain is a no-op.
//! - `finish`/`flush` called from inside a phase closure return without
//!   fast-forwarding (see invariant 4).
//! - A panicking closure loses the rest of its step but leaves the
//!   scheduler usable.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::trace;
use web_time::Instant;

use crate::chain::{AnimationChain, AnimationPhase, Callback};
use crate::curve::AnimationCurve;

/// Global counter for unique chain ids.
static CHAIN_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Identifier of a chain handed to a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(u64);

impl ChainId {
    fn next() -> Self {
        Self(CHAIN_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Progress of the phase currently animating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseProgress {
    pub chain: ChainId,
    /// Zero-based index of the phase within its chain.
    pub phase: usize,
    /// Linear progress in `[0.0, 1.0]`.
    pub linear: f32,
    /// Progress after applying the phase's curve.
    pub eased: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pump {
    /// Run what is due at the scheduler's current time.
    Due,
    /// Run everything up to the end of the given chain.
    Through(ChainId),
    /// Run everything.
    All,
}

struct RunningPhase {
    index: usize,
    curve: AnimationCurve,
    begins_at: Instant,
    ends_at: Instant,
    block: Option<Callback>,
    completion: Option<Callback>,
}

struct QueuedChain {
    id: ChainId,
    duration: Duration,
    phases: VecDeque<AnimationPhase>,
    next_index: usize,
    /// Start of the next phase; set when the chain reaches the queue head.
    next_start: Option<Instant>,
    running: Option<RunningPhase>,
    on_finish: Option<Callback>,
}

struct SchedulerInner {
    queue: VecDeque<QueuedChain>,
    now: Instant,
}

impl SchedulerInner {
    /// Advance the head chain's state machine until a closure is ready to
    /// run or nothing more is due.
    fn next_step(&mut self, mode: Pump) -> Option<Callback> {
        let forced = mode != Pump::Due;
        loop {
            if let Pump::Through(target) = mode
                && !self.queue.iter().any(|c| c.id == target)
            {
                return None;
            }
            let now = self.now;
            let head = self.queue.front_mut()?;
            let start = *head.next_start.get_or_insert(now);

            if head.running.is_none() {
                let Some(mut phase) = head.phases.pop_front() else {
                    let finished = self.queue.pop_front()?;
                    trace!(chain = finished.id.0, "animation chain finished");
                    if let Some(next) = self.queue.front_mut() {
                        next.next_start = None;
                    }
                    match finished.on_finish {
                        Some(handler) => return Some(handler),
                        None => continue,
                    }
                };
                let begins_at = start + phase.delay_in(head.duration);
                let ends_at = begins_at + phase.length_in(head.duration);
                trace!(
                    chain = head.id.0,
                    phase = head.next_index,
                    "animation phase scheduled"
                );
                head.running = Some(RunningPhase {
                    index: head.next_index,
                    curve: phase.curve(),
                    begins_at,
                    ends_at,
                    block: phase.block.take(),
                    completion: phase.completion.take(),
                });
                head.next_index += 1;
                continue;
            }

            let running = head.running.as_mut()?;
            if running.block.is_some() || now < running.begins_at {
                if !forced && now < running.begins_at {
                    return None;
                }
                if let Some(block) = running.block.take() {
                    return Some(block);
                }
            }
            if !forced && now < running.ends_at {
                return None;
            }
            head.next_start = Some(if forced { now.min(running.ends_at) } else { running.ends_at });
            let completion = head.running.take().and_then(|r| r.completion);
            if let Some(completion) = completion {
                return Some(completion);
            }
        }
    }
}

/// Resets the pumping flag even if a closure panics.
struct PumpGuard<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> PumpGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            None
        } else {
            Some(Self { flag })
        }
    }
}

impl Drop for PumpGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

struct Shared {
    inner: RefCell<SchedulerInner>,
    pumping: Cell<bool>,
}

/// Shared handle to a cooperative animation scheduler.
///
/// Clones refer to the same queue.
#[derive(Clone)]
pub struct AnimationScheduler {
    shared: Rc<Shared>,
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            shared: Rc::new(Shared {
                inner: RefCell::new(SchedulerInner {
                    queue: VecDeque::new(),
                    now: Instant::now(),
                }),
                pumping: Cell::new(false),
            }),
        }
    }

    /// Enqueue a chain and run whatever is already due.
    pub fn start(&self, chain: AnimationChain) -> ChainId {
        let id = ChainId::next();
        {
            let mut inner = self.shared.inner.borrow_mut();
            let wall = Instant::now();
            if wall > inner.now {
                inner.now = wall;
            }
            trace!(
                chain = id.0,
                phases = chain.phases.len(),
                duration_ms = chain.duration().as_millis() as u64,
                queued = inner.queue.len(),
                "animation chain started"
            );
            let duration = chain.duration();
            inner.queue.push_back(QueuedChain {
                id,
                duration,
                phases: chain.phases.into(),
                next_index: 0,
                next_start: None,
                running: None,
                on_finish: chain.on_finish,
            });
        }
        self.pump(Pump::Due);
        id
    }

    /// Advance time to `now` (never backwards) and run what is due.
    pub fn tick(&self, now: Instant) {
        {
            let mut inner = self.shared.inner.borrow_mut();
            if now > inner.now {
                inner.now = now;
            }
        }
        self.pump(Pump::Due);
    }

    /// Advance to the current wall-clock time.
    pub fn tick_now(&self) {
        self.tick(Instant::now());
    }

    /// Run every step up to and including the end of chain `id`, ignoring
    /// time. Chains queued ahead of it finish first.
    pub fn finish(&self, id: ChainId) {
        self.pump(Pump::Through(id));
    }

    /// Run everything queued, ignoring time.
    pub fn flush(&self) {
        self.pump(Pump::All);
    }

    pub fn is_idle(&self) -> bool {
        self.shared.inner.borrow().queue.is_empty()
    }

    pub fn is_pending(&self, id: ChainId) -> bool {
        self.shared.inner.borrow().queue.iter().any(|c| c.id == id)
    }

    pub fn pending_chains(&self) -> usize {
        self.shared.inner.borrow().queue.len()
    }

    /// The scheduler's notion of the current time.
    pub fn now(&self) -> Instant {
        self.shared.inner.borrow().now
    }

    /// Progress of the head chain's running phase at `now`.
    pub fn progress(&self, now: Instant) -> Option<PhaseProgress> {
        let inner = self.shared.inner.borrow();
        let head = inner.queue.front()?;
        let running = head.running.as_ref()?;
        let span = running.ends_at.saturating_duration_since(running.begins_at);
        let linear = if span.is_zero() {
            1.0
        } else {
            let elapsed = now.saturating_duration_since(running.begins_at);
            (elapsed.as_secs_f64() / span.as_secs_f64()).min(1.0) as f32
        };
        Some(PhaseProgress {
            chain: head.id,
            phase: running.index,
            linear,
            eased: running.curve.apply(linear),
        })
    }

    fn pump(&self, mode: Pump) {
        let Some(_guard) = PumpGuard::enter(&self.shared.pumping) else {
            trace!(?mode, "scheduler already pumping; deferring to outer pump");
            return;
        };
        loop {
            let work = self.shared.inner.borrow_mut().next_step(mode);
            match work {
                Some(work) => work(),
                None => break,
            }
        }
        // Work enqueued by closures after the forced target was reached
        // still runs if it is due.
        if mode != Pump::Due {
            loop {
                let work = self.shared.inner.borrow_mut().next_step(Pump::Due);
                match work {
                    Some(work) => work(),
                    None => break,
                }
            }
        }
    }
}

impl fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.shared.inner.borrow();
        f.debug_struct("AnimationScheduler")
            .field("pending_chains", &inner.queue.len())
            .field("pumping", &self.shared.pumping.get())
            .finish()
    }
}
