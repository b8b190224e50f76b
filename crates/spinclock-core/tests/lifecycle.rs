//! End-to-end tests for the registry, lifecycle handlers, and scheduler.
//!
//! These drive the public API the way the plugin does: handlers mutate
//! the shared registry, the scheduler ticks over it, and a recording sink
//! stands in for the host connection.

#![allow(clippy::unwrap_used)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

use spinclock_core::lifecycle::LifecycleHandlers;
use spinclock_core::palette::{ColourSource, FixedSequence, SeededColours};
use spinclock_core::registry::InstanceRegistry;
use spinclock_core::scheduler::{RefreshScheduler, TickReport};
use spinclock_core::sink::{DispatchError, RenderCommand, RenderSink};
use spinclock_core::time::{FixedTime, TimeSource, WallTime};
use spinclock_types::{Colour, InstanceHandle};

#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<RenderCommand>>,
}

impl RecordingSink {
    fn take(&self) -> Vec<RenderCommand> {
        std::mem::take(&mut *self.sent.lock().unwrap())
    }
}

impl RenderSink for RecordingSink {
    fn dispatch(&self, command: RenderCommand) -> Result<(), DispatchError> {
        self.sent.lock().unwrap().push(command);
        Ok(())
    }
}

/// Rejects commands for one handle and records the rest.
struct FlakySink {
    bad: InstanceHandle,
    inner: RecordingSink,
}

impl RenderSink for FlakySink {
    fn dispatch(&self, command: RenderCommand) -> Result<(), DispatchError> {
        if command.handle == self.bad {
            return Err(DispatchError::Render {
                message: "simulated encoder failure".to_owned(),
            });
        }
        self.inner.dispatch(command)
    }
}

/// Removes `victim` from the registry on every dispatch, then records.
///
/// Deadlocks if the caller dispatches while holding the registry lock.
struct RemovingSink {
    registry: Arc<InstanceRegistry>,
    victim: InstanceHandle,
    inner: RecordingSink,
}

impl RenderSink for RemovingSink {
    fn dispatch(&self, command: RenderCommand) -> Result<(), DispatchError> {
        self.registry.remove(&self.victim);
        self.inner.dispatch(command)
    }
}

/// Time source that moves forward one minute per read.
struct SteppingTime(Mutex<u8>);

impl TimeSource for SteppingTime {
    fn now(&self) -> WallTime {
        let mut minute = self.0.lock().unwrap();
        let current = *minute;
        *minute = minute.saturating_add(1) % 60;
        WallTime::new(10, current).unwrap()
    }
}

struct Plugin {
    registry: Arc<InstanceRegistry>,
    handlers: LifecycleHandlers,
    scheduler: RefreshScheduler,
}

fn plugin(
    colours: Arc<dyn ColourSource>,
    time: Arc<dyn TimeSource>,
    sink: Arc<dyn RenderSink>,
) -> Plugin {
    let registry = Arc::new(InstanceRegistry::new());
    let handlers = LifecycleHandlers::new(
        Arc::clone(&registry),
        colours,
        Arc::clone(&time),
        Arc::clone(&sink),
    );
    let scheduler = RefreshScheduler::new(Arc::clone(&registry), time, sink);
    Plugin {
        registry,
        handlers,
        scheduler,
    }
}

const C1: Colour = Colour::rgb(0x11, 0x22, 0x33);
const C2: Colour = Colour::rgb(0xaa, 0xbb, 0xcc);

#[test]
fn appear_press_disappear_then_silent_tick() {
    let sink = Arc::new(RecordingSink::default());
    let p = plugin(
        Arc::new(FixedSequence::new(vec![C1, C2])),
        Arc::new(FixedTime(WallTime::new(8, 45).unwrap())),
        sink.clone(),
    );
    let a = InstanceHandle::from("A");

    p.handlers.appeared(a.clone());
    let snapshot = p.registry.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.get(&a), Some(&C1));

    p.handlers.interacted(a.clone());
    assert_eq!(p.registry.snapshot().get(&a), Some(&C2));
    let immediate = sink.take();
    assert_eq!(immediate.len(), 1);
    assert_eq!(immediate.first().map(|c| &c.handle), Some(&a));
    assert_eq!(immediate.first().map(|c| c.face.colour), Some(C2));

    p.handlers.disappeared(&a);
    assert!(p.registry.snapshot().is_empty());

    assert_eq!(p.scheduler.tick(), TickReport::default());
    assert!(sink.take().is_empty());
}

#[test]
fn reappearance_gets_a_fresh_colour() {
    let sink = Arc::new(RecordingSink::default());
    let p = plugin(
        Arc::new(FixedSequence::new(vec![C1, C2])),
        Arc::new(FixedTime(WallTime::new(0, 0).unwrap())),
        sink,
    );
    let a = InstanceHandle::from("A");

    p.handlers.appeared(a.clone());
    p.handlers.disappeared(&a);
    p.handlers.appeared(a.clone());
    assert_eq!(p.registry.get(&a), Some(C2));
}

#[test]
fn two_instances_share_one_captured_time_per_tick() {
    let sink = Arc::new(RecordingSink::default());
    let p = plugin(
        Arc::new(FixedSequence::new(vec![C1, C2])),
        Arc::new(SteppingTime(Mutex::new(15))),
        sink.clone(),
    );
    let a = InstanceHandle::from("A");
    let b = InstanceHandle::from("B");

    p.handlers.appeared(a.clone());
    p.handlers.appeared(b.clone());
    assert_eq!(p.registry.get(&a), Some(C1));
    assert_eq!(p.registry.get(&b), Some(C2));

    let report = p.scheduler.tick();
    assert_eq!(report.rendered, 2);
    let sent = sink.take();
    let handles: BTreeSet<_> = sent.iter().map(|c| c.handle.clone()).collect();
    assert_eq!(handles, BTreeSet::from([a, b]));
    // The stepping clock would give each read a different minute, so equal
    // rotations prove the time was read once for the whole tick.
    let rotations: BTreeSet<u16> = sent.iter().map(|c| c.face.rotation).collect();
    assert_eq!(rotations, BTreeSet::from([90]));

    // The next tick reads the clock again.
    p.scheduler.tick();
    let next: BTreeSet<u16> = sink.take().iter().map(|c| c.face.rotation).collect();
    assert_eq!(next, BTreeSet::from([96]));
}

#[test]
fn one_failed_dispatch_does_not_block_the_others() {
    let sink = Arc::new(FlakySink {
        bad: InstanceHandle::from("B"),
        inner: RecordingSink::default(),
    });
    let p = plugin(
        Arc::new(SeededColours::new(7)),
        Arc::new(FixedTime(WallTime::new(12, 0).unwrap())),
        sink.clone(),
    );
    for name in ["A", "B", "C"] {
        p.handlers.appeared(InstanceHandle::from(name));
    }

    let expected = TickReport {
        rendered: 2,
        failed: 1,
    };
    assert_eq!(p.scheduler.tick(), expected);
    assert_eq!(p.scheduler.tick(), expected);

    let drawn: Vec<String> = sink
        .inner
        .take()
        .into_iter()
        .map(|c| c.handle.into_inner())
        .collect();
    assert_eq!(drawn, vec!["A", "C", "A", "C"]);
}

#[test]
fn removal_during_tick_takes_effect_next_tick() {
    let registry = Arc::new(InstanceRegistry::new());
    let a = InstanceHandle::from("A");
    let b = InstanceHandle::from("B");
    registry.set(a.clone(), C1);
    registry.set(b.clone(), C2);

    let sink = Arc::new(RemovingSink {
        registry: Arc::clone(&registry),
        victim: b,
        inner: RecordingSink::default(),
    });
    let scheduler = RefreshScheduler::new(
        Arc::clone(&registry),
        Arc::new(FixedTime(WallTime::new(3, 30).unwrap())),
        sink.clone(),
    );

    // B leaves while A is being drawn. The tick works from its snapshot, so
    // B is drawn one last time.
    assert_eq!(scheduler.tick().rendered, 2);
    let remaining: Vec<_> = registry.snapshot().into_keys().collect();
    assert_eq!(remaining, vec![a.clone()]);
    let first: Vec<String> = sink
        .inner
        .take()
        .into_iter()
        .map(|c| c.handle.into_inner())
        .collect();
    assert_eq!(first, vec!["A", "B"]);

    assert_eq!(scheduler.tick().rendered, 1);
    let second = sink.inner.take();
    assert_eq!(second.len(), 1);
    assert_eq!(second.first().map(|c| &c.handle), Some(&a));
}

/// Splits a `w<writer>-<index>` handle.
fn writer_and_index(handle: &InstanceHandle) -> (u8, usize) {
    let (writer, index) = handle.as_str().split_once('-').unwrap();
    (
        writer.trim_start_matches('w').parse().unwrap(),
        index.parse().unwrap(),
    )
}

#[test]
#[allow(clippy::arithmetic_side_effects)]
fn concurrent_writers_and_readers_see_whole_operations() {
    const WRITERS: u8 = 8;
    const READERS: usize = 4;
    const HANDLES_PER_WRITER: usize = 50;
    const ROUNDS: u8 = 20;

    let registry = Arc::new(InstanceRegistry::new());
    let barrier = Arc::new(Barrier::new(usize::from(WRITERS) + READERS));
    let mut threads = Vec::new();

    // Each writer fills its handles in ascending order, then empties them in
    // ascending order. Its live handles therefore always form one unbroken
    // index range. The last round stops after removing the lower half.
    for writer in 0..WRITERS {
        let registry = Arc::clone(&registry);
        let barrier = Arc::clone(&barrier);
        threads.push(thread::spawn(move || {
            let handles: Vec<_> = (0..HANDLES_PER_WRITER)
                .map(|i| InstanceHandle::new(format!("w{writer}-{i}")))
                .collect();
            barrier.wait();
            for round in 0..ROUNDS {
                for handle in &handles {
                    registry.set(handle.clone(), Colour::rgb(writer, round, 0));
                }
                let keep = if round + 1 == ROUNDS {
                    HANDLES_PER_WRITER / 2
                } else {
                    0
                };
                for handle in handles.iter().take(HANDLES_PER_WRITER - keep) {
                    registry.remove(handle);
                }
            }
        }));
    }

    for _ in 0..READERS {
        let registry = Arc::clone(&registry);
        let barrier = Arc::clone(&barrier);
        threads.push(thread::spawn(move || {
            barrier.wait();
            for _ in 0..500 {
                let mut live: BTreeMap<u8, Vec<usize>> = BTreeMap::new();
                for (handle, colour) in registry.snapshot() {
                    let (writer, index) = writer_and_index(&handle);
                    assert_eq!(colour.red, writer, "{handle} has a foreign colour");
                    live.entry(writer).or_default().push(index);
                }
                for (writer, mut indices) in live {
                    indices.sort_unstable();
                    let lowest = indices.first().copied().unwrap();
                    let highest = indices.last().copied().unwrap();
                    assert_eq!(
                        highest - lowest + 1,
                        indices.len(),
                        "writer {writer} has a gap in {indices:?}"
                    );
                }
            }
        }));
    }

    for t in threads {
        t.join().unwrap();
    }

    let expected: BTreeSet<InstanceHandle> = (0..WRITERS)
        .flat_map(|w| {
            (HANDLES_PER_WRITER / 2..HANDLES_PER_WRITER)
                .map(move |i| InstanceHandle::new(format!("w{w}-{i}")))
        })
        .collect();
    let actual: BTreeSet<InstanceHandle> = registry.snapshot().into_keys().collect();
    assert_eq!(actual, expected);
    let last_round = registry.snapshot().values().all(|c| c.green == ROUNDS - 1);
    assert!(last_round);
}

#[test]
fn readers_never_see_a_colour_go_backwards() {
    let registry = Arc::new(InstanceRegistry::new());
    let handle = InstanceHandle::from("shared");

    let writer = {
        let registry = Arc::clone(&registry);
        let handle = handle.clone();
        thread::spawn(move || {
            for step in 0..=u8::MAX {
                registry.set(handle.clone(), Colour::rgb(step, step, step));
            }
        })
    };
    let churn: Vec<_> = (0..3u8)
        .map(|n| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let other = InstanceHandle::new(format!("churn-{n}"));
                for _ in 0..500 {
                    registry.set(other.clone(), Colour::rgb(n, 0, 0));
                    registry.remove(&other);
                }
            })
        })
        .collect();

    let mut seen: Option<Colour> = None;
    for _ in 0..2_000 {
        let current = registry.snapshot().get(&handle).copied();
        if let Some(previous) = seen {
            let current = current.unwrap();
            assert!(current >= previous, "{current} read after {previous}");
        }
        seen = current.or(seen);
    }

    writer.join().unwrap();
    for t in churn {
        t.join().unwrap();
    }
    assert_eq!(registry.get(&handle), Some(Colour::rgb(255, 255, 255)));
    assert_eq!(registry.len(), 1);
}
