#![forbid(unsafe_code)]

//! Ordering of phase callbacks across random chains and tick schedules.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use bltn_anim::{AnimationChain, AnimationCurve, AnimationPhase, AnimationScheduler};
use proptest::prelude::*;

type Log = Rc<RefCell<Vec<(usize, usize, &'static str)>>>;

fn build_chain(log: &Log, chain: usize, phases: usize, duration_ms: u64) -> AnimationChain {
    let mut built = AnimationChain::new(Duration::from_millis(duration_ms));
    for phase in 0..phases {
        let begin = Rc::clone(log);
        let end = Rc::clone(log);
        built.add(
            AnimationPhase::new(1.0 / phases as f32, AnimationCurve::EaseInOut)
                .block(move || begin.borrow_mut().push((chain, phase, "block")))
                .on_complete(move || end.borrow_mut().push((chain, phase, "complete"))),
        );
    }
    let finish = Rc::clone(log);
    built.on_finish(move || finish.borrow_mut().push((chain, usize::MAX, "finish")));
    built
}

fn expected(shapes: &[(usize, u64)]) -> Vec<(usize, usize, &'static str)> {
    let mut out = Vec::new();
    for (chain, &(phases, _)) in shapes.iter().enumerate() {
        for phase in 0..phases {
            out.push((chain, phase, "block"));
            out.push((chain, phase, "complete"));
        }
        out.push((chain, usize::MAX, "finish"));
    }
    out
}

proptest! {
    #[test]
    fn callbacks_run_in_chain_then_phase_order(
        shapes in prop::collection::vec((1usize..5, 0u64..400), 1..5),
        ticks in prop::collection::vec(1u64..250, 0..20),
    ) {
        let scheduler = AnimationScheduler::new();
        let log: Log = Rc::default();
        for (chain, &(phases, duration_ms)) in shapes.iter().enumerate() {
            build_chain(&log, chain, phases, duration_ms).start(&scheduler);
        }

        let mut now = scheduler.now();
        for step in ticks {
            now += Duration::from_millis(step);
            scheduler.tick(now);
            let seen = log.borrow().clone();
            let full = expected(&shapes);
            prop_assert_eq!(&seen[..], &full[..seen.len()]);
        }

        scheduler.flush();
        prop_assert!(scheduler.is_idle());
        prop_assert_eq!(log.borrow().clone(), expected(&shapes));
    }
}
