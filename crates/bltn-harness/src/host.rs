#![forbid(unsafe_code)]

//! A presentation host driven by the test.

use std::rc::Rc;

use bltn_stack::{Completion, PresentOptions, PresentationHost, PresentationSurface};

/// Host that records presentations and completes them on request.
#[derive(Default)]
pub struct ManualHost {
    complete_immediately: bool,
    presented: Vec<(Rc<dyn PresentationSurface>, PresentOptions)>,
    pending: Vec<Completion>,
}

impl ManualHost {
    /// Host that holds completions until [`finish_presentations`](Self::finish_presentations).
    pub fn new() -> Self {
        Self::default()
    }

    /// Host that calls each completion inside `present`.
    pub fn immediate() -> Self {
        Self {
            complete_immediately: true,
            ..Self::default()
        }
    }

    pub fn presentations(&self) -> usize {
        self.presented.len()
    }

    pub fn last_options(&self) -> Option<PresentOptions> {
        self.presented.last().map(|(_, options)| *options)
    }

    pub fn last_surface(&self) -> Option<Rc<dyn PresentationSurface>> {
        self.presented.last().map(|(surface, _)| Rc::clone(surface))
    }

    /// Run every held completion. Returns how many ran.
    pub fn finish_presentations(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let count = pending.len();
        for completion in pending {
            completion();
        }
        count
    }
}

impl PresentationHost for ManualHost {
    fn present(
        &mut self,
        surface: Rc<dyn PresentationSurface>,
        options: PresentOptions,
        completion: Option<Completion>,
    ) {
        self.presented.push((surface, options));
        if let Some(completion) = completion {
            if self.complete_immediately {
                completion();
            } else {
                self.pending.push(completion);
            }
        }
    }
}
