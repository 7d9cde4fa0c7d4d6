use crate::{Axis, PeriodicTimer};
use std::{
    cell::RefCell,
    rc::{Rc, Weak},
    vec::Vec,
};
use tracing::trace;

/// Something which needs to be polled regularly from the control loop.
pub trait Pollable {
    /// Give the component a chance to do some work, returning `true` if it
    /// did.
    fn poll(&mut self) -> bool;
}

impl<'a, T: PeriodicTimer> Pollable for Axis<'a, T> {
    fn poll(&mut self) -> bool { Axis::poll(self) }
}

/// A cooperative control loop which polls every registered [`Pollable`] in
/// turn.
///
/// The scheduler only holds weak handles. Anything which has been dropped
/// since it was registered is skipped (and forgotten) instead of being
/// polled, so tearing down an axis never leaves a dangling tick behind.
///
/// Requires the `std` feature.
#[derive(Default)]
pub struct Scheduler<'a> {
    tasks: Vec<Weak<RefCell<dyn Pollable + 'a>>>,
}

impl<'a> Scheduler<'a> {
    pub fn new() -> Scheduler<'a> { Scheduler { tasks: Vec::new() } }

    /// Start polling `task` as part of this control loop.
    pub fn register<P: Pollable + 'a>(&mut self, task: &Rc<RefCell<P>>) {
        let task: Rc<RefCell<dyn Pollable + 'a>> = task.clone();
        self.tasks.push(Rc::downgrade(&task));
    }

    /// The number of registered tasks which are still alive.
    pub fn len(&self) -> usize {
        self.tasks.iter().filter(|t| t.strong_count() > 0).count()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Poll each live task once, in the order they were registered, and
    /// return how many of them did some work.
    ///
    /// A task which is already borrowed (e.g. because it is the one calling
    /// into the scheduler) gets skipped this time around.
    pub fn poll(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.strong_count() > 0);

        if self.tasks.len() != before {
            trace!(dropped = before - self.tasks.len(), "Forgetting dropped tasks");
        }

        let mut busy = 0;

        for task in &self.tasks {
            let task = match task.upgrade() {
                Some(t) => t,
                None => continue,
            };

            let mut borrowed = match task.try_borrow_mut() {
                Ok(b) => b,
                Err(_) => continue,
            };

            if borrowed.poll() {
                busy += 1;
            }
        }

        busy
    }
}
