/// Watches an iterative routine, such as view-factor correction, pass by pass.
///
/// The view-factor corrector calls `observe` after every fixed-point pass with
/// the pass number, the remaining completeness deviation, and how much it
/// changed. Returning `Some(action)` asks the corrector to act on it, for
/// example to stop and keep the better matrix so far. Returning `None` lets it
/// run on to convergence or its iteration cap.
///
/// Any `FnMut(&E) -> Option<A>` closure is an observer. Callers that only want
/// the result can pass `()`, which never acts.
pub trait Observer<E, A> {
    /// Inspects one pass and optionally requests an action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}
