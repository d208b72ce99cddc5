//! What a completed `go_to_state` call hands back.

/// Outcome of a successful `go_to_state`.
///
/// `path` is the walked path: the DFS path for a normal walk, or
/// `[from, error_state]` after a fallback. `results` pairs each state whose
/// internal logic produced a value with that value, in walk order.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionReport<S, R> {
    path: Vec<S>,
    results: Vec<(S, R)>,
    fallback: bool,
}

impl<S, R> TransitionReport<S, R> {
    pub(crate) fn walked(path: Vec<S>, results: Vec<(S, R)>) -> Self {
        Self {
            path,
            results,
            fallback: false,
        }
    }

    pub(crate) fn fallback(from: S, error_state: S, result: Option<R>) -> Self
    where
        S: Clone,
    {
        let results = result
            .map(|r| vec![(error_state.clone(), r)])
            .unwrap_or_default();
        Self {
            path: vec![from, error_state],
            results,
            fallback: true,
        }
    }

    pub fn path(&self) -> &[S] {
        &self.path
    }

    pub fn results(&self) -> &[(S, R)] {
        &self.results
    }

    /// True when no path existed and the machine fell back to its error state.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    /// The last value produced during the walk.
    pub fn final_result(&self) -> Option<&R> {
        self.results.last().map(|(_, r)| r)
    }

    pub fn into_final_result(self) -> Option<R> {
        self.results.into_iter().last().map(|(_, r)| r)
    }

    pub fn into_results(self) -> Vec<(S, R)> {
        self.results
    }
}
