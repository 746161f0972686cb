//! Reducer composition
//!
//! [`compose_reducers`] sequences whole-state reducers;
//! [`combine_reducers`](crate::combine::combine_reducers) splits a map state
//! across keyed slice reducers.

use crate::action::Action;
use crate::table::Reducer;

/// Compose a sequence of reducers into one, applying them in the order
/// given and threading the state through each.
///
/// `compose_reducers(vec![f, g, h])` yields the reducer
/// `(state, action) -> h(g(f(state, action), action), action)`.
pub fn compose_reducers<S: 'static>(reducers: Vec<Reducer<S>>) -> Reducer<S> {
    Box::new(move |state: S, action: &Action| {
        reducers
            .iter()
            .fold(state, |state, reducer| reducer(state, action))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::define::{define, Definition};

    static APPEND: Definition<String> = define("test::append");

    fn appending(suffix: &'static str) -> Reducer<String> {
        Box::new(move |state: String, action: &Action| {
            if APPEND.is(action) {
                state + suffix
            } else {
                state
            }
        })
    }

    #[test]
    fn applies_reducers_in_order() {
        let reduce = compose_reducers(vec![appending("a"), appending("b"), appending("c")]);
        let action = APPEND.create("".to_string()).unwrap();
        assert_eq!(reduce("x".to_string(), &action), "xabc");
    }

    #[test]
    fn empty_composition_is_identity() {
        let reduce = compose_reducers::<String>(vec![]);
        let action = APPEND.create("".to_string()).unwrap();
        assert_eq!(reduce("x".to_string(), &action), "x");
    }

    #[test]
    fn later_reducers_see_earlier_results() {
        let doubler: Reducer<i64> = Box::new(|state, _action| state * 2);
        let incrementer: Reducer<i64> = Box::new(|state, _action| state + 1);
        let reduce = compose_reducers(vec![incrementer, doubler]);
        let action = APPEND.create("".to_string()).unwrap();
        // (3 + 1) * 2, not 3 * 2 + 1
        assert_eq!(reduce(3, &action), 8);
    }
}
