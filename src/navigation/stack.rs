//! Navigation history.

use crate::error::AppError;
use crate::navigation::StateRef;

/// Ordered history of active states; the top is the current state.
#[derive(Default)]
pub struct StateStack {
    states: Vec<StateRef>,
}

impl StateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, state: StateRef) {
        self.states.push(state);
    }

    pub fn pop(&mut self) -> Option<StateRef> {
        self.states.pop()
    }

    pub fn top(&self) -> Option<&StateRef> {
        self.states.last()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }

    pub fn depth(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Pop the current state and the one beneath it, returning the latter.
    ///
    /// The stack is left untouched when it holds fewer than two states.
    pub fn take_previous(&mut self) -> Result<StateRef, AppError> {
        match self.states.len() {
            0 => Err(AppError::StackEmpty),
            1 => Err(AppError::StackInsufficient),
            _ => {
                self.states.pop();
                self.states.pop().ok_or(AppError::StackEmpty)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::State;
    use proptest::prelude::*;
    use std::rc::Rc;

    struct Named(&'static str);

    impl State for Named {
        fn id(&self) -> &str {
            self.0
        }
    }

    fn state(id: &'static str) -> StateRef {
        Rc::new(Named(id))
    }

    #[test]
    fn test_push_pop_top() {
        let mut stack = StateStack::new();
        assert!(stack.top().is_none());
        stack.push(state("a"));
        stack.push(state("b"));
        assert_eq!(stack.top().unwrap().id(), "b");
        assert_eq!(stack.pop().unwrap().id(), "b");
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_take_previous() {
        let mut stack = StateStack::new();
        stack.push(state("root"));
        stack.push(state("x"));
        stack.push(state("dialog"));

        assert_eq!(stack.take_previous().unwrap().id(), "x");
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top().unwrap().id(), "root");
    }

    #[test]
    fn test_take_previous_shallow_leaves_stack_unchanged() {
        let mut stack = StateStack::new();
        assert_eq!(stack.take_previous().unwrap_err(), AppError::StackEmpty);

        stack.push(state("root"));
        assert_eq!(stack.take_previous().unwrap_err(), AppError::StackInsufficient);
        assert_eq!(stack.depth(), 1);
        assert_eq!(stack.top().unwrap().id(), "root");
    }

    #[derive(Debug, Clone)]
    enum Op {
        Push,
        Pop,
        Clear,
        Previous,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::Push),
            Just(Op::Pop),
            Just(Op::Clear),
            Just(Op::Previous),
        ]
    }

    proptest! {
        #[test]
        fn test_depth_tracks_model(ops in proptest::collection::vec(op(), 0..64)) {
            let mut stack = StateStack::new();
            let mut model: usize = 0;
            for op in ops {
                match op {
                    Op::Push => {
                        stack.push(state("s"));
                        model += 1;
                    }
                    Op::Pop => {
                        stack.pop();
                        model = model.saturating_sub(1);
                    }
                    Op::Clear => {
                        stack.clear();
                        model = 0;
                    }
                    Op::Previous => {
                        let result = stack.take_previous();
                        if model >= 2 {
                            prop_assert!(result.is_ok());
                            model -= 2;
                        } else {
                            prop_assert!(result.unwrap_err().is_stack_error());
                        }
                    }
                }
                prop_assert_eq!(stack.depth(), model);
            }
        }
    }
}
