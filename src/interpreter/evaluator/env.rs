use std::{collections::HashMap, rc::Rc};

use crate::interpreter::value::core::Value;

/// A chain of variable scopes.
///
/// Each frame is shared through `Rc`, so extending an environment never
/// copies its parent and closures can keep the frames they were created in
/// alive. Frames are immutable once built.
///
/// # Example
/// ```
/// use std::collections::HashMap;
///
/// use mathly::interpreter::{evaluator::env::Env, value::core::Value};
///
/// let outer = Env::new().extend(HashMap::from([("x".to_string(), Value::from(1))]));
/// let inner = outer.extend(HashMap::from([("y".to_string(), Value::from(2))]));
///
/// assert_eq!(inner.get("x"), Some(&Value::from(1)));
/// assert_eq!(outer.get("y"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Env {
    frame: Option<Rc<Frame>>,
}

#[derive(Debug)]
struct Frame {
    bindings: HashMap<String, Value>,
    parent:   Env,
}

impl Env {
    /// The empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a child environment whose innermost frame holds `bindings`.
    #[must_use]
    pub fn extend(&self, bindings: HashMap<String, Value>) -> Self {
        Self { frame: Some(Rc::new(Frame { bindings,
                                           parent: self.clone() })), }
    }

    /// Looks a name up, innermost frame first.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        let mut current = self.frame.as_deref();
        while let Some(frame) = current {
            if let Some(value) = frame.bindings.get(name) {
                return Some(value);
            }
            current = frame.parent.frame.as_deref();
        }
        None
    }

    /// Number of frames in the chain.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.frame.as_deref();
        while let Some(frame) = current {
            depth += 1;
            current = frame.parent.frame.as_deref();
        }
        depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_bindings_shadow_outer_ones() {
        let outer = Env::new().extend(HashMap::from([("n".to_string(), Value::from(3))]));
        let inner = outer.extend(HashMap::from([("n".to_string(), Value::from(4))]));

        assert_eq!(inner.get("n"), Some(&Value::from(4)));
        assert_eq!(outer.get("n"), Some(&Value::from(3)));
        assert_eq!(inner.depth(), 2);
    }
}
