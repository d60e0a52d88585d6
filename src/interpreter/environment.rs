use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{parser::ast::Function, typechecker::TypeInfo};

use super::value::Value;

/// What a name is bound to at run time. The kind decides what may happen to
/// the binding later: constants are write-once, functions are not values.
#[derive(Debug, Clone)]
pub enum Binding {
    Constant(Value),
    Variable(Value),
    Function(Function<TypeInfo>),
}

/// Reference counted mutable pointer to one frame of bindings. Sharing is
/// what lets every call frame see (and mutate) the one global frame.
type Frame = Rc<RefCell<HashMap<String, Binding>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentError {
    AlreadyDefined,
    Undefined,
    Immutable,
    NotAssignable,
}

/// The scope chain of the tree-walking evaluator. The innermost frame sits at
/// the end; lookups walk from the end backwards.
#[derive(Debug, Clone)]
pub struct Environment {
    frames: Vec<Frame>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    /// Enter a nested lexical scope (block or compound expression).
    pub fn enter_scope(&mut self) {
        self.frames.push(Frame::default());
    }

    pub fn exit_scope(&mut self) {
        self.frames.pop();
    }

    /// Build the environment a function body runs in: the global frame (the
    /// definition site of every function) plus one fresh frame for the
    /// parameters and locals.
    pub fn call_environment(&self) -> Environment {
        Environment {
            frames: vec![self.frames[0].clone(), Frame::default()],
        }
    }

    /// Create a new binding in the current frame.
    pub fn define(&mut self, name: &str, binding: Binding) -> Result<(), EnvironmentError> {
        let frame = self.frames.last().expect("environment is never empty");
        if frame.borrow().contains_key(name) {
            return Err(EnvironmentError::AlreadyDefined);
        }
        frame.borrow_mut().insert(name.to_string(), binding);
        Ok(())
    }

    /// Look a name up, innermost frame first.
    pub fn lookup(&self, name: &str) -> Option<Binding> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.borrow().get(name).cloned())
    }

    /// Overwrite the value of an existing mutable binding.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), EnvironmentError> {
        for frame in self.frames.iter().rev() {
            let mut frame = frame.borrow_mut();
            match frame.get(name) {
                Some(Binding::Variable(_)) => {
                    frame.insert(name.to_string(), Binding::Variable(value));
                    return Ok(());
                }
                Some(Binding::Constant(_)) => return Err(EnvironmentError::Immutable),
                Some(Binding::Function(_)) => return Err(EnvironmentError::NotAssignable),
                None => {}
            }
        }
        Err(EnvironmentError::Undefined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_innermost_first() {
        let mut env = Environment::new();
        env.define("x", Binding::Variable(Value::Int(1))).unwrap();

        env.enter_scope();
        env.define("x", Binding::Variable(Value::Int(2))).unwrap();
        assert!(matches!(env.lookup("x"), Some(Binding::Variable(Value::Int(2)))));

        env.exit_scope();
        assert!(matches!(env.lookup("x"), Some(Binding::Variable(Value::Int(1)))));
    }

    #[test]
    fn test_assign_respects_binding_kind() {
        let mut env = Environment::new();
        env.define("c", Binding::Constant(Value::Int(1))).unwrap();
        env.define("v", Binding::Variable(Value::Int(1))).unwrap();

        assert_eq!(env.assign("v", Value::Int(2)), Ok(()));
        assert_eq!(
            env.assign("c", Value::Int(2)),
            Err(EnvironmentError::Immutable)
        );
        assert_eq!(
            env.assign("missing", Value::Int(2)),
            Err(EnvironmentError::Undefined)
        );
    }

    #[test]
    fn test_call_environment_shares_globals() {
        let mut env = Environment::new();
        env.define("g", Binding::Variable(Value::Int(1))).unwrap();

        let mut frame = env.call_environment();
        assert!(matches!(frame.lookup("g"), Some(Binding::Variable(Value::Int(1)))));

        // mutating the global from inside the call is visible outside
        frame.assign("g", Value::Int(2)).unwrap();
        assert!(matches!(env.lookup("g"), Some(Binding::Variable(Value::Int(2)))));

        // locals of the call frame are invisible outside
        frame.define("l", Binding::Variable(Value::Int(3))).unwrap();
        assert!(env.lookup("l").is_none());
    }

    #[test]
    fn test_call_environment_skips_caller_locals() {
        let mut env = Environment::new();
        env.enter_scope();
        env.define("local", Binding::Variable(Value::Int(1)))
            .unwrap();

        let frame = env.call_environment();
        assert!(frame.lookup("local").is_none());
    }
}
