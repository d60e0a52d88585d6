use std::{collections::HashMap, error::Error, fmt::Display};

use super::types::Type;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingAddError {
    pub name: String,
}

impl Display for BindingAddError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "tried to add already existing binding '{}'",
            self.name
        ))
    }
}

impl Error for BindingAddError {}

/// Metadata for a single value binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredVariable {
    pub type_id: Type,
    pub mutable: bool,
}

/// A single lexical frame: the variables/constants and functions declared
/// directly inside one block.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    variables: HashMap<String, StoredVariable>,
    functions: HashMap<String, Type>,
}

impl Frame {
    fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name) || self.functions.contains_key(name)
    }
}

/// Lexical scope stack. The innermost frame sits at the end of the vector;
/// lookups walk from the end backwards.
#[derive(Debug, Clone)]
pub struct Scope {
    stacks: Vec<Frame>,
}

impl Default for Scope {
    fn default() -> Self {
        Scope {
            stacks: vec![Frame::default()],
        }
    }
}

impl Scope {
    pub fn new() -> Scope {
        Self::default()
    }

    /// Enter a nested lexical region (block or function body).
    pub fn enter_scope(&mut self) {
        self.stacks.push(Frame::default());
    }

    pub fn exit_scope(&mut self) {
        self.stacks.pop();
    }

    /// Number of open frames; 1 means the global scope.
    pub fn depth(&self) -> usize {
        self.stacks.len()
    }

    /// Declare a variable or constant in the current frame. Fails if the name
    /// is already taken within this frame.
    pub fn add_variable(
        &mut self,
        name: &str,
        type_id: Type,
        mutable: bool,
    ) -> Result<(), BindingAddError> {
        let frame = self.stacks.last_mut().expect("scope stack is never empty");
        if frame.contains(name) {
            return Err(BindingAddError { name: name.into() });
        }
        frame
            .variables
            .insert(name.to_string(), StoredVariable { type_id, mutable });
        Ok(())
    }

    /// Declare a function in the current frame.
    pub fn add_function(&mut self, name: &str, type_id: Type) -> Result<(), BindingAddError> {
        let frame = self.stacks.last_mut().expect("scope stack is never empty");
        if frame.contains(name) {
            return Err(BindingAddError { name: name.into() });
        }
        frame.functions.insert(name.to_string(), type_id);
        Ok(())
    }

    /// Find a variable binding, walking the frames innermost-first.
    pub fn resolve_variable(&self, name: &str) -> Option<&StoredVariable> {
        self.stacks
            .iter()
            .rev()
            .find_map(|frame| frame.variables.get(name))
    }

    /// Find a function signature, walking the frames innermost-first.
    pub fn resolve_function(&self, name: &str) -> Option<&Type> {
        self.stacks
            .iter()
            .rev()
            .find_map(|frame| frame.functions.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_frames_shadow_outer_ones() {
        let mut scope = Scope::new();
        scope.add_variable("x", Type::Integer, true).unwrap();

        scope.enter_scope();
        scope.add_variable("x", Type::Boolean, false).unwrap();
        assert_eq!(
            scope.resolve_variable("x"),
            Some(&StoredVariable {
                type_id: Type::Boolean,
                mutable: false
            })
        );

        scope.exit_scope();
        assert_eq!(
            scope.resolve_variable("x"),
            Some(&StoredVariable {
                type_id: Type::Integer,
                mutable: true
            })
        );
    }

    #[test]
    fn test_redefinition_in_same_frame_fails() {
        let mut scope = Scope::new();
        scope.add_variable("x", Type::Integer, true).unwrap();
        assert!(scope.add_variable("x", Type::Integer, true).is_err());
        assert!(scope.add_function("x", Type::Void).is_err());
    }

    #[test]
    fn test_functions_resolve_through_frames() {
        let mut scope = Scope::new();
        scope
            .add_function(
                "f",
                Type::Function {
                    params: vec![],
                    return_value: Box::new(Type::Integer),
                },
            )
            .unwrap();

        scope.enter_scope();
        assert!(scope.resolve_function("f").is_some());
        assert!(scope.resolve_variable("f").is_none());
    }
}
