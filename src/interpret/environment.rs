use std::{cell::RefCell, collections::HashMap, rc::Rc};

use log::trace;

use super::value::Value;
use crate::{interpret::error::RuntimeError, token::Token};

/// One scope of bindings plus a link to the scope it is nested in.
///
/// Scopes are shared (`Rc<RefCell<_>>`) because a function value keeps the
/// scope it was declared in alive for as long as the function itself lives.
#[derive(Debug, Default)]
pub struct Environment {
    variables: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_enclosed(enclosing: Rc<RefCell<Environment>>) -> Self {
        Self {
            variables: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    pub fn into_shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    /// Binds `name` in this scope only. Shadowing an outer binding is fine,
    /// defining the same name twice in one scope is not.
    pub fn define(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if self.variables.contains_key(&name.lexeme) {
            return Err(RuntimeError::AlreadyDefined(name.clone()));
        }
        trace!("define `{}` = {}", name.lexeme, value);
        self.variables.insert(name.lexeme.clone(), value);
        Ok(())
    }

    /// Binds a host-provided value, replacing any previous binding.
    pub fn define_builtin(&mut self, name: &str, value: Value) {
        self.variables.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        self.lookup(&name.lexeme)
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.clone()))
    }

    /// Looks `name` up in this scope, then outward through the enclosing ones.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.variables.get(name) {
            return Some(value.clone());
        }
        self.enclosing
            .as_ref()
            .and_then(|parent| parent.borrow().lookup(name))
    }

    /// Replaces the value in the nearest scope that already binds `name`.
    /// Never creates a binding.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if let Some(slot) = self.variables.get_mut(&name.lexeme) {
            *slot = value;
            return Ok(());
        }
        match &self.enclosing {
            Some(parent) => parent.borrow_mut().assign(name, value),
            None => Err(RuntimeError::UndefinedVariable(name.clone())),
        }
    }

    pub fn clear(&mut self) {
        self.variables.clear();
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
