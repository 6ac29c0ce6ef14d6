use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use derive_more::Display;

use crate::{
    ast::FunctionDecl,
    interpret::{
        environment::Environment,
        error::RuntimeError,
        interpreter::{Flow, Interpreter},
    },
    token::Literal,
};

pub type NativeBody = fn(&mut Interpreter, Vec<Value>) -> Result<Value, RuntimeError>;

/// A host-supplied function with a fixed arity.
#[derive(Display, Clone, Copy)]
#[display(fmt = "<native fn {}>", name)]
pub struct NativeFn {
    pub name: &'static str,
    pub arity: usize,
    pub body: NativeBody,
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NativeFn({}/{})", self.name, self.arity)
    }
}

/// A user-defined function together with the scope it was declared in.
#[derive(Clone)]
pub struct Function {
    pub decl: Rc<FunctionDecl>,
    pub closure: Rc<RefCell<Environment>>,
}

// the closure can (indirectly) contain this very function, so never print it
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Function({})", self.decl.name.lexeme)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<fn {}>", self.decl.name.lexeme)
    }
}

#[derive(Debug, Display, Clone)]
pub enum Callable {
    Native(NativeFn),
    Function(Function),
}

impl Callable {
    pub fn arity(&self) -> usize {
        match self {
            Callable::Native(native) => native.arity,
            Callable::Function(function) => function.decl.params.len(),
        }
    }

    /// Invokes the callable. The caller has already checked the argument count.
    pub fn call(&self, itp: &mut Interpreter, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match self {
            Callable::Native(native) => (native.body)(itp, args),
            Callable::Function(function) => {
                let mut env = Environment::new_enclosed(Rc::clone(&function.closure));
                for (param, arg) in function.decl.params.iter().zip(args) {
                    env.define(param, arg)?;
                }

                let flow = itp.execute_block(&function.decl.body, Rc::new(RefCell::new(env)))?;
                match flow {
                    Flow::Return(value) => Ok(value),
                    Flow::Normal => Ok(Value::Null),
                }
            }
        }
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callable::Native(l), Callable::Native(r)) => l.name == r.name,
            (Callable::Function(l), Callable::Function(r)) => {
                Rc::ptr_eq(&l.decl, &r.decl) && Rc::ptr_eq(&l.closure, &r.closure)
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Str(Rc<str>),
    Callable(Callable),
}

impl Value {
    /// Only `null` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Bool(false))
    }

    pub fn get_number(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&Literal> for Value {
    fn from(literal: &Literal) -> Self {
        match literal {
            Literal::Null => Value::Null,
            Literal::Bool(v) => Value::Bool(*v),
            Literal::Number(v) => Value::Number(*v),
            Literal::Str(v) => Value::Str(Rc::from(v.as_str())),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(l), Bool(r)) => l == r,
            (Number(l), Number(r)) => l == r,
            (Str(l), Str(r)) => l == r,
            (Callable(l), Callable(r)) => l == r,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Number(v) => write!(f, "{}", format_number(*v)),
            Value::Str(v) => write!(f, "{}", v),
            Value::Callable(v) => write!(f, "{}", v),
        }
    }
}

fn format_number(v: f64) -> String {
    let text = v.to_string();
    match text.strip_suffix(".0") {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}
