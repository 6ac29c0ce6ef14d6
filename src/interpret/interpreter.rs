use std::cell::{RefCell, RefMut};
use std::rc::Rc;

use log::{debug, trace};

use super::environment::Environment;
use super::error::RuntimeError;
use super::output::Output;
use super::prelude;
use super::value::{Callable, Function, Value};
use crate::ast::*;
use crate::token::{Token, TokenKind};

/// How a statement finished. `Return` unwinds to the nearest function call.
#[derive(Debug)]
pub(crate) enum Flow {
    Normal,
    Return(Value),
}

pub struct Interpreter {
    globals: Rc<RefCell<Environment>>,
    // the innermost scope of whatever is executing right now
    environment: Rc<RefCell<Environment>>,
    output: Rc<RefCell<dyn Output>>,
}

impl Interpreter {
    pub fn new(output: Rc<RefCell<dyn Output>>) -> Self {
        let globals = Environment::new().into_shared();
        prelude::install(&mut globals.borrow_mut());

        Self {
            environment: Rc::clone(&globals),
            globals,
            output,
        }
    }

    /// Forgets every global binding and reinstalls the natives.
    pub fn reset(&mut self) {
        debug!("resetting interpreter");
        let mut globals = self.globals.borrow_mut();
        globals.clear();
        prelude::install(&mut globals);
        drop(globals);
        self.environment = Rc::clone(&self.globals);
    }

    pub fn globals(&self) -> Rc<RefCell<Environment>> {
        Rc::clone(&self.globals)
    }

    pub(super) fn get_output(&self) -> RefMut<'_, dyn Output> {
        self.output.borrow_mut()
    }

    /// Runs the statements in order against the global scope. The first
    /// runtime error stops the unit; bindings made before it are kept.
    pub fn interpret(&mut self, stmts: &[Statement]) -> Result<(), RuntimeError> {
        debug!("interpreting {} statements", stmts.len());
        for stmt in stmts {
            trace!("{:?}", stmt);
            let result = self.interpret_stmt(stmt);
            match result {
                Ok(Flow::Normal) => (),
                // only reachable when the parser's top-level check was ignored
                Ok(Flow::Return(_)) => break,
                Err(err) => {
                    debug!("runtime error at line {}: {}", err.line(), err);
                    self.environment = Rc::clone(&self.globals);
                    return Err(err);
                }
            }
        }
        Ok(())
    }

    /// Executes `stmts` with `environment` as the current scope, restoring the
    /// previous scope however execution ends.
    pub(crate) fn execute_block(
        &mut self,
        stmts: &[Statement],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<Flow, RuntimeError> {
        let previous = std::mem::replace(&mut self.environment, environment);
        let result = self.interpret_stmt_list(stmts);
        self.environment = previous;
        result
    }

    fn interpret_stmt_list(&mut self, stmts: &[Statement]) -> Result<Flow, RuntimeError> {
        for stmt in stmts {
            if let Flow::Return(value) = self.interpret_stmt(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn interpret_stmt(&mut self, stmt: &Statement) -> Result<Flow, RuntimeError> {
        match stmt {
            Statement::Expr(expr) => {
                self.interpret_expr(expr)?;
                Ok(Flow::Normal)
            }
            Statement::Print(expr) => {
                let value = self.interpret_expr(expr)?;
                self.get_output().write_line(&value.to_string());
                Ok(Flow::Normal)
            }
            Statement::Var(node) => self.interpret_var_stmt(node),
            Statement::Block(stmts) => {
                let scope = Environment::new_enclosed(Rc::clone(&self.environment));
                self.execute_block(stmts, scope.into_shared())
            }
            Statement::If(node) => self.interpret_if_stmt(node),
            Statement::While(node) => self.interpret_while_stmt(node),
            Statement::Function(decl) => self.interpret_function_decl(decl),
            Statement::Return(node) => {
                let value = match &node.value {
                    Some(expr) => self.interpret_expr(expr)?,
                    None => Value::Null,
                };
                Ok(Flow::Return(value))
            }
        }
    }

    fn interpret_var_stmt(&mut self, node: &VarNode) -> Result<Flow, RuntimeError> {
        let value = match &node.initializer {
            Some(expr) => self.interpret_expr(expr)?,
            None => Value::Null,
        };
        self.environment.borrow_mut().define(&node.name, value)?;
        Ok(Flow::Normal)
    }

    fn interpret_if_stmt(&mut self, node: &IfNode) -> Result<Flow, RuntimeError> {
        if self.interpret_expr(&node.cond)?.is_truthy() {
            return self.interpret_stmt(&node.then_branch);
        }
        match &node.else_branch {
            Some(stmt) => self.interpret_stmt(stmt),
            None => Ok(Flow::Normal),
        }
    }

    fn interpret_while_stmt(
        &mut self,
        WhileNode { cond, body }: &WhileNode,
    ) -> Result<Flow, RuntimeError> {
        while self.interpret_expr(cond)?.is_truthy() {
            // a `return` inside the loop body stops the loop and bubbles up
            if let Flow::Return(value) = self.interpret_stmt(body)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn interpret_function_decl(&mut self, decl: &Rc<FunctionDecl>) -> Result<Flow, RuntimeError> {
        let function = Function {
            decl: Rc::clone(decl),
            closure: Rc::clone(&self.environment),
        };
        self.environment
            .borrow_mut()
            .define(&decl.name, Value::Callable(Callable::Function(function)))?;
        Ok(Flow::Normal)
    }

    fn interpret_expr(&mut self, expr: &Expression) -> Result<Value, RuntimeError> {
        match expr {
            Expression::Literal(literal) => Ok(Value::from(literal)),
            Expression::Grouping(inner) => self.interpret_expr(inner),
            Expression::Variable(name) => self.environment.borrow().get(name),
            Expression::Assign(AssignNode { name, value }) => {
                let value = self.interpret_expr(value)?;
                self.environment.borrow_mut().assign(name, value.clone())?;
                Ok(value)
            }
            Expression::Unary(UnaryNode { op, operand }) => self.interpret_unary_op(op, operand),
            Expression::Binary(node) => self.interpret_binary_op(node),
            Expression::Logical(node) => self.interpret_logical_op(node),
            Expression::Call(node) => self.interpret_fn_call(node),
        }
    }

    fn interpret_unary_op(
        &mut self,
        op: &Token,
        operand: &Expression,
    ) -> Result<Value, RuntimeError> {
        let res = self.interpret_expr(operand)?;
        match op.kind {
            TokenKind::Minus => match res.get_number() {
                Some(v) => Ok(Value::Number(-v)),
                None => Err(RuntimeError::OperandMustBeNumber(op.clone())),
            },
            TokenKind::Bang => Ok(Value::Bool(!res.is_truthy())),
            _ => Err(RuntimeError::UnknownOperator(op.clone())),
        }
    }

    fn interpret_binary_op(
        &mut self,
        BinaryOpNode { lhs, op, rhs }: &BinaryOpNode,
    ) -> Result<Value, RuntimeError> {
        let lhs_val = self.interpret_expr(lhs)?;
        let rhs_val = self.interpret_expr(rhs)?;

        match op.kind {
            TokenKind::Plus => add(op, lhs_val, rhs_val),
            TokenKind::Minus | TokenKind::Star | TokenKind::Slash => {
                binary_number(op, &lhs_val, &rhs_val)
            }
            TokenKind::Less
            | TokenKind::LessEqual
            | TokenKind::Greater
            | TokenKind::GreaterEqual => compare(op, &lhs_val, &rhs_val),
            TokenKind::EqualEqual => Ok(Value::Bool(lhs_val == rhs_val)),
            TokenKind::BangEqual => Ok(Value::Bool(lhs_val != rhs_val)),
            _ => Err(RuntimeError::UnknownOperator(op.clone())),
        }
    }

    /// Short-circuits and yields whichever operand decided the result.
    fn interpret_logical_op(
        &mut self,
        BinaryOpNode { lhs, op, rhs }: &BinaryOpNode,
    ) -> Result<Value, RuntimeError> {
        let lhs_val = self.interpret_expr(lhs)?;
        let decided = match op.kind {
            TokenKind::Or => lhs_val.is_truthy(),
            TokenKind::And => !lhs_val.is_truthy(),
            _ => return Err(RuntimeError::UnknownOperator(op.clone())),
        };
        if decided {
            return Ok(lhs_val);
        }
        self.interpret_expr(rhs)
    }

    fn interpret_fn_call(&mut self, node: &CallNode) -> Result<Value, RuntimeError> {
        let callee = self.interpret_expr(&node.callee)?;
        let args = node
            .args
            .iter()
            .map(|arg| self.interpret_expr(arg))
            .collect::<Result<Vec<_>, _>>()?;

        let Value::Callable(callable) = callee else {
            return Err(RuntimeError::NotCallable(node.paren.clone()));
        };

        if callable.arity() != args.len() {
            return Err(RuntimeError::ArityMismatch {
                paren: node.paren.clone(),
                expected: callable.arity(),
                got: args.len(),
            });
        }

        trace!("calling {} with {} arguments", callable, args.len());
        callable.call(self, args)
    }
}

// Functions declared at top level hold the global scope they live in. Clearing
// it breaks those cycles so the scope is freed with the interpreter.
impl Drop for Interpreter {
    fn drop(&mut self) {
        self.globals.borrow_mut().clear();
    }
}

fn add(op: &Token, lhs: Value, rhs: Value) -> Result<Value, RuntimeError> {
    match (lhs, rhs) {
        (Value::Number(l), Value::Number(r)) => Ok(Value::Number(l + r)),
        (Value::Str(l), Value::Str(r)) => {
            let joined = format!("{}{}", l, r);
            Ok(Value::Str(Rc::from(joined)))
        }
        _ => Err(RuntimeError::InvalidAddOperands(op.clone())),
    }
}

fn number_operands(op: &Token, lhs: &Value, rhs: &Value) -> Result<(f64, f64), RuntimeError> {
    match (lhs.get_number(), rhs.get_number()) {
        (Some(l), Some(r)) => Ok((l, r)),
        _ => Err(RuntimeError::OperandsMustBeNumbers(op.clone())),
    }
}

// division follows IEEE-754, so `1 / 0` is infinity rather than an error
fn binary_number(op: &Token, lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    let (l, r) = number_operands(op, lhs, rhs)?;
    let v = match op.kind {
        TokenKind::Minus => l - r,
        TokenKind::Star => l * r,
        TokenKind::Slash => l / r,
        _ => return Err(RuntimeError::UnknownOperator(op.clone())),
    };
    Ok(Value::Number(v))
}

fn compare(op: &Token, lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    let (l, r) = number_operands(op, lhs, rhs)?;
    let v = match op.kind {
        TokenKind::Less => l < r,
        TokenKind::LessEqual => l <= r,
        TokenKind::Greater => l > r,
        TokenKind::GreaterEqual => l >= r,
        _ => return Err(RuntimeError::UnknownOperator(op.clone())),
    };
    Ok(Value::Bool(v))
}
