use crate::ast::{BinOp, Expr, Function, Program, Stmt};
use crate::builtins::{Builtin, BuiltinKind};
use crate::error::RuntimeError;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

#[cfg(test)]
pub mod test;

/// A runtime value. Variant order matters for the derived comparisons:
/// numbers compare numerically, booleans as `false < true`, and mixed
/// variants fall back to declaration order without ever being equal.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Value {
    Number(f64),
    Bool(bool),
}

impl Value {
    /// Arithmetic coercion: booleans count as 0 or 1.
    pub fn as_number(self) -> f64 {
        match self {
            Value::Number(n) => n,
            Value::Bool(true) => 1.0,
            Value::Bool(false) => 0.0,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

#[derive(Clone)]
enum Binding {
    Value(Value),
    Function(Rc<Function>),
    /// Index into the built-in registry.
    Builtin(usize),
}

/// Tree-walking evaluator. Scopes form an explicit stack of frames; the
/// bottom frame is global and is seeded with the built-in registry. Each
/// function call pushes a fresh frame holding only its parameter bindings.
pub struct Interpreter<'a> {
    builtins: &'a [Builtin],
    scopes: Vec<HashMap<String, Binding>>,
    output: Box<dyn FnMut(Value) + 'a>,
}

impl<'a> Interpreter<'a> {
    pub fn new(builtins: &'a [Builtin], output: Box<dyn FnMut(Value) + 'a>) -> Self {
        let mut global = HashMap::new();
        for (index, builtin) in builtins.iter().enumerate() {
            global.insert(builtin.name.to_string(), Binding::Builtin(index));
        }
        Interpreter {
            builtins,
            scopes: vec![global],
            output,
        }
    }

    /// Runs the program for its side effects. A top-level `return` simply
    /// stops execution early.
    pub fn evaluate(&mut self, program: &Program) -> Result<(), RuntimeError> {
        self.exec_block(&program.body)?;
        Ok(())
    }

    /// Executes a block. `Some(value)` means a `return` fired; every caller
    /// forwards it immediately, so a return unwinds through all enclosing
    /// blocks up to the function boundary.
    fn exec_block(&mut self, body: &[Stmt]) -> Result<Option<Value>, RuntimeError> {
        for stmt in body {
            match stmt {
                Stmt::Expr(expr) => {
                    self.eval_expr(expr)?;
                }
                Stmt::Let { name, value } => {
                    let value = self.eval_expr(value)?;
                    self.current_frame().insert(name.clone(), Binding::Value(value));
                }
                Stmt::Assign { name, value } => {
                    let value = self.eval_expr(value)?;
                    self.assign(name, value)?;
                }
                Stmt::Return(expr) => {
                    let value = self.eval_expr(expr)?;
                    return Ok(Some(value));
                }
                Stmt::Function(func) => {
                    self.current_frame()
                        .insert(func.name.clone(), Binding::Function(Rc::new(func.clone())));
                }
                Stmt::If {
                    condition,
                    then_body,
                    else_body,
                } => {
                    if self.eval_condition(condition)? {
                        if let Some(value) = self.exec_block(then_body)? {
                            return Ok(Some(value));
                        }
                    } else if let Some(else_body) = else_body {
                        if let Some(value) = self.exec_block(else_body)? {
                            return Ok(Some(value));
                        }
                    }
                }
                Stmt::While { condition, body } => {
                    // Re-evaluated every iteration, no cap. An infinite loop
                    // runs forever by design.
                    while self.eval_condition(condition)? {
                        if let Some(value) = self.exec_block(body)? {
                            return Ok(Some(value));
                        }
                    }
                }
            }
        }
        Ok(None)
    }

    fn eval_expr(&mut self, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Number(value) => Ok(Value::Number(*value)),
            Expr::Variable(name) => match self.lookup(name)? {
                Binding::Value(value) => Ok(*value),
                _ => Err(RuntimeError::Type(format!("'{name}' is not a value"))),
            },
            Expr::BinOp {
                operator,
                left,
                right,
            } => {
                let lhs = self.eval_expr(left)?;
                let rhs = self.eval_expr(right)?;
                Ok(match operator {
                    BinOp::Add => Value::Number(lhs.as_number() + rhs.as_number()),
                    BinOp::Sub => Value::Number(lhs.as_number() - rhs.as_number()),
                    BinOp::Mul => Value::Number(lhs.as_number() * rhs.as_number()),
                    // Division by zero follows IEEE-754, no guard.
                    BinOp::Div => Value::Number(lhs.as_number() / rhs.as_number()),
                    BinOp::Greater => Value::Bool(lhs > rhs),
                    BinOp::Less => Value::Bool(lhs < rhs),
                    BinOp::Eq => Value::Bool(lhs == rhs),
                    BinOp::NotEq => Value::Bool(lhs != rhs),
                })
            }
            Expr::Call { name, args } => {
                let binding = self.lookup(name)?.clone();
                let mut values = Vec::with_capacity(args.len());
                for arg in args {
                    values.push(self.eval_expr(arg)?);
                }
                match binding {
                    Binding::Builtin(index) => match self.builtins[index].kind {
                        BuiltinKind::OutputOne => {
                            let Some(value) = values.first().copied() else {
                                return Err(RuntimeError::Type(format!(
                                    "'{name}' expects one argument"
                                )));
                            };
                            (self.output)(value);
                            Ok(value)
                        }
                    },
                    Binding::Function(func) => self.call_function(&func, values),
                    Binding::Value(_) => {
                        Err(RuntimeError::Type(format!("'{name}' is not a function")))
                    }
                }
            }
        }
    }

    /// Parameters bind positionally; arity is unchecked. A missing argument
    /// leaves its parameter unbound and surfaces as a NameError on first
    /// reference, extra arguments are dropped.
    fn call_function(&mut self, func: &Function, args: Vec<Value>) -> Result<Value, RuntimeError> {
        let mut frame = HashMap::new();
        for (param, value) in func.params.iter().zip(args) {
            frame.insert(param.clone(), Binding::Value(value));
        }
        self.scopes.push(frame);
        let result = self.exec_block(&func.body);
        self.scopes.pop();

        match result? {
            Some(value) => Ok(value),
            None => Err(RuntimeError::MissingReturn(func.name.clone())),
        }
    }

    fn eval_condition(&mut self, condition: &Expr) -> Result<bool, RuntimeError> {
        match self.eval_expr(condition)? {
            Value::Bool(flag) => Ok(flag),
            Value::Number(_) => Err(RuntimeError::Type(
                "condition must evaluate to a boolean".to_string(),
            )),
        }
    }

    /// Innermost-to-outermost scan across all live frames.
    fn lookup(&self, name: &str) -> Result<&Binding, RuntimeError> {
        self.scopes
            .iter()
            .rev()
            .find_map(|frame| frame.get(name))
            .ok_or_else(|| RuntimeError::Name(name.to_string()))
    }

    /// Rebinds the nearest existing binding; assignment never creates one.
    fn assign(&mut self, name: &str, value: Value) -> Result<(), RuntimeError> {
        for frame in self.scopes.iter_mut().rev() {
            if let Some(binding) = frame.get_mut(name) {
                *binding = Binding::Value(value);
                return Ok(());
            }
        }
        Err(RuntimeError::Name(name.to_string()))
    }

    fn current_frame(&mut self) -> &mut HashMap<String, Binding> {
        self.scopes.last_mut().expect("scope stack is never empty")
    }
}
