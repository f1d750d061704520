//! Reference interpreter for lowered method bodies
//!
//! Covers the subset of the IR that lowering produces for locals, loops,
//! branches and legacy jumps: integer, float, boolean and string values,
//! `Math.Pow`, `Math.Min` and `String.Concat`. Anything else is an
//! [`InterpreterError::Unsupported`]. Gotos may target any label of the
//! block they occur in or of an enclosing block.

use rustc_hash::FxHashMap;
use std::fmt;
use thiserror::Error;
use vb_ir::{BinaryOp, CastKind, IrExpr, IrLiteral, IrStmt, IrType, PrimitiveType, UnaryOp};

/// Iterations after which a run is considered divergent
const STEP_LIMIT: usize = 100_000;

/// Interpreter error
#[derive(Debug, Error, PartialEq)]
pub enum InterpreterError {
    /// Read or assignment of a variable that was never declared
    #[error("undefined variable: {0}")]
    UndefinedVariable(String),
    /// Goto without a matching label
    #[error("undefined label: {0}")]
    UndefinedLabel(String),
    /// Operand of the wrong type
    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch {
        /// Expected type
        expected: &'static str,
        /// Value found
        got: Value,
    },
    /// Division by zero
    #[error("division by zero")]
    DivisionByZero,
    /// `break` outside any iteration
    #[error("break outside an iteration")]
    StrayBreak,
    /// Ran past the step limit
    #[error("step limit exceeded")]
    StepLimit,
    /// IR outside the interpreted subset
    #[error("unsupported: {0}")]
    Unsupported(String),
}

type Result<T> = std::result::Result<T, InterpreterError>;

/// Runtime value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `null` and `default(T)` of reference types
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// String value
    String(String),
}

impl Value {
    fn as_bool(&self) -> Result<bool> {
        match self {
            Self::Bool(value) => Ok(*value),
            other => Err(mismatch("bool", other)),
        }
    }

    fn as_float(&self) -> Result<f64> {
        match self {
            #[allow(clippy::cast_precision_loss, reason = "test values are small")]
            Self::Int(value) => Ok(*value as f64),
            Self::Float(value) => Ok(*value),
            other => Err(mismatch("number", other)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(formatter, "null"),
            Self::Bool(value) => write!(formatter, "{value}"),
            Self::Int(value) => write!(formatter, "{value}"),
            Self::Float(value) => write!(formatter, "{value}"),
            Self::String(value) => write!(formatter, "\"{value}\""),
        }
    }
}

fn mismatch(expected: &'static str, got: &Value) -> InterpreterError {
    InterpreterError::TypeMismatch {
        expected,
        got: got.clone(),
    }
}

fn unsupported(what: impl fmt::Debug) -> InterpreterError {
    InterpreterError::Unsupported(format!("{what:?}"))
}

/// How a statement finished
#[derive(Debug)]
enum Flow {
    Normal,
    Break,
    Return(Option<Value>),
    Goto(String),
}

/// Interpreter state
#[derive(Debug, Default)]
pub struct Interpreter {
    /// Local variable values
    locals: FxHashMap<String, Value>,
    steps: usize,
}

impl Interpreter {
    /// Creates an interpreter with no locals
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of the local `name`, if declared
    #[must_use]
    pub fn local(&self, name: &str) -> Option<&Value> {
        self.locals.get(name)
    }

    /// Runs a method body and returns its result
    ///
    /// # Errors
    ///
    /// Returns `InterpreterError` if execution fails.
    pub fn run(&mut self, body: &[IrStmt]) -> Result<Option<Value>> {
        match self.block(body)? {
            Flow::Normal => Ok(None),
            Flow::Return(value) => Ok(value),
            Flow::Break => Err(InterpreterError::StrayBreak),
            Flow::Goto(label) => Err(InterpreterError::UndefinedLabel(label)),
        }
    }

    fn tick(&mut self) -> Result<()> {
        self.steps += 1;
        if self.steps > STEP_LIMIT {
            return Err(InterpreterError::StepLimit);
        }
        Ok(())
    }

    fn block(&mut self, body: &[IrStmt]) -> Result<Flow> {
        let mut position = 0;
        while let Some(statement) = body.get(position) {
            match self.statement(statement)? {
                Flow::Normal => position += 1,
                Flow::Goto(label) => {
                    let target = body
                        .iter()
                        .position(|statement| matches!(statement, IrStmt::Label(name) if *name == label));
                    match target {
                        Some(target) => {
                            self.tick()?;
                            position = target + 1;
                        }
                        None => return Ok(Flow::Goto(label)),
                    }
                }
                other => return Ok(other),
            }
        }
        Ok(Flow::Normal)
    }

    fn statement(&mut self, statement: &IrStmt) -> Result<Flow> {
        match statement {
            IrStmt::Declare { name, init, .. } => {
                let value = match init {
                    Some(init) => self.eval(init)?,
                    None => Value::Null,
                };
                self.locals.insert(name.clone(), value);
            }
            IrStmt::Assign { target, value } => {
                let IrExpr::Variable(name) = target else {
                    return Err(unsupported(target));
                };
                let value = self.eval(value)?;
                match self.locals.get_mut(name) {
                    Some(slot) => *slot = value,
                    None => return Err(InterpreterError::UndefinedVariable(name.clone())),
                }
            }
            IrStmt::Conditional {
                condition,
                then_body,
                else_body,
            } => {
                let branch = if self.eval(condition)?.as_bool()? {
                    then_body
                } else {
                    else_body
                };
                return self.block(branch);
            }
            IrStmt::Iteration {
                init,
                test,
                increment,
                body,
            } => return self.iteration(init.as_deref(), test, increment.as_deref(), body),
            IrStmt::Expression(expr) => {
                self.eval(expr)?;
            }
            IrStmt::Goto(label) => return Ok(Flow::Goto(label.clone())),
            IrStmt::Return(value) => {
                let value = value.as_ref().map(|value| self.eval(value)).transpose()?;
                return Ok(Flow::Return(value));
            }
            IrStmt::Break => return Ok(Flow::Break),
            IrStmt::Label(_) | IrStmt::Comment(_) => {}
        }
        Ok(Flow::Normal)
    }

    fn iteration(
        &mut self,
        init: Option<&IrStmt>,
        test: &IrExpr,
        increment: Option<&IrStmt>,
        body: &[IrStmt],
    ) -> Result<Flow> {
        if let Some(init) = init {
            self.statement(init)?;
        }
        loop {
            self.tick()?;
            if !self.eval(test)?.as_bool()? {
                return Ok(Flow::Normal);
            }
            match self.block(body)? {
                Flow::Normal => {}
                Flow::Break => return Ok(Flow::Normal),
                other => return Ok(other),
            }
            if let Some(increment) = increment {
                self.statement(increment)?;
            }
        }
    }

    fn eval(&mut self, expr: &IrExpr) -> Result<Value> {
        match expr {
            IrExpr::Literal(literal) => match literal {
                IrLiteral::Int(value) => Ok(Value::Int(*value)),
                IrLiteral::Float(value) => Ok(Value::Float(*value)),
                IrLiteral::Bool(value) => Ok(Value::Bool(*value)),
                IrLiteral::String(value) => Ok(Value::String(value.clone())),
                IrLiteral::Char(value) => Ok(Value::String(value.to_string())),
                other => Err(unsupported(other)),
            },
            IrExpr::Variable(name) => self
                .locals
                .get(name)
                .cloned()
                .ok_or_else(|| InterpreterError::UndefinedVariable(name.clone())),
            IrExpr::Binary { op, left, right } => {
                let left = self.eval(left)?;
                let right = self.eval(right)?;
                binary(*op, &left, &right)
            }
            IrExpr::Unary { op, operand } => match (op, self.eval(operand)?) {
                (UnaryOp::Plus, value @ (Value::Int(_) | Value::Float(_))) => Ok(value),
                (UnaryOp::Negate, Value::Int(value)) => Ok(Value::Int(-value)),
                (UnaryOp::Negate, Value::Float(value)) => Ok(Value::Float(-value)),
                (UnaryOp::Not, Value::Bool(value)) => Ok(Value::Bool(!value)),
                (UnaryOp::Not, Value::Int(value)) => Ok(Value::Int(!value)),
                (_, other) => Err(mismatch("operand", &other)),
            },
            IrExpr::Invoke {
                target: Some(target),
                method,
                args,
            } => {
                let IrExpr::TypeRef(IrType::Named(ty)) = target.as_ref() else {
                    return Err(unsupported(expr));
                };
                let args = args
                    .iter()
                    .map(|arg| self.eval(arg))
                    .collect::<Result<Vec<_>>>()?;
                library_call(ty, method, &args).ok_or_else(|| unsupported(expr))?
            }
            IrExpr::Cast {
                kind: CastKind::Convert,
                ty: IrType::Primitive(PrimitiveType::Int),
                expr,
            } => match self.eval(expr)? {
                #[allow(clippy::cast_possible_truncation, reason = "rounds like the runtime")]
                Value::Float(value) => Ok(Value::Int(value.round() as i64)),
                other => Ok(other),
            },
            IrExpr::Default(_) | IrExpr::Null => Ok(Value::Null),
            other => Err(unsupported(other)),
        }
    }
}

fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value> {
    use BinaryOp as B;
    match (op, left, right) {
        (B::Add, Value::Int(left), Value::Int(right)) => Ok(Value::Int(left + right)),
        (B::Subtract, Value::Int(left), Value::Int(right)) => Ok(Value::Int(left - right)),
        (B::Multiply, Value::Int(left), Value::Int(right)) => Ok(Value::Int(left * right)),
        (B::IntegerDivide | B::Modulus, Value::Int(_), Value::Int(0)) => {
            Err(InterpreterError::DivisionByZero)
        }
        (B::IntegerDivide, Value::Int(left), Value::Int(right)) => Ok(Value::Int(left / right)),
        (B::Modulus, Value::Int(left), Value::Int(right)) => Ok(Value::Int(left % right)),
        (B::Add, _, _) => Ok(Value::Float(left.as_float()? + right.as_float()?)),
        (B::Subtract, _, _) => Ok(Value::Float(left.as_float()? - right.as_float()?)),
        (B::Multiply, _, _) => Ok(Value::Float(left.as_float()? * right.as_float()?)),
        (B::Divide, _, _) => Ok(Value::Float(left.as_float()? / right.as_float()?)),
        (B::LogicalAnd | B::BitAnd, Value::Bool(left), Value::Bool(right)) => {
            Ok(Value::Bool(*left && *right))
        }
        (B::LogicalOr | B::BitOr, Value::Bool(left), Value::Bool(right)) => {
            Ok(Value::Bool(*left || *right))
        }
        (B::BitXor, Value::Bool(left), Value::Bool(right)) => Ok(Value::Bool(left != right)),
        (B::BitAnd, Value::Int(left), Value::Int(right)) => Ok(Value::Int(left & right)),
        (B::BitOr, Value::Int(left), Value::Int(right)) => Ok(Value::Int(left | right)),
        (B::BitXor, Value::Int(left), Value::Int(right)) => Ok(Value::Int(left ^ right)),
        (B::Equal | B::IdentityEqual, _, _) => Ok(Value::Bool(left == right)),
        (B::NotEqual | B::IdentityNotEqual, _, _) => Ok(Value::Bool(left != right)),
        (B::Less | B::LessEqual | B::Greater | B::GreaterEqual, _, _) => {
            let ordering = match (left, right) {
                (Value::String(left), Value::String(right)) => left.cmp(right),
                _ => left
                    .as_float()?
                    .partial_cmp(&right.as_float()?)
                    .ok_or_else(|| mismatch("ordered number", right))?,
            };
            Ok(Value::Bool(match op {
                B::Less => ordering.is_lt(),
                B::LessEqual => ordering.is_le(),
                B::Greater => ordering.is_gt(),
                _ => ordering.is_ge(),
            }))
        }
        _ => Err(unsupported((op, left, right))),
    }
}

/// The library calls lowering emits for operators
fn library_call(ty: &str, method: &str, args: &[Value]) -> Option<Result<Value>> {
    let result = match (ty, method, args) {
        ("Math", "Pow", [base, exponent]) => base
            .as_float()
            .and_then(|base| Ok(Value::Float(base.powf(exponent.as_float()?)))),
        ("Math", "Min", [Value::Int(left), Value::Int(right)]) => {
            Ok(Value::Int(*left.min(right)))
        }
        ("String", "Concat", [left, right]) => {
            let text = |value: &Value| match value {
                Value::String(text) => text.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            };
            Ok(Value::String(text(left) + &text(right)))
        }
        _ => return None,
    };
    Some(result)
}
