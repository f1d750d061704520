//! IR statements
//!
//! The vocabulary is fixed: assign, declare, conditional, iteration, goto,
//! labeled position, expression (call), return, break and comment.

use crate::expr::IrExpr;
use crate::types::IrType;
use serde::{Deserialize, Serialize};

/// Statements
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum IrStmt {
    /// `target = value`
    Assign {
        /// Assigned location
        target: IrExpr,
        /// Assigned value
        value: IrExpr,
    },
    /// `T name = init`
    Declare {
        /// Variable name
        name: String,
        /// Variable type
        ty: IrType,
        /// Initial value
        init: Option<IrExpr>,
    },
    /// `if (condition) { then } else { otherwise }`
    Conditional {
        /// Tested expression
        condition: IrExpr,
        /// Taken when true
        then_body: Vec<IrStmt>,
        /// Taken when false; an `else if` chain nests here
        else_body: Vec<IrStmt>,
    },
    /// `for (init; test; increment) { body }`, tested before every pass
    Iteration {
        /// Runs once before the first test
        init: Option<Box<IrStmt>>,
        /// Tested before each pass
        test: IrExpr,
        /// Runs after each pass
        increment: Option<Box<IrStmt>>,
        /// Body
        body: Vec<IrStmt>,
    },
    /// `goto label`
    Goto(String),
    /// `label:`
    Label(String),
    /// Expression evaluated for its effect, normally a call
    Expression(IrExpr),
    /// `return [value]`
    Return(Option<IrExpr>),
    /// `break`
    Break,
    /// Comment line
    Comment(String),
}

impl IrStmt {
    /// `target = value`
    #[must_use]
    pub const fn assign(target: IrExpr, value: IrExpr) -> Self {
        Self::Assign { target, value }
    }

    /// `T name = init`
    #[must_use]
    pub fn declare(name: impl Into<String>, ty: IrType, init: Option<IrExpr>) -> Self {
        Self::Declare {
            name: name.into(),
            ty,
            init,
        }
    }
}
