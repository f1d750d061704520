//! Expression lowering and operator mapping
//!
//! Every source operator maps to exactly one IR operator or one library
//! call. `Like` reads the comparison mode accumulated so far in the file.

use crate::context::LowerContext;
use crate::error::LowerError;
use crate::types::primitive;
use tracing::trace;
use vb_ir::{BinaryOp, CastKind, CompareMode, IrExpr, IrLiteral, IrType, UnaryOp};
use vb_syntax::lookup;
use vb_syntax::token::OperatorKind;
use vb_syntax::{
    Argument, Expr, Initializer, Literal, NodeData, NodeId, NodeKind, SyntaxTree, TypeName,
};

/// IR form of a binary operator: an infix operator or a library call
enum BinaryForm {
    Infix(BinaryOp),
    Call(&'static str, &'static str),
    Like,
}

const fn binary_form(op: OperatorKind) -> Option<BinaryForm> {
    use OperatorKind as O;
    let form = match op {
        O::Plus => BinaryForm::Infix(BinaryOp::Add),
        O::Minus => BinaryForm::Infix(BinaryOp::Subtract),
        O::Multiply => BinaryForm::Infix(BinaryOp::Multiply),
        O::Divide => BinaryForm::Infix(BinaryOp::Divide),
        O::IntegralDivide => BinaryForm::Infix(BinaryOp::IntegerDivide),
        O::Modulus => BinaryForm::Infix(BinaryOp::Modulus),
        O::ShiftLeft => BinaryForm::Infix(BinaryOp::ShiftLeft),
        O::ShiftRight => BinaryForm::Infix(BinaryOp::ShiftRight),
        O::Equals => BinaryForm::Infix(BinaryOp::Equal),
        O::NotEquals => BinaryForm::Infix(BinaryOp::NotEqual),
        O::LessThan => BinaryForm::Infix(BinaryOp::Less),
        O::LessThanEquals => BinaryForm::Infix(BinaryOp::LessEqual),
        O::GreaterThan => BinaryForm::Infix(BinaryOp::Greater),
        O::GreaterThanEquals => BinaryForm::Infix(BinaryOp::GreaterEqual),
        O::Is => BinaryForm::Infix(BinaryOp::IdentityEqual),
        O::IsNot => BinaryForm::Infix(BinaryOp::IdentityNotEqual),
        O::And => BinaryForm::Infix(BinaryOp::BitAnd),
        O::Or => BinaryForm::Infix(BinaryOp::BitOr),
        O::Xor => BinaryForm::Infix(BinaryOp::BitXor),
        O::AndAlso => BinaryForm::Infix(BinaryOp::LogicalAnd),
        O::OrElse => BinaryForm::Infix(BinaryOp::LogicalOr),
        O::Power => BinaryForm::Call("Math", "Pow"),
        O::Concatenate => BinaryForm::Call("String", "Concat"),
        O::Like => BinaryForm::Like,
        O::To | O::UnaryPlus | O::Negate | O::Not => return None,
    };
    Some(form)
}

const fn unary_op(op: OperatorKind) -> Option<UnaryOp> {
    match op {
        OperatorKind::UnaryPlus => Some(UnaryOp::Plus),
        OperatorKind::Negate => Some(UnaryOp::Negate),
        OperatorKind::Not => Some(UnaryOp::Not),
        _ => None,
    }
}

fn lower_literal(literal: &Literal) -> IrLiteral {
    match literal {
        Literal::String(text) => IrLiteral::String(text.clone()),
        Literal::Character(character) => IrLiteral::Char(*character),
        Literal::Date(text) => IrLiteral::Date(text.clone()),
        Literal::Integer { value, .. } => IrLiteral::Int(*value),
        Literal::FloatingPoint { value, .. } => IrLiteral::Float(*value),
        Literal::Decimal(text) => IrLiteral::Decimal(text.clone()),
        Literal::Boolean(value) => IrLiteral::Bool(*value),
    }
}

/// `System.Type.Missing`, passed for an omitted argument
fn overflowing_bound(tree: &SyntaxTree, bound: NodeId) -> LowerError {
    LowerError::malformed(format!(
        "array bound at {} has a length that does not fit in 64 bits",
        tree.span(bound)
    ))
}

fn missing_argument() -> IrExpr {
    IrExpr::field(IrExpr::TypeRef(IrType::named("Type")), "Missing")
}

impl LowerContext<'_> {
    /// Applies a binary operator to already lowered operands
    pub fn binary_operation(
        &self,
        op: OperatorKind,
        left: IrExpr,
        right: IrExpr,
    ) -> Option<IrExpr> {
        let lowered = match binary_form(op)? {
            BinaryForm::Infix(op) => IrExpr::binary(op, left, right),
            BinaryForm::Call(ty, method) => IrExpr::static_call(ty, method, vec![left, right]),
            BinaryForm::Like => {
                let method = match self.compare() {
                    CompareMode::Binary => "Binary",
                    CompareMode::Text => "Text",
                };
                let mode = IrExpr::field(IrExpr::TypeRef(IrType::named("CompareMethod")), method);
                IrExpr::static_call("LikeOperator", "LikeString", vec![left, right, mode])
            }
        };
        Some(lowered)
    }

    pub fn lower_expr(&mut self, id: NodeId) -> Result<IrExpr, LowerError> {
        let tree = self.tree;
        let Some(expr) = tree.expr(id) else {
            return Err(self.unsupported(id));
        };
        match expr {
            Expr::Literal(literal) => Ok(IrExpr::Literal(lower_literal(literal))),
            Expr::Nothing => Ok(IrExpr::Null),
            Expr::Instance => match tree.kind(id) {
                NodeKind::MyBaseExpression => Ok(IrExpr::Base),
                _ => Ok(IrExpr::This),
            },
            Expr::SimpleName { name } => Ok(IrExpr::Variable(self.text(*name)?)),
            Expr::TypeReference { ty } => Ok(IrExpr::TypeRef(self.lower_type(*ty)?)),
            Expr::Qualified {
                qualifier, name, ..
            } => {
                let target = self.qualifier(id, *qualifier)?;
                Ok(IrExpr::field(target, self.text(*name)?))
            }
            Expr::DictionaryLookup {
                qualifier, name, ..
            } => {
                let target = self.qualifier(id, *qualifier)?;
                let key = IrExpr::Literal(IrLiteral::String(self.text(*name)?));
                Ok(IrExpr::Index {
                    target: Box::new(target),
                    indices: vec![key],
                })
            }
            Expr::CallOrIndex {
                target, arguments, ..
            } => self.lower_call_or_index(id, *target, *arguments),
            Expr::New { ty, arguments } => Ok(IrExpr::ObjectCreate {
                ty: self.lower_type(*ty)?,
                args: self.lower_arguments(*arguments)?,
            }),
            Expr::NewAggregate { ty, initializer } => self.lower_array_creation(*ty, *initializer),
            Expr::Cast { operand, ty } => {
                let kind = match tree.kind(id) {
                    NodeKind::DirectCastExpression => CastKind::Direct,
                    NodeKind::TryCastExpression => CastKind::Try,
                    _ => CastKind::Convert,
                };
                Ok(IrExpr::Cast {
                    kind,
                    ty: self.lower_type(*ty)?,
                    expr: Box::new(self.lower_expr(*operand)?),
                })
            }
            Expr::IntrinsicCast { target, operand } => Ok(IrExpr::Cast {
                kind: CastKind::Convert,
                ty: IrType::Primitive(primitive(*target)),
                expr: Box::new(self.lower_expr(*operand)?),
            }),
            Expr::TypeOf { operand, ty } => Ok(IrExpr::TypeIs {
                expr: Box::new(self.lower_expr(*operand)?),
                ty: self.lower_type(*ty)?,
            }),
            Expr::GetType { ty } => Ok(IrExpr::TypeOf(self.lower_type(*ty)?)),
            Expr::AddressOf { operand } => match self.lower_expr(*operand)? {
                IrExpr::Variable(method) => Ok(IrExpr::MethodRef {
                    target: None,
                    method,
                }),
                IrExpr::FieldRef { target, name } => Ok(IrExpr::MethodRef {
                    target: Some(target),
                    method: name,
                }),
                _ => Err(self.unsupported(id)),
            },
            Expr::Parenthetical { operand } => self.lower_expr(*operand),
            Expr::Unary { op, operand } => {
                let op = unary_op(*op).ok_or_else(|| self.unsupported(id))?;
                Ok(IrExpr::unary(op, self.lower_expr(*operand)?))
            }
            Expr::Binary {
                op: OperatorKind::To,
                left,
                right,
                ..
            } => {
                if !self.is_array_bound(id) {
                    return Err(self.unsupported(id));
                }
                self.range_length(*left, *right)
            }
            Expr::Binary {
                op, left, right, ..
            } => {
                let left = self.lower_expr(*left)?;
                let right = self.lower_expr(*right)?;
                self.binary_operation(*op, left, right)
                    .ok_or_else(|| self.unsupported(id))
            }
            Expr::GenericQualified { .. } => Err(self.unsupported(id)),
        }
    }

    /// Explicit qualifier, or the innermost `With` target for `.name`
    fn qualifier(&mut self, id: NodeId, qualifier: Option<NodeId>) -> Result<IrExpr, LowerError> {
        match qualifier {
            Some(qualifier) => self.lower_expr(qualifier),
            None => self.with_stack.last().cloned().ok_or_else(|| {
                LowerError::malformed(format!(
                    "member access without qualifier outside a With block at {}",
                    self.tree.span(id)
                ))
            }),
        }
    }

    /// Whether the range expression `id` sits in an array bound
    ///
    /// Checked on the chain argument, argument collection, array type.
    fn is_array_bound(&self, id: NodeId) -> bool {
        let tree = self.tree;
        let mut chain = tree.ancestors(id).map(|ancestor| tree.kind(ancestor));
        chain.next() == Some(NodeKind::Argument)
            && chain.next() == Some(NodeKind::ArgumentCollection)
            && chain.next() == Some(NodeKind::ArrayType)
    }

    /// `upper - lower`, the length form of a range bound
    fn range_length(&mut self, lower: NodeId, upper: NodeId) -> Result<IrExpr, LowerError> {
        let lower = self.lower_expr(lower)?;
        let upper = self.lower_expr(upper)?;
        Ok(IrExpr::binary(BinaryOp::Subtract, upper, lower))
    }

    /// Integer value of a literal bound, looking through parentheses and
    /// negation; `None` when the negation does not fit
    pub fn literal_int(&self, id: NodeId) -> Option<i64> {
        match self.tree.expr(id)? {
            Expr::Literal(Literal::Integer { value, .. }) => Some(*value),
            Expr::Parenthetical { operand } => self.literal_int(*operand),
            Expr::Unary {
                op: OperatorKind::Negate,
                operand,
            } => self.literal_int(*operand).and_then(i64::checked_neg),
            _ => None,
        }
    }

    /// Number of elements described by one array bound argument
    ///
    /// A literal upper bound gives a precomputed length that accounts for
    /// the array base; anything else is incremented at run time.
    pub fn bound_length(&mut self, bound: NodeId) -> Result<IrExpr, LowerError> {
        let tree = self.tree;
        if let Some(Expr::Binary {
            op: OperatorKind::To,
            left,
            right,
            ..
        }) = tree.expr(bound)
        {
            if let (Some(lower), Some(upper)) = (self.literal_int(*left), self.literal_int(*right))
            {
                return upper
                    .checked_sub(lower)
                    .and_then(|span| span.checked_add(1))
                    .map(IrExpr::int)
                    .ok_or_else(|| overflowing_bound(tree, bound));
            }
            let length = self.lower_expr(bound)?;
            return Ok(IrExpr::binary(BinaryOp::Add, length, IrExpr::int(1)));
        }
        let base = i64::from(self.base());
        if let Some(upper) = self.literal_int(bound) {
            return upper
                .checked_add(1)
                .and_then(|count| count.checked_sub(base))
                .map(IrExpr::int)
                .ok_or_else(|| overflowing_bound(tree, bound));
        }
        let upper = self.lower_expr(bound)?;
        match 1 - base {
            0 => Ok(upper),
            offset => Ok(IrExpr::binary(BinaryOp::Add, upper, IrExpr::int(offset))),
        }
    }

    /// Lengths of every bound in an argument collection
    pub fn bound_lengths(&mut self, bounds: Option<NodeId>) -> Result<Vec<IrExpr>, LowerError> {
        let tree = self.tree;
        tree.elements(bounds)
            .map(|argument| match tree.data(argument) {
                NodeData::Argument(Argument { expression, .. }) => self.bound_length(*expression),
                _ => Err(self.unsupported(argument)),
            })
            .collect()
    }

    /// Positional arguments; omitted ones become `Type.Missing`
    pub fn lower_arguments(&mut self, arguments: Option<NodeId>) -> Result<Vec<IrExpr>, LowerError> {
        let tree = self.tree;
        let Some(collection) = arguments.and_then(|id| tree.collection(id)) else {
            return Ok(Vec::new());
        };
        collection
            .elements
            .iter()
            .map(|element| match element {
                None => Ok(missing_argument()),
                Some(argument) => match tree.data(*argument) {
                    NodeData::Argument(Argument {
                        name: None,
                        expression,
                    }) => self.lower_expr(*expression),
                    _ => Err(self.unsupported(*argument)),
                },
            })
            .collect()
    }

    /// Array index when the target resolves to an array declarator,
    /// invocation otherwise
    fn lower_call_or_index(
        &mut self,
        id: NodeId,
        target: NodeId,
        arguments: Option<NodeId>,
    ) -> Result<IrExpr, LowerError> {
        let is_array = match (
            lookup::call_or_index_declarator(self.tree, id),
            self.tree
                .expr(target)
                .and_then(|_| self.reference_text(target)),
        ) {
            (Some(declarator), Some(name)) => self.declarator_type(declarator, &name)?.is_array(),
            _ => false,
        };
        let callee = self.lower_expr(target)?;
        let args = self.lower_arguments(arguments)?;
        if is_array {
            trace!(span = %self.tree.span(id), "call-or-index resolved to array access");
            return Ok(IrExpr::Index {
                target: Box::new(callee),
                indices: args,
            });
        }
        Ok(invocation(callee, args))
    }

    /// Name referenced by a simple or parenthesized name expression
    pub fn reference_text(&self, id: NodeId) -> Option<String> {
        match self.tree.expr(id)? {
            Expr::SimpleName { name } => self.tree.name_text(*name).map(str::to_owned),
            Expr::Parenthetical { operand } => self.reference_text(*operand),
            Expr::CallOrIndex { target, .. } => self.reference_text(*target),
            _ => None,
        }
    }

    /// `new T[lengths] { elements }` from an array type and aggregate
    fn lower_array_creation(&mut self, ty: NodeId, initializer: NodeId) -> Result<IrExpr, LowerError> {
        let Some(TypeName::Array {
            element, bounds, ..
        }) = self.tree.type_name(ty)
        else {
            return Err(self.unsupported(ty));
        };
        let (element, bounds) = (*element, *bounds);
        let element = match element {
            Some(element) => self.lower_type(element)?,
            None => IrType::OBJECT,
        };
        let lengths = self.bound_lengths(bounds)?;
        let elements = self.lower_aggregate(initializer)?;
        Ok(IrExpr::ArrayCreate {
            element,
            lengths,
            initializer: Some(elements),
        })
    }

    /// Elements of a flat `{ a, b, c }` initializer
    pub fn lower_aggregate(&mut self, initializer: NodeId) -> Result<Vec<IrExpr>, LowerError> {
        let tree = self.tree;
        let NodeData::Initializer(Initializer::Aggregate { elements }) = tree.data(initializer)
        else {
            return Err(self.unsupported(initializer));
        };
        tree.elements(*elements)
            .map(|element| match tree.data(element) {
                NodeData::Initializer(Initializer::Expression { expression }) => {
                    self.lower_expr(*expression)
                }
                _ => Err(self.unsupported(element)),
            })
            .collect()
    }
}

/// Call of `callee` with `args`, shaped by what the callee lowered to
pub(crate) fn invocation(callee: IrExpr, args: Vec<IrExpr>) -> IrExpr {
    match callee {
        IrExpr::Variable(method) => IrExpr::Invoke {
            target: None,
            method,
            args,
        },
        IrExpr::FieldRef { target, name } => IrExpr::Invoke {
            target: Some(target),
            method: name,
            args,
        },
        invoke @ IrExpr::Invoke { .. } if args.is_empty() => invoke,
        other => IrExpr::DelegateInvoke {
            target: Box::new(other),
            args,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_binary_operator_has_one_form() {
        use OperatorKind as O;
        for op in [
            O::Plus,
            O::Minus,
            O::Multiply,
            O::Divide,
            O::IntegralDivide,
            O::Modulus,
            O::Power,
            O::Concatenate,
            O::ShiftLeft,
            O::ShiftRight,
            O::Equals,
            O::NotEquals,
            O::LessThan,
            O::LessThanEquals,
            O::GreaterThan,
            O::GreaterThanEquals,
            O::Like,
            O::Is,
            O::IsNot,
            O::And,
            O::AndAlso,
            O::Or,
            O::OrElse,
            O::Xor,
        ] {
            assert!(binary_form(op).is_some(), "{op} has no IR form");
        }
        assert!(binary_form(O::To).is_none());
        assert!(binary_form(O::Not).is_none());
    }

    #[test]
    fn test_invocation_shapes() {
        let call = invocation(IrExpr::var("Print"), vec![IrExpr::int(1)]);
        assert!(matches!(call, IrExpr::Invoke { target: None, .. }));
        let method = invocation(IrExpr::field(IrExpr::var("list"), "Add"), vec![]);
        assert!(matches!(method, IrExpr::Invoke { target: Some(_), .. }));
        let delegate = invocation(IrExpr::This, vec![]);
        assert!(matches!(delegate, IrExpr::DelegateInvoke { .. }));
    }
}
