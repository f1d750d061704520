//! C#-flavoured debugging text for IR programs
//!
//! This is not the renderer; it exists so lowering output can be read and
//! snapshot-tested.

use crate::expr::{IrExpr, IrLiteral};
use crate::program::{
    IrEnum, IrField, IrMember, IrMethod, IrParameter, IrProgram, IrProperty, IrTypeDecl,
    MethodKind, TypeKind,
};
use crate::stmt::IrStmt;
use std::fmt::{self, Arguments, Display, Write};

/// Pretty printing into a nesting-aware writer
pub trait PrettyPrint<W: Write> {
    /// Formats `self` at depth zero and hands the writer back
    ///
    /// # Errors
    ///
    /// Propagates errors of the underlying writer.
    fn format_top(&self, writer: W) -> Result<W, fmt::Error> {
        let mut nested_writer = NestedWriter { writer, depth: 0 };
        self.format(&mut nested_writer)?;
        Ok(nested_writer.writer)
    }

    /// Formats `self` at the writer's current depth
    ///
    /// # Errors
    ///
    /// Propagates errors of the underlying writer.
    fn format(&self, writer: &mut NestedWriter<W>) -> fmt::Result;
}

/// Writer tracking the current indentation depth
#[derive(Debug)]
pub struct NestedWriter<W> {
    /// Underlying writer
    pub writer: W,
    /// Current depth
    pub depth: usize,
}

impl<W: Write> NestedWriter<W> {
    /// Writes the indentation of the current depth
    ///
    /// # Errors
    ///
    /// Propagates errors of the underlying writer.
    pub fn indent(&mut self) -> fmt::Result {
        for _ in 0..self.depth {
            self.writer.write_str("    ")?;
        }
        Ok(())
    }

    /// Writes the indentation of the enclosing depth, used for labels
    ///
    /// # Errors
    ///
    /// Propagates errors of the underlying writer.
    pub fn indent_lower(&mut self) -> fmt::Result {
        for _ in 0..self.depth.saturating_sub(1) {
            self.writer.write_str("    ")?;
        }
        Ok(())
    }

    /// Runs `calling` one level deeper
    ///
    /// # Errors
    ///
    /// Propagates errors of `calling`.
    pub fn deepen<F: FnOnce(&mut Self) -> fmt::Result>(&mut self, calling: F) -> fmt::Result {
        self.depth += 1;
        calling(self)?;
        self.depth -= 1;
        Ok(())
    }
}

impl<W: Write> Write for NestedWriter<W> {
    fn write_str(&mut self, text: &str) -> fmt::Result {
        self.writer.write_str(text)
    }

    fn write_char(&mut self, character: char) -> fmt::Result {
        self.writer.write_char(character)
    }

    fn write_fmt(&mut self, args: Arguments<'_>) -> fmt::Result {
        self.writer.write_fmt(args)
    }
}

/// Formats `list` separated by commas
///
/// # Errors
///
/// Propagates errors of the underlying writer.
pub fn write_comma_list<W: Write, T: PrettyPrint<W>>(
    list: &[T],
    writer: &mut NestedWriter<W>,
) -> fmt::Result {
    for (index, value) in list.iter().enumerate() {
        if index > 0 {
            write!(writer, ", ")?;
        }
        value.format(writer)?;
    }
    Ok(())
}

fn write_block<W: Write>(body: &[IrStmt], writer: &mut NestedWriter<W>) -> fmt::Result {
    writeln!(writer, "{{")?;
    writer.deepen(|writer| {
        for statement in body {
            statement.format(writer)?;
        }
        Ok(())
    })?;
    writer.indent()?;
    write!(writer, "}}")
}

fn write_comments<W: Write>(comments: &[String], writer: &mut NestedWriter<W>) -> fmt::Result {
    for comment in comments {
        writer.indent()?;
        writeln!(writer, "//{comment}")?;
    }
    Ok(())
}

fn static_prefix(is_static: bool) -> &'static str {
    if is_static { "static " } else { "" }
}

impl<W: Write> PrettyPrint<W> for IrProgram {
    fn format(&self, writer: &mut NestedWriter<W>) -> fmt::Result {
        for import in &self.imports {
            match &import.alias {
                Some(alias) => writeln!(writer, "using {alias} = {};", import.target)?,
                None => writeln!(writer, "using {};", import.target)?,
            }
        }
        if !self.imports.is_empty() {
            writeln!(writer)?;
        }
        match &self.namespace {
            Some(namespace) => {
                writeln!(writer, "namespace {namespace} {{")?;
                writer.deepen(|writer| self.ty.format(writer))?;
                writeln!(writer, "}}")
            }
            None => self.ty.format(writer),
        }
    }
}

impl Display for IrProgram {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.format_top(String::new())?)
    }
}

impl<W: Write> PrettyPrint<W> for IrTypeDecl {
    fn format(&self, writer: &mut NestedWriter<W>) -> fmt::Result {
        write_comments(&self.comments, writer)?;
        writer.indent()?;
        write!(writer, "{} {} {}", self.visibility, self.kind, self.name)?;
        if !self.type_parameters.is_empty() {
            write!(writer, "<{}>", self.type_parameters.join(", "))?;
        }
        for (index, base) in self.base_types.iter().enumerate() {
            write!(writer, "{} {base}", if index == 0 { " :" } else { "," })?;
        }
        writeln!(writer, " {{")?;
        let is_module = self.kind == TypeKind::Module;
        writer.deepen(|writer| {
            for (index, member) in self.members.iter().enumerate() {
                if index > 0 {
                    writeln!(writer)?;
                }
                match member {
                    IrMember::Field(field) => field.format(writer)?,
                    IrMember::Method(method) if is_module => {
                        IrMethod {
                            is_static: true,
                            ..method.clone()
                        }
                        .format(writer)?;
                    }
                    IrMember::Method(method) => method.format(writer)?,
                    IrMember::Property(property) => property.format(writer)?,
                    IrMember::Type(ty) => ty.format(writer)?,
                    IrMember::Enum(enumeration) => enumeration.format(writer)?,
                }
            }
            Ok(())
        })?;
        writer.indent()?;
        writeln!(writer, "}}")
    }
}

impl<W: Write> PrettyPrint<W> for IrField {
    fn format(&self, writer: &mut NestedWriter<W>) -> fmt::Result {
        write_comments(&self.comments, writer)?;
        writer.indent()?;
        let qualifier = if self.is_const {
            "const "
        } else {
            static_prefix(self.is_static)
        };
        let readonly = if self.is_readonly { "readonly " } else { "" };
        write!(
            writer,
            "{} {qualifier}{readonly}{} {}",
            self.visibility, self.ty, self.name
        )?;
        if let Some(init) = &self.init {
            write!(writer, " = ")?;
            init.format(writer)?;
        }
        writeln!(writer, ";")
    }
}

impl<W: Write> PrettyPrint<W> for IrParameter {
    fn format(&self, writer: &mut NestedWriter<W>) -> fmt::Result {
        let params = if self.is_params { "params " } else { "" };
        write!(writer, "{}{params}{} {}", self.direction, self.ty, self.name)?;
        if let Some(default) = &self.default {
            write!(writer, " = ")?;
            default.format(writer)?;
        }
        Ok(())
    }
}

impl<W: Write> PrettyPrint<W> for IrMethod {
    fn format(&self, writer: &mut NestedWriter<W>) -> fmt::Result {
        write_comments(&self.comments, writer)?;
        if let Some(external) = &self.external {
            writer.indent()?;
            write!(writer, "[DllImport(\"{}\"", external.library)?;
            if let Some(entry_point) = &external.entry_point {
                write!(writer, ", EntryPoint = \"{entry_point}\"")?;
            }
            writeln!(writer, ", CharSet = CharSet.{})]", external.charset)?;
        }
        writer.indent()?;
        write!(writer, "{} ", self.visibility)?;
        if self.external.is_some() {
            write!(writer, "static extern {} ", self.return_type)?;
        } else {
            write!(writer, "{}", static_prefix(self.is_static))?;
            if self.kind == MethodKind::Normal {
                write!(writer, "{} ", self.return_type)?;
            }
        }
        write!(writer, "{}", self.name)?;
        if !self.type_parameters.is_empty() {
            write!(writer, "<{}>", self.type_parameters.join(", "))?;
        }
        write!(writer, "(")?;
        write_comma_list(&self.parameters, writer)?;
        write!(writer, ")")?;
        if self.external.is_some() {
            return writeln!(writer, ";");
        }
        write!(writer, " ")?;
        write_block(&self.body, writer)?;
        writeln!(writer)
    }
}

impl<W: Write> PrettyPrint<W> for IrProperty {
    fn format(&self, writer: &mut NestedWriter<W>) -> fmt::Result {
        write_comments(&self.comments, writer)?;
        writer.indent()?;
        write!(
            writer,
            "{} {}{} ",
            self.visibility,
            static_prefix(self.is_static),
            self.ty
        )?;
        if self.parameters.is_empty() {
            write!(writer, "{}", self.name)?;
        } else {
            write!(writer, "{}[", self.name)?;
            write_comma_list(&self.parameters, writer)?;
            write!(writer, "]")?;
        }
        writeln!(writer, " {{")?;
        writer.deepen(|writer| {
            if let Some(getter) = &self.getter {
                writer.indent()?;
                write!(writer, "get ")?;
                write_block(getter, writer)?;
                writeln!(writer)?;
            }
            if let Some(setter) = &self.setter {
                writer.indent()?;
                write!(writer, "set({}) ", self.setter_parameter)?;
                write_block(setter, writer)?;
                writeln!(writer)?;
            }
            Ok(())
        })?;
        writer.indent()?;
        writeln!(writer, "}}")
    }
}

impl<W: Write> PrettyPrint<W> for IrEnum {
    fn format(&self, writer: &mut NestedWriter<W>) -> fmt::Result {
        writer.indent()?;
        write!(writer, "{} enum {}", self.visibility, self.name)?;
        if let Some(underlying) = &self.underlying {
            write!(writer, " : {underlying}")?;
        }
        writeln!(writer, " {{")?;
        writer.deepen(|writer| {
            for member in &self.members {
                writer.indent()?;
                write!(writer, "{}", member.name)?;
                if let Some(value) = &member.value {
                    write!(writer, " = ")?;
                    value.format(writer)?;
                }
                writeln!(writer, ",")?;
            }
            Ok(())
        })?;
        writer.indent()?;
        writeln!(writer, "}}")
    }
}

/// Writes `statement` without indentation or terminator, for `for` headers
fn format_inline<W: Write>(statement: &IrStmt, writer: &mut NestedWriter<W>) -> fmt::Result {
    match statement {
        IrStmt::Assign { target, value } => {
            target.format(writer)?;
            write!(writer, " = ")?;
            value.format(writer)
        }
        IrStmt::Declare { name, ty, init } => {
            write!(writer, "{ty} {name}")?;
            if let Some(init) = init {
                write!(writer, " = ")?;
                init.format(writer)?;
            }
            Ok(())
        }
        IrStmt::Expression(expr) => expr.format(writer),
        _ => write!(writer, "/* unsupported in header */"),
    }
}

impl<W: Write> PrettyPrint<W> for IrStmt {
    fn format(&self, writer: &mut NestedWriter<W>) -> fmt::Result {
        if let Self::Label(label) = self {
            writer.indent_lower()?;
            return writeln!(writer, "{label}:");
        }
        writer.indent()?;
        match self {
            Self::Assign { .. } | Self::Declare { .. } | Self::Expression(_) => {
                format_inline(self, writer)?;
                writeln!(writer, ";")
            }
            Self::Conditional { .. } => {
                format_conditional(self, writer)?;
                writeln!(writer)
            }
            Self::Iteration {
                init,
                test,
                increment,
                body,
            } => {
                write!(writer, "for (")?;
                if let Some(init) = init {
                    format_inline(init, writer)?;
                }
                write!(writer, "; ")?;
                test.format(writer)?;
                write!(writer, ";")?;
                if let Some(increment) = increment {
                    write!(writer, " ")?;
                    format_inline(increment, writer)?;
                }
                write!(writer, ") ")?;
                write_block(body, writer)?;
                writeln!(writer)
            }
            Self::Goto(label) => writeln!(writer, "goto {label};"),
            Self::Return(Some(value)) => {
                write!(writer, "return ")?;
                value.format(writer)?;
                writeln!(writer, ";")
            }
            Self::Return(None) => writeln!(writer, "return;"),
            Self::Break => writeln!(writer, "break;"),
            Self::Comment(text) => writeln!(writer, "//{text}"),
            Self::Label(_) => Ok(()),
        }
    }
}

fn format_conditional<W: Write>(statement: &IrStmt, writer: &mut NestedWriter<W>) -> fmt::Result {
    let IrStmt::Conditional {
        condition,
        then_body,
        else_body,
    } = statement
    else {
        return Ok(());
    };
    write!(writer, "if (")?;
    condition.format(writer)?;
    write!(writer, ") ")?;
    write_block(then_body, writer)?;
    match else_body.as_slice() {
        [] => Ok(()),
        [nested @ IrStmt::Conditional { .. }] => {
            write!(writer, " else ")?;
            format_conditional(nested, writer)
        }
        _ => {
            write!(writer, " else ")?;
            write_block(else_body, writer)
        }
    }
}

impl<W: Write> PrettyPrint<W> for IrLiteral {
    fn format(&self, writer: &mut NestedWriter<W>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(writer, "{value}"),
            Self::Float(value) => write!(writer, "{value:?}"),
            Self::Decimal(value) => write!(writer, "{value}m"),
            Self::Bool(value) => write!(writer, "{value}"),
            Self::String(value) => write!(writer, "{value:?}"),
            Self::Char(value) => write!(writer, "{value:?}"),
            Self::Date(value) => write!(writer, "DateTime.Parse({value:?})"),
        }
    }
}

impl<W: Write> PrettyPrint<W> for IrExpr {
    fn format(&self, writer: &mut NestedWriter<W>) -> fmt::Result {
        match self {
            Self::Literal(literal) => literal.format(writer),
            Self::Variable(name) => write!(writer, "{name}"),
            Self::TypeRef(ty) => write!(writer, "{ty}"),
            Self::FieldRef { target, name } => {
                target.format(writer)?;
                write!(writer, ".{name}")
            }
            Self::Invoke {
                target,
                method,
                args,
            } => {
                if let Some(target) = target {
                    target.format(writer)?;
                    write!(writer, ".")?;
                }
                write!(writer, "{method}(")?;
                write_comma_list(args, writer)?;
                write!(writer, ")")
            }
            Self::DelegateInvoke { target, args } => {
                target.format(writer)?;
                write!(writer, "(")?;
                write_comma_list(args, writer)?;
                write!(writer, ")")
            }
            Self::Index { target, indices } => {
                target.format(writer)?;
                write!(writer, "[")?;
                write_comma_list(indices, writer)?;
                write!(writer, "]")
            }
            Self::ArrayCreate {
                element,
                lengths,
                initializer,
            } => {
                write!(writer, "new {element}[")?;
                write_comma_list(lengths, writer)?;
                write!(writer, "]")?;
                if let Some(elements) = initializer {
                    write!(writer, " {{ ")?;
                    write_comma_list(elements, writer)?;
                    write!(writer, " }}")?;
                }
                Ok(())
            }
            Self::ObjectCreate { ty, args } => {
                write!(writer, "new {ty}(")?;
                write_comma_list(args, writer)?;
                write!(writer, ")")
            }
            Self::Cast { kind, ty, expr } => match kind {
                crate::expr::CastKind::Try => {
                    format_operand(expr, writer)?;
                    write!(writer, " as {ty}")
                }
                _ => {
                    write!(writer, "({ty})")?;
                    format_operand(expr, writer)
                }
            },
            Self::Binary { op, left, right } => {
                format_operand(left, writer)?;
                write!(writer, " {op} ")?;
                format_operand(right, writer)
            }
            Self::Unary { op, operand } => {
                write!(writer, "{op}")?;
                format_operand(operand, writer)
            }
            Self::TypeOf(ty) => write!(writer, "typeof({ty})"),
            Self::TypeIs { expr, ty } => {
                format_operand(expr, writer)?;
                write!(writer, " is {ty}")
            }
            Self::Default(ty) => write!(writer, "default({ty})"),
            Self::This => write!(writer, "this"),
            Self::Base => write!(writer, "base"),
            Self::Null => write!(writer, "null"),
            Self::MethodRef { target, method } => {
                if let Some(target) = target {
                    target.format(writer)?;
                    write!(writer, ".")?;
                }
                write!(writer, "{method}")
            }
        }
    }
}

fn format_operand<W: Write>(expr: &IrExpr, writer: &mut NestedWriter<W>) -> fmt::Result {
    match expr {
        IrExpr::Binary { .. } | IrExpr::Cast { .. } | IrExpr::TypeIs { .. } => {
            write!(writer, "(")?;
            expr.format(writer)?;
            write!(writer, ")")
        }
        _ => expr.format(writer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::BinaryOp;
    use crate::types::{IrType, PrimitiveType};
    use expect_test::expect;

    fn render(statements: Vec<IrStmt>) -> String {
        let mut method = IrMethod {
            name: "Run".to_owned(),
            kind: MethodKind::Normal,
            visibility: crate::types::Visibility::Public,
            is_static: false,
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            return_type: IrType::Void,
            body: Vec::new(),
            external: None,
            comments: Vec::new(),
        };
        method.body = statements;
        method.format_top(String::new()).unwrap()
    }

    #[test]
    fn test_else_if_chain_is_flattened() {
        let chain = IrStmt::Conditional {
            condition: IrExpr::var("a"),
            then_body: vec![IrStmt::Break],
            else_body: vec![IrStmt::Conditional {
                condition: IrExpr::var("b"),
                then_body: vec![IrStmt::Return(None)],
                else_body: vec![IrStmt::Goto("L".to_owned())],
            }],
        };
        expect![[r#"
            public void Run() {
                if (a) {
                    break;
                } else if (b) {
                    return;
                } else {
                    goto L;
                }
            }
        "#]]
        .assert_eq(&render(vec![chain]));
    }

    #[test]
    fn test_for_header_and_label() {
        let int = IrType::Primitive(PrimitiveType::Int);
        let iteration = IrStmt::Iteration {
            init: Some(Box::new(IrStmt::assign(IrExpr::var("i"), IrExpr::int(1)))),
            test: IrExpr::binary(BinaryOp::LessEqual, IrExpr::var("i"), IrExpr::int(10)),
            increment: Some(Box::new(IrStmt::assign(
                IrExpr::var("i"),
                IrExpr::binary(BinaryOp::Add, IrExpr::var("i"), IrExpr::int(1)),
            ))),
            body: vec![IrStmt::Label("L_return".to_owned())],
        };
        expect![[r#"
            public void Run() {
                int i;
                for (i = 1; i <= 10; i = i + 1) {
                L_return:
                }
            }
        "#]]
        .assert_eq(&render(vec![IrStmt::declare("i", int, None), iteration]));
    }
}
