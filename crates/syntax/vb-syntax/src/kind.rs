//! Node kinds and the families they belong to
//!
//! Kinds are declared contiguously per family so that membership is a
//! range check on the discriminant.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Tag of a syntax node
#[derive(
    Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
)]
#[repr(u16)]
#[allow(missing_docs)]
pub enum NodeKind {
    // Placeholder produced by the parser for unparseable text
    SyntaxError,

    // Collections
    ArgumentCollection,
    AttributeBlockCollection,
    AttributeCollection,
    CaseClauseCollection,
    DeclarationCollection,
    ExpressionCollection,
    ImportCollection,
    InitializerCollection,
    ModifierCollection,
    NameCollection,
    ParameterCollection,
    StatementCollection,
    TypeConstraintCollection,
    TypeNameCollection,
    TypeParameterCollection,
    VariableDeclaratorCollection,
    VariableNameCollection,

    // Comments
    Comment,

    // Names
    SimpleName,
    SpecialName,
    QualifiedName,
    VariableName,

    // Types
    IntrinsicType,
    NamedType,
    ArrayType,
    ConstructedType,

    // Initializers
    ExpressionInitializer,
    AggregateInitializer,

    // Arguments
    Argument,

    // Expressions
    SimpleNameExpression,
    TypeReferenceExpression,
    QualifiedExpression,
    DictionaryLookupExpression,
    GenericQualifiedExpression,
    CallOrIndexExpression,
    NewExpression,
    NewAggregateExpression,
    CTypeExpression,
    DirectCastExpression,
    TryCastExpression,
    IntrinsicCastExpression,
    TypeOfExpression,
    GetTypeExpression,
    AddressOfExpression,
    StringLiteralExpression,
    CharacterLiteralExpression,
    DateLiteralExpression,
    IntegerLiteralExpression,
    FloatingPointLiteralExpression,
    DecimalLiteralExpression,
    BooleanLiteralExpression,
    NothingExpression,
    MeExpression,
    MyBaseExpression,
    MyClassExpression,
    ParentheticalExpression,
    UnaryOperatorExpression,
    BinaryOperatorExpression,

    // Statements
    EmptyStatement,
    EndStatement,
    StopStatement,
    GotoStatement,
    GoSubStatement,
    LabelStatement,
    ResumeStatement,
    ExitStatement,
    ContinueStatement,
    ReturnStatement,
    ErrorStatement,
    OnErrorStatement,
    RaiseEventStatement,
    AddHandlerStatement,
    RemoveHandlerStatement,
    ReDimStatement,
    EraseStatement,
    CallStatement,
    AssignmentStatement,
    CompoundAssignmentStatement,
    MidAssignmentStatement,
    LocalDeclarationStatement,
    EndBlockStatement,
    LoopStatement,
    NextStatement,
    DoBlockStatement,
    WhileBlockStatement,
    ForBlockStatement,
    ForEachBlockStatement,
    WithBlockStatement,
    SyncLockBlockStatement,
    UsingBlockStatement,
    TryBlockStatement,
    CatchBlockStatement,
    FinallyBlockStatement,
    IfBlockStatement,
    ElseIfBlockStatement,
    ElseBlockStatement,
    LineIfStatement,
    SelectBlockStatement,
    CaseBlockStatement,
    CaseElseBlockStatement,

    // Modifiers
    Modifier,

    // Declarators
    VariableDeclarator,

    // Case clauses
    ComparisonCaseClause,
    RangeCaseClause,

    // Attributes
    Attribute,

    // Declarations
    EmptyDeclaration,
    EndBlockDeclaration,
    OptionDeclaration,
    ImportsDeclaration,
    AttributeDeclaration,
    NamespaceDeclaration,
    ClassDeclaration,
    ModuleDeclaration,
    StructureDeclaration,
    InterfaceDeclaration,
    EnumDeclaration,
    EnumValueDeclaration,
    DelegateSubDeclaration,
    DelegateFunctionDeclaration,
    EventDeclaration,
    SubDeclaration,
    FunctionDeclaration,
    ConstructorDeclaration,
    OperatorDeclaration,
    ExternalSubDeclaration,
    ExternalFunctionDeclaration,
    PropertyDeclaration,
    GetAccessorDeclaration,
    SetAccessorDeclaration,
    VariableListDeclaration,
    InheritsDeclaration,
    ImplementsDeclaration,

    // Parameters
    Parameter,

    // Imports
    NameImport,
    AliasImport,

    // Type parameters
    TypeParameter,

    // File
    File,
}

/// Group of node kinds sharing a payload family
#[derive(Copy, Clone, Debug, Display, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum NodeFamily {
    /// Syntax error placeholder
    SyntaxError,
    /// Delimited collections
    Collection,
    /// Source comments
    Comment,
    /// Names
    Name,
    /// Type names
    Type,
    /// Variable initializers
    Initializer,
    /// Call arguments
    Argument,
    /// Expressions
    Expression,
    /// Statements
    Statement,
    /// Modifiers
    Modifier,
    /// Variable declarators
    Declarator,
    /// Select case clauses
    CaseClause,
    /// Attributes
    Attribute,
    /// Declarations
    Declaration,
    /// Parameters
    Parameter,
    /// Imports
    Import,
    /// Type parameters
    TypeParameter,
    /// Whole file
    File,
}

impl NodeFamily {
    /// First and last kind of this family, inclusive
    #[must_use]
    pub const fn range(self) -> (NodeKind, NodeKind) {
        use NodeKind as K;
        match self {
            Self::SyntaxError => (K::SyntaxError, K::SyntaxError),
            Self::Collection => (K::ArgumentCollection, K::VariableNameCollection),
            Self::Comment => (K::Comment, K::Comment),
            Self::Name => (K::SimpleName, K::VariableName),
            Self::Type => (K::IntrinsicType, K::ConstructedType),
            Self::Initializer => (K::ExpressionInitializer, K::AggregateInitializer),
            Self::Argument => (K::Argument, K::Argument),
            Self::Expression => (K::SimpleNameExpression, K::BinaryOperatorExpression),
            Self::Statement => (K::EmptyStatement, K::CaseElseBlockStatement),
            Self::Modifier => (K::Modifier, K::Modifier),
            Self::Declarator => (K::VariableDeclarator, K::VariableDeclarator),
            Self::CaseClause => (K::ComparisonCaseClause, K::RangeCaseClause),
            Self::Attribute => (K::Attribute, K::Attribute),
            Self::Declaration => (K::EmptyDeclaration, K::ImplementsDeclaration),
            Self::Parameter => (K::Parameter, K::Parameter),
            Self::Import => (K::NameImport, K::AliasImport),
            Self::TypeParameter => (K::TypeParameter, K::TypeParameter),
            Self::File => (K::File, K::File),
        }
    }

    /// Whether `kind` lies within this family's range
    #[must_use]
    pub fn contains(self, kind: NodeKind) -> bool {
        let (first, last) = self.range();
        first <= kind && kind <= last
    }

    const ALL: [Self; 18] = [
        Self::SyntaxError,
        Self::Collection,
        Self::Comment,
        Self::Name,
        Self::Type,
        Self::Initializer,
        Self::Argument,
        Self::Expression,
        Self::Statement,
        Self::Modifier,
        Self::Declarator,
        Self::CaseClause,
        Self::Attribute,
        Self::Declaration,
        Self::Parameter,
        Self::Import,
        Self::TypeParameter,
        Self::File,
    ];
}

impl NodeKind {
    /// Family this kind belongs to
    #[must_use]
    pub fn family(self) -> NodeFamily {
        NodeFamily::ALL
            .into_iter()
            .find(|family| family.contains(self))
            .unwrap_or(NodeFamily::SyntaxError)
    }

    /// Whether this is the syntax error placeholder
    #[must_use]
    pub const fn is_bad(self) -> bool {
        matches!(self, Self::SyntaxError)
    }

    /// Whether nodes of this kind may carry attached comments
    #[must_use]
    pub fn is_commentable(self) -> bool {
        matches!(
            self.family(),
            NodeFamily::Statement | NodeFamily::Declaration
        )
    }

    /// Kind (or family) that elements of a collection of this kind must have
    #[must_use]
    pub(crate) fn element_rule(self) -> Option<crate::node::Expect> {
        use crate::node::Expect;
        let rule = match self {
            Self::ArgumentCollection => Expect::Family(NodeFamily::Argument),
            Self::AttributeBlockCollection => Expect::Kind(Self::AttributeCollection),
            Self::AttributeCollection => Expect::Family(NodeFamily::Attribute),
            Self::CaseClauseCollection => Expect::Family(NodeFamily::CaseClause),
            Self::DeclarationCollection => Expect::Family(NodeFamily::Declaration),
            Self::ExpressionCollection => Expect::Family(NodeFamily::Expression),
            Self::ImportCollection => Expect::Family(NodeFamily::Import),
            Self::InitializerCollection => Expect::Family(NodeFamily::Initializer),
            Self::ModifierCollection => Expect::Family(NodeFamily::Modifier),
            Self::NameCollection => Expect::Family(NodeFamily::Name),
            Self::ParameterCollection => Expect::Family(NodeFamily::Parameter),
            Self::StatementCollection => Expect::Family(NodeFamily::Statement),
            Self::TypeConstraintCollection | Self::TypeNameCollection => {
                Expect::Family(NodeFamily::Type)
            }
            Self::TypeParameterCollection => Expect::Family(NodeFamily::TypeParameter),
            Self::VariableDeclaratorCollection => Expect::Family(NodeFamily::Declarator),
            Self::VariableNameCollection => Expect::Kind(Self::VariableName),
            _ => return None,
        };
        Some(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_ranges_do_not_overlap() {
        for (index, family) in NodeFamily::ALL.iter().enumerate() {
            for other in &NodeFamily::ALL[index + 1..] {
                let (first, last) = other.range();
                assert!(!family.contains(first), "{family} overlaps {other}");
                assert!(!family.contains(last), "{family} overlaps {other}");
            }
        }
    }

    #[test]
    fn test_family_lookup() {
        assert_eq!(NodeKind::ForBlockStatement.family(), NodeFamily::Statement);
        assert_eq!(NodeKind::CTypeExpression.family(), NodeFamily::Expression);
        assert_eq!(NodeKind::VariableNameCollection.family(), NodeFamily::Collection);
        assert_eq!(NodeKind::AliasImport.family(), NodeFamily::Import);
        assert_eq!(NodeKind::File.family(), NodeFamily::File);
    }

    #[test]
    fn test_only_syntax_error_is_bad() {
        assert!(NodeKind::SyntaxError.is_bad());
        assert!(!NodeKind::EmptyStatement.is_bad());
    }

    #[test]
    fn test_kind_display_is_variant_name() {
        assert_eq!(NodeKind::ReDimStatement.to_string(), "ReDimStatement");
    }
}
