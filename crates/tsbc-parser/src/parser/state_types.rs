//! Parser state - type expressions.

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::state::{CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES, ParserState};
use super::syntax_kind_ext;
use tsbc_common::diagnostics::diagnostic_codes;
use tsbc_common::limits::MAX_PARSER_DEPTH;
use tsbc_scanner::SyntaxKind;

impl ParserState {
    // =========================================================================
    // Entry points
    // =========================================================================

    /// Parse a type (handles keywords, type references, unions, intersections, conditionals)
    pub(crate) fn parse_type(&mut self) -> NodeIndex {
        if self.type_depth >= MAX_PARSER_DEPTH {
            self.error_at_current_token(
                "Maximum nesting depth exceeded.",
                diagnostic_codes::MAXIMUM_NESTING_DEPTH_EXCEEDED,
            );
            return self.error_node();
        }
        self.type_depth += 1;
        let result = self.parse_type_worker();
        self.type_depth -= 1;
        result
    }

    fn parse_type_worker(&mut self) -> NodeIndex {
        if self.is_function_type_start() {
            return self.parse_function_type(syntax_kind_ext::FUNCTION_TYPE);
        }
        if self.is_token(SyntaxKind::NewKeyword)
            || (self.is_token(SyntaxKind::AbstractKeyword)
                && self.peek_token() == SyntaxKind::NewKeyword)
        {
            return self.parse_function_type(syntax_kind_ext::CONSTRUCTOR_TYPE);
        }

        let start = self.token_pos();
        let check_type = self.parse_union_type_or_higher();
        if self.context_flags & CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES == 0
            && !self.has_preceding_line_break()
            && self.parse_optional(SyntaxKind::ExtendsKeyword)
        {
            let saved = self.context_flags;
            self.context_flags |= CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES;
            let extends_type = self.parse_type();
            self.context_flags = saved;
            self.parse_expected(SyntaxKind::QuestionToken);
            let true_type = self.parse_type_allowing_conditional();
            self.parse_expected(SyntaxKind::ColonToken);
            let false_type = self.parse_type_allowing_conditional();
            return self.arena.add_conditional_type(
                syntax_kind_ext::CONDITIONAL_TYPE,
                start,
                self.prev_token_end,
                ConditionalTypeData {
                    check_type,
                    extends_type,
                    true_type,
                    false_type,
                },
            );
        }
        check_type
    }

    fn parse_type_allowing_conditional(&mut self) -> NodeIndex {
        let saved = self.context_flags;
        self.context_flags &= !CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES;
        let result = self.parse_type();
        self.context_flags = saved;
        result
    }

    /// Create an error node for recovery when type parsing fails
    pub(crate) fn error_node(&mut self) -> NodeIndex {
        let pos = self.token_pos();
        let node = self.arena.add_token(SyntaxKind::Unknown as u16, pos, pos);
        self.arena.set_flags(node, node_flags::RECOVERED);
        node
    }

    /// Parse return type, which may be a type predicate (x is T) or a regular type
    pub(crate) fn parse_return_type(&mut self) -> NodeIndex {
        let saved = self.context_flags;
        self.context_flags &= !CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES;
        let result = self.parse_return_type_inner();
        self.context_flags = saved;
        result
    }

    fn parse_return_type_inner(&mut self) -> NodeIndex {
        let start = self.token_pos();
        if self.is_asserts_type_predicate_start() {
            self.next_token(); // asserts
            let parameter_name = self.parse_predicate_parameter_name();
            let type_node = if self.parse_optional(SyntaxKind::IsKeyword) {
                self.parse_type()
            } else {
                NodeIndex::NONE
            };
            return self.arena.add_type_predicate(
                syntax_kind_ext::TYPE_PREDICATE,
                start,
                self.prev_token_end,
                TypePredicateData {
                    asserts_modifier: true,
                    parameter_name,
                    type_node,
                },
            );
        }

        if (self.is_identifier_or_keyword() || self.is_token(SyntaxKind::ThisKeyword))
            && self.peek_token() == SyntaxKind::IsKeyword
            && !self.look_ahead(|p| {
                p.next_token();
                p.next_token();
                p.has_preceding_line_break()
            })
        {
            let parameter_name = self.parse_predicate_parameter_name();
            self.next_token(); // is
            let type_node = self.parse_type();
            return self.arena.add_type_predicate(
                syntax_kind_ext::TYPE_PREDICATE,
                start,
                self.prev_token_end,
                TypePredicateData {
                    asserts_modifier: false,
                    parameter_name,
                    type_node,
                },
            );
        }

        self.parse_type()
    }

    fn is_asserts_type_predicate_start(&mut self) -> bool {
        if !self.is_token(SyntaxKind::AssertsKeyword) {
            return false;
        }
        self.look_ahead(|p| {
            p.next_token();
            !p.has_preceding_line_break()
                && (p.is_identifier_or_keyword() || p.is_token(SyntaxKind::ThisKeyword))
        })
    }

    fn parse_predicate_parameter_name(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::ThisKeyword) {
            let pos = self.token_pos();
            let end = self.token_end();
            self.next_token();
            return self.arena.add_token(syntax_kind_ext::THIS_TYPE, pos, end);
        }
        self.parse_identifier_name()
    }

    // =========================================================================
    // Function and constructor types
    // =========================================================================

    fn is_function_type_start(&mut self) -> bool {
        if self.is_token(SyntaxKind::LessThanToken) {
            return true;
        }
        if !self.is_token(SyntaxKind::OpenParenToken) {
            return false;
        }
        self.look_ahead(|p| {
            p.next_token();
            if matches!(
                p.token(),
                SyntaxKind::CloseParenToken | SyntaxKind::DotDotDotToken
            ) {
                return true;
            }
            if p.is_token(SyntaxKind::OpenBraceToken) || p.is_token(SyntaxKind::OpenBracketToken)
            {
                // Destructured parameter, or a parenthesized tuple/object type.
                p.skip_balanced();
            } else if p.is_identifier_or_keyword() {
                // Modifiers of parameter properties never appear in types.
                p.next_token();
            } else {
                return false;
            }
            match p.token() {
                SyntaxKind::ColonToken
                | SyntaxKind::CommaToken
                | SyntaxKind::QuestionToken
                | SyntaxKind::EqualsToken => true,
                SyntaxKind::CloseParenToken => {
                    p.next_token();
                    p.is_token(SyntaxKind::EqualsGreaterThanToken)
                }
                _ => false,
            }
        })
    }

    fn parse_function_type(&mut self, kind: u16) -> NodeIndex {
        let start = self.token_pos();
        let is_abstract = self.parse_optional(SyntaxKind::AbstractKeyword);
        if kind == syntax_kind_ext::CONSTRUCTOR_TYPE {
            self.parse_expected(SyntaxKind::NewKeyword);
        }
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        self.parse_expected(SyntaxKind::EqualsGreaterThanToken);
        let type_annotation = self.parse_return_type();
        self.arena.add_function_type(
            kind,
            start,
            self.prev_token_end,
            FunctionTypeData {
                is_abstract,
                type_parameters,
                parameters,
                type_annotation,
            },
        )
    }

    // =========================================================================
    // Unions, intersections, operators
    // =========================================================================

    fn parse_union_type_or_higher(&mut self) -> NodeIndex {
        self.parse_composite_type(
            SyntaxKind::BarToken,
            syntax_kind_ext::UNION_TYPE,
            Self::parse_intersection_type_or_higher,
        )
    }

    fn parse_intersection_type_or_higher(&mut self) -> NodeIndex {
        self.parse_composite_type(
            SyntaxKind::AmpersandToken,
            syntax_kind_ext::INTERSECTION_TYPE,
            Self::parse_type_operator_or_higher,
        )
    }

    /// `A | B | C` with an optional leading separator.
    fn parse_composite_type(
        &mut self,
        separator: SyntaxKind,
        kind: u16,
        parse_constituent: fn(&mut Self) -> NodeIndex,
    ) -> NodeIndex {
        let start = self.token_pos();
        let has_leading = self.parse_optional(separator);
        let first = self.parse_constituent_or_function(parse_constituent);
        if !self.is_token(separator) {
            return if has_leading {
                // `| A` alone is still a one-member union.
                self.arena.add_composite_type(
                    kind,
                    start,
                    self.prev_token_end,
                    CompositeTypeData {
                        types: NodeList::with_nodes(vec![first], start, self.prev_token_end),
                    },
                )
            } else {
                first
            };
        }
        let mut types = vec![first];
        while self.parse_optional(separator) {
            types.push(self.parse_constituent_or_function(parse_constituent));
        }
        self.arena.add_composite_type(
            kind,
            start,
            self.prev_token_end,
            CompositeTypeData {
                types: NodeList::with_nodes(types, start, self.prev_token_end),
            },
        )
    }

    /// Union members may be function types: `string | (() => void)` needs
    /// parentheses, but `| () => void` after a leading bar does not.
    fn parse_constituent_or_function(
        &mut self,
        parse_constituent: fn(&mut Self) -> NodeIndex,
    ) -> NodeIndex {
        if self.is_function_type_start() {
            return self.parse_function_type(syntax_kind_ext::FUNCTION_TYPE);
        }
        if self.is_token(SyntaxKind::NewKeyword) {
            return self.parse_function_type(syntax_kind_ext::CONSTRUCTOR_TYPE);
        }
        parse_constituent(self)
    }

    fn parse_type_operator_or_higher(&mut self) -> NodeIndex {
        let start = self.token_pos();
        match self.token() {
            SyntaxKind::KeyOfKeyword | SyntaxKind::UniqueKeyword | SyntaxKind::ReadonlyKeyword => {
                let operator = self.token() as u16;
                self.next_token();
                let type_node = self.parse_type_operator_or_higher();
                self.arena.add_type_operator(
                    syntax_kind_ext::TYPE_OPERATOR,
                    start,
                    self.prev_token_end,
                    TypeOperatorData {
                        operator,
                        type_node,
                    },
                )
            }
            SyntaxKind::InferKeyword => {
                self.next_token();
                let param_start = self.token_pos();
                let name = self.parse_identifier();
                let constraint = if self.context_flags & CONTEXT_FLAG_DISALLOW_CONDITIONAL_TYPES
                    != 0
                    && self.parse_optional(SyntaxKind::ExtendsKeyword)
                {
                    self.parse_type()
                } else {
                    NodeIndex::NONE
                };
                let type_parameter = self.arena.add_type_parameter(
                    syntax_kind_ext::TYPE_PARAMETER,
                    param_start,
                    self.prev_token_end,
                    TypeParameterData {
                        modifiers: None,
                        name,
                        constraint,
                        default: NodeIndex::NONE,
                    },
                );
                self.arena.add_infer_type(
                    syntax_kind_ext::INFER_TYPE,
                    start,
                    self.prev_token_end,
                    InferTypeData { type_parameter },
                )
            }
            _ => self.parse_postfix_type(),
        }
    }

    /// `T[]` and `T[K]`, left-associative.
    fn parse_postfix_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut ty = self.parse_primary_type();
        while self.is_token(SyntaxKind::OpenBracketToken) && !self.has_preceding_line_break() {
            self.next_token();
            if self.parse_optional(SyntaxKind::CloseBracketToken) {
                ty = self.arena.add_array_type(
                    syntax_kind_ext::ARRAY_TYPE,
                    start,
                    self.prev_token_end,
                    ArrayTypeData { element_type: ty },
                );
            } else {
                let index_type = self.parse_type();
                self.parse_expected(SyntaxKind::CloseBracketToken);
                ty = self.arena.add_indexed_access_type(
                    syntax_kind_ext::INDEXED_ACCESS_TYPE,
                    start,
                    self.prev_token_end,
                    IndexedAccessTypeData {
                        object_type: ty,
                        index_type,
                    },
                );
            }
        }
        ty
    }

    // =========================================================================
    // Primary types
    // =========================================================================

    fn parse_primary_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let token = self.token();
        match token {
            t if t.is_type_keyword() && self.peek_token() != SyntaxKind::DotToken => {
                let end = self.token_end();
                self.next_token();
                self.arena.add_token(t as u16, start, end)
            }
            SyntaxKind::ThisKeyword => {
                let end = self.token_end();
                self.next_token();
                self.arena.add_token(syntax_kind_ext::THIS_TYPE, start, end)
            }
            SyntaxKind::TrueKeyword | SyntaxKind::FalseKeyword => {
                let end = self.token_end();
                self.next_token();
                let literal = self.arena.add_token(token as u16, start, end);
                self.literal_type(start, literal)
            }
            SyntaxKind::StringLiteral
            | SyntaxKind::NumericLiteral
            | SyntaxKind::BigIntLiteral
            | SyntaxKind::TemplateLiteral => {
                let literal = self.parse_literal_node();
                self.literal_type(start, literal)
            }
            SyntaxKind::MinusToken
                if matches!(
                    self.peek_token(),
                    SyntaxKind::NumericLiteral | SyntaxKind::BigIntLiteral
                ) =>
            {
                self.next_token();
                let kind = self.token();
                let end = self.token_end();
                let text = format!("-{}", self.scanner.get_token_text());
                self.next_token();
                let literal = self
                    .arena
                    .add_literal(kind as u16, start, end, LiteralData { text });
                self.literal_type(start, literal)
            }
            SyntaxKind::TypeOfKeyword => self.parse_type_query(),
            SyntaxKind::ImportKeyword => self.parse_import_type(false),
            SyntaxKind::OpenBraceToken => {
                if self.is_mapped_type_start() {
                    self.parse_mapped_type()
                } else {
                    let members = self.parse_object_type_members();
                    self.arena.add_type_literal(
                        syntax_kind_ext::TYPE_LITERAL,
                        start,
                        self.prev_token_end,
                        TypeLiteralData { members },
                    )
                }
            }
            SyntaxKind::OpenBracketToken => self.parse_tuple_type(),
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let type_node = self.parse_type();
                self.parse_expected(SyntaxKind::CloseParenToken);
                self.arena.add_wrapped_type(
                    syntax_kind_ext::PARENTHESIZED_TYPE,
                    start,
                    self.prev_token_end,
                    WrappedTypeData { type_node },
                )
            }
            _ if self.is_identifier_or_keyword() => self.parse_type_reference(),
            _ => {
                self.error_at_current_token("Type expected.", diagnostic_codes::TYPE_EXPECTED);
                self.error_node()
            }
        }
    }

    fn literal_type(&mut self, start: u32, literal: NodeIndex) -> NodeIndex {
        self.arena.add_literal_type(
            syntax_kind_ext::LITERAL_TYPE,
            start,
            self.prev_token_end,
            LiteralTypeData { literal },
        )
    }

    fn parse_type_reference(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let type_name = self.parse_entity_name();
        let type_arguments = self.parse_type_arguments_if_present();
        self.arena.add_type_ref(
            syntax_kind_ext::TYPE_REFERENCE,
            start,
            self.prev_token_end,
            TypeRefData {
                type_name,
                type_arguments,
            },
        )
    }

    /// `<A, B>` directly after a type name (no line break before `<`).
    pub(crate) fn parse_type_arguments_if_present(&mut self) -> Option<NodeList> {
        if !self.is_token(SyntaxKind::LessThanToken) || self.has_preceding_line_break() {
            return None;
        }
        let start = self.token_pos();
        self.next_token();
        let mut args = Vec::new();
        while !self.is_token(SyntaxKind::GreaterThanToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            args.push(self.parse_type());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::GreaterThanToken);
        Some(NodeList::with_nodes(args, start, self.prev_token_end))
    }

    fn parse_type_query(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::TypeOfKeyword);
        if self.is_token(SyntaxKind::ImportKeyword) {
            let node = self.parse_import_type(true);
            return node;
        }
        let expr_name = self.parse_entity_name();
        let type_arguments = self.parse_type_arguments_if_present();
        self.arena.add_type_query(
            syntax_kind_ext::TYPE_QUERY,
            start,
            self.prev_token_end,
            TypeQueryData {
                expr_name,
                type_arguments,
            },
        )
    }

    /// `import("module").Name<Args>`
    fn parse_import_type(&mut self, is_type_of: bool) -> NodeIndex {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::ImportKeyword);
        self.parse_expected(SyntaxKind::OpenParenToken);
        let argument = if self.is_token(SyntaxKind::StringLiteral) {
            self.parse_literal_node()
        } else {
            self.error_at_current_token(
                "String literal expected.",
                diagnostic_codes::TOKEN_EXPECTED,
            );
            self.error_node()
        };
        self.parse_expected(SyntaxKind::CloseParenToken);
        let qualifier = if self.parse_optional(SyntaxKind::DotToken) {
            self.parse_entity_name()
        } else {
            NodeIndex::NONE
        };
        let type_arguments = self.parse_type_arguments_if_present();
        self.arena.add_import_type(
            syntax_kind_ext::IMPORT_TYPE,
            start,
            self.prev_token_end,
            ImportTypeData {
                is_type_of,
                argument,
                qualifier,
                type_arguments,
            },
        )
    }

    // =========================================================================
    // Mapped types and tuples
    // =========================================================================

    fn is_mapped_type_start(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token(); // {
            if matches!(p.token(), SyntaxKind::PlusToken | SyntaxKind::MinusToken) {
                p.next_token();
                if !p.is_token(SyntaxKind::ReadonlyKeyword) {
                    return false;
                }
                p.next_token();
            } else if p.is_token(SyntaxKind::ReadonlyKeyword) {
                p.next_token();
            }
            if !p.is_token(SyntaxKind::OpenBracketToken) {
                return false;
            }
            p.next_token();
            if !p.is_identifier_or_keyword() {
                return false;
            }
            p.next_token();
            p.is_token(SyntaxKind::InKeyword)
        })
    }

    fn parse_mapped_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        let mut readonly_token = 0u16;
        if matches!(self.token(), SyntaxKind::PlusToken | SyntaxKind::MinusToken) {
            readonly_token = self.token() as u16;
            self.next_token();
            self.parse_expected(SyntaxKind::ReadonlyKeyword);
        } else if self.parse_optional(SyntaxKind::ReadonlyKeyword) {
            readonly_token = SyntaxKind::ReadonlyKeyword as u16;
        }
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let param_start = self.token_pos();
        let name = self.parse_identifier();
        self.parse_expected(SyntaxKind::InKeyword);
        let constraint = self.parse_type();
        let type_parameter = self.arena.add_type_parameter(
            syntax_kind_ext::TYPE_PARAMETER,
            param_start,
            self.prev_token_end,
            TypeParameterData {
                modifiers: None,
                name,
                constraint,
                default: NodeIndex::NONE,
            },
        );
        let name_type = if self.parse_optional(SyntaxKind::AsKeyword) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        self.parse_expected(SyntaxKind::CloseBracketToken);
        let mut question_token = 0u16;
        if matches!(self.token(), SyntaxKind::PlusToken | SyntaxKind::MinusToken) {
            question_token = self.token() as u16;
            self.next_token();
            self.parse_expected(SyntaxKind::QuestionToken);
        } else if self.parse_optional(SyntaxKind::QuestionToken) {
            question_token = SyntaxKind::QuestionToken as u16;
        }
        let type_node = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        self.parse_optional(SyntaxKind::SemicolonToken);
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena.add_mapped_type(
            syntax_kind_ext::MAPPED_TYPE,
            start,
            self.prev_token_end,
            MappedTypeData {
                readonly_token,
                type_parameter,
                name_type,
                question_token,
                type_node,
            },
        )
    }

    fn parse_tuple_type(&mut self) -> NodeIndex {
        let start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let mut elements = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            elements.push(self.parse_tuple_element());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        let end = self.prev_token_end;
        self.arena.add_composite_type(
            syntax_kind_ext::TUPLE_TYPE,
            start,
            end,
            CompositeTypeData {
                types: NodeList::with_nodes(elements, start, end),
            },
        )
    }

    fn is_named_tuple_member_start(&mut self) -> bool {
        self.look_ahead(|p| {
            p.parse_optional(SyntaxKind::DotDotDotToken);
            if !p.is_identifier_or_keyword() {
                return false;
            }
            p.next_token();
            p.parse_optional(SyntaxKind::QuestionToken);
            p.is_token(SyntaxKind::ColonToken)
        })
    }

    fn parse_tuple_element(&mut self) -> NodeIndex {
        let start = self.token_pos();
        if self.is_named_tuple_member_start() {
            let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
            let name = self.parse_identifier_name();
            let question_token = self.parse_optional(SyntaxKind::QuestionToken);
            self.parse_expected(SyntaxKind::ColonToken);
            let type_node = self.parse_type();
            return self.arena.add_named_tuple_member(
                syntax_kind_ext::NAMED_TUPLE_MEMBER,
                start,
                self.prev_token_end,
                NamedTupleMemberData {
                    dot_dot_dot_token,
                    name,
                    question_token,
                    type_node,
                },
            );
        }
        if self.parse_optional(SyntaxKind::DotDotDotToken) {
            let type_node = self.parse_type();
            return self.arena.add_wrapped_type(
                syntax_kind_ext::REST_TYPE,
                start,
                self.prev_token_end,
                WrappedTypeData { type_node },
            );
        }
        let type_node = self.parse_type();
        if self.parse_optional(SyntaxKind::QuestionToken) {
            return self.arena.add_wrapped_type(
                syntax_kind_ext::OPTIONAL_TYPE,
                start,
                self.prev_token_end,
                WrappedTypeData { type_node },
            );
        }
        type_node
    }
}
