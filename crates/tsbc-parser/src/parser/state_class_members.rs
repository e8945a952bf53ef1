//! Parser state - class declarations and class members.

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::state::ParserState;
use super::syntax_kind_ext;
use tsbc_common::diagnostics::diagnostic_codes;
use tsbc_scanner::SyntaxKind;

impl ParserState {
    pub(crate) fn parse_class_declaration(
        &mut self,
        start: u32,
        modifiers: Option<NodeList>,
    ) -> NodeIndex {
        self.parse_expected(SyntaxKind::ClassKeyword);
        // `export default class { }` has no name.
        let name = if self.is_identifier_or_keyword()
            && !matches!(
                self.token(),
                SyntaxKind::ExtendsKeyword | SyntaxKind::ImplementsKeyword
            ) {
            self.parse_identifier_name()
        } else {
            NodeIndex::NONE
        };
        let type_parameters = self.parse_type_parameters();
        let heritage_clauses = self.parse_heritage_clauses();
        let members = self.parse_class_members();
        self.arena.add_class(
            syntax_kind_ext::CLASS_DECLARATION,
            start,
            self.prev_token_end,
            ClassData {
                modifiers,
                name,
                type_parameters,
                heritage_clauses,
                members,
            },
        )
    }

    fn parse_class_members(&mut self) -> NodeList {
        let start = self.token_pos();
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return NodeList::with_nodes(Vec::new(), start, start);
        }
        let mut members = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            if self.parse_optional(SyntaxKind::SemicolonToken) {
                continue;
            }
            let before = self.token_pos();
            if let Some(member) = self.parse_class_member() {
                members.push(member);
            }
            if self.token_pos() == before {
                self.error_at_current_token(
                    "Unexpected token. A constructor, method, accessor, or property was expected.",
                    diagnostic_codes::UNEXPECTED_TOKEN,
                );
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        NodeList::with_nodes(members, start, self.prev_token_end)
    }

    fn is_class_member_modifier(&self) -> bool {
        matches!(
            self.token(),
            SyntaxKind::PublicKeyword
                | SyntaxKind::PrivateKeyword
                | SyntaxKind::ProtectedKeyword
                | SyntaxKind::StaticKeyword
                | SyntaxKind::ReadonlyKeyword
                | SyntaxKind::AbstractKeyword
                | SyntaxKind::OverrideKeyword
                | SyntaxKind::DeclareKeyword
                | SyntaxKind::AccessorKeyword
                | SyntaxKind::AsyncKeyword
        )
    }

    fn parse_class_member(&mut self) -> Option<NodeIndex> {
        let start = self.token_pos();

        // `static { ... }`
        if self.is_token(SyntaxKind::StaticKeyword)
            && self.peek_token() == SyntaxKind::OpenBraceToken
        {
            self.next_token();
            self.parse_skipped_block();
            return Some(self.arena.add_token(
                syntax_kind_ext::CLASS_STATIC_BLOCK,
                start,
                self.prev_token_end,
            ));
        }

        let mut modifiers = Vec::new();
        while self.is_class_member_modifier() && self.next_token_can_follow_modifier() {
            let kind = self.token();
            let pos = self.token_pos();
            modifiers.push(self.arena.create_modifier(kind, pos));
            self.next_token();
        }
        let modifiers = if modifiers.is_empty() {
            None
        } else {
            Some(NodeList::with_nodes(modifiers, start, self.prev_token_end))
        };

        if self.is_token(SyntaxKind::ConstructorKeyword)
            && matches!(
                self.peek_token(),
                SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
            )
        {
            return Some(self.parse_constructor(start, modifiers));
        }

        if matches!(self.token(), SyntaxKind::GetKeyword | SyntaxKind::SetKeyword)
            && self.is_accessor_start()
        {
            return Some(self.parse_accessor(start, modifiers));
        }

        if self.is_token(SyntaxKind::OpenBracketToken) && self.is_index_signature_start() {
            let node = self.parse_index_signature(start, modifiers);
            self.parse_optional(SyntaxKind::SemicolonToken);
            return Some(node);
        }

        // Generator methods.
        self.parse_optional(SyntaxKind::AsteriskToken);

        if !self.is_property_name_start() {
            return None;
        }
        let name = self.parse_property_name();
        let question_token = self.parse_optional(SyntaxKind::QuestionToken);
        let exclamation_token =
            !question_token && self.parse_optional(SyntaxKind::ExclamationToken);

        if self.is_token(SyntaxKind::OpenParenToken) || self.is_token(SyntaxKind::LessThanToken) {
            let type_parameters = self.parse_type_parameters();
            let parameters = self.parse_parameter_list();
            let type_annotation = self.parse_type_annotation_or_return();
            let body = self.parse_member_body();
            return Some(self.arena.add_method_decl(
                syntax_kind_ext::METHOD_DECLARATION,
                start,
                self.prev_token_end,
                MethodDeclData {
                    modifiers,
                    name,
                    question_token,
                    type_parameters,
                    parameters,
                    type_annotation,
                    body,
                },
            ));
        }

        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_skipped_expression(&[
                SyntaxKind::SemicolonToken,
                SyntaxKind::CloseBraceToken,
            ])
        } else {
            NodeIndex::NONE
        };
        let end = self.prev_token_end;
        self.parse_semicolon();
        Some(self.arena.add_property_decl(
            syntax_kind_ext::PROPERTY_DECLARATION,
            start,
            end,
            PropertyDeclData {
                modifiers,
                name,
                question_token,
                exclamation_token,
                type_annotation,
                initializer,
            },
        ))
    }

    fn parse_constructor(&mut self, start: u32, modifiers: Option<NodeList>) -> NodeIndex {
        self.parse_expected(SyntaxKind::ConstructorKeyword);
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        let body = self.parse_member_body();
        self.arena.add_constructor(
            syntax_kind_ext::CONSTRUCTOR,
            start,
            self.prev_token_end,
            ConstructorData {
                modifiers,
                type_parameters,
                parameters,
                body,
            },
        )
    }

    /// `{ ... }` body or a terminating `;`. Overload signatures keep their `;`
    /// inside the node span.
    fn parse_member_body(&mut self) -> NodeIndex {
        if self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_skipped_block()
        } else {
            self.parse_semicolon();
            NodeIndex::NONE
        }
    }
}
