//! Parser state - declarations, heritage clauses, type parameters and parameters.

use super::base::{NodeIndex, NodeList};
use super::node::*;
use super::state::ParserState;
use super::syntax_kind_ext;
use tsbc_common::diagnostics::diagnostic_codes;
use tsbc_scanner::SyntaxKind;

impl ParserState {
    // =========================================================================
    // Modifiers
    // =========================================================================

    /// Whether the token after a modifier keyword lets it act as a modifier
    /// instead of a name.
    pub(crate) fn next_token_can_follow_modifier(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            if p.has_preceding_line_break() {
                return false;
            }
            matches!(
                p.token(),
                SyntaxKind::OpenBracketToken
                    | SyntaxKind::OpenBraceToken
                    | SyntaxKind::AsteriskToken
                    | SyntaxKind::DotDotDotToken
                    | SyntaxKind::StringLiteral
                    | SyntaxKind::NumericLiteral
                    | SyntaxKind::PrivateIdentifier
            ) || p.is_identifier_or_keyword()
        })
    }

    /// Modifiers in front of a top-level declaration.
    fn parse_declaration_modifiers(&mut self) -> Option<NodeList> {
        let start = self.token_pos();
        let mut modifiers = Vec::new();
        loop {
            let kind = self.token();
            let is_modifier = match kind {
                SyntaxKind::ExportKeyword
                | SyntaxKind::DeclareKeyword
                | SyntaxKind::DefaultKeyword
                | SyntaxKind::AbstractKeyword
                | SyntaxKind::AsyncKeyword => self.next_token_can_follow_modifier(),
                SyntaxKind::ConstKeyword => self.peek_token() == SyntaxKind::EnumKeyword,
                _ => false,
            };
            if !is_modifier {
                break;
            }
            let pos = self.token_pos();
            modifiers.push(self.arena.create_modifier(kind, pos));
            self.next_token();
        }
        if modifiers.is_empty() {
            None
        } else {
            Some(NodeList::with_nodes(modifiers, start, self.prev_token_end))
        }
    }

    // =========================================================================
    // Declaration dispatch
    // =========================================================================

    pub(crate) fn parse_declaration_statement(&mut self) -> Option<NodeIndex> {
        let start = self.token_pos();
        let modifiers = self.parse_declaration_modifiers();
        let node = match self.token() {
            SyntaxKind::InterfaceKeyword => self.parse_interface_declaration(start, modifiers),
            SyntaxKind::ClassKeyword => self.parse_class_declaration(start, modifiers),
            SyntaxKind::FunctionKeyword => self.parse_function_declaration(start, modifiers),
            SyntaxKind::EnumKeyword => self.parse_enum_declaration(start, modifiers),
            SyntaxKind::TypeKeyword
                if self.look_ahead(|p| {
                    p.next_token();
                    p.is_identifier_or_keyword()
                }) =>
            {
                self.parse_type_alias_declaration(start, modifiers)
            }
            SyntaxKind::ConstKeyword | SyntaxKind::LetKeyword | SyntaxKind::VarKeyword => {
                self.parse_variable_statement(start, modifiers)
            }
            SyntaxKind::NamespaceKeyword | SyntaxKind::ModuleKeyword => {
                self.parse_module_declaration(start, modifiers)
            }
            SyntaxKind::GlobalKeyword => self.parse_module_declaration(start, modifiers),
            _ => {
                self.error_at_current_token(
                    "Declaration or statement expected.",
                    diagnostic_codes::DECLARATION_OR_STATEMENT_EXPECTED,
                );
                self.skip_statement();
                return None;
            }
        };
        Some(node)
    }

    // =========================================================================
    // Interfaces
    // =========================================================================

    fn parse_interface_declaration(
        &mut self,
        start: u32,
        modifiers: Option<NodeList>,
    ) -> NodeIndex {
        self.parse_expected(SyntaxKind::InterfaceKeyword);
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        let heritage_clauses = self.parse_heritage_clauses();
        let members = self.parse_object_type_members();
        self.arena.add_interface(
            syntax_kind_ext::INTERFACE_DECLARATION,
            start,
            self.prev_token_end,
            InterfaceData {
                modifiers,
                name,
                type_parameters,
                heritage_clauses,
                members,
            },
        )
    }

    /// `{ member; member, member }` of an interface or type literal.
    pub(crate) fn parse_object_type_members(&mut self) -> NodeList {
        let start = self.token_pos();
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return NodeList::with_nodes(Vec::new(), start, start);
        }
        let mut members = Vec::new();
        while !self.is_token(SyntaxKind::CloseBraceToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let before = self.token_pos();
            if let Some(member) = self.parse_type_member() {
                members.push(member);
            }
            // Members are separated by `;`, `,` or a line break.
            if !self.parse_optional(SyntaxKind::SemicolonToken) {
                self.parse_optional(SyntaxKind::CommaToken);
            }
            if self.token_pos() == before {
                self.error_at_current_token(
                    "Property or signature expected.",
                    diagnostic_codes::PROPERTY_OR_SIGNATURE_EXPECTED,
                );
                if self.is_token(SyntaxKind::OpenBraceToken)
                    || self.is_token(SyntaxKind::OpenParenToken)
                {
                    self.skip_balanced();
                } else {
                    self.next_token();
                }
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        NodeList::with_nodes(members, start, self.prev_token_end)
    }

    fn parse_type_member(&mut self) -> Option<NodeIndex> {
        let start = self.token_pos();
        match self.token() {
            SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken => {
                return Some(self.parse_signature_member(
                    syntax_kind_ext::CALL_SIGNATURE,
                    start,
                    None,
                ));
            }
            SyntaxKind::NewKeyword
                if matches!(
                    self.peek_token(),
                    SyntaxKind::OpenParenToken | SyntaxKind::LessThanToken
                ) =>
            {
                self.next_token();
                return Some(self.parse_signature_member(
                    syntax_kind_ext::CONSTRUCT_SIGNATURE,
                    start,
                    None,
                ));
            }
            _ => {}
        }

        let mut modifiers = Vec::new();
        while self.is_token(SyntaxKind::ReadonlyKeyword) && self.next_token_can_follow_modifier() {
            let pos = self.token_pos();
            modifiers.push(self.arena.create_modifier(SyntaxKind::ReadonlyKeyword, pos));
            self.next_token();
        }
        let modifiers = if modifiers.is_empty() {
            None
        } else {
            Some(NodeList::with_nodes(modifiers, start, self.prev_token_end))
        };

        if self.is_token(SyntaxKind::OpenBracketToken) && self.is_index_signature_start() {
            return Some(self.parse_index_signature(start, modifiers));
        }

        if matches!(self.token(), SyntaxKind::GetKeyword | SyntaxKind::SetKeyword)
            && self.is_accessor_start()
        {
            return Some(self.parse_accessor(start, modifiers));
        }

        if !self.is_property_name_start() {
            return None;
        }
        let name = self.parse_property_name();
        let question_token = self.parse_optional(SyntaxKind::QuestionToken);

        if self.is_token(SyntaxKind::OpenParenToken) || self.is_token(SyntaxKind::LessThanToken) {
            let type_parameters = self.parse_type_parameters();
            let parameters = self.parse_parameter_list();
            let type_annotation = self.parse_type_annotation_or_return();
            return Some(self.arena.add_signature(
                syntax_kind_ext::METHOD_SIGNATURE,
                start,
                self.prev_token_end,
                SignatureData {
                    modifiers,
                    name,
                    question_token,
                    type_parameters,
                    parameters: Some(parameters),
                    type_annotation,
                },
            ));
        }

        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        Some(self.arena.add_signature(
            syntax_kind_ext::PROPERTY_SIGNATURE,
            start,
            self.prev_token_end,
            SignatureData {
                modifiers,
                name,
                question_token,
                type_parameters: None,
                parameters: None,
                type_annotation,
            },
        ))
    }

    /// Call or construct signature; the `new` keyword is already consumed.
    fn parse_signature_member(
        &mut self,
        kind: u16,
        start: u32,
        modifiers: Option<NodeList>,
    ) -> NodeIndex {
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        let type_annotation = self.parse_type_annotation_or_return();
        self.arena.add_signature(
            kind,
            start,
            self.prev_token_end,
            SignatureData {
                modifiers,
                name: NodeIndex::NONE,
                question_token: false,
                type_parameters,
                parameters: Some(parameters),
                type_annotation,
            },
        )
    }

    /// `: ReturnType` (which may be a type predicate), or NONE.
    pub(crate) fn parse_type_annotation_or_return(&mut self) -> NodeIndex {
        if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_return_type()
        } else {
            NodeIndex::NONE
        }
    }

    /// `[` identifier `:` starts an index signature rather than a computed name.
    pub(crate) fn is_index_signature_start(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            if p.is_token(SyntaxKind::DotDotDotToken) {
                return true;
            }
            if !p.is_identifier_or_keyword() {
                return false;
            }
            p.next_token();
            matches!(p.token(), SyntaxKind::ColonToken | SyntaxKind::CommaToken)
        })
    }

    pub(crate) fn parse_index_signature(
        &mut self,
        start: u32,
        modifiers: Option<NodeList>,
    ) -> NodeIndex {
        let list_start = self.token_pos();
        self.parse_expected(SyntaxKind::OpenBracketToken);
        let mut parameters = Vec::new();
        while !self.is_token(SyntaxKind::CloseBracketToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            parameters.push(self.parse_parameter());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBracketToken);
        let parameters = NodeList::with_nodes(parameters, list_start, self.prev_token_end);
        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_index_signature(
            syntax_kind_ext::INDEX_SIGNATURE,
            start,
            self.prev_token_end,
            IndexSignatureData {
                modifiers,
                parameters,
                type_annotation,
            },
        )
    }

    /// `get`/`set` followed by a property name on the same line.
    pub(crate) fn is_accessor_start(&mut self) -> bool {
        self.look_ahead(|p| {
            p.next_token();
            !p.has_preceding_line_break() && p.is_property_name_start()
        })
    }

    pub(crate) fn parse_accessor(&mut self, start: u32, modifiers: Option<NodeList>) -> NodeIndex {
        let kind = if self.is_token(SyntaxKind::GetKeyword) {
            syntax_kind_ext::GET_ACCESSOR
        } else {
            syntax_kind_ext::SET_ACCESSOR
        };
        self.next_token();
        let name = self.parse_property_name();
        let parameters = self.parse_parameter_list();
        let type_annotation = self.parse_type_annotation_or_return();
        let body = if self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_skipped_block()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_accessor(
            kind,
            start,
            self.prev_token_end,
            AccessorData {
                modifiers,
                name,
                parameters,
                type_annotation,
                body,
            },
        )
    }

    pub(crate) fn is_property_name_start(&self) -> bool {
        self.is_identifier_or_keyword()
            || matches!(
                self.token(),
                SyntaxKind::StringLiteral
                    | SyntaxKind::NumericLiteral
                    | SyntaxKind::PrivateIdentifier
                    | SyntaxKind::OpenBracketToken
            )
    }

    /// Identifier, keyword, string/numeric literal, `#private` or `[computed]`.
    pub(crate) fn parse_property_name(&mut self) -> NodeIndex {
        match self.token() {
            SyntaxKind::StringLiteral | SyntaxKind::NumericLiteral => self.parse_literal_node(),
            SyntaxKind::PrivateIdentifier => {
                let pos = self.token_pos();
                let end = self.token_end();
                let escaped_text = self.scanner.get_token_value_ref().to_string();
                self.next_token();
                self.arena.add_identifier(
                    SyntaxKind::PrivateIdentifier as u16,
                    pos,
                    end,
                    IdentifierData {
                        atom: tsbc_common::Atom::NONE,
                        escaped_text,
                    },
                )
            }
            SyntaxKind::OpenBracketToken => {
                let pos = self.token_pos();
                self.skip_balanced();
                self.arena
                    .add_token(syntax_kind_ext::COMPUTED_PROPERTY_NAME, pos, self.prev_token_end)
            }
            _ => self.parse_identifier(),
        }
    }

    // =========================================================================
    // Heritage and type parameters
    // =========================================================================

    pub(crate) fn parse_heritage_clauses(&mut self) -> Option<NodeList> {
        let start = self.token_pos();
        let mut clauses = Vec::new();
        while matches!(
            self.token(),
            SyntaxKind::ExtendsKeyword | SyntaxKind::ImplementsKeyword
        ) {
            let clause_start = self.token_pos();
            let token = self.token() as u16;
            self.next_token();
            let types_start = self.token_pos();
            let mut types = Vec::new();
            loop {
                let expr_start = self.token_pos();
                let expression = self.parse_entity_name();
                let type_arguments = self.parse_type_arguments_if_present();
                types.push(self.arena.add_expr_with_type_args(
                    syntax_kind_ext::EXPRESSION_WITH_TYPE_ARGUMENTS,
                    expr_start,
                    self.prev_token_end,
                    ExprWithTypeArgsData {
                        expression,
                        type_arguments,
                    },
                ));
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            let types = NodeList::with_nodes(types, types_start, self.prev_token_end);
            clauses.push(self.arena.add_heritage(
                syntax_kind_ext::HERITAGE_CLAUSE,
                clause_start,
                self.prev_token_end,
                HeritageData { token, types },
            ));
        }
        if clauses.is_empty() {
            None
        } else {
            Some(NodeList::with_nodes(clauses, start, self.prev_token_end))
        }
    }

    /// `<T extends C = D, ...>` if present.
    pub(crate) fn parse_type_parameters(&mut self) -> Option<NodeList> {
        if !self.is_token(SyntaxKind::LessThanToken) {
            return None;
        }
        let start = self.token_pos();
        self.next_token();
        let mut params = Vec::new();
        while !self.is_token(SyntaxKind::GreaterThanToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            params.push(self.parse_type_parameter());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::GreaterThanToken);
        Some(NodeList::with_nodes(params, start, self.prev_token_end))
    }

    pub(crate) fn parse_type_parameter(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut modifiers = Vec::new();
        // Variance and const modifiers: `in`, `out`, `const`.
        while matches!(self.token(), SyntaxKind::InKeyword | SyntaxKind::ConstKeyword)
            || (self.is_token(SyntaxKind::Identifier)
                && self.scanner.get_token_value_ref() == "out")
        {
            let followed_by_name = self.look_ahead(|p| {
                p.next_token();
                p.is_identifier_or_keyword()
            });
            if !followed_by_name {
                break;
            }
            let kind = self.token() as u16;
            let pos = self.token_pos();
            let end = self.token_end();
            modifiers.push(self.arena.add_token(kind, pos, end));
            self.next_token();
        }
        let modifiers = if modifiers.is_empty() {
            None
        } else {
            Some(NodeList::with_nodes(modifiers, start, self.prev_token_end))
        };
        let name = self.parse_identifier();
        let constraint = if self.parse_optional(SyntaxKind::ExtendsKeyword) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        let default = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        self.arena.add_type_parameter(
            syntax_kind_ext::TYPE_PARAMETER,
            start,
            self.prev_token_end,
            TypeParameterData {
                modifiers,
                name,
                constraint,
                default,
            },
        )
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    pub(crate) fn parse_parameter_list(&mut self) -> NodeList {
        let start = self.token_pos();
        if !self.parse_expected(SyntaxKind::OpenParenToken) {
            return NodeList::with_nodes(Vec::new(), start, start);
        }
        let mut params = Vec::new();
        while !self.is_token(SyntaxKind::CloseParenToken)
            && !self.is_token(SyntaxKind::EndOfFileToken)
        {
            let before = self.token_pos();
            params.push(self.parse_parameter());
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
            if self.token_pos() == before {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken);
        NodeList::with_nodes(params, start, self.prev_token_end)
    }

    pub(crate) fn parse_parameter(&mut self) -> NodeIndex {
        let start = self.token_pos();
        let mut modifiers = Vec::new();
        while matches!(
            self.token(),
            SyntaxKind::PublicKeyword
                | SyntaxKind::PrivateKeyword
                | SyntaxKind::ProtectedKeyword
                | SyntaxKind::ReadonlyKeyword
                | SyntaxKind::OverrideKeyword
        ) && self.next_token_can_follow_modifier()
        {
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

        let dot_dot_dot_token = self.parse_optional(SyntaxKind::DotDotDotToken);
        let name = match self.token() {
            SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken => {
                let pos = self.token_pos();
                self.skip_balanced();
                self.arena
                    .add_token(syntax_kind_ext::BINDING_PATTERN, pos, self.prev_token_end)
            }
            _ => self.parse_identifier(),
        };
        let question_token = self.parse_optional(SyntaxKind::QuestionToken);
        let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
            self.parse_type()
        } else {
            NodeIndex::NONE
        };
        let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
            self.parse_skipped_expression(&[
                SyntaxKind::CommaToken,
                SyntaxKind::CloseParenToken,
                SyntaxKind::CloseBracketToken,
            ])
        } else {
            NodeIndex::NONE
        };
        self.arena.add_parameter(
            syntax_kind_ext::PARAMETER,
            start,
            self.prev_token_end,
            ParameterData {
                modifiers,
                dot_dot_dot_token,
                name,
                question_token,
                type_annotation,
                initializer,
            },
        )
    }

    // =========================================================================
    // Functions
    // =========================================================================

    fn parse_function_declaration(&mut self, start: u32, modifiers: Option<NodeList>) -> NodeIndex {
        tracing::trace!(pos = self.token_pos(), "parse_function_declaration");
        self.parse_expected(SyntaxKind::FunctionKeyword);
        self.parse_optional(SyntaxKind::AsteriskToken);
        let name = if self.is_identifier_or_keyword() {
            self.parse_identifier_name()
        } else {
            // `export default function (...)`
            NodeIndex::NONE
        };
        let type_parameters = self.parse_type_parameters();
        let parameters = self.parse_parameter_list();
        let type_annotation = self.parse_type_annotation_or_return();
        let body = if self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_skipped_block()
        } else {
            self.parse_semicolon();
            NodeIndex::NONE
        };
        self.arena.add_function(
            syntax_kind_ext::FUNCTION_DECLARATION,
            start,
            self.prev_token_end,
            FunctionData {
                modifiers,
                name,
                type_parameters,
                parameters,
                type_annotation,
                body,
            },
        )
    }

    // =========================================================================
    // Type aliases, enums, variables, modules
    // =========================================================================

    fn parse_type_alias_declaration(
        &mut self,
        start: u32,
        modifiers: Option<NodeList>,
    ) -> NodeIndex {
        self.parse_expected(SyntaxKind::TypeKeyword);
        let name = self.parse_identifier();
        let type_parameters = self.parse_type_parameters();
        self.parse_expected(SyntaxKind::EqualsToken);
        let type_node = self.parse_type();
        self.parse_semicolon();
        self.arena.add_type_alias(
            syntax_kind_ext::TYPE_ALIAS_DECLARATION,
            start,
            self.prev_token_end,
            TypeAliasData {
                modifiers,
                name,
                type_parameters,
                type_node,
            },
        )
    }

    fn parse_enum_declaration(&mut self, start: u32, modifiers: Option<NodeList>) -> NodeIndex {
        let is_const = self.arena.has_modifier(modifiers.as_ref(), SyntaxKind::ConstKeyword);
        self.parse_expected(SyntaxKind::EnumKeyword);
        let name = self.parse_identifier();
        let members_start = self.token_pos();
        let mut members = Vec::new();
        if self.parse_expected(SyntaxKind::OpenBraceToken) {
            while !self.is_token(SyntaxKind::CloseBraceToken)
                && !self.is_token(SyntaxKind::EndOfFileToken)
            {
                let member_start = self.token_pos();
                if !self.is_property_name_start() {
                    self.error_at_current_token(
                        "Enum member expected.",
                        diagnostic_codes::PROPERTY_OR_SIGNATURE_EXPECTED,
                    );
                    self.next_token();
                    continue;
                }
                let member_name = self.parse_property_name();
                let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
                    self.parse_skipped_expression(&[
                        SyntaxKind::CommaToken,
                        SyntaxKind::CloseBraceToken,
                    ])
                } else {
                    NodeIndex::NONE
                };
                members.push(self.arena.add_enum_member(
                    syntax_kind_ext::ENUM_MEMBER,
                    member_start,
                    self.prev_token_end,
                    EnumMemberData {
                        name: member_name,
                        initializer,
                    },
                ));
                if !self.parse_optional(SyntaxKind::CommaToken) {
                    break;
                }
            }
            self.parse_expected(SyntaxKind::CloseBraceToken);
        }
        let members = NodeList::with_nodes(members, members_start, self.prev_token_end);
        let node = self.arena.add_enum(
            syntax_kind_ext::ENUM_DECLARATION,
            start,
            self.prev_token_end,
            EnumData {
                modifiers,
                name,
                members,
            },
        );
        if is_const {
            self.arena.set_flags(node, node_flags::CONST);
        }
        node
    }

    fn parse_variable_statement(&mut self, start: u32, modifiers: Option<NodeList>) -> NodeIndex {
        let flags = match self.token() {
            SyntaxKind::ConstKeyword => node_flags::CONST,
            SyntaxKind::LetKeyword => node_flags::LET,
            _ => node_flags::NONE,
        };
        self.next_token();
        let list_start = self.token_pos();
        let mut declarations = Vec::new();
        loop {
            let decl_start = self.token_pos();
            let name = match self.token() {
                SyntaxKind::OpenBraceToken | SyntaxKind::OpenBracketToken => {
                    let pos = self.token_pos();
                    self.skip_balanced();
                    self.arena
                        .add_token(syntax_kind_ext::BINDING_PATTERN, pos, self.prev_token_end)
                }
                _ => self.parse_identifier(),
            };
            self.parse_optional(SyntaxKind::ExclamationToken);
            let type_annotation = if self.parse_optional(SyntaxKind::ColonToken) {
                self.parse_type()
            } else {
                NodeIndex::NONE
            };
            let initializer = if self.parse_optional(SyntaxKind::EqualsToken) {
                self.parse_skipped_expression(&[SyntaxKind::CommaToken, SyntaxKind::SemicolonToken])
            } else {
                NodeIndex::NONE
            };
            declarations.push(self.arena.add_variable_declaration(
                syntax_kind_ext::VARIABLE_DECLARATION,
                decl_start,
                self.prev_token_end,
                VariableDeclarationData {
                    name,
                    type_annotation,
                    initializer,
                },
            ));
            if !self.parse_optional(SyntaxKind::CommaToken) {
                break;
            }
        }
        let declarations = NodeList::with_nodes(declarations, list_start, self.prev_token_end);
        self.parse_semicolon();
        let node = self.arena.add_variable(
            syntax_kind_ext::VARIABLE_STATEMENT,
            start,
            self.prev_token_end,
            VariableData {
                modifiers,
                declarations,
            },
        );
        self.arena.set_flags(node, flags);
        node
    }

    /// `namespace A.B { }`, `module "m" { }`, `declare global { }`. Bodies are skipped.
    fn parse_module_declaration(&mut self, start: u32, modifiers: Option<NodeList>) -> NodeIndex {
        let is_global = self.is_token(SyntaxKind::GlobalKeyword);
        let name = if is_global {
            self.parse_identifier_name()
        } else {
            self.next_token();
            if self.is_token(SyntaxKind::StringLiteral) {
                self.parse_literal_node()
            } else {
                self.parse_entity_name()
            }
        };
        let body = if self.is_token(SyntaxKind::OpenBraceToken) {
            self.parse_skipped_block()
        } else {
            self.parse_semicolon();
            NodeIndex::NONE
        };
        let node = self.arena.add_module(
            syntax_kind_ext::MODULE_DECLARATION,
            start,
            self.prev_token_end,
            ModuleData {
                modifiers,
                name,
                body,
            },
        );
        if is_global {
            self.arena.set_flags(node, node_flags::GLOBAL_AUGMENTATION);
        }
        node
    }
}
