//! The Lua parser implementation.
//!
//! A recursive descent parser over a one-token lookahead window, with
//! precedence climbing for binary operators. Scope resolution, location
//! tracking and control-flow checks run inline as nodes are built, so the
//! returned tree is complete without a second pass. The first error ends
//! the parse.

use std::mem;

use luaparse_ast::*;
use luaparse_core::text::column_of;
use luaparse_diagnostics::{messages, DiagnosticMessage, ParseError};
use luaparse_lexer::{Token, TokenKind, TokenValue};
use luaparse_options::{Features, ParseOptions};
use luaparse_scope::ScopeTracker;

use crate::flow::{FlowContext, FlowViolation};
use crate::locations::{Annotator, Marker};
use crate::observer::ParseObserver;
use crate::precedence::{
    get_binary_operator_precedence, is_logical, is_right_associative, UNARY_OPERAND,
};
use crate::source::TokenSource;

/// Maximum nesting of statements and expressions.
const MAX_RECURSION_DEPTH: u32 = 200;

/// Stack the parser may use below its entry point. Half of the 2 MiB a
/// spawned thread gets by default, so the nesting error always wins the
/// race against a stack overflow, whatever the frame sizes of the build.
const STACK_BUDGET: usize = 1024 * 1024;

/// Address of a local in a fresh frame; approximates the stack pointer.
#[inline(never)]
fn stack_address() -> usize {
    let marker = 0u8;
    std::hint::black_box(&marker) as *const u8 as usize
}

type PResult<T> = Result<T, ParseError>;

pub struct Parser<'s, 'o, S: TokenSource> {
    source: &'s str,
    tokens: S,
    features: Features,
    observer: &'o mut dyn ParseObserver,
    annotator: Annotator<'s>,
    scope: ScopeTracker,
    flow: FlowContext,
    check_goto_labels: bool,
    collect_comments: bool,
    comments: Vec<Comment>,
    /// The last consumed token.
    previous: Token,
    /// The token being looked at.
    token: Token,
    lookahead: Token,
    /// Tracks recursion depth to reject pathologically nested input.
    recursion_depth: u32,
    /// Stack address at the start of the parse.
    stack_base: usize,
}

impl<'s, 'o, S: TokenSource> Parser<'s, 'o, S> {
    pub fn new(
        source: &'s str,
        tokens: S,
        options: &ParseOptions,
        observer: &'o mut dyn ParseObserver,
    ) -> Self {
        let features = options.features();
        let start = Token::end_of_input(0, 1, 0);
        Self {
            source,
            tokens,
            features,
            observer,
            annotator: Annotator::new(source, options),
            scope: ScopeTracker::new(options.track_scopes),
            flow: FlowContext::new(features.labels(), true)
                .with_target_checks(options.check_goto_labels),
            check_goto_labels: options.check_goto_labels,
            collect_comments: options.collect_comments,
            comments: Vec::new(),
            previous: start.clone(),
            token: start.clone(),
            lookahead: start,
            recursion_depth: 0,
            stack_base: stack_address(),
        }
    }

    /// Whether the parser has consumed every available token.
    pub fn at_end_of_input(&self) -> bool {
        self.token.is_eof()
    }

    pub fn parse_chunk(&mut self) -> PResult<Chunk> {
        self.stack_base = stack_address();
        self.next()?;
        self.next()?;

        let marker = self.annotator.mark(&self.token);
        self.open_scope();
        self.flow.push_scope(false);
        let body = self.parse_block()?;
        let popped = self.flow.pop_scope();
        self.check_flow(popped)?;
        let scope = self.close_scope();

        if !self.token.is_eof() {
            return Err(self.unexpected(&self.token));
        }
        if body.is_empty() {
            self.previous = self.token.clone();
        }

        let meta = self.finish(marker);
        let globals = self.scope.take_globals();
        let comments = self.collect_comments.then(|| mem::take(&mut self.comments));
        let chunk = Chunk {
            body,
            scope,
            comments,
            globals,
            meta,
        };
        self.observer.on_node_complete(NodeRef::Chunk(&chunk));
        Ok(chunk)
    }

    // ========================================================================
    // Token management
    // ========================================================================

    fn next(&mut self) -> PResult<()> {
        let upcoming = self.tokens.next_token()?;
        let start = self.comments.len();
        self.tokens.drain_comments(&mut self.comments);
        for comment in &self.comments[start..] {
            self.observer.on_node_complete(NodeRef::Comment(comment));
        }
        self.previous = mem::replace(&mut self.token, mem::replace(&mut self.lookahead, upcoming));
        Ok(())
    }

    /// Consume the current token if it is the keyword or punctuator `text`.
    fn consume(&mut self, text: &str) -> PResult<bool> {
        if self.token.is(text) {
            self.next()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, text: &str) -> PResult<()> {
        if self.token.is(text) {
            return self.next();
        }
        Err(self.error_at(
            &self.token,
            &messages::EXPECTED,
            &[text, self.token.near(self.source)],
        ))
    }

    #[inline]
    fn is_block_follow(&self) -> bool {
        match self.token.value {
            TokenValue::EndOfInput => true,
            TokenValue::Keyword(k) => matches!(k, "else" | "elseif" | "end" | "until"),
            _ => false,
        }
    }

    // ========================================================================
    // Errors
    // ========================================================================

    fn error_at(&self, token: &Token, message: &DiagnosticMessage, args: &[&str]) -> ParseError {
        let column = column_of(self.source, token.line_start, token.range.pos as usize);
        ParseError::new(message, args, token.range.pos, token.line, column)
            .at_end_of_input(token.is_eof())
    }

    fn unexpected(&self, token: &Token) -> ParseError {
        if token.is_eof() {
            return self.error_at(token, &messages::UNEXPECTED_EOF, &[]);
        }
        let raw = token.raw(self.source);
        self.error_at(token, &messages::UNEXPECTED, &[token.kind.describe(), raw, raw])
    }

    /// `<what> expected near '<current token>'`
    fn expected_token(&self, what: &str) -> ParseError {
        self.error_at(
            &self.token,
            &messages::EXPECTED_TOKEN,
            &[what, self.token.near(self.source)],
        )
    }

    fn check_flow(&self, result: Result<(), FlowViolation>) -> PResult<()> {
        result.map_err(|violation| {
            let args: Vec<&str> = violation.args.iter().map(String::as_str).collect();
            self.error_at(&violation.token, violation.message, &args)
        })
    }

    fn enter(&mut self) -> PResult<()> {
        self.recursion_depth += 1;
        let stack_used = self.stack_base.abs_diff(stack_address());
        if self.recursion_depth > MAX_RECURSION_DEPTH || stack_used > STACK_BUDGET {
            self.recursion_depth -= 1;
            return Err(self.error_at(
                &self.token,
                &messages::TOO_MANY_SYNTAX_LEVELS,
                &[self.token.near(self.source)],
            ));
        }
        Ok(())
    }

    // ========================================================================
    // Nodes, scopes and events
    // ========================================================================

    #[inline]
    fn mark(&self) -> Option<Marker> {
        self.annotator.mark(&self.token)
    }

    #[inline]
    fn finish(&self, marker: Option<Marker>) -> NodeMeta {
        self.annotator.finish(marker, &self.previous)
    }

    fn emit(&mut self, expression: Expression) -> Expression {
        self.observer.on_node_complete(NodeRef::Expression(&expression));
        expression
    }

    fn open_scope(&mut self) {
        if self.scope.is_enabled() {
            self.scope.push_frame();
            self.observer.on_scope_created();
        }
    }

    fn close_scope(&mut self) -> Option<Vec<ScopeBinding>> {
        let bindings = self.scope.pop_frame();
        if self.scope.is_enabled() {
            self.observer.on_scope_destroyed();
        }
        bindings
    }

    fn declare(&mut self, ident: &mut Identifier) {
        if self.scope.is_enabled() {
            self.scope.declare(ident);
            self.observer.on_local_declared(&ident.name);
        }
    }

    // ========================================================================
    // Blocks and statements
    // ========================================================================

    fn parse_block(&mut self) -> PResult<Vec<Statement>> {
        let mut block = Vec::new();
        while !self.is_block_follow() {
            let is_break = self.token.is_keyword("break");
            if self.token.is_keyword("return")
                || (is_break && !self.features.contains(Features::RELAXED_BREAK))
            {
                if let Some(statement) = self.parse_statement()? {
                    block.push(statement);
                }
                if is_break {
                    self.consume(";")?;
                }
                break;
            }
            let statement = self.parse_statement()?;
            self.consume(";")?;
            if let Some(statement) = statement {
                block.push(statement);
            }
        }
        Ok(block)
    }

    /// A block with its own scope frame and flow scope.
    fn parse_scoped_block(
        &mut self,
        is_loop: bool,
    ) -> PResult<(Vec<Statement>, Option<Vec<ScopeBinding>>)> {
        self.open_scope();
        self.flow.push_scope(is_loop);
        let body = self.parse_block()?;
        let popped = self.flow.pop_scope();
        self.check_flow(popped)?;
        Ok((body, self.close_scope()))
    }

    fn parse_statement(&mut self) -> PResult<Option<Statement>> {
        self.enter()?;
        let result = self.parse_statement_worker();
        self.recursion_depth -= 1;
        let statement = result?;
        if let Some(statement) = &statement {
            self.observer.on_node_complete(NodeRef::Statement(statement));
        }
        Ok(statement)
    }

    fn parse_statement_worker(&mut self) -> PResult<Option<Statement>> {
        let marker = self.mark();

        if self.features.labels() && self.token.is_punctuator("::") {
            self.next()?;
            return self.parse_label_statement(marker).map(Some);
        }
        if self.features.contains(Features::EMPTY_STATEMENT) && self.consume(";")? {
            return Ok(None);
        }
        let deferred = self.flow.raise_deferred_errors();
        self.check_flow(deferred)?;

        if let TokenValue::Keyword(keyword) = self.token.value {
            let statement = match keyword {
                "local" => {
                    self.next()?;
                    self.parse_local_statement(marker)?
                }
                "if" => {
                    self.next()?;
                    self.parse_if_statement(marker)?
                }
                "return" => {
                    self.next()?;
                    self.parse_return_statement(marker)?
                }
                "function" => {
                    self.next()?;
                    let (name, is_method) = self.parse_function_name()?;
                    let function = self.parse_function_body(Some(name), false, is_method, marker)?;
                    Statement::Function(Box::new(function))
                }
                "while" => {
                    self.next()?;
                    self.parse_while_statement(marker)?
                }
                "for" => {
                    self.next()?;
                    self.parse_for_statement(marker)?
                }
                "repeat" => {
                    self.next()?;
                    self.parse_repeat_statement(marker)?
                }
                "break" => {
                    self.next()?;
                    if !self.flow.is_in_loop() {
                        return Err(self.error_at(
                            &self.token,
                            &messages::NO_LOOP_TO_BREAK,
                            &[self.token.near(self.source)],
                        ));
                    }
                    Statement::Break(BreakStatement {
                        meta: self.finish(marker),
                    })
                }
                "do" => {
                    self.next()?;
                    let (body, scope) = self.parse_scoped_block(false)?;
                    self.expect("end")?;
                    Statement::Do(DoStatement {
                        body,
                        scope,
                        meta: self.finish(marker),
                    })
                }
                "goto" => {
                    self.next()?;
                    self.parse_goto_statement(marker)?
                }
                "hstructure" => {
                    self.next()?;
                    self.parse_hstructure_declaration(marker)?
                }
                _ => return self.parse_assignment_or_call_statement(marker).map(Some),
            };
            return Ok(Some(statement));
        }

        // LuaJIT: `goto` is only a keyword when a label name follows.
        if self.features.contains(Features::CONTEXTUAL_GOTO)
            && self.token.identifier() == Some("goto")
            && self.lookahead.kind == TokenKind::IDENTIFIER
        {
            self.next()?;
            return self.parse_goto_statement(marker).map(Some);
        }

        self.parse_assignment_or_call_statement(marker).map(Some)
    }

    fn parse_label_statement(&mut self, marker: Option<Marker>) -> PResult<Statement> {
        let name_token = self.token.clone();
        let label = self.parse_identifier()?;
        self.expect("::")?;
        let added = self.flow.add_label(&label.name, &name_token);
        self.check_flow(added)?;
        Ok(Statement::Label(LabelStatement {
            label,
            meta: self.finish(marker),
        }))
    }

    fn parse_goto_statement(&mut self, marker: Option<Marker>) -> PResult<Statement> {
        let goto_token = self.previous.clone();
        let label = self.parse_identifier()?;
        self.flow.add_goto(&label.name, &goto_token);
        Ok(Statement::Goto(GotoStatement {
            label,
            meta: self.finish(marker),
        }))
    }

    fn parse_return_statement(&mut self, marker: Option<Marker>) -> PResult<Statement> {
        let mut arguments = Vec::new();
        if !self.token.is_keyword("end") {
            if let Some(expression) = self.parse_expression()? {
                arguments.push(expression);
                while self.consume(",")? {
                    arguments.push(self.parse_expected_expression()?);
                }
            }
            self.consume(";")?;
        }
        Ok(Statement::Return(ReturnStatement {
            arguments,
            meta: self.finish(marker),
        }))
    }

    fn parse_if_statement(&mut self, marker: Option<Marker>) -> PResult<Statement> {
        let mut clauses = Vec::new();

        // The first clause starts with the statement.
        let condition = self.parse_expected_expression()?;
        self.expect("then")?;
        let (body, scope) = self.parse_scoped_block(false)?;
        self.push_clause(
            &mut clauses,
            Clause::If(IfClause {
                condition,
                body,
                scope,
                meta: self.finish(marker),
            }),
        );

        let mut clause_marker = self.mark();
        while self.consume("elseif")? {
            let condition = self.parse_expected_expression()?;
            self.expect("then")?;
            let (body, scope) = self.parse_scoped_block(false)?;
            self.push_clause(
                &mut clauses,
                Clause::Elseif(ElseifClause {
                    condition,
                    body,
                    scope,
                    meta: self.finish(clause_marker),
                }),
            );
            clause_marker = self.mark();
        }

        if self.consume("else")? {
            let (body, scope) = self.parse_scoped_block(false)?;
            self.push_clause(
                &mut clauses,
                Clause::Else(ElseClause {
                    body,
                    scope,
                    meta: self.finish(clause_marker),
                }),
            );
        }

        self.expect("end")?;
        Ok(Statement::If(IfStatement {
            clauses,
            meta: self.finish(marker),
        }))
    }

    fn push_clause(&mut self, clauses: &mut Vec<Clause>, clause: Clause) {
        self.observer.on_node_complete(NodeRef::Clause(&clause));
        clauses.push(clause);
    }

    fn parse_while_statement(&mut self, marker: Option<Marker>) -> PResult<Statement> {
        let condition = self.parse_expected_expression()?;
        self.expect("do")?;
        let (body, scope) = self.parse_scoped_block(true)?;
        self.expect("end")?;
        Ok(Statement::While(WhileStatement {
            condition,
            body,
            scope,
            meta: self.finish(marker),
        }))
    }

    fn parse_repeat_statement(&mut self, marker: Option<Marker>) -> PResult<Statement> {
        // The condition sees the body's locals.
        self.open_scope();
        self.flow.push_scope(true);
        let body = self.parse_block()?;
        self.expect("until")?;
        let deferred = self.flow.raise_deferred_errors();
        self.check_flow(deferred)?;
        let condition = self.parse_expected_expression()?;
        let popped = self.flow.pop_scope();
        self.check_flow(popped)?;
        let scope = self.close_scope();
        Ok(Statement::Repeat(RepeatStatement {
            condition,
            body,
            scope,
            meta: self.finish(marker),
        }))
    }

    /// Numeric or generic `for`. Loop variables are declared once the
    /// header expressions are parsed, so the header cannot see them.
    fn parse_for_statement(&mut self, marker: Option<Marker>) -> PResult<Statement> {
        let mut variable = self.parse_identifier()?;

        if self.consume("=")? {
            let start = self.parse_expected_expression()?;
            self.expect(",")?;
            let end = self.parse_expected_expression()?;
            let step = if self.consume(",")? {
                Some(self.parse_expected_expression()?)
            } else {
                None
            };
            self.expect("do")?;

            self.open_scope();
            self.declare(&mut variable);
            let body = self.parse_loop_body()?;
            let scope = self.close_scope();
            return Ok(Statement::ForNumeric(ForNumericStatement {
                variable,
                start,
                end,
                step,
                body,
                scope,
                meta: self.finish(marker),
            }));
        }

        let mut variables = vec![variable];
        while self.consume(",")? {
            variables.push(self.parse_identifier()?);
        }
        self.expect("in")?;
        let iterators = self.parse_expression_list()?;
        self.expect("do")?;

        self.open_scope();
        for variable in &mut variables {
            self.declare(variable);
        }
        let body = self.parse_loop_body()?;
        let scope = self.close_scope();
        Ok(Statement::ForGeneric(ForGenericStatement {
            variables,
            iterators,
            body,
            scope,
            meta: self.finish(marker),
        }))
    }

    /// `block end` of a for loop whose scope frame is already open.
    fn parse_loop_body(&mut self) -> PResult<Vec<Statement>> {
        self.flow.push_scope(true);
        let body = self.parse_block()?;
        let popped = self.flow.pop_scope();
        self.check_flow(popped)?;
        self.expect("end")?;
        Ok(body)
    }

    fn parse_local_statement(&mut self, marker: Option<Marker>) -> PResult<Statement> {
        if self.consume("function")? {
            let mut name = self.parse_identifier()?;
            // Visible inside its own body, so recursion resolves.
            self.flow.add_local(&name.name);
            self.declare(&mut name);
            let function =
                self.parse_function_body(Some(Expression::Identifier(name)), true, false, marker)?;
            return Ok(Statement::Function(Box::new(function)));
        }

        let mut variables = Vec::new();
        loop {
            let declarator = self.parse_declarator()?;
            self.flow.add_local(&declarator.identifier().name);
            variables.push(declarator);
            if !self.consume(",")? {
                break;
            }
        }

        let init = if self.consume("=")? {
            self.parse_expression_list()?
        } else {
            Vec::new()
        };

        for variable in &mut variables {
            self.declare(variable.identifier_mut());
        }
        Ok(Statement::Local(LocalStatement {
            variables,
            init,
            meta: self.finish(marker),
        }))
    }

    /// A name with an optional `: Type` annotation when the dialect has
    /// typed identifiers.
    fn parse_declarator(&mut self) -> PResult<Declarator> {
        let marker = self.mark();
        let name = self.parse_identifier()?;
        if !self.features.contains(Features::TYPED_IDENTIFIERS) || !self.consume(":")? {
            return Ok(Declarator::Identifier(name));
        }
        let data_type = self.parse_identifier()?;
        let typed = TypedIdentifier {
            name,
            data_type,
            meta: self.finish(marker),
        };
        self.observer.on_node_complete(NodeRef::TypedIdentifier(&typed));
        Ok(Declarator::Typed(typed))
    }

    fn parse_assignment_or_call_statement(&mut self, marker: Option<Marker>) -> PResult<Statement> {
        let mut targets = Vec::new();
        // A bare parenthesized expression is neither a call nor a target,
        // even when the expression inside is.
        let mut parenthesized;

        loop {
            let target_marker = self.mark();
            let mut base = if self.token.kind == TokenKind::IDENTIFIER {
                parenthesized = false;
                Expression::Identifier(self.parse_resolved_identifier()?)
            } else if self.consume("(")? {
                parenthesized = true;
                let inner = self.parse_expected_expression()?;
                self.expect(")")?;
                inner
            } else {
                return Err(self.unexpected(&self.token));
            };

            while self.at_suffix() {
                parenthesized = false;
                base = self.parse_suffix(base, target_marker)?;
            }

            let assignable = !parenthesized && base.is_assignable();
            let is_call = !parenthesized && base.is_call();
            if is_call && targets.is_empty() && !self.token.is_punctuator(",") {
                return Ok(Statement::Call(CallStatement {
                    expression: base,
                    meta: self.finish(marker),
                }));
            }
            if !assignable {
                return Err(self.unexpected(&self.token));
            }
            targets.push(base);
            if !self.token.is_punctuator(",") {
                break;
            }
            self.next()?;
        }

        self.expect("=")?;
        let init = self.parse_expression_list()?;
        Ok(Statement::Assignment(AssignmentStatement {
            variables: targets,
            init,
            meta: self.finish(marker),
        }))
    }

    // ========================================================================
    // Functions
    // ========================================================================

    /// `Name {'.' Name} [':' Name]`. Returns the name expression and whether
    /// it defines a method.
    fn parse_function_name(&mut self) -> PResult<(Expression, bool)> {
        let marker = self.mark();
        let mut base = Expression::Identifier(self.parse_resolved_identifier()?);
        while self.consume(".")? {
            let identifier = self.parse_identifier()?;
            base = self.member(base, ".", identifier, marker);
        }
        if self.consume(":")? {
            let identifier = self.parse_identifier()?;
            base = self.member(base, ":", identifier, marker);
            return Ok((base, true));
        }
        Ok((base, false))
    }

    /// Parameters and body, after the `function` keyword and name.
    fn parse_function_body(
        &mut self,
        identifier: Option<Expression>,
        is_local: bool,
        is_method: bool,
        marker: Option<Marker>,
    ) -> PResult<FunctionDeclaration> {
        self.open_scope();
        if is_method && self.scope.is_enabled() {
            self.scope.declare_name("self");
            self.observer.on_local_declared("self");
        }

        // Labels and loops never cross a function boundary.
        let inner = FlowContext::new(self.features.labels(), false)
            .with_target_checks(self.check_goto_labels);
        let outer = mem::replace(&mut self.flow, inner);
        self.flow.push_scope(false);

        self.expect("(")?;
        let mut parameters = Vec::new();
        if !self.consume(")")? {
            loop {
                if self.token.kind == TokenKind::IDENTIFIER {
                    let parameter = match self.parse_declarator()? {
                        Declarator::Typed(mut typed) => {
                            self.declare(&mut typed.name);
                            Parameter::Typed(typed)
                        }
                        Declarator::Identifier(mut name) => {
                            self.declare(&mut name);
                            Parameter::Identifier(name)
                        }
                    };
                    parameters.push(parameter);
                    if self.consume(",")? {
                        continue;
                    }
                } else if self.token.kind == TokenKind::VARARG_LITERAL {
                    // No parameters may follow the vararg.
                    self.flow.allow_vararg = true;
                    parameters.push(Parameter::Vararg(self.parse_literal()?));
                } else {
                    return Err(self.expected_token("<name> or '...'"));
                }
                self.expect(")")?;
                break;
            }
        }

        let body = self.parse_block()?;
        let popped = self.flow.pop_scope();
        self.check_flow(popped)?;
        self.flow = outer;
        self.expect("end")?;
        let scope = self.close_scope();

        Ok(FunctionDeclaration {
            identifier,
            is_local,
            parameters,
            body,
            scope,
            meta: self.finish(marker),
        })
    }

    // ========================================================================
    // HavokScript extensions
    // ========================================================================

    /// `hstructure Name field : Type [,|;] ... end`
    fn parse_hstructure_declaration(&mut self, marker: Option<Marker>) -> PResult<Statement> {
        let name = self.parse_identifier()?;
        let mut fields = Vec::new();
        while !self.token.is_keyword("end") {
            let entry_marker = self.mark();
            let key = self.parse_identifier()?;
            self.expect(":")?;
            let data_type = self.parse_identifier()?;
            let entry = HstructureEntry {
                key,
                data_type,
                meta: self.finish(entry_marker),
            };
            self.observer.on_node_complete(NodeRef::HstructureEntry(&entry));
            fields.push(entry);
            if !self.consume(",")? {
                self.consume(";")?;
            }
        }
        self.expect("end")?;
        Ok(Statement::Hstructure(HstructureDeclarationExpression {
            name,
            fields,
            meta: self.finish(marker),
        }))
    }

    /// `hmake Type { key = value [,|;] ... }`
    fn parse_hmake_constructor(&mut self, marker: Option<Marker>) -> PResult<Expression> {
        let data_type = self.parse_identifier()?;
        self.expect("{")?;
        let mut fields = Vec::new();
        while !self.token.is_punctuator("}") {
            let field_marker = self.mark();
            let key = self.parse_identifier()?;
            self.expect("=")?;
            let value = self.parse_expected_expression()?;
            let field = HmakeValue {
                key,
                value,
                meta: self.finish(field_marker),
            };
            self.observer.on_node_complete(NodeRef::HmakeValue(&field));
            fields.push(field);
            if !(self.consume(",")? || self.consume(";")?) {
                break;
            }
        }
        self.expect("}")?;
        let hmake = Expression::Hmake(HmakeConstructorExpression {
            data_type,
            fields,
            meta: self.finish(marker),
        });
        Ok(self.emit(hmake))
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_expression(&mut self) -> PResult<Option<Expression>> {
        self.parse_sub_expression(0)
    }

    fn parse_expected_expression(&mut self) -> PResult<Expression> {
        match self.parse_expression()? {
            Some(expression) => Ok(expression),
            None => Err(self.expected_token("<expression>")),
        }
    }

    fn parse_expression_list(&mut self) -> PResult<Vec<Expression>> {
        let mut list = vec![self.parse_expected_expression()?];
        while self.consume(",")? {
            list.push(self.parse_expected_expression()?);
        }
        Ok(list)
    }

    fn parse_sub_expression(&mut self, min_precedence: u8) -> PResult<Option<Expression>> {
        self.enter()?;
        let result = self.parse_sub_expression_worker(min_precedence);
        self.recursion_depth -= 1;
        result
    }

    fn parse_sub_expression_worker(&mut self, min_precedence: u8) -> PResult<Option<Expression>> {
        let marker = self.mark();

        let mut expression = if let Some(operator) = self.unary_operator() {
            self.next()?;
            let Some(argument) = self.parse_sub_expression(UNARY_OPERAND)? else {
                return Err(self.expected_token("<expression>"));
            };
            let unary = Expression::Unary(Box::new(UnaryExpression {
                operator: operator.to_string(),
                argument,
                meta: self.finish(marker),
            }));
            self.emit(unary)
        } else if let Some(primary) = self.parse_primary_expression()? {
            primary
        } else if let Some(prefix) = self.parse_prefix_expression()? {
            prefix
        } else {
            return Ok(None);
        };

        loop {
            let operator = match self.token.value {
                TokenValue::Punctuator(op) | TokenValue::Keyword(op) => op,
                _ => break,
            };
            let Some(precedence) = get_binary_operator_precedence(operator) else {
                break;
            };
            let mut precedence = precedence as u8;
            if precedence <= min_precedence {
                break;
            }
            if is_right_associative(operator) {
                precedence -= 1;
            }
            self.next()?;
            let Some(right) = self.parse_sub_expression(precedence)? else {
                return Err(self.expected_token("<expression>"));
            };
            let meta = self.finish(marker);
            let combined = if is_logical(operator) {
                Expression::Logical(Box::new(LogicalExpression {
                    operator: operator.to_string(),
                    left: expression,
                    right,
                    meta,
                }))
            } else {
                Expression::Binary(Box::new(BinaryExpression {
                    operator: operator.to_string(),
                    left: expression,
                    right,
                    meta,
                }))
            };
            expression = self.emit(combined);
        }

        Ok(Some(expression))
    }

    fn unary_operator(&self) -> Option<&'static str> {
        match self.token.value {
            TokenValue::Punctuator(op) if matches!(op, "#" | "-" | "~") => Some(op),
            TokenValue::Keyword("not") => Some("not"),
            _ => None,
        }
    }

    /// Literals, function expressions, table and `hmake` constructors.
    fn parse_primary_expression(&mut self) -> PResult<Option<Expression>> {
        let marker = self.mark();

        if self.token.kind.intersects(TokenKind::LITERAL) {
            if self.token.kind == TokenKind::VARARG_LITERAL && !self.flow.allow_vararg {
                return Err(self.error_at(&self.token, &messages::CANNOT_USE_VARARG, &["..."]));
            }
            return Ok(Some(Expression::Literal(self.parse_literal()?)));
        }
        if self.consume("function")? {
            let function = self.parse_function_body(None, false, false, marker)?;
            return Ok(Some(self.emit(Expression::Function(Box::new(function)))));
        }
        if self.consume("{")? {
            return Ok(Some(Expression::Table(self.parse_table_constructor(marker)?)));
        }
        if self.consume("hmake")? {
            return self.parse_hmake_constructor(marker).map(Some);
        }
        Ok(None)
    }

    /// A name or parenthesized expression followed by any suffixes.
    fn parse_prefix_expression(&mut self) -> PResult<Option<Expression>> {
        let marker = self.mark();
        let mut base = if self.token.kind == TokenKind::IDENTIFIER {
            Expression::Identifier(self.parse_resolved_identifier()?)
        } else if self.consume("(")? {
            let inner = self.parse_expected_expression()?;
            self.expect(")")?;
            inner
        } else {
            return Ok(None);
        };
        while self.at_suffix() {
            base = self.parse_suffix(base, marker)?;
        }
        Ok(Some(base))
    }

    #[inline]
    fn at_suffix(&self) -> bool {
        match self.token.value {
            TokenValue::String(_) => true,
            TokenValue::Punctuator(p) => matches!(p, "[" | "." | ":" | "(" | "{"),
            _ => false,
        }
    }

    /// One index, member or call suffix applied to `base`.
    fn parse_suffix(&mut self, base: Expression, marker: Option<Marker>) -> PResult<Expression> {
        if self.consume("[")? {
            let index = self.parse_expected_expression()?;
            self.expect("]")?;
            let indexed = Expression::Index(Box::new(IndexExpression {
                base,
                index,
                meta: self.finish(marker),
            }));
            return Ok(self.emit(indexed));
        }
        if self.consume(".")? {
            let identifier = self.parse_identifier()?;
            return Ok(self.member(base, ".", identifier, marker));
        }
        if self.consume(":")? {
            // A method reference must be called.
            let identifier = self.parse_identifier()?;
            let method = self.member(base, ":", identifier, marker);
            return self.parse_call_arguments(method, marker);
        }
        self.parse_call_arguments(base, marker)
    }

    fn member(
        &mut self,
        base: Expression,
        indexer: &str,
        identifier: Identifier,
        marker: Option<Marker>,
    ) -> Expression {
        let member = Expression::Member(Box::new(MemberExpression {
            indexer: indexer.to_string(),
            identifier,
            base,
            meta: self.finish(marker),
        }));
        self.emit(member)
    }

    fn parse_call_arguments(&mut self, base: Expression, marker: Option<Marker>) -> PResult<Expression> {
        let call = if self.token.is_punctuator("(") {
            if !self.features.contains(Features::FLEXIBLE_EOL)
                && self.token.line != self.previous.last_line
            {
                return Err(self.error_at(&self.token, &messages::AMBIGUOUS_SYNTAX, &["("]));
            }
            self.next()?;
            let mut arguments = Vec::new();
            if let Some(first) = self.parse_expression()? {
                arguments.push(first);
                while self.consume(",")? {
                    arguments.push(self.parse_expected_expression()?);
                }
            }
            self.expect(")")?;
            Expression::Call(Box::new(CallExpression {
                base,
                arguments,
                meta: self.finish(marker),
            }))
        } else if self.token.is_punctuator("{") {
            let table_marker = self.mark();
            self.next()?;
            let arguments = self.parse_table_constructor(table_marker)?;
            Expression::TableCall(Box::new(TableCallExpression {
                base,
                arguments,
                meta: self.finish(marker),
            }))
        } else if self.token.kind == TokenKind::STRING_LITERAL {
            let argument = self.parse_literal()?;
            Expression::StringCall(Box::new(StringCallExpression {
                base,
                argument,
                meta: self.finish(marker),
            }))
        } else {
            return Err(self.expected_token("function arguments"));
        };
        Ok(self.emit(call))
    }

    /// Fields up to and including the closing `}`; the opening brace is
    /// already consumed.
    fn parse_table_constructor(&mut self, marker: Option<Marker>) -> PResult<TableConstructorExpression> {
        let mut fields = Vec::new();
        loop {
            let field_marker = self.mark();
            let field = if self.consume("[")? {
                let key = self.parse_expected_expression()?;
                self.expect("]")?;
                self.expect("=")?;
                let value = self.parse_expected_expression()?;
                TableField::Key(TableKey {
                    key,
                    value,
                    meta: self.finish(field_marker),
                })
            } else if self.token.kind == TokenKind::IDENTIFIER && self.lookahead.is_punctuator("=") {
                let key = self.parse_identifier()?;
                self.next()?;
                let value = self.parse_expected_expression()?;
                TableField::KeyString(TableKeyString {
                    key,
                    value,
                    meta: self.finish(field_marker),
                })
            } else {
                let Some(value) = self.parse_expression()? else {
                    break;
                };
                TableField::Value(TableValue {
                    value,
                    meta: self.finish(field_marker),
                })
            };
            self.observer.on_node_complete(NodeRef::TableField(&field));
            fields.push(field);

            if self.token.is_punctuator(",") || self.token.is_punctuator(";") {
                self.next()?;
                continue;
            }
            break;
        }
        self.expect("}")?;
        let table = TableConstructorExpression {
            fields,
            meta: self.finish(marker),
        };
        self.observer.on_node_complete(NodeRef::Table(&table));
        Ok(table)
    }

    // ========================================================================
    // Leaves
    // ========================================================================

    fn parse_identifier(&mut self) -> PResult<Identifier> {
        let marker = self.mark();
        let Some(name) = self.token.identifier().map(str::to_string) else {
            return Err(self.expected_token("<name>"));
        };
        self.next()?;
        let identifier = Identifier::new(name, self.finish(marker));
        self.observer.on_node_complete(NodeRef::Identifier(&identifier));
        Ok(identifier)
    }

    /// An identifier use, resolved against the open scopes.
    fn parse_resolved_identifier(&mut self) -> PResult<Identifier> {
        let mut identifier = self.parse_identifier()?;
        self.scope.resolve(&mut identifier);
        Ok(identifier)
    }

    fn parse_literal(&mut self) -> PResult<Literal> {
        let marker = self.mark();
        let (kind, value) = match &self.token.value {
            TokenValue::String(s) => (LiteralKind::StringLiteral, LiteralValue::String(s.clone())),
            TokenValue::Number(n) => (LiteralKind::NumericLiteral, LiteralValue::Number(*n)),
            TokenValue::Boolean(b) => (LiteralKind::BooleanLiteral, LiteralValue::Boolean(*b)),
            TokenValue::Nil => (LiteralKind::NilLiteral, LiteralValue::Nil),
            TokenValue::Vararg => (LiteralKind::VarargLiteral, LiteralValue::Vararg),
            _ => return Err(self.unexpected(&self.token)),
        };
        let raw = self.token.raw(self.source).to_string();
        self.next()?;
        let literal = Literal {
            kind,
            value,
            raw,
            meta: self.finish(marker),
        };
        self.observer.on_node_complete(NodeRef::Literal(&literal));
        Ok(literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::NoopObserver;
    use luaparse_lexer::Lexer;
    use luaparse_options::LuaVersion;

    fn parse(source: &str, version: LuaVersion) -> PResult<Chunk> {
        let options = ParseOptions::new().with_version(version);
        let mut observer = NoopObserver;
        let lexer = Lexer::new(source, &options);
        Parser::new(source, lexer, &options, &mut observer).parse_chunk()
    }

    fn init_of(chunk: &Chunk) -> &Expression {
        match &chunk.body[0] {
            Statement::Local(local) => &local.init[0],
            other => panic!("expected a local statement, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_power_binds_tighter_than_unary() {
        let chunk = parse("local x = -a ^ b", LuaVersion::Lua51).unwrap();
        let Expression::Unary(unary) = init_of(&chunk) else {
            panic!("expected unary");
        };
        assert_eq!(unary.operator, "-");
        assert!(matches!(&unary.argument, Expression::Binary(b) if b.operator == "^"));
    }

    #[test]
    fn test_concat_is_right_associative() {
        let chunk = parse("local x = a .. b .. c", LuaVersion::Lua51).unwrap();
        let Expression::Binary(outer) = init_of(&chunk) else {
            panic!("expected binary");
        };
        assert_eq!(outer.left.as_identifier().unwrap().name, "a");
        assert!(matches!(&outer.right, Expression::Binary(b) if b.operator == ".."));
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let chunk = parse("local x = a - b - c", LuaVersion::Lua51).unwrap();
        let Expression::Binary(outer) = init_of(&chunk) else {
            panic!("expected binary");
        };
        assert!(matches!(&outer.left, Expression::Binary(b) if b.operator == "-"));
        assert_eq!(outer.right.as_identifier().unwrap().name, "c");
    }

    #[test]
    fn test_logical_operators() {
        let chunk = parse("local x = a or b and c", LuaVersion::Lua51).unwrap();
        let Expression::Logical(or) = init_of(&chunk) else {
            panic!("expected logical");
        };
        assert_eq!(or.operator, "or");
        assert!(matches!(&or.right, Expression::Logical(l) if l.operator == "and"));
    }

    #[test]
    fn test_parenthesized_call_is_not_a_statement() {
        let err = parse("(f())", LuaVersion::Lua51).unwrap_err();
        assert_eq!(err.message, "unexpected symbol near '<eof>'");
        assert!(parse("(f)()", LuaVersion::Lua51).is_ok());
    }

    #[test]
    fn test_missing_assignment() {
        let err = parse("x y", LuaVersion::Lua51).unwrap_err();
        assert_eq!(err.message, "'=' expected near 'y'");
        assert_eq!((err.line, err.column), (1, 3));
    }

    #[test]
    fn test_method_reference_must_be_called() {
        let err = parse("x = a:b", LuaVersion::Lua51).unwrap_err();
        assert_eq!(err.message, "function arguments expected near '<eof>'");
        assert!(err.eof);
    }
}
