//! AST visitor trait for traversing the syntax tree.
//!
//! Default implementations walk into children in source order, so an
//! implementation only overrides the nodes it cares about.

use crate::node::*;

pub trait AstVisitor {
    fn visit_chunk(&mut self, chunk: &Chunk) {
        self.visit_block(&chunk.body);
    }

    fn visit_block(&mut self, body: &[Statement]) {
        for stmt in body {
            self.visit_statement(stmt);
        }
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        match stmt {
            Statement::Label(n) => self.visit_identifier(&n.label),
            Statement::Break(_) => {}
            Statement::Goto(n) => self.visit_identifier(&n.label),
            Statement::Return(n) => self.visit_expressions(&n.arguments),
            Statement::If(n) => {
                for clause in &n.clauses {
                    if let Some(condition) = clause.condition() {
                        self.visit_expression(condition);
                    }
                    self.visit_block(clause.body());
                }
            }
            Statement::While(n) => {
                self.visit_expression(&n.condition);
                self.visit_block(&n.body);
            }
            Statement::Do(n) => self.visit_block(&n.body),
            Statement::Repeat(n) => {
                self.visit_block(&n.body);
                self.visit_expression(&n.condition);
            }
            Statement::Local(n) => {
                self.visit_expressions(&n.init);
                for variable in &n.variables {
                    self.visit_declarator(variable);
                }
            }
            Statement::Assignment(n) => {
                self.visit_expressions(&n.variables);
                self.visit_expressions(&n.init);
            }
            Statement::Call(n) => self.visit_expression(&n.expression),
            Statement::Function(n) => self.visit_function(n),
            Statement::ForNumeric(n) => {
                self.visit_expression(&n.start);
                self.visit_expression(&n.end);
                if let Some(step) = &n.step {
                    self.visit_expression(step);
                }
                self.visit_identifier(&n.variable);
                self.visit_block(&n.body);
            }
            Statement::ForGeneric(n) => {
                self.visit_expressions(&n.iterators);
                for variable in &n.variables {
                    self.visit_identifier(variable);
                }
                self.visit_block(&n.body);
            }
            Statement::Hstructure(n) => {
                self.visit_identifier(&n.name);
                for field in &n.fields {
                    self.visit_identifier(&field.key);
                    self.visit_identifier(&field.data_type);
                }
            }
        }
    }

    fn visit_function(&mut self, func: &FunctionDeclaration) {
        if let Some(name) = &func.identifier {
            self.visit_expression(name);
        }
        for param in &func.parameters {
            match param {
                Parameter::Identifier(ident) => self.visit_identifier(ident),
                Parameter::Typed(typed) => self.visit_typed_identifier(typed),
                Parameter::Vararg(literal) => self.visit_literal(literal),
            }
        }
        self.visit_block(&func.body);
    }

    fn visit_declarator(&mut self, declarator: &Declarator) {
        match declarator {
            Declarator::Identifier(ident) => self.visit_identifier(ident),
            Declarator::Typed(typed) => self.visit_typed_identifier(typed),
        }
    }

    fn visit_typed_identifier(&mut self, typed: &TypedIdentifier) {
        self.visit_identifier(&typed.name);
        self.visit_identifier(&typed.data_type);
    }

    fn visit_expressions(&mut self, exprs: &[Expression]) {
        for expr in exprs {
            self.visit_expression(expr);
        }
    }

    fn visit_expression(&mut self, expr: &Expression) {
        match expr {
            Expression::Identifier(n) => self.visit_identifier(n),
            Expression::Literal(n) => self.visit_literal(n),
            Expression::Function(n) => self.visit_function(n),
            Expression::Table(n) => self.visit_table(n),
            Expression::Binary(n) => {
                self.visit_expression(&n.left);
                self.visit_expression(&n.right);
            }
            Expression::Logical(n) => {
                self.visit_expression(&n.left);
                self.visit_expression(&n.right);
            }
            Expression::Unary(n) => self.visit_expression(&n.argument),
            Expression::Member(n) => {
                self.visit_expression(&n.base);
                self.visit_identifier(&n.identifier);
            }
            Expression::Index(n) => {
                self.visit_expression(&n.base);
                self.visit_expression(&n.index);
            }
            Expression::Call(n) => {
                self.visit_expression(&n.base);
                self.visit_expressions(&n.arguments);
            }
            Expression::TableCall(n) => {
                self.visit_expression(&n.base);
                self.visit_table(&n.arguments);
            }
            Expression::StringCall(n) => {
                self.visit_expression(&n.base);
                self.visit_literal(&n.argument);
            }
            Expression::Hmake(n) => {
                self.visit_identifier(&n.data_type);
                for field in &n.fields {
                    self.visit_identifier(&field.key);
                    self.visit_expression(&field.value);
                }
            }
        }
    }

    fn visit_table(&mut self, table: &TableConstructorExpression) {
        for field in &table.fields {
            match field {
                TableField::Key(n) => {
                    self.visit_expression(&n.key);
                    self.visit_expression(&n.value);
                }
                TableField::KeyString(n) => {
                    self.visit_identifier(&n.key);
                    self.visit_expression(&n.value);
                }
                TableField::Value(n) => self.visit_expression(&n.value),
            }
        }
    }

    fn visit_identifier(&mut self, _ident: &Identifier) {}

    fn visit_literal(&mut self, _literal: &Literal) {}
}
