//! Recursive descent parser for minic

use crate::common::{CompileError, CompileResult};
use crate::lexer::{Lexer, Token, TokenKind};
use minic_sema::Span;
use minic_sema::ast::*;

/// Recursive descent parser producing the analyzer's AST
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> CompileResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse a complete translation unit
    pub fn parse(&mut self) -> CompileResult<TranslationUnit> {
        let mut items = Vec::new();

        while !self.at_end() {
            items.push(self.parse_item()?);
        }

        Ok(TranslationUnit::new(items))
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn at_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> CompileResult<Token> {
        let prev = std::mem::replace(&mut self.current, self.lexer.next_token()?);
        Ok(prev)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> CompileResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<Token> {
        if self.check(&kind) {
            self.advance()
        } else {
            Err(CompileError::parser(
                format!("expected {}, found {}", kind, self.current.kind),
                self.current.span,
            ))
        }
    }

    fn expect_identifier(&mut self) -> CompileResult<(String, Span)> {
        match &self.current.kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                let token = self.advance()?;
                Ok((name, token.span))
            }
            other => Err(CompileError::parser(
                format!("expected identifier, found {}", other),
                self.current.span,
            )),
        }
    }

    // =========================================================================
    // Top-level items
    // =========================================================================

    /// Items starting with a type keyword are declarations, anything else is
    /// a top-level statement
    fn parse_item(&mut self) -> CompileResult<Item> {
        if !self.current.kind.is_type_keyword() {
            let stmt = self.parse_statement()?;
            return Ok(Item::statement(stmt));
        }

        let start_span = self.current.span;
        let ty = self.parse_type()?;
        let (name, name_span) = self.expect_identifier()?;

        if self.check(&TokenKind::LParen) {
            return self.parse_function_rest(ty, name, start_span).map(Item::function);
        }

        if ty.is_void() {
            return Err(CompileError::parser(
                format!("variable '{}' declared void", name),
                name_span,
            ));
        }

        let vars = self.parse_declarators(name, name_span)?;
        let end = self.expect(TokenKind::Semi)?;
        Ok(Item::variables(vars, start_span.merge(end.span)))
    }

    fn parse_type(&mut self) -> CompileResult<Type> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::Int => Ok(Type::Int),
            TokenKind::Void => Ok(Type::Void),
            other => Err(CompileError::parser(
                format!("expected type, found {}", other),
                token.span,
            )),
        }
    }

    /// `(params) ;` or `(params) { body }`; the span covers the header only
    fn parse_function_rest(
        &mut self,
        return_type: Type,
        name: String,
        start_span: Span,
    ) -> CompileResult<FuncDecl> {
        self.expect(TokenKind::LParen)?;
        let params = self.parse_parameter_list()?;
        let close = self.expect(TokenKind::RParen)?;
        let func = FuncDecl::new(name, return_type, params, start_span.merge(close.span));

        if self.match_token(&TokenKind::Semi)? {
            return Ok(func);
        }
        if self.check(&TokenKind::LBrace) {
            let body = self.parse_block()?;
            return Ok(func.with_body(body));
        }
        Err(CompileError::parser(
            format!("expected ';' or function body, found {}", self.current.kind),
            self.current.span,
        ))
    }

    fn parse_parameter_list(&mut self) -> CompileResult<Vec<Param>> {
        let mut params = Vec::new();

        if self.check(&TokenKind::RParen) {
            return Ok(params);
        }

        // `(void)`
        if self.check(&TokenKind::Void) && self.lexer.peek()?.kind == TokenKind::RParen {
            self.advance()?;
            return Ok(params);
        }

        loop {
            params.push(self.parse_parameter()?);
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        Ok(params)
    }

    fn parse_parameter(&mut self) -> CompileResult<Param> {
        let start_span = self.current.span;
        let ty = self.parse_type()?;
        if ty.is_void() {
            return Err(CompileError::parser("parameter declared void", start_span));
        }

        if let TokenKind::Identifier(name) = &self.current.kind {
            let name = name.clone();
            let token = self.advance()?;
            return Ok(Param::new(Some(name), ty, start_span.merge(token.span)));
        }
        Ok(Param::new(None, ty, start_span))
    }

    /// `name [= init] {, name [= init]}` with the first name already consumed
    fn parse_declarators(&mut self, first: String, first_span: Span) -> CompileResult<Vec<VarDecl>> {
        let mut vars = vec![self.parse_declarator_rest(first, first_span)?];

        while self.match_token(&TokenKind::Comma)? {
            let (name, span) = self.expect_identifier()?;
            vars.push(self.parse_declarator_rest(name, span)?);
        }

        Ok(vars)
    }

    fn parse_declarator_rest(&mut self, name: String, span: Span) -> CompileResult<VarDecl> {
        if self.match_token(&TokenKind::Eq)? {
            let init = self.parse_assignment_expression()?;
            let span = span.merge(init.span);
            return Ok(VarDecl::new(name, span).with_init(init));
        }
        Ok(VarDecl::new(name, span))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn parse_statement(&mut self) -> CompileResult<Stmt> {
        match &self.current.kind {
            TokenKind::Int => self.parse_local_declaration(),
            TokenKind::Void => Err(CompileError::parser(
                "local declarations must have type 'int'",
                self.current.span,
            )),
            TokenKind::If => self.parse_if_statement(),
            TokenKind::While => self.parse_while_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::Semi => {
                let token = self.advance()?;
                Ok(Stmt::new(StmtKind::Empty, token.span))
            }
            TokenKind::LBrace => Err(CompileError::parser(
                "nested blocks are only allowed as if/while bodies",
                self.current.span,
            )),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_block(&mut self) -> CompileResult<Block> {
        let start_span = self.current.span;
        self.expect(TokenKind::LBrace)?;

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.at_end() {
            stmts.push(self.parse_statement()?);
        }

        let end = self.expect(TokenKind::RBrace)?;
        Ok(Block::new(stmts, start_span.merge(end.span)))
    }

    /// A braced block, or a single statement wrapped as one
    fn parse_branch(&mut self) -> CompileResult<Block> {
        if self.check(&TokenKind::LBrace) {
            return self.parse_block();
        }
        let stmt = self.parse_statement()?;
        let span = stmt.span;
        Ok(Block::new(vec![stmt], span))
    }

    fn parse_local_declaration(&mut self) -> CompileResult<Stmt> {
        let start = self.expect(TokenKind::Int)?;
        let (name, name_span) = self.expect_identifier()?;
        if self.check(&TokenKind::LParen) {
            return Err(CompileError::parser(
                format!("function '{}' cannot be declared inside a function body", name),
                name_span,
            ));
        }
        let vars = self.parse_declarators(name, name_span)?;
        let end = self.expect(TokenKind::Semi)?;
        Ok(Stmt::new(StmtKind::Declaration(vars), start.span.merge(end.span)))
    }

    fn parse_if_statement(&mut self) -> CompileResult<Stmt> {
        let start = self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;

        let then_branch = self.parse_branch()?;
        let mut span = start.span.merge(then_branch.span);
        let else_branch = if self.match_token(&TokenKind::Else)? {
            let branch = self.parse_branch()?;
            span = span.merge(branch.span);
            Some(branch)
        } else {
            None
        };

        Ok(Stmt::new(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    fn parse_while_statement(&mut self) -> CompileResult<Stmt> {
        let start = self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_branch()?;
        let span = start.span.merge(body.span);
        Ok(Stmt::new(StmtKind::While { condition, body }, span))
    }

    fn parse_return_statement(&mut self) -> CompileResult<Stmt> {
        let start = self.expect(TokenKind::Return)?;
        let value = if self.check(&TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        let end = self.expect(TokenKind::Semi)?;
        Ok(Stmt::ret(value, start.span.merge(end.span)))
    }

    fn parse_expression_statement(&mut self) -> CompileResult<Stmt> {
        let expr = self.parse_expression()?;
        let end = self.expect(TokenKind::Semi)?;
        let span = expr.span.merge(end.span);
        Ok(Stmt::new(StmtKind::Expr(expr), span))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expression(&mut self) -> CompileResult<Expr> {
        self.parse_assignment_expression()
    }

    /// Right-associative: `a = b = c` is `a = (b = c)`
    fn parse_assignment_expression(&mut self) -> CompileResult<Expr> {
        let target = self.parse_logical_or_expression()?;

        if self.match_token(&TokenKind::Eq)? {
            let value = self.parse_assignment_expression()?;
            return Ok(Expr::assign(target, value));
        }

        Ok(target)
    }

    fn parse_logical_or_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_logical_and_expression()?;

        while self.match_token(&TokenKind::PipePipe)? {
            let right = self.parse_logical_and_expression()?;
            left = Expr::binary(BinaryOp::LogOr, left, right);
        }

        Ok(left)
    }

    fn parse_logical_and_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_equality_expression()?;

        while self.match_token(&TokenKind::AmpAmp)? {
            let right = self.parse_equality_expression()?;
            left = Expr::binary(BinaryOp::LogAnd, left, right);
        }

        Ok(left)
    }

    fn parse_equality_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_relational_expression()?;

        loop {
            let op = match &self.current.kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::Ne,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_relational_expression()?;
            left = Expr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_relational_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_additive_expression()?;

        loop {
            let op = match &self.current.kind {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::Le,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::Ge,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_additive_expression()?;
            left = Expr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_additive_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_multiplicative_expression()?;

        loop {
            let op = match &self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_multiplicative_expression()?;
            left = Expr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_multiplicative_expression(&mut self) -> CompileResult<Expr> {
        let mut left = self.parse_unary_expression()?;

        loop {
            let op = match &self.current.kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            self.advance()?;
            let right = self.parse_unary_expression()?;
            left = Expr::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_unary_expression(&mut self) -> CompileResult<Expr> {
        let op = match &self.current.kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.parse_postfix_expression(),
        };

        let start = self.advance()?;
        let operand = self.parse_unary_expression()?;
        let span = start.span.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_postfix_expression(&mut self) -> CompileResult<Expr> {
        let mut expr = self.parse_primary_expression()?;

        while self.match_token(&TokenKind::LParen)? {
            let args = self.parse_argument_list()?;
            let close = self.expect(TokenKind::RParen)?;
            let span = expr.span.merge(close.span);
            expr = Expr::call(expr, args, span);
        }

        Ok(expr)
    }

    fn parse_argument_list(&mut self) -> CompileResult<Vec<Expr>> {
        let mut args = Vec::new();

        if self.check(&TokenKind::RParen) {
            return Ok(args);
        }

        loop {
            args.push(self.parse_assignment_expression()?);
            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }

        Ok(args)
    }

    fn parse_primary_expression(&mut self) -> CompileResult<Expr> {
        let span = self.current.span;

        match &self.current.kind {
            TokenKind::IntLiteral(s) => {
                let value = self.parse_int_literal(s)?;
                self.advance()?;
                Ok(Expr::int(value, span))
            }
            TokenKind::StringLiteral(s) => {
                let value = s[1..s.len() - 1].to_string();
                self.advance()?;
                Ok(Expr::string(value, span))
            }
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance()?;
                Ok(Expr::ident(name, span))
            }
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            _ => Err(CompileError::parser(
                format!("unexpected token in expression: {}", self.current.kind),
                span,
            )),
        }
    }

    fn parse_int_literal(&self, s: &str) -> CompileResult<i64> {
        s.parse().map_err(|_| {
            CompileError::parser(format!("invalid integer literal: {}", s), self.current.span)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> TranslationUnit {
        Parser::new(source).unwrap().parse().unwrap()
    }

    fn parse_err(source: &str) -> CompileError {
        match Parser::new(source).and_then(|mut p| p.parse()) {
            Ok(tu) => panic!("expected parse error, got {:?}", tu),
            Err(err) => err,
        }
    }

    fn function(item: &Item) -> &FuncDecl {
        match &item.kind {
            ItemKind::Function(f) => f,
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_simple_function() {
        let tu = parse("int main() { return 0; }");

        assert_eq!(tu.items.len(), 1);
        let f = function(&tu.items[0]);
        assert_eq!(f.name, "main");
        assert_eq!(f.return_type, Type::Int);
        assert!(f.is_definition());
        assert_eq!(f.span, Span::new(0, 10));
    }

    #[test]
    fn test_parse_prototypes() {
        let tu = parse("int test(int, int); void empty(void); int fun(int c, int d);");

        let names: Vec<&str> = tu.items.iter().map(|i| function(i).name.as_str()).collect();
        assert_eq!(names, vec!["test", "empty", "fun"]);

        let test = function(&tu.items[0]);
        assert!(test.is_declaration());
        assert_eq!(test.params.len(), 2);
        assert!(test.params.iter().all(|p| p.name.is_none()));

        assert!(function(&tu.items[1]).params.is_empty());
        assert_eq!(function(&tu.items[1]).return_type, Type::Void);

        let fun = function(&tu.items[2]);
        assert_eq!(fun.params[1].name.as_deref(), Some("d"));
    }

    #[test]
    fn test_parse_global_variables() {
        let tu = parse("int a, b = 2, c;");

        assert_eq!(tu.items.len(), 1);
        match &tu.items[0].kind {
            ItemKind::Variables(vars) => {
                let names: Vec<&str> = vars.iter().map(|v| v.name.as_str()).collect();
                assert_eq!(names, vec!["a", "b", "c"]);
                assert!(vars[1].init.is_some());
            }
            other => panic!("expected variables, got {:?}", other),
        }
        assert_eq!(tu.items[0].span, Span::new(0, 16));
    }

    #[test]
    fn test_top_level_statements() {
        let tu = parse("int x; x = 3; printf(\"ey\");");

        assert_eq!(tu.items.len(), 3);
        match &tu.items[1].kind {
            ItemKind::Statement(Stmt {
                kind: StmtKind::Expr(expr),
                ..
            }) => assert!(matches!(expr.kind, ExprKind::Assign { .. })),
            other => panic!("expected assignment statement, got {:?}", other),
        }
        match &tu.items[2].kind {
            ItemKind::Statement(Stmt {
                kind: StmtKind::Expr(expr),
                ..
            }) => match &expr.kind {
                ExprKind::Call { callee, args } => {
                    assert_eq!(callee.as_identifier(), Some("printf"));
                    assert_eq!(args, &vec![Expr::string("ey", Span::new(21, 25))]);
                }
                other => panic!("expected call, got {:?}", other),
            },
            other => panic!("expected call statement, got {:?}", other),
        }
    }

    #[test]
    fn test_precedence() {
        let tu = parse("x = 1 + 2 * 3 == 7 || !y;");

        let ItemKind::Statement(Stmt {
            kind: StmtKind::Expr(expr),
            ..
        }) = &tu.items[0].kind
        else {
            panic!("expected expression statement");
        };
        let ExprKind::Assign { value, .. } = &expr.kind else {
            panic!("expected assignment");
        };
        let ExprKind::Binary { op, left, right } = &value.kind else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinaryOp::LogOr);
        assert!(matches!(right.kind, ExprKind::Unary { op: UnaryOp::Not, .. }));
        assert!(matches!(left.kind, ExprKind::Binary { op: BinaryOp::Eq, .. }));
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let tu = parse("a = b = 1;");

        let ItemKind::Statement(Stmt {
            kind: StmtKind::Expr(expr),
            ..
        }) = &tu.items[0].kind
        else {
            panic!("expected expression statement");
        };
        let ExprKind::Assign { target, value } = &expr.kind else {
            panic!("expected assignment");
        };
        assert_eq!(target.as_identifier(), Some("a"));
        assert!(matches!(value.kind, ExprKind::Assign { .. }));
    }

    #[test]
    fn test_parse_control_flow() {
        let source = "int f(int x) { int y; if (x) y = 1; else { y = 2; } while (y < 10) y = y + 1; return y; }";
        let tu = parse(source);

        let body = function(&tu.items[0]).body.as_ref().unwrap();
        assert_eq!(body.stmts.len(), 4);
        assert!(matches!(body.stmts[0].kind, StmtKind::Declaration(_)));
        match &body.stmts[1].kind {
            StmtKind::If {
                then_branch,
                else_branch,
                ..
            } => {
                assert_eq!(then_branch.stmts.len(), 1);
                assert_eq!(else_branch.as_ref().map(|b| b.stmts.len()), Some(1));
            }
            other => panic!("expected if, got {:?}", other),
        }
        assert!(matches!(body.stmts[2].kind, StmtKind::While { .. }));
        assert!(matches!(body.stmts[3].kind, StmtKind::Return(Some(_))));
    }

    #[test]
    fn test_nested_calls() {
        let tu = parse("int x = fun(d + test(3, 4), 1);");

        let ItemKind::Variables(vars) = &tu.items[0].kind else {
            panic!("expected variables");
        };
        let init = vars[0].init.as_ref().unwrap();
        let ExprKind::Call { callee, args } = &init.kind else {
            panic!("expected call");
        };
        assert_eq!(callee.as_identifier(), Some("fun"));
        assert_eq!(args.len(), 2);
        assert!(matches!(args[0].kind, ExprKind::Binary { op: BinaryOp::Add, .. }));
    }

    #[test]
    fn test_syntax_errors() {
        let err = parse_err("int x");
        assert_eq!(
            err.to_string(),
            "Parser error at Span { start: 5, end: 5 }: expected ';', found end of file"
        );

        assert!(matches!(parse_err("void v;"), CompileError::Parser { .. }));
        assert!(matches!(parse_err("int f(void x);"), CompileError::Parser { .. }));
        assert!(matches!(parse_err("int f() { int g(); }"), CompileError::Parser { .. }));
        assert!(matches!(parse_err("int f() { { } }"), CompileError::Parser { .. }));
        assert!(matches!(parse_err("x = ;"), CompileError::Parser { .. }));
        assert!(matches!(parse_err("int f() { return 0; "), CompileError::Parser { .. }));
    }

    #[test]
    fn test_lexer_errors_propagate() {
        assert!(matches!(parse_err("int x = 1 # 2;"), CompileError::Lexer { .. }));
    }
}
