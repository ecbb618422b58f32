// ABOUTME: Recursive-descent parser turning a token stream into an AST

use crate::ast::{BinaryOp, Expr, IncDecOp, Literal, Program, Stmt, UnaryOp};
use crate::error::ParseError;
use crate::token::{Token, TokenKind};

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

pub fn parse(tokens: Vec<Token>) -> Result<Program, ParseError> {
    let tokens: Vec<Token> = tokens
        .into_iter()
        .filter(|t| t.kind != TokenKind::Newline)
        .collect();
    let mut parser = Parser { tokens, pos: 0 };
    let mut statements = Vec::new();
    while !parser.is_eof() {
        statements.push(parser.parse_statement()?);
    }
    Ok(Program { statements })
}

impl Parser {
    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn is_eof(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    fn check(&self, kind: &TokenKind) -> bool {
        &self.current().kind == kind
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !self.is_eof() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, want: &TokenKind, expected_desc: &str) -> Result<Token, ParseError> {
        if self.check(want) {
            Ok(self.advance())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: expected_desc.into(),
                actual: self.current().kind.to_string(),
                line: self.current().line,
            })
        }
    }

    fn expect_ident(&mut self, expected_desc: &str) -> Result<String, ParseError> {
        match &self.current().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            other => Err(ParseError::UnexpectedToken {
                expected: expected_desc.into(),
                actual: other.to_string(),
                line: self.current().line,
            }),
        }
    }

    fn expect_end(&mut self, construct: &str, opened_at: usize) -> Result<(), ParseError> {
        if self.check(&TokenKind::End) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::MissingEnd {
                construct: construct.into(),
                opened_at,
                line: self.current().line,
            })
        }
    }

    fn parse_stmts_until(&mut self, terminators: &[TokenKind]) -> Result<Vec<Stmt>, ParseError> {
        let mut stmts = Vec::new();
        while !self.is_eof() && !terminators.iter().any(|t| self.check(t)) {
            stmts.push(self.parse_statement()?);
        }
        Ok(stmts)
    }

    fn starts_expr(&self) -> bool {
        !matches!(
            self.current().kind,
            TokenKind::End | TokenKind::Elif | TokenKind::Else | TokenKind::Eof
        )
    }

    fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        match &self.current().kind {
            TokenKind::Include => self.parse_include(),
            TokenKind::Let => self.parse_let(),
            TokenKind::Fn => self.parse_fn_stmt(),
            TokenKind::Class => self.parse_class(),
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::While => self.parse_while(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Break => {
                let line = self.advance().line;
                Ok(Stmt::Break { line })
            }
            TokenKind::Continue => {
                let line = self.advance().line;
                Ok(Stmt::Continue { line })
            }
            _ => Ok(Stmt::Expr(self.parse_expr()?)),
        }
    }

    fn parse_include(&mut self) -> Result<Stmt, ParseError> {
        let line = self.advance().line;
        match &self.current().kind {
            TokenKind::String(s) => {
                let path = s.clone();
                self.advance();
                Ok(Stmt::Include { path, line })
            }
            other => Err(ParseError::UnexpectedToken {
                expected: "string path".into(),
                actual: other.to_string(),
                line: self.current().line,
            }),
        }
    }

    fn parse_let(&mut self) -> Result<Stmt, ParseError> {
        self.advance();
        let name = self.expect_ident("identifier after 'let'")?;
        self.expect(&TokenKind::Eq, "'='")?;
        let value = self.parse_expr()?;
        Ok(Stmt::Let { name, value })
    }

    /// Parses `fn [name](params) <body> end` or `fn [name](params) => expr`,
    /// consuming the leading `fn`. The arrow form desugars to a single
    /// `return expr` body. Shared by statement-level and expression-level
    /// (anonymous function, method) contexts.
    fn parse_fn_common(&mut self) -> Result<(Option<String>, Vec<String>, Vec<Stmt>), ParseError> {
        let fn_line = self.advance().line;
        let name = if matches!(self.current().kind, TokenKind::Ident(_)) {
            Some(self.expect_ident("function name")?)
        } else {
            None
        };
        self.expect(&TokenKind::LParen, "'('")?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                params.push(self.expect_ident("parameter name")?);
                if self.check(&TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen, "')'")?;
        if self.check(&TokenKind::Arrow) {
            self.advance();
            let line = self.current().line;
            let expr = self.parse_expr()?;
            Ok((name, params, vec![Stmt::Return { value: Some(expr), line }]))
        } else {
            let body = self.parse_stmts_until(&[TokenKind::End])?;
            self.expect_end("fn", fn_line)?;
            Ok((name, params, body))
        }
    }

    fn parse_fn_stmt(&mut self) -> Result<Stmt, ParseError> {
        let (name, params, body) = self.parse_fn_common()?;
        match name {
            Some(name) => Ok(Stmt::FnDef { name, params, body }),
            None => Ok(Stmt::Expr(Expr::FnExpr { name: None, params, body })),
        }
    }

    fn parse_class(&mut self) -> Result<Stmt, ParseError> {
        let class_line = self.advance().line;
        let name = self.expect_ident("class name")?;
        let mut methods = Vec::new();
        while self.check(&TokenKind::Fn) {
            let (method_name, params, body) = self.parse_fn_common()?;
            // anonymous methods are parsed but have no name to bind under,
            // so they are silently discarded per the class grammar.
            if let Some(method_name) = method_name {
                methods.push((method_name, params, body));
            }
        }
        self.expect_end("class", class_line)?;
        Ok(Stmt::ClassDef { name, methods })
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let if_line = self.advance().line;
        let mut branches = Vec::new();
        let cond = self.parse_expr()?;
        let body = self.parse_stmts_until(&[TokenKind::Elif, TokenKind::Else, TokenKind::End])?;
        branches.push((cond, body));
        while self.check(&TokenKind::Elif) {
            self.advance();
            let cond = self.parse_expr()?;
            let body =
                self.parse_stmts_until(&[TokenKind::Elif, TokenKind::Else, TokenKind::End])?;
            branches.push((cond, body));
        }
        let else_branch = if self.check(&TokenKind::Else) {
            self.advance();
            Some(self.parse_stmts_until(&[TokenKind::End])?)
        } else {
            None
        };
        self.expect_end("if", if_line)?;
        Ok(Stmt::If { branches, else_branch })
    }

    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let for_line = self.advance().line;
        let var = self.expect_ident("loop variable")?;
        self.expect(&TokenKind::In, "'in'")?;
        let iterable = self.parse_expr()?;
        let body = self.parse_stmts_until(&[TokenKind::End])?;
        self.expect_end("for", for_line)?;
        Ok(Stmt::For { var, iterable, body })
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let while_line = self.advance().line;
        let condition = self.parse_expr()?;
        let body = self.parse_stmts_until(&[TokenKind::End])?;
        self.expect_end("while", while_line)?;
        Ok(Stmt::While { condition, body })
    }

    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        let line = self.advance().line;
        let value = if self.starts_expr() {
            Some(self.parse_expr()?)
        } else {
            None
        };
        Ok(Stmt::Return { value, line })
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_or()?;
        let compound_op = match &self.current().kind {
            TokenKind::Eq => Some(None),
            TokenKind::PlusEq => Some(Some(BinaryOp::Add)),
            TokenKind::MinusEq => Some(Some(BinaryOp::Sub)),
            TokenKind::StarEq => Some(Some(BinaryOp::Mul)),
            TokenKind::SlashEq => Some(Some(BinaryOp::Div)),
            _ => None,
        };
        let Some(op) = compound_op else {
            return Ok(left);
        };
        let line = self.current().line;
        self.advance();
        let value = self.parse_assignment()?;
        match (left, op) {
            (Expr::Var(name, _), None) => Ok(Expr::Assign {
                name,
                value: Box::new(value),
                line,
            }),
            (Expr::Var(name, _), Some(bop)) => Ok(Expr::CompoundAssign {
                name,
                op: bop,
                value: Box::new(value),
                line,
            }),
            (Expr::Attr { target, attr, line: attr_line }, None) => Ok(Expr::AttrAssign {
                target,
                attr,
                value: Box::new(value),
                line: attr_line,
            }),
            (Expr::Attr { target, attr, line: attr_line }, Some(bop)) => {
                let current = Expr::Attr {
                    target: target.clone(),
                    attr: attr.clone(),
                    line: attr_line,
                };
                let desugared = Expr::Binary {
                    op: bop,
                    left: Box::new(current),
                    right: Box::new(value),
                    line,
                };
                Ok(Expr::AttrAssign {
                    target,
                    attr,
                    value: Box::new(desugared),
                    line: attr_line,
                })
            }
            _ => Err(ParseError::UnexpectedToken {
                expected: "assignable target".into(),
                actual: "non-assignable expression".into(),
                line,
            }),
        }
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_and()?;
        while self.check(&TokenKind::Or) {
            let line = self.advance().line;
            let right = self.parse_and()?;
            expr = Expr::Binary {
                op: BinaryOp::Or,
                left: Box::new(expr),
                right: Box::new(right),
                line,
            };
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_comparison()?;
        while self.check(&TokenKind::And) {
            let line = self.advance().line;
            let right = self.parse_comparison()?;
            expr = Expr::Binary {
                op: BinaryOp::And,
                left: Box::new(expr),
                right: Box::new(right),
                line,
            };
        }
        Ok(expr)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_additive()?;
        loop {
            let op = match &self.current().kind {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::GtEq,
                _ => break,
            };
            let line = self.advance().line;
            let right = self.parse_additive()?;
            expr = Expr::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(right),
                line,
            };
        }
        Ok(expr)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_multiplicative()?;
        loop {
            let op = match &self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            let line = self.advance().line;
            let right = self.parse_multiplicative()?;
            expr = Expr::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(right),
                line,
            };
        }
        Ok(expr)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_exponent()?;
        loop {
            let op = match &self.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                _ => break,
            };
            let line = self.advance().line;
            let right = self.parse_exponent()?;
            expr = Expr::Binary {
                op,
                left: Box::new(expr),
                right: Box::new(right),
                line,
            };
        }
        Ok(expr)
    }

    /// Right-associative: `2 ** 3 ** 2` parses as `2 ** (3 ** 2)`.
    fn parse_exponent(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_unary()?;
        if self.check(&TokenKind::StarStar) {
            let line = self.advance().line;
            let exponent = self.parse_exponent()?;
            Ok(Expr::Binary {
                op: BinaryOp::Pow,
                left: Box::new(base),
                right: Box::new(exponent),
                line,
            })
        } else {
            Ok(base)
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        match &self.current().kind {
            TokenKind::Minus => {
                let line = self.advance().line;
                let expr = self.parse_unary()?;
                Ok(Expr::Unary {
                    op: UnaryOp::Neg,
                    expr: Box::new(expr),
                    line,
                })
            }
            TokenKind::Not => {
                let line = self.advance().line;
                let expr = self.parse_unary()?;
                Ok(Expr::Unary {
                    op: UnaryOp::Not,
                    expr: Box::new(expr),
                    line,
                })
            }
            TokenKind::PlusPlus => {
                let line = self.advance().line;
                let target = self.parse_unary()?;
                Ok(Expr::IncDec {
                    target: Box::new(target),
                    op: IncDecOp::Inc,
                    prefix: true,
                    line,
                })
            }
            TokenKind::MinusMinus => {
                let line = self.advance().line;
                let target = self.parse_unary()?;
                Ok(Expr::IncDec {
                    target: Box::new(target),
                    op: IncDecOp::Dec,
                    prefix: true,
                    line,
                })
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            match &self.current().kind {
                TokenKind::LParen => {
                    let line = self.advance().line;
                    let mut args = Vec::new();
                    if !self.check(&TokenKind::RParen) {
                        loop {
                            args.push(self.parse_expr()?);
                            if self.check(&TokenKind::Comma) {
                                self.advance();
                            } else {
                                break;
                            }
                        }
                    }
                    self.expect(&TokenKind::RParen, "')'")?;
                    expr = Expr::Call {
                        callee: Box::new(expr),
                        args,
                        line,
                    };
                }
                TokenKind::LBracket => {
                    let line = self.advance().line;
                    let index = self.parse_expr()?;
                    self.expect(&TokenKind::RBracket, "']'")?;
                    expr = Expr::Index {
                        target: Box::new(expr),
                        index: Box::new(index),
                        line,
                    };
                }
                TokenKind::Dot => {
                    let line = self.advance().line;
                    let attr = self.expect_ident("attribute name")?;
                    expr = Expr::Attr {
                        target: Box::new(expr),
                        attr,
                        line,
                    };
                }
                TokenKind::PlusPlus => {
                    let line = self.advance().line;
                    expr = Expr::IncDec {
                        target: Box::new(expr),
                        op: IncDecOp::Inc,
                        prefix: false,
                        line,
                    };
                }
                TokenKind::MinusMinus => {
                    let line = self.advance().line;
                    expr = Expr::IncDec {
                        target: Box::new(expr),
                        op: IncDecOp::Dec,
                        prefix: false,
                        line,
                    };
                }
                _ => break,
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let line = self.current().line;
        match self.current().kind.clone() {
            TokenKind::Int(n) => {
                self.advance();
                Ok(Expr::Literal(Literal::Int(n)))
            }
            TokenKind::Float(n) => {
                self.advance();
                Ok(Expr::Literal(Literal::Float(n)))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(Expr::Literal(Literal::Str(s)))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(true)))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expr::Literal(Literal::Bool(false)))
            }
            TokenKind::Nil => {
                self.advance();
                Ok(Expr::Literal(Literal::Nil))
            }
            TokenKind::SelfKw => {
                self.advance();
                Ok(Expr::SelfExpr(line))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Expr::Var(name, line))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(expr)
            }
            TokenKind::LBracket => {
                self.advance();
                let mut items = Vec::new();
                if !self.check(&TokenKind::RBracket) {
                    loop {
                        items.push(self.parse_expr()?);
                        if self.check(&TokenKind::Comma) {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                self.expect(&TokenKind::RBracket, "']'")?;
                Ok(Expr::ListLit(items))
            }
            TokenKind::LBrace => {
                self.advance();
                let mut entries = Vec::new();
                if !self.check(&TokenKind::RBrace) {
                    loop {
                        let key = match self.current().kind.clone() {
                            TokenKind::Ident(name) => {
                                self.advance();
                                name
                            }
                            TokenKind::String(s) => {
                                self.advance();
                                s
                            }
                            other => {
                                return Err(ParseError::UnexpectedToken {
                                    expected: "map key".into(),
                                    actual: other.to_string(),
                                    line: self.current().line,
                                })
                            }
                        };
                        self.expect(&TokenKind::Colon, "':'")?;
                        let value = self.parse_expr()?;
                        entries.push((key, value));
                        if self.check(&TokenKind::Comma) {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                self.expect(&TokenKind::RBrace, "'}'")?;
                Ok(Expr::MapLit(entries))
            }
            TokenKind::Fn => {
                let (name, params, body) = self.parse_fn_common()?;
                Ok(Expr::FnExpr { name, params, body })
            }
            TokenKind::New => {
                self.advance();
                let class = self.expect_ident("class name")?;
                self.expect(&TokenKind::LParen, "'('")?;
                let mut args = Vec::new();
                if !self.check(&TokenKind::RParen) {
                    loop {
                        args.push(self.parse_expr()?);
                        if self.check(&TokenKind::Comma) {
                            self.advance();
                        } else {
                            break;
                        }
                    }
                }
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(Expr::New { class, args, line })
            }
            other => Err(ParseError::UnexpectedToken {
                expected: "expression".into(),
                actual: other.to_string(),
                line,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;

    fn parse_source(source: &str) -> Program {
        parse(scan(source).unwrap()).unwrap()
    }

    #[test]
    fn test_let_statement() {
        let program = parse_source("let x = 10");
        assert!(matches!(
            program.statements.as_slice(),
            [Stmt::Let { name, .. }] if name == "x"
        ));
    }

    #[test]
    fn test_if_elif_else() {
        let program = parse_source("if a\n1\nelif b\n2\nelse\n3\nend");
        match &program.statements[0] {
            Stmt::If { branches, else_branch } => {
                assert_eq!(branches.len(), 2);
                assert!(else_branch.is_some());
            }
            other => panic!("expected If, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_end_names_construct_and_line() {
        let err = parse(scan("if a\nprint(1)").unwrap()).unwrap_err();
        match err {
            ParseError::MissingEnd { construct, opened_at, .. } => {
                assert_eq!(construct, "if");
                assert_eq!(opened_at, 1);
            }
            other => panic!("expected MissingEnd, got {other:?}"),
        }
    }

    #[test]
    fn test_arrow_fn_desugars_to_return() {
        let program = parse_source("fn double(n) => n * 2");
        match &program.statements[0] {
            Stmt::FnDef { body, .. } => {
                assert!(matches!(body.as_slice(), [Stmt::Return { value: Some(_), .. }]));
            }
            other => panic!("expected FnDef, got {other:?}"),
        }
    }

    #[test]
    fn test_compound_attr_assign_desugars_to_binary() {
        let program = parse_source("self.n += 1");
        match &program.statements[0] {
            Stmt::Expr(Expr::AttrAssign { value, .. }) => {
                assert!(matches!(**value, Expr::Binary { op: BinaryOp::Add, .. }));
            }
            other => panic!("expected AttrAssign, got {other:?}"),
        }
    }

    #[test]
    fn test_exponent_is_right_associative() {
        let program = parse_source("2 ** 3 ** 2");
        match &program.statements[0] {
            Stmt::Expr(Expr::Binary { right, .. }) => {
                assert!(matches!(**right, Expr::Binary { op: BinaryOp::Pow, .. }));
            }
            other => panic!("expected Binary, got {other:?}"),
        }
    }

    #[test]
    fn test_postfix_and_prefix_incdec() {
        let program = parse_source("y++\n++y");
        assert!(matches!(
            &program.statements[0],
            Stmt::Expr(Expr::IncDec { prefix: false, .. })
        ));
        assert!(matches!(
            &program.statements[1],
            Stmt::Expr(Expr::IncDec { prefix: true, .. })
        ));
    }

    #[test]
    fn test_new_instance_is_distinct_from_call() {
        let program = parse_source("new Point(1, 2)");
        assert!(matches!(&program.statements[0], Stmt::Expr(Expr::New { .. })));
    }

    #[test]
    fn test_anonymous_class_methods_are_discarded() {
        let program = parse_source("class C\nfn named() end\nfn (x) end\nend");
        match &program.statements[0] {
            Stmt::ClassDef { methods, .. } => assert_eq!(methods.len(), 1),
            other => panic!("expected ClassDef, got {other:?}"),
        }
    }
}
