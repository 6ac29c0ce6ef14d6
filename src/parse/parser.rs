use std::rc::Rc;

use log::debug;

use crate::ast::*;
use crate::token::{Literal, Token, TokenKind};

use super::context::Context;
use super::error::ParseError;

const MAX_ARGUMENTS: usize = 255;

/// Parses a whole unit. A statement that fails to parse is dropped from the
/// result and parsing resumes at the next statement boundary, so the returned
/// errors may describe several independent problems.
pub fn parse(items: &[Token]) -> (StatementList, Vec<ParseError>) {
    let mut state = Context::new(items);
    let mut stmts = vec![];
    while !state.is_at_end() {
        if let Some(stmt) = parse_declaration(&mut state) {
            stmts.push(stmt);
        }
    }
    (stmts, state.take_errors())
}

fn parse_declaration(state: &mut Context) -> Option<Statement> {
    let result = if state.match_token(&[TokenKind::Fun]).is_some() {
        parse_function(state)
    } else if state.match_token(&[TokenKind::Var]).is_some() {
        parse_var_declaration(state)
    } else {
        parse_stmt(state)
    };

    match result {
        Ok(stmt) => Some(stmt),
        Err(err) => {
            debug!("line {}: {}, synchronizing", err.line(), err);
            state.report(err);
            state.synchronize();
            None
        }
    }
}

fn parse_stmt(state: &mut Context) -> Result<Statement, ParseError> {
    let li = state.get_curr();
    match li.kind {
        TokenKind::If => {
            state.advance();
            parse_if(state)
        }
        TokenKind::For => {
            state.advance();
            parse_for(state)
        }
        TokenKind::While => {
            state.advance();
            parse_while(state)
        }
        TokenKind::Print => {
            state.advance();
            parse_print(state)
        }
        TokenKind::Return => {
            state.advance();
            parse_return(state)
        }
        TokenKind::LeftBrace => {
            state.advance();
            parse_block(state).map(Statement::Block)
        }
        _ => parse_expr_stmt(state),
    }
}

fn parse_function(state: &mut Context) -> Result<Statement, ParseError> {
    let name = state
        .consume_token(TokenKind::Identifier, "Expect function name.")?
        .clone();
    state.consume_token(TokenKind::LeftParen, "Expect '(' after function name.")?;

    let mut params = vec![];
    if !state.peek(&[TokenKind::RightParen]) {
        loop {
            if params.len() >= MAX_ARGUMENTS {
                let li = state.get_curr().clone();
                state.report(ParseError::TooManyParameters(li));
            }
            let param = state.consume_token(TokenKind::Identifier, "Expect parameter name.")?;
            if params.iter().any(|p: &Token| p.lexeme == param.lexeme) {
                state.report(ParseError::DuplicateParameter(param.clone()));
            }
            params.push(param.clone());
            if state.match_token(&[TokenKind::Comma]).is_none() {
                break;
            }
        }
    }
    state.consume_token(TokenKind::RightParen, "Expect ')' after parameters.")?;
    state.consume_token(TokenKind::LeftBrace, "Expect '{' before function body.")?;

    let was_in_fn = state.is_in_fn;
    state.is_in_fn = true;
    let body = parse_block(state);
    state.is_in_fn = was_in_fn;

    Ok(Statement::Function(Rc::new(FunctionDecl {
        name,
        params,
        body: body?,
    })))
}

fn parse_var_declaration(state: &mut Context) -> Result<Statement, ParseError> {
    let name = state
        .consume_token(TokenKind::Identifier, "Expect variable name.")?
        .clone();
    let initializer = match state.match_token(&[TokenKind::Equal]) {
        Some(_) => Some(parse_expr(state)?),
        None => None,
    };
    state.consume_token(
        TokenKind::Semicolon,
        "Expect ';' after variable declaration.",
    )?;
    Ok(Statement::Var(VarNode { name, initializer }))
}

// the opening brace has already been consumed
fn parse_block(state: &mut Context) -> Result<StatementList, ParseError> {
    let mut stmts = vec![];
    while !state.is_at_end() && !state.peek(&[TokenKind::RightBrace]) {
        if let Some(stmt) = parse_declaration(state) {
            stmts.push(stmt);
        }
    }
    state.consume_token(TokenKind::RightBrace, "Expect '}' after block.")?;
    Ok(stmts)
}

fn parse_if(state: &mut Context) -> Result<Statement, ParseError> {
    state.consume_token(TokenKind::LeftParen, "Expect '(' after 'if'.")?;
    let cond = parse_expr(state)?;
    state.consume_token(TokenKind::RightParen, "Expect ')' after if condition.")?;

    let then_branch = Box::new(parse_stmt(state)?);
    let else_branch = match state.match_token(&[TokenKind::Else]) {
        Some(_) => Some(Box::new(parse_stmt(state)?)),
        None => None,
    };

    Ok(Statement::If(IfNode {
        cond,
        then_branch,
        else_branch,
    }))
}

fn parse_while(state: &mut Context) -> Result<Statement, ParseError> {
    state.consume_token(TokenKind::LeftParen, "Expect '(' after 'while'.")?;
    let cond = parse_expr(state)?;
    state.consume_token(TokenKind::RightParen, "Expect ')' after while condition.")?;
    let body = Box::new(parse_stmt(state)?);
    Ok(Statement::While(WhileNode { cond, body }))
}

/// `for (init; cond; incr) body` becomes `{ init; while (cond) { body; incr; } }`.
fn parse_for(state: &mut Context) -> Result<Statement, ParseError> {
    state.consume_token(TokenKind::LeftParen, "Expect '(' after 'for'.")?;

    let initializer = if state.match_token(&[TokenKind::Semicolon]).is_some() {
        None
    } else if state.match_token(&[TokenKind::Var]).is_some() {
        Some(parse_var_declaration(state)?)
    } else {
        Some(parse_expr_stmt(state)?)
    };

    let cond = if state.peek(&[TokenKind::Semicolon]) {
        None
    } else {
        Some(parse_expr(state)?)
    };
    state.consume_token(TokenKind::Semicolon, "Expect ';' after loop condition.")?;

    let increment = if state.peek(&[TokenKind::RightParen]) {
        None
    } else {
        Some(parse_expr(state)?)
    };
    state.consume_token(TokenKind::RightParen, "Expect ')' after for clauses.")?;

    let mut body = parse_stmt(state)?;

    if let Some(increment) = increment {
        body = Statement::Block(vec![body, Statement::Expr(increment)]);
    }

    body = Statement::While(WhileNode {
        cond: cond.unwrap_or(Expression::Literal(Literal::Bool(true))),
        body: Box::new(body),
    });

    if let Some(initializer) = initializer {
        body = Statement::Block(vec![initializer, body]);
    }

    Ok(body)
}

fn parse_print(state: &mut Context) -> Result<Statement, ParseError> {
    let expr = parse_expr(state)?;
    state.consume_token(TokenKind::Semicolon, "Expect ';' after value.")?;
    Ok(Statement::Print(expr))
}

fn parse_return(state: &mut Context) -> Result<Statement, ParseError> {
    let keyword = state.previous().clone();
    if !state.is_in_fn {
        state.report(ParseError::ReturnOutsideFunction(keyword.clone()));
    }

    let value = if state.peek(&[TokenKind::Semicolon]) {
        None
    } else {
        Some(parse_expr(state)?)
    };
    state.consume_token(TokenKind::Semicolon, "Expect ';' after return value.")?;
    Ok(Statement::Return(ReturnNode { keyword, value }))
}

fn parse_expr_stmt(state: &mut Context) -> Result<Statement, ParseError> {
    let expr = parse_expr(state)?;
    state.consume_token(TokenKind::Semicolon, "Expect ';' after expression.")?;
    Ok(Statement::Expr(expr))
}

fn parse_expr(state: &mut Context) -> Result<Expression, ParseError> {
    parse_assignment(state)
}

fn parse_assignment(state: &mut Context) -> Result<Expression, ParseError> {
    let expr = parse_or(state)?;

    let Some(equals) = state.match_token(&[TokenKind::Equal]) else {
        return Ok(expr);
    };
    let value = parse_assignment(state)?;

    match expr {
        Expression::Variable(name) => Ok(Expression::Assign(AssignNode {
            name,
            value: Box::new(value),
        })),
        other => {
            state.report(ParseError::InvalidAssignmentTarget(equals.clone()));
            Ok(other)
        }
    }
}

fn parse_or(state: &mut Context) -> Result<Expression, ParseError> {
    parse_recursive_binary(state, &[TokenKind::Or], parse_and, Expression::Logical)
}

fn parse_and(state: &mut Context) -> Result<Expression, ParseError> {
    parse_recursive_binary(
        state,
        &[TokenKind::And],
        parse_equality,
        Expression::Logical,
    )
}

fn parse_equality(state: &mut Context) -> Result<Expression, ParseError> {
    parse_recursive_binary(
        state,
        &[TokenKind::BangEqual, TokenKind::EqualEqual],
        parse_comparison,
        Expression::Binary,
    )
}

fn parse_comparison(state: &mut Context) -> Result<Expression, ParseError> {
    parse_recursive_binary(
        state,
        &[
            TokenKind::Greater,
            TokenKind::GreaterEqual,
            TokenKind::Less,
            TokenKind::LessEqual,
        ],
        parse_term,
        Expression::Binary,
    )
}

fn parse_term(state: &mut Context) -> Result<Expression, ParseError> {
    parse_recursive_binary(
        state,
        &[TokenKind::Minus, TokenKind::Plus],
        parse_factor,
        Expression::Binary,
    )
}

fn parse_factor(state: &mut Context) -> Result<Expression, ParseError> {
    parse_recursive_binary(
        state,
        &[TokenKind::Slash, TokenKind::Star],
        parse_unary,
        Expression::Binary,
    )
}

fn parse_recursive_binary<F>(
    state: &mut Context,
    match_tokens: &'static [TokenKind],
    lower_fn: F,
    make_node: fn(BinaryOpNode) -> Expression,
) -> Result<Expression, ParseError>
where
    F: Fn(&mut Context) -> Result<Expression, ParseError>,
{
    let mut lhs = lower_fn(state)?;

    while let Some(op) = state.match_token(match_tokens) {
        let op = op.clone();
        let rhs = lower_fn(state)?;
        lhs = make_node(BinaryOpNode {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        });
    }

    Ok(lhs)
}

fn parse_unary(state: &mut Context) -> Result<Expression, ParseError> {
    match state.match_token(&[TokenKind::Bang, TokenKind::Minus]) {
        Some(op) => {
            let op = op.clone();
            let operand = parse_unary(state)?;
            Ok(Expression::Unary(UnaryNode {
                op,
                operand: Box::new(operand),
            }))
        }
        None => parse_call(state),
    }
}

fn parse_call(state: &mut Context) -> Result<Expression, ParseError> {
    let mut expr = parse_primary(state)?;
    while state.match_token(&[TokenKind::LeftParen]).is_some() {
        expr = finish_call(state, expr)?;
    }
    Ok(expr)
}

fn finish_call(state: &mut Context, callee: Expression) -> Result<Expression, ParseError> {
    let mut args = vec![];
    if !state.peek(&[TokenKind::RightParen]) {
        loop {
            if args.len() >= MAX_ARGUMENTS {
                let li = state.get_curr().clone();
                state.report(ParseError::TooManyArguments(li));
            }
            args.push(parse_expr(state)?);
            if state.match_token(&[TokenKind::Comma]).is_none() {
                break;
            }
        }
    }
    let paren = state
        .consume_token(TokenKind::RightParen, "Expect ')' after arguments.")?
        .clone();

    Ok(Expression::Call(CallNode {
        callee: Box::new(callee),
        paren,
        args,
    }))
}

fn parse_primary(state: &mut Context) -> Result<Expression, ParseError> {
    let li = state.get_curr();
    let expect_expression = || ParseError::UnexpectedToken {
        found: li.clone(),
        message: "Expect expression.",
    };

    let expr = match li.kind {
        TokenKind::False => Expression::Literal(Literal::Bool(false)),
        TokenKind::True => Expression::Literal(Literal::Bool(true)),
        TokenKind::Null => Expression::Literal(Literal::Null),
        TokenKind::Number | TokenKind::String => match &li.literal {
            Some(v) => Expression::Literal(v.clone()),
            None => return Err(expect_expression()),
        },
        TokenKind::Identifier => Expression::Variable(li.clone()),
        TokenKind::LeftParen => {
            state.advance();
            let inner = parse_expr(state)?;
            state.consume_token(TokenKind::RightParen, "Expect ')' after expression.")?;
            return Ok(Expression::Grouping(Box::new(inner)));
        }
        _ => return Err(expect_expression()),
    };

    state.advance();
    Ok(expr)
}
