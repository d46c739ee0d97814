// File: src/parser.rs
//
// Parser for the BCL language. Consumes the token list destructively from
// the front and produces a Program AST.
//
// Expressions are not parsed by recursive descent over the token stream.
// Instead, the parser collects an expression window (all tokens up to a
// terminator, respecting parenthesis depth), then scans the window from
// right to left for the lowest-precedence operator at depth zero and splits
// there. The left side recurses at the same tier, the right side at the next
// tier up, which yields left associativity:
//
//   additive tier  { + - % }  ->  multiplicative tier { * / }  ->  primary
//   logical tier   { && || }  ->  negation / relational / bare expression
//
// Note that `%` deliberately shares the additive tier, so `2 + 3 % 4`
// parses as `(2 + 3) % 4`.

use crate::ast::{
    Assignment, BinOp, CallFunc, Comparison, Declaration, Expr, ForInit, ForLoop, Function,
    IfKind, IfStmt, Literal, LogicalOp, Printf, Program, RelOp, Return, Stmt, StructDecl,
    VarList, Variable,
};
use crate::errors::{BclError, SourceLocation};
use crate::lexer::{Token, TokenLabel};
use std::collections::VecDeque;

pub struct Parser {
    tokens: VecDeque<Token>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens: tokens.into() }
    }

    /// Parse the whole token stream into a program. The token list is
    /// consumed; any grammatical violation aborts with a syntax error
    /// carrying the offending token's location.
    pub fn parse(mut self) -> Result<Program, BclError> {
        let mut declarations = Vec::new();
        while !self.tokens.is_empty() {
            declarations.push(parse_declaration(&mut self.tokens)?);
        }
        Ok(Program { declarations })
    }
}

fn unexpected(token: &Token) -> BclError {
    BclError::syntax_error(format!("Unexpected token '{}'", token.text), token.location())
}

fn unexpected_end() -> BclError {
    BclError::syntax_error("Unexpected end of input".to_string(), SourceLocation::unknown())
}

fn front<'a>(tokens: &'a VecDeque<Token>) -> Result<&'a Token, BclError> {
    tokens.front().ok_or_else(unexpected_end)
}

fn expect(tokens: &mut VecDeque<Token>, label: TokenLabel) -> Result<Token, BclError> {
    let tok = tokens.pop_front().ok_or_else(unexpected_end)?;
    if tok.label != label {
        return Err(unexpected(&tok));
    }
    Ok(tok)
}

fn additive_op(label: TokenLabel) -> Option<BinOp> {
    match label {
        TokenLabel::Add => Some(BinOp::Add),
        TokenLabel::Sub => Some(BinOp::Sub),
        TokenLabel::Mod => Some(BinOp::Mod),
        _ => None,
    }
}

fn multiplicative_op(label: TokenLabel) -> Option<BinOp> {
    match label {
        TokenLabel::Mul => Some(BinOp::Mul),
        TokenLabel::Div => Some(BinOp::Div),
        _ => None,
    }
}

fn logical_op(label: TokenLabel) -> Option<LogicalOp> {
    match label {
        TokenLabel::And => Some(LogicalOp::And),
        TokenLabel::Or => Some(LogicalOp::Or),
        _ => None,
    }
}

fn rel_op(label: TokenLabel) -> Option<RelOp> {
    match label {
        TokenLabel::Eq => Some(RelOp::Eq),
        TokenLabel::Ne => Some(RelOp::Ne),
        TokenLabel::Lt => Some(RelOp::Lt),
        TokenLabel::Gt => Some(RelOp::Gt),
        TokenLabel::Le => Some(RelOp::Le),
        TokenLabel::Ge => Some(RelOp::Ge),
        _ => None,
    }
}

/// Top-level dispatch: struct, function (third token is `(`), or a global
/// variable list.
fn parse_declaration(tokens: &mut VecDeque<Token>) -> Result<Declaration, BclError> {
    if front(tokens)?.label == TokenLabel::Struct {
        return Ok(Declaration::Struct(parse_struct(tokens)?));
    }
    if tokens.len() >= 3 && tokens[2].label == TokenLabel::LParen {
        return Ok(Declaration::Function(parse_func(tokens)?));
    }
    Ok(Declaration::VarList(parse_var_list(tokens)?))
}

fn parse_struct(tokens: &mut VecDeque<Token>) -> Result<StructDecl, BclError> {
    let keyword = expect(tokens, TokenLabel::Struct)?;
    let name = tokens.pop_front().ok_or_else(unexpected_end)?;
    if !name.is_identifier() {
        return Err(unexpected(&name));
    }
    expect(tokens, TokenLabel::LBrace)?;

    let mut fields = Vec::new();
    while front(tokens)?.label != TokenLabel::RBrace {
        fields.push(parse_var_list(tokens)?);
    }
    expect(tokens, TokenLabel::RBrace)?;

    Ok(StructDecl { name: name.text, fields, loc: keyword.location() })
}

/// `type name (, name)* ;` where each name may carry an `= expr` initializer.
fn parse_var_list(tokens: &mut VecDeque<Token>) -> Result<VarList, BclError> {
    let ty = tokens.pop_front().ok_or_else(unexpected_end)?;
    if !ty.label.is_type_token() || ty.label == TokenLabel::Void {
        return Err(unexpected(&ty));
    }

    let mut variables = Vec::new();
    loop {
        let label = front(tokens)?.label;
        if label == TokenLabel::Semicolon {
            break;
        }
        if label == TokenLabel::Comma {
            tokens.pop_front();
        }
        variables.push(parse_variable(&ty.text, tokens, false, true, false)?);
    }
    expect(tokens, TokenLabel::Semicolon)?;

    Ok(VarList { ty: ty.text.clone(), variables, loc: ty.location() })
}

fn parse_variable(
    ty: &str,
    tokens: &mut VecDeque<Token>,
    is_param: bool,
    semicolon: bool,
    right_paren: bool,
) -> Result<Variable, BclError> {
    let name = tokens.pop_front().ok_or_else(unexpected_end)?;
    if !name.is_identifier() {
        return Err(unexpected(&name));
    }

    let init = match tokens.front() {
        Some(tok) if tok.label == TokenLabel::Assign => {
            tokens.pop_front();
            Some(parse_expression(tokens, semicolon, true, right_paren)?)
        }
        _ => None,
    };

    Ok(Variable { name: name.text.clone(), ty: ty.to_string(), init, is_param, loc: name.location() })
}

fn parse_func(tokens: &mut VecDeque<Token>) -> Result<Function, BclError> {
    let return_type = tokens.pop_front().ok_or_else(unexpected_end)?;
    if !return_type.label.is_type_token() {
        return Err(unexpected(&return_type));
    }
    let name = tokens.pop_front().ok_or_else(unexpected_end)?;
    if !name.is_identifier() {
        return Err(unexpected(&name));
    }
    expect(tokens, TokenLabel::LParen)?;

    let mut params = Vec::new();
    loop {
        let label = front(tokens)?.label;
        if label == TokenLabel::RParen {
            break;
        }
        if label == TokenLabel::Comma {
            tokens.pop_front();
        }
        let param_ty = tokens.pop_front().ok_or_else(unexpected_end)?;
        if !param_ty.label.is_type_token() || param_ty.label == TokenLabel::Void {
            return Err(unexpected(&param_ty));
        }
        params.push(parse_variable(&param_ty.text, tokens, true, false, true)?);
    }
    expect(tokens, TokenLabel::RParen)?;
    expect(tokens, TokenLabel::LBrace)?;

    let body = parse_statements(tokens)?;
    expect(tokens, TokenLabel::RBrace)?;

    Ok(Function {
        return_type: return_type.text,
        loc: name.location(),
        name: name.text,
        params,
        body,
    })
}

/// Parse statements until the closing `}` of the current block (left for the
/// caller to consume).
fn parse_statements(tokens: &mut VecDeque<Token>) -> Result<Vec<Stmt>, BclError> {
    let mut statements = Vec::new();
    while let Some(first) = tokens.front() {
        if first.label == TokenLabel::RBrace {
            break;
        }
        let first = first.clone();
        if tokens.len() < 2 {
            return Err(unexpected(&first));
        }
        match first.label {
            TokenLabel::For => statements.push(Stmt::For(parse_for_loop(tokens)?)),
            TokenLabel::If | TokenLabel::Elseif | TokenLabel::Else => {
                statements.push(Stmt::If(parse_if_statement(tokens)?));
            }
            TokenLabel::Printf => statements.push(Stmt::Printf(parse_printf(tokens)?)),
            TokenLabel::Return => statements.push(Stmt::Return(parse_return(tokens)?)),
            TokenLabel::Break => {
                tokens.pop_front();
                expect(tokens, TokenLabel::Semicolon)?;
                statements.push(Stmt::Break { loc: first.location() });
            }
            _ => {
                // Dispatch on the second token: `name =` / `name .` is an
                // assignment, `name (` a call, anything else a declaration.
                let second = tokens[1].label;
                if second == TokenLabel::Assign || second == TokenLabel::Dot {
                    statements
                        .push(Stmt::Assignment(parse_assignment(tokens, TokenLabel::Semicolon)?));
                } else if second == TokenLabel::LParen {
                    let call = parse_call_func(tokens)?;
                    expect(tokens, TokenLabel::Semicolon)?;
                    statements.push(Stmt::Call(call));
                } else {
                    statements.push(Stmt::VarList(parse_var_list(tokens)?));
                }
            }
        }
    }
    Ok(statements)
}

fn parse_for_loop(tokens: &mut VecDeque<Token>) -> Result<ForLoop, BclError> {
    let keyword = expect(tokens, TokenLabel::For)?;
    expect(tokens, TokenLabel::LParen)?;

    let init = if front(tokens)?.label == TokenLabel::Semicolon {
        tokens.pop_front();
        None
    } else {
        let second = tokens.get(1).ok_or_else(unexpected_end)?.label;
        if second == TokenLabel::Assign || second == TokenLabel::Dot {
            Some(ForInit::Assignment(parse_assignment(tokens, TokenLabel::Semicolon)?))
        } else {
            Some(ForInit::VarList(parse_var_list(tokens)?))
        }
    };

    let condition = if front(tokens)?.label == TokenLabel::Semicolon {
        tokens.pop_front();
        None
    } else {
        let cond = parse_comp_expression(tokens, true, false)?;
        expect(tokens, TokenLabel::Semicolon)?;
        Some(cond)
    };

    let increment = if front(tokens)?.label == TokenLabel::RParen {
        tokens.pop_front();
        None
    } else {
        // The increment assignment consumes the closing `)` as its terminator.
        Some(parse_assignment(tokens, TokenLabel::RParen)?)
    };

    expect(tokens, TokenLabel::LBrace)?;
    let body = parse_statements(tokens)?;
    expect(tokens, TokenLabel::RBrace)?;

    Ok(ForLoop { init, condition, increment, body, loc: keyword.location() })
}

fn parse_if_statement(tokens: &mut VecDeque<Token>) -> Result<IfStmt, BclError> {
    let keyword = tokens.pop_front().ok_or_else(unexpected_end)?;
    let kind = match keyword.label {
        TokenLabel::If => IfKind::If,
        TokenLabel::Elseif => IfKind::Elseif,
        _ => IfKind::Else,
    };

    let mut condition = None;
    if kind != IfKind::Else {
        expect(tokens, TokenLabel::LParen)?;
        condition = Some(parse_comp_expression(tokens, false, true)?);
        expect(tokens, TokenLabel::RParen)?;
    }

    expect(tokens, TokenLabel::LBrace)?;
    let body = parse_statements(tokens)?;
    expect(tokens, TokenLabel::RBrace)?;

    Ok(IfStmt { kind, condition, body, loc: keyword.location() })
}

fn parse_printf(tokens: &mut VecDeque<Token>) -> Result<Printf, BclError> {
    let keyword = expect(tokens, TokenLabel::Printf)?;
    expect(tokens, TokenLabel::LParen)?;

    let expr = if front(tokens)?.label != TokenLabel::RParen {
        Some(parse_expression(tokens, false, false, true)?)
    } else {
        None
    };
    expect(tokens, TokenLabel::RParen)?;
    expect(tokens, TokenLabel::Semicolon)?;

    Ok(Printf { expr, loc: keyword.location() })
}

fn parse_return(tokens: &mut VecDeque<Token>) -> Result<Return, BclError> {
    let keyword = expect(tokens, TokenLabel::Return)?;

    let expr = if front(tokens)?.label != TokenLabel::Semicolon {
        Some(parse_expression(tokens, true, false, false)?)
    } else {
        None
    };
    expect(tokens, TokenLabel::Semicolon)?;

    Ok(Return { expr, loc: keyword.location() })
}

/// `name = expr` or `name.field = expr`, ending at (and consuming) the given
/// terminator.
fn parse_assignment(
    tokens: &mut VecDeque<Token>,
    terminator: TokenLabel,
) -> Result<Assignment, BclError> {
    let name = tokens.pop_front().ok_or_else(unexpected_end)?;
    if !name.is_identifier() {
        return Err(unexpected(&name));
    }

    let field = if front(tokens)?.label == TokenLabel::Dot {
        tokens.pop_front();
        let field = tokens.pop_front().ok_or_else(unexpected_end)?;
        if !field.is_identifier() {
            return Err(unexpected(&field));
        }
        Some(field.text)
    } else {
        None
    };

    expect(tokens, TokenLabel::Assign)?;
    let value = parse_expression(
        tokens,
        terminator == TokenLabel::Semicolon,
        false,
        terminator == TokenLabel::RParen,
    )?;
    expect(tokens, terminator)?;

    Ok(Assignment { target: name.text.clone(), field, value, loc: name.location() })
}

fn parse_call_func(tokens: &mut VecDeque<Token>) -> Result<CallFunc, BclError> {
    let name = tokens.pop_front().ok_or_else(unexpected_end)?;
    if !name.is_identifier() {
        return Err(unexpected(&name));
    }
    expect(tokens, TokenLabel::LParen)?;

    let mut args = Vec::new();
    loop {
        let label = front(tokens)?.label;
        if label == TokenLabel::RParen {
            break;
        }
        if label == TokenLabel::Comma {
            tokens.pop_front();
        }
        args.push(parse_expression(tokens, false, true, true)?);
    }
    expect(tokens, TokenLabel::RParen)?;

    Ok(CallFunc { name: name.text.clone(), args, loc: name.location() })
}

/// Collect an arithmetic expression window up to the requested terminator at
/// parenthesis depth zero, validating every token, then parse the window.
/// The terminator is pushed back for the caller.
fn parse_expression(
    tokens: &mut VecDeque<Token>,
    semicolon: bool,
    comma: bool,
    right_paren: bool,
) -> Result<Expr, BclError> {
    let mut window = Vec::new();
    let mut terminator = None;
    let mut depth = 0i32;

    while let Some(tok) = tokens.pop_front() {
        if depth == 0
            && ((semicolon && tok.label == TokenLabel::Semicolon)
                || (comma && tok.label == TokenLabel::Comma)
                || (right_paren && tok.label == TokenLabel::RParen))
        {
            terminator = Some(tok);
            break;
        }
        match tok.label {
            TokenLabel::LParen => depth += 1,
            TokenLabel::RParen => depth -= 1,
            _ => {}
        }
        if !tok.label.is_expression_token() {
            return Err(unexpected(&tok));
        }
        window.push(tok);
    }

    if window.is_empty() {
        return Err(match &terminator {
            Some(tok) => unexpected(tok),
            None => unexpected_end(),
        });
    }

    let result = parse_full_expression(&window)?;
    if let Some(tok) = terminator {
        tokens.push_front(tok);
    }
    Ok(result)
}

/// Additive tier: rightmost `+`/`-`/`%` at depth zero splits the window.
fn parse_full_expression(window: &[Token]) -> Result<Expr, BclError> {
    let mut depth = 0i32;
    for i in (0..window.len()).rev() {
        let tok = &window[i];
        match tok.label {
            TokenLabel::RParen => depth += 1,
            TokenLabel::LParen => depth -= 1,
            _ => {
                if depth == 0 {
                    if let Some(op) = additive_op(tok.label) {
                        let left = &window[..i];
                        let right = &window[i + 1..];
                        if left.is_empty() || right.is_empty() {
                            return Err(unexpected(tok));
                        }
                        return Ok(Expr::Binary {
                            op,
                            left: Box::new(parse_full_expression(left)?),
                            right: Box::new(parse_production(right)?),
                            loc: tok.location(),
                        });
                    }
                }
            }
        }
    }
    parse_production(window)
}

/// Multiplicative tier: rightmost `*`/`/` at depth zero splits the window.
fn parse_production(window: &[Token]) -> Result<Expr, BclError> {
    let mut depth = 0i32;
    for i in (0..window.len()).rev() {
        let tok = &window[i];
        match tok.label {
            TokenLabel::RParen => depth += 1,
            TokenLabel::LParen => depth -= 1,
            _ => {
                if depth == 0 {
                    if let Some(op) = multiplicative_op(tok.label) {
                        let left = &window[..i];
                        let right = &window[i + 1..];
                        if left.is_empty() || right.is_empty() {
                            return Err(unexpected(tok));
                        }
                        return Ok(Expr::Binary {
                            op,
                            left: Box::new(parse_production(left)?),
                            right: Box::new(parse_primary(right)?),
                            loc: tok.location(),
                        });
                    }
                }
            }
        }
    }
    parse_primary(window)
}

fn parse_primary(window: &[Token]) -> Result<Expr, BclError> {
    let first = match window.first() {
        Some(tok) => tok,
        None => {
            return Err(BclError::syntax_error(
                "Unexpected end of expression".to_string(),
                SourceLocation::unknown(),
            ))
        }
    };

    match first.label {
        TokenLabel::LParen => {
            let last = &window[window.len() - 1];
            if window.len() < 3 || last.label != TokenLabel::RParen {
                return Err(unexpected(last));
            }
            parse_full_expression(&window[1..window.len() - 1])
        }
        TokenLabel::New => {
            let name = window.get(1).ok_or_else(|| unexpected(first))?;
            if !name.is_identifier() {
                return Err(unexpected(name));
            }
            let open = window.get(2).ok_or_else(|| unexpected(name))?;
            if open.label != TokenLabel::LParen {
                return Err(unexpected(open));
            }
            let close = window.get(3).ok_or_else(|| unexpected(open))?;
            if close.label != TokenLabel::RParen {
                return Err(unexpected(close));
            }
            Ok(Expr::New { ty: name.text.clone(), loc: first.location() })
        }
        TokenLabel::Null => Ok(Expr::Null { loc: first.location() }),
        _ => {
            if window.len() > 1 && window[1].label == TokenLabel::LParen {
                let mut call_tokens: VecDeque<Token> = window.iter().cloned().collect();
                return Ok(Expr::Call(parse_call_func(&mut call_tokens)?));
            }
            if window.len() == 3 && window[1].label == TokenLabel::Dot {
                let field = &window[2];
                if !first.is_identifier() {
                    return Err(unexpected(first));
                }
                if !field.is_identifier() {
                    return Err(unexpected(field));
                }
                return Ok(Expr::Variable {
                    name: first.text.clone(),
                    field: Some(field.text.clone()),
                    loc: first.location(),
                });
            }
            parse_value(first)
        }
    }
}

/// A single value token: quoted string, boolean, number, or identifier.
fn parse_value(token: &Token) -> Result<Expr, BclError> {
    let text = &token.text;
    let loc = token.location();

    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        return Ok(Expr::Literal {
            value: Literal::Str(text[1..text.len() - 1].to_string()),
            loc,
        });
    }
    if text == "true" {
        return Ok(Expr::Literal { value: Literal::Bool(true), loc });
    }
    if text == "false" {
        return Ok(Expr::Literal { value: Literal::Bool(false), loc });
    }
    if text.starts_with(|c: char| c.is_ascii_digit()) {
        if let Ok(n) = text.parse::<i64>() {
            return Ok(Expr::Literal { value: Literal::Int(n), loc });
        }
        if let Ok(d) = text.parse::<f64>() {
            return Ok(Expr::Literal { value: Literal::Double(d), loc });
        }
        return Err(unexpected(token));
    }
    if token.is_identifier() {
        return Ok(Expr::Variable { name: text.clone(), field: None, loc });
    }
    Err(unexpected(token))
}

/// Collect a boolean expression window up to the requested terminator,
/// validating every token, then parse the window. The terminator is pushed
/// back for the caller.
fn parse_comp_expression(
    tokens: &mut VecDeque<Token>,
    semicolon: bool,
    right_paren: bool,
) -> Result<Comparison, BclError> {
    let mut window = Vec::new();
    let mut terminator = None;
    let mut depth = 0i32;

    while let Some(tok) = tokens.pop_front() {
        if semicolon && tok.label == TokenLabel::Semicolon {
            terminator = Some(tok);
            break;
        }
        if right_paren {
            match tok.label {
                TokenLabel::LParen => depth += 1,
                TokenLabel::RParen => {
                    if depth == 0 {
                        terminator = Some(tok);
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
        if !tok.label.is_comp_expression_token() {
            return Err(unexpected(&tok));
        }
        window.push(tok);
    }

    if window.is_empty() {
        return Err(match &terminator {
            Some(tok) => unexpected(tok),
            None => unexpected_end(),
        });
    }

    let result = parse_full_comp_expression(&window)?;
    if let Some(tok) = terminator {
        tokens.push_front(tok);
    }
    Ok(result)
}

/// Logical tier: rightmost `&&`/`||` at depth zero splits the window.
fn parse_full_comp_expression(window: &[Token]) -> Result<Comparison, BclError> {
    let mut depth = 0i32;
    for i in (0..window.len()).rev() {
        let tok = &window[i];
        match tok.label {
            TokenLabel::RParen => depth += 1,
            TokenLabel::LParen => depth -= 1,
            _ => {
                if depth == 0 {
                    if let Some(op) = logical_op(tok.label) {
                        let left = &window[..i];
                        let right = &window[i + 1..];
                        if left.is_empty() || right.is_empty() {
                            return Err(unexpected(tok));
                        }
                        return Ok(Comparison::Logical {
                            op,
                            left: Box::new(parse_full_comp_expression(left)?),
                            right: Box::new(parse_comp_term(right)?),
                            loc: tok.location(),
                        });
                    }
                }
            }
        }
    }
    parse_comp_term(window)
}

/// A single boolean term: parenthesized boolean expression, negation,
/// relational comparison, or a bare arithmetic expression.
fn parse_comp_term(window: &[Token]) -> Result<Comparison, BclError> {
    let first = match window.first() {
        Some(tok) => tok,
        None => {
            return Err(BclError::syntax_error(
                "Unexpected end of expression".to_string(),
                SourceLocation::unknown(),
            ))
        }
    };

    match first.label {
        TokenLabel::LParen => {
            let last = &window[window.len() - 1];
            if window.len() < 3 || last.label != TokenLabel::RParen {
                return Err(unexpected(last));
            }
            parse_full_comp_expression(&window[1..window.len() - 1])
        }
        TokenLabel::Not => {
            let rest = &window[1..];
            if rest.is_empty() {
                return Err(unexpected(first));
            }
            Ok(Comparison::Not {
                operand: Box::new(parse_full_comp_expression(rest)?),
                loc: first.location(),
            })
        }
        _ => {
            for (i, tok) in window.iter().enumerate() {
                if let Some(op) = rel_op(tok.label) {
                    let left = &window[..i];
                    let right = &window[i + 1..];
                    if left.is_empty() || right.is_empty() {
                        return Err(unexpected(tok));
                    }
                    return Ok(Comparison::Relation {
                        op,
                        left: parse_full_expression(left)?,
                        right: parse_full_expression(right)?,
                        loc: tok.location(),
                    });
                }
            }
            Ok(Comparison::Bare(parse_full_expression(window)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_source(src: &str) -> Result<Program, BclError> {
        Parser::new(tokenize(src)).parse()
    }

    /// Pull the printf argument out of `void main() { printf(<expr>); }`.
    fn printf_expr(src: &str) -> Expr {
        let program = parse_source(src).expect("parse failed");
        match &program.declarations[0] {
            Declaration::Function(f) => match &f.body[0] {
                Stmt::Printf(p) => p.expr.clone().expect("missing expression"),
                other => panic!("expected printf, got {:?}", other),
            },
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let expr = printf_expr("void main() { printf(2 + 3 * 4); }");
        match expr {
            Expr::Binary { op: BinOp::Add, right, .. } => match *right {
                Expr::Binary { op: BinOp::Mul, .. } => {}
                other => panic!("expected multiplication on the right, got {:?}", other),
            },
            other => panic!("expected addition at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        let expr = printf_expr("void main() { printf(10 - 3 - 2); }");
        match expr {
            Expr::Binary { op: BinOp::Sub, left, right, .. } => {
                assert!(matches!(*left, Expr::Binary { op: BinOp::Sub, .. }));
                assert!(matches!(
                    *right,
                    Expr::Literal { value: Literal::Int(2), .. }
                ));
            }
            other => panic!("expected subtraction at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_modulo_shares_the_additive_tier() {
        let expr = printf_expr("void main() { printf(2 + 3 % 4); }");
        match expr {
            Expr::Binary { op: BinOp::Mod, left, .. } => {
                assert!(matches!(*left, Expr::Binary { op: BinOp::Add, .. }));
            }
            other => panic!("expected modulo at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let expr = printf_expr("void main() { printf((2 + 3) * 4); }");
        match expr {
            Expr::Binary { op: BinOp::Mul, left, .. } => {
                assert!(matches!(*left, Expr::Binary { op: BinOp::Add, .. }));
            }
            other => panic!("expected multiplication at the root, got {:?}", other),
        }
    }

    #[test]
    fn test_field_access_expression() {
        let expr = printf_expr("void main() { printf(p.x); }");
        match expr {
            Expr::Variable { name, field, .. } => {
                assert_eq!(name, "p");
                assert_eq!(field.as_deref(), Some("x"));
            }
            other => panic!("expected field access, got {:?}", other),
        }
    }

    #[test]
    fn test_call_with_expression_arguments() {
        let expr = printf_expr("void main() { printf(f(1 + 2, g(3))); }");
        match expr {
            Expr::Call(call) => {
                assert_eq!(call.name, "f");
                assert_eq!(call.args.len(), 2);
                assert!(matches!(call.args[0], Expr::Binary { op: BinOp::Add, .. }));
                assert!(matches!(&call.args[1], Expr::Call(inner) if inner.name == "g"));
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn test_for_loop_header_slots_are_optional() {
        let program = parse_source("void main() { for (;;) { break; } }").expect("parse failed");
        match &program.declarations[0] {
            Declaration::Function(f) => match &f.body[0] {
                Stmt::For(loop_stmt) => {
                    assert!(loop_stmt.init.is_none());
                    assert!(loop_stmt.condition.is_none());
                    assert!(loop_stmt.increment.is_none());
                }
                other => panic!("expected for loop, got {:?}", other),
            },
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_negation_in_condition() {
        let program =
            parse_source("void main() { if (!(1 == 2)) { printf(1); } }").expect("parse failed");
        match &program.declarations[0] {
            Declaration::Function(f) => match &f.body[0] {
                Stmt::If(if_stmt) => {
                    assert!(matches!(if_stmt.condition, Some(Comparison::Not { .. })));
                }
                other => panic!("expected if, got {:?}", other),
            },
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_logical_operators_bind_looser_than_relational() {
        let program = parse_source("void main() { if (1 < 2 && 3 == 3) { printf(1); } }")
            .expect("parse failed");
        match &program.declarations[0] {
            Declaration::Function(f) => match &f.body[0] {
                Stmt::If(if_stmt) => match if_stmt.condition.as_ref().expect("missing condition") {
                    Comparison::Logical { op: LogicalOp::And, left, right, .. } => {
                        assert!(matches!(**left, Comparison::Relation { op: RelOp::Lt, .. }));
                        assert!(matches!(**right, Comparison::Relation { op: RelOp::Eq, .. }));
                    }
                    other => panic!("expected logical and, got {:?}", other),
                },
                other => panic!("expected if, got {:?}", other),
            },
            other => panic!("expected function, got {:?}", other),
        }
    }

    #[test]
    fn test_struct_declaration() {
        let program =
            parse_source("struct Point { int x, y; double weight = 1.5; }").expect("parse failed");
        match &program.declarations[0] {
            Declaration::Struct(s) => {
                assert_eq!(s.name, "Point");
                assert_eq!(s.fields.len(), 2);
                assert_eq!(s.fields[0].variables.len(), 2);
                assert_eq!(s.field_type("weight"), Some("double"));
            }
            other => panic!("expected struct, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_semicolon_is_rejected() {
        assert!(parse_source("void main() { int a = 1 }").is_err());
    }

    #[test]
    fn test_empty_if_condition_is_rejected() {
        assert!(parse_source("void main() { if () { printf(1); } }").is_err());
    }

    #[test]
    fn test_relational_operator_outside_condition_is_rejected() {
        assert!(parse_source("void main() { int a = 1 < 2; }").is_err());
    }

    #[test]
    fn test_break_requires_semicolon() {
        assert!(parse_source("void main() { for (;;) { break } }").is_err());
    }

    #[test]
    fn test_error_carries_offending_location() {
        let err = parse_source("void main() {\n  int a = ;\n}").unwrap_err();
        assert_eq!(err.location.line, 2);
    }
}
