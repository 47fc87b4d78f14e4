//! Expression parsing for Pkl
//!
//! A Pratt parser over the precedence chain, loosest first:
//!
//! ```text
//! ??  (right)  →  |>  →  ||  →  &&  →  == !=  →  is as  →  < > <= >=
//!     →  + -  →  * / ~/ %  →  ** (right)  →  unary - !  →  postfix . ?. [] !! {}
//! ```
//!
//! `if`, `let` and function literals extend as far to the right as possible.

use super::PklParser;
use super::module::{parse_object_body, parse_parameter, parse_parameter_list};
use super::types::parse_type;
use crate::parser::syntax_kind::SyntaxKind;

/// Binding power of the operand of a prefix operator
const PREFIX_BP: u8 = 22;

/// Upper bound on tokens scanned when looking for the `->` of a function literal
const LOOKAHEAD_LIMIT: usize = 512;

/// Parse an expression
pub fn parse_expression<P: PklParser>(p: &mut P) {
    parse_expression_bp(p, 0);
}

/// Whether the current token can begin an expression
pub fn at_expression_start<P: PklParser>(p: &P) -> bool {
    p.at_any(&[
        SyntaxKind::THIS_KW,
        SyntaxKind::OUTER_KW,
        SyntaxKind::MODULE_KW,
        SyntaxKind::NULL_KW,
        SyntaxKind::TRUE_KW,
        SyntaxKind::FALSE_KW,
        SyntaxKind::INT_NUMBER,
        SyntaxKind::FLOAT_NUMBER,
        SyntaxKind::STRING_START,
        SyntaxKind::THROW_KW,
        SyntaxKind::TRACE_KW,
        SyntaxKind::IMPORT_KW,
        SyntaxKind::IMPORT_STAR_KW,
        SyntaxKind::READ_KW,
        SyntaxKind::READ_OR_NULL_KW,
        SyntaxKind::READ_STAR_KW,
        SyntaxKind::IDENT,
        SyntaxKind::NEW_KW,
        SyntaxKind::SUPER_KW,
        SyntaxKind::MINUS,
        SyntaxKind::BANG,
        SyntaxKind::IF_KW,
        SyntaxKind::LET_KW,
        SyntaxKind::L_PAREN,
    ])
}

/// Parse an expression whose operators bind at least as tightly as `min_bp`.
/// Returns the kind of the outermost node built.
fn parse_expression_bp<P: PklParser>(p: &mut P, min_bp: u8) -> Option<SyntaxKind> {
    let checkpoint = p.checkpoint();
    let mut lhs = parse_prefix(p)?;

    loop {
        if let Some(kind) = parse_postfix(p, checkpoint, lhs) {
            lhs = kind;
            continue;
        }

        let Some((kind, l_bp, r_bp)) = infix_binding_power(p) else {
            break;
        };
        if l_bp < min_bp {
            break;
        }

        p.start_node_at(checkpoint, kind);
        p.bump();
        if kind == SyntaxKind::TYPE_TEST_EXPR {
            parse_type(p);
        } else if parse_expression_bp(p, r_bp).is_none() {
            p.error("expected expression");
        }
        p.finish_node();
        lhs = kind;
    }

    Some(lhs)
}

/// Binary operators: (node kind, left binding power, right binding power)
fn infix_binding_power<P: PklParser>(p: &P) -> Option<(SyntaxKind, u8, u8)> {
    if p.at_eof() {
        return None;
    }
    let entry = match p.current_kind() {
        SyntaxKind::QUESTION_QUESTION => (SyntaxKind::NULL_COALESCE_EXPR, 3, 2),
        SyntaxKind::PIPE_GT => (SyntaxKind::PIPE_EXPR, 4, 5),
        SyntaxKind::PIPE_PIPE => (SyntaxKind::LOGICAL_OR_EXPR, 6, 7),
        SyntaxKind::AMP_AMP => (SyntaxKind::LOGICAL_AND_EXPR, 8, 9),
        SyntaxKind::EQ_EQ | SyntaxKind::BANG_EQ => (SyntaxKind::EQUALITY_EXPR, 10, 11),
        SyntaxKind::IS_KW | SyntaxKind::AS_KW => (SyntaxKind::TYPE_TEST_EXPR, 12, 13),
        SyntaxKind::LT | SyntaxKind::GT | SyntaxKind::LT_EQ | SyntaxKind::GT_EQ => {
            (SyntaxKind::COMPARISON_EXPR, 14, 15)
        }
        SyntaxKind::PLUS => (SyntaxKind::ADDITIVE_EXPR, 16, 17),
        // A leading minus on a new line starts a new element
        SyntaxKind::MINUS if !p.newline_before_current() => (SyntaxKind::ADDITIVE_EXPR, 16, 17),
        SyntaxKind::STAR | SyntaxKind::SLASH | SyntaxKind::TILDE_SLASH | SyntaxKind::PERCENT => {
            (SyntaxKind::MULTIPLICATIVE_EXPR, 18, 19)
        }
        SyntaxKind::STAR_STAR => (SyntaxKind::EXPONENTIATION_EXPR, 21, 20),
        _ => return None,
    };
    Some(entry)
}

/// Postfix operators bind tighter than everything else.
fn parse_postfix<P: PklParser>(
    p: &mut P,
    checkpoint: rowan::Checkpoint,
    lhs: SyntaxKind,
) -> Option<SyntaxKind> {
    if p.at_eof() {
        return None;
    }
    match p.current_kind() {
        SyntaxKind::DOT | SyntaxKind::QUESTION_DOT => {
            p.start_node_at(checkpoint, SyntaxKind::QUALIFIED_ACCESS_EXPR);
            p.bump();
            p.expect(SyntaxKind::IDENT);
            parse_call_arguments(p);
            p.finish_node();
            Some(SyntaxKind::QUALIFIED_ACCESS_EXPR)
        }
        SyntaxKind::L_BRACKET if !p.newline_before_current() => {
            p.start_node_at(checkpoint, SyntaxKind::SUBSCRIPT_EXPR);
            p.bump();
            parse_expression(p);
            p.close_delimited(SyntaxKind::R_BRACKET);
            p.finish_node();
            Some(SyntaxKind::SUBSCRIPT_EXPR)
        }
        SyntaxKind::BANG_BANG => {
            p.start_node_at(checkpoint, SyntaxKind::NON_NULL_EXPR);
            p.bump();
            p.finish_node();
            Some(SyntaxKind::NON_NULL_EXPR)
        }
        SyntaxKind::L_BRACE
            if matches!(
                lhs,
                SyntaxKind::PARENTHESIZED_EXPR | SyntaxKind::NEW_EXPR | SyntaxKind::AMEND_EXPR
            ) =>
        {
            p.start_node_at(checkpoint, SyntaxKind::AMEND_EXPR);
            parse_object_body(p);
            p.finish_node();
            Some(SyntaxKind::AMEND_EXPR)
        }
        _ => None,
    }
}

fn parse_prefix<P: PklParser>(p: &mut P) -> Option<SyntaxKind> {
    if p.at_eof() {
        p.error("expected expression");
        return None;
    }
    let kind = match p.current_kind() {
        SyntaxKind::THIS_KW => single_token_expr(p, SyntaxKind::THIS_EXPR),
        SyntaxKind::OUTER_KW => single_token_expr(p, SyntaxKind::OUTER_EXPR),
        SyntaxKind::MODULE_KW => single_token_expr(p, SyntaxKind::MODULE_EXPR),
        SyntaxKind::NULL_KW => single_token_expr(p, SyntaxKind::NULL_LITERAL),
        SyntaxKind::TRUE_KW => single_token_expr(p, SyntaxKind::TRUE_LITERAL),
        SyntaxKind::FALSE_KW => single_token_expr(p, SyntaxKind::FALSE_LITERAL),
        SyntaxKind::INT_NUMBER => single_token_expr(p, SyntaxKind::INT_LITERAL),
        SyntaxKind::FLOAT_NUMBER => single_token_expr(p, SyntaxKind::FLOAT_LITERAL),
        SyntaxKind::STRING_START => parse_string_literal(p),
        SyntaxKind::THROW_KW => parse_keyword_call(p, SyntaxKind::THROW_EXPR),
        SyntaxKind::TRACE_KW => parse_keyword_call(p, SyntaxKind::TRACE_EXPR),
        SyntaxKind::READ_KW | SyntaxKind::READ_OR_NULL_KW | SyntaxKind::READ_STAR_KW => {
            parse_keyword_call(p, SyntaxKind::READ_EXPR)
        }
        SyntaxKind::IMPORT_KW | SyntaxKind::IMPORT_STAR_KW => parse_import_expr(p),
        SyntaxKind::IDENT => {
            p.start_node(SyntaxKind::UNQUALIFIED_ACCESS_EXPR);
            p.bump();
            parse_call_arguments(p);
            p.finish_node();
            SyntaxKind::UNQUALIFIED_ACCESS_EXPR
        }
        SyntaxKind::NEW_KW => parse_new_expr(p),
        SyntaxKind::SUPER_KW => parse_super_expr(p),
        SyntaxKind::MINUS => parse_unary(p, SyntaxKind::UNARY_MINUS_EXPR),
        SyntaxKind::BANG => parse_unary(p, SyntaxKind::LOGICAL_NOT_EXPR),
        SyntaxKind::IF_KW => parse_if_expr(p),
        SyntaxKind::LET_KW => parse_let_expr(p),
        SyntaxKind::L_PAREN if at_function_literal(p) => parse_function_literal(p),
        SyntaxKind::L_PAREN => {
            p.start_node(SyntaxKind::PARENTHESIZED_EXPR);
            p.bump();
            parse_expression(p);
            p.close_delimited(SyntaxKind::R_PAREN);
            p.finish_node();
            SyntaxKind::PARENTHESIZED_EXPR
        }
        _ => {
            p.error("expected expression");
            return None;
        }
    };
    Some(kind)
}

fn single_token_expr<P: PklParser>(p: &mut P, kind: SyntaxKind) -> SyntaxKind {
    p.start_node(kind);
    p.bump();
    p.finish_node();
    kind
}

fn parse_unary<P: PklParser>(p: &mut P, kind: SyntaxKind) -> SyntaxKind {
    p.start_node(kind);
    p.bump();
    if parse_expression_bp(p, PREFIX_BP).is_none() {
        p.error("expected expression");
    }
    p.finish_node();
    kind
}

/// `throw(expr)`, `trace(expr)`, `read(expr)` and their variants
fn parse_keyword_call<P: PklParser>(p: &mut P, kind: SyntaxKind) -> SyntaxKind {
    p.start_node(kind);
    p.bump();
    if p.expect(SyntaxKind::L_PAREN) {
        parse_expression(p);
        p.close_delimited(SyntaxKind::R_PAREN);
    }
    p.finish_node();
    kind
}

fn parse_import_expr<P: PklParser>(p: &mut P) -> SyntaxKind {
    p.start_node(SyntaxKind::IMPORT_EXPR);
    p.bump();
    if p.expect(SyntaxKind::L_PAREN) {
        if p.at(SyntaxKind::STRING_START) {
            parse_string_literal(p);
        } else {
            p.error("expected module uri");
        }
        p.close_delimited(SyntaxKind::R_PAREN);
    }
    p.finish_node();
    SyntaxKind::IMPORT_EXPR
}

fn parse_new_expr<P: PklParser>(p: &mut P) -> SyntaxKind {
    p.start_node(SyntaxKind::NEW_EXPR);
    p.bump();
    if !p.at(SyntaxKind::L_BRACE) {
        parse_type(p);
    }
    if p.at(SyntaxKind::L_BRACE) {
        parse_object_body(p);
    } else {
        p.error("expected object body");
    }
    p.finish_node();
    SyntaxKind::NEW_EXPR
}

fn parse_super_expr<P: PklParser>(p: &mut P) -> SyntaxKind {
    if p.peek_kind(1) == SyntaxKind::L_BRACKET {
        p.start_node(SyntaxKind::SUPER_SUBSCRIPT_EXPR);
        p.bump(); // super
        p.bump(); // [
        parse_expression(p);
        p.close_delimited(SyntaxKind::R_BRACKET);
        p.finish_node();
        return SyntaxKind::SUPER_SUBSCRIPT_EXPR;
    }

    p.start_node(SyntaxKind::SUPER_ACCESS_EXPR);
    p.bump(); // super
    if p.expect(SyntaxKind::DOT) {
        p.expect(SyntaxKind::IDENT);
        parse_call_arguments(p);
    }
    p.finish_node();
    SyntaxKind::SUPER_ACCESS_EXPR
}

/// IfExpr = 'if' '(' Expr ')' Expr 'else' Expr
fn parse_if_expr<P: PklParser>(p: &mut P) -> SyntaxKind {
    p.start_node(SyntaxKind::IF_EXPR);
    p.bump();
    if p.expect(SyntaxKind::L_PAREN) {
        parse_expression(p);
        p.close_delimited(SyntaxKind::R_PAREN);
    }
    parse_expression(p);
    if p.expect(SyntaxKind::ELSE_KW) {
        parse_expression(p);
    }
    p.finish_node();
    SyntaxKind::IF_EXPR
}

/// LetExpr = 'let' '(' Parameter '=' Expr ')' Expr
fn parse_let_expr<P: PklParser>(p: &mut P) -> SyntaxKind {
    p.start_node(SyntaxKind::LET_EXPR);
    p.bump();
    if p.expect(SyntaxKind::L_PAREN) {
        parse_parameter(p);
        p.expect(SyntaxKind::EQ);
        parse_expression(p);
        p.close_delimited(SyntaxKind::R_PAREN);
    }
    parse_expression(p);
    p.finish_node();
    SyntaxKind::LET_EXPR
}

/// A parenthesized list directly followed by `->`
fn at_function_literal<P: PklParser>(p: &P) -> bool {
    let mut depth = 0usize;
    for n in 0..LOOKAHEAD_LIMIT {
        match p.peek_kind(n) {
            SyntaxKind::L_PAREN => depth += 1,
            SyntaxKind::R_PAREN => {
                depth -= 1;
                if depth == 0 {
                    return p.peek_kind(n + 1) == SyntaxKind::ARROW;
                }
            }
            SyntaxKind::L_BRACE | SyntaxKind::R_BRACE | SyntaxKind::EQ => return false,
            _ => {}
        }
    }
    false
}

fn parse_function_literal<P: PklParser>(p: &mut P) -> SyntaxKind {
    p.start_node(SyntaxKind::FUNCTION_LITERAL);
    parse_parameter_list(p);
    p.expect(SyntaxKind::ARROW);
    parse_expression(p);
    p.finish_node();
    SyntaxKind::FUNCTION_LITERAL
}

/// Argument list directly following a member name, on the same line
fn parse_call_arguments<P: PklParser>(p: &mut P) {
    if p.at(SyntaxKind::L_PAREN) && !p.newline_before_current() {
        parse_argument_list(p);
    }
}

/// ArgumentList = '(' (Expr (',' Expr)*)? ')'
///
/// A missing comma between two arguments is tolerated so the semantic layer
/// can report it against the argument list.
fn parse_argument_list<P: PklParser>(p: &mut P) {
    p.start_node(SyntaxKind::ARGUMENT_LIST);
    p.bump(); // (
    while !p.at(SyntaxKind::R_PAREN) && at_expression_start(p) {
        parse_expression(p);
        if !p.eat(SyntaxKind::COMMA) && p.newline_before_current() {
            break;
        }
    }
    p.close_delimited(SyntaxKind::R_PAREN);
    p.finish_node();
}

/// StringLiteral = '"' (Chars | '\(' Expr ')')* '"'
pub fn parse_string_literal<P: PklParser>(p: &mut P) -> SyntaxKind {
    let kind = if p.current_text().starts_with("\"\"\"") {
        SyntaxKind::ML_STRING_LITERAL
    } else {
        SyntaxKind::STRING_LITERAL
    };
    p.start_node(kind);
    p.bump(); // opening delimiter

    loop {
        if p.at(SyntaxKind::STRING_CHARS) {
            p.bump();
        } else if p.at(SyntaxKind::INTERPOLATION_START) {
            p.start_node(SyntaxKind::STRING_PART);
            p.bump();
            parse_expression(p);
            p.close_delimited(SyntaxKind::R_PAREN);
            p.finish_node();
        } else {
            if !p.eat(SyntaxKind::STRING_END) {
                p.error("unterminated string literal");
            }
            break;
        }
    }

    p.finish_node();
    kind
}
