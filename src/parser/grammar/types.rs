//! Type parsing
//!
//! ```text
//! Type          = NullableType ('|' NullableType)*
//! NullableType  = PrimaryType '?'*
//! PrimaryType   = 'unknown' | 'nothing' | 'module' | StringLiteral
//!               | QualifiedIdent TypeArguments?
//!               | '(' Type ')'
//!               | '(' (Type (',' Type)*)? ')' '->' Type
//! ```

use super::PklParser;
use super::expressions::parse_string_literal;
use crate::parser::syntax_kind::SyntaxKind;

/// Whether the current token can begin a type
pub fn at_type_start<P: PklParser>(p: &P) -> bool {
    p.at_any(&[
        SyntaxKind::UNKNOWN_KW,
        SyntaxKind::NOTHING_KW,
        SyntaxKind::MODULE_KW,
        SyntaxKind::STRING_START,
        SyntaxKind::IDENT,
        SyntaxKind::L_PAREN,
    ])
}

/// Parse a type, including unions
pub fn parse_type<P: PklParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    parse_nullable_type(p);
    while p.at(SyntaxKind::PIPE) {
        p.start_node_at(checkpoint, SyntaxKind::UNION_TYPE);
        p.bump();
        parse_nullable_type(p);
        p.finish_node();
    }
}

fn parse_nullable_type<P: PklParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    parse_primary_type(p);
    while p.at(SyntaxKind::QUESTION) {
        p.start_node_at(checkpoint, SyntaxKind::NULLABLE_TYPE);
        p.bump();
        p.finish_node();
    }
}

fn parse_primary_type<P: PklParser>(p: &mut P) {
    match p.current_kind() {
        _ if p.at_eof() => p.error("expected type"),
        SyntaxKind::UNKNOWN_KW => single_token_type(p, SyntaxKind::UNKNOWN_TYPE),
        SyntaxKind::NOTHING_KW => single_token_type(p, SyntaxKind::NOTHING_TYPE),
        SyntaxKind::MODULE_KW => single_token_type(p, SyntaxKind::MODULE_TYPE),
        SyntaxKind::STRING_START => {
            p.start_node(SyntaxKind::STRING_LITERAL_TYPE);
            parse_string_literal(p);
            p.finish_node();
        }
        SyntaxKind::IDENT => parse_declared_type(p),
        SyntaxKind::L_PAREN => parse_parenthesized_or_function_type(p),
        _ => p.error("expected type"),
    }
}

fn single_token_type<P: PklParser>(p: &mut P, kind: SyntaxKind) {
    p.start_node(kind);
    p.bump();
    p.finish_node();
}

/// DeclaredType = QualifiedIdent ('<' Type (',' Type)* '>')?
fn parse_declared_type<P: PklParser>(p: &mut P) {
    p.start_node(SyntaxKind::DECLARED_TYPE);
    parse_qualified_ident(p);
    if p.at(SyntaxKind::LT) {
        parse_type_argument_list(p);
    }
    p.finish_node();
}

pub(crate) fn parse_qualified_ident<P: PklParser>(p: &mut P) {
    p.start_node(SyntaxKind::QUALIFIED_IDENT);
    p.expect(SyntaxKind::IDENT);
    while p.at(SyntaxKind::DOT) && p.peek_kind(1) == SyntaxKind::IDENT {
        p.bump();
        p.bump();
    }
    p.finish_node();
}

fn parse_type_argument_list<P: PklParser>(p: &mut P) {
    p.start_node(SyntaxKind::TYPE_ARGUMENT_LIST);
    p.bump(); // <
    parse_type(p);
    while p.eat(SyntaxKind::COMMA) {
        parse_type(p);
    }
    p.expect(SyntaxKind::GT);
    p.finish_node();
}

fn parse_parenthesized_or_function_type<P: PklParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    p.bump(); // (
    if !p.at(SyntaxKind::R_PAREN) {
        parse_type(p);
        while p.eat(SyntaxKind::COMMA) {
            parse_type(p);
        }
    }
    p.close_delimited(SyntaxKind::R_PAREN);

    if p.at(SyntaxKind::ARROW) {
        p.start_node_at(checkpoint, SyntaxKind::FUNCTION_TYPE);
        p.bump();
        parse_type(p);
    } else {
        p.start_node_at(checkpoint, SyntaxKind::PARENTHESIZED_TYPE);
    }
    p.finish_node();
}
