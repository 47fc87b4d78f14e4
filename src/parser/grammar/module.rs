//! Module-level grammar: header, imports, classes, members and object bodies
//!
//! ```text
//! Module        = ModuleHeader? ImportClause* Member*
//! ModuleHeader  = (Annotation* Modifier* 'module' QualifiedIdent)? ExtendsAmends?
//! ImportClause  = ('import' | 'import*') StringLiteral ('as' Ident)?
//! Member        = Annotation* Modifier* (Class | TypeAlias | Method | Property)
//! ObjectBody    = '{' (Parameter (',' Parameter)* '->')? ObjectMember* '}'
//! ```

use super::PklParser;
use super::expressions::{at_expression_start, parse_expression, parse_string_literal};
use super::types::{at_type_start, parse_qualified_ident, parse_type};
use crate::parser::syntax_kind::SyntaxKind;
use rowan::Checkpoint;

/// Upper bound on tokens scanned when looking for object body parameters
const PARAMS_LOOKAHEAD_LIMIT: usize = 64;

/// Parse the contents of a module. The caller owns the MODULE node.
pub fn parse_module<P: PklParser>(p: &mut P) {
    // The checkpoint skips leading trivia; `start` must come after it
    let checkpoint = p.checkpoint();
    let start = p.get_pos();
    parse_annotations(p);
    parse_modifiers(p);

    let has_decl = p.at(SyntaxKind::MODULE_KW);
    if has_decl {
        p.start_node_at(checkpoint, SyntaxKind::MODULE_DECL);
        p.bump();
        parse_qualified_ident(p);
        p.finish_node();
    }
    let has_clause = p.at_any(&[SyntaxKind::AMENDS_KW, SyntaxKind::EXTENDS_KW]);
    if has_clause {
        parse_extends_amends_clause(p);
    }

    if has_decl || has_clause {
        p.start_node_at(checkpoint, SyntaxKind::MODULE_HEADER);
        p.finish_node();
    } else if p.get_pos() != start {
        // Annotations without a `module` keyword belong to the first member
        parse_member_rest(p, checkpoint);
    }

    while p.at_any(&[SyntaxKind::IMPORT_KW, SyntaxKind::IMPORT_STAR_KW])
        && p.peek_kind(1) != SyntaxKind::L_PAREN
    {
        parse_import_clause(p);
    }

    while !p.at_eof() {
        let before = p.get_pos();
        parse_member(p);
        if p.get_pos() == before {
            p.error_recover("expected member", &[]);
        }
    }
}

fn parse_extends_amends_clause<P: PklParser>(p: &mut P) {
    p.start_node(SyntaxKind::EXTENDS_AMENDS_CLAUSE);
    p.bump(); // amends | extends
    parse_module_uri(p);
    p.finish_node();
}

fn parse_import_clause<P: PklParser>(p: &mut P) {
    p.start_node(SyntaxKind::IMPORT_CLAUSE);
    p.bump(); // import | import*
    parse_module_uri(p);
    if p.eat(SyntaxKind::AS_KW) {
        p.expect(SyntaxKind::IDENT);
    }
    p.finish_node();
}

fn parse_module_uri<P: PklParser>(p: &mut P) {
    p.start_node(SyntaxKind::MODULE_URI);
    if p.at(SyntaxKind::STRING_START) {
        parse_string_literal(p);
    } else {
        p.error("expected module uri");
    }
    p.finish_node();
}

fn parse_annotations<P: PklParser>(p: &mut P) {
    while p.at(SyntaxKind::AT) {
        p.start_node(SyntaxKind::ANNOTATION);
        p.bump();
        if at_type_start(p) {
            parse_type(p);
        } else {
            p.error("expected annotation type");
        }
        if p.at(SyntaxKind::L_BRACE) {
            parse_object_body(p);
        }
        p.finish_node();
    }
}

fn parse_modifiers<P: PklParser>(p: &mut P) {
    if !p.at_eof() && p.current_kind().is_modifier() {
        p.start_node(SyntaxKind::MODIFIER_LIST);
        while !p.at_eof() && p.current_kind().is_modifier() {
            p.bump();
        }
        p.finish_node();
    }
}

/// Class or module member
fn parse_member<P: PklParser>(p: &mut P) {
    let checkpoint = p.checkpoint();
    parse_annotations(p);
    parse_modifiers(p);
    parse_member_rest(p, checkpoint);
}

fn parse_member_rest<P: PklParser>(p: &mut P, checkpoint: Checkpoint) {
    match p.current_kind() {
        _ if p.at_eof() => p.error("expected member"),
        SyntaxKind::CLASS_KW => parse_class(p, checkpoint),
        SyntaxKind::TYPEALIAS_KW => parse_type_alias(p, checkpoint),
        SyntaxKind::FUNCTION_KW => parse_method(p, checkpoint, SyntaxKind::CLASS_METHOD),
        SyntaxKind::IDENT => parse_property(p, checkpoint, SyntaxKind::CLASS_PROPERTY),
        _ => p.error_recover("expected member", &[SyntaxKind::R_BRACE]),
    }
}

/// Class = 'class' Ident TypeParameters? ('extends' Type)? ClassBody?
fn parse_class<P: PklParser>(p: &mut P, checkpoint: Checkpoint) {
    p.start_node_at(checkpoint, SyntaxKind::CLASS);
    p.bump(); // class
    p.expect(SyntaxKind::IDENT);
    if p.at(SyntaxKind::LT) {
        parse_type_parameter_list(p);
    }
    if p.at(SyntaxKind::EXTENDS_KW) {
        p.start_node(SyntaxKind::CLASS_HEADER_EXTENDS);
        p.bump();
        parse_type(p);
        p.finish_node();
    }
    if p.at(SyntaxKind::L_BRACE) {
        parse_class_body(p);
    }
    p.finish_node();
}

fn parse_class_body<P: PklParser>(p: &mut P) {
    p.start_node(SyntaxKind::CLASS_BODY);
    p.bump(); // {
    while !p.at_eof() && !p.at(SyntaxKind::R_BRACE) {
        let before = p.get_pos();
        parse_member(p);
        if p.get_pos() == before {
            p.error_recover("expected member", &[SyntaxKind::R_BRACE]);
        }
    }
    p.expect(SyntaxKind::R_BRACE);
    p.finish_node();
}

/// TypeAlias = 'typealias' Ident TypeParameters? '=' Type
fn parse_type_alias<P: PklParser>(p: &mut P, checkpoint: Checkpoint) {
    p.start_node_at(checkpoint, SyntaxKind::TYPE_ALIAS);
    p.bump(); // typealias
    p.expect(SyntaxKind::IDENT);
    if p.at(SyntaxKind::LT) {
        parse_type_parameter_list(p);
    }
    if p.expect(SyntaxKind::EQ) {
        parse_type(p);
    }
    p.finish_node();
}

/// Property = Ident TypeAnnotation? ('=' Expr | ObjectBody+)?
fn parse_property<P: PklParser>(p: &mut P, checkpoint: Checkpoint, kind: SyntaxKind) {
    p.start_node_at(checkpoint, kind);
    p.bump(); // name
    if p.at(SyntaxKind::COLON) {
        parse_type_annotation(p);
    }
    if p.eat(SyntaxKind::EQ) {
        parse_expression(p);
    } else {
        while p.at(SyntaxKind::L_BRACE) {
            parse_object_body(p);
        }
    }
    p.finish_node();
}

/// Method = 'function' Ident TypeParameters? ParameterList TypeAnnotation? ('=' Expr)?
fn parse_method<P: PklParser>(p: &mut P, checkpoint: Checkpoint, kind: SyntaxKind) {
    p.start_node_at(checkpoint, kind);
    p.bump(); // function
    p.expect(SyntaxKind::IDENT);
    if p.at(SyntaxKind::LT) {
        parse_type_parameter_list(p);
    }
    if p.at(SyntaxKind::L_PAREN) {
        parse_parameter_list(p);
    } else {
        p.error("expected parameter list");
    }
    if p.at(SyntaxKind::COLON) {
        parse_type_annotation(p);
    }
    if p.eat(SyntaxKind::EQ) {
        parse_expression(p);
    }
    p.finish_node();
}

fn parse_type_annotation<P: PklParser>(p: &mut P) {
    p.start_node(SyntaxKind::TYPE_ANNOTATION);
    p.bump(); // :
    parse_type(p);
    p.finish_node();
}

fn parse_type_parameter_list<P: PklParser>(p: &mut P) {
    p.start_node(SyntaxKind::TYPE_PARAMETER_LIST);
    p.bump(); // <
    loop {
        p.start_node(SyntaxKind::TYPE_PARAMETER);
        if !p.eat(SyntaxKind::IN_KW) {
            p.eat(SyntaxKind::OUT_KW);
        }
        p.expect(SyntaxKind::IDENT);
        p.finish_node();
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::GT);
    p.finish_node();
}

/// ParameterList = '(' (Parameter (',' Parameter)*)? ')'
pub fn parse_parameter_list<P: PklParser>(p: &mut P) {
    p.start_node(SyntaxKind::PARAMETER_LIST);
    p.bump(); // (
    while p.at_any(&[SyntaxKind::IDENT, SyntaxKind::UNDERSCORE]) {
        parse_parameter(p);
        if !p.eat(SyntaxKind::COMMA) {
            break;
        }
    }
    p.expect(SyntaxKind::R_PAREN);
    p.finish_node();
}

/// Parameter = '_' | Ident TypeAnnotation?
pub fn parse_parameter<P: PklParser>(p: &mut P) {
    p.start_node(SyntaxKind::PARAMETER);
    if !p.eat(SyntaxKind::UNDERSCORE) {
        p.start_node(SyntaxKind::TYPED_IDENTIFIER);
        p.expect(SyntaxKind::IDENT);
        if p.at(SyntaxKind::COLON) {
            parse_type_annotation(p);
        }
        p.finish_node();
    }
    p.finish_node();
}

// ============================================================================
// Object bodies
// ============================================================================

/// ObjectBody = '{' (Parameter (',' Parameter)* '->')? ObjectMember* '}'
pub fn parse_object_body<P: PklParser>(p: &mut P) {
    p.start_node(SyntaxKind::OBJECT_BODY);
    p.bump(); // {

    if at_object_body_parameters(p) {
        loop {
            parse_parameter(p);
            if !p.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        p.expect(SyntaxKind::ARROW);
    }

    while !p.at_eof() && !p.at(SyntaxKind::R_BRACE) {
        let before = p.get_pos();
        parse_object_member(p);
        if p.get_pos() == before {
            p.error_recover("expected object member", &[SyntaxKind::R_BRACE]);
        }
    }
    p.expect(SyntaxKind::R_BRACE);
    p.finish_node();
}

/// `{ a, b: Int -> ...` - identifiers and type syntax up to an arrow
fn at_object_body_parameters<P: PklParser>(p: &P) -> bool {
    if !p.at_any(&[SyntaxKind::IDENT, SyntaxKind::UNDERSCORE]) {
        return false;
    }
    for n in 1..PARAMS_LOOKAHEAD_LIMIT {
        match p.peek_kind(n) {
            SyntaxKind::ARROW => return true,
            SyntaxKind::IDENT
            | SyntaxKind::UNDERSCORE
            | SyntaxKind::COMMA
            | SyntaxKind::COLON
            | SyntaxKind::DOT
            | SyntaxKind::LT
            | SyntaxKind::GT
            | SyntaxKind::QUESTION
            | SyntaxKind::PIPE
            | SyntaxKind::L_PAREN
            | SyntaxKind::R_PAREN
            | SyntaxKind::UNKNOWN_KW
            | SyntaxKind::NOTHING_KW => {}
            _ => return false,
        }
    }
    false
}

fn parse_object_member<P: PklParser>(p: &mut P) {
    let current = p.current_kind();
    match current {
        SyntaxKind::FUNCTION_KW => {
            let checkpoint = p.checkpoint();
            parse_method(p, checkpoint, SyntaxKind::OBJECT_METHOD);
        }
        _ if current.is_modifier() => {
            let checkpoint = p.checkpoint();
            parse_modifiers(p);
            if p.at(SyntaxKind::FUNCTION_KW) {
                parse_method(p, checkpoint, SyntaxKind::OBJECT_METHOD);
            } else if p.at(SyntaxKind::IDENT) {
                parse_property(p, checkpoint, SyntaxKind::OBJECT_PROPERTY);
            } else {
                p.error_recover("expected property or method", &[SyntaxKind::R_BRACE]);
            }
        }
        SyntaxKind::IDENT
            if matches!(
                p.peek_kind(1),
                SyntaxKind::EQ | SyntaxKind::COLON | SyntaxKind::L_BRACE
            ) =>
        {
            let checkpoint = p.checkpoint();
            parse_property(p, checkpoint, SyntaxKind::OBJECT_PROPERTY);
        }
        SyntaxKind::L_BRACKET => parse_object_entry(p),
        SyntaxKind::SPREAD | SyntaxKind::QUESTION_SPREAD => {
            p.start_node(SyntaxKind::OBJECT_SPREAD);
            p.bump();
            parse_expression(p);
            p.finish_node();
        }
        SyntaxKind::FOR_KW => parse_for_generator(p),
        SyntaxKind::WHEN_KW => parse_when_generator(p),
        _ if at_expression_start(p) => {
            p.start_node(SyntaxKind::OBJECT_ELEMENT);
            parse_expression(p);
            p.finish_node();
        }
        _ => {}
    }
}

/// ObjectEntry = '[' Expr ']' ('=' Expr | ObjectBody+)
fn parse_object_entry<P: PklParser>(p: &mut P) {
    p.start_node(SyntaxKind::OBJECT_ENTRY);
    p.bump(); // [
    parse_expression(p);
    p.expect(SyntaxKind::R_BRACKET);
    if p.eat(SyntaxKind::EQ) {
        parse_expression(p);
    } else if p.at(SyntaxKind::L_BRACE) {
        while p.at(SyntaxKind::L_BRACE) {
            parse_object_body(p);
        }
    } else {
        p.error("expected '=' or object body");
    }
    p.finish_node();
}

/// ForGenerator = 'for' '(' Parameter (',' Parameter)? 'in' Expr ')' ObjectBody
fn parse_for_generator<P: PklParser>(p: &mut P) {
    p.start_node(SyntaxKind::FOR_GENERATOR);
    p.bump(); // for
    if p.expect(SyntaxKind::L_PAREN) {
        parse_parameter(p);
        if p.eat(SyntaxKind::COMMA) {
            parse_parameter(p);
        }
        p.expect(SyntaxKind::IN_KW);
        parse_expression(p);
        p.expect(SyntaxKind::R_PAREN);
    }
    if p.at(SyntaxKind::L_BRACE) {
        parse_object_body(p);
    } else {
        p.error("expected object body");
    }
    p.finish_node();
}

/// WhenGenerator = 'when' '(' Expr ')' ObjectBody ('else' ObjectBody)?
fn parse_when_generator<P: PklParser>(p: &mut P) {
    p.start_node(SyntaxKind::WHEN_GENERATOR);
    p.bump(); // when
    if p.expect(SyntaxKind::L_PAREN) {
        parse_expression(p);
        p.expect(SyntaxKind::R_PAREN);
    }
    if p.at(SyntaxKind::L_BRACE) {
        parse_object_body(p);
    } else {
        p.error("expected object body");
    }
    if p.eat(SyntaxKind::ELSE_KW) {
        if p.at(SyntaxKind::L_BRACE) {
            parse_object_body(p);
        } else {
            p.error("expected object body");
        }
    }
    p.finish_node();
}
