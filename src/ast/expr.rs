//! Expression nodes.

use smol_str::SmolStr;

use super::{AstError, Node, NodeKind, ObjectBody, Parameter, ParameterList, Terminal, TypeNode};
use crate::parser::SyntaxKind;

ast_node!(Expr, |kind| kind.is_expr());

// ============================================================================
// Literals
// ============================================================================

ast_node!(IntLiteral, IntLiteral);

impl IntLiteral {
    /// Value of the literal; `None` when it overflows `i64`
    pub fn value(&self) -> Option<i64> {
        let text = self.0.terminals().first()?.text.replace('_', "");
        let lower = text.to_ascii_lowercase();
        if let Some(hex) = lower.strip_prefix("0x") {
            i64::from_str_radix(hex, 16).ok()
        } else if let Some(bin) = lower.strip_prefix("0b") {
            i64::from_str_radix(bin, 2).ok()
        } else if let Some(oct) = lower.strip_prefix("0o") {
            i64::from_str_radix(oct, 8).ok()
        } else {
            text.parse().ok()
        }
    }
}

ast_node!(FloatLiteral, FloatLiteral);

impl FloatLiteral {
    pub fn value(&self) -> Option<f64> {
        self.0.terminals().first()?.text.replace('_', "").parse().ok()
    }
}

ast_node!(StringLiteral, |kind| matches!(kind, NodeKind::StringLiteral | NodeKind::MlStringLiteral));

impl StringLiteral {
    children_method!(parts, StringPart);

    pub fn is_multiline(&self) -> bool {
        self.0.kind() == NodeKind::MlStringLiteral
    }

    /// Constant value with escapes resolved; `None` if the string interpolates
    pub fn value(&self) -> Option<String> {
        if !self.parts().is_empty() {
            return None;
        }
        let raw: String = self
            .0
            .terminals()
            .iter()
            .filter(|t| t.kind == SyntaxKind::STRING_CHARS)
            .map(|t| t.text.as_str())
            .collect();
        let raw = if self.is_multiline() {
            trim_multiline(&raw)
        } else {
            raw
        };
        Some(unescape(&raw))
    }
}

/// Drop the newline after the opening `"""` and the indentation line before the closing one
fn trim_multiline(raw: &str) -> String {
    let body = raw.strip_prefix('\n').unwrap_or(raw);
    match body.rfind('\n') {
        Some(idx) if body[idx + 1..].trim().is_empty() => body[..idx].to_string(),
        _ => body.to_string(),
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('u') => {
                let rest: String = chars.by_ref().take_while(|c| *c != '}').collect();
                let decoded = rest
                    .strip_prefix('{')
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .and_then(char::from_u32);
                out.extend(decoded);
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

ast_node!(StringPart, StringPart);

impl StringPart {
    first_child_method!(expr, Expr);
}

// ============================================================================
// Keyword expressions
// ============================================================================

ast_node!(ThrowExpr, ThrowExpr);

impl ThrowExpr {
    first_child_method!(expr, Expr);
}

ast_node!(TraceExpr, TraceExpr);

impl TraceExpr {
    first_child_method!(expr, Expr);
}

ast_node!(ImportExpr, ImportExpr);

impl ImportExpr {
    first_child_method!(uri, StringLiteral);
    has_terminal_method!(is_glob, IMPORT_STAR_KW);
}

ast_node!(ReadExpr, ReadExpr);

impl ReadExpr {
    first_child_method!(expr, Expr);
    has_terminal_method!(is_nullable, READ_OR_NULL_KW);
    has_terminal_method!(is_glob, READ_STAR_KW);
}

// ============================================================================
// Access expressions
// ============================================================================

ast_node!(UnqualifiedAccessExpr, UnqualifiedAccessExpr);

impl UnqualifiedAccessExpr {
    first_child_method!(argument_list, ArgumentList);

    pub fn identifier(&self) -> Result<&Terminal, AstError> {
        self.0.identifier()
    }

    pub fn member_name(&self) -> Result<SmolStr, AstError> {
        Ok(self.identifier()?.name())
    }

    pub fn is_property_access(&self) -> bool {
        self.argument_list().is_none()
    }
}

ast_node!(QualifiedAccessExpr, QualifiedAccessExpr);

impl QualifiedAccessExpr {
    required_child_method!(receiver, Expr, "receiver");
    first_child_method!(argument_list, ArgumentList);
    has_terminal_method!(is_null_safe, QUESTION_DOT);

    pub fn identifier(&self) -> Result<&Terminal, AstError> {
        self.0.identifier()
    }

    pub fn member_name(&self) -> Result<SmolStr, AstError> {
        Ok(self.identifier()?.name())
    }

    pub fn is_property_access(&self) -> bool {
        self.argument_list().is_none()
    }
}

ast_node!(SuperAccessExpr, SuperAccessExpr);

impl SuperAccessExpr {
    first_child_method!(argument_list, ArgumentList);

    pub fn identifier(&self) -> Result<&Terminal, AstError> {
        self.0.identifier()
    }

    pub fn member_name(&self) -> Result<SmolStr, AstError> {
        Ok(self.identifier()?.name())
    }

    pub fn is_property_access(&self) -> bool {
        self.argument_list().is_none()
    }
}

ast_node!(SuperSubscriptExpr, SuperSubscriptExpr);

impl SuperSubscriptExpr {
    first_child_method!(key, Expr);
}

ast_node!(SubscriptExpr, SubscriptExpr);

impl SubscriptExpr {
    required_child_method!(receiver, Expr, "receiver");

    pub fn key(&self) -> Option<Expr> {
        self.0.children().into_iter().filter_map(Expr::cast).nth(1)
    }
}

ast_node!(NonNullExpr, NonNullExpr);

impl NonNullExpr {
    required_child_method!(expr, Expr, "operand");
}

// ============================================================================
// Operators
// ============================================================================

ast_node!(UnaryExpr, |kind| matches!(kind, NodeKind::UnaryMinusExpr | NodeKind::LogicalNotExpr));

impl UnaryExpr {
    required_child_method!(expr, Expr, "operand");
}

ast_node!(BinaryExpr, |kind| kind.is_binary());

impl BinaryExpr {
    required_child_method!(left, Expr, "left operand");

    pub fn right(&self) -> Result<Expr, AstError> {
        self.0
            .children()
            .into_iter()
            .filter_map(Expr::cast)
            .nth(1)
            .ok_or_else(|| self.0.missing_child("right operand"))
    }

    pub fn operator(&self) -> Result<&Terminal, AstError> {
        self.0
            .terminals()
            .first()
            .ok_or_else(|| self.0.missing_terminal("operator"))
    }
}

ast_node!(TypeTestExpr, TypeTestExpr);

impl TypeTestExpr {
    required_child_method!(expr, Expr, "operand");
    required_child_method!(type_node, TypeNode, "type");
    has_terminal_method!(is_cast, AS_KW);
}

// ============================================================================
// Control and construction
// ============================================================================

ast_node!(IfExpr, IfExpr);

impl IfExpr {
    required_child_method!(condition, Expr, "condition");

    pub fn then_expr(&self) -> Result<Expr, AstError> {
        self.nth_expr(1, "then branch")
    }

    pub fn else_expr(&self) -> Result<Expr, AstError> {
        self.nth_expr(2, "else branch")
    }

    fn nth_expr(&self, n: usize, slot: &'static str) -> Result<Expr, AstError> {
        self.0
            .children()
            .into_iter()
            .filter_map(Expr::cast)
            .nth(n)
            .ok_or_else(|| self.0.missing_child(slot))
    }
}

ast_node!(LetExpr, LetExpr);

impl LetExpr {
    required_child_method!(parameter, Parameter, "parameter");

    /// Bound value, the expression inside the parentheses
    pub fn var_expr(&self) -> Result<Expr, AstError> {
        let exprs = self.exprs();
        match self.close_offset() {
            Some(close) => exprs
                .into_iter()
                .find(|e| e.node().range().end() <= close),
            None => exprs.into_iter().next(),
        }
        .ok_or_else(|| self.0.missing_child("bound value"))
    }

    pub fn body(&self) -> Result<Expr, AstError> {
        let exprs = self.exprs();
        match self.close_offset() {
            Some(close) => exprs
                .into_iter()
                .find(|e| e.node().range().start() >= close),
            None => exprs.into_iter().nth(1),
        }
        .ok_or_else(|| self.0.missing_child("body"))
    }

    fn exprs(&self) -> Vec<Expr> {
        self.0.children().into_iter().filter_map(Expr::cast).collect()
    }

    fn close_offset(&self) -> Option<crate::base::TextSize> {
        self.0.terminal(SyntaxKind::R_PAREN).map(|t| t.range.start())
    }
}

ast_node!(NewExpr, NewExpr);

impl NewExpr {
    first_child_method!(type_node, TypeNode);
    required_child_method!(object_body, ObjectBody, "object body");
}

ast_node!(AmendExpr, AmendExpr);

impl AmendExpr {
    required_child_method!(parent_expr, Expr, "amended expression");
    required_child_method!(object_body, ObjectBody, "object body");
}

ast_node!(FunctionLiteral, FunctionLiteral);

impl FunctionLiteral {
    required_child_method!(parameter_list, ParameterList, "parameter list");
    first_child_method!(body, Expr);

    pub fn parameters(&self) -> Vec<Parameter> {
        self.parameter_list()
            .map(|l| l.parameters())
            .unwrap_or_default()
    }
}

ast_node!(ParenthesizedExpr, ParenthesizedExpr);

impl ParenthesizedExpr {
    first_child_method!(expr, Expr);
}

ast_node!(ArgumentList, ArgumentList);

impl ArgumentList {
    children_method!(arguments, Expr);
}

impl Expr {
    /// Strip any number of enclosing parentheses
    pub fn unparenthesized(self) -> Option<Expr> {
        let mut current = self;
        while let Some(paren) = ParenthesizedExpr::cast_ref(current.node()) {
            current = paren.expr()?;
        }
        Some(current)
    }
}

/// Whether `node` sits in the body of `let_expr`, as opposed to its bound value
pub fn is_in_let_body(let_expr: &LetExpr, node: &Node) -> bool {
    let_expr
        .body()
        .is_ok_and(|body| body.node().range().contains_range(node.range()))
}
