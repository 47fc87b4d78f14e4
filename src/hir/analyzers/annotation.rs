//! Validity of annotation types.

use super::Analyzer;
use crate::ast::{Annotation, AstError, Class, DeclaredType, Node};
use crate::hir::resolve::resolve_type_name;
use crate::hir::types::{class_self_type, is_subtype_of};
use crate::hir::{Context, Diagnostic};

/// Checks that each `@Type` names a concrete subclass of `Annotation`.
///
/// A type that is not a plain name, or that does not resolve to a class,
/// gets one diagnostic and no further checks. An abstract class and a class
/// outside the `Annotation` hierarchy are reported independently.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationAnalyzer;

impl Analyzer for AnnotationAnalyzer {
    fn name(&self) -> &'static str {
        "annotation"
    }

    fn analyze(
        &self,
        node: &Node,
        diagnostics: &mut Vec<Diagnostic>,
        ctx: &Context,
    ) -> Result<bool, AstError> {
        let Some(annotation) = Annotation::cast_ref(node) else {
            return Ok(true);
        };
        let Some(type_node) = annotation.type_node() else {
            return Ok(true);
        };
        let Some(declared) = DeclaredType::cast_ref(type_node.node()) else {
            diagnostics.push(Diagnostic::error(type_node.node(), "annotationHasNoName"));
            return Ok(true);
        };

        let name = declared.name()?;
        let Some(class) = resolve_type_name(&name, ctx).and_then(Class::cast) else {
            diagnostics.push(Diagnostic::error(type_node.node(), "cannotFindType").with_arg(name.text()));
            return Ok(true);
        };

        if class.is_abstract() {
            diagnostics.push(Diagnostic::error(type_node.node(), "typeIsAbstract").with_arg(name.text()));
        }
        let annotation_type = ctx.base().annotation_type();
        if !is_subtype_of(&class_self_type(&class), &annotation_type, ctx) {
            diagnostics.push(Diagnostic::error(type_node.node(), "notAnnotation").with_arg(name.text()));
        }
        Ok(true)
    }
}
