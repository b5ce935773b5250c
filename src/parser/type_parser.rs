use std::collections::HashSet;
use syn::{Expr, GenericArgument, Lit, PathArguments, Type, UnOp};

use crate::error::{CodegenError, Result};
use crate::known_types;
use crate::models::{FieldValue, LiteralValue, TypeDefinition, TypeReference};

/// Parse an annotation into a field value.
///
/// Compound annotations become `TypeDefinition` trees. Plain names are
/// either language scalars, generic parameters of the enclosing model, or
/// unresolved references that children resolution turns into wrappers or
/// library primitives.
pub fn parse_type(
    annotation: &str,
    generic_params: &HashSet<String>,
    context: &str,
) -> Result<FieldValue> {
    let ty: Type = syn::parse_str(annotation).map_err(|source| CodegenError::InvalidAnnotation {
        context: context.to_string(),
        annotation: annotation.to_string(),
        source,
    })?;

    TypeParser {
        annotation,
        generic_params,
        context,
    }
    .parse(&ty)
}

struct TypeParser<'a> {
    annotation: &'a str,
    generic_params: &'a HashSet<String>,
    context: &'a str,
}

impl TypeParser<'_> {
    fn unsupported(&self, reason: impl Into<String>) -> CodegenError {
        CodegenError::UnsupportedType {
            context: self.context.to_string(),
            annotation: self.annotation.to_string(),
            reason: reason.into(),
        }
    }

    fn parse(&self, ty: &Type) -> Result<FieldValue> {
        match ty {
            Type::Path(type_path) => {
                if type_path.qself.is_some() {
                    return Err(self.unsupported("qualified self types are not supported"));
                }
                let segments: Vec<String> = type_path
                    .path
                    .segments
                    .iter()
                    .map(|s| s.ident.to_string())
                    .filter(|s| s != "crate")
                    .collect();
                let Some(segment) = type_path.path.segments.last() else {
                    return Err(self.unsupported("empty path"));
                };
                let name = segment.ident.to_string();

                // Generic parameters of the enclosing model shadow everything else
                if segments.len() == 1
                    && self.generic_params.contains(&name)
                    && segment.arguments.is_none()
                {
                    return Ok(FieldValue::Generic(name));
                }

                self.parse_named(&name, segments, &segment.arguments)
            }

            Type::Tuple(tuple) => {
                if tuple.elems.is_empty() {
                    Ok(FieldValue::none())
                } else {
                    let members = tuple
                        .elems
                        .iter()
                        .map(|t| self.parse(t))
                        .collect::<Result<Vec<_>>>()?;
                    Ok(FieldValue::definition(TypeDefinition::TupleOf(members)))
                }
            }

            Type::Reference(reference) => self.parse(&reference.elem),
            Type::Paren(paren) => self.parse(&paren.elem),
            Type::Group(group) => self.parse(&group.elem),

            Type::Slice(slice) => Ok(FieldValue::definition(TypeDefinition::ListOf(
                self.parse(&slice.elem)?,
            ))),
            Type::Array(array) => Ok(FieldValue::definition(TypeDefinition::ListOf(
                self.parse(&array.elem)?,
            ))),

            Type::BareFn(_) => Err(self.unsupported("function pointers have no wire form")),
            Type::TraitObject(_) | Type::ImplTrait(_) => {
                Err(self.unsupported("trait types have no wire form"))
            }
            _ => Err(self.unsupported("unrecognized type form")),
        }
    }

    fn parse_named(
        &self,
        name: &str,
        segments: Vec<String>,
        arguments: &PathArguments,
    ) -> Result<FieldValue> {
        match name {
            "Option" => {
                let inner = self
                    .single_argument(arguments)?
                    .unwrap_or_else(FieldValue::any);
                let mut members = Vec::new();
                push_union_member(&mut members, inner);
                push_union_member(&mut members, FieldValue::none());
                Ok(FieldValue::definition(TypeDefinition::Or(members)))
            }

            "Union" => {
                let args = self.type_arguments(arguments)?;
                if args.is_empty() {
                    return Err(self.unsupported("`Union` needs at least one member"));
                }
                let mut members = Vec::new();
                for arg in args {
                    push_union_member(&mut members, arg);
                }
                Ok(FieldValue::definition(TypeDefinition::Or(members)))
            }

            "Vec" | "VecDeque" | "LinkedList" | "List" => {
                let inner = self
                    .single_argument(arguments)?
                    .unwrap_or_else(FieldValue::any);
                Ok(FieldValue::definition(TypeDefinition::ListOf(inner)))
            }

            "HashSet" | "BTreeSet" | "IndexSet" | "Set" => {
                let inner = self
                    .single_argument(arguments)?
                    .unwrap_or_else(FieldValue::any);
                Ok(FieldValue::definition(TypeDefinition::SetOf(inner)))
            }

            "HashMap" | "BTreeMap" | "IndexMap" | "Dict" => {
                let mut args = self.type_arguments(arguments)?.into_iter();
                let definition = match (args.next(), args.next(), args.next()) {
                    (None, _, _) => TypeDefinition::DictOf {
                        key: FieldValue::any(),
                        value: FieldValue::any(),
                    },
                    (Some(key), Some(value), None) => TypeDefinition::DictOf { key, value },
                    _ => return Err(self.unsupported(format!("`{name}` takes a key and a value"))),
                };
                Ok(FieldValue::definition(definition))
            }

            "Literal" => {
                let values = self.literal_arguments(arguments)?;
                if values.is_empty() {
                    return Err(self.unsupported("`Literal` needs at least one value"));
                }
                Ok(FieldValue::definition(TypeDefinition::LiteralOf(values)))
            }

            // Smart pointers serialize as their contents
            "Box" | "Arc" | "Rc" | "Cow" => self
                .single_argument(arguments)?
                .ok_or_else(|| self.unsupported(format!("`{name}` needs a type argument"))),

            // Library names like `Date` stay references so declarations can shadow them
            _ => {
                if let Some(primitive) = known_types::builtin_primitive(name) {
                    return Ok(FieldValue::Primitive(primitive));
                }
                Ok(FieldValue::Reference(TypeReference {
                    path: segments,
                    args: self.type_arguments(arguments)?,
                }))
            }
        }
    }

    /// Type arguments, ignoring lifetimes
    fn type_arguments(&self, arguments: &PathArguments) -> Result<Vec<FieldValue>> {
        match arguments {
            PathArguments::None => Ok(Vec::new()),
            PathArguments::AngleBracketed(angle) => angle
                .args
                .iter()
                .filter_map(|arg| match arg {
                    GenericArgument::Type(ty) => Some(self.parse(ty)),
                    GenericArgument::Lifetime(_) => None,
                    _ => Some(Err(self.unsupported("only type arguments are allowed here"))),
                })
                .collect(),
            PathArguments::Parenthesized(_) => {
                Err(self.unsupported("parenthesized arguments are not supported"))
            }
        }
    }

    fn single_argument(&self, arguments: &PathArguments) -> Result<Option<FieldValue>> {
        let mut args = self.type_arguments(arguments)?;
        match args.len() {
            0 => Ok(None),
            1 => Ok(args.pop()),
            n => Err(self.unsupported(format!("expected one type argument, found {n}"))),
        }
    }

    fn literal_arguments(&self, arguments: &PathArguments) -> Result<Vec<LiteralValue>> {
        let PathArguments::AngleBracketed(angle) = arguments else {
            return Ok(Vec::new());
        };
        angle
            .args
            .iter()
            .map(|arg| match arg {
                GenericArgument::Const(expr) => self.literal_from_expr(expr),
                GenericArgument::Type(Type::Path(path)) if path.path.segments.len() == 1 => {
                    match path.path.segments[0].ident.to_string().as_str() {
                        "None" => Ok(LiteralValue::Null),
                        "true" => Ok(LiteralValue::Bool(true)),
                        "false" => Ok(LiteralValue::Bool(false)),
                        other => Err(self.unsupported(format!("`{other}` is not a literal value"))),
                    }
                }
                _ => Err(self.unsupported("`Literal` only accepts literal values")),
            })
            .collect()
    }

    fn literal_from_expr(&self, expr: &Expr) -> Result<LiteralValue> {
        match expr {
            Expr::Lit(expr_lit) => self.literal_from_lit(&expr_lit.lit, false),
            Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => match unary.expr.as_ref() {
                Expr::Lit(expr_lit) => self.literal_from_lit(&expr_lit.lit, true),
                _ => Err(self.unsupported("only numeric literals can be negated")),
            },
            Expr::Block(block) if block.block.stmts.len() == 1 => match &block.block.stmts[0] {
                syn::Stmt::Expr(inner, None) => self.literal_from_expr(inner),
                _ => Err(self.unsupported("`Literal` only accepts literal values")),
            },
            Expr::Path(path) if path.path.is_ident("None") => Ok(LiteralValue::Null),
            _ => Err(self.unsupported("`Literal` only accepts literal values")),
        }
    }

    fn literal_from_lit(&self, lit: &Lit, negative: bool) -> Result<LiteralValue> {
        let value = match lit {
            Lit::Str(s) if !negative => LiteralValue::Str(s.value()),
            Lit::Bool(b) if !negative => LiteralValue::Bool(b.value),
            Lit::Int(i) => {
                let value: i64 = i
                    .base10_parse()
                    .map_err(|e| self.unsupported(format!("invalid integer literal: {e}")))?;
                LiteralValue::Int(if negative { -value } else { value })
            }
            Lit::Float(f) => {
                let value: f64 = f
                    .base10_parse()
                    .map_err(|e| self.unsupported(format!("invalid float literal: {e}")))?;
                LiteralValue::Float(if negative { -value } else { value })
            }
            _ => return Err(self.unsupported("unsupported literal")),
        };
        Ok(value)
    }
}

/// Add a union member, flattening nested unions and dropping duplicates
fn push_union_member(members: &mut Vec<FieldValue>, member: FieldValue) {
    match member {
        FieldValue::Definition(definition) if matches!(*definition, TypeDefinition::Or(_)) => {
            if let TypeDefinition::Or(nested) = *definition {
                for inner in nested {
                    push_union_member(members, inner);
                }
            }
        }
        other => {
            if !members.contains(&other) {
                members.push(other);
            }
        }
    }
}
