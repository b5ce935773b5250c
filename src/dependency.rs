//! Declaration ordering.
//!
//! TypeScript interfaces may reference each other freely, but emitting
//! dependencies first keeps the generated files readable top-down and
//! gives a stable order between runs.

use std::collections::HashMap;
use std::hash::Hash;

use crate::alias_manager::NameTable;
use crate::error::{CodegenError, Result};
use crate::models::{FieldValue, FieldWrapper, WrapperArena, WrapperRef};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Order `nodes` so that every node comes after everything `edges` says it
/// depends on. Ties keep the input order, so callers sort `nodes` first.
pub fn topological_order<N, E, L>(nodes: &[N], edges: E, label: L) -> Result<Vec<N>>
where
    N: Copy + Eq + Hash,
    E: Fn(N) -> Vec<N>,
    L: Fn(N) -> String,
{
    struct Walk<'f, N, E, L> {
        edges: &'f E,
        label: &'f L,
        marks: HashMap<N, Mark>,
        path: Vec<N>,
        order: Vec<N>,
    }

    impl<N, E, L> Walk<'_, N, E, L>
    where
        N: Copy + Eq + Hash,
        E: Fn(N) -> Vec<N>,
        L: Fn(N) -> String,
    {
        fn visit(&mut self, node: N) -> Result<()> {
            match self.marks.get(&node) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::InProgress) => {
                    let start = self.path.iter().position(|&n| n == node).unwrap_or(0);
                    let mut cycle: Vec<String> =
                        self.path[start..].iter().map(|&n| (self.label)(n)).collect();
                    cycle.push((self.label)(node));
                    return Err(CodegenError::DependencyCycle(cycle));
                }
                None => {}
            }

            self.marks.insert(node, Mark::InProgress);
            self.path.push(node);
            for dependency in (self.edges)(node) {
                self.visit(dependency)?;
            }
            self.path.pop();
            self.marks.insert(node, Mark::Done);
            self.order.push(node);
            Ok(())
        }
    }

    let mut walk = Walk {
        edges: &edges,
        label: &label,
        marks: HashMap::new(),
        path: Vec::new(),
        order: Vec::with_capacity(nodes.len()),
    };
    for &node in nodes {
        walk.visit(node)?;
    }
    Ok(walk.order)
}

/// Models, enums and exceptions in emission order
pub fn model_order(arena: &WrapperArena, names: &NameTable) -> Result<Vec<WrapperRef>> {
    let mut nodes: Vec<WrapperRef> = arena
        .wrapper_refs()
        .into_iter()
        .filter(|w| !matches!(w, WrapperRef::Controller(_)))
        .collect();
    nodes.sort_by(|a, b| names.global(*a).cmp(names.global(*b)));

    topological_order(&nodes, |node| model_edges(arena, node), |node| {
        arena.key(node).to_string()
    })
}

/// Controllers in emission order, superclasses first
pub fn controller_order(arena: &WrapperArena, names: &NameTable) -> Result<Vec<WrapperRef>> {
    let mut nodes: Vec<WrapperRef> = arena
        .controllers()
        .iter()
        .map(|c| WrapperRef::Controller(c.id))
        .collect();
    nodes.sort_by(|a, b| names.global(*a).cmp(names.global(*b)));

    topological_order(
        &nodes,
        |node| match node {
            WrapperRef::Controller(id) => arena
                .controller(id)
                .superclasses
                .iter()
                .map(|&s| WrapperRef::Controller(s))
                .collect(),
            _ => Vec::new(),
        },
        |node| arena.key(node).to_string(),
    )
}

fn model_edges(arena: &WrapperArena, node: WrapperRef) -> Vec<WrapperRef> {
    let mut edges = Vec::new();
    match node {
        WrapperRef::Model(id) => {
            let model = arena.model(id);
            edges.extend(model.superclasses.iter().map(|&s| WrapperRef::Model(s)));
            collect_field_edges(&model.value_models, &mut edges);
            for arg in &model.generic_args {
                collect_value_edges(arg, &mut edges);
            }
        }
        WrapperRef::Exception(id) => {
            collect_field_edges(&arena.exception(id).value_models, &mut edges);
        }
        WrapperRef::Enum(_) | WrapperRef::Controller(_) => {}
    }
    edges
}

fn collect_field_edges(fields: &[FieldWrapper], edges: &mut Vec<WrapperRef>) {
    for field in fields {
        collect_value_edges(&field.value, edges);
    }
}

/// Self-references are not edges; they are how structural recursion is expressed
fn collect_value_edges(value: &FieldValue, edges: &mut Vec<WrapperRef>) {
    value.walk(&mut |v| match v {
        FieldValue::Model(id) => edges.push(WrapperRef::Model(*id)),
        FieldValue::Enum(id) => edges.push(WrapperRef::Enum(*id)),
        _ => {}
    });
}
