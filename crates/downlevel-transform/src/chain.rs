//! Pass composition.
//!
//! A pass is split into a factory (runs once per pipeline, registers hooks
//! and printer interest) and the transform it returns (runs once per file).
//! `chain` wires the two phases: all factories run first, in order, then the
//! resulting transforms are composed left to right.

use crate::context::TransformContext;
use downlevel_ast::NodeIndex;

/// A per-file transform produced by a pass factory.
pub type Transform = Box<dyn FnMut(&mut TransformContext, NodeIndex) -> NodeIndex>;

/// Initializes a pass against the run's context and returns its transform.
pub type TransformerFactory = fn(&mut TransformContext) -> Transform;

/// A named pass. The name only feeds diagnostics.
#[derive(Clone, Copy, Debug)]
pub struct Transformer {
    pub name: &'static str,
    pub factory: TransformerFactory,
}

/// Compose transforms left to right: the output of each feeds the next.
/// Composing nothing yields the identity. The common small arities avoid
/// the fold loop.
pub fn compose(transforms: Vec<Transform>) -> Transform {
    let mut iter = transforms.into_iter();
    match (iter.next(), iter.next(), iter.next()) {
        (None, _, _) => Box::new(|_ctx, node| node),
        (Some(mut only), None, _) => Box::new(move |ctx, node| only(ctx, node)),
        (Some(mut first), Some(mut second), None) => Box::new(move |ctx, node| {
            let node = first(ctx, node);
            second(ctx, node)
        }),
        (Some(first), Some(second), Some(third)) => {
            let mut transforms = vec![first, second, third];
            transforms.extend(iter);
            Box::new(move |ctx, node| {
                transforms
                    .iter_mut()
                    .fold(node, |node, transform| transform(ctx, node))
            })
        }
    }
}

/// Fuse a sequence of passes into one factory. Invoking it runs every
/// factory in order before any transform runs, so hook registrations land
/// in declaration order and later passes override earlier ones.
pub fn chain(transformers: Vec<Transformer>) -> impl FnOnce(&mut TransformContext) -> Transform {
    move |context| {
        let transforms: Vec<Transform> = transformers
            .iter()
            .map(|transformer| {
                tracing::debug!(pass = transformer.name, "initializing transformer");
                (transformer.factory)(context)
            })
            .collect();
        compose(transforms)
    }
}
