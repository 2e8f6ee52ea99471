//! ES-module output. The source dialect's module syntax already is the
//! target's, so the transform is the identity.

use crate::chain::Transform;
use crate::context::TransformContext;

pub fn factory(_context: &mut TransformContext) -> Transform {
    Box::new(|_context, node| node)
}
