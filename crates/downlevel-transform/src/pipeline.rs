//! Pipeline selection and orchestration.
//!
//! `transformers` maps compile configuration to an ordered pass list;
//! `transform_files` realizes that list against one context and runs the
//! composed transform over every executable source file. Declaration files
//! pass through untouched. Files are processed independently; only the
//! context (overlay, feature table, hooks) persists across them.

use crate::chain::{chain, Transform, Transformer};
use crate::context::{EmitHost, EmitResolver, TransformContext};
use crate::passes;
use downlevel_ast::{NodeArena, NodeIndex};
use downlevel_common::{CompilerOptions, JsxEmit, ModuleKind, ScriptTarget};
use std::rc::Rc;

const TYPE_ERASURE: Transformer = Transformer {
    name: "type-erasure",
    factory: passes::type_erasure::factory,
};
const MODULE_ES: Transformer = Transformer {
    name: "module-es",
    factory: passes::module_es::factory,
};
const MODULE_SYSTEM: Transformer = Transformer {
    name: "module-system",
    factory: passes::module_system::factory,
};
const MODULE_CJS: Transformer = Transformer {
    name: "module-cjs",
    factory: passes::module_cjs::factory,
};
const JSX: Transformer = Transformer {
    name: "jsx",
    factory: passes::jsx::factory,
};
const ES2016: Transformer = Transformer {
    name: "es2016",
    factory: passes::es2016::factory,
};
const ES2015: Transformer = Transformer {
    name: "es2015",
    factory: passes::es2015::factory,
};

/// Fixed module-format table. Every supported format maps to exactly one
/// pass; a format without an entry is a configuration error, not a pipeline
/// error.
fn module_transformer(module: ModuleKind) -> Transformer {
    match module {
        ModuleKind::ES2015 | ModuleKind::ESNext => MODULE_ES,
        ModuleKind::System => MODULE_SYSTEM,
        ModuleKind::CommonJS | ModuleKind::AMD | ModuleKind::UMD | ModuleKind::None => MODULE_CJS,
        other => panic!("no module transformer registered for {other:?}"),
    }
}

/// Build the ordered pass list for a compile configuration.
pub fn transformers(options: &CompilerOptions) -> Vec<Transformer> {
    let mut transformers = Vec::with_capacity(5);

    // Type erasure first: every later pass sees valid target syntax.
    transformers.push(TYPE_ERASURE);
    transformers.push(module_transformer(options.module));
    if options.jsx == JsxEmit::React {
        transformers.push(JSX);
    }
    transformers.push(ES2016);
    if options.target < ScriptTarget::ES2015 {
        transformers.push(ES2015);
    }

    transformers
}

/// Output of a pipeline run: each input file either unchanged (declaration
/// files) or replaced by its transformed root, plus the context the printer
/// consults during serialization. The context still owns the arena.
pub struct TransformResult {
    pub transformed: Vec<NodeIndex>,
    pub context: TransformContext,
}

/// Run a pass list over the given source files.
pub fn transform_files(
    resolver: Rc<dyn EmitResolver>,
    host: Rc<dyn EmitHost>,
    arena: NodeArena,
    source_files: &[NodeIndex],
    transformers: Vec<Transformer>,
) -> TransformResult {
    let mut context = TransformContext::new(arena, host, resolver);
    let mut transform = chain(transformers)(&mut context);

    let transformed = source_files
        .iter()
        .map(|&file| transform_source_file(&mut context, &mut transform, file))
        .collect();

    TransformResult {
        transformed,
        context,
    }
}

fn transform_source_file(
    context: &mut TransformContext,
    transform: &mut Transform,
    file: NodeIndex,
) -> NodeIndex {
    // Declaration files carry no runtime semantics to lower.
    if context
        .arena()
        .source_file(file)
        .is_some_and(|data| data.is_declaration_file)
    {
        return file;
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        let name = context
            .arena()
            .source_file(file)
            .map(|data| data.file_name.clone())
            .unwrap_or_default();
        tracing::debug!(file = %name, "transforming source file");
    }

    context.set_current_source_file(file);
    let transformed = transform(context, file);
    context.set_current_source_file(NodeIndex::NONE);
    transformed
}
