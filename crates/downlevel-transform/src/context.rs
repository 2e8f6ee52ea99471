//! The transformation context shared by every pass in a run.
//!
//! One context exists per pipeline run. It owns the node arena for the
//! duration of the run and carries all cross-pass state: the emit-metadata
//! overlay, the lexical-environment stacks, the per-syntax-kind feature
//! table, and the two printer hooks. Passes receive `&mut TransformContext`
//! on every call instead of capturing it, so the single active call stack is
//! the only mutator.
//!
//! Phase discipline is enforced at runtime: once the print phase begins the
//! `lexical_environment_disabled` guard rejects hoisting and overlay writes
//! as fatal programmer errors.

use crate::emit_flags::{NodeEmitFlags, NodeEmitOptions, SyntaxKindFeatureFlags};
use downlevel_ast::node::{VariableData, VariableDeclarationData, VariableStatementData};
use downlevel_ast::{NodeArena, NodeFlags, NodeIndex, NodeList, SyntaxKind, TextRange};
use downlevel_common::{CompilerOptions, NewLineKind};
use rustc_hash::FxHashMap;
use std::mem;
use std::rc::Rc;

/// The emit host, provided by the surrounding driver. Opaque to the engine
/// beyond configuration access; stored in the context and handed to passes.
pub trait EmitHost {
    fn compiler_options(&self) -> &CompilerOptions;
    fn new_line(&self) -> NewLineKind;
}

/// Binding information from the checker. Opaque to the engine; stored in the
/// context and handed verbatim to passes.
pub trait EmitResolver {
    /// Whether the given declaration is visible outside its module.
    fn is_declaration_exported(&self, node: NodeIndex) -> bool;
}

/// Host backed by a fixed set of options, for drivers that need nothing more.
pub struct StaticEmitHost {
    options: CompilerOptions,
}

impl StaticEmitHost {
    pub fn new(options: CompilerOptions) -> StaticEmitHost {
        StaticEmitHost { options }
    }
}

impl EmitHost for StaticEmitHost {
    fn compiler_options(&self) -> &CompilerOptions {
        &self.options
    }

    fn new_line(&self) -> NewLineKind {
        self.options.new_line
    }
}

/// Resolver that reports every declaration as module-local, for runs where
/// binding information is unavailable.
pub struct NullEmitResolver;

impl EmitResolver for NullEmitResolver {
    fn is_declaration_exported(&self, _node: NodeIndex) -> bool {
        false
    }
}

/// Hook for last-moment node replacement at serialization time. Shared
/// rather than owned by the slot: dispatch clones the handle, so the slot
/// stays populated while a call is in flight and nested queries reach the
/// registered hook.
pub type SubstituteNodeHook = Rc<dyn Fn(&mut TransformContext, NodeIndex, bool) -> NodeIndex>;

/// Hook invoked around a node's serialization. Shared for the same reason
/// as [`SubstituteNodeHook`]: nested notifications must dispatch to the
/// registered hook, not the default.
pub type EmitNodeHook =
    Rc<dyn Fn(&mut TransformContext, NodeIndex, &mut dyn FnMut(&mut TransformContext, NodeIndex))>;

pub struct TransformContext {
    arena: NodeArena,
    host: Rc<dyn EmitHost>,
    resolver: Rc<dyn EmitResolver>,
    current_source_file: NodeIndex,

    // Emit-metadata overlay, keyed by node. Reads walk the original chain.
    emit_options: FxHashMap<NodeIndex, NodeEmitOptions>,

    // Per-syntax-kind printer interception interest.
    enabled_features: Box<[SyntaxKindFeatureFlags]>,

    // Lexical environment state. Stack slots are recycled between frames to
    // avoid reallocation during transformation.
    hoisted_variable_declarations: Vec<NodeIndex>,
    hoisted_function_declarations: Vec<NodeIndex>,
    variable_declarations_stack: Vec<Vec<NodeIndex>>,
    function_declarations_stack: Vec<Vec<NodeIndex>>,
    lexical_environment_stack_offset: usize,
    lexical_environment_disabled: bool,

    on_substitute_node: Option<SubstituteNodeHook>,
    on_emit_node: Option<EmitNodeHook>,
}

impl TransformContext {
    /// Build the one context for a pipeline run, taking ownership of the
    /// arena until the run's output is handed to the printer.
    pub fn new(
        arena: NodeArena,
        host: Rc<dyn EmitHost>,
        resolver: Rc<dyn EmitResolver>,
    ) -> TransformContext {
        TransformContext {
            arena,
            host,
            resolver,
            current_source_file: NodeIndex::NONE,
            emit_options: FxHashMap::default(),
            enabled_features: vec![SyntaxKindFeatureFlags::empty(); SyntaxKind::COUNT]
                .into_boxed_slice(),
            hoisted_variable_declarations: Vec::new(),
            hoisted_function_declarations: Vec::new(),
            variable_declarations_stack: Vec::new(),
            function_declarations_stack: Vec::new(),
            lexical_environment_stack_offset: 0,
            lexical_environment_disabled: false,
            on_substitute_node: None,
            on_emit_node: None,
        }
    }

    pub fn compiler_options(&self) -> &CompilerOptions {
        self.host.compiler_options()
    }

    pub fn emit_host(&self) -> &Rc<dyn EmitHost> {
        &self.host
    }

    pub fn emit_resolver(&self) -> &Rc<dyn EmitResolver> {
        &self.resolver
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    /// The file currently being transformed, for pass diagnostics.
    pub fn current_source_file(&self) -> NodeIndex {
        self.current_source_file
    }

    pub(crate) fn set_current_source_file(&mut self, file: NodeIndex) {
        self.current_source_file = file;
    }

    /// Enter the print phase: hoisting and overlay writes become fatal.
    /// Called by the emit orchestration once transformation is complete.
    pub fn disable_lexical_environment(&mut self) {
        self.lexical_environment_disabled = true;
    }

    #[inline]
    fn assert_overlay_writable(&self) {
        assert!(
            !self.lexical_environment_disabled,
            "Cannot modify node emit options during the print phase."
        );
    }

    // ========================================================================
    // Emit-metadata overlay
    // ========================================================================

    /// Flags controlling emit behavior of a node, inherited through the
    /// original chain. `MERGE` markers resolve lazily here: the stored flags
    /// combine with the replaced node's flags, and the marker never escapes.
    pub fn node_emit_flags(&self, node: NodeIndex) -> Option<NodeEmitFlags> {
        let mut current = node;
        while !current.is_none() {
            if let Some(options) = self.emit_options.get(&current) {
                if let Some(flags) = options.flags {
                    if flags.contains(NodeEmitFlags::MERGE) {
                        let inherited = self
                            .node_emit_flags(self.arena.original(current))
                            .unwrap_or(NodeEmitFlags::empty());
                        return Some((flags | inherited).difference(NodeEmitFlags::MERGE));
                    }
                    return Some(flags);
                }
            }
            current = self.arena.original(current);
        }
        None
    }

    /// Set flags controlling emit behavior of a node. `MERGE` adds the flags
    /// to whatever is already recorded for this exact node (not its
    /// original) and leaves inheritance to read time.
    pub fn set_node_emit_flags(&mut self, node: NodeIndex, flags: NodeEmitFlags) {
        self.assert_overlay_writable();
        let options = self.emit_options.entry(node).or_default();
        let flags = if flags.contains(NodeEmitFlags::MERGE) {
            options.flags.unwrap_or(NodeEmitFlags::empty()) | flags
        } else {
            flags
        };
        options.flags = Some(flags);
    }

    /// The text range to use when emitting source maps for a node. Falls
    /// back to the node's own range when nothing was recorded on its chain.
    pub fn source_map_range(&self, node: NodeIndex) -> TextRange {
        let mut current = node;
        while !current.is_none() {
            if let Some(options) = self.emit_options.get(&current) {
                if let Some(range) = options.source_map_range {
                    return range;
                }
            }
            current = self.arena.original(current);
        }
        self.arena
            .get(node)
            .map_or(TextRange::default(), |n| TextRange::new(n.pos, n.end))
    }

    pub fn set_source_map_range(&mut self, node: NodeIndex, range: TextRange) {
        self.assert_overlay_writable();
        self.emit_options.entry(node).or_default().source_map_range = Some(range);
    }

    fn token_source_map_ranges(&self, node: NodeIndex) -> Option<&FxHashMap<u16, TextRange>> {
        let mut current = node;
        while !current.is_none() {
            if let Some(options) = self.emit_options.get(&current) {
                if let Some(ranges) = options.token_source_map_ranges.as_ref() {
                    return Some(ranges);
                }
            }
            current = self.arena.original(current);
        }
        None
    }

    /// The text range to use for source maps for a token of a node.
    pub fn token_source_map_range(&self, node: NodeIndex, token: SyntaxKind) -> Option<TextRange> {
        self.token_source_map_ranges(node)
            .and_then(|ranges| ranges.get(&(token as u16)).copied())
    }

    /// Record a token range override. The first write for a node clones any
    /// inherited token-range mapping so the original's mapping stays intact.
    pub fn set_token_source_map_range(
        &mut self,
        node: NodeIndex,
        token: SyntaxKind,
        range: TextRange,
    ) {
        self.assert_overlay_writable();
        let needs_seed = self
            .emit_options
            .get(&node)
            .and_then(|options| options.token_source_map_ranges.as_ref())
            .is_none();
        let seed = if needs_seed {
            Some(
                self.token_source_map_ranges(node)
                    .cloned()
                    .unwrap_or_default(),
            )
        } else {
            None
        };

        let options = self.emit_options.entry(node).or_default();
        if let Some(seed) = seed {
            options.token_source_map_ranges = Some(seed);
        }
        options
            .token_source_map_ranges
            .get_or_insert_with(FxHashMap::default)
            .insert(token as u16, range);
    }

    /// The text range to use when emitting comments for a node.
    pub fn comment_range(&self, node: NodeIndex) -> TextRange {
        let mut current = node;
        while !current.is_none() {
            if let Some(options) = self.emit_options.get(&current) {
                if let Some(range) = options.comment_range {
                    return range;
                }
            }
            current = self.arena.original(current);
        }
        self.arena
            .get(node)
            .map_or(TextRange::default(), |n| TextRange::new(n.pos, n.end))
    }

    pub fn set_comment_range(&mut self, node: NodeIndex, range: TextRange) {
        self.assert_overlay_writable();
        self.emit_options.entry(node).or_default().comment_range = Some(range);
    }

    // ========================================================================
    // Lexical environment
    // ========================================================================

    /// Record a hoisted variable declaration for `name` within the current
    /// lexical environment.
    pub fn hoist_variable_declaration(&mut self, name: NodeIndex) {
        assert!(
            !self.lexical_environment_disabled,
            "Cannot modify the lexical environment during the print phase."
        );
        let declaration = self.arena.add_variable_declaration(
            0,
            0,
            VariableDeclarationData {
                name,
                type_annotation: NodeIndex::NONE,
                initializer: NodeIndex::NONE,
            },
        );
        self.hoisted_variable_declarations.push(declaration);
    }

    /// Record a hoisted function declaration within the current lexical
    /// environment.
    pub fn hoist_function_declaration(&mut self, declaration: NodeIndex) {
        assert!(
            !self.lexical_environment_disabled,
            "Cannot modify the lexical environment during the print phase."
        );
        self.hoisted_function_declarations.push(declaration);
    }

    /// Start a new lexical environment. The current hoisted declarations are
    /// pushed onto a stack and the current sequences reset. Stack slots are
    /// adjusted by offset rather than popped so allocated capacity is reused
    /// across frames.
    pub fn start_lexical_environment(&mut self) {
        assert!(
            !self.lexical_environment_disabled,
            "Cannot start a lexical environment during the print phase."
        );

        let offset = self.lexical_environment_stack_offset;
        let variables = mem::take(&mut self.hoisted_variable_declarations);
        let functions = mem::take(&mut self.hoisted_function_declarations);
        if self.variable_declarations_stack.len() == offset {
            self.variable_declarations_stack.push(variables);
            self.function_declarations_stack.push(functions);
        } else {
            self.variable_declarations_stack[offset] = variables;
            self.function_declarations_stack[offset] = functions;
        }
        self.lexical_environment_stack_offset += 1;
    }

    /// End a lexical environment, restoring the caller's hoisted sequences.
    /// Returns the statements synthesized from this frame's hoisted
    /// declarations: function declarations first, then a single combined
    /// variable statement. Empty when nothing was hoisted.
    pub fn end_lexical_environment(&mut self) -> Vec<NodeIndex> {
        assert!(
            !self.lexical_environment_disabled,
            "Cannot end a lexical environment during the print phase."
        );
        assert!(
            self.lexical_environment_stack_offset > 0,
            "end_lexical_environment called without a matching start_lexical_environment."
        );

        let mut statements = Vec::new();
        statements.extend_from_slice(&self.hoisted_function_declarations);
        if !self.hoisted_variable_declarations.is_empty() {
            let declarations = NodeList::new(self.hoisted_variable_declarations.clone());
            let declaration_list = self.arena.add_variable_declaration_list(
                0,
                0,
                VariableData { declarations },
                NodeFlags::empty(),
            );
            let statement = self.arena.add_variable_statement(
                0,
                0,
                VariableStatementData {
                    modifiers: None,
                    declaration_list,
                },
            );
            statements.push(statement);
        }

        // Restore the previous environment, recycling the finished frame's
        // storage into the stack slot.
        self.lexical_environment_stack_offset -= 1;
        let offset = self.lexical_environment_stack_offset;
        let mut finished = mem::replace(
            &mut self.hoisted_variable_declarations,
            mem::take(&mut self.variable_declarations_stack[offset]),
        );
        finished.clear();
        self.variable_declarations_stack[offset] = finished;
        let mut finished = mem::replace(
            &mut self.hoisted_function_declarations,
            mem::take(&mut self.function_declarations_stack[offset]),
        );
        finished.clear();
        self.function_declarations_stack[offset] = finished;

        statements
    }

    // ========================================================================
    // Substitution and emit notification
    // ========================================================================

    /// Enable node substitution in the printer for the given syntax kind.
    /// Intended to run during pass initialization.
    pub fn enable_substitution(&mut self, kind: SyntaxKind) {
        self.enabled_features[kind as usize].insert(SyntaxKindFeatureFlags::SUBSTITUTION);
    }

    /// Whether substitution is enabled for the given node's kind.
    pub fn is_substitution_enabled(&self, node: NodeIndex) -> bool {
        self.enabled_features[self.arena.kind(node) as usize]
            .contains(SyntaxKindFeatureFlags::SUBSTITUTION)
    }

    /// Enable emit notifications in the printer for the given syntax kind.
    pub fn enable_emit_notification(&mut self, kind: SyntaxKind) {
        self.enabled_features[kind as usize].insert(SyntaxKindFeatureFlags::EMIT_NOTIFICATIONS);
    }

    /// Whether an emit notification should be raised for the given node:
    /// either its kind has notification interest or the node itself carries
    /// the advise-on-emit flag.
    pub fn is_emit_notification_enabled(&self, node: NodeIndex) -> bool {
        self.enabled_features[self.arena.kind(node) as usize]
            .contains(SyntaxKindFeatureFlags::EMIT_NOTIFICATIONS)
            || self
                .node_emit_flags(node)
                .is_some_and(|flags| flags.contains(NodeEmitFlags::ADVISE_ON_EMIT))
    }

    /// Override the substitution hook. Later registrations win outright.
    pub fn set_on_substitute_node(&mut self, hook: SubstituteNodeHook) {
        self.on_substitute_node = Some(hook);
    }

    /// Dispatch node substitution. Without a registered hook this is the
    /// identity. The hook handle is cloned out of the slot for the call, so
    /// a hook that triggers a nested substitution query dispatches to the
    /// registered hook rather than the default, and a re-registration during
    /// the call lands in the slot for every dispatch after it.
    pub fn on_substitute_node(&mut self, node: NodeIndex, is_expression: bool) -> NodeIndex {
        match self.on_substitute_node.clone() {
            Some(hook) => hook(self, node, is_expression),
            None => node,
        }
    }

    /// Override the emit-notification hook. Later registrations win outright.
    pub fn set_on_emit_node(&mut self, hook: EmitNodeHook) {
        self.on_emit_node = Some(hook);
    }

    /// Dispatch an emit notification around `emit`. Lexical environment
    /// modifications are disabled for the duration of the callback and the
    /// prior guard state restored afterwards, so nested notifications cannot
    /// permanently disable hoisting for an ancestor phase. The guard is
    /// managed here, not in the hook, so an overriding pass cannot corrupt
    /// phase discipline.
    pub fn on_emit_node(
        &mut self,
        node: NodeIndex,
        emit: &mut dyn FnMut(&mut TransformContext, NodeIndex),
    ) {
        let saved = self.lexical_environment_disabled;
        self.lexical_environment_disabled = true;
        match self.on_emit_node.clone() {
            Some(hook) => hook(self, node, emit),
            None => emit(self, node),
        }
        self.lexical_environment_disabled = saved;
    }
}
