//! Render scopes, remembered descriptors and the ambient resolution context.

use std::sync::Arc;

use textres_core::{ResolutionContext, ResolveError, TextDescriptor};
use tracing::debug;

use crate::reactive::{ObserverId, ReactiveGraph, Signal};
use crate::slots::SlotTable;

/// Resolution context shared by every scope of a [`Composer`].
pub type SharedContext = Arc<dyn ResolutionContext + Send + Sync>;

fn same_context(a: &SharedContext, b: &SharedContext) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

/// Owner of the reactive graph, the ambient resolution context and the
/// render scopes built on them.
pub struct Composer {
    graph: ReactiveGraph,
    context: SharedContext,
    /// Bumped whenever `context` is replaced; scopes subscribe to it.
    context_generation: Signal<u64>,
}

impl Composer {
    pub fn new(context: SharedContext) -> Self {
        let mut graph = ReactiveGraph::new();
        let context_generation = graph.create_signal(0u64);
        Self {
            graph,
            context,
            context_generation,
        }
    }

    pub fn graph(&self) -> &ReactiveGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut ReactiveGraph {
        &mut self.graph
    }

    /// The ambient context, read without subscribing.
    pub fn resolution_context(&self) -> SharedContext {
        Arc::clone(&self.context)
    }

    /// Replace the ambient context (e.g. after a locale change).
    ///
    /// Every scope that read the context during its last pass becomes dirty.
    /// Setting the same `Arc` again is a no-op.
    pub fn set_resolution_context(&mut self, context: SharedContext) {
        if same_context(&self.context, &context) {
            return;
        }
        let generation = self.graph.peek(self.context_generation).unwrap_or(0) + 1;
        debug!(generation, "Composer::set_resolution_context");
        self.context = context;
        self.graph.set(self.context_generation, generation);
    }

    pub fn create_state<T: Send + 'static>(&mut self, value: T) -> Signal<T> {
        self.graph.create_signal(value)
    }

    pub fn set_state<T: Send + 'static>(&mut self, state: Signal<T>, value: T) {
        self.graph.set(state, value);
    }

    pub fn state<T: Clone + 'static>(&self, state: Signal<T>) -> Option<T> {
        self.graph.peek(state)
    }

    pub fn create_scope(&mut self) -> RenderScope {
        RenderScope {
            observer: self.graph.create_observer(),
            slots: SlotTable::default(),
            passes: 0,
        }
    }

    pub fn dispose_scope(&mut self, scope: RenderScope) {
        self.graph.dispose_observer(scope.observer);
    }

    /// Whether `scope` has never rendered or read a signal that changed since.
    pub fn needs_render(&self, scope: &RenderScope) -> bool {
        scope.passes == 0 || self.graph.is_dirty(scope.observer)
    }

    /// Run one render pass of `scope`.
    ///
    /// The pass is a tracking epoch: dependencies from the previous pass are
    /// dropped and replaced by whatever `content` reads. Panics and errors from
    /// `content` propagate to the caller.
    pub fn render<R>(
        &mut self,
        scope: &mut RenderScope,
        content: impl FnOnce(&mut RenderCx<'_>) -> R,
    ) -> R {
        self.graph.begin_tracking(scope.observer);
        scope.slots.begin_pass();

        let out = {
            let mut cx = RenderCx {
                graph: &mut self.graph,
                context: &self.context,
                context_generation: self.context_generation,
                slots: &mut scope.slots,
            };
            content(&mut cx)
        };

        scope.slots.end_pass();
        self.graph.end_tracking(scope.observer);
        scope.passes += 1;
        out
    }
}

/// Per-scope render state: the observer that tracks its reads and the slot
/// table holding its remembered values.
pub struct RenderScope {
    observer: ObserverId,
    slots: SlotTable,
    passes: u64,
}

impl RenderScope {
    /// Number of completed render passes.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Forget every remembered value; the next pass starts a new epoch.
    pub fn reset(&mut self) {
        self.slots.clear();
    }

    pub fn remembered_len(&self) -> usize {
        self.slots.len()
    }
}

/// Handle passed to content during a render pass.
pub struct RenderCx<'a> {
    graph: &'a mut ReactiveGraph,
    context: &'a SharedContext,
    context_generation: Signal<u64>,
    slots: &'a mut SlotTable,
}

impl RenderCx<'_> {
    /// Remember a value for the lifetime of the scope.
    pub fn remember<T, F>(&mut self, factory: F) -> T
    where
        T: Clone + Send + 'static,
        F: FnOnce() -> T,
    {
        self.slots.remember((), factory)
    }

    /// Remember a value until `keys` differs from the previous pass.
    ///
    /// Use a tuple, array or `Vec` for several keys; comparison is then order
    /// and arity sensitive. A key of a different type also invalidates.
    pub fn remember_keyed<K, T, F>(&mut self, keys: K, factory: F) -> T
    where
        K: PartialEq + Send + 'static,
        T: Clone + Send + 'static,
        F: FnOnce() -> T,
    {
        self.slots.remember(keys, factory)
    }

    /// Build a descriptor once and return the same instance on every pass.
    ///
    /// ```rust
    /// # use std::sync::Arc;
    /// # use textres_core::{ResourceId, ResourceTable, TextDescriptor};
    /// # use textres_reactive::Composer;
    /// # use unic_langid::langid;
    /// const TITLE: ResourceId = ResourceId::from_static("app_title");
    ///
    /// let table = Arc::new(ResourceTable::builder().string(TITLE, "Inbox").build());
    /// let mut composer = Composer::new(Arc::new(table.localized(langid!("en"))));
    /// let mut scope = composer.create_scope();
    ///
    /// let text = composer.render(&mut scope, |cx| {
    ///     let title = cx.remember_descriptor(|| TextDescriptor::resource(TITLE));
    ///     cx.resolve(&title)
    /// });
    /// assert_eq!(text.unwrap(), "Inbox");
    /// ```
    pub fn remember_descriptor<F>(&mut self, factory: F) -> TextDescriptor
    where
        F: FnOnce() -> TextDescriptor,
    {
        self.slots.remember((), factory)
    }

    /// Like [`remember_descriptor`](Self::remember_descriptor), rebuilt
    /// exactly once whenever `keys` changes.
    pub fn remember_descriptor_keyed<K, F>(&mut self, keys: K, factory: F) -> TextDescriptor
    where
        K: PartialEq + Send + 'static,
        F: FnOnce() -> TextDescriptor,
    {
        self.slots.remember(keys, factory)
    }

    /// Fallible variant; an error is returned as-is and nothing is remembered.
    pub fn try_remember_descriptor_keyed<K, E, F>(
        &mut self,
        keys: K,
        factory: F,
    ) -> Result<TextDescriptor, E>
    where
        K: PartialEq + Send + 'static,
        F: FnOnce() -> Result<TextDescriptor, E>,
    {
        self.slots.try_remember(keys, factory)
    }

    /// Read application state, subscribing this scope to it.
    pub fn get<T: Clone + 'static>(&mut self, state: Signal<T>) -> Option<T> {
        self.graph.get(state)
    }

    /// The ambient resolution context. Reading it subscribes this scope, so
    /// replacing the context re-runs the scope.
    pub fn resolution_context(&mut self) -> SharedContext {
        self.graph.track(self.context_generation.id());
        Arc::clone(self.context)
    }

    /// Resolve `descriptor` against the ambient context.
    pub fn resolve(&mut self, descriptor: &TextDescriptor) -> Result<String, ResolveError> {
        let context = self.resolution_context();
        descriptor.resolve(&*context)
    }
}

/// Resolve inside a render pass, as an extension on descriptors.
pub trait ResolveInScope {
    fn resolve_in(&self, cx: &mut RenderCx<'_>) -> Result<String, ResolveError>;
}

impl ResolveInScope for TextDescriptor {
    fn resolve_in(&self, cx: &mut RenderCx<'_>) -> Result<String, ResolveError> {
        cx.resolve(self)
    }
}

/// A composer with a single scope and stored content.
///
/// The content runs once on creation; [`recompose`](Self::recompose) re-runs
/// it only when something it read has changed.
pub struct Composition<O> {
    composer: Composer,
    scope: RenderScope,
    content: Box<dyn FnMut(&mut RenderCx<'_>) -> O>,
    output: O,
}

impl<O> Composition<O> {
    /// Compose `content` in a fresh composer over `context`.
    pub fn from_context<F>(context: SharedContext, content: F) -> Self
    where
        F: FnMut(&mut RenderCx<'_>) -> O + 'static,
    {
        Self::new(Composer::new(context), content)
    }

    /// Compose `content` in `composer`, whose state signals it may read.
    pub fn new<F>(mut composer: Composer, content: F) -> Self
    where
        F: FnMut(&mut RenderCx<'_>) -> O + 'static,
    {
        let mut scope = composer.create_scope();
        let mut content: Box<dyn FnMut(&mut RenderCx<'_>) -> O> = Box::new(content);
        let output = composer.render(&mut scope, |cx| content(cx));
        Self {
            composer,
            scope,
            content,
            output,
        }
    }

    /// Latest output of the content.
    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn composer(&mut self) -> &mut Composer {
        &mut self.composer
    }

    pub fn scope(&self) -> &RenderScope {
        &self.scope
    }

    pub fn set_resolution_context(&mut self, context: SharedContext) {
        self.composer.set_resolution_context(context);
    }

    pub fn set_state<T: Send + 'static>(&mut self, state: Signal<T>, value: T) {
        self.composer.set_state(state, value);
    }

    pub fn needs_recompose(&self) -> bool {
        self.composer.needs_render(&self.scope)
    }

    /// Re-run the content if it is dirty. Returns whether it ran.
    pub fn recompose(&mut self) -> bool {
        if !self.needs_recompose() {
            return false;
        }
        let content = &mut self.content;
        self.output = self.composer.render(&mut self.scope, |cx| content(cx));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use textres_core::{ResourceId, ResourceTable};
    use unic_langid::langid;

    const HELLO: ResourceId = ResourceId::from_static("hello");

    fn contexts() -> (SharedContext, SharedContext) {
        let table = Arc::new(
            ResourceTable::builder()
                .string(HELLO, "Hello")
                .localized_string(langid!("fr"), HELLO, "Bonjour")
                .build(),
        );
        (
            Arc::new(table.localized(langid!("en"))),
            Arc::new(table.localized(langid!("fr"))),
        )
    }

    #[test]
    fn test_new_scope_needs_render() {
        let (en, _) = contexts();
        let mut composer = Composer::new(en);
        let mut scope = composer.create_scope();

        assert!(composer.needs_render(&scope));
        composer.render(&mut scope, |_| ());
        assert!(!composer.needs_render(&scope));
        assert_eq!(scope.passes(), 1);
    }

    #[test]
    fn test_context_swap_dirties_readers_only() {
        let (en, fr) = contexts();
        let mut composer = Composer::new(en);
        let mut reader = composer.create_scope();
        let mut bystander = composer.create_scope();

        let text = composer.render(&mut reader, |cx| {
            cx.resolve(&TextDescriptor::resource(HELLO))
        });
        assert_eq!(text.unwrap(), "Hello");
        composer.render(&mut bystander, |cx| cx.remember(|| 1));

        composer.set_resolution_context(fr);
        assert!(composer.needs_render(&reader));
        assert!(!composer.needs_render(&bystander));

        let text = composer.render(&mut reader, |cx| {
            TextDescriptor::resource(HELLO).resolve_in(cx)
        });
        assert_eq!(text.unwrap(), "Bonjour");
    }

    #[test]
    fn test_same_context_is_noop() {
        let (en, _) = contexts();
        let mut composer = Composer::new(Arc::clone(&en));
        let mut scope = composer.create_scope();
        composer.render(&mut scope, |cx| {
            cx.resolution_context();
        });

        composer.set_resolution_context(en);
        assert!(!composer.needs_render(&scope));
    }

    #[test]
    fn test_reset_forgets_remembered_values() {
        let (en, _) = contexts();
        let mut composer = Composer::new(en);
        let mut scope = composer.create_scope();
        let mut calls = 0;

        for _ in 0..2 {
            composer.render(&mut scope, |cx| {
                cx.remember(|| {
                    calls += 1;
                    calls
                })
            });
        }
        assert_eq!(calls, 1);
        assert_eq!(scope.remembered_len(), 1);

        scope.reset();
        assert_eq!(scope.remembered_len(), 0);
        composer.render(&mut scope, |cx| {
            cx.remember(|| {
                calls += 1;
                calls
            })
        });
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_composition_recomposes_on_state() {
        let (en, _) = contexts();
        let mut composer = Composer::new(en);
        let count = composer.create_state(1u32);
        let mut composition = Composition::new(composer, move |cx| cx.get(count).unwrap_or(0) * 10);

        assert_eq!(*composition.output(), 10);
        assert!(!composition.recompose());

        composition.set_state(count, 4);
        assert!(composition.recompose());
        assert_eq!(*composition.output(), 40);
        assert_eq!(composition.scope().passes(), 2);
    }
}
