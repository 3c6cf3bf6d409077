use crate::args::FormatArg;
use crate::error::ResolveError;
use crate::id::ResourceId;

/// The lookup capability a descriptor is resolved against.
///
/// Implementations wrap whatever resource system the host platform has. The
/// crate ships one in-memory implementation,
/// [`LocalizedResources`](crate::LocalizedResources).
///
/// [`TextDescriptor::resolve`](crate::TextDescriptor::resolve) resolves nested
/// [`FormatArg::Text`] arguments before calling either method, but a custom
/// resolver may pass them through directly; implementations should resolve
/// them against themselves.
pub trait ResolutionContext {
    /// Look up the template at `id` and substitute `args` positionally.
    fn format_string(&self, id: &ResourceId, args: &[FormatArg]) -> Result<String, ResolveError>;

    /// Pick the template at `id` matching `quantity`, then substitute `args`.
    fn quantity_string(
        &self,
        id: &ResourceId,
        quantity: i64,
        args: &[FormatArg],
    ) -> Result<String, ResolveError>;
}

impl<C: ResolutionContext + ?Sized> ResolutionContext for &C {
    fn format_string(&self, id: &ResourceId, args: &[FormatArg]) -> Result<String, ResolveError> {
        (**self).format_string(id, args)
    }

    fn quantity_string(
        &self,
        id: &ResourceId,
        quantity: i64,
        args: &[FormatArg],
    ) -> Result<String, ResolveError> {
        (**self).quantity_string(id, quantity, args)
    }
}

impl<C: ResolutionContext + ?Sized> ResolutionContext for std::sync::Arc<C> {
    fn format_string(&self, id: &ResourceId, args: &[FormatArg]) -> Result<String, ResolveError> {
        (**self).format_string(id, args)
    }

    fn quantity_string(
        &self,
        id: &ResourceId,
        quantity: i64,
        args: &[FormatArg],
    ) -> Result<String, ResolveError> {
        (**self).quantity_string(id, quantity, args)
    }
}
