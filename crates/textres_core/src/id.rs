use std::borrow::Cow;
use std::fmt;

/// Opaque key of a localized template.
///
/// Ids are usually declared once as constants next to the resources they name:
///
/// ```
/// use textres_core::ResourceId;
///
/// pub const GREETING: ResourceId = ResourceId::from_static("greeting");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(Cow<'static, str>);

impl ResourceId {
    pub const fn from_static(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }

    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ResourceId {
    fn from(key: &'static str) -> Self {
        Self::from_static(key)
    }
}

impl From<String> for ResourceId {
    fn from(key: String) -> Self {
        Self(Cow::Owned(key))
    }
}

impl From<&ResourceId> for ResourceId {
    fn from(id: &ResourceId) -> Self {
        id.clone()
    }
}
