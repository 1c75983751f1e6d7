//! Requesting devices
//!
//! The streaming layer describes a renderer through [`Device`]; only the
//! advertised mime types matter here.

/// A client device browsing the tree
pub trait Device: Send + Sync {
    /// Mime type patterns the device can render, `None` when unrestricted
    fn supported_mime_types(&self) -> Option<&[String]>;
}

/// Static device description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceProfile {
    pub name: String,
    pub mime_types: Option<Vec<String>>,
}

impl DeviceProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime_types: None,
        }
    }

    pub fn with_mime_types<I, S>(mut self, mime_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.mime_types = Some(mime_types.into_iter().map(Into::into).collect());
        self
    }
}

impl Device for DeviceProfile {
    fn supported_mime_types(&self) -> Option<&[String]> {
        self.mime_types.as_deref()
    }
}
