/// Route metadata of a procedure: how it travels over HTTP.
///
/// `method` stays a plain string since contracts may carry methods the
/// transport does not recognize; resolving it is left to the consumer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Route {
    pub method: Option<String>,
    pub path: Option<String>,
    pub summary: Option<String>,
    pub tags: Vec<String>,
}

impl Route {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}
