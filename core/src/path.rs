//! Resource path accumulation.
//!
//! A `PathBuilder` starts from one resource name and only ever grows:
//! segments are appended in call order and never removed. Each builder
//! belongs to exactly one request.

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathBuilder {
    segments: Vec<String>,
}

impl PathBuilder {
    /// Start a fresh path at `resource`.
    pub fn new(resource: impl Into<String>) -> Result<Self, Error> {
        let resource = resource.into();
        check(&resource)?;
        Ok(Self {
            segments: vec![resource],
        })
    }

    /// Append one segment.
    pub fn push(mut self, segment: impl Into<String>) -> Result<Self, Error> {
        let segment = segment.into();
        check(&segment)?;
        self.segments.push(segment);
        Ok(self)
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The resource path relative to the API root, e.g. `tasks/abc123`.
    pub fn path(&self) -> String {
        self.segments.join("/")
    }

    /// Join the path onto `base_url`, which must end in `/`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{base_url}{}", self.path())
    }
}

fn check(segment: &str) -> Result<(), Error> {
    if segment.is_empty() {
        return Err(Error::InvalidSegment(segment.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://onfleet.com/api/v2/";

    #[test]
    fn single_resource_url() {
        let path = PathBuilder::new("tasks").unwrap();
        assert_eq!(path.url(BASE), "https://onfleet.com/api/v2/tasks");
    }

    #[test]
    fn segments_join_in_call_order() {
        let path = PathBuilder::new("tasks").unwrap().push("abc123").unwrap();
        assert_eq!(path.url(BASE), "https://onfleet.com/api/v2/tasks/abc123");

        let path = PathBuilder::new("workers")
            .and_then(|p| p.push("w1"))
            .and_then(|p| p.push("tasks"))
            .unwrap();
        assert_eq!(path.segments(), ["workers", "w1", "tasks"]);
        assert_eq!(path.path(), "workers/w1/tasks");
    }

    #[test]
    fn empty_segment_is_rejected() {
        let err = PathBuilder::new("tasks").unwrap().push("").unwrap_err();
        assert!(matches!(err, Error::InvalidSegment(s) if s.is_empty()));
        assert!(matches!(PathBuilder::new(""), Err(Error::InvalidSegment(_))));
    }

    #[test]
    fn builders_are_independent() {
        let base = PathBuilder::new("workers").unwrap();
        let one = base.clone().push("a").unwrap();
        let two = base.push("b").unwrap();
        assert_eq!(one.path(), "workers/a");
        assert_eq!(two.path(), "workers/b");
    }
}
