//! Shader templates with named insertion points.
//!
//! A base template is a static list of [`Segment`]s. Material-specific code
//! is supplied as [`ShaderChunks`] keyed by [`InsertionPoint`], and
//! [`compose`] stitches the two together. Every slot in the template must be
//! filled and every supplied chunk must have a slot.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Where a chunk of shader code can be spliced into a base template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InsertionPoint {
    /// Module scope: helper functions and constants.
    Common,
    /// Start of the vertex stage, may rewrite `pos` and `normal`.
    BeginVertex,
    /// After the world position is known, may rewrite `world_pos`.
    WorldVertex,
    /// Fragment stage, may rewrite `color`.
    ColorFragment,
}

impl InsertionPoint {
    pub fn name(self) -> &'static str {
        match self {
            InsertionPoint::Common => "common",
            InsertionPoint::BeginVertex => "begin_vertex",
            InsertionPoint::WorldVertex => "world_vertex",
            InsertionPoint::ColorFragment => "color_fragment",
        }
    }
}

impl fmt::Display for InsertionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Text(&'static str),
    Slot(InsertionPoint),
}

/// A named base shader.
#[derive(Debug, Clone, Copy)]
pub struct ShaderTemplate {
    pub name: &'static str,
    pub segments: &'static [Segment],
}

impl ShaderTemplate {
    pub fn slots(&self) -> impl Iterator<Item = InsertionPoint> + '_ {
        self.segments.iter().filter_map(|s| match s {
            Segment::Slot(p) => Some(*p),
            Segment::Text(_) => None,
        })
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ShaderError {
    #[error("template `{template}` has no chunk for `{point}`")]
    MissingChunk {
        template: &'static str,
        point: InsertionPoint,
    },
    #[error("template `{template}` has no `{point}` slot for the supplied chunk")]
    UnusedChunk {
        template: &'static str,
        point: InsertionPoint,
    },
}

/// Code to splice into a template, one chunk per insertion point.
#[derive(Debug, Clone, Default)]
pub struct ShaderChunks {
    chunks: BTreeMap<InsertionPoint, Cow<'static, str>>,
}

impl ShaderChunks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, point: InsertionPoint, code: impl Into<Cow<'static, str>>) -> Self {
        self.chunks.insert(point, code.into());
        self
    }

    pub fn get(&self, point: InsertionPoint) -> Option<&str> {
        self.chunks.get(&point).map(|c| c.as_ref())
    }
}

/// Assemble `template` with `chunks` into a complete shader source.
pub fn compose(template: &ShaderTemplate, chunks: &ShaderChunks) -> Result<String, ShaderError> {
    for point in chunks.chunks.keys() {
        if !template.slots().any(|p| p == *point) {
            return Err(ShaderError::UnusedChunk {
                template: template.name,
                point: *point,
            });
        }
    }

    let mut out = String::new();
    for segment in template.segments {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Slot(point) => {
                let code = chunks.get(*point).ok_or(ShaderError::MissingChunk {
                    template: template.name,
                    point: *point,
                })?;
                out.push_str("// <");
                out.push_str(point.name());
                out.push_str(">\n");
                out.push_str(code);
                out.push('\n');
            }
        }
    }
    tracing::trace!(template = template.name, bytes = out.len(), "composed shader");
    Ok(out)
}
