//! Flat catalog of bindable fields.

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::coerce;
use crate::error::Error;
use crate::key;
use crate::tag::DirectiveSet;
use crate::types::{Bindable, DeclaredType};

/// A struct-valued field that was expanded during the walk.
///
/// Embedded fields produce `transparent` nodes: they stay in the chain but
/// contribute no path segment and are skipped by [`Lineage::parent`].
#[derive(Debug)]
pub struct Lineage {
    name: &'static str,
    directives: DirectiveSet,
    transparent: bool,
    parent: Option<Rc<Lineage>>,
}

impl Lineage {
    pub(crate) fn new(
        name: &'static str,
        directives: DirectiveSet,
        transparent: bool,
        parent: Option<Rc<Lineage>>,
    ) -> Self {
        Self {
            name,
            directives,
            transparent,
            parent,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn directives(&self) -> &DirectiveSet {
        &self.directives
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    /// Nearest non-transparent ancestor.
    pub fn parent(&self) -> Option<&Lineage> {
        nearest_visible(self.parent.as_deref())
    }

    fn push_segments(&self, path: &mut Vec<&'static str>) {
        if let Some(parent) = &self.parent {
            parent.push_segments(path);
        }
        if !self.transparent {
            path.push(self.name);
        }
    }
}

fn nearest_visible(mut node: Option<&Lineage>) -> Option<&Lineage> {
    while let Some(current) = node {
        if !current.transparent {
            return Some(current);
        }
        node = current.parent.as_deref();
    }
    None
}

/// One bindable leaf field.
///
/// Keys are derived from the lineage and directives on every call.
pub struct FieldDescriptor<'a> {
    name: &'static str,
    directives: DirectiveSet,
    parent: Option<Rc<Lineage>>,
    handle: &'a mut dyn Bindable,
}

impl<'a> FieldDescriptor<'a> {
    pub(crate) fn new(
        name: &'static str,
        directives: DirectiveSet,
        parent: Option<Rc<Lineage>>,
        handle: &'a mut dyn Bindable,
    ) -> Self {
        Self {
            name,
            directives,
            parent,
            handle,
        }
    }

    /// Declared field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn directives(&self) -> &DirectiveSet {
        &self.directives
    }

    /// Enclosing struct field, `None` for root-level fields.
    pub fn parent(&self) -> Option<&Lineage> {
        nearest_visible(self.parent.as_deref())
    }

    /// Field names from the root down to this field, embedded fields excluded.
    pub fn path(&self) -> Vec<&'static str> {
        let mut path = Vec::new();
        if let Some(parent) = &self.parent {
            parent.push_segments(&mut path);
        }
        path.push(self.name);
        path
    }

    pub fn env_key(&self) -> String {
        key::env_key(&self.path(), &self.directives)
    }

    pub fn flag_key(&self) -> String {
        key::flag_key(&self.path(), &self.directives)
    }

    pub fn default_value(&self) -> &str {
        key::default_value(&self.directives)
    }

    /// Declared type of the storage behind [`handle`](Self::handle).
    pub fn declared_type(&self) -> DeclaredType {
        self.handle.declared_type()
    }

    pub fn handle(&mut self) -> &mut (dyn Bindable + 'a) {
        &mut *self.handle
    }

    /// Coerce `raw` into this field.
    pub fn coerce(&mut self, raw: &str) -> Result<(), Error> {
        let declared = self.handle.declared_type();
        coerce::coerce(&mut *self.handle, &declared, raw)
    }

    pub fn summary(&self) -> FieldSummary {
        FieldSummary {
            path: self.path().join("."),
            declared_type: self.declared_type().to_string(),
            env_key: self.env_key(),
            flag_key: self.flag_key(),
            default_value: self
                .directives
                .default_value()
                .map(ToString::to_string),
        }
    }
}

impl fmt::Debug for FieldDescriptor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("path", &self.path())
            .field("declared_type", &self.declared_type())
            .field("directives", &self.directives)
            .finish()
    }
}

/// Serializable view of a descriptor, for help output or diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSummary {
    pub path: String,
    pub declared_type: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub env_key: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub flag_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// Ordered descriptors for every bindable leaf of a struct.
#[derive(Debug)]
pub struct Catalog<'a> {
    fields: Vec<FieldDescriptor<'a>>,
}

impl<'a> Catalog<'a> {
    pub(crate) fn new(fields: Vec<FieldDescriptor<'a>>) -> Self {
        Self { fields }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FieldDescriptor<'a>> {
        self.fields.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut FieldDescriptor<'a>> {
        self.fields.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor<'a>> {
        self.fields.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, FieldDescriptor<'a>> {
        self.fields.iter_mut()
    }

    /// Descriptor whose env key equals `key`.
    pub fn by_env_key(&mut self, key: &str) -> Option<&mut FieldDescriptor<'a>> {
        if key.is_empty() {
            return None;
        }
        self.fields.iter_mut().find(|f| f.env_key() == key)
    }

    /// Descriptor whose flag key equals `key`.
    pub fn by_flag_key(&mut self, key: &str) -> Option<&mut FieldDescriptor<'a>> {
        if key.is_empty() {
            return None;
        }
        self.fields.iter_mut().find(|f| f.flag_key() == key)
    }

    pub fn summary(&self) -> Vec<FieldSummary> {
        self.fields.iter().map(FieldDescriptor::summary).collect()
    }
}

impl<'a> IntoIterator for Catalog<'a> {
    type Item = FieldDescriptor<'a>;
    type IntoIter = std::vec::IntoIter<FieldDescriptor<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<'c, 'a> IntoIterator for &'c mut Catalog<'a> {
    type Item = &'c mut FieldDescriptor<'a>;
    type IntoIter = std::slice::IterMut<'c, FieldDescriptor<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter_mut()
    }
}

impl<'c, 'a> IntoIterator for &'c Catalog<'a> {
    type Item = &'c FieldDescriptor<'a>;
    type IntoIter = std::slice::Iter<'c, FieldDescriptor<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
