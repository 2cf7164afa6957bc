//! `!secret:<key>` substitution over a deserialized target.

use crate::deps::Dependencies;
use crate::error::Error;
use crate::field::{Configure, FieldDescriptor, FieldSlot, FieldTags, FieldVisitor, NestedSlot};
use crate::provider::SecretSource;
use crate::report::{LoadReport, Origin};

/// Prefix marking a string value as a secret reference.
pub const SECRET_MARKER: &str = "!secret:";

/// Replaces secret references in an already populated target.
///
/// Only `secret` fields holding a string that starts with [`SECRET_MARKER`]
/// are touched; the rest of the marker is the key looked up in the secret
/// source, and the secret is coerced into the field. Any other value,
/// including plain strings on `secret` fields, is left as it is.
///
/// Nested structs, present optional structs and every element of nested
/// sequences are visited. Each struct's lifecycle runs after its fields;
/// `init_with` is not run, since the document already built the structure.
pub struct SecretFiller<'a> {
    secrets: Option<&'a dyn SecretSource>,
    deps: &'a Dependencies,
    path: Vec<String>,
    report: LoadReport,
}

impl<'a> SecretFiller<'a> {
    /// A filler resolving references against `secrets`.
    ///
    /// Without a source every reference is unresolvable.
    #[must_use]
    pub fn new(secrets: Option<&'a dyn SecretSource>, deps: &'a Dependencies) -> Self {
        Self {
            secrets,
            deps,
            path: Vec::new(),
            report: LoadReport::new(),
        }
    }

    /// Walks `target`, returning the substituted fields.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedSecretRef`] for a marker with more than one `:`,
    /// [`Error::Required`] for a key the source does not hold, and any
    /// coercion or hook failure.
    pub fn process(mut self, target: &mut dyn Configure) -> Result<LoadReport, Error> {
        self.process_node(target)?;

        tracing::debug!(substituted = self.report.len(), "secret references resolved");

        Ok(self.report)
    }

    fn process_node(&mut self, node: &mut dyn Configure) -> Result<(), Error> {
        node.visit_fields(self)?;

        let name = node.type_name();
        node.lifecycle().run(self.deps, name)
    }

    fn descend(&mut self, segment: String, node: &mut dyn Configure) -> Result<(), Error> {
        self.path.push(segment);
        let result = self.process_node(node);
        self.path.pop();

        result
    }

    fn path_of(&self, name: &str) -> String {
        let mut segments = self.path.clone();
        segments.push(name.to_owned());
        segments.join(".")
    }
}

/// Splits `!secret:KEY` into `KEY`.
///
/// Returns `Ok(None)` for values that are not references.
fn parse_reference(value: &str) -> Result<Option<&str>, ()> {
    if !value.starts_with(SECRET_MARKER) {
        return Ok(None);
    }

    let mut parts = value.split(':');
    // "!secret" precedes the first ':'
    let _ = parts.next();
    let key = parts.next().unwrap_or_default();

    if parts.next().is_some() {
        return Err(());
    }

    Ok(Some(key))
}

impl FieldVisitor for SecretFiller<'_> {
    fn visit_value(
        &mut self,
        tags: &'static FieldTags,
        slot: &mut dyn FieldSlot,
    ) -> Result<(), Error> {
        if tags.ignored || !tags.secret {
            return Ok(());
        }

        let Some(current) = slot.as_str().map(str::to_owned) else {
            return Ok(());
        };

        let path = self.path_of(tags.name);
        let key = match parse_reference(&current) {
            Ok(Some(key)) => key,
            Ok(None) => return Ok(()),
            Err(()) => {
                return Err(Error::MalformedSecretRef {
                    field: path,
                    value: current,
                });
            }
        };

        let secret = self
            .secrets
            .and_then(|secrets| secrets.get_by_name(key))
            .ok_or_else(|| Error::required(path.as_str(), Some(key)))?;

        let record = FieldDescriptor::new(tags, slot)
            .resolved(secret, Origin::SecretRef(key.to_owned()))
            .apply(path)?;

        tracing::debug!(field = %record.path, key, "secret reference substituted");

        self.report.push(record);

        Ok(())
    }

    fn visit_nested(
        &mut self,
        tags: &'static FieldTags,
        node: &mut dyn Configure,
    ) -> Result<(), Error> {
        if tags.ignored {
            return Ok(());
        }

        self.descend(tags.name.to_owned(), node)
    }

    fn visit_optional(
        &mut self,
        tags: &'static FieldTags,
        slot: &mut dyn NestedSlot,
    ) -> Result<(), Error> {
        match slot.get() {
            Some(node) => self.visit_nested(tags, node),
            None => Ok(()),
        }
    }

    fn visit_element(
        &mut self,
        tags: &'static FieldTags,
        index: usize,
        node: &mut dyn Configure,
    ) -> Result<(), Error> {
        if tags.ignored {
            return Ok(());
        }

        self.descend(format!("{}[{index}]", tags.name), node)
    }
}
