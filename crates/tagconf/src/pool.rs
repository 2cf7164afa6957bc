//! The field walker.
//!
//! A [`VariablePool`] populates one target per [`process`](VariablePool::process)
//! call. Per struct, in this order:
//!
//! 1. `init_with`, when the struct declares it
//! 2. every tagged field in declaration order, skipping `ignored` ones:
//!    nested structs are walked recursively (absent optional ones are
//!    allocated first); `secret` fields are read from the secret source;
//!    all other fields are read from the environment, falling back to their
//!    `default`
//! 3. `prepare_with` (only when dependencies were given) and `prepare`
//!
//! A `required` field with no value fails the walk. A non-required field
//! with no value keeps whatever it held before. On a fresh `Default` target
//! that is the zero value, which is the only guarantee for an optional unset
//! field without a default. Secret fields follow the same rule: a missing
//! secret is not coerced from `""` and the field is reported as
//! [`Origin::Unset`], so [`secret_count`](VariablePool::secret_count) does
//! not include it. The walk stops at the first error; fields already written
//! keep their new values.

use crate::deps::Dependencies;
use crate::error::Error;
use crate::field::{Configure, FieldDescriptor, FieldSlot, FieldTags, FieldVisitor};
use crate::lifecycle::run_init;
use crate::provider::{EnvSource, SecretSource};
use crate::report::{LoadReport, Origin, ResolvedField};

/// Per-call state of one load.
pub struct VariablePool<'a> {
    target: &'a mut dyn Configure,
    resolver: Resolver<'a>,
}

struct Resolver<'a> {
    env: &'a dyn EnvSource,
    secrets: Option<&'a dyn SecretSource>,
    deps: &'a Dependencies,
    path: Vec<String>,
    report: LoadReport,
}

impl<'a> VariablePool<'a> {
    /// Creates a pool for `target`.
    ///
    /// Without a secret source every `secret` field counts as missing.
    pub fn new(
        target: &'a mut dyn Configure,
        env: &'a dyn EnvSource,
        secrets: Option<&'a dyn SecretSource>,
        deps: &'a Dependencies,
    ) -> Self {
        Self {
            target,
            resolver: Resolver {
                env,
                secrets,
                deps,
                path: Vec::new(),
                report: LoadReport::new(),
            },
        }
    }

    /// Walks the target.
    ///
    /// The attribution of a previous call is discarded.
    ///
    /// # Errors
    ///
    /// The first missing required value, coercion failure or hook failure.
    pub fn process(&mut self) -> Result<(), Error> {
        self.resolver.report = LoadReport::new();
        self.resolver.path.clear();

        tracing::debug!(target_type = self.target.type_name(), "processing configuration");

        self.resolver.process_node(self.target)?;

        tracing::debug!(
            env = self.env_count(),
            secrets = self.secret_count(),
            fields = self.resolver.report.len(),
            "configuration processed"
        );

        Ok(())
    }

    /// Unsets the environment variables values were read from.
    ///
    /// Only variables that actually supplied a value are removed; defaults
    /// and secrets leave nothing to clear. Returns how many were removed.
    pub fn clear_env(&self) -> usize {
        let mut cleared = 0;

        for field in self.resolver.report.env_fields() {
            if let Some(key) = field.key {
                self.resolver.env.unset(key);
                cleared += 1;
            }
        }

        tracing::debug!(cleared, "environment cleared");

        cleared
    }

    /// Fields whose value was read from the environment.
    pub fn env_fields(&self) -> impl Iterator<Item = &ResolvedField> {
        self.resolver.report.env_fields()
    }

    /// Fields whose value was read from the secret source.
    pub fn secret_fields(&self) -> impl Iterator<Item = &ResolvedField> {
        self.resolver.report.secret_fields()
    }

    /// Number of fields read from the environment.
    #[must_use]
    pub fn env_count(&self) -> usize {
        self.env_fields().count()
    }

    /// Number of fields read from the secret source.
    #[must_use]
    pub fn secret_count(&self) -> usize {
        self.secret_fields().count()
    }

    /// Attribution of every visited field.
    #[must_use]
    pub const fn report(&self) -> &LoadReport {
        &self.resolver.report
    }

    /// Consumes the pool, returning the attribution.
    #[must_use]
    pub fn into_report(self) -> LoadReport {
        self.resolver.report
    }
}

impl Resolver<'_> {
    fn process_node(&mut self, node: &mut dyn Configure) -> Result<(), Error> {
        run_init(node, self.deps)?;
        node.visit_fields(self)?;

        let name = node.type_name();
        node.lifecycle().run(self.deps, name)
    }

    fn descend(&mut self, segment: String, node: &mut dyn Configure) -> Result<(), Error> {
        tracing::trace!(field = %segment, "descending into nested configuration");

        self.path.push(segment);
        let result = self.process_node(node);
        self.path.pop();

        result
    }

    fn path_of(&self, name: &str) -> String {
        if self.path.is_empty() {
            return name.to_owned();
        }

        let mut path = self.path.join(".");
        path.push('.');
        path.push_str(name);
        path
    }

    fn resolve_secret<'s>(
        &self,
        field: FieldDescriptor<'s>,
        path: &str,
    ) -> Result<FieldDescriptor<'s>, Error> {
        let tags = field.tags();
        let key = tags.secret_key();

        let value = match (key, self.secrets) {
            (Some(key), Some(secrets)) => secrets.get_by_name(key),
            _ => None,
        };

        match value {
            Some(value) => Ok(field.resolved(value, Origin::Secret)),
            None if tags.required => Err(Error::required(path, key)),
            None => Ok(field),
        }
    }

    fn resolve_env<'s>(
        &self,
        field: FieldDescriptor<'s>,
        path: &str,
    ) -> Result<FieldDescriptor<'s>, Error> {
        let tags = field.tags();
        let key = tags.env_key();

        let value = match key {
            Some(key) => self.env.lookup(key)?,
            None => None,
        };

        match (value, tags.default) {
            (Some(value), _) => Ok(field.resolved(value, Origin::Environment)),
            (None, Some(default)) => Ok(field.resolved(default.to_owned(), Origin::Default)),
            (None, None) if tags.required => Err(Error::required(path, key)),
            (None, None) => Ok(field),
        }
    }
}

impl FieldVisitor for Resolver<'_> {
    fn visit_value(
        &mut self,
        tags: &'static FieldTags,
        slot: &mut dyn FieldSlot,
    ) -> Result<(), Error> {
        if tags.ignored {
            return Ok(());
        }

        let path = self.path_of(tags.name);
        let field = FieldDescriptor::new(tags, slot);
        let field = if tags.secret {
            self.resolve_secret(field, &path)?
        } else {
            self.resolve_env(field, &path)?
        };

        let record = field.apply(path)?;

        tracing::debug!(
            field = %record.path,
            key = record.key.unwrap_or_default(),
            origin = %record.origin,
            "field resolved"
        );

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
