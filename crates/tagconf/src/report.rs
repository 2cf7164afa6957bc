//! Source attribution for resolved fields.
//!
//! Every field visited by a walk yields a [`ResolvedField`] recording the
//! key it was looked up under and where its value came from. A
//! [`LoadReport`] collects them in visit order.

use std::fmt::{self, Display, Formatter};

use crate::error::MaybeRedacted;

/// Where a field's value came from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Origin {
    /// Read from the environment.
    Environment,

    /// The `default` literal, after the environment lookup missed.
    Default,

    /// Read from the secret source.
    Secret,

    /// Substituted for a `!secret:<key>` marker in a JSON document.
    SecretRef(String),

    /// No value was found; the field kept its previous value.
    Unset,
}

impl Origin {
    /// Whether the value came from the secret source.
    #[must_use]
    pub const fn is_secret(&self) -> bool {
        matches!(self, Self::Secret | Self::SecretRef(_))
    }
}

impl Display for Origin {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => write!(f, "Environment variable"),

            Self::Default => write!(f, "Default value"),

            Self::Secret => write!(f, "Secret source"),

            Self::SecretRef(key) => write!(f, "Secret reference ({key})"),

            Self::Unset => write!(f, "Not set"),
        }
    }
}

/// The outcome for one field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedField {
    /// Dotted field path, e.g. `database.port`.
    pub path: String,

    /// The key the value was looked up under.
    pub key: Option<&'static str>,

    /// Where the value came from.
    pub origin: Origin,

    /// The raw value, redacted for secret fields. `Redacted` also stands in
    /// for "no value" when the field is unset.
    pub value: MaybeRedacted,
}

impl ResolvedField {
    pub(crate) fn new(
        path: String,
        key: Option<&'static str>,
        origin: Origin,
        raw: Option<&str>,
        secret: bool,
    ) -> Self {
        let value = raw.map_or(MaybeRedacted::Redacted, |raw| MaybeRedacted::new(raw, secret));

        Self {
            path,
            key,
            origin,
            value,
        }
    }
}

impl Display for ResolvedField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.origin)?;
        if let Some(key) = self.key {
            write!(f, " [{key}]")?;
        }
        Ok(())
    }
}

/// Per-field attribution of one load, in visit order.
///
/// # Display Output
///
/// ```text
/// Configuration Source:
/// --------------------------------------------------
///   driver         <- Environment variable [DATABASE_DRIVER]
///   port           <- Default value [DATABASE_PORT]
///   password       <- Secret source [DATABASE_PASSWORD]
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    entries: Vec<ResolvedField>,
}

impl LoadReport {
    /// An empty report.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, field: ResolvedField) {
        self.entries.push(field);
    }

    /// All entries in visit order.
    #[must_use]
    pub fn entries(&self) -> &[ResolvedField] {
        &self.entries
    }

    /// The entry for a dotted field path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&ResolvedField> {
        self.entries.iter().find(|field| field.path == path)
    }

    /// Fields whose value was read from the environment.
    pub fn env_fields(&self) -> impl Iterator<Item = &ResolvedField> {
        self.entries
            .iter()
            .filter(|field| field.origin == Origin::Environment)
    }

    /// Fields whose value came from the secret source.
    pub fn secret_fields(&self) -> impl Iterator<Item = &ResolvedField> {
        self.entries.iter().filter(|field| field.origin.is_secret())
    }

    /// Iterates over all entries.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedField> {
        self.entries.iter()
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no field was visited.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a LoadReport {
    type Item = &'a ResolvedField;
    type IntoIter = std::slice::Iter<'a, ResolvedField>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Display for LoadReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration Source:")?;
        writeln!(f, "{}", "-".repeat(50))?;

        let width = self
            .entries
            .iter()
            .map(|field| field.path.len())
            .max()
            .unwrap_or(0);

        for field in &self.entries {
            write!(f, "  {:<width$}  <- {}", field.path, field.origin)?;
            match field.key {
                Some(key) => writeln!(f, " [{key}]")?,
                None => writeln!(f)?,
            }
        }

        Ok(())
    }
}
