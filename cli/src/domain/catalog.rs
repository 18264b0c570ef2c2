//! Service-binding catalog (`VCAP_SERVICES`) decoding and Seeker matching.
//!
//! Pure functions only, with no I/O or async.

use std::collections::BTreeMap;
use std::fmt;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Deserializer};

use crate::domain::credentials::ServiceCredential;
use crate::domain::error::CatalogError;

// ── Constants ────────────────────────────────────────────────────────────────

/// Catalog key holding operator-declared bindings.
pub const USER_PROVIDED_KEY: &str = "user-provided";

/// Service types recognised without any keyword heuristic.
pub const DEFAULT_SERVICE_TYPES: &[&str] = &["seeker-security-service"];

/// Keyword used by the fallback heuristic.
pub const DEFAULT_SERVICE_KEYWORD: &str = "seeker";

// ── Bindings ─────────────────────────────────────────────────────────────────

/// One element of the platform's service-binding catalog.
///
/// Only the fields used for discovery are decoded; everything else in the
/// binding is ignored. Missing and `null` fields decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceBinding {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub label: String,
    #[serde(default, deserialize_with = "nullable")]
    pub instance_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub credentials: BindingCredentials,
}

/// The Seeker-relevant part of a binding's `credentials` object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BindingCredentials {
    #[serde(default, deserialize_with = "nullable")]
    pub sensor_host: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub sensor_port: String,
    #[serde(default, deserialize_with = "nullable")]
    pub enterprise_server_url: String,
}

impl ServiceBinding {
    /// Map this binding's credentials onto a [`ServiceCredential`].
    #[must_use]
    pub fn credential(&self) -> ServiceCredential {
        ServiceCredential {
            sensor_host: self.credentials.sensor_host.clone(),
            sensor_port: self.credentials.sensor_port.clone(),
            enterprise_server_url: self.credentials.enterprise_server_url.clone(),
        }
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Port {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Port>::deserialize(deserializer)? {
        Some(Port::Text(s)) => s,
        Some(Port::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

// ── Catalog shapes ───────────────────────────────────────────────────────────

/// The two known catalog shapes, in resolution precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogShape {
    /// Bindings declared by an operator under `user-provided`.
    UserProvided,
    /// Bindings created by a service broker, keyed by service type.
    Brokered,
}

impl CatalogShape {
    /// Shapes in the order they are consulted.
    pub const PRECEDENCE: [CatalogShape; 2] = [CatalogShape::UserProvided, CatalogShape::Brokered];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CatalogShape::UserProvided => "user-provided",
            CatalogShape::Brokered => "brokered",
        }
    }
}

impl fmt::Display for CatalogShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A catalog decoded as one of the two shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSection {
    UserProvided(Vec<ServiceBinding>),
    /// `(service type, binding)` pairs, flattened in key order.
    Brokered(Vec<(String, ServiceBinding)>),
}

impl CatalogSection {
    #[must_use]
    pub fn shape(&self) -> CatalogShape {
        match self {
            CatalogSection::UserProvided(_) => CatalogShape::UserProvided,
            CatalogSection::Brokered(_) => CatalogShape::Brokered,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            CatalogSection::UserProvided(b) => b.len(),
            CatalogSection::Brokered(b) => b.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A syntactically valid catalog document, decoded lazily per shape.
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    document: serde_json::Value,
}

impl ServiceCatalog {
    /// Parse the raw catalog JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Malformed`] if `raw` is not valid JSON.
    pub fn parse(raw: &str) -> Result<Self, CatalogError> {
        let document = serde_json::from_str(raw).map_err(|e| CatalogError::Malformed {
            shape: "document",
            reason: e.to_string(),
        })?;
        Ok(Self { document })
    }

    /// Decode the catalog as `shape`.
    ///
    /// Returns `Ok(None)` for the user-provided shape when the document has no
    /// `user-provided` member. The brokered shape covers every key, including
    /// `user-provided`.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Malformed`] if the document does not fit `shape`.
    pub fn section(&self, shape: CatalogShape) -> Result<Option<CatalogSection>, CatalogError> {
        let malformed = |e: serde_json::Error| CatalogError::Malformed {
            shape: shape.as_str(),
            reason: e.to_string(),
        };
        match shape {
            CatalogShape::UserProvided => {
                let Some(value) = self.document.get(USER_PROVIDED_KEY) else {
                    return Ok(None);
                };
                let bindings = Option::<Vec<ServiceBinding>>::deserialize(value)
                    .map_err(malformed)?
                    .unwrap_or_default();
                Ok(Some(CatalogSection::UserProvided(bindings)))
            }
            CatalogShape::Brokered => {
                let groups =
                    BTreeMap::<String, Option<Vec<ServiceBinding>>>::deserialize(&self.document)
                        .map_err(malformed)?;
                let flattened = groups
                    .into_iter()
                    .flat_map(|(service_type, bindings)| {
                        bindings
                            .unwrap_or_default()
                            .into_iter()
                            .map(move |b| (service_type.clone(), b))
                    })
                    .collect();
                Ok(Some(CatalogSection::Brokered(flattened)))
            }
        }
    }
}

// ── Matching ─────────────────────────────────────────────────────────────────

/// Result of applying the one-match rule to a [`MatchSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome<'a> {
    None,
    One(&'a ServiceBinding),
    Ambiguous(usize),
}

/// Bindings of one catalog section accepted by a [`ServiceMatcher`].
#[derive(Debug, Clone)]
pub struct MatchSet<'a> {
    pub shape: CatalogShape,
    pub matches: Vec<&'a ServiceBinding>,
}

impl<'a> MatchSet<'a> {
    #[must_use]
    pub fn outcome(&self) -> MatchOutcome<'a> {
        match self.matches.as_slice() {
            [] => MatchOutcome::None,
            [only] => MatchOutcome::One(*only),
            many => MatchOutcome::Ambiguous(many.len()),
        }
    }
}

/// Decides which bindings belong to the Seeker service.
///
/// A binding matches when its service type (brokered catalog key or `label`)
/// is on the allow-list, or, when a keyword is configured, when the keyword
/// occurs case-insensitively in the shape's match fields or equals one of the
/// binding's tags. User-provided bindings test `name`, `label` and
/// `instance_name`; brokered bindings test `name` only.
#[derive(Debug, Clone)]
pub struct ServiceMatcher {
    service_types: Vec<String>,
    keyword: Option<(String, Regex)>,
}

impl ServiceMatcher {
    /// Build a matcher. An empty or absent keyword disables the fallback.
    ///
    /// # Errors
    ///
    /// Returns an error if the escaped keyword exceeds the regex size limit.
    pub fn new<S: AsRef<str>>(service_types: &[S], keyword: Option<&str>) -> Result<Self, regex::Error> {
        let keyword = match keyword.map(str::trim).filter(|k| !k.is_empty()) {
            Some(k) => {
                let pattern = RegexBuilder::new(&regex::escape(k))
                    .case_insensitive(true)
                    .build()?;
                Some((k.to_string(), pattern))
            }
            None => None,
        };
        Ok(Self {
            service_types: service_types
                .iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            keyword,
        })
    }

    /// Matcher with the default allow-list and keyword.
    ///
    /// # Errors
    ///
    /// See [`ServiceMatcher::new`].
    pub fn with_defaults() -> Result<Self, regex::Error> {
        Self::new(DEFAULT_SERVICE_TYPES, Some(DEFAULT_SERVICE_KEYWORD))
    }

    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_ref().map(|(k, _)| k.as_str())
    }

    #[must_use]
    pub fn service_types(&self) -> &[String] {
        &self.service_types
    }

    fn is_listed(&self, service_type: &str) -> bool {
        !service_type.is_empty()
            && self
                .service_types
                .iter()
                .any(|t| t.eq_ignore_ascii_case(service_type))
    }

    fn keyword_hit(&self, fields: &[&str], tags: &[String]) -> bool {
        let Some((keyword, pattern)) = &self.keyword else {
            return false;
        };
        fields.iter().any(|f| pattern.is_match(f))
            || tags.iter().any(|t| t.eq_ignore_ascii_case(keyword))
    }

    /// Match a user-provided binding.
    #[must_use]
    pub fn matches_user_provided(&self, binding: &ServiceBinding) -> bool {
        self.is_listed(&binding.label)
            || self.keyword_hit(
                &[
                    binding.name.as_str(),
                    binding.label.as_str(),
                    binding.instance_name.as_str(),
                ],
                &binding.tags,
            )
    }

    /// Match a brokered binding found under `service_type`.
    #[must_use]
    pub fn matches_brokered(&self, service_type: &str, binding: &ServiceBinding) -> bool {
        self.is_listed(service_type)
            || self.is_listed(&binding.label)
            || self.keyword_hit(&[binding.name.as_str()], &binding.tags)
    }

    /// Compute the [`MatchSet`] of `section`.
    #[must_use]
    pub fn match_set<'a>(&self, section: &'a CatalogSection) -> MatchSet<'a> {
        let matches = match section {
            CatalogSection::UserProvided(bindings) => bindings
                .iter()
                .filter(|b| self.matches_user_provided(b))
                .collect(),
            CatalogSection::Brokered(bindings) => bindings
                .iter()
                .filter(|(service_type, b)| self.matches_brokered(service_type, b))
                .map(|(_, b)| b)
                .collect(),
        };
        MatchSet {
            shape: section.shape(),
            matches,
        }
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
