//! ARN templates modeled as structured literal/placeholder segments.
//!
//! Service authorization reference data describes resource ARNs as templates
//! such as `arn:${Partition}:elasticache:${Region}:${Account}:cluster:${CacheClusterId}`.
//! Instead of blind substring replacement, a template is parsed once into an
//! explicit segment sequence and filled through [`ArnTemplate::fill`], which
//! fails when a required slot has no value rather than emitting an ARN with a
//! literal `${Unfilled}` token embedded.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::ArnError;

/// Partition used when the caller does not supply one.
pub const DEFAULT_PARTITION: &str = "aws";

/// Value used for unset `Region`/`Account` slots.
pub const WILDCARD: &str = "*";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// A parsed ARN template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArnTemplate {
    raw: String,
    segments: Vec<Segment>,
}

impl ArnTemplate {
    /// Parse a template string into literal and placeholder segments.
    ///
    /// # Errors
    /// Returns [`ArnError::UnterminatedPlaceholder`] when a `${` never
    /// closes, and [`ArnError::EmptyPlaceholder`] for `${}`.
    pub fn parse(template: &str) -> Result<Self, ArnError> {
        Self::validate(template)?;

        let mut segments = Vec::new();
        let mut last = 0;
        for caps in PLACEHOLDER_RE.captures_iter(template) {
            let matched = caps.get(0).expect("capture group 0 always present");
            if matched.start() > last {
                segments.push(Segment::Literal(template[last..matched.start()].to_string()));
            }
            segments.push(Segment::Placeholder(caps[1].to_string()));
            last = matched.end();
        }
        if last < template.len() {
            segments.push(Segment::Literal(template[last..].to_string()));
        }

        Ok(Self {
            raw: template.to_string(),
            segments,
        })
    }

    /// The template string this was parsed from.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in template order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Substitute every placeholder with a value from `fields`.
    ///
    /// The ambient `Partition`/`Region`/`Account` slots fall back to their
    /// documented defaults (`aws`/`*`/`*`); every other slot must be covered
    /// by an identifier or the fill fails.
    ///
    /// # Errors
    /// Returns [`ArnError::UnfilledPlaceholder`] naming the first slot that
    /// has no value.
    pub fn fill(&self, fields: &ArnFields<'_>) -> Result<String, ArnError> {
        let mut arn = String::with_capacity(self.raw.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => arn.push_str(text),
                Segment::Placeholder(name) => match fields.value_for(name) {
                    Some(value) => arn.push_str(value),
                    None => {
                        return Err(ArnError::UnfilledPlaceholder {
                            template: self.raw.clone(),
                            name: name.clone(),
                        })
                    }
                },
            }
        }
        Ok(arn)
    }

    /// Parse and fill in one step.
    ///
    /// # Errors
    /// Propagates parse and fill errors.
    pub fn resolve(template: &str, fields: &ArnFields<'_>) -> Result<String, ArnError> {
        Self::parse(template)?.fill(fields)
    }

    fn validate(template: &str) -> Result<(), ArnError> {
        let mut pos = 0;
        while let Some(offset) = template[pos..].find("${") {
            let start = pos + offset;
            let Some(close) = template[start + 2..].find('}') else {
                return Err(ArnError::UnterminatedPlaceholder {
                    template: template.to_string(),
                    position: start,
                });
            };
            let name = &template[start + 2..start + 2 + close];
            if name.is_empty() {
                return Err(ArnError::EmptyPlaceholder {
                    template: template.to_string(),
                });
            }
            if name.contains("${") {
                return Err(ArnError::UnterminatedPlaceholder {
                    template: template.to_string(),
                    position: start,
                });
            }
            pos = start + 2 + close + 1;
        }
        Ok(())
    }
}

/// Values available to fill a template: resource identifiers plus the three
/// ambient slots every ARN shares.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArnFields<'a> {
    identifiers: &'a [(&'a str, &'a str)],
    account: Option<&'a str>,
    region: Option<&'a str>,
    partition: Option<&'a str>,
}

impl<'a> ArnFields<'a> {
    /// Bundle identifier values with optional account/region/partition
    /// overrides.
    pub fn new(
        identifiers: &'a [(&'a str, &'a str)],
        account: Option<&'a str>,
        region: Option<&'a str>,
        partition: Option<&'a str>,
    ) -> Self {
        Self {
            identifiers,
            account,
            region,
            partition,
        }
    }

    fn value_for(&self, name: &str) -> Option<&'a str> {
        if let Some((_, value)) = self.identifiers.iter().find(|(slot, _)| *slot == name) {
            return Some(value);
        }
        match name {
            "Partition" => Some(self.partition.unwrap_or(DEFAULT_PARTITION)),
            "Region" => Some(self.region.unwrap_or(WILDCARD)),
            "Account" => Some(self.account.unwrap_or(WILDCARD)),
            _ => None,
        }
    }
}
