//! The type rule catalog and resolver.
//!
//! A `Catalog` is an ordered, immutable list of `TypeRule`s built once at
//! startup by `build_catalog()` and passed explicitly to whoever resolves
//! columns. Resolution order is load-bearing: exact names win over
//! patterns, and among patterns the declaration order is the tie-break.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::converters::native::{NativeShape, NativeValue, ScanKind};
use crate::converters::{json, numeric, temporal, text};
use crate::error::ConversionError;
use crate::frame::{FieldKind, FieldType, FrameValue};

/// The per-rule conversion function: pure, synchronous, never panics.
pub type ConvertFn = dyn Fn(&NativeValue) -> Result<FrameValue, ConversionError> + Send + Sync;

/// How a rule decides whether it handles a type descriptor.
#[derive(Clone)]
pub enum Matcher {
    /// The descriptor must equal the rule name.
    Exact,
    /// Structural pattern over the descriptor, for parameterized types.
    Pattern(Regex),
}

/// One entry in the catalog: a type name bound to a matcher, an expected
/// native shape, an output type, and a conversion function.
#[derive(Clone)]
pub struct TypeRule {
    name: String,
    matcher: Matcher,
    native_shape: NativeShape,
    output_type: FieldType,
    convert: Arc<ConvertFn>,
}

impl TypeRule {
    /// A rule matched by exact name equality.
    pub(crate) fn exact<F>(
        name: impl Into<String>,
        native_shape: NativeShape,
        output_type: FieldType,
        convert: F,
    ) -> Self
    where
        F: Fn(&NativeValue) -> Result<FrameValue, ConversionError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            matcher: Matcher::Exact,
            native_shape,
            output_type,
            convert: Arc::new(convert),
        }
    }

    /// A rule matched by a structural pattern.
    pub(crate) fn pattern<F>(
        name: impl Into<String>,
        pattern: &str,
        native_shape: NativeShape,
        output_type: FieldType,
        convert: F,
    ) -> Self
    where
        F: Fn(&NativeValue) -> Result<FrameValue, ConversionError> + Send + Sync + 'static,
    {
        let regex = Regex::new(pattern).expect("catalog pattern compiles");
        Self {
            name: name.into(),
            matcher: Matcher::Pattern(regex),
            native_shape,
            output_type,
            convert: Arc::new(convert),
        }
    }

    /// The sentinel returned for descriptors nothing matched. Its converter
    /// always fails, so an unresolved column can never pass data through.
    fn unresolved(descriptor: &str) -> Self {
        let type_name = descriptor.to_string();
        Self {
            name: String::new(),
            matcher: Matcher::Exact,
            native_shape: NativeShape::plain(ScanKind::Text),
            output_type: FieldType::new(FieldKind::String),
            convert: Arc::new(move |_| {
                Err(ConversionError::UnresolvedType {
                    type_name: type_name.clone(),
                })
            }),
        }
    }

    /// Canonical rule name, e.g. `Nullable(Decimal)` or `Array()`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the sentinel for an unresolved descriptor.
    pub fn is_unresolved(&self) -> bool {
        self.name.is_empty()
    }

    /// The matcher this rule uses.
    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// The native shape this rule expects; validation and testing only.
    pub fn native_shape(&self) -> NativeShape {
        self.native_shape
    }

    /// The normalized output type this rule produces.
    pub fn output_type(&self) -> FieldType {
        self.output_type
    }

    /// Whether this rule handles the given descriptor.
    pub fn matches(&self, descriptor: &str) -> bool {
        match &self.matcher {
            Matcher::Exact => !self.name.is_empty() && self.name == descriptor,
            Matcher::Pattern(regex) => regex.is_match(descriptor),
        }
    }

    /// Convert a native value into this rule's normalized output.
    pub fn convert(&self, value: &NativeValue) -> Result<FrameValue, ConversionError> {
        (self.convert)(value)
    }
}

impl fmt::Debug for TypeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRule")
            .field("name", &self.name)
            .field("output_type", &self.output_type)
            .field("native_shape", &self.native_shape)
            .finish_non_exhaustive()
    }
}

impl PartialEq for TypeRule {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// The ordered, immutable rule catalog.
///
/// Built once, then read concurrently without locks; `resolve` and
/// `convert` are pure.
pub struct Catalog {
    rules: Vec<TypeRule>,
    by_name: HashMap<String, usize>,
}

/// Build the full rule catalog.
///
/// Pure and deterministic; call once during initialization and share the
/// result. Rule groups land in this order: numeric (exact scalars, wide
/// integers, aliases, then the Decimal patterns), temporal (Date patterns),
/// text (String/UUID exacts, FixedString/IP/Enum patterns), structured
/// (JSON family). Pattern precedence within a group keeps the nullable
/// variant ahead of its bare sibling.
pub fn build_catalog() -> Catalog {
    let mut rules = Vec::new();
    rules.extend(numeric::rules());
    rules.extend(temporal::rules());
    rules.extend(text::rules());
    rules.extend(json::rules());

    let by_name = rules
        .iter()
        .enumerate()
        .filter(|(_, rule)| matches!(rule.matcher(), Matcher::Exact))
        .map(|(idx, rule)| (rule.name().to_string(), idx))
        .collect();

    tracing::debug!("type catalog built with {} rules", rules.len());
    Catalog { rules, by_name }
}

impl Catalog {
    /// The full ordered catalog, for consumers that register converters
    /// against their frame builder.
    pub fn rules(&self) -> &[TypeRule] {
        &self.rules
    }

    /// Resolve a column type descriptor to its rule.
    ///
    /// Unwraps one `LowCardinality(...)` level, then tries exact names,
    /// then patterns in declaration order. Descriptors nothing matches get
    /// the sentinel rule, whose converter always fails with
    /// `UnresolvedType`; callers must treat an empty rule name as a
    /// resolution failure, never as a passthrough.
    pub fn resolve(&self, descriptor: &str) -> TypeRule {
        if let Some(inner) = extract_low_cardinality(descriptor) {
            return self.resolve(inner);
        }

        if let Some(&idx) = self.by_name.get(descriptor) {
            return self.rules[idx].clone();
        }

        for rule in &self.rules {
            if let Matcher::Pattern(regex) = &rule.matcher {
                if regex.is_match(descriptor) {
                    return rule.clone();
                }
            }
        }

        tracing::warn!("no converter for column type: {}", descriptor);
        TypeRule::unresolved(descriptor)
    }
}

/// Strip a `LowCardinality(...)` wrapper, whose conversion behavior is
/// identical to its inner type. Only an outermost wrapper counts:
/// `Nullable(LowCardinality(String))` stays as it is.
fn extract_low_cardinality(descriptor: &str) -> Option<&str> {
    descriptor
        .strip_prefix("LowCardinality(")?
        .strip_suffix(')')
}
