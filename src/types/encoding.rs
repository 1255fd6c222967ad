//! Typed representations of a single encoded field: the method (delta or literal)
//! and the codec chain that was applied after it.

use std::collections::BTreeSet;
use std::fmt;

/// The chain text implied when a field carries a bare method with no chain.
pub const IDENTITY_CHAIN: &str = "[1]";

/// The separator between codec names inside the bracketed chain text.
pub(crate) const CODEC_SEPARATOR: &str = ", ";

//==================================================================================
// 1. Method
//==================================================================================

/// How a field's values were represented before the codec chain ran.
///
/// The harness only ever writes `Delta` or `Literal`, but any other token is
/// carried through untouched as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    Delta,
    Literal,
    Other(String),
}

impl Method {
    pub fn from_token(token: &str) -> Self {
        match token {
            "Delta" => Method::Delta,
            "Literal" => Method::Literal,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::Delta => "Delta",
            Method::Literal => "Literal",
            Method::Other(token) => token,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//==================================================================================
// 2. Codec Chain (order-sensitive) & Codec Set (order-insensitive)
//==================================================================================

/// The ordered codec chain exactly as the harness wrote it, e.g. `[1, 2, 1]`.
///
/// The bracketed text is kept verbatim so that pivots group on the precise
/// chain. Instances are only built by the decoder, which has already checked
/// the delimiters, so the accessors below cannot fail.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CodecChain {
    raw: String,
}

impl CodecChain {
    /// Wraps chain text that has already passed delimiter validation.
    pub(crate) fn from_validated(raw: String) -> Self {
        Self { raw }
    }

    /// The trivial `[1]` chain: no sub-codec applied.
    pub fn identity() -> Self {
        Self {
            raw: IDENTITY_CHAIN.to_string(),
        }
    }

    /// The bracketed text as the harness wrote it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The codec names in application order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let inner = self
            .raw
            .strip_prefix('[')
            .and_then(|t| t.strip_suffix(']'))
            .unwrap_or(&self.raw);
        inner.split(CODEC_SEPARATOR)
    }

    pub fn is_identity(&self) -> bool {
        self.raw == IDENTITY_CHAIN
    }

    /// Collapses the chain into its order-insensitive identity.
    pub fn codec_set(&self) -> CodecSet {
        CodecSet(self.names().map(str::to_string).collect())
    }
}

impl fmt::Display for CodecChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// The distinct codec names of a chain, ignoring order and repetition.
///
/// Two permutations of the same chain map to the same `CodecSet`; this is the
/// grouping key for "comparing codecs".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CodecSet(BTreeSet<String>);

impl CodecSet {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CodecSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        write!(f, "({})", names.join(CODEC_SEPARATOR))
    }
}

//==================================================================================
// 3. Encoded Field
//==================================================================================

/// The decoded form of one `"<Method> <CodecChain>"` cell.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EncodedField {
    pub method: Method,
    pub chain: CodecChain,
}

/// Re-serializes to the harness notation, `"<Method> <CodecChain>"`.
impl fmt::Display for EncodedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.chain)
    }
}
