//! This module contains the pure, stateless decoder for the harness's compact
//! `"<Method> <CodecChain>"` field notation.
//!
//! A field is either `Method` alone (implying the identity chain `[1]`) or a
//! method and a bracketed, comma-space-joined chain separated by the FIRST space,
//! e.g. `Delta [1, 2, 1]`. The method token is passed through unvalidated; the
//! chain text must carry both bracket delimiters.

use crate::error::{AnalyzeError, Result};
use crate::types::encoding::CODEC_SEPARATOR;
use crate::types::{CodecChain, EncodedField, Method, IDENTITY_CHAIN};

/// Decodes one encoded field cell.
pub fn decode_field(text: &str) -> Result<EncodedField> {
    let (method, chain_text) = match text.split_once(' ') {
        Some((method, chain)) => (method, chain),
        None => (text, IDENTITY_CHAIN),
    };
    if method.is_empty() {
        return Err(AnalyzeError::format(text, "missing method token"));
    }
    Ok(EncodedField {
        method: Method::from_token(method),
        chain: parse_chain(chain_text)?,
    })
}

/// Validates bracketed chain text and wraps it, verbatim, as a `CodecChain`.
pub fn parse_chain(text: &str) -> Result<CodecChain> {
    if !text.starts_with('[') {
        return Err(AnalyzeError::format(text, "codec chain must start with '['"));
    }
    if !text.ends_with(']') || text.len() < 2 {
        return Err(AnalyzeError::format(text, "codec chain is missing its closing ']'"));
    }
    let inner = &text[1..text.len() - 1];
    if inner.is_empty() {
        return Err(AnalyzeError::format(text, "codec chain is empty"));
    }
    if inner.split(CODEC_SEPARATOR).any(|name| name.is_empty()) {
        return Err(AnalyzeError::format(text, "codec chain contains an empty codec name"));
    }
    Ok(CodecChain::from_validated(text.to_string()))
}

/// Parses a user-supplied list of chains such as `[1, 2],[4], [1, 1, 2]`.
///
/// Chains are split at their closing bracket, so the commas inside a chain never
/// act as list separators. Spacing inside each entry is canonicalized to the
/// harness's `", "` before it goes through [`parse_chain`].
pub fn parse_chain_list(text: &str) -> Result<Vec<CodecChain>> {
    let mut chains = Vec::new();
    let mut rest = text.trim();
    while !rest.is_empty() {
        let close = rest
            .find(']')
            .ok_or_else(|| AnalyzeError::format(rest, "codec chain is missing its closing ']'"))?;
        chains.push(parse_chain(&canonical_chain_text(rest[..=close].trim()))?);
        rest = rest[close + 1..].trim_start();
        if let Some(stripped) = rest.strip_prefix(',') {
            rest = stripped.trim_start();
        } else if !rest.is_empty() {
            return Err(AnalyzeError::format(rest, "expected ',' between codec chains"));
        }
    }
    Ok(chains)
}

/// Rewrites `[a,b ,c]` as `[a, b, c]`. Text without both brackets is returned
/// unchanged so that `parse_chain` reports it.
fn canonical_chain_text(text: &str) -> String {
    match text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
        Some(inner) => {
            let names: Vec<&str> = inner.split(',').map(str::trim).collect();
            format!("[{}]", names.join(CODEC_SEPARATOR))
        }
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_method_and_chain() {
        let field = decode_field("Delta [1, 2, 1]").unwrap();
        assert_eq!(field.method, Method::Delta);
        assert_eq!(field.chain.raw(), "[1, 2, 1]");
        assert_eq!(field.chain.names().collect::<Vec<_>>(), vec!["1", "2", "1"]);
    }

    #[test]
    fn test_bare_method_implies_identity_chain() {
        let field = decode_field("Literal").unwrap();
        assert_eq!(field.method, Method::Literal);
        assert!(field.chain.is_identity());
        assert_eq!(field.chain, CodecChain::identity());
    }

    #[test]
    fn test_unknown_method_is_passed_through() {
        let field = decode_field("Xor [zigzag, varint]").unwrap();
        assert_eq!(field.method, Method::Other("Xor".to_string()));
    }

    #[test]
    fn test_only_first_space_splits() {
        // Everything after the first space is chain text, including further spaces.
        let field = decode_field("Delta [zigzag, varint]").unwrap();
        assert_eq!(field.chain.raw(), "[zigzag, varint]");
    }

    #[test]
    fn test_decode_roundtrip_reproduces_text() {
        for text in ["Delta [1, 2]", "Literal [4]", "Delta [zigzag, varint]", "Literal [1, 1, 1, 1]"] {
            assert_eq!(decode_field(text).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_missing_closing_bracket_is_format_error() {
        let err = decode_field("Delta [1, 2").unwrap_err();
        match err {
            AnalyzeError::Format { value, .. } => assert_eq!(value, "[1, 2"),
            other => panic!("Expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_chain_text_is_rejected() {
        assert!(parse_chain("1, 2]").is_err());
        assert!(parse_chain("[]").is_err());
        assert!(parse_chain("[1, , 2]").is_err());
        assert!(parse_chain("]").is_err());
        assert!(decode_field(" [1]").is_err());
    }

    #[test]
    fn test_codec_set_ignores_order() {
        let ab = parse_chain("[a, b]").unwrap();
        let ba = parse_chain("[b, a]").unwrap();
        assert_ne!(ab, ba);
        assert_eq!(ab.codec_set(), ba.codec_set());
        assert_eq!(parse_chain("[a, b, a]").unwrap().codec_set(), ab.codec_set());
    }

    #[test]
    fn test_parse_chain_list() {
        let chains = parse_chain_list("[1, 2],[4], [1, 1, 2]").unwrap();
        let raw: Vec<&str> = chains.iter().map(|c| c.raw()).collect();
        assert_eq!(raw, vec!["[1, 2]", "[4]", "[1, 1, 2]"]);
        assert!(parse_chain_list("").unwrap().is_empty());
        assert_eq!(parse_chain_list("[1,2]").unwrap()[0].raw(), "[1, 2]");
        assert!(parse_chain_list("[1, 2").is_err());
        assert!(parse_chain_list("[1] [2]").is_err());
    }
}
