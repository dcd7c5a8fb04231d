//! Artifact encoding: a bincode header (magic, format version, kind)
//! followed by the bincode payload.

use crate::error::{RecommenderError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const MAGIC: [u8; 4] = *b"BKRC";

/// Bumped whenever the layout of any artifact payload changes.
pub const FORMAT_VERSION: u32 = 1;

/// Which artifact a file holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArtifactKind {
    Model,
    BookPivot,
    FinalRating,
    BookNames,
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    magic: [u8; 4],
    version: u32,
    kind: ArtifactKind,
}

/// Encode a payload with its header.
pub fn encode<T: Serialize>(kind: ArtifactKind, value: &T) -> Result<Vec<u8>> {
    let header = Header {
        magic: MAGIC,
        version: FORMAT_VERSION,
        kind,
    };
    let mut bytes = bincode::serialize(&header).map_err(to_unknown)?;
    bincode::serialize_into(&mut bytes, value).map_err(to_unknown)?;
    Ok(bytes)
}

/// Decode a payload, rejecting anything written by another format version,
/// another artifact kind, or not by us at all.
pub fn decode<T: DeserializeOwned>(name: &str, kind: ArtifactKind, bytes: &[u8]) -> Result<T> {
    let incompatible = |reason: String| RecommenderError::ArtifactIncompatible {
        artifact: name.to_string(),
        reason,
    };

    let mut cursor = bytes;
    let header: Header = bincode::deserialize_from(&mut cursor)
        .map_err(|e| incompatible(format!("unreadable header: {e}")))?;

    if header.magic != MAGIC {
        return Err(incompatible("not an artifact file".to_string()));
    }
    if header.version != FORMAT_VERSION {
        return Err(incompatible(format!(
            "format version {} but this build reads {}",
            header.version, FORMAT_VERSION
        )));
    }
    if header.kind != kind {
        return Err(incompatible(format!(
            "holds {:?}, expected {:?}",
            header.kind, kind
        )));
    }

    bincode::deserialize(cursor).map_err(|e| incompatible(format!("corrupt payload: {e}")))
}

fn to_unknown(e: bincode::Error) -> RecommenderError {
    RecommenderError::Unknown {
        context: "artifact encode".to_string(),
        source: e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let names = vec!["Dune".to_string(), "Emma".to_string()];
        let bytes = encode(ArtifactKind::BookNames, &names).unwrap();
        let decoded: Vec<String> =
            decode("book_names.bin", ArtifactKind::BookNames, &bytes).unwrap();
        assert_eq!(decoded, names);
    }

    #[test]
    fn test_wrong_kind_is_incompatible() {
        let bytes = encode(ArtifactKind::BookNames, &vec!["Dune".to_string()]).unwrap();
        let err = decode::<Vec<String>>("model.bin", ArtifactKind::Model, &bytes).unwrap_err();
        assert!(err.needs_retrain());
    }

    #[test]
    fn test_version_skew_is_incompatible() {
        let mut bytes = encode(ArtifactKind::BookNames, &vec!["Dune".to_string()]).unwrap();
        // version is the u32 right after the 4 magic bytes
        bytes[4] = bytes[4].wrapping_add(1);
        let err = decode::<Vec<String>>("book_names.bin", ArtifactKind::BookNames, &bytes)
            .unwrap_err();
        assert!(err.needs_retrain());
        assert!(err.to_string().contains("format version"));
    }

    #[test]
    fn test_garbage_is_incompatible() {
        let err = decode::<Vec<String>>("x.bin", ArtifactKind::BookNames, b"\x80\x04pickle")
            .unwrap_err();
        assert!(err.needs_retrain());
    }

    #[test]
    fn test_truncated_payload_is_incompatible() {
        let bytes = encode(ArtifactKind::BookNames, &vec!["Dune".to_string()]).unwrap();
        let err = decode::<Vec<String>>(
            "book_names.bin",
            ArtifactKind::BookNames,
            &bytes[..bytes.len() - 2],
        )
        .unwrap_err();
        assert!(err.needs_retrain());
    }
}
