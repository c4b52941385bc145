//! Composite record identifiers
//!
//! Vendors without per-record ids get a locally synthesized identifier of
//! the form `<type>/<name>=<content>`. The type never contains `/` and the
//! name never contains `=`, so splitting on the first occurrence of each
//! recovers the content verbatim even when it contains both characters.

/// The `(type, name, content)` triple carried by a composite identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordKey {
    /// Record type, e.g. `"TXT"`.
    pub rtype: String,
    /// Record name as stored in the identifier.
    pub name: String,
    /// Decoded record content.
    pub content: String,
}

/// Builds `<type>/<name>=<content>`.
pub fn encode(rtype: &str, name: &str, content: &str) -> String {
    format!("{rtype}/{name}={content}")
}

/// Splits an identifier produced by [`encode`].
///
/// Returns `None` when the identifier lacks the `/` or `=` delimiter.
pub fn decode(identifier: &str) -> Option<RecordKey> {
    let (rtype, rest) = identifier.split_once('/')?;
    let (name, content) = rest.split_once('=')?;
    if rtype.is_empty() || name.is_empty() {
        return None;
    }
    Some(RecordKey {
        rtype: rtype.to_string(),
        name: name.to_string(),
        content: content.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(rtype: &str, name: &str, content: &str) -> RecordKey {
        RecordKey {
            rtype: rtype.to_string(),
            name: name.to_string(),
            content: content.to_string(),
        }
    }

    #[test]
    fn encode_layout() {
        assert_eq!(
            encode("A", "www.example.com.", "1.1.1.1"),
            "A/www.example.com.=1.1.1.1"
        );
    }

    #[test]
    fn round_trip_with_delimiters_in_content() {
        let cases = [
            key("A", "www.example.com.", "1.1.1.1"),
            key("TXT", "_dmarc.example.com.", "v=DMARC1; p=none; rua=mailto:a@b.c"),
            key("TXT", "k._domainkey.example.com.", "p=MIGf/MA0G==/=="),
            key("TXT", "example.com.", ""),
            key("TXT", "x.example.com.", "a=b=c/d/e="),
            key("CAA", "example.com.", "0 issue \"letsencrypt.org\""),
        ];
        for case in cases {
            let id = encode(&case.rtype, &case.name, &case.content);
            assert_eq!(decode(&id), Some(case.clone()), "identifier: {id}");
        }
    }

    #[test]
    fn decode_rejects_malformed() {
        assert_eq!(decode("no-delimiters"), None);
        assert_eq!(decode("A/www.example.com."), None);
        assert_eq!(decode("/www=1.1.1.1"), None);
        assert_eq!(decode("A/=1.1.1.1"), None);
    }
}
