use serde_json::Value;

/// Restricted JSONPath evaluation for presentation-exchange constraint paths.
///
/// Supports the subset used by constraint fields and descriptor maps: the `$`
/// root, dotted member access (`$.credentialSubject.id`), numeric index access
/// (`[0]`) and quoted member access (`["key"]`, `['key']`). Wildcards, slices,
/// filters and script expressions are rejected; a malformed path or a missing
/// segment evaluates to `None`.
pub fn evaluate<'a>(path: &str, value: &'a Value) -> Option<&'a Value> {
    let segments = parse(path)?;

    let mut current = value;
    for segment in segments {
        current = match segment {
            Segment::Key(key) => current.get(key)?,
            Segment::Index(index) => current.get(index)?,
        };
    }
    Some(current)
}

enum Segment {
    Key(String),
    Index(usize),
}

fn parse(path: &str) -> Option<Vec<Segment>> {
    let mut rest = path.strip_prefix('$')?;
    let mut segments = vec![];

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('.') {
            let end = after
                .find(['.', '['])
                .unwrap_or(after.len());
            if end == 0 {
                return None;
            }
            segments.push(Segment::Key(after[..end].to_owned()));
            rest = &after[end..];
        } else if let Some(after) = rest.strip_prefix('[') {
            let end = after.find(']')?;
            let inner = &after[..end];
            segments.push(parse_bracket(inner)?);
            rest = &after[end + 1..];
        } else {
            return None;
        }
    }
    Some(segments)
}

fn parse_bracket(inner: &str) -> Option<Segment> {
    if let Some(quoted) = inner
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .or_else(|| inner.strip_prefix('"').and_then(|s| s.strip_suffix('"')))
    {
        return Some(Segment::Key(quoted.to_owned()));
    }
    inner.parse().ok().map(Segment::Index)
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_evaluate_member_and_index_access() {
        let value = json!({
            "presentation": {
                "verifiableCredential": [
                    { "credentialSubject": { "id": "did:key:z6MkHolder" } }
                ]
            }
        });

        assert_eq!(
            evaluate("$.presentation.verifiableCredential[0].credentialSubject.id", &value),
            Some(&json!("did:key:z6MkHolder"))
        );
        assert_eq!(
            evaluate("$[\"presentation\"]['verifiableCredential'][0]", &value),
            Some(&json!({ "credentialSubject": { "id": "did:key:z6MkHolder" } }))
        );
        assert_eq!(evaluate("$", &value), Some(&value));
    }

    #[test]
    fn test_evaluate_missing_segment_is_none() {
        let value = json!({ "issuer": "did:key:z6MkIssuer" });

        assert_eq!(evaluate("$.credentialSubject.score", &value), None);
        assert_eq!(evaluate("$.issuer[3]", &value), None);
    }

    #[test]
    fn test_evaluate_rejects_unsupported_expressions() {
        let value = json!({ "items": [1, 2, 3] });

        assert_eq!(evaluate("$.items[*]", &value), None);
        assert_eq!(evaluate("$..items", &value), None);
        assert_eq!(evaluate("items", &value), None);
        assert_eq!(evaluate("$.items[?(@ > 1)]", &value), None);
    }
}
