//! Loading YAML/JSON documents and reading fields out of them.

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value as Json;

fn max_doc_bytes() -> usize {
    std::env::var("FIELDCHECK_MAX_DOC_BYTES")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1_000_000) // 1 MB default
}

/// Read a YAML (or JSON, which is valid YAML) document from disk.
pub fn load(path: &str) -> Result<Json> {
    load_with_limit(path, max_doc_bytes())
}

fn load_with_limit(path: &str, max: usize) -> Result<Json> {
    let meta = std::fs::metadata(path).with_context(|| format!("reading {}", path))?;
    if meta.len() > max as u64 {
        bail!("{} is {} bytes; limit is {} (FIELDCHECK_MAX_DOC_BYTES)", path, meta.len(), max);
    }
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path))?;
    parse(&text).with_context(|| format!("parsing {}", path))
}

pub fn parse(text: &str) -> Result<Json> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(text)?;
    serde_json::to_value(yaml).context("converting YAML to JSON")
}

/// Follow a dotted path with optional `[index]` per segment, e.g.
/// `spec.dns.providers[0].domains`.
pub fn extract_path<'a>(root: &'a Json, path: &str) -> Option<&'a Json> {
    let mut cur = root;
    for seg in path.split('.') {
        if seg.is_empty() { return None; }
        let (key, idx_opt) = if let Some(brk) = seg.find('[') {
            let end = seg.get(brk + 1..)?.find(']')? + brk + 1;
            let idx: usize = seg[brk + 1..end].parse().ok()?;
            (&seg[..brk], Some(idx))
        } else {
            (seg, None)
        };
        match cur {
            Json::Object(map) => { cur = map.get(key)?; }
            _ => return None,
        }
        if let Some(i) = idx_opt {
            match cur {
                Json::Array(arr) => { cur = arr.get(i)?; }
                _ => return None,
            }
        }
    }
    Some(cur)
}

/// The string list at `path`. An absent field or `null` is an empty list.
pub fn string_list_at(root: &Json, path: &str) -> Result<Vec<String>> {
    let arr = match extract_path(root, path) {
        None | Some(Json::Null) => return Ok(Vec::new()),
        Some(Json::Array(arr)) => arr,
        Some(other) => bail!("{} is not a list (found {})", path, kind(other)),
    };
    arr.iter()
        .enumerate()
        .map(|(i, v)| match v {
            Json::String(s) => Ok(s.clone()),
            Json::Number(n) => Ok(n.to_string()),
            Json::Bool(b) => Ok(b.to_string()),
            other => Err(anyhow!("{}[{}] is not a scalar (found {})", path, i, kind(other))),
        })
        .collect()
}

pub fn secret_ref_at(root: &Json, path: &str) -> Result<k8s_openapi::api::core::v1::SecretReference> {
    match extract_path(root, path) {
        None | Some(Json::Null) => Ok(Default::default()),
        Some(v) => serde_json::from_value(v.clone()).with_context(|| format!("decoding secret reference at {}", path)),
    }
}

fn kind(v: &Json) -> &'static str {
    match v {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "list",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shoot() -> Json {
        serde_json::json!({
            "spec": {
                "dns": { "providers": [ { "domains": ["a.example.com", "b.example.com"] } ] },
                "secretRef": { "name": "creds", "namespace": "garden-dev" },
                "replicas": 3
            }
        })
    }

    #[test]
    fn extracts_nested_and_indexed_paths() {
        let doc = shoot();
        assert_eq!(extract_path(&doc, "spec.replicas"), Some(&serde_json::json!(3)));
        assert!(extract_path(&doc, "spec.dns.providers[0].domains").is_some());
        assert!(extract_path(&doc, "spec.dns.providers[1]").is_none());
        assert!(extract_path(&doc, "spec..replicas").is_none());
        assert!(extract_path(&doc, "spec.replicas[0]").is_none());
    }

    #[test]
    fn string_lists() {
        let doc = shoot();
        assert_eq!(
            string_list_at(&doc, "spec.dns.providers[0].domains").unwrap(),
            vec!["a.example.com".to_string(), "b.example.com".to_string()]
        );
        assert!(string_list_at(&doc, "spec.missing").unwrap().is_empty());
        assert!(string_list_at(&doc, "spec.secretRef").is_err());
    }

    #[test]
    fn secret_refs() {
        let doc = shoot();
        let r = secret_ref_at(&doc, "spec.secretRef").unwrap();
        assert_eq!(r.name.as_deref(), Some("creds"));
        assert_eq!(r.namespace.as_deref(), Some("garden-dev"));
        let missing = secret_ref_at(&doc, "spec.other").unwrap();
        assert!(missing.name.is_none() && missing.namespace.is_none());
    }

    #[test]
    fn size_limit_is_inclusive() {
        let path = std::env::temp_dir().join(format!("fieldcheck-doc-{}.yaml", std::process::id()));
        let text = "spec:\n  zones: [a]\n";
        std::fs::write(&path, text).unwrap();
        let p = path.to_str().unwrap();
        assert!(load_with_limit(p, text.len()).is_ok());
        let err = load_with_limit(p, text.len() - 1).unwrap_err();
        assert!(err.to_string().contains("limit is"));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn parses_yaml() {
        let doc = parse("spec:\n  zones:\n  - a\n  - b\n").unwrap();
        assert_eq!(string_list_at(&doc, "spec.zones").unwrap(), vec!["a".to_string(), "b".to_string()]);
        assert!(parse("spec: [unclosed").is_err());
    }
}
