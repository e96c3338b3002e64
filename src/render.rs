//! Deterministic rendering of resolved kubelet flags
//!
//! Deployment tooling diffs rendered output between regenerations, so the
//! same flags must always render to the same string.

use sha2::{Digest, Sha256};

use crate::kubelet::FlagMap;

/// Render `flags` as space-separated `key=value` tokens sorted by key.
pub fn render_flags(flags: &FlagMap) -> String {
    flags
        .sorted()
        .into_iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// SHA256 of the rendered flags, hex encoded.
pub fn fingerprint(flags: &FlagMap) -> String {
    let mut hasher = Sha256::new();
    hasher.update(render_flags(flags).as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_sorted() {
        let flags: FlagMap = [
            ("--max-pods", "110"),
            ("--address", "0.0.0.0"),
            ("--feature-gates", "PodPriority=true,Accelerators=true"),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            render_flags(&flags),
            "--address=0.0.0.0 --feature-gates=PodPriority=true,Accelerators=true --max-pods=110"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_flags(&FlagMap::new()), "");
    }

    #[test]
    fn test_fingerprint_independent_of_insertion_order() {
        let a: FlagMap = [("--a", "1"), ("--b", "2")].into_iter().collect();
        let mut b = FlagMap::new();
        b.set("--b", "2");
        b.set("--a", "1");
        assert_eq!(fingerprint(&a), fingerprint(&b));
        assert_eq!(fingerprint(&a).len(), 64);
    }
}
