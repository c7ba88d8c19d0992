use anyhow::{anyhow, Result};
use std::collections::BTreeMap;

/// 内置目标序列（名称 → 序列），加载时统一转为大写。
const BUILTIN_TARGETS: &[(&str, &str)] = &[
    ("el1", "ccgaggtgagtccggaaatgggctcaaaactgcggtgaaacc"),
    (
        "el2",
        "actgacatccggacagcgttgcgacagtggcgcttttagcgcagcccgggggtttttacaggatacc",
    ),
    ("el3", "gtggcgcttttagcgcagcccgggggtttttacaggatacca"),
    (
        "el312",
        "AATTGAGGTGGATCGGTGGATCGGTGGATCAGTTCATTTCGGAACTGAAATGAGCCGTGTCCGAGGTGAGTCCGGAAATGGGCTCAAAACTGCGGTGAAACCACTGACATCCGGACAGCGTTGCGACAGTGGCGCTTTTAGCGCAGCCCGGGGGTTTTTACAGGATACC",
    ),
];

/// Read-only name → target sequence mapping, built once at startup.
#[derive(Debug, Clone)]
pub struct TargetTable {
    entries: BTreeMap<String, String>,
}

impl TargetTable {
    pub fn builtin() -> Self {
        Self::with_overrides(std::iter::empty::<(String, String)>())
    }

    /// Built-in targets with `extra` merged over them.
    pub fn with_overrides<I, K, V>(extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut entries: BTreeMap<String, String> = BUILTIN_TARGETS
            .iter()
            .map(|(name, seq)| (name.to_string(), seq.to_ascii_uppercase()))
            .collect();
        for (name, seq) in extra {
            entries.insert(name.into(), seq.as_ref().trim().to_ascii_uppercase());
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Result<&str> {
        self.entries.get(name).map(String::as_str).ok_or_else(|| {
            anyhow!(
                "unknown target '{}' (known targets: {})",
                name,
                self.names().join(", ")
            )
        })
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for TargetTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_uppercased() {
        let t = TargetTable::builtin();
        assert_eq!(t.names(), vec!["el1", "el2", "el3", "el312"]);
        assert_eq!(t.get("el1").unwrap(), "CCGAGGTGAGTCCGGAAATGGGCTCAAAACTGCGGTGAAACC");
        assert!(t.get("el3").unwrap().ends_with("GATACCA"));
    }

    #[test]
    fn el312_contains_its_parts() {
        let t = TargetTable::builtin();
        let el312 = t.get("el312").unwrap();
        assert!(el312.contains(t.get("el1").unwrap()));
        assert!(el312.contains(t.get("el2").unwrap()));
    }

    #[test]
    fn overrides_replace_and_extend() {
        let t = TargetTable::with_overrides([("el1", "aaaa"), ("probe", " cgcg\n")]);
        assert_eq!(t.len(), 5);
        assert_eq!(t.get("el1").unwrap(), "AAAA");
        assert_eq!(t.get("probe").unwrap(), "CGCG");
    }

    #[test]
    fn unknown_name_lists_known_targets() {
        let err = TargetTable::builtin().get("el9").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("el9"));
        assert!(msg.contains("el1, el2, el3, el312"));
    }
}
