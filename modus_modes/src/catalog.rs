// Named mode templates, loadable from JSON.
//
// The catalog maps mode names (and aliases) to templates. It is the
// configuration layer for the `modes` binary: a JSON string goes in, a
// typed `ModeCatalog` comes out, and every template is validated during
// deserialization so a bad step list never reaches the builder.
//
// JSON shape:
//
//   {"modes": [{"name": "dorian", "steps": [2,1,2,2,2,1,2], "aliases": []}]}
//
// `default_catalog()` embeds `data/mode_catalog.json` at compile time;
// `ModeCatalog::builtin()` builds the same core set from `ModeKind` without
// touching JSON. Entry order is preserved for listing.

use crate::error::{ModeError, Result};
use crate::template::{ModeKind, ModeTemplate};
use serde::{Deserialize, Serialize};

/// One named template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub steps: ModeTemplate,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl CatalogEntry {
    fn answers_to(&self, wanted: &str) -> bool {
        self.name.to_lowercase() == wanted
            || self.aliases.iter().any(|a| a.to_lowercase() == wanted)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    modes: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeCatalog {
    entries: Vec<CatalogEntry>,
}

impl ModeCatalog {
    /// Parse a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(ModeCatalog {
            entries: file.modes,
        })
    }

    /// The modes `ModeKind` knows about, in `ModeKind::ALL` order.
    pub fn builtin() -> Self {
        let entries = ModeKind::ALL
            .iter()
            .map(|kind| CatalogEntry {
                name: kind.name().to_string(),
                steps: kind.template(),
                aliases: kind.aliases().iter().map(|a| a.to_string()).collect(),
            })
            .collect();
        ModeCatalog { entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Find an entry by name or alias, ignoring case and surrounding space.
    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        let wanted = name.trim().to_lowercase();
        self.entries.iter().find(|e| e.answers_to(&wanted))
    }

    /// The validated template registered under `name`.
    pub fn template(&self, name: &str) -> Result<ModeTemplate> {
        let entry = self
            .get(name)
            .ok_or_else(|| ModeError::UnknownMode(name.to_string()))?;
        entry.steps.validate()?;
        Ok(entry.steps.clone())
    }
}

/// Load the catalog embedded at compile time.
///
/// Panics if `data/mode_catalog.json` is malformed, which the tests below
/// rule out for any released build.
pub fn default_catalog() -> ModeCatalog {
    let json = include_str!("../data/mode_catalog.json");
    ModeCatalog::from_json(json).expect("embedded mode_catalog.json is malformed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_from_json() {
        let json = r#"{"modes": [
            {"name": "Dorian", "steps": [2, 1, 2, 2, 2, 1, 2]},
            {"name": "blues", "steps": [3, 2, 1, 1, 3, 2], "aliases": ["minor blues"]}
        ]}"#;
        let catalog = ModeCatalog::from_json(json).unwrap();
        assert_eq!(catalog.names().collect::<Vec<_>>(), vec!["Dorian", "blues"]);
        assert_eq!(
            catalog.template("dorian").unwrap(),
            ModeKind::Dorian.template()
        );
        assert_eq!(catalog.template(" Minor Blues ").unwrap().len(), 6);
        assert!(catalog.get("blues").unwrap().aliases.contains(&"minor blues".to_string()));
    }

    #[test]
    fn test_invalid_template_rejected_on_load() {
        let json = r#"{"modes": [{"name": "broken", "steps": [1, 2, 3, 5, 2]}]}"#;
        assert!(matches!(
            ModeCatalog::from_json(json),
            Err(ModeError::Catalog(_))
        ));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            ModeCatalog::from_json("{\"modes\": ["),
            Err(ModeError::Catalog(_))
        ));
    }

    #[test]
    fn test_unknown_mode() {
        let catalog = ModeCatalog::builtin();
        assert!(matches!(
            catalog.template("hypodorian"),
            Err(ModeError::UnknownMode(name)) if name == "hypodorian"
        ));
    }

    #[test]
    fn test_builtin_matches_mode_kind() {
        let catalog = ModeCatalog::builtin();
        assert_eq!(catalog.entries().len(), ModeKind::ALL.len());
        for kind in ModeKind::ALL {
            assert_eq!(catalog.template(kind.name()).unwrap(), kind.template());
        }
        assert_eq!(
            catalog.template("altered").unwrap(),
            ModeKind::SuperLocrian.template()
        );
    }

    #[test]
    fn test_default_catalog_covers_builtin() {
        let catalog = default_catalog();
        for entry in ModeCatalog::builtin().entries() {
            assert_eq!(catalog.template(&entry.name).unwrap(), entry.steps);
            for alias in &entry.aliases {
                assert_eq!(catalog.template(alias).unwrap(), entry.steps);
            }
        }
        assert_eq!(catalog.template("whole tone").unwrap().len(), 6);
    }
}
