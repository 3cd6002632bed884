//! Search result bundles.

use serde::{Deserialize, Serialize};

/// A `searchset` Bundle wrapping already-serialized resources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub resource_type: String,
    #[serde(rename = "type")]
    pub bundle_type: String,
    pub total: usize,
    #[serde(default)]
    pub entry: Vec<BundleEntry>,
}

/// One entry of a [`Bundle`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    pub resource: serde_json::Value,
}

impl Bundle {
    /// Builds a searchset bundle from resources. `total` is the number of entries.
    pub fn searchset<T: Serialize>(resources: &[T]) -> serde_json::Result<Self> {
        let entry = resources
            .iter()
            .map(|resource| {
                Ok(BundleEntry {
                    resource: serde_json::to_value(resource)?,
                })
            })
            .collect::<serde_json::Result<Vec<_>>>()?;

        Ok(Self {
            resource_type: "Bundle".to_string(),
            bundle_type: "searchset".to_string(),
            total: entry.len(),
            entry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Patient;

    #[test]
    fn test_searchset() {
        let patients = vec![
            Patient {
                id: Some("a".to_string()),
                ..Default::default()
            },
            Patient {
                id: Some("b".to_string()),
                ..Default::default()
            },
        ];
        let bundle = Bundle::searchset(&patients).unwrap();
        let value = serde_json::to_value(&bundle).unwrap();

        assert_eq!(value["resourceType"], "Bundle");
        assert_eq!(value["type"], "searchset");
        assert_eq!(value["total"], 2);
        assert_eq!(value["entry"][1]["resource"]["id"], "b");
    }

    #[test]
    fn test_empty_searchset() {
        let bundle = Bundle::searchset::<Patient>(&[]).unwrap();
        assert_eq!(bundle.total, 0);
        assert!(bundle.entry.is_empty());
    }
}
