//! Organizational branches, keyed by name.

use crate::store::{Audit, Patch, Record};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub company: String,
    pub world_region: String,
    pub region_sector: String,
    pub country: String,
    pub zone: String,
    pub province: String,
    pub city: String,
    pub name: String,
    /// Username of the person who approves this branch's transactions.
    pub approver: String,
    #[serde(flatten)]
    pub audit: Audit,
    #[serde(default)]
    pub is_deleted: bool,
}

impl Record for Branch {
    type Key = String;
    const KIND: &'static str = "Branch";

    fn key(&self) -> String {
        self.name.clone()
    }

    fn is_deleted(&self) -> bool {
        self.is_deleted
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchPatch {
    pub company: Option<String>,
    pub world_region: Option<String>,
    pub region_sector: Option<String>,
    pub country: Option<String>,
    pub zone: Option<String>,
    pub province: Option<String>,
    pub city: Option<String>,
    pub name: Option<String>,
    pub approver: Option<String>,
}

impl Patch<Branch> for BranchPatch {
    fn apply(self, target: &mut Branch) {
        let fields = [
            (self.company, &mut target.company),
            (self.world_region, &mut target.world_region),
            (self.region_sector, &mut target.region_sector),
            (self.country, &mut target.country),
            (self.zone, &mut target.zone),
            (self.province, &mut target.province),
            (self.city, &mut target.city),
            (self.name, &mut target.name),
            (self.approver, &mut target.approver),
        ];
        for (value, slot) in fields {
            if let Some(v) = value {
                *slot = v;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    fn branch(name: &str) -> Branch {
        Branch {
            company: "MMM".into(),
            world_region: "Europe Block C".into(),
            region_sector: "Presbitery 1".into(),
            country: "Luxembourg".into(),
            zone: "Luxembourg".into(),
            province: "Luxembourg".into(),
            city: "Luxembourg".into(),
            name: name.into(),
            approver: "FirstDev".into(),
            audit: Audit::default(),
            is_deleted: false,
        }
    }

    #[test]
    fn test_patch_renames_branch() {
        let mut store = Store::new();
        store.insert(branch("Lux Central")).unwrap();

        store
            .update(&"Lux Central".to_string(), |b| {
                BranchPatch {
                    name: Some("Lux Nord".into()),
                    city: Some("Ettelbruck".into()),
                    ..BranchPatch::default()
                }
                .apply(b);
                Ok(())
            })
            .unwrap();

        assert!(store.get(&"Lux Central".to_string()).is_none());
        let renamed = store.get(&"Lux Nord".to_string()).unwrap();
        assert_eq!(renamed.city, "Ettelbruck");
        assert_eq!(renamed.company, "MMM");
    }

    #[test]
    fn test_delete_by_name() {
        let mut store = Store::new();
        store.insert(branch("A")).unwrap();
        store.insert(branch("B")).unwrap();
        store.delete(&"A".to_string()).unwrap();
        let names: Vec<_> = store.list().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["B"]);
    }
}
