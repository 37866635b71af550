//! Dependency reconciliation
//!
//! Merges the declared sets from the manifest with the normalized installed
//! and outdated listings into one ordered list of status records:
//! production (manifest order), then development (manifest order), then
//! extraneous packages (listing order).

mod resolve;

pub use resolve::{resolve_latest, resolve_wanted, ResolvedVersions};

use crate::domain::{
    DeclaredDependencies, DependencySpec, DependencyStatus, DependencyType, Dialect,
    InstalledEntry, InstalledMap, OutdatedMap,
};

/// Reconciliation engine bound to the dialect chosen for one call
#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    dialect: Dialect,
}

impl Reconciler {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Build the ordered status list
    pub fn reconcile(
        &self,
        declared: &DeclaredDependencies,
        installed: &InstalledMap,
        outdated: &OutdatedMap,
    ) -> Vec<DependencyStatus> {
        let production = declared
            .production
            .iter()
            .map(|spec| (spec, DependencyType::Prod));
        let development = declared
            .development
            .iter()
            .map(|spec| (spec, DependencyType::Dev));

        let mut records: Vec<DependencyStatus> = production
            .chain(development)
            .map(|(spec, kind)| self.declared_record(spec, kind, installed, outdated))
            .collect();

        records.extend(
            installed
                .iter()
                .filter(|entry| is_extraneous(entry, declared))
                .map(|entry| self.extraneous_record(entry, outdated)),
        );

        records
    }

    fn declared_record(
        &self,
        spec: &DependencySpec,
        kind: DependencyType,
        installed: &InstalledMap,
        outdated: &OutdatedMap,
    ) -> DependencyStatus {
        let versions =
            ResolvedVersions::resolve(installed.version_of(&spec.name), outdated.get(&spec.name));
        self.record(&spec.name, kind, Some(spec.required.clone()), versions)
    }

    fn extraneous_record(&self, entry: &InstalledEntry, outdated: &OutdatedMap) -> DependencyStatus {
        let versions = ResolvedVersions::resolve(entry.version.as_deref(), outdated.get(&entry.name));
        self.record(&entry.name, DependencyType::Extraneous, None, versions)
    }

    fn record(
        &self,
        name: &str,
        kind: DependencyType,
        required: Option<String>,
        versions: ResolvedVersions,
    ) -> DependencyStatus {
        DependencyStatus {
            repo: self.dialect,
            name: name.to_string(),
            kind,
            required,
            installed: versions.installed,
            wanted: versions.wanted,
            latest: versions.latest,
        }
    }
}

/// An installed package is extraneous when the tool flags it so, or, for
/// dialects without the flag, when neither declared set names it. A declared
/// package is never extraneous.
fn is_extraneous(entry: &InstalledEntry, declared: &DeclaredDependencies) -> bool {
    if declared.declares(&entry.name) {
        return false;
    }
    entry.extraneous.unwrap_or(true)
}

/// Reconcile declared sets with tool listings for one dialect
pub fn reconcile(
    production: &[DependencySpec],
    development: &[DependencySpec],
    installed: &InstalledMap,
    outdated: &OutdatedMap,
    dialect: Dialect,
) -> Vec<DependencyStatus> {
    let declared = DeclaredDependencies {
        production: production.to_vec(),
        development: development.to_vec(),
    };
    Reconciler::new(dialect).reconcile(&declared, installed, outdated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OutdatedEntry;

    fn spec(name: &str, required: &str) -> DependencySpec {
        DependencySpec::new(name, required)
    }

    fn installed(entries: &[(&str, Option<&str>, Option<bool>)]) -> InstalledMap {
        entries
            .iter()
            .map(|(name, version, extraneous)| {
                let entry = InstalledEntry::new(*name, version.map(String::from));
                match extraneous {
                    Some(flag) => entry.with_extraneous(*flag),
                    None => entry,
                }
            })
            .collect()
    }

    fn names(records: &[DependencyStatus]) -> Vec<(&str, DependencyType)> {
        records.iter().map(|r| (r.name.as_str(), r.kind)).collect()
    }

    #[test]
    fn test_up_to_date_production_dependency() {
        let records = reconcile(
            &[spec("a", "^1.0.0")],
            &[],
            &installed(&[("a", Some("1.2.0"), Some(false))]),
            &OutdatedMap::new(),
            Dialect::Npm,
        );

        assert_eq!(
            records,
            vec![DependencyStatus {
                repo: Dialect::Npm,
                name: "a".to_string(),
                kind: DependencyType::Prod,
                required: Some("^1.0.0".to_string()),
                installed: Some("1.2.0".to_string()),
                wanted: Some("1.2.0".to_string()),
                latest: Some("1.2.0".to_string()),
            }]
        );
    }

    #[test]
    fn test_flagged_extraneous_package() {
        let records = reconcile(
            &[],
            &[],
            &installed(&[("b", Some("2.0.0"), Some(true))]),
            &OutdatedMap::new(),
            Dialect::Npm,
        );

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, DependencyType::Extraneous);
        assert_eq!(records[0].installed.as_deref(), Some("2.0.0"));
        assert!(records[0].required.is_none());
    }

    #[test]
    fn test_unflagged_npm_package_is_not_extraneous() {
        let records = reconcile(
            &[],
            &[],
            &installed(&[("transitive", Some("1.0.0"), Some(false))]),
            &OutdatedMap::new(),
            Dialect::Npm,
        );
        assert!(records.is_empty());
    }

    #[test]
    fn test_dialect_without_flag_uses_manifest() {
        let records = reconcile(
            &[spec("declared", "^1.0.0")],
            &[],
            &installed(&[
                ("stray", Some("0.1.0"), None),
                ("declared", Some("1.0.0"), None),
            ]),
            &OutdatedMap::new(),
            Dialect::Yarn,
        );

        assert_eq!(
            names(&records),
            vec![
                ("declared", DependencyType::Prod),
                ("stray", DependencyType::Extraneous)
            ]
        );
        assert!(records.iter().all(|r| r.repo == Dialect::Yarn));
    }

    #[test]
    fn test_declared_name_flagged_extraneous_is_not_duplicated() {
        let records = reconcile(
            &[spec("a", "^1.0.0")],
            &[],
            &installed(&[("a", Some("1.0.0"), Some(true))]),
            &OutdatedMap::new(),
            Dialect::Npm,
        );
        assert_eq!(names(&records), vec![("a", DependencyType::Prod)]);
    }

    #[test]
    fn test_ordering_prod_dev_extraneous() {
        let records = reconcile(
            &[spec("zod", "^3.0.0"), spec("axios", "^1.0.0")],
            &[spec("vitest", "^1.0.0"), spec("eslint", "^8.0.0")],
            &installed(&[
                ("extra-z", Some("1.0.0"), Some(true)),
                ("axios", Some("1.6.0"), Some(false)),
                ("extra-a", Some("1.0.0"), Some(true)),
            ]),
            &OutdatedMap::new(),
            Dialect::Npm,
        );

        assert_eq!(
            names(&records),
            vec![
                ("zod", DependencyType::Prod),
                ("axios", DependencyType::Prod),
                ("vitest", DependencyType::Dev),
                ("eslint", DependencyType::Dev),
                ("extra-z", DependencyType::Extraneous),
                ("extra-a", DependencyType::Extraneous),
            ]
        );
    }

    #[test]
    fn test_name_in_both_sets_yields_two_records() {
        let records = reconcile(
            &[spec("shared", "^1.0.0")],
            &[spec("shared", "^1.1.0")],
            &installed(&[("shared", Some("1.1.2"), Some(false))]),
            &OutdatedMap::new(),
            Dialect::Npm,
        );

        assert_eq!(
            names(&records),
            vec![("shared", DependencyType::Prod), ("shared", DependencyType::Dev)]
        );
        assert_eq!(records[0].required.as_deref(), Some("^1.0.0"));
        assert_eq!(records[1].required.as_deref(), Some("^1.1.0"));
        assert_eq!(records[1].installed.as_deref(), Some("1.1.2"));
    }

    #[test]
    fn test_declared_but_never_installed() {
        let records = reconcile(
            &[],
            &[spec("typescript", "^5.0.0")],
            &InstalledMap::new(),
            &OutdatedMap::new(),
            Dialect::Npm,
        );

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.kind, DependencyType::Dev);
        assert!(record.installed.is_none());
        assert!(record.wanted.is_none());
        assert!(record.latest.is_none());
    }

    #[test]
    fn test_outdated_values_attach_to_declared_record() {
        let mut outdated = OutdatedMap::new();
        outdated.insert("react".to_string(), OutdatedEntry::new(Some("18.3.1"), Some("19.0.0")));

        let records = reconcile(
            &[spec("react", "^18.0.0")],
            &[],
            &installed(&[("react", Some("18.2.0"), Some(false))]),
            &outdated,
            Dialect::Npm,
        );

        assert_eq!(records[0].installed.as_deref(), Some("18.2.0"));
        assert_eq!(records[0].wanted.as_deref(), Some("18.3.1"));
        assert_eq!(records[0].latest.as_deref(), Some("19.0.0"));
    }

    #[test]
    fn test_outdated_only_name_is_not_emitted() {
        let mut outdated = OutdatedMap::new();
        outdated.insert("ghost".to_string(), OutdatedEntry::new(Some("1.0.0"), Some("1.0.0")));

        let records = reconcile(&[], &[], &InstalledMap::new(), &outdated, Dialect::Npm);
        assert!(records.is_empty());
    }

    #[test]
    fn test_reconcile_is_stable() {
        let production = [spec("a", "^1.0.0"), spec("b", "^2.0.0")];
        let listing = installed(&[
            ("c", Some("1.0.0"), Some(true)),
            ("a", Some("1.0.0"), Some(false)),
        ]);
        let first = reconcile(&production, &[], &listing, &OutdatedMap::new(), Dialect::Npm);
        let second = reconcile(&production, &[], &listing, &OutdatedMap::new(), Dialect::Npm);
        assert_eq!(first, second);
    }

    #[test]
    fn test_reconciler_dialect() {
        assert_eq!(Reconciler::new(Dialect::Yarn).dialect(), Dialect::Yarn);
    }
}
