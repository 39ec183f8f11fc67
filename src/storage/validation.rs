use std::collections::HashMap;

use petgraph::{algo::tarjan_scc, graphmap::DiGraphMap};
use uuid::Uuid;

use crate::{
    domain::{CompanyCode, CoordinateError},
    storage::Directory,
};

/// A rule the directory contents break.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Two companies share a code.
    #[error("company code {code} is already in use by {first}")]
    DuplicateCompanyCode {
        /// The repeated code.
        code: CompanyCode,
        /// The company listed first.
        first: Uuid,
        /// The company repeating the code.
        second: Uuid,
    },
    /// A company names itself as its parent.
    #[error("company {company} cannot reference itself as parent")]
    SelfParent {
        /// The offending company.
        company: Uuid,
    },
    /// A company's parent has been decommissioned.
    #[error("company {company} has decommissioned parent {parent}")]
    DecommissionedParent {
        /// The offending company.
        company: Uuid,
        /// Its decommissioned parent.
        parent: Uuid,
    },
    /// Two users share an email address.
    #[error("email {email} must be unique, used by {first} and {second}")]
    DuplicateEmail {
        /// The repeated address.
        email: String,
        /// The user listed first.
        first: Uuid,
        /// The user repeating the address.
        second: Uuid,
    },
    /// Coordinates out of range.
    #[error("geolocation {geolocation}: {error}")]
    Coordinates {
        /// The offending geolocation.
        geolocation: Uuid,
        /// What is wrong with it.
        error: CoordinateError,
    },
    /// A reference points at nothing.
    #[error("{owner} references unknown {kind} {target}")]
    DanglingReference {
        /// The entity holding the reference.
        owner: Uuid,
        /// What kind of entity was expected.
        kind: &'static str,
        /// The missing id.
        target: Uuid,
    },
    /// Ownership or reporting lines loop.
    #[error("{kind} cycle: {}", join_ids(.members))]
    Cycle {
        /// `"ownership"` or `"reporting"`.
        kind: &'static str,
        /// Ids forming the cycle.
        members: Vec<Uuid>,
    },
}

impl Directory {
    /// Checks every integrity rule and returns the violations found.
    ///
    /// An empty result means the directory is consistent. Dangling references
    /// are reported here even though org charts tolerate them as
    /// placeholders.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        self.validate_companies(&mut errors);
        self.validate_departments(&mut errors);
        self.validate_users(&mut errors);
        self.validate_geolocations(&mut errors);
        tracing::debug!(count = errors.len(), "validation finished");
        errors
    }

    fn validate_companies(&self, errors: &mut Vec<ValidationError>) {
        let mut codes: HashMap<&CompanyCode, Uuid> = HashMap::new();

        for company in self.companies() {
            if let Some(&first) = codes.get(&company.code) {
                errors.push(ValidationError::DuplicateCompanyCode {
                    code: company.code.clone(),
                    first,
                    second: company.id,
                });
            } else {
                codes.insert(&company.code, company.id);
            }

            if let Some(parent) = company.parent {
                if parent == company.id {
                    errors.push(ValidationError::SelfParent {
                        company: company.id,
                    });
                } else {
                    match self.company(parent) {
                        Some(p) if p.is_decommissioned() => {
                            errors.push(ValidationError::DecommissionedParent {
                                company: company.id,
                                parent,
                            });
                        }
                        Some(_) => {}
                        None => errors.push(dangling(company.id, "company", parent)),
                    }
                }
            }

            for &site in &company.geolocations {
                if self.geolocation(site).is_none() {
                    errors.push(dangling(company.id, "geolocation", site));
                }
            }
        }

        // Self-parenting is reported above.
        let ownership = self
            .companies()
            .iter()
            .filter_map(|c| Some((c.id, c.parent?)));
        for members in cycles(ownership).into_iter().filter(|m| m.len() > 1) {
            errors.push(ValidationError::Cycle {
                kind: "ownership",
                members,
            });
        }
    }

    fn validate_departments(&self, errors: &mut Vec<ValidationError>) {
        for department in self.departments() {
            if self.company(department.company).is_none() {
                errors.push(dangling(department.id, "company", department.company));
            }
            if let Some(site) = department.geolocation {
                if self.geolocation(site).is_none() {
                    errors.push(dangling(department.id, "geolocation", site));
                }
            }
        }
    }

    fn validate_users(&self, errors: &mut Vec<ValidationError>) {
        let mut emails: HashMap<String, Uuid> = HashMap::new();

        for user in self.users() {
            if let Some(email) = &user.email {
                let key = email.to_lowercase();
                if let Some(&first) = emails.get(&key) {
                    errors.push(ValidationError::DuplicateEmail {
                        email: email.clone(),
                        first,
                        second: user.id,
                    });
                } else {
                    emails.insert(key, user.id);
                }
            }
            if let Some(department) = user.department {
                if self.department(department).is_none() {
                    errors.push(dangling(user.id, "department", department));
                }
            }
            if let Some(manager) = user.manager {
                if self.user(manager).is_none() {
                    errors.push(dangling(user.id, "manager", manager));
                }
            }
        }

        let reporting = self.users().iter().filter_map(|u| Some((u.id, u.manager?)));
        for members in cycles(reporting) {
            errors.push(ValidationError::Cycle {
                kind: "reporting",
                members,
            });
        }
    }

    fn validate_geolocations(&self, errors: &mut Vec<ValidationError>) {
        for site in self.geolocations() {
            if let Err(error) = site.check() {
                errors.push(ValidationError::Coordinates {
                    geolocation: site.id,
                    error,
                });
            }
        }
    }
}

/// Every loop in a set of `(child, parent)` links, self-links included.
///
/// Members of each loop are sorted, as are the loops themselves.
fn cycles(links: impl IntoIterator<Item = (Uuid, Uuid)>) -> Vec<Vec<Uuid>> {
    let graph: DiGraphMap<Uuid, ()> = links.into_iter().collect();

    let mut cycles: Vec<_> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || graph.contains_edge(component[0], component[0])
        })
        .map(|mut component| {
            component.sort();
            component
        })
        .collect();
    cycles.sort();
    cycles
}

fn join_ids(ids: &[Uuid]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ")
}

const fn dangling(owner: Uuid, kind: &'static str, target: Uuid) -> ValidationError {
    ValidationError::DanglingReference {
        owner,
        kind,
        target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{Config, Geolocation},
        storage::directory::fixtures::{Org, company, org},
    };

    fn validate(org: &Org, edit: impl FnOnce(&mut crate::Snapshot)) -> Vec<ValidationError> {
        let mut snapshot = org.directory.snapshot();
        edit(&mut snapshot);
        Directory::from_snapshot(snapshot, Config::default())
            .unwrap()
            .validate()
    }

    #[test]
    fn fixture_is_valid() {
        assert!(org().directory.validate().is_empty());
    }

    #[test]
    fn duplicate_codes_are_reported() {
        let copy = company("Copycat", "0001");
        let errors = validate(&org(), |s| s.companies.push(copy.clone()));

        assert_eq!(errors.len(), 1);
        assert!(matches!(
            &errors[0],
            ValidationError::DuplicateCompanyCode { second, .. } if *second == copy.id
        ));
    }

    #[test]
    fn self_parent_is_reported_once() {
        let errors = validate(&org(), |s| s.companies[0].parent = Some(s.companies[0].id));

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::SelfParent { .. }));
    }

    #[test]
    fn decommissioned_parent_is_reported() {
        let org = org();
        let errors = validate(&org, |s| s.companies[1].parent = Some(org.fwiendly));

        assert_eq!(
            errors,
            [ValidationError::DecommissionedParent {
                company: org.bisho,
                parent: org.fwiendly,
            }]
        );
    }

    #[test]
    fn ownership_cycle_is_reported() {
        let org = org();
        let errors = validate(&org, |s| s.companies[0].parent = Some(org.bisho));

        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::Cycle { kind: "ownership", members } if members.len() == 2
        )));
    }

    #[test]
    fn ownership_cycle_is_reported_alongside_self_parent() {
        let org = org();
        let mut selfish = company("Selfish", "7");
        selfish.parent = Some(selfish.id);
        let selfish_id = selfish.id;

        let errors = validate(&org, |s| {
            s.companies.insert(0, selfish);
            s.companies[1].parent = Some(org.bisho);
        });

        let mut loop_members = vec![org.arveti, org.bisho];
        loop_members.sort();
        assert_eq!(
            errors,
            [
                ValidationError::SelfParent {
                    company: selfish_id
                },
                ValidationError::Cycle {
                    kind: "ownership",
                    members: loop_members,
                },
            ]
        );
    }

    #[test]
    fn every_reporting_cycle_is_reported() {
        let org = org();
        let errors = validate(&org, |s| {
            s.users[0].manager = Some(org.bo);
            s.users[3].manager = Some(org.gustav);
            s.users[4].manager = Some(org.anna);
        });

        let mut expected = vec![
            vec![org.osten, org.bo],
            vec![org.anna, org.gustav],
        ];
        for members in &mut expected {
            members.sort();
        }
        expected.sort();
        let found: Vec<_> = errors
            .into_iter()
            .map(|e| match e {
                ValidationError::Cycle {
                    kind: "reporting",
                    members,
                } => members,
                other => panic!("unexpected problem: {other}"),
            })
            .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn self_managed_user_is_a_reporting_cycle() {
        let org = org();
        let errors = validate(&org, |s| s.users[4].manager = Some(org.gustav));

        assert_eq!(
            errors,
            [ValidationError::Cycle {
                kind: "reporting",
                members: vec![org.gustav],
            }]
        );
    }

    #[test]
    fn duplicate_emails_ignore_case() {
        let errors = validate(&org(), |s| {
            s.users[1].email = Some("Osten.Aberg@arveti.se".to_string());
        });

        assert!(matches!(
            &errors[..],
            [ValidationError::DuplicateEmail { email, .. }] if email == "Osten.Aberg@arveti.se"
        ));
    }

    #[test]
    fn dangling_references_are_reported() {
        let ghost = Uuid::new_v4();
        let errors = validate(&org(), |s| {
            s.departments[0].company = ghost;
            s.users[4].manager = Some(ghost);
        });

        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(|e| matches!(
            e,
            ValidationError::DanglingReference { target, .. } if *target == ghost
        )));
    }

    #[test]
    fn bad_coordinates_are_reported() {
        let errors = validate(&org(), |s| {
            s.geolocations.push(Geolocation {
                id: Uuid::new_v4(),
                latitude: 95.0,
                longitude: 0.0,
                city: None,
                primary_language: None,
            });
        });

        assert!(matches!(
            errors[..],
            [ValidationError::Coordinates {
                error: CoordinateError::Latitude(_),
                ..
            }]
        ));
        assert!(errors[0].to_string().contains("latitude 95"));
    }
}
