//! Populated views of companies and users, ready for the
//! [`HierarchyBuilder`](super::hierarchy::HierarchyBuilder).
//!
//! References carry just an identity and, when the referenced entity was
//! found, its label. Anything else about the referenced entity stays behind
//! in the directory.

use uuid::Uuid;

use super::{
    Company, User,
    hierarchy::{Entity, Record},
    user::UserLabel,
};

/// A partially populated reference to another entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    /// The referenced identity.
    pub id: Uuid,
    /// The referenced entity's label, when it could be resolved.
    pub label: Option<String>,
}

impl EntityRef {
    /// A reference to an entity that could not be resolved.
    #[must_use]
    pub const fn unresolved(id: Uuid) -> Self {
        Self { id, label: None }
    }
}

impl Entity for EntityRef {
    type Id = Uuid;

    fn identity(&self) -> Option<Uuid> {
        Some(self.id)
    }

    fn display_label(&self) -> Option<String> {
        self.label.clone()
    }
}

/// A company with its parent and subsidiaries populated.
#[derive(Debug, Clone)]
pub struct CompanyRecord<'a> {
    /// The company itself.
    pub company: &'a Company,
    /// The owning company.
    pub parent: Option<EntityRef>,
    /// Companies that name this one as their parent.
    pub subsidiaries: Vec<EntityRef>,
}

/// A reference to `company`, labelled the way org charts show it.
#[must_use]
pub fn company_ref(company: &Company) -> EntityRef {
    EntityRef {
        id: company.id,
        label: Some(company.label()),
    }
}

impl Entity for CompanyRecord<'_> {
    type Id = Uuid;

    fn identity(&self) -> Option<Uuid> {
        Some(self.company.id)
    }

    fn display_label(&self) -> Option<String> {
        Some(self.company.label())
    }
}

impl Record for CompanyRecord<'_> {
    type Ref = EntityRef;

    fn parent_ref(&self) -> Option<&EntityRef> {
        self.parent.as_ref()
    }

    fn child_refs(&self) -> &[EntityRef] {
        &self.subsidiaries
    }
}

/// A user with their manager and direct reports populated.
#[derive(Debug, Clone)]
pub struct UserRecord<'a> {
    /// The user.
    pub user: &'a User,
    /// The label chosen for this user.
    pub label: Option<String>,
    /// The user's line manager.
    pub manager: Option<EntityRef>,
    /// Users reporting directly to this one.
    pub direct_reports: Vec<EntityRef>,
}

/// A reference to `user`, labelled according to `label`.
#[must_use]
pub fn user_ref(user: &User, label: UserLabel) -> EntityRef {
    EntityRef {
        id: user.id,
        label: label.apply(user),
    }
}

impl Entity for UserRecord<'_> {
    type Id = Uuid;

    fn identity(&self) -> Option<Uuid> {
        Some(self.user.id)
    }

    fn display_label(&self) -> Option<String> {
        self.label.clone()
    }
}

impl Record for UserRecord<'_> {
    type Ref = EntityRef;

    fn parent_ref(&self) -> Option<&EntityRef> {
        self.manager.as_ref()
    }

    fn child_refs(&self) -> &[EntityRef] {
        &self.direct_reports
    }
}
