#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Household records and the demographic profile of their occupants.
//!
//! Stored households come in two shapes: newer documents enumerate every
//! member, older ones only kept precomputed counts. [`HouseholdComposition`]
//! keeps the two apart so aggregation can handle each explicitly.

use flood_map_geography_models::GeoPoint;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Recorded gender of a household head or member.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Gender {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl Gender {
    /// Index used for two-row gender tables (male first).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Male => 0,
            Self::Female => 1,
        }
    }

    /// Returns all variants in table order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Male, Self::Female]
    }
}

/// Demographic profile of one person in a household.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Full name.
    pub name: String,
    /// Age in whole years. `None` when missing or unparseable in the source.
    pub age: Option<u32>,
    /// Gender. `None` when missing or unrecognized in the source.
    pub gender: Option<Gender>,
    /// Contact number.
    pub contact: Option<String>,
    /// Person with disability.
    pub is_pwd: bool,
    /// Member of an indigenous people.
    pub is_indigenous: bool,
    /// Pregnant. Recorded as given; not cross-checked against gender.
    pub is_pregnant: bool,
}

impl Person {
    /// Creates a person with only a name set.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Precomputed household counts from documents that never listed members.
///
/// Every count covers the whole household, head included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdCounts {
    /// Everyone in the household, at least 1 (the head).
    pub total_members: u32,
    /// Female occupants.
    pub female: u32,
    /// Occupants with disability.
    pub pwd: u32,
    /// Indigenous occupants.
    pub indigenous: u32,
    /// Pregnant occupants.
    pub pregnant: u32,
}

impl HouseholdCounts {
    /// Creates counts for a household of `total_members` people, clamped to
    /// at least the head.
    #[must_use]
    pub fn new(total_members: u32) -> Self {
        Self {
            total_members: total_members.max(1),
            female: 0,
            pwd: 0,
            indigenous: 0,
            pregnant: 0,
        }
    }
}

/// Who lives in a household besides the head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseholdComposition {
    /// Every member other than the head is listed.
    Enumerated(Vec<Person>),
    /// Only aggregate counts were stored.
    Counted(HouseholdCounts),
}

impl Default for HouseholdComposition {
    fn default() -> Self {
        Self::Enumerated(Vec::new())
    }
}

/// Visibility state of a household.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum HouseholdStatus {
    /// Shown in active views and included in analysis.
    #[default]
    Active,
    /// Soft-deleted: hidden but recoverable.
    Archived,
}

/// Error returned for an archive lifecycle transition that isn't allowed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HouseholdStateError {
    /// The household is already archived.
    #[error("household {id} is already archived")]
    AlreadyArchived {
        /// Household identifier.
        id: String,
    },
    /// Only archived households can be restored.
    #[error("household {id} is not archived")]
    NotArchived {
        /// Household identifier.
        id: String,
    },
    /// Permanent deletion requires the household to be archived first.
    #[error("household {id} must be archived before it can be permanently deleted")]
    NotPurgeable {
        /// Household identifier.
        id: String,
    },
}

/// One dwelling and its occupants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseholdRecord {
    /// Document identifier.
    pub id: String,
    /// House number as written on the form.
    pub house_number: Option<String>,
    /// Dwelling location.
    pub position: GeoPoint,
    /// District (barangay) identifier in stored camel-case form.
    pub district: String,
    /// Household head.
    pub head: Person,
    /// Remaining occupants.
    pub composition: HouseholdComposition,
    /// Active or archived.
    #[serde(default)]
    pub status: HouseholdStatus,
}

impl HouseholdRecord {
    /// Creates an active household with no members besides the head.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        position: GeoPoint,
        district: impl Into<String>,
        head: Person,
    ) -> Self {
        Self {
            id: id.into(),
            house_number: None,
            position,
            district: district.into(),
            head,
            composition: HouseholdComposition::default(),
            status: HouseholdStatus::Active,
        }
    }

    /// Number of people in the household, head included.
    #[must_use]
    pub fn total_members(&self) -> u32 {
        match &self.composition {
            HouseholdComposition::Enumerated(members) => {
                u32::try_from(members.len()).unwrap_or(u32::MAX).saturating_add(1)
            }
            HouseholdComposition::Counted(counts) => counts.total_members.max(1),
        }
    }

    /// Listed members, excluding the head. Empty for count-only households.
    #[must_use]
    pub fn members(&self) -> &[Person] {
        match &self.composition {
            HouseholdComposition::Enumerated(members) => members,
            HouseholdComposition::Counted(_) => &[],
        }
    }

    /// The head followed by every listed member.
    pub fn persons(&self) -> impl Iterator<Item = &Person> {
        std::iter::once(&self.head).chain(self.members())
    }

    /// Female occupants.
    #[must_use]
    pub fn female_count(&self) -> u32 {
        self.count_where(|p| p.gender == Some(Gender::Female), |c| c.female)
    }

    /// Occupants with disability.
    #[must_use]
    pub fn pwd_count(&self) -> u32 {
        self.count_where(|p| p.is_pwd, |c| c.pwd)
    }

    /// Indigenous occupants.
    #[must_use]
    pub fn indigenous_count(&self) -> u32 {
        self.count_where(|p| p.is_indigenous, |c| c.indigenous)
    }

    /// Pregnant occupants.
    #[must_use]
    pub fn pregnant_count(&self) -> u32 {
        self.count_where(|p| p.is_pregnant, |c| c.pregnant)
    }

    fn count_where(
        &self,
        enumerated: impl Fn(&Person) -> bool,
        counted: impl Fn(&HouseholdCounts) -> u32,
    ) -> u32 {
        match &self.composition {
            HouseholdComposition::Enumerated(_) => {
                let n = self.persons().filter(|p| enumerated(p)).count();
                u32::try_from(n).unwrap_or(u32::MAX)
            }
            HouseholdComposition::Counted(counts) => counted(counts),
        }
    }

    /// Returns `true` if the household appears in active views.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == HouseholdStatus::Active
    }

    /// Moves the household to the archive.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdStateError::AlreadyArchived`] if it is already
    /// archived.
    pub fn archive(&mut self) -> Result<(), HouseholdStateError> {
        if self.status == HouseholdStatus::Archived {
            return Err(HouseholdStateError::AlreadyArchived {
                id: self.id.clone(),
            });
        }
        self.status = HouseholdStatus::Archived;
        Ok(())
    }

    /// Restores an archived household to active views.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdStateError::NotArchived`] if it is active.
    pub fn restore(&mut self) -> Result<(), HouseholdStateError> {
        if self.status != HouseholdStatus::Archived {
            return Err(HouseholdStateError::NotArchived {
                id: self.id.clone(),
            });
        }
        self.status = HouseholdStatus::Active;
        Ok(())
    }

    /// Checks that the household may be permanently deleted.
    ///
    /// # Errors
    ///
    /// Returns [`HouseholdStateError::NotPurgeable`] unless it is archived.
    pub fn ensure_purgeable(&self) -> Result<(), HouseholdStateError> {
        if self.status == HouseholdStatus::Archived {
            Ok(())
        } else {
            Err(HouseholdStateError::NotPurgeable {
                id: self.id.clone(),
            })
        }
    }
}
