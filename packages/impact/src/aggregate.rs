//! Demographic roll-ups over household records.
//!
//! Both functions are single passes that never mutate their input and
//! never fail: incomplete demographic fields are excluded from the cells
//! that need them and still counted everywhere else.

use std::borrow::Borrow;

use flood_map_household_models::{HouseholdComposition, HouseholdRecord};
use flood_map_impact_models::{AgeBucket, DemographicSummary, DistrictSummary};

/// Rolls up heads and members of `households` into a [`DemographicSummary`].
///
/// Each person with a known age and gender lands in exactly one
/// gender/age cell; everyone else is tallied in `unbucketed`. Flag
/// counters are independent of each other and of the cells. For households
/// that only stored counts, the head is bucketed from its own profile and
/// the flag counters come from the stored counts.
///
/// The result does not depend on the order of `households`.
#[must_use]
pub fn aggregate<H: Borrow<HouseholdRecord>>(households: &[H]) -> DemographicSummary {
    let mut summary = DemographicSummary::default();

    for household in households {
        let household = household.borrow();
        let total = u64::from(household.total_members());
        let counted = match &household.composition {
            HouseholdComposition::Counted(counts) => Some(counts),
            HouseholdComposition::Enumerated(_) => None,
        };

        summary.total_households += 1;
        summary.total_persons += total;

        let mut bucketed = 0_u64;
        for person in household.persons() {
            if let (Some(age), Some(gender)) = (person.age, person.gender) {
                summary.by_gender_age.add(gender, AgeBucket::from_age(age));
                bucketed += 1;
            }

            if counted.is_none() {
                summary.pwd += u64::from(person.is_pwd);
                summary.indigenous += u64::from(person.is_indigenous);
                summary.pregnant += u64::from(person.is_pregnant);
            }
        }
        summary.unbucketed += total.saturating_sub(bucketed);

        if let Some(counts) = counted {
            summary.pwd += u64::from(counts.pwd);
            summary.indigenous += u64::from(counts.indigenous);
            summary.pregnant += u64::from(counts.pregnant);
        }
    }

    summary
}

/// Headline counts across every household given, regardless of flooding.
///
/// Male counts are derived per household as total members minus female
/// members, which is how count-only households have always been read.
/// A person with no recorded gender therefore counts as male.
#[must_use]
pub fn summary_across_district<H: Borrow<HouseholdRecord>>(households: &[H]) -> DistrictSummary {
    let mut summary = DistrictSummary::default();

    for household in households {
        let household = household.borrow();
        let total = u64::from(household.total_members());
        let female = u64::from(household.female_count()).min(total);

        summary.total_households += 1;
        summary.total_persons += total;
        summary.total_female += female;
        summary.total_male += total - female;
        summary.total_indigenous += u64::from(household.indigenous_count());
        summary.total_disabled += u64::from(household.pwd_count());
    }

    summary
}
