//! Organization lookups
//!
//! An organization can be referenced either by its internal id or by its
//! display code, and properties use both interchangeably. Property counts
//! are derived by scanning properties, never read from the gateway.

use crate::models::{Organization, Property};

/// Whether `reference` names this organization by id or display code.
/// Comparison ignores case and surrounding whitespace.
pub fn matches_reference(organization: &Organization, reference: &str) -> bool {
    let reference = reference.trim();
    if reference.is_empty() {
        return false;
    }
    organization.id.eq_ignore_ascii_case(reference)
        || organization
            .display_code
            .as_deref()
            .is_some_and(|code| code.eq_ignore_ascii_case(reference))
}

/// Whether a property belongs to this organization
pub fn owns_property(organization: &Organization, property: &Property) -> bool {
    property
        .organization_id
        .as_deref()
        .is_some_and(|reference| matches_reference(organization, reference))
}

pub fn count_properties(organization: &Organization, properties: &[Property]) -> usize {
    properties
        .iter()
        .filter(|p| owns_property(organization, p))
        .count()
}

/// Set `property_count` on every organization from one property scan.
pub fn with_property_counts(
    organizations: Vec<Organization>,
    properties: &[Property],
) -> Vec<Organization> {
    organizations
        .into_iter()
        .map(|mut org| {
            org.property_count = count_properties(&org, properties);
            org
        })
        .collect()
}

pub fn find_by_reference<'a>(
    organizations: &'a [Organization],
    reference: &str,
) -> Option<&'a Organization> {
    organizations
        .iter()
        .find(|org| matches_reference(org, reference))
}
