//! Traits for plugging caller-owned data into the engine

use std::collections::HashMap;

use crate::tax::profile::TaxProfile;

/// Read-only access to a snapshot of tax profiles
///
/// The engine never owns where profiles come from. Anything the services layer
/// already deserialised (a catalog, a map, a plain list) can be handed in as long
/// as it can find a profile by id.
pub trait TaxProfileLookup {
    /// Find a profile by id
    fn find_profile(&self, profile_id: &str) -> Option<&TaxProfile>;
}

impl TaxProfileLookup for HashMap<String, TaxProfile> {
    fn find_profile(&self, profile_id: &str) -> Option<&TaxProfile> {
        self.get(profile_id)
    }
}

impl TaxProfileLookup for [TaxProfile] {
    fn find_profile(&self, profile_id: &str) -> Option<&TaxProfile> {
        self.iter().find(|profile| profile.id == profile_id)
    }
}

impl TaxProfileLookup for Vec<TaxProfile> {
    fn find_profile(&self, profile_id: &str) -> Option<&TaxProfile> {
        self.as_slice().find_profile(profile_id)
    }
}
