//! Behaviour shared by every resource type.

use crate::{Observation, Patient};

/// A FHIR resource with a fixed `resourceType`.
pub trait Resource {
    /// The `resourceType` value this type serializes with.
    const RESOURCE_TYPE: &'static str;

    /// The `resourceType` carried by this instance, which may differ after decoding.
    fn resource_type(&self) -> &str;

    /// The logical id, if any.
    fn id(&self) -> Option<&str>;
}

impl Resource for Patient {
    const RESOURCE_TYPE: &'static str = "Patient";

    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

impl Resource for Observation {
    const RESOURCE_TYPE: &'static str = "Observation";

    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}
