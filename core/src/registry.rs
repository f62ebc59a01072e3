//! Static wire descriptions of the provider's record types.
//!
//! # Design
//! Each record type that can be sent to the provider has one
//! `WireDescriptor`: the fields that are always emitted, the fields emitted
//! only when set, and the wire key each of them travels under. The tables
//! are the serialization contract with the provider and are read, never
//! built, at runtime. Organizations are read-only on the provider side and
//! have no descriptor.

use std::fmt;

/// Tag identifying a domain record type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Worker,
    Task,
    Recipient,
    Destination,
    Address,
    Administrator,
    Vehicle,
    Organization,
}

impl RecordKind {
    pub fn as_str(self) -> &'static str {
        match self {
            RecordKind::Worker => "worker",
            RecordKind::Task => "task",
            RecordKind::Recipient => "recipient",
            RecordKind::Destination => "destination",
            RecordKind::Address => "address",
            RecordKind::Administrator => "administrator",
            RecordKind::Vehicle => "vehicle",
            RecordKind::Organization => "organization",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a field's value is represented on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Emitted as the record reports it.
    Plain,
    /// An instant, emitted as integer seconds since the Unix epoch.
    Timestamp,
}

/// One field of a wire descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Attribute name on the record.
    pub name: &'static str,
    /// Key expected by the provider.
    pub wire: &'static str,
    pub kind: FieldKind,
}

const fn plain(name: &'static str, wire: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        wire,
        kind: FieldKind::Plain,
    }
}

const fn timestamp(name: &'static str, wire: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        wire,
        kind: FieldKind::Timestamp,
    }
}

/// Serialization descriptor for one record type.
#[derive(Debug)]
pub struct WireDescriptor {
    pub kind: RecordKind,
    /// Always emitted, `null` included.
    pub required: &'static [FieldSpec],
    /// Emitted only when present and non-null, in table order.
    pub optional: &'static [FieldSpec],
}

static ADMINISTRATOR: WireDescriptor = WireDescriptor {
    kind: RecordKind::Administrator,
    required: &[plain("name", "name"), plain("email", "email")],
    optional: &[plain("phone", "phone")],
};

static VEHICLE: WireDescriptor = WireDescriptor {
    kind: RecordKind::Vehicle,
    required: &[plain("vehicle_type", "type")],
    optional: &[
        plain("description", "description"),
        plain("license_plate", "licensePlate"),
        plain("color", "color"),
    ],
};

static WORKER: WireDescriptor = WireDescriptor {
    kind: RecordKind::Worker,
    required: &[],
    optional: &[
        plain("vehicle", "vehicle"),
        plain("tasks", "tasks"),
        plain("name", "name"),
        plain("phone", "phone"),
        plain("teams", "team_ids"),
    ],
};

static ADDRESS: WireDescriptor = WireDescriptor {
    kind: RecordKind::Address,
    required: &[],
    optional: &[
        plain("street", "street"),
        plain("number", "number"),
        plain("city", "city"),
        plain("country", "country"),
        plain("name", "name"),
        plain("apartment", "apartment"),
        plain("state", "state"),
        plain("postal_code", "postalCode"),
        plain("unparsed", "unparsed"),
    ],
};

static DESTINATION: WireDescriptor = WireDescriptor {
    kind: RecordKind::Destination,
    required: &[],
    optional: &[
        plain("address", "address"),
        plain("location", "location"),
        plain("notes", "notes"),
    ],
};

static TASK: WireDescriptor = WireDescriptor {
    kind: RecordKind::Task,
    required: &[
        plain("merchant", "merchant"),
        plain("executor", "executor"),
        plain("destination", "destination"),
        plain("recipients", "recipients"),
    ],
    optional: &[
        plain("notes", "notes"),
        plain("pickup_task", "pickupTask"),
        plain("dependencies", "dependencies"),
        timestamp("complete_after", "completeAfter"),
        timestamp("complete_before", "completeBefore"),
    ],
};

static RECIPIENT: WireDescriptor = WireDescriptor {
    kind: RecordKind::Recipient,
    required: &[
        plain("name", "name"),
        plain("phone", "phone"),
        plain("notes", "notes"),
    ],
    optional: &[],
};

/// Look up the wire descriptor for a record type.
///
/// Returns `None` for types the provider never accepts as a payload.
pub fn descriptor(kind: RecordKind) -> Option<&'static WireDescriptor> {
    match kind {
        RecordKind::Administrator => Some(&ADMINISTRATOR),
        RecordKind::Vehicle => Some(&VEHICLE),
        RecordKind::Worker => Some(&WORKER),
        RecordKind::Address => Some(&ADDRESS),
        RecordKind::Destination => Some(&DESTINATION),
        RecordKind::Task => Some(&TASK),
        RecordKind::Recipient => Some(&RECIPIENT),
        RecordKind::Organization => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [RecordKind; 8] = [
        RecordKind::Worker,
        RecordKind::Task,
        RecordKind::Recipient,
        RecordKind::Destination,
        RecordKind::Address,
        RecordKind::Administrator,
        RecordKind::Vehicle,
        RecordKind::Organization,
    ];

    #[test]
    fn descriptor_kind_matches_lookup_key() {
        for kind in ALL {
            if let Some(desc) = descriptor(kind) {
                assert_eq!(desc.kind, kind);
            }
        }
    }

    #[test]
    fn organization_has_no_descriptor() {
        assert!(descriptor(RecordKind::Organization).is_none());
    }

    #[test]
    fn wire_keys_are_unique_per_descriptor() {
        for kind in ALL {
            let Some(desc) = descriptor(kind) else { continue };
            let mut keys: Vec<_> = desc
                .required
                .iter()
                .chain(desc.optional)
                .map(|f| f.wire)
                .collect();
            let total = keys.len();
            keys.sort_unstable();
            keys.dedup();
            assert_eq!(keys.len(), total, "{kind}: duplicate wire key");
        }
    }

    #[test]
    fn only_task_windows_are_timestamps() {
        let stamped: Vec<_> = ALL
            .iter()
            .filter_map(|k| descriptor(*k))
            .flat_map(|d| d.required.iter().chain(d.optional))
            .filter(|f| f.kind == FieldKind::Timestamp)
            .map(|f| f.wire)
            .collect();
        assert_eq!(stamped, ["completeAfter", "completeBefore"]);
    }

    #[test]
    fn renamed_fields_keep_their_wire_keys() {
        let wire = |kind: RecordKind, name: &str| {
            descriptor(kind)
                .unwrap()
                .required
                .iter()
                .chain(descriptor(kind).unwrap().optional)
                .find(|f| f.name == name)
                .map(|f| f.wire)
        };
        assert_eq!(wire(RecordKind::Vehicle, "vehicle_type"), Some("type"));
        assert_eq!(wire(RecordKind::Vehicle, "license_plate"), Some("licensePlate"));
        assert_eq!(wire(RecordKind::Worker, "teams"), Some("team_ids"));
        assert_eq!(wire(RecordKind::Address, "postal_code"), Some("postalCode"));
        assert_eq!(wire(RecordKind::Task, "pickup_task"), Some("pickupTask"));
    }
}
