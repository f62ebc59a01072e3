//! Domain records for the Onfleet API.
//!
//! # Design
//! Records deserialize straight from provider responses: camelCase keys, every
//! field defaulted, so partial payloads (e.g. a worker without a vehicle)
//! still parse. Encoding goes the other way through [`DomainRecord`]: the
//! encoder asks a record for its attributes by name and the wire tables in
//! `registry` decide which ones are sent and under which key. Records never
//! implement `Serialize` themselves, which keeps the registry the single
//! source of the outgoing shape.
//!
//! Instants are epoch seconds on the wire in both directions.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::registry::RecordKind;

/// Capability every domain record implements so it can be described for the wire.
pub trait DomainRecord {
    fn kind(&self) -> RecordKind;

    /// Value of the attribute `name`.
    ///
    /// `None` means the record has no such attribute; `Some(FieldValue::Null)`
    /// means it has one but it is unset.
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}

/// An attribute value as seen by the encoder.
#[derive(Clone)]
pub enum FieldValue<'a> {
    Null,
    /// Already JSON; emitted unchanged.
    Json(Value),
    Timestamp(DateTime<Utc>),
    /// A nested record, encoded through its own descriptor.
    Record(&'a dyn DomainRecord),
    List(Vec<FieldValue<'a>>),
}

impl<'a> FieldValue<'a> {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    fn text(value: &str) -> Self {
        FieldValue::Json(Value::from(value))
    }

    fn opt_text(value: Option<&str>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::text)
    }

    fn opt_json<T: Into<Value> + Clone>(value: &Option<T>) -> Self {
        match value {
            Some(v) => FieldValue::Json(v.clone().into()),
            None => FieldValue::Null,
        }
    }

    fn opt_timestamp(value: Option<DateTime<Utc>>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Timestamp)
    }
}

impl std::fmt::Debug for FieldValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Null => f.write_str("Null"),
            FieldValue::Json(v) => f.debug_tuple("Json").field(v).finish(),
            FieldValue::Timestamp(t) => f.debug_tuple("Timestamp").field(t).finish(),
            FieldValue::Record(r) => f.debug_tuple("Record").field(&r.kind()).finish(),
            FieldValue::List(items) => f.debug_tuple("List").field(items).finish(),
        }
    }
}

/// Either a provider id or an inline record.
///
/// Tasks may point at an existing destination or recipient by id, or carry
/// the full record to be created alongside the task.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Ref<T> {
    Id(String),
    Inline(T),
}

impl<T: DomainRecord> Ref<T> {
    fn to_field(&self) -> FieldValue<'_> {
        match self {
            Ref::Id(id) => FieldValue::text(id),
            Ref::Inline(record) => FieldValue::Record(record),
        }
    }
}

// ---------------------------------------------------------------------------
// Vehicle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VehicleType {
    #[default]
    Car,
    Motorcycle,
    Bicycle,
    Truck,
}

impl VehicleType {
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleType::Car => "CAR",
            VehicleType::Motorcycle => "MOTORCYCLE",
            VehicleType::Bicycle => "BICYCLE",
            VehicleType::Truck => "TRUCK",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Vehicle {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub description: Option<String>,
    pub license_plate: Option<String>,
    pub color: Option<String>,
}

impl DomainRecord for Vehicle {
    fn kind(&self) -> RecordKind {
        RecordKind::Vehicle
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::opt_text(self.id.as_deref()),
            "vehicle_type" => FieldValue::text(self.vehicle_type.as_str()),
            "description" => FieldValue::opt_text(self.description.as_deref()),
            "license_plate" => FieldValue::opt_text(self.license_plate.as_deref()),
            "color" => FieldValue::opt_text(self.color.as_deref()),
            _ => return None,
        })
    }
}

// ---------------------------------------------------------------------------
// Worker
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Worker {
    pub id: Option<String>,
    pub organization: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub teams: Option<Vec<String>>,
    pub tasks: Option<Vec<String>>,
    pub vehicle: Option<Vehicle>,
    pub on_duty: bool,
    pub active_task: Option<String>,
    pub time_created: Option<i64>,
}

impl DomainRecord for Worker {
    fn kind(&self) -> RecordKind {
        RecordKind::Worker
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::opt_text(self.id.as_deref()),
            "organization" => FieldValue::opt_text(self.organization.as_deref()),
            "name" => FieldValue::opt_text(self.name.as_deref()),
            "phone" => FieldValue::opt_text(self.phone.as_deref()),
            "teams" => FieldValue::opt_json(&self.teams),
            "tasks" => FieldValue::opt_json(&self.tasks),
            "vehicle" => match &self.vehicle {
                Some(vehicle) => FieldValue::Record(vehicle),
                None => FieldValue::Null,
            },
            "on_duty" => FieldValue::Json(Value::Bool(self.on_duty)),
            "active_task" => FieldValue::opt_text(self.active_task.as_deref()),
            _ => return None,
        })
    }
}

// ---------------------------------------------------------------------------
// Address / Destination
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    pub name: Option<String>,
    pub number: Option<String>,
    pub street: Option<String>,
    pub apartment: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub unparsed: Option<String>,
}

impl DomainRecord for Address {
    fn kind(&self) -> RecordKind {
        RecordKind::Address
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        let value = match name {
            "name" => &self.name,
            "number" => &self.number,
            "street" => &self.street,
            "apartment" => &self.apartment,
            "city" => &self.city,
            "state" => &self.state,
            "postal_code" => &self.postal_code,
            "country" => &self.country,
            "unparsed" => &self.unparsed,
            _ => return None,
        };
        Some(FieldValue::opt_text(value.as_deref()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Destination {
    pub id: Option<String>,
    pub address: Option<Address>,
    /// `[longitude, latitude]`.
    pub location: Option<[f64; 2]>,
    pub notes: Option<String>,
}

impl DomainRecord for Destination {
    fn kind(&self) -> RecordKind {
        RecordKind::Destination
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::opt_text(self.id.as_deref()),
            "address" => match &self.address {
                Some(address) => FieldValue::Record(address),
                None => FieldValue::Null,
            },
            "location" => match self.location {
                Some([lon, lat]) => FieldValue::Json(Value::from(vec![lon, lat])),
                None => FieldValue::Null,
            },
            "notes" => FieldValue::opt_text(self.notes.as_deref()),
            _ => return None,
        })
    }
}

// ---------------------------------------------------------------------------
// Recipient
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Recipient {
    pub id: Option<String>,
    pub name: String,
    pub phone: String,
    pub notes: Option<String>,
    #[serde(rename = "skipSMSNotifications")]
    pub skip_sms_notifications: Option<bool>,
}

impl DomainRecord for Recipient {
    fn kind(&self) -> RecordKind {
        RecordKind::Recipient
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::opt_text(self.id.as_deref()),
            "name" => FieldValue::text(&self.name),
            "phone" => FieldValue::text(&self.phone),
            "notes" => FieldValue::opt_text(self.notes.as_deref()),
            "skip_sms_notifications" => FieldValue::opt_json(&self.skip_sms_notifications),
            _ => return None,
        })
    }
}

// ---------------------------------------------------------------------------
// Task
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Task {
    pub id: Option<String>,
    pub short_id: Option<String>,
    pub tracking_url: Option<String>,
    /// 0 unassigned, 1 assigned, 2 active, 3 completed.
    pub state: Option<u8>,
    pub worker: Option<String>,
    pub merchant: Option<String>,
    pub executor: Option<String>,
    pub destination: Option<Ref<Destination>>,
    pub recipients: Vec<Ref<Recipient>>,
    pub notes: Option<String>,
    pub pickup_task: Option<bool>,
    pub dependencies: Option<Vec<String>>,
    #[serde(with = "chrono::serde::ts_seconds_option")]
    pub complete_after: Option<DateTime<Utc>>,
    #[serde(with = "chrono::serde::ts_seconds_option")]
    pub complete_before: Option<DateTime<Utc>>,
}

impl DomainRecord for Task {
    fn kind(&self) -> RecordKind {
        RecordKind::Task
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::opt_text(self.id.as_deref()),
            "short_id" => FieldValue::opt_text(self.short_id.as_deref()),
            "tracking_url" => FieldValue::opt_text(self.tracking_url.as_deref()),
            "state" => FieldValue::opt_json(&self.state),
            "worker" => FieldValue::opt_text(self.worker.as_deref()),
            "merchant" => FieldValue::opt_text(self.merchant.as_deref()),
            "executor" => FieldValue::opt_text(self.executor.as_deref()),
            "destination" => match &self.destination {
                Some(destination) => destination.to_field(),
                None => FieldValue::Null,
            },
            "recipients" => FieldValue::List(self.recipients.iter().map(Ref::to_field).collect()),
            "notes" => FieldValue::opt_text(self.notes.as_deref()),
            "pickup_task" => FieldValue::opt_json(&self.pickup_task),
            "dependencies" => FieldValue::opt_json(&self.dependencies),
            "complete_after" => FieldValue::opt_timestamp(self.complete_after),
            "complete_before" => FieldValue::opt_timestamp(self.complete_before),
            _ => return None,
        })
    }
}

// ---------------------------------------------------------------------------
// Administrator / Organization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Administrator {
    pub id: Option<String>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub is_active: bool,
    /// `"super"` or `"standard"`.
    #[serde(rename = "type")]
    pub admin_type: Option<String>,
}

impl DomainRecord for Administrator {
    fn kind(&self) -> RecordKind {
        RecordKind::Administrator
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::opt_text(self.id.as_deref()),
            "name" => FieldValue::text(&self.name),
            "email" => FieldValue::text(&self.email),
            "phone" => FieldValue::opt_text(self.phone.as_deref()),
            "is_active" => FieldValue::Json(Value::Bool(self.is_active)),
            "admin_type" => FieldValue::opt_text(self.admin_type.as_deref()),
            _ => return None,
        })
    }
}

/// The caller's organization. Read-only; it has no wire descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Organization {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub timezone: Option<String>,
    pub image: Option<String>,
    pub delegatees: Vec<String>,
    pub time_created: Option<i64>,
}

impl DomainRecord for Organization {
    fn kind(&self) -> RecordKind {
        RecordKind::Organization
    }

    fn field(&self, name: &str) -> Option<FieldValue<'_>> {
        Some(match name {
            "id" => FieldValue::opt_text(self.id.as_deref()),
            "name" => FieldValue::opt_text(self.name.as_deref()),
            "email" => FieldValue::opt_text(self.email.as_deref()),
            "country" => FieldValue::opt_text(self.country.as_deref()),
            "timezone" => FieldValue::opt_text(self.timezone.as_deref()),
            "delegatees" => FieldValue::Json(Value::from(self.delegatees.clone())),
            _ => return None,
        })
    }
}

// ---------------------------------------------------------------------------
// Parsed records
// ---------------------------------------------------------------------------

/// A record parsed from a provider response.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Worker(Worker),
    Task(Task),
    Recipient(Recipient),
    Destination(Destination),
    Organization(Organization),
    Administrator(Administrator),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Worker(_) => RecordKind::Worker,
            Record::Task(_) => RecordKind::Task,
            Record::Recipient(_) => RecordKind::Recipient,
            Record::Destination(_) => RecordKind::Destination,
            Record::Organization(_) => RecordKind::Organization,
            Record::Administrator(_) => RecordKind::Administrator,
        }
    }

    pub fn as_worker(&self) -> Option<&Worker> {
        match self {
            Record::Worker(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_task(&self) -> Option<&Task> {
        match self {
            Record::Task(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_recipient(&self) -> Option<&Recipient> {
        match self {
            Record::Recipient(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_destination(&self) -> Option<&Destination> {
        match self {
            Record::Destination(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_organization(&self) -> Option<&Organization> {
        match self {
            Record::Organization(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_administrator(&self) -> Option<&Administrator> {
        match self {
            Record::Administrator(a) => Some(a),
            _ => None,
        }
    }
}
