#![forbid(unsafe_code)]

use crate::record::{Draft, FieldSource, FieldValue};
use time::macros::format_description;
use time::{Date, Time};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Tutor,
    Pet,
    Appointment,
    ClinicalConsult,
    ExamType,
    VetExam,
    ExamList,
    Vaccine,
    Vaccination,
    Medication,
    Surgery,
    Hospitalization,
    CastrationQueue,
    CastrationList,
    Product,
    Stock,
    Transaction,
    AttendanceReport,
    Veterinarian,
}

impl EntityKind {
    pub const ALL: [EntityKind; 19] = [
        EntityKind::Tutor,
        EntityKind::Pet,
        EntityKind::Appointment,
        EntityKind::ClinicalConsult,
        EntityKind::ExamType,
        EntityKind::VetExam,
        EntityKind::ExamList,
        EntityKind::Vaccine,
        EntityKind::Vaccination,
        EntityKind::Medication,
        EntityKind::Surgery,
        EntityKind::Hospitalization,
        EntityKind::CastrationQueue,
        EntityKind::CastrationList,
        EntityKind::Product,
        EntityKind::Stock,
        EntityKind::Transaction,
        EntityKind::AttendanceReport,
        EntityKind::Veterinarian,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Tutor => "tutors",
            EntityKind::Pet => "pets",
            EntityKind::Appointment => "appointments",
            EntityKind::ClinicalConsult => "clinical-consults",
            EntityKind::ExamType => "exam-types",
            EntityKind::VetExam => "vet-exams",
            EntityKind::ExamList => "exam-lists",
            EntityKind::Vaccine => "vaccines",
            EntityKind::Vaccination => "vaccinations",
            EntityKind::Medication => "medications",
            EntityKind::Surgery => "surgeries",
            EntityKind::Hospitalization => "hospitalizations",
            EntityKind::CastrationQueue => "castration-queue",
            EntityKind::CastrationList => "castration-lists",
            EntityKind::Product => "products",
            EntityKind::Stock => "stocks",
            EntityKind::Transaction => "transactions",
            EntityKind::AttendanceReport => "attendance-reports",
            EntityKind::Veterinarian => "veterinarians",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value))
    }

    pub fn schema(self) -> &'static EntitySchema {
        crate::catalog::schema_for(self)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Person or surname: digits are rejected.
    PersonName,
    Integer,
    Decimal,
    Date,
    Time,
    Phone,
    PostalCode,
    Email,
    /// Brazilian CPF; also confirmed by the external verifier.
    NationalId,
    Choice(&'static [&'static str]),
    /// Holds the id of a record in another collection; see [`ReferenceSpec`].
    Reference,
    /// Holds a set of ids; see [`GroupSpec`].
    IdSet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldDefault {
    Empty,
    Literal(&'static str),
    Today,
    Now,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub default: FieldDefault,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            default: FieldDefault::Empty,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn default_to(mut self, default: FieldDefault) -> Self {
        self.default = default;
        self
    }
}

/// A single field, or several fields rendered space-joined (e.g. first + last name).
#[derive(Clone, Copy, Debug)]
pub enum FieldRef {
    One(&'static str),
    Joined(&'static [&'static str]),
}

impl FieldRef {
    pub fn render(&self, source: &impl FieldSource) -> String {
        match self {
            FieldRef::One(name) => source.field_text(name).unwrap_or("").to_string(),
            FieldRef::Joined(names) => names
                .iter()
                .filter_map(|name| source.field_text(name))
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Projection {
    pub from: FieldRef,
    pub to: &'static str,
}

/// Second hop taken from the resolved source record (pet -> its tutor).
#[derive(Clone, Copy, Debug)]
pub struct ReferenceFollow {
    pub via: &'static str,
    pub source: EntityKind,
    pub projections: &'static [Projection],
}

#[derive(Clone, Copy, Debug)]
pub struct ReferenceSpec {
    pub field: &'static str,
    pub source: EntityKind,
    pub projections: &'static [Projection],
    pub follow: Option<ReferenceFollow>,
}

#[derive(Clone, Copy, Debug)]
pub struct GroupSpec {
    pub field: &'static str,
    pub target: EntityKind,
    pub target_label: FieldRef,
    pub min_selected: usize,
    pub error_key: &'static str,
    pub error_message: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortOrder {
    Insertion,
    DateTimeAscending {
        date: &'static str,
        time: &'static str,
    },
    DateDescending(&'static str),
}

#[derive(Debug)]
pub struct EntitySchema {
    pub kind: EntityKind,
    pub collection_key: &'static str,
    pub id_field: &'static str,
    pub singular: &'static str,
    pub label: FieldRef,
    pub fields: &'static [FieldSpec],
    pub searchable: &'static [FieldRef],
    pub sort: SortOrder,
    pub references: &'static [ReferenceSpec],
    pub group: Option<GroupSpec>,
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn reference_for(&self, field: &str) -> Option<&ReferenceSpec> {
        self.references.iter().find(|spec| spec.field == field)
    }

    /// Fields filled by a direct reference projection. Follow-hop targets stay editable
    /// because the second hop may not resolve.
    pub fn is_projected(&self, field: &str) -> bool {
        self.references
            .iter()
            .flat_map(|spec| spec.projections.iter())
            .any(|projection| projection.to == field)
    }

    pub fn national_id_field(&self) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|field| field.kind == FieldKind::NationalId)
            .map(|field| field.name)
    }

    pub fn date_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|field| field.kind == FieldKind::Date)
            .map(|field| field.name)
    }

    pub fn record_label(&self, source: &impl FieldSource) -> String {
        self.label.render(source)
    }

    /// Fresh draft for a create dialog, with computed defaults resolved against `today`/`now`.
    pub fn template(&self, today: Date, now: Time) -> Draft {
        let mut draft = Draft::new();
        for field in self.fields {
            let value = match (field.kind, field.default) {
                (FieldKind::IdSet, _) => FieldValue::IdSet(Vec::new()),
                (_, FieldDefault::Empty) => FieldValue::text(""),
                (_, FieldDefault::Literal(value)) => FieldValue::text(value),
                (_, FieldDefault::Today) => FieldValue::text(format_date(today)),
                (_, FieldDefault::Now) => FieldValue::text(format_clock(now)),
            };
            draft.set(field.name, value);
        }
        draft
    }
}

pub fn format_date(date: Date) -> String {
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_default()
}

pub fn format_clock(time: Time) -> String {
    time.format(format_description!("[hour]:[minute]"))
        .unwrap_or_default()
}
