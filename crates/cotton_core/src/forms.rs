use std::collections::BTreeMap;
use std::fmt;

use crate::RequestId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Numeric,
    Text,
}

/// A named input of a recommendation form.
pub trait FormField: Copy + Ord + fmt::Debug + 'static {
    /// All fields in display order.
    const ALL: &'static [Self];

    /// Wire name, also used as the CLI/shell key.
    fn key(self) -> &'static str;
    fn label(self) -> &'static str;
    fn kind(self) -> FieldKind;

    fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|field| field.key().eq_ignore_ascii_case(key))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CropField {
    Temperature,
    Nitrogen,
    Humidity,
    Ph,
    Potassium,
    Phosphorus,
    Rainfall,
}

impl FormField for CropField {
    const ALL: &'static [Self] = &[
        CropField::Temperature,
        CropField::Nitrogen,
        CropField::Humidity,
        CropField::Ph,
        CropField::Potassium,
        CropField::Phosphorus,
        CropField::Rainfall,
    ];

    fn key(self) -> &'static str {
        match self {
            CropField::Temperature => "temperature",
            CropField::Nitrogen => "nitrogen",
            CropField::Humidity => "humidity",
            CropField::Ph => "ph",
            CropField::Potassium => "potassium",
            CropField::Phosphorus => "phosphorus",
            CropField::Rainfall => "rainfall",
        }
    }

    fn label(self) -> &'static str {
        match self {
            CropField::Temperature => "Temperature",
            CropField::Nitrogen => "Nitrogen",
            CropField::Humidity => "Humidity",
            CropField::Ph => "pH",
            CropField::Potassium => "Potassium",
            CropField::Phosphorus => "Phosphorus",
            CropField::Rainfall => "Rainfall",
        }
    }

    fn kind(self) -> FieldKind {
        FieldKind::Numeric
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FertilizerField {
    Temperature,
    Humidity,
    Moisture,
    SoilType,
    CropType,
    Nitrogen,
    Potassium,
    Phosphorous,
}

impl FormField for FertilizerField {
    const ALL: &'static [Self] = &[
        FertilizerField::Temperature,
        FertilizerField::Humidity,
        FertilizerField::Moisture,
        FertilizerField::SoilType,
        FertilizerField::CropType,
        FertilizerField::Nitrogen,
        FertilizerField::Potassium,
        FertilizerField::Phosphorous,
    ];

    fn key(self) -> &'static str {
        match self {
            FertilizerField::Temperature => "temperature",
            FertilizerField::Humidity => "humidity",
            FertilizerField::Moisture => "moisture",
            FertilizerField::SoilType => "soil_type",
            FertilizerField::CropType => "crop_type",
            FertilizerField::Nitrogen => "nitrogen",
            FertilizerField::Potassium => "potassium",
            FertilizerField::Phosphorous => "phosphorous",
        }
    }

    fn label(self) -> &'static str {
        match self {
            FertilizerField::Temperature => "Temperature",
            FertilizerField::Humidity => "Humidity",
            FertilizerField::Moisture => "Moisture",
            FertilizerField::SoilType => "Soil type",
            FertilizerField::CropType => "Crop type",
            FertilizerField::Nitrogen => "Nitrogen",
            FertilizerField::Potassium => "Potassium",
            FertilizerField::Phosphorous => "Phosphorous",
        }
    }

    fn kind(self) -> FieldKind {
        match self {
            FertilizerField::SoilType | FertilizerField::CropType => FieldKind::Text,
            _ => FieldKind::Numeric,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropInput {
    pub temperature: f64,
    pub nitrogen: f64,
    pub humidity: f64,
    pub ph: f64,
    pub potassium: f64,
    pub phosphorus: f64,
    pub rainfall: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FertilizerInput {
    pub temperature: f64,
    pub humidity: f64,
    pub moisture: f64,
    pub nitrogen: f64,
    pub potassium: f64,
    pub phosphorous: f64,
    pub soil_type: String,
    pub crop_type: String,
}

/// Lifecycle of the latest recommendation request of one form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Submission {
    #[default]
    Idle,
    Pending { request_id: RequestId },
    Done { request_id: RequestId, recommendation: String },
    Failed { request_id: RequestId, message: String },
}

impl Submission {
    pub fn pending_id(&self) -> Option<RequestId> {
        match self {
            Submission::Pending { request_id } => Some(*request_id),
            _ => None,
        }
    }
}

/// Values that passed validation, numbers already coerced.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedFields<F: FormField> {
    numbers: BTreeMap<F, f64>,
    texts: BTreeMap<F, String>,
}

impl<F: FormField> ParsedFields<F> {
    fn number(&self, field: F) -> f64 {
        self.numbers.get(&field).copied().unwrap_or_default()
    }

    fn text(&self, field: F) -> String {
        self.texts.get(&field).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormState<F: FormField> {
    values: BTreeMap<F, String>,
    errors: BTreeMap<F, String>,
    submission: Submission,
}

impl<F: FormField> Default for FormState<F> {
    fn default() -> Self {
        Self {
            values: BTreeMap::new(),
            errors: BTreeMap::new(),
            submission: Submission::Idle,
        }
    }
}

impl<F: FormField> FormState<F> {
    pub fn value(&self, field: F) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn error(&self, field: F) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<F, String> {
        &self.errors
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    pub(crate) fn set_value(&mut self, field: F, value: String) {
        self.errors.remove(&field);
        self.values.insert(field, value);
    }

    pub(crate) fn set_submission(&mut self, submission: Submission) {
        self.submission = submission;
    }

    /// Validates every field, replacing the error map. Returns the parsed
    /// values only when no field has an error.
    pub(crate) fn validate(&mut self) -> Option<ParsedFields<F>> {
        let mut parsed = ParsedFields {
            numbers: BTreeMap::new(),
            texts: BTreeMap::new(),
        };
        let mut errors = BTreeMap::new();

        for &field in F::ALL {
            let raw = self.value(field).trim();
            if raw.is_empty() {
                errors.insert(field, format!("{} is required", field.label()));
                continue;
            }
            match field.kind() {
                FieldKind::Numeric => match parse_number(raw) {
                    Some(number) => {
                        parsed.numbers.insert(field, number);
                    }
                    None => {
                        errors.insert(field, format!("{} must be a number", field.label()));
                    }
                },
                FieldKind::Text => {
                    parsed.texts.insert(field, raw.to_string());
                }
            }
        }

        self.errors = errors;
        if self.errors.is_empty() {
            Some(parsed)
        } else {
            None
        }
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|value| value.is_finite())
}

impl From<ParsedFields<CropField>> for CropInput {
    fn from(fields: ParsedFields<CropField>) -> Self {
        Self {
            temperature: fields.number(CropField::Temperature),
            nitrogen: fields.number(CropField::Nitrogen),
            humidity: fields.number(CropField::Humidity),
            ph: fields.number(CropField::Ph),
            potassium: fields.number(CropField::Potassium),
            phosphorus: fields.number(CropField::Phosphorus),
            rainfall: fields.number(CropField::Rainfall),
        }
    }
}

impl From<ParsedFields<FertilizerField>> for FertilizerInput {
    fn from(fields: ParsedFields<FertilizerField>) -> Self {
        Self {
            temperature: fields.number(FertilizerField::Temperature),
            humidity: fields.number(FertilizerField::Humidity),
            moisture: fields.number(FertilizerField::Moisture),
            nitrogen: fields.number(FertilizerField::Nitrogen),
            potassium: fields.number(FertilizerField::Potassium),
            phosphorous: fields.number(FertilizerField::Phosphorous),
            soil_type: fields.text(FertilizerField::SoilType),
            crop_type: fields.text(FertilizerField::CropType),
        }
    }
}
