use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use snafu::Snafu;
use std::{collections::BTreeMap, fmt::Display, str::FromStr};

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("Unknown gender {value:?}"))]
pub struct UnknownGender {
    value: String,
}

impl FromStr for Gender {
    type Err = UnknownGender;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            _ => UnknownGenderSnafu { value: s }.fail(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: i32,
    pub name: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub address: String,
    pub courses: String,
}

impl Student {
    ///for pre-filling an edit form
    pub fn to_form(&self) -> StudentForm {
        StudentForm {
            name: self.name.clone(),
            dob: self.dob.format(DOB_FORMAT).to_string(),
            gender: self.gender.to_string(),
            address: self.address.clone(),
            courses: self.courses.clone(),
        }
    }
}

/// A validated set of the five mutable fields, ready to be written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStudent {
    pub name: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    pub address: String,
    pub courses: String,
}

impl NewStudent {
    pub fn with_id(self, id: i32) -> Student {
        let Self {
            name,
            dob,
            gender,
            address,
            courses,
        } = self;
        Student {
            id,
            name,
            dob,
            gender,
            address,
            courses,
        }
    }
}

pub const DOB_FORMAT: &str = "%Y-%m-%d";

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum StudentField {
    Name,
    Dob,
    Gender,
    Address,
    Courses,
}

pub type FieldErrors = BTreeMap<StudentField, String>;

/// Unvalidated student details, as they arrive from a JSON body or an HTML form.
///
/// Missing and `null` fields deserialise as empty strings so that they show up as validation
/// errors rather than as extractor rejections.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentForm {
    #[serde(default, deserialize_with = "null_as_blank")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_blank")]
    pub dob: String,
    #[serde(default, deserialize_with = "null_as_blank")]
    pub gender: String,
    #[serde(default, deserialize_with = "null_as_blank")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_blank")]
    pub courses: String,
}

fn null_as_blank<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl StudentForm {
    pub fn validate(&self) -> Result<NewStudent, FieldErrors> {
        let mut errors = FieldErrors::new();

        let mut required_text = |field, value: &str, message: &str| {
            let value = value.trim();
            if value.is_empty() {
                errors.insert(field, message.to_string());
            }
            value.to_string()
        };

        let name = required_text(
            StudentField::Name,
            &self.name,
            "Name is required and cannot be just spaces",
        );
        let address = required_text(
            StudentField::Address,
            &self.address,
            "Address is required and cannot be just spaces",
        );
        let courses = required_text(
            StudentField::Courses,
            &self.courses,
            "Courses are required and cannot be just spaces",
        );

        let dob = match parse_dob(&self.dob) {
            Ok(dob) => Some(dob),
            Err(message) => {
                errors.insert(StudentField::Dob, message.to_string());
                None
            }
        };

        let gender = self.gender.trim();
        let gender = if gender.is_empty() {
            errors.insert(StudentField::Gender, "Gender is required".to_string());
            None
        } else if let Ok(gender) = gender.parse::<Gender>() {
            Some(gender)
        } else {
            errors.insert(
                StudentField::Gender,
                "Gender must be either Male or Female".to_string(),
            );
            None
        };

        match (dob, gender) {
            (Some(dob), Some(gender)) if errors.is_empty() => Ok(NewStudent {
                name,
                dob,
                gender,
                address,
                courses,
            }),
            _ => Err(errors),
        }
    }
}

//accepts a bare date, or a full timestamp where we only care about the date part
fn parse_dob(raw: &str) -> Result<NaiveDate, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Date of Birth is required");
    }

    let date_part = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, DOB_FORMAT)
        .map_err(|_| "Date of Birth must be a valid date (YYYY-MM-DD)")
}
