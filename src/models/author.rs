use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Document;
use crate::validation::{FieldSpec, Rule, Schema};

pub const GENDERS: &[&str] = &["Male", "Female", "Other"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub fullname: String,
    pub country: String,
    pub gender: Gender,
    // stored as supplied; no format validation beyond non-empty
    pub birthdate: String,
}

impl Document for Author {
    const COLLECTION: &'static str = "authors";
    const UNIQUE_FIELD: &'static str = "fullname";

    fn id(&self) -> Uuid {
        self.id
    }

    fn unique_value(&self) -> String {
        self.fullname.clone()
    }
}

pub const AUTHOR_SCHEMA: Schema = &[
    FieldSpec { field: "fullname", required: true, rules: &[Rule::Length { min: 1, max: 50 }] },
    FieldSpec { field: "country", required: true, rules: &[Rule::Length { min: 1, max: 50 }] },
    FieldSpec { field: "gender", required: true, rules: &[Rule::OneOf(GENDERS)] },
    FieldSpec { field: "birthdate", required: true, rules: &[Rule::NonEmpty] },
];

/// A validated create payload.
#[derive(Debug, Deserialize)]
pub struct NewAuthor {
    pub fullname: String,
    pub country: String,
    pub gender: Gender,
    pub birthdate: String,
}

impl From<NewAuthor> for Author {
    fn from(new: NewAuthor) -> Self {
        Author {
            id: Uuid::new_v4(),
            fullname: new.fullname,
            country: new.country,
            gender: new.gender,
            birthdate: new.birthdate,
        }
    }
}

/// A validated partial-update payload.
#[derive(Debug, Default, Deserialize)]
pub struct AuthorPatch {
    pub fullname: Option<String>,
    pub country: Option<String>,
    pub gender: Option<Gender>,
    pub birthdate: Option<String>,
}

impl AuthorPatch {
    pub fn apply(self, mut author: Author) -> Author {
        if let Some(fullname) = self.fullname {
            author.fullname = fullname;
        }
        if let Some(country) = self.country {
            author.country = country;
        }
        if let Some(gender) = self.gender {
            author.gender = gender;
        }
        if let Some(birthdate) = self.birthdate {
            author.birthdate = birthdate;
        }
        author
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_merges_supplied_fields() {
        let author = Author {
            id: Uuid::new_v4(),
            fullname: "Jane Doe".into(),
            country: "Ireland".into(),
            gender: Gender::Female,
            birthdate: "1970-01-01".into(),
        };
        let before = author.clone();

        let patch: AuthorPatch = serde_json::from_value(json!({"country": "France"})).unwrap();
        let after = patch.apply(author);
        assert_eq!(after.country, "France");
        assert_eq!(after.fullname, before.fullname);
        assert_eq!(after.birthdate, before.birthdate);
    }

    #[test]
    fn gender_uses_exact_wire_spelling() {
        let v = serde_json::to_value(Gender::Other).unwrap();
        assert_eq!(v, "Other");
        assert!(serde_json::from_value::<Gender>(json!("male")).is_err());
    }
}
