use serde::{Deserialize, Serialize};

use crate::validation::NewAddress;

/// A postal address record as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: Zip,
}

/// Zip code as the client sent it: a JSON number stays a number, text stays text
/// so leading zeros survive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Zip {
    Number(serde_json::Number),
    Text(String),
}

impl Zip {
    /// Decimal text form, as used by the length rule
    pub fn to_text(&self) -> String {
        match self {
            Zip::Number(n) => match (n.as_u64(), n.as_i64(), n.as_f64()) {
                (Some(u), _, _) => u.to_string(),
                (None, Some(i), _) => i.to_string(),
                (_, _, Some(f)) => f.to_string(),
                _ => n.to_string(),
            },
            Zip::Text(s) => s.clone(),
        }
    }
}

impl From<u32> for Zip {
    fn from(zip: u32) -> Self {
        Zip::Number(zip.into())
    }
}

impl Address {
    /// Build a stored record from validated input and a freshly generated id
    pub fn from_new(id: String, new: NewAddress) -> Self {
        Self {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            address1: new.address1,
            address2: new.address2,
            city: new.city,
            state: new.state,
            zip: new.zip,
        }
    }

    /// Records the store starts with
    pub fn seed() -> Vec<Address> {
        vec![
            Address {
                id: "1234".to_string(),
                first_name: "nghi".to_string(),
                last_name: "tran".to_string(),
                address1: "8383 w augusta".to_string(),
                address2: String::new(),
                city: "phoenix".to_string(),
                state: "az".to_string(),
                zip: Zip::from(85051),
            },
            Address {
                id: "5678".to_string(),
                first_name: "tom".to_string(),
                last_name: "smith".to_string(),
                address1: "2927 flora vista ave".to_string(),
                address2: "apt 1092".to_string(),
                city: "sunnyvale".to_string(),
                state: "ca".to_string(),
                zip: Zip::from(95203),
            },
        ]
    }
}
