// Catalog data model: the cupcake record as the server serializes it,
// plus the form state the front end collects before a create, update or
// search call. Forms hold raw text exactly as typed; conversion into a
// request body happens in `CupcakeForm::payload`.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Image the server stores when a cupcake is created without one. A fresh
/// create form starts out with this value in its image field.
pub const DEFAULT_IMAGE_URL: &str =
    "https://thestayathomechef.com/wp-content/uploads/2017/12/Most-Amazing-Chocolate-Cupcakes-1-small.jpg";

/// Server-assigned identifier of a cupcake. The client never mints one;
/// it only carries ids it has received back to the server.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct CupcakeId(u64);

impl CupcakeId {
    pub fn new(raw: u64) -> Self {
        CupcakeId(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CupcakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CupcakeId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(CupcakeId)
    }
}

/// One catalog record, as returned inside `{cupcake: ...}` and
/// `{cupcakes: [...]}` envelopes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Cupcake {
    pub id: CupcakeId,
    pub flavor: String,
    pub size: String,
    pub rating: f64,
    pub image: String,
}

/// Body of create (POST) and update (PATCH) requests. Updates send the
/// full field set; there is no partial update.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CupcakePayload {
    pub flavor: String,
    pub size: String,
    /// `None` when the rating field did not hold a number; sent as `null`.
    pub rating: Option<f64>,
    pub image: String,
    pub csrf_token: String,
}

/// The create form: four data fields plus the hidden anti-forgery token.
#[derive(Debug, Clone, PartialEq)]
pub struct CupcakeForm {
    pub flavor: String,
    pub size: String,
    pub rating: String,
    pub image: String,
    pub csrf_token: String,
}

impl CupcakeForm {
    pub fn new(csrf_token: impl Into<String>) -> Self {
        CupcakeForm {
            flavor: String::new(),
            size: String::new(),
            rating: String::new(),
            image: DEFAULT_IMAGE_URL.to_string(),
            csrf_token: csrf_token.into(),
        }
    }

    /// Pre-populate the fields from an existing record, as the edit page does.
    pub fn from_cupcake(cupcake: &Cupcake, csrf_token: impl Into<String>) -> Self {
        CupcakeForm {
            flavor: cupcake.flavor.clone(),
            size: cupcake.size.clone(),
            rating: cupcake.rating.to_string(),
            image: cupcake.image.clone(),
            csrf_token: csrf_token.into(),
        }
    }

    /// Read the five field values into a request body.
    pub fn payload(&self) -> CupcakePayload {
        CupcakePayload {
            flavor: self.flavor.clone(),
            size: self.size.clone(),
            rating: parse_rating(&self.rating),
            image: self.image.clone(),
            csrf_token: self.csrf_token.clone(),
        }
    }

    /// Empty the data fields. The token stays so the form can be submitted again.
    pub fn clear(&mut self) {
        self.flavor.clear();
        self.size.clear();
        self.rating.clear();
        self.image.clear();
    }
}

/// The update form: the target id as text plus the create form's fields.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateForm {
    pub cupcake_id: String,
    pub fields: CupcakeForm,
}

impl UpdateForm {
    pub fn from_cupcake(cupcake: &Cupcake, csrf_token: impl Into<String>) -> Self {
        UpdateForm {
            cupcake_id: cupcake.id.to_string(),
            fields: CupcakeForm::from_cupcake(cupcake, csrf_token),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchForm {
    pub term: String,
}

impl SearchForm {
    pub fn new(term: impl Into<String>) -> Self {
        SearchForm { term: term.into() }
    }
}

// Reads the longest numeric prefix, so "4.5 stars" is 4.5 and "stars" is nothing.
fn parse_rating(raw: &str) -> Option<f64> {
    static LEADING_FLOAT: OnceLock<Regex> = OnceLock::new();
    let leading = LEADING_FLOAT.get_or_init(|| {
        Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?").expect("valid float pattern")
    });
    let number = leading.find(raw.trim_start())?;
    number.as_str().parse::<f64>().ok().filter(|r| r.is_finite())
}
