use crate::forms::field::FieldSpec;

/// Name of the submit button; its presence marks a form submission.
pub const SUBMIT_MARKER: &str = "formsubmit";
/// Hidden field humans leave empty.
pub const HONEYPOT: &str = "hp";

/// Values posted with the current request, in submission order.
///
/// Repeated keys keep every occurrence; lookups return the last one, which is
/// what makes the hidden `0` + checkbox pairing work.
#[derive(Debug, Clone, Default)]
pub struct PostedForm {
    pairs: Vec<(String, String)>,
}

impl PostedForm {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Decode an `application/x-www-form-urlencoded` body.
    pub fn parse(body: &str) -> Result<Self, serde_urlencoded::de::Error> {
        let pairs = serde_urlencoded::from_str::<Vec<(String, String)>>(body)?;
        Ok(Self { pairs })
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value posted under `key`, in order (for `name[]` arrays).
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    pub fn field_value(&self, field: &FieldSpec) -> Option<&str> {
        self.get(&field.post_key())
    }

    /// A submission has the submit marker and an empty honeypot.
    pub fn is_submission(&self) -> bool {
        self.get(SUBMIT_MARKER).is_some() && self.get(HONEYPOT).unwrap_or("").is_empty()
    }
}
