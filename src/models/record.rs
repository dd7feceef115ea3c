//! Result record model: one matched paper as returned by the search backend.

use serde::{Deserialize, Deserializer, Serialize};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Publication month
///
/// The backend schema sends a month number (1-12); older deployments send a
/// preformatted name such as `"Jan"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Month {
    Number(u32),
    Name(String),
}

impl Month {
    /// Short display label ("Jan", "Feb", ...)
    pub fn label(&self) -> String {
        match self {
            Month::Number(n @ 1..=12) => MONTH_NAMES[(*n - 1) as usize].to_string(),
            Month::Number(n) => n.to_string(),
            Month::Name(name) => name.trim().to_string(),
        }
    }
}

/// A matched paper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// arXiv identifier
    pub id: String,

    /// Paper title
    #[serde(default)]
    pub title: String,

    /// Author names
    #[serde(default, deserialize_with = "deserialize_authors")]
    pub authors: Vec<String>,

    /// Publication month
    #[serde(default)]
    pub month: Option<Month>,

    /// Publication year
    #[serde(default)]
    pub year: Option<i32>,

    /// Abstract text, may contain `$...$` math
    #[serde(default, rename = "abstract")]
    pub abstract_text: String,

    /// arXiv categories (e.g. `cs.AI`)
    #[serde(default, deserialize_with = "deserialize_categories")]
    pub categories: Vec<String>,

    /// Abstract page URL
    #[serde(default)]
    pub url: String,

    /// PDF URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,

    /// Vector distance to the query, lower is closer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

impl ResultRecord {
    /// Create a record with the required fields
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            authors: Vec::new(),
            month: None,
            year: None,
            abstract_text: String::new(),
            categories: Vec::new(),
            url: url.into(),
            pdf: None,
            distance: None,
        }
    }

    /// Authors joined for display
    pub fn author_line(&self) -> String {
        self.authors.join(", ")
    }

    /// "Month Year" label, degrading to whichever part is present
    pub fn date_label(&self) -> String {
        let month = self.month.as_ref().map(Month::label).unwrap_or_default();
        let year = self.year.map(|y| y.to_string()).unwrap_or_default();
        format!("{} {}", month, year).trim().to_string()
    }
}

/// Builder for constructing ResultRecord objects
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: ResultRecord,
}

impl RecordBuilder {
    /// Create a new builder with required fields
    pub fn new(id: impl Into<String>, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            record: ResultRecord::new(id, title, url),
        }
    }

    /// Add an author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.record.authors.push(author.into());
        self
    }

    /// Set publication month and year
    pub fn published(mut self, month: Month, year: i32) -> Self {
        self.record.month = Some(month);
        self.record.year = Some(year);
        self
    }

    /// Set abstract
    pub fn abstract_text(mut self, abstract_text: impl Into<String>) -> Self {
        self.record.abstract_text = abstract_text.into();
        self
    }

    /// Add a category
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.record.categories.push(category.into());
        self
    }

    /// Set PDF URL
    pub fn pdf(mut self, pdf: impl Into<String>) -> Self {
        self.record.pdf = Some(pdf.into());
        self
    }

    /// Set the distance to the query
    pub fn distance(mut self, distance: f64) -> Self {
        self.record.distance = Some(distance);
        self
    }

    /// Build the ResultRecord
    pub fn build(self) -> ResultRecord {
        self.record
    }
}

/// One element of a search response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// The matched paper
    pub entity: ResultRecord,

    /// Vector distance reported by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// Decode a response body into records, keeping backend rank order
///
/// The hit's distance is carried onto its record.
pub fn decode_hits(body: &[u8]) -> Result<Vec<ResultRecord>, serde_json::Error> {
    let hits: Vec<SearchHit> = serde_json::from_slice(body)?;
    Ok(hits
        .into_iter()
        .map(|hit| {
            let mut record = hit.entity;
            record.distance = hit.distance.or(record.distance);
            record
        })
        .collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn deserialize_authors<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) if s.trim().is_empty() => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s.trim().to_string()],
        Some(OneOrMany::Many(v)) => v,
    })
}

fn deserialize_categories<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Some(OneOrMany::Many(v)) => v,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_legacy_string_shape() {
        let body = br#"[{"entity":{"id":"1","title":"T","authors":"A","month":"Jan","year":2024,"abstract":"X","categories":"cs.AI","url":"http://u"}}]"#;
        let records = decode_hits(body).unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.id, "1");
        assert_eq!(record.authors, vec!["A"]);
        assert_eq!(record.date_label(), "Jan 2024");
        assert_eq!(record.categories, vec!["cs.AI"]);
        assert_eq!(record.url, "http://u");
    }

    #[test]
    fn test_decode_schema_list_shape() {
        let body = br#"[
            {"id":"2401.07215","distance":0.12,"entity":{
                "id":"2401.07215","title":"Paper","authors":["Ada Lovelace","Alan Turing"],
                "month":3,"year":2024,"abstract":"About $x^2$.","categories":["cs.LG","stat.ML"],
                "url":"https://arxiv.org/abs/2401.07215","pdf":"https://arxiv.org/pdf/2401.07215"}}
        ]"#;
        let records = decode_hits(body).unwrap();

        let record = &records[0];
        assert_eq!(record.author_line(), "Ada Lovelace, Alan Turing");
        assert_eq!(record.date_label(), "Mar 2024");
        assert_eq!(record.categories, vec!["cs.LG", "stat.ML"]);
        assert_eq!(record.pdf.as_deref(), Some("https://arxiv.org/pdf/2401.07215"));
        assert_eq!(record.distance, Some(0.12));
    }

    #[test]
    fn test_decode_preserves_order() {
        let body = br#"[{"entity":{"id":"b"}},{"entity":{"id":"a"}},{"entity":{"id":"c"}}]"#;
        let ids: Vec<String> = decode_hits(body).unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert!(decode_hits(body).unwrap().iter().all(|r| r.distance.is_none()));
    }

    #[test]
    fn test_decode_rejects_missing_entity() {
        assert!(decode_hits(br#"[{"id":"1"}]"#).is_err());
        assert!(decode_hits(b"not json").is_err());
        assert!(decode_hits(br#"{"entity":{"id":"1"}}"#).is_err());
    }

    #[test]
    fn test_category_string_splitting() {
        let body = br#"[{"entity":{"id":"1","categories":"cs.AI, cs.CL  math.OC"}}]"#;
        let records = decode_hits(body).unwrap();
        assert_eq!(records[0].categories, vec!["cs.AI", "cs.CL", "math.OC"]);
    }

    #[test]
    fn test_month_labels() {
        assert_eq!(Month::Number(1).label(), "Jan");
        assert_eq!(Month::Number(12).label(), "Dec");
        assert_eq!(Month::Number(13).label(), "13");
        assert_eq!(Month::Name(" Sep ".to_string()).label(), "Sep");
    }

    #[test]
    fn test_date_label_partial() {
        let mut record = ResultRecord::new("1", "T", "http://u");
        assert_eq!(record.date_label(), "");
        record.year = Some(2023);
        assert_eq!(record.date_label(), "2023");
    }

    #[test]
    fn test_record_builder() {
        let record = RecordBuilder::new("2401.07215", "Title", "https://arxiv.org/abs/2401.07215")
            .author("A. Author")
            .published(Month::Number(1), 2024)
            .abstract_text("Abstract")
            .category("cs.AI")
            .build();

        assert_eq!(record.author_line(), "A. Author");
        assert_eq!(record.date_label(), "Jan 2024");
        assert_eq!(record.categories, vec!["cs.AI"]);
    }
}
