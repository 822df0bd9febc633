use serde::{Deserialize, Deserializer, Serialize};

/// Employment type as published on the job board.
///
/// Anything the board says that isn't one of the known commitments collapses to
/// `Unspecified`, which serializes as an empty string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>")]
pub enum JobType {
    #[serde(rename = "Full-Time")]
    FullTime,
    #[serde(rename = "Part-Time")]
    PartTime,
    #[serde(rename = "Contract")]
    Contract,
    #[default]
    #[serde(rename = "")]
    Unspecified,
}

impl JobType {
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match normalized.as_str() {
            "fulltime" => JobType::FullTime,
            "parttime" => JobType::PartTime,
            "contract" | "contractor" => JobType::Contract,
            _ => JobType::Unspecified,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-Time",
            JobType::PartTime => "Part-Time",
            JobType::Contract => "Contract",
            JobType::Unspecified => "",
        }
    }
}

impl From<Option<String>> for JobType {
    fn from(raw: Option<String>) -> Self {
        raw.as_deref().map(JobType::parse).unwrap_or_default()
    }
}

// CMS fields left blank come back as explicit nulls
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A posting scraped from the job board. Rebuilt on every pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub department: String,
    pub location: String,
    pub link: String,
    pub comp: String,
    pub slug: Option<String>,
    #[serde(rename = "type")]
    pub job_type: JobType,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningFields {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub location: String,
    #[serde(rename = "type", default)]
    pub job_type: JobType,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comp: String,
}

/// A live item in the openings collection. `field_data.slug` mirrors
/// `JobRecord::slug` and is the only field used for matching.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpeningItem {
    pub id: String,
    pub field_data: OpeningFields,
}

/// Body of a single item in a batched create call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreationPayload {
    pub id: String,
    pub locale_id: String,
    pub field_data: OpeningFields,
}

// Object style note:
// Records here are plain data. They carry no client handles and no identity
// beyond what the remote side assigns, so a pass can be recomputed from scratch
// at any time against whatever state the store ended up in.
