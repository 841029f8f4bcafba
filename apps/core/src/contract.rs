use serde::{Deserialize, Serialize};

use crate::results::ResultRecord;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResultDto {
    pub title: String,
    pub subtitle: String,
    pub score: u32,
    pub kind: String,
    pub icon_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryResponse {
    pub results: Vec<ResultDto>,
}

impl From<&ResultRecord> for ResultDto {
    fn from(value: &ResultRecord) -> Self {
        Self {
            title: value.title.clone(),
            subtitle: value.subtitle.clone(),
            score: value.score,
            kind: value.kind.as_str().to_string(),
            icon_path: value.icon_path.to_string(),
        }
    }
}

impl QueryResponse {
    pub fn from_records(records: &[ResultRecord]) -> Self {
        Self {
            results: records.iter().map(ResultDto::from).collect(),
        }
    }
}
