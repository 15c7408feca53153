use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use super::lenient::parse_metadata_blob;
use super::record::{Metrics, Paper, ProcessMetadata, RawField, RawPaper, count_value, metric_text};
use super::tags::parse_tag_array;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to read paper data from {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("paper data in {path} is not a JSON array of records")]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("paper data in {path} contains no records")]
    Empty { path: PathBuf },
}

pub fn load_papers(path: &Path) -> Result<Vec<Paper>, FetchError> {
    let raw = std::fs::read_to_string(path).map_err(|source| FetchError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let papers = parse_papers(&raw).map_err(|source| FetchError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    if papers.is_empty() {
        return Err(FetchError::Empty {
            path: path.to_path_buf(),
        });
    }

    let with_metadata = papers.iter().filter(|paper| paper.metadata.is_some()).count();
    info!(
        path = %path.display(),
        papers = papers.len(),
        with_metadata,
        "loaded paper collection"
    );
    Ok(papers)
}

/// Decodes the collection, repairing each loosely-typed field independently.
pub fn parse_papers(raw: &str) -> Result<Vec<Paper>, serde_json::Error> {
    let records = serde_json::from_str::<Vec<RawPaper>>(raw)?;
    let mut seen = HashSet::with_capacity(records.len());
    let mut papers = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let paper = repair_record(index, record);
        if !seen.insert(paper.id.clone()) {
            warn!(paper = %paper.id, index, "dropping record with duplicate id");
            continue;
        }
        papers.push(paper);
    }

    Ok(papers)
}

fn repair_record(index: usize, record: RawPaper) -> Paper {
    let id = [record.id.trim(), record.doi.trim()]
        .into_iter()
        .find(|candidate| !candidate.is_empty())
        .map(str::to_owned)
        .unwrap_or_else(|| format!("paper-{index}"));

    let tags = tag_field(&id, "tags", record.tags.as_ref())
        .into_iter()
        .collect::<BTreeSet<_>>();
    let feedstock_tags = tag_field(&id, "feedstock_tags", record.feedstock_tags.as_ref());
    let output_products_tags =
        tag_field(&id, "output_products_tags", record.output_products_tags.as_ref());
    let metadata = metadata_field(&id, record.maml.as_ref());

    Paper {
        title: record.title,
        doi: record.doi,
        tags,
        feedstock_tags,
        output_products_tags,
        novelty: record.novelty,
        irr_summary: record.irr_paper,
        price_sensitivity: record.price_sensitivity,
        metrics: Metrics {
            production_costs: metric_text(&record.production_costs),
            minimal_selling_price: metric_text(&record.minimal_selling_price),
            minimal_selling_price_per_unit: metric_text(&record.minimal_selling_price_per_unit),
            irr: metric_text(&record.irr),
            npv: metric_text(&record.npv),
        },
        citation_count: count_value(&record.citation_count),
        metadata,
        id,
    }
}

fn tag_field(id: &str, field: &'static str, raw: Option<&RawField>) -> Vec<String> {
    match raw {
        None => Vec::new(),
        Some(RawField::Text(text)) => parse_tag_array(text).unwrap_or_else(|error| {
            warn!(paper = %id, field, %error, "treating unparsable tag field as empty");
            Vec::new()
        }),
        Some(RawField::Structured(Value::Array(items))) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(tag) => Some(tag.clone()),
                Value::Null => None,
                other => Some(other.to_string()),
            })
            .collect(),
        Some(RawField::Structured(Value::Null)) => Vec::new(),
        Some(RawField::Structured(other)) => {
            warn!(paper = %id, field, kind = %value_kind(other), "ignoring non-list tag field");
            Vec::new()
        }
    }
}

fn metadata_field(id: &str, raw: Option<&RawField>) -> Option<ProcessMetadata> {
    let value = match raw? {
        RawField::Text(text) if text.trim().is_empty() => return None,
        RawField::Text(text) => match parse_metadata_blob(text) {
            Ok(value) => value,
            Err(error) => {
                warn!(
                    paper = %id,
                    line = error.line,
                    column = error.column,
                    context = %error.context,
                    "metadata blob failed to parse: {}",
                    error.message
                );
                return None;
            }
        },
        RawField::Structured(Value::Null) => return None,
        RawField::Structured(value) => value.clone(),
    };

    if !value.is_object() {
        warn!(paper = %id, kind = %value_kind(&value), "metadata blob is not a dict");
        return None;
    }

    serde_json::from_value::<ProcessMetadata>(value)
        .inspect_err(|error| {
            warn!(paper = %id, %error, "metadata blob has an unexpected shape");
        })
        .ok()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
