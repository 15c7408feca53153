use std::collections::BTreeSet;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq, Default, Deserialize)]
pub struct Quantity {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub unit: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Default, Deserialize)]
pub struct ProcessStep {
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "object_list")]
    pub parameters: Vec<Quantity>,
    #[serde(default, deserialize_with = "object_or_none")]
    pub output: Option<Quantity>,
}

/// The structured process model embedded in each record as a blob.
#[derive(Clone, Debug, PartialEq, Eq, Default, Deserialize)]
pub struct ProcessMetadata {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub paper_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub process_feedstock: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub process_target: String,
    #[serde(default, deserialize_with = "object_list")]
    pub process_flow: Vec<ProcessStep>,
}

#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Metrics {
    pub production_costs: Option<String>,
    pub minimal_selling_price: Option<String>,
    pub minimal_selling_price_per_unit: Option<String>,
    pub irr: Option<String>,
    pub npv: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paper {
    pub id: String,
    pub title: String,
    pub doi: String,
    pub tags: BTreeSet<String>,
    pub feedstock_tags: Vec<String>,
    pub output_products_tags: Vec<String>,
    pub novelty: String,
    pub irr_summary: String,
    pub price_sensitivity: String,
    pub metrics: Metrics,
    pub citation_count: Option<u64>,
    pub metadata: Option<ProcessMetadata>,
}

impl Paper {
    pub fn process_flow(&self) -> &[ProcessStep] {
        self.metadata
            .as_ref()
            .map(|metadata| metadata.process_flow.as_slice())
            .unwrap_or_default()
    }

    pub fn display_title(&self) -> &str {
        self.metadata
            .as_ref()
            .map(|metadata| metadata.title.as_str())
            .filter(|title| !title.trim().is_empty())
            .unwrap_or(&self.title)
    }

    pub fn citation_link(&self) -> &str {
        self.metadata
            .as_ref()
            .map(|metadata| metadata.paper_id.as_str())
            .filter(|link| !link.trim().is_empty())
            .unwrap_or(&self.doi)
    }
}

/// A record as it appears in the data file, before any field repair.
#[derive(Clone, Debug, Default, Deserialize)]
pub(super) struct RawPaper {
    #[serde(default, deserialize_with = "lenient_string")]
    pub(super) id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(super) title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(super) doi: String,
    #[serde(default)]
    pub(super) tags: Option<RawField>,
    #[serde(default)]
    pub(super) feedstock_tags: Option<RawField>,
    #[serde(default)]
    pub(super) output_products_tags: Option<RawField>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(super) novelty: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(super) irr_paper: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub(super) price_sensitivity: String,
    #[serde(default)]
    pub(super) production_costs: Value,
    #[serde(default)]
    pub(super) minimal_selling_price: Value,
    #[serde(default)]
    pub(super) minimal_selling_price_per_unit: Value,
    #[serde(default)]
    pub(super) irr: Value,
    #[serde(default)]
    pub(super) npv: Value,
    #[serde(default)]
    pub(super) citation_count: Value,
    #[serde(default)]
    pub(super) maml: Option<RawField>,
}

/// Fields the upstream generator emits either as structured JSON or as a
/// stringified Python literal.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RawField {
    Text(String),
    Structured(Value),
}

pub(super) fn metric_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_owned(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

pub(super) fn count_value(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_f64().filter(|n| *n >= 0.0).map(|n| n.round() as u64)),
        Value::String(text) => text.trim().replace(',', "").parse::<u64>().ok(),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    })
}

/// Keeps only the object entries of a list; derived structs would otherwise
/// read a nested list positionally.
fn object_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: DeserializeOwned,
{
    Option::<Vec<Value>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .filter(Value::is_object)
        .map(|item| serde_json::from_value(item).map_err(serde::de::Error::custom))
        .collect()
}

fn object_or_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        item @ Value::Object(_) => serde_json::from_value(item)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn process_metadata_tolerates_nulls_and_extra_keys() {
        let metadata: ProcessMetadata = serde_json::from_value(json!({
            "title": "Stover to ethanol",
            "paper_id": "https://doi.org/10.1/x",
            "process_flow": [{
                "type": "pretreatment.dilute_acid_pretreatment",
                "description": null,
                "options": {},
                "parameters": [{"name": "sulfuric_acid_price_usd", "unit": "usd", "source": "internal"}],
                "output": {"name": "hydrolysate", "unit": "kg"}
            }, {
                "type": "separation.ethanol_purification",
                "parameters": null,
                "output": null
            }]
        }))
        .unwrap();

        assert_eq!(metadata.process_flow.len(), 2);
        assert_eq!(metadata.process_flow[0].parameters[0].unit, "usd");
        assert!(metadata.process_flow[1].parameters.is_empty());
        assert!(metadata.process_flow[1].output.is_none());
    }

    #[test]
    fn list_shaped_steps_and_quantities_are_skipped() {
        let metadata: ProcessMetadata = serde_json::from_value(json!({
            "process_flow": [
                ["mixing", "Blend the slurry."],
                {
                    "type": "separation.distillation",
                    "parameters": [["steam", "kg"], {"name": "steam_price", "unit": "usd"}],
                    "output": ["ethanol", "kg"]
                }
            ]
        }))
        .unwrap();

        assert_eq!(metadata.process_flow.len(), 1);
        let step = &metadata.process_flow[0];
        assert_eq!(step.kind, "separation.distillation");
        assert_eq!(
            step.parameters,
            vec![Quantity {
                name: "steam_price".to_owned(),
                unit: "usd".to_owned(),
            }]
        );
        assert!(step.output.is_none());
    }

    #[test]
    fn metric_text_skips_blank_and_null() {
        assert_eq!(metric_text(&json!("  $1.20/kg ")), Some("$1.20/kg".to_owned()));
        assert_eq!(metric_text(&json!(12.5)), Some("12.5".to_owned()));
        assert_eq!(metric_text(&json!("")), None);
        assert_eq!(metric_text(&Value::Null), None);
    }

    #[test]
    fn count_value_accepts_numbers_and_strings() {
        assert_eq!(count_value(&json!(42)), Some(42));
        assert_eq!(count_value(&json!(7.0)), Some(7));
        assert_eq!(count_value(&json!("1,204")), Some(1204));
        assert_eq!(count_value(&json!(-3)), None);
    }
}
