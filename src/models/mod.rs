use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Taxonomy depth at which a category is a fetchable event list
pub const LEAF_LEVEL: i64 = 3;

/// Betting offer type id of the three-way match odds market
pub const MATCH_ODDS_TYPE_ID: i64 = 2;

/// Event state kept in the snapshot
pub const STATE_NOT_STARTED: &str = "NOT_STARTED";

/// A node of the category taxonomy returned by the groups query
#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    /// An ordered list of nodes (`groups`, `topLeagues`, ...)
    Group(Vec<TreeNode>),
    Category(CategoryNode),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryNode {
    pub name: Option<String>,
    pub level: Option<i64>,
    pub id: Option<i64>,
    pub country_code: Option<String>,
    pub abbreviation: Option<String>,
    pub path: Option<String>,
    /// Every nested list or object of the node. Object keys are visited in
    /// serde_json map order (alphabetical), not response order.
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Decode an arbitrary JSON value into a tree.
    ///
    /// Arrays become groups and objects become categories. Scalars carry no
    /// structure and are dropped; fields of the wrong type read as absent.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(TreeNode::Group(
                items.iter().filter_map(TreeNode::from_value).collect(),
            )),
            Value::Object(map) => {
                let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
                let integer = |key: &str| map.get(key).and_then(as_integer);

                Some(TreeNode::Category(CategoryNode {
                    name: text("name"),
                    level: integer("level"),
                    id: integer("id"),
                    country_code: text("countryCode"),
                    abbreviation: text("abbreviation"),
                    path: text("path"),
                    children: map
                        .values()
                        .filter(|v| v.is_array() || v.is_object())
                        .filter_map(TreeNode::from_value)
                        .collect(),
                }))
            }
            _ => None,
        }
    }
}

impl CategoryNode {
    /// Leaf of interest: at the event list depth and carrying a path
    pub fn leaf_path(&self) -> Option<&str> {
        match (self.level, self.path.as_deref()) {
            (Some(LEAF_LEVEL), Some(path)) if !path.is_empty() => Some(path),
            _ => None,
        }
    }
}

/// Integers may arrive as `3` or `3.0`
fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// One element of an event list response's `events` array.
///
/// Every field is read fail-closed: a missing value or one of the wrong
/// type decodes as `None` instead of rejecting the envelope.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEventEnvelope {
    #[serde(default, deserialize_with = "lenient")]
    pub event: Option<RawEvent>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub bet_offers: Option<Vec<BetOffer>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(default, deserialize_with = "lenient_integer")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub home_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub away_name: Option<String>,
    /// ISO-8601 start time, kept verbatim
    #[serde(default, deserialize_with = "lenient_string")]
    pub start: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub group: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetOffer {
    #[serde(default, deserialize_with = "lenient")]
    pub bet_offer_type: Option<BetOfferType>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub outcomes: Option<Vec<Outcome>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BetOfferType {
    #[serde(default, deserialize_with = "lenient_integer")]
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Outcome {
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub outcome_type: Option<String>,
    /// Millesimal odds (1950 = 1.95)
    #[serde(default, deserialize_with = "lenient_number")]
    pub odds: Option<f64>,
}

fn lenient_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(as_integer(&Value::deserialize(deserializer)?))
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_f64())
}

fn lenient_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Value::deserialize(deserializer)?
        .as_str()
        .map(str::to_string))
}

/// A nested object that does not fit its shape reads as absent
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

/// Elements of a list are decoded one by one; the ones that do not fit
/// are dropped
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| serde_json::from_value(item).ok())
                .collect(),
        ),
        _ => None,
    })
}

/// A not-yet-started event with its three-way moneyline odds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    pub id: i64,
    pub sport: String,
    pub home_name: String,
    pub away_name: String,
    pub start: String,
    #[serde(rename = "event_group")]
    pub group: String,
    pub odds_1: Option<f64>,
    pub odds_x: Option<f64>,
    pub odds_2: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tree_from_value() {
        let value = json!({
            "groups": [
                {"name": "England", "level": 2, "path": "football/england"},
                {"name": "Premier League", "level": 3.0, "path": "football/england/premier_league", "id": 1000094985}
            ],
            "total": 2
        });

        let TreeNode::Category(root) = TreeNode::from_value(&value).unwrap() else {
            panic!("expected category root");
        };
        assert_eq!(root.children.len(), 1);

        let TreeNode::Group(groups) = &root.children[0] else {
            panic!("expected group");
        };
        let TreeNode::Category(league) = &groups[1] else {
            panic!("expected category");
        };
        assert_eq!(league.level, Some(3));
        assert_eq!(league.id, Some(1000094985));
        assert_eq!(league.leaf_path(), Some("football/england/premier_league"));
    }

    #[test]
    fn test_leaf_path_requires_level_and_path() {
        let mut node = CategoryNode {
            level: Some(2),
            path: Some("football/england".to_string()),
            ..Default::default()
        };
        assert_eq!(node.leaf_path(), None);

        node.level = Some(3);
        node.path = Some(String::new());
        assert_eq!(node.leaf_path(), None);

        node.path = None;
        assert_eq!(node.leaf_path(), None);
    }

    #[test]
    fn test_scalars_are_dropped() {
        assert_eq!(TreeNode::from_value(&json!("football")), None);
        assert_eq!(
            TreeNode::from_value(&json!([1, "two", null])),
            Some(TreeNode::Group(vec![]))
        );
    }
}
