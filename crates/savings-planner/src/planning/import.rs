use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::domain::{Goal, GoalId, Money};

/// Failure while reading a goal snapshot export.
#[derive(Debug, thiserror::Error)]
pub enum GoalImportError {
    #[error("unable to open goal export: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed goal export: {0}")]
    Csv(#[from] csv::Error),
    #[error("goal '{goal_id}' has an invalid deadline '{value}' (expected YYYY-MM-DD)")]
    InvalidDeadline { goal_id: GoalId, value: String },
}

/// Reads `id,name,target_amount,current_amount,deadline,priority` rows.
pub fn read_goals<R: Read>(reader: R) -> Result<Vec<Goal>, GoalImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut goals = Vec::new();

    for record in csv_reader.deserialize::<GoalRow>() {
        goals.push(record?.into_goal()?);
    }

    Ok(goals)
}

pub fn read_goals_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Goal>, GoalImportError> {
    let file = File::open(path)?;
    read_goals(file)
}

#[derive(Debug, Deserialize)]
struct GoalRow {
    id: String,
    name: String,
    target_amount: Money,
    current_amount: Money,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    deadline: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    priority: Option<String>,
}

impl GoalRow {
    fn into_goal(self) -> Result<Goal, GoalImportError> {
        let id = GoalId(self.id);

        let deadline = match self.deadline {
            Some(raw) => Some(NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                GoalImportError::InvalidDeadline {
                    goal_id: id.clone(),
                    value: raw.clone(),
                }
            })?),
            None => None,
        };
        // Non-numeric priorities are treated like a missing priority.
        let priority = self.priority.and_then(|raw| raw.parse::<i32>().ok());

        Ok(Goal {
            id,
            name: self.name,
            target_amount: self.target_amount,
            current_amount: self.current_amount,
            deadline,
            priority,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
