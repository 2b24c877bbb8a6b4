use serde_json::Value;

use super::Record;

// Company-level field names
pub const OFFICER_LIST_SOURCE_KEY: &str = "offiersList";
pub const OFFICER_LIST_KEY: &str = "officersList";
pub const AGENT_NAME: &str = "agentName";
pub const STATUS: &str = "status";
pub const COMPANY_NAME: &str = "companyName";
pub const COMPANY_ADDRESS_RAW: &str = "businessEntityAdd";
pub const AGENT_ADDRESS_RAW: &str = "agentAddress";
pub const REPORT_YEAR: &str = "reportYear";
pub const TAXPAYER_ID: &str = "taxpayerId";

// Output-row field names
pub const AGENT_TITLE: &str = "agentTitle";
pub const AGENT_ACTIVE_YEAR: &str = "agentActiveYr";
pub const REGISTERED_AGENT_TITLE: &str = "REGISTERED AGENT";

// Address group prefixes
pub const COMPANY_ADDRESS_PREFIX: &str = "companyAddress";
pub const AGENT_ADDRESS_PREFIX: &str = "agentAddress";

// Officer nested address
pub const OFFICER_ADDRESS: &str = "address";
/// (source key inside the nested officer address, flattened suffix)
pub const OFFICER_ADDRESS_FIELDS: [(&str, &str); 4] = [
    ("street", "street"),
    ("city", "city"),
    ("state", "state"),
    ("zipCode", "zip"),
];

/// Company fields copied onto every officer row
pub const INHERITED_COMPANY_FIELDS: [&str; 9] = [
    "companyAddress.city",
    "companyAddress.state",
    "companyAddress.street",
    "companyAddress.zip",
    COMPANY_NAME,
    "fileNumber",
    REPORT_YEAR,
    "sosRegDate",
    TAXPAYER_ID,
];

/// Fields left out of the deduplication key; their values are concatenated per group
pub const MERGE_EXCLUDED_FIELDS: [&str; 1] = [AGENT_TITLE];

/// One entry of a field-mapping table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Move `from` to `to`, inserting `default` when `from` is absent
    Rename {
        from: &'static str,
        to: &'static str,
        default: Option<&'static str>,
    },
    /// Move `from` to `to` only when `to` is not already present
    Alias {
        from: &'static str,
        to: &'static str,
    },
    /// Remove the field if present
    Drop(&'static str),
}

pub const COMPANY_FIELD_RULES: &[FieldRule] = &[
    FieldRule::Rename {
        from: "businessEntityName",
        to: COMPANY_NAME,
        default: Some(""),
    },
    FieldRule::Drop("dbaName"),
    FieldRule::Drop("ltrCode"),
    FieldRule::Drop("regionIncLabel"),
    FieldRule::Drop("regionIncName"),
    FieldRule::Drop(STATUS),
];

pub const OFFICER_FIELD_RULES: &[FieldRule] = &[
    FieldRule::Alias {
        from: "title",
        to: AGENT_TITLE,
    },
    FieldRule::Drop("agentRsgnDate"),
    FieldRule::Drop("agentPositionEndDate"),
    FieldRule::Drop("agentTypeCode"),
    FieldRule::Drop("formatedAddress"),
];

/// Apply a field-mapping table to `record` in table order
pub fn apply_field_rules(record: &mut Record, rules: &[FieldRule]) {
    for rule in rules {
        match *rule {
            FieldRule::Rename { from, to, default } => {
                if let Some(value) = record.remove(from) {
                    record.insert(to.to_string(), value);
                } else if let Some(default) = default {
                    record.insert(to.to_string(), Value::String(default.to_string()));
                }
            }
            FieldRule::Alias { from, to } => {
                if !record.contains_key(to) {
                    if let Some(value) = record.remove(from) {
                        record.insert(to.to_string(), value);
                    }
                }
            }
            FieldRule::Drop(name) => {
                record.remove(name);
            }
        }
    }
}
