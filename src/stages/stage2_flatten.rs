use serde_json::Value;
use tracing::info;

use crate::error::{PipelineError, PipelineResult};
use crate::models::schema::{
    AGENT_ACTIVE_YEAR, AGENT_TITLE, INHERITED_COMPANY_FIELDS, OFFICER_LIST_KEY,
    REGISTERED_AGENT_TITLE, REPORT_YEAR,
};
use crate::models::{Record, describe_record, flatten_nested};

/// Result of Stage 2: the two row sets, kept apart
#[derive(Debug, Clone, Default)]
pub struct FlattenResult {
    /// One row per officer, carrying inherited company fields
    pub officer_rows: Vec<Record>,
    /// Exactly one registered-agent row per company
    pub agent_rows: Vec<Record>,
}

/// Perform Stage 2: expand each normalized company into officer rows and an agent row
pub fn flatten_companies(companies: Vec<Record>) -> PipelineResult<FlattenResult> {
    let mut result = FlattenResult::default();

    for (index, company) in companies.into_iter().enumerate() {
        let (officer_rows, agent_row) = flatten_company(company, index)?;
        result.officer_rows.extend(officer_rows);
        result.agent_rows.push(agent_row);
    }

    info!(
        "Stage 2: {} officer rows, {} agent rows",
        result.officer_rows.len(),
        result.agent_rows.len()
    );

    Ok(result)
}

/// Flatten one company into (officer rows, agent row)
pub fn flatten_company(mut company: Record, index: usize) -> PipelineResult<(Vec<Record>, Record)> {
    let context = describe_record("company", index, &company);

    let officers = match company.remove(OFFICER_LIST_KEY) {
        Some(Value::Array(officers)) => officers,
        Some(_) => return Err(PipelineError::wrong_type(OFFICER_LIST_KEY, "list", context)),
        None => return Err(PipelineError::missing(OFFICER_LIST_KEY, context)),
    };

    let officer_rows = officers
        .into_iter()
        .map(|officer| match officer {
            Value::Object(officer) => officer_row(officer, &company),
            _ => Err(PipelineError::wrong_type(OFFICER_LIST_KEY, "list of objects", &context)),
        })
        .collect::<PipelineResult<Vec<_>>>()?;

    let report_year = company
        .get(REPORT_YEAR)
        .cloned()
        .ok_or_else(|| PipelineError::missing(REPORT_YEAR, &context))?;
    company.insert(AGENT_ACTIVE_YEAR.to_string(), report_year);
    company.insert(AGENT_TITLE.to_string(), REGISTERED_AGENT_TITLE.into());

    Ok((officer_rows, flatten_nested(company)))
}

/// An officer's own fields plus the inherited company fields the company holds
fn officer_row(officer: Record, company: &Record) -> PipelineResult<Record> {
    let mut row = flatten_nested(officer);
    for field in INHERITED_COMPANY_FIELDS {
        let Some(value) = company.get(field) else {
            continue;
        };
        if row.contains_key(field) {
            return Err(PipelineError::ConflictingField {
                field: field.to_string(),
            });
        }
        row.insert(field.to_string(), value.clone());
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn company(officers: Value) -> Record {
        json!({
            "agentName": "John Doe",
            "companyName": "Acme LLC",
            "companyAddress.street": "100 Oak Ave",
            "companyAddress.city": "Metropolis",
            "companyAddress.state": "NY",
            "companyAddress.zip": "10001",
            "agentAddress.street": "200 Elm St",
            "agentAddress.city": "Metropolis",
            "agentAddress.state": "NY",
            "agentAddress.zip": "10001",
            "officersList": officers,
            "fileNumber": "F1",
            "reportYear": "2020",
            "sosRegDate": "20010101",
            "taxpayerId": "T1"
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[test]
    fn test_n_officers_yield_n_plus_one_rows() {
        for n in 0..4 {
            let officers: Vec<Value> = (0..n).map(|i| json!({"agentTitle": format!("T{i}")})).collect();
            let result = flatten_companies(vec![company(Value::Array(officers))]).unwrap();
            assert_eq!(result.officer_rows.len(), n);
            assert_eq!(result.agent_rows.len(), 1);
        }
    }

    #[test]
    fn test_officer_row_inherits_company_fields() {
        let (rows, _) = flatten_company(company(json!([{"agentTitle": "CEO", "agentName": "Jane"}])), 0).unwrap();
        let row = &rows[0];

        assert_eq!(row["agentTitle"], "CEO");
        assert_eq!(row["agentName"], "Jane");
        for field in INHERITED_COMPANY_FIELDS {
            assert!(row.contains_key(field), "missing {field}");
        }
        // the company's registered-agent address is not inherited
        assert!(!row.contains_key("agentAddress.street"));
        assert!(!row.contains_key("officersList"));
        assert_eq!(row.len(), INHERITED_COMPANY_FIELDS.len() + 2);
    }

    #[test]
    fn test_agent_row_fields() {
        let (_, agent) = flatten_company(company(json!([{"agentTitle": "CEO"}])), 0).unwrap();

        assert_eq!(agent["agentTitle"], "REGISTERED AGENT");
        assert_eq!(agent["agentActiveYr"], "2020");
        assert_eq!(agent["agentName"], "John Doe");
        assert_eq!(agent["agentAddress.street"], "200 Elm St");
        assert_eq!(agent["companyAddress.street"], "100 Oak Ave");
        assert!(!agent.contains_key("officersList"));
    }

    #[test]
    fn test_missing_inherited_field_is_left_absent() {
        let mut source = company(json!([{"agentTitle": "CEO"}]));
        source.remove("sosRegDate");
        let (rows, _) = flatten_company(source, 0).unwrap();
        assert!(!rows[0].contains_key("sosRegDate"));
    }

    #[test]
    fn test_missing_report_year_is_fatal() {
        let mut source = company(json!([]));
        source.remove("reportYear");
        let err = flatten_company(source, 0).unwrap_err();
        assert!(matches!(err, PipelineError::SchemaMismatch { ref field, .. } if field == "reportYear"));
    }

    #[test]
    fn test_conflicting_officer_field_is_fatal() {
        let err = flatten_company(company(json!([{"agentTitle": "CEO", "taxpayerId": "X"}])), 0).unwrap_err();
        assert!(matches!(err, PipelineError::ConflictingField { ref field } if field == "taxpayerId"));
    }

    #[test]
    fn test_nested_officer_objects_are_flattened() {
        let (rows, _) =
            flatten_company(company(json!([{"agentTitle": "CEO", "phone": {"work": "555"}}])), 0).unwrap();
        assert_eq!(rows[0]["phone.work"], "555");
        assert!(!rows[0].contains_key("phone"));
    }
}
