use serde_json::Value;
use tracing::{debug, info};

use crate::error::{PipelineError, PipelineResult};
use crate::models::schema::{
    AGENT_ADDRESS_PREFIX, AGENT_ADDRESS_RAW, COMPANY_ADDRESS_PREFIX, COMPANY_ADDRESS_RAW,
    COMPANY_FIELD_RULES, OFFICER_ADDRESS, OFFICER_ADDRESS_FIELDS, OFFICER_FIELD_RULES,
    OFFICER_LIST_KEY, apply_field_rules,
};
use crate::models::{Record, describe_record, extract_address};

/// Result of Stage 1 normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizationResult {
    /// Companies normalized
    pub companies: usize,
    /// Officers normalized across all companies
    pub officers: usize,
    /// Officers that carried their own nested address
    pub officers_with_address: usize,
}

/// Perform Stage 1: rename/drop fields and expand addresses, in place
pub fn normalize_companies(companies: &mut [Record]) -> PipelineResult<NormalizationResult> {
    let mut result = NormalizationResult::default();

    for (index, company) in companies.iter_mut().enumerate() {
        let (officers, with_address) = normalize_company(company, index)?;
        result.companies += 1;
        result.officers += officers;
        result.officers_with_address += with_address;
    }

    info!(
        "Stage 1: normalized {} companies, {} officers ({} with address)",
        result.companies, result.officers, result.officers_with_address
    );

    Ok(result)
}

/// Normalize one company and its officers.
/// Returns (officer count, officers with a nested address).
pub fn normalize_company(company: &mut Record, index: usize) -> PipelineResult<(usize, usize)> {
    let context = describe_record("company", index, company);

    apply_field_rules(company, COMPANY_FIELD_RULES);

    let raw = take_address(company, COMPANY_ADDRESS_RAW, &context)?;
    extract_address(&raw).write_into(company, COMPANY_ADDRESS_PREFIX);

    let raw = take_address(company, AGENT_ADDRESS_RAW, &context)?;
    extract_address(&raw).write_into(company, AGENT_ADDRESS_PREFIX);

    let officers = match company.get_mut(OFFICER_LIST_KEY) {
        Some(Value::Array(officers)) => officers,
        Some(_) => return Err(PipelineError::wrong_type(OFFICER_LIST_KEY, "list", context)),
        None => return Err(PipelineError::missing(OFFICER_LIST_KEY, context)),
    };

    let mut with_address = 0;
    for (officer_index, officer) in officers.iter_mut().enumerate() {
        let officer_context = format!("{context}, officer #{officer_index}");
        let Value::Object(officer) = officer else {
            return Err(PipelineError::wrong_type(OFFICER_LIST_KEY, "list of objects", officer_context));
        };
        if normalize_officer(officer, &officer_context)? {
            with_address += 1;
        }
    }

    debug!("Normalized {} with {} officers", context, officers.len());
    Ok((officers.len(), with_address))
}

/// Normalize one officer. Returns whether it carried a nested address.
///
/// The nested address is already structured, so its components are copied
/// onto `agentAddress.*` as-is. Officers without one get no address fields.
pub fn normalize_officer(officer: &mut Record, context: &str) -> PipelineResult<bool> {
    apply_field_rules(officer, OFFICER_FIELD_RULES);

    let address = match officer.remove(OFFICER_ADDRESS) {
        None | Some(Value::Null) => return Ok(false),
        Some(Value::Object(address)) => address,
        Some(_) => return Err(PipelineError::wrong_type(OFFICER_ADDRESS, "object", context)),
    };

    for (source, suffix) in OFFICER_ADDRESS_FIELDS {
        let value = address.get(source).cloned().ok_or_else(|| {
            PipelineError::missing(&format!("{OFFICER_ADDRESS}.{source}"), context)
        })?;
        officer.insert(format!("{AGENT_ADDRESS_PREFIX}.{suffix}"), value);
    }

    Ok(true)
}

/// Remove a raw address string, defaulting to empty when absent or null
fn take_address(record: &mut Record, field: &str, context: &str) -> PipelineResult<String> {
    match record.remove(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(raw)) => Ok(raw),
        Some(_) => Err(PipelineError::wrong_type(field, "string", context)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn layout(street: &str, csz: &str) -> String {
        format!("{:<50}{}", street, csz)
    }

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_normalize_company_fields() {
        let mut company = record(json!({
            "agentName": "John Doe",
            "status": "ACTIVE",
            "businessEntityName": "Acme LLC",
            "businessEntityAdd": layout("100 Oak Ave", "Metropolis, NY 10001"),
            "agentAddress": layout("200 Elm St", "Gotham, NJ 07001"),
            "dbaName": "Acme",
            "ltrCode": "L",
            "regionIncLabel": "State",
            "regionIncName": "Texas",
            "officersList": [],
            "fileNumber": "F1",
            "reportYear": "2020",
            "taxpayerId": "T1"
        }));

        assert_eq!(normalize_company(&mut company, 0).unwrap(), (0, 0));

        assert_eq!(
            company,
            record(json!({
                "agentName": "John Doe",
                "companyName": "Acme LLC",
                "companyAddress.street": "100 Oak Ave",
                "companyAddress.city": "Metropolis",
                "companyAddress.state": "NY",
                "companyAddress.zip": "10001",
                "agentAddress.street": "200 Elm St",
                "agentAddress.city": "Gotham",
                "agentAddress.state": "NJ",
                "agentAddress.zip": "07001",
                "officersList": [],
                "fileNumber": "F1",
                "reportYear": "2020",
                "taxpayerId": "T1"
            }))
        );
    }

    #[test]
    fn test_missing_addresses_default_to_empty_fields() {
        let mut company = record(json!({"officersList": [], "agentAddress": null}));
        normalize_company(&mut company, 0).unwrap();
        for prefix in ["companyAddress", "agentAddress"] {
            for suffix in ["street", "city", "state", "zip"] {
                assert_eq!(company[&format!("{prefix}.{suffix}")], "");
            }
        }
        assert_eq!(company["companyName"], "");
    }

    #[test]
    fn test_non_string_address_is_fatal() {
        let mut company = record(json!({"officersList": [], "businessEntityAdd": 42}));
        let err = normalize_company(&mut company, 3).unwrap_err();
        assert!(matches!(err, PipelineError::UnexpectedType { ref field, .. } if field == "businessEntityAdd"));
    }

    #[test]
    fn test_officer_address_copied_verbatim() {
        let mut officer = record(json!({
            "agentName": "Jane Roe",
            "agentTitle": "PRESIDENT",
            "agentRsgnDate": "2019",
            "agentPositionEndDate": "2020",
            "agentTypeCode": "P",
            "formatedAddress": "whatever",
            "address": {"street": " 5 Main St ", "city": "Dallas", "state": "TX", "zipCode": "75201"}
        }));

        assert!(normalize_officer(&mut officer, "officer").unwrap());
        assert_eq!(
            officer,
            record(json!({
                "agentName": "Jane Roe",
                "agentTitle": "PRESIDENT",
                "agentAddress.street": " 5 Main St ",
                "agentAddress.city": "Dallas",
                "agentAddress.state": "TX",
                "agentAddress.zip": "75201"
            }))
        );
    }

    #[test]
    fn test_officer_without_address_gets_no_address_fields() {
        let mut officer = record(json!({"title": "CEO"}));
        assert!(!normalize_officer(&mut officer, "officer").unwrap());
        assert_eq!(officer, record(json!({"agentTitle": "CEO"})));
    }

    #[test]
    fn test_officer_address_missing_component_is_fatal() {
        let mut officer = record(json!({"address": {"street": "1", "city": "2", "state": "3"}}));
        let err = normalize_officer(&mut officer, "officer").unwrap_err();
        assert!(matches!(err, PipelineError::SchemaMismatch { ref field, .. } if field == "address.zipCode"));
    }

    #[test]
    fn test_normalize_companies_counts_officers() {
        let mut companies = vec![
            record(json!({"officersList": [{"title": "CEO"}, {"title": "CFO", "address": {
                "street": "1", "city": "2", "state": "3", "zipCode": "4"
            }}]})),
            record(json!({"officersList": []})),
        ];
        let result = normalize_companies(&mut companies).unwrap();
        assert_eq!(
            result,
            NormalizationResult { companies: 2, officers: 2, officers_with_address: 1 }
        );
        assert_eq!(companies[0]["officersList"][1]["agentAddress.zip"], "4");
    }
}
