//! Company profile model.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Company profile as submitted and stored by the document variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyProfile {
    #[validate(length(min = 1, message = "company name is required"))]
    pub company_name: String,
    pub description: String,
    #[validate(url(message = "website must be a valid URL"))]
    pub website: String,
    pub location: String,
    pub industry: String,
    pub size: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CompanyProfile {
        CompanyProfile {
            company_name: "Acme".to_string(),
            description: "Anvils".to_string(),
            website: "https://acme.example".to_string(),
            location: "Remote".to_string(),
            industry: "Manufacturing".to_string(),
            size: "11-50".to_string(),
            logo_url: None,
        }
    }

    #[test]
    fn test_valid_profile() {
        assert!(profile().validate().is_ok());
    }

    #[test]
    fn test_website_must_be_url() {
        let mut p = profile();
        p.website = "not a url".to_string();
        let errors = p.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("website"));
    }

    #[test]
    fn test_camel_case_wire_format() {
        let json = serde_json::to_value(profile()).unwrap();
        assert_eq!(json["companyName"], "Acme");
        assert!(json.get("logoUrl").is_none());
    }
}
