//! Ledger master data: parties (debtors/creditors) and bank ledgers.

use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::domain::types::TypeConstraintError;
use crate::domain::{bool_field, first_row, text_field};

/// Ledger sub-head; decides which detail block the ledger carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SubHead {
    Debtors,
    Creditors,
    Bank,
}

impl SubHead {
    pub fn as_str(self) -> &'static str {
        match self {
            SubHead::Debtors => "Debtors",
            SubHead::Creditors => "Creditors",
            SubHead::Bank => "Bank",
        }
    }

    /// Debtors and creditors carry party details.
    pub fn is_party(self) -> bool {
        matches!(self, SubHead::Debtors | SubHead::Creditors)
    }
}

impl FromStr for SubHead {
    type Err = TypeConstraintError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "Debtors" => Ok(SubHead::Debtors),
            "Creditors" => Ok(SubHead::Creditors),
            "Bank" => Ok(SubHead::Bank),
            "" => Err(TypeConstraintError::EmptyString),
            other => Err(TypeConstraintError::InvalidValue(format!(
                "unknown sub-head `{other}`"
            ))),
        }
    }
}

impl Display for SubHead {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

// `\d` would also match non-ASCII digits.
static POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{6}$").expect("postal code pattern"));
static PHONE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[6-9][0-9]{9}$").expect("phone number pattern"));

fn validate_registration(party: &PartyDetails) -> Result<(), ValidationError> {
    if !party.registration_type.trim().eq_ignore_ascii_case("regular") {
        return Ok(());
    }
    if party.gst_number.trim().is_empty() {
        return Err(invalid(
            "gst_number",
            "GST Number is required for Regular registration",
        ));
    }
    if party.pan_number.trim().is_empty() {
        return Err(invalid(
            "pan_number",
            "PAN Number is required for Regular registration",
        ));
    }
    Ok(())
}

/// One bank account attached to a ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BankDetail {
    #[validate(length(min = 1, message = "Account Type is required"))]
    pub account_type: String,
    #[validate(length(min = 1, message = "Account Number is required"))]
    pub account_number: String,
    #[validate(length(min = 1, message = "Account Holder Name is required"))]
    pub account_holder_name: String,
    #[validate(length(min = 1, message = "Bank Name is required"))]
    pub bank_name: String,
    #[validate(length(min = 1, message = "Bank Branch is required"))]
    pub bank_branch: String,
    #[validate(length(min = 1, message = "IFSC Code is required"))]
    pub ifsc_code: String,
    pub micr_code: String,
}

impl BankDetail {
    /// `true` when every field is blank, i.e. an untouched form row.
    pub fn is_blank(&self) -> bool {
        [
            &self.account_type,
            &self.account_number,
            &self.account_holder_name,
            &self.bank_name,
            &self.bank_branch,
            &self.ifsc_code,
            &self.micr_code,
        ]
        .iter()
        .all(|value| value.trim().is_empty())
    }
}

/// Contact and tax registration details of a debtor or creditor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Validate)]
#[serde(rename_all = "PascalCase")]
#[validate(schema(function = "validate_registration"))]
pub struct PartyDetails {
    #[validate(length(min = 1, message = "Address Line 1 is required"))]
    pub address_line1: String,
    pub address_line2: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city_pid: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state_pid: String,
    #[validate(regex(
        path = *POSTAL_CODE,
        code = "postal_code",
        message = "Postal Code must be exactly 6 digits"
    ))]
    pub postal_code: String,
    #[validate(length(min = 1, message = "Country is required"))]
    pub country: String,
    #[validate(regex(
        path = *PHONE_NUMBER,
        code = "phone_number",
        message = "Phone number must be 10 digits"
    ))]
    pub phone_number: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Registration Type is required"))]
    pub registration_type: String,
    #[serde(rename = "GSTNumber")]
    pub gst_number: String,
    #[serde(rename = "PANNumber")]
    pub pan_number: String,
    /// Whether the party keeps a list of bank accounts.
    pub bank_details: bool,
}

impl Default for PartyDetails {
    fn default() -> Self {
        Self {
            address_line1: String::new(),
            address_line2: String::new(),
            city_pid: String::new(),
            state_pid: String::new(),
            postal_code: String::new(),
            country: "India".to_string(),
            phone_number: String::new(),
            email: String::new(),
            registration_type: String::new(),
            gst_number: String::new(),
            pan_number: String::new(),
            bank_details: false,
        }
    }
}

fn validate_bank_rows(payload: &LedgerPayload) -> Result<(), ValidationError> {
    match (&payload.party_details, payload.sub_head) {
        (Some(party), _) if party.bank_details && payload.bank_details_list.is_empty() => {
            Err(invalid(
                "bank_details",
                "At least one bank detail row must be added when Bank Details is Yes.",
            ))
        }
        (None, SubHead::Bank) if payload.bank_details_list.len() != 1 => Err(invalid(
            "bank_details",
            "A bank ledger carries exactly one bank account.",
        )),
        _ => Ok(()),
    }
}

/// Body sent to the ledger create and update endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Validate)]
#[serde(rename_all = "PascalCase")]
#[validate(schema(function = "validate_bank_rows"))]
pub struct LedgerPayload {
    #[validate(length(
        min = 2,
        max = 50,
        message = "Company Name must be between 2 and 50 characters"
    ))]
    pub company_name: String,
    pub sub_head: SubHead,
    #[validate(nested)]
    pub party_details: Option<PartyDetails>,
    #[validate(nested)]
    pub bank_details_list: Vec<BankDetail>,
}

impl LedgerPayload {
    /// Debtor or creditor ledger with optional bank accounts.
    pub fn party(
        company_name: String,
        sub_head: SubHead,
        party: PartyDetails,
        bank_details: Vec<BankDetail>,
    ) -> Self {
        Self {
            company_name,
            sub_head,
            party_details: Some(party),
            bank_details_list: bank_details,
        }
    }

    /// Bank ledger carrying only its own account.
    pub fn bank(company_name: String, account: BankDetail) -> Self {
        Self {
            company_name,
            sub_head: SubHead::Bank,
            party_details: None,
            bank_details_list: vec![account],
        }
    }
}

/// Ledger as returned by the backend detail endpoint.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LedgerDetails {
    /// Sub-head names offered by the backend.
    pub sub_head_options: Vec<String>,
    pub company_name: String,
    pub sub_head: String,
    pub party: PartyDetails,
    /// Own account of a bank ledger.
    pub bank_account: BankDetail,
    /// Accounts listed under a debtor or creditor.
    pub bank_rows: Vec<BankDetail>,
}

impl LedgerDetails {
    /// Maps the backend's multi-table detail response.
    ///
    /// `table` lists the sub-heads, `table3` holds the ledger row and
    /// `table4` its bank accounts.
    pub fn from_api(details: &Value) -> Self {
        let mut result = Self {
            sub_head_options: details
                .get("table")
                .and_then(Value::as_array)
                .map(|rows| {
                    rows.iter()
                        .map(|row| text_field(row, "accountTypeName"))
                        .filter(|name| !name.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            ..Self::default()
        };

        if let Some(row) = first_row(details, "table3") {
            result.company_name = text_field(row, "ledgerName");
            result.sub_head = text_field(row, "accountTypeName");
            if result.sub_head != SubHead::Bank.as_str() {
                result.party = PartyDetails {
                    address_line1: text_field(row, "addressLine1"),
                    address_line2: text_field(row, "addressLine2"),
                    city_pid: text_field(row, "cityPid"),
                    state_pid: text_field(row, "statePid"),
                    postal_code: text_field(row, "postalCode"),
                    country: text_field(row, "country"),
                    phone_number: text_field(row, "phoneNumber"),
                    email: text_field(row, "email"),
                    registration_type: text_field(row, "registrationType"),
                    gst_number: text_field(row, "gstNumber"),
                    pan_number: text_field(row, "panNumber"),
                    bank_details: bool_field(row, "isBankDtl"),
                };
            }
        }

        let accounts: Vec<BankDetail> = details
            .get("table4")
            .and_then(Value::as_array)
            .map(|rows| {
                rows.iter()
                    .map(|row| BankDetail {
                        account_type: text_field(row, "accountType"),
                        account_number: text_field(row, "accountNumber"),
                        account_holder_name: text_field(row, "accHolderName"),
                        bank_name: text_field(row, "bankName"),
                        bank_branch: text_field(row, "bankBranch"),
                        ifsc_code: text_field(row, "ifscCode"),
                        micr_code: text_field(row, "micrCode"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        if result.sub_head == SubHead::Bank.as_str() {
            result.bank_account = accounts.into_iter().next().unwrap_or_default();
        } else {
            result.bank_rows = accounts;
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn party() -> PartyDetails {
        PartyDetails {
            address_line1: "12 Mall Road".to_string(),
            city_pid: "4".to_string(),
            state_pid: "7".to_string(),
            postal_code: "110084".to_string(),
            phone_number: "9876543210".to_string(),
            email: "akash@example.com".to_string(),
            registration_type: "Unregistered".to_string(),
            ..PartyDetails::default()
        }
    }

    fn account() -> BankDetail {
        BankDetail {
            account_type: "Savings".to_string(),
            account_number: "0001".to_string(),
            account_holder_name: "Akash".to_string(),
            bank_name: "SBI".to_string(),
            bank_branch: "Rohini".to_string(),
            ifsc_code: "SBIN0000001".to_string(),
            micr_code: String::new(),
        }
    }

    #[test]
    fn valid_party_ledger_passes() {
        let payload =
            LedgerPayload::party("Akash Corp".to_string(), SubHead::Debtors, party(), vec![]);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn party_field_rules_are_enforced() {
        let mut details = party();
        details.postal_code = "1100".to_string();
        details.phone_number = "5876543210".to_string();
        details.email = "not-an-email".to_string();
        let payload =
            LedgerPayload::party("Akash Corp".to_string(), SubHead::Creditors, details, vec![]);

        let errors = payload.validate().unwrap_err().to_string();
        assert!(errors.contains("Postal Code must be exactly 6 digits"));
        assert!(errors.contains("Phone number must be 10 digits"));
        assert!(errors.contains("Invalid email address"));
    }

    #[test]
    fn phone_and_postal_code_patterns() {
        let cases = [
            ("110084", "6000000000", true),
            ("110084", "9876543210", true),
            ("110084", "1234567890", false),
            ("110084", "98765 43210", false),
            ("110084", "+919876543210", false),
            ("110084", "987654321", false),
            ("11008", "9876543210", false),
            ("1100845", "9876543210", false),
            ("११००८४", "9876543210", false),
            ("110084", "९८७६५४३२१०", false),
        ];
        for (postal_code, phone_number, ok) in cases {
            let mut details = party();
            details.postal_code = postal_code.to_string();
            details.phone_number = phone_number.to_string();
            assert_eq!(
                details.validate().is_ok(),
                ok,
                "{postal_code} / {phone_number}"
            );
        }
    }

    #[test]
    fn regular_registration_requires_gst_and_pan() {
        let mut details = party();
        details.registration_type = " regular ".to_string();
        assert!(details.validate().is_err());

        details.gst_number = "07ABCDE1234F1Z5".to_string();
        assert!(details.validate().is_err());

        details.pan_number = "ABCDE1234F".to_string();
        assert!(details.validate().is_ok());
    }

    #[test]
    fn bank_details_yes_requires_a_row() {
        let mut details = party();
        details.bank_details = true;
        let payload = LedgerPayload::party(
            "Akash Corp".to_string(),
            SubHead::Debtors,
            details.clone(),
            vec![],
        );
        assert!(payload.validate().is_err());

        let payload =
            LedgerPayload::party("Akash Corp".to_string(), SubHead::Debtors, details, vec![account()]);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn bank_ledger_requires_account_fields() {
        assert!(LedgerPayload::bank("Main Bank".to_string(), account()).validate().is_ok());

        let mut incomplete = account();
        incomplete.ifsc_code.clear();
        assert!(LedgerPayload::bank("Main Bank".to_string(), incomplete).validate().is_err());
    }

    #[test]
    fn company_name_length_is_checked() {
        let payload = LedgerPayload::bank("A".to_string(), account());
        assert!(payload.validate().is_err());
    }

    #[test]
    fn payload_uses_backend_key_names() {
        let payload =
            LedgerPayload::party("Akash Corp".to_string(), SubHead::Debtors, party(), vec![account()]);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["CompanyName"], "Akash Corp");
        assert_eq!(value["SubHead"], "Debtors");
        assert_eq!(value["PartyDetails"]["PostalCode"], "110084");
        assert_eq!(value["PartyDetails"]["GSTNumber"], "");
        assert_eq!(value["PartyDetails"]["BankDetails"], false);
        assert_eq!(value["BankDetailsList"][0]["ifscCode"], "SBIN0000001");

        let bank = serde_json::to_value(LedgerPayload::bank("Main".to_string(), account())).unwrap();
        assert!(bank["PartyDetails"].is_null());
    }

    #[test]
    fn maps_party_detail_response() {
        let details = LedgerDetails::from_api(&json!({
            "table": [{"pid": 1, "accountTypeName": "Debtors"}, {"pid": 2, "accountTypeName": "Bank"}],
            "table3": [{
                "ledgerName": "Akash Corp",
                "accountTypeName": "Debtors",
                "isBankDtl": true,
                "addressLine1": "12 Mall Road",
                "cityPid": 4,
                "postalCode": "110084",
                "country": "India"
            }],
            "table4": [{"accountType": "Current", "accHolderName": "Akash", "ifscCode": "X1"}]
        }));

        assert_eq!(details.sub_head_options, vec!["Debtors", "Bank"]);
        assert_eq!(details.company_name, "Akash Corp");
        assert_eq!(details.party.city_pid, "4");
        assert!(details.party.bank_details);
        assert_eq!(details.bank_rows.len(), 1);
        assert_eq!(details.bank_rows[0].account_holder_name, "Akash");
        assert_eq!(details.bank_account, BankDetail::default());
    }

    #[test]
    fn maps_bank_detail_response() {
        let details = LedgerDetails::from_api(&json!({
            "table3": [{"ledgerName": "Main Bank", "accountTypeName": "Bank"}],
            "table4": [{"accountType": "Current", "accountNumber": "42"}]
        }));

        assert_eq!(details.sub_head, "Bank");
        assert_eq!(details.bank_account.account_number, "42");
        assert!(details.bank_rows.is_empty());
        assert_eq!(details.party.country, "India");
    }

    #[test]
    fn parses_sub_heads() {
        assert_eq!("Bank".parse::<SubHead>().unwrap(), SubHead::Bank);
        assert!("Debtors".parse::<SubHead>().unwrap().is_party());
        assert_eq!("".parse::<SubHead>(), Err(TypeConstraintError::EmptyString));
        assert!("Loans".parse::<SubHead>().is_err());
    }
}
