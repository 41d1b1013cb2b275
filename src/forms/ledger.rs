use serde::Deserialize;
use validator::Validate;

use crate::domain::ledger::{BankDetail, LedgerDetails, LedgerPayload, PartyDetails, SubHead};
use crate::forms::{FormError, column_value};

/// Ledger form as posted by `masters/ledger.html`.
///
/// Bank rows arrive as repeated fields; the n-th value of each field forms
/// the n-th row.
#[derive(Debug, Default, Deserialize)]
pub struct LedgerForm {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub sub_head: String,
    #[serde(default)]
    pub address_line1: String,
    #[serde(default)]
    pub address_line2: String,
    #[serde(default)]
    pub city_pid: String,
    #[serde(default)]
    pub state_pid: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub registration_type: String,
    #[serde(default)]
    pub gst_number: String,
    #[serde(default)]
    pub pan_number: String,
    /// `yes` when the party keeps bank accounts.
    #[serde(default)]
    pub bank_details: String,
    #[serde(default)]
    pub account_type: Vec<String>,
    #[serde(default)]
    pub account_number: Vec<String>,
    #[serde(default)]
    pub account_holder_name: Vec<String>,
    #[serde(default)]
    pub bank_name: Vec<String>,
    #[serde(default)]
    pub bank_branch: Vec<String>,
    #[serde(default)]
    pub ifsc_code: Vec<String>,
    #[serde(default)]
    pub micr_code: Vec<String>,
}

impl LedgerForm {
    /// Parses a urlencoded body with repeated bank row fields.
    pub fn from_bytes(body: &[u8]) -> Result<Self, FormError> {
        serde_html_form::from_bytes(body).map_err(|err| FormError::Malformed(err.to_string()))
    }

    fn party(&self) -> PartyDetails {
        PartyDetails {
            address_line1: self.address_line1.trim().to_string(),
            address_line2: self.address_line2.trim().to_string(),
            city_pid: self.city_pid.trim().to_string(),
            state_pid: self.state_pid.trim().to_string(),
            postal_code: self.postal_code.trim().to_string(),
            country: self.country.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            email: self.email.trim().to_string(),
            registration_type: self.registration_type.trim().to_string(),
            gst_number: self.gst_number.trim().to_string(),
            pan_number: self.pan_number.trim().to_string(),
            bank_details: self.bank_details.trim().eq_ignore_ascii_case("yes"),
        }
    }

    /// Every submitted bank row, blank ones included.
    fn bank_rows(&self) -> Vec<BankDetail> {
        let rows = [
            self.account_type.len(),
            self.account_number.len(),
            self.account_holder_name.len(),
            self.bank_name.len(),
            self.bank_branch.len(),
            self.ifsc_code.len(),
            self.micr_code.len(),
        ]
        .into_iter()
        .max()
        .unwrap_or_default();

        (0..rows)
            .map(|index| BankDetail {
                account_type: column_value(&self.account_type, index),
                account_number: column_value(&self.account_number, index),
                account_holder_name: column_value(&self.account_holder_name, index),
                bank_name: column_value(&self.bank_name, index),
                bank_branch: column_value(&self.bank_branch, index),
                ifsc_code: column_value(&self.ifsc_code, index),
                micr_code: column_value(&self.micr_code, index),
            })
            .collect()
    }

    /// Submitted values in the shape the ledger page renders, so a rejected
    /// form can be shown again.
    pub fn to_details(&self, sub_head_options: Vec<String>) -> LedgerDetails {
        let mut rows = self.bank_rows();
        let is_bank = self.sub_head.trim() == SubHead::Bank.as_str();
        let bank_account = if is_bank && !rows.is_empty() {
            rows.remove(0)
        } else {
            BankDetail::default()
        };

        LedgerDetails {
            sub_head_options,
            company_name: self.company_name.clone(),
            sub_head: self.sub_head.clone(),
            party: self.party(),
            bank_account,
            bank_rows: if is_bank { Vec::new() } else { rows },
        }
    }
}

impl TryFrom<&LedgerForm> for LedgerPayload {
    type Error = FormError;

    fn try_from(form: &LedgerForm) -> Result<Self, Self::Error> {
        let sub_head: SubHead = form
            .sub_head
            .parse()
            .map_err(|_| FormError::InvalidSubHead)?;
        let company_name = form.company_name.trim().to_string();

        let payload = if sub_head.is_party() {
            let party = form.party();
            let rows = if party.bank_details {
                form.bank_rows()
                    .into_iter()
                    .filter(|row| !row.is_blank())
                    .collect()
            } else {
                Vec::new()
            };
            LedgerPayload::party(company_name, sub_head, party, rows)
        } else {
            let account = form.bank_rows().into_iter().next().unwrap_or_default();
            LedgerPayload::bank(company_name, account)
        };

        payload.validate()?;
        Ok(payload)
    }
}
