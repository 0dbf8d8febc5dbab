//! Customer payload model.
//!
//! A customer is either a private person or a legal entity. Legal entities
//! must additionally carry a VAT number (INN) and a registration address.
//! Those two fields are optional while building and only become required
//! when the payload is finalized with [`Customer::form_data`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{CustomerError, Result};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length of the customer name, in characters.
pub const MAX_NAME_LEN: usize = 500;

/// Maximum length of the phone number, in characters.
pub const MAX_PHONE_LEN: usize = 100;

/// Maximum length of the email address, in characters.
pub const MAX_EMAIL_LEN: usize = 100;

/// Maximum length of the VAT number (INN), in characters.
pub const MAX_INN_LEN: usize = 20;

/// Maximum length of the registration address, in characters.
pub const MAX_ADDRESS_LEN: usize = 1000;

const FIELD_TYPE: &str = "type";
const FIELD_NAME: &str = "name";
const FIELD_PHONE: &str = "phone";
const FIELD_EMAIL: &str = "email";
const FIELD_VAT_NUMBER: &str = "vatNumber";
const FIELD_REGISTRATION_ADDRESS: &str = "registrationAddress";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?$",
    )
    .expect("valid email regex")
});

/// Finalized customer payload: field name to value.
pub type FormData = BTreeMap<&'static str, String>;

/// The kind of customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerType {
    /// An individual.
    #[serde(rename = "private")]
    PrivatePerson,
    /// A company or other legal entity.
    #[serde(rename = "legal")]
    LegalPerson,
}

impl CustomerType {
    /// The wire value sent to the API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PrivatePerson => "private",
            Self::LegalPerson => "legal",
        }
    }
}

impl FromStr for CustomerType {
    type Err = CustomerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "private" => Ok(Self::PrivatePerson),
            "legal" => Ok(Self::LegalPerson),
            other => Err(CustomerError::InvalidType(other.to_string())),
        }
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A customer record being built for an API payload.
///
/// Setters validate their own field and leave the record unchanged on
/// failure. Cross-field requirements are checked by [`Customer::form_data`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Customer {
    customer_type: Option<CustomerType>,
    name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    vat_number: Option<String>,
    registration_address: Option<String>,
}

impl Customer {
    /// Create an empty customer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the customer type from its wire value (`private` or `legal`).
    ///
    /// # Errors
    ///
    /// Returns `InvalidType` for any other value; the previous type is kept.
    pub fn set_type(&mut self, value: &str) -> Result<()> {
        self.customer_type = Some(value.parse()?);
        Ok(())
    }

    /// Set the customer name (1-500 characters).
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or too long.
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.name = Some(required(FIELD_NAME, name, MAX_NAME_LEN)?);
        Ok(())
    }

    /// Set the phone number (1-100 characters).
    ///
    /// # Errors
    ///
    /// Returns an error if the phone is empty or too long.
    pub fn set_phone(&mut self, phone: &str) -> Result<()> {
        self.phone = Some(required(FIELD_PHONE, phone, MAX_PHONE_LEN)?);
        Ok(())
    }

    /// Set the email address (1-100 characters, valid syntax).
    ///
    /// # Errors
    ///
    /// Returns an error if the email is empty, too long, or malformed.
    pub fn set_email(&mut self, email: &str) -> Result<()> {
        let email = required(FIELD_EMAIL, email, MAX_EMAIL_LEN)?;
        if !is_valid_email(&email) {
            return Err(CustomerError::InvalidEmail(email));
        }
        self.email = Some(email);
        Ok(())
    }

    /// Set the VAT number (INN). An empty value is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is longer than 20 characters.
    pub fn set_inn(&mut self, inn: &str) -> Result<()> {
        if let Some(inn) = optional(FIELD_VAT_NUMBER, inn, MAX_INN_LEN)? {
            self.vat_number = Some(inn);
        }
        Ok(())
    }

    /// Set the registration address. An empty value is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is longer than 1000 characters.
    pub fn set_address(&mut self, address: &str) -> Result<()> {
        if let Some(address) = optional(FIELD_REGISTRATION_ADDRESS, address, MAX_ADDRESS_LEN)? {
            self.registration_address = Some(address);
        }
        Ok(())
    }

    /// The customer type, if set.
    #[must_use]
    pub const fn customer_type(&self) -> Option<CustomerType> {
        self.customer_type
    }

    /// The customer name, if set.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The phone number, if set.
    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    /// The email address, if set.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// The VAT number (INN), if set.
    #[must_use]
    pub fn vat_number(&self) -> Option<&str> {
        self.vat_number.as_deref()
    }

    /// The registration address, if set.
    #[must_use]
    pub fn registration_address(&self) -> Option<&str> {
        self.registration_address.as_deref()
    }

    /// Produce the request payload.
    ///
    /// Always contains `type`, `name`, `phone` and `email`. Legal entities
    /// also get `vatNumber` and `registrationAddress`. The customer is left
    /// untouched, so this may be called repeatedly.
    ///
    /// # Errors
    ///
    /// Returns `MissingFields` naming every required field that is unset.
    pub fn form_data(&self) -> Result<FormData> {
        let mut fields: Vec<(&'static str, Option<String>)> = vec![
            (FIELD_TYPE, self.customer_type.map(|t| t.as_str().to_string())),
            (FIELD_NAME, self.name.clone()),
            (FIELD_PHONE, self.phone.clone()),
            (FIELD_EMAIL, self.email.clone()),
        ];

        if self.customer_type == Some(CustomerType::LegalPerson) {
            fields.push((FIELD_VAT_NUMBER, self.vat_number.clone()));
            fields.push((FIELD_REGISTRATION_ADDRESS, self.registration_address.clone()));
        }

        let mut data = FormData::new();
        let mut not_filled = Vec::new();
        for (field, value) in fields {
            match value {
                Some(value) => {
                    data.insert(field, value);
                }
                None => not_filled.push(field),
            }
        }

        if !not_filled.is_empty() {
            return Err(CustomerError::MissingFields(not_filled));
        }

        Ok(data)
    }
}

/// Loosely-typed customer fields, e.g. deserialized from user input.
///
/// Converting into a [`Customer`] runs every present field through its
/// setter in declaration order and stops at the first failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerInput {
    /// Customer type wire value.
    #[serde(rename = "type", default)]
    pub customer_type: Option<String>,
    /// Customer name.
    #[serde(default)]
    pub name: Option<String>,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// VAT number (INN).
    #[serde(default, alias = "vatNumber")]
    pub inn: Option<String>,
    /// Registration address.
    #[serde(default, alias = "registrationAddress")]
    pub address: Option<String>,
}

impl TryFrom<CustomerInput> for Customer {
    type Error = CustomerError;

    fn try_from(input: CustomerInput) -> Result<Self> {
        let mut customer = Self::new();
        if let Some(value) = input.customer_type {
            customer.set_type(&value)?;
        }
        if let Some(value) = input.name {
            customer.set_name(&value)?;
        }
        if let Some(value) = input.phone {
            customer.set_phone(&value)?;
        }
        if let Some(value) = input.email {
            customer.set_email(&value)?;
        }
        if let Some(value) = input.inn {
            customer.set_inn(&value)?;
        }
        if let Some(value) = input.address {
            customer.set_address(&value)?;
        }
        Ok(customer)
    }
}

fn required(field: &'static str, value: &str, max: usize) -> Result<String> {
    if value.is_empty() {
        return Err(CustomerError::Required { field });
    }
    optional(field, value, max).map(Option::unwrap_or_default)
}

fn optional(field: &'static str, value: &str, max: usize) -> Result<Option<String>> {
    if value.is_empty() {
        return Ok(None);
    }
    if value.chars().count() > max {
        return Err(CustomerError::TooLong { field, max });
    }
    Ok(Some(value.to_string()))
}

fn is_valid_email(email: &str) -> bool {
    // Local part is limited to 64 characters.
    email
        .split_once('@')
        .is_some_and(|(local, _)| local.len() <= 64)
        && EMAIL_RE.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn private_customer() -> Customer {
        let mut customer = Customer::new();
        customer.set_type("private").unwrap();
        customer.set_name("Иван Петров").unwrap();
        customer.set_phone("+79991234567").unwrap();
        customer.set_email("ivan@example.com").unwrap();
        customer
    }

    #[test]
    fn private_person_form_data_has_four_fields() {
        let data = private_customer().form_data().unwrap();
        assert_eq!(data.len(), 4);
        assert_eq!(data["type"], "private");
        assert_eq!(data["name"], "Иван Петров");
        assert_eq!(data["phone"], "+79991234567");
        assert_eq!(data["email"], "ivan@example.com");
    }

    #[test]
    fn private_person_ignores_vat_and_address() {
        let mut customer = private_customer();
        customer.set_inn("7700000000").unwrap();
        customer.set_address("Moscow").unwrap();
        let data = customer.form_data().unwrap();
        assert_eq!(data.len(), 4);
        assert!(!data.contains_key("vatNumber"));
        assert!(!data.contains_key("registrationAddress"));
    }

    #[test]
    fn legal_person_form_data_has_six_fields() {
        let mut customer = private_customer();
        customer.set_type("legal").unwrap();
        customer.set_inn("7700000000").unwrap();
        customer.set_address("Moscow, Tverskaya 1").unwrap();
        let data = customer.form_data().unwrap();
        assert_eq!(data.len(), 6);
        assert_eq!(data["type"], "legal");
        assert_eq!(data["vatNumber"], "7700000000");
        assert_eq!(data["registrationAddress"], "Moscow, Tverskaya 1");
    }

    #[test]
    fn legal_person_without_vat_number_fails() {
        let mut customer = private_customer();
        customer.set_type("legal").unwrap();
        customer.set_address("Moscow").unwrap();
        let err = customer.form_data().unwrap_err();
        assert_eq!(err.missing_fields(), ["vatNumber"]);
        assert!(err.to_string().contains("vatNumber"));
    }

    #[test]
    fn missing_fields_are_aggregated_in_order() {
        let mut customer = Customer::new();
        customer.set_type("legal").unwrap();
        customer.set_phone("123").unwrap();
        let err = customer.form_data().unwrap_err();
        assert_eq!(
            err.missing_fields(),
            ["name", "email", "vatNumber", "registrationAddress"]
        );
        assert_eq!(
            err.to_string(),
            "fields name, email, vatNumber, registrationAddress must be filled"
        );
    }

    #[test]
    fn empty_customer_reports_base_fields() {
        let err = Customer::new().form_data().unwrap_err();
        assert_eq!(err.missing_fields(), ["type", "name", "phone", "email"]);
    }

    #[test]
    fn form_data_is_repeatable() {
        let customer = private_customer();
        let first = customer.form_data().unwrap();
        let second = customer.form_data().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_type_is_rejected_and_previous_kept() {
        let mut customer = Customer::new();
        customer.set_type("legal").unwrap();
        let err = customer.set_type("unknown").unwrap_err();
        assert_eq!(err, CustomerError::InvalidType("unknown".to_string()));
        assert_eq!(customer.customer_type(), Some(CustomerType::LegalPerson));
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut customer = Customer::new();
        assert_eq!(
            customer.set_name("").unwrap_err(),
            CustomerError::Required { field: "name" }
        );
        assert_eq!(customer.name(), None);
    }

    #[test]
    fn name_length_limit() {
        let mut customer = Customer::new();
        customer.set_name(&"я".repeat(MAX_NAME_LEN)).unwrap();
        let err = customer.set_name(&"a".repeat(MAX_NAME_LEN + 1)).unwrap_err();
        assert_eq!(
            err,
            CustomerError::TooLong {
                field: "name",
                max: MAX_NAME_LEN
            }
        );
        assert_eq!(customer.name().map(|n| n.chars().count()), Some(MAX_NAME_LEN));
    }

    #[test]
    fn phone_length_limit() {
        let mut customer = Customer::new();
        assert!(customer.set_phone(&"1".repeat(MAX_PHONE_LEN)).is_ok());
        assert!(customer.set_phone(&"1".repeat(MAX_PHONE_LEN + 1)).is_err());
        assert!(matches!(
            customer.set_phone(""),
            Err(CustomerError::Required { field: "phone" })
        ));
    }

    #[test]
    fn invalid_email_is_rejected() {
        let mut customer = Customer::new();
        for bad in ["not-an-email", "a@b", "@example.com", "a..b@example.com", "a b@example.com"] {
            assert!(
                matches!(customer.set_email(bad), Err(CustomerError::InvalidEmail(_))),
                "{bad} should be rejected"
            );
        }
        assert_eq!(customer.email(), None);
    }

    #[test]
    fn valid_emails_are_accepted() {
        let mut customer = Customer::new();
        for good in ["a@example.com", "first.last+tag@sub.example.co", "x_y@mail-server.ru"] {
            assert!(customer.set_email(good).is_ok(), "{good} should be accepted");
        }
    }

    #[test]
    fn email_length_limit() {
        let mut customer = Customer::new();
        let long = format!("{}@example.com", "a".repeat(MAX_EMAIL_LEN));
        assert!(matches!(
            customer.set_email(&long),
            Err(CustomerError::TooLong { field: "email", .. })
        ));
    }

    #[test]
    fn empty_inn_and_address_are_noops() {
        let mut customer = Customer::new();
        customer.set_inn("").unwrap();
        customer.set_address("").unwrap();
        assert_eq!(customer.vat_number(), None);
        assert_eq!(customer.registration_address(), None);

        customer.set_inn("123").unwrap();
        customer.set_inn("").unwrap();
        assert_eq!(customer.vat_number(), Some("123"));
    }

    #[test]
    fn inn_and_address_length_limits() {
        let mut customer = Customer::new();
        assert!(matches!(
            customer.set_inn(&"1".repeat(MAX_INN_LEN + 1)),
            Err(CustomerError::TooLong { field: "vatNumber", max: MAX_INN_LEN })
        ));
        assert!(matches!(
            customer.set_address(&"a".repeat(MAX_ADDRESS_LEN + 1)),
            Err(CustomerError::TooLong {
                field: "registrationAddress",
                max: MAX_ADDRESS_LEN
            })
        ));
        assert!(customer.set_inn(&"1".repeat(MAX_INN_LEN)).is_ok());
    }

    #[test]
    fn customer_type_serde_uses_wire_values() {
        assert_eq!(
            serde_json::to_string(&CustomerType::LegalPerson).unwrap(),
            "\"legal\""
        );
        let parsed: CustomerType = serde_json::from_str("\"private\"").unwrap();
        assert_eq!(parsed, CustomerType::PrivatePerson);
        assert_eq!(CustomerType::PrivatePerson.to_string(), "private");
    }

    #[test]
    fn customer_input_conversion() {
        let input: CustomerInput = serde_json::from_value(serde_json::json!({
            "type": "legal",
            "name": "ООО Ромашка",
            "phone": "+74950000000",
            "email": "office@romashka.ru",
            "vatNumber": "7700000000",
            "address": "Москва"
        }))
        .unwrap();
        let customer = Customer::try_from(input).unwrap();
        let data = customer.form_data().unwrap();
        assert_eq!(data.len(), 6);
        assert_eq!(data["vatNumber"], "7700000000");
        assert_eq!(data["registrationAddress"], "Москва");
    }

    #[test]
    fn customer_input_stops_at_first_invalid_field() {
        let input = CustomerInput {
            customer_type: Some("private".to_string()),
            email: Some("broken".to_string()),
            ..CustomerInput::default()
        };
        assert!(matches!(
            Customer::try_from(input),
            Err(CustomerError::InvalidEmail(_))
        ));
    }

    #[test]
    fn form_data_serializes_as_json_object() {
        let json = serde_json::to_value(private_customer().form_data().unwrap()).unwrap();
        assert_eq!(json["type"], "private");
        assert_eq!(json.as_object().map(serde_json::Map::len), Some(4));
    }
}
