//! Form payloads posted by the console's pages and their validation rules.
//!
//! Every form converts into the API payload it feeds, or into [`FormErrors`]
//! that the page shows next to the offending inputs. Nothing invalid reaches
//! the accounting API.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use crate::models::{
    LedgerScope, NewEntity, NewLedger, NewTransaction, ProfileUpdate, Registration, TxType,
};

/// Key under which errors not tied to one input are stored.
pub const FORM_LEVEL: &str = "__all__";

/// First validation message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Error not attached to a particular field.
    pub fn general(&self) -> Option<&str> {
        self.get(FORM_LEVEL)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Any one message, for a toast summarising the failure.
    pub fn first(&self) -> Option<&str> {
        self.general()
            .or_else(|| self.0.values().next().map(String::as_str))
    }

    fn into_result(self) -> Result<(), FormErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut form = FormErrors::new();
        for (field, list) in errors.field_errors() {
            if let Some(error) = list.first() {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| error.code.to_string());
                form.insert(field.to_string(), message);
            }
        }
        form
    }
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(failure(
            "password_lowercase",
            "Password must contain at least one lowercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(failure(
            "password_uppercase",
            "Password must contain at least one uppercase letter",
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(failure(
            "password_digit",
            "Password must contain at least one number",
        ));
    }
    Ok(())
}

fn validate_optional_email(email: &str) -> Result<(), ValidationError> {
    if email.trim().is_empty() || email.validate_email() {
        Ok(())
    } else {
        Err(failure("email", "Invalid email format"))
    }
}

fn required(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(failure("required", message))
    } else {
        Ok(())
    }
}

fn validate_entity_name(name: &str) -> Result<(), ValidationError> {
    required(name, "Entity name is required")
}

fn validate_entity_path(path: &str) -> Result<(), ValidationError> {
    required(path, "Path is required")
}

fn validate_ledger_name(name: &str) -> Result<(), ValidationError> {
    required(name, "Ledger name is required")
}

fn validate_positive_amount(amount: &str) -> Result<(), ValidationError> {
    match Decimal::from_str(amount.trim()) {
        Ok(value) if value > Decimal::ZERO => Ok(()),
        Ok(_) => Err(failure("amount_positive", "Amount must be greater than zero")),
        Err(_) => Err(failure("amount_number", "Amount must be a number")),
    }
}

fn validate_tx_type(tx_type: &str) -> Result<(), ValidationError> {
    TxType::from_str(tx_type)
        .map(|_| ())
        .map_err(|_| failure("tx_type", "Choose debit or credit"))
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

impl LoginForm {
    pub fn check(&self) -> Result<(), FormErrors> {
        self.validate().map_err(FormErrors::from)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterForm {
    #[validate(length(min = 2, max = 50, message = "First name must be 2 to 50 characters"))]
    pub first_name: String,

    #[validate(length(min = 2, max = 50, message = "Last name must be 2 to 50 characters"))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(
        length(min = 6, message = "Password must be at least 6 characters"),
        custom(function = "validate_password_strength")
    )]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn into_registration(self) -> Result<Registration, FormErrors> {
        self.validate()?;
        Ok(Registration {
            email: self.email.trim().to_string(),
            password: self.password,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileForm {
    #[validate(length(min = 2, max = 50, message = "First name must be 2 to 50 characters"))]
    pub first_name: String,

    #[validate(length(min = 2, max = 50, message = "Last name must be 2 to 50 characters"))]
    pub last_name: String,
}

impl ProfileForm {
    pub fn into_update(self) -> Result<ProfileUpdate, FormErrors> {
        self.validate()?;
        Ok(ProfileUpdate {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PasswordForm {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(
        length(min = 6, message = "Password must be at least 6 characters"),
        custom(function = "validate_password_strength")
    )]
    pub new_password: String,

    #[validate(must_match(other = "new_password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

impl PasswordForm {
    pub fn check(&self) -> Result<(), FormErrors> {
        self.validate().map_err(FormErrors::from)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EntityForm {
    #[validate(custom(function = "validate_entity_name"))]
    pub name: String,
    #[validate(custom(function = "validate_entity_path"))]
    pub path: String,
    #[serde(default)]
    pub address_1: String,
    #[serde(default)]
    pub address_2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    #[validate(custom(function = "validate_optional_email"))]
    pub email: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub phone: String,
    /// Checkbox; present only when ticked.
    #[serde(default)]
    pub accrual_method: Option<String>,
    #[serde(default)]
    pub hidden: Option<String>,
    #[serde(default = "first_month")]
    #[validate(range(min = 1, max = 12, message = "Fiscal year must start in month 1 to 12"))]
    pub fy_start_month: u8,
    #[serde(default)]
    pub last_closing_date: String,
}

fn first_month() -> u8 {
    1
}

impl Default for EntityForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            path: String::new(),
            address_1: String::new(),
            address_2: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: String::new(),
            email: String::new(),
            website: String::new(),
            phone: String::new(),
            accrual_method: Some("on".to_string()),
            hidden: None,
            fy_start_month: first_month(),
            last_closing_date: String::new(),
        }
    }
}

impl EntityForm {
    pub fn into_new_entity(self) -> Result<NewEntity, FormErrors> {
        let mut errors = self.validate().err().map(FormErrors::from).unwrap_or_default();

        let last_closing_date = if self.last_closing_date.trim().is_empty() {
            Utc::now().date_naive()
        } else {
            match NaiveDate::parse_from_str(self.last_closing_date.trim(), "%Y-%m-%d") {
                Ok(date) => date,
                Err(_) => {
                    errors.insert("last_closing_date", "Use the YYYY-MM-DD format");
                    Utc::now().date_naive()
                }
            }
        };
        errors.into_result()?;

        Ok(NewEntity {
            name: self.name.trim().to_string(),
            address_1: self.address_1,
            address_2: self.address_2,
            path: self.path.trim().to_string(),
            depth: 0,
            admin: 1,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            country: self.country,
            email: self.email.trim().to_string(),
            website: self.website,
            phone: self.phone,
            hidden: self.hidden.is_some(),
            accrual_method: self.accrual_method.is_some(),
            fy_start_month: self.fy_start_month,
            last_closing_date,
            meta: serde_json::Map::new(),
            managers: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LedgerForm {
    #[validate(custom(function = "validate_ledger_name"))]
    pub ledger_name: String,
    #[serde(default)]
    pub posted: Option<String>,
    #[serde(default)]
    pub locked: Option<String>,
    #[serde(default)]
    pub hidden: Option<String>,
}

impl LedgerForm {
    pub fn into_new_ledger(self) -> Result<NewLedger, FormErrors> {
        self.validate()?;
        Ok(NewLedger {
            ledger_name: self.ledger_name.trim().to_string(),
            posted: self.posted.is_some(),
            locked: self.locked.is_some(),
            hidden: self.hidden.is_some(),
            additional_info: serde_json::Map::new(),
        })
    }
}

/// One double-entry posting: a debit or credit on `account_uuid` balanced
/// against `corresponding_account_uuid`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_distinct_accounts"))]
pub struct TransactionForm {
    #[validate(length(min = 1, message = "Select an account"))]
    pub account_uuid: String,
    #[validate(length(min = 1, message = "Select a corresponding account"))]
    pub corresponding_account_uuid: String,
    #[validate(custom(function = "validate_positive_amount"))]
    pub amount: String,
    #[validate(custom(function = "validate_tx_type"))]
    pub tx_type: String,
    #[serde(default)]
    pub description: String,
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self {
            account_uuid: String::new(),
            corresponding_account_uuid: String::new(),
            amount: String::new(),
            tx_type: TxType::Dr.as_str().to_string(),
            description: String::new(),
        }
    }
}

fn validate_distinct_accounts(form: &TransactionForm) -> Result<(), ValidationError> {
    if !form.account_uuid.is_empty() && form.account_uuid == form.corresponding_account_uuid {
        return Err(failure(
            "same_account",
            "Account and corresponding account must be different",
        ));
    }
    Ok(())
}

impl TransactionForm {
    /// Validate against the current selection and build the API payload.
    pub fn into_new_transaction(
        self,
        scope: Option<&LedgerScope>,
    ) -> Result<(LedgerScope, NewTransaction), FormErrors> {
        let mut errors = self.validate().err().map(FormErrors::from).unwrap_or_default();
        if scope.is_none() {
            errors.insert(
                FORM_LEVEL,
                "Please select both an entity and a ledger before creating a transaction",
            );
        }
        errors.into_result()?;

        let (Some(scope), Ok(amount), Ok(tx_type)) = (
            scope,
            Decimal::from_str(self.amount.trim()),
            TxType::from_str(&self.tx_type),
        ) else {
            let mut errors = FormErrors::new();
            errors.insert(FORM_LEVEL, "Invalid transaction");
            return Err(errors);
        };

        let transaction = NewTransaction {
            account_uuid: self.account_uuid,
            amount,
            description: self.description.trim().to_string(),
            tx_type,
            entity_unit_uuid: scope.entity.clone(),
            corresponding_account_uuid: self.corresponding_account_uuid,
        };
        Ok((scope.clone(), transaction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> LedgerScope {
        LedgerScope::new("E1", "MAIN")
    }

    fn transaction(account: &str, corresponding: &str, amount: &str) -> TransactionForm {
        TransactionForm {
            account_uuid: account.into(),
            corresponding_account_uuid: corresponding.into(),
            amount: amount.into(),
            ..Default::default()
        }
    }

    #[test]
    fn same_account_on_both_sides_is_rejected() {
        let errors = transaction("A1", "A1", "100")
            .into_new_transaction(Some(&scope()))
            .unwrap_err();

        assert_eq!(
            errors.general(),
            Some("Account and corresponding account must be different")
        );
    }

    #[test]
    fn valid_transaction_targets_the_selected_entity() {
        let (target, payload) = transaction("A1", "A2", "100.50")
            .into_new_transaction(Some(&scope()))
            .unwrap();

        assert_eq!(target, scope());
        assert_eq!(payload.entity_unit_uuid, "E1");
        assert_eq!(payload.amount, Decimal::new(10050, 2));
        assert_eq!(payload.tx_type, TxType::Dr);
    }

    #[test]
    fn amount_must_be_positive_number() {
        for (amount, message) in [
            ("0", "Amount must be greater than zero"),
            ("-5", "Amount must be greater than zero"),
            ("ten", "Amount must be a number"),
        ] {
            let errors = transaction("A1", "A2", amount)
                .into_new_transaction(Some(&scope()))
                .unwrap_err();
            assert_eq!(errors.get("amount"), Some(message), "amount {:?}", amount);
        }
    }

    #[test]
    fn missing_accounts_and_selection_are_reported() {
        let errors = transaction("", "", "10").into_new_transaction(None).unwrap_err();

        assert_eq!(errors.get("account_uuid"), Some("Select an account"));
        assert!(errors.get("corresponding_account_uuid").is_some());
        assert!(errors.general().is_some_and(|m| m.contains("select both")));
    }

    #[test]
    fn login_requires_email_and_six_character_password() {
        let form = LoginForm {
            email: "not-an-email".into(),
            password: "12345".into(),
        };
        let errors = form.check().unwrap_err();
        assert_eq!(errors.get("email"), Some("Invalid email format"));
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 6 characters")
        );

        let form = LoginForm {
            email: "ada@example.com".into(),
            password: "123456".into(),
        };
        assert!(form.check().is_ok());
    }

    fn registration(password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
            password: password.into(),
            confirm_password: confirm.into(),
        }
    }

    #[test]
    fn registration_password_rules() {
        let cases = [
            ("secret1", "Password must contain at least one uppercase letter"),
            ("SECRET1", "Password must contain at least one lowercase letter"),
            ("Secrets", "Password must contain at least one number"),
            ("Se1", "Password must be at least 6 characters"),
        ];
        for (password, message) in cases {
            let errors = registration(password, password)
                .into_registration()
                .unwrap_err();
            assert_eq!(errors.get("password"), Some(message), "password {:?}", password);
        }

        let errors = registration("Secret1", "Secret2")
            .into_registration()
            .unwrap_err();
        assert_eq!(errors.get("confirm_password"), Some("Passwords do not match"));

        let payload = registration("Secret1", "Secret1").into_registration().unwrap();
        assert_eq!(payload.first_name, "Ada");
    }

    #[test]
    fn registration_name_bounds() {
        let mut form = registration("Secret1", "Secret1");
        form.first_name = "A".into();
        form.last_name = "L".repeat(51);

        let errors = form.into_registration().unwrap_err();
        assert!(errors.get("first_name").is_some());
        assert!(errors.get("last_name").is_some());
    }

    #[test]
    fn entity_requires_name_path_and_valid_month() {
        let form = EntityForm {
            name: "  ".into(),
            fy_start_month: 13,
            email: "nope".into(),
            ..Default::default()
        };
        let errors = form.into_new_entity().unwrap_err();

        assert_eq!(errors.get("name"), Some("Entity name is required"));
        assert_eq!(errors.get("path"), Some("Path is required"));
        assert!(errors.get("fy_start_month").is_some());
        assert_eq!(errors.get("email"), Some("Invalid email format"));
    }

    #[test]
    fn entity_defaults_fill_the_payload() {
        let form = EntityForm {
            name: "Acme".into(),
            path: "acme".into(),
            last_closing_date: "2024-12-31".into(),
            ..Default::default()
        };
        let entity = form.into_new_entity().unwrap();

        assert_eq!(entity.admin, 1);
        assert!(entity.accrual_method);
        assert!(!entity.hidden);
        assert_eq!(entity.email, "");
        assert_eq!(
            entity.last_closing_date,
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }

    #[test]
    fn ledger_name_is_required() {
        let errors = LedgerForm::default().into_new_ledger().unwrap_err();
        assert_eq!(errors.get("ledger_name"), Some("Ledger name is required"));

        let ledger = LedgerForm {
            ledger_name: " MAIN ".into(),
            posted: Some("on".into()),
            ..Default::default()
        }
        .into_new_ledger()
        .unwrap();
        assert_eq!(ledger.ledger_name, "MAIN");
        assert!(ledger.posted);
        assert!(!ledger.locked);
    }

    #[test]
    fn password_change_rules() {
        let form = PasswordForm {
            current_password: String::new(),
            new_password: "Newpass1".into(),
            confirm_password: "Newpass2".into(),
        };
        let errors = form.check().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.first(), Some("Passwords do not match"));
    }
}
