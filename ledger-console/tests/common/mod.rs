#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use console_core::error::ApiError;
use ledger_console::auth::AuthApi;
use ledger_console::config::SessionSettings;
use ledger_console::models::{
    Account, AccountBalances, AuthResponse, BalanceSheet, CashFlowStatement, Entity,
    IncomeStatement, Ledger, LedgerScope, NewEntity, NewLedger, NewTransaction, ProfileUpdate,
    Registration, Transaction, User,
};
use ledger_console::services::accounting::AccountingApi;
use ledger_console::startup::build_router;
use ledger_console::AppState;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

pub const VALID_TOKEN: &str = "good-token";

pub fn user() -> User {
    User {
        id: "U1".into(),
        email: "ada@example.com".into(),
        first_name: "Ada".into(),
        last_name: "Lovelace".into(),
    }
}

/// Accepts one token and one password.
pub struct FakeAuth;

#[async_trait]
impl AuthApi for FakeAuth {
    async fn profile(&self, token: &str) -> Result<User, ApiError> {
        if token == VALID_TOKEN {
            Ok(user())
        } else {
            Err(ApiError::Http {
                status: 401,
                body: "Invalid token".into(),
            })
        }
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        if email == "ada@example.com" && password == "Secret1" {
            Ok(AuthResponse {
                token: VALID_TOKEN.into(),
                user: user(),
            })
        } else {
            Err(ApiError::Http {
                status: 401,
                body: "Invalid credentials".into(),
            })
        }
    }

    async fn register(&self, registration: &Registration) -> Result<AuthResponse, ApiError> {
        Ok(AuthResponse {
            token: VALID_TOKEN.into(),
            user: User {
                id: "U2".into(),
                email: registration.email.clone(),
                first_name: registration.first_name.clone(),
                last_name: registration.last_name.clone(),
            },
        })
    }

    async fn change_password(
        &self,
        _token: Option<&str>,
        current_password: &str,
        _new_password: &str,
    ) -> Result<(), ApiError> {
        if current_password == "Secret1" {
            Ok(())
        } else {
            Err(ApiError::Http {
                status: 400,
                body: "Wrong password".into(),
            })
        }
    }

    async fn update_profile(
        &self,
        _token: Option<&str>,
        update: &ProfileUpdate,
    ) -> Result<User, ApiError> {
        Ok(User {
            first_name: update.first_name.clone(),
            last_name: update.last_name.clone(),
            ..user()
        })
    }
}

fn parse<T: serde::de::DeserializeOwned>(value: Value) -> T {
    serde_json::from_value(value).expect("fixture matches model")
}

pub fn entities() -> Vec<Entity> {
    parse(json!([
        { "uuid": "E1", "name": "Acme", "email": "books@acme.test", "city": "Austin", "accrual_method": true },
        { "uuid": "E2", "name": "Globex", "hidden": true }
    ]))
}

pub fn ledgers() -> Vec<Ledger> {
    parse(json!([
        { "uuid": "L1", "ledger_name": "MAIN", "posted": true },
        { "uuid": "L2", "ledger_name": "SIDE", "hidden": true }
    ]))
}

pub fn chart() -> Vec<Account> {
    parse(json!([
        { "uuid": "A1", "account_code": "1000", "account_name": "Cash", "account_type": "Asset", "current_balance": "1200.00" },
        { "uuid": "A2", "account_code": "4000", "account_name": "Sales", "account_type": "Revenue", "current_balance": "-1200.00" }
    ]))
}

pub fn income_statement() -> IncomeStatement {
    parse(json!({
        "revenues": [{ "code": "4000", "name": "Sales", "balance": "1200.00", "uuid": "A2" }],
        "total_revenues": "1200.00",
        "cogs": [],
        "total_cogs": "0",
        "gross_profit": "1200.00",
        "expenses": [],
        "total_expenses": "0",
        "net_income": "1200.00"
    }))
}

/// In-memory accounting API; records what the console posts.
#[derive(Default)]
pub struct FakeAccounting {
    pub created_transactions: Mutex<Vec<(LedgerScope, NewTransaction)>>,
    pub created_entities: Mutex<Vec<NewEntity>>,
    pub fail_creates: bool,
}

fn not_found() -> ApiError {
    ApiError::Http {
        status: 404,
        body: String::new(),
    }
}

#[async_trait]
impl AccountingApi for FakeAccounting {
    async fn list_entities(&self, _token: Option<&str>) -> Result<Vec<Entity>, ApiError> {
        Ok(entities())
    }

    async fn get_entity(&self, uuid: &str, _token: Option<&str>) -> Result<Entity, ApiError> {
        entities()
            .into_iter()
            .find(|e| e.uuid == uuid)
            .ok_or_else(not_found)
    }

    async fn create_entity(
        &self,
        entity: &NewEntity,
        _token: Option<&str>,
    ) -> Result<Entity, ApiError> {
        if self.fail_creates {
            return Err(ApiError::Http {
                status: 500,
                body: String::new(),
            });
        }
        self.created_entities.lock().unwrap().push(entity.clone());
        Ok(parse(json!({ "uuid": "E3", "name": entity.name })))
    }

    async fn list_ledgers(
        &self,
        _entity: &str,
        _token: Option<&str>,
    ) -> Result<Vec<Ledger>, ApiError> {
        Ok(ledgers())
    }

    async fn create_ledger(
        &self,
        _entity: &str,
        ledger: &NewLedger,
        _token: Option<&str>,
    ) -> Result<Ledger, ApiError> {
        Ok(parse(json!({ "uuid": "L3", "ledger_name": ledger.ledger_name })))
    }

    async fn create_chart_of_accounts(
        &self,
        _entity: &str,
        _ledger_name: &str,
        _token: Option<&str>,
    ) -> Result<Value, ApiError> {
        Ok(json!({ "status": "created" }))
    }

    async fn chart_of_accounts(
        &self,
        _scope: &LedgerScope,
        _token: Option<&str>,
    ) -> Result<Vec<Account>, ApiError> {
        Ok(chart())
    }

    async fn ledger_accounts(
        &self,
        _scope: &LedgerScope,
        _token: Option<&str>,
    ) -> Result<Vec<Account>, ApiError> {
        Ok(chart())
    }

    async fn all_accounts(&self, _token: Option<&str>) -> Result<Vec<Account>, ApiError> {
        Ok(chart())
    }

    async fn account_balances(
        &self,
        _scope: &LedgerScope,
        _token: Option<&str>,
    ) -> Result<AccountBalances, ApiError> {
        Ok(parse(json!({
            "assets": [{ "uuid": "A1", "code": "1000", "name": "Cash", "balance": "1200.00" }]
        })))
    }

    async fn list_transactions(
        &self,
        _scope: &LedgerScope,
        _token: Option<&str>,
    ) -> Result<Vec<Transaction>, ApiError> {
        Ok(parse(json!([{
            "uuid": "T1",
            "account_uuid": "A1",
            "amount": "1200.00",
            "description": "Opening sale",
            "tx_type": "dr",
            "entity_unit_uuid": "E1",
            "corresponding_account_uuid": "A2",
            "timestamp": "2024-03-05T14:30:00Z"
        }])))
    }

    async fn create_transaction(
        &self,
        scope: &LedgerScope,
        transaction: &NewTransaction,
        _token: Option<&str>,
    ) -> Result<Transaction, ApiError> {
        self.created_transactions
            .lock()
            .unwrap()
            .push((scope.clone(), transaction.clone()));
        Ok(parse(json!({
            "uuid": "T2",
            "account_uuid": transaction.account_uuid,
            "amount": transaction.amount.to_string(),
            "description": transaction.description,
            "tx_type": transaction.tx_type.as_str(),
            "entity_unit_uuid": transaction.entity_unit_uuid,
            "corresponding_account_uuid": transaction.corresponding_account_uuid,
            "timestamp": "2024-03-06T09:00:00Z"
        })))
    }

    async fn balance_sheet(
        &self,
        _scope: &LedgerScope,
        _token: Option<&str>,
    ) -> Result<BalanceSheet, ApiError> {
        Err(not_found())
    }

    async fn income_statement(
        &self,
        _scope: &LedgerScope,
        _token: Option<&str>,
    ) -> Result<IncomeStatement, ApiError> {
        Ok(income_statement())
    }

    async fn cash_flow_statement(
        &self,
        _scope: &LedgerScope,
        _token: Option<&str>,
    ) -> Result<CashFlowStatement, ApiError> {
        Err(not_found())
    }
}

pub fn session_settings() -> SessionSettings {
    SessionSettings {
        token_ttl_days: 7,
        secure_cookies: false,
    }
}

pub fn app_with(accounting: Arc<FakeAccounting>) -> Router {
    build_router(AppState::new(
        accounting,
        Arc::new(FakeAuth),
        session_settings(),
    ))
}

pub fn app() -> Router {
    app_with(Arc::new(FakeAccounting::default()))
}

pub fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header("cookie", cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// All `Set-Cookie` header values of a response.
pub fn set_cookies(response: &axum::response::Response) -> Vec<String> {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}
