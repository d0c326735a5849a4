//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, the account type as its wire
//! discriminant, and tag colors as plain integers. The `Raw*` structs hold
//! a row exactly as read before decoding into domain types.

use centavo_core::{
  Error, Result,
  account::{Account, AccountType},
  bank::Bank,
  history::{AccountSummary, BankSummary, History, HistoryListItem},
  provision::Provision,
  tag::Tag,
};
use chrono::{DateTime, Utc};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339()
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Storage(format!("invalid timestamp {s:?}: {e}")))
}

// ─── AccountType ─────────────────────────────────────────────────────────────

pub fn encode_account_type(kind: AccountType) -> &'static str {
  match kind {
    AccountType::Checking => "CHECKING",
    AccountType::Savings => "SAVINGS",
    AccountType::Salary => "SALARY",
    AccountType::Investment => "INVESTMENT",
  }
}

pub fn decode_account_type(s: &str) -> Result<AccountType> {
  match s {
    "CHECKING" => Ok(AccountType::Checking),
    "SAVINGS" => Ok(AccountType::Savings),
    "SALARY" => Ok(AccountType::Salary),
    "INVESTMENT" => Ok(AccountType::Investment),
    other => Err(Error::Storage(format!("unknown account type: {other:?}"))),
  }
}

// ─── Raw rows ────────────────────────────────────────────────────────────────

pub struct RawBank {
  pub id:         i64,
  pub created_at: String,
  pub updated_at: String,
  pub code:       String,
  pub name:       String,
}

impl RawBank {
  pub fn into_bank(self) -> Result<Bank> {
    Ok(Bank {
      id:         self.id,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      code:       self.code,
      name:       self.name,
    })
  }
}

pub struct RawAccount {
  pub id:           i64,
  pub created_at:   String,
  pub updated_at:   String,
  pub name:         String,
  pub account_type: String,
  pub branch:       Option<String>,
  pub number:       Option<String>,
  pub credit_limit: i64,
  /// Joined owning bank; `None` when unlinked or the bank is soft-deleted.
  pub bank:         Option<RawBank>,
}

impl RawAccount {
  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      id:           self.id,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
      name:         self.name,
      kind:         decode_account_type(&self.account_type)?,
      bank:         self.bank.map(RawBank::into_bank).transpose()?,
      branch:       self.branch,
      number:       self.number,
      credit_limit: self.credit_limit,
    })
  }
}

pub struct RawHistory {
  pub id:           i64,
  pub created_at:   String,
  pub updated_at:   String,
  pub name:         String,
  pub payment_date: String,
  pub amount:       i64,
  pub account:      Option<RawAccount>,
}

impl RawHistory {
  pub fn into_history(self, tags: Vec<Tag>) -> Result<History> {
    Ok(History {
      id:           self.id,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
      name:         self.name,
      payment_date: decode_dt(&self.payment_date)?,
      amount:       self.amount,
      account:      self.account.map(RawAccount::into_account).transpose()?,
      tags,
    })
  }
}

pub struct RawHistoryListItem {
  pub id:           i64,
  pub name:         String,
  pub payment_date: String,
  pub amount:       i64,
  pub account:      Option<RawAccountSummary>,
}

pub struct RawAccountSummary {
  pub name:         String,
  pub account_type: String,
  pub branch:       Option<String>,
  pub number:       Option<String>,
  pub credit_limit: i64,
  pub bank_code:    Option<String>,
  pub bank_name:    Option<String>,
}

impl RawHistoryListItem {
  pub fn into_item(self) -> Result<HistoryListItem> {
    let account = match self.account {
      None => None,
      Some(raw) => Some(AccountSummary {
        name:         raw.name,
        kind:         decode_account_type(&raw.account_type)?,
        bank:         raw
          .bank_code
          .zip(raw.bank_name)
          .map(|(code, name)| BankSummary { code, name }),
        branch:       raw.branch,
        number:       raw.number,
        credit_limit: raw.credit_limit,
      }),
    };
    Ok(HistoryListItem {
      id: self.id,
      name: self.name,
      payment_date: decode_dt(&self.payment_date)?,
      amount: self.amount,
      account,
    })
  }
}

pub struct RawProvision {
  pub id:           i64,
  pub created_at:   String,
  pub updated_at:   String,
  pub name:         String,
  pub initial_date: String,
  pub final_date:   Option<String>,
  pub amount:       i64,
}

impl RawProvision {
  pub fn into_provision(self) -> Result<Provision> {
    Ok(Provision {
      id:           self.id,
      created_at:   decode_dt(&self.created_at)?,
      updated_at:   decode_dt(&self.updated_at)?,
      name:         self.name,
      initial_date: decode_dt(&self.initial_date)?,
      final_date:   self.final_date.as_deref().map(decode_dt).transpose()?,
      amount:       self.amount,
    })
  }
}

pub struct RawTag {
  pub id:         i64,
  pub created_at: String,
  pub updated_at: String,
  pub name:       String,
  pub color:      i64,
}

impl RawTag {
  pub fn into_tag(self) -> Result<Tag> {
    let color = u32::try_from(self.color)
      .map_err(|_| Error::Storage(format!("tag color out of range: {}", self.color)))?;
    Ok(Tag {
      id:         self.id,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
      name:       self.name,
      color,
    })
  }
}
