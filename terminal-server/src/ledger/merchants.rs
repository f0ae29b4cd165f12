//! Merchant ledger
//!
//! Owns merchant records, branding settings, payout bank accounts, saved
//! customers and the linked processor account state. All maps live behind a
//! single lock so that multi-record invariants (merchant + settings created
//! together, one default bank account) hold atomically.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    BankAccount, BankAccountCreate, Customer, Merchant, MerchantPublic, MerchantSettings,
    ProcessorStatus, SettingsUpdate,
};
use shared::util::{new_id, now_millis};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::util::{hash_password, verify_password};

#[derive(Default)]
struct Inner {
    merchants: HashMap<String, Merchant>,
    settings: HashMap<String, MerchantSettings>,
    /// merchant id -> accounts in creation order ("earliest remaining"
    /// promotion relies on this ordering)
    bank_accounts: HashMap<String, Vec<BankAccount>>,
    /// merchant id -> phone -> customer
    customers: HashMap<String, HashMap<String, Customer>>,
}

#[derive(Clone)]
pub struct MerchantLedger {
    inner: Arc<RwLock<Inner>>,
}

impl MerchantLedger {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    // ==================== Merchants ====================

    /// Create a merchant with default branding settings.
    ///
    /// Rejects when the email is already registered (exact, case-sensitive
    /// match). The password is stored as an argon2 hash, never plaintext.
    pub async fn create(
        &self,
        email: &str,
        password: &str,
        business_name: &str,
    ) -> AppResult<MerchantPublic> {
        if email.is_empty() || password.is_empty() || business_name.is_empty() {
            return Err(AppError::with_message(
                ErrorCode::RequiredField,
                "email, password and business_name are required",
            ));
        }

        let password_hash = hash_password(password)
            .map_err(|_| AppError::internal("Password hashing failed"))?;

        let mut inner = self.inner.write().await;
        if inner.merchants.values().any(|m| m.email == email) {
            return Err(AppError::new(ErrorCode::EmailAlreadyRegistered));
        }

        let now = now_millis();
        let merchant = Merchant {
            id: new_id("mrc"),
            email: email.to_string(),
            password_hash,
            business_name: business_name.to_string(),
            processor_account_id: None,
            processor_status: ProcessorStatus::NotConnected,
            created_at: now,
            updated_at: now,
        };

        let settings = MerchantSettings::defaults(&merchant.id, business_name, email, now);
        let public = MerchantPublic::from(&merchant);

        let _ = inner.settings.insert(merchant.id.clone(), settings);
        let _ = inner.merchants.insert(merchant.id.clone(), merchant);
        Ok(public)
    }

    /// Verify credentials against the stored hash. Returns `None` for an
    /// unknown email or a wrong password, without distinguishing the two.
    pub async fn authenticate(&self, email: &str, password: &str) -> Option<MerchantPublic> {
        let inner = self.inner.read().await;
        let merchant = inner.merchants.values().find(|m| m.email == email)?;
        if verify_password(password, &merchant.password_hash) {
            Some(MerchantPublic::from(merchant))
        } else {
            None
        }
    }

    /// Read a merchant without the credential field.
    pub async fn get(&self, merchant_id: &str) -> Option<MerchantPublic> {
        let inner = self.inner.read().await;
        inner.merchants.get(merchant_id).map(MerchantPublic::from)
    }

    /// Set or clear the linked processor account. `None` represents
    /// unlinking: both the account id and the status are cleared.
    pub async fn set_processor_link(
        &self,
        merchant_id: &str,
        link: Option<(String, ProcessorStatus)>,
    ) -> AppResult<MerchantPublic> {
        let mut inner = self.inner.write().await;
        let merchant = inner
            .merchants
            .get_mut(merchant_id)
            .ok_or_else(|| AppError::new(ErrorCode::MerchantNotFound))?;

        match link {
            Some((account_id, status)) => {
                merchant.processor_account_id = Some(account_id);
                merchant.processor_status = status;
            }
            None => {
                merchant.processor_account_id = None;
                merchant.processor_status = ProcessorStatus::NotConnected;
            }
        }
        merchant.updated_at = now_millis();
        Ok(MerchantPublic::from(&*merchant))
    }

    // ==================== Settings ====================

    pub async fn settings(&self, merchant_id: &str) -> Option<MerchantSettings> {
        self.inner.read().await.settings.get(merchant_id).cloned()
    }

    /// Partial merge: only the fields present in the update are replaced.
    pub async fn update_settings(
        &self,
        merchant_id: &str,
        update: SettingsUpdate,
    ) -> AppResult<MerchantSettings> {
        let mut inner = self.inner.write().await;
        let settings = inner
            .settings
            .get_mut(merchant_id)
            .ok_or_else(|| AppError::new(ErrorCode::SettingsNotFound))?;

        if let Some(v) = update.business_name {
            settings.business_name = v;
        }
        if let Some(v) = update.logo_url {
            settings.logo_url = Some(v);
        }
        if let Some(v) = update.primary_color {
            settings.primary_color = v;
        }
        if let Some(v) = update.secondary_color {
            settings.secondary_color = v;
        }
        if let Some(v) = update.address {
            settings.address = v;
        }
        if let Some(v) = update.phone {
            settings.phone = v;
        }
        if let Some(v) = update.business_email {
            settings.business_email = v;
        }
        if let Some(v) = update.receipt_footer {
            settings.receipt_footer = v;
        }
        settings.updated_at = now_millis();
        Ok(settings.clone())
    }

    // ==================== Bank accounts ====================

    pub async fn bank_accounts(&self, merchant_id: &str) -> Vec<BankAccount> {
        self.inner
            .read()
            .await
            .bank_accounts
            .get(merchant_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Add a payout account. The first account for a merchant is always
    /// marked default; a later account created with `is_default` unsets the
    /// previous default.
    pub async fn add_bank_account(
        &self,
        merchant_id: &str,
        create: BankAccountCreate,
    ) -> AppResult<BankAccount> {
        let mut inner = self.inner.write().await;
        if !inner.merchants.contains_key(merchant_id) {
            return Err(AppError::new(ErrorCode::MerchantNotFound));
        }

        let accounts = inner.bank_accounts.entry(merchant_id.to_string()).or_default();
        let make_default = create.is_default || accounts.is_empty();
        if make_default {
            for acc in accounts.iter_mut() {
                acc.is_default = false;
            }
        }

        let account = BankAccount {
            id: new_id("bank"),
            merchant_id: merchant_id.to_string(),
            holder_name: create.holder_name,
            bank_name: create.bank_name,
            account_number: create.account_number,
            routing_number: create.routing_number,
            account_type: create.account_type,
            currency: create.currency.to_uppercase(),
            is_default: make_default,
            created_at: now_millis(),
        };
        accounts.push(account.clone());
        Ok(account)
    }

    /// Mark one account default, unsetting all others.
    pub async fn set_default_bank_account(
        &self,
        merchant_id: &str,
        account_id: &str,
    ) -> AppResult<BankAccount> {
        let mut inner = self.inner.write().await;
        let accounts = inner
            .bank_accounts
            .get_mut(merchant_id)
            .ok_or_else(|| AppError::new(ErrorCode::BankAccountNotFound))?;

        let pos = accounts
            .iter()
            .position(|a| a.id == account_id)
            .ok_or_else(|| AppError::new(ErrorCode::BankAccountNotFound))?;
        for acc in accounts.iter_mut() {
            acc.is_default = false;
        }
        accounts[pos].is_default = true;
        Ok(accounts[pos].clone())
    }

    /// Delete an account; when the default is deleted the earliest remaining
    /// account is promoted. Deleting the last account leaves none default.
    pub async fn delete_bank_account(&self, merchant_id: &str, account_id: &str) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        let accounts = inner
            .bank_accounts
            .get_mut(merchant_id)
            .ok_or_else(|| AppError::new(ErrorCode::BankAccountNotFound))?;

        let pos = accounts
            .iter()
            .position(|a| a.id == account_id)
            .ok_or_else(|| AppError::new(ErrorCode::BankAccountNotFound))?;
        let removed = accounts.remove(pos);

        if removed.is_default
            && let Some(first) = accounts.first_mut()
        {
            first.is_default = true;
        }
        Ok(())
    }

    // ==================== Customers ====================

    /// Save or refresh a card-on-file customer, keyed by phone number scoped
    /// to the merchant.
    pub async fn upsert_customer(
        &self,
        merchant_id: &str,
        phone: &str,
        processor_customer_id: &str,
        card_last4: &str,
        card_brand: &str,
        processor_account_id: Option<String>,
    ) -> AppResult<Customer> {
        let mut inner = self.inner.write().await;
        if !inner.merchants.contains_key(merchant_id) {
            return Err(AppError::new(ErrorCode::MerchantNotFound));
        }

        let now = now_millis();
        let by_phone = inner.customers.entry(merchant_id.to_string()).or_default();
        let customer = by_phone
            .entry(phone.to_string())
            .and_modify(|c| {
                c.processor_customer_id = processor_customer_id.to_string();
                c.card_last4 = card_last4.to_string();
                c.card_brand = card_brand.to_string();
                c.processor_account_id = processor_account_id.clone();
                c.updated_at = now;
            })
            .or_insert_with(|| Customer {
                phone: phone.to_string(),
                merchant_id: merchant_id.to_string(),
                processor_customer_id: processor_customer_id.to_string(),
                card_last4: card_last4.to_string(),
                card_brand: card_brand.to_string(),
                processor_account_id,
                created_at: now,
                updated_at: now,
            });
        Ok(customer.clone())
    }

    pub async fn find_customer(&self, merchant_id: &str, phone: &str) -> Option<Customer> {
        self.inner
            .read()
            .await
            .customers
            .get(merchant_id)
            .and_then(|m| m.get(phone))
            .cloned()
    }
}

impl Default for MerchantLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str, is_default: bool) -> BankAccountCreate {
        BankAccountCreate {
            holder_name: name.to_string(),
            bank_name: "First Bank".to_string(),
            account_number: "0123456789".to_string(),
            routing_number: "044000000".to_string(),
            account_type: "checking".to_string(),
            currency: "usd".to_string(),
            is_default,
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let ledger = MerchantLedger::new();
        ledger.create("a@b.com", "pw123456", "Shop A").await.unwrap();
        let err = ledger.create("a@b.com", "other", "Shop B").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmailAlreadyRegistered);
    }

    #[tokio::test]
    async fn test_email_match_is_case_sensitive() {
        let ledger = MerchantLedger::new();
        ledger.create("a@b.com", "pw123456", "Shop A").await.unwrap();
        assert!(ledger.create("A@B.com", "pw123456", "Shop B").await.is_ok());
    }

    #[tokio::test]
    async fn test_authenticate() {
        let ledger = MerchantLedger::new();
        let m = ledger.create("a@b.com", "pw123456", "Shop").await.unwrap();
        let authed = ledger.authenticate("a@b.com", "pw123456").await.unwrap();
        assert_eq!(authed.id, m.id);
        assert!(ledger.authenticate("a@b.com", "wrong").await.is_none());
        assert!(ledger.authenticate("nobody@b.com", "pw123456").await.is_none());
    }

    #[tokio::test]
    async fn test_default_settings_created_with_merchant() {
        let ledger = MerchantLedger::new();
        let m = ledger.create("a@b.com", "pw123456", "Shop").await.unwrap();
        let settings = ledger.settings(&m.id).await.unwrap();
        assert_eq!(settings.business_name, "Shop");
        assert_eq!(settings.business_email, "a@b.com");
        assert_eq!(settings.primary_color, "#6366f1");
        assert_eq!(settings.receipt_footer, "Thank you for your business!");
    }

    #[tokio::test]
    async fn test_settings_partial_merge() {
        let ledger = MerchantLedger::new();
        let m = ledger.create("a@b.com", "pw123456", "Shop").await.unwrap();
        let updated = ledger
            .update_settings(
                &m.id,
                SettingsUpdate {
                    phone: Some("+1 555 0100".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.phone, "+1 555 0100");
        // untouched fields keep their defaults
        assert_eq!(updated.primary_color, "#6366f1");
    }

    #[tokio::test]
    async fn test_update_settings_unknown_merchant() {
        let ledger = MerchantLedger::new();
        let err = ledger
            .update_settings("mrc_0_missing00", SettingsUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::SettingsNotFound);
    }

    #[tokio::test]
    async fn test_first_bank_account_is_default() {
        let ledger = MerchantLedger::new();
        let m = ledger.create("a@b.com", "pw123456", "Shop").await.unwrap();
        let a = ledger
            .add_bank_account(&m.id, account("A", false))
            .await
            .unwrap();
        assert!(a.is_default);
    }

    #[tokio::test]
    async fn test_new_default_flips_previous() {
        let ledger = MerchantLedger::new();
        let m = ledger.create("a@b.com", "pw123456", "Shop").await.unwrap();
        let a = ledger.add_bank_account(&m.id, account("A", false)).await.unwrap();
        let b = ledger.add_bank_account(&m.id, account("B", true)).await.unwrap();
        let accounts = ledger.bank_accounts(&m.id).await;
        assert!(!accounts.iter().find(|x| x.id == a.id).unwrap().is_default);
        assert!(accounts.iter().find(|x| x.id == b.id).unwrap().is_default);
    }

    #[tokio::test]
    async fn test_deleting_default_promotes_earliest() {
        let ledger = MerchantLedger::new();
        let m = ledger.create("a@b.com", "pw123456", "Shop").await.unwrap();
        let a = ledger.add_bank_account(&m.id, account("A", false)).await.unwrap();
        let b = ledger.add_bank_account(&m.id, account("B", false)).await.unwrap();
        let c = ledger.add_bank_account(&m.id, account("C", true)).await.unwrap();

        ledger.delete_bank_account(&m.id, &c.id).await.unwrap();
        let accounts = ledger.bank_accounts(&m.id).await;
        // earliest remaining (A) takes over
        assert!(accounts.iter().find(|x| x.id == a.id).unwrap().is_default);
        assert!(!accounts.iter().find(|x| x.id == b.id).unwrap().is_default);
    }

    #[tokio::test]
    async fn test_deleting_last_account_leaves_none() {
        let ledger = MerchantLedger::new();
        let m = ledger.create("a@b.com", "pw123456", "Shop").await.unwrap();
        let a = ledger.add_bank_account(&m.id, account("A", true)).await.unwrap();
        ledger.delete_bank_account(&m.id, &a.id).await.unwrap();
        assert!(ledger.bank_accounts(&m.id).await.is_empty());
    }

    #[tokio::test]
    async fn test_set_default_unsets_others() {
        let ledger = MerchantLedger::new();
        let m = ledger.create("a@b.com", "pw123456", "Shop").await.unwrap();
        let a = ledger.add_bank_account(&m.id, account("A", false)).await.unwrap();
        let b = ledger.add_bank_account(&m.id, account("B", false)).await.unwrap();
        ledger.set_default_bank_account(&m.id, &b.id).await.unwrap();
        let accounts = ledger.bank_accounts(&m.id).await;
        assert!(!accounts.iter().find(|x| x.id == a.id).unwrap().is_default);
        assert!(accounts.iter().find(|x| x.id == b.id).unwrap().is_default);
    }

    #[tokio::test]
    async fn test_processor_link_set_and_clear() {
        let ledger = MerchantLedger::new();
        let m = ledger.create("a@b.com", "pw123456", "Shop").await.unwrap();
        let linked = ledger
            .set_processor_link(
                &m.id,
                Some(("acct_123".to_string(), ProcessorStatus::Connected)),
            )
            .await
            .unwrap();
        assert_eq!(linked.processor_account_id.as_deref(), Some("acct_123"));
        assert_eq!(linked.processor_status, ProcessorStatus::Connected);

        let unlinked = ledger.set_processor_link(&m.id, None).await.unwrap();
        assert!(unlinked.processor_account_id.is_none());
        assert_eq!(unlinked.processor_status, ProcessorStatus::NotConnected);
    }

    #[tokio::test]
    async fn test_customer_upsert_scoped_per_merchant() {
        let ledger = MerchantLedger::new();
        let m1 = ledger.create("a@b.com", "pw123456", "Shop A").await.unwrap();
        let m2 = ledger.create("c@d.com", "pw123456", "Shop B").await.unwrap();

        ledger
            .upsert_customer(&m1.id, "+2348012345678", "cus_1", "4242", "visa", None)
            .await
            .unwrap();
        assert!(ledger.find_customer(&m1.id, "+2348012345678").await.is_some());
        assert!(ledger.find_customer(&m2.id, "+2348012345678").await.is_none());

        // upsert refreshes the card details
        let updated = ledger
            .upsert_customer(&m1.id, "+2348012345678", "cus_2", "1111", "mastercard", None)
            .await
            .unwrap();
        assert_eq!(updated.processor_customer_id, "cus_2");
        assert_eq!(updated.card_last4, "1111");
    }

    #[tokio::test]
    async fn test_public_view_has_no_credential() {
        let ledger = MerchantLedger::new();
        let m = ledger.create("a@b.com", "pw123456", "Shop").await.unwrap();
        let json = serde_json::to_value(ledger.get(&m.id).await.unwrap()).unwrap();
        assert!(json.get("password_hash").is_none());
    }
}
