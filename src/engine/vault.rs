use crate::error::OwnerDecodeError;
use crate::micheline::{StorageMapping, StorageValue};
use crate::tezos::AccountId;
use crate::utils::constants::{OVEN_MARKER_FIELD, OWNER_FIELD};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VaultClass {
    NotAVault,
    /// `owner` is `None` when the storage carries no owner field.
    Vault { owner: Option<AccountId> },
}

pub fn classify_vault(mapping: &StorageMapping) -> Result<VaultClass, OwnerDecodeError> {
    if !mapping.contains(OVEN_MARKER_FIELD) {
        return Ok(VaultClass::NotAVault);
    }
    let owner = mapping.get(OWNER_FIELD).map(owner_account).transpose()?;
    Ok(VaultClass::Vault { owner })
}

fn owner_account(value: &StorageValue) -> Result<AccountId, OwnerDecodeError> {
    match value {
        StorageValue::Address(account) => Ok(account.clone()),
        StorageValue::String(text) => Ok(AccountId::parse(text)?),
        other => Err(OwnerDecodeError::NotScalar(format!("{other:?}"))),
    }
}
